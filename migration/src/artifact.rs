use std::{collections::BTreeMap, fs, path::Path};

use ethers::{
    abi::{self, Token},
    types::{Address, Bytes},
};
use serde::Deserialize;

use crate::error::{MigrationError, Result};

/// `source file -> library name -> placeholder offsets` as emitted by solc
pub type LinkReferences = BTreeMap<String, BTreeMap<String, Vec<LinkOffset>>>;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LinkOffset {
    pub start: usize,
    pub length: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    bytecode: RawBytecode,
    #[serde(default)]
    link_references: LinkReferences,
}

// Hardhat writes a bare hex string, dapptools and forge nest it under `object`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object {
        object: String,
        #[serde(default, rename = "linkReferences")]
        link_references: LinkReferences,
    },
}

#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    bytecode: String,
    pub link_references: LinkReferences,
}

impl ContractArtifact {
    /// Read `<dir>/<contract>.json`
    pub fn load(dir: &Path, contract: &str) -> Result<Self> {
        let path = dir.join(format!("{contract}.json"));
        let content = fs::read(&path)
            .map_err(|e| MigrationError::artifact(contract, format!("{e}: {}", path.display())))?;
        Self::parse(contract, &content)
    }

    pub fn parse(contract: &str, content: &[u8]) -> Result<Self> {
        let raw: RawArtifact =
            serde_json::from_slice(content).map_err(|e| MigrationError::artifact(contract, e))?;
        let (bytecode, mut link_references) = match raw.bytecode {
            RawBytecode::Hex(hex) => (hex, BTreeMap::new()),
            RawBytecode::Object {
                object,
                link_references,
            } => (object, link_references),
        };
        link_references.extend(raw.link_references);
        // library placeholders are ascii too, anything else cannot be linked by offset
        if !bytecode.is_ascii() {
            return Err(MigrationError::artifact(contract, "bytecode is not ascii hex"));
        }
        Ok(Self {
            contract_name: raw.contract_name.unwrap_or_else(|| contract.to_string()),
            bytecode: bytecode.trim_start_matches("0x").to_string(),
            link_references,
        })
    }

    /// Bytecode with every library placeholder replaced by its deployed address
    pub fn link(&self, libraries: &[(&str, Address)]) -> Result<Bytes> {
        let mut code = self.bytecode.clone();
        for (file, references) in &self.link_references {
            for (library, offsets) in references {
                let address = libraries
                    .iter()
                    .find(|(name, _)| *name == library.as_str())
                    .map(|(_, address)| address)
                    .ok_or_else(|| {
                        MigrationError::artifact(
                            &self.contract_name,
                            format!("unlinked library {file}:{library}"),
                        )
                    })?;
                let address = hex::encode(address.as_bytes());
                for offset in offsets {
                    let (start, end) = (offset.start * 2, (offset.start + offset.length) * 2);
                    if offset.length != 20 || end > code.len() {
                        return Err(MigrationError::artifact(
                            &self.contract_name,
                            format!("bad link offset {}+{} for {library}", offset.start, offset.length),
                        ));
                    }
                    code.replace_range(start..end, &address);
                }
            }
        }
        let code = hex::decode(&code).map_err(|e| MigrationError::artifact(&self.contract_name, e))?;
        Ok(code.into())
    }

    /// Linked bytecode followed by the ABI-encoded constructor arguments
    pub fn creation_code(&self, libraries: &[(&str, Address)], arguments: &[Token]) -> Result<Bytes> {
        let code = self.link(libraries)?;
        Ok([code.to_vec(), abi::encode(arguments)].concat().into())
    }
}
