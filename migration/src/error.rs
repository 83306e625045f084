use std::{path::PathBuf, time::Duration};

use ethers::types::{Address, TxHash};

/// Every variant is fatal to the current run, nothing is retried in-process
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to load and parse migration state: {0}")]
    CorruptCheckpoint(String),

    #[error("missing {0}")]
    MissingDependency(String),

    #[error("{contract}.owner is {owner:?}, not the signer {signer:?}")]
    UnauthorizedOwner {
        contract: String,
        owner: Address,
        signer: Address,
    },

    #[error("transaction {hash:?} did not reach {confirmations} confirmations within {timeout:?}")]
    ConfirmationTimeout {
        hash: TxHash,
        confirmations: u64,
        timeout: Duration,
    },

    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    #[error("state key `{key}` already holds {existing}")]
    CheckpointConflict { key: String, existing: String },

    #[error("artifact {name}: {reason}")]
    Artifact { name: String, reason: String },

    #[error("rpc: {0}")]
    Rpc(String),

    #[error("failed to persist migration state to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MigrationError {
    pub fn artifact(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Artifact {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn rpc(error: impl ToString) -> Self {
        Self::Rpc(error.to_string())
    }
}

pub type Result<T, E = MigrationError> = std::result::Result<T, E>;
