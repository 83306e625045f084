use std::path::PathBuf;

use deploy_v3_migration::{ArtifactSource, MigrationConfig, WormholeSettings};
use ethers::{
    types::{Address, U256},
    utils::to_checksum,
};
use eyre::WrapErr;
use reqwest::Url;

use crate::command::{Cli, WormholeArgs};

/// Everything a run needs, parsed and validated from the command line
pub struct RunSettings {
    pub private_key: String,
    pub json_rpc: Url,
    pub gas_price: Option<U256>,
    pub confirmations: u64,
    pub state_path: PathBuf,
    pub config: MigrationConfig,
}

impl TryFrom<Cli> for RunSettings {
    type Error = eyre::Error;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let private_key = parse_private_key(&cli.private_key)?;
        let json_rpc: Url = cli.json_rpc.parse().wrap_err("Invalid JSON RPC URL")?;
        let weth9_address = parse_address(&cli.weth9_address).wrap_err("Invalid WETH9 address")?;
        let native_currency_label_bytes = native_currency_label_bytes(&cli.native_currency_label)
            .wrap_err("Invalid native currency label")?;
        let v2_core_factory_address = cli
            .v2_core_factory_address
            .as_deref()
            .map(parse_address)
            .transpose()
            .wrap_err("Invalid V2 factory address")?
            .unwrap_or_default();
        let wormhole = WormholeSettings::try_from(cli.wormhole)?;
        let owner_address = match cli.owner_address.as_deref() {
            Some(owner) if !owner.is_empty() => {
                Some(parse_address(owner).wrap_err("Invalid owner address")?)
            }
            _ if !wormhole.enabled => {
                return Err(eyre::eyre!("Owner address must be set if Wormhole is disabled"))
            }
            _ => None,
        };
        Ok(Self {
            private_key,
            json_rpc,
            gas_price: cli.gas_price.map(gwei_to_wei),
            confirmations: cli.confirmations,
            state_path: cli.state,
            config: MigrationConfig {
                weth9_address,
                native_currency_label_bytes,
                v2_core_factory_address,
                owner_address,
                artifacts_dir: cli.artifacts,
                wormhole,
            },
        })
    }
}

impl TryFrom<WormholeArgs> for WormholeSettings {
    type Error = eyre::Error;

    fn try_from(args: WormholeArgs) -> Result<Self, Self::Error> {
        if !args.enable {
            return Ok(WormholeSettings::default());
        }
        let bridge = artifact_source(args.bridge_address.as_deref(), args.bridge_deploy)
            .wrap_err("Failed to parse Wormhole Bridge configuration")?;
        let receiver = artifact_source(args.receiver_address.as_deref(), args.receiver_deploy)
            .wrap_err("Failed to parse Wormhole Receiver configuration")?;
        let message_sender = match args.message_sender_address.as_deref() {
            Some(sender) if !sender.is_empty() => Some(
                parse_address(sender).wrap_err("Failed to parse Wormhole Message Sender Address")?,
            ),
            _ if receiver == ArtifactSource::Deploy => {
                return Err(eyre::eyre!(
                    "Wormhole Message Sender Address is required to deploy a Wormhole Receiver"
                ))
            }
            _ => None,
        };
        Ok(WormholeSettings {
            enabled: true,
            chain_id: args.chain_id,
            bridge,
            receiver,
            message_sender,
        })
    }
}

/// Exactly one of an existing address or the deploy flag must be given
pub fn artifact_source(address: Option<&str>, deploy: bool) -> eyre::Result<ArtifactSource> {
    match (address.filter(|address| !address.is_empty()), deploy) {
        (Some(_), true) => Err(eyre::eyre!("an address and the deploy flag are mutually exclusive")),
        (Some(address), false) => Ok(ArtifactSource::Existing(parse_address(address)?)),
        (None, true) => Ok(ArtifactSource::Deploy),
        (None, false) => Err(eyre::eyre!("either an address or the deploy flag is required")),
    }
}

/// Hex address with the 0x prefix, a mixed-case address must carry a valid EIP-55 checksum
pub fn parse_address(value: &str) -> eyre::Result<Address> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| eyre::eyre!("address must start with 0x: {value}"))?;
    let address: Address = value
        .parse()
        .map_err(|e| eyre::eyre!("invalid address {value}: {e}"))?;
    let mixed_case = digits.chars().any(|c| c.is_ascii_uppercase())
        && digits.chars().any(|c| c.is_ascii_lowercase());
    if mixed_case && to_checksum(&address, None) != value {
        return Err(eyre::eyre!("bad address checksum: {value}"));
    }
    Ok(address)
}

pub fn parse_private_key(value: &str) -> eyre::Result<String> {
    let valid = value
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(eyre::eyre!("Invalid private key!"));
    }
    Ok(value.to_string())
}

/// ASCII label right-padded with zeros into a bytes32
pub fn native_currency_label_bytes(label: &str) -> eyre::Result<[u8; 32]> {
    if !label.is_ascii() {
        return Err(eyre::eyre!("label must be ascii: {label}"));
    }
    if label.len() > 32 {
        return Err(eyre::eyre!("label must be at most 32 bytes: {label}"));
    }
    let mut bytes = [0u8; 32];
    bytes[..label.len()].copy_from_slice(label.as_bytes());
    Ok(bytes)
}

pub fn gwei_to_wei(gwei: u64) -> U256 {
    U256::from(gwei) * U256::exp10(9)
}
