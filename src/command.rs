use std::path::PathBuf;

use clap::{Args, Parser};
use deploy_v3_migration::DEFAULT_CONFIRMATIONS;

#[derive(Parser)]
#[command(version, about = "Deploy the Uniswap V3 contracts, resuming from a saved migration state", long_about = None)]
pub struct Cli {
    /// Private key used to deploy all contracts
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
    /// JSON RPC URL where the contracts should be deployed
    #[arg(short, long)]
    pub json_rpc: String,
    /// Address of the WETH9 contract on this chain
    #[arg(long)]
    pub weth9_address: String,
    /// Native currency label, e.g. ETH
    #[arg(long)]
    pub native_currency_label: String,
    /// Address that will own the deployed artifacts after the run, ignored when Wormhole is enabled
    #[arg(short, long)]
    pub owner_address: Option<String>,
    /// Path to the JSON file containing the migration state
    #[arg(short, long, default_value = "./state.json")]
    pub state: PathBuf,
    /// Directory holding the compiled contract artifacts, `<ContractName>.json` each
    #[arg(long, default_value = "./artifacts")]
    pub artifacts: PathBuf,
    /// The V2 core factory address used in the swap router
    #[arg(long)]
    pub v2_core_factory_address: Option<String>,
    /// The gas price to pay in GWEI for each transaction
    #[arg(short, long)]
    pub gas_price: Option<u64>,
    /// How many confirmations to wait for after each transaction
    #[arg(short, long, default_value_t = DEFAULT_CONFIRMATIONS)]
    pub confirmations: u64,

    #[command(flatten)]
    pub wormhole: WormholeArgs,
}

#[derive(Args)]
pub struct WormholeArgs {
    /// Enable Wormhole governance, other Wormhole settings are ignored unless this is set
    #[arg(long = "wormhole-enable", default_value_t = false)]
    pub enable: bool,
    /// Wormhole chain ID of the target chain
    #[arg(long = "wormhole-chain-id", default_value_t = 1)]
    pub chain_id: u16,
    /// Address of an existing Wormhole bridge
    #[arg(long = "wormhole-bridge-address")]
    pub bridge_address: Option<String>,
    /// Deploy a new Wormhole bridge instead of using an existing one
    #[arg(long = "wormhole-bridge-deploy", default_value_t = false)]
    pub bridge_deploy: bool,
    /// Address of an existing Wormhole message receiver
    #[arg(long = "wormhole-receiver-address")]
    pub receiver_address: Option<String>,
    /// Deploy a new Wormhole message receiver instead of using an existing one
    #[arg(long = "wormhole-receiver-deploy", default_value_t = false)]
    pub receiver_deploy: bool,
    /// Address allowed to send governance messages, required with --wormhole-receiver-deploy
    #[arg(long = "wormhole-message-sender-address")]
    pub message_sender_address: Option<String>,
}
