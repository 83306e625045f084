use std::path::PathBuf;

use ethers::types::Address;

/// Validated, read-only settings of one migration run
///
/// Signing identity and fee parameters live in the transaction client, everything a step
/// may read besides the migration state lives here.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    pub weth9_address: Address,
    pub native_currency_label_bytes: [u8; 32],
    pub v2_core_factory_address: Address,
    /// Final owner of the factory and proxy admin, ignored when Wormhole is enabled
    pub owner_address: Option<Address>,
    pub artifacts_dir: PathBuf,
    pub wormhole: WormholeSettings,
}

#[derive(Debug, Clone, Default)]
pub struct WormholeSettings {
    pub enabled: bool,
    pub chain_id: u16,
    pub bridge: ArtifactSource,
    pub receiver: ArtifactSource,
    pub message_sender: Option<Address>,
}

/// Where an optional sub-artifact comes from once its subsystem is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactSource {
    #[default]
    Deploy,
    Existing(Address),
}
