use deploy_v3_migration::{
    re_exports::ethers::{abi::Token, types::U256},
    ArtifactSource, Checkpoint, DeployDecision, MigrationConfig, MigrationError, Result,
    WormholeSettings,
};

use crate::WORMHOLE_BRIDGE;

fn decision(settings: &WormholeSettings, source: ArtifactSource) -> DeployDecision {
    if !settings.enabled {
        return DeployDecision::Disabled;
    }
    match source {
        ArtifactSource::Existing(address) => DeployDecision::Predeployed(address),
        ArtifactSource::Deploy => DeployDecision::Deploy,
    }
}

pub fn wormhole_bridge_decision(_: &Checkpoint, config: &MigrationConfig) -> DeployDecision {
    decision(&config.wormhole, config.wormhole.bridge)
}

pub fn wormhole_receiver_decision(_: &Checkpoint, config: &MigrationConfig) -> DeployDecision {
    decision(&config.wormhole, config.wormhole.receiver)
}

// The bridge is read back from state, so a bridge deployed earlier in this run is used too
pub fn wormhole_receiver_arguments(state: &Checkpoint, config: &MigrationConfig) -> Result<Vec<Token>> {
    let bridge = state.require_address(WORMHOLE_BRIDGE)?;
    let message_sender = config.wormhole.message_sender.ok_or_else(|| {
        MigrationError::InvalidConfig("missing Wormhole message sender".to_string())
    })?;
    Ok(vec![
        Token::Address(bridge),
        Token::Address(message_sender),
        Token::Uint(U256::from(config.wormhole.chain_id)),
    ])
}
