use deploy_v3_migration::{
    re_exports::ethers::{abi::Token, types::U256},
    Checkpoint, MigrationConfig, Result,
};

use crate::{
    DESCRIPTOR_PROXY, NFT_POSITION_DESCRIPTOR_V1_3_0, NONFUNGIBLE_POSITION_MANAGER, PROXY_ADMIN,
    V3_CORE_FACTORY,
};

pub const ONE_MINUTE_SECONDS: u64 = 60;
pub const ONE_HOUR_SECONDS: u64 = ONE_MINUTE_SECONDS * 60;
pub const ONE_DAY_SECONDS: u64 = ONE_HOUR_SECONDS * 24;
pub const ONE_MONTH_SECONDS: u64 = ONE_DAY_SECONDS * 30;
pub const ONE_YEAR_SECONDS: u64 = ONE_DAY_SECONDS * 365;

// UniswapV3Staker incentive bounds
pub const MAX_INCENTIVE_START_LEAD_TIME: u64 = ONE_MONTH_SECONDS;
pub const MAX_INCENTIVE_DURATION: u64 = ONE_YEAR_SECONDS * 2;

pub fn position_descriptor_arguments(_: &Checkpoint, config: &MigrationConfig) -> Result<Vec<Token>> {
    Ok(vec![
        Token::Address(config.weth9_address),
        Token::FixedBytes(config.native_currency_label_bytes.to_vec()),
    ])
}

pub fn descriptor_proxy_arguments(state: &Checkpoint, _: &MigrationConfig) -> Result<Vec<Token>> {
    Ok(vec![
        Token::Address(state.require_address(NFT_POSITION_DESCRIPTOR_V1_3_0)?),
        Token::Address(state.require_address(PROXY_ADMIN)?),
        Token::Bytes(Vec::new()),
    ])
}

pub fn position_manager_arguments(state: &Checkpoint, config: &MigrationConfig) -> Result<Vec<Token>> {
    Ok(vec![
        Token::Address(state.require_address(V3_CORE_FACTORY)?),
        Token::Address(config.weth9_address),
        Token::Address(state.require_address(DESCRIPTOR_PROXY)?),
    ])
}

pub fn v3_migrator_arguments(state: &Checkpoint, config: &MigrationConfig) -> Result<Vec<Token>> {
    Ok(vec![
        Token::Address(state.require_address(V3_CORE_FACTORY)?),
        Token::Address(config.weth9_address),
        Token::Address(state.require_address(NONFUNGIBLE_POSITION_MANAGER)?),
    ])
}

pub fn v3_staker_arguments(state: &Checkpoint, _: &MigrationConfig) -> Result<Vec<Token>> {
    Ok(vec![
        Token::Address(state.require_address(V3_CORE_FACTORY)?),
        Token::Address(state.require_address(NONFUNGIBLE_POSITION_MANAGER)?),
        Token::Uint(U256::from(MAX_INCENTIVE_START_LEAD_TIME)),
        Token::Uint(U256::from(MAX_INCENTIVE_DURATION)),
    ])
}

pub fn quoter_v2_arguments(state: &Checkpoint, config: &MigrationConfig) -> Result<Vec<Token>> {
    Ok(vec![
        Token::Address(state.require_address(V3_CORE_FACTORY)?),
        Token::Address(config.weth9_address),
    ])
}

pub fn swap_router_02_arguments(state: &Checkpoint, config: &MigrationConfig) -> Result<Vec<Token>> {
    Ok(vec![
        Token::Address(config.v2_core_factory_address),
        Token::Address(state.require_address(V3_CORE_FACTORY)?),
        Token::Address(state.require_address(NONFUNGIBLE_POSITION_MANAGER)?),
        Token::Address(config.weth9_address),
    ])
}
