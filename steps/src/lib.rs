use deploy_v3_migration::{
    no_arguments, ConditionalDeployStep, DeployContractStep, Step, TransactionClient,
};

mod deploy;
mod operation;
mod wormhole;

pub use deploy::*;
pub use operation::*;
pub use wormhole::*;

// Migration state keys, each written by exactly one step below
pub const V3_CORE_FACTORY: &str = "v3CoreFactoryAddress";
pub const MULTICALL2: &str = "multicall2Address";
pub const PROXY_ADMIN: &str = "proxyAdminAddress";
pub const TICK_LENS: &str = "tickLensAddress";
pub const NFT_DESCRIPTOR_LIBRARY_V1_3_0: &str = "nftDescriptorLibraryAddressV1_3_0";
pub const NFT_POSITION_DESCRIPTOR_V1_3_0: &str = "nonfungibleTokenPositionDescriptorAddressV1_3_0";
pub const DESCRIPTOR_PROXY: &str = "descriptorProxyAddress";
pub const NONFUNGIBLE_POSITION_MANAGER: &str = "nonfungibleTokenPositionManagerAddress";
pub const V3_MIGRATOR: &str = "v3MigratorAddress";
pub const WORMHOLE_BRIDGE: &str = "wormholeBridgeAddress";
pub const WORMHOLE_RECEIVER: &str = "wormholeReceiverAddress";
pub const V3_STAKER: &str = "v3StakerAddress";
pub const QUOTER_V2: &str = "quoterV2Address";
pub const SWAP_ROUTER_02: &str = "swapRouter02";

/// Every contract artifact the full migration may load from the artifacts directory
pub const CONTRACTS: &[&str] = &[
    "UniswapV3Factory",
    "UniswapInterfaceMulticall",
    "ProxyAdmin",
    "TickLens",
    "NFTDescriptor",
    "NonfungibleTokenPositionDescriptor",
    "TransparentUpgradeableProxy",
    "NonfungiblePositionManager",
    "V3Migrator",
    "WormholeBridge",
    "UniswapWormholeMessageReceiver",
    "UniswapV3Staker",
    "QuoterV2",
    "SwapRouter02",
];

pub fn deploy_v3_core_factory() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_V3_CORE_FACTORY",
        V3_CORE_FACTORY,
        "UniswapV3Factory",
        no_arguments,
    )
}

pub fn add_1bp_fee_tier() -> AddFeeTier {
    AddFeeTier {
        name: "ADD_1BP_FEE_TIER",
        fee: ONE_BP_FEE,
        tick_spacing: ONE_BP_TICK_SPACING,
    }
}

pub fn deploy_multicall2() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_MULTICALL2",
        MULTICALL2,
        "UniswapInterfaceMulticall",
        no_arguments,
    )
}

pub fn deploy_proxy_admin() -> DeployContractStep {
    DeployContractStep::new("DEPLOY_PROXY_ADMIN", PROXY_ADMIN, "ProxyAdmin", no_arguments)
}

pub fn deploy_tick_lens() -> DeployContractStep {
    DeployContractStep::new("DEPLOY_TICK_LENS", TICK_LENS, "TickLens", no_arguments)
}

pub fn deploy_nft_descriptor_library_v1_3_0() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_NFT_DESCRIPTOR_LIBRARY_V1_3_0",
        NFT_DESCRIPTOR_LIBRARY_V1_3_0,
        "NFTDescriptor",
        no_arguments,
    )
}

pub fn deploy_nft_position_descriptor_v1_3_0() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_NFT_POSITION_DESCRIPTOR_V1_3_0",
        NFT_POSITION_DESCRIPTOR_V1_3_0,
        "NonfungibleTokenPositionDescriptor",
        position_descriptor_arguments,
    )
    .with_libraries(&[("NFTDescriptor", NFT_DESCRIPTOR_LIBRARY_V1_3_0)])
}

pub fn deploy_transparent_proxy_descriptor() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_TRANSPARENT_PROXY_DESCRIPTOR",
        DESCRIPTOR_PROXY,
        "TransparentUpgradeableProxy",
        descriptor_proxy_arguments,
    )
}

pub fn deploy_nonfungible_position_manager() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_NONFUNGIBLE_POSITION_MANAGER",
        NONFUNGIBLE_POSITION_MANAGER,
        "NonfungiblePositionManager",
        position_manager_arguments,
    )
}

pub fn deploy_v3_migrator() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_V3_MIGRATOR",
        V3_MIGRATOR,
        "V3Migrator",
        v3_migrator_arguments,
    )
}

pub fn deploy_wormhole_bridge() -> ConditionalDeployStep {
    ConditionalDeployStep::new(
        DeployContractStep::new(
            "DEPLOY_WORMHOLE_BRIDGE",
            WORMHOLE_BRIDGE,
            "WormholeBridge",
            no_arguments,
        ),
        wormhole_bridge_decision,
    )
}

pub fn deploy_wormhole_receiver() -> ConditionalDeployStep {
    ConditionalDeployStep::new(
        DeployContractStep::new(
            "DEPLOY_WORMHOLE_RECEIVER",
            WORMHOLE_RECEIVER,
            "UniswapWormholeMessageReceiver",
            wormhole_receiver_arguments,
        ),
        wormhole_receiver_decision,
    )
}

pub fn transfer_v3_core_factory_owner() -> TransferOwner {
    TransferOwner {
        name: "TRANSFER_V3_CORE_FACTORY_OWNER",
        key: V3_CORE_FACTORY,
        contract: "UniswapV3Factory",
        set_owner: "setOwner(address)",
    }
}

pub fn deploy_v3_staker() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_V3_STAKER",
        V3_STAKER,
        "UniswapV3Staker",
        v3_staker_arguments,
    )
}

pub fn deploy_quoter_v2() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_QUOTER_V2",
        QUOTER_V2,
        "QuoterV2",
        quoter_v2_arguments,
    )
}

pub fn deploy_v3_swap_router_02() -> DeployContractStep {
    DeployContractStep::new(
        "DEPLOY_V3_SWAP_ROUTER_02",
        SWAP_ROUTER_02,
        "SwapRouter02",
        swap_router_02_arguments,
    )
}

pub fn transfer_proxy_admin_owner() -> TransferOwner {
    TransferOwner {
        name: "TRANSFER_PROXY_ADMIN_OWNER",
        key: PROXY_ADMIN,
        contract: "ProxyAdmin",
        set_owner: "transferOwnership(address)",
    }
}

/// The full migration, every step placed after the steps whose state keys it reads
pub fn migration_steps<C: TransactionClient>() -> Vec<Box<dyn Step<C>>> {
    vec![
        Box::new(deploy_v3_core_factory()),
        Box::new(add_1bp_fee_tier()),
        Box::new(deploy_multicall2()),
        Box::new(deploy_proxy_admin()),
        Box::new(deploy_tick_lens()),
        Box::new(deploy_nft_descriptor_library_v1_3_0()),
        Box::new(deploy_nft_position_descriptor_v1_3_0()),
        Box::new(deploy_transparent_proxy_descriptor()),
        Box::new(deploy_nonfungible_position_manager()),
        Box::new(deploy_v3_migrator()),
        Box::new(deploy_wormhole_bridge()),
        Box::new(deploy_wormhole_receiver()),
        Box::new(transfer_v3_core_factory_owner()),
        Box::new(deploy_v3_staker()),
        Box::new(deploy_quoter_v2()),
        Box::new(deploy_v3_swap_router_02()),
        Box::new(transfer_proxy_admin_owner()),
    ]
}
