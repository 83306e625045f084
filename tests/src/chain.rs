use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use deploy_v3_migration::{
    re_exports::ethers::{
        abi::{self, ParamType, Token},
        types::{Address, Bytes, TxHash, H160, U256},
        utils::{get_contract_address, id},
    },
    Deployment, MigrationConfig, MigrationError, Result, TransactionClient, WormholeSettings,
};
use deploy_v3_steps::CONTRACTS;

pub const SIGNER: Address = H160([0x5e; 20]);
pub const OWNER: Address = H160([0x0a; 20]);
pub const STRANGER: Address = H160([0xee; 20]);
pub const WETH9: Address = H160([0x99; 20]);

const LIBRARY_PLACEHOLDER: &str = "__$cea9be979eee3d87fb124d6cbb244bb0b5$__";

#[derive(Debug, Clone)]
pub struct DeployedContract {
    pub contract: String,
    pub address: Address,
    pub hash: TxHash,
    pub creation_code: Bytes,
}

#[derive(Debug, Clone)]
pub struct SentTransaction {
    pub to: Address,
    pub data: Bytes,
    pub hash: TxHash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent {
    Note(String),
    WaitStarted(TxHash),
    Confirmed(TxHash),
}

#[derive(Default)]
struct ChainState {
    nonce: u64,
    deployments: Vec<DeployedContract>,
    sent: Vec<SentTransaction>,
    owners: HashMap<Address, Address>,
    tick_spacings: HashMap<(Address, U256), U256>,
    events: Vec<ChainEvent>,
    confirmation_delays: HashMap<TxHash, Duration>,
    never_confirmed: HashSet<TxHash>,
    rejected_contracts: HashSet<String>,
}

impl ChainState {
    fn next_hash(&mut self) -> TxHash {
        self.nonce += 1;
        TxHash::from_low_u64_be(self.nonce)
    }
}

/// In-memory chain that understands the handful of calls the migration makes
///
/// Contracts created by the signer are owned by the signer. Confirmations resolve after a
/// per-transaction delay, immediately by default.
pub struct SimulatedChain {
    signer: Address,
    state: Mutex<ChainState>,
}

impl Default for SimulatedChain {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedChain {
    pub fn new() -> Self {
        Self {
            signer: SIGNER,
            state: Mutex::new(ChainState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap()
    }

    /// Hash the chain will give the `nonce`-th transaction, counting from 1
    pub fn hash_of(nonce: u64) -> TxHash {
        TxHash::from_low_u64_be(nonce)
    }

    pub fn note(&self, message: impl Into<String>) {
        self.lock().events.push(ChainEvent::Note(message.into()));
    }

    pub fn events(&self) -> Vec<ChainEvent> {
        self.lock().events.clone()
    }

    pub fn notes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChainEvent::Note(note) => Some(note),
                _ => None,
            })
            .collect()
    }

    pub fn deployments(&self) -> Vec<DeployedContract> {
        self.lock().deployments.clone()
    }

    pub fn deployment(&self, contract: &str) -> Option<DeployedContract> {
        self.deployments()
            .into_iter()
            .find(|deployment| deployment.contract == contract)
    }

    pub fn sent(&self) -> Vec<SentTransaction> {
        self.lock().sent.clone()
    }

    pub fn transaction_count(&self) -> usize {
        let state = self.lock();
        state.deployments.len() + state.sent.len()
    }

    pub fn owner_of(&self, contract: Address) -> Option<Address> {
        self.lock().owners.get(&contract).copied()
    }

    pub fn set_owner(&self, contract: Address, owner: Address) {
        self.lock().owners.insert(contract, owner);
    }

    pub fn tick_spacing(&self, factory: Address, fee: u32) -> Option<U256> {
        self.lock()
            .tick_spacings
            .get(&(factory, U256::from(fee)))
            .copied()
    }

    pub fn enable_fee_amount(&self, factory: Address, fee: u32, tick_spacing: u32) {
        self.lock()
            .tick_spacings
            .insert((factory, U256::from(fee)), U256::from(tick_spacing));
    }

    pub fn delay_confirmation(&self, hash: TxHash, delay: Duration) {
        self.lock().confirmation_delays.insert(hash, delay);
    }

    pub fn never_confirm(&self, hash: TxHash) {
        self.lock().never_confirmed.insert(hash);
    }

    pub fn reject_deployment(&self, contract: &str) {
        self.lock().rejected_contracts.insert(contract.to_string());
    }
}

fn selector(signature: &str) -> [u8; 4] {
    id(signature)
}

fn decode(kinds: &[ParamType], data: &[u8]) -> Result<Vec<Token>> {
    abi::decode(kinds, data.get(4..).unwrap_or_default()).map_err(MigrationError::rpc)
}

#[async_trait::async_trait]
impl TransactionClient for SimulatedChain {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let state = self.lock();
        let returned = match data.get(..4) {
            Some(s) if s == selector("owner()") => {
                let owner = state.owners.get(&to).copied().unwrap_or_default();
                abi::encode(&[Token::Address(owner)])
            }
            Some(s) if s == selector("feeAmountTickSpacing(uint24)") => {
                let fee = decode(&[ParamType::Uint(24)], &data)?[0].clone();
                let fee = fee.into_uint().unwrap_or_default();
                let spacing = state
                    .tick_spacings
                    .get(&(to, fee))
                    .copied()
                    .unwrap_or_default();
                abi::encode(&[Token::Int(spacing)])
            }
            _ => return Err(MigrationError::rpc(format!("unknown call to {to:?}"))),
        };
        Ok(returned.into())
    }

    async fn send(&self, to: Address, data: Bytes) -> Result<TxHash> {
        let mut state = self.lock();
        match data.get(..4) {
            Some(s)
                if s == selector("setOwner(address)")
                    || s == selector("transferOwnership(address)") =>
            {
                if state.owners.get(&to) != Some(&self.signer) {
                    return Err(MigrationError::TransactionRejected(
                        "caller is not the owner".to_string(),
                    ));
                }
                let owner = decode(&[ParamType::Address], &data)?[0]
                    .clone()
                    .into_address()
                    .unwrap_or_default();
                state.owners.insert(to, owner);
            }
            Some(s) if s == selector("enableFeeAmount(uint24,int24)") => {
                let arguments = decode(&[ParamType::Uint(24), ParamType::Int(24)], &data)?;
                let fee = arguments[0].clone().into_uint().unwrap_or_default();
                let spacing = arguments[1].clone().into_int().unwrap_or_default();
                state.tick_spacings.insert((to, fee), spacing);
            }
            _ => return Err(MigrationError::TransactionRejected(format!("unknown call to {to:?}"))),
        }
        let hash = state.next_hash();
        state.sent.push(SentTransaction { to, data, hash });
        Ok(hash)
    }

    async fn deploy(&self, contract: &str, creation_code: Bytes) -> Result<Deployment> {
        let mut state = self.lock();
        if state.rejected_contracts.contains(contract) {
            return Err(MigrationError::TransactionRejected(format!(
                "{contract} creation reverted"
            )));
        }
        let hash = state.next_hash();
        let address = get_contract_address(self.signer, state.nonce);
        state.owners.insert(address, self.signer);
        state.deployments.push(DeployedContract {
            contract: contract.to_string(),
            address,
            hash,
            creation_code,
        });
        Ok(Deployment { address, hash })
    }

    async fn wait_for_confirmations(&self, hash: TxHash, _confirmations: u64) -> Result<()> {
        let (delay, never) = {
            let mut state = self.lock();
            state.events.push(ChainEvent::WaitStarted(hash));
            (
                state.confirmation_delays.get(&hash).copied(),
                state.never_confirmed.contains(&hash),
            )
        };
        if never {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.lock().events.push(ChainEvent::Confirmed(hash));
        Ok(())
    }
}

/// Write a minimal artifact for every contract of the migration into `dir`
///
/// Plain contracts get two bytes of code. The position descriptor carries a library
/// placeholder for `NFTDescriptor` right after its first byte.
pub fn write_artifacts(dir: &Path) {
    for (index, contract) in CONTRACTS.iter().enumerate() {
        let artifact = if *contract == "NonfungibleTokenPositionDescriptor" {
            serde_json::json!({
                "contractName": contract,
                "abi": [],
                "bytecode": format!("0x60{LIBRARY_PLACEHOLDER}00"),
                "linkReferences": {
                    "contracts/libraries/NFTDescriptor.sol": {
                        "NFTDescriptor": [{ "start": 1, "length": 20 }]
                    }
                }
            })
        } else {
            serde_json::json!({
                "contractName": contract,
                "abi": [],
                "bytecode": format!("0x60{index:02x}"),
                "linkReferences": {}
            })
        };
        fs::write(dir.join(format!("{contract}.json")), artifact.to_string()).unwrap();
    }
}

pub fn config(artifacts_dir: &Path, wormhole: WormholeSettings) -> MigrationConfig {
    let mut native_currency_label_bytes = [0u8; 32];
    native_currency_label_bytes[..3].copy_from_slice(b"ETH");
    MigrationConfig {
        weth9_address: WETH9,
        native_currency_label_bytes,
        v2_core_factory_address: Address::zero(),
        owner_address: Some(OWNER),
        artifacts_dir: artifacts_dir.to_path_buf(),
        wormhole,
    }
}
