use deploy_v3_migration::{
    re_exports::ethers::{
        abi::{self, ParamType, Token},
        types::{Address, Bytes, U256},
        utils::{id, to_checksum},
    },
    Checkpoint, MigrationConfig, MigrationError, Result, Step, StepOutcome, TransactionClient,
};
use tracing::debug;

use crate::{V3_CORE_FACTORY, WORMHOLE_RECEIVER};

pub const ONE_BP_FEE: u32 = 100;
pub const ONE_BP_TICK_SPACING: i32 = 1;

/// Calldata for `signature` with the given arguments
pub fn encode_call(signature: &str, arguments: &[Token]) -> Bytes {
    [id(signature).to_vec(), abi::encode(arguments)].concat().into()
}

pub fn decode_return(signature: &str, kind: ParamType, data: &[u8]) -> Result<Token> {
    abi::decode(&[kind], data)
        .map_err(|e| MigrationError::rpc(format!("unexpected return data of {signature}: {e}")))?
        .pop()
        .ok_or_else(|| MigrationError::rpc(format!("empty return data of {signature}")))
}

/// Who should own the factory and proxy admin once the migration is over
///
/// With Wormhole enabled governance goes through the message receiver, otherwise the
/// configured owner is used.
pub fn target_owner(state: &Checkpoint, config: &MigrationConfig) -> Result<Address> {
    if config.wormhole.enabled {
        return state.require_address(WORMHOLE_RECEIVER);
    }
    config.owner_address.ok_or_else(|| {
        MigrationError::InvalidConfig("owner address must be set if Wormhole is disabled".to_string())
    })
}

/// Hands an `Ownable`-style contract recorded under `key` over to the target owner
pub struct TransferOwner {
    pub name: &'static str,
    pub key: &'static str,
    pub contract: &'static str,
    pub set_owner: &'static str,
}

#[async_trait::async_trait]
impl<C: TransactionClient> Step<C> for TransferOwner {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(
        &self,
        client: &C,
        state: &mut Checkpoint,
        config: &MigrationConfig,
    ) -> Result<Vec<StepOutcome>> {
        let contract = state.require_address(self.key)?;
        let target = target_owner(state, config)?;

        let data = client.call(contract, encode_call("owner()", &[])).await?;
        let owner = decode_return("owner()", ParamType::Address, &data)?
            .into_address()
            .ok_or_else(|| MigrationError::rpc("owner() did not return an address"))?;
        debug!(contract = self.contract, ?owner, ?target, "current owner");
        if owner == target {
            return Ok(vec![StepOutcome::message(format!(
                "{} owned by {} already",
                self.contract,
                to_checksum(&target, None)
            ))]);
        }

        let signer = client.signer_address();
        if owner != signer {
            return Err(MigrationError::UnauthorizedOwner {
                contract: self.contract.to_string(),
                owner,
                signer,
            });
        }

        let hash = client
            .send(contract, encode_call(self.set_owner, &[Token::Address(target)]))
            .await?;
        Ok(vec![StepOutcome::message(format!(
            "{} ownership set to {}",
            self.contract,
            to_checksum(&target, None)
        ))
        .with_hash(hash)])
    }
}

/// Enables a fee tier on the core factory unless it already has a tick spacing
pub struct AddFeeTier {
    pub name: &'static str,
    pub fee: u32,
    pub tick_spacing: i32,
}

#[async_trait::async_trait]
impl<C: TransactionClient> Step<C> for AddFeeTier {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(
        &self,
        client: &C,
        state: &mut Checkpoint,
        _: &MigrationConfig,
    ) -> Result<Vec<StepOutcome>> {
        let factory = state.require_address(V3_CORE_FACTORY)?;
        let fee = Token::Uint(U256::from(self.fee));

        let signature = "feeAmountTickSpacing(uint24)";
        let data = client
            .call(factory, encode_call(signature, &[fee.clone()]))
            .await?;
        let current = decode_return(signature, ParamType::Int(24), &data)?
            .into_int()
            .ok_or_else(|| MigrationError::rpc(format!("{signature} did not return an int")))?;
        if !current.is_zero() {
            return Ok(vec![StepOutcome::message(format!(
                "UniswapV3Factory fee tier {} already enabled",
                self.fee
            ))]);
        }

        let hash = client
            .send(
                factory,
                encode_call(
                    "enableFeeAmount(uint24,int24)",
                    &[fee, Token::Int(int256(self.tick_spacing))],
                ),
            )
            .await?;
        Ok(vec![StepOutcome::message(format!(
            "UniswapV3Factory added a new fee tier {} bps with tick spacing {}",
            self.fee / 100,
            self.tick_spacing
        ))
        .with_hash(hash)])
    }
}

// two's complement, as `Token::Int` expects
fn int256(value: i32) -> U256 {
    if value < 0 {
        !U256::from(value.unsigned_abs()) + U256::one()
    } else {
        U256::from(value as u32)
    }
}
