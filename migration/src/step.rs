use ethers::{
    abi::Token,
    types::{Address, TxHash},
    utils::to_checksum,
};
use tracing::debug;

use crate::{
    artifact::ContractArtifact,
    checkpoint::Checkpoint,
    client::TransactionClient,
    config::MigrationConfig,
    error::Result,
};

/// One discrete action a step performed
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StepOutcome {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<TxHash>,
}

impl StepOutcome {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            address: None,
            hash: None,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_hash(mut self, hash: TxHash) -> Self {
        self.hash = Some(hash);
        self
    }
}

/// Atomic unit of a migration
///
/// A step reads the migration state and the run configuration, may broadcast transactions,
/// and writes only the state keys it owns. Everything a later run needs to skip the work
/// again must end up in `state`.
#[async_trait::async_trait]
pub trait Step<C: TransactionClient>: Send + Sync {
    fn name(&self) -> &str;

    async fn run(
        &self,
        client: &C,
        state: &mut Checkpoint,
        config: &MigrationConfig,
    ) -> Result<Vec<StepOutcome>>;
}

pub type ComputeArguments = fn(&Checkpoint, &MigrationConfig) -> Result<Vec<Token>>;

/// Deploys one contract artifact and records its address under `key`
pub struct DeployContractStep {
    name: &'static str,
    key: &'static str,
    contract: &'static str,
    compute_arguments: ComputeArguments,
    // library name -> state key holding its address
    libraries: &'static [(&'static str, &'static str)],
}

impl DeployContractStep {
    pub fn new(
        name: &'static str,
        key: &'static str,
        contract: &'static str,
        compute_arguments: ComputeArguments,
    ) -> Self {
        Self {
            name,
            key,
            contract,
            compute_arguments,
            libraries: &[],
        }
    }

    pub fn with_libraries(mut self, libraries: &'static [(&'static str, &'static str)]) -> Self {
        self.libraries = libraries;
        self
    }
}

/// Constructor without arguments
pub fn no_arguments(_: &Checkpoint, _: &MigrationConfig) -> Result<Vec<Token>> {
    Ok(Vec::new())
}

#[async_trait::async_trait]
impl<C: TransactionClient> Step<C> for DeployContractStep {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(
        &self,
        client: &C,
        state: &mut Checkpoint,
        config: &MigrationConfig,
    ) -> Result<Vec<StepOutcome>> {
        if let Some(address) = state.address(self.key)? {
            return Ok(vec![StepOutcome::message(format!(
                "Contract {} was already deployed",
                self.contract
            ))
            .with_address(address)]);
        }
        let arguments = (self.compute_arguments)(state, config)?;
        let libraries = self
            .libraries
            .iter()
            .map(|(library, key)| -> Result<(&'static str, Address)> {
                Ok((*library, state.require_address(key)?))
            })
            .collect::<Result<Vec<_>>>()?;
        let artifact = ContractArtifact::load(&config.artifacts_dir, self.contract)?;
        let creation_code = artifact.creation_code(&libraries, &arguments)?;
        let deployment = client.deploy(self.contract, creation_code).await?;
        state.record_address(self.key, deployment.address)?;
        Ok(vec![StepOutcome::message(format!("Contract {} deployed", self.contract))
            .with_address(deployment.address)
            .with_hash(deployment.hash)])
    }
}

/// How a conditional deploy resolves for the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployDecision {
    /// The owning subsystem is off, nothing is recorded
    Disabled,
    /// An existing deployment is adopted without a transaction
    Predeployed(Address),
    Deploy,
}

pub type DeployCondition = fn(&Checkpoint, &MigrationConfig) -> DeployDecision;

/// A deploy step that can be skipped or pointed at an existing contract
pub struct ConditionalDeployStep {
    inner: DeployContractStep,
    condition: DeployCondition,
}

impl ConditionalDeployStep {
    pub fn new(inner: DeployContractStep, condition: DeployCondition) -> Self {
        Self { inner, condition }
    }
}

#[async_trait::async_trait]
impl<C: TransactionClient> Step<C> for ConditionalDeployStep {
    fn name(&self) -> &str {
        self.inner.name
    }

    async fn run(
        &self,
        client: &C,
        state: &mut Checkpoint,
        config: &MigrationConfig,
    ) -> Result<Vec<StepOutcome>> {
        let decision = (self.condition)(state, config);
        debug!(step = self.inner.name, ?decision, "conditional deploy");
        match decision {
            DeployDecision::Disabled => Ok(vec![StepOutcome::message(format!(
                "Skipped deploying {}",
                self.inner.contract
            ))]),
            DeployDecision::Predeployed(address) => {
                state.record_address(self.inner.key, address)?;
                Ok(vec![StepOutcome::message(format!(
                    "Contract {} predeployed at {}",
                    self.inner.contract,
                    to_checksum(&address, None)
                ))
                .with_address(address)])
            }
            DeployDecision::Deploy => Step::<C>::run(&self.inner, client, state, config).await,
        }
    }
}
