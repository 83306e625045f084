//! Resumable, ordered deployment of interdependent contracts
//!
//! A migration is a fixed list of [`Step`]s. Each step records what it produced in the
//! [`Checkpoint`], which is persisted after every step so an interrupted run can be started
//! again without repeating transactions that already went out.

mod artifact;
mod checkpoint;
mod client;
mod config;
mod error;
mod migrator;
mod step;

pub use artifact::{ContractArtifact, LinkOffset, LinkReferences};
pub use checkpoint::{Checkpoint, CheckpointStore, JsonFileStore, MemoryStore};
pub use client::{Deployment, TransactionClient};
pub use config::{ArtifactSource, MigrationConfig, WormholeSettings};
pub use error::{MigrationError, Result};
pub use migrator::{
    MigrationFailure, MigrationSummary, Migrator, StepReport, CONFIRMATION_TIMEOUT,
    DEFAULT_CONFIRMATIONS,
};
pub use step::{
    no_arguments, ComputeArguments, ConditionalDeployStep, DeployCondition, DeployContractStep,
    DeployDecision, Step, StepOutcome,
};

pub mod re_exports {
    pub use ethers;
}
