use std::time::Duration;

use ethers::types::TxHash;
use futures::future::try_join_all;
use tracing::{info, warn};

use crate::{
    checkpoint::{Checkpoint, CheckpointStore},
    client::TransactionClient,
    config::MigrationConfig,
    error::MigrationError,
    step::{Step, StepOutcome},
};

pub const DEFAULT_CONFIRMATIONS: u64 = 2;

/// Bound on every confirmation wait, past it the run is aborted
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, serde::Serialize)]
pub struct StepReport {
    pub step: String,
    pub outcomes: Vec<StepOutcome>,
}

#[derive(Debug, Clone, Default)]
pub struct MigrationSummary {
    pub results: Vec<StepReport>,
    /// Last migration state that reached the store
    pub state: Checkpoint,
}

#[derive(Debug, thiserror::Error)]
#[error("step {step} failed: {error}")]
pub struct MigrationFailure {
    pub step: String,
    #[source]
    pub error: MigrationError,
    pub summary: MigrationSummary,
    /// In-memory state of the failed step when it could not be saved
    pub unsaved_state: Option<Checkpoint>,
}

/// Drives a step catalog in order against one client and one state store
pub struct Migrator<'a, C, S> {
    client: &'a C,
    store: &'a S,
    confirmations: u64,
    confirmation_timeout: Duration,
}

impl<'a, C: TransactionClient, S: CheckpointStore> Migrator<'a, C, S> {
    pub fn new(client: &'a C, store: &'a S) -> Self {
        Self {
            client,
            store,
            confirmations: DEFAULT_CONFIRMATIONS,
            confirmation_timeout: CONFIRMATION_TIMEOUT,
        }
    }

    pub fn confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    pub fn confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Run every step in order, starting from `state`
    ///
    /// The state is saved after each step, including the one that failed, and every
    /// transaction a step sent must be confirmed before the next step starts. The first
    /// error stops the run and is returned together with the results so far.
    pub async fn run(
        &self,
        steps: &[Box<dyn Step<C>>],
        config: &MigrationConfig,
        mut state: Checkpoint,
    ) -> Result<MigrationSummary, MigrationFailure> {
        let mut summary = MigrationSummary {
            results: Vec::new(),
            state: state.clone(),
        };
        for (index, step) in steps.iter().enumerate() {
            let name = step.name().to_string();
            info!(step = %name, "running step {}/{}", index + 1, steps.len());
            let result = step.run(self.client, &mut state, config).await;

            let persist_error = match self.store.save(&state) {
                Ok(()) => {
                    summary.state = state.clone();
                    None
                }
                Err(error) => Some(error),
            };
            let outcomes = match result {
                Ok(outcomes) => outcomes,
                Err(error) => {
                    if let Some(persist_error) = &persist_error {
                        warn!(step = %name, "failed to persist migration state: {persist_error}");
                    }
                    let unsaved = persist_error.map(|_| state);
                    return Err(self.fail(name, error, summary, unsaved));
                }
            };

            for outcome in &outcomes {
                info!(step = %name, address = ?outcome.address, hash = ?outcome.hash, "{}", outcome.message);
            }
            let hashes = outcomes
                .iter()
                .filter_map(|outcome| outcome.hash)
                .collect::<Vec<_>>();
            summary.results.push(StepReport {
                step: name.clone(),
                outcomes,
            });
            // outcomes are reported even when the save failed
            if let Some(error) = persist_error {
                return Err(self.fail(name, error, summary, Some(state)));
            }

            // all waits of this step have to finish before the next step may observe the chain
            if let Err(error) = try_join_all(hashes.into_iter().map(|hash| self.confirm(hash))).await {
                return Err(self.fail(name, error, summary, None));
            }
            info!(step = %name, "step {} complete", index + 1);
        }
        Ok(summary)
    }

    async fn confirm(&self, hash: TxHash) -> Result<(), MigrationError> {
        info!(?hash, confirmations = self.confirmations, "waiting for confirmations");
        tokio::time::timeout(
            self.confirmation_timeout,
            self.client.wait_for_confirmations(hash, self.confirmations),
        )
        .await
        .map_err(|_| MigrationError::ConfirmationTimeout {
            hash,
            confirmations: self.confirmations,
            timeout: self.confirmation_timeout,
        })?
    }

    fn fail(
        &self,
        step: String,
        error: MigrationError,
        summary: MigrationSummary,
        unsaved_state: Option<Checkpoint>,
    ) -> MigrationFailure {
        warn!(step = %step, "migration stopped: {error}");
        MigrationFailure {
            step,
            error,
            summary,
            unsaved_state,
        }
    }
}
