use deploy_v3_migration::{
    Checkpoint, CheckpointStore, JsonFileStore, MigrationSummary, Migrator, StepReport,
};
use deploy_v3_steps::migration_steps;
use tracing::info;

use crate::{client::EthersClient, command::Cli, object::RunSettings};

/// Validate the command line, connect and run every migration step
///
/// Both outcomes print the step results and the last saved state, a failure is returned
/// afterwards so the process exits non-zero.
pub async fn deploy(cli: Cli) -> eyre::Result<()> {
    let settings = RunSettings::try_from(cli)?;
    let store = JsonFileStore::new(&settings.state_path);
    let state = store.load()?;
    info!(path = %settings.state_path.display(), keys = state.len(), "loaded migration state");

    let client =
        EthersClient::connect(settings.json_rpc, &settings.private_key, settings.gas_price).await?;
    let steps = migration_steps::<EthersClient>();
    let migrator = Migrator::new(&client, &store).confirmations(settings.confirmations);

    match migrator.run(&steps, &settings.config, state).await {
        Ok(summary) => {
            println!("Deployment succeeded");
            print_summary(&summary)
        }
        Err(failure) => {
            eprintln!("Deployment failed: {failure}");
            print_summary(&failure.summary)?;
            if let Some(state) = &failure.unsaved_state {
                print_state("Unsaved state", state)?;
            }
            Err(failure.into())
        }
    }
}

fn print_summary(summary: &MigrationSummary) -> eyre::Result<()> {
    for (index, StepReport { step, outcomes }) in summary.results.iter().enumerate() {
        println!("Step {} complete ({step}): {}", index + 1, serde_json::to_string(outcomes)?);
    }
    println!("{}", serde_json::to_string(&summary.results)?);
    print_state("Final state", &summary.state)
}

fn print_state(title: &str, state: &Checkpoint) -> eyre::Result<()> {
    println!("{title}");
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}
