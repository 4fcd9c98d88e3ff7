use anyhow::Context;
use clap::Parser;
use gitship::cli::Cli;
use gitship::{Config, Workflow, WorkflowError};
use gitship_build::DockerEngine;
use gitship_registry::EcrPublicRegistry;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    gitship::logging::init(cli.verbose);

    match run(cli.into_config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match e.downcast_ref::<WorkflowError>() {
                Some(workflow_error) => workflow_error.user_message(),
                None => format!("{:#}", e),
            };
            tracing::error!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let engine = DockerEngine::connect().context("failed to set up the Docker client")?;
    let registry = EcrPublicRegistry::from_env(&config.region).await;

    let record = Workflow::new(&config, &registry, &engine).run().await?;
    tracing::info!("Done: {}", record.image);
    Ok(())
}
