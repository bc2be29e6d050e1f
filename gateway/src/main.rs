//! agrotrust-gateway: serves the AgroTrust record store over HTTP, or replays
//! a data-entry manifest against it (`agrotrust-gateway wizard <manifest>`).

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use agrotrust_gateway::config::{Cli, Command, ServerConfig, WizardArgs};
use agrotrust_gateway::deployment::Deployment;
use agrotrust_gateway::wizard::{self, DirectBackend, HttpBackend, Manifest, WizardOutcome};
use agrotrust_gateway::{create_router, AppState, RecordStore, SandboxLedger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("agrotrust_gateway=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Serve) => serve(&cli.server).await,
        Some(Command::Wizard(args)) => run_wizard(&cli.server, args).await,
    }
}

async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let cors_origin = config.cors_origin()?;
    let ledger = SandboxLedger::start(config.sandbox_options()).await?;

    info!(
        contract = %ledger.deployment().address,
        path = %config.deployment_file.display(),
        "Serving recorded deployment"
    );

    let store: Arc<dyn RecordStore> = Arc::new(ledger);
    let app = create_router(AppState::new(store, config.port), cors_origin);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Gateway listening on http://{}", addr);
    info!("Allowing CORS origin {}", config.frontend_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn run_wizard(config: &ServerConfig, args: WizardArgs) -> anyhow::Result<()> {
    let base_dir = args
        .manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let steps = Manifest::load(&args.manifest)?.into_steps(&base_dir)?;
    info!(steps = steps.len(), manifest = %args.manifest.display(), "Loaded wizard manifest");

    let outcome = if args.direct {
        let ledger = SandboxLedger::start(args.direct_options(config)).await?;
        info!(contract = %ledger.deployment().address, "Opened record store directly");
        wizard::run(&DirectBackend::new(Arc::new(ledger)), &steps).await
    } else {
        let deployment = match args.deployment_candidates() {
            Some(candidates) => Some(Deployment::load_first(&candidates)?),
            None => None,
        };
        let backend = HttpBackend::new(&args.api_url);
        let status = backend.connect(deployment.as_ref()).await?;
        info!(api = %args.api_url, contract = %status.contract_address, "Connected to gateway");
        wizard::run(&backend, &steps).await
    };

    print_outcome(&outcome);
    if let Some(failed) = outcome.failed {
        anyhow::bail!("wizard stopped at the {} step: {}", failed.step, failed.error);
    }
    Ok(())
}

fn print_outcome(outcome: &WizardOutcome) {
    for done in &outcome.completed {
        println!("  ok    {:<12} {}", done.step.to_string(), done.detail);
    }
    if let Some(failed) = &outcome.failed {
        println!("  FAIL  {:<12} {}", failed.step.to_string(), failed.error);
    }
    for step in &outcome.remaining {
        println!("  skip  {}", step);
    }
}
