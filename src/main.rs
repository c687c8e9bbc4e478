use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use skysweep::cli::Cli;
use skysweep::configuration::get_config;
use skysweep::domain::select_categories;
use skysweep::store::XrpcRecordStore;
use skysweep::sweep::run_sweep;
use skysweep::telemetry::{get_subscriber, init_subscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let subscriber = get_subscriber("skysweep".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber)?;

    let settings = get_config().context("Failed to load config")?;

    let client = settings
        .client()
        .context("Failed to build the HTTP client")?;
    let session = client
        .create_session(&settings.handle, &settings.password)
        .await
        .context("Failed to login")?;
    let store = XrpcRecordStore::new(client, session);

    let categories = select_categories(cli.category_flags());
    let mut stdout = std::io::stdout().lock();

    let summary = run_sweep(
        &store,
        &categories,
        settings.retention,
        Utc::now(),
        &mut stdout,
    )
    .await?;

    tracing::info!(
        deleted = summary.total_deleted(),
        failed = summary.total_failed(),
        "Sweep finished"
    );
    Ok(())
}
