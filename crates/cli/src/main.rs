use anyhow::Context;
use skusync_infra::{
    JsonFileDatasets, PostgresWriteSink, StatementLogSink, SyncConfig, SyncReport, SyncRunner,
    WriteSink,
};

async fn run_with<K: WriteSink>(datasets: JsonFileDatasets, sink: K) -> anyhow::Result<SyncReport> {
    let runner = SyncRunner::new(datasets.clone(), datasets, sink);
    runner.run().await.context("sku batch sync failed")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    skusync_observability::init();

    let config = SyncConfig::from_env().context("failed to load sync configuration")?;
    let datasets = JsonFileDatasets::from_config(&config);
    tracing::info!(dry_run = config.is_dry_run(), "sync configuration loaded");

    let report = match &config.database {
        Some(database) => {
            let sink = PostgresWriteSink::connect(database)
                .await
                .context("failed to connect to inventory database")?;
            run_with(datasets, sink).await?
        }
        None => run_with(datasets, StatementLogSink::new()).await?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
