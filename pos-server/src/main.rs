use anyhow::Context;
use pos_server::utils::logger;
use pos_server::{Config, DbService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    // Rolling file logs in production, stdout only during development
    let log_dir = config.is_production().then_some(config.work_dir.as_str());
    logger::init_logger_with_file(Some(&config.log_level), log_dir);

    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "pos-server starting"
    );

    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("creating work dir {}", config.work_dir))?;
    let db = DbService::new(&config.database_path)
        .await
        .context("opening database")?;

    tracing::info!("ready");

    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;
    tracing::info!("shutting down");
    db.pool.close().await;
    Ok(())
}
