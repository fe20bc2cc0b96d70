use std::net::SocketAddr;

use anyhow::Context;

use modular_auth::{
    auth::bootstrap::init_provider,
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    routes::app,
    services::ServiceContext,
    state::AppState,
    tasks::BackgroundTasks,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        eprintln!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg.logging);

    let db_cfg = cfg
        .database
        .as_ref()
        .context("database config missing (set APP_DATABASE__URL)")?;
    let db = connection::connect(db_cfg).await?;
    let services = ServiceContext::new(&db);

    let (tasks, worker) = BackgroundTasks::spawn();
    let provider = init_provider(&cfg, &services, tasks)?;

    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid host/port")?;
    let state = AppState::new(cfg, db, provider);

    // The router owns the remaining task handles from here on.
    let service = app(state);

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("waiting for background jobs");
    worker.await.context("background worker failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
