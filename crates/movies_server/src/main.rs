//! Movie catalog HTTP server entry point.

use anyhow::{anyhow, Context};
use log::{error, info};
use movies_core::{
    init_logging, init_stderr_logging, CatalogService, ConnectionPool, SqliteMovieRepository,
};
use movies_server::{router, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    match &config.log_dir {
        Some(dir) => init_logging(&config.log_level, &dir.to_string_lossy()),
        None => init_stderr_logging(&config.log_level),
    }
    .map_err(|err| anyhow!(err))
    .context("failed to initialize logging")?;

    let database = config.database_file();
    let pool = Arc::new(
        ConnectionPool::open(&database, &config.pool_config())
            .with_context(|| format!("failed to open catalog `{}`", database.display()))?,
    );
    let repo = SqliteMovieRepository::new(Arc::clone(&pool), config.catalog_limits());
    let app = router(Arc::new(CatalogService::new(repo)));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        "event=server_start module=server status=ok addr={} db={} pool_size={}",
        addr,
        pool.path().display(),
        pool.size()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // The router and its service clones are dropped once serve returns.
    match Arc::try_unwrap(pool) {
        Ok(pool) => pool.close()?,
        Err(_) => error!("event=server_stop module=server status=error reason=pool_still_shared"),
    }
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=server_signal module=server status=error error={}", err);
        std::future::pending::<()>().await;
    }
    info!("event=server_signal module=server status=ok signal=ctrl_c");
}
