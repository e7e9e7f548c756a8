use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ridewatch_api::{router, AppState, ServerConfig};
use ridewatch_db::{log_pool_metrics, Database, PoolConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let _log_guard = init_logging();

    let config = ServerConfig::from_env()?;
    info!(
        enabled = config.rate_limit.enabled,
        requests = config.rate_limit.requests,
        period_secs = config.rate_limit.period_secs,
        "Rate limiting configured"
    );

    info!("Connecting to database...");
    let pool_config = PoolConfig::new().max_connections(config.db_max_connections);
    let db = Database::connect_with_config(&config.database_url, pool_config).await?;
    info!("Database connected");

    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    tokio::fs::create_dir_all(&config.file_storage_path).await?;
    info!(
        "File storage initialized at {}",
        config.file_storage_path.display()
    );

    // Periodic pool health in the log
    {
        let pool = db.pool().clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(300));
            loop {
                ticker.tick().await;
                log_pool_metrics(&pool);
            }
        });
    }

    let state = AppState::from_config(db, &config)?;
    let app = router(state, &config);

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

const DEFAULT_LOG_FILTER: &str =
    "ridewatch_api=debug,ridewatch_core=info,ridewatch_db=info,tower_http=debug";

/// Install the global subscriber.
///
/// `LOG_FORMAT=json` switches to JSON lines, `LOG_FILE` redirects output to a
/// daily-rotated file, and `LOG_ANSI` forces colors on or off. The returned
/// guard must live until shutdown so buffered file output is flushed.
fn init_logging() -> Option<WorkerGuard> {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| matches!(v.as_str(), "1" | "true"));
    let log_file = std::env::var("LOG_FILE").ok().map(PathBuf::from);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let guard = match &log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("ridewatch-api.log");
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));
            if json {
                registry.with(fmt::layer().json().with_writer(writer)).init();
            } else {
                registry
                    .with(fmt::layer().with_writer(writer).with_ansi(ansi.unwrap_or(false)))
                    .init();
            }
            Some(guard)
        }
        None => {
            if json {
                registry.with(fmt::layer().json()).init();
            } else {
                registry
                    .with(fmt::layer().with_ansi(ansi.unwrap_or(true)))
                    .init();
            }
            None
        }
    };

    info!(
        json,
        log_file = ?log_file,
        "Logging ready"
    );
    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
