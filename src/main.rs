use rules_stats::{router, AppState, Config, CounterStore, FileStore, MemoryStore, StoreKind};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let store: Arc<dyn CounterStore> = match config.store {
        StoreKind::Memory => {
            info!("using in-memory stats store");
            Arc::new(MemoryStore::new())
        }
        StoreKind::File => {
            info!("using file stats store at {}", config.data_path.display());
            Arc::new(FileStore::open(&config.data_path).await?)
        }
    };

    let app = router(AppState::new(store));
    let addr = config.addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
