use std::sync::Arc;

use docrelay::config::Mode;
use docrelay::routes;
use docrelay::state::AppState;
use docrelay::store::memory::MemoryStore;
use docrelay::store::remote::RemoteStore;
use docrelay::store::DocumentStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DOCRELAY_SERVICE_ACCOUNT etc.
    let _ = dotenvy::dotenv();

    let config = docrelay::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!(
        "Starting docrelay in {:?} mode ({:?})",
        config.mode,
        config.environment
    );

    // Construct the store client exactly once; a missing service account in
    // Server mode is fatal and the process never binds a port.
    let store: Arc<dyn DocumentStore> = match config.mode {
        Mode::Local => Arc::new(MemoryStore::new(config.store.storage_bucket.clone())),
        Mode::Server => match RemoteStore::from_config(&config.store) {
            Ok(remote) => Arc::new(remote),
            Err(e) => {
                tracing::error!("Failed to initialize store client: {}", e);
                std::process::exit(1);
            }
        },
    };

    let app = routes::app(AppState::new(store, config.mode));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 docrelay listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
