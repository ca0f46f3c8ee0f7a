use library_circulation::{
    adapters::{json_file::JsonFileCatalogStore, system::SystemClock},
    api::{handlers::AppState, router::create_router},
    application::catalog::{CatalogError, CatalogService},
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_circulation=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Data file: {}", config.data_file.display());

    // Restore the catalog from the default data file; a missing file starts empty
    let mut catalog = CatalogService::new();
    let store = JsonFileCatalogStore::new(config.data_file.clone());
    match catalog.load(&store) {
        Ok(_) => {}
        Err(CatalogError::Persistence(e)) if e.is_source_missing() => {
            tracing::info!("No data file yet, starting with an empty catalog");
        }
        Err(e) => tracing::warn!("Could not load catalog, starting with an empty catalog: {}", e),
    }

    if config.seed_sample {
        if let Err(e) = catalog.seed_sample_data() {
            tracing::warn!("Sample data not seeded: {}", e);
        }
    }

    // Create application state
    let app_state = Arc::new(AppState::new(
        catalog,
        Arc::new(SystemClock::new()),
        config.clone(),
    ));

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
