use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tickerlens::api;
use tickerlens::config::Config;
use tickerlens::services::{
    AnalysisScheduler, AnalysisService, AuthService, RemoteClassifier, SqliteStore,
};
use tickerlens::sources::YahooFinanceClient;
use tickerlens::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tickerlens=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting TickerLens server on {}", config.bind_address());

    // Open the database
    let store = Arc::new(SqliteStore::new(&config.database_path)?);
    info!("Opened database at {}", config.database_path);

    if let Some(ref path) = config.company_csv {
        match store.import_companies_file(path) {
            Ok(count) => info!("Imported {} companies from {}", count, path),
            Err(e) => warn!("Failed to import companies from {}: {}", path, e),
        }
    }

    let auth_service = Arc::new(AuthService::new(store.clone(), config.token_ttl_minutes));

    // Price provider, classifier and history store behind one service
    let mut analysis = AnalysisService::new(
        Arc::new(YahooFinanceClient::new()),
        Duration::from_secs(config.fetch_timeout_secs),
    )
    .with_store(store.clone());

    if let Some(ref url) = config.classifier.url {
        info!("Classifier configured at {}", url);
        analysis = analysis.with_classifier(Arc::new(RemoteClassifier::new(
            url.clone(),
            Duration::from_secs(config.classifier.timeout_secs),
        )));
    }
    let analysis = Arc::new(analysis);

    // Background watchlist analysis
    let scheduler = if config.scheduler.enabled {
        info!(
            "Scheduling {} symbols every {}s",
            config.scheduler.watchlist.len(),
            config.scheduler.interval_secs
        );
        Some(AnalysisScheduler::new(analysis.clone(), &config.scheduler).start())
    } else {
        None
    };

    // Expired session cleanup
    {
        let auth_service = auth_service.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(60)).await;
                let removed = auth_service.cleanup_expired();
                if removed > 0 {
                    debug!("Removed {} expired sessions", removed);
                }
            }
        });
    }

    let state = AppState {
        config: config.clone(),
        store,
        auth_service,
        analysis,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("TickerLens server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = scheduler {
        handle.stop().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
