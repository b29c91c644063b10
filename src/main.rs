use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use buddy_dispatch::config::Settings;
use buddy_dispatch::services::{ExpoClient, PostgresClient, RequestStore};
use buddy_dispatch::worker::{self, WorkerState};

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Buddy dispatch worker...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the database gateway
    let store = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            panic!("PostgreSQL connection error: {}", e);
        }),
    );

    info!("PostgreSQL gateway initialized");

    // Initialize the push gateway client
    let provider = Arc::new(ExpoClient::new(
        settings.expo.endpoint.clone(),
        settings.expo.access_token.clone(),
    ));

    info!("Expo push client initialized");

    // Fetch the initial snapshots before any loop starts, so the matcher
    // never runs against uninitialized state.
    info!("Getting initial list of buddies");
    let buddies = store.buddies_with_push_tokens().await.unwrap_or_else(|e| {
        error!("Failed to fetch initial buddy list: {}", e);
        panic!("Initial buddy fetch error: {}", e);
    });

    info!("Getting initial list of requests");
    let requests = store.unfulfilled_requests().await.unwrap_or_else(|e| {
        error!("Failed to fetch initial request list: {}", e);
        panic!("Initial request fetch error: {}", e);
    });

    let state = Arc::new(WorkerState::new(buddies, requests));

    // Spawn the two snapshot refreshers
    tokio::spawn(worker::run_buddy_refresh(
        Arc::clone(&store),
        Arc::clone(&state),
        Duration::from_secs(settings.worker.buddy_refresh_secs),
    ));

    tokio::spawn(worker::run_request_refresh(
        Arc::clone(&store),
        Arc::clone(&state),
        Duration::from_secs(settings.worker.request_refresh_secs),
    ));

    info!(
        "Refreshers started (buddies every {}s, requests every {}s)",
        settings.worker.buddy_refresh_secs, settings.worker.request_refresh_secs
    );

    // Run the matcher loop in the foreground; it never returns.
    worker::run_match_loop(
        state,
        provider,
        Duration::from_secs(settings.worker.match_interval_secs),
    )
    .await;
}
