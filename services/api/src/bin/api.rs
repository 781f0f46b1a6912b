//! services/api/src/bin/api.rs

use quiz_api_lib::{
    adapters::{kv::SqliteKvAdapter, opentdb::OpenTdbAdapter},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use quiz_core::{
    local::LocalQuestionSource, shuffle::ThreadRngShuffler, HighScoreStore, QuestionLoader,
    SettingsStore,
};
use axum::Router;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open Storage & Run Migrations ---
    info!("Opening key/value store at {}...", config.database_url);
    let kv = Arc::new(SqliteKvAdapter::connect(&config.database_url).await?);
    info!("Running database migrations...");
    kv.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Question Sources ---
    let shuffler = Arc::new(ThreadRngShuffler);
    let http_client = reqwest::Client::builder().build()?;
    let remote = Arc::new(OpenTdbAdapter::new(
        http_client,
        config.trivia_api_url.clone(),
        shuffler.clone(),
    ));
    let local = Arc::new(LocalQuestionSource::new(shuffler));
    let loader = Arc::new(QuestionLoader::new(remote, local));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        loader,
        settings: SettingsStore::new(kv.clone()),
        high_scores: HighScoreStore::new(kv),
    });

    // --- 5. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(web::router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
