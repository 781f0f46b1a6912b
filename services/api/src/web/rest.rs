//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use quiz_core::domain::QuizConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_settings_handler,
        put_settings_handler,
        list_high_scores_handler,
        clear_high_scores_handler,
    ),
    components(
        schemas(QuizConfigSchema, HighScoreSchema)
    ),
    tags(
        (name = "Quiz API", description = "Settings and leaderboard for the trivia quiz. Play happens over the `/ws` WebSocket.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Schema Structs
//=========================================================================================

/// Quiz settings as stored and exchanged.
#[derive(Serialize, ToSchema)]
pub struct QuizConfigSchema {
    /// `remote` or `local`.
    #[schema(example = "remote")]
    source: String,
    /// Clamped to 5..=10.
    #[schema(example = 10)]
    question_count: u32,
    /// `any`, `easy`, `medium` or `hard`.
    #[schema(example = "any")]
    difficulty: String,
    /// Clamped to 10..=120.
    #[schema(example = 30)]
    timer_secs: u32,
}

/// One leaderboard row.
#[derive(Serialize, ToSchema)]
pub struct HighScoreSchema {
    #[schema(example = 70.0)]
    percent_correct: f64,
    #[schema(example = 10)]
    question_count: u32,
    #[schema(example = "any")]
    difficulty: String,
    #[schema(example = "remote")]
    mode: String,
    #[schema(example = "2024-05-01T12:30:00.000Z")]
    timestamp: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Returns the saved quiz settings, or the defaults.
#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Current settings", body = QuizConfigSchema)
    )
)]
pub async fn get_settings_handler(State(app_state): State<Arc<AppState>>) -> Json<QuizConfig> {
    Json(app_state.settings.load().await)
}

/// Saves quiz settings. Out-of-range values are clamped, not rejected.
#[utoipa::path(
    put,
    path = "/settings",
    request_body = QuizConfigSchema,
    responses(
        (status = 200, description = "Settings saved; the stored (clamped) value is returned", body = QuizConfigSchema),
        (status = 422, description = "Body is not a valid settings object"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn put_settings_handler(
    State(app_state): State<Arc<AppState>>,
    Json(config): Json<QuizConfig>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let config = config.clamped();
    app_state.settings.save(&config).await.map_err(|e| {
        error!("Failed to save settings: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save settings".to_string(),
        )
    })?;
    info!("Settings saved: {:?}", config);
    Ok(Json(config))
}

/// Returns the leaderboard, best first.
#[utoipa::path(
    get,
    path = "/high-scores",
    responses(
        (status = 200, description = "Up to 20 entries, best first", body = [HighScoreSchema])
    )
)]
pub async fn list_high_scores_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(app_state.high_scores.load_all().await)
}

/// Removes every leaderboard entry.
#[utoipa::path(
    delete,
    path = "/high-scores",
    responses(
        (status = 204, description = "Leaderboard cleared"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn clear_high_scores_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<StatusCode, (StatusCode, String)> {
    app_state.high_scores.clear().await.map_err(|e| {
        error!("Failed to clear high scores: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to clear high scores".to_string(),
        )
    })?;
    Ok(StatusCode::NO_CONTENT)
}
