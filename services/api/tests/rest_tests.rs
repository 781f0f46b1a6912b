mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use quiz_api_lib::web;
use quiz_core::domain::{
    DifficultyFilter, HighScoreEntry, QuizConfig, QuizSummary, SourceKind,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn test_get_settings_returns_defaults_when_nothing_saved() {
    let app = web::router(common::app_state());

    let (status, body) = call(app, Method::GET, "/settings", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "source": "remote", "question_count": 10, "difficulty": "any", "timer_secs": 30 })
    );
}

#[tokio::test]
async fn test_put_settings_clamps_and_persists() {
    let state = common::app_state();

    let (status, body) = call(
        web::router(state.clone()),
        Method::PUT,
        "/settings",
        Some(json!({ "source": "local", "question_count": 50, "difficulty": "hard", "timer_secs": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question_count"], 10);
    assert_eq!(body["timer_secs"], 10);

    let stored = state.settings.load().await;
    assert_eq!(
        stored,
        QuizConfig {
            source: SourceKind::Local,
            question_count: 10,
            difficulty: DifficultyFilter::Hard,
            timer_secs: 10,
        }
    );

    let (_, body) = call(web::router(state), Method::GET, "/settings", None).await;
    assert_eq!(body["source"], "local");
    assert_eq!(body["difficulty"], "hard");
}

#[tokio::test]
async fn test_put_settings_rejects_malformed_body() {
    let app = web::router(common::app_state());

    let (status, _) = call(
        app,
        Method::PUT,
        "/settings",
        Some(json!({ "source": "carrier-pigeon" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_high_scores_list_and_clear() {
    let state = common::app_state();
    let config = QuizConfig::default();
    let summary = QuizSummary {
        answers: Vec::new(),
        correct: 7,
        total: 10,
        percent_correct: 70.0,
    };
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    state
        .high_scores
        .append(HighScoreEntry::from_summary(&summary, &config, now))
        .await
        .expect("append");

    let (status, body) = call(web::router(state.clone()), Method::GET, "/high-scores", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["percent_correct"], 70.0);
    assert_eq!(rows[0]["mode"], "remote");
    assert_eq!(rows[0]["timestamp"], "2024-05-01T12:30:00.000Z");

    let (status, _) = call(web::router(state.clone()), Method::DELETE, "/high-scores", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = call(web::router(state), Method::GET, "/high-scores", None).await;
    assert_eq!(body, json!([]));
}
