use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use quiz_api_lib::adapters::opentdb::OpenTdbAdapter;
use quiz_core::{
    domain::{DifficultyFilter, QuizConfig, SourceKind},
    local::LocalQuestionSource,
    ports::{PortError, QuestionSource},
    shuffle::SeededShuffler,
    QuestionLoader,
};
use serde_json::{json, Value};
use std::{collections::HashMap, net::SocketAddr, sync::Arc};

/// Serves `router` on an ephemeral port and returns its address.
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server");
    });
    addr
}

fn adapter(addr: SocketAddr) -> OpenTdbAdapter {
    OpenTdbAdapter::new(
        reqwest::Client::new(),
        format!("http://{}/api.php", addr),
        Arc::new(SeededShuffler::new(11)),
    )
}

fn trivia_item(n: usize) -> Value {
    json!({
        "category": "Entertainment: Books",
        "type": "multiple",
        "difficulty": "medium",
        "question": format!("Who wrote &quot;Book {}&quot;?", n),
        "correct_answer": "Fran&ccedil;ois",
        "incorrect_answers": ["Tom &amp; Jerry", "O&#039;Brien", "Nobody"]
    })
}

#[tokio::test]
async fn test_fetch_decodes_entities_and_honours_query() {
    let router = Router::new().route(
        "/api.php",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("type").map(String::as_str), Some("multiple"));
            assert_eq!(params.get("difficulty").map(String::as_str), Some("medium"));
            let amount: usize = params["amount"].parse().expect("amount");
            let results: Vec<Value> = (0..amount + 2).map(trivia_item).collect();
            Json(json!({ "response_code": 0, "results": results }))
        }),
    );
    let addr = serve(router).await;

    let questions = adapter(addr)
        .fetch_questions(5, DifficultyFilter::Medium)
        .await
        .expect("questions");

    assert_eq!(questions.len(), 5);
    assert_eq!(questions[0].text, "Who wrote \"Book 0\"?");
    for question in &questions {
        assert_eq!(question.options.len(), 4);
        assert_eq!(question.correct_answer(), Some("François"));
        assert!(question.options.contains(&"Tom & Jerry".to_string()));
        assert!(question.options.contains(&"O'Brien".to_string()));
    }
}

#[tokio::test]
async fn test_server_error_is_a_network_error() {
    let router = Router::new().route(
        "/api.php",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = serve(router).await;

    let result = adapter(addr).fetch_questions(5, DifficultyFilter::Any).await;

    match result {
        Err(PortError::Network(message)) => assert_eq!(message, "Network error 500"),
        other => panic!("expected a network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_body_without_results_is_a_format_error() {
    let router = Router::new().route(
        "/api.php",
        get(|| async { Json(json!({ "response_code": 1 })) }),
    );
    let addr = serve(router).await;

    let result = adapter(addr).fetch_questions(5, DifficultyFilter::Any).await;

    assert!(matches!(result, Err(PortError::Format(_))));
}

#[tokio::test]
async fn test_loader_falls_back_when_server_fails() {
    let router = Router::new().route(
        "/api.php",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = serve(router).await;
    let loader = QuestionLoader::new(
        Arc::new(adapter(addr)),
        Arc::new(LocalQuestionSource::new(Arc::new(SeededShuffler::new(3)))),
    );

    let loaded = loader
        .load(&QuizConfig {
            source: SourceKind::Remote,
            question_count: 5,
            difficulty: DifficultyFilter::Any,
            timer_secs: 30,
        })
        .await
        .expect("fallback");

    assert_eq!(loaded.served_by, SourceKind::Local);
    assert!(loaded.fell_back);
    assert_eq!(loaded.questions.len(), 5);
}
