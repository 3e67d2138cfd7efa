#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use common::{compare_body, gateway_with, search_body, trending_body, MockBackend};
use trends_explorer::api::Method;
use trends_explorer::domain::Operation;
use trends_explorer::error::ErrorKind;
use trends_explorer::TrendsError;

fn offline(operation: Operation) -> TrendsError {
    TrendsError::Transport {
        operation,
        status: None,
        message: "connection refused".to_string(),
    }
}

#[tokio::test]
async fn repeated_search_is_served_from_cache() {
    let backend = Arc::new(MockBackend::new().respond(Operation::Search, Ok(search_body())));
    let gateway = gateway_with(&backend);

    let first = gateway.search("ai", "us", "").await.unwrap();
    let second = gateway.search(" ai ", "US", "today 12-m").await.unwrap();

    assert_eq!(backend.calls(), 1);
    assert_eq!(first, second);
    assert_eq!(
        gateway.cache_stats().keys,
        vec!["search_ai_US_today 12-m".to_string()]
    );

    let request = &backend.requests()[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.query_value("keyword"), Some("ai"));
    assert_eq!(request.query_value("geo"), Some("US"));
}

#[tokio::test(start_paused = true)]
async fn stale_search_goes_back_to_the_backend() {
    let backend = Arc::new(MockBackend::new().respond(Operation::Search, Ok(search_body())));
    let gateway = gateway_with(&backend);

    gateway.search("ai", "US", "").await.unwrap();
    tokio::time::advance(Duration::from_secs(4 * 60)).await;
    gateway.search("ai", "US", "").await.unwrap();
    assert_eq!(backend.calls(), 1);

    tokio::time::advance(Duration::from_secs(60)).await;
    gateway.search("ai", "US", "").await.unwrap();
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn unknown_country_code_searches_worldwide() {
    let backend = Arc::new(MockBackend::new().respond(Operation::Search, Ok(search_body())));
    let gateway = gateway_with(&backend);

    gateway.search("ai", "ZZ", "").await.unwrap();

    assert_eq!(backend.requests()[0].query_value("geo"), None);
    assert_eq!(
        gateway.cache_stats().keys,
        vec!["search_ai__today 12-m".to_string()]
    );

    gateway.search("ai", "", "").await.unwrap();
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn trending_with_unknown_country_uses_the_default() {
    let backend = Arc::new(
        MockBackend::new().respond(Operation::Trending, Ok(trending_body("US"))),
    );
    let gateway = gateway_with(&backend);

    gateway.trending_searches("ZZ").await.unwrap();
    assert_eq!(backend.requests()[0].query_value("geo"), Some("US"));
}

#[tokio::test]
async fn clearing_the_cache_forces_a_refetch() {
    let backend = Arc::new(MockBackend::new().respond(Operation::Search, Ok(search_body())));
    let gateway = gateway_with(&backend);

    gateway.search("ai", "", "").await.unwrap();
    gateway.clear_cache();
    assert_eq!(gateway.cache_stats().size, 0);

    gateway.search("ai", "", "").await.unwrap();
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn blank_keyword_never_reaches_the_backend() {
    let backend = Arc::new(MockBackend::new());
    let gateway = gateway_with(&backend);

    let err = gateway.search("   ", "US", "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn compare_rejects_too_few_or_too_many_keywords() {
    let backend = Arc::new(MockBackend::new());
    let gateway = gateway_with(&backend);

    let err = gateway.compare(&["rust"], "", "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = gateway
        .compare(&["a", "b", "c", "d", "e", "f"], "", "")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn compare_posts_keywords_and_caches_by_order() {
    let backend = Arc::new(MockBackend::new().respond(Operation::Compare, Ok(compare_body())));
    let gateway = gateway_with(&backend);

    let result = gateway.compare(&["rust", "go"], "", "").await.unwrap();
    assert_eq!(result.comparison_data.len(), 2);
    assert_eq!(result.comparison_data[1].value_for("rust"), 55);

    gateway.compare(&["rust", "go"], "", "").await.unwrap();
    assert_eq!(backend.calls(), 1);

    gateway.compare(&["go", "rust"], "", "").await.unwrap();
    assert_eq!(backend.calls(), 2);

    let request = &backend.requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(
        request.body.as_ref().and_then(|body| body.get("keywords")),
        Some(&json!(["rust", "go"]))
    );
}

#[tokio::test]
async fn trending_defaults_to_the_us() {
    let backend = Arc::new(
        MockBackend::new().respond(Operation::Trending, Ok(trending_body("US"))),
    );
    let gateway = gateway_with(&backend);

    let snapshot = gateway.trending_searches("").await.unwrap();
    assert_eq!(snapshot.trending_searches.len(), 2);
    assert_eq!(backend.requests()[0].query_value("geo"), Some("US"));

    gateway.trending_searches("us").await.unwrap();
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn search_failures_propagate() {
    let backend = Arc::new(
        MockBackend::new().respond(Operation::Search, Err(offline(Operation::Search))),
    );
    let gateway = gateway_with(&backend);

    let err = gateway.search("ai", "", "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_retryable());
    assert_eq!(gateway.cache_stats().size, 0);
}

#[tokio::test]
async fn malformed_search_is_a_data_integrity_error() {
    let backend = Arc::new(
        MockBackend::new().respond(Operation::Search, Ok(json!({"keyword": "ai"}))),
    );
    let gateway = gateway_with(&backend);

    let err = gateway.search("ai", "", "").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    assert_eq!(gateway.cache_stats().size, 0);
}

#[tokio::test]
async fn suggestions_and_countries_degrade_to_empty() {
    let backend = Arc::new(
        MockBackend::new()
            .respond(Operation::Suggestions, Err(offline(Operation::Suggestions)))
            .respond(Operation::Countries, Err(offline(Operation::Countries))),
    );
    let gateway = gateway_with(&backend);

    let suggestions = gateway.suggestions("rust").await;
    assert_eq!(suggestions.keyword, "rust");
    assert!(suggestions.suggestions.is_empty());

    let countries = gateway.countries().await;
    assert!(countries.countries.is_empty());
    assert_eq!(gateway.cache_stats().size, 0);
}

#[tokio::test]
async fn empty_suggestion_keyword_skips_the_backend() {
    let backend = Arc::new(MockBackend::new());
    let gateway = gateway_with(&backend);

    let suggestions = gateway.suggestions("  ").await;
    assert!(suggestions.suggestions.is_empty());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn health_is_none_when_the_backend_is_down() {
    let backend = Arc::new(
        MockBackend::new().respond(Operation::Health, Err(offline(Operation::Health))),
    );
    let gateway = gateway_with(&backend);
    assert!(gateway.health().await.is_none());

    let backend = Arc::new(MockBackend::new().respond(
        Operation::Health,
        Ok(json!({"status": "healthy", "service": "trends"})),
    ));
    let gateway = gateway_with(&backend);
    let health = gateway.health().await.unwrap();
    assert_eq!(health.status, "healthy");
}
