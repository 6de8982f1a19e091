//! Rate limiting applied to the versioned API.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;

use catalog_api::errors::{AppError, AppResult};
use catalog_api::infra::{InMemoryRateLimiter, RateLimitDecision, RateLimiter};
use common::{spawn_app, spawn_app_with, test_config};

/// Store that is always unreachable
struct UnavailableLimiter;

#[async_trait]
impl RateLimiter for UnavailableLimiter {
    async fn check(&self, _key: &str, _permits: u64, _window: u64) -> AppResult<RateLimitDecision> {
        Err(AppError::internal("counter store unreachable"))
    }
}

#[tokio::test]
async fn test_requests_over_the_limit_are_rejected() {
    let mut config = test_config();
    config.rate_limit_permits = 2;
    config.rate_limit_window_seconds = 60;
    let app = spawn_app_with(config, Arc::new(InMemoryRateLimiter::new())).await;

    let first = app.get("/api/v1/categories", None).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()["x-ratelimit-limit"], "2");
    assert_eq!(first.headers()["x-ratelimit-remaining"], "1");

    let second = app.get("/api/v1/categories", None).await;
    assert_eq!(second.status(), StatusCode::OK);

    let third = app.get("/api/v1/categories", None).await;
    assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(third.headers().contains_key("retry-after"));
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let mut config = test_config();
    config.rate_limit_permits = 1;
    let app = spawn_app_with(config, Arc::new(InMemoryRateLimiter::new())).await;

    for _ in 0..3 {
        assert_eq!(app.get("/health", None).await.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_users_are_limited_separately() {
    let mut config = test_config();
    config.rate_limit_permits = 3;
    let app = spawn_app_with(config, Arc::new(InMemoryRateLimiter::new())).await;

    // Registration and login consume the anonymous host budget
    let token = app.register_and_login("ana").await;

    let first = app.get("/api/v1/products", Some(&token)).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()["x-ratelimit-remaining"], "2");

    let anonymous = app.get("/api/v1/categories", None).await;
    assert_eq!(anonymous.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_limiter_failure_denies_request() {
    let app = spawn_app_with(test_config(), Arc::new(UnavailableLimiter)).await;

    let response = app.get("/api/v1/categories", None).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_default_limits_allow_normal_use() {
    let app = spawn_app().await;

    for _ in 0..5 {
        assert_eq!(app.get("/api/v1/categories", None).await.status(), StatusCode::OK);
    }
}
