//! Fixed-window rate limiting keyed by user or host.

use axum::{
    extract::{Request, State},
    http::{header::HOST, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::auth::bearer_token;
use crate::api::AppState;

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from(self.retry_after));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            "Too many requests. Please try again later.",
        )
            .into_response()
    }
}

/// Partition key: the authenticated username, otherwise the Host header.
fn client_key(state: &AppState, request: &Request) -> String {
    if let Some(claims) = bearer_token(request.headers())
        .and_then(|token| state.auth_service.verify_token(token).ok())
    {
        return format!("user:{}", claims.sub);
    }

    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown");
    format!("host:{}", host)
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let key = client_key(&state, &request);
    let limits = state.rate_limit;

    let decision = match state
        .rate_limiter
        .check(&key, limits.permits, limits.window_seconds)
        .await
    {
        Ok(decision) => decision,
        Err(e) => {
            // Fail closed
            tracing::error!(error = %e, "Rate limit check failed - denying request");
            return Err(RateLimitError {
                retry_after: limits.window_seconds,
            });
        }
    };

    if !decision.allowed {
        tracing::warn!(client = %key, count = decision.count, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: decision.retry_after,
        });
    }

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderValue::from(limits.permits),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from(decision.remaining(limits.permits)),
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{body::Body, middleware, routing::get, Router};
    use mockall::predicate::eq;
    use tower::ServiceExt;

    use crate::api::RateLimitSettings;
    use crate::config::Config;
    use crate::infra::{Database, MockRateLimiter, RateLimitDecision};

    async fn app_with(limiter: MockRateLimiter) -> Router {
        let config =
            Config::new("sqlite::memory:", "unit-test-secret-key-with-32-chars!").unwrap();
        let database = Arc::new(Database::connect_without_migrations(&config).await.unwrap());
        let mut state = AppState::from_config(database, Arc::new(limiter), &config);
        state.rate_limit = RateLimitSettings {
            permits: 5,
            window_seconds: 30,
        };

        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn_with_state(state, rate_limit_middleware))
    }

    fn request() -> Request {
        Request::builder()
            .uri("/ping")
            .header(HOST, "catalog.local")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_requests_keyed_by_host() {
        let mut limiter = MockRateLimiter::new();
        limiter
            .expect_check()
            .with(eq("host:catalog.local"), eq(5), eq(30))
            .times(1)
            .returning(|_, _, _| {
                Ok(RateLimitDecision {
                    count: 2,
                    allowed: true,
                    retry_after: 28,
                })
            });

        let response = app_with(limiter).await.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-remaining"], "3");
    }

    #[tokio::test]
    async fn test_denied_request_gets_retry_after() {
        let mut limiter = MockRateLimiter::new();
        limiter.expect_check().returning(|_, _, _| {
            Ok(RateLimitDecision {
                count: 6,
                allowed: false,
                retry_after: 12,
            })
        });

        let response = app_with(limiter).await.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "12");
    }

    #[tokio::test]
    async fn test_store_failure_fails_closed() {
        let mut limiter = MockRateLimiter::new();
        limiter
            .expect_check()
            .returning(|_, _, _| Err(crate::errors::AppError::internal("redis down")));

        let response = app_with(limiter).await.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "30");
    }

    #[test]
    fn test_rate_limit_error_response() {
        let response = RateLimitError { retry_after: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "42");
    }
}
