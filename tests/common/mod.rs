//! Shared fixtures for router-level tests.
//!
//! Each app gets its own in-memory SQLite database with migrations and
//! seed data applied (one category, one product, `user` and `admin` roles).

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use catalog_api::api::create_router;
use catalog_api::config::Config;
use catalog_api::infra::{Database, InMemoryRateLimiter, Persistence, RateLimiter};
use catalog_api::AppState;

pub const SECRET: &str = "integration-test-secret-with-32-chars";
pub const PASSWORD: &str = "Senha@2024";

pub struct TestApp {
    pub router: Router,
    pub persistence: Persistence,
}

pub fn test_config() -> Config {
    Config::new("sqlite::memory:", SECRET).unwrap()
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(), Arc::new(InMemoryRateLimiter::new())).await
}

pub async fn spawn_app_with(config: Config, rate_limiter: Arc<dyn RateLimiter>) -> TestApp {
    let database = Arc::new(Database::connect(&config).await.unwrap());
    let persistence = Persistence::new(database.get_connection());
    let router = create_router(AppState::from_config(database, rate_limiter, &config));

    TestApp {
        router,
        persistence,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.request(Method::GET, uri, token, None).await
    }

    /// Register `username` and return its access token.
    pub async fn register_and_login(&self, username: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": PASSWORD,
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        self.login(username).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn login(&self, username: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    /// Register a user, grant it `admin` directly and log in again.
    pub async fn admin_token(&self, username: &str) -> String {
        self.register_and_login(username).await;
        self.grant(username, "admin").await;
        self.login(username).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn grant(&self, username: &str, role: &str) {
        let uow = self.persistence.begin().await.unwrap();
        let user = uow
            .users()
            .find_by_username(username)
            .await
            .unwrap()
            .unwrap();
        let role = uow.users().find_role(role).await.unwrap().unwrap();
        assert!(uow.users().add_to_role(user.id, &role).await.unwrap());
        uow.commit().await.unwrap();
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn pagination_header(response: &Response<Body>) -> Value {
    let raw = response.headers()["x-pagination"].to_str().unwrap();
    serde_json::from_str(raw).unwrap()
}
