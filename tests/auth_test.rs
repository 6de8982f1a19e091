//! Authentication and authorization flows through the HTTP router.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use common::{body_json, spawn_app, PASSWORD};

#[tokio::test]
async fn test_register_then_duplicate_is_conflict() {
    let app = spawn_app().await;
    let body = json!({
        "username": "joana",
        "email": "joana@example.com",
        "password": PASSWORD,
    });

    let first = app
        .request(Method::POST, "/api/v1/auth/register", None, Some(body.clone()))
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let status = body_json(first).await;
    assert_eq!(status["status"], "Success");
    assert_eq!(status["message"], "User created successfully!");

    let second = app
        .request(Method::POST, "/api/v1/auth/register", None, Some(body))
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let error = body_json(second).await;
    assert_eq!(error["error"]["message"], "User already exists!");
}

#[tokio::test]
async fn test_register_validates_payload() {
    let app = spawn_app().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "username": "x", "email": "not-an-email", "password": "short" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    app.register_and_login("carlos").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "carlos", "password": "errada123" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let unknown = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "ninguem", "password": PASSWORD })),
        )
        .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_returns_token_pair() {
    let app = spawn_app().await;
    app.register_and_login("lucia").await;

    let tokens = app.login("lucia").await;
    assert!(tokens["token"].as_str().unwrap().split('.').count() == 3);
    assert!(!tokens["refreshToken"].as_str().unwrap().is_empty());
    assert!(tokens["expiration"].is_string());
}

#[tokio::test]
async fn test_refresh_rotates_refresh_token() {
    let app = spawn_app().await;
    app.register_and_login("pedro").await;
    let tokens = app.login("pedro").await;

    let refreshed = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh-token",
            None,
            Some(json!({
                "accessToken": tokens["token"],
                "refreshToken": tokens["refreshToken"],
            })),
        )
        .await;
    assert_eq!(refreshed.status(), StatusCode::OK);
    let rotated = body_json(refreshed).await;
    assert_ne!(rotated["refreshToken"], tokens["refreshToken"]);

    // The old refresh token no longer matches
    let replay = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh-token",
            None,
            Some(json!({
                "accessToken": rotated["accessToken"],
                "refreshToken": tokens["refreshToken"],
            })),
        )
        .await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
    let error = body_json(replay).await;
    assert_eq!(error["error"]["message"], "Invalid access token/refresh token");
}

#[tokio::test]
async fn test_refresh_after_stored_expiry_is_rejected() {
    let app = spawn_app().await;
    app.register_and_login("helena").await;
    let tokens = app.login("helena").await;
    let refresh_token = tokens["refreshToken"].as_str().unwrap().to_string();

    // Keep the same token but move its expiry into the past
    let uow = app.persistence.begin().await.unwrap();
    let user = uow
        .users()
        .find_by_username("helena")
        .await
        .unwrap()
        .unwrap();
    uow.users()
        .set_refresh_token(
            user.id,
            Some(refresh_token.clone()),
            Some(Utc::now() - Duration::minutes(1)),
        )
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh-token",
            None,
            Some(json!({
                "accessToken": tokens["token"],
                "refreshToken": refresh_token,
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"]["message"],
        "Invalid access token/refresh token"
    );
}

#[tokio::test]
async fn test_refresh_with_garbage_access_token() {
    let app = spawn_app().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh-token",
            None,
            Some(json!({ "accessToken": "not.a.jwt", "refreshToken": "abc" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_revoke_requires_admin_and_invalidates_refresh() {
    let app = spawn_app().await;
    let user_token = app.register_and_login("bruno").await;
    let tokens = app.login("bruno").await;

    let forbidden = app
        .request(Method::POST, "/api/v1/auth/revoke/bruno", Some(&user_token), None)
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let admin = app.admin_token("admin").await;
    let revoked = app
        .request(Method::POST, "/api/v1/auth/revoke/bruno", Some(&admin), None)
        .await;
    assert_eq!(revoked.status(), StatusCode::NO_CONTENT);

    let refresh = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh-token",
            None,
            Some(json!({
                "accessToken": tokens["token"],
                "refreshToken": tokens["refreshToken"],
            })),
        )
        .await;
    assert_eq!(refresh.status(), StatusCode::BAD_REQUEST);

    let unknown = app
        .request(Method::POST, "/api/v1/auth/revoke/ninguem", Some(&admin), None)
        .await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_role_management() {
    let app = spawn_app().await;
    app.register_and_login("rita").await;
    let admin = app.admin_token("root").await;

    let created = app
        .request(
            Method::POST,
            "/api/v1/auth/create-role?roleName=manager",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(created.status(), StatusCode::OK);
    assert_eq!(
        body_json(created).await["message"],
        "Role manager added successfully"
    );

    let duplicate = app
        .request(
            Method::POST,
            "/api/v1/auth/create-role?roleName=manager",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let granted = app
        .request(
            Method::POST,
            "/api/v1/auth/add-user-to-role?email=rita@example.com&roleName=manager",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(granted.status(), StatusCode::OK);

    let missing_user = app
        .request(
            Method::POST,
            "/api/v1/auth/add-user-to-role?email=nobody@example.com&roleName=manager",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(missing_user.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(missing_user).await["error"]["message"],
        "Unable to find user"
    );
}

#[tokio::test]
async fn test_protected_routes_need_a_valid_token() {
    let app = spawn_app().await;

    let anonymous = app.get("/api/v1/products", None).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forged = app.get("/api/v1/products", Some("forged.token.value")).await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let create_role = app
        .request(Method::POST, "/api/v1/auth/create-role?roleName=x", None, None)
        .await;
    assert_eq!(create_role.status(), StatusCode::UNAUTHORIZED);
}
