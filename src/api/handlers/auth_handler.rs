//! Authentication handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::post,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::{ApiQuery, ValidatedJson};
use crate::api::middleware::{require_policy, CurrentUser};
use crate::api::AppState;
use crate::domain::Policy;
use crate::errors::AppResult;
use crate::services::{RefreshResponse, TokenResponse};
use crate::types::{NoContent, StatusResponse};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 256, message = "Username is required"))]
    #[schema(example = "paulo")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "paulo@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "paulo")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Token pair presented for rotation
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenModel {
    #[validate(length(min = 1, message = "accessToken is required"))]
    pub access_token: String,
    #[validate(length(min = 1, message = "refreshToken is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RoleQuery {
    pub role_name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserRoleQuery {
    pub email: String,
    pub role_name: String,
}

/// Routes open to anonymous callers
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
}

/// Routes that need a bearer token
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/revoke/:username", post(revoke))
        .route("/create-role", post(create_role))
        .route("/add-user-to-role", post(add_user_to_role))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = StatusResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists"),
        (status = 500, description = "User creation failed")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<StatusResponse>> {
    let status = state
        .auth_service
        .register(payload.username, payload.email, payload.password)
        .await?;

    Ok(Json(status))
}

/// Login and get an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(token))
}

/// Rotate an expired access token and its refresh token
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    tag = "Authentication",
    request_body = TokenModel,
    responses(
        (status = 200, description = "Tokens rotated", body = RefreshResponse),
        (status = 400, description = "Invalid access token/refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TokenModel>,
) -> AppResult<Json<RefreshResponse>> {
    let tokens = state
        .auth_service
        .refresh_token(payload.access_token, payload.refresh_token)
        .await?;

    Ok(Json(tokens))
}

/// Revoke a user's refresh token
#[utoipa::path(
    post,
    path = "/api/v1/auth/revoke/{username}",
    tag = "Authentication",
    params(("username" = String, Path, description = "User to revoke")),
    responses(
        (status = 204, description = "Refresh token revoked"),
        (status = 400, description = "Invalid username"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn revoke(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> AppResult<NoContent> {
    require_policy(&user, Policy::Admin)?;
    state.auth_service.revoke(username).await?;
    Ok(NoContent)
}

/// Create a role
#[utoipa::path(
    post,
    path = "/api/v1/auth/create-role",
    tag = "Authentication",
    params(RoleQuery),
    responses(
        (status = 200, description = "Role created", body = StatusResponse),
        (status = 400, description = "Role already exists"),
        (status = 403, description = "SuperAdmin policy required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<RoleQuery>,
) -> AppResult<Json<StatusResponse>> {
    require_policy(&user, Policy::SuperAdmin)?;
    let status = state.auth_service.create_role(query.role_name).await?;
    Ok(Json(status))
}

/// Grant a role to the user with the given email
#[utoipa::path(
    post,
    path = "/api/v1/auth/add-user-to-role",
    tag = "Authentication",
    params(UserRoleQuery),
    responses(
        (status = 200, description = "Role granted", body = StatusResponse),
        (status = 400, description = "Unknown user or role, or already a member"),
        (status = 403, description = "SuperAdmin policy required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_user_to_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<UserRoleQuery>,
) -> AppResult<Json<StatusResponse>> {
    require_policy(&user, Policy::SuperAdmin)?;
    let status = state
        .auth_service
        .add_user_to_role(query.email, query.role_name)
        .await?;
    Ok(Json(status))
}
