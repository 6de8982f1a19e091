//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Policy;
use crate::errors::AppError;

/// Authenticated caller extracted from the access token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Token from an `Authorization: Bearer` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Validate the bearer token and inject `CurrentUser` into the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.auth_service.verify_token(token)?;

    request.extensions_mut().insert(CurrentUser {
        username: claims.sub,
        email: claims.email,
        roles: claims.roles,
    });

    Ok(next.run(request).await)
}

/// Forbidden unless the caller holds the policy's role.
pub fn require_policy(user: &CurrentUser, policy: Policy) -> Result<(), AppError> {
    if policy.is_satisfied_by(&user.roles) {
        Ok(())
    } else {
        tracing::warn!(username = %user.username, ?policy, "Policy not satisfied");
        Err(AppError::Forbidden)
    }
}
