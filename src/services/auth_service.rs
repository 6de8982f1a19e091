//! Authentication service - registration, login, token rotation and roles.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use utoipa::ToSchema;

use super::token_service::{Claims, TokenService};
use crate::config::{Config, ROLE_USER};
use crate::domain::Password;
use crate::errors::{AppError, AppResult};
use crate::infra::Persistence;
use crate::types::StatusResponse;

/// Well-formed Argon2 hash that no password matches; keeps unknown-user
/// logins as slow as wrong-password logins.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0ZHVtbXlzYWx0$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Returned after a successful login
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Opaque refresh token
    pub refresh_token: String,
    /// Access token expiry
    pub expiration: DateTime<Utc>,
}

/// Returned after a successful refresh
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user holding the `user` role.
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<StatusResponse>;

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Rotate both tokens given an (expired) access token and the stored refresh token.
    async fn refresh_token(
        &self,
        access_token: String,
        refresh_token: String,
    ) -> AppResult<RefreshResponse>;

    /// Clear the user's refresh token.
    async fn revoke(&self, username: String) -> AppResult<()>;

    async fn create_role(&self, role_name: String) -> AppResult<StatusResponse>;

    async fn add_user_to_role(&self, email: String, role_name: String)
        -> AppResult<StatusResponse>;

    /// Verify a bearer token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    persistence: Arc<Persistence>,
    tokens: TokenService,
    refresh_validity: Duration,
}

impl Authenticator {
    pub fn new(persistence: Arc<Persistence>, config: &Config) -> Self {
        Self {
            persistence,
            tokens: TokenService::new(config),
            refresh_validity: Duration::minutes(config.refresh_token_validity_minutes),
        }
    }
}

fn invalid_token_pair() -> AppError {
    AppError::bad_request("Invalid access token/refresh token")
}

fn creation_error(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("User already exists!"),
        _ => AppError::internal(format!(
            "User creation failed! Please check user details and try again. {}",
            e
        )),
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<StatusResponse> {
        let password_hash = Password::new(&password)?.into_string();

        let uow = self.persistence.begin().await?;
        let users = uow.users();

        if users.find_by_username(&username).await?.is_some() {
            tracing::warn!(username = %username, "Registration for existing username");
            return Err(AppError::conflict("User already exists!"));
        }

        let user = match users.create_user(username, email, password_hash).await {
            Ok(user) => user,
            Err(AppError::Database(e)) => return Err(creation_error(e)),
            Err(e) => return Err(e),
        };

        let role = users
            .find_role(ROLE_USER)
            .await?
            .ok_or_else(|| AppError::internal("Default role is missing"))?;
        users.add_to_role(user.id, &role).await?;

        uow.commit().await.map_err(|e| match e {
            AppError::Database(e) => creation_error(e),
            other => other,
        })?;

        tracing::info!(username = %user.username, "User registered");
        Ok(StatusResponse::success("User created successfully!"))
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let uow = self.persistence.begin().await?;
        let user = uow.users().find_by_username(&username).await?;

        // Verify against a dummy hash when the user is unknown so both
        // failure paths cost the same.
        let stored = Password::from_hash(
            user.as_ref()
                .map(|u| u.password_hash.as_str())
                .unwrap_or(DUMMY_HASH),
        );
        let password_valid = stored.verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::warn!(username = %username, "Failed login");
                return Err(AppError::InvalidCredentials);
            }
        };

        let (token, expiration) =
            self.tokens
                .generate_access_token(&user.username, &user.email, &user.roles)?;
        let refresh_token = self.tokens.generate_refresh_token();

        uow.users()
            .set_refresh_token(
                user.id,
                Some(refresh_token.clone()),
                Some(Utc::now() + self.refresh_validity),
            )
            .await?;
        uow.commit().await?;

        tracing::info!(username = %user.username, "User logged in");
        Ok(TokenResponse {
            token,
            refresh_token,
            expiration,
        })
    }

    async fn refresh_token(
        &self,
        access_token: String,
        refresh_token: String,
    ) -> AppResult<RefreshResponse> {
        let claims = self
            .tokens
            .principal_from_expired_token(&access_token)
            .map_err(|_| invalid_token_pair())?;

        let uow = self.persistence.begin().await?;
        let user = match uow.users().find_by_username(&claims.sub).await? {
            Some(user) if user.refresh_token_matches(&refresh_token, Utc::now()) => user,
            _ => {
                tracing::warn!(username = %claims.sub, "Rejected refresh token");
                return Err(invalid_token_pair());
            }
        };

        let (access_token, _) =
            self.tokens
                .generate_access_token(&user.username, &user.email, &user.roles)?;
        let new_refresh_token = self.tokens.generate_refresh_token();

        uow.users()
            .set_refresh_token(user.id, Some(new_refresh_token.clone()), None)
            .await?;
        uow.commit().await?;

        Ok(RefreshResponse {
            access_token,
            refresh_token: new_refresh_token,
        })
    }

    async fn revoke(&self, username: String) -> AppResult<()> {
        let uow = self.persistence.begin().await?;
        let user = uow
            .users()
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid username"))?;

        uow.users().set_refresh_token(user.id, None, None).await?;
        uow.commit().await?;

        tracing::info!(username = %username, "Refresh token revoked");
        Ok(())
    }

    async fn create_role(&self, role_name: String) -> AppResult<StatusResponse> {
        let role_name = role_name.trim().to_string();
        if role_name.is_empty() {
            return Err(AppError::bad_request("Role name is required"));
        }

        let uow = self.persistence.begin().await?;
        if uow.users().find_role(&role_name).await?.is_some() {
            return Err(AppError::bad_request("Role already exist."));
        }

        uow.users().create_role(&role_name).await?;
        uow.commit().await?;

        tracing::info!(role = %role_name, "Role created");
        Ok(StatusResponse::success(format!(
            "Role {} added successfully",
            role_name
        )))
    }

    async fn add_user_to_role(
        &self,
        email: String,
        role_name: String,
    ) -> AppResult<StatusResponse> {
        let uow = self.persistence.begin().await?;
        let users = uow.users();

        let user = users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::bad_request("Unable to find user"))?;

        let unable = || {
            AppError::bad_request(format!(
                "Error: Unable to add user {} to the {} role",
                email, role_name
            ))
        };

        let role = users.find_role(&role_name).await?.ok_or_else(unable)?;
        if !users.add_to_role(user.id, &role).await? {
            return Err(unable());
        }
        uow.commit().await?;

        tracing::info!(email = %email, role = %role_name, "User added to role");
        Ok(StatusResponse::success(format!(
            "User {} added to the {} role",
            email, role_name
        )))
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify_access_token(token)
    }
}
