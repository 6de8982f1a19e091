//! Access and refresh token issuance.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, REFRESH_TOKEN_BYTES};
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    pub name: String,
    /// Username, kept for clients that read an `id` claim
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 access tokens and mints opaque refresh tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    validity: Duration,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret_bytes()),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            validity: Duration::minutes(config.token_validity_minutes),
        }
    }

    /// Sign an access token for the identity; returns it with its expiry.
    pub fn generate_access_token(
        &self,
        username: &str,
        email: &str,
        roles: &[String],
    ) -> AppResult<(String, DateTime<Utc>)> {
        self.generate_access_token_at(username, email, roles, Utc::now())
    }

    fn generate_access_token_at(
        &self,
        username: &str,
        email: &str,
        roles: &[String],
        now: DateTime<Utc>,
    ) -> AppResult<(String, DateTime<Utc>)> {
        let expires_at = now + self.validity;
        let claims = Claims {
            sub: username.to_string(),
            name: username.to_string(),
            id: username.to_string(),
            email: email.to_string(),
            roles: roles.to_vec(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    /// 64 random bytes, base64 encoded.
    pub fn generate_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        STANDARD.encode(bytes)
    }

    /// Claims of a token whose signature is valid, ignoring expiry,
    /// issuer and audience.
    pub fn principal_from_expired_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Full validation used for bearer authentication.
    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn service() -> TokenService {
        let config = Config::new("sqlite::memory:", "unit-test-secret-key-with-32-chars!").unwrap();
        TokenService::new(&config)
    }

    #[test]
    fn test_access_token_carries_roles() {
        let tokens = service();
        let roles = vec!["admin".to_string(), "user".to_string()];
        let (token, _) = tokens
            .generate_access_token("paulo", "paulo@example.com", &roles)
            .unwrap();

        let claims = tokens.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "paulo");
        assert_eq!(claims.email, "paulo@example.com");
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let tokens = service();
        let (a, _) = tokens.generate_access_token("u", "u@x.com", &[]).unwrap();
        let (b, _) = tokens.generate_access_token("u", "u@x.com", &[]).unwrap();
        let a = tokens.verify_access_token(&a).unwrap();
        let b = tokens.verify_access_token(&b).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_token_rejected_but_principal_recoverable() {
        let tokens = service();
        let issued = Utc::now() - Duration::hours(2);
        let (token, _) = tokens
            .generate_access_token_at("ana", "ana@example.com", &["user".to_string()], issued)
            .unwrap();

        assert!(matches!(tokens.verify_access_token(&token), Err(AppError::Jwt(_))));

        let claims = tokens.principal_from_expired_token(&token).unwrap();
        assert_eq!(claims.sub, "ana");
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let other = TokenService::new(
            &Config::new("sqlite::memory:", "another-secret-key-with-32-chars!!!").unwrap(),
        );
        let (token, _) = other.generate_access_token("eve", "eve@x.com", &[]).unwrap();

        assert!(service().principal_from_expired_token(&token).is_err());
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let tokens = service();
        let (token, _) = tokens.generate_access_token("u", "u@x.com", &[]).unwrap();

        let claims = tokens.principal_from_expired_token(&token).unwrap();
        let hs512 = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret-key-with-32-chars!"),
        )
        .unwrap();

        assert!(tokens.principal_from_expired_token(&hs512).is_err());
    }

    #[test]
    fn test_refresh_tokens_are_random_base64() {
        let tokens = service();
        let a = tokens.generate_refresh_token();
        let b = tokens.generate_refresh_token();

        assert_ne!(a, b);
        assert_eq!(STANDARD.decode(&a).unwrap().len(), REFRESH_TOKEN_BYTES);
    }
}
