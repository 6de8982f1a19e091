//! User domain entity and authorization policies.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_USER};

/// Named authorization policies enforced on protected routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    User,
    Admin,
    SuperAdmin,
}

impl Policy {
    /// Role a caller must hold to satisfy the policy.
    pub fn required_role(self) -> &'static str {
        match self {
            Policy::User => ROLE_USER,
            // SuperAdmin currently has the same requirement as Admin
            Policy::Admin | Policy::SuperAdmin => ROLE_ADMIN,
        }
    }

    pub fn is_satisfied_by<S: AsRef<str>>(self, roles: &[S]) -> bool {
        let required = self.required_role();
        roles.iter().any(|r| r.as_ref() == required)
    }
}

/// User with its role memberships loaded.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub refresh_token_expiry: Option<DateTime<Utc>>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether `candidate` is the stored refresh token and it has not expired at `now`.
    pub fn refresh_token_matches(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        match (&self.refresh_token, self.refresh_token_expiry) {
            (Some(stored), Some(expiry)) => stored == candidate && expiry > now,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_with_token(token: Option<&str>, expiry: Option<DateTime<Utc>>) -> User {
        User {
            id: Uuid::new_v4(),
            username: "maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "hash".to_string(),
            refresh_token: token.map(str::to_string),
            refresh_token_expiry: expiry,
            roles: vec![ROLE_USER.to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_policies_map_to_roles() {
        assert_eq!(Policy::User.required_role(), "user");
        assert_eq!(Policy::Admin.required_role(), "admin");
        assert_eq!(Policy::SuperAdmin.required_role(), Policy::Admin.required_role());
    }

    #[test]
    fn test_policy_satisfaction() {
        let roles = vec!["user".to_string()];
        assert!(Policy::User.is_satisfied_by(&roles));
        assert!(!Policy::Admin.is_satisfied_by(&roles));
        assert!(Policy::SuperAdmin.is_satisfied_by(&["admin"]));
        assert!(!Policy::User.is_satisfied_by::<String>(&[]));
    }

    #[test]
    fn test_refresh_token_match() {
        let now = Utc::now();
        let user = user_with_token(Some("abc"), Some(now + Duration::minutes(5)));
        assert!(user.refresh_token_matches("abc", now));
        assert!(!user.refresh_token_matches("abd", now));
    }

    #[test]
    fn test_expired_or_revoked_refresh_token() {
        let now = Utc::now();
        let expired = user_with_token(Some("abc"), Some(now - Duration::seconds(1)));
        assert!(!expired.refresh_token_matches("abc", now));

        let revoked = user_with_token(None, Some(now + Duration::minutes(5)));
        assert!(!revoked.refresh_token_matches("abc", now));
    }
}
