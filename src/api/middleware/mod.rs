//! API middleware.

mod auth;
mod rate_limit;

pub use auth::{auth_middleware, bearer_token, require_policy, CurrentUser};
pub use rate_limit::rate_limit_middleware;
