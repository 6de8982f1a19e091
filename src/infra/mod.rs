//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Unit of Work for transaction management
//! - Rate-limit counters (Redis or in-process)

pub mod db;
pub mod rate_limit;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use rate_limit::{InMemoryRateLimiter, RateLimitDecision, RateLimiter, RedisRateLimiter};
pub use repositories::{CategoryRepository, ProductRepository, Repository, UserRepository};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use rate_limit::MockRateLimiter;
