//! Catalog API - products and categories behind JWT authentication
//!
//! REST service exposing a product catalog with paged listings,
//! name and price filters, and role-based authorization.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: DTOs, users and authorization policies
//! - **services**: Application use cases
//! - **infra**: Database, repositories, unit of work and rate limiting
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, filters, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Grant a role to an existing user
//! cargo run -- roles grant maria admin
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{CategoryDto, Password, Policy, ProductDto, User};
pub use errors::{AppError, AppResult};
