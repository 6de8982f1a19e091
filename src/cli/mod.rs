//! CLI module - Command-line interface for the application.
//!
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `roles` - Role bootstrap without an admin token

pub mod args;

pub use args::{Cli, Commands};
