//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Catalog API - products, categories and JWT authentication
#[derive(Parser, Debug)]
#[command(name = "catalog-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage roles and memberships
    Roles(RolesArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (defaults to SERVER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the roles command
#[derive(Parser, Debug)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub action: RolesAction,
}

/// Role actions
#[derive(Subcommand, Debug)]
pub enum RolesAction {
    /// Create a role
    Create {
        /// Role name (e.g., "manager")
        name: String,
    },
    /// Grant a role to a user
    Grant {
        /// Username to grant the role to
        username: String,
        /// Role name (e.g., "admin")
        role: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles_grant() {
        let cli = Cli::parse_from(["catalog-api", "roles", "grant", "maria", "admin"]);
        match cli.command {
            Commands::Roles(RolesArgs {
                action: RolesAction::Grant { username, role },
            }) => {
                assert_eq!(username, "maria");
                assert_eq!(role, "admin");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["catalog-api", "-v", "serve", "--port", "8080"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
