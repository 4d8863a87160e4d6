//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

use crate::domain::Role;

/// NorthWind Sales - Customer and product administration backend
#[derive(Parser, Debug)]
#[command(name = "northwind-sales")]
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

    /// Issue a bearer token for a staff principal
    Token(TokenArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,

    /// Serve from a seeded in-memory store instead of PostgreSQL
    #[arg(long)]
    pub in_memory: bool,
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

/// Arguments for the token command
#[derive(Parser, Debug)]
pub struct TokenArgs {
    /// Display name carried in the token
    #[arg(short, long)]
    pub name: String,

    /// SuperUser, Administrator, Employee or Customer
    #[arg(short, long)]
    pub role: Role,

    /// Subject id; defaults to the name
    #[arg(short, long)]
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_in_memory() {
        let cli = Cli::parse_from(["northwind-sales", "serve", "--in-memory", "--port", "8080"]);

        match cli.command {
            Commands::Serve(args) => {
                assert!(args.in_memory);
                assert_eq!(args.port, 8080);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_token_role() {
        let cli = Cli::parse_from([
            "northwind-sales",
            "token",
            "--name",
            "Nancy",
            "--role",
            "Administrator",
        ]);

        match cli.command {
            Commands::Token(args) => {
                assert_eq!(args.role, Role::Administrator);
                assert!(args.subject.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_role() {
        let result = Cli::try_parse_from(["northwind-sales", "token", "--name", "x", "--role", "Boss"]);
        assert!(result.is_err());
    }
}
