//! # Aurathent CLI Module
//!
//! This module implements the CLI interface for Aurathent.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (default when no command is given)
//! - `logs` - Show or export a user's event log
//! - `profile` - Show a user's virtue profile
//! - `memories` - Show a user's most recent memories
//! - `history` - Show a user's transmutation history
//! - `init` - Initialize a new redb database

mod commands;

use crate::config::{BackendKind, Config, Overrides};
use aurathent_core::{AurathentError, primitives::DEFAULT_RECENT_LIMIT};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Aurathent - Transmutation Engine
///
/// Turns emotion and virtue inputs into mana, aura tiers and paradox
/// insight, and keeps an append-only symbolic record per user.
#[derive(Parser, Debug)]
#[command(name = "aurathent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the redb database
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show a user's event log
    Logs {
        /// User id
        user: String,

        /// Print human-readable export lines instead of raw entries
        #[arg(short, long)]
        export: bool,
    },

    /// Show a user's virtue profile
    Profile {
        /// User id
        user: String,
    },

    /// Show a user's most recent memories
    Memories {
        /// User id
        user: String,

        /// Maximum number of memories
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },

    /// Show a user's transmutation history
    History {
        /// User id
        user: String,
    },

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve the layered configuration for this invocation.
pub fn resolve_config(cli: &Cli) -> Result<Config, AurathentError> {
    let (host, port) = match &cli.command {
        Some(Commands::Server { host, port }) => (host.clone(), *port),
        _ => (None, None),
    };
    let overrides = Overrides {
        host,
        port,
        backend: cli.backend,
        database: cli.database.clone(),
    };
    Config::load(cli.config.as_deref(), &overrides)
}

/// Execute the CLI with parsed arguments and resolved configuration.
pub async fn execute(cli: Cli, config: Config) -> Result<(), AurathentError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { .. }) | None => cmd_server(&config).await,
        Some(Commands::Logs { user, export }) => cmd_logs(&config, json_mode, &user, export),
        Some(Commands::Profile { user }) => cmd_profile(&config, json_mode, &user),
        Some(Commands::Memories { user, limit }) => {
            cmd_memories(&config, json_mode, &user, limit)
        }
        Some(Commands::History { user }) => cmd_history(&config, json_mode, &user),
        Some(Commands::Init { force }) => cmd_init(&config, force),
    }
}
