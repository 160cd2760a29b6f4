//! # Aurathent - Transmutation Engine Server
//!
//! The main binary for the Aurathent symbolic engine.
//!
//! This application provides:
//! - HTTP JSON API server (axum-based)
//! - CLI interface for inspecting stored records
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               apps/aurathent (THE BINARY)            │
//! │                                                      │
//! │   ┌─────────────┐   ┌─────────────┐   ┌──────────┐   │
//! │   │    CLI      │   │  HTTP API   │   │  Config  │   │
//! │   │   (clap)    │   │   (axum)    │   │  (toml)  │   │
//! │   └──────┬──────┘   └──────┬──────┘   └────┬─────┘   │
//! │          └─────────────────┼───────────────┘         │
//! │                            ▼                         │
//! │                  ┌──────────────────┐                │
//! │                  │  aurathent-core  │                │
//! │                  │   (THE LOGIC)    │                │
//! │                  └──────────────────┘                │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server (default command)
//! aurathent server --host 0.0.0.0 --port 5001
//!
//! # Inspect a persistent database
//! aurathent -B redb logs alpha01 --export
//! aurathent -B redb profile alpha01
//! ```

use aurathent::cli;
use aurathent::config::LogFormat;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let config = cli::resolve_config(&cli);

    // AURATHENT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = config
        .as_ref()
        .map(|c| c.log_format)
        .unwrap_or_default();
    init_tracing(log_format);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli, config).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "aurathent=info,tower_http=debug".into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

/// Print the Aurathent startup banner.
fn print_banner() {
    println!(
        r#"
   █████╗ ██╗   ██╗██████╗  █████╗ ████████╗██╗  ██╗███████╗███╗   ██╗████████╗
  ██╔══██╗██║   ██║██╔══██╗██╔══██╗╚══██╔══╝██║  ██║██╔════╝████╗  ██║╚══██╔══╝
  ███████║██║   ██║██████╔╝███████║   ██║   ███████║█████╗  ██╔██╗ ██║   ██║
  ██╔══██║██║   ██║██╔══██╗██╔══██║   ██║   ██╔══██║██╔══╝  ██║╚██╗██║   ██║
  ██║  ██║╚██████╔╝██║  ██║██║  ██║   ██║   ██║  ██║███████╗██║ ╚████║   ██║
  ╚═╝  ╚═╝ ╚═════╝ ╚═╝  ╚═╝╚═╝  ╚═╝   ╚═╝   ╚═╝  ╚═╝╚══════╝╚═╝  ╚═══╝   ╚═╝

  Transmutation Engine v{}

  Emotion • Virtue • Aura
"#,
        env!("CARGO_PKG_VERSION")
    );
}
