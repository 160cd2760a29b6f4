//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Read commands open the configured backend directly. With the memory
//! backend they always see an empty store; use `-B redb` to inspect a database.

use crate::api::{self, AppState, CorsPolicy};
use crate::config::{BackendKind, Config};
use crate::scroll::ScrollTree;
use aurathent_core::{AurathentError, RedbStore};
use serde::Serialize;

/// Print a value as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<(), AurathentError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AurathentError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &Config) -> Result<(), AurathentError> {
    let engine = config.open_engine()?;
    let scrolls = ScrollTree::load(&config.scroll_tree);

    println!("Aurathent Transmutation Engine Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:        {}", config.host);
    println!("  Port:        {}", config.port);
    println!("  Backend:     {}", config.backend);
    if config.backend == BackendKind::Redb {
        println!("  Database:    {}", config.database.display());
    }
    println!("  Scroll tree: {}", config.scroll_tree.display());
    if !config.cors_origins.is_empty() {
        println!("  CORS:        {}", config.cors_origins.join(", "));
    }
    println!();
    println!("Endpoints:");
    println!("  POST /api/breath/log     - Breath-weighted transmutation");
    println!("  POST /api/transmute      - Mana, aura and lapis reading");
    println!("  POST /api/logic/process  - Paradox and hope chain");
    println!("  POST /api/emotion/log    - Emotion pulse");
    println!("  POST /api/memory/log     - Memory anchor");
    println!("  POST /api/humor/analyze  - Humor paradox reading");
    println!("  POST /api/virtue/update  - Virtue vessel update");
    println!("  GET  /health             - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = AppState::with_scrolls(engine, scrolls)
        .with_cors(CorsPolicy::from_origins(&config.cors_origins));
    api::run_server(&config.bind_addr(), state).await
}

// =============================================================================
// READ COMMANDS
// =============================================================================

/// Show or export a user's event log.
pub fn cmd_logs(
    config: &Config,
    json_mode: bool,
    user: &str,
    export: bool,
) -> Result<(), AurathentError> {
    let engine = config.open_engine()?;

    if export {
        let lines = engine.export_logs(user)?;
        if json_mode {
            return print_json(&lines);
        }
        for line in lines {
            println!("{}", line);
        }
        return Ok(());
    }

    let entries = engine.events(user)?;
    if json_mode {
        return print_json(&entries);
    }

    println!("Event log for {}", user);
    println!("==================");
    if entries.is_empty() {
        println!("(no entries)");
    }
    for entry in entries {
        println!(
            "{}  {:<16} {}",
            entry.timestamp.to_rfc3339(),
            entry.event,
            entry.details
        );
    }
    Ok(())
}

/// Show a user's virtue profile.
pub fn cmd_profile(config: &Config, json_mode: bool, user: &str) -> Result<(), AurathentError> {
    let engine = config.open_engine()?;
    let Some(profile) = engine.profile_snapshot(user)? else {
        return Err(AurathentError::InvalidArgument(format!(
            "no virtue profile for '{}'",
            user
        )));
    };

    if json_mode {
        return print_json(&profile);
    }

    println!("Virtue Profile: {}", profile.user_id);
    println!("==================");
    for (virtue, count) in &profile.virtues {
        println!("  {:<16} {}", virtue, count);
    }
    println!();
    println!("Score:        {}", profile.score);
    println!("Last updated: {}", profile.last_updated.to_rfc3339());
    Ok(())
}

/// Show a user's most recent memories.
pub fn cmd_memories(
    config: &Config,
    json_mode: bool,
    user: &str,
    limit: usize,
) -> Result<(), AurathentError> {
    let engine = config.open_engine()?;
    let memories = engine.recent_memories(user, limit)?;

    if json_mode {
        return print_json(&memories);
    }

    println!("Recent memories for {} (limit {})", user, limit);
    println!("==================");
    for memory in memories {
        println!(
            "{}  {}/{}  {}",
            memory.timestamp.to_rfc3339(),
            memory.emotion,
            memory.virtue,
            memory.note
        );
    }
    Ok(())
}

/// Show a user's transmutation history.
pub fn cmd_history(config: &Config, json_mode: bool, user: &str) -> Result<(), AurathentError> {
    let engine = config.open_engine()?;

    if json_mode {
        return print_json(&engine.transmutation_history(user)?);
    }

    println!("Transmutation history for {}", user);
    println!("==================");
    for line in engine.transmutation_summary(user)? {
        println!("{}", line);
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new database.
pub fn cmd_init(config: &Config, force: bool) -> Result<(), AurathentError> {
    if config.backend == BackendKind::Memory {
        println!("The memory backend keeps no files; nothing to initialize.");
        return Ok(());
    }

    let path = &config.database;
    if path.exists() {
        if !force {
            return Err(AurathentError::InvalidArgument(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(path)
            .map_err(|e| AurathentError::IoError(format!("Remove old database: {}", e)))?;
    }

    let mut store = RedbStore::open(path)?;
    store.compact()?;
    println!("Initialized new redb database at {}", path.display());
    Ok(())
}
