//! # Configuration
//!
//! Layered settings, resolved in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config path`)
//! 3. Environment (`AURATHENT_HOST`, `AURATHENT_PORT`, `AURATHENT_BACKEND`,
//!    `AURATHENT_DB`, `AURATHENT_SCROLL_TREE`, `AURATHENT_LOG_FORMAT`,
//!    `AURATHENT_CORS_ORIGINS`)
//! 4. CLI flags
//!
//! Invalid values are errors. Nothing silently falls back to a default.

use aurathent_core::{AurathentError, Engine};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_DATABASE: &str = "aurathent.db";
pub const DEFAULT_SCROLL_TREE: &str = "scroll_tree.json";

// =============================================================================
// ENUMS
// =============================================================================

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Volatile in-memory store.
    #[default]
    Memory,
    /// Persistent redb database.
    Redb,
}

impl FromStr for BackendKind {
    type Err = AurathentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redb" => Ok(Self::Redb),
            other => Err(AurathentError::InvalidArgument(format!(
                "unknown backend '{}' (expected memory or redb)",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Redb => "redb",
        })
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AurathentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AurathentError::InvalidArgument(format!(
                "unknown log format '{}' (expected text or json)",
                other
            ))),
        }
    }
}

// =============================================================================
// LAYERS
// =============================================================================

/// The TOML file layer. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLayer {
    host: Option<String>,
    port: Option<u16>,
    backend: Option<BackendKind>,
    database: Option<PathBuf>,
    scroll_tree: Option<PathBuf>,
    log_format: Option<LogFormat>,
    cors_origins: Option<Vec<String>>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub backend: Option<BackendKind>,
    pub database: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: BackendKind,
    pub database: PathBuf,
    pub scroll_tree: PathBuf,
    pub log_format: LogFormat,
    /// Browser origins allowed to call the API. Empty means localhost only,
    /// `*` means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            backend: BackendKind::default(),
            database: PathBuf::from(DEFAULT_DATABASE),
            scroll_tree: PathBuf::from(DEFAULT_SCROLL_TREE),
            log_format: LogFormat::default(),
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Resolve against the process environment.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self, AurathentError> {
        Self::resolve(file, |key| std::env::var(key).ok(), overrides)
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve<F>(
        file: Option<&Path>,
        env: F,
        overrides: &Overrides,
    ) -> Result<Self, AurathentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = file {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                AurathentError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
            })?;
            config.apply_file(&contents)?;
        }
        config.apply_env(env)?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    fn apply_file(&mut self, contents: &str) -> Result<(), AurathentError> {
        let layer: FileLayer = toml::from_str(contents)
            .map_err(|e| AurathentError::InvalidArgument(format!("Invalid config file: {}", e)))?;

        if let Some(host) = layer.host {
            self.host = host;
        }
        if let Some(port) = layer.port {
            self.port = port;
        }
        if let Some(backend) = layer.backend {
            self.backend = backend;
        }
        if let Some(database) = layer.database {
            self.database = database;
        }
        if let Some(scroll_tree) = layer.scroll_tree {
            self.scroll_tree = scroll_tree;
        }
        if let Some(log_format) = layer.log_format {
            self.log_format = log_format;
        }
        if let Some(cors_origins) = layer.cors_origins {
            self.cors_origins = cors_origins;
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), AurathentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = env("AURATHENT_HOST") {
            self.host = host;
        }
        if let Some(port) = env("AURATHENT_PORT") {
            self.port = port.parse().map_err(|_| {
                AurathentError::InvalidArgument(format!("AURATHENT_PORT '{}' is not a port", port))
            })?;
        }
        if let Some(backend) = env("AURATHENT_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(database) = env("AURATHENT_DB") {
            self.database = PathBuf::from(database);
        }
        if let Some(scroll_tree) = env("AURATHENT_SCROLL_TREE") {
            self.scroll_tree = PathBuf::from(scroll_tree);
        }
        if let Some(log_format) = env("AURATHENT_LOG_FORMAT") {
            self.log_format = log_format.parse()?;
        }
        if let Some(origins) = env("AURATHENT_CORS_ORIGINS") {
            self.cors_origins = split_origins(&origins);
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(host) = &overrides.host {
            self.host.clone_from(host);
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(database) = &overrides.database {
            self.database.clone_from(database);
        }
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open an engine on the configured backend.
    pub fn open_engine(&self) -> Result<Engine, AurathentError> {
        match self.backend {
            BackendKind::Memory => Ok(Engine::new()),
            BackendKind::Redb => Engine::with_redb(&self.database),
        }
    }
}

/// Comma-separated origin list, blanks dropped.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
