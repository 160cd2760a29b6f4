//! # aurathent
//!
//! The HTTP server and CLI around `aurathent-core`.
//!
//! - `api`: axum router, handlers and middleware
//! - `cli`: clap commands
//! - `config`: layered settings (defaults, TOML, environment, flags)
//! - `scroll`: virtue evolution paths loaded from JSON

pub mod api;
pub mod cli;
pub mod config;
pub mod scroll;
