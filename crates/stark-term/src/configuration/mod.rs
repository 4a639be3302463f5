//! Configuration management for the terminal client.
//!
//! Settings are resolved from defaults, an optional `config.toml`, and
//! command-line flags or environment variables, in that order.

mod config;

pub use config::*;
