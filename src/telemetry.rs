// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tracing subscriber setup

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_level`
///
/// Returns `false` when a global subscriber was already installed, so
/// repeated calls (tests, embedding tools) are harmless.
pub fn init_tracing(default_level: Level) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_line_number(true)
        .try_init()
        .is_ok()
}
