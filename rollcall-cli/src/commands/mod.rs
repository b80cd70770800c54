//! Command implementations for the rollcall CLI

pub mod config;
pub mod migrate;
pub mod serve;

pub use config::run_config;
pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};
use rollcall_server::RollcallConfig;

/// Pick the database URL: flag or `DATABASE_URL` first, then the config file.
pub(crate) fn resolve_database_url(
    flag: Option<String>,
    config: &RollcallConfig,
) -> Result<String> {
    flag.or_else(|| config.database_url.clone()).context(
        "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, \
         or database_url in ~/.rollcall/config.toml",
    )
}

/// Load the config file, attaching the path on failure.
pub(crate) fn load_config() -> Result<RollcallConfig> {
    RollcallConfig::load().with_context(|| {
        format!(
            "Failed to load config from {}",
            RollcallConfig::config_path().display()
        )
    })
}
