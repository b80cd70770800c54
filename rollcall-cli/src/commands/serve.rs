//! HTTP server command
//!
//! Connects the pool, applies migrations, seeds an empty table and serves the
//! person API until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use rollcall_server::db::{self, create_pool_with_options, pool::DEFAULT_MAX_CONNECTIONS};
use rollcall_server::http::server::DEFAULT_BIND;
use rollcall_server::{
    run_server, MemoryPersonStore, PersonStore, PgPersonStore, RollcallConfig, ServerConfig,
};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to [default: 127.0.0.1:3030]
    #[arg(long, short = 'b', env = "ROLLCALL_BIND")]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections [default: 5]
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Skip seeding the demo people into an empty table
    #[arg(long)]
    pub no_seed: bool,

    /// Keep people in memory instead of PostgreSQL (lost on exit, ignores --database-url)
    #[arg(long)]
    pub in_memory: bool,
}

/// Effective serve settings after layering flags, env and config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeSettings {
    pub bind: SocketAddr,
    pub max_connections: u32,
    pub cors_permissive: bool,
    pub seed: bool,
}

impl ServeSettings {
    pub fn resolve(args: &ServeArgs, config: &RollcallConfig) -> Self {
        Self {
            bind: args.bind.or(config.bind).unwrap_or(DEFAULT_BIND),
            max_connections: args
                .max_connections
                .or(config.max_connections)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            cors_permissive: args.cors_permissive || config.cors_permissive.unwrap_or(false),
            seed: !args.no_seed && config.seed.unwrap_or(true),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = super::load_config()?;
    let settings = ServeSettings::resolve(&args, &config);

    let store: Arc<dyn PersonStore> = if args.in_memory {
        tracing::warn!("Using in-memory store - data is lost on exit");
        Arc::new(MemoryPersonStore::new())
    } else {
        let database_url = super::resolve_database_url(args.database_url, &config)?;

        let pool = create_pool_with_options(&database_url, settings.max_connections)
            .await
            .context("Failed to create database pool")?;

        db::migrations::run(&pool)
            .await
            .context("Failed to apply migrations")?;

        Arc::new(PgPersonStore::new(pool))
    };

    if settings.seed {
        db::seed::run(store.as_ref())
            .await
            .context("Failed to seed people")?;
    }

    tracing::info!("Starting rollcall server on {}", settings.bind);

    let server_config = ServerConfig {
        bind_addr: settings.bind,
        cors_permissive: settings.cors_permissive,
    };

    // Blocks until shutdown
    run_server(store, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
