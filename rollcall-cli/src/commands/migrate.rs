//! Apply schema migrations without starting the server

use anyhow::{Context, Result};
use clap::Parser;

use rollcall_server::db::{self, create_pool, PgPersonStore};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Also seed the demo people if the table is empty
    #[arg(long)]
    pub seed: bool,

    /// List applied migrations after running
    #[arg(long)]
    pub status: bool,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let config = super::load_config()?;
    let database_url = super::resolve_database_url(args.database_url, &config)?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    let applied = db::migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    if applied.is_empty() {
        println!("Schema is up to date");
    } else {
        println!("Applied {} migration(s): {:?}", applied.len(), applied);
    }

    if args.seed {
        let store = PgPersonStore::new(pool.clone());
        let inserted = db::seed::run(&store).await.context("Failed to seed people")?;
        println!("Seeded {} people", inserted);
    }

    if args.status {
        for m in db::migrations::applied(&pool).await? {
            println!(
                "{:>4}  {}  {}",
                m.version,
                m.applied_at.format("%Y-%m-%d %H:%M:%S"),
                m.description
            );
        }
    }

    pool.close().await;
    Ok(())
}
