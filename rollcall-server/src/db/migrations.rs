//! Schema migrations
//!
//! Versioned, forward-only, applied in order at startup. A run holds a
//! transaction-scoped advisory lock, so processes starting together apply
//! each migration once; the others wait and then find nothing pending.
//! Pending migrations and their bookkeeping rows commit together. Running
//! again is a no-op.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use super::DbError;

/// A forward-only schema change
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, ordered by version.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "create persons table",
    sql: r#"
        CREATE TABLE IF NOT EXISTS persons (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER NOT NULL
        )
    "#,
}];

/// Advisory lock key serializing concurrent runs ("rollcall" in ASCII)
const MIGRATION_LOCK_KEY: i64 = 0x726f_6c6c_6361_6c6c;

/// Bookkeeping row for an applied migration
#[derive(Debug, Clone, FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub description: String,
    pub applied_at: DateTime<Utc>,
}

/// Apply all pending migrations. Returns the versions applied by this call.
pub async fn run(pool: &PgPool) -> Result<Vec<i64>, DbError> {
    tracing::info!("Running migrations...");

    let mut tx = pool.begin().await?;

    // Released on commit or rollback
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rollcall_migrations (
            version BIGINT PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    let mut applied_now = Vec::new();
    for migration in pending(&applied_versions(&mut *tx).await?) {
        apply(&mut *tx, migration).await?;
        tracing::info!(
            version = migration.version,
            description = migration.description,
            "migration applied"
        );
        applied_now.push(migration.version);
    }

    tx.commit().await?;

    tracing::info!(applied = applied_now.len(), "migrations complete");
    Ok(applied_now)
}

/// List migrations recorded in the database, oldest first.
pub async fn applied(pool: &PgPool) -> Result<Vec<AppliedMigration>, DbError> {
    let rows: Vec<AppliedMigration> = sqlx::query_as(
        "SELECT version, description, applied_at FROM rollcall_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn applied_versions(conn: &mut PgConnection) -> Result<Vec<i64>, DbError> {
    let versions: Vec<(i64,)> = sqlx::query_as("SELECT version FROM rollcall_migrations")
        .fetch_all(conn)
        .await?;
    Ok(versions.into_iter().map(|(v,)| v).collect())
}

/// Migrations not yet recorded, in version order.
fn pending(applied: &[i64]) -> impl Iterator<Item = &'static Migration> + '_ {
    MIGRATIONS
        .iter()
        .filter(move |m| !applied.contains(&m.version))
}

async fn apply(conn: &mut PgConnection, migration: &Migration) -> Result<(), DbError> {
    let wrap = |source: sqlx::Error| DbError::Migration {
        version: migration.version,
        description: migration.description,
        source,
    };

    sqlx::query(migration.sql)
        .execute(&mut *conn)
        .await
        .map_err(wrap)?;

    sqlx::query("INSERT INTO rollcall_migrations (version, description) VALUES ($1, $2)")
        .bind(migration.version)
        .bind(migration.description)
        .execute(&mut *conn)
        .await
        .map_err(wrap)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_strictly_increase() {
        let versions: Vec<i64> = MIGRATIONS.iter().map(|m| m.version).collect();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(versions.first(), Some(&1));
    }

    #[test]
    fn pending_skips_applied() {
        assert_eq!(pending(&[]).count(), MIGRATIONS.len());
        let all: Vec<i64> = MIGRATIONS.iter().map(|m| m.version).collect();
        assert_eq!(pending(&all).count(), 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn run_is_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        run(&pool).await.expect("first run failed");
        let second = run(&pool).await.expect("second run failed");
        assert!(second.is_empty());

        let recorded = applied(&pool).await.unwrap();
        assert_eq!(recorded.len(), MIGRATIONS.len());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_runs_all_succeed() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool_with_options(&url, 10)
            .await
            .expect("pool creation failed");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                tokio::spawn(async move { run(&pool).await })
            })
            .collect();

        let mut applied_total = 0;
        for handle in handles {
            let applied_now = handle.await.unwrap().expect("concurrent run failed");
            applied_total += applied_now.len();
        }
        assert!(applied_total <= MIGRATIONS.len());

        let recorded = applied(&pool).await.unwrap();
        assert_eq!(recorded.len(), MIGRATIONS.len());
    }
}
