//! Storage seam between HTTP handlers and the database
//!
//! Handlers only see `PersonStore`. `PgPersonStore` is the production
//! implementation; `MemoryPersonStore` backs tests and `serve --in-memory`.

use async_trait::async_trait;

use crate::models::{Person, PersonFields, ValidationError};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Connection-level failure: pool exhausted or closed, socket or TLS error
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// Any other failure reported by the driver or the server
    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),

    #[error("migration {version} ({description}) failed: {source}")]
    Migration {
        version: i64,
        description: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid seed row: {0}")]
    InvalidSeed(#[from] ValidationError),
}

impl DbError {
    /// True when the failure is transient and connection-level.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if is_connection_error(&e) {
            Self::Unavailable(e)
        } else {
            Self::Sqlx(e)
        }
    }
}

/// SQLSTATE class 08 is "connection exception"; 57P01..57P03 are server
/// shutdown / cannot-connect-now.
fn is_connection_error(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db
            .code()
            .is_some_and(|code| code.starts_with("08") || code.starts_with("57P")),
        _ => false,
    }
}

/// Person persistence operations.
///
/// Every method is a single independent read or write; there is no
/// cross-call locking, so concurrent updates to one id are last-write-wins.
#[async_trait]
pub trait PersonStore: Send + Sync + 'static {
    /// All people, in no guaranteed order.
    async fn list(&self) -> Result<Vec<Person>, DbError>;

    async fn get(&self, id: &str) -> Result<Option<Person>, DbError>;

    /// Insert a new person under a freshly generated id.
    async fn create(&self, fields: PersonFields) -> Result<Person, DbError>;

    /// Overwrite name and age. Returns `None` (and writes nothing) if absent.
    async fn update(&self, id: &str, fields: PersonFields) -> Result<Option<Person>, DbError>;

    /// Remove a person, returning the row as it was before deletion.
    async fn delete(&self, id: &str) -> Result<Option<Person>, DbError>;

    /// Insert `people` only if the store holds no rows. Returns rows inserted.
    async fn seed_if_empty(&self, people: &[PersonFields]) -> Result<usize, DbError>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<(), DbError>;
}
