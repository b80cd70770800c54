//! rollcall-server: HTTP CRUD API for people
//!
//! Layers:
//! - `models`: request/entity types with validation at construction
//! - `db`: connection pool, migrations, seeding and the `PersonStore` seam
//! - `http`: axum router, handlers and JSON error mapping

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, RollcallConfig};
pub use db::{DbError, MemoryPersonStore, PersonStore, PgPersonStore};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use models::{Person, PersonFields, PersonPayload, ValidationError};
