//! Database layer - connection pool, schema and person storage
//!
//! # Design Principles
//!
//! - Process-owned connection pool, one borrowed connection per query
//! - Single-statement writes (`UPDATE ... RETURNING`), no check-then-write
//! - Transactions for multi-step operations (migrations, seeding)

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;
pub mod store;

pub use memory::MemoryPersonStore;
pub use pool::{create_pool, create_pool_with_options};
pub use repos::PgPersonStore;
pub use seed::{seed_people, SEED_PEOPLE};
pub use store::{DbError, PersonStore};
