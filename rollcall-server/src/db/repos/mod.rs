//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - One statement per operation, `RETURNING` instead of re-reading
//! - Transactions for multi-step operations

pub mod persons;

pub use persons::PgPersonStore;
