//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod person;
pub mod validation;

pub use person::{Age, Person, PersonFields, PersonName, PersonPayload};
pub use validation::ValidationError;
