//! Person entity and its request payload
//!
//! `Person` is both the row shape and the JSON shape:
//! `{"id": string, "name": string, "age": integer}`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

/// Maximum length for person names (in characters)
pub const MAX_NAME_LEN: usize = 256;

/// Inclusive bounds for ages
pub const MIN_AGE: i32 = 0;
pub const MAX_AGE: i32 = 150;

/// A stored person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub age: i32,
}

impl Person {
    /// Build a new person with a freshly generated id.
    pub fn new(fields: PersonFields) -> Self {
        Self {
            id: new_person_id(),
            name: fields.name.into_string(),
            age: fields.age.get(),
        }
    }

    /// Overwrite the mutable fields, keeping the id.
    pub fn apply(&mut self, fields: &PersonFields) {
        self.name = fields.name.as_str().to_owned();
        self.age = fields.age.get();
    }
}

/// Generate an opaque person id (hyphenated UUID v4).
pub fn new_person_id() -> String {
    Uuid::new_v4().to_string()
}

/// Body of `POST /api/users` and `PUT /api/users/{id}`.
///
/// Unknown fields, including a client-supplied `id`, are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonPayload {
    pub name: String,
    pub age: i32,
}

impl PersonPayload {
    pub fn validate(self) -> Result<PersonFields, ValidationError> {
        Ok(PersonFields {
            name: PersonName::new(&self.name)?,
            age: Age::new(self.age)?,
        })
    }
}

/// Validated mutable fields of a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFields {
    pub name: PersonName,
    pub age: Age,
}

impl PersonFields {
    pub fn new(name: &str, age: i32) -> Result<Self, ValidationError> {
        Ok(Self {
            name: PersonName::new(name)?,
            age: Age::new(age)?,
        })
    }
}

/// Validated person name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonName(String);

impl PersonName {
    /// Create a new name.
    ///
    /// # Rules
    /// - Must contain at least one non-whitespace character
    /// - Max 256 characters
    /// - No NUL characters (PostgreSQL TEXT can't hold them)
    ///
    /// # Example
    /// ```
    /// use rollcall_server::models::PersonName;
    ///
    /// assert!(PersonName::new("Ann").is_ok());
    /// assert!(PersonName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        if s.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LEN,
            });
        }

        if s.contains('\0') {
            return Err(ValidationError::InvalidFormat {
                field: "name",
                reason: "must not contain NUL characters",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated age in years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Age(i32);

impl Age {
    pub fn new(years: i32) -> Result<Self, ValidationError> {
        if !(MIN_AGE..=MAX_AGE).contains(&years) {
            return Err(ValidationError::OutOfRange {
                field: "age",
                min: MIN_AGE.into(),
                max: MAX_AGE.into(),
                value: years.into(),
            });
        }
        Ok(Self(years))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}
