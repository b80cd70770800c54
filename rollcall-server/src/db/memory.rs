//! In-memory person store
//!
//! Same contract as `PgPersonStore`, held in a `RwLock<HashMap>`. Nothing
//! survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::store::{DbError, PersonStore};
use crate::models::{Person, PersonFields};

#[derive(Debug, Default)]
pub struct MemoryPersonStore {
    people: RwLock<HashMap<String, Person>>,
}

impl MemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored people.
    pub async fn len(&self) -> usize {
        self.people.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.people.read().await.is_empty()
    }
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn list(&self) -> Result<Vec<Person>, DbError> {
        let mut people: Vec<Person> = self.people.read().await.values().cloned().collect();
        people.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(people)
    }

    async fn get(&self, id: &str) -> Result<Option<Person>, DbError> {
        Ok(self.people.read().await.get(id).cloned())
    }

    async fn create(&self, fields: PersonFields) -> Result<Person, DbError> {
        let person = Person::new(fields);
        self.people
            .write()
            .await
            .insert(person.id.clone(), person.clone());
        Ok(person)
    }

    async fn update(&self, id: &str, fields: PersonFields) -> Result<Option<Person>, DbError> {
        let mut people = self.people.write().await;
        Ok(people.get_mut(id).map(|person| {
            person.apply(&fields);
            person.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<Option<Person>, DbError> {
        Ok(self.people.write().await.remove(id))
    }

    async fn seed_if_empty(&self, seed: &[PersonFields]) -> Result<usize, DbError> {
        // Single write guard: check and insert are atomic
        let mut people = self.people.write().await;
        if !people.is_empty() {
            return Ok(0);
        }

        for fields in seed {
            let person = Person::new(fields.clone());
            people.insert(person.id.clone(), person);
        }
        Ok(seed.len())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed_people;

    fn fields(name: &str, age: i32) -> PersonFields {
        PersonFields::new(name, age).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let store = MemoryPersonStore::new();
        let a = store.create(fields("Ann", 30)).await.unwrap();
        let b = store.create(fields("Ann", 30)).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn update_missing_inserts_nothing() {
        let store = MemoryPersonStore::new();
        let result = store.update("nope", fields("Ghost", 1)).await.unwrap();

        assert!(result.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn update_overwrites_name_and_age_only() {
        let store = MemoryPersonStore::new();
        let created = store.create(fields("Ann", 30)).await.unwrap();

        let updated = store
            .update(&created.id, fields("Ann2", 31))
            .await
            .unwrap()
            .expect("person exists");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Ann2");
        assert_eq!(updated.age, 31);
        assert_eq!(store.get(&created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn delete_returns_previous_row() {
        let store = MemoryPersonStore::new();
        let created = store.create(fields("Bea", 52)).await.unwrap();

        assert_eq!(store.delete(&created.id).await.unwrap(), Some(created.clone()));
        assert!(store.get(&created.id).await.unwrap().is_none());
        assert!(store.delete(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryPersonStore::new();

        assert_eq!(store.seed_if_empty(&seed_people().unwrap()).await.unwrap(), 3);
        assert_eq!(store.seed_if_empty(&seed_people().unwrap()).await.unwrap(), 0);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn seeding_skips_non_empty_store() {
        let store = MemoryPersonStore::new();
        store.create(fields("Solo", 9)).await.unwrap();

        assert_eq!(store.seed_if_empty(&seed_people().unwrap()).await.unwrap(), 0);
        assert_eq!(store.len().await, 1);
    }
}
