//! Demo rows inserted on first start

use crate::db::store::{DbError, PersonStore};
use crate::models::{PersonFields, ValidationError};

/// Name and age of every seeded person.
pub const SEED_PEOPLE: [(&str, i32); 3] = [("Tom", 37), ("Bob", 41), ("Sam", 24)];

/// Seed rows as validated fields. Fails if any row is invalid.
pub fn seed_people() -> Result<Vec<PersonFields>, ValidationError> {
    SEED_PEOPLE
        .iter()
        .map(|&(name, age)| PersonFields::new(name, age))
        .collect()
}

/// Populate an empty store with the demo rows. No-op if any row exists.
pub async fn run<S>(store: &S) -> Result<usize, DbError>
where
    S: PersonStore + ?Sized,
{
    let people = seed_people()?;
    let inserted = store.seed_if_empty(&people).await?;
    if inserted > 0 {
        tracing::info!(inserted, "seeded empty person table");
    } else {
        tracing::debug!("person table not empty, skipping seed");
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryPersonStore;

    #[test]
    fn seed_rows_are_valid() {
        let people = seed_people().expect("seed rows validate");
        assert_eq!(people.len(), SEED_PEOPLE.len());
    }

    #[tokio::test]
    async fn seeds_tom_bob_sam_with_distinct_ids() {
        let store = MemoryPersonStore::new();
        assert_eq!(run(&store).await.unwrap(), 3);

        let mut people = store.list().await.unwrap();
        people.sort_by_key(|p| p.age);
        let summary: Vec<(&str, i32)> = people.iter().map(|p| (p.name.as_str(), p.age)).collect();
        assert_eq!(summary, vec![("Sam", 24), ("Tom", 37), ("Bob", 41)]);

        let mut ids: Vec<&str> = people.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn second_run_is_noop() {
        let store = MemoryPersonStore::new();
        run(&store).await.unwrap();
        assert_eq!(run(&store).await.unwrap(), 0);
        assert_eq!(store.len().await, 3);
    }
}
