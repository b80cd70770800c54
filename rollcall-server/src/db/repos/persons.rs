//! Person repository backed by PostgreSQL
//!
//! - create: INSERT ... RETURNING with a server-generated id
//! - update/delete: single statement with RETURNING, no check-then-write
//! - seed: transaction holding a table lock so concurrent starters can't double-seed

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::store::{DbError, PersonStore};
use crate::models::{person::new_person_id, Person, PersonFields};

/// PostgreSQL person store
///
/// Cloning is cheap: the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PgPersonStore {
    pool: PgPool,
}

impl PgPersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn list(&self) -> Result<Vec<Person>, DbError> {
        let people: Vec<Person> = sqlx::query_as(
            r#"
            SELECT id, name, age
            FROM persons
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    async fn get(&self, id: &str) -> Result<Option<Person>, DbError> {
        let person: Option<Person> =
            sqlx::query_as("SELECT id, name, age FROM persons WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(person)
    }

    async fn create(&self, fields: PersonFields) -> Result<Person, DbError> {
        let person: Person = sqlx::query_as(
            r#"
            INSERT INTO persons (id, name, age)
            VALUES ($1, $2, $3)
            RETURNING id, name, age
            "#,
        )
        .bind(new_person_id())
        .bind(fields.name.as_str())
        .bind(fields.age.get())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = %person.id, "person created");
        Ok(person)
    }

    async fn update(&self, id: &str, fields: PersonFields) -> Result<Option<Person>, DbError> {
        let person: Option<Person> = sqlx::query_as(
            r#"
            UPDATE persons
            SET name = $2, age = $3
            WHERE id = $1
            RETURNING id, name, age
            "#,
        )
        .bind(id)
        .bind(fields.name.as_str())
        .bind(fields.age.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    async fn delete(&self, id: &str) -> Result<Option<Person>, DbError> {
        let person: Option<Person> =
            sqlx::query_as("DELETE FROM persons WHERE id = $1 RETURNING id, name, age")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(person)
    }

    async fn seed_if_empty(&self, people: &[PersonFields]) -> Result<usize, DbError> {
        let mut tx = self.pool.begin().await?;

        // Blocks other seeders (and writers) until commit; readers are unaffected
        sqlx::query("LOCK TABLE persons IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let (has_rows,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM persons)")
            .fetch_one(&mut *tx)
            .await?;

        if has_rows || people.is_empty() {
            tx.rollback().await?;
            return Ok(0);
        }

        let ids: Vec<String> = people.iter().map(|_| new_person_id()).collect();
        let names: Vec<String> = people.iter().map(|p| p.name.as_str().to_owned()).collect();
        let ages: Vec<i32> = people.iter().map(|p| p.age.get()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO persons (id, name, age)
            SELECT * FROM UNNEST($1::text[], $2::text[], $3::int4[])
            "#,
        )
        .bind(ids)
        .bind(names)
        .bind(ages)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() as usize)
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, migrations, seed_people};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p rollcall-server -- --ignored

    async fn store() -> PgPersonStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        PgPersonStore::new(pool)
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_round_trips() {
        let store = store().await;
        let created = store
            .create(PersonFields::new("Ann", 30).unwrap())
            .await
            .unwrap();

        let fetched = store.get(&created.id).await.unwrap().expect("row exists");
        assert_eq!(fetched, created);

        store.delete(&created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_missing_inserts_nothing() {
        let store = store().await;
        let id = new_person_id();

        let updated = store
            .update(&id, PersonFields::new("Ghost", 1).unwrap())
            .await
            .unwrap();

        assert!(updated.is_none());
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_returns_previous_row() {
        let store = store().await;
        let created = store
            .create(PersonFields::new("Bea", 52).unwrap())
            .await
            .unwrap();

        let deleted = store.delete(&created.id).await.unwrap();
        assert_eq!(deleted, Some(created.clone()));
        assert!(store.get(&created.id).await.unwrap().is_none());
        assert!(store.delete(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn seeding_is_noop_when_rows_exist() {
        let store = store().await;
        let placeholder = store
            .create(PersonFields::new("Placeholder", 1).unwrap())
            .await
            .unwrap();

        let inserted = store.seed_if_empty(&seed_people().unwrap()).await.unwrap();
        assert_eq!(inserted, 0);

        store.delete(&placeholder.id).await.unwrap();
    }
}
