/// Person model and database operations
///
/// A person is a profile record (name, email, phone) with no relation to the
/// authentication credentials. The two "user" concepts are deliberately kept
/// separate; see DESIGN.md.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Person model representing a profile record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    /// Unique person ID (UUID v4)
    pub id: Uuid,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Email address, unique across persons
    pub email: String,

    /// Optional phone number
    pub phone_number: Option<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new person
#[derive(Debug, Clone)]
pub struct CreatePerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

/// Input for partially updating a person
///
/// Only non-None fields are written; the rest keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct UpdatePerson {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl Person {
    /// Creates a new person record
    ///
    /// # Errors
    ///
    /// Returns an error if the email collides with an existing row or the
    /// database is unreachable.
    pub async fn create(pool: &PgPool, data: CreatePerson) -> Result<Self, sqlx::Error> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO persons (first_name, last_name, email, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email, phone_number, created_at, updated_at
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.phone_number)
        .fetch_one(pool)
        .await?;

        Ok(person)
    }

    /// Finds a person by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, first_name, last_name, email, phone_number, created_at, updated_at
            FROM persons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(person)
    }

    /// Finds a person by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, first_name, last_name, email, phone_number, created_at, updated_at
            FROM persons
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(person)
    }

    /// Lists all persons, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let persons = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, first_name, last_name, email, phone_number, created_at, updated_at
            FROM persons
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(persons)
    }

    /// Searches persons by first or last name, case-insensitive substring
    pub async fn search_by_name(pool: &PgPool, name: &str) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = format!("%{}%", name);
        let persons = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, first_name, last_name, email, phone_number, created_at, updated_at
            FROM persons
            WHERE first_name ILIKE $1 OR last_name ILIKE $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(pool)
        .await?;

        Ok(persons)
    }

    /// Partially updates a person
    ///
    /// Only non-None fields in `data` are written. `updated_at` is bumped to
    /// the current time. Returns None if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePerson,
    ) -> Result<Option<Self>, sqlx::Error> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            UPDATE persons
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone_number = COALESCE($5, phone_number),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, first_name, last_name, email, phone_number, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.phone_number)
        .fetch_optional(pool)
        .await?;

        Ok(person)
    }

    /// Deletes a person by ID, returns whether a row existed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a person exists by ID
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM persons WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Checks whether an email is already used by a person
    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM persons WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Counts total number of persons
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM persons")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_person_default_is_noop() {
        let update = UpdatePerson::default();
        assert!(update.first_name.is_none());
        assert!(update.last_name.is_none());
        assert!(update.email.is_none());
        assert!(update.phone_number.is_none());
    }
}
