/// Person service
///
/// Persons are a shared directory, not scoped per credential. Email is the
/// only uniqueness constraint.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::person::{CreatePerson, Person, UpdatePerson};

/// Error type for person operations
#[derive(Debug, thiserror::Error)]
pub enum PersonServiceError {
    /// Email already registered to another person
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// Underlying store failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Creates a person, failing on a duplicate email
pub async fn create(pool: &PgPool, input: CreatePerson) -> Result<Person, PersonServiceError> {
    if Person::exists_by_email(pool, &input.email).await? {
        return Err(PersonServiceError::DuplicateEmail(input.email));
    }

    let person = Person::create(pool, input).await?;
    tracing::info!(person_id = %person.id, "Created person");
    Ok(person)
}

/// Lists all persons
pub async fn list(pool: &PgPool) -> Result<Vec<Person>, PersonServiceError> {
    Ok(Person::list(pool).await?)
}

/// Point lookup by ID; None when absent
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Person>, PersonServiceError> {
    Ok(Person::find_by_id(pool, id).await?)
}

/// Point lookup by exact email; None when absent
pub async fn get_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Person>, PersonServiceError> {
    Ok(Person::find_by_email(pool, email).await?)
}

/// Case-insensitive substring search on first or last name
pub async fn search_by_name(
    pool: &PgPool,
    name: &str,
) -> Result<Vec<Person>, PersonServiceError> {
    Ok(Person::search_by_name(pool, name).await?)
}

/// Partial update; omitted fields keep their current values
///
/// Fails with `DuplicateEmail` when the new email belongs to a different
/// person. Returns None if the target does not exist.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdatePerson,
) -> Result<Option<Person>, PersonServiceError> {
    let Some(existing) = Person::find_by_id(pool, id).await? else {
        return Ok(None);
    };

    if let Some(email) = &input.email {
        if *email != existing.email && Person::exists_by_email(pool, email).await? {
            return Err(PersonServiceError::DuplicateEmail(email.clone()));
        }
    }

    Ok(Person::update(pool, id, input).await?)
}

/// Hard delete; returns whether a row existed
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, PersonServiceError> {
    let deleted = Person::delete(pool, id).await?;
    if deleted {
        tracing::info!(%id, "Deleted person");
    }
    Ok(deleted)
}

/// Existence check by ID
pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, PersonServiceError> {
    Ok(Person::exists(pool, id).await?)
}

/// Total person count
pub async fn count(pool: &PgPool) -> Result<i64, PersonServiceError> {
    Ok(Person::count(pool).await?)
}
