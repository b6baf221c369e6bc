/// Expense category service
///
/// Enforces name uniqueness on create and rename. Point lookups return
/// `Option` — absence is not an error at this layer, the caller decides the
/// HTTP status.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::category::{Category, CategoryFields};

/// Error type for category operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category name already in use (case-sensitive)
    #[error("Category name already exists: {0}")]
    DuplicateName(String),

    /// Underlying store failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Creates a category, failing on a duplicate name
pub async fn create(
    pool: &PgPool,
    fields: CategoryFields,
) -> Result<Category, CategoryServiceError> {
    if Category::exists_by_name(pool, &fields.name).await? {
        return Err(CategoryServiceError::DuplicateName(fields.name));
    }

    let category = Category::create(pool, fields).await?;
    tracing::info!(category = %category.name, "Created expense category");
    Ok(category)
}

/// Lists all categories
pub async fn list(pool: &PgPool) -> Result<Vec<Category>, CategoryServiceError> {
    Ok(Category::list(pool).await?)
}

/// Lists active categories only
pub async fn list_active(pool: &PgPool) -> Result<Vec<Category>, CategoryServiceError> {
    Ok(Category::list_active(pool).await?)
}

/// Point lookup by ID; None when absent
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Category>, CategoryServiceError> {
    Ok(Category::find_by_id(pool, id).await?)
}

/// Point lookup by exact name; None when absent
pub async fn get_by_name(
    pool: &PgPool,
    name: &str,
) -> Result<Option<Category>, CategoryServiceError> {
    Ok(Category::find_by_name(pool, name).await?)
}

/// Case-insensitive substring search on name
pub async fn search(pool: &PgPool, name: &str) -> Result<Vec<Category>, CategoryServiceError> {
    Ok(Category::search_by_name(pool, name).await?)
}

/// Overwrites all mutable fields
///
/// Fails with `DuplicateName` when renaming onto a name already used by a
/// different category. Returns None if the target does not exist.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    fields: CategoryFields,
) -> Result<Option<Category>, CategoryServiceError> {
    let Some(existing) = Category::find_by_id(pool, id).await? else {
        return Ok(None);
    };

    if existing.name != fields.name && Category::exists_by_name(pool, &fields.name).await? {
        return Err(CategoryServiceError::DuplicateName(fields.name));
    }

    Ok(Category::update(pool, id, fields).await?)
}

/// Hard delete; returns whether a row existed
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, CategoryServiceError> {
    let deleted = Category::delete(pool, id).await?;
    if deleted {
        tracing::info!(%id, "Deleted expense category");
    }
    Ok(deleted)
}

/// Soft delete: sets active=false, row stays intact
pub async fn deactivate(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<Category>, CategoryServiceError> {
    Ok(Category::deactivate(pool, id).await?)
}

/// Total category count
pub async fn count(pool: &PgPool) -> Result<i64, CategoryServiceError> {
    Ok(Category::count(pool).await?)
}

/// Active category count
pub async fn count_active(pool: &PgPool) -> Result<i64, CategoryServiceError> {
    Ok(Category::count_active(pool).await?)
}

/// Existence check by ID
pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, CategoryServiceError> {
    Ok(Category::exists(pool, id).await?)
}

/// Categories ordered by referencing-expense count, most-used first
pub async fn list_by_usage(pool: &PgPool) -> Result<Vec<Category>, CategoryServiceError> {
    Ok(Category::list_by_usage(pool).await?)
}
