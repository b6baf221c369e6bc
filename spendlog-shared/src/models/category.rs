/// Expense category model and database operations
///
/// Categories tag expenses and carry a display color/icon plus an activation
/// flag. Deactivation is a soft delete: the row stays and keeps its expense
/// references; `delete` is the hard variant.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE expense_categories (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL UNIQUE,
///     description VARCHAR(255),
///     color VARCHAR(20),
///     icon VARCHAR(50),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Expense category model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID (UUID v4)
    pub id: Uuid,

    /// Category name, unique across all categories (case-sensitive)
    pub name: String,

    /// Optional human-readable description
    pub description: Option<String>,

    /// Display color tag (e.g. "#FF6B6B")
    pub color: Option<String>,

    /// Display icon tag (e.g. "fas fa-utensils")
    pub icon: Option<String>,

    /// Whether the category is active; false after deactivation
    pub is_active: bool,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or fully updating a category
#[derive(Debug, Clone)]
pub struct CategoryFields {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
}

impl Category {
    /// Creates a new category
    ///
    /// # Errors
    ///
    /// Returns an error if the name collides with an existing row (unique
    /// constraint) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CategoryFields) -> Result<Self, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO expense_categories (name, description, color, icon, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, color, icon, is_active, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.color)
        .bind(data.icon)
        .bind(data.is_active)
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    /// Finds a category by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color, icon, is_active, created_at, updated_at
            FROM expense_categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Finds a category by exact name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color, icon, is_active, created_at, updated_at
            FROM expense_categories
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Lists all categories ordered by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color, icon, is_active, created_at, updated_at
            FROM expense_categories
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Lists active categories only
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color, icon, is_active, created_at, updated_at
            FROM expense_categories
            WHERE is_active = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Searches categories by name, case-insensitive substring
    pub async fn search_by_name(pool: &PgPool, name: &str) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = format!("%{}%", name);
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, color, icon, is_active, created_at, updated_at
            FROM expense_categories
            WHERE name ILIKE $1
            ORDER BY name
            "#,
        )
        .bind(pattern)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    /// Overwrites all mutable fields of a category
    ///
    /// Returns None if the row does not exist. `updated_at` is bumped.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: CategoryFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE expense_categories
            SET name = $2, description = $3, color = $4, icon = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, color, icon, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.color)
        .bind(data.icon)
        .bind(data.is_active)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Hard-deletes a category by ID, returns whether a row existed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expense_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft-deletes a category by setting is_active = false
    ///
    /// Returns the updated row, or None if it does not exist. The row and its
    /// expense references stay intact.
    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE expense_categories
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, color, icon, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Checks whether a category exists by ID
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM expense_categories WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Checks whether a category name is already taken (case-sensitive)
    pub async fn exists_by_name(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM expense_categories WHERE name = $1)")
                .bind(name)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Counts all categories
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM expense_categories")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts active categories
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM expense_categories WHERE is_active = TRUE")
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Lists categories ordered by number of referencing expenses, most-used
    /// first; categories with zero expenses sort last, tie order unspecified
    pub async fn list_by_usage(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.description, c.color, c.icon,
                   c.is_active, c.created_at, c.updated_at
            FROM expense_categories c
            LEFT JOIN expenses e ON e.category_id = c.id
            GROUP BY c.id
            ORDER BY COUNT(e.id) DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }
}
