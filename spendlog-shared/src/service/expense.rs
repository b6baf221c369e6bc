/// Expense service
///
/// Every operation resolves the requesting username to a credential first
/// and scopes all queries to that owner. A foreign expense is treated as
/// absent, never as forbidden, so cross-owner access is indistinguishable
/// from nonexistence.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::category::Category;
use crate::models::credential::Credential;
use crate::models::expense::{Expense, ExpenseFields};

/// Error type for expense operations
#[derive(Debug, thiserror::Error)]
pub enum ExpenseServiceError {
    /// The authenticated username no longer resolves to a credential.
    /// Should not occur post-authentication, but checked defensively.
    #[error("User not found: {0}")]
    IdentityNotFound(String),

    /// Referenced category does not exist
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Underlying store failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A window of expenses plus the page metadata callers need to render
/// pagination controls
#[derive(Debug, Clone)]
pub struct ExpensePage {
    pub content: Vec<Expense>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
}

impl ExpensePage {
    /// Number of pages needed for `total_elements` at this page size
    pub fn total_pages(&self) -> i64 {
        if self.size <= 0 {
            return 0;
        }
        (self.total_elements + self.size - 1) / self.size
    }
}

async fn resolve_owner(pool: &PgPool, username: &str) -> Result<Credential, ExpenseServiceError> {
    Credential::find_by_username(pool, username)
        .await?
        .ok_or_else(|| ExpenseServiceError::IdentityNotFound(username.to_string()))
}

async fn resolve_category(
    pool: &PgPool,
    category_id: Uuid,
) -> Result<Category, ExpenseServiceError> {
    Category::find_by_id(pool, category_id)
        .await?
        .ok_or(ExpenseServiceError::CategoryNotFound(category_id))
}

/// Creates an expense owned by `username`
///
/// # Errors
///
/// Fails with `CategoryNotFound` if the referenced category does not resolve.
pub async fn create(
    pool: &PgPool,
    username: &str,
    fields: ExpenseFields,
) -> Result<Expense, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    resolve_category(pool, fields.category_id).await?;

    let expense = Expense::create(pool, owner.id, fields).await?;
    tracing::debug!(owner = username, expense_id = %expense.id, "Created expense");
    Ok(expense)
}

/// All expenses for the owner, expense date descending
pub async fn list_all(pool: &PgPool, username: &str) -> Result<Vec<Expense>, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::list_for_owner(pool, owner.id).await?)
}

/// One page of expenses for the owner, expense date descending
pub async fn list_paginated(
    pool: &PgPool,
    username: &str,
    page: i64,
    size: i64,
) -> Result<ExpensePage, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;

    // Saturate instead of overflowing; an offset past the data is an empty page
    let offset = page.saturating_mul(size);
    let content = Expense::list_for_owner_paginated(pool, owner.id, size, offset).await?;
    let total_elements = Expense::count_for_owner(pool, owner.id).await?;

    Ok(ExpensePage {
        content,
        page,
        size,
        total_elements,
    })
}

/// Point lookup scoped to the owner; a foreign expense reads as None
pub async fn get_by_id(
    pool: &PgPool,
    username: &str,
    id: Uuid,
) -> Result<Option<Expense>, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::find_by_id_for_owner(pool, id, owner.id).await?)
}

/// Expenses in an inclusive date range
pub async fn list_by_date_range(
    pool: &PgPool,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Expense>, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::list_by_date_range(pool, owner.id, start, end).await?)
}

/// Expenses in a category
///
/// # Errors
///
/// Fails with `CategoryNotFound` when the category id does not resolve, even
/// if the owner has no expenses in it.
pub async fn list_by_category(
    pool: &PgPool,
    username: &str,
    category_id: Uuid,
) -> Result<Vec<Expense>, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    resolve_category(pool, category_id).await?;
    Ok(Expense::list_by_category(pool, owner.id, category_id).await?)
}

/// Case-insensitive substring search on description
pub async fn search(
    pool: &PgPool,
    username: &str,
    description: &str,
) -> Result<Vec<Expense>, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::search_by_description(pool, owner.id, description).await?)
}

/// Overwrites all mutable fields of an owned expense
///
/// Resolves the target category first (`CategoryNotFound` on a bad
/// reference); returns None when the expense is absent or owned by someone
/// else.
pub async fn update(
    pool: &PgPool,
    username: &str,
    id: Uuid,
    fields: ExpenseFields,
) -> Result<Option<Expense>, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    resolve_category(pool, fields.category_id).await?;
    Ok(Expense::update_for_owner(pool, id, owner.id, fields).await?)
}

/// Deletes an owned expense; false when absent or owned by someone else
pub async fn delete(
    pool: &PgPool,
    username: &str,
    id: Uuid,
) -> Result<bool, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::delete_for_owner(pool, id, owner.id).await?)
}

/// Sum of all amounts for the owner; zero when there are no expenses
pub async fn total_amount(pool: &PgPool, username: &str) -> Result<Decimal, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::total_for_owner(pool, owner.id).await?)
}

/// Sum of amounts in an inclusive date range; zero when there are no rows
pub async fn total_amount_by_date_range(
    pool: &PgPool,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Decimal, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::total_for_owner_by_date_range(pool, owner.id, start, end).await?)
}

/// Ten most recently created expenses for the owner
pub async fn recent_top10(
    pool: &PgPool,
    username: &str,
) -> Result<Vec<Expense>, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::recent_top10(pool, owner.id).await?)
}

/// Count of the owner's expenses
pub async fn count(pool: &PgPool, username: &str) -> Result<i64, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::count_for_owner(pool, owner.id).await?)
}

/// The owner's recurring expenses
pub async fn list_recurring(
    pool: &PgPool,
    username: &str,
) -> Result<Vec<Expense>, ExpenseServiceError> {
    let owner = resolve_owner(pool, username).await?;
    Ok(Expense::list_recurring(pool, owner.id).await?)
}
