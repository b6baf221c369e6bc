/// Expense model and database operations
///
/// Every expense is owned by exactly one credential. Ownership is an access
/// control boundary, not merely a filter: all reads, updates, and deletes are
/// scoped by `credential_id`, so a foreign expense is indistinguishable from
/// a nonexistent one.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// How an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
    DigitalWallet,
    Check,
    Other,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

/// How often a recurring expense repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "recurring_frequency", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurringFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// Expense model, a single monetary record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    /// Unique expense ID (UUID v4)
    pub id: Uuid,

    /// What the money was spent on
    pub description: String,

    /// Positive amount, NUMERIC(10,2)
    pub amount: Decimal,

    /// Date the expense occurred (distinct from created_at)
    pub expense_date: NaiveDate,

    /// Referenced category
    pub category_id: Uuid,

    /// Owning credential
    pub credential_id: Uuid,

    /// Optional free-form notes
    pub notes: Option<String>,

    /// Payment method, defaults to CASH
    pub payment_method: PaymentMethod,

    /// Whether this expense repeats
    pub is_recurring: bool,

    /// Repeat frequency, only meaningful when is_recurring
    pub recurring_frequency: Option<RecurringFrequency>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or fully updating an expense
#[derive(Debug, Clone)]
pub struct ExpenseFields {
    pub description: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub category_id: Uuid,
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
}

const EXPENSE_COLUMNS: &str = "id, description, amount, expense_date, category_id, credential_id, \
     notes, payment_method, is_recurring, recurring_frequency, created_at, updated_at";

impl Expense {
    /// Creates a new expense owned by `credential_id`
    pub async fn create(
        pool: &PgPool,
        credential_id: Uuid,
        data: ExpenseFields,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO expenses
                (description, amount, expense_date, category_id, credential_id,
                 notes, payment_method, is_recurring, recurring_frequency)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EXPENSE_COLUMNS}
            "#
        );
        let expense = sqlx::query_as::<_, Expense>(&query)
            .bind(data.description)
            .bind(data.amount)
            .bind(data.expense_date)
            .bind(data.category_id)
            .bind(credential_id)
            .bind(data.notes)
            .bind(data.payment_method)
            .bind(data.is_recurring)
            .bind(data.recurring_frequency)
            .fetch_one(pool)
            .await?;

        Ok(expense)
    }

    /// Finds an expense by ID, only if owned by `credential_id`
    pub async fn find_by_id_for_owner(
        pool: &PgPool,
        id: Uuid,
        credential_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1 AND credential_id = $2"
        );
        let expense = sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(credential_id)
            .fetch_optional(pool)
            .await?;

        Ok(expense)
    }

    /// Lists all expenses for an owner, expense date descending
    pub async fn list_for_owner(
        pool: &PgPool,
        credential_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE credential_id = $1 ORDER BY expense_date DESC"
        );
        let expenses = sqlx::query_as::<_, Expense>(&query)
            .bind(credential_id)
            .fetch_all(pool)
            .await?;

        Ok(expenses)
    }

    /// Lists a page of expenses for an owner, expense date descending
    pub async fn list_for_owner_paginated(
        pool: &PgPool,
        credential_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE credential_id = $1 ORDER BY expense_date DESC LIMIT $2 OFFSET $3"
        );
        let expenses = sqlx::query_as::<_, Expense>(&query)
            .bind(credential_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(expenses)
    }

    /// Lists expenses in an inclusive date range, expense date descending
    pub async fn list_by_date_range(
        pool: &PgPool,
        credential_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE credential_id = $1 AND expense_date BETWEEN $2 AND $3 \
             ORDER BY expense_date DESC"
        );
        let expenses = sqlx::query_as::<_, Expense>(&query)
            .bind(credential_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?;

        Ok(expenses)
    }

    /// Lists expenses in a category for an owner, expense date descending
    pub async fn list_by_category(
        pool: &PgPool,
        credential_id: Uuid,
        category_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE credential_id = $1 AND category_id = $2 ORDER BY expense_date DESC"
        );
        let expenses = sqlx::query_as::<_, Expense>(&query)
            .bind(credential_id)
            .bind(category_id)
            .fetch_all(pool)
            .await?;

        Ok(expenses)
    }

    /// Searches expenses by description, case-insensitive substring
    pub async fn search_by_description(
        pool: &PgPool,
        credential_id: Uuid,
        description: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = format!("%{}%", description);
        let query = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE credential_id = $1 AND description ILIKE $2 ORDER BY expense_date DESC"
        );
        let expenses = sqlx::query_as::<_, Expense>(&query)
            .bind(credential_id)
            .bind(pattern)
            .fetch_all(pool)
            .await?;

        Ok(expenses)
    }

    /// Overwrites all mutable fields of an expense, only if owned by
    /// `credential_id`; returns None when the row is absent or foreign
    pub async fn update_for_owner(
        pool: &PgPool,
        id: Uuid,
        credential_id: Uuid,
        data: ExpenseFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE expenses
            SET description = $3, amount = $4, expense_date = $5, category_id = $6,
                notes = $7, payment_method = $8, is_recurring = $9,
                recurring_frequency = $10, updated_at = NOW()
            WHERE id = $1 AND credential_id = $2
            RETURNING {EXPENSE_COLUMNS}
            "#
        );
        let expense = sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(credential_id)
            .bind(data.description)
            .bind(data.amount)
            .bind(data.expense_date)
            .bind(data.category_id)
            .bind(data.notes)
            .bind(data.payment_method)
            .bind(data.is_recurring)
            .bind(data.recurring_frequency)
            .fetch_optional(pool)
            .await?;

        Ok(expense)
    }

    /// Deletes an expense only if owned by `credential_id`; returns whether a
    /// row was removed
    pub async fn delete_for_owner(
        pool: &PgPool,
        id: Uuid,
        credential_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND credential_id = $2")
            .bind(id)
            .bind(credential_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sums all amounts for an owner; zero when there are no rows
    pub async fn total_for_owner(
        pool: &PgPool,
        credential_id: Uuid,
    ) -> Result<Decimal, sqlx::Error> {
        let (total,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE credential_id = $1",
        )
        .bind(credential_id)
        .fetch_one(pool)
        .await?;

        Ok(total)
    }

    /// Sums amounts in an inclusive date range; zero when there are no rows
    pub async fn total_for_owner_by_date_range(
        pool: &PgPool,
        credential_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Decimal, sqlx::Error> {
        let (total,): (Decimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM expenses
            WHERE credential_id = $1 AND expense_date BETWEEN $2 AND $3
            "#,
        )
        .bind(credential_id)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;

        Ok(total)
    }

    /// Ten most recently created expenses for an owner
    pub async fn recent_top10(
        pool: &PgPool,
        credential_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE credential_id = $1 ORDER BY created_at DESC LIMIT 10"
        );
        let expenses = sqlx::query_as::<_, Expense>(&query)
            .bind(credential_id)
            .fetch_all(pool)
            .await?;

        Ok(expenses)
    }

    /// Counts expenses for an owner
    pub async fn count_for_owner(
        pool: &PgPool,
        credential_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM expenses WHERE credential_id = $1")
                .bind(credential_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Lists recurring expenses for an owner, expense date descending
    pub async fn list_recurring(
        pool: &PgPool,
        credential_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE credential_id = $1 AND is_recurring = TRUE ORDER BY expense_date DESC"
        );
        let expenses = sqlx::query_as::<_, Expense>(&query)
            .bind(credential_id)
            .fetch_all(pool)
            .await?;

        Ok(expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_default() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn test_payment_method_serde_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            "\"CREDIT_CARD\""
        );
        let method: PaymentMethod = serde_json::from_str("\"DIGITAL_WALLET\"").unwrap();
        assert_eq!(method, PaymentMethod::DigitalWallet);
    }

    #[test]
    fn test_recurring_frequency_serde() {
        assert_eq!(
            serde_json::to_string(&RecurringFrequency::Quarterly).unwrap(),
            "\"QUARTERLY\""
        );
    }
}
