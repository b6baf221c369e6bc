/// Expense endpoints
///
/// Every handler extracts the authenticated identity from request extensions
/// and passes the username down explicitly; the service resolves it to an
/// owner and scopes all queries. No handler ever reads another user's rows.
///
/// # Endpoints
///
/// - `POST   /api/expenses` - Create expense
/// - `GET    /api/expenses` - List own expenses
/// - `GET    /api/expenses/paginated?page&size` - Windowed listing
/// - `GET    /api/expenses/date-range?start_date&end_date` - Inclusive range
/// - `GET    /api/expenses/search?description=` - Substring search
/// - `GET    /api/expenses/total` - Sum of all amounts
/// - `GET    /api/expenses/total/date-range` - Sum over a range
/// - `GET    /api/expenses/recent` - Ten most recently created
/// - `GET    /api/expenses/count` - Count
/// - `GET    /api/expenses/recurring` - Recurring expenses
/// - `GET    /api/expenses/category/{categoryId}` - By category
/// - `GET    /api/expenses/{id}` - Lookup by ID
/// - `PUT    /api/expenses/{id}` - Full update
/// - `DELETE /api/expenses/{id}` - Delete

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spendlog_shared::{
    auth::middleware::AuthContext,
    models::expense::{Expense, ExpenseFields, PaymentMethod, RecurringFrequency},
    service::expense as expense_service,
};
use uuid::Uuid;
use validator::Validate;

/// Create/update request body
#[derive(Debug, Deserialize, Validate)]
pub struct ExpenseRequest {
    /// What the money was spent on
    #[validate(length(min = 1, max = 255, message = "Description must be 1-255 characters"))]
    pub description: String,

    /// Positive amount
    pub amount: Decimal,

    /// Date the expense occurred
    pub expense_date: NaiveDate,

    /// Referenced category ID
    pub category_id: Uuid,

    /// Optional free-form notes
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,

    /// Payment method, defaults to CASH
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Whether this expense repeats
    #[serde(default)]
    pub is_recurring: bool,

    /// Repeat frequency, only meaningful when is_recurring
    pub recurring_frequency: Option<RecurringFrequency>,
}

impl ExpenseRequest {
    fn into_fields(self) -> ExpenseFields {
        ExpenseFields {
            description: self.description,
            amount: self.amount,
            expense_date: self.expense_date,
            category_id: self.category_id,
            notes: self.notes,
            payment_method: self.payment_method,
            is_recurring: self.is_recurring,
            recurring_frequency: self.recurring_frequency,
        }
    }

    fn check(&self) -> Result<(), ApiError> {
        self.validate().map_err(validation_details)?;
        if self.amount <= Decimal::ZERO {
            return Err(ApiError::BadRequest("Amount must be positive".to_string()));
        }
        Ok(())
    }
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Zero-based page index
    #[serde(default)]
    pub page: i64,

    /// Page size
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

/// Date range query parameters, inclusive on both ends
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Description search query parameters
#[derive(Debug, Deserialize)]
pub struct DescriptionQuery {
    pub description: String,
}

/// Page envelope for windowed listings
#[derive(Debug, Serialize)]
pub struct PageResponse {
    /// Expenses in this window
    pub content: Vec<Expense>,

    /// Zero-based page index
    pub page: i64,

    /// Requested page size
    pub size: i64,

    /// Total matching rows across all pages
    pub total_elements: i64,

    /// Total page count at this size
    pub total_pages: i64,
}

/// Create an expense owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or amount not positive
/// - `404 Not Found`: Referenced category does not exist
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ExpenseRequest>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    req.check()?;

    let expense = expense_service::create(&state.db, &auth.username, req.into_fields()).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// List the caller's expenses, expense date descending
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(expense_service::list_all(&state.db, &auth.username).await?))
}

/// One page of the caller's expenses
///
/// # Errors
///
/// - `400 Bad Request`: Negative page or non-positive size
pub async fn list_paginated(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PageResponse>> {
    if query.page < 0 || query.size <= 0 || query.page.checked_mul(query.size).is_none() {
        return Err(ApiError::BadRequest(
            "page must be >= 0 and size must be > 0".to_string(),
        ));
    }

    let page =
        expense_service::list_paginated(&state.db, &auth.username, query.page, query.size).await?;

    let total_pages = page.total_pages();
    Ok(Json(PageResponse {
        content: page.content,
        page: page.page,
        size: page.size,
        total_elements: page.total_elements,
        total_pages,
    }))
}

/// Lookup by ID; a foreign expense reads as 404
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Expense>> {
    expense_service::get_by_id(&state.db, &auth.username, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Expense not found: {}", id)))
}

/// Expenses in an inclusive date range
pub async fn list_by_date_range(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(
        expense_service::list_by_date_range(
            &state.db,
            &auth.username,
            query.start_date,
            query.end_date,
        )
        .await?,
    ))
}

/// Expenses in a category
pub async fn list_by_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(category_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(
        expense_service::list_by_category(&state.db, &auth.username, category_id).await?,
    ))
}

/// Case-insensitive substring search on description
pub async fn search(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<DescriptionQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(
        expense_service::search(&state.db, &auth.username, &query.description).await?,
    ))
}

/// Full update of an owned expense
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or amount not positive
/// - `404 Not Found`: Expense absent, foreign, or category unresolved
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<ExpenseRequest>,
) -> ApiResult<Json<Expense>> {
    req.check()?;

    expense_service::update(&state.db, &auth.username, id, req.into_fields())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Expense not found: {}", id)))
}

/// Delete an owned expense; a foreign expense reads as 404
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if expense_service::delete(&state.db, &auth.username, id).await? {
        Ok(Json(json!({ "message": "Expense deleted successfully" })))
    } else {
        Err(ApiError::NotFound(format!("Expense not found: {}", id)))
    }
}

/// Sum of all the caller's amounts; zero with no expenses
pub async fn total(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Value>> {
    let total = expense_service::total_amount(&state.db, &auth.username).await?;
    Ok(Json(json!({ "total": total })))
}

/// Sum of the caller's amounts in an inclusive date range
pub async fn total_by_date_range(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Json<Value>> {
    let total = expense_service::total_amount_by_date_range(
        &state.db,
        &auth.username,
        query.start_date,
        query.end_date,
    )
    .await?;
    Ok(Json(json!({ "total": total })))
}

/// Ten most recently created expenses
pub async fn recent(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(expense_service::recent_top10(&state.db, &auth.username).await?))
}

/// Count of the caller's expenses
pub async fn count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Value>> {
    let count = expense_service::count(&state.db, &auth.username).await?;
    Ok(Json(json!({ "count": count })))
}

/// The caller's recurring expenses
pub async fn list_recurring(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(expense_service::list_recurring(&state.db, &auth.username).await?))
}
