/// Expense category endpoints
///
/// Reads are open to any authenticated identity; mutations are ADMIN-only.
/// The role gate lives in the policy table, not here — handlers trust the
/// middleware.
///
/// # Endpoints
///
/// - `POST   /api/expense-categories` - Create category
/// - `GET    /api/expense-categories` - List all categories
/// - `GET    /api/expense-categories/active` - List active categories
/// - `GET    /api/expense-categories/search?name=` - Search by name
/// - `GET    /api/expense-categories/popular` - Ordered by expense usage
/// - `GET    /api/expense-categories/count` - Total count
/// - `GET    /api/expense-categories/count/active` - Active count
/// - `GET    /api/expense-categories/name/{name}` - Lookup by exact name
/// - `GET    /api/expense-categories/{id}` - Lookup by ID
/// - `PUT    /api/expense-categories/{id}` - Full update
/// - `DELETE /api/expense-categories/{id}` - Hard delete
/// - `PATCH  /api/expense-categories/{id}/deactivate` - Soft delete
/// - `GET    /api/expense-categories/{id}/exists` - Existence check

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use spendlog_shared::{
    models::category::{Category, CategoryFields},
    service::category as category_service,
};
use uuid::Uuid;
use validator::Validate;

/// Create/update request body
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    /// Category name, unique
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,

    /// Optional display color (e.g. "#FF6B6B")
    #[validate(length(max = 20, message = "Color must be at most 20 characters"))]
    pub color: Option<String>,

    /// Optional display icon (e.g. "fas fa-utensils")
    #[validate(length(max = 50, message = "Icon must be at most 50 characters"))]
    pub icon: Option<String>,

    /// Active flag, defaults to true
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CategoryRequest {
    fn into_fields(self) -> CategoryFields {
        CategoryFields {
            name: self.name,
            description: self.description,
            color: self.color,
            icon: self.icon,
            is_active: self.is_active,
        }
    }
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to match, case-insensitive
    pub name: String,
}

/// Create a category (ADMIN)
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or name already exists
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    req.validate().map_err(validation_details)?;

    let category = category_service::create(&state.db, req.into_fields()).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List all categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(category_service::list(&state.db).await?))
}

/// List active categories
pub async fn list_active(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(category_service::list_active(&state.db).await?))
}

/// Lookup by ID
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Category>> {
    category_service::get_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", id)))
}

/// Lookup by exact name
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Category>> {
    category_service::get_by_name(&state.db, &name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", name)))
}

/// Case-insensitive substring search on name
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(category_service::search(&state.db, &query.name).await?))
}

/// Full update of a category (ADMIN)
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or renaming onto a taken name
/// - `404 Not Found`: No category with this ID
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<Json<Category>> {
    req.validate().map_err(validation_details)?;

    category_service::update(&state.db, id, req.into_fields())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", id)))
}

/// Hard delete (ADMIN)
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if category_service::delete(&state.db, id).await? {
        Ok(Json(json!({ "message": "Category deleted successfully" })))
    } else {
        Err(ApiError::NotFound(format!("Category not found: {}", id)))
    }
}

/// Soft delete: set active=false, keep the row (ADMIN)
pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Category>> {
    category_service::deactivate(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", id)))
}

/// Total category count
pub async fn count(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let count = category_service::count(&state.db).await?;
    Ok(Json(json!({ "count": count })))
}

/// Active category count
pub async fn count_active(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let count = category_service::count_active(&state.db).await?;
    Ok(Json(json!({ "count": count })))
}

/// Existence check by ID
pub async fn exists(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let exists = category_service::exists(&state.db, id).await?;
    Ok(Json(json!({ "exists": exists })))
}

/// Categories ordered by referencing-expense count, most-used first
pub async fn popular(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(category_service::list_by_usage(&state.db).await?))
}
