/// Person directory endpoints
///
/// Persons are profile records with no tie to login credentials. The policy
/// table restricts the whole `/api/users` prefix to USER or ADMIN roles.
///
/// # Endpoints
///
/// - `POST   /api/users` - Create person
/// - `GET    /api/users` - List all persons
/// - `GET    /api/users/search?name=` - Search by first or last name
/// - `GET    /api/users/count` - Total count
/// - `GET    /api/users/email/{email}` - Lookup by email
/// - `GET    /api/users/{id}` - Lookup by ID
/// - `PUT    /api/users/{id}` / `PATCH /api/users/{id}` - Partial update
/// - `DELETE /api/users/{id}` - Delete
/// - `GET    /api/users/{id}/exists` - Existence check

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
    models::person::{CreatePerson, Person, UpdatePerson},
    service::person as person_service,
};
use uuid::Uuid;
use validator::Validate;

/// Create request body
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonRequest {
    /// First name
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    /// Last name
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    /// Email address, unique
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Optional phone number
    #[validate(length(max = 20, message = "Phone number must be at most 20 characters"))]
    pub phone_number: Option<String>,
}

/// Partial update request body; omitted fields keep their stored values
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePersonRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "Phone number must be at most 20 characters"))]
    pub phone_number: Option<String>,
}

/// Name search query parameters
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    /// Substring to match against first or last name, case-insensitive
    pub name: String,
}

/// Create a person
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or email already exists
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreatePersonRequest>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    req.validate().map_err(validation_details)?;

    let person = person_service::create(
        &state.db,
        CreatePerson {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(person)))
}

/// List all persons
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Person>>> {
    Ok(Json(person_service::list(&state.db).await?))
}

/// Lookup by ID
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Person>> {
    person_service::get_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Person not found: {}", id)))
}

/// Lookup by exact email
pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Person>> {
    person_service::get_by_email(&state.db, &email)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Person not found: {}", email)))
}

/// Case-insensitive substring search on first or last name
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Json<Vec<Person>>> {
    Ok(Json(person_service::search_by_name(&state.db, &query.name).await?))
}

/// Partial update; omitted fields keep their stored values
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or new email already taken
/// - `404 Not Found`: No person with this ID
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePersonRequest>,
) -> ApiResult<Json<Person>> {
    req.validate().map_err(validation_details)?;

    person_service::update(
        &state.db,
        id,
        UpdatePerson {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
        },
    )
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("Person not found: {}", id)))
}

/// Delete a person
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    if person_service::delete(&state.db, id).await? {
        Ok(Json(json!({ "message": "Person deleted successfully" })))
    } else {
        Err(ApiError::NotFound(format!("Person not found: {}", id)))
    }
}

/// Total person count
pub async fn count(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let count = person_service::count(&state.db).await?;
    Ok(Json(json!({ "count": count })))
}

/// Existence check by ID
pub async fn exists(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let exists = person_service::exists(&state.db, id).await?;
    Ok(Json(json!({ "exists": exists })))
}
