/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new USER credential
/// - `POST /api/auth/login` - Login with username/password
/// - `GET  /api/auth/me` - Current authenticated identity
/// - `POST /api/auth/logout` - Acknowledge logout (tokens are stateless)

use crate::{
    app::AppState,
    error::{validation_details, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spendlog_shared::{
    auth::middleware::AuthContext,
    models::credential::Role,
    service::auth as auth_service,
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login name
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register/login response: a bearer token plus the public identity fields
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Signed bearer token, valid 24 hours
    pub token: String,

    /// Username of the credential
    pub username: String,

    /// Email of the credential
    pub email: String,

    /// Role of the credential
    pub role: Role,
}

/// Current-user response (no password hash, ever)
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    /// Credential ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Email
    pub email: String,

    /// Role
    pub role: Role,

    /// Whether the account may log in
    pub enabled: bool,
}

/// Register a new credential
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "s3cret-pass"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or username/email already taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    req.validate().map_err(validation_details)?;

    let session = auth_service::register(
        &state.db,
        state.jwt_secret(),
        &req.username,
        &req.email,
        &req.password,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token: session.token,
            username: session.username,
            email: session.email,
            role: session.role,
        }),
    ))
}

/// Login with username and password
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown username, disabled account, or wrong
///   password (indistinguishable by design)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    req.validate().map_err(validation_details)?;

    let session =
        auth_service::login(&state.db, state.jwt_secret(), &req.username, &req.password).await?;

    Ok(Json(SessionResponse {
        token: session.token,
        username: session.username,
        email: session.email,
        role: session.role,
    }))
}

/// Current authenticated identity
///
/// # Errors
///
/// - `404 Not Found`: The identity behind a still-valid token was removed
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MeResponse>> {
    let credential = auth_service::current_user(&state.db, &auth.username).await?;

    Ok(Json(MeResponse {
        id: credential.id,
        username: credential.username,
        email: credential.email,
        role: credential.role,
        enabled: credential.enabled,
    }))
}

/// Logout acknowledgement
///
/// Tokens are stateless and expire on their own; the client discards its
/// copy. The endpoint exists so clients have a uniform logout call.
pub async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logged out successfully" }))
}
