/// Authentication service
///
/// Registration, login, and current-user lookup. Issues signed tokens that
/// embed the username, role, and email of the credential.

use sqlx::PgPool;

use crate::auth::jwt::{self, JwtError};
use crate::auth::password::{self, PasswordError};
use crate::models::credential::{CreateCredential, Credential, Role};

/// Error type for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Username or email already registered
    #[error("{0}")]
    DuplicateIdentity(String),

    /// Unknown username, disabled account, or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Credential no longer exists
    #[error("User not found: {0}")]
    NotFound(String),

    /// Password hashing/verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token creation failed
    #[error(transparent)]
    Jwt(#[from] JwtError),

    /// Underlying store failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Successful registration or login: a signed token plus the public fields
/// of the credential
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Registers a new credential with role USER and returns a session
///
/// # Errors
///
/// Fails with `DuplicateIdentity` when the username or email is already
/// present. The pre-checks are advisory; the unique constraints are the
/// actual safety net under concurrent registration.
pub async fn register(
    pool: &PgPool,
    secret: &str,
    username: &str,
    email: &str,
    plain_password: &str,
) -> Result<AuthSession, AuthServiceError> {
    if Credential::exists_by_username(pool, username).await? {
        return Err(AuthServiceError::DuplicateIdentity(format!(
            "Username already exists: {}",
            username
        )));
    }
    if Credential::exists_by_email(pool, email).await? {
        return Err(AuthServiceError::DuplicateIdentity(format!(
            "Email already exists: {}",
            email
        )));
    }

    let password_hash = password::hash_password(plain_password)?;

    let credential = Credential::create(
        pool,
        CreateCredential {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::User,
        },
    )
    .await?;

    tracing::info!(username = %credential.username, "Registered new credential");

    issue_session(secret, &credential)
}

/// Verifies a username/password pair and returns a session
///
/// # Errors
///
/// Fails with `InvalidCredentials` on unknown username, disabled account, or
/// hash mismatch. The three cases are deliberately indistinguishable to the
/// caller.
pub async fn login(
    pool: &PgPool,
    secret: &str,
    username: &str,
    plain_password: &str,
) -> Result<AuthSession, AuthServiceError> {
    let credential = Credential::find_by_username(pool, username)
        .await?
        .ok_or(AuthServiceError::InvalidCredentials)?;

    if !credential.enabled {
        return Err(AuthServiceError::InvalidCredentials);
    }

    let valid = password::verify_password(plain_password, &credential.password_hash)?;
    if !valid {
        return Err(AuthServiceError::InvalidCredentials);
    }

    tracing::debug!(username = %credential.username, "Login succeeded");

    issue_session(secret, &credential)
}

/// Looks up the public fields of the current credential
///
/// # Errors
///
/// Fails with `NotFound` if the identity behind a still-valid token has been
/// removed.
pub async fn current_user(pool: &PgPool, username: &str) -> Result<Credential, AuthServiceError> {
    Credential::find_by_username(pool, username)
        .await?
        .ok_or_else(|| AuthServiceError::NotFound(username.to_string()))
}

fn issue_session(secret: &str, credential: &Credential) -> Result<AuthSession, AuthServiceError> {
    let claims = jwt::Claims::new(&credential.username, credential.role, &credential.email);
    let token = jwt::create_token(&claims, secret)?;

    Ok(AuthSession {
        token,
        username: credential.username.clone(),
        email: credential.email.clone(),
        role: credential.role,
    })
}
