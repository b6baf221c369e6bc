/// Credential model and database operations
///
/// A credential is an authentication identity: unique username, unique email,
/// Argon2id password hash, and a role. Credentials are created at registration
/// and never updated or deleted by the application.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE credentials (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(50) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role credential_role NOT NULL DEFAULT 'USER',
///     enabled BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role carried by a credential and embedded in issued tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "credential_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Gets role as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

/// Credential model representing an authentication identity
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Credential {
    /// Unique credential ID (UUID v4)
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,

    /// Role, immutable after creation
    pub role: Role,

    /// Whether the account may log in
    pub enabled: bool,

    /// When the credential was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new credential
#[derive(Debug, Clone)]
pub struct CreateCredential {
    pub username: String,
    pub email: String,
    /// Argon2id hash, NOT the plaintext password
    pub password_hash: String,
    pub role: Role,
}

impl Credential {
    /// Creates a new credential
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email collides with an existing
    /// row (unique constraint) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateCredential) -> Result<Self, sqlx::Error> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            INSERT INTO credentials (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, role, enabled, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(credential)
    }

    /// Finds a credential by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, username, email, password_hash, role, enabled, created_at
            FROM credentials
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }

    /// Checks whether a username is already taken
    pub async fn exists_by_username(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM credentials WHERE username = $1)")
                .bind(username)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Checks whether an email is already taken
    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM credentials WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Counts credentials, used by the seeder to detect an empty table
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM credentials")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Admin.as_str(), "ADMIN");
        assert_eq!(Role::User.as_str(), "USER");
    }

    #[test]
    fn test_role_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, Role::User);
    }

    // Integration tests for database operations are in spendlog-api/tests/
}
