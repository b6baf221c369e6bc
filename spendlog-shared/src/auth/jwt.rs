/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the authenticated username as the
/// subject plus role and email claims, so downstream authorization and
/// ownership checks never need a second credential lookup.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 24 hours
/// - **Validation**: signature, expiration, and issuer checks
/// - **Secret**: should be at least 32 bytes, loaded from `JWT_SECRET`

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::credential::Role;

/// Token issuer, checked on validation
const ISSUER: &str = "spendlog";

/// Default token lifetime
const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token failed validation (bad signature, malformed, wrong issuer)
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// JWT claims structure
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`) plus the role and email of
/// the credential, mirrored from the credentials table at issue time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username of the credential
    pub sub: String,

    /// Issuer - always "spendlog"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Role claim
    pub role: Role,

    /// Email claim
    pub email: String,
}

impl Claims {
    /// Creates new claims with the default 24h expiration
    pub fn new(username: &str, role: Role, email: &str) -> Self {
        Self::with_lifetime(username, role, email, Duration::hours(TOKEN_LIFETIME_HOURS))
    }

    /// Creates claims with a custom lifetime (used by expiry tests)
    pub fn with_lifetime(username: &str, role: Role, email: &str, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: username.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            role,
            email: email.to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed JWT from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies the signature, expiration, and issuer.
///
/// # Errors
///
/// Returns `JwtError::Expired` for expired tokens and
/// `JwtError::ValidationError` for anything else invalid.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("alice", Role::User, "a@x.com");

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, "spendlog");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.email, "a@x.com");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new("admin", Role::Admin, "admin@example.com");
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, "admin");
        assert_eq!(validated.role, Role::Admin);
        assert_eq!(validated.email, "admin@example.com");
        assert_eq!(validated.iss, "spendlog");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new("alice", Role::User, "a@x.com");
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims =
            Claims::with_lifetime("alice", Role::User, "a@x.com", Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not-a-jwt", SECRET);
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_validate_wrong_issuer() {
        // Same secret, different issuer
        let mut claims = Claims::new("alice", Role::User, "a@x.com");
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, SECRET).is_err());
    }
}
