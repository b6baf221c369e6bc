/// Authentication and authorization middleware for Axum
///
/// One middleware enforces the whole route policy table: it evaluates the
/// table for the request's method and path, validates the bearer token when
/// the matched rule requires one, checks the role, and injects an
/// [`AuthContext`] into request extensions for handlers to extract.
///
/// Failures are distinguished per the error design: missing/invalid/expired
/// token is an authentication failure (401), a valid identity lacking the
/// required role is an authorization failure (403).
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use spendlog_shared::auth::middleware::{authorize, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     format!("{} ({})", auth.username, auth.role.as_str())
/// }
///
/// let secret = "your-jwt-secret".to_string();
/// let app: Router = Router::new()
///     .route("/api/expenses", get(whoami))
///     .layer(middleware::from_fn(move |req, next| {
///         authorize(secret.clone(), req, next)
///     }));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{validate_token, JwtError};
use super::policy::{self, Decision};
use crate::models::credential::Role;

/// Identity derived from a validated token, threaded to handlers explicitly
/// via request extensions instead of ambient thread-local state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Username of the authenticated credential
    pub username: String,

    /// Role claim from the token
    pub role: Role,

    /// Email claim from the token
    pub email: String,
}

/// Error type for the authorization middleware
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header on a protected route
    MissingCredentials,

    /// Authorization header present but not a Bearer token
    InvalidFormat(String),

    /// Token failed validation (signature, expiry, issuer)
    InvalidToken(String),

    /// Valid identity but insufficient role
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Insufficient permissions".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Policy-enforcing middleware
///
/// Runs before every handler:
/// 1. Evaluates the static policy table for (method, path).
/// 2. Public match: pass through untouched.
/// 3. Otherwise: extract the bearer token, validate it, and check the role
///    against the matched rule. On success an [`AuthContext`] is added to
///    request extensions.
pub async fn authorize(secret: String, mut req: Request, next: Next) -> Result<Response, AuthError> {
    let decision = policy::evaluate(req.method(), req.uri().path());

    if decision == Decision::Allow {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    if !policy::role_permitted(decision, claims.role) {
        tracing::debug!(
            username = %claims.sub,
            role = claims.role.as_str(),
            path = req.uri().path(),
            "Role not permitted for route"
        );
        return Err(AuthError::Forbidden);
    }

    let auth_context = AuthContext {
        username: claims.sub,
        role: claims.role,
        email: claims.email,
    };
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_codes() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
