/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup
/// - Test credential creation with fresh usernames per test
/// - Token generation
/// - Request/response helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use spendlog_api::app::{build_router, AppState};
use spendlog_api::config::Config;
use spendlog_shared::auth::jwt::{create_token, Claims};
use spendlog_shared::auth::password::hash_password;
use spendlog_shared::models::category::{Category, CategoryFields};
use spendlog_shared::models::credential::{CreateCredential, Credential, Role};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing the app, database, and two ready-made identities
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub admin: Credential,
    pub admin_token: String,
    pub user: Credential,
    pub user_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh admin and user credential
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let admin = create_credential(&db, Role::Admin).await?;
        let user = create_credential(&db, Role::User).await?;

        let admin_token = token_for(&admin, &config.jwt.secret)?;
        let user_token = token_for(&user, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            admin,
            admin_token,
            user,
            user_token,
        })
    }

    /// Sends a request with an optional bearer token and JSON body, returning
    /// the status and parsed body
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Creates a category directly in the database
    pub async fn create_category(&self, name: &str) -> anyhow::Result<Category> {
        let category = Category::create(
            &self.db,
            CategoryFields {
                name: name.to_string(),
                description: None,
                color: None,
                icon: None,
                is_active: true,
            },
        )
        .await?;
        Ok(category)
    }
}

/// Creates a credential with a unique username/email
async fn create_credential(db: &PgPool, role: Role) -> anyhow::Result<Credential> {
    let suffix = Uuid::new_v4().simple().to_string();
    let credential = Credential::create(
        db,
        CreateCredential {
            username: format!("test-{}", &suffix[..12]),
            email: format!("test-{}@example.com", &suffix[..12]),
            password_hash: hash_password("test-password")?,
            role,
        },
    )
    .await?;
    Ok(credential)
}

/// Issues a token for a credential
fn token_for(credential: &Credential, secret: &str) -> anyhow::Result<String> {
    let claims = Claims::new(&credential.username, credential.role, &credential.email);
    Ok(create_token(&claims, secret)?)
}

/// Generates a unique name with the given prefix
pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}
