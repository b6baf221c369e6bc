/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use spendlog_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = spendlog_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use spendlog_shared::auth::middleware::authorize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                      # Health check (public)
/// └── /api/
///     ├── /auth/                   # register, login, me, logout
///     ├── /expense-categories/     # category CRUD + aggregates
///     ├── /expenses/               # owner-scoped expense CRUD + aggregates
///     └── /users/                  # person directory CRUD
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Route policy enforcement (one layer over everything; public routes
///    pass through, everything else requires a valid token and the role the
///    policy table demands)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/me", get(routes::auth::me))
        .route("/logout", post(routes::auth::logout));

    let category_routes = Router::new()
        .route("/", post(routes::categories::create))
        .route("/", get(routes::categories::list))
        .route("/active", get(routes::categories::list_active))
        .route("/search", get(routes::categories::search))
        .route("/popular", get(routes::categories::popular))
        .route("/count", get(routes::categories::count))
        .route("/count/active", get(routes::categories::count_active))
        .route("/name/:name", get(routes::categories::get_by_name))
        .route("/:id", get(routes::categories::get_by_id))
        .route("/:id", put(routes::categories::update))
        .route("/:id", delete(routes::categories::delete))
        .route("/:id/deactivate", patch(routes::categories::deactivate))
        .route("/:id/exists", get(routes::categories::exists));

    let expense_routes = Router::new()
        .route("/", post(routes::expenses::create))
        .route("/", get(routes::expenses::list))
        .route("/paginated", get(routes::expenses::list_paginated))
        .route("/date-range", get(routes::expenses::list_by_date_range))
        .route("/search", get(routes::expenses::search))
        .route("/total", get(routes::expenses::total))
        .route("/total/date-range", get(routes::expenses::total_by_date_range))
        .route("/recent", get(routes::expenses::recent))
        .route("/count", get(routes::expenses::count))
        .route("/recurring", get(routes::expenses::list_recurring))
        .route("/category/:category_id", get(routes::expenses::list_by_category))
        .route("/:id", get(routes::expenses::get_by_id))
        .route("/:id", put(routes::expenses::update))
        .route("/:id", delete(routes::expenses::delete));

    let person_routes = Router::new()
        .route("/", post(routes::persons::create))
        .route("/", get(routes::persons::list))
        .route("/search", get(routes::persons::search))
        .route("/count", get(routes::persons::count))
        .route("/email/:email", get(routes::persons::get_by_email))
        .route("/:id", get(routes::persons::get_by_id))
        .route("/:id", put(routes::persons::update))
        .route("/:id", patch(routes::persons::update))
        .route("/:id", delete(routes::persons::delete))
        .route("/:id/exists", get(routes::persons::exists));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/expense-categories", category_routes)
        .nest("/expenses", expense_routes)
        .nest("/users", person_routes);

    let secret = state.config.jwt.secret.clone();

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(move |req, next| {
            authorize(secret.clone(), req, next)
        }))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
