/// Database layer
///
/// - `pool`: connection pool creation and health checks
/// - `migrations`: sqlx migration runner
/// - `seed`: first-run default data

pub mod migrations;
pub mod pool;
pub mod seed;
