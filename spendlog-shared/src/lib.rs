//! # SpendLog Shared Library
//!
//! This crate contains the shared types, data access, and business logic
//! used by the SpendLog API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Token handling, password hashing, and route authorization
//! - `db`: Connection pool, migrations, and first-run seeding
//! - `service`: Domain services over the models

pub mod auth;
pub mod db;
pub mod models;
pub mod service;

/// Current version of the SpendLog shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
