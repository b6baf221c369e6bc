/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, me, logout)
/// - `categories`: Expense category CRUD and aggregates
/// - `expenses`: Owner-scoped expense CRUD and aggregates
/// - `persons`: Person directory CRUD

pub mod auth;
pub mod categories;
pub mod expenses;
pub mod health;
pub mod persons;
