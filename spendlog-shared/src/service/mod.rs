/// Domain services
///
/// Business rules over the model layer: uniqueness enforcement, ownership
/// scoping, and session issuance. Handlers call these, never the models
/// directly.

pub mod auth;
pub mod category;
pub mod expense;
pub mod person;
