/// Database models
///
/// One module per table:
///
/// - `credential`: authentication identities
/// - `person`: profile records (unrelated to credentials)
/// - `category`: expense categories
/// - `expense`: individual expense records

pub mod category;
pub mod credential;
pub mod expense;
pub mod person;
