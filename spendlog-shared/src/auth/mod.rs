/// Authentication and authorization
///
/// - `jwt`: token issuance and validation (HS256)
/// - `password`: Argon2id hashing and verification
/// - `policy`: the ordered route→role table
/// - `middleware`: central enforcement of the policy table

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
