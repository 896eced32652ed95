//! Authentication: JWT issuance and verification, password hashing and the
//! middleware that resolves the acting identity for every protected route.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
