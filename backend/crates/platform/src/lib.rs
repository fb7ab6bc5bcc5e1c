//! Platform Crate - Technical Infrastructure
//!
//! Domain-free building blocks used by the bounded contexts:
//! - Password policy and Argon2id hashing with a tunable cost
//! - HS256 JSON Web Token codec
//! - Bearer `Authorization` header parsing

pub mod bearer;
pub mod jwt;
pub mod password;
