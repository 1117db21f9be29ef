//! Authentication primitives.
//!
//! - [`password`]: Argon2id hashing and the password length policy.
//! - [`jwt`]: access tokens and opaque refresh tokens.

pub mod jwt;
pub mod password;
