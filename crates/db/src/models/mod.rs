//! Entity models (sqlx rows) and request DTOs.

pub mod client;
pub mod dashboard;
pub mod document;
pub mod hearing;
pub mod invoice;
pub mod lawyer;
pub mod legal_case;
pub mod role;
pub mod session;
pub mod user;
