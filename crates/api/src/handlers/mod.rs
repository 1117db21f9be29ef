//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod case;
pub mod client;
pub mod dashboard;
pub mod document;
pub mod hearing;
pub mod invoice;
pub mod lawyer;
pub mod options;

use adala_core::types::{Date, DbId};

use crate::error::AppError;

/// Current UTC calendar date.
pub(crate) fn today() -> Date {
    chrono::Utc::now().date_naive()
}

/// A request body names a parent record that does not exist.
pub(crate) fn missing_reference(entity: &str, id: DbId) -> AppError {
    AppError::BadRequest(format!("{entity} with id {id} does not exist"))
}
