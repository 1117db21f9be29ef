//! Domain logic for the Adala legal-practice API.
//!
//! Pure functions and constants only; no database or HTTP dependencies.

pub mod billing;
pub mod case_status;
pub mod error;
pub mod hearing_status;
pub mod locale;
pub mod options;
pub mod pagination;
pub mod reference;
pub mod roles;
pub mod search;
pub mod types;
pub mod validation;
