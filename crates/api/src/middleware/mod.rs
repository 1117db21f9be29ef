//! Request extractors.
//!
//! - [`auth::AuthUser`]: the caller behind a Bearer access token.
//! - [`rbac::RequireAdmin`], [`rbac::RequireManager`]: role gates.
//! - [`locale::RequestLang`]: the language labels should be rendered in.

pub mod auth;
pub mod locale;
pub mod rbac;
