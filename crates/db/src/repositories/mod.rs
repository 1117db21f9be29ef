//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. List endpoints get a
//! `list(pool, query, page)` / `count(pool, query)` pair that share one
//! [`QueryFilter`](crate::filter::QueryFilter).

pub mod case_repo;
pub mod client_repo;
pub mod dashboard_repo;
pub mod document_repo;
pub mod hearing_repo;
pub mod invoice_repo;
pub mod lawyer_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use case_repo::CaseRepo;
pub use client_repo::ClientRepo;
pub use dashboard_repo::DashboardRepo;
pub use document_repo::DocumentRepo;
pub use hearing_repo::HearingRepo;
pub use invoice_repo::InvoiceRepo;
pub use lawyer_repo::LawyerRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
