//! Aggregate figures for the dashboard.

use adala_core::types::Minor;
use serde::Serialize;
use sqlx::FromRow;

/// Number of cases in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Response body for `GET /dashboard/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub active_clients: i64,
    pub active_lawyers: i64,
    pub open_cases: i64,
    pub cases_by_status: Vec<StatusCount>,
    /// Pending hearings in the next seven days.
    pub upcoming_hearings: i64,
    /// Unpaid balance across sent and partially paid invoices.
    pub outstanding_minor: Minor,
    pub overdue_invoices: i64,
    /// Payments received since the first day of the current month.
    pub collected_this_month_minor: Minor,
}
