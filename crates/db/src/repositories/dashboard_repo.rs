//! Read-only aggregates for the dashboard.

use adala_core::{billing, case_status, hearing_status};
use sqlx::PgPool;

use crate::models::dashboard::{DashboardStats, StatusCount};

/// Look-ahead window for the upcoming hearings figure.
const UPCOMING_DAYS: i32 = 7;

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn stats(pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
        let active_clients: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM clients WHERE deleted_at IS NULL AND is_active = true",
        )
        .fetch_one(pool)
        .await?;

        let active_lawyers: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lawyers WHERE deleted_at IS NULL AND is_active = true",
        )
        .fetch_one(pool)
        .await?;

        let cases_by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM cases WHERE deleted_at IS NULL
             GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await?;
        let open_cases = cases_by_status
            .iter()
            .filter(|s| case_status::is_active(&s.status))
            .map(|s| s.count)
            .sum::<i64>();

        let upcoming_hearings: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM hearings h
             JOIN cases c ON c.id = h.case_id AND c.deleted_at IS NULL
             WHERE h.deleted_at IS NULL
               AND h.status IN ($1, $2)
               AND h.scheduled_at >= NOW()
               AND h.scheduled_at < NOW() + make_interval(days => $3)",
        )
        .bind(hearing_status::SCHEDULED)
        .bind(hearing_status::POSTPONED)
        .bind(UPCOMING_DAYS)
        .fetch_one(pool)
        .await?;

        let (outstanding_minor, overdue_invoices): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_minor - paid_minor), 0)::BIGINT,
                    COUNT(*) FILTER (WHERE due_date < CURRENT_DATE)
             FROM invoices
             WHERE deleted_at IS NULL AND status IN ($1, $2)",
        )
        .bind(billing::SENT)
        .bind(billing::PARTIALLY_PAID)
        .fetch_one(pool)
        .await?;

        let collected_this_month_minor: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(p.amount_minor), 0)::BIGINT
             FROM payments p
             JOIN invoices i ON i.id = p.invoice_id AND i.deleted_at IS NULL
             WHERE p.paid_on >= date_trunc('month', CURRENT_DATE)::date",
        )
        .fetch_one(pool)
        .await?;

        Ok(DashboardStats {
            active_clients,
            active_lawyers,
            open_cases,
            cases_by_status,
            upcoming_hearings,
            outstanding_minor,
            overdue_invoices,
            collected_this_month_minor,
        })
    }
}
