//! Repository for the `cases` and `case_lawyers` tables.

use adala_core::case_status;
use adala_core::pagination::Page;
use adala_core::reference::format_case_number;
use adala_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::filter::{BindValue, QueryFilter, SortSpec};
use crate::models::legal_case::{
    CaseLawyer, CaseListItem, CaseQuery, CreateCase, LegalCase, UpdateCase,
};

const COLUMNS: &str = "id, case_number, title, title_ar, description, client_id, \
                        lead_lawyer_id, case_type, status, priority, court_name, \
                        court_reference, opponent_name, opened_on, closed_on, created_by, \
                        created_at, updated_at";

/// Case columns plus client and lead lawyer display names.
const LIST_COLUMNS: &str = "c.id, c.case_number, c.title, c.title_ar, c.description, \
                             c.client_id, c.lead_lawyer_id, c.case_type, c.status, c.priority, \
                             c.court_name, c.court_reference, c.opponent_name, c.opened_on, \
                             c.closed_on, c.created_by, c.created_at, c.updated_at, \
                             cl.name AS client_name, cl.name_ar AS client_name_ar, \
                             l.full_name AS lead_lawyer_name";

const LIST_FROM: &str = "FROM cases c \
                         JOIN clients cl ON cl.id = c.client_id \
                         LEFT JOIN lawyers l ON l.id = c.lead_lawyer_id";

const SORT: SortSpec = SortSpec {
    allowed: &[
        ("case_number", "c.case_number"),
        ("title", "c.title"),
        ("status", "c.status"),
        ("priority", "c.priority"),
        ("opened_on", "c.opened_on"),
        ("client_name", "cl.name"),
        ("created_at", "c.created_at"),
        ("updated_at", "c.updated_at"),
    ],
    default: "c.created_at",
    tiebreak: "c.id",
};

const TEAM_COLUMNS: &str = "cl.case_id, cl.lawyer_id, cl.role, cl.assigned_at, \
                             l.full_name, l.full_name_ar";

/// Provides CRUD, status and team operations for cases.
pub struct CaseRepo;

impl CaseRepo {
    /// Draw the next `CASE-<year>-<seq>` reference from `case_number_seq`.
    pub async fn next_case_number(pool: &PgPool, year: i32) -> Result<String, sqlx::Error> {
        let seq: i64 = sqlx::query_scalar("SELECT nextval('case_number_seq')")
            .fetch_one(pool)
            .await?;
        Ok(format_case_number(year, seq))
    }

    /// Insert a new case. When a lead lawyer is given they also join the
    /// team with the `lead` role.
    pub async fn create(
        pool: &PgPool,
        case_number: &str,
        input: &CreateCase,
        created_by: Option<DbId>,
    ) -> Result<LegalCase, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO cases (case_number, title, title_ar, description, client_id,
                                lead_lawyer_id, case_type, priority, court_name,
                                court_reference, opponent_name, opened_on, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'medium'), $9, $10, $11,
                     COALESCE($12, CURRENT_DATE), $13)
             RETURNING {COLUMNS}"
        );
        let case = sqlx::query_as::<_, LegalCase>(&query)
            .bind(case_number)
            .bind(input.title.trim())
            .bind(&input.title_ar)
            .bind(&input.description)
            .bind(input.client_id)
            .bind(input.lead_lawyer_id)
            .bind(&input.case_type)
            .bind(&input.priority)
            .bind(&input.court_name)
            .bind(&input.court_reference)
            .bind(&input.opponent_name)
            .bind(input.opened_on)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(lawyer_id) = case.lead_lawyer_id {
            sqlx::query(
                "INSERT INTO case_lawyers (case_id, lawyer_id, role) VALUES ($1, $2, 'lead')",
            )
            .bind(case.id)
            .bind(lawyer_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(case)
    }

    /// Find a case row by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LegalCase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cases WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, LegalCase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a case with its client and lead lawyer names.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<CaseListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} WHERE c.id = $1 AND c.deleted_at IS NULL"
        );
        sqlx::query_as::<_, CaseListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cases WHERE id = $1 AND deleted_at IS NULL)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    fn filter(params: &CaseQuery) -> QueryFilter {
        let mut f = QueryFilter::new();
        f.raw("c.deleted_at IS NULL")
            .eq_text("c.status", params.status.as_deref())
            .eq_text("c.case_type", params.case_type.as_deref())
            .eq_text("c.priority", params.priority.as_deref())
            .eq_id("c.client_id", params.client_id)
            .date_from("c.opened_on", params.opened_from)
            .date_to("c.opened_on", params.opened_to)
            .search(
                &[
                    "c.case_number",
                    "c.title",
                    "c.title_ar",
                    "c.opponent_name",
                    "c.court_reference",
                ],
                params.search.as_deref(),
            );
        if let Some(lawyer_id) = params.lawyer_id {
            f.bind_condition(
                |p| {
                    format!(
                        "(c.lead_lawyer_id = {p} OR EXISTS (SELECT 1 FROM case_lawyers t \
                         WHERE t.case_id = c.id AND t.lawyer_id = {p}))"
                    )
                },
                BindValue::BigInt(lawyer_id),
            );
        }
        if params.active_only.unwrap_or(false) {
            f.raw(format!(
                "c.status NOT IN ('{}', '{}')",
                case_status::CLOSED,
                case_status::ARCHIVED
            ));
        }
        f
    }

    /// One page of cases matching `params`.
    pub async fn list(
        pool: &PgPool,
        params: &CaseQuery,
        page: Page,
    ) -> Result<Vec<CaseListItem>, sqlx::Error> {
        let f = Self::filter(params);
        let n = f.next_index();
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} {} {} LIMIT ${n} OFFSET ${}",
            f.where_clause(),
            SORT.order_by(params.sort_by.as_deref(), params.sort_dir),
            n + 1
        );
        f.bind_query_as(sqlx::query_as::<_, CaseListItem>(&query))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &CaseQuery) -> Result<i64, sqlx::Error> {
        let f = Self::filter(params);
        let query = format!("SELECT COUNT(*) {LIST_FROM} {}", f.where_clause());
        f.bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Update a case. Only non-`None` fields in `input` are applied.
    ///
    /// A new lead lawyer takes the `lead` team role; the previous lead
    /// stays on the team as an associate.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCase,
    ) -> Result<Option<LegalCase>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE cases SET
                title = COALESCE($2, title),
                title_ar = COALESCE($3, title_ar),
                description = COALESCE($4, description),
                client_id = COALESCE($5, client_id),
                lead_lawyer_id = COALESCE($6, lead_lawyer_id),
                case_type = COALESCE($7, case_type),
                priority = COALESCE($8, priority),
                court_name = COALESCE($9, court_name),
                court_reference = COALESCE($10, court_reference),
                opponent_name = COALESCE($11, opponent_name),
                opened_on = COALESCE($12, opened_on)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let case = sqlx::query_as::<_, LegalCase>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.title_ar)
            .bind(&input.description)
            .bind(input.client_id)
            .bind(input.lead_lawyer_id)
            .bind(&input.case_type)
            .bind(&input.priority)
            .bind(&input.court_name)
            .bind(&input.court_reference)
            .bind(&input.opponent_name)
            .bind(input.opened_on)
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(_), Some(lawyer_id)) = (&case, input.lead_lawyer_id) {
            Self::promote_lead(&mut tx, id, lawyer_id).await?;
        }

        tx.commit().await?;
        Ok(case)
    }

    /// Set the status, and `closed_on` alongside it (`None` clears it).
    pub async fn change_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        closed_on: Option<Date>,
    ) -> Result<Option<LegalCase>, sqlx::Error> {
        let query = format!(
            "UPDATE cases SET status = $2, closed_on = $3
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LegalCase>(&query)
            .bind(id)
            .bind(status)
            .bind(closed_on)
            .fetch_optional(pool)
            .await
    }

    /// Number of live invoices billed against the case.
    pub async fn count_invoices(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM invoices WHERE case_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Soft-delete a case together with its hearings.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "UPDATE cases SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        sqlx::query(
            "UPDATE hearings SET deleted_at = NOW() WHERE case_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Team
    // -----------------------------------------------------------------------

    /// Lawyers assigned to a case, lead first.
    pub async fn list_team(pool: &PgPool, case_id: DbId) -> Result<Vec<CaseLawyer>, sqlx::Error> {
        let query = format!(
            "SELECT {TEAM_COLUMNS} FROM case_lawyers cl
             JOIN lawyers l ON l.id = cl.lawyer_id AND l.deleted_at IS NULL
             WHERE cl.case_id = $1
             ORDER BY (cl.role = 'lead') DESC, cl.assigned_at ASC, cl.lawyer_id ASC"
        );
        sqlx::query_as::<_, CaseLawyer>(&query)
            .bind(case_id)
            .fetch_all(pool)
            .await
    }

    /// Add a lawyer to the team, or change their role if already assigned.
    ///
    /// Assigning the `lead` role also makes them the case's lead lawyer.
    pub async fn assign_lawyer(
        pool: &PgPool,
        case_id: DbId,
        lawyer_id: DbId,
        role: &str,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        if role == "lead" {
            sqlx::query("UPDATE cases SET lead_lawyer_id = $2 WHERE id = $1")
                .bind(case_id)
                .bind(lawyer_id)
                .execute(&mut *tx)
                .await?;
            Self::promote_lead(&mut tx, case_id, lawyer_id).await?;
        } else {
            sqlx::query(
                "INSERT INTO case_lawyers (case_id, lawyer_id, role) VALUES ($1, $2, $3)
                 ON CONFLICT (case_id, lawyer_id) DO UPDATE SET role = EXCLUDED.role",
            )
            .bind(case_id)
            .bind(lawyer_id)
            .bind(role)
            .execute(&mut *tx)
            .await?;
            // Demoting the lead leaves the case without one.
            sqlx::query(
                "UPDATE cases SET lead_lawyer_id = NULL WHERE id = $1 AND lead_lawyer_id = $2",
            )
            .bind(case_id)
            .bind(lawyer_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Remove a lawyer from the team. Returns `true` if they were assigned.
    pub async fn unassign_lawyer(
        pool: &PgPool,
        case_id: DbId,
        lawyer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM case_lawyers WHERE case_id = $1 AND lawyer_id = $2")
            .bind(case_id)
            .bind(lawyer_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE cases SET lead_lawyer_id = NULL WHERE id = $1 AND lead_lawyer_id = $2")
            .bind(case_id)
            .bind(lawyer_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn promote_lead(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        case_id: DbId,
        lawyer_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE case_lawyers SET role = 'associate'
             WHERE case_id = $1 AND role = 'lead' AND lawyer_id <> $2",
        )
        .bind(case_id)
        .bind(lawyer_id)
        .execute(&mut **tx)
        .await?;
        sqlx::query(
            "INSERT INTO case_lawyers (case_id, lawyer_id, role) VALUES ($1, $2, 'lead')
             ON CONFLICT (case_id, lawyer_id) DO UPDATE SET role = 'lead'",
        )
        .bind(case_id)
        .bind(lawyer_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
