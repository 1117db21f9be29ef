//! Repository for the `hearings` table.

use adala_core::error::CoreError;
use adala_core::{case_status, hearing_status};
use adala_core::pagination::Page;
use adala_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::filter::{QueryFilter, SortSpec};
use crate::models::hearing::{
    CompleteHearing, CreateHearing, Hearing, HearingListItem, HearingQuery, UpdateHearing,
};
use crate::RepoError;

const COLUMNS: &str = "id, case_id, lawyer_id, hearing_type, status, scheduled_at, court_name, \
                        courtroom, judge_name, notes, outcome, postponement_reason, \
                        previous_hearing_id, created_at, updated_at";

const LIST_COLUMNS: &str = "h.id, h.case_id, h.lawyer_id, h.hearing_type, h.status, \
                             h.scheduled_at, h.court_name, h.courtroom, h.judge_name, h.notes, \
                             h.outcome, h.postponement_reason, h.previous_hearing_id, \
                             h.created_at, h.updated_at, \
                             c.case_number, c.title AS case_title, c.title_ar AS case_title_ar, \
                             l.full_name AS lawyer_name";

const LIST_FROM: &str = "FROM hearings h \
                         JOIN cases c ON c.id = h.case_id AND c.deleted_at IS NULL \
                         LEFT JOIN lawyers l ON l.id = h.lawyer_id AND l.deleted_at IS NULL";

const SORT: SortSpec = SortSpec {
    allowed: &[
        ("scheduled_at", "h.scheduled_at"),
        ("status", "h.status"),
        ("hearing_type", "h.hearing_type"),
        ("case_number", "c.case_number"),
        ("created_at", "h.created_at"),
    ],
    default: "h.scheduled_at",
    tiebreak: "h.id",
};

/// Provides scheduling operations for hearings.
pub struct HearingRepo;

impl HearingRepo {
    /// Insert a new hearing in `scheduled` status.
    pub async fn create(pool: &PgPool, input: &CreateHearing) -> Result<Hearing, sqlx::Error> {
        let query = format!(
            "INSERT INTO hearings (case_id, lawyer_id, hearing_type, scheduled_at, court_name,
                                   courtroom, judge_name, notes)
             VALUES ($1, $2, COALESCE($3, 'pleading'), $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hearing>(&query)
            .bind(input.case_id)
            .bind(input.lawyer_id)
            .bind(&input.hearing_type)
            .bind(input.scheduled_at)
            .bind(&input.court_name)
            .bind(&input.courtroom)
            .bind(&input.judge_name)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a hearing by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Hearing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hearings WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Hearing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a hearing with its case and lawyer display fields.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<HearingListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} WHERE h.id = $1 AND h.deleted_at IS NULL"
        );
        sqlx::query_as::<_, HearingListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM hearings WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    fn filter(params: &HearingQuery) -> QueryFilter {
        let mut f = QueryFilter::new();
        f.raw("h.deleted_at IS NULL")
            .eq_id("h.case_id", params.case_id)
            .eq_id("h.lawyer_id", params.lawyer_id)
            .eq_text("h.status", params.status.as_deref())
            .eq_text("h.hearing_type", params.hearing_type.as_deref())
            .day_from("h.scheduled_at", params.from)
            .day_to("h.scheduled_at", params.to)
            .search(
                &[
                    "c.case_number",
                    "c.title",
                    "c.title_ar",
                    "h.court_name",
                    "h.judge_name",
                    "h.notes",
                ],
                params.search.as_deref(),
            );
        f
    }

    /// One page of hearings matching `params`.
    pub async fn list(
        pool: &PgPool,
        params: &HearingQuery,
        page: Page,
    ) -> Result<Vec<HearingListItem>, sqlx::Error> {
        let f = Self::filter(params);
        let n = f.next_index();
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} {} {} LIMIT ${n} OFFSET ${}",
            f.where_clause(),
            SORT.order_by(params.sort_by.as_deref(), params.sort_dir),
            n + 1
        );
        f.bind_query_as(sqlx::query_as::<_, HearingListItem>(&query))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &HearingQuery) -> Result<i64, sqlx::Error> {
        let f = Self::filter(params);
        let query = format!("SELECT COUNT(*) {LIST_FROM} {}", f.where_clause());
        f.bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Pending hearings between now and `now + days`, soonest first.
    pub async fn upcoming(
        pool: &PgPool,
        days: i32,
        lawyer_id: Option<DbId>,
        limit: i64,
    ) -> Result<Vec<HearingListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM}
             WHERE h.deleted_at IS NULL
               AND h.status IN ('{}', '{}')
               AND h.scheduled_at >= NOW()
               AND h.scheduled_at < NOW() + make_interval(days => $1)
               AND ($2::BIGINT IS NULL OR h.lawyer_id = $2)
             ORDER BY h.scheduled_at ASC, h.id ASC
             LIMIT $3",
            hearing_status::SCHEDULED,
            hearing_status::POSTPONED,
        );
        sqlx::query_as::<_, HearingListItem>(&query)
            .bind(days)
            .bind(lawyer_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a hearing. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHearing,
    ) -> Result<Option<Hearing>, sqlx::Error> {
        let query = format!(
            "UPDATE hearings SET
                lawyer_id = COALESCE($2, lawyer_id),
                hearing_type = COALESCE($3, hearing_type),
                scheduled_at = COALESCE($4, scheduled_at),
                court_name = COALESCE($5, court_name),
                courtroom = COALESCE($6, courtroom),
                judge_name = COALESCE($7, judge_name),
                notes = COALESCE($8, notes)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hearing>(&query)
            .bind(id)
            .bind(input.lawyer_id)
            .bind(&input.hearing_type)
            .bind(input.scheduled_at)
            .bind(&input.court_name)
            .bind(&input.courtroom)
            .bind(&input.judge_name)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Lock a live hearing row for the rest of the transaction.
    async fn lock(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<Hearing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hearings WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        sqlx::query_as::<_, Hearing>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Move a pending hearing to a new date.
    pub async fn postpone(
        pool: &PgPool,
        id: DbId,
        scheduled_at: Timestamp,
        reason: &str,
    ) -> Result<Option<Hearing>, RepoError> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };
        hearing_status::check_postpone(&current.status)?;

        let query = format!(
            "UPDATE hearings SET status = $2, scheduled_at = $3, postponement_reason = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let hearing = sqlx::query_as::<_, Hearing>(&query)
            .bind(id)
            .bind(hearing_status::POSTPONED)
            .bind(scheduled_at)
            .bind(reason.trim())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(hearing))
    }

    /// Record the outcome of a pending hearing and optionally schedule the
    /// next session of the same case. Both writes share one transaction.
    ///
    /// The follow-up is refused while the case is closed or archived; the
    /// case row stays locked until commit.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        input: &CompleteHearing,
    ) -> Result<Option<(Hearing, Option<Hearing>)>, RepoError> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };
        hearing_status::check_complete(&current.status)?;

        let query = format!(
            "UPDATE hearings SET status = $2, outcome = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let completed = sqlx::query_as::<_, Hearing>(&query)
            .bind(id)
            .bind(hearing_status::COMPLETED)
            .bind(input.outcome.trim())
            .fetch_one(&mut *tx)
            .await?;

        let next = match &input.next_hearing {
            Some(follow_up) => {
                let status: String = sqlx::query_scalar(
                    "SELECT status FROM cases WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
                )
                .bind(completed.case_id)
                .fetch_one(&mut *tx)
                .await?;
                if case_status::is_closed(&status) {
                    return Err(CoreError::Conflict(format!(
                        "Cannot schedule a hearing on a '{status}' case"
                    ))
                    .into());
                }

                let query = format!(
                    "INSERT INTO hearings (case_id, lawyer_id, hearing_type, scheduled_at,
                                           court_name, courtroom, judge_name,
                                           previous_hearing_id)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                     RETURNING {COLUMNS}"
                );
                let hearing_type = follow_up
                    .hearing_type
                    .as_deref()
                    .unwrap_or(&completed.hearing_type);
                let next = sqlx::query_as::<_, Hearing>(&query)
                    .bind(completed.case_id)
                    .bind(completed.lawyer_id)
                    .bind(hearing_type)
                    .bind(follow_up.scheduled_at)
                    .bind(&completed.court_name)
                    .bind(&completed.courtroom)
                    .bind(&completed.judge_name)
                    .bind(completed.id)
                    .fetch_one(&mut *tx)
                    .await?;
                Some(next)
            }
            None => None,
        };

        tx.commit().await?;
        Ok(Some((completed, next)))
    }

    /// Cancel a pending hearing. A reason, if given, is kept as the outcome.
    pub async fn cancel(
        pool: &PgPool,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<Option<Hearing>, RepoError> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };
        hearing_status::check_cancel(&current.status)?;

        let query = format!(
            "UPDATE hearings SET status = $2, outcome = COALESCE($3, outcome)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let hearing = sqlx::query_as::<_, Hearing>(&query)
            .bind(id)
            .bind(hearing_status::CANCELLED)
            .bind(reason.map(str::trim).filter(|r| !r.is_empty()))
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(hearing))
    }

    /// Soft-delete a hearing by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE hearings SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
