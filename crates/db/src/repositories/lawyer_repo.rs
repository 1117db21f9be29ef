//! Repository for the `lawyers` table.

use adala_core::hearing_status;
use adala_core::pagination::Page;
use adala_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{QueryFilter, SortSpec};
use crate::models::lawyer::{CreateLawyer, Lawyer, LawyerQuery, UpdateLawyer};

const COLUMNS: &str = "id, user_id, full_name, full_name_ar, email, phone, license_number, \
                        specialization, hourly_rate_minor, is_active, created_at, updated_at";

const SORT: SortSpec = SortSpec {
    allowed: &[
        ("full_name", "full_name"),
        ("full_name_ar", "full_name_ar"),
        ("license_number", "license_number"),
        ("specialization", "specialization"),
        ("hourly_rate", "hourly_rate_minor"),
        ("created_at", "created_at"),
    ],
    default: "full_name",
    tiebreak: "id",
};

/// Provides CRUD operations for lawyers.
pub struct LawyerRepo;

impl LawyerRepo {
    /// Insert a new lawyer, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLawyer) -> Result<Lawyer, sqlx::Error> {
        let query = format!(
            "INSERT INTO lawyers (user_id, full_name, full_name_ar, email, phone,
                                  license_number, specialization, hourly_rate_minor)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'general'), COALESCE($8, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lawyer>(&query)
            .bind(input.user_id)
            .bind(input.full_name.trim())
            .bind(&input.full_name_ar)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.license_number.trim())
            .bind(&input.specialization)
            .bind(input.hourly_rate_minor)
            .fetch_one(pool)
            .await
    }

    /// Find a lawyer by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lawyer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lawyers WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Lawyer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The lawyer profile linked to a login account, if any.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Lawyer>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM lawyers WHERE user_id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Lawyer>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a live lawyer with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM lawyers WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    fn filter(params: &LawyerQuery) -> QueryFilter {
        let mut f = QueryFilter::new();
        f.raw("deleted_at IS NULL")
            .eq_text("specialization", params.specialization.as_deref())
            .eq_bool("is_active", params.is_active)
            .search(
                &["full_name", "full_name_ar", "email", "license_number"],
                params.search.as_deref(),
            );
        f
    }

    /// One page of lawyers matching `params`.
    pub async fn list(
        pool: &PgPool,
        params: &LawyerQuery,
        page: Page,
    ) -> Result<Vec<Lawyer>, sqlx::Error> {
        let f = Self::filter(params);
        let n = f.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM lawyers {} {} LIMIT ${n} OFFSET ${}",
            f.where_clause(),
            SORT.order_by(params.sort_by.as_deref(), params.sort_dir),
            n + 1
        );
        f.bind_query_as(sqlx::query_as::<_, Lawyer>(&query))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &LawyerQuery) -> Result<i64, sqlx::Error> {
        let f = Self::filter(params);
        let query = format!("SELECT COUNT(*) FROM lawyers {}", f.where_clause());
        f.bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Update a lawyer. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLawyer,
    ) -> Result<Option<Lawyer>, sqlx::Error> {
        let query = format!(
            "UPDATE lawyers SET
                user_id = COALESCE($2, user_id),
                full_name = COALESCE($3, full_name),
                full_name_ar = COALESCE($4, full_name_ar),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                license_number = COALESCE($7, license_number),
                specialization = COALESCE($8, specialization),
                hourly_rate_minor = COALESCE($9, hourly_rate_minor),
                is_active = COALESCE($10, is_active)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lawyer>(&query)
            .bind(id)
            .bind(input.user_id)
            .bind(input.full_name.as_deref().map(str::trim))
            .bind(&input.full_name_ar)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.license_number.as_deref().map(str::trim))
            .bind(&input.specialization)
            .bind(input.hourly_rate_minor)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a lawyer and remove them from case teams.
    ///
    /// Cases they lead keep their history; `lead_lawyer_id` is cleared, as is
    /// the lawyer on hearings that are still pending.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "UPDATE lawyers SET deleted_at = NOW(), is_active = false
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }
        sqlx::query("DELETE FROM case_lawyers WHERE lawyer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE cases SET lead_lawyer_id = NULL WHERE lead_lawyer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE hearings SET lawyer_id = NULL
             WHERE lawyer_id = $1 AND status IN ($2, $3) AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(hearing_status::SCHEDULED)
        .bind(hearing_status::POSTPONED)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(true)
    }
}
