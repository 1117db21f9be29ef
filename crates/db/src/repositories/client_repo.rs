//! Repository for the `clients` table.

use adala_core::pagination::Page;
use adala_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{QueryFilter, SortSpec};
use crate::models::client::{Client, ClientQuery, CreateClient, UpdateClient};

const COLUMNS: &str = "id, client_type, name, name_ar, email, phone, national_id, \
                        commercial_register, address, notes, is_active, created_by, \
                        created_at, updated_at";

const SORT: SortSpec = SortSpec {
    allowed: &[
        ("name", "name"),
        ("name_ar", "name_ar"),
        ("client_type", "client_type"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ],
    default: "created_at",
    tiebreak: "id",
};

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    ///
    /// If `client_type` is `None` in the input, defaults to `individual`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateClient,
        created_by: Option<DbId>,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (client_type, name, name_ar, email, phone, national_id,
                                  commercial_register, address, notes, created_by)
             VALUES (COALESCE($1, 'individual'), $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.client_type)
            .bind(input.name.trim())
            .bind(&input.name_ar)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.national_id)
            .bind(&input.commercial_register)
            .bind(&input.address)
            .bind(&input.notes)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a client by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a live (not soft-deleted) client with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    fn filter(params: &ClientQuery) -> QueryFilter {
        let mut f = QueryFilter::new();
        f.raw("deleted_at IS NULL")
            .eq_text("client_type", params.client_type.as_deref())
            .eq_bool("is_active", params.is_active)
            .search(
                &["name", "name_ar", "email", "phone", "national_id"],
                params.search.as_deref(),
            );
        f
    }

    /// One page of clients matching `params`.
    pub async fn list(
        pool: &PgPool,
        params: &ClientQuery,
        page: Page,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let f = Self::filter(params);
        let n = f.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM clients {} {} LIMIT ${n} OFFSET ${}",
            f.where_clause(),
            SORT.order_by(params.sort_by.as_deref(), params.sort_dir),
            n + 1
        );
        f.bind_query_as(sqlx::query_as::<_, Client>(&query))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &ClientQuery) -> Result<i64, sqlx::Error> {
        let f = Self::filter(params);
        let query = format!("SELECT COUNT(*) FROM clients {}", f.where_clause());
        f.bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                client_type = COALESCE($2, client_type),
                name = COALESCE($3, name),
                name_ar = COALESCE($4, name_ar),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                national_id = COALESCE($7, national_id),
                commercial_register = COALESCE($8, commercial_register),
                address = COALESCE($9, address),
                notes = COALESCE($10, notes),
                is_active = COALESCE($11, is_active)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.client_type)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.name_ar)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.national_id)
            .bind(&input.commercial_register)
            .bind(&input.address)
            .bind(&input.notes)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Number of live cases and invoices still referencing the client.
    pub async fn count_dependents(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT
                (SELECT COUNT(*) FROM cases WHERE client_id = $1 AND deleted_at IS NULL)
              + (SELECT COUNT(*) FROM invoices WHERE client_id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Soft-delete a client by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
