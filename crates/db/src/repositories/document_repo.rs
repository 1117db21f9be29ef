//! Repository for the `documents` table.

use adala_core::pagination::Page;
use adala_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{QueryFilter, SortSpec};
use crate::models::document::{CreateDocument, Document, DocumentQuery, UpdateDocument};

const COLUMNS: &str = "id, entity_type, entity_id, title, title_ar, document_type, file_name, \
                        file_path, mime_type, file_size_bytes, description, uploaded_by, \
                        created_at, updated_at";

const SORT: SortSpec = SortSpec {
    allowed: &[
        ("title", "title"),
        ("document_type", "document_type"),
        ("file_name", "file_name"),
        ("file_size", "file_size_bytes"),
        ("created_at", "created_at"),
    ],
    default: "created_at",
    tiebreak: "id",
};

/// Provides CRUD operations for document metadata.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a new document record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocument,
        uploaded_by: Option<DbId>,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (entity_type, entity_id, title, title_ar, document_type,
                                    file_name, file_path, mime_type, file_size_bytes,
                                    description, uploaded_by)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'other'), $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&input.entity_type)
            .bind(input.entity_id)
            .bind(input.title.trim())
            .bind(&input.title_ar)
            .bind(&input.document_type)
            .bind(input.file_name.trim())
            .bind(input.file_path.trim())
            .bind(&input.mime_type)
            .bind(input.file_size_bytes)
            .bind(&input.description)
            .bind(uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a document by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM documents WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    fn filter(params: &DocumentQuery) -> QueryFilter {
        let mut f = QueryFilter::new();
        f.raw("deleted_at IS NULL")
            .eq_text("entity_type", params.entity_type.as_deref())
            .eq_id("entity_id", params.entity_id)
            .eq_text("document_type", params.document_type.as_deref())
            .search(
                &["title", "title_ar", "file_name", "description"],
                params.search.as_deref(),
            );
        f
    }

    /// One page of documents matching `params`.
    pub async fn list(
        pool: &PgPool,
        params: &DocumentQuery,
        page: Page,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let f = Self::filter(params);
        let n = f.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM documents {} {} LIMIT ${n} OFFSET ${}",
            f.where_clause(),
            SORT.order_by(params.sort_by.as_deref(), params.sort_dir),
            n + 1
        );
        f.bind_query_as(sqlx::query_as::<_, Document>(&query))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &DocumentQuery) -> Result<i64, sqlx::Error> {
        let f = Self::filter(params);
        let query = format!("SELECT COUNT(*) FROM documents {}", f.where_clause());
        f.bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Update document metadata. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET
                title = COALESCE($2, title),
                title_ar = COALESCE($3, title_ar),
                document_type = COALESCE($4, document_type),
                description = COALESCE($5, description)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.title_ar)
            .bind(&input.document_type)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a document by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE documents SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
