//! Repository for the `invoices`, `invoice_items` and `payments` tables.
//!
//! Every write that touches more than one row runs in a transaction that
//! first locks the invoice (`SELECT ... FOR UPDATE`), so concurrent
//! payments or edits serialize on the invoice and totals stay consistent.

use adala_core::billing::{self, InvoiceTotals};
use adala_core::error::CoreError;
use adala_core::pagination::Page;
use adala_core::reference::format_invoice_number;
use adala_core::types::{Date, DbId, Minor};
use chrono::Datelike;
use sqlx::{PgPool, Postgres, Transaction};

use crate::filter::{BindValue, QueryFilter, SortSpec};
use crate::models::invoice::{
    CreatePayment, Invoice, InvoiceHeader, InvoiceItem, InvoiceListItem, InvoiceQuery,
    NewInvoiceItem, Payment,
};
use crate::RepoError;

const COLUMNS: &str = "id, invoice_number, client_id, case_id, issue_date, due_date, currency, \
                        subtotal_minor, discount_minor, tax_rate_bps, tax_minor, total_minor, \
                        paid_minor, status, notes, sent_at, created_by, created_at, updated_at";

const LIST_COLUMNS: &str = "i.id, i.invoice_number, i.client_id, i.case_id, i.issue_date, \
                             i.due_date, i.currency, i.subtotal_minor, i.discount_minor, \
                             i.tax_rate_bps, i.tax_minor, i.total_minor, i.paid_minor, i.status, \
                             i.notes, i.sent_at, i.created_by, i.created_at, i.updated_at, \
                             cl.name AS client_name, cl.name_ar AS client_name_ar, \
                             c.case_number";

const LIST_FROM: &str = "FROM invoices i \
                         JOIN clients cl ON cl.id = i.client_id \
                         LEFT JOIN cases c ON c.id = i.case_id";

const ITEM_COLUMNS: &str =
    "id, invoice_id, description, quantity, unit_price_minor, line_total_minor, sort_order";

const PAYMENT_COLUMNS: &str =
    "id, invoice_id, amount_minor, method, paid_on, reference, notes, recorded_by, created_at";

const SORT: SortSpec = SortSpec {
    allowed: &[
        ("invoice_number", "i.invoice_number"),
        ("issue_date", "i.issue_date"),
        ("due_date", "i.due_date"),
        ("total", "i.total_minor"),
        ("status", "i.status"),
        ("client_name", "cl.name"),
        ("created_at", "i.created_at"),
    ],
    default: "i.issue_date",
    tiebreak: "i.id",
};

/// Invoices with their lines and payments.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Insert a draft invoice with its lines. The number is drawn from
    /// `invoice_number_seq` inside the same transaction.
    pub async fn create(
        pool: &PgPool,
        header: &InvoiceHeader,
        items: &[NewInvoiceItem],
        totals: &InvoiceTotals,
        created_by: Option<DbId>,
    ) -> Result<Invoice, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let seq: i64 = sqlx::query_scalar("SELECT nextval('invoice_number_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let number = format_invoice_number(header.issue_date.year(), seq);

        let query = format!(
            "INSERT INTO invoices (invoice_number, client_id, case_id, issue_date, due_date,
                                   currency, subtotal_minor, discount_minor, tax_rate_bps,
                                   tax_minor, total_minor, notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        let invoice = sqlx::query_as::<_, Invoice>(&query)
            .bind(&number)
            .bind(header.client_id)
            .bind(header.case_id)
            .bind(header.issue_date)
            .bind(header.due_date)
            .bind(&header.currency)
            .bind(totals.subtotal_minor)
            .bind(totals.discount_minor)
            .bind(header.tax_rate_bps)
            .bind(totals.tax_minor)
            .bind(totals.total_minor)
            .bind(&header.notes)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_items(&mut tx, invoice.id, items).await?;

        tx.commit().await?;
        Ok(invoice)
    }

    /// Rewrite a draft invoice. When `items` is `Some` the lines are
    /// replaced; otherwise the stored lines are kept and totals recomputed
    /// against the new discount and tax rate.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        header: &InvoiceHeader,
        discount_minor: Minor,
        items: Option<&[NewInvoiceItem]>,
    ) -> Result<Option<Invoice>, RepoError> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };
        billing::check_editable(&current.status)?;

        let line_totals: Vec<Minor> = match items {
            Some(items) => items.iter().map(|i| i.line_total_minor).collect(),
            None => {
                sqlx::query_scalar(
                    "SELECT line_total_minor FROM invoice_items WHERE invoice_id = $1",
                )
                .bind(id)
                .fetch_all(&mut *tx)
                .await?
            }
        };
        let totals = billing::compute_totals(&line_totals, discount_minor, header.tax_rate_bps)?;

        let query = format!(
            "UPDATE invoices SET
                case_id = $2, issue_date = $3, due_date = $4, currency = $5,
                subtotal_minor = $6, discount_minor = $7, tax_rate_bps = $8,
                tax_minor = $9, total_minor = $10, notes = $11
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let invoice = sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(header.case_id)
            .bind(header.issue_date)
            .bind(header.due_date)
            .bind(&header.currency)
            .bind(totals.subtotal_minor)
            .bind(totals.discount_minor)
            .bind(header.tax_rate_bps)
            .bind(totals.tax_minor)
            .bind(totals.total_minor)
            .bind(&header.notes)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(items) = items {
            sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_items(&mut tx, id, items).await?;
        }

        tx.commit().await?;
        Ok(Some(invoice))
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        invoice_id: DbId,
        items: &[NewInvoiceItem],
    ) -> Result<(), sqlx::Error> {
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO invoice_items
                    (invoice_id, description, quantity, unit_price_minor, line_total_minor, sort_order)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(invoice_id)
            .bind(item.description.trim())
            .bind(item.quantity)
            .bind(item.unit_price_minor)
            .bind(item.line_total_minor)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invoices WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Find an invoice row by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invoices WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an invoice with its client and case display fields.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InvoiceListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} WHERE i.id = $1 AND i.deleted_at IS NULL"
        );
        sqlx::query_as::<_, InvoiceListItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn list_items(
        pool: &PgPool,
        invoice_id: DbId,
    ) -> Result<Vec<InvoiceItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = $1
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, InvoiceItem>(&query)
            .bind(invoice_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_payments(
        pool: &PgPool,
        invoice_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE invoice_id = $1
             ORDER BY paid_on ASC, id ASC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(invoice_id)
            .fetch_all(pool)
            .await
    }

    fn filter(params: &InvoiceQuery) -> QueryFilter {
        let mut f = QueryFilter::new();
        f.raw("i.deleted_at IS NULL")
            .eq_id("i.client_id", params.client_id)
            .eq_id("i.case_id", params.case_id)
            .date_from("i.issue_date", params.issued_from)
            .date_to("i.issue_date", params.issued_to)
            .search(
                &["i.invoice_number", "cl.name", "cl.name_ar", "c.case_number"],
                params.search.as_deref(),
            );

        // Filter on the status clients see, where unpaid past-due invoices
        // read as `overdue`.
        match params.status.as_deref().map(str::trim) {
            Some(billing::OVERDUE) => {
                f.raw(format!(
                    "i.status IN ('{}', '{}') AND i.due_date < CURRENT_DATE",
                    billing::SENT,
                    billing::PARTIALLY_PAID
                ));
            }
            Some(status @ (billing::SENT | billing::PARTIALLY_PAID)) => {
                f.bind_condition(
                    |p| format!("i.status = {p} AND i.due_date >= CURRENT_DATE"),
                    BindValue::Text(status.to_string()),
                );
            }
            other => {
                f.eq_text("i.status", other);
            }
        }
        f
    }

    /// One page of invoices matching `params`. Stored statuses are returned;
    /// callers present them with [`Invoice::present`].
    pub async fn list(
        pool: &PgPool,
        params: &InvoiceQuery,
        page: Page,
    ) -> Result<Vec<InvoiceListItem>, sqlx::Error> {
        let f = Self::filter(params);
        let n = f.next_index();
        let query = format!(
            "SELECT {LIST_COLUMNS} {LIST_FROM} {} {} LIMIT ${n} OFFSET ${}",
            f.where_clause(),
            SORT.order_by(params.sort_by.as_deref(), params.sort_dir),
            n + 1
        );
        f.bind_query_as(sqlx::query_as::<_, InvoiceListItem>(&query))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, params: &InvoiceQuery) -> Result<i64, sqlx::Error> {
        let f = Self::filter(params);
        let query = format!("SELECT COUNT(*) {LIST_FROM} {}", f.where_clause());
        f.bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Move a draft to `sent`.
    pub async fn send(pool: &PgPool, id: DbId) -> Result<Option<Invoice>, RepoError> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };
        billing::check_send(&current.status)?;

        let query = format!(
            "UPDATE invoices SET status = $2, sent_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        let invoice = sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(billing::SENT)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(invoice))
    }

    /// Cancel an invoice that has not received any money.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Invoice>, RepoError> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };
        billing::check_cancel(&current.status, current.paid_minor)?;

        let query = format!("UPDATE invoices SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let invoice = sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(billing::CANCELLED)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(invoice))
    }

    /// Record a payment and advance the invoice's paid amount and status.
    ///
    /// Returns `None` if the invoice does not exist.
    pub async fn record_payment(
        pool: &PgPool,
        invoice_id: DbId,
        input: &CreatePayment,
        paid_on: Date,
        recorded_by: Option<DbId>,
    ) -> Result<Option<(Invoice, Payment)>, RepoError> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, invoice_id).await? else {
            return Ok(None);
        };
        if paid_on < current.issue_date {
            return Err(CoreError::Validation(
                "Payment date cannot be before the invoice issue date".into(),
            )
            .into());
        }
        let outcome = billing::apply_payment(
            &current.status,
            current.total_minor,
            current.paid_minor,
            input.amount_minor,
        )?;

        let query = format!(
            "INSERT INTO payments (invoice_id, amount_minor, method, paid_on, reference, notes,
                                   recorded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PAYMENT_COLUMNS}"
        );
        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(invoice_id)
            .bind(input.amount_minor)
            .bind(&input.method)
            .bind(paid_on)
            .bind(&input.reference)
            .bind(&input.notes)
            .bind(recorded_by)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE invoices SET paid_minor = $2, status = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let invoice = sqlx::query_as::<_, Invoice>(&query)
            .bind(invoice_id)
            .bind(outcome.paid_minor)
            .bind(outcome.status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((invoice, payment)))
    }

    /// Soft-delete an invoice. Invoices with recorded payments are kept.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, RepoError> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(false);
        };
        let payments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE invoice_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if payments > 0 || current.paid_minor > 0 {
            return Err(CoreError::Conflict(
                "Cannot delete an invoice with recorded payments".into(),
            )
            .into());
        }
        sqlx::query("UPDATE invoices SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }
}
