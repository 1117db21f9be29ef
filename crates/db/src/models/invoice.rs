//! Invoice, invoice item and payment models and DTOs.

use adala_core::billing::{balance, effective_status};
use adala_core::pagination::SortDirection;
use adala_core::types::{Date, DbId, Minor, Timestamp};
use adala_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An invoice row from the `invoices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub invoice_number: String,
    pub client_id: DbId,
    pub case_id: Option<DbId>,
    pub issue_date: Date,
    pub due_date: Date,
    pub currency: String,
    pub subtotal_minor: Minor,
    pub discount_minor: Minor,
    pub tax_rate_bps: i32,
    pub tax_minor: Minor,
    pub total_minor: Minor,
    pub paid_minor: Minor,
    pub status: String,
    pub notes: Option<String>,
    pub sent_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Invoice {
    /// Replace the stored status with the one shown to clients
    /// (`overdue` for unpaid invoices past their due date).
    pub fn present(mut self, today: Date) -> Self {
        self.status = effective_status(&self.status, self.due_date, today).to_string();
        self
    }

    pub fn balance_minor(&self) -> Minor {
        balance(self.total_minor, self.paid_minor)
    }
}

/// An invoice with client / case display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvoiceListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invoice: Invoice,
    pub client_name: String,
    pub client_name_ar: Option<String>,
    pub case_number: Option<String>,
}

/// A row from the `invoice_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvoiceItem {
    pub id: DbId,
    pub invoice_id: DbId,
    pub description: String,
    pub quantity: f64,
    pub unit_price_minor: Minor,
    pub line_total_minor: Minor,
    pub sort_order: i32,
}

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub invoice_id: DbId,
    pub amount_minor: Minor,
    pub method: String,
    pub paid_on: Date,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// One line of an invoice as submitted by the client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceItemInput {
    #[validate(
        length(min = 1, max = 500, message = "Item description must be 1-500 characters"),
        custom(function = "validate_not_blank")
    )]
    pub description: String,
    pub quantity: f64,
    pub unit_price_minor: Minor,
}

/// An item with its computed total, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price_minor: Minor,
    pub line_total_minor: Minor,
}

/// DTO for creating a new invoice.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoice {
    pub client_id: DbId,
    pub case_id: Option<DbId>,
    /// Defaults to today if omitted.
    pub issue_date: Option<Date>,
    pub due_date: Date,
    /// ISO 4217 code; defaults to `SAR`.
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    pub discount_minor: Option<Minor>,
    pub tax_rate_bps: Option<i32>,
    pub notes: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<InvoiceItemInput>,
}

/// DTO for updating a draft invoice. When `items` is present the lines
/// are replaced wholesale.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInvoice {
    pub case_id: Option<DbId>,
    pub issue_date: Option<Date>,
    pub due_date: Option<Date>,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    pub discount_minor: Option<Minor>,
    pub tax_rate_bps: Option<i32>,
    pub notes: Option<String>,
    #[validate(nested)]
    pub items: Option<Vec<InvoiceItemInput>>,
}

/// Resolved header values written on create/update.
#[derive(Debug, Clone)]
pub struct InvoiceHeader {
    pub client_id: DbId,
    pub case_id: Option<DbId>,
    pub issue_date: Date,
    pub due_date: Date,
    pub currency: String,
    pub tax_rate_bps: i32,
    pub notes: Option<String>,
}

/// Request body for `POST /invoices/{id}/payments`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePayment {
    #[validate(range(min = 1, message = "Payment amount must be positive"))]
    pub amount_minor: Minor,
    pub method: String,
    /// Defaults to today if omitted.
    pub paid_on: Option<Date>,
    #[validate(length(max = 100))]
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Query parameters for `GET /invoices`.
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    /// Matches invoice number, client name (both languages) and case number.
    pub search: Option<String>,
    pub client_id: Option<DbId>,
    pub case_id: Option<DbId>,
    /// Any invoice status, including the derived `overdue`.
    pub status: Option<String>,
    pub issued_from: Option<Date>,
    pub issued_to: Option<Date>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
