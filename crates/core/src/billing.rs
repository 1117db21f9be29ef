//! Invoice arithmetic and status rules.
//!
//! Amounts are integer minor units; tax rates are basis points (1500 = 15%).
//! `overdue` is never stored: it is derived from the stored status and the
//! due date at read time.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Date, Minor};

pub const DRAFT: &str = "draft";
pub const SENT: &str = "sent";
pub const PARTIALLY_PAID: &str = "partially_paid";
pub const PAID: &str = "paid";
pub const OVERDUE: &str = "overdue";
pub const CANCELLED: &str = "cancelled";

/// 100% expressed in basis points.
pub const MAX_TAX_RATE_BPS: i32 = 10_000;

/// Computed money columns of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal_minor: Minor,
    pub discount_minor: Minor,
    pub tax_minor: Minor,
    pub total_minor: Minor,
}

/// Total of one invoice line, rounded to the nearest minor unit.
pub fn line_total(quantity: f64, unit_price_minor: Minor) -> Result<Minor, CoreError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(CoreError::Validation(
            "Item quantity must be a positive number".into(),
        ));
    }
    if unit_price_minor < 0 {
        return Err(CoreError::Validation(
            "Item unit price must not be negative".into(),
        ));
    }
    let total = (quantity * unit_price_minor as f64).round();
    if total >= i64::MAX as f64 {
        return Err(CoreError::Validation("Item total is too large".into()));
    }
    Ok(total as Minor)
}

/// Compute subtotal, tax and grand total from line totals.
///
/// The discount is applied before tax and may not exceed the subtotal.
/// Tax is rounded half-up.
pub fn compute_totals(
    line_totals: &[Minor],
    discount_minor: Minor,
    tax_rate_bps: i32,
) -> Result<InvoiceTotals, CoreError> {
    if !(0..=MAX_TAX_RATE_BPS).contains(&tax_rate_bps) {
        return Err(CoreError::Validation(format!(
            "Tax rate must be between 0 and {MAX_TAX_RATE_BPS} basis points"
        )));
    }
    if discount_minor < 0 {
        return Err(CoreError::Validation(
            "Discount must not be negative".into(),
        ));
    }

    let subtotal_minor = line_totals
        .iter()
        .try_fold(0i64, |acc, t| acc.checked_add(*t))
        .ok_or_else(|| CoreError::Validation("Invoice subtotal is too large".into()))?;

    if discount_minor > subtotal_minor {
        return Err(CoreError::Validation(
            "Discount cannot exceed the invoice subtotal".into(),
        ));
    }

    let taxable = subtotal_minor - discount_minor;
    let tax = (i128::from(taxable) * i128::from(tax_rate_bps) + 5_000) / 10_000;
    let tax_minor = Minor::try_from(tax)
        .map_err(|_| CoreError::Validation("Invoice tax is too large".into()))?;

    let total_minor = taxable
        .checked_add(tax_minor)
        .ok_or_else(|| CoreError::Validation("Invoice total is too large".into()))?;

    Ok(InvoiceTotals {
        subtotal_minor,
        discount_minor,
        tax_minor,
        total_minor,
    })
}

pub fn balance(total_minor: Minor, paid_minor: Minor) -> Minor {
    (total_minor - paid_minor).max(0)
}

/// Stored status implied by how much has been paid on a sent invoice.
pub fn status_for_paid(total_minor: Minor, paid_minor: Minor) -> &'static str {
    if paid_minor >= total_minor {
        PAID
    } else if paid_minor > 0 {
        PARTIALLY_PAID
    } else {
        SENT
    }
}

/// Outcome of recording a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub paid_minor: Minor,
    pub status: &'static str,
}

/// Validate a payment against an invoice and compute its new state.
pub fn apply_payment(
    status: &str,
    total_minor: Minor,
    paid_minor: Minor,
    amount_minor: Minor,
) -> Result<PaymentOutcome, CoreError> {
    if amount_minor <= 0 {
        return Err(CoreError::Validation(
            "Payment amount must be positive".into(),
        ));
    }
    match status {
        DRAFT => {
            return Err(CoreError::Conflict(
                "Send the invoice before recording payments".into(),
            ))
        }
        PAID | CANCELLED => {
            return Err(CoreError::Conflict(format!(
                "Cannot record a payment on a '{status}' invoice"
            )))
        }
        _ => {}
    }

    let outstanding = balance(total_minor, paid_minor);
    if amount_minor > outstanding {
        return Err(CoreError::Validation(format!(
            "Payment of {amount_minor} exceeds the outstanding balance of {outstanding}"
        )));
    }

    let paid_minor = paid_minor + amount_minor;
    Ok(PaymentOutcome {
        paid_minor,
        status: status_for_paid(total_minor, paid_minor),
    })
}

/// Status as presented to clients: unpaid sent invoices past their due
/// date read as `overdue`.
pub fn effective_status<'a>(status: &'a str, due_date: Date, today: Date) -> &'a str {
    if (status == SENT || status == PARTIALLY_PAID) && due_date < today {
        OVERDUE
    } else {
        status
    }
}

/// Only drafts may have their lines and amounts edited.
pub fn check_editable(status: &str) -> Result<(), CoreError> {
    if status == DRAFT {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Only draft invoices can be edited (invoice is '{status}')"
        )))
    }
}

pub fn check_send(status: &str) -> Result<(), CoreError> {
    if status == DRAFT {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Only draft invoices can be sent (invoice is '{status}')"
        )))
    }
}

/// Invoices that already received money cannot be cancelled.
pub fn check_cancel(status: &str, paid_minor: Minor) -> Result<(), CoreError> {
    if status == CANCELLED || status == PAID {
        return Err(CoreError::Conflict(format!(
            "Cannot cancel a '{status}' invoice"
        )));
    }
    if paid_minor > 0 {
        return Err(CoreError::Conflict(
            "Cannot cancel an invoice with recorded payments".into(),
        ));
    }
    Ok(())
}

/// Due date must not precede the issue date.
pub fn check_dates(issue_date: Date, due_date: Date) -> Result<(), CoreError> {
    if due_date < issue_date {
        Err(CoreError::Validation(
            "Due date cannot be before the issue date".into(),
        ))
    } else {
        Ok(())
    }
}
