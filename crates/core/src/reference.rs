//! Human-facing reference numbers for cases and invoices.
//!
//! The sequence value comes from a Postgres sequence; only the formatting
//! lives here.

/// `CASE-2026-00042`
pub fn format_case_number(year: i32, seq: i64) -> String {
    format!("CASE-{year}-{seq:05}")
}

/// `INV-2026-00042`
pub fn format_invoice_number(year: i32, seq: i64) -> String {
    format!("INV-{year}-{seq:05}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_zero_padded() {
        assert_eq!(format_case_number(2026, 42), "CASE-2026-00042");
        assert_eq!(format_invoice_number(2026, 7), "INV-2026-00007");
    }

    #[test]
    fn large_sequences_are_not_truncated() {
        assert_eq!(format_invoice_number(2027, 1_234_567), "INV-2027-1234567");
    }
}
