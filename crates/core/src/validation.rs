//! Field-level validators shared by request DTOs.
//!
//! These plug into `#[validate(custom(function = ...))]` attributes on the
//! `adala-db` DTOs.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Phone numbers: optional leading `+`, then digits with optional spaces,
/// dashes or parentheses; 7 to 15 digits in total (E.164 upper bound).
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-]+$").expect("phone regex is valid"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if PHONE_RE.is_match(phone) && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(error("phone", "Invalid phone number"))
    }
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Must not be blank"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_phone_formats() {
        assert!(validate_phone("+966 50 123 4567").is_ok());
        assert!(validate_phone("050-123-4567").is_ok());
        assert!(validate_phone("(011) 4567890").is_ok());
    }

    #[test]
    fn rejects_malformed_phones() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("phone: 0501234567").is_err());
        assert!(validate_phone("+1234567890123456").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn blank_detection() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank(" x ").is_ok());
    }
}
