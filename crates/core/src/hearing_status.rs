//! Hearing lifecycle rules.
//!
//! A hearing is *pending* while scheduled or postponed; only pending
//! hearings may be postponed again, held (completed) or cancelled.

use crate::error::CoreError;

pub const SCHEDULED: &str = "scheduled";
pub const POSTPONED: &str = "postponed";
pub const COMPLETED: &str = "completed";
pub const CANCELLED: &str = "cancelled";

pub fn is_pending(status: &str) -> bool {
    status == SCHEDULED || status == POSTPONED
}

fn require_pending(status: &str, action: &str) -> Result<(), CoreError> {
    if is_pending(status) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot {action} a hearing that is '{status}'"
        )))
    }
}

pub fn check_postpone(status: &str) -> Result<(), CoreError> {
    require_pending(status, "postpone")
}

pub fn check_complete(status: &str) -> Result<(), CoreError> {
    require_pending(status, "complete")
}

pub fn check_cancel(status: &str) -> Result<(), CoreError> {
    require_pending(status, "cancel")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_hearings_accept_actions() {
        for s in [SCHEDULED, POSTPONED] {
            assert!(check_postpone(s).is_ok());
            assert!(check_complete(s).is_ok());
            assert!(check_cancel(s).is_ok());
        }
    }

    #[test]
    fn finished_hearings_reject_actions() {
        for s in [COMPLETED, CANCELLED] {
            assert!(check_postpone(s).is_err());
            assert!(check_complete(s).is_err());
            assert!(check_cancel(s).is_err());
        }
    }
}
