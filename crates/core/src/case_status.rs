//! Case lifecycle rules.
//!
//! ```text
//! open ──► in_progress ──► on_hold
//!   ▲  ╲        │            │
//!   │   ╲       ▼            ▼
//!   └──── closed ◄───────────┘
//!             │
//!             ▼
//!          archived (terminal)
//! ```

use crate::error::CoreError;

pub const OPEN: &str = "open";
pub const IN_PROGRESS: &str = "in_progress";
pub const ON_HOLD: &str = "on_hold";
pub const CLOSED: &str = "closed";
pub const ARCHIVED: &str = "archived";

/// Statuses a case may move to from `from`.
pub fn allowed_transitions(from: &str) -> &'static [&'static str] {
    match from {
        OPEN => &[IN_PROGRESS, ON_HOLD, CLOSED],
        IN_PROGRESS => &[ON_HOLD, CLOSED],
        ON_HOLD => &[OPEN, IN_PROGRESS, CLOSED],
        CLOSED => &[OPEN, ARCHIVED],
        _ => &[],
    }
}

/// Validate a status change. Re-applying the current status is rejected so
/// the caller never records a no-op transition.
pub fn check_transition(from: &str, to: &str) -> Result<(), CoreError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Case cannot move from '{from}' to '{to}'"
        )))
    }
}

/// Whether a case in `status` counts as finished (and carries `closed_on`).
pub fn is_closed(status: &str) -> bool {
    status == CLOSED || status == ARCHIVED
}

/// Whether a case in `status` still appears in active work lists.
pub fn is_active(status: &str) -> bool {
    !is_closed(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(check_transition(OPEN, IN_PROGRESS).is_ok());
        assert!(check_transition(IN_PROGRESS, CLOSED).is_ok());
        assert!(check_transition(CLOSED, ARCHIVED).is_ok());
    }

    #[test]
    fn closed_cases_can_be_reopened() {
        assert!(check_transition(CLOSED, OPEN).is_ok());
    }

    #[test]
    fn archived_is_terminal() {
        for to in [OPEN, IN_PROGRESS, ON_HOLD, CLOSED] {
            assert!(check_transition(ARCHIVED, to).is_err());
        }
    }

    #[test]
    fn noop_and_unknown_transitions_are_rejected() {
        assert!(check_transition(OPEN, OPEN).is_err());
        assert!(check_transition(OPEN, ARCHIVED).is_err());
        assert!(check_transition("bogus", OPEN).is_err());
    }

    #[test]
    fn closed_flags() {
        assert!(is_closed(CLOSED));
        assert!(is_closed(ARCHIVED));
        assert!(is_active(ON_HOLD));
    }
}
