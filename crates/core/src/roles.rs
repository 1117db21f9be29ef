//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_LAWYER: &str = "lawyer";
pub const ROLE_STAFF: &str = "staff";

/// Seeded role ids, in the order the migration inserts them.
pub const ROLE_ADMIN_ID: i64 = 1;
pub const ROLE_LAWYER_ID: i64 = 2;
pub const ROLE_STAFF_ID: i64 = 3;

/// Managers may delete practice records (clients, cases, invoices).
pub fn is_manager(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_LAWYER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_lawyer_are_managers() {
        assert!(is_manager(ROLE_ADMIN));
        assert!(is_manager(ROLE_LAWYER));
        assert!(!is_manager(ROLE_STAFF));
        assert!(!is_manager("guest"));
    }
}
