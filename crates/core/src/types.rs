/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (invoice issue/due dates, case open/close days).
pub type Date = chrono::NaiveDate;

/// Monetary amounts in minor currency units (e.g. halalas).
pub type Minor = i64;
