//! Dynamic `WHERE` / `ORDER BY` building for list endpoints.
//!
//! Every list query filters on a handful of optional parameters, searches a
//! few text columns and sorts by a whitelisted column. [`QueryFilter`]
//! collects the active conditions with numbered Postgres placeholders and
//! the typed values to bind, so each repository only names its columns.
//!
//! Column names are always supplied by repository code, never by the
//! client; client-chosen sort keys go through [`SortSpec`].

use adala_core::pagination::SortDirection;
use adala_core::search::{like_pattern, normalize_term};
use adala_core::types::{Date, DbId, Timestamp};
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// Typed bind value for dynamically-built queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(i64),
    Text(String),
    Bool(bool),
    Date(Date),
    Timestamp(Timestamp),
}

/// Accumulates `AND`-ed conditions and their bind values.
#[derive(Debug, Default, Clone)]
pub struct QueryFilter {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition without a bind value, e.g. `c.deleted_at IS NULL`.
    pub fn raw(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    /// Add a condition built around the next placeholder (`$n`).
    pub fn bind_condition(
        &mut self,
        make: impl FnOnce(&str) -> String,
        value: BindValue,
    ) -> &mut Self {
        let placeholder = format!("${}", self.next_index());
        self.conditions.push(make(&placeholder));
        self.binds.push(value);
        self
    }

    pub fn eq_id(&mut self, column: &str, value: Option<DbId>) -> &mut Self {
        if let Some(v) = value {
            self.bind_condition(|p| format!("{column} = {p}"), BindValue::BigInt(v));
        }
        self
    }

    pub fn eq_text(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = normalize_term(value) {
            self.bind_condition(|p| format!("{column} = {p}"), BindValue::Text(v.to_string()));
        }
        self
    }

    pub fn eq_bool(&mut self, column: &str, value: Option<bool>) -> &mut Self {
        if let Some(v) = value {
            self.bind_condition(|p| format!("{column} = {p}"), BindValue::Bool(v));
        }
        self
    }

    /// `column >= date` (inclusive).
    pub fn date_from(&mut self, column: &str, value: Option<Date>) -> &mut Self {
        if let Some(v) = value {
            self.bind_condition(|p| format!("{column} >= {p}"), BindValue::Date(v));
        }
        self
    }

    /// `column <= date` (inclusive).
    pub fn date_to(&mut self, column: &str, value: Option<Date>) -> &mut Self {
        if let Some(v) = value {
            self.bind_condition(|p| format!("{column} <= {p}"), BindValue::Date(v));
        }
        self
    }

    /// Timestamp column on or after the start of `value`.
    pub fn day_from(&mut self, column: &str, value: Option<Date>) -> &mut Self {
        if let Some(v) = value {
            self.bind_condition(|p| format!("{column} >= {p}::date"), BindValue::Date(v));
        }
        self
    }

    /// Timestamp column before the end of `value`.
    pub fn day_to(&mut self, column: &str, value: Option<Date>) -> &mut Self {
        if let Some(v) = value {
            self.bind_condition(
                |p| format!("{column} < ({p}::date + 1)"),
                BindValue::Date(v),
            );
        }
        self
    }

    pub fn ts_from(&mut self, column: &str, value: Option<Timestamp>) -> &mut Self {
        if let Some(v) = value {
            self.bind_condition(|p| format!("{column} >= {p}"), BindValue::Timestamp(v));
        }
        self
    }

    pub fn ts_to(&mut self, column: &str, value: Option<Timestamp>) -> &mut Self {
        if let Some(v) = value {
            self.bind_condition(|p| format!("{column} <= {p}"), BindValue::Timestamp(v));
        }
        self
    }

    /// Case-insensitive substring match of `term` against any of `columns`.
    ///
    /// One bind value is shared by all columns. Blank terms are ignored.
    pub fn search(&mut self, columns: &[&str], term: Option<&str>) -> &mut Self {
        let Some(term) = normalize_term(term) else {
            return self;
        };
        if columns.is_empty() {
            return self;
        }
        self.bind_condition(
            |p| {
                let parts: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{c} ILIKE {p}"))
                    .collect();
                format!("({})", parts.join(" OR "))
            },
            BindValue::Text(like_pattern(term)),
        )
    }

    /// `WHERE a AND b ...`, or an empty string when no condition is active.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Index of the next free placeholder (for trailing `LIMIT` / `OFFSET`).
    pub fn next_index(&self) -> usize {
        self.binds.len() + 1
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }

    /// Bind all accumulated values to a `query_as`.
    pub fn bind_query_as<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for val in &self.binds {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Date(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }

    /// Bind all accumulated values to a `query_scalar`.
    pub fn bind_scalar<'q, O>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        for val in &self.binds {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Date(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }
}

/// Whitelist of client-selectable sort keys for one list query.
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    /// `(query parameter value, SQL expression)` pairs.
    pub allowed: &'static [(&'static str, &'static str)],
    /// SQL expression used when the requested key is missing or unknown.
    pub default: &'static str,
    /// Unique column appended so pages are stable across equal sort keys.
    pub tiebreak: &'static str,
}

impl SortSpec {
    pub fn order_by(&self, requested: Option<&str>, direction: Option<SortDirection>) -> String {
        let column = requested
            .and_then(|r| self.allowed.iter().find(|(key, _)| *key == r))
            .map(|(_, sql)| *sql)
            .unwrap_or(self.default);
        let dir = direction.unwrap_or_default().as_sql();
        format!("ORDER BY {column} {dir}, {} {dir}", self.tiebreak)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let f = QueryFilter::new();
        assert_eq!(f.where_clause(), "");
        assert_eq!(f.next_index(), 1);
    }

    #[test]
    fn placeholders_are_numbered_in_order() {
        let mut f = QueryFilter::new();
        f.raw("c.deleted_at IS NULL")
            .eq_text("c.status", Some("open"))
            .eq_id("c.client_id", None)
            .eq_id("c.lead_lawyer_id", Some(7))
            .eq_bool("c.is_active", Some(true));

        assert_eq!(
            f.where_clause(),
            "WHERE c.deleted_at IS NULL AND c.status = $1 AND c.lead_lawyer_id = $2 \
             AND c.is_active = $3"
        );
        assert_eq!(f.next_index(), 4);
        assert_eq!(
            f.binds(),
            &[
                BindValue::Text("open".into()),
                BindValue::BigInt(7),
                BindValue::Bool(true)
            ]
        );
    }

    #[test]
    fn search_shares_one_placeholder() {
        let mut f = QueryFilter::new();
        f.eq_id("client_id", Some(1))
            .search(&["name", "name_ar"], Some("  50%  "));

        assert_eq!(
            f.where_clause(),
            "WHERE client_id = $1 AND (name ILIKE $2 OR name_ar ILIKE $2)"
        );
        assert_eq!(f.binds()[1], BindValue::Text("%50\\%%".into()));
    }

    #[test]
    fn blank_values_are_skipped() {
        let mut f = QueryFilter::new();
        f.search(&["name"], Some("   "))
            .eq_text("status", Some(""))
            .search(&[], Some("x"));
        assert_eq!(f.where_clause(), "");
    }

    #[test]
    fn date_ranges_are_inclusive() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut f = QueryFilter::new();
        f.date_from("opened_on", Some(day))
            .date_to("opened_on", Some(day))
            .day_to("scheduled_at", Some(day));
        assert_eq!(
            f.where_clause(),
            "WHERE opened_on >= $1 AND opened_on <= $2 AND scheduled_at < ($3::date + 1)"
        );
    }

    const SORT: SortSpec = SortSpec {
        allowed: &[("name", "c.name"), ("created_at", "c.created_at")],
        default: "c.created_at",
        tiebreak: "c.id",
    };

    #[test]
    fn sort_uses_whitelisted_expression() {
        assert_eq!(
            SORT.order_by(Some("name"), Some(SortDirection::Asc)),
            "ORDER BY c.name ASC, c.id ASC"
        );
    }

    #[test]
    fn unknown_sort_key_falls_back_to_default() {
        assert_eq!(
            SORT.order_by(Some("name; DROP TABLE cases"), None),
            "ORDER BY c.created_at DESC, c.id DESC"
        );
    }
}
