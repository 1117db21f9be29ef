//! Free-text search helpers for `ILIKE` filters.

/// Trim user input and drop it entirely when nothing is left.
pub fn normalize_term(term: Option<&str>) -> Option<&str> {
    term.map(str::trim).filter(|t| !t.is_empty())
}

/// Turn a search term into a substring `ILIKE` pattern.
///
/// `%`, `_` and `\` are escaped so they match literally (Postgres uses `\`
/// as the default `LIKE` escape character).
///
/// ```
/// use adala_core::search::like_pattern;
/// assert_eq!(like_pattern("50%"), "%50\\%%");
/// assert_eq!(like_pattern("عقد"), "%عقد%");
/// ```
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_terms_are_dropped() {
        assert_eq!(normalize_term(None), None);
        assert_eq!(normalize_term(Some("   ")), None);
        assert_eq!(normalize_term(Some("  smith ")), Some("smith"));
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}
