//! Guards for user-supplied search text before it reaches the query layer.

/// Replaces characters that are structural in a combined OR expression (parentheses,
/// commas) and control characters with spaces, then collapses whitespace and trims.
///
/// Only the free-text search term goes through this; plain substring filters are
/// escaped with [`escape_like_wildcards`] alone.
pub fn sanitize_search_query(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let spaced: String = query
        .chars()
        .map(|c| if matches!(c, '(' | ')' | ',') || c.is_control() { ' ' } else { c })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Backslash-escapes `\`, `%` and `_` so the value only ever matches literally inside
/// a LIKE/ILIKE pattern.
pub fn escape_like_wildcards(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Free-text search term: structural characters first, wildcards second. The reverse
/// order would let the sanitizer see backslashes it must leave untouched.
pub fn search_term(query: &str) -> String {
    escape_like_wildcards(&sanitize_search_query(query))
}

/// Wraps an escaped value in `%…%` for a "contains" match.
pub fn contains_pattern(escaped: &str) -> String {
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_input_passes_through() {
        assert_eq!(sanitize_search_query("hello world"), "hello world");
        assert_eq!(escape_like_wildcards("hello world"), "hello world");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sanitize_search_query(""), "");
        assert_eq!(escape_like_wildcards(""), "");
        assert_eq!(search_term("  ( , )  "), "");
    }

    #[test]
    fn structural_characters_become_spaces() {
        assert_eq!(sanitize_search_query("(User_Name)"), "User_Name");
        assert_eq!(sanitize_search_query("dela Cruz,Juan"), "dela Cruz Juan");
        assert_eq!(sanitize_search_query("a)or(b"), "a or b");
    }

    #[test]
    fn control_characters_and_whitespace_runs_collapse() {
        assert_eq!(sanitize_search_query("  Juan\t\n\u{0}  Santos  "), "Juan Santos");
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("user_name"), "user\\_name");
        assert_eq!(escape_like_wildcards("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn search_term_sanitizes_then_escapes() {
        assert_eq!(search_term("(User_Name)"), "User\\_Name");
        assert_eq!(search_term("Hello, 100% World"), "Hello 100\\% World");
        assert_eq!(search_term("a\\(b"), "a\\\\ b");
    }

    #[test]
    fn contains_pattern_wraps_value() {
        assert_eq!(contains_pattern("Quezon"), "%Quezon%");
    }
}
