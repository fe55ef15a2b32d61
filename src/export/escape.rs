//! CSV cell escaping with spreadsheet formula-injection defense.

use std::borrow::Cow;

use crate::jobseeker::Scalar;

/// Leading characters that make spreadsheet software evaluate a cell as a formula.
const FORMULA_PREFIXES: [char; 4] = ['=', '+', '-', '@'];

/// Escapes an optional user-entered value. Absent and null values become `""`.
pub fn escape(value: Option<&Scalar>) -> String {
    match value {
        None => String::new(),
        Some(Scalar::Text(s)) => escape_str(s),
        Some(other) => escape_str(&other.to_string()),
    }
}

/// Escapes one raw string for a CSV cell.
///
/// A formula-triggering first character gets a `'` prefix. The result is then quoted,
/// with inner quotes doubled, if it contains a comma, quote, or line break.
pub fn escape_str(value: &str) -> String {
    let guarded: Cow<'_, str> = if value.starts_with(FORMULA_PREFIXES) {
        Cow::Owned(format!("'{}", value))
    } else {
        Cow::Borrowed(value)
    };

    if guarded.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", guarded.replace('"', "\"\""))
    } else {
        guarded.into_owned()
    }
}
