use super::error::FilterError;
use super::types::{OrderBy, SortDirection};

/// Columns a listing may be sorted by.
pub const SORTABLE_COLUMNS: &[&str] = &[
    "id",
    "created_at",
    "updated_at",
    "surname",
    "first_name",
    "city",
    "province",
];

pub struct FilterOrder;

impl FilterOrder {
    /// Parses `"created_at desc, surname"` style order strings against the sortable
    /// column whitelist. Direction defaults to ascending.
    pub fn parse(order: &str) -> Result<Vec<OrderBy>, FilterError> {
        let mut out = Vec::new();
        for part in order.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            let Some(col) = it.next() else { continue };
            let column = SORTABLE_COLUMNS
                .iter()
                .copied()
                .find(|c| *c == col)
                .ok_or_else(|| FilterError::InvalidColumn(format!("Cannot order by '{}'", col)))?;
            let sort = match it.next() {
                None => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                Some(dir) => {
                    return Err(FilterError::InvalidOrder(format!(
                        "Unknown sort direction '{}' for '{}'",
                        dir, col
                    )))
                }
            };
            if it.next().is_some() {
                return Err(FilterError::InvalidOrder(trimmed.to_string()));
            }
            out.push(OrderBy { column, sort });
        }
        Ok(out)
    }

    pub fn generate(order: &[OrderBy]) -> String {
        if order.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = order
            .iter()
            .map(|o| format!("\"{}\" {}", o.column, o.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_columns_and_directions() {
        let order = FilterOrder::parse("created_at desc, surname, id ASC").unwrap();
        assert_eq!(
            order,
            vec![OrderBy::desc("created_at"), OrderBy::asc("surname"), OrderBy::asc("id")]
        );
        assert_eq!(
            FilterOrder::generate(&order),
            "ORDER BY \"created_at\" DESC, \"surname\" ASC, \"id\" ASC"
        );
    }

    #[test]
    fn rejects_columns_outside_whitelist() {
        assert!(matches!(
            FilterOrder::parse("password desc"),
            Err(FilterError::InvalidColumn(_))
        ));
        assert!(matches!(
            FilterOrder::parse("\"id\"; drop table jobseekers"),
            Err(FilterError::InvalidColumn(_))
        ));
    }

    #[test]
    fn rejects_unknown_direction() {
        assert!(matches!(FilterOrder::parse("id sideways"), Err(FilterError::InvalidOrder(_))));
        assert!(matches!(FilterOrder::parse("id asc extra"), Err(FilterError::InvalidOrder(_))));
    }

    #[test]
    fn empty_order_generates_nothing() {
        assert!(FilterOrder::parse(" , ").unwrap().is_empty());
        assert_eq!(FilterOrder::generate(&[]), "");
    }
}
