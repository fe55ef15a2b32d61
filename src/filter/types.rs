use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Exact match
    Eq,
    /// Case-insensitive LIKE; the value is a complete, already-escaped pattern
    ILike,
}

/// Where a predicate reads its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    /// A top-level (indexed) column
    Column(&'static str),
    /// A text value nested inside a JSONB sub-document column
    Document {
        column: &'static str,
        path: &'static [&'static str],
    },
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Column(c) => f.write_str(c),
            FieldRef::Document { column, path } => write!(f, "{}.{}", column, path.join(".")),
        }
    }
}

/// One condition handed to the record source. A list of predicates is combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPredicate {
    Compare {
        field: FieldRef,
        op: FilterOp,
        value: Value,
    },
    /// Matches when any of the inner predicates matches
    AnyOf(Vec<QueryPredicate>),
}

impl QueryPredicate {
    pub fn eq(field: FieldRef, value: impl Into<Value>) -> Self {
        QueryPredicate::Compare { field, op: FilterOp::Eq, value: value.into() }
    }

    pub fn ilike(field: FieldRef, pattern: impl Into<String>) -> Self {
        QueryPredicate::Compare { field, op: FilterOp::ILike, value: Value::String(pattern.into()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub sort: SortDirection,
}

impl OrderBy {
    pub fn asc(column: &'static str) -> Self {
        Self { column, sort: SortDirection::Asc }
    }

    pub fn desc(column: &'static str) -> Self {
        Self { column, sort: SortDirection::Desc }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
