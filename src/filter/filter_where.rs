use serde_json::Value;

use super::types::{FieldRef, FilterOp, QueryPredicate};

/// Renders predicates into a parameterised WHERE clause.
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Returns the clause (without the `WHERE` keyword) and its bound values.
    /// An empty predicate list yields `1=1`.
    pub fn generate(predicates: &[QueryPredicate], starting_param_index: usize) -> (String, Vec<Value>) {
        let mut filter_where = Self::new(starting_param_index);
        let clause = filter_where.build(predicates);
        (clause, filter_where.param_values)
    }

    fn build(&mut self, predicates: &[QueryPredicate]) -> String {
        let conditions: Vec<String> = predicates.iter().map(|p| self.build_condition(p)).collect();
        if conditions.is_empty() {
            "1=1".to_string()
        } else {
            conditions.join(" AND ")
        }
    }

    fn build_condition(&mut self, predicate: &QueryPredicate) -> String {
        match predicate {
            QueryPredicate::Compare { field, op, value } => {
                let column = Self::field_sql(field);
                match op {
                    FilterOp::Eq if value.is_null() => format!("{} IS NULL", column),
                    FilterOp::Eq => format!("{} = {}", column, self.param(value.clone())),
                    FilterOp::ILike => {
                        format!("{} ILIKE {} ESCAPE '\\'", column, self.param(value.clone()))
                    }
                }
            }
            QueryPredicate::AnyOf(inner) if inner.is_empty() => "1=0".to_string(),
            QueryPredicate::AnyOf(inner) => {
                let parts: Vec<String> = inner.iter().map(|p| self.build_condition(p)).collect();
                format!("({})", parts.join(" OR "))
            }
        }
    }

    /// Column reference as SQL. Nested values are read as text with `#>>`.
    pub fn field_sql(field: &FieldRef) -> String {
        match field {
            FieldRef::Column(column) => format!("\"{}\"", column),
            FieldRef::Document { column, path } => format!("\"{}\" #>> '{{{}}}'", column, path.join(",")),
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
