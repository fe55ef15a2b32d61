//! In-memory record source and record fixtures for tests.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use serde_json::Value;

use crate::database::DatabaseError;
use crate::export::RecordSource;
use crate::filter::{FieldRef, FilterOp, OrderBy, QueryPredicate, SortDirection};
use crate::jobseeker::Jobseeker;

/// Record source over a fixed set of records.
///
/// Predicates are evaluated against each record's JSON form with the same semantics
/// the Postgres repository renders: text equality, `ILIKE` with backslash escapes,
/// and nested paths read as text.
pub struct MemorySource {
    records: Vec<(Jobseeker, Value)>,
    fetches: AtomicUsize,
    fail_on: Option<(usize, String)>,
}

impl MemorySource {
    pub fn new(records: Vec<Jobseeker>) -> Self {
        let records = records
            .into_iter()
            .map(|r| {
                let json = serde_json::to_value(&r).unwrap_or_default();
                (r, json)
            })
            .collect();
        Self {
            records,
            fetches: AtomicUsize::new(0),
            fail_on: None,
        }
    }

    /// Make the `nth` page fetch (1-based) fail with a query error
    pub fn fail_on_fetch(mut self, nth: usize, message: impl Into<String>) -> Self {
        self.fail_on = Some((nth, message.into()));
        self
    }

    /// Number of `fetch_page` calls so far
    pub fn fetches(&self) -> usize {
        self.fetches.load(AtomicOrdering::SeqCst)
    }

    fn matching(&self, predicates: &[QueryPredicate]) -> Vec<&(Jobseeker, Value)> {
        self.records
            .iter()
            .filter(|(_, json)| predicates.iter().all(|p| matches(json, p)))
            .collect()
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch_page(
        &self,
        predicates: &[QueryPredicate],
        order: &[OrderBy],
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Jobseeker>, DatabaseError> {
        let nth = self.fetches.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        if let Some((fail_at, message)) = &self.fail_on {
            if *fail_at == nth {
                return Err(DatabaseError::QueryError(message.clone()));
            }
        }

        let mut rows = self.matching(predicates);
        rows.sort_by(|(_, a), (_, b)| compare_rows(a, b, order));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(record, _)| record.clone())
            .collect())
    }

    async fn count(&self, predicates: &[QueryPredicate]) -> Result<u64, DatabaseError> {
        Ok(self.matching(predicates).len() as u64)
    }
}

fn lookup<'v>(json: &'v Value, field: &FieldRef) -> Option<&'v Value> {
    match field {
        FieldRef::Column(column) => json.get(column),
        FieldRef::Document { column, path } => {
            let mut current = json.get(column)?;
            for segment in path.iter() {
                current = match current {
                    Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                    other => other.get(segment)?,
                };
            }
            Some(current)
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn matches(json: &Value, predicate: &QueryPredicate) -> bool {
    match predicate {
        QueryPredicate::AnyOf(inner) => inner.iter().any(|p| matches(json, p)),
        QueryPredicate::Compare { field, op, value } => {
            let actual = lookup(json, field).and_then(as_text);
            match (op, actual, as_text(value)) {
                (FilterOp::Eq, None, None) => true,
                (FilterOp::Eq, Some(a), Some(v)) => a == v,
                (FilterOp::ILike, Some(a), Some(pattern)) => like(&a.to_lowercase(), &pattern.to_lowercase()),
                _ => false,
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Any,
    One,
    Char(char),
}

/// SQL `LIKE` with `\` as the escape character.
pub fn like(text: &str, pattern: &str) -> bool {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '\\' => Token::Char(chars.next().unwrap_or('\\')),
            '%' => Token::Any,
            '_' => Token::One,
            other => Token::Char(other),
        });
    }
    let text: Vec<char> = text.chars().collect();
    like_tokens(&text, &tokens)
}

fn like_tokens(text: &[char], tokens: &[Token]) -> bool {
    match tokens.split_first() {
        None => text.is_empty(),
        Some((Token::Any, rest)) => (0..=text.len()).any(|skip| like_tokens(&text[skip..], rest)),
        Some((Token::One, rest)) => !text.is_empty() && like_tokens(&text[1..], rest),
        Some((Token::Char(c), rest)) => text.first() == Some(c) && like_tokens(&text[1..], rest),
    }
}

fn compare_rows(a: &Value, b: &Value, order: &[OrderBy]) -> Ordering {
    for o in order {
        let field = FieldRef::Column(o.column);
        let ordering = compare_values(lookup(a, &field), lookup(b, &field));
        let ordering = match o.sort {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => as_text(x).cmp(&as_text(y)),
        (None, None) => Ordering::Equal,
        // nulls sort last, as in Postgres ascending order
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

pub mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{json, Value};

    use crate::jobseeker::Jobseeker;

    pub fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 2, 30, 0).single().unwrap_or_default()
    }

    /// Record with only the guaranteed top-level fields
    pub fn bare(id: i64) -> Jobseeker {
        Jobseeker {
            id,
            created_at: created_at(),
            ..Default::default()
        }
    }

    /// Panics when `value` is not a valid record.
    pub fn from_json(value: Value) -> Jobseeker {
        match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => panic!("invalid jobseeker fixture: {}", e),
        }
    }

    /// Fully registered jobseeker with every sub-document present
    pub fn registered(id: i64, surname: &str, first_name: &str) -> Jobseeker {
        from_json(json!({
            "id": id,
            "created_at": "2024-03-01T02:30:00Z",
            "updated_at": "2024-03-02T09:15:00Z",
            "created_by": "encoder01",
            "surname": surname,
            "first_name": first_name,
            "sex": "Female",
            "employment_status": "Unemployed",
            "is_ofw": false,
            "is_4ps": true,
            "city": "Calamba",
            "province": "Laguna",
            "personal_info": {
                "surname": surname,
                "first_name": first_name,
                "middle_name": "Reyes",
                "date_of_birth": "1995-06-14",
                "place_of_birth": "Calamba, Laguna",
                "sex": "Female",
                "civil_status": "Single",
                "religion": "Roman Catholic",
                "tin": "123-456-789",
                "height": 157,
                "contact_number": "+63 917 555 0101",
                "email": "jobseeker@example.com",
                "address": {
                    "house_street": "12 Rizal St.",
                    "barangay": "Poblacion",
                    "city": "Calamba",
                    "province": "Laguna"
                },
                "disability": { "visual": false }
            },
            "employment": {
                "status": "Unemployed",
                "unemployed_reason": "Finished contract",
                "months_looking": 4,
                "household_id_4ps": "4PS-0001"
            },
            "job_preference": {
                "employment_type": "Full-time",
                "occupations": ["Welder", "Pipe Fitter"],
                "local_locations": ["Calamba"],
                "overseas_locations": []
            },
            "language": {
                "english": { "read": true, "write": true, "speak": true, "understand": true },
                "filipino": { "read": true, "write": true, "speak": true, "understand": true }
            },
            "education": {
                "currently_in_school": false,
                "secondary_k12": { "year_graduated": "2013" },
                "tertiary": { "course": "BS Mechanical Engineering", "level_reached": "3rd year" }
            },
            "training": {
                "entries": [
                    { "course": "Shielded Metal Arc Welding", "hours": 268, "institution": "TESDA Laguna",
                      "certificates": { "NC_II": true } }
                ]
            },
            "eligibility": { "civilService": [], "professionalLicense": [] },
            "work_experience": {
                "entries": [
                    { "company": "Acme Fabrication, Inc.", "position": "Welder Helper", "months": 18,
                      "status": "Contractual" }
                ]
            },
            "skills": {
                "auto_mechanic": false,
                "computer_literate": true,
                "certification": { "acknowledged": true, "date_signed": "2024-03-01" },
                "referral": { "tesda_training": true }
            }
        }))
    }
}
