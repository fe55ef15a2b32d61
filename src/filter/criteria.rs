use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::sanitize::{contains_pattern, escape_like_wildcards, search_term};
use super::types::{FieldRef, QueryPredicate};

/// The closed set of filters the jobseeker search understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Sex,
    EmploymentStatus,
    Ofw,
    FourPs,
    City,
    Province,
    Search,
    CivilStatus,
    EmployedType,
    UnemployedReason,
    EmploymentType,
    Barangay,
    Occupation,
    Course,
}

impl FilterKey {
    pub const ALL: [FilterKey; 14] = [
        FilterKey::Sex,
        FilterKey::EmploymentStatus,
        FilterKey::Ofw,
        FilterKey::FourPs,
        FilterKey::City,
        FilterKey::Province,
        FilterKey::Search,
        FilterKey::CivilStatus,
        FilterKey::EmployedType,
        FilterKey::UnemployedReason,
        FilterKey::EmploymentType,
        FilterKey::Barangay,
        FilterKey::Occupation,
        FilterKey::Course,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Sex => "sex",
            FilterKey::EmploymentStatus => "employment_status",
            FilterKey::Ofw => "ofw",
            FilterKey::FourPs => "four_ps",
            FilterKey::City => "city",
            FilterKey::Province => "province",
            FilterKey::Search => "search",
            FilterKey::CivilStatus => "civil_status",
            FilterKey::EmployedType => "employed_type",
            FilterKey::UnemployedReason => "unemployed_reason",
            FilterKey::EmploymentType => "employment_type",
            FilterKey::Barangay => "barangay",
            FilterKey::Occupation => "occupation",
            FilterKey::Course => "course",
        }
    }

    /// Accepts the snake_case names plus the camelCase spellings the web client sends.
    pub fn parse(key: &str) -> Option<Self> {
        Some(match key {
            "sex" => FilterKey::Sex,
            "employment_status" | "employmentStatus" => FilterKey::EmploymentStatus,
            "ofw" | "is_ofw" | "isOfw" => FilterKey::Ofw,
            "four_ps" | "is_4ps" | "is4ps" | "fourPs" => FilterKey::FourPs,
            "city" => FilterKey::City,
            "province" => FilterKey::Province,
            "search" | "q" => FilterKey::Search,
            "civil_status" | "civilStatus" => FilterKey::CivilStatus,
            "employed_type" | "employedType" => FilterKey::EmployedType,
            "unemployed_reason" | "unemployedReason" => FilterKey::UnemployedReason,
            "employment_type" | "employmentType" => FilterKey::EmploymentType,
            "barangay" => FilterKey::Barangay,
            "occupation" | "preferred_occupation" | "preferredOccupation" => FilterKey::Occupation,
            "course" | "tertiary_course" | "tertiaryCourse" => FilterKey::Course,
            _ => return None,
        })
    }
}

/// Flat map of user-supplied filters, exactly as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria(BTreeMap<String, String>);

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Removes a non-filter parameter (paging, ordering) that arrived in the same map.
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.0.remove(key).filter(|v| !v.trim().is_empty())
    }

    /// Trimmed value for a recognised key. Blank values count as absent.
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.0
            .iter()
            .filter(|(k, _)| FilterKey::parse(k) == Some(key))
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Keys present in the map that are not part of the recognised set.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .filter(|k| FilterKey::parse(k).is_none())
            .map(String::as_str)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        FilterKey::ALL.iter().filter(|k| self.get(**k).is_some()).count()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterCriteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

const SURNAME: FieldRef = FieldRef::Column("surname");
const FIRST_NAME: FieldRef = FieldRef::Column("first_name");

/// Translates filter criteria into predicates for the record source.
///
/// Predicates come out in [`FilterKey::ALL`] order, so the same criteria always build
/// the same query. Unknown keys and blank values contribute nothing.
pub fn build_filters(criteria: &FilterCriteria) -> Vec<QueryPredicate> {
    let unknown = criteria.unknown_keys();
    if !unknown.is_empty() {
        tracing::debug!("Ignoring unknown filter keys: {:?}", unknown);
    }

    let mut predicates = Vec::new();
    for key in FilterKey::ALL {
        let Some(value) = criteria.get(key) else { continue };
        if let Some(predicate) = predicate_for(key, value) {
            predicates.push(predicate);
        }
    }
    predicates
}

fn predicate_for(key: FilterKey, value: &str) -> Option<QueryPredicate> {
    use FieldRef::{Column, Document};

    Some(match key {
        FilterKey::Sex => QueryPredicate::eq(Column("sex"), value),
        FilterKey::EmploymentStatus => QueryPredicate::eq(Column("employment_status"), value),
        FilterKey::Ofw => QueryPredicate::eq(Column("is_ofw"), parse_flag(key, value)?),
        FilterKey::FourPs => QueryPredicate::eq(Column("is_4ps"), parse_flag(key, value)?),
        FilterKey::City => contains(Column("city"), value),
        FilterKey::Province => contains(Column("province"), value),
        FilterKey::Search => {
            let term = search_term(value);
            if term.is_empty() {
                return None;
            }
            let pattern = contains_pattern(&term);
            QueryPredicate::AnyOf(vec![
                QueryPredicate::ilike(SURNAME, pattern.clone()),
                QueryPredicate::ilike(FIRST_NAME, pattern),
            ])
        }
        FilterKey::CivilStatus => QueryPredicate::eq(
            Document { column: "personal_info", path: &["civil_status"] },
            value,
        ),
        FilterKey::EmployedType => QueryPredicate::eq(
            Document { column: "employment", path: &["employed_type"] },
            value,
        ),
        FilterKey::UnemployedReason => QueryPredicate::eq(
            Document { column: "employment", path: &["unemployed_reason"] },
            value,
        ),
        FilterKey::EmploymentType => QueryPredicate::eq(
            Document { column: "job_preference", path: &["employment_type"] },
            value,
        ),
        FilterKey::Barangay => contains(
            Document { column: "personal_info", path: &["address", "barangay"] },
            value,
        ),
        FilterKey::Occupation => contains(
            Document { column: "job_preference", path: &["occupations", "0"] },
            value,
        ),
        FilterKey::Course => contains(
            Document { column: "education", path: &["tertiary", "course"] },
            value,
        ),
    })
}

fn contains(field: FieldRef, value: &str) -> QueryPredicate {
    QueryPredicate::ilike(field, contains_pattern(&escape_like_wildcards(value)))
}

fn parse_flag(key: FilterKey, value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        other => {
            tracing::warn!("Ignoring {} filter with non-boolean value '{}'", key.as_str(), other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::FilterOp;
    use serde_json::json;

    fn compare(predicate: &QueryPredicate) -> (&FieldRef, FilterOp, &serde_json::Value) {
        match predicate {
            QueryPredicate::Compare { field, op, value } => (field, *op, value),
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn empty_and_blank_criteria_build_nothing() {
        assert!(build_filters(&FilterCriteria::new()).is_empty());

        let criteria = FilterCriteria::new().with("sex", "").with("city", "   ").with("search", "(,)");
        assert!(build_filters(&criteria).is_empty());
        assert_eq!(criteria.active_count(), 1);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let criteria = FilterCriteria::new().with("favourite_colour", "blue").with("sex", "Female");
        let predicates = build_filters(&criteria);
        assert_eq!(predicates.len(), 1);
        assert_eq!(criteria.unknown_keys(), vec!["favourite_colour"]);
    }

    #[test]
    fn indexed_equality_filters() {
        let criteria = FilterCriteria::new()
            .with("sex", "Male")
            .with("employment_status", "Unemployed")
            .with("ofw", "yes")
            .with("four_ps", "false");
        let predicates = build_filters(&criteria);
        assert_eq!(predicates.len(), 4);

        assert_eq!(compare(&predicates[0]), (&FieldRef::Column("sex"), FilterOp::Eq, &json!("Male")));
        assert_eq!(
            compare(&predicates[1]),
            (&FieldRef::Column("employment_status"), FilterOp::Eq, &json!("Unemployed"))
        );
        assert_eq!(compare(&predicates[2]), (&FieldRef::Column("is_ofw"), FilterOp::Eq, &json!(true)));
        assert_eq!(compare(&predicates[3]), (&FieldRef::Column("is_4ps"), FilterOp::Eq, &json!(false)));
    }

    #[test]
    fn non_boolean_flag_value_is_no_filter() {
        let criteria = FilterCriteria::new().with("ofw", "sometimes");
        assert!(build_filters(&criteria).is_empty());
    }

    #[test]
    fn substring_filters_escape_wildcards() {
        let criteria = FilterCriteria::new().with("city", "San_Jose 100%").with("province", " Cebu ");
        let predicates = build_filters(&criteria);

        assert_eq!(
            compare(&predicates[0]),
            (&FieldRef::Column("city"), FilterOp::ILike, &json!("%San\\_Jose 100\\%%"))
        );
        assert_eq!(
            compare(&predicates[1]),
            (&FieldRef::Column("province"), FilterOp::ILike, &json!("%Cebu%"))
        );
    }

    #[test]
    fn search_matches_surname_or_first_name() {
        let criteria = FilterCriteria::new().with("search", "(dela_Cruz)");
        let predicates = build_filters(&criteria);
        assert_eq!(
            predicates,
            vec![QueryPredicate::AnyOf(vec![
                QueryPredicate::ilike(FieldRef::Column("surname"), "%dela\\_Cruz%"),
                QueryPredicate::ilike(FieldRef::Column("first_name"), "%dela\\_Cruz%"),
            ])]
        );
    }

    #[test]
    fn nested_document_filters_address_their_paths() {
        let criteria = FilterCriteria::new()
            .with("civilStatus", "Married")
            .with("employedType", "Wage employed")
            .with("unemployed_reason", "Terminated/Laid off (local)")
            .with("employment_type", "Full-time")
            .with("barangay", "Poblacion")
            .with("occupation", "Welder")
            .with("course", "Nursing");
        let fields: Vec<String> = build_filters(&criteria)
            .iter()
            .map(|p| compare(p).0.to_string())
            .collect();

        assert_eq!(
            fields,
            vec![
                "personal_info.civil_status",
                "employment.employed_type",
                "employment.unemployed_reason",
                "job_preference.employment_type",
                "personal_info.address.barangay",
                "job_preference.occupations.0",
                "education.tertiary.course",
            ]
        );
    }

    #[test]
    fn predicates_follow_key_order_not_map_order() {
        let criteria: FilterCriteria =
            [("province", "Laguna"), ("city", "Calamba"), ("sex", "Female")].into_iter().collect();
        let fields: Vec<String> = build_filters(&criteria)
            .iter()
            .map(|p| compare(p).0.to_string())
            .collect();
        assert_eq!(fields, vec!["sex", "city", "province"]);
    }
}
