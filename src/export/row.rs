use super::columns::{Cell, ColumnRegistry};
use crate::jobseeker::Jobseeker;

/// Reads every column of `registry` from `record`, in registry order.
///
/// Escaping is each accessor's business; cells come back ready to join.
pub fn materialize(record: &Jobseeker, registry: &ColumnRegistry) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(registry.len());
    materialize_into(record, registry, &mut cells);
    cells
}

/// Like [`materialize`], reusing `cells` across records.
pub fn materialize_into(record: &Jobseeker, registry: &ColumnRegistry, cells: &mut Vec<Cell>) {
    cells.clear();
    cells.extend(registry.iter().map(|column| column.read(record)));
}

/// Appends one comma-joined, newline-terminated line to `out`.
pub fn join_row(cells: &[Cell], out: &mut String) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(cell);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::columns::JOBSEEKER_COLUMNS;
    use crate::testing::fixtures;
    use serde_json::json;

    fn cell<'a>(cells: &'a [Cell], header: &str) -> &'a str {
        let index = JOBSEEKER_COLUMNS
            .position(header)
            .unwrap_or_else(|| panic!("missing header {}", header));
        &cells[index]
    }

    #[test]
    fn bare_record_fills_every_column() {
        let record = fixtures::bare(1);
        let cells = materialize(&record, &JOBSEEKER_COLUMNS);
        assert_eq!(cells.len(), JOBSEEKER_COLUMNS.len());
        assert_eq!(cell(&cells, "ID"), "1");
        assert_eq!(cell(&cells, "Surname"), "");
        assert_eq!(cell(&cells, "Disability - Visual"), "");
        assert_eq!(cell(&cells, "Skill - Driver"), "");
        assert_eq!(cell(&cells, "OFW"), "No");
        assert_eq!(cell(&cells, "4Ps Beneficiary"), "No");
    }

    #[test]
    fn partially_filled_record_renders_expected_cells() {
        let record = fixtures::from_json(json!({
            "id": 42,
            "created_at": "2024-03-01T02:30:00Z",
            "personal_info": { "surname": "Doe", "disability": { "visual": true } },
            "training": { "entries": [{ "course": "Welding", "certificates": { "NC_II": true } }] }
        }));
        let cells = materialize(&record, &JOBSEEKER_COLUMNS);

        assert_eq!(cells.len(), JOBSEEKER_COLUMNS.len());
        assert_eq!(cell(&cells, "Surname"), "Doe");
        assert_eq!(cell(&cells, "Disability - Visual"), "Yes");
        assert_eq!(cell(&cells, "Disability - Hearing"), "No");
        assert_eq!(cell(&cells, "Training 1 - Course"), "Welding");
        assert_eq!(cell(&cells, "Training 1 - NC II"), "Yes");
        assert_eq!(cell(&cells, "Training 1 - NC I"), "No");
        assert_eq!(cell(&cells, "Training 2 - Course"), "");
        assert_eq!(cell(&cells, "Training 2 - NC II"), "");

        for (column, value) in JOBSEEKER_COLUMNS.iter().zip(&cells) {
            let header = column.header.as_ref();
            if header.starts_with("Employment")
                || header.starts_with("Self-Employed")
                || header.starts_with("Work Experience")
                || header.starts_with("Skill - ")
            {
                assert_eq!(value, "", "{} should be empty", header);
            }
        }
    }

    #[test]
    fn present_sub_document_renders_unset_flags_as_no() {
        let record = fixtures::from_json(json!({
            "id": 3,
            "created_at": "2024-03-01T02:30:00Z",
            "skills": { "driver": "yes", "others": "=cmd|' /C calc'!A0" },
            "language": { "english": { "read": 1, "speak": true } }
        }));
        let cells = materialize(&record, &JOBSEEKER_COLUMNS);

        assert_eq!(cell(&cells, "Skill - Driver"), "Yes");
        assert_eq!(cell(&cells, "Skill - Plumbing"), "No");
        assert_eq!(cell(&cells, "Referral - SPES"), "No");
        assert_eq!(cell(&cells, "Other Skills"), "'=cmd|' /C calc'!A0");
        assert_eq!(cell(&cells, "English - Read"), "Yes");
        assert_eq!(cell(&cells, "English - Write"), "No");
        assert_eq!(cell(&cells, "Mandarin - Speak"), "No");
        assert_eq!(cell(&cells, "Currently in School"), "");
    }

    #[test]
    fn indexed_copies_fill_missing_identity() {
        let mut record = fixtures::bare(9);
        record.surname = Some("Santos".to_string());
        record.city = Some("Quezon City, NCR".to_string());
        let cells = materialize(&record, &JOBSEEKER_COLUMNS);
        assert_eq!(cell(&cells, "Surname"), "Santos");
        assert_eq!(cell(&cells, "City/Municipality"), "\"Quezon City, NCR\"");
    }

    #[test]
    fn join_row_terminates_line() {
        let cells: Vec<Cell> = vec!["a".into(), "".into(), "\"b,c\"".into()];
        let mut out = String::new();
        join_row(&cells, &mut out);
        assert_eq!(out, "a,,\"b,c\"\n");
    }

    #[test]
    fn materialize_into_reuses_buffer() {
        let mut cells = Vec::new();
        materialize_into(&fixtures::bare(1), &JOBSEEKER_COLUMNS, &mut cells);
        materialize_into(&fixtures::bare(2), &JOBSEEKER_COLUMNS, &mut cells);
        assert_eq!(cells.len(), JOBSEEKER_COLUMNS.len());
        assert_eq!(cells[0], "2");
    }
}
