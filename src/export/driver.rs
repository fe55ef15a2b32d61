//! Paged export of every record matching a set of filters into one CSV document.

use std::time::Instant;

use chrono::{FixedOffset, NaiveDate, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::columns::{ColumnRegistry, JOBSEEKER_COLUMNS};
use super::error::ExportError;
use super::row::{join_row, materialize_into};
use super::source::RecordSource;
use crate::auth::ExportGate;
use crate::config::config;
use crate::filter::{build_filters, FilterCriteria, OrderBy};

/// Records requested per page
pub const EXPORT_PAGE_SIZE: u32 = 1000;

pub const EXPORT_FILENAME_PREFIX: &str = "jobseekers";

/// Response header carrying the number of data rows in a served export
pub const EXPORT_RECORDS_HEADER: &str = "x-export-records";

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub page_size: u32,
    pub max_records: usize,
    pub utc_offset: FixedOffset,
}

impl ExportSettings {
    pub fn from_config() -> Self {
        let export = &config().export;
        Self {
            page_size: EXPORT_PAGE_SIZE,
            max_records: export.max_records,
            utc_offset: export.offset(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from_config()
    }
}

/// A finished export, ready to be served as a download.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub csv: String,
    pub filename: String,
    pub records: usize,
    pub pages: usize,
    pub elapsed_ms: u64,
}

impl CsvExport {
    pub const CONTENT_TYPE: &'static str = "text/csv; charset=utf-8";
}

/// `jobseekers_<YYYY-MM-DD>.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("{}_{}.csv", EXPORT_FILENAME_PREFIX, date.format("%Y-%m-%d"))
}

pub struct ExportDriver<'a> {
    source: &'a dyn RecordSource,
    registry: &'a ColumnRegistry,
    settings: ExportSettings,
    cancel_token: Option<CancellationToken>,
}

impl<'a> ExportDriver<'a> {
    pub fn new(source: &'a dyn RecordSource) -> Self {
        Self {
            source,
            registry: &*JOBSEEKER_COLUMNS,
            settings: ExportSettings::default(),
            cancel_token: None,
        }
    }

    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Stop before the next page fetch once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Runs one export and logs its outcome.
    ///
    /// The gate is consulted before the record source is touched. Any failure after
    /// that discards everything accumulated so far.
    pub async fn export(&self, criteria: &FilterCriteria, gate: &dyn ExportGate) -> Result<CsvExport, ExportError> {
        let started = Instant::now();
        let actor = gate.actor();
        let filters = criteria.active_count();

        let result = self.run(criteria, gate, started).await;
        match &result {
            Ok(done) => info!(
                actor = %actor,
                records = done.records,
                pages = done.pages,
                filters,
                elapsed_ms = done.elapsed_ms,
                filename = %done.filename,
                "Jobseeker export completed"
            ),
            Err(e @ ExportError::Source(_)) => error!(
                actor = %actor,
                filters,
                kind = e.kind(),
                error = %e,
                "Jobseeker export failed"
            ),
            Err(e) => warn!(actor = %actor, filters, kind = e.kind(), error = %e, "Jobseeker export refused"),
        }
        result
    }

    async fn run(
        &self,
        criteria: &FilterCriteria,
        gate: &dyn ExportGate,
        started: Instant,
    ) -> Result<CsvExport, ExportError> {
        gate.check_export_authorized()?;

        let predicates = build_filters(criteria);
        let order = [OrderBy::asc("id")];
        let page_size = self.settings.page_size.max(1);

        let mut csv = self.registry.header_line();
        csv.push('\n');
        let mut cells = Vec::with_capacity(self.registry.len());
        let mut records = 0usize;
        let mut pages = 0usize;
        let mut offset = 0u64;

        loop {
            if let Some(token) = &self.cancel_token {
                if token.is_cancelled() {
                    return Err(ExportError::Cancelled { records });
                }
            }

            let page = self.source.fetch_page(&predicates, &order, offset, page_size).await?;
            pages += 1;
            debug!(page = pages, offset, rows = page.len(), "Fetched export page");

            if records + page.len() > self.settings.max_records {
                return Err(ExportError::RecordCapExceeded { cap: self.settings.max_records });
            }

            for record in &page {
                materialize_into(record, self.registry, &mut cells);
                join_row(&cells, &mut csv);
            }
            records += page.len();

            if page.len() < page_size as usize {
                break;
            }
            offset += page.len() as u64;
        }

        if records == 0 {
            return Err(ExportError::EmptyResult);
        }

        let today = Utc::now().with_timezone(&self.settings.utc_offset).date_naive();
        Ok(CsvExport {
            csv,
            filename: export_filename(today),
            records,
            pages,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AccessDenied;
    use crate::database::DatabaseError;
    use crate::testing::{fixtures, MemorySource};

    struct Gate(bool);

    impl ExportGate for Gate {
        fn check_export_authorized(&self) -> Result<(), AccessDenied> {
            if self.0 {
                Ok(())
            } else {
                Err(AccessDenied::new("Export requires admin access"))
            }
        }

        fn actor(&self) -> String {
            "test".to_string()
        }
    }

    fn settings(page_size: u32, max_records: usize) -> ExportSettings {
        ExportSettings {
            page_size,
            max_records,
            utc_offset: FixedOffset::east_opt(8 * 3600).unwrap(),
        }
    }

    fn records(n: i64) -> Vec<crate::jobseeker::Jobseeker> {
        (1..=n).map(fixtures::bare).collect()
    }

    #[tokio::test]
    async fn full_page_then_empty_page_takes_two_fetches() {
        let source = MemorySource::new(records(4));
        let driver = ExportDriver::new(&source).with_settings(settings(4, 100));

        let export = driver.export(&FilterCriteria::new(), &Gate(true)).await.unwrap();
        assert_eq!(source.fetches(), 2);
        assert_eq!(export.records, 4);
        assert_eq!(export.pages, 2);
        assert_eq!(export.csv.lines().count(), 5);
        assert!(export.csv.ends_with('\n'));
    }

    #[tokio::test]
    async fn short_page_stops_after_one_fetch() {
        let source = MemorySource::new(records(3));
        let driver = ExportDriver::new(&source).with_settings(settings(4, 100));

        let export = driver.export(&FilterCriteria::new(), &Gate(true)).await.unwrap();
        assert_eq!(source.fetches(), 1);
        assert_eq!(export.records, 3);
    }

    #[tokio::test]
    async fn pages_follow_identity_order_without_gaps() {
        let mut shuffled = records(7);
        shuffled.reverse();
        let source = MemorySource::new(shuffled);
        let driver = ExportDriver::new(&source).with_settings(settings(3, 100));

        let export = driver.export(&FilterCriteria::new(), &Gate(true)).await.unwrap();
        let ids: Vec<&str> = export.csv.lines().skip(1).map(|l| l.split(',').next().unwrap_or("")).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7"]);
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test]
    async fn no_matches_is_an_error() {
        let source = MemorySource::new(vec![]);
        let driver = ExportDriver::new(&source).with_settings(settings(4, 100));

        let result = driver.export(&FilterCriteria::new(), &Gate(true)).await;
        assert!(matches!(result, Err(ExportError::EmptyResult)));
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn denied_gate_never_touches_source() {
        let source = MemorySource::new(records(2));
        let driver = ExportDriver::new(&source).with_settings(settings(4, 100));

        match driver.export(&FilterCriteria::new(), &Gate(false)).await {
            Err(ExportError::Unauthorized(denied)) => assert_eq!(denied.reason, "Export requires admin access"),
            other => panic!("expected unauthorized, got {:?}", other),
        }
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn fetch_error_aborts_export() {
        let source = MemorySource::new(records(10)).fail_on_fetch(2, "connection reset");
        let driver = ExportDriver::new(&source).with_settings(settings(4, 100));

        match driver.export(&FilterCriteria::new(), &Gate(true)).await {
            Err(ExportError::Source(DatabaseError::QueryError(msg))) => assert_eq!(msg, "connection reset"),
            other => panic!("expected source error, got {:?}", other),
        }
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn exceeding_record_cap_fails_instead_of_truncating() {
        let source = MemorySource::new(records(9));
        let driver = ExportDriver::new(&source).with_settings(settings(4, 5));

        let result = driver.export(&FilterCriteria::new(), &Gate(true)).await;
        assert!(matches!(result, Err(ExportError::RecordCapExceeded { cap: 5 })));
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_fetching() {
        let source = MemorySource::new(records(2));
        let token = CancellationToken::new();
        token.cancel();
        let driver = ExportDriver::new(&source)
            .with_settings(settings(4, 100))
            .with_cancellation(token);

        let result = driver.export(&FilterCriteria::new(), &Gate(true)).await;
        assert!(matches!(result, Err(ExportError::Cancelled { records: 0 })));
        assert_eq!(source.fetches(), 0);
    }

    /// Cancels `token` as soon as the first page has been served.
    struct CancelAfterFirstPage {
        inner: MemorySource,
        token: CancellationToken,
    }

    #[async_trait::async_trait]
    impl RecordSource for CancelAfterFirstPage {
        async fn fetch_page(
            &self,
            predicates: &[crate::filter::QueryPredicate],
            order: &[OrderBy],
            offset: u64,
            limit: u32,
        ) -> Result<Vec<crate::jobseeker::Jobseeker>, DatabaseError> {
            let page = self.inner.fetch_page(predicates, order, offset, limit).await;
            self.token.cancel();
            page
        }

        async fn count(&self, predicates: &[crate::filter::QueryPredicate]) -> Result<u64, DatabaseError> {
            self.inner.count(predicates).await
        }
    }

    #[tokio::test]
    async fn cancellation_between_pages_stops_before_next_fetch() {
        let token = CancellationToken::new();
        let source = CancelAfterFirstPage {
            inner: MemorySource::new(records(10)),
            token: token.clone(),
        };
        let driver = ExportDriver::new(&source)
            .with_settings(settings(4, 100))
            .with_cancellation(token);

        let result = driver.export(&FilterCriteria::new(), &Gate(true)).await;
        assert!(matches!(result, Err(ExportError::Cancelled { records: 4 })));
        assert_eq!(source.inner.fetches(), 1);
    }

    #[tokio::test]
    async fn legacy_record_with_malformed_blocks_still_exports() {
        let legacy = fixtures::from_json(serde_json::json!({
            "id": 2,
            "created_at": "2024-03-01T02:30:00Z",
            "personal_info": { "surname": "Ramos", "address": "Poblacion" },
            "training": { "entries": null },
            "eligibility": { "civilService": null },
            "job_preference": { "occupations": null }
        }));
        let source = MemorySource::new(vec![fixtures::bare(1), legacy]);
        let driver = ExportDriver::new(&source).with_settings(settings(4, 100));

        let export = driver.export(&FilterCriteria::new(), &Gate(true)).await.unwrap();
        assert_eq!(export.records, 2);
        let line = export.csv.lines().nth(2).unwrap_or("");
        assert!(line.starts_with("2,Ramos,"));
        assert_eq!(line.split(',').count(), JOBSEEKER_COLUMNS.len());
    }

    #[tokio::test]
    async fn filters_narrow_the_export() {
        let mut people = records(3);
        people[1].sex = Some("Female".to_string());
        let source = MemorySource::new(people);
        let driver = ExportDriver::new(&source).with_settings(settings(4, 100));

        let criteria = FilterCriteria::new().with("sex", "Female");
        let export = driver.export(&criteria, &Gate(true)).await.unwrap();
        assert_eq!(export.records, 1);
        assert!(export.csv.lines().nth(1).unwrap_or("").starts_with("2,"));
    }

    #[test]
    fn filename_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        assert_eq!(export_filename(date), "jobseekers_2024-07-09.csv");
    }
}
