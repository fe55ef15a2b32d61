use serde::Serialize;
use tracing::debug;

use crate::config::config;
use crate::database::DatabaseError;
use crate::export::RecordSource;
use crate::filter::{build_filters, FilterCriteria, FilterError, FilterOrder, OrderBy};
use crate::jobseeker::Jobseeker;

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Invalid page '{0}': pages start at 1")]
    InvalidPage(String),
    #[error("Invalid page size '{0}'")]
    InvalidPageSize(String),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Record source failed: {0}")]
    Source(#[from] DatabaseError),
}

/// Paging and ordering for one listing request, plus the filters to apply.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub order: Option<String>,
    pub criteria: FilterCriteria,
}

impl ListQuery {
    /// Splits `page`, `page_size` and `order` out of a flat query-string map; the rest
    /// stays behind as filter criteria.
    pub fn from_params(mut params: FilterCriteria) -> Result<Self, ListError> {
        let page = params
            .take("page")
            .map(|raw| raw.trim().parse::<u32>().ok().filter(|p| *p > 0).ok_or(ListError::InvalidPage(raw)))
            .transpose()?;
        let page_size = params
            .take("page_size")
            .or_else(|| params.take("pageSize"))
            .map(|raw| raw.trim().parse::<u32>().ok().filter(|s| *s > 0).ok_or(ListError::InvalidPageSize(raw)))
            .transpose()?;
        let order = params.take("order");

        Ok(Self {
            page,
            page_size,
            order,
            criteria: params,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListPage {
    pub records: Vec<Jobseeker>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

/// Paged search over jobseeker records.
pub struct JobseekerService<'a> {
    source: &'a dyn RecordSource,
}

impl<'a> JobseekerService<'a> {
    pub fn new(source: &'a dyn RecordSource) -> Self {
        Self { source }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ListPage, ListError> {
        let filter_config = &config().filter;
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .page_size
            .unwrap_or(filter_config.default_page_size)
            .clamp(1, filter_config.max_page_size.max(1));
        let order = match query.order.as_deref() {
            Some(raw) => {
                let parsed = FilterOrder::parse(raw)?;
                if parsed.is_empty() {
                    default_order()
                } else {
                    parsed
                }
            }
            None => default_order(),
        };

        let unknown = query.criteria.unknown_keys();
        if !unknown.is_empty() {
            debug!(keys = ?unknown, "Ignoring unrecognised filter keys");
        }

        let predicates = build_filters(&query.criteria);
        let total = self.source.count(&predicates).await?;
        let offset = u64::from(page - 1) * u64::from(page_size);
        let records = if offset < total {
            self.source.fetch_page(&predicates, &order, offset, page_size).await?
        } else {
            Vec::new()
        };

        Ok(ListPage {
            records,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(u64::from(page_size)),
        })
    }
}

/// Newest registrations first, identity as tie-break
fn default_order() -> Vec<OrderBy> {
    vec![OrderBy::desc("created_at"), OrderBy::desc("id")]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MemorySource};

    fn people(n: i64) -> MemorySource {
        MemorySource::new((1..=n).map(fixtures::bare).collect())
    }

    #[test]
    fn splits_paging_from_filters() {
        let params: FilterCriteria = [("page", "2"), ("page_size", "10"), ("order", "surname"), ("sex", "Male")]
            .into_iter()
            .collect();
        let query = ListQuery::from_params(params).unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.page_size, Some(10));
        assert_eq!(query.order.as_deref(), Some("surname"));
        assert!(query.criteria.unknown_keys().is_empty());
        assert_eq!(query.criteria.active_count(), 1);
    }

    #[test]
    fn rejects_zero_and_garbage_pages() {
        let zero: FilterCriteria = [("page", "0")].into_iter().collect();
        assert!(matches!(ListQuery::from_params(zero), Err(ListError::InvalidPage(_))));

        let garbage: FilterCriteria = [("page_size", "many")].into_iter().collect();
        assert!(matches!(ListQuery::from_params(garbage), Err(ListError::InvalidPageSize(_))));
    }

    #[tokio::test]
    async fn pages_through_matches() {
        let source = people(5);
        let service = JobseekerService::new(&source);
        let query = ListQuery {
            page: Some(2),
            page_size: Some(2),
            order: Some("id asc".to_string()),
            ..Default::default()
        };

        let page = service.list(&query).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        let ids: Vec<i64> = page.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn default_order_breaks_ties_by_id_descending() {
        // every fixture shares one created_at
        let source = people(3);
        let page = JobseekerService::new(&source).list(&ListQuery::default()).await.unwrap();
        let ids: Vec<i64> = page.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn page_past_the_end_skips_fetch() {
        let source = people(2);
        let query = ListQuery {
            page: Some(9),
            ..Default::default()
        };
        let page = JobseekerService::new(&source).list(&query).await.unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 2);
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn unsortable_column_is_rejected() {
        let source = people(1);
        let query = ListQuery {
            order: Some("tin desc".to_string()),
            ..Default::default()
        };
        let result = JobseekerService::new(&source).list(&query).await;
        assert!(matches!(result, Err(ListError::Filter(FilterError::InvalidColumn(_)))));
    }
}
