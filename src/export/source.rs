use async_trait::async_trait;

use crate::database::DatabaseError;
use crate::filter::{OrderBy, QueryPredicate};
use crate::jobseeker::Jobseeker;

/// Where jobseeker records come from.
///
/// Implementations must honour `order` exactly and apply `offset`/`limit` after it;
/// the export driver relies on that to page through a result set without skipping or
/// repeating records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_page(
        &self,
        predicates: &[QueryPredicate],
        order: &[OrderBy],
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Jobseeker>, DatabaseError>;

    async fn count(&self, predicates: &[QueryPredicate]) -> Result<u64, DatabaseError>;

    /// Connectivity check for health reporting
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
