use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::{self, postgres::PgRow, FromRow, PgPool, Row};
use tracing::warn;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::QueryBuilder;
use crate::export::RecordSource;
use crate::filter::{Filter, OrderBy, QueryPredicate};
use crate::jobseeker::Jobseeker;

pub const JOBSEEKER_TABLE: &str = "jobseekers";

/// Columns decoded by `FromRow for Jobseeker`
const RECORD_COLUMNS: [&str; 21] = [
    "id",
    "created_at",
    "updated_at",
    "created_by",
    "surname",
    "first_name",
    "sex",
    "employment_status",
    "is_ofw",
    "is_4ps",
    "city",
    "province",
    "personal_info",
    "employment",
    "job_preference",
    "language",
    "education",
    "training",
    "eligibility",
    "work_experience",
    "skills",
];

/// Postgres-backed record source over the `jobseekers` table.
///
/// Without an explicit pool it borrows the process-wide pool from [`DatabaseManager`],
/// connecting on first use.
#[derive(Clone, Default)]
pub struct JobseekerRepository {
    pool: Option<PgPool>,
}

impl JobseekerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn shared() -> Self {
        Self { pool: None }
    }

    async fn pool(&self) -> Result<PgPool, DatabaseError> {
        match &self.pool {
            Some(pool) => Ok(pool.clone()),
            None => DatabaseManager::pool().await,
        }
    }

    fn filter(predicates: &[QueryPredicate]) -> Result<Filter, DatabaseError> {
        let mut filter = Filter::new(JOBSEEKER_TABLE).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        filter.where_all(predicates);
        Ok(filter)
    }

    fn page_filter(
        predicates: &[QueryPredicate],
        order: &[OrderBy],
        offset: u64,
        limit: u32,
    ) -> Result<Filter, DatabaseError> {
        let mut filter = Self::filter(predicates)?;
        filter
            .select(RECORD_COLUMNS)
            .and_then(|f| f.order(order).limit(limit, Some(offset)))
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(filter)
    }
}

#[async_trait]
impl RecordSource for JobseekerRepository {
    async fn fetch_page(
        &self,
        predicates: &[QueryPredicate],
        order: &[OrderBy],
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Jobseeker>, DatabaseError> {
        let filter = Self::page_filter(predicates, order, offset, limit)?;
        let pool = self.pool().await?;
        QueryBuilder::<Jobseeker>::new(filter).select_all(&pool).await
    }

    async fn count(&self, predicates: &[QueryPredicate]) -> Result<u64, DatabaseError> {
        let filter = Self::filter(predicates)?;
        let pool = self.pool().await?;
        let count = QueryBuilder::<Jobseeker>::new(filter).count(&pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        match &self.pool {
            Some(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            None => DatabaseManager::health_check().await,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Jobseeker {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            created_by: row.try_get("created_by")?,
            surname: row.try_get("surname")?,
            first_name: row.try_get("first_name")?,
            sex: row.try_get("sex")?,
            employment_status: row.try_get("employment_status")?,
            is_ofw: row.try_get::<Option<bool>, _>("is_ofw")?.unwrap_or(false),
            is_4ps: row.try_get::<Option<bool>, _>("is_4ps")?.unwrap_or(false),
            city: row.try_get("city")?,
            province: row.try_get("province")?,
            personal_info: document(row, "personal_info")?,
            employment: document(row, "employment")?,
            job_preference: document(row, "job_preference")?,
            language: document(row, "language")?,
            education: document(row, "education")?,
            training: document(row, "training")?,
            eligibility: document(row, "eligibility")?,
            work_experience: document(row, "work_experience")?,
            skills: document(row, "skills")?,
        })
    }
}

/// Decodes a nullable JSONB sub-document column. A document that does not fit the
/// expected shape at all reads as absent rather than failing the row.
fn document<T: DeserializeOwned>(row: &PgRow, column: &str) -> Result<Option<T>, sqlx::Error> {
    let value: Option<sqlx::types::Json<Value>> = row.try_get(column)?;
    Ok(value.and_then(|json| match serde_json::from_value(json.0) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(column, error = %e, "Ignoring malformed jobseeker sub-document");
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FieldRef, OrderBy};

    #[test]
    fn page_query_selects_decoded_columns_in_id_order() {
        let predicates = [QueryPredicate::eq(FieldRef::Column("sex"), "Female")];
        let sql = JobseekerRepository::page_filter(&predicates, &[OrderBy::asc("id")], 2000, 1000)
            .unwrap()
            .to_sql();

        assert!(sql.query.starts_with("SELECT \"id\", \"created_at\", \"updated_at\""));
        assert!(sql.query.contains("\"skills\" FROM \"jobseekers\" WHERE \"sex\" = $1"));
        assert!(sql.query.ends_with("ORDER BY \"id\" ASC LIMIT 1000 OFFSET 2000"));
        assert_eq!(sql.params.len(), 1);
    }

    #[test]
    fn zero_page_size_is_a_query_error() {
        let result = JobseekerRepository::page_filter(&[], &[], 0, 0);
        assert!(matches!(result, Err(DatabaseError::QueryError(_))));
    }
}
