use axum::{
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use tracing::info;

use crate::app::AppState;
use crate::auth::ExportGate;
use crate::config::config;
use crate::error::ApiError;
use crate::export::{CsvExport, ExportDriver, EXPORT_RECORDS_HEADER};
use crate::filter::FilterCriteria;
use crate::middleware::AuthUser;

/// GET /api/jobseekers/export - every matching record as one CSV download
///
/// The run stops early when the server begins shutting down.
pub async fn jobseekers_export(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Response, ApiError> {
    if config().security.enable_audit_logging {
        info!(actor = %user.actor(), criteria = ?criteria, "Jobseeker export requested");
    }

    let export = ExportDriver::new(state.source.as_ref())
        .with_cancellation(state.shutdown.child_token())
        .export(&criteria, &user)
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CsvExport::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (HeaderName::from_static(EXPORT_RECORDS_HEADER), export.records.to_string()),
        ],
        export.csv,
    )
        .into_response())
}
