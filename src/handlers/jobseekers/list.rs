use axum::{
    extract::{Query, State},
    Extension,
};

use crate::app::AppState;
use crate::filter::FilterCriteria;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{JobseekerService, ListPage, ListQuery};

/// GET /api/jobseekers - paged listing with the same filter keys as export
pub async fn jobseekers_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<FilterCriteria>,
) -> ApiResult<ListPage> {
    user.require_list_access()?;

    let query = ListQuery::from_params(params)?;
    let page = JobseekerService::new(state.source.as_ref()).list(&query).await?;

    Ok(ApiResponse::success(page))
}
