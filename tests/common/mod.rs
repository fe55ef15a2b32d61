#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

use jobseeker_api::app::{app, AppState};
use jobseeker_api::auth::{generate_jwt, AccessLevel, Claims};
use jobseeker_api::export::EXPORT_RECORDS_HEADER;
use jobseeker_api::jobseeker::Jobseeker;
use jobseeker_api::testing::MemorySource;

pub use jobseeker_api::testing::fixtures;

/// Router over an in-memory record source
pub fn router(records: Vec<Jobseeker>) -> Router {
    app(AppState::new(Arc::new(MemorySource::new(records))))
}

pub fn token(access: AccessLevel) -> Result<String> {
    let claims = Claims::new("peso".to_string(), "officer".to_string(), access, Uuid::new_v4());
    generate_jwt(&claims).context("failed to mint test token")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub export_records: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_str(&self.body).context("response body is not JSON")
    }
}

pub async fn get(router: Router, uri: &str, access: Option<AccessLevel>) -> Result<TestResponse> {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(access) = access {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token(access)?));
    }
    let response = router.oneshot(request.body(Body::empty())?).await?;

    let status = response.status();
    let header_text = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header_text(header::CONTENT_TYPE.as_str());
    let content_disposition = header_text(header::CONTENT_DISPOSITION.as_str());
    let export_records = header_text(EXPORT_RECORDS_HEADER);

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(TestResponse {
        status,
        content_type,
        content_disposition,
        export_records,
        body: String::from_utf8(bytes.to_vec())?,
    })
}
