mod common;

use anyhow::Result;
use axum::http::StatusCode;
use jobseeker_api::auth::AccessLevel;

use common::fixtures;

fn people() -> Vec<jobseeker_api::jobseeker::Jobseeker> {
    vec![
        fixtures::registered(1, "Dela Cruz", "Maria"),
        fixtures::registered(2, "Santos", "Jose"),
        fixtures::bare(3),
        fixtures::bare(4),
    ]
}

#[tokio::test]
async fn list_requires_token() -> Result<()> {
    let res = common::get(common::router(people()), "/api/jobseekers", None).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()?["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn denied_users_cannot_list() -> Result<()> {
    let res = common::get(common::router(people()), "/api/jobseekers", Some(AccessLevel::Deny)).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn read_users_page_through_records() -> Result<()> {
    let uri = "/api/jobseekers?page=2&page_size=3&order=id%20asc";
    let res = common::get(common::router(people()), uri, Some(AccessLevel::Read)).await?;
    assert_eq!(res.status, StatusCode::OK);

    let body = res.json()?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 4);
    assert_eq!(body["data"]["total_pages"], 2);
    assert_eq!(body["data"]["page"], 2);
    let records = body["data"]["records"].as_array().cloned().unwrap_or_default();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 4);
    Ok(())
}

#[tokio::test]
async fn filters_apply_to_listing() -> Result<()> {
    let uri = "/api/jobseekers?search=cruz&unknown_key=whatever";
    let res = common::get(common::router(people()), uri, Some(AccessLevel::Read)).await?;
    assert_eq!(res.status, StatusCode::OK);

    let body = res.json()?;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["records"][0]["surname"], "Dela Cruz");
    Ok(())
}

#[tokio::test]
async fn bad_order_is_a_client_error() -> Result<()> {
    let uri = "/api/jobseekers?order=tin";
    let res = common::get(common::router(people()), uri, Some(AccessLevel::Read)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["code"], "BAD_REQUEST");
    Ok(())
}
