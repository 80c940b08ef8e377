mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

#[tokio::test]
async fn integration_employer_and_applicant_scenario() {
    let app = build_app().await;
    let job_id = insert(
        &app,
        "/jobs",
        json!({
            "hr_email": "a@x.com",
            "title": "Engineer",
            "company": "Acme",
            "company_logo": "https://acme.test/logo.png"
        }),
    )
    .await;
    let application_id = insert(
        &app,
        "/applications",
        json!({"jobId": job_id, "applicant": "b@y.com", "linkedin": "in/b"}),
    )
    .await;

    let response = send(
        &app,
        request_with_bearer("/jobs/applications?email=a@x.com", EMPLOYER_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let jobs = body_json(response).await;
    assert_eq!(jobs.as_array().unwrap().len(), 1);
    assert_eq!(jobs[0]["application_count"], 1);

    let response = send(
        &app,
        request_with_bearer("/applications?email=b@y.com", APPLICANT_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let applications = body_json(response).await;
    let applications = applications.as_array().unwrap();
    assert_eq!(applications.len(), 1);

    let application = &applications[0];
    assert_eq!(application["_id"], application_id);
    assert_eq!(application["title"], "Engineer");
    assert_eq!(application["company"], "Acme");
    assert_eq!(application["company_logo"], "https://acme.test/logo.png");
    assert_eq!(application["linkedin"], "in/b");
    assert!(application.get("enrichment_error").is_none());
}

#[tokio::test]
async fn integration_applicant_list_requires_matching_token() {
    let app = build_app().await;

    let response = send(&app, request(Method::GET, "/applications?email=b@y.com")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        request_with_bearer("/applications?email=b@y.com", EMPLOYER_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn integration_dangling_job_marks_only_that_application() {
    let app = build_app().await;
    let job_id = insert(&app, "/jobs", json!({"hr_email": "a@x.com", "title": "Engineer"})).await;
    insert(&app, "/applications", json!({"jobId": job_id, "applicant": "b@y.com"})).await;
    insert(
        &app,
        "/applications",
        json!({"jobId": "65a1b2c3d4e5f6a7b8c9d0e1", "applicant": "b@y.com"}),
    )
    .await;
    insert(&app, "/applications", json!({"jobId": "garbage", "applicant": "b@y.com"})).await;

    let response = send(
        &app,
        request_with_bearer("/applications?email=b@y.com", APPLICANT_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let applications = body_json(response).await;
    let applications = applications.as_array().unwrap();
    assert_eq!(applications.len(), 3);

    assert_eq!(applications[0]["title"], "Engineer");
    for dangling in &applications[1..] {
        assert_eq!(dangling["enrichment_error"], "referenced job not found");
        assert!(dangling.get("title").is_none());
    }
}

#[tokio::test]
async fn integration_applications_by_job_are_unenriched() {
    let app = build_app().await;
    let job_id = insert(&app, "/jobs", json!({"hr_email": "a@x.com", "title": "Engineer"})).await;
    insert(&app, "/applications", json!({"jobId": job_id, "applicant": "b@y.com"})).await;
    insert(&app, "/applications", json!({"jobId": job_id, "applicant": "d@w.com"})).await;
    insert(&app, "/applications", json!({"jobId": "other", "applicant": "b@y.com"})).await;

    let response = send(
        &app,
        request(Method::GET, &format!("/applications/job/{}", job_id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let applications = body_json(response).await;
    let applications = applications.as_array().unwrap();
    assert_eq!(applications.len(), 2);
    assert!(applications.iter().all(|a| a["jobId"] == job_id.as_str()));
    assert!(applications.iter().all(|a| a.get("title").is_none()));
}

#[tokio::test]
async fn integration_status_update_is_idempotent() {
    let app = build_app().await;
    let job_id = insert(&app, "/jobs", json!({"hr_email": "a@x.com", "title": "Engineer"})).await;
    insert(
        &app,
        "/applications",
        json!({"jobId": job_id, "applicant": "b@y.com", "status": "pending"}),
    )
    .await;
    let list = body_json(
        send(&app, request(Method::GET, &format!("/applications/job/{}", job_id))).await,
    )
    .await;
    let application_id = list[0]["_id"].as_str().unwrap().to_string();
    let path = format!("/applications/{}", application_id);

    let response = send(&app, json_request(Method::PATCH, &path, &json!({"status": "interview"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["acknowledged"], true);
    assert_eq!(first["matchedCount"], 1);
    assert_eq!(first["modifiedCount"], 1);

    let second = body_json(
        send(&app, json_request(Method::PATCH, &path, &json!({"status": "interview"}))).await,
    )
    .await;
    assert_eq!(second["matchedCount"], 1);
    assert_eq!(second["modifiedCount"], 0);

    let list = body_json(
        send(&app, request(Method::GET, &format!("/applications/job/{}", job_id))).await,
    )
    .await;
    assert_eq!(list[0]["status"], "interview");
}

#[tokio::test]
async fn integration_status_update_on_malformed_id_matches_nothing() {
    let app = build_app().await;
    let response = send(
        &app,
        json_request(Method::PATCH, "/applications/nope", &json!({"status": "hired"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "acknowledged": true,
            "matchedCount": 0,
            "modifiedCount": 0,
            "upsertedCount": 0,
            "upsertedId": null
        })
    );
}
