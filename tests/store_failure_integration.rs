mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

#[tokio::test]
async fn integration_unreachable_store_yields_bare_500() {
    let app = build_app_with_store(Arc::new(FaultyStore::new(Fault::Everything)));

    for path in ["/jobs", "/jobs/65a1b2c3d4e5f6a7b8c9d0e1", "/applications/job/abc"] {
        let response = send(&app, request(Method::GET, path)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", path);
        assert_eq!(body_text(response).await, "", "{}", path);
    }

    let response = send(
        &app,
        json_request(Method::POST, "/jobs", &json!({"title": "Engineer"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "");
}

#[tokio::test]
async fn integration_failed_count_aborts_employer_listing() {
    let app = build_app_with_store(Arc::new(FaultyStore::new(Fault::Counts)));
    insert(&app, "/jobs", json!({"hr_email": "a@x.com", "title": "Engineer"})).await;

    let response = send(
        &app,
        request_with_bearer("/jobs/applications?email=a@x.com", EMPLOYER_TOKEN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "");

    // Reads that do not count still succeed.
    let response = send(&app, request(Method::GET, "/jobs?email=a@x.com")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}
