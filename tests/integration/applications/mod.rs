//! Job application integration tests

use axum::http::{Method, StatusCode};
use devconnect_common::ApplicationUniqueness;
use serde_json::{json, Value};

use crate::common::{cookie_request, json_request, TestApp};

fn application(job_id: &str, email: &str) -> Value {
    json!({
        "jobId": job_id,
        "loggedEmail": email,
        "resumeLink": "https://example.com/cv.pdf"
    })
}

async fn apply(app: &TestApp, body: Value) -> (StatusCode, Value) {
    let response = app
        .send(json_request(Method::POST, "/api/v1/user/appliedJobs", Some(body)))
        .await;
    (response.status, response.json())
}

#[tokio::test]
async fn test_second_application_is_reported_as_duplicate() {
    for mode in [
        ApplicationUniqueness::CheckThenInsert,
        ApplicationUniqueness::StoreEnforced,
    ] {
        let app = TestApp::with_uniqueness(mode);

        let (status, first) = apply(&app, application("job-1", "b@x.com")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["acknowledged"], true);
        assert!(first["insertedId"].is_string());

        let (status, second) = apply(&app, application("job-1", "b@x.com")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["acknowledged"], false);
        assert_eq!(second["duplicate"], true);
        assert!(second["message"].is_string());
        assert!(second.get("insertedId").is_none());

        assert_eq!(app.store.application_count(), 1, "mode {:?}", mode);
    }
}

#[tokio::test]
async fn test_store_enforced_mode_admits_one_of_many_concurrent_submissions() {
    let app = TestApp::with_uniqueness(ApplicationUniqueness::StoreEnforced);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let router = app.router();
        let request = json_request(
            Method::POST,
            "/api/v1/user/appliedJobs",
            Some(application("job-1", "b@x.com")),
        );
        handles.push(tokio::spawn(async move {
            use tower::ServiceExt;
            router.oneshot(request).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(app.store.application_count(), 1);
}

#[tokio::test]
async fn test_different_jobs_and_applicants_are_independent() {
    let app = TestApp::new();

    apply(&app, application("job-1", "b@x.com")).await;
    let (_, other_job) = apply(&app, application("job-2", "b@x.com")).await;
    let (_, other_applicant) = apply(&app, application("job-1", "c@x.com")).await;

    assert_eq!(other_job["acknowledged"], true);
    assert_eq!(other_applicant["acknowledged"], true);
    assert_eq!(app.store.application_count(), 3);
}

#[tokio::test]
async fn test_application_requires_job_and_applicant() {
    let app = TestApp::new();

    for body in [
        json!({ "jobId": "job-1" }),
        json!({ "loggedEmail": "b@x.com" }),
    ] {
        let response = app
            .send(json_request(
                Method::POST,
                "/api/v1/user/appliedJobs",
                Some(body),
            ))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), "VALIDATION_ERROR");
    }

    assert_eq!(app.store.application_count(), 0);
}

#[tokio::test]
async fn test_list_applications_returns_only_callers() {
    let app = TestApp::new();
    apply(&app, application("job-1", "b@x.com")).await;
    apply(&app, application("job-2", "b@x.com")).await;
    apply(&app, application("job-1", "c@x.com")).await;

    let response = app
        .send(cookie_request(
            Method::GET,
            "/api/v1/user/appliedJobs?loggedEmail=b@x.com",
            &app.session_cookie("b@x.com"),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let listing = response.json();
    let listing = listing.as_array().unwrap();
    assert_eq!(listing.len(), 2);
    assert!(listing.iter().all(|a| a["loggedEmail"] == "b@x.com"));
    assert_eq!(listing[0]["jobId"], "job-1");
    assert_eq!(listing[1]["jobId"], "job-2");
    assert_eq!(listing[0]["resumeLink"], "https://example.com/cv.pdf");
}

#[tokio::test]
async fn test_list_applications_requires_session() {
    let app = TestApp::new();
    apply(&app, application("job-1", "b@x.com")).await;

    let response = app
        .send(json_request(
            Method::GET,
            "/api/v1/user/appliedJobs?loggedEmail=b@x.com",
            None,
        ))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_applications_for_someone_else_is_forbidden() {
    let app = TestApp::new();
    apply(&app, application("job-1", "b@x.com")).await;

    let response = app
        .send(cookie_request(
            Method::GET,
            "/api/v1/user/appliedJobs?loggedEmail=b@x.com",
            &app.session_cookie("c@x.com"),
        ))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
    assert!(!response.text().contains("job-1"));
}
