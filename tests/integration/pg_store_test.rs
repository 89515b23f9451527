//! Postgres document store tests
//!
//! Run against a live database:
//! `TEST_DATABASE_URL=postgres://... cargo test -p devconnect-integration-tests --test pg_store_test -- --ignored`

use std::env;

use devconnect_common::{DocumentId, RepositoryError};
use devconnect_jobs::repository::postgres::UNIQUE_APPLICATION_INDEX;
use devconnect_jobs::{
    ApplicationDocument, ApplicationFilter, Fields, JobDocument, JobFilter, JobStore, PgJobStore,
    UpdateResult,
};
use serde_json::json;
use sqlx::PgPool;

async fn store() -> anyhow::Result<PgJobStore> {
    dotenvy::from_filename(".env.test").ok();
    let url = env::var("TEST_DATABASE_URL")?;

    let pool = PgPool::connect(&url).await?;
    let store = PgJobStore::new(pool);
    store.migrate().await?;

    sqlx::query("TRUNCATE all_jobs, applied_jobs")
        .execute(store.pool())
        .await?;
    sqlx::query(&format!("DROP INDEX IF EXISTS {UNIQUE_APPLICATION_INDEX}"))
        .execute(store.pool())
        .await?;

    Ok(store)
}

fn job(category: &str, owner: &str, applicants: u64) -> JobDocument {
    serde_json::from_value(json!({
        "jobCategory": category,
        "userEmail": owner,
        "applicantsNumber": applicants
    }))
    .unwrap()
}

fn application(job_id: &str, email: &str) -> ApplicationDocument {
    ApplicationDocument {
        job_id: job_id.to_string(),
        logged_email: email.to_string(),
        extra: Fields::new(),
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
#[serial_test::serial]
async fn test_job_documents_roundtrip_through_jsonb() {
    let store = store().await.unwrap();

    let mut document = job("backend", "a@x.com", 0);
    document
        .0
        .insert("salary".into(), json!({ "min": 1, "max": 2 }));
    document.0.insert("jobTitle".into(), json!(null));

    let first = store.insert_job(document.clone()).await.unwrap();
    store.insert_job(job("web", "b@x.com", 0)).await.unwrap();

    let stored = store.find_job(first.inserted_id).await.unwrap().unwrap();
    assert_eq!(stored.document, document);

    let backend = store
        .find_jobs(&JobFilter::Category("backend".into()))
        .await
        .unwrap();
    assert_eq!(backend.len(), 1);
    assert_eq!(backend[0].id, first.inserted_id);

    let all = store.find_jobs(&JobFilter::All).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first.inserted_id);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
#[serial_test::serial]
async fn test_filters_compare_json_strings_only() {
    let store = store().await.unwrap();
    store
        .insert_job(serde_json::from_value(json!({ "jobCategory": 5 })).unwrap())
        .await
        .unwrap();

    let matched = store
        .find_jobs(&JobFilter::Category("5".into()))
        .await
        .unwrap();
    assert!(matched.is_empty());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
#[serial_test::serial]
async fn test_replace_reports_match_or_upsert() {
    let store = store().await.unwrap();
    let id = DocumentId::new();

    let created = store
        .replace_job(id, job("backend", "a@x.com", 0))
        .await
        .unwrap();
    assert_eq!(created, UpdateResult::upserted(id));

    let unchanged = store
        .replace_job(id, job("backend", "a@x.com", 0))
        .await
        .unwrap();
    assert_eq!(unchanged, UpdateResult::matched(false));

    let changed = store
        .replace_job(id, job("web", "a@x.com", 0))
        .await
        .unwrap();
    assert_eq!(changed, UpdateResult::matched(true));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
#[serial_test::serial]
async fn test_increment_is_atomic_and_never_upserts() {
    let store = store().await.unwrap();
    let id = store
        .insert_job(job("backend", "a@x.com", 5))
        .await
        .unwrap()
        .inserted_id;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(
            async move { store.increment_applicants(id).await },
        ));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = store.find_job(id).await.unwrap().unwrap();
    assert_eq!(stored.document.applicants_number(), Some(&json!(15)));

    let missing = DocumentId::new();
    assert!(matches!(
        store.increment_applicants(missing).await,
        Err(RepositoryError::NotFound)
    ));
    assert!(store.find_job(missing).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
#[serial_test::serial]
async fn test_increment_counts_beyond_signed_range_and_rejects_text() {
    let store = store().await.unwrap();
    let large = store
        .insert_job(serde_json::from_value(json!({ "applicantsNumber": i64::MAX as u64 })).unwrap())
        .await
        .unwrap()
        .inserted_id;
    store.increment_applicants(large).await.unwrap();
    let stored = store.find_job(large).await.unwrap().unwrap();
    assert_eq!(
        stored.document.applicants_number(),
        Some(&json!(i64::MAX as u64 + 1))
    );

    let text = store
        .insert_job(serde_json::from_value(json!({ "applicantsNumber": "3" })).unwrap())
        .await
        .unwrap()
        .inserted_id;
    assert!(matches!(
        store.increment_applicants(text).await,
        Err(RepositoryError::Rejected(_))
    ));
    let stored = store.find_job(text).await.unwrap().unwrap();
    assert_eq!(stored.document.applicants_number(), Some(&json!("3")));

    let absent = store
        .insert_job(serde_json::from_value(json!({ "jobTitle": "x" })).unwrap())
        .await
        .unwrap()
        .inserted_id;
    store.increment_applicants(absent).await.unwrap();
    let stored = store.find_job(absent).await.unwrap().unwrap();
    assert_eq!(stored.document.applicants_number(), Some(&json!(1)));
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
#[serial_test::serial]
async fn test_delete_counts_removed_documents() {
    let store = store().await.unwrap();
    let id = store
        .insert_job(job("backend", "a@x.com", 0))
        .await
        .unwrap()
        .inserted_id;

    assert_eq!(store.delete_job(id).await.unwrap().deleted_count, 1);
    assert_eq!(store.delete_job(id).await.unwrap().deleted_count, 0);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
#[serial_test::serial]
async fn test_unique_index_rejects_duplicate_application() {
    let store = store().await.unwrap();
    store.ensure_unique_applications().await.unwrap();

    let first = store
        .insert_application_if_absent(application("job-1", "b@x.com"))
        .await
        .unwrap();
    assert!(first.is_some());

    let second = store
        .insert_application_if_absent(application("job-1", "b@x.com"))
        .await
        .unwrap();
    assert!(second.is_none());

    assert!(store.application_exists("job-1", "b@x.com").await.unwrap());

    let mine = store
        .find_applications(&ApplicationFilter::Applicant("b@x.com".into()))
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
#[serial_test::serial]
async fn test_insert_if_absent_fails_without_unique_index() {
    let store = store().await.unwrap();

    store
        .insert_application(application("job-1", "b@x.com"))
        .await
        .unwrap();
    store
        .insert_application(application("job-1", "b@x.com"))
        .await
        .unwrap();

    // Existing duplicates keep the index from being built
    assert!(store.ensure_unique_applications().await.is_err());

    let result = store
        .insert_application_if_absent(application("job-1", "b@x.com"))
        .await;
    assert!(matches!(result, Err(RepositoryError::Connection(_))));

    let stored = store
        .find_applications(&ApplicationFilter::Applicant("b@x.com".into()))
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
}
