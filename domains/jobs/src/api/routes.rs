//! Route definitions for Jobs domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{applications, jobs, session};
use super::middleware::JobsState;

/// Prefix shared by every versioned API route
pub const API_PREFIX: &str = "/api/v1";

/// Create session routes
fn session_routes() -> Router<JobsState> {
    Router::new()
        .route("/auth/jwt", post(session::login))
        .route("/auth/logout", post(session::logout))
}

/// Create job posting routes
fn job_routes() -> Router<JobsState> {
    Router::new()
        .route("/allJobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/allJobs/{category}", get(jobs::list_jobs_by_category))
        .route(
            "/allJobs/singleJobs/{id}",
            get(jobs::get_job)
                .put(jobs::replace_job)
                .delete(jobs::delete_job),
        )
        .route("/allJobs/jobDetails/{id}", get(jobs::get_job))
        .route(
            "/allJobs/applicants/number/{id}",
            get(jobs::get_job).put(jobs::increment_applicants),
        )
        .route("/jobs", get(jobs::list_owned_jobs))
}

/// Create job application routes
fn application_routes() -> Router<JobsState> {
    Router::new().route(
        "/user/appliedJobs",
        post(applications::record_application).get(applications::list_applications),
    )
}

/// Create all Jobs domain API routes, nested under `/api/v1`
pub fn routes() -> Router<JobsState> {
    let api = Router::new()
        .merge(session_routes())
        .merge(job_routes())
        .merge(application_routes());

    Router::new().nest(API_PREFIX, api)
}
