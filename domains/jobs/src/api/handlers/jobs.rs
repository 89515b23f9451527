//! Job posting API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use devconnect_auth::SessionUser;
use devconnect_common::{DocumentId, JsonBody, Result};
use serde::Deserialize;

use crate::api::middleware::JobsState;
use crate::domain::entities::{
    DeleteResult, InsertOneResult, JobDocument, JobFilter, JobPosting, UpdateResult,
};

/// Query parameters for listing the caller's own postings
#[derive(Debug, Deserialize)]
pub struct OwnedJobsParams {
    #[serde(rename = "userEmail")]
    pub user_email: Option<String>,
}

/// Create a job posting
///
/// **POST /api/v1/allJobs**
pub async fn create_job(
    State(state): State<JobsState>,
    JsonBody(document): JsonBody<JobDocument>,
) -> Result<Json<InsertOneResult>> {
    let result = state.gateway.create_job(document).await?;
    Ok(Json(result))
}

/// List every job posting
///
/// **GET /api/v1/allJobs**
pub async fn list_jobs(State(state): State<JobsState>) -> Result<Json<Vec<JobPosting>>> {
    let jobs = state.gateway.list_jobs(JobFilter::All).await?;
    Ok(Json(jobs))
}

/// List postings in one category
///
/// **GET /api/v1/allJobs/{category}**
pub async fn list_jobs_by_category(
    State(state): State<JobsState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<JobPosting>>> {
    let jobs = state.gateway.list_jobs(JobFilter::Category(category)).await?;
    Ok(Json(jobs))
}

/// Fetch a single posting
///
/// **GET /api/v1/allJobs/singleJobs/{id}**, also mounted where clients read
/// the applicant count.
pub async fn get_job(
    State(state): State<JobsState>,
    Path(id): Path<String>,
) -> Result<Json<JobPosting>> {
    let id = DocumentId::parse(&id)?;
    let job = state.gateway.get_job(id).await?;
    Ok(Json(job))
}

/// List the postings owned by the signed-in caller
///
/// **GET /api/v1/jobs?userEmail=**
///
/// The session must belong to the `userEmail` being asked about.
pub async fn list_owned_jobs(
    SessionUser(ctx): SessionUser,
    State(state): State<JobsState>,
    Query(params): Query<OwnedJobsParams>,
) -> Result<Json<Vec<JobPosting>>> {
    ctx.ensure_owner(params.user_email.as_deref())?;

    let jobs = state.gateway.list_jobs(JobFilter::Owner(ctx.email)).await?;
    Ok(Json(jobs))
}

/// Add one applicant to a posting
///
/// **PUT /api/v1/allJobs/applicants/number/{id}**
pub async fn increment_applicants(
    State(state): State<JobsState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>> {
    let id = DocumentId::parse(&id)?;
    let result = state.gateway.increment_applicant_count(id).await?;
    Ok(Json(result))
}

/// Replace a posting, creating it when the id is unknown
///
/// **PUT /api/v1/allJobs/singleJobs/{id}**
pub async fn replace_job(
    State(state): State<JobsState>,
    Path(id): Path<String>,
    JsonBody(document): JsonBody<JobDocument>,
) -> Result<Json<UpdateResult>> {
    let id = DocumentId::parse(&id)?;
    let result = state.gateway.replace_job(id, document).await?;
    Ok(Json(result))
}

/// Delete a posting
///
/// **DELETE /api/v1/allJobs/singleJobs/{id}**
pub async fn delete_job(
    State(state): State<JobsState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let id = DocumentId::parse(&id)?;
    let result = state.gateway.delete_job(id).await?;
    Ok(Json(result))
}
