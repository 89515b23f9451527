//! Job application API handlers

use axum::{
    extract::{Query, State},
    Json,
};
use devconnect_auth::SessionUser;
use devconnect_common::{JsonBody, Result};
use serde::{Deserialize, Serialize};

use crate::api::middleware::JobsState;
use crate::domain::entities::{
    ApplicationDocument, ApplicationFilter, ApplicationOutcome, InsertOneResult, JobApplication,
};

const DUPLICATE_MESSAGE: &str = "You have already applied for this job";

/// Query parameters for listing the caller's applications
#[derive(Debug, Deserialize)]
pub struct AppliedJobsParams {
    #[serde(rename = "loggedEmail")]
    pub logged_email: Option<String>,
}

/// Body returned when an application was not stored because it exists
#[derive(Debug, Serialize)]
pub struct DuplicateApplication {
    pub acknowledged: bool,
    pub duplicate: bool,
    pub message: &'static str,
}

/// Response for recording an application; both variants are 200s
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApplicationResponse {
    Inserted(InsertOneResult),
    Duplicate(DuplicateApplication),
}

impl From<ApplicationOutcome> for ApplicationResponse {
    fn from(outcome: ApplicationOutcome) -> Self {
        match outcome {
            ApplicationOutcome::Inserted(result) => ApplicationResponse::Inserted(result),
            ApplicationOutcome::Duplicate => ApplicationResponse::Duplicate(DuplicateApplication {
                acknowledged: false,
                duplicate: true,
                message: DUPLICATE_MESSAGE,
            }),
        }
    }
}

/// Record an application
///
/// **POST /api/v1/user/appliedJobs**
pub async fn record_application(
    State(state): State<JobsState>,
    JsonBody(document): JsonBody<ApplicationDocument>,
) -> Result<Json<ApplicationResponse>> {
    let outcome = state.gateway.record_application(document).await?;
    Ok(Json(outcome.into()))
}

/// List the signed-in caller's applications
///
/// **GET /api/v1/user/appliedJobs?loggedEmail=**
pub async fn list_applications(
    SessionUser(ctx): SessionUser,
    State(state): State<JobsState>,
    Query(params): Query<AppliedJobsParams>,
) -> Result<Json<Vec<JobApplication>>> {
    ctx.ensure_owner(params.logged_email.as_deref())?;

    let applications = state
        .gateway
        .list_applications(ApplicationFilter::Applicant(ctx.email))
        .await?;
    Ok(Json(applications))
}
