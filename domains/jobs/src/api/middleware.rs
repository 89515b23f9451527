//! Jobs domain state and session authorizer integration

use crate::JobsGateway;
use axum::extract::FromRef;
use devconnect_auth::SessionAuthorizer;

/// Application state for the Jobs domain
#[derive(Clone)]
pub struct JobsState {
    pub gateway: JobsGateway,
    pub auth: SessionAuthorizer,
}

impl FromRef<JobsState> for SessionAuthorizer {
    fn from_ref(state: &JobsState) -> Self {
        state.auth.clone()
    }
}
