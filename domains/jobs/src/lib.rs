//! Jobs domain: job postings, job applications, and their HTTP API

pub mod api;
pub mod domain;
pub mod gateway;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use gateway::JobsGateway;
pub use repository::{InMemoryJobStore, JobStore, PgJobStore};

// Re-export API types
pub use api::routes;
pub use api::JobsState;
