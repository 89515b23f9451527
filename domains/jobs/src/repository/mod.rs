//! Document store access for the Jobs domain
//!
//! `JobStore` is the seam between the gateway and the storage backend. One
//! handle is built at startup and shared by every request.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use devconnect_common::{DocumentId, RepositoryError};

use crate::domain::entities::{
    ApplicationDocument, ApplicationFilter, DeleteResult, InsertOneResult, JobApplication,
    JobDocument, JobFilter, JobPosting, UpdateResult,
};

pub use memory::InMemoryJobStore;
pub use postgres::PgJobStore;

pub type StoreResult<T> = std::result::Result<T, RepositoryError>;

/// Operations over the job posting and job application collections
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a posting under a new store-generated id
    async fn insert_job(&self, document: JobDocument) -> StoreResult<InsertOneResult>;

    /// List postings in store-natural order
    async fn find_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<JobPosting>>;

    async fn find_job(&self, id: DocumentId) -> StoreResult<Option<JobPosting>>;

    /// Replace every field of the posting `id`, creating it when absent
    async fn replace_job(&self, id: DocumentId, document: JobDocument)
        -> StoreResult<UpdateResult>;

    /// Add one to `applicantsNumber` as a single atomic step.
    ///
    /// Fails with `RepositoryError::NotFound` and writes nothing when no
    /// posting has this id, and with `RepositoryError::Rejected` when the
    /// stored count cannot be incremented.
    async fn increment_applicants(&self, id: DocumentId) -> StoreResult<UpdateResult>;

    async fn delete_job(&self, id: DocumentId) -> StoreResult<DeleteResult>;

    /// Whether an application for `job_id` by `logged_email` exists
    async fn application_exists(&self, job_id: &str, logged_email: &str) -> StoreResult<bool>;

    /// Insert an application unconditionally
    async fn insert_application(
        &self,
        document: ApplicationDocument,
    ) -> StoreResult<InsertOneResult>;

    /// Insert an application unless one for the same job and applicant
    /// exists, deciding both atomically. `None` means nothing was written.
    async fn insert_application_if_absent(
        &self,
        document: ApplicationDocument,
    ) -> StoreResult<Option<InsertOneResult>>;

    async fn find_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> StoreResult<Vec<JobApplication>>;

    /// Round-trip to the backend
    async fn ping(&self) -> StoreResult<()>;
}
