//! In-memory document store
//!
//! Keeps both collections in insertion order behind one `RwLock`. Used for
//! tests and for running the API without a database.

use async_trait::async_trait;
use devconnect_common::{DocumentId, RepositoryError};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{JobStore, StoreResult};
use crate::domain::entities::{
    ApplicationDocument, ApplicationFilter, DeleteResult, InsertOneResult, JobApplication,
    JobDocument, JobFilter, JobPosting, UpdateResult,
};

#[derive(Debug, Default)]
struct Collections {
    jobs: Vec<JobPosting>,
    applications: Vec<JobApplication>,
}

/// Thread-safe in-memory store. Clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored applications, for assertions
    pub fn application_count(&self) -> usize {
        self.collections
            .read()
            .map(|c| c.applications.len())
            .unwrap_or(0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|e| RepositoryError::Unavailable(format!("collections lock poisoned: {e}")))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|e| RepositoryError::Unavailable(format!("collections lock poisoned: {e}")))
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert_job(&self, document: JobDocument) -> StoreResult<InsertOneResult> {
        let id = DocumentId::new();
        self.write()?.jobs.push(JobPosting { id, document });
        Ok(InsertOneResult::new(id))
    }

    async fn find_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<JobPosting>> {
        Ok(self
            .read()?
            .jobs
            .iter()
            .filter(|job| filter.matches(&job.document))
            .cloned()
            .collect())
    }

    async fn find_job(&self, id: DocumentId) -> StoreResult<Option<JobPosting>> {
        Ok(self.read()?.jobs.iter().find(|job| job.id == id).cloned())
    }

    async fn replace_job(
        &self,
        id: DocumentId,
        document: JobDocument,
    ) -> StoreResult<UpdateResult> {
        let mut collections = self.write()?;

        match collections.jobs.iter_mut().find(|job| job.id == id) {
            Some(existing) => {
                let modified = existing.document != document;
                existing.document = document;
                Ok(UpdateResult::matched(modified))
            }
            None => {
                collections.jobs.push(JobPosting { id, document });
                Ok(UpdateResult::upserted(id))
            }
        }
    }

    async fn increment_applicants(&self, id: DocumentId) -> StoreResult<UpdateResult> {
        let mut collections = self.write()?;

        let job = collections
            .jobs
            .iter_mut()
            .find(|job| job.id == id)
            .ok_or(RepositoryError::NotFound)?;

        job.document.increment_applicants()?;

        Ok(UpdateResult::matched(true))
    }

    async fn delete_job(&self, id: DocumentId) -> StoreResult<DeleteResult> {
        let mut collections = self.write()?;

        let before = collections.jobs.len();
        collections.jobs.retain(|job| job.id != id);
        let deleted = (before - collections.jobs.len()) as u64;

        Ok(DeleteResult::new(deleted))
    }

    async fn application_exists(&self, job_id: &str, logged_email: &str) -> StoreResult<bool> {
        Ok(self.read()?.applications.iter().any(|application| {
            application.document.job_id == job_id
                && application.document.logged_email == logged_email
        }))
    }

    async fn insert_application(
        &self,
        document: ApplicationDocument,
    ) -> StoreResult<InsertOneResult> {
        let id = DocumentId::new();
        self.write()?
            .applications
            .push(JobApplication { id, document });
        Ok(InsertOneResult::new(id))
    }

    async fn insert_application_if_absent(
        &self,
        document: ApplicationDocument,
    ) -> StoreResult<Option<InsertOneResult>> {
        let mut collections = self.write()?;

        if collections
            .applications
            .iter()
            .any(|application| application.document.same_applicant_and_job(&document))
        {
            return Ok(None);
        }

        let id = DocumentId::new();
        collections.applications.push(JobApplication { id, document });
        Ok(Some(InsertOneResult::new(id)))
    }

    async fn find_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> StoreResult<Vec<JobApplication>> {
        Ok(self
            .read()?
            .applications
            .iter()
            .filter(|application| filter.matches(&application.document))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}
