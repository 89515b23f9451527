//! Job store gateway
//!
//! Applies the domain rules (upsert on replace, not-found on increment,
//! one application per applicant and job) on top of a `JobStore`.

use devconnect_common::{ApplicationUniqueness, DocumentId, Error, RepositoryError, Result};
use std::sync::Arc;

use crate::domain::entities::{
    ApplicationDocument, ApplicationFilter, ApplicationOutcome, DeleteResult, InsertOneResult,
    JobApplication, JobDocument, JobFilter, JobPosting, UpdateResult,
};
use crate::repository::JobStore;

#[derive(Clone)]
pub struct JobsGateway {
    store: Arc<dyn JobStore>,
    uniqueness: ApplicationUniqueness,
}

impl JobsGateway {
    pub fn new(store: Arc<dyn JobStore>, uniqueness: ApplicationUniqueness) -> Self {
        Self { store, uniqueness }
    }

    /// Insert a posting as submitted
    pub async fn create_job(&self, document: JobDocument) -> Result<InsertOneResult> {
        let result = self.store.insert_job(document.without_client_id()).await?;
        tracing::info!(job_id = %result.inserted_id, "Job posting created");
        Ok(result)
    }

    pub async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<JobPosting>> {
        Ok(self.store.find_jobs(&filter).await?)
    }

    pub async fn get_job(&self, id: DocumentId) -> Result<JobPosting> {
        self.store
            .find_job(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {id} not found")))
    }

    /// Replace a posting; an unknown id creates the posting under that id
    pub async fn replace_job(&self, id: DocumentId, document: JobDocument) -> Result<UpdateResult> {
        let result = self
            .store
            .replace_job(id, document.without_client_id())
            .await?;

        if result.upserted_count > 0 {
            tracing::info!(job_id = %id, "Job posting created by replace");
        }
        Ok(result)
    }

    pub async fn increment_applicant_count(&self, id: DocumentId) -> Result<UpdateResult> {
        match self.store.increment_applicants(id).await {
            Ok(result) => Ok(result),
            Err(RepositoryError::NotFound) => Err(Error::NotFound(format!("Job {id} not found"))),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a posting; deleting an unknown id is not an error
    pub async fn delete_job(&self, id: DocumentId) -> Result<DeleteResult> {
        let result = self.store.delete_job(id).await?;
        if result.deleted_count > 0 {
            tracing::info!(job_id = %id, "Job posting deleted");
        }
        Ok(result)
    }

    /// Record an application unless the applicant already applied to the job.
    ///
    /// In `CheckThenInsert` mode the lookup and the insert are separate store
    /// calls: two concurrent identical submissions can both be stored.
    pub async fn record_application(
        &self,
        document: ApplicationDocument,
    ) -> Result<ApplicationOutcome> {
        let document = document.without_client_id();

        let inserted = match self.uniqueness {
            ApplicationUniqueness::CheckThenInsert => {
                if self
                    .store
                    .application_exists(&document.job_id, &document.logged_email)
                    .await?
                {
                    None
                } else {
                    Some(self.store.insert_application(document.clone()).await?)
                }
            }
            ApplicationUniqueness::StoreEnforced => {
                self.store
                    .insert_application_if_absent(document.clone())
                    .await?
            }
        };

        match inserted {
            Some(result) => {
                tracing::info!(
                    application_id = %result.inserted_id,
                    job_id = %document.job_id,
                    "Application recorded"
                );
                Ok(ApplicationOutcome::Inserted(result))
            }
            None => {
                tracing::debug!(
                    job_id = %document.job_id,
                    applicant = %document.logged_email,
                    "Duplicate application ignored"
                );
                Ok(ApplicationOutcome::Duplicate)
            }
        }
    }

    pub async fn list_applications(
        &self,
        filter: ApplicationFilter,
    ) -> Result<Vec<JobApplication>> {
        Ok(self.store.find_applications(&filter).await?)
    }
}
