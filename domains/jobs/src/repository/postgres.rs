//! Postgres-backed document store
//!
//! Each collection is a table of JSONB documents keyed by id. A `seq`
//! column records insertion order, which listings follow. Runtime
//! `sqlx::query` calls are used throughout because the document shape is
//! open-ended.

use async_trait::async_trait;
use devconnect_common::{DocumentId, RepositoryError};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{JobStore, StoreResult};
use crate::domain::entities::{
    ApplicationDocument, ApplicationFilter, DeleteResult, InsertOneResult, JobApplication,
    JobDocument, JobFilter, JobPosting, UpdateResult,
};

/// Name of the unique index behind store-enforced application uniqueness
pub const UNIQUE_APPLICATION_INDEX: &str = "applied_jobs_job_applicant_key";

const CREATE_UNIQUE_APPLICATION_INDEX: &str = r#"
    CREATE UNIQUE INDEX IF NOT EXISTS applied_jobs_job_applicant_key
    ON applied_jobs ((document->>'jobId'), (document->>'loggedEmail'))
"#;

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    document: Json<JobDocument>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id.into(),
            document: row.document.0,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    document: Json<ApplicationDocument>,
}

impl From<ApplicationRow> for JobApplication {
    fn from(row: ApplicationRow) -> Self {
        Self {
            id: row.id.into(),
            document: row.document.0,
        }
    }
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the collection tables if they do not exist yet
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Unavailable(format!("migration failed: {e}")))
    }

    /// Install the unique index that lets the store reject duplicate
    /// applications on its own.
    ///
    /// Fails if the collection already holds duplicates. Until the index
    /// exists, `insert_application_if_absent` fails instead of inserting.
    pub async fn ensure_unique_applications(&self) -> StoreResult<()> {
        sqlx::query(CREATE_UNIQUE_APPLICATION_INDEX)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Get a reference to the underlying database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert_job(&self, document: JobDocument) -> StoreResult<InsertOneResult> {
        let id = DocumentId::new();
        sqlx::query("INSERT INTO all_jobs (id, document) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(Json(&document))
            .execute(&self.pool)
            .await?;
        Ok(InsertOneResult::new(id))
    }

    async fn find_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<JobPosting>> {
        let rows = match filter {
            JobFilter::All => {
                sqlx::query_as::<_, JobRow>("SELECT id, document FROM all_jobs ORDER BY seq")
                    .fetch_all(&self.pool)
                    .await?
            }
            JobFilter::Category(category) => {
                sqlx::query_as::<_, JobRow>(
                    r#"
                    SELECT id, document FROM all_jobs
                    WHERE document->'jobCategory' = to_jsonb($1::text)
                    ORDER BY seq
                    "#,
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            JobFilter::Owner(email) => {
                sqlx::query_as::<_, JobRow>(
                    r#"
                    SELECT id, document FROM all_jobs
                    WHERE document->'userEmail' = to_jsonb($1::text)
                    ORDER BY seq
                    "#,
                )
                .bind(email)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn find_job(&self, id: DocumentId) -> StoreResult<Option<JobPosting>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT id, document FROM all_jobs WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(JobPosting::from))
    }

    async fn replace_job(
        &self,
        id: DocumentId,
        document: JobDocument,
    ) -> StoreResult<UpdateResult> {
        // The CTE reads the row as it was before this statement
        let previous: Option<Json<serde_json::Value>> = sqlx::query_scalar(
            r#"
            WITH previous AS (SELECT document FROM all_jobs WHERE id = $1)
            INSERT INTO all_jobs (id, document) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
                SET document = EXCLUDED.document, updated_at = NOW()
            RETURNING (SELECT document FROM previous)
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&document))
        .fetch_one(&self.pool)
        .await?;

        match previous {
            Some(Json(before)) => {
                let after = serde_json::to_value(&document)?;
                Ok(UpdateResult::matched(before != after))
            }
            None => Ok(UpdateResult::upserted(id)),
        }
    }

    async fn increment_applicants(&self, id: DocumentId) -> StoreResult<UpdateResult> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent increments of the same posting
        let current: Option<Json<JobDocument>> =
            sqlx::query_scalar("SELECT document FROM all_jobs WHERE id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        let Some(Json(mut document)) = current else {
            return Err(RepositoryError::NotFound);
        };
        document.increment_applicants()?;

        sqlx::query("UPDATE all_jobs SET document = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.as_uuid())
            .bind(Json(&document))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(UpdateResult::matched(true))
    }

    async fn delete_job(&self, id: DocumentId) -> StoreResult<DeleteResult> {
        let result = sqlx::query("DELETE FROM all_jobs WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(DeleteResult::new(result.rows_affected()))
    }

    async fn application_exists(&self, job_id: &str, logged_email: &str) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM applied_jobs
                WHERE document->>'jobId' = $1 AND document->>'loggedEmail' = $2
            )
            "#,
        )
        .bind(job_id)
        .bind(logged_email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_application(
        &self,
        document: ApplicationDocument,
    ) -> StoreResult<InsertOneResult> {
        let id = DocumentId::new();
        sqlx::query("INSERT INTO applied_jobs (id, document) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(Json(&document))
            .execute(&self.pool)
            .await?;
        Ok(InsertOneResult::new(id))
    }

    async fn insert_application_if_absent(
        &self,
        document: ApplicationDocument,
    ) -> StoreResult<Option<InsertOneResult>> {
        let id = DocumentId::new();
        // The named conflict target requires the unique index; without it the
        // statement errors instead of inserting
        let result = sqlx::query(
            r#"
            INSERT INTO applied_jobs (id, document) VALUES ($1, $2)
            ON CONFLICT ((document->>'jobId'), (document->>'loggedEmail')) DO NOTHING
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&document))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(InsertOneResult::new(id)))
    }

    async fn find_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> StoreResult<Vec<JobApplication>> {
        let rows = match filter {
            ApplicationFilter::All => {
                sqlx::query_as::<_, ApplicationRow>(
                    "SELECT id, document FROM applied_jobs ORDER BY seq",
                )
                .fetch_all(&self.pool)
                .await?
            }
            ApplicationFilter::Applicant(email) => {
                sqlx::query_as::<_, ApplicationRow>(
                    r#"
                    SELECT id, document FROM applied_jobs
                    WHERE document->>'loggedEmail' = $1
                    ORDER BY seq
                    "#,
                )
                .bind(email)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(JobApplication::from).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
