//! Job board domain entities
//!
//! Postings and applications are schemaless documents. A posting is stored
//! exactly as the client sent it; the API reads the few fields its rules
//! depend on through accessors. Applications type the two fields that key
//! their uniqueness and carry everything else verbatim in `extra`.

use devconnect_common::{DocumentId, RepositoryError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Free-form document fields
pub type Fields = serde_json::Map<String, Value>;

/// Field name of the store-assigned identifier
pub const ID_FIELD: &str = "_id";

pub const CATEGORY_FIELD: &str = "jobCategory";
pub const OWNER_FIELD: &str = "userEmail";
pub const APPLICANTS_FIELD: &str = "applicantsNumber";

/// The applicant counter holds something other than a non-negative integer
#[derive(Debug, Clone, PartialEq, Error)]
#[error("applicantsNumber cannot be incremented: {0}")]
pub struct InvalidApplicantCount(pub Value);

/// Employer-supplied content of a job posting
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobDocument(pub Fields);

impl JobDocument {
    pub fn fields(&self) -> &Fields {
        &self.0
    }

    pub fn job_category(&self) -> Option<&str> {
        self.0.get(CATEGORY_FIELD).and_then(Value::as_str)
    }

    /// Owner identity
    pub fn user_email(&self) -> Option<&str> {
        self.0.get(OWNER_FIELD).and_then(Value::as_str)
    }

    /// The stored counter value, if any, as sent or last written
    pub fn applicants_number(&self) -> Option<&Value> {
        self.0.get(APPLICANTS_FIELD)
    }

    /// Add one to the applicant counter and return the new count.
    ///
    /// A missing or null counter counts from zero. Any other non-integer
    /// value, or a count already at `u64::MAX`, leaves the document untouched.
    pub fn increment_applicants(&mut self) -> Result<u64, InvalidApplicantCount> {
        let next = match self.0.get(APPLICANTS_FIELD) {
            None | Some(Value::Null) => 1,
            Some(current) => current
                .as_u64()
                .and_then(|count| count.checked_add(1))
                .ok_or_else(|| InvalidApplicantCount(current.clone()))?,
        };

        self.0.insert(APPLICANTS_FIELD.to_string(), Value::from(next));
        Ok(next)
    }

    /// Drop a client-supplied identifier; identity always comes from the store
    pub fn without_client_id(mut self) -> Self {
        self.0.remove(ID_FIELD);
        self
    }
}

impl From<InvalidApplicantCount> for RepositoryError {
    fn from(err: InvalidApplicantCount) -> Self {
        RepositoryError::Rejected(err.to_string())
    }
}

/// A stored job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(rename = "_id")]
    pub id: DocumentId,

    #[serde(flatten)]
    pub document: JobDocument,
}

/// Applicant-supplied content of a job application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDocument {
    /// Identifier of the posting applied to, as the client sent it
    #[serde(rename = "jobId")]
    pub job_id: String,

    /// Applicant identity
    #[serde(rename = "loggedEmail")]
    pub logged_email: String,

    #[serde(flatten)]
    pub extra: Fields,
}

impl ApplicationDocument {
    pub fn without_client_id(mut self) -> Self {
        self.extra.remove(ID_FIELD);
        self
    }

    /// Whether this application is for the same job by the same applicant
    pub fn same_applicant_and_job(&self, other: &ApplicationDocument) -> bool {
        self.job_id == other.job_id && self.logged_email == other.logged_email
    }
}

/// A stored job application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    #[serde(rename = "_id")]
    pub id: DocumentId,

    #[serde(flatten)]
    pub document: ApplicationDocument,
}

/// Which postings a listing returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    All,
    Category(String),
    Owner(String),
}

impl JobFilter {
    pub fn matches(&self, document: &JobDocument) -> bool {
        match self {
            JobFilter::All => true,
            JobFilter::Category(category) => document.job_category() == Some(category.as_str()),
            JobFilter::Owner(email) => document.user_email() == Some(email.as_str()),
        }
    }
}

/// Which applications a listing returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationFilter {
    All,
    Applicant(String),
}

impl ApplicationFilter {
    pub fn matches(&self, document: &ApplicationDocument) -> bool {
        match self {
            ApplicationFilter::All => true,
            ApplicationFilter::Applicant(email) => &document.logged_email == email,
        }
    }
}

/// Acknowledgment of a single insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

impl InsertOneResult {
    pub fn new(inserted_id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Acknowledgment of a single-document update or replace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<DocumentId>,
}

impl UpdateResult {
    /// An existing document was matched; `modified` tells whether it changed
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_count: 0,
            upserted_id: None,
        }
    }

    /// Nothing matched and a new document was created under `id`
    pub fn upserted(id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        }
    }
}

/// Acknowledgment of a single-document delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Result of recording an application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationOutcome {
    Inserted(InsertOneResult),
    /// The applicant already applied to this job; nothing was written
    Duplicate,
}
