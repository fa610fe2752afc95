//! Remote access layer with one call per backend action.
//!
//! Every call is a stateless request/response mapping. Failures come back as
//! [`ApiError`] values; nothing is retried and nothing panics past this
//! boundary.

pub mod http;

pub use http::HttpJobApi;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::jobs::{Job, JobFilter, JobId, JobUpdateParameters, NewJob};

/// Backend operations on the job collection.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Fetch a single job by identifier.
    async fn get_one(&self, id: &JobId) -> Result<Job, ApiError>;

    /// Fetch the collection, constrained to one status unless `filter` is `All`.
    async fn list_by_filter(&self, filter: JobFilter) -> Result<Vec<Job>, ApiError>;

    /// Persist a new job. The returned job carries its id and submission time.
    async fn create(&self, job: &NewJob) -> Result<Job, ApiError>;

    /// Submit the changed fields of one job and get the full updated record.
    async fn update(&self, id: &JobId, changes: &JobUpdateParameters) -> Result<Job, ApiError>;

    /// Submit complete updated jobs in one request. All-or-nothing from the
    /// caller's point of view.
    async fn bulk_update(&self, jobs: &[Job]) -> Result<(), ApiError>;

    /// Remove a job permanently.
    async fn delete(&self, id: &JobId) -> Result<(), ApiError>;

    /// Hide a job from the active list without deleting it.
    async fn archive(&self, id: &JobId) -> Result<(), ApiError>;
}
