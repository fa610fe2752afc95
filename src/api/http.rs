//! HTTP implementation of [`JobApi`] against the job backend's REST routes.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::JobApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::jobs::{Job, JobFilter, JobId, JobUpdateParameters, NewJob};

/// REST client for the job backend.
#[derive(Clone)]
pub struct HttpJobApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpJobApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Send a request, folding transport failures and non-2xx answers into `ApiError`.
    async fn send(&self, op: &'static str, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(op, error = %e, "Job backend unreachable");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(op, status = status.as_u16(), "Job backend rejected request");
            return Err(ApiError::Status(status.as_u16()));
        }

        debug!(op, status = status.as_u16(), "Job backend request succeeded");
        Ok(response)
    }
}

/// Read the whole body and decode it as JSON.
async fn read_json<T: DeserializeOwned>(
    op: &'static str,
    response: Response,
) -> Result<T, ApiError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    serde_json::from_slice(&body).map_err(|e| {
        warn!(op, error = %e, "Job backend returned an unexpected body");
        ApiError::Decode(e.to_string())
    })
}

#[async_trait]
impl JobApi for HttpJobApi {
    async fn get_one(&self, id: &JobId) -> Result<Job, ApiError> {
        debug!(job_id = %id, "Fetching job");
        let request = self.client.get(self.url("job")).query(&[("id", id.as_str())]);
        let response = self.send("get_one", request).await?;
        read_json::<Option<Job>>("get_one", response)
            .await?
            .ok_or(ApiError::NotFound)
    }

    async fn list_by_filter(&self, filter: JobFilter) -> Result<Vec<Job>, ApiError> {
        debug!(%filter, "Listing jobs");
        let mut request = self.client.get(self.url("job"));
        if let Some(status) = filter.status() {
            request = request.query(&[("status", status.to_string())]);
        }
        let response = self.send("list", request).await?;
        read_json::<Option<Vec<Job>>>("list", response)
            .await?
            .ok_or(ApiError::NotFound)
    }

    async fn create(&self, job: &NewJob) -> Result<Job, ApiError> {
        debug!(description = %job.description, "Creating job");
        let request = self.client.post(self.url("job")).json(job);
        let response = self.send("create", request).await?;
        read_json("create", response).await
    }

    async fn update(&self, id: &JobId, changes: &JobUpdateParameters) -> Result<Job, ApiError> {
        debug!(job_id = %id, "Updating job");
        let request = self
            .client
            .put(self.url("job"))
            .query(&[("id", id.as_str())])
            .json(changes);
        let response = self.send("update", request).await?;
        read_json("update", response).await
    }

    async fn bulk_update(&self, jobs: &[Job]) -> Result<(), ApiError> {
        debug!(count = jobs.len(), "Bulk updating jobs");
        let request = self.client.put(self.url("bulkUpdate")).json(jobs);
        self.send("bulk_update", request).await?;
        Ok(())
    }

    async fn delete(&self, id: &JobId) -> Result<(), ApiError> {
        debug!(job_id = %id, "Deleting job");
        let request = self.client.delete(self.url("job")).query(&[("id", id.as_str())]);
        self.send("delete", request).await?;
        Ok(())
    }

    async fn archive(&self, id: &JobId) -> Result<(), ApiError> {
        debug!(job_id = %id, "Archiving job");
        let request = self.client.put(self.url("archive")).query(&[("id", id.as_str())]);
        self.send("archive", request).await?;
        Ok(())
    }
}
