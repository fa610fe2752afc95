//! Job records, enums, partial updates and list filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// How urgent a job is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for JobPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for JobPriority {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Submitted,
    InProgress,
    Completed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Submitted => "submitted",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// A tracked unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Absent until the backend has persisted the job.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JobId>,
    pub description: String,
    pub location: String,
    pub priority: JobPriority,
    pub status: JobStatus,
    pub submitted_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_date: Option<DateTime<Utc>>,
}

impl Job {
    /// Create an unpersisted job in the `submitted` state.
    pub fn new(
        description: impl Into<String>,
        location: impl Into<String>,
        priority: JobPriority,
    ) -> Self {
        Self {
            id: None,
            description: description.into(),
            location: location.into(),
            priority,
            status: JobStatus::Submitted,
            submitted_date: Utc::now(),
            last_updated_date: None,
        }
    }

    /// Builder: attach an identifier.
    pub fn with_id(mut self, id: impl Into<JobId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }
}

/// Fields required to create a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    pub description: String,
    pub location: String,
    pub priority: JobPriority,
}

impl NewJob {
    pub fn new(
        description: impl Into<String>,
        location: impl Into<String>,
        priority: JobPriority,
    ) -> Self {
        Self {
            description: description.into(),
            location: location.into(),
            priority,
        }
    }

    /// Reject blank description or location.
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("description is required".to_string());
        }
        if self.location.trim().is_empty() {
            return Err("location is required".to_string());
        }
        Ok(())
    }
}

/// The changed subset of a job's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobUpdateParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<JobPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

impl JobUpdateParameters {
    /// Field-level diff: only the fields where `draft` differs from `original`.
    pub fn between(original: &Job, draft: &Job) -> Self {
        Self {
            description: (original.description != draft.description)
                .then(|| draft.description.clone()),
            location: (original.location != draft.location).then(|| draft.location.clone()),
            priority: (original.priority != draft.priority).then_some(draft.priority),
            status: (original.status != draft.status).then_some(draft.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.location.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }

    /// Write every present field into `job`.
    pub fn apply_to(&self, job: &mut Job) {
        if let Some(description) = &self.description {
            job.description = description.clone();
        }
        if let Some(location) = &self.location {
            job.location = location.clone();
        }
        if let Some(priority) = self.priority {
            job.priority = priority;
        }
        if let Some(status) = self.status {
            job.status = status;
        }
    }
}

/// A single field edit made while a row is being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobField {
    Description(String),
    Location(String),
    Priority(JobPriority),
    Status(JobStatus),
}

impl JobField {
    /// Build an edit from an input name and its raw value.
    pub fn parse(name: &str, value: &str) -> Result<Self, String> {
        match name {
            "description" => Ok(Self::Description(value.to_string())),
            "location" => Ok(Self::Location(value.to_string())),
            "priority" => value.parse().map(Self::Priority),
            "status" => value.parse().map(Self::Status),
            _ => Err(format!("Unknown field: {}", name)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Description(_) => "description",
            Self::Location(_) => "location",
            Self::Priority(_) => "priority",
            Self::Status(_) => "status",
        }
    }

    pub fn apply(&self, job: &mut Job) {
        match self {
            Self::Description(v) => job.description = v.clone(),
            Self::Location(v) => job.location = v.clone(),
            Self::Priority(v) => job.priority = *v,
            Self::Status(v) => job.status = *v,
        }
    }
}

/// Which statuses the collection view retrieves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JobFilter {
    #[default]
    All,
    Submitted,
    InProgress,
    Completed,
}

impl JobFilter {
    /// Status constraint to send, `None` for `All`.
    pub fn status(&self) -> Option<JobStatus> {
        match self {
            Self::All => None,
            Self::Submitted => Some(JobStatus::Submitted),
            Self::InProgress => Some(JobStatus::InProgress),
            Self::Completed => Some(JobStatus::Completed),
        }
    }
}

impl std::fmt::Display for JobFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status() {
            None => write!(f, "all"),
            Some(status) => write!(f, "{status}"),
        }
    }
}

impl std::str::FromStr for JobFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "submitted" => Ok(Self::Submitted),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}
