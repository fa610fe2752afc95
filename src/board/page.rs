//! Page-level container for the job list.
//!
//! Owns the job collection, one [`RowController`] per job, and the shared
//! [`PendingEdits`]. The state lock is never held across a backend call:
//! each handler snapshots what it needs, releases the lock, awaits the
//! [`JobApi`], then re-acquires the lock to apply the response.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::pending::PendingEdits;
use super::row::{RowController, RowState, SavePlan};
use crate::api::JobApi;
use crate::error::BoardError;
use crate::jobs::{Job, JobField, JobFilter, JobId, NewJob};
use crate::notify::Notifier;

/// Result of saving a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing changed; the row returned to display without a request.
    Unchanged,
    /// The backend accepted the changes and returned this job.
    Saved(Job),
}

/// Result of a bulk save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkSaveOutcome {
    /// Fewer than two rows are being edited.
    NotOffered,
    /// Another bulk save is still outstanding.
    InFlight,
    /// `count` drafts were saved; `reloaded` tells whether the follow-up
    /// reload succeeded.
    Saved { count: usize, reloaded: bool },
}

/// Everything needed to render one row.
#[derive(Debug, Clone)]
pub struct RowView {
    pub job: Job,
    pub state: RowState,
    pub draft: Option<Job>,
    pub error: Option<String>,
}

impl RowView {
    /// The value to show: the draft while editing, the stored job otherwise.
    pub fn shown(&self) -> &Job {
        self.draft.as_ref().unwrap_or(&self.job)
    }
}

#[derive(Debug, Clone, Copy)]
enum Removal {
    Delete,
    Archive,
}

impl Removal {
    fn verb(&self) -> &'static str {
        match self {
            Self::Delete => "Deleted",
            Self::Archive => "Archived",
        }
    }
}

#[derive(Default)]
struct BoardState {
    /// Render order.
    jobs: Vec<Job>,
    rows: HashMap<JobId, RowController>,
    pending: PendingEdits,
    filter: JobFilter,
    /// Bumped whenever every row must drop back to display.
    generation: u64,
    error: Option<String>,
}

impl BoardState {
    fn job(&self, id: &JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id.as_ref() == Some(id))
    }

    fn job_mut(&mut self, id: &JobId) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.id.as_ref() == Some(id))
    }

    /// Advance the generation and push it to every row. Returns how many
    /// drafts were discarded.
    fn reset_rows(&mut self) -> usize {
        self.generation += 1;
        let generation = self.generation;
        self.rows
            .values_mut()
            .map(|row| row.observe_reset(generation))
            .filter(|discarded| *discarded)
            .count()
    }

    /// Install a fresh collection. Rows whose job has a pending draft come
    /// back in edit mode with that draft; drafts for jobs that are gone are
    /// dropped.
    fn replace_collection(&mut self, jobs: Vec<Job>) {
        let generation = self.generation;
        let mut kept = Vec::with_capacity(jobs.len());
        let mut rows = HashMap::with_capacity(jobs.len());

        for job in jobs {
            let Some(id) = job.id.clone() else {
                warn!(description = %job.description, "Skipping job without an id");
                continue;
            };
            let row = match self.pending.get(&id) {
                Some(draft) => RowController::resume(id.clone(), generation, draft.clone()),
                None => RowController::new(id.clone(), generation),
            };
            rows.insert(id, row);
            kept.push(job);
        }

        let before = self.pending.len();
        self.pending.retain(|id| rows.contains_key(id));
        let dropped = before - self.pending.len();
        if dropped > 0 {
            debug!(dropped, "Dropped drafts for jobs no longer listed");
        }

        self.jobs = kept;
        self.rows = rows;
    }

    fn remove_job(&mut self, id: &JobId) {
        self.jobs.retain(|j| j.id.as_ref() != Some(id));
        self.rows.remove(id);
        self.pending.set(id.clone(), None);
    }
}

/// Marks a bulk save as outstanding until dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The page-level container for the job list.
pub struct JobBoard {
    api: Arc<dyn JobApi>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<BoardState>,
    bulk_in_flight: AtomicBool,
}

impl JobBoard {
    /// Create an empty board. Call [`JobBoard::load`] to populate it.
    pub fn new(api: Arc<dyn JobApi>, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        Arc::new(Self {
            api,
            notifier,
            state: RwLock::new(BoardState::default()),
            bulk_in_flight: AtomicBool::new(false),
        })
    }

    // ── Collection ─────────────────────────────────────────────────────

    /// Replace the collection with the jobs matching `filter`.
    ///
    /// Pending edits are dropped and every row returns to display before the
    /// request goes out. Edits started while the request is outstanding are
    /// carried over onto the fresh rows. A response overtaken by a newer load
    /// or bulk reset is discarded with [`BoardError::Superseded`]. On failure
    /// the previous collection is kept.
    pub async fn load(&self, filter: JobFilter) -> Result<usize, BoardError> {
        let requested = {
            let mut state = self.state.write().await;
            state.pending.clear();
            let discarded = state.reset_rows();
            if discarded > 0 {
                debug!(discarded, "Discarded drafts before reload");
            }
            state.generation
        };

        match self.api.list_by_filter(filter).await {
            Ok(jobs) => {
                let mut state = self.state.write().await;
                if state.generation != requested {
                    debug!(
                        %filter,
                        requested,
                        current = state.generation,
                        "Dropping stale job list"
                    );
                    return Err(BoardError::Superseded);
                }
                state.replace_collection(jobs);
                state.filter = filter;
                state.error = None;
                let count = state.jobs.len();
                info!(%filter, count, "Jobs loaded");
                Ok(count)
            }
            Err(e) => {
                warn!(%filter, error = %e, "Failed to load jobs");
                self.state.write().await.error = Some(e.to_string());
                self.notifier.error("Unable to Load the Jobs");
                Err(e.into())
            }
        }
    }

    /// Reload with the current filter.
    pub async fn reload(&self) -> Result<usize, BoardError> {
        let filter = self.state.read().await.filter;
        self.load(filter).await
    }

    /// Fetch one job fresh from the backend. If it is on the board and its
    /// row is not being edited, the stored copy is replaced.
    pub async fn fetch_one(&self, id: &JobId) -> Result<Job, BoardError> {
        match self.api.get_one(id).await {
            Ok(job) => {
                let mut guard = self.state.write().await;
                let state = &mut *guard;
                let editing = state.rows.get(id).is_some_and(|row| row.is_editing());
                if !editing {
                    if let Some(slot) = state.job_mut(id) {
                        *slot = job.clone();
                    }
                }
                Ok(job)
            }
            Err(e) => {
                warn!(job_id = %id, error = %e, "Failed to fetch job");
                self.notifier.error("Unable to Load the Job");
                Err(e.into())
            }
        }
    }

    /// Create a job and append it to the collection.
    pub async fn create(&self, new_job: NewJob) -> Result<Job, BoardError> {
        if let Err(reason) = new_job.validate() {
            self.notifier.error("Invalid Form Values");
            return Err(BoardError::InvalidForm(reason));
        }

        let created = match self.api.create(&new_job).await {
            Ok(job) => job,
            Err(e) => {
                warn!(error = %e, "Failed to create job");
                self.state.write().await.error = Some(e.to_string());
                self.notifier.error("Unable to Create Job");
                return Err(e.into());
            }
        };

        let Some(id) = created.id.clone() else {
            warn!("Backend created a job without an id");
            self.notifier.error("Unable to Create Job");
            return Err(BoardError::MissingId);
        };

        {
            let mut state = self.state.write().await;
            let generation = state.generation;
            state.jobs.push(created.clone());
            state.rows.insert(id.clone(), RowController::new(id.clone(), generation));
            state.error = None;
        }

        info!(job_id = %id, "Job created");
        self.notifier.success("The Job was Created Successfully");
        Ok(created)
    }

    // ── Row editing ────────────────────────────────────────────────────

    /// Put a row into edit mode and register its draft.
    pub async fn start_edit(&self, id: &JobId) -> Result<Job, BoardError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let job = state
            .jobs
            .iter()
            .find(|j| j.id.as_ref() == Some(id))
            .ok_or_else(|| BoardError::UnknownJob { id: id.clone() })?;
        let row = state
            .rows
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownJob { id: id.clone() })?;

        let draft = row.start_edit(job)?;
        state.pending.set(id.clone(), Some(draft.clone()));
        debug!(job_id = %id, "Edit started");
        Ok(draft)
    }

    /// Apply one field edit to a row's draft and re-register it.
    pub async fn change_field(&self, id: &JobId, field: JobField) -> Result<Job, BoardError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let row = state
            .rows
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownJob { id: id.clone() })?;
        let field_name = field.name();
        let draft = row.apply(field)?;
        state.pending.set(id.clone(), Some(draft.clone()));
        debug!(job_id = %id, field = field_name, "Draft updated");
        Ok(draft)
    }

    /// Leave edit mode without saving.
    pub async fn cancel_edit(&self, id: &JobId) -> Result<(), BoardError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let row = state
            .rows
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownJob { id: id.clone() })?;
        if !row.is_editing() {
            return Err(BoardError::NotEditing { id: id.clone() });
        }
        row.finish_edit();
        state.pending.set(id.clone(), None);
        debug!(job_id = %id, "Edit cancelled");
        Ok(())
    }

    /// Save one row. Only the changed fields are submitted; an unchanged
    /// draft returns to display without a request. On failure the row stays
    /// in edit mode with its draft and pending entry intact. If the row was
    /// reset while the request was out, the response only refreshes the
    /// stored job and leaves the row as it now is.
    pub async fn save(&self, id: &JobId) -> Result<SaveOutcome, BoardError> {
        let (changes, row_generation) = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;

            let original = state
                .jobs
                .iter()
                .find(|j| j.id.as_ref() == Some(id))
                .ok_or_else(|| BoardError::UnknownJob { id: id.clone() })?;
            let row = state
                .rows
                .get_mut(id)
                .ok_or_else(|| BoardError::UnknownJob { id: id.clone() })?;

            match row.plan_save(original)? {
                SavePlan::Unchanged => {
                    row.finish_edit();
                    state.pending.set(id.clone(), None);
                    debug!(job_id = %id, "Save skipped, nothing changed");
                    return Ok(SaveOutcome::Unchanged);
                }
                SavePlan::Submit(changes) => (changes, row.generation()),
            }
        };

        match self.api.update(id, &changes).await {
            Ok(updated) => {
                {
                    let mut guard = self.state.write().await;
                    let state = &mut *guard;
                    if let Some(slot) = state.job_mut(id) {
                        *slot = updated.clone();
                    }
                    match state.rows.get_mut(id) {
                        Some(row) if row.generation() == row_generation => {
                            row.finish_edit();
                            state.pending.set(id.clone(), None);
                        }
                        _ => {
                            debug!(job_id = %id, "Row was reset while saving, keeping its state")
                        }
                    }
                }
                info!(job_id = %id, "Job updated");
                self.notifier.success("The Job was Updated Successfully");
                Ok(SaveOutcome::Saved(updated))
            }
            Err(e) => {
                warn!(job_id = %id, error = %e, "Failed to update job");
                {
                    let mut state = self.state.write().await;
                    let current = state
                        .rows
                        .get_mut(id)
                        .filter(|row| row.generation() == row_generation);
                    if let Some(row) = current {
                        row.fail(e.to_string());
                    }
                }
                self.notifier.error("Job could not be Updated");
                Err(e.into())
            }
        }
    }

    // ── Removal ────────────────────────────────────────────────────────

    /// Delete a job. Edit state is not consulted.
    pub async fn delete(&self, id: &JobId) -> Result<(), BoardError> {
        self.remove(id, Removal::Delete).await
    }

    /// Archive a job; it leaves the board like a deletion does.
    pub async fn archive(&self, id: &JobId) -> Result<(), BoardError> {
        self.remove(id, Removal::Archive).await
    }

    async fn remove(&self, id: &JobId, removal: Removal) -> Result<(), BoardError> {
        if self.state.read().await.job(id).is_none() {
            return Err(BoardError::UnknownJob { id: id.clone() });
        }

        let result = match removal {
            Removal::Delete => self.api.delete(id).await,
            Removal::Archive => self.api.archive(id).await,
        };

        match result {
            Ok(()) => {
                self.state.write().await.remove_job(id);
                info!(job_id = %id, action = ?removal, "Job removed");
                self.notifier
                    .success(&format!("The Job was {} Successfully", removal.verb()));
                Ok(())
            }
            Err(e) => {
                warn!(job_id = %id, action = ?removal, error = %e, "Failed to remove job");
                let message = format!("The Job could not be {}", removal.verb());
                if let Some(row) = self.state.write().await.rows.get_mut(id) {
                    row.fail(message.clone());
                }
                self.notifier.error(&message);
                Err(e.into())
            }
        }
    }

    // ── Bulk save ──────────────────────────────────────────────────────

    /// Submit every pending draft in one request.
    ///
    /// A no-op unless at least two rows are being edited and no other bulk
    /// save is outstanding. On success every row returns to display and the
    /// collection is reloaded; on failure nothing local changes.
    pub async fn bulk_save(&self) -> Result<BulkSaveOutcome, BoardError> {
        let drafts = {
            let state = self.state.read().await;
            if !state.pending.bulk_ready() {
                debug!(pending = state.pending.len(), "Bulk save not offered");
                return Ok(BulkSaveOutcome::NotOffered);
            }
            state.pending.drafts()
        };

        let Some(_in_flight) = InFlightGuard::acquire(&self.bulk_in_flight) else {
            debug!("Bulk save already in flight");
            return Ok(BulkSaveOutcome::InFlight);
        };

        let count = drafts.len();
        if let Err(e) = self.api.bulk_update(&drafts).await {
            warn!(count, error = %e, "Bulk update failed");
            self.state.write().await.error = Some(e.to_string());
            self.notifier.error("Unable to Update All of the Jobs");
            return Err(e.into());
        }

        {
            let mut state = self.state.write().await;
            state.pending.clear();
            let discarded = state.reset_rows();
            info!(count, discarded, "Bulk update completed");
        }
        self.notifier.success("The Jobs were Updated Successfully");

        let reloaded = self.reload().await.is_ok();
        Ok(BulkSaveOutcome::Saved { count, reloaded })
    }

    // ── Views ──────────────────────────────────────────────────────────

    /// The collection in render order.
    pub async fn jobs(&self) -> Vec<Job> {
        self.state.read().await.jobs.clone()
    }

    pub async fn job(&self, id: &JobId) -> Option<Job> {
        self.state.read().await.job(id).cloned()
    }

    /// One view per job, in render order.
    pub async fn rows(&self) -> Vec<RowView> {
        let state = self.state.read().await;
        state
            .jobs
            .iter()
            .filter_map(|job| {
                let row = state.rows.get(job.id.as_ref()?)?;
                Some(RowView {
                    job: job.clone(),
                    state: row.state(),
                    draft: row.draft().cloned(),
                    error: row.error().map(str::to_string),
                })
            })
            .collect()
    }

    pub async fn row_state(&self, id: &JobId) -> Option<RowState> {
        self.state.read().await.rows.get(id).map(|row| row.state())
    }

    pub async fn draft(&self, id: &JobId) -> Option<Job> {
        self.state
            .read()
            .await
            .rows
            .get(id)
            .and_then(|row| row.draft().cloned())
    }

    pub async fn row_error(&self, id: &JobId) -> Option<String> {
        self.state
            .read()
            .await
            .rows
            .get(id)
            .and_then(|row| row.error().map(str::to_string))
    }

    pub async fn pending_count(&self) -> usize {
        self.state.read().await.pending.len()
    }

    pub async fn pending_ids(&self) -> Vec<JobId> {
        self.state.read().await.pending.ids()
    }

    pub async fn pending_draft(&self, id: &JobId) -> Option<Job> {
        self.state.read().await.pending.get(id).cloned()
    }

    /// Whether the bulk save action should be enabled.
    pub async fn can_bulk_save(&self) -> bool {
        !self.is_bulk_in_flight() && self.state.read().await.pending.bulk_ready()
    }

    pub fn is_bulk_in_flight(&self) -> bool {
        self.bulk_in_flight.load(Ordering::Acquire)
    }

    pub async fn filter(&self) -> JobFilter {
        self.state.read().await.filter
    }

    /// Last page-level error (load, create, or bulk save).
    pub async fn page_error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }
}
