//! Tracker for in-progress drafts, keyed by job id.

use indexmap::IndexMap;

use crate::jobs::{Job, JobId};

/// Bulk save is offered once this many rows are being edited at once.
pub const MIN_BULK_EDITS: usize = 2;

/// Insertion-ordered map from job id to its proposed post-edit value.
#[derive(Debug, Clone, Default)]
pub struct PendingEdits {
    drafts: IndexMap<JobId, Job>,
}

impl PendingEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the draft for `id`, or remove it when `draft` is `None`.
    pub fn set(&mut self, id: JobId, draft: Option<Job>) {
        match draft {
            Some(draft) => {
                self.drafts.insert(id, draft);
            }
            None => {
                self.drafts.shift_remove(&id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.drafts.clear();
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn contains(&self, id: &JobId) -> bool {
        self.drafts.contains_key(id)
    }

    pub fn get(&self, id: &JobId) -> Option<&Job> {
        self.drafts.get(id)
    }

    /// Keep only the entries whose id satisfies `keep`, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&JobId) -> bool) {
        self.drafts.retain(|id, _| keep(id));
    }

    /// Ids in the order their edits began.
    pub fn ids(&self) -> Vec<JobId> {
        self.drafts.keys().cloned().collect()
    }

    /// Every draft, in the order their edits began.
    pub fn drafts(&self) -> Vec<Job> {
        self.drafts.values().cloned().collect()
    }

    /// Whether enough rows are mid-edit for a bulk save.
    pub fn bulk_ready(&self) -> bool {
        self.len() >= MIN_BULK_EDITS
    }
}
