//! Row edit state machine.
//!
//! A row is either showing its job (`Display`) or holding a private draft
//! copy of it (`Editing`). The row never talks to the backend itself; the
//! board asks it for a [`SavePlan`] and reports back with `finish_edit` or
//! `fail`.

use crate::error::BoardError;
use crate::jobs::{Job, JobField, JobId, JobUpdateParameters};

/// Observable state of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowState {
    Display,
    Editing,
}

impl std::fmt::Display for RowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Display => "display",
            Self::Editing => "editing",
        };
        write!(f, "{s}")
    }
}

/// Row mode, carrying the draft while editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMode {
    Display,
    Editing { draft: Job },
}

/// What a save should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavePlan {
    /// Draft equals the original; return to display without a request.
    Unchanged,
    /// Submit these changed fields.
    Submit(JobUpdateParameters),
}

/// Per-row controller owned by the board.
#[derive(Debug, Clone)]
pub struct RowController {
    id: JobId,
    mode: RowMode,
    /// Last reset generation this row has observed.
    generation: u64,
    error: Option<String>,
}

impl RowController {
    pub fn new(id: JobId, generation: u64) -> Self {
        Self {
            id,
            mode: RowMode::Display,
            generation,
            error: None,
        }
    }

    /// A row rebuilt mid-edit, e.g. after a reload that raced with the edit.
    pub fn resume(id: JobId, generation: u64, draft: Job) -> Self {
        Self {
            id,
            mode: RowMode::Editing { draft },
            generation,
            error: None,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn mode(&self) -> &RowMode {
        &self.mode
    }

    pub fn state(&self) -> RowState {
        match self.mode {
            RowMode::Display => RowState::Display,
            RowMode::Editing { .. } => RowState::Editing,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.state() == RowState::Editing
    }

    pub fn draft(&self) -> Option<&Job> {
        match &self.mode {
            RowMode::Editing { draft } => Some(draft),
            RowMode::Display => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last reset generation this row has observed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Display → Editing. Returns the fresh draft so the caller can register it.
    pub fn start_edit(&mut self, job: &Job) -> Result<Job, BoardError> {
        if self.is_editing() {
            return Err(BoardError::AlreadyEditing {
                id: self.id.clone(),
            });
        }
        let draft = job.clone();
        self.mode = RowMode::Editing {
            draft: draft.clone(),
        };
        self.error = None;
        Ok(draft)
    }

    /// Editing → Editing. Returns the updated draft.
    pub fn apply(&mut self, field: JobField) -> Result<Job, BoardError> {
        match &mut self.mode {
            RowMode::Editing { draft } => {
                field.apply(draft);
                Ok(draft.clone())
            }
            RowMode::Display => Err(BoardError::NotEditing {
                id: self.id.clone(),
            }),
        }
    }

    /// Diff the draft against `original`.
    pub fn plan_save(&self, original: &Job) -> Result<SavePlan, BoardError> {
        let draft = self.draft().ok_or_else(|| BoardError::NotEditing {
            id: self.id.clone(),
        })?;
        let changes = JobUpdateParameters::between(original, draft);
        if changes.is_empty() {
            Ok(SavePlan::Unchanged)
        } else {
            Ok(SavePlan::Submit(changes))
        }
    }

    /// Editing → Display, dropping the draft.
    pub fn finish_edit(&mut self) {
        self.mode = RowMode::Display;
        self.error = None;
    }

    /// Record a failure without leaving the current mode.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Force-reset from the board. Returns `true` if a draft was discarded.
    pub fn observe_reset(&mut self, generation: u64) -> bool {
        if generation <= self.generation {
            return false;
        }
        self.generation = generation;
        let discarded = self.is_editing();
        self.mode = RowMode::Display;
        self.error = None;
        discarded
    }
}
