//! Client-side job board: the page container, its rows, and pending edits.

pub mod page;
pub mod pending;
pub mod row;

pub use page::{BulkSaveOutcome, JobBoard, RowView, SaveOutcome};
pub use pending::{MIN_BULK_EDITS, PendingEdits};
pub use row::{RowController, RowMode, RowState, SavePlan};
