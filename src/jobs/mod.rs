//! Job records as exchanged with the backend.

pub mod model;

pub use model::{
    Job, JobField, JobFilter, JobId, JobPriority, JobStatus, JobUpdateParameters, NewJob,
};
