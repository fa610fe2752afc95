//! Job Board: a terminal client for a job-tracking REST backend.

pub mod api;
pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod jobs;
pub mod notify;
