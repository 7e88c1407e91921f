//! Top-level error type for pipeline runs.
//!
//! Component errors keep their own types at the seams (`PortalError`,
//! `DbError`, …); this enum is what the binary and orchestration see. The
//! taxonomy mirrors how failures are handled: portal/navigation errors kill
//! the run, per-player extraction errors are absorbed by the run loop and
//! only surface here when authentication itself fails.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbError;
use crate::directory::DirectoryError;
use crate::portal::PortalError;
use crate::roster::RosterError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Portal error: {0}")]
    Portal(#[from] PortalError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
}
