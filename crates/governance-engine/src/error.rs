//! Error types for governance-engine input boundaries.
//!
//! The evaluation core never fails; these errors only arise while parsing
//! or resolving raw inputs before they reach it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("Ambiguous local time: {0}")]
    AmbiguousLocalTime(String),
}

pub type Result<T> = std::result::Result<T, GovernanceError>;
