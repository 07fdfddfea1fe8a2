// Services layer for business logic
// Services own validation and call storage directly

pub mod age;
pub mod participant;

pub use age::{AgeError, AgeService};
pub use participant::ParticipantService;

use roster_core::{DateParseError, SpreadsheetError};

/// Failures surfaced by participant operations.
///
/// Handlers map each variant onto a status code; only `Storage` is a server fault.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("participant not found")]
    NotFound,

    #[error("invalid date: {0}")]
    InvalidDate(#[from] DateParseError),

    #[error("invalid spreadsheet: {0}")]
    Spreadsheet(#[from] SpreadsheetError),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
