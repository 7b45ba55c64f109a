// ==========================================
// API layer error types
// ==========================================
// Translates engine / repository / collaborator errors into the
// operation-level taxonomy. Every error is scoped to the single
// operation that raised it; no global state can be corrupted beyond
// the one aggregate being edited.
// ==========================================

use crate::engine::document_factory::FactoryError;
use crate::engine::snapshot::SnapshotError;
use crate::erp::ErpError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer errors
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Validation errors - rejected before any mutation
    // ==========================================
    #[error("finish date must be after start date")]
    InvalidRange,

    #[error("no work centers selected")]
    NoWorkCentersSelected,

    #[error("report name must not be blank")]
    MissingReportName,

    // ==========================================
    // Name collisions - rejected, no state change
    // ==========================================
    #[error("document name already exists: {0}")]
    DuplicateName(String),

    #[error("report name already exists: {0}")]
    DuplicateReportName(String),

    // ==========================================
    // Lookup
    // ==========================================
    #[error("not found: {0}")]
    NotFound(String),

    // ==========================================
    // Collaborator failures
    // ==========================================
    /// Transport message preserved verbatim; prior in-memory state
    /// is untouched (no partial apply)
    #[error("external fetch failed: {0}")]
    ExternalFetchError(String),

    /// The in-memory rollup stays correct but is not guaranteed
    /// saved - callers must treat this as "retry or lose this edit"
    #[error("persistence failed: {0}")]
    PersistenceError(String),
}

/// Result type alias
pub type ApiResult<T> = Result<T, ApiError>;

impl From<FactoryError> for ApiError {
    fn from(err: FactoryError) -> Self {
        match err {
            FactoryError::DuplicateName(name) => ApiError::DuplicateName(name),
            FactoryError::InvalidRange { .. } => ApiError::InvalidRange,
            FactoryError::NoWorkCentersSelected => ApiError::NoWorkCentersSelected,
            FactoryError::Persistence(e) => e.into(),
        }
    }
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::MissingReportName => ApiError::MissingReportName,
            SnapshotError::DuplicateReportName(name) => ApiError::DuplicateReportName(name),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} {}", entity, id))
            }
            other => ApiError::PersistenceError(other.to_string()),
        }
    }
}

impl From<ErpError> for ApiError {
    fn from(err: ErpError) -> Self {
        ApiError::ExternalFetchError(err.to_string())
    }
}
