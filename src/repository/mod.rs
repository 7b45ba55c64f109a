// ==========================================
// Repository layer
// ==========================================
// Data access for the followup document store.
// Constraint: repositories hold no business logic; all queries are
// parameterized.
// ==========================================

pub mod error;
pub mod followup_repo;
pub mod report_store;

// Re-export core repositories
pub use error::{RepositoryError, RepositoryResult};
pub use followup_repo::FollowupDocumentRepository;
pub use report_store::ReportStore;
