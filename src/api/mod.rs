// ==========================================
// API layer
// ==========================================
// Operation surface of the engine, consumed by the UI shell.
// Translates layer errors into the operation-level taxonomy.
// ==========================================

pub mod error;
pub mod followup_api;
pub mod report_api;

// Re-export core types
pub use error::{ApiError, ApiResult};
pub use followup_api::FollowupApi;
pub use report_api::ReportApi;
