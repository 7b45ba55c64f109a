// ==========================================
// Configuration layer
// ==========================================
// Installation settings live in the config_kv table and are loaded
// through the ConfigManager. The engines themselves take explicit
// configuration values - no ambient/global state inside the core.
// ==========================================

pub mod config_manager;

pub use config_manager::ConfigManager;

use serde::{Deserialize, Serialize};

// ==========================================
// ReportingConfig - explicit engine configuration
// ==========================================
// Passed into the aggregation / snapshot engines at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Business area the turnover reconciliation is filtered to
    pub business_area: String,
    /// Item code of sample shipments, excluded from turnover sums
    pub sample_item_code: String,
    /// First character of a plan-revision comment
    pub revision_tag: char,
    /// Character marking a plan reduction inside a revision comment
    pub reduction_marker: char,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            business_area: "1000".to_string(),
            sample_item_code: "MINTA".to_string(),
            revision_tag: 'V',
            reduction_marker: '-',
        }
    }
}

// ==========================================
// SmtpConfig - notification collaborator settings
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub sender_address: String,
}

// ==========================================
// ErpConfig - ERP/ODBC collaborator settings
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErpConfig {
    pub connection_string: String,
    /// Seconds before a fetch is abandoned
    pub query_timeout_secs: u64,
}
