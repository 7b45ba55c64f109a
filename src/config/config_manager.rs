// ==========================================
// Configuration manager
// ==========================================
// Responsibility: load, query and overwrite installation settings
// Storage: config_kv table (key-value + scope)
// ==========================================
// The manager only reads/writes storage; the engines receive the
// resolved values (ReportingConfig etc.) explicitly.
// ==========================================

use crate::config::{ErpConfig, ReportingConfig, SmtpConfig};
use crate::db::configure_sqlite_connection;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Create a ConfigManager over an existing connection
    ///
    /// Re-applies the unified PRAGMA set (idempotent) so behavior is
    /// consistent regardless of who opened the connection.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let guard = conn
                .lock()
                .map_err(|e| format!("lock acquisition failed: {}", e))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    /// Read one configuration value (scope_id='global')
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("lock acquisition failed: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Read one configuration value with a default
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Write one configuration value (scope_id='global')
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("lock acquisition failed: {}", e))?;

        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
               ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value"#,
            params![key, value],
        )?;
        Ok(())
    }

    // ==========================================
    // Resolved configuration objects
    // ==========================================

    /// Resolve the reporting configuration the engines consume
    pub fn reporting_config(&self) -> Result<ReportingConfig, Box<dyn Error>> {
        let defaults = ReportingConfig::default();
        Ok(ReportingConfig {
            business_area: self.get_config_or_default("business_area", &defaults.business_area)?,
            sample_item_code: self
                .get_config_or_default("sample_item_code", &defaults.sample_item_code)?,
            revision_tag: self
                .get_config_or_default("plan_revision_tag", "V")?
                .chars()
                .next()
                .unwrap_or(defaults.revision_tag),
            reduction_marker: self
                .get_config_or_default("plan_reduction_marker", "-")?
                .chars()
                .next()
                .unwrap_or(defaults.reduction_marker),
        })
    }

    /// Resolve the SMTP account settings
    pub fn smtp_config(&self) -> Result<SmtpConfig, Box<dyn Error>> {
        Ok(SmtpConfig {
            host: self.get_config_or_default("smtp_host", "")?,
            port: self.get_config_or_default("smtp_port", "25")?.parse()?,
            user: self.get_config_or_default("smtp_user", "")?,
            password: self.get_config_or_default("smtp_password", "")?,
            sender_address: self.get_config_or_default("smtp_sender", "")?,
        })
    }

    /// Resolve the ERP connection settings
    pub fn erp_config(&self) -> Result<ErpConfig, Box<dyn Error>> {
        Ok(ErpConfig {
            connection_string: self.get_config_or_default("erp_connection_string", "")?,
            query_timeout_secs: self
                .get_config_or_default("erp_query_timeout_secs", "30")?
                .parse()?,
        })
    }

    // ==========================================
    // Calendar data
    // ==========================================
    // Stored as JSON arrays: holidays ["2024-01-01", ...],
    // moved days [["2024-08-16", "2024-08-10"], ...]

    pub fn holidays(&self) -> Result<BTreeSet<NaiveDate>, Box<dyn Error>> {
        let raw = self.get_config_or_default("calendar_holidays", "[]")?;
        let days: Vec<NaiveDate> = serde_json::from_str(&raw)?;
        Ok(days.into_iter().collect())
    }

    pub fn moved_workdays(&self) -> Result<BTreeMap<NaiveDate, NaiveDate>, Box<dyn Error>> {
        let raw = self.get_config_or_default("calendar_moved_days", "[]")?;
        let pairs: Vec<(NaiveDate, NaiveDate)> = serde_json::from_str(&raw)?;
        Ok(pairs.into_iter().collect())
    }

    pub fn set_holidays(&self, days: &BTreeSet<NaiveDate>) -> Result<(), Box<dyn Error>> {
        let list: Vec<&NaiveDate> = days.iter().collect();
        self.set_config_value("calendar_holidays", &serde_json::to_string(&list)?)
    }

    pub fn set_moved_workdays(
        &self,
        pairs: &BTreeMap<NaiveDate, NaiveDate>,
    ) -> Result<(), Box<dyn Error>> {
        let list: Vec<(&NaiveDate, &NaiveDate)> = pairs.iter().collect();
        self.set_config_value("calendar_moved_days", &serde_json::to_string(&list)?)
    }
}
