// ==========================================
// SQLite connection initialization
// ==========================================
// Goals:
// - Unify PRAGMA behavior of every Connection::open so that no module
//   runs with foreign keys off while another runs with them on
// - Unify busy_timeout to reduce sporadic busy errors on write
// - Bootstrap the document-store schema in one place
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMA set to a SQLite connection
///
/// Notes:
/// - foreign_keys must be enabled per connection
/// - busy_timeout must be configured per connection
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the document-store schema if it does not exist yet
///
/// Tables:
/// - followup_document: whole-document JSON bodies, keyed by unique name
/// - report_name_index: storage-level uniqueness backstop for report names
///   (the in-memory check in ReportStore is advisory only)
/// - config_kv: installation configuration, key-value with scope
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS followup_document (
            doc_id      TEXT PRIMARY KEY,
            name        TEXT NOT NULL UNIQUE,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS report_name_index (
            doc_id      TEXT NOT NULL,
            report_name TEXT NOT NULL,
            report_kind TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            UNIQUE (doc_id, report_name)
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id    TEXT NOT NULL DEFAULT 'global',
            key         TEXT NOT NULL,
            value       TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;
    Ok(())
}

/// Resolve the default database path
///
/// An explicit path can be forced through PRODUCTION_FOLLOWUP_DB_PATH
/// (debugging / tests / CI); otherwise the user data directory is used.
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("PRODUCTION_FOLLOWUP_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./production_followup.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("production-followup");
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("production_followup.db");
    }

    path.display().to_string()
}
