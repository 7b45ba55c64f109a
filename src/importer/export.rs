// ==========================================
// Record export
// ==========================================
// Writes an arbitrary record collection as one row per record with a
// header row of field names. CSV output; Excel consumers open it
// directly.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::Serialize;
use std::path::Path;
use tracing::info;

// ==========================================
// RecordExporter
// ==========================================
pub struct RecordExporter;

impl RecordExporter {
    /// Write records to a CSV file, header row first
    pub fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> ImportResult<()> {
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| ImportError::ExportError(e.to_string()))?;

        for record in records {
            writer
                .serialize(record)
                .map_err(|e| ImportError::ExportError(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| ImportError::ExportError(e.to_string()))?;

        info!(file = %path.display(), rows = records.len(), "records exported");
        Ok(())
    }

    /// Render records to a CSV string (email attachments, tests)
    pub fn to_csv_string<T: Serialize>(records: &[T]) -> ImportResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| ImportError::ExportError(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ImportError::ExportError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ImportError::ExportError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Row {
        work_center: String,
        total_output: i64,
    }

    #[test]
    fn test_header_row_and_one_row_per_record() {
        let rows = vec![
            Row {
                work_center: "M-301".to_string(),
                total_output: 120,
            },
            Row {
                work_center: "A-12".to_string(),
                total_output: 80,
            },
        ];
        let csv = RecordExporter::to_csv_string(&rows).unwrap();
        let lines: Vec<&str> = csv.trim().lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "work_center,total_output");
        assert_eq!(lines[1], "M-301,120");
    }
}
