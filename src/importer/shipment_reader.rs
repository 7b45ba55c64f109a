// ==========================================
// Shipment-plan reader
// ==========================================
// Reads the logistics department's fixed 15-column shipment-plan
// sheet: document no., item, open qty, requested date, delivery
// date, customer name, SO number, PO number, unit price, open
// amount, order date, billing customer no., customer no., customer
// reference, ETD. Data starts at row 2; row 1 is the header.
// Supported formats: .xlsx/.xls via calamine, .csv via csv.
// ==========================================

use crate::domain::planning::ShipmentPlanRow;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Expected column count of the shipment-plan layout
pub const SHIPMENT_PLAN_COLUMNS: usize = 15;

// ==========================================
// ShipmentPlanReader
// ==========================================
pub struct ShipmentPlanReader;

impl ShipmentPlanReader {
    /// Read a shipment-plan file into typed rows
    pub fn read(path: &Path) -> ImportResult<Vec<ShipmentPlanRow>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let raw_rows = match ext.as_str() {
            "xlsx" | "xls" => Self::raw_rows_from_excel(path)?,
            "csv" => Self::raw_rows_from_csv(path)?,
            other => return Err(ImportError::UnsupportedFormat(other.to_string())),
        };

        let mut rows = Vec::new();
        // raw rows already exclude the header; sheet row numbers
        // start at 2 in error messages
        for (idx, cells) in raw_rows.iter().enumerate() {
            let sheet_row = idx + 2;
            // trailing empty cells are common in exports; pad
            let mut cells = cells.clone();
            if cells.len() < SHIPMENT_PLAN_COLUMNS {
                cells.resize(SHIPMENT_PLAN_COLUMNS, String::new());
            }
            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            if cells.len() > SHIPMENT_PLAN_COLUMNS {
                return Err(ImportError::ColumnCountMismatch {
                    row: sheet_row,
                    expected: SHIPMENT_PLAN_COLUMNS,
                    found: cells.len(),
                });
            }
            rows.push(Self::map_row(sheet_row, &cells)?);
        }

        info!(file = %path.display(), rows = rows.len(), "shipment plan read");
        Ok(rows)
    }

    fn raw_rows_from_excel(path: &Path) -> ImportResult<Vec<Vec<String>>> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        let Some(sheet_name) = sheet_names.first().cloned() else {
            return Err(ImportError::ExcelParseError(
                "workbook has no sheets".to_string(),
            ));
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        Ok(range
            .rows()
            .skip(1) // header row
            .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
            .collect())
    }

    fn raw_rows_from_csv(path: &Path) -> ImportResult<Vec<Vec<String>>> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.trim().to_string()).collect());
        }
        Ok(rows)
    }

    fn map_row(sheet_row: usize, cells: &[String]) -> ImportResult<ShipmentPlanRow> {
        Ok(ShipmentPlanRow {
            document_no: cells[0].clone(),
            item: cells[1].clone(),
            open_qty: parse_number(sheet_row, "open qty", &cells[2])?,
            requested_date: parse_date(&cells[3]),
            delivery_date: parse_date(&cells[4]),
            customer_name: cells[5].clone(),
            so_number: cells[6].clone(),
            po_number: cells[7].clone(),
            unit_price: parse_number(sheet_row, "unit price", &cells[8])?,
            open_amount: parse_number(sheet_row, "open amount", &cells[9])?,
            order_date: parse_date(&cells[10]),
            billing_customer_no: cells[11].clone(),
            customer_no: cells[12].clone(),
            customer_reference: cells[13].clone(),
            etd: parse_date(&cells[14]),
        })
    }
}

/// Parse a numeric cell; empty counts as 0, thousands separators and
/// decimal commas are tolerated
fn parse_number(row: usize, column: &str, raw: &str) -> ImportResult<f64> {
    let cleaned = raw.replace(' ', "").replace(',', ".");
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned
        .parse::<f64>()
        .map_err(|e| ImportError::TypeConversionError {
            row,
            column: column.to_string(),
            message: e.to_string(),
        })
}

/// Parse a date cell; unknown formats yield None (dates are
/// informational in the shipment plan)
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y.%m.%d.", "%Y.%m.%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const HEADER: &str = "DocNo;Item;OpenQty;ReqDate;DelDate;Customer;SO;PO;UnitPrice;OpenAmount;OrderDate;BillCust;CustNo;CustRef;ETD\n";

    #[test]
    fn test_reads_rows_from_row_two() {
        let csv = format!(
            "{}{}",
            HEADER.replace(';', ","),
            "SH001,ITEM-1,120,2024-05-02,2024-05-06,Acme Kft,SO1,PO1,2.5,300,2024-04-01,B1,C1,REF-1,2024-05-07\n"
        );
        let file = write_csv(&csv);
        let rows = ShipmentPlanReader::read(file.path()).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.document_no, "SH001");
        assert_eq!(row.open_qty, 120.0);
        assert_eq!(row.open_amount, 300.0);
        assert_eq!(
            row.requested_date,
            Some(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
        );
        assert_eq!(row.customer_name, "Acme Kft");
    }

    #[test]
    fn test_blank_rows_skipped() {
        let csv = format!(
            "{}{}{}",
            HEADER.replace(';', ","),
            ",,,,,,,,,,,,,,\n",
            "SH002,ITEM-2,10,,,Cust,,,1,10,,,,,\n"
        );
        let file = write_csv(&csv);
        let rows = ShipmentPlanReader::read(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].document_no, "SH002");
    }

    #[test]
    fn test_bad_number_reports_row_and_column() {
        let csv = format!(
            "{}{}",
            HEADER.replace(';', ","),
            "SH003,ITEM-3,abc,,,Cust,,,1,10,,,,,\n"
        );
        let file = write_csv(&csv);
        let err = ShipmentPlanReader::read(file.path()).unwrap_err();
        match err {
            ImportError::TypeConversionError { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "open qty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = ShipmentPlanReader::read(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }
}
