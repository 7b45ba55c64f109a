// ==========================================
// Capacity-ledger import
// ==========================================
// Applies fetched ERP capacity-ledger rows to one work center's
// daily records: shift postings are accumulated into the matching
// shift slot, scrap reasons counted on machine centers, run time
// added to operating hours and performance averaged into the machine
// efficiency figure. The rollup is re-run afterwards.
// ==========================================
// The fetch completes before any apply, so a failed fetch leaves the
// record set untouched. Two concurrent imports against the same
// entity are the caller's responsibility to prevent.
// ==========================================

use crate::domain::document::FollowupDocument;
use crate::domain::planning::CapacityLedgerRow;
use crate::domain::record::RecordExtra;
use crate::engine::rollup::RollupCalculator;
use std::collections::HashMap;
use tracing::{info, warn};

/// Outcome counters of one ledger apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerApplyStats {
    pub applied_rows: usize,
    /// Rows whose posting date has no record in the series
    pub skipped_unknown_day: usize,
    /// Rows whose shift code maps to no shift slot
    pub skipped_unknown_shift: usize,
}

// ==========================================
// LedgerImporter
// ==========================================
pub struct LedgerImporter {
    rollup: RollupCalculator,
}

impl LedgerImporter {
    pub fn new() -> Self {
        Self {
            rollup: RollupCalculator::new(),
        }
    }

    /// Apply ledger rows to one work center of a document
    ///
    /// Quantities are accumulated (multiple postings per day/shift
    /// are legal in the ledger); the machine efficiency of a day is
    /// the mean of its rows' performance figures.
    pub fn apply(
        &self,
        doc: &mut FollowupDocument,
        work_center: &str,
        rows: &[CapacityLedgerRow],
    ) -> LedgerApplyStats {
        let mut stats = LedgerApplyStats::default();

        // performance mean per day needs a running count
        let mut perf_counts: HashMap<chrono::NaiveDate, (f64, usize)> = HashMap::new();

        for row in rows {
            let Some(slot) = shift_slot(&row.shift_code) else {
                warn!(
                    work_center,
                    shift_code = %row.shift_code,
                    "unknown shift code in capacity ledger, row skipped"
                );
                stats.skipped_unknown_shift += 1;
                continue;
            };

            let Some(record) = doc.find_record_mut(work_center, row.posting_date) else {
                stats.skipped_unknown_day += 1;
                continue;
            };

            record.add_shift_quantities(slot, row.output_qty, row.scrap_qty);
            record.set_operating_hours(record.operating_hours + row.run_time_hours);

            if let Some(reason) = &row.scrap_reason_code {
                if row.scrap_qty > 0 {
                    record.add_scrap_reason(reason, row.scrap_qty);
                }
            }

            if matches!(record.extra, RecordExtra::Machine { .. }) && row.performance > 0.0 {
                let entry = perf_counts.entry(row.posting_date).or_insert((0.0, 0));
                entry.0 += row.performance;
                entry.1 += 1;
                let mean = entry.0 / entry.1 as f64;
                record.set_efficiency(mean);
            }

            stats.applied_rows += 1;
        }

        if stats.applied_rows > 0 {
            self.rollup.rollup_document(doc);
            doc.mark_dirty();
        }

        info!(
            document = %doc.name,
            work_center,
            applied = stats.applied_rows,
            skipped_day = stats.skipped_unknown_day,
            skipped_shift = stats.skipped_unknown_shift,
            "capacity ledger applied"
        );

        stats
    }
}

impl Default for LedgerImporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an ERP shift code to a shift slot index
fn shift_slot(shift_code: &str) -> Option<usize> {
    match shift_code.trim() {
        "1" | "A" => Some(0),
        "2" | "B" => Some(1),
        "3" | "C" => Some(2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::DailyRecord;
    use crate::domain::types::{ShiftConfig, WorkCenterKind};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn doc_with_machine_series() -> FollowupDocument {
        let mut doc = FollowupDocument::new(
            "RUN-X",
            "PLAN-X",
            day(1),
            day(30),
            ShiftConfig::default(),
            0.0,
        );
        doc.machine_centers.insert(
            "M-301".to_string(),
            vec![
                DailyRecord::new(day(8), WorkCenterKind::Machine, 100),
                DailyRecord::new(day(9), WorkCenterKind::Machine, 100),
            ],
        );
        doc
    }

    fn ledger_row(d: u32, shift: &str, output: i64, scrap: i64) -> CapacityLedgerRow {
        CapacityLedgerRow {
            work_center: "M-301".to_string(),
            posting_date: day(d),
            shift_code: shift.to_string(),
            output_qty: output,
            scrap_qty: scrap,
            scrap_reason_code: None,
            run_time_hours: 0.0,
            performance: 0.0,
        }
    }

    #[test]
    fn test_apply_accumulates_and_rolls_up() {
        let mut doc = doc_with_machine_series();
        let rows = vec![
            ledger_row(8, "1", 40, 2),
            ledger_row(8, "1", 10, 0),
            ledger_row(9, "2", 60, 1),
        ];

        let stats = LedgerImporter::new().apply(&mut doc, "M-301", &rows);

        assert_eq!(stats.applied_rows, 3);
        let series = &doc.machine_centers["M-301"];
        assert_eq!(series[0].shift_outputs[0], 50);
        assert_eq!(series[0].total_reject, 2);
        assert_eq!(series[1].cumulative_output, 110);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_unknown_shift_and_day_are_skipped() {
        let mut doc = doc_with_machine_series();
        let rows = vec![ledger_row(8, "X", 40, 0), ledger_row(20, "1", 40, 0)];

        let stats = LedgerImporter::new().apply(&mut doc, "M-301", &rows);

        assert_eq!(stats.applied_rows, 0);
        assert_eq!(stats.skipped_unknown_shift, 1);
        assert_eq!(stats.skipped_unknown_day, 1);
        assert_eq!(doc.machine_centers["M-301"][0].total_output, 0);
    }

    #[test]
    fn test_scrap_reasons_counted_on_machine_records() {
        let mut doc = doc_with_machine_series();
        let mut row = ledger_row(8, "1", 30, 5);
        row.scrap_reason_code = Some("SCRATCH".to_string());

        LedgerImporter::new().apply(&mut doc, "M-301", &[row]);

        match &doc.machine_centers["M-301"][0].extra {
            RecordExtra::Machine { scrap_reasons, .. } => {
                assert_eq!(scrap_reasons.get("SCRATCH"), Some(&5));
            }
            _ => panic!("expected machine extra"),
        }
    }

    #[test]
    fn test_performance_averaged_per_day() {
        let mut doc = doc_with_machine_series();
        let mut r1 = ledger_row(8, "1", 10, 0);
        r1.performance = 0.8;
        let mut r2 = ledger_row(8, "2", 10, 0);
        r2.performance = 0.6;

        LedgerImporter::new().apply(&mut doc, "M-301", &[r1, r2]);

        let eff = doc.machine_centers["M-301"][0].efficiency();
        assert!((eff - 0.7).abs() < 1e-12);
    }
}
