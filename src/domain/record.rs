// ==========================================
// Daily record - per-workday performance entry
// ==========================================
// One record holds one workday's planned and actual quantities and
// times for one tracked entity. Three shapes (machine / inspection /
// manual) share the common core; kind-specific fields live in the
// extension enum.
// ==========================================
// Invariant: total_output, total_reject, reject_ratio and utilization
// always equal the pure function of their inputs. Every setter that
// feeds a derived field recomputes synchronously before returning.
// Cumulative fields are owned by the rollup pass (engine::rollup);
// they are recomputed by the owning document after structural or
// plan/output edits.
// ==========================================

use crate::domain::types::WorkCenterKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Number of shift slots per day. Unused slots stay zero.
pub const SHIFT_SLOTS: usize = 3;

// ==========================================
// Kind-specific extension
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordExtra {
    Machine {
        /// Per-day machine efficiency figure (ERP performance)
        efficiency: f64,
        /// Named scrap-reason counters, keyed by reason code
        scrap_reasons: BTreeMap<String, i64>,
    },
    Inspection,
    Manual {
        /// Output produced by own (KFT) staff
        kft_output: i64,
        /// Output produced by the subcontractor
        subcontractor_output: i64,
        /// Productivity of own staff
        own_productivity: f64,
        /// Productivity of the subcontractor staff
        subcontractor_productivity: f64,
    },
}

impl RecordExtra {
    pub fn for_kind(kind: WorkCenterKind) -> Self {
        match kind {
            WorkCenterKind::Machine => RecordExtra::Machine {
                efficiency: 0.0,
                scrap_reasons: BTreeMap::new(),
            },
            WorkCenterKind::Inspection => RecordExtra::Inspection,
            WorkCenterKind::Manual => RecordExtra::Manual {
                kft_output: 0,
                subcontractor_output: 0,
                own_productivity: 0.0,
                subcontractor_productivity: 0.0,
            },
        }
    }

    pub fn kind(&self) -> WorkCenterKind {
        match self {
            RecordExtra::Machine { .. } => WorkCenterKind::Machine,
            RecordExtra::Inspection => WorkCenterKind::Inspection,
            RecordExtra::Manual { .. } => WorkCenterKind::Manual,
        }
    }
}

// ==========================================
// DailyRecord
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub workday: NaiveDate,                  // calendar date, unique per entity
    pub daily_plan: i64,                     // units planned for this day
    pub cumulative_plan: i64,                // derived, owned by rollup
    pub shift_outputs: [i64; SHIFT_SLOTS],   // good output per shift
    pub shift_rejects: [i64; SHIFT_SLOTS],   // rejected output per shift
    pub supplier_reject: i64,                // rejects attributed to supplier
    pub total_output: i64,                   // derived = sum(shift_outputs)
    pub total_reject: i64,                   // derived = sum(shift_rejects)
    pub cumulative_output: i64,              // derived, owned by rollup
    pub reject_ratio: f64,                   // derived, [0,1], 0 when no parts
    pub operating_hours: f64,                // actual run time
    pub available_operating_hours: f64,      // scheduled run time
    pub utilization: f64,                    // derived, 0 when no availability
    pub extra: RecordExtra,                  // kind-specific fields
}

impl DailyRecord {
    /// Create an empty record for one workday
    pub fn new(workday: NaiveDate, kind: WorkCenterKind, daily_plan: i64) -> Self {
        let mut record = Self {
            workday,
            daily_plan,
            cumulative_plan: 0,
            shift_outputs: [0; SHIFT_SLOTS],
            shift_rejects: [0; SHIFT_SLOTS],
            supplier_reject: 0,
            total_output: 0,
            total_reject: 0,
            cumulative_output: 0,
            reject_ratio: 0.0,
            operating_hours: 0.0,
            available_operating_hours: 0.0,
            utilization: 0.0,
            extra: RecordExtra::for_kind(kind),
        };
        record.recompute_derived();
        record
    }

    pub fn kind(&self) -> WorkCenterKind {
        self.extra.kind()
    }

    // ==========================================
    // Setters - each one recomputes before returning
    // ==========================================

    pub fn set_daily_plan(&mut self, daily_plan: i64) {
        self.daily_plan = daily_plan;
        self.recompute_derived();
    }

    /// Set the good output of one shift (slot 0..=2)
    pub fn set_shift_output(&mut self, slot: usize, output: i64) {
        if slot >= SHIFT_SLOTS {
            warn!(workday = %self.workday, slot, "shift slot out of range, output ignored");
            return;
        }
        self.shift_outputs[slot] = output;
        self.recompute_derived();
    }

    /// Set the reject count of one shift (slot 0..=2)
    pub fn set_shift_reject(&mut self, slot: usize, reject: i64) {
        if slot >= SHIFT_SLOTS {
            warn!(workday = %self.workday, slot, "shift slot out of range, reject ignored");
            return;
        }
        self.shift_rejects[slot] = reject;
        self.recompute_derived();
    }

    pub fn set_supplier_reject(&mut self, reject: i64) {
        self.supplier_reject = reject;
        self.recompute_derived();
    }

    pub fn set_operating_hours(&mut self, hours: f64) {
        self.operating_hours = hours;
        self.recompute_derived();
    }

    pub fn set_available_operating_hours(&mut self, hours: f64) {
        self.available_operating_hours = hours;
        self.recompute_derived();
    }

    /// Add output/scrap to one shift slot (ledger import accumulates)
    pub fn add_shift_quantities(&mut self, slot: usize, output: i64, reject: i64) {
        if slot >= SHIFT_SLOTS {
            warn!(workday = %self.workday, slot, "shift slot out of range, quantities ignored");
            return;
        }
        self.shift_outputs[slot] += output;
        self.shift_rejects[slot] += reject;
        self.recompute_derived();
    }

    /// Machine efficiency figure; ignored for other kinds
    pub fn set_efficiency(&mut self, value: f64) {
        if let RecordExtra::Machine { efficiency, .. } = &mut self.extra {
            *efficiency = value;
        }
    }

    pub fn efficiency(&self) -> f64 {
        match &self.extra {
            RecordExtra::Machine { efficiency, .. } => *efficiency,
            _ => 0.0,
        }
    }

    /// Count scrap against a named reason; machine records only
    pub fn add_scrap_reason(&mut self, reason_code: &str, quantity: i64) {
        if let RecordExtra::Machine { scrap_reasons, .. } = &mut self.extra {
            *scrap_reasons.entry(reason_code.to_string()).or_insert(0) += quantity;
        }
    }

    /// KFT / subcontractor split; manual records only
    pub fn set_manual_split(&mut self, kft: i64, subcontractor: i64) {
        if let RecordExtra::Manual {
            kft_output,
            subcontractor_output,
            ..
        } = &mut self.extra
        {
            *kft_output = kft;
            *subcontractor_output = subcontractor;
        }
    }

    /// Productivity figures; manual records only
    pub fn set_productivity(&mut self, own: f64, subcontractor: f64) {
        if let RecordExtra::Manual {
            own_productivity,
            subcontractor_productivity,
            ..
        } = &mut self.extra
        {
            *own_productivity = own;
            *subcontractor_productivity = subcontractor;
        }
    }

    pub fn subcontractor_productivity(&self) -> f64 {
        match &self.extra {
            RecordExtra::Manual {
                subcontractor_productivity,
                ..
            } => *subcontractor_productivity,
            _ => 0.0,
        }
    }

    // ==========================================
    // Derived fields
    // ==========================================

    /// Recompute the record-local derived fields from current inputs
    ///
    /// Division by zero yields 0.0, never an error and never NaN.
    pub fn recompute_derived(&mut self) {
        self.total_output = self.shift_outputs.iter().sum();
        self.total_reject = self.shift_rejects.iter().sum();

        let parts = self.total_output + self.total_reject;
        self.reject_ratio = if parts == 0 {
            0.0
        } else {
            self.total_reject as f64 / parts as f64
        };

        self.utilization = if self.available_operating_hours == 0.0 {
            0.0
        } else {
            self.operating_hours / self.available_operating_hours
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_totals_follow_shift_edits() {
        let mut r = DailyRecord::new(day(8), WorkCenterKind::Machine, 100);
        r.set_shift_output(0, 40);
        r.set_shift_output(1, 35);
        r.set_shift_reject(0, 3);
        r.set_shift_reject(2, 2);

        assert_eq!(r.total_output, 75);
        assert_eq!(r.total_reject, 5);
        assert!((r.reject_ratio - 5.0 / 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_reject_ratio_zero_when_no_parts() {
        let mut r = DailyRecord::new(day(8), WorkCenterKind::Inspection, 50);
        r.set_shift_output(0, 0);
        assert_eq!(r.reject_ratio, 0.0);
        assert!(!r.reject_ratio.is_nan());
    }

    #[test]
    fn test_utilization_zero_when_no_availability() {
        let mut r = DailyRecord::new(day(8), WorkCenterKind::Machine, 100);
        r.set_operating_hours(6.5);
        assert_eq!(r.utilization, 0.0);

        r.set_available_operating_hours(8.0);
        assert!((r.utilization - 6.5 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_every_setter_leaves_derived_consistent() {
        let mut r = DailyRecord::new(day(9), WorkCenterKind::Manual, 200);
        r.set_shift_output(0, 120);
        r.set_shift_reject(1, 10);
        r.set_supplier_reject(4);
        r.set_daily_plan(250);
        r.add_shift_quantities(1, 30, 2);

        assert_eq!(r.total_output, r.shift_outputs.iter().sum::<i64>());
        assert_eq!(r.total_reject, r.shift_rejects.iter().sum::<i64>());
        let parts = r.total_output + r.total_reject;
        assert!((r.reject_ratio - r.total_reject as f64 / parts as f64).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_shift_slot_leaves_record_unchanged() {
        let mut r = DailyRecord::new(day(8), WorkCenterKind::Machine, 100);
        r.set_shift_output(SHIFT_SLOTS, 50);
        r.set_shift_reject(SHIFT_SLOTS, 5);
        r.add_shift_quantities(9, 10, 1);

        assert_eq!(r.total_output, 0);
        assert_eq!(r.total_reject, 0);
    }

    #[test]
    fn test_scrap_reasons_accumulate_on_machine_records() {
        let mut r = DailyRecord::new(day(10), WorkCenterKind::Machine, 100);
        r.add_scrap_reason("SCRATCH", 3);
        r.add_scrap_reason("SCRATCH", 2);
        r.add_scrap_reason("DIMENSION", 1);

        match &r.extra {
            RecordExtra::Machine { scrap_reasons, .. } => {
                assert_eq!(scrap_reasons.get("SCRATCH"), Some(&5));
                assert_eq!(scrap_reasons.get("DIMENSION"), Some(&1));
            }
            _ => panic!("expected machine extra"),
        }
    }

    #[test]
    fn test_manual_only_fields_ignored_on_other_kinds() {
        let mut r = DailyRecord::new(day(11), WorkCenterKind::Machine, 100);
        r.set_manual_split(10, 20);
        r.set_productivity(1.0, 2.0);
        assert_eq!(r.subcontractor_productivity(), 0.0);
    }
}
