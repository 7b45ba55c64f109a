// ==========================================
// Domain type definitions
// ==========================================
// Work-center classification, report kinds and shift configuration.
// Serialization format: SCREAMING_SNAKE_CASE (consistent with storage)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Work-center kind
// ==========================================
// Classification drives which extra fields a daily record carries
// and which rollup collection of the document owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkCenterKind {
    Machine,    // machine line
    Inspection, // inspection station
    Manual,     // manual-labor cell
}

impl WorkCenterKind {
    /// Process family this kind belongs to (machine-paced centers
    /// share the machine family's shift count)
    pub fn family(&self) -> ProcessFamily {
        match self {
            WorkCenterKind::Machine | WorkCenterKind::Inspection => ProcessFamily::Machine,
            WorkCenterKind::Manual => ProcessFamily::Manual,
        }
    }
}

impl fmt::Display for WorkCenterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkCenterKind::Machine => write!(f, "MACHINE"),
            WorkCenterKind::Inspection => write!(f, "INSPECTION"),
            WorkCenterKind::Manual => write!(f, "MANUAL"),
        }
    }
}

// ==========================================
// Report kind
// ==========================================
// Production: weekly production meeting, includes the turnover /
//             shipment reconciliation step
// Quality:    QRQC quality meeting, no financial reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportKind {
    Production,
    Quality,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Production => write!(f, "PRODUCTION"),
            ReportKind::Quality => write!(f, "QUALITY"),
        }
    }
}

// ==========================================
// Process family
// ==========================================
// Shift configuration is tracked per family, not per work center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessFamily {
    Manual,
    Machine,
}

impl fmt::Display for ProcessFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessFamily::Manual => write!(f, "MANUAL"),
            ProcessFamily::Machine => write!(f, "MACHINE"),
        }
    }
}

// ==========================================
// Shift configuration
// ==========================================
// Number of shifts per day for each process family, 1..=3.
// Shift slots beyond the configured count stay zero in daily records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftConfig {
    pub manual_shifts: u8,
    pub machine_shifts: u8,
}

impl ShiftConfig {
    pub fn new(manual_shifts: u8, machine_shifts: u8) -> Self {
        Self {
            manual_shifts: manual_shifts.clamp(1, 3),
            machine_shifts: machine_shifts.clamp(1, 3),
        }
    }

    /// Shift count for a given work-center kind
    pub fn shifts_for(&self, kind: WorkCenterKind) -> u8 {
        match kind.family() {
            ProcessFamily::Machine => self.machine_shifts,
            ProcessFamily::Manual => self.manual_shifts,
        }
    }
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            manual_shifts: 2,
            machine_shifts: 3,
        }
    }
}

// ==========================================
// Work-center selection
// ==========================================
// Input shape of document creation: which centers to track and the
// constant daily plan each one is seeded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCenterSelection {
    pub work_center: String,      // work-center id (e.g. "M-301")
    pub kind: WorkCenterKind,     // classification
    pub daily_plan: i64,          // configured daily plan, constant across days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_config_clamps_to_valid_range() {
        let cfg = ShiftConfig::new(0, 5);
        assert_eq!(cfg.manual_shifts, 1);
        assert_eq!(cfg.machine_shifts, 3);
    }

    #[test]
    fn test_shifts_for_kind() {
        let cfg = ShiftConfig::new(2, 3);
        assert_eq!(cfg.shifts_for(WorkCenterKind::Manual), 2);
        assert_eq!(cfg.shifts_for(WorkCenterKind::Machine), 3);
        assert_eq!(cfg.shifts_for(WorkCenterKind::Inspection), 3);
    }
}
