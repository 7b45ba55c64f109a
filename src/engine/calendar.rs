// ==========================================
// Workday calendar
// ==========================================
// Computes the workday sequence of a date range: weekends and
// holidays excluded, caller-supplied extra workdays included, and
// store-wide moved-workday pairs (from-day -> to-day substitutions,
// e.g. a Saturday worked in exchange for a bridge day) respected.
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{BTreeMap, BTreeSet};

/// Result of a workday count over a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkdayCount {
    pub workdays: i64,
    pub holidays: i64,
}

// ==========================================
// WorkdayCalendar
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct WorkdayCalendar {
    /// Public holidays
    holidays: BTreeSet<NaiveDate>,
    /// Moved workdays: key = original workday (now off),
    /// value = substitute day (now worked)
    moved: BTreeMap<NaiveDate, NaiveDate>,
}

impl WorkdayCalendar {
    pub fn new(holidays: BTreeSet<NaiveDate>, moved: BTreeMap<NaiveDate, NaiveDate>) -> Self {
        Self { holidays, moved }
    }

    fn is_weekend(day: NaiveDate) -> bool {
        matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Whether one calendar day counts as a workday
    ///
    /// Move targets and extra days always count; move sources never
    /// do. Otherwise: not a weekend, not a holiday.
    fn is_workday(&self, day: NaiveDate, extra: &BTreeSet<NaiveDate>) -> bool {
        if extra.contains(&day) {
            return true;
        }
        if self.moved.values().any(|to| *to == day) {
            return true;
        }
        if self.moved.contains_key(&day) {
            return false;
        }
        !Self::is_weekend(day) && !self.holidays.contains(&day)
    }

    /// List the workdays of [start, end] inclusive, ascending
    pub fn list_workdays(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        extra: &BTreeSet<NaiveDate>,
    ) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut day = start;
        while day <= end {
            if self.is_workday(day, extra) {
                days.push(day);
            }
            day += Duration::days(1);
        }
        days
    }

    /// Count workdays and holidays of [start, end] inclusive
    pub fn count_workdays(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        extra: &BTreeSet<NaiveDate>,
    ) -> WorkdayCount {
        let mut workdays = 0i64;
        let mut holidays = 0i64;
        let mut day = start;
        while day <= end {
            if self.is_workday(day, extra) {
                workdays += 1;
            } else if self.holidays.contains(&day) && !Self::is_weekend(day) {
                holidays += 1;
            }
            day += Duration::days(1);
        }
        WorkdayCount { workdays, holidays }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekends_excluded() {
        let cal = WorkdayCalendar::default();
        // 2024-01-08 is a Monday
        let days = cal.list_workdays(d(2024, 1, 8), d(2024, 1, 14), &BTreeSet::new());
        assert_eq!(days.len(), 5);
        assert_eq!(days.last(), Some(&d(2024, 1, 12)));
    }

    #[test]
    fn test_holidays_excluded_and_counted() {
        let holidays = BTreeSet::from([d(2024, 1, 10)]);
        let cal = WorkdayCalendar::new(holidays, BTreeMap::new());
        let count = cal.count_workdays(d(2024, 1, 8), d(2024, 1, 12), &BTreeSet::new());
        assert_eq!(count.workdays, 4);
        assert_eq!(count.holidays, 1);
    }

    #[test]
    fn test_extra_workday_included() {
        let cal = WorkdayCalendar::default();
        // Saturday declared a workday by the caller
        let extra = BTreeSet::from([d(2024, 1, 13)]);
        let days = cal.list_workdays(d(2024, 1, 8), d(2024, 1, 14), &extra);
        assert!(days.contains(&d(2024, 1, 13)));
        assert_eq!(days.len(), 6);
    }

    #[test]
    fn test_moved_pair_substitutes_days() {
        // Friday 2024-08-16 off, Saturday 2024-08-10 worked instead
        let moved = BTreeMap::from([(d(2024, 8, 16), d(2024, 8, 10))]);
        let cal = WorkdayCalendar::new(BTreeSet::new(), moved);
        let days = cal.list_workdays(d(2024, 8, 5), d(2024, 8, 18), &BTreeSet::new());

        assert!(days.contains(&d(2024, 8, 10)));
        assert!(!days.contains(&d(2024, 8, 16)));
        // Two full weeks: 10 weekdays - 1 source + 1 target
        assert_eq!(days.len(), 10);
    }
}
