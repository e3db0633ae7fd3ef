//! Receivable aging.
//!
//! Each open balance lands in exactly one window, chosen by how many days
//! before the statement date the transaction was issued. Cutoffs are strict:
//! a transaction exactly 30 days old is in the 30-day window, not current.

use chrono::NaiveDate;
use docforge_core::money;
use serde::{Deserialize, Serialize};

/// Open balance split by age.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgingBuckets {
    pub current: f64,
    pub days_30: f64,
    pub days_60: f64,
    pub days_90: f64,
}

impl AgingBuckets {
    /// Add `balance` to the window for a transaction `age_days` old.
    /// Negative ages (post-dated transactions) count as current.
    pub fn add(&mut self, age_days: i64, balance: f64) {
        let slot = match age_days {
            ..30 => &mut self.current,
            30..60 => &mut self.days_30,
            60..90 => &mut self.days_60,
            _ => &mut self.days_90,
        };
        *slot += balance;
    }

    pub fn total(&self) -> f64 {
        money::finite_or_zero(self.current + self.days_30 + self.days_60 + self.days_90)
    }
}

/// Days from `issued` to `statement_date`; negative when issued later.
pub fn age_in_days(statement_date: NaiveDate, issued: NaiveDate) -> i64 {
    statement_date.signed_duration_since(issued).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoffs_are_strict() {
        let mut buckets = AgingBuckets::default();
        buckets.add(29, 1.0);
        buckets.add(30, 2.0);
        buckets.add(59, 4.0);
        buckets.add(60, 8.0);
        buckets.add(89, 16.0);
        buckets.add(90, 32.0);
        buckets.add(400, 64.0);
        buckets.add(-12, 128.0);

        assert_eq!(buckets.current, 129.0);
        assert_eq!(buckets.days_30, 6.0);
        assert_eq!(buckets.days_60, 24.0);
        assert_eq!(buckets.days_90, 96.0);
        assert_eq!(buckets.total(), 255.0);
    }

    #[test]
    fn age_counts_calendar_days() {
        let statement = NaiveDate::from_ymd_opt(2025, 11, 23).unwrap();
        let issued = NaiveDate::from_ymd_opt(2025, 10, 23).unwrap();
        assert_eq!(age_in_days(statement, issued), 31);
        assert_eq!(age_in_days(issued, statement), -31);
    }
}
