use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use crate::time::utility::{end_of_month, with_day_clamped};

/// Moves a generated, not yet business-day-adjusted schedule date onto the
/// conventional roll day of its month.
pub trait RollDateAdjuster: Send + Sync {
    fn adjust(&self, d: NaiveDate) -> NaiveDate;

    fn name(&self) -> &'static str;
}

/// Third Wednesday of the month (IMM roll).
pub struct ImmRollDateAdjuster;

impl RollDateAdjuster for ImmRollDateAdjuster {
    fn adjust(&self, d: NaiveDate) -> NaiveDate {
        NaiveDate::from_weekday_of_month_opt(d.year(), d.month(), Weekday::Wed, 3).unwrap_or(d)
    }

    fn name(&self) -> &'static str {
        "IMM"
    }
}

/// Fixed day of month, clamped to the month length (roll day 31 lands on 30 in
/// April).
pub struct DayOfMonthRollDateAdjuster {
    day: u32,
}

impl DayOfMonthRollDateAdjuster {
    pub fn new(day: u32) -> DayOfMonthRollDateAdjuster {
        DayOfMonthRollDateAdjuster { day }
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl RollDateAdjuster for DayOfMonthRollDateAdjuster {
    fn adjust(&self, d: NaiveDate) -> NaiveDate {
        with_day_clamped(d, self.day)
    }

    fn name(&self) -> &'static str {
        "DayOfMonth"
    }
}

pub struct EndOfMonthRollDateAdjuster;

impl RollDateAdjuster for EndOfMonthRollDateAdjuster {
    fn adjust(&self, d: NaiveDate) -> NaiveDate {
        end_of_month(d)
    }

    fn name(&self) -> &'static str {
        "EndOfMonth"
    }
}

/// JSON form of a roll adjuster inside a leg convention.
#[derive(Clone, Copy, Deserialize)]
#[serde(tag = "type")]
pub enum RollDateAdjusterType {
    Imm,
    DayOfMonth { day: u32 },
    EndOfMonth,
}

impl RollDateAdjusterType {
    pub fn build(&self) -> Arc<dyn RollDateAdjuster> {
        match self {
            RollDateAdjusterType::Imm => Arc::new(ImmRollDateAdjuster),
            RollDateAdjusterType::DayOfMonth { day } => {
                Arc::new(DayOfMonthRollDateAdjuster::new(*day))
            }
            RollDateAdjusterType::EndOfMonth => Arc::new(EndOfMonthRollDateAdjuster),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_imm_third_wednesday() {
        assert_eq!(ImmRollDateAdjuster.adjust(ymd(2024, 3, 1)), ymd(2024, 3, 20));
        assert_eq!(ImmRollDateAdjuster.adjust(ymd(2024, 6, 30)), ymd(2024, 6, 19));
    }

    #[test]
    fn test_day_of_month_and_end_of_month() {
        let roll = DayOfMonthRollDateAdjuster::new(31);
        assert_eq!(roll.adjust(ymd(2024, 4, 5)), ymd(2024, 4, 30));
        assert_eq!(EndOfMonthRollDateAdjuster.adjust(ymd(2023, 2, 3)), ymd(2023, 2, 28));
    }

    #[test]
    fn test_deserialize_type() {
        let roll: RollDateAdjusterType =
            serde_json::from_str(r#"{"type": "DayOfMonth", "day": 15}"#).unwrap();
        assert_eq!(roll.build().adjust(ymd(2024, 1, 3)), ymd(2024, 1, 15));
        assert_eq!(roll.build().name(), "DayOfMonth");
    }
}
