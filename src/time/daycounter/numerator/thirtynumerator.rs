use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::time::daycounter::daycounter::{
    DayCounterGenerationError, DayCounterNumerator, DayCounterNumeratorGenerator,
};
use crate::time::utility::days_of_month;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Ymd {
    y: i32,
    m: i32,
    d: i32,
}

impl Ymd {
    fn from_naive_date(date: NaiveDate) -> Ymd {
        Ymd {
            y: date.year(),
            m: date.month() as i32,
            d: date.day() as i32,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 條件與調整函式
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ThirtyAdjustmentCondition {
    Always,
    Never,
    GreaterThanThirty,
    GreaterThanOrEqualToThirty,
    IsLastDayOfMonth,
    IsNoLeapLastDayOfMonth,
    LastDayUnlessFebButTermination,
}

impl ThirtyAdjustmentCondition {
    fn needs_termination_date(&self) -> bool {
        matches!(self, ThirtyAdjustmentCondition::LastDayUnlessFebButTermination)
    }
}

fn always(_ymd: Ymd, _termination: Option<Ymd>) -> bool {
    true
}

fn never(_ymd: Ymd, _termination: Option<Ymd>) -> bool {
    false
}

fn is_greater_than_thirty(ymd: Ymd, _termination: Option<Ymd>) -> bool {
    ymd.d > 30
}

fn is_greater_than_or_equal_to_thirty(ymd: Ymd, _termination: Option<Ymd>) -> bool {
    ymd.d >= 30
}

fn is_last_day_of_month(ymd: Ymd, _termination: Option<Ymd>) -> bool {
    ymd.d == days_of_month(ymd.y, ymd.m as u32) as i32
}

fn is_no_leap_last_day_of_month(ymd: Ymd, termination: Option<Ymd>) -> bool {
    if ymd.m == 2 {
        ymd.d >= 28
    } else {
        is_last_day_of_month(ymd, termination)
    }
}

/// 30E/360 ISDA 的 end date 規則：二月底且為 termination date 時不調整。
fn is_last_day_unless_feb_but_termination(ymd: Ymd, termination: Option<Ymd>) -> bool {
    if ymd.m == 2 && Some(ymd) == termination {
        false
    } else {
        is_last_day_of_month(ymd, termination)
    }
}

fn get_adjustment_condition_impl(condition: ThirtyAdjustmentCondition) -> fn(Ymd, Option<Ymd>) -> bool {
    match condition {
        ThirtyAdjustmentCondition::Always => always,
        ThirtyAdjustmentCondition::Never => never,
        ThirtyAdjustmentCondition::GreaterThanThirty => is_greater_than_thirty,
        ThirtyAdjustmentCondition::GreaterThanOrEqualToThirty => is_greater_than_or_equal_to_thirty,
        ThirtyAdjustmentCondition::IsLastDayOfMonth => is_last_day_of_month,
        ThirtyAdjustmentCondition::IsNoLeapLastDayOfMonth => is_no_leap_last_day_of_month,
        ThirtyAdjustmentCondition::LastDayUnlessFebButTermination => is_last_day_unless_feb_but_termination,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ThirtyAdjustment {
    ToThirty,
    ToNextMonthFirst,
}

fn to_next_month_first(ymd: Ymd) -> Ymd {
    if ymd.m < 12 {
        Ymd { y: ymd.y, m: ymd.m + 1, d: 1 }
    } else {
        Ymd { y: ymd.y + 1, m: 1, d: 1 }
    }
}

fn to_thirty(ymd: Ymd) -> Ymd {
    Ymd { y: ymd.y, m: ymd.m, d: 30 }
}

fn get_adjustment_impl(adjustment: ThirtyAdjustment) -> fn(Ymd) -> Ymd {
    match adjustment {
        ThirtyAdjustment::ToNextMonthFirst => to_next_month_first,
        ThirtyAdjustment::ToThirty => to_thirty,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ThirtyNumerator
// ─────────────────────────────────────────────────────────────────────────────

/// 30/360 family numerator.
///
/// 1. `start_date_condition(d1)` 成立時以 `start_date_adjustment` 調整 d1。
/// 2. `additional_start_date_condition(調整後 d1)` 與 `end_date_condition(d2)`
///    同時成立時以 `end_date_adjustment` 調整 d2。
/// 3. 天數 = 360·Δy + 30·Δm + Δd。
pub struct ThirtyNumerator {
    start_date_condition_impl: fn(Ymd, Option<Ymd>) -> bool,
    start_date_adjustment_impl: fn(Ymd) -> Ymd,
    additional_start_date_condition_impl: fn(Ymd, Option<Ymd>) -> bool,
    end_date_condition_impl: fn(Ymd, Option<Ymd>) -> bool,
    end_date_adjustment_impl: fn(Ymd) -> Ymd,
    termination_ymd: Option<Ymd>,
}

impl DayCounterNumerator for ThirtyNumerator {
    fn days_between(&self, d1: NaiveDate, d2: NaiveDate) -> f64 {
        let mut ymd1 = Ymd::from_naive_date(d1);
        let mut ymd2 = Ymd::from_naive_date(d2);
        if (self.start_date_condition_impl)(ymd1, self.termination_ymd) {
            ymd1 = (self.start_date_adjustment_impl)(ymd1);
        }
        if (self.additional_start_date_condition_impl)(ymd1, self.termination_ymd)
            && (self.end_date_condition_impl)(ymd2, self.termination_ymd)
        {
            ymd2 = (self.end_date_adjustment_impl)(ymd2);
        }
        (360 * (ymd2.y - ymd1.y) + 30 * (ymd2.m - ymd1.m) + (ymd2.d - ymd1.d)) as f64
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ThirtyNumeratorGenerator {
    start_date_condition: ThirtyAdjustmentCondition,
    start_date_adjustment: ThirtyAdjustment,
    additional_start_date_condition: ThirtyAdjustmentCondition,
    end_date_condition: ThirtyAdjustmentCondition,
    end_date_adjustment: ThirtyAdjustment,
}

impl ThirtyNumeratorGenerator {
    pub fn new(
        start_date_condition: ThirtyAdjustmentCondition,
        start_date_adjustment: ThirtyAdjustment,
        additional_start_date_condition: ThirtyAdjustmentCondition,
        end_date_condition: ThirtyAdjustmentCondition,
        end_date_adjustment: ThirtyAdjustment,
    ) -> ThirtyNumeratorGenerator {
        ThirtyNumeratorGenerator {
            start_date_condition,
            start_date_adjustment,
            additional_start_date_condition,
            end_date_condition,
            end_date_adjustment,
        }
    }

    /// 30/360 Bond Basis.
    pub fn bond_basis() -> ThirtyNumeratorGenerator {
        ThirtyNumeratorGenerator::new(
            ThirtyAdjustmentCondition::GreaterThanThirty,
            ThirtyAdjustment::ToThirty,
            ThirtyAdjustmentCondition::GreaterThanOrEqualToThirty,
            ThirtyAdjustmentCondition::GreaterThanThirty,
            ThirtyAdjustment::ToThirty,
        )
    }

    /// 30E/360 (Eurobond basis).
    pub fn eurobond_basis() -> ThirtyNumeratorGenerator {
        ThirtyNumeratorGenerator::new(
            ThirtyAdjustmentCondition::GreaterThanThirty,
            ThirtyAdjustment::ToThirty,
            ThirtyAdjustmentCondition::Always,
            ThirtyAdjustmentCondition::GreaterThanThirty,
            ThirtyAdjustment::ToThirty,
        )
    }

    /// 30E/360 ISDA; needs the termination date.
    pub fn eurobond_isda() -> ThirtyNumeratorGenerator {
        ThirtyNumeratorGenerator::new(
            ThirtyAdjustmentCondition::IsLastDayOfMonth,
            ThirtyAdjustment::ToThirty,
            ThirtyAdjustmentCondition::Always,
            ThirtyAdjustmentCondition::LastDayUnlessFebButTermination,
            ThirtyAdjustment::ToThirty,
        )
    }

    /// The numerator without the termination-date check; with `None` the
    /// February termination exception never applies.
    pub fn numerator(&self, termination_date: Option<NaiveDate>) -> ThirtyNumerator {
        ThirtyNumerator {
            start_date_condition_impl: get_adjustment_condition_impl(self.start_date_condition),
            start_date_adjustment_impl: get_adjustment_impl(self.start_date_adjustment),
            additional_start_date_condition_impl: get_adjustment_condition_impl(self.additional_start_date_condition),
            end_date_condition_impl: get_adjustment_condition_impl(self.end_date_condition),
            end_date_adjustment_impl: get_adjustment_impl(self.end_date_adjustment),
            termination_ymd: termination_date.map(Ymd::from_naive_date),
        }
    }

    pub fn needs_termination_date(&self) -> bool {
        self.start_date_condition.needs_termination_date()
            || self.additional_start_date_condition.needs_termination_date()
            || self.end_date_condition.needs_termination_date()
    }
}

impl DayCounterNumeratorGenerator for ThirtyNumeratorGenerator {
    fn generate(
        &self,
        termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterNumerator>, DayCounterGenerationError> {
        if self.needs_termination_date() && termination_date.is_none() {
            return Err(DayCounterGenerationError::TerminationDateNotGiven);
        }
        Ok(Arc::new(self.numerator(termination_date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bond_basis() {
        let numerator = ThirtyNumeratorGenerator::bond_basis().generate(None).unwrap();
        assert_eq!(numerator.days_between(ymd(2024, 1, 31), ymd(2024, 3, 31)), 60.0);
        assert_eq!(numerator.days_between(ymd(2024, 1, 15), ymd(2024, 3, 31)), 76.0);
    }

    #[test]
    fn test_eurobond_basis() {
        let numerator = ThirtyNumeratorGenerator::eurobond_basis().generate(None).unwrap();
        assert_eq!(numerator.days_between(ymd(2024, 1, 15), ymd(2024, 3, 31)), 75.0);
        assert_eq!(numerator.days_between(ymd(2024, 2, 29), ymd(2024, 8, 31)), 181.0);
    }

    #[test]
    fn test_eurobond_isda_needs_termination() {
        let generator = ThirtyNumeratorGenerator::eurobond_isda();
        assert!(matches!(
            generator.generate(None),
            Err(DayCounterGenerationError::TerminationDateNotGiven)
        ));
        let numerator = generator.generate(Some(ymd(2025, 2, 28))).unwrap();
        // Feb end start date rolls to 30
        assert_eq!(numerator.days_between(ymd(2024, 2, 29), ymd(2024, 8, 31)), 180.0);
        // termination in February keeps its day
        assert_eq!(numerator.days_between(ymd(2024, 8, 31), ymd(2025, 2, 28)), 178.0);
        assert_eq!(numerator.days_between(ymd(2024, 8, 31), ymd(2024, 11, 30)), 90.0);
    }
}
