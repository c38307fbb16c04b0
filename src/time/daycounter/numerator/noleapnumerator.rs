use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::time::daycounter::daycounter::{
    DayCounterGenerationError, DayCounterNumerator, DayCounterNumeratorGenerator,
};
use crate::time::utility::{is_leap, leap_years_between};

/// Actual days with every 29 February in `(d1, d2]` removed (Act/365 NL).
pub struct NoLeapNumerator;

fn leap_day(year: i32) -> Option<NaiveDate> {
    if is_leap(year) { NaiveDate::from_ymd_opt(year, 2, 29) } else { None }
}

impl DayCounterNumerator for NoLeapNumerator {
    fn days_between(&self, d1: NaiveDate, d2: NaiveDate) -> f64 {
        let mut days = (d2 - d1).num_days() as f64;
        let y1 = d1.year();
        let y2 = d2.year();
        if y1 == y2 {
            if let Some(feb29) = leap_day(y1) {
                if d1 < feb29 && d2 >= feb29 {
                    days -= 1.0;
                }
            }
        } else {
            days -= leap_years_between(y1, y2) as f64;
            if let Some(feb29) = leap_day(y1) {
                if d1 < feb29 {
                    days -= 1.0;
                }
            }
            if let Some(feb29) = leap_day(y2) {
                if d2 >= feb29 {
                    days -= 1.0;
                }
            }
        }
        days
    }
}

pub struct NoLeapNumeratorGenerator;

impl DayCounterNumeratorGenerator for NoLeapNumeratorGenerator {
    fn generate(
        &self,
        _termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterNumerator>, DayCounterGenerationError> {
        Ok(Arc::new(NoLeapNumerator))
    }
}
