use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use super::daycounter::{
    AccrualReference, DayCounterDominator, DayCounterDominatorGenerator, DayCounterGenerationError,
    DayCounterNumerator,
};
use crate::time::utility::is_leap;

/// Actual/Actual ISDA: the part of the period falling in each calendar year is
/// divided by that year's length.
pub struct IsdaActualDayCounterDominator;

fn get_dominator(year: i32) -> f64 {
    if is_leap(year) { 366.0 } else { 365.0 }
}

fn new_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

impl DayCounterDominator for IsdaActualDayCounterDominator {
    fn year_fraction(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        numerator: &Arc<dyn DayCounterNumerator>,
        _reference: Option<&AccrualReference>,
    ) -> Result<f64, DayCounterGenerationError> {
        let start_year = start_date.year();
        let end_year = end_date.year();
        if start_year == end_year {
            return Ok(numerator.days_between(start_date, end_date) / get_dominator(start_year));
        }
        let mut result = numerator.days_between(start_date, new_year(start_year + 1)) / get_dominator(start_year);
        for y in (start_year + 1)..end_year {
            result += numerator.days_between(new_year(y), new_year(y + 1)) / get_dominator(y);
        }
        result += numerator.days_between(new_year(end_year), end_date) / get_dominator(end_year);
        Ok(result)
    }
}

pub struct IsdaActualDayCounterDominatorGenerator;

impl DayCounterDominatorGenerator for IsdaActualDayCounterDominatorGenerator {
    fn generate(
        &self,
        _termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterDominator>, DayCounterGenerationError> {
        Ok(Arc::new(IsdaActualDayCounterDominator))
    }
}
