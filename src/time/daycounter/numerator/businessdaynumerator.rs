use std::sync::Arc;

use chrono::NaiveDate;

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::daycounter::daycounter::{
    DayCounterGenerationError, DayCounterNumerator, DayCounterNumeratorGenerator,
};

/// Business days of `calendar` in `[d1, d2)`, as used by Bus/252.
pub struct BusinessDayNumerator {
    calendar: Arc<dyn HolidayCalendar>,
}

impl BusinessDayNumerator {
    pub fn new(calendar: Arc<dyn HolidayCalendar>) -> BusinessDayNumerator {
        BusinessDayNumerator { calendar }
    }
}

impl DayCounterNumerator for BusinessDayNumerator {
    fn days_between(&self, d1: NaiveDate, d2: NaiveDate) -> f64 {
        let (start, end, sign) = if d1 <= d2 { (d1, d2, 1.0) } else { (d2, d1, -1.0) };
        let count = start
            .iter_days()
            .take_while(|d| *d < end)
            .filter(|d| self.calendar.is_business_day(*d))
            .count();
        sign * count as f64
    }
}

pub struct BusinessDayNumeratorGenerator {
    calendar: Arc<dyn HolidayCalendar>,
}

impl BusinessDayNumeratorGenerator {
    pub fn new(calendar: Arc<dyn HolidayCalendar>) -> BusinessDayNumeratorGenerator {
        BusinessDayNumeratorGenerator { calendar }
    }
}

impl DayCounterNumeratorGenerator for BusinessDayNumeratorGenerator {
    fn generate(
        &self,
        _termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterNumerator>, DayCounterGenerationError> {
        Ok(Arc::new(BusinessDayNumerator::new(self.calendar.clone())))
    }
}
