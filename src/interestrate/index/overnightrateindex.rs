use std::sync::Arc;

use chrono::NaiveDate;

use crate::interestrate::index::interestrateindex::{InterestRateIndex, InterestRateIndexType};
use crate::market::currency::Currency;
use crate::time::businessdayadjuster::{BusinessDayAdjuster, BusinessDayConvention};
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::daycounter::daycounter::DayCounter;
use crate::time::period::Period;

const ONE_DAY: Period = Period::days(1);

/// Overnight index (SOFR, ESTR, SONIA ...). Each fixing covers one business
/// day of the index calendar; `publication_lag` is 1 for rates published the
/// next morning.
pub struct OvernightRateIndex {
    name: String,
    currency: Currency,
    publication_lag: u32,
    adjuster: BusinessDayAdjuster,
    calendar: Arc<dyn HolidayCalendar>,
    day_counter: DayCounter,
}

impl OvernightRateIndex {
    pub fn new(
        name: impl Into<String>,
        currency: Currency,
        publication_lag: u32,
        calendar: Arc<dyn HolidayCalendar>,
        day_counter: DayCounter,
    ) -> Self {
        Self {
            name: name.into(),
            currency,
            publication_lag,
            adjuster: BusinessDayAdjuster::new(BusinessDayConvention::Following, false),
            calendar,
            day_counter,
        }
    }
}

impl InterestRateIndex for OvernightRateIndex {
    fn name(&self) -> &str { &self.name }
    fn currency(&self) -> &Currency { &self.currency }
    fn tenor(&self) -> &Period { &ONE_DAY }
    fn start_lag(&self) -> u32 { 0 }
    fn publication_lag(&self) -> u32 { self.publication_lag }
    fn adjuster(&self) -> &BusinessDayAdjuster { &self.adjuster }
    fn calendar(&self) -> &Arc<dyn HolidayCalendar> { &self.calendar }
    fn day_counter(&self) -> &DayCounter { &self.day_counter }
    fn index_type(&self) -> InterestRateIndexType { InterestRateIndexType::OvernightRate }

    fn end_date_from_start(&self, start_date: NaiveDate) -> NaiveDate {
        self.calendar.next_business_day(start_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::calendar::simplecalendar::SimpleCalendar;
    use crate::time::daycounter::standarddaycounters::actual_360;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overnight_dates() {
        let calendar: Arc<dyn HolidayCalendar> =
            Arc::new(SimpleCalendar::weekends_with_holidays(vec![ymd(2024, 7, 4)]));
        let sofr = OvernightRateIndex::new("SOFR", Currency::new("USD", 2), 1, calendar, actual_360());
        assert_eq!(sofr.start_date(ymd(2024, 7, 3)), ymd(2024, 7, 3));
        assert_eq!(sofr.end_date(ymd(2024, 7, 3)), ymd(2024, 7, 5));
        assert_eq!(sofr.end_date(ymd(2024, 7, 5)), ymd(2024, 7, 8));
        assert_eq!(sofr.publication_date(ymd(2024, 7, 3)), ymd(2024, 7, 5));
        assert_eq!(sofr.tenor(), &Period::days(1));
    }
}
