use std::sync::Arc;

use crate::interestrate::index::interestrateindex::{InterestRateIndex, InterestRateIndexType};
use crate::market::currency::Currency;
use crate::time::businessdayadjuster::BusinessDayAdjuster;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::daycounter::daycounter::DayCounter;
use crate::time::period::Period;

/// Ibor-style term rate: one fixing covers `[start, start + tenor]`.
pub struct TermRateIndex {
    name: String,
    currency: Currency,
    start_lag: u32,
    adjuster: BusinessDayAdjuster,
    tenor: Period,
    calendar: Arc<dyn HolidayCalendar>,
    day_counter: DayCounter,
}

impl TermRateIndex {
    pub fn new(
        name: impl Into<String>,
        currency: Currency,
        start_lag: u32,
        adjuster: BusinessDayAdjuster,
        tenor: Period,
        calendar: Arc<dyn HolidayCalendar>,
        day_counter: DayCounter,
    ) -> Self {
        Self {
            name: name.into(),
            currency,
            start_lag,
            adjuster,
            tenor,
            calendar,
            day_counter,
        }
    }
}

impl InterestRateIndex for TermRateIndex {
    fn name(&self) -> &str { &self.name }
    fn currency(&self) -> &Currency { &self.currency }
    fn tenor(&self) -> &Period { &self.tenor }
    fn start_lag(&self) -> u32 { self.start_lag }
    // term rate 在 fixing date 當天公布
    fn publication_lag(&self) -> u32 { 0 }
    fn adjuster(&self) -> &BusinessDayAdjuster { &self.adjuster }
    fn calendar(&self) -> &Arc<dyn HolidayCalendar> { &self.calendar }
    fn day_counter(&self) -> &DayCounter { &self.day_counter }
    fn index_type(&self) -> InterestRateIndexType { InterestRateIndexType::TermRate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::businessdayadjuster::BusinessDayConvention;
    use crate::time::calendar::simplecalendar::SimpleCalendar;
    use crate::time::daycounter::standarddaycounters::actual_360;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn euribor_3m() -> TermRateIndex {
        TermRateIndex::new(
            "EURIBOR3M",
            Currency::new("EUR", 2),
            2,
            BusinessDayAdjuster::new(BusinessDayConvention::ModifiedFollowing, true),
            Period::months(3),
            Arc::new(SimpleCalendar::weekends_only()),
            actual_360(),
        )
    }

    #[test]
    fn test_fixing_period_from_fixing_date() {
        let index = euribor_3m();
        // Thursday fixing, spot on Monday
        let fixing = ymd(2024, 3, 14);
        assert_eq!(index.start_date(fixing), ymd(2024, 3, 18));
        assert_eq!(index.end_date(fixing), ymd(2024, 6, 18));
        assert_eq!(index.fixing_date_from_start(ymd(2024, 3, 18)), fixing);
        assert_eq!(index.publication_date(fixing), fixing);
    }

    #[test]
    fn test_end_of_month_start_rolls_to_month_end() {
        let index = euribor_3m();
        // 2024-04-30 is the last business day of April
        assert_eq!(index.end_date_from_start(ymd(2024, 4, 30)), ymd(2024, 7, 31));
    }
}
