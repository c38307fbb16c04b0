use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::market::currency::Currency;
use crate::time::businessdayadjuster::BusinessDayAdjuster;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::daycounter::daycounter::DayCounter;
use crate::time::period::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum InterestRateIndexType {
    TermRate,
    OvernightRate,
}

/// 利率 index 的靜態屬性，以及由 fixing date 推算 fixing period 的規則。
///
/// 日期推算全部走 index 自己的 calendar，與 leg 的 calendar 無關。
pub trait InterestRateIndex: Send + Sync {
    // ── Index 靜態屬性 ────────────────────────────────────────────────────

    fn name(&self) -> &str;

    fn currency(&self) -> &Currency;

    /// Index 的自然 tenor（3M Ibor 為 `3M`，overnight 為 `1D`）。
    fn tenor(&self) -> &Period;

    /// fixing date 到 fixing period 起始日的營業日數。
    fn start_lag(&self) -> u32;

    /// fixing date 到公布日的營業日數。
    fn publication_lag(&self) -> u32;

    fn adjuster(&self) -> &BusinessDayAdjuster;

    fn calendar(&self) -> &Arc<dyn HolidayCalendar>;

    fn day_counter(&self) -> &DayCounter;

    fn index_type(&self) -> InterestRateIndexType;

    // ── 由 fixing_date 推算日期 ───────────────────────────────────────────

    fn start_date(&self, fixing_date: NaiveDate) -> NaiveDate {
        self.calendar()
            .shift_n_business_day(fixing_date, self.start_lag() as i32)
    }

    fn end_date(&self, fixing_date: NaiveDate) -> NaiveDate {
        let start = self.start_date(fixing_date);
        self.end_date_from_start(start)
    }

    fn end_date_from_start(&self, start_date: NaiveDate) -> NaiveDate {
        self.adjuster()
            .from_tenor_to_date(start_date, *self.tenor(), self.calendar())
    }

    /// 從 start_date 反推 fixing_date。
    fn fixing_date_from_start(&self, start_date: NaiveDate) -> NaiveDate {
        self.calendar()
            .shift_n_business_day(start_date, -(self.start_lag() as i32))
    }

    fn publication_date(&self, fixing_date: NaiveDate) -> NaiveDate {
        self.calendar()
            .shift_n_business_day(fixing_date, self.publication_lag() as i32)
    }
}

impl fmt::Debug for dyn InterestRateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterestRateIndex")
            .field("name", &self.name())
            .field("currency", &self.currency().code())
            .field("tenor", &self.tenor().to_string())
            .field("index_type", &self.index_type())
            .finish()
    }
}
