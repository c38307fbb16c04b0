use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::period::Period;
use crate::time::utility::is_end_of_month;

// ─────────────────────────────────────────────────────────────────────────────
// adjuster 函式：只在 d 為假日時被呼叫
// ─────────────────────────────────────────────────────────────────────────────

fn unadjusted(d: NaiveDate, _calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    d
}

fn following(d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    calendar.next_business_day(d)
}

fn preceding(d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    calendar.previous_business_day(d)
}

fn modified_following(d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    let next = calendar.next_business_day(d);
    if next.month() != d.month() {
        calendar.previous_business_day(d)
    } else {
        next
    }
}

fn modified_preceding(d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    let previous = calendar.previous_business_day(d);
    if previous.month() != d.month() {
        calendar.next_business_day(d)
    } else {
        previous
    }
}

fn half_month_modified_following(d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    let next = calendar.next_business_day(d);
    let crosses_half = d.day() <= 15 && next.day() > 15;
    if next.month() != d.month() || crosses_half {
        calendar.previous_business_day(d)
    } else {
        next
    }
}

fn nearest(d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    let previous = calendar.previous_business_day(d);
    let next = calendar.next_business_day(d);
    if (next - d).num_days() <= (d - previous).num_days() {
        next
    } else {
        previous
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum BusinessDayConvention {
    Unadjusted,
    Following,
    Preceding,
    ModifiedFollowing,
    ModifiedPreceding,
    HalfMonthModifiedFollowing,
    Nearest,
}

#[derive(Deserialize)]
struct BusinessDayAdjusterJsonProp {
    convention: BusinessDayConvention,
    #[serde(default)]
    eom: bool,
}

impl From<BusinessDayAdjusterJsonProp> for BusinessDayAdjuster {
    fn from(prop: BusinessDayAdjusterJsonProp) -> Self {
        BusinessDayAdjuster::new(prop.convention, prop.eom)
    }
}

/// A business-day convention together with the end-of-month roll flag.
#[derive(Clone, Copy, Deserialize)]
#[serde(from = "BusinessDayAdjusterJsonProp")]
pub struct BusinessDayAdjuster {
    convention: BusinessDayConvention,
    eom: bool,
    adjuster: fn(NaiveDate, &Arc<dyn HolidayCalendar>) -> NaiveDate,
}

impl BusinessDayAdjuster {
    pub fn new(convention: BusinessDayConvention, eom: bool) -> BusinessDayAdjuster {
        let adjuster = match convention {
            BusinessDayConvention::Unadjusted => unadjusted,
            BusinessDayConvention::Following => following,
            BusinessDayConvention::Preceding => preceding,
            BusinessDayConvention::ModifiedFollowing => modified_following,
            BusinessDayConvention::ModifiedPreceding => modified_preceding,
            BusinessDayConvention::HalfMonthModifiedFollowing => half_month_modified_following,
            BusinessDayConvention::Nearest => nearest,
        };
        BusinessDayAdjuster { convention, eom, adjuster }
    }

    pub fn unadjusted() -> BusinessDayAdjuster {
        BusinessDayAdjuster::new(BusinessDayConvention::Unadjusted, false)
    }

    pub fn convention(&self) -> BusinessDayConvention {
        self.convention
    }

    pub fn eom(&self) -> bool {
        self.eom
    }

    /// Same convention, different end-of-month flag.
    pub fn with_eom(&self, eom: bool) -> BusinessDayAdjuster {
        BusinessDayAdjuster::new(self.convention, eom)
    }

    /// Adjusts `d` when it is a holiday of `calendar`; business days pass through.
    pub fn adjust(&self, d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
        if calendar.is_holiday(d) {
            (self.adjuster)(d, calendar)
        } else {
            d
        }
    }

    /// Adds `tenor` to `horizon` and adjusts. With the EOM flag set and
    /// `horizon` the last business day of its month, the result is the last
    /// business day of the target month.
    pub fn from_tenor_to_date(
        &self,
        horizon: NaiveDate,
        tenor: Period,
        calendar: &Arc<dyn HolidayCalendar>,
    ) -> NaiveDate {
        let d = horizon + tenor;
        let month_based = tenor.total_months().is_some();
        let at_month_end = is_end_of_month(horizon)
            || calendar.last_business_day_of_month(horizon.year(), horizon.month()) == horizon;
        if self.eom && month_based && at_month_end {
            calendar.last_business_day_of_month(d.year(), d.month())
        } else {
            self.adjust(d, calendar)
        }
    }
}

impl PartialEq for BusinessDayAdjuster {
    fn eq(&self, other: &Self) -> bool {
        self.convention == other.convention && self.eom == other.eom
    }
}

impl fmt::Debug for BusinessDayAdjuster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessDayAdjuster")
            .field("convention", &self.convention)
            .field("eom", &self.eom)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::calendar::simplecalendar::SimpleCalendar;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekends() -> Arc<dyn HolidayCalendar> {
        Arc::new(SimpleCalendar::weekends_only())
    }

    #[test]
    fn test_conventions_on_month_end_weekend() {
        let calendar = weekends();
        // Saturday 2024-08-31
        let d = ymd(2024, 8, 31);
        let adjust = |c| BusinessDayAdjuster::new(c, false).adjust(d, &calendar);
        assert_eq!(adjust(BusinessDayConvention::Following), ymd(2024, 9, 2));
        assert_eq!(adjust(BusinessDayConvention::ModifiedFollowing), ymd(2024, 8, 30));
        assert_eq!(adjust(BusinessDayConvention::Preceding), ymd(2024, 8, 30));
        assert_eq!(adjust(BusinessDayConvention::Unadjusted), d);
        assert_eq!(adjust(BusinessDayConvention::Nearest), ymd(2024, 8, 30));
    }

    #[test]
    fn test_modified_preceding_and_half_month() {
        let calendar = weekends();
        // Saturday 2024-06-01
        let d = ymd(2024, 6, 1);
        let adjuster = BusinessDayAdjuster::new(BusinessDayConvention::ModifiedPreceding, false);
        assert_eq!(adjuster.adjust(d, &calendar), ymd(2024, 6, 3));
        // Saturday 2024-06-15 would roll into the second half of the month
        let adjuster = BusinessDayAdjuster::new(BusinessDayConvention::HalfMonthModifiedFollowing, false);
        assert_eq!(adjuster.adjust(ymd(2024, 6, 15), &calendar), ymd(2024, 6, 14));
    }

    #[test]
    fn test_from_tenor_with_eom() {
        let calendar = weekends();
        let adjuster = BusinessDayAdjuster::new(BusinessDayConvention::ModifiedFollowing, true);
        assert_eq!(
            adjuster.from_tenor_to_date(ymd(2024, 2, 29), Period::months(1), &calendar),
            ymd(2024, 3, 29)
        );
        let no_eom = adjuster.with_eom(false);
        assert_eq!(
            no_eom.from_tenor_to_date(ymd(2024, 2, 29), Period::months(1), &calendar),
            ymd(2024, 3, 29)
        );
        assert_eq!(
            no_eom.from_tenor_to_date(ymd(2024, 4, 30), Period::months(1), &calendar),
            ymd(2024, 5, 30)
        );
        assert_eq!(
            adjuster.from_tenor_to_date(ymd(2024, 4, 30), Period::months(1), &calendar),
            ymd(2024, 5, 31)
        );
    }

    #[test]
    fn test_deserialize_with_default_eom() {
        let adjuster: BusinessDayAdjuster =
            serde_json::from_str(r#"{"convention": "ModifiedFollowing"}"#).unwrap();
        assert_eq!(
            adjuster,
            BusinessDayAdjuster::new(BusinessDayConvention::ModifiedFollowing, false)
        );
    }
}
