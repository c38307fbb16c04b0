use std::collections::HashSet;
use std::fmt;

use chrono::{Days, NaiveDate};

use crate::time::utility::days_of_month;

const ONE_DAY: Days = Days::new(1);

/// Holiday calendar consumed by schedule generation, business-day adjustment
/// and overnight sub-period stepping.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, d: NaiveDate) -> bool;

    fn get_holiday_set(&self, year: i32) -> HashSet<NaiveDate>;

    fn is_business_day(&self, d: NaiveDate) -> bool {
        !self.is_holiday(d)
    }

    /// Moves `n` business days away from `horizon`; `n == 0` returns `horizon`
    /// unchanged even when it is a holiday.
    fn shift_n_business_day(&self, horizon: NaiveDate, n: i32) -> NaiveDate {
        let forward = n >= 0;
        let mut m = n.unsigned_abs();
        let mut d = horizon;
        while m > 0 {
            d = if forward { d + ONE_DAY } else { d - ONE_DAY };
            m -= self.is_business_day(d) as u32;
        }
        d
    }

    fn next_business_day(&self, d: NaiveDate) -> NaiveDate {
        self.shift_n_business_day(d, 1)
    }

    fn previous_business_day(&self, d: NaiveDate) -> NaiveDate {
        self.shift_n_business_day(d, -1)
    }

    fn last_business_day_of_month(&self, year: i32, month: u32) -> NaiveDate {
        let mut eom = NaiveDate::from_ymd_opt(year, month, days_of_month(year, month))
            .unwrap_or(NaiveDate::MAX);
        while self.is_holiday(eom) {
            eom = eom - ONE_DAY;
        }
        eom
    }

    fn first_business_day_of_month(&self, year: i32, month: u32) -> NaiveDate {
        let mut fom = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
        while self.is_holiday(fom) {
            fom = fom + ONE_DAY;
        }
        fom
    }
}

impl fmt::Debug for dyn HolidayCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HolidayCalendar")
    }
}
