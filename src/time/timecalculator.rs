use chrono::{Datelike, NaiveDate};

use crate::time::utility::is_leap;

fn days_in_year(year: i32) -> f64 {
    if is_leap(year) { 366.0 } else { 365.0 }
}

fn new_year(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Time in years from `from` to `to` on the Actual/Actual ISDA measure.
///
/// This is the clock every derivative payment time is measured on; it is
/// independent of the coupon day count. Negative when `to < from`.
pub fn time_between(from: NaiveDate, to: NaiveDate) -> f64 {
    if to < from {
        return -time_between(to, from);
    }
    let (y1, y2) = (from.year(), to.year());
    if y1 == y2 {
        return (to - from).num_days() as f64 / days_in_year(y1);
    }
    let head = (new_year(y1 + 1) - from).num_days() as f64 / days_in_year(y1);
    let tail = (to - new_year(y2)).num_days() as f64 / days_in_year(y2);
    head + (y2 - y1 - 1) as f64 + tail
}
