use chrono::{Datelike, NaiveDate};

#[inline]
pub const fn is_leap(year: i32) -> bool {
    ((year % 4 == 0) && (year % 100 != 0)) || (year % 400 == 0)
}

pub const fn days_of_month(year: i32, month: u32) -> u32 {
    const NO_LEAP_EOM: [u32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    const LEAP_EOM: [u32; 13] = [0, 31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    if is_leap(year) {
        LEAP_EOM[month as usize]
    } else {
        NO_LEAP_EOM[month as usize]
    }
}

/// 是否為該月最後一個日曆日（不考慮假日）。
#[inline]
pub fn is_end_of_month(d: NaiveDate) -> bool {
    d.day() == days_of_month(d.year(), d.month())
}

/// 回傳同月份的最後一個日曆日。
pub fn end_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(days_of_month(d.year(), d.month())).unwrap_or(d)
}

/// Same month, day clamped to the month length.
pub fn with_day_clamped(d: NaiveDate, day: u32) -> NaiveDate {
    let last = days_of_month(d.year(), d.month());
    d.with_day(day.clamp(1, last)).unwrap_or(d)
}

#[inline]
pub fn leap_years_before(year: i32) -> i32 {
    let pre_year = year - 1;
    pre_year.div_euclid(4) - pre_year.div_euclid(100) + pre_year.div_euclid(400)
}

#[inline]
pub fn leap_years_between(start_year: i32, end_year: i32) -> i32 {
    if end_year <= start_year {
        0
    } else {
        leap_years_before(end_year) - leap_years_before(start_year + 1)
    }
}
