use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::time::calendar::holidaycalendar::HolidayCalendar;

/// Weekend days packed into a bitmask: Mon(0) .. Sun(6).
#[derive(Clone, Copy)]
struct WeekendMask(u8);

impl WeekendMask {
    fn new(weekends: &HashSet<Weekday>) -> Self {
        let mask = weekends
            .iter()
            .fold(0u8, |mask, weekday| mask | (1u8 << weekday.num_days_from_monday()));
        WeekendMask(mask)
    }

    #[inline]
    fn is_weekend(&self, weekday: Weekday) -> bool {
        (self.0 & (1u8 << weekday.num_days_from_monday())) != 0
    }

    fn weekdays(&self) -> Vec<Weekday> {
        (0..7u8)
            .filter(|day| (self.0 & (1u8 << day)) != 0)
            .filter_map(|day| Weekday::try_from(day).ok())
            .collect()
    }
}

/// Calendar defined by a weekend mask plus explicit holiday and business-day
/// overrides. Business-day overrides win over both weekends and holidays.
pub struct SimpleCalendar {
    weekends: WeekendMask,
    additional_holidays: HashSet<NaiveDate>,
    additional_business_days: HashSet<NaiveDate>,
}

impl SimpleCalendar {
    pub fn new(
        weekends: HashSet<Weekday>,
        additional_holidays: Vec<NaiveDate>,
        additional_business_days: Vec<NaiveDate>,
    ) -> SimpleCalendar {
        SimpleCalendar {
            weekends: WeekendMask::new(&weekends),
            additional_holidays: additional_holidays.into_iter().collect(),
            additional_business_days: additional_business_days.into_iter().collect(),
        }
    }

    /// Saturday/Sunday weekends and the given holidays.
    pub fn weekends_with_holidays(additional_holidays: Vec<NaiveDate>) -> SimpleCalendar {
        SimpleCalendar::new(
            HashSet::from([Weekday::Sat, Weekday::Sun]),
            additional_holidays,
            Vec::new(),
        )
    }

    pub fn weekends_only() -> SimpleCalendar {
        SimpleCalendar::weekends_with_holidays(Vec::new())
    }

    /// Every day is a business day.
    pub fn no_holidays() -> SimpleCalendar {
        SimpleCalendar::new(HashSet::new(), Vec::new(), Vec::new())
    }

    #[inline]
    pub fn is_weekend(&self, d: NaiveDate) -> bool {
        self.weekends.is_weekend(d.weekday())
    }

    #[inline]
    pub fn is_additional_holiday(&self, d: NaiveDate) -> bool {
        self.additional_holidays.contains(&d)
    }

    #[inline]
    pub fn is_additional_business_day(&self, d: NaiveDate) -> bool {
        self.additional_business_days.contains(&d)
    }

    pub fn weekends(&self) -> HashSet<Weekday> {
        self.weekends.weekdays().into_iter().collect()
    }
}

const SEVEN_DAYS: Days = Days::new(7);

impl HolidayCalendar for SimpleCalendar {
    fn is_holiday(&self, d: NaiveDate) -> bool {
        if self.is_additional_business_day(d) {
            return false;
        }
        self.is_weekend(d) || self.is_additional_holiday(d)
    }

    /// All holidays of `year`, weekends included.
    fn get_holiday_set(&self, year: i32) -> HashSet<NaiveDate> {
        let mut holiday_set = HashSet::with_capacity(120);

        if let (Some(year_start), Some(year_end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) {
            for target_weekday in self.weekends.weekdays() {
                let offset = (7 + target_weekday.num_days_from_monday()
                    - year_start.weekday().num_days_from_monday())
                    % 7;
                let mut current = year_start + Days::new(offset as u64);
                while current <= year_end {
                    holiday_set.insert(current);
                    current = current + SEVEN_DAYS;
                }
            }
        }

        holiday_set.extend(
            self.additional_holidays
                .iter()
                .filter(|d| d.year() == year)
                .copied(),
        );

        for b_day in self.additional_business_days.iter().filter(|d| d.year() == year) {
            holiday_set.remove(b_day);
        }

        holiday_set
    }
}
