use std::fmt;
use std::num::ParseIntError;
use std::ops::{Add, Mul, Sub};

use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;

use crate::time::utility::days_of_month;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub fn to_char(&self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePeriodError {
    #[error("empty period string")]
    Empty,
    #[error("unknown time unit '{0}' found")]
    UnknownTimeUnit(char),
    #[error("invalid period multiplier: {0}")]
    Parse(#[from] ParseIntError),
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Period {
    number: i32,
    unit: TimeUnit,
}

impl Period {
    pub const fn new(number: i32, unit: TimeUnit) -> Period {
        Period { number, unit }
    }

    pub const fn days(number: i32) -> Period {
        Period::new(number, TimeUnit::Days)
    }

    pub const fn weeks(number: i32) -> Period {
        Period::new(number, TimeUnit::Weeks)
    }

    pub const fn months(number: i32) -> Period {
        Period::new(number, TimeUnit::Months)
    }

    pub const fn years(number: i32) -> Period {
        Period::new(number, TimeUnit::Years)
    }

    /// The zero-length period, used as the frequency of zero-coupon legs.
    pub const fn zero() -> Period {
        Period::days(0)
    }

    /// Parses strings such as `"3M"`, `"1Y"`, `"0D"`.
    pub fn parse(period_str: &str) -> Result<Period, ParsePeriodError> {
        let trimmed = period_str.trim();
        let unit_chr = trimmed.chars().last().ok_or(ParsePeriodError::Empty)?;
        let number = trimmed[..trimmed.len() - unit_chr.len_utf8()].parse::<i32>()?;
        match unit_chr.to_ascii_uppercase() {
            'D' => Ok(Period::days(number)),
            'W' => Ok(Period::weeks(number)),
            'M' => Ok(Period::months(number)),
            'Y' => Ok(Period::years(number)),
            _ => Err(ParsePeriodError::UnknownTimeUnit(unit_chr)),
        }
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn is_zero(&self) -> bool {
        self.number == 0
    }

    /// Length in months for month/year based periods.
    pub fn total_months(&self) -> Option<i32> {
        match self.unit {
            TimeUnit::Months => Some(self.number),
            TimeUnit::Years => Some(12 * self.number),
            _ => None,
        }
    }

    /// Number of periods per year (4.0 for `3M`). `None` when the period does
    /// not divide a year into a whole number of coupons or is a day/week period
    /// that is not a whole fraction of 52 weeks.
    pub fn coupons_per_year(&self) -> Option<f64> {
        if self.number <= 0 {
            return None;
        }
        match self.unit {
            TimeUnit::Months | TimeUnit::Years => {
                let months = self.total_months()?;
                if 12 % months == 0 {
                    Some((12 / months) as f64)
                } else {
                    None
                }
            }
            TimeUnit::Weeks => {
                if 52 % self.number == 0 {
                    Some((52 / self.number) as f64)
                } else {
                    None
                }
            }
            TimeUnit::Days => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.number, self.unit.to_char())
    }
}

impl Mul<i32> for Period {
    type Output = Period;

    fn mul(self, k: i32) -> Period {
        Period::new(self.number * k, self.unit)
    }
}

fn shift_months(horizon: NaiveDate, number: i32) -> NaiveDate {
    let total = horizon.month0() as i32 + number;
    let new_year = horizon.year() + total.div_euclid(12);
    let new_month = total.rem_euclid(12) as u32 + 1;
    let day = days_of_month(new_year, new_month).min(horizon.day());
    NaiveDate::from_ymd_opt(new_year, new_month, day).unwrap_or(horizon)
}

impl Add<Period> for NaiveDate {
    type Output = Self;

    fn add(self, period: Period) -> Self {
        match period.unit {
            TimeUnit::Days => self + Duration::days(period.number as i64),
            TimeUnit::Weeks => self + Duration::days(7 * period.number as i64),
            TimeUnit::Months => shift_months(self, period.number),
            TimeUnit::Years => shift_months(self, 12 * period.number),
        }
    }
}

impl Sub<Period> for NaiveDate {
    type Output = Self;

    fn sub(self, period: Period) -> Self {
        self + Period::new(-period.number, period.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(Period::parse("3M").unwrap(), Period::months(3));
        assert_eq!(Period::parse("10y").unwrap(), Period::years(10));
        assert_eq!(Period::parse("0D").unwrap(), Period::zero());
        assert!(matches!(Period::parse("3Q"), Err(ParsePeriodError::UnknownTimeUnit('Q'))));
        assert!(matches!(Period::parse(""), Err(ParsePeriodError::Empty)));
        assert!(matches!(Period::parse("xM"), Err(ParsePeriodError::Parse(_))));
    }

    #[test]
    fn test_month_arithmetic_clamps_to_month_end() {
        assert_eq!(ymd(2024, 1, 31) + Period::months(1), ymd(2024, 2, 29));
        assert_eq!(ymd(2024, 2, 29) + Period::years(1), ymd(2025, 2, 28));
        assert_eq!(ymd(2024, 3, 31) - Period::months(1), ymd(2024, 2, 29));
        assert_eq!(ymd(2024, 1, 1) + Period::weeks(2), ymd(2024, 1, 15));
    }

    #[test]
    fn test_coupons_per_year() {
        assert_eq!(Period::months(3).coupons_per_year(), Some(4.0));
        assert_eq!(Period::years(1).coupons_per_year(), Some(1.0));
        assert_eq!(Period::months(5).coupons_per_year(), None);
        assert_eq!(Period::zero().coupons_per_year(), None);
        assert_eq!(Period::months(6).to_string(), "6M");
    }
}
