use chrono::NaiveDate;
use thiserror::Error;

use crate::time::period::Period;

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Degenerate or inconsistent schedule input. Every variant carries the dates
/// that triggered it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("schedule start {start} is not before end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("frequency {frequency} cannot generate a periodic schedule from {start} to {end}")]
    NonPositiveFrequency {
        start: NaiveDate,
        end: NaiveDate,
        frequency: Period,
    },

    #[error("frequency {frequency} is longer than {start} to {end} and no stub convention was given")]
    FrequencyLongerThanPeriod {
        start: NaiveDate,
        end: NaiveDate,
        frequency: Period,
    },

    #[error("stub convention Both needs explicit stub dates for {start} to {end}")]
    MissingStubDates { start: NaiveDate, end: NaiveDate },

    #[error(
        "explicit stub dates {first_regular_start} and {last_regular_end} must lie strictly inside {start} to {end} in order"
    )]
    InvalidStubDates {
        start: NaiveDate,
        first_regular_start: NaiveDate,
        last_regular_end: NaiveDate,
        end: NaiveDate,
    },

    #[error("schedule is not strictly increasing: {previous} followed by {current}")]
    NonMonotonicSchedule { previous: NaiveDate, current: NaiveDate },

    #[error("generated schedule from {start} to {end} is empty")]
    EmptySchedule { start: NaiveDate, end: NaiveDate },
}

impl ScheduleError {
    #[must_use]
    pub fn invalid_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::InvalidDateRange { start, end }
    }

    #[must_use]
    pub fn non_monotonic(previous: NaiveDate, current: NaiveDate) -> Self {
        Self::NonMonotonicSchedule { previous, current }
    }
}
