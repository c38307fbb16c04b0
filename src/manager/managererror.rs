use serde::Deserialize;
use thiserror::Error;

use crate::time::daycounter::daycounter::DayCounterGenerationError;
use crate::time::period::{ParsePeriodError, Period};
use crate::time::schedule::scheduleerror::ScheduleError;

pub type ManagerResult<T> = Result<T, ManagerError>;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),

    #[error("key '{0}' not found")]
    NameNotFoundError(String),

    #[error("failed to parse tenor '{tenor}': {source}")]
    TenorParseError {
        tenor: String,
        #[source]
        source: ParsePeriodError,
    },

    #[error(transparent)]
    DayCounterGenerationError(#[from] DayCounterGenerationError),

    #[error(transparent)]
    ScheduleError(#[from] ScheduleError),

    #[error("'{name}' is invalid: {reason}")]
    InvalidObject { name: String, reason: String },
}

impl ManagerError {
    #[must_use]
    pub fn name_not_found(name: &str) -> Self {
        Self::NameNotFoundError(name.to_owned())
    }

    #[must_use]
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidObject {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Deserializes `json_value` into `T`, mapping failures to
/// [`ManagerError::JsonParseError`].
pub fn parse_json_value<T>(json_value: serde_json::Value) -> ManagerResult<T>
where
    T: for<'a> Deserialize<'a>,
{
    Ok(serde_json::from_value(json_value)?)
}

/// Parses a tenor string such as `"3M"`.
pub fn parse_tenor(tenor: &str) -> ManagerResult<Period> {
    Period::parse(tenor).map_err(|source| ManagerError::TenorParseError {
        tenor: tenor.to_owned(),
        source,
    })
}
