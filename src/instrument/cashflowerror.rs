use chrono::NaiveDate;
use thiserror::Error;

use crate::time::daycounter::daycounter::DayCounterGenerationError;
use crate::time::schedule::scheduleerror::ScheduleError;

pub type CashFlowResult<T> = Result<T, CashFlowError>;

/// Errors raised while building coupons and legs, or while projecting them to
/// a valuation date.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CashFlowError {
    // ── construction ──────────────────────────────────────────────────────
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("an annuity needs at least one payment")]
    EmptyPayments,

    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: String, found: String },

    #[error("{what} has {found} elements, expected {expected}")]
    ArrayLengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("fixing period end {end} is before its start {start}")]
    FixingPeriodEndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("accrual start {start} is not before accrual end {end}")]
    AccrualStartNotBeforeEnd { start: NaiveDate, end: NaiveDate },

    #[error("rate cut-off {cutoff} is outside [1, {periods})")]
    InvalidRateCutoff { cutoff: usize, periods: usize },

    #[error("invalid stub combination: {reason}")]
    InvalidStubCombination { reason: String },

    #[error("notional schedule has {dates} dates but {notionals} notionals")]
    NotionalDateCountMismatch { dates: usize, notionals: usize },

    #[error("notional index {index} is outside a schedule of {notionals} notionals")]
    NotionalIndexOutOfRange { index: usize, notionals: usize },

    // ── projection ────────────────────────────────────────────────────────
    #[error("payment on {payment_date} has expired at valuation date {valuation_date}")]
    PaymentExpired {
        payment_date: NaiveDate,
        valuation_date: NaiveDate,
    },

    #[error("fixing of {index} on {fixing_date} is not published yet (latest {latest:?})")]
    FixingNotPublished {
        index: String,
        fixing_date: NaiveDate,
        latest: Option<NaiveDate>,
    },

    #[error("fixing of {index} on {fixing_date} is missing although fixings up to {latest} exist")]
    FixingDataGap {
        index: String,
        fixing_date: NaiveDate,
        latest: NaiveDate,
    },

    #[error("no fixing series supplied for {index}, needed for {fixing_date}")]
    FixingSeriesMissing { index: String, fixing_date: NaiveDate },

    #[error("trimming at {date} leaves no payment")]
    EmptyAnnuity { date: NaiveDate },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    DayCount(#[from] DayCounterGenerationError),
}

impl CashFlowError {
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    #[must_use]
    pub fn length_mismatch(what: &'static str, expected: usize, found: usize) -> Self {
        Self::ArrayLengthMismatch { what, expected, found }
    }

    #[must_use]
    pub fn invalid_stub(reason: impl Into<String>) -> Self {
        Self::InvalidStubCombination {
            reason: reason.into(),
        }
    }
}
