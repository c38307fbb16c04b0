use std::fmt;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::time::period::Period;

// ─────────────────────────────────────────────────────────────────────────────
// Traits
// ─────────────────────────────────────────────────────────────────────────────

/// 分子：兩日之間的「天數」（actual、30/360、business days…）。
pub trait DayCounterNumerator: Send + Sync {
    fn days_between(&self, d1: NaiveDate, d2: NaiveDate) -> f64;
}

/// 分母：把分子的天數轉成年化比例。
///
/// `reference` 只有需要 coupon frequency 的分母（ICMA）會讀取。
pub trait DayCounterDominator: Send + Sync {
    fn year_fraction(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        numerator: &Arc<dyn DayCounterNumerator>,
        reference: Option<&AccrualReference>,
    ) -> Result<f64, DayCounterGenerationError>;

    fn requires_reference(&self) -> bool {
        false
    }
}

pub trait DayCounterNumeratorGenerator: Send + Sync {
    fn generate(
        &self,
        termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterNumerator>, DayCounterGenerationError>;
}

pub trait DayCounterDominatorGenerator: Send + Sync {
    fn generate(
        &self,
        termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterDominator>, DayCounterGenerationError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// DayCounterGenerationError
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DayCounterGenerationError {
    #[error("coupon frequency not given for the accrual period {start} to {end}")]
    FrequencyNotGiven { start: NaiveDate, end: NaiveDate },

    #[error("irregular frequency {frequency} given for ICMA actual day count dominator")]
    IrregularFrequencyForIcmaDominator { frequency: Period },

    #[error("termination date not given for day counter generation")]
    TerminationDateNotGiven,
}

// ─────────────────────────────────────────────────────────────────────────────
// AccrualReference
// ─────────────────────────────────────────────────────────────────────────────

/// Stub kind of the accrual period a fraction is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubType {
    None,
    ShortStart,
    LongStart,
    ShortEnd,
    LongEnd,
}

/// Coupon-frequency context for day counts that need it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualReference {
    frequency: Period,
    coupons_per_year: f64,
    stub: StubType,
}

impl AccrualReference {
    /// Only month/year frequencies dividing a year evenly are accepted.
    pub fn new(frequency: Period, stub: StubType) -> Result<Self, DayCounterGenerationError> {
        let coupons_per_year = match (frequency.total_months(), frequency.coupons_per_year()) {
            (Some(_), Some(c)) => c,
            _ => return Err(DayCounterGenerationError::IrregularFrequencyForIcmaDominator { frequency }),
        };
        Ok(AccrualReference {
            frequency,
            coupons_per_year,
            stub,
        })
    }

    pub fn frequency(&self) -> Period {
        self.frequency
    }

    pub fn coupons_per_year(&self) -> f64 {
        self.coupons_per_year
    }

    pub fn stub(&self) -> StubType {
        self.stub
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DayCounter
// ─────────────────────────────────────────────────────────────────────────────

/// Numerator/dominator composition.
///
/// By default the interval counts `(d1, d2]`; `include_d1` widens it by the
/// start day and `include_d2 == false` drops the end day.
#[derive(Clone)]
pub struct DayCounter {
    name: String,
    numerator: Arc<dyn DayCounterNumerator>,
    dominator: Arc<dyn DayCounterDominator>,
    shift_days1: Days,
    shift_days2: Days,
}

impl DayCounter {
    pub fn new(
        include_d1: bool,
        include_d2: bool,
        numerator: Arc<dyn DayCounterNumerator>,
        dominator: Arc<dyn DayCounterDominator>,
    ) -> DayCounter {
        DayCounter {
            name: String::new(),
            numerator,
            dominator,
            shift_days1: if include_d1 { Days::new(1) } else { Days::new(0) },
            shift_days2: if include_d2 { Days::new(0) } else { Days::new(1) },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> DayCounter {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn include_d1(&self) -> bool {
        self.shift_days1 == Days::new(1)
    }

    pub fn include_d2(&self) -> bool {
        self.shift_days2 == Days::new(0)
    }

    pub fn requires_reference(&self) -> bool {
        self.dominator.requires_reference()
    }

    pub fn numerator(&self) -> &Arc<dyn DayCounterNumerator> {
        &self.numerator
    }

    /// Fraction without coupon context; fails for day counts that need one.
    pub fn year_fraction(&self, d1: NaiveDate, d2: NaiveDate) -> Result<f64, DayCounterGenerationError> {
        self.year_fraction_with_reference(d1, d2, None)
    }

    pub fn year_fraction_with_reference(
        &self,
        d1: NaiveDate,
        d2: NaiveDate,
        reference: Option<&AccrualReference>,
    ) -> Result<f64, DayCounterGenerationError> {
        if d1 == d2 {
            Ok(0.0)
        } else if d1 > d2 {
            let start_date = d2 - self.shift_days1;
            let end_date = d1 - self.shift_days2;
            Ok(-self.dominator.year_fraction(start_date, end_date, &self.numerator, reference)?)
        } else {
            let start_date = d1 - self.shift_days1;
            let end_date = d2 - self.shift_days2;
            self.dominator.year_fraction(start_date, end_date, &self.numerator, reference)
        }
    }
}

impl fmt::Debug for DayCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DayCounter")
            .field("name", &self.name)
            .field("include_d1", &self.include_d1())
            .field("include_d2", &self.include_d2())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DayCounterGenerator
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a [`DayCounter`] once the leg termination date is known (30E/360
/// ISDA needs it).
#[derive(Clone)]
pub struct DayCounterGenerator {
    name: String,
    numerator_generator: Arc<dyn DayCounterNumeratorGenerator>,
    dominator_generator: Arc<dyn DayCounterDominatorGenerator>,
    include_d1: bool,
    include_d2: bool,
}

impl DayCounterGenerator {
    pub fn new(
        name: impl Into<String>,
        numerator_generator: Arc<dyn DayCounterNumeratorGenerator>,
        dominator_generator: Arc<dyn DayCounterDominatorGenerator>,
        include_d1: bool,
        include_d2: bool,
    ) -> DayCounterGenerator {
        DayCounterGenerator {
            name: name.into(),
            numerator_generator,
            dominator_generator,
            include_d1,
            include_d2,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generate(&self, termination_date: Option<NaiveDate>) -> Result<DayCounter, DayCounterGenerationError> {
        let numerator = self.numerator_generator.generate(termination_date)?;
        let dominator = self.dominator_generator.generate(termination_date)?;
        Ok(DayCounter::new(self.include_d1, self.include_d2, numerator, dominator).with_name(self.name.clone()))
    }
}

impl fmt::Debug for DayCounterGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DayCounterGenerator")
            .field("name", &self.name)
            .field("include_d1", &self.include_d1)
            .field("include_d2", &self.include_d2)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::daycounter::constdaycounterdominator::ConstDayCounterDominator;
    use crate::time::daycounter::numerator::actualnumerator::ActualNumerator;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn act_360(include_d1: bool, include_d2: bool) -> DayCounter {
        DayCounter::new(
            include_d1,
            include_d2,
            Arc::new(ActualNumerator),
            Arc::new(ConstDayCounterDominator::new(360.0)),
        )
    }

    #[test]
    fn test_inclusion_flags() {
        let (d1, d2) = (ymd(2024, 1, 1), ymd(2024, 1, 31));
        assert_relative_eq!(act_360(false, true).year_fraction(d1, d2).unwrap(), 30.0 / 360.0);
        assert_relative_eq!(act_360(true, true).year_fraction(d1, d2).unwrap(), 31.0 / 360.0);
        assert_relative_eq!(act_360(false, false).year_fraction(d1, d2).unwrap(), 29.0 / 360.0);
    }

    #[test]
    fn test_antisymmetry() {
        let dc = act_360(false, true);
        let (d1, d2) = (ymd(2024, 1, 1), ymd(2024, 7, 1));
        assert_relative_eq!(dc.year_fraction(d2, d1).unwrap(), -dc.year_fraction(d1, d2).unwrap());
        assert_eq!(dc.year_fraction(d1, d1).unwrap(), 0.0);
    }

    #[test]
    fn test_accrual_reference() {
        let reference = AccrualReference::new(Period::months(6), StubType::None).unwrap();
        assert_eq!(reference.coupons_per_year(), 2.0);
        assert!(matches!(
            AccrualReference::new(Period::days(7), StubType::None),
            Err(DayCounterGenerationError::IrregularFrequencyForIcmaDominator { .. })
        ));
    }
}
