use chrono::NaiveDate;

use crate::time::daycounter::daycounter::{AccrualReference, DayCounter, DayCounterGenerationError, StubType};
use crate::time::period::Period;
use crate::time::schedule::stubadjuster::StubConvention;

/// Day-count fraction of one accrual period of a leg, with the stub context
/// ICMA-style day counts need.
///
/// Day counts that need no context ignore the frequency and the stub
/// conventions entirely.
#[derive(Debug, Clone)]
pub struct AccrualFractionResolver {
    day_counter: DayCounter,
    frequency: Option<Period>,
    start_stub: StubConvention,
    end_stub: StubConvention,
}

impl AccrualFractionResolver {
    pub fn new(
        day_counter: DayCounter,
        frequency: Option<Period>,
        start_stub: StubConvention,
        end_stub: StubConvention,
    ) -> AccrualFractionResolver {
        AccrualFractionResolver {
            day_counter,
            frequency: frequency.filter(|f| !f.is_zero()),
            start_stub,
            end_stub,
        }
    }

    /// Resolver without stub context (regular periods only).
    pub fn regular(day_counter: DayCounter, frequency: Option<Period>) -> AccrualFractionResolver {
        AccrualFractionResolver::new(day_counter, frequency, StubConvention::None, StubConvention::None)
    }

    pub fn day_counter(&self) -> &DayCounter {
        &self.day_counter
    }

    pub fn frequency(&self) -> Option<Period> {
        self.frequency
    }

    fn stub_type(&self, frequency: Period, start: NaiveDate, end: NaiveDate, is_first: bool, is_last: bool) -> StubType {
        let short_if_fits = start + frequency >= end;
        if is_first {
            match self.start_stub {
                StubConvention::ShortStart => return StubType::ShortStart,
                StubConvention::LongStart => return StubType::LongStart,
                StubConvention::Both if short_if_fits => return StubType::ShortStart,
                StubConvention::Both => return StubType::LongStart,
                _ => {}
            }
        }
        if is_last {
            match self.end_stub {
                StubConvention::ShortEnd => return StubType::ShortEnd,
                StubConvention::LongEnd => return StubType::LongEnd,
                StubConvention::Both if short_if_fits => return StubType::ShortEnd,
                StubConvention::Both => return StubType::LongEnd,
                _ => {}
            }
        }
        StubType::None
    }

    pub fn fraction(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        is_first: bool,
        is_last: bool,
    ) -> Result<f64, DayCounterGenerationError> {
        if !self.day_counter.requires_reference() {
            return self.day_counter.year_fraction(start, end);
        }
        let frequency = self
            .frequency
            .ok_or(DayCounterGenerationError::FrequencyNotGiven { start, end })?;
        let reference = AccrualReference::new(frequency, self.stub_type(frequency, start, end, is_first, is_last))?;
        self.day_counter.year_fraction_with_reference(start, end, Some(&reference))
    }
}
