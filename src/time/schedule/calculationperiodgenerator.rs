use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use log::trace;

use crate::time::period::Period;
use crate::time::rolldateadjuster::RollDateAdjuster;
use crate::time::schedule::generationdirection::GenerationDirection;
use crate::time::schedule::scheduleerror::{ScheduleError, ScheduleResult};
use crate::time::schedule::scheduleperiod::CalculationPeriod;
use crate::time::schedule::stubadjuster::{StubAdjuster, StubConvention};
use crate::time::utility::{end_of_month, is_end_of_month};

/// Generates unadjusted calculation periods between two dates.
///
/// Dates are always `anchor ± k × frequency` from the anchor (never chained),
/// so a 31st-of-month anchor keeps rolling on the 31st where the month allows.
#[derive(Clone)]
pub struct CalculationPeriodGenerator {
    frequency: Period,
    eom: bool,
    stub_adjuster: StubAdjuster,
    roll_date_adjuster: Option<Arc<dyn RollDateAdjuster>>,
}

impl CalculationPeriodGenerator {
    pub fn new(
        frequency: Period,
        stub_convention: StubConvention,
        eom: bool,
        roll_date_adjuster: Option<Arc<dyn RollDateAdjuster>>,
    ) -> CalculationPeriodGenerator {
        CalculationPeriodGenerator {
            frequency,
            eom,
            stub_adjuster: StubAdjuster::new(stub_convention),
            roll_date_adjuster,
        }
    }

    pub fn frequency(&self) -> Period {
        self.frequency
    }

    pub fn eom(&self) -> bool {
        self.eom
    }

    pub fn stub_convention(&self) -> StubConvention {
        self.stub_adjuster.convention()
    }

    pub fn roll_date_adjuster(&self) -> Option<&Arc<dyn RollDateAdjuster>> {
        self.roll_date_adjuster.as_ref()
    }

    /// The k-th unadjusted date stepped from `anchor`, with the EOM rule and the
    /// roll adjuster applied.
    fn step(&self, anchor: NaiveDate, k: i32) -> NaiveDate {
        let d = anchor + self.frequency * k;
        let d = if self.eom && self.frequency.total_months().is_some() && is_end_of_month(anchor) {
            end_of_month(d)
        } else {
            d
        };
        match &self.roll_date_adjuster {
            Some(roll) => roll.adjust(d),
            None => d,
        }
    }

    fn check_inputs(&self, start: NaiveDate, end: NaiveDate) -> ScheduleResult<()> {
        if start >= end {
            return Err(ScheduleError::invalid_range(start, end));
        }
        if self.frequency.number() <= 0 {
            return Err(ScheduleError::NonPositiveFrequency {
                start,
                end,
                frequency: self.frequency,
            });
        }
        Ok(())
    }

    /// Periods from `start` to `end` with at most one stub, placed according to
    /// the stub convention. `Both` needs [`generate_with_stub_dates`].
    ///
    /// [`generate_with_stub_dates`]: CalculationPeriodGenerator::generate_with_stub_dates
    pub fn generate(&self, start: NaiveDate, end: NaiveDate) -> ScheduleResult<Vec<CalculationPeriod>> {
        self.check_inputs(start, end)?;
        let convention = self.stub_convention();
        if convention == StubConvention::Both {
            return Err(ScheduleError::MissingStubDates { start, end });
        }

        let periods = match convention.direction() {
            GenerationDirection::Forward => self.generate_forward(start, end)?,
            GenerationDirection::Backward => self.generate_backward(start, end)?,
        };

        if convention == StubConvention::None && periods.len() == 1 && periods[0].is_stub() {
            return Err(ScheduleError::FrequencyLongerThanPeriod {
                start,
                end,
                frequency: self.frequency,
            });
        }

        let periods = self.stub_adjuster.adjust(periods);
        trace!(
            "generated {} periods from {} to {} ({}, {:?})",
            periods.len(),
            start,
            end,
            self.frequency,
            convention
        );
        Ok(periods)
    }

    /// `Both` stubs: `[start, first_regular_start]` and `[last_regular_end, end]`
    /// are explicit stubs, the middle is stepped forward from
    /// `first_regular_start`.
    pub fn generate_with_stub_dates(
        &self,
        start: NaiveDate,
        first_regular_start: NaiveDate,
        last_regular_end: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<Vec<CalculationPeriod>> {
        self.check_inputs(start, end)?;
        if !(start < first_regular_start && first_regular_start < last_regular_end && last_regular_end < end) {
            return Err(ScheduleError::InvalidStubDates {
                start,
                first_regular_start,
                last_regular_end,
                end,
            });
        }

        let mut periods = Vec::new();
        periods.push(CalculationPeriod::stub(
            start,
            first_regular_start,
            self.step(first_regular_start, -1),
            first_regular_start,
        ));
        periods.extend(self.generate_forward(first_regular_start, last_regular_end)?);
        periods.push(CalculationPeriod::stub(
            last_regular_end,
            end,
            last_regular_end,
            self.step(last_regular_end, 1),
        ));
        trace!(
            "generated {} periods from {} to {} with explicit stubs",
            periods.len(),
            start,
            end
        );
        Ok(periods)
    }

    /// One explicit start stub `[start, first_regular_start]`; the rest is
    /// stepped forward from `first_regular_start`.
    pub fn generate_with_first_regular_start(
        &self,
        start: NaiveDate,
        first_regular_start: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<Vec<CalculationPeriod>> {
        self.check_inputs(start, end)?;
        if !(start < first_regular_start && first_regular_start < end) {
            return Err(ScheduleError::InvalidStubDates {
                start,
                first_regular_start,
                last_regular_end: end,
                end,
            });
        }
        let mut periods = vec![CalculationPeriod::stub(
            start,
            first_regular_start,
            self.step(first_regular_start, -1),
            first_regular_start,
        )];
        periods.extend(self.generate_forward(first_regular_start, end)?);
        Ok(periods)
    }

    /// One explicit end stub `[last_regular_end, end]`; the rest is stepped
    /// backward from `last_regular_end`.
    pub fn generate_with_last_regular_end(
        &self,
        start: NaiveDate,
        last_regular_end: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<Vec<CalculationPeriod>> {
        self.check_inputs(start, end)?;
        if !(start < last_regular_end && last_regular_end < end) {
            return Err(ScheduleError::InvalidStubDates {
                start,
                first_regular_start: start,
                last_regular_end,
                end,
            });
        }
        let mut periods = self.generate_backward(start, last_regular_end)?;
        periods.push(CalculationPeriod::stub(
            last_regular_end,
            end,
            last_regular_end,
            self.step(last_regular_end, 1),
        ));
        Ok(periods)
    }

    fn generate_forward(&self, start: NaiveDate, end: NaiveDate) -> ScheduleResult<Vec<CalculationPeriod>> {
        let mut periods = Vec::new();
        let mut previous = start;
        let mut k = 1;
        loop {
            let d = self.step(start, k);
            if d >= end {
                periods.push(if d == end {
                    CalculationPeriod::regular(previous, end)
                } else {
                    CalculationPeriod::stub(previous, end, previous, d)
                });
                break;
            }
            if d <= previous {
                return Err(ScheduleError::non_monotonic(previous, d));
            }
            periods.push(CalculationPeriod::regular(previous, d));
            previous = d;
            k += 1;
        }
        Ok(periods)
    }

    fn generate_backward(&self, start: NaiveDate, end: NaiveDate) -> ScheduleResult<Vec<CalculationPeriod>> {
        let mut periods = Vec::new();
        let mut next = end;
        let mut k = 1;
        loop {
            let d = self.step(end, -k);
            if d <= start {
                periods.push(if d == start {
                    CalculationPeriod::regular(start, next)
                } else {
                    CalculationPeriod::stub(start, next, d, next)
                });
                break;
            }
            if d >= next {
                return Err(ScheduleError::non_monotonic(d, next));
            }
            periods.push(CalculationPeriod::regular(d, next));
            next = d;
            k += 1;
        }
        periods.reverse();
        Ok(periods)
    }
}

impl fmt::Debug for CalculationPeriodGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculationPeriodGenerator")
            .field("frequency", &self.frequency)
            .field("stub_convention", &self.stub_convention())
            .field("eom", &self.eom)
            .field("roll_date_adjuster", &self.roll_date_adjuster.as_ref().map(|r| r.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::rolldateadjuster::ImmRollDateAdjuster;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generator(frequency: Period, stub: StubConvention) -> CalculationPeriodGenerator {
        CalculationPeriodGenerator::new(frequency, stub, false, None)
    }

    #[test]
    fn test_exact_division_has_no_stub() {
        let periods = generator(Period::months(3), StubConvention::ShortStart)
            .generate(ymd(2020, 1, 15), ymd(2021, 1, 15))
            .unwrap();
        assert_eq!(periods.len(), 4);
        assert!(periods.iter().all(|p| !p.is_stub()));
        assert_eq!(periods[0].end_date(), ymd(2020, 4, 15));
        assert_eq!(periods[3].end_date(), ymd(2021, 1, 15));
    }

    #[test]
    fn test_short_start_stub() {
        let periods = generator(Period::months(3), StubConvention::ShortStart)
            .generate(ymd(2020, 2, 10), ymd(2021, 1, 15))
            .unwrap();
        assert_eq!(periods.len(), 4);
        assert!(periods[0].is_stub());
        assert_eq!(periods[0].start_date(), ymd(2020, 2, 10));
        assert_eq!(periods[0].end_date(), ymd(2020, 4, 15));
        assert_eq!(periods[0].regular_start_date(), ymd(2020, 1, 15));
        for p in &periods[1..] {
            assert_eq!(p.start_date() + Period::months(3), p.end_date());
        }
    }

    #[test]
    fn test_long_start_stub() {
        let periods = generator(Period::months(3), StubConvention::LongStart)
            .generate(ymd(2020, 2, 10), ymd(2021, 1, 15))
            .unwrap();
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].start_date(), ymd(2020, 2, 10));
        assert_eq!(periods[0].end_date(), ymd(2020, 7, 15));
    }

    #[test]
    fn test_end_stubs() {
        let short = generator(Period::months(6), StubConvention::ShortEnd)
            .generate(ymd(2020, 1, 15), ymd(2021, 3, 1))
            .unwrap();
        assert_eq!(short.len(), 3);
        assert_eq!(short[2].start_date(), ymd(2021, 1, 15));
        assert_eq!(short[2].regular_end_date(), ymd(2021, 7, 15));

        let long = generator(Period::months(6), StubConvention::LongEnd)
            .generate(ymd(2020, 1, 15), ymd(2021, 3, 1))
            .unwrap();
        assert_eq!(long.len(), 2);
        assert_eq!(long[1].start_date(), ymd(2020, 7, 15));
        assert_eq!(long[1].end_date(), ymd(2021, 3, 1));
    }

    #[test]
    fn test_eom_rule() {
        let with_eom = CalculationPeriodGenerator::new(Period::months(1), StubConvention::ShortEnd, true, None)
            .generate(ymd(2024, 2, 29), ymd(2024, 5, 31))
            .unwrap();
        let ends: Vec<NaiveDate> = with_eom.iter().map(|p| p.end_date()).collect();
        assert_eq!(ends, vec![ymd(2024, 3, 31), ymd(2024, 4, 30), ymd(2024, 5, 31)]);

        let without_eom = generator(Period::months(1), StubConvention::ShortEnd)
            .generate(ymd(2024, 2, 29), ymd(2024, 5, 31))
            .unwrap();
        assert_eq!(without_eom[0].end_date(), ymd(2024, 3, 29));
        assert!(without_eom.last().unwrap().is_stub());
    }

    #[test]
    fn test_roll_adjuster_moves_intermediate_dates() {
        let generator = CalculationPeriodGenerator::new(
            Period::months(3),
            StubConvention::ShortEnd,
            false,
            Some(Arc::new(ImmRollDateAdjuster)),
        );
        let periods = generator.generate(ymd(2024, 3, 20), ymd(2024, 12, 18)).unwrap();
        let ends: Vec<NaiveDate> = periods.iter().map(|p| p.end_date()).collect();
        assert_eq!(ends, vec![ymd(2024, 6, 19), ymd(2024, 9, 18), ymd(2024, 12, 18)]);
    }

    #[test]
    fn test_degenerate_inputs_fail() {
        let g = generator(Period::months(3), StubConvention::None);
        assert!(matches!(
            g.generate(ymd(2024, 1, 1), ymd(2024, 1, 1)),
            Err(ScheduleError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            g.generate(ymd(2024, 1, 1), ymd(2024, 2, 1)),
            Err(ScheduleError::FrequencyLongerThanPeriod { .. })
        ));
        assert!(matches!(
            generator(Period::zero(), StubConvention::ShortStart).generate(ymd(2024, 1, 1), ymd(2025, 1, 1)),
            Err(ScheduleError::NonPositiveFrequency { .. })
        ));
        assert!(matches!(
            generator(Period::months(3), StubConvention::Both).generate(ymd(2024, 1, 1), ymd(2025, 1, 1)),
            Err(ScheduleError::MissingStubDates { .. })
        ));
    }

    #[test]
    fn test_frequency_longer_than_period_with_stub_convention_gives_single_stub() {
        let periods = generator(Period::months(3), StubConvention::ShortStart)
            .generate(ymd(2024, 1, 1), ymd(2024, 2, 1))
            .unwrap();
        assert_eq!(periods.len(), 1);
        assert!(periods[0].is_stub());
    }

    #[test]
    fn test_single_explicit_stub_dates() {
        let g = generator(Period::months(3), StubConvention::ShortStart);
        let periods = g
            .generate_with_first_regular_start(ymd(2024, 1, 10), ymd(2024, 3, 15), ymd(2024, 9, 15))
            .unwrap();
        assert_eq!(periods.len(), 3);
        assert!(periods[0].is_stub());
        assert_eq!(periods[0].end_date(), ymd(2024, 3, 15));
        assert_eq!(periods[1].end_date(), ymd(2024, 6, 15));

        let periods = g
            .generate_with_last_regular_end(ymd(2024, 3, 15), ymd(2024, 9, 15), ymd(2024, 10, 1))
            .unwrap();
        assert_eq!(periods.len(), 3);
        assert!(periods[2].is_stub());
        assert_eq!(periods[2].start_date(), ymd(2024, 9, 15));

        assert!(matches!(
            g.generate_with_last_regular_end(ymd(2024, 3, 15), ymd(2024, 10, 1), ymd(2024, 10, 1)),
            Err(ScheduleError::InvalidStubDates { .. })
        ));
    }

    #[test]
    fn test_both_stubs() {
        let periods = generator(Period::months(3), StubConvention::Both)
            .generate_with_stub_dates(ymd(2024, 1, 10), ymd(2024, 2, 15), ymd(2024, 8, 15), ymd(2024, 9, 1))
            .unwrap();
        assert_eq!(periods.len(), 4);
        assert!(periods[0].is_stub());
        assert!(periods[3].is_stub());
        assert_eq!(periods[1].start_date(), ymd(2024, 2, 15));
        assert_eq!(periods[2].end_date(), ymd(2024, 8, 15));

        assert!(matches!(
            generator(Period::months(3), StubConvention::Both)
                .generate_with_stub_dates(ymd(2024, 1, 10), ymd(2024, 9, 15), ymd(2024, 8, 15), ymd(2024, 9, 1)),
            Err(ScheduleError::InvalidStubDates { .. })
        ));
    }
}
