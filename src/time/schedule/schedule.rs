use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::time::businessdayadjuster::BusinessDayAdjuster;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::period::Period;
use crate::time::schedule::calculationperiodgenerator::CalculationPeriodGenerator;
use crate::time::schedule::scheduleerror::{ScheduleError, ScheduleResult};
use crate::time::schedule::scheduleperiod::CalculationPeriod;
use crate::time::schedule::stubadjuster::StubConvention;

// ─────────────────────────────────────────────────────────────────────────────
// AdjustedDateParameters
// ─────────────────────────────────────────────────────────────────────────────

/// Calendar plus business-day adjuster for one family of dates (accrual,
/// start, end, payment).
#[derive(Clone)]
pub struct AdjustedDateParameters {
    calendar: Arc<dyn HolidayCalendar>,
    adjuster: BusinessDayAdjuster,
}

impl AdjustedDateParameters {
    pub fn new(calendar: Arc<dyn HolidayCalendar>, adjuster: BusinessDayAdjuster) -> Self {
        AdjustedDateParameters { calendar, adjuster }
    }

    pub fn calendar(&self) -> &Arc<dyn HolidayCalendar> {
        &self.calendar
    }

    pub fn adjuster(&self) -> &BusinessDayAdjuster {
        &self.adjuster
    }

    pub fn adjust(&self, d: NaiveDate) -> NaiveDate {
        self.adjuster.adjust(d, &self.calendar)
    }
}

impl fmt::Debug for AdjustedDateParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdjustedDateParameters")
            .field("adjuster", &self.adjuster)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Schedule
// ─────────────────────────────────────────────────────────────────────────────

/// Generated accrual schedule: the unadjusted periods and their adjusted
/// counterparts, index for index.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    frequency: Period,
    stub_convention: StubConvention,
    unadjusted_periods: Vec<CalculationPeriod>,
    adjusted_periods: Vec<CalculationPeriod>,
}

impl Schedule {
    pub fn frequency(&self) -> Period {
        self.frequency
    }

    pub fn stub_convention(&self) -> StubConvention {
        self.stub_convention
    }

    pub fn unadjusted_periods(&self) -> &[CalculationPeriod] {
        &self.unadjusted_periods
    }

    pub fn adjusted_periods(&self) -> &[CalculationPeriod] {
        &self.adjusted_periods
    }

    pub fn len(&self) -> usize {
        self.adjusted_periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjusted_periods.is_empty()
    }

    pub fn unadjusted_end_dates(&self) -> Vec<NaiveDate> {
        self.unadjusted_periods.iter().map(|p| p.end_date()).collect()
    }

    pub fn adjusted_end_dates(&self) -> Vec<NaiveDate> {
        self.adjusted_periods.iter().map(|p| p.end_date()).collect()
    }

    pub fn adjusted_start_dates(&self) -> Vec<NaiveDate> {
        self.adjusted_periods.iter().map(|p| p.start_date()).collect()
    }

    /// Adjusted start of the first period.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.adjusted_periods.first().map(|p| p.start_date())
    }

    /// Adjusted end of the last period.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.adjusted_periods.last().map(|p| p.end_date())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScheduleGenerator
// ─────────────────────────────────────────────────────────────────────────────

/// Generates a period schedule and adjusts every boundary independently.
///
/// The first start date uses the start parameters and the last end date uses
/// the end parameters when given; every other boundary uses the accrual
/// parameters.
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    calculation_period_generator: CalculationPeriodGenerator,
    accrual_parameters: AdjustedDateParameters,
    start_parameters: Option<AdjustedDateParameters>,
    end_parameters: Option<AdjustedDateParameters>,
}

impl ScheduleGenerator {
    pub fn new(
        calculation_period_generator: CalculationPeriodGenerator,
        accrual_parameters: AdjustedDateParameters,
    ) -> ScheduleGenerator {
        ScheduleGenerator {
            calculation_period_generator,
            accrual_parameters,
            start_parameters: None,
            end_parameters: None,
        }
    }

    pub fn with_start_parameters(mut self, parameters: Option<AdjustedDateParameters>) -> Self {
        self.start_parameters = parameters;
        self
    }

    pub fn with_end_parameters(mut self, parameters: Option<AdjustedDateParameters>) -> Self {
        self.end_parameters = parameters;
        self
    }

    pub fn calculation_period_generator(&self) -> &CalculationPeriodGenerator {
        &self.calculation_period_generator
    }

    pub fn accrual_parameters(&self) -> &AdjustedDateParameters {
        &self.accrual_parameters
    }

    pub fn start_parameters(&self) -> &AdjustedDateParameters {
        self.start_parameters.as_ref().unwrap_or(&self.accrual_parameters)
    }

    pub fn end_parameters(&self) -> &AdjustedDateParameters {
        self.end_parameters.as_ref().unwrap_or(&self.accrual_parameters)
    }

    pub fn generate(&self, start: NaiveDate, end: NaiveDate) -> ScheduleResult<Schedule> {
        let unadjusted = self.calculation_period_generator.generate(start, end)?;
        self.adjust(start, end, unadjusted)
    }

    pub fn generate_with_stub_dates(
        &self,
        start: NaiveDate,
        first_regular_start: NaiveDate,
        last_regular_end: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<Schedule> {
        let unadjusted = self.calculation_period_generator.generate_with_stub_dates(
            start,
            first_regular_start,
            last_regular_end,
            end,
        )?;
        self.adjust(start, end, unadjusted)
    }

    pub fn generate_with_first_regular_start(
        &self,
        start: NaiveDate,
        first_regular_start: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<Schedule> {
        let unadjusted = self
            .calculation_period_generator
            .generate_with_first_regular_start(start, first_regular_start, end)?;
        self.adjust(start, end, unadjusted)
    }

    pub fn generate_with_last_regular_end(
        &self,
        start: NaiveDate,
        last_regular_end: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<Schedule> {
        let unadjusted = self
            .calculation_period_generator
            .generate_with_last_regular_end(start, last_regular_end, end)?;
        self.adjust(start, end, unadjusted)
    }

    fn adjust(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        unadjusted: Vec<CalculationPeriod>,
    ) -> ScheduleResult<Schedule> {
        if unadjusted.is_empty() {
            return Err(ScheduleError::EmptySchedule { start, end });
        }
        let n = unadjusted.len();
        let mut boundaries = Vec::with_capacity(n + 1);
        boundaries.push(self.start_parameters().adjust(unadjusted[0].start_date()));
        for (i, period) in unadjusted.iter().enumerate() {
            let parameters = if i + 1 == n {
                self.end_parameters()
            } else {
                &self.accrual_parameters
            };
            boundaries.push(parameters.adjust(period.end_date()));
        }

        for pair in boundaries.windows(2) {
            if pair[0] >= pair[1] {
                return Err(ScheduleError::non_monotonic(pair[0], pair[1]));
            }
        }

        let adjusted_periods = unadjusted
            .iter()
            .zip(boundaries.windows(2))
            .map(|(period, pair)| period.with_dates(pair[0], pair[1]))
            .collect();

        Ok(Schedule {
            frequency: self.calculation_period_generator.frequency(),
            stub_convention: self.calculation_period_generator.stub_convention(),
            unadjusted_periods: unadjusted,
            adjusted_periods,
        })
    }
}
