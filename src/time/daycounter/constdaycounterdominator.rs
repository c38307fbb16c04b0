use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use super::daycounter::{
    AccrualReference, DayCounterDominator, DayCounterDominatorGenerator, DayCounterGenerationError,
    DayCounterNumerator,
};

pub struct ConstDayCounterDominator {
    dominator_value: f64,
}

impl ConstDayCounterDominator {
    pub fn new(dominator_value: f64) -> ConstDayCounterDominator {
        ConstDayCounterDominator { dominator_value }
    }

    pub fn dominator_value(&self) -> f64 {
        self.dominator_value
    }
}

impl DayCounterDominator for ConstDayCounterDominator {
    #[inline]
    fn year_fraction(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        numerator: &Arc<dyn DayCounterNumerator>,
        _reference: Option<&AccrualReference>,
    ) -> Result<f64, DayCounterGenerationError> {
        Ok(numerator.days_between(start_date, end_date) / self.dominator_value)
    }
}

#[derive(Deserialize)]
pub struct ConstDayCounterDominatorGenerator {
    dominator_value: f64,
}

impl ConstDayCounterDominatorGenerator {
    pub fn new(dominator_value: f64) -> ConstDayCounterDominatorGenerator {
        ConstDayCounterDominatorGenerator { dominator_value }
    }

    pub fn dominator_value(&self) -> f64 {
        self.dominator_value
    }
}

impl DayCounterDominatorGenerator for ConstDayCounterDominatorGenerator {
    fn generate(
        &self,
        _termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterDominator>, DayCounterGenerationError> {
        Ok(Arc::new(ConstDayCounterDominator::new(self.dominator_value)))
    }
}
