use std::sync::Arc;

use chrono::NaiveDate;

use crate::time::daycounter::daycounter::{
    DayCounterGenerationError, DayCounterNumerator, DayCounterNumeratorGenerator,
};

pub struct ActualNumerator;

impl DayCounterNumerator for ActualNumerator {
    #[inline]
    fn days_between(&self, d1: NaiveDate, d2: NaiveDate) -> f64 {
        (d2 - d1).num_days() as f64
    }
}

pub struct ActualNumeratorGenerator;

impl DayCounterNumeratorGenerator for ActualNumeratorGenerator {
    fn generate(
        &self,
        _termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterNumerator>, DayCounterGenerationError> {
        Ok(Arc::new(ActualNumerator))
    }
}
