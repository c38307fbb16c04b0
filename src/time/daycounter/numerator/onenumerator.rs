use std::sync::Arc;

use chrono::NaiveDate;

use crate::time::daycounter::daycounter::{
    DayCounterGenerationError, DayCounterNumerator, DayCounterNumeratorGenerator,
};

/// 1/1: every non-empty period counts as one unit.
pub struct OneNumerator;

impl DayCounterNumerator for OneNumerator {
    #[inline]
    fn days_between(&self, _d1: NaiveDate, _d2: NaiveDate) -> f64 {
        1.0
    }
}

pub struct OneNumeratorGenerator;

impl DayCounterNumeratorGenerator for OneNumeratorGenerator {
    fn generate(
        &self,
        _termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterNumerator>, DayCounterGenerationError> {
        Ok(Arc::new(OneNumerator))
    }
}
