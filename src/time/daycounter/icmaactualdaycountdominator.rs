use std::sync::Arc;

use chrono::NaiveDate;

use super::daycounter::{
    AccrualReference, DayCounterDominator, DayCounterDominatorGenerator, DayCounterGenerationError,
    DayCounterNumerator, StubType,
};
use crate::time::period::Period;

// ─────────────────────────────────────────────────────────────────────────────
// IcmaActualDayCounterDominator
// ─────────────────────────────────────────────────────────────────────────────
//
// 分母為「notional period」的實際天數 × 每年 coupon 數。
// notional period 由 frequency 從 regular 的那一端往回／往前推：
//
//   None       : [start, start + f]
//   ShortStart : [end - f, end]
//   LongStart  : [end - 2f, end - f] + [end - f, end]
//   ShortEnd   : [start, start + f]
//   LongEnd    : [start, start + f] + [start + f, start + 2f]
//
// long stub 拆成兩段，各自除以自己的 notional period 長度。

pub struct IcmaActualDayCounterDominator;

fn fraction_of(
    numerator: &Arc<dyn DayCounterNumerator>,
    d1: NaiveDate,
    d2: NaiveDate,
    notional_start: NaiveDate,
    notional_end: NaiveDate,
    coupons_per_year: f64,
) -> f64 {
    numerator.days_between(d1, d2) / (coupons_per_year * numerator.days_between(notional_start, notional_end))
}

impl DayCounterDominator for IcmaActualDayCounterDominator {
    fn year_fraction(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        numerator: &Arc<dyn DayCounterNumerator>,
        reference: Option<&AccrualReference>,
    ) -> Result<f64, DayCounterGenerationError> {
        let reference = reference.ok_or(DayCounterGenerationError::FrequencyNotGiven {
            start: start_date,
            end: end_date,
        })?;
        let f: Period = reference.frequency();
        let c = reference.coupons_per_year();

        let result = match reference.stub() {
            StubType::None | StubType::ShortEnd => {
                fraction_of(numerator, start_date, end_date, start_date, start_date + f, c)
            }
            StubType::ShortStart => fraction_of(numerator, start_date, end_date, end_date - f, end_date, c),
            StubType::LongStart => {
                let second_start = end_date - f;
                if start_date >= second_start {
                    fraction_of(numerator, start_date, end_date, second_start, end_date, c)
                } else {
                    let first_start = end_date - f * 2;
                    fraction_of(numerator, start_date, second_start, first_start, second_start, c)
                        + fraction_of(numerator, second_start, end_date, second_start, end_date, c)
                }
            }
            StubType::LongEnd => {
                let first_end = start_date + f;
                if end_date <= first_end {
                    fraction_of(numerator, start_date, end_date, start_date, first_end, c)
                } else {
                    let second_end = start_date + f * 2;
                    fraction_of(numerator, start_date, first_end, start_date, first_end, c)
                        + fraction_of(numerator, first_end, end_date, first_end, second_end, c)
                }
            }
        };
        Ok(result)
    }

    fn requires_reference(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IcmaDayCounterDominatorGenerator
// ─────────────────────────────────────────────────────────────────────────────

pub struct IcmaDayCounterDominatorGenerator;

impl DayCounterDominatorGenerator for IcmaDayCounterDominatorGenerator {
    fn generate(
        &self,
        _termination_date: Option<NaiveDate>,
    ) -> Result<Arc<dyn DayCounterDominator>, DayCounterGenerationError> {
        Ok(Arc::new(IcmaActualDayCounterDominator))
    }
}
