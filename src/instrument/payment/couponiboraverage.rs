use std::sync::Arc;

use chrono::NaiveDate;

use crate::instrument::cashflowerror::{CashFlowError, CashFlowResult};
use crate::instrument::derivative::paymentderivative::{CouponIborAverageDerivative, PaymentDerivative};
use crate::instrument::payment::couponcharacters::GenericCouponCharacters;
use crate::instrument::payment::couponfixed::fixed_derivative;
use crate::instrument::payment::couponibor::IborFixing;
use crate::interestrate::index::fixingseries::FixingStore;
use crate::interestrate::index::interestrateindex::InterestRateIndex;

/// 把每個 fixing 各自跑過 state machine：已知的加權累加成 accrued rate，
/// 其餘留在浮動的尾巴；尾巴為空時退化為 fixed coupon。
fn weighted_derivative(
    characters: &GenericCouponCharacters,
    fixings: &[IborFixing],
    weights: &[f64],
    valuation_date: NaiveDate,
    store: Option<&FixingStore>,
) -> CashFlowResult<PaymentDerivative> {
    let payment_time = characters.payment_time(valuation_date)?;
    let mut accrued_rate = 0.0;
    let mut open_fixings = Vec::new();
    let mut open_weights = Vec::new();
    for (fixing, weight) in fixings.iter().zip(weights.iter()) {
        match fixing.resolve(valuation_date, store)? {
            Some(rate) => accrued_rate += weight * rate,
            None => {
                open_fixings.push(fixing.to_derivative(valuation_date));
                open_weights.push(*weight);
            }
        }
    }
    if open_fixings.is_empty() {
        return fixed_derivative(characters, valuation_date, accrued_rate);
    }
    Ok(PaymentDerivative::CouponIborAverage(CouponIborAverageDerivative::new(
        characters.currency().clone(),
        payment_time,
        characters.accrual_fraction(),
        characters.notional(),
        open_fixings,
        open_weights,
        accrued_rate,
    )))
}

// ─────────────────────────────────────────────────────────────────────────────
// CouponIborAverage
// ─────────────────────────────────────────────────────────────────────────────

/// Weighted average of one index fixed on several dates.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponIborAverage {
    characters: GenericCouponCharacters,
    fixings: Vec<IborFixing>,
    weights: Vec<f64>,
}

impl CouponIborAverage {
    /// Fixing periods derived from the index for each fixing date.
    pub fn new(
        characters: GenericCouponCharacters,
        index: Arc<dyn InterestRateIndex>,
        fixing_dates: &[NaiveDate],
        weights: Vec<f64>,
    ) -> CashFlowResult<CouponIborAverage> {
        if weights.len() != fixing_dates.len() {
            return Err(CashFlowError::length_mismatch("weights", fixing_dates.len(), weights.len()));
        }
        let fixings = fixing_dates
            .iter()
            .map(|d| IborFixing::from_fixing_date(index.clone(), *d))
            .collect::<CashFlowResult<Vec<_>>>()?;
        CouponIborAverage::from_fixings(characters, fixings, weights)
    }

    /// Fixing periods given explicitly; every array has one entry per fixing date.
    pub fn with_fixing_periods(
        characters: GenericCouponCharacters,
        index: Arc<dyn InterestRateIndex>,
        fixing_dates: &[NaiveDate],
        weights: Vec<f64>,
        fixing_period_start_dates: &[NaiveDate],
        fixing_period_end_dates: &[NaiveDate],
        fixing_period_fractions: &[f64],
    ) -> CashFlowResult<CouponIborAverage> {
        let n = fixing_dates.len();
        for (what, len) in [
            ("weights", weights.len()),
            ("fixing_period_start_dates", fixing_period_start_dates.len()),
            ("fixing_period_end_dates", fixing_period_end_dates.len()),
            ("fixing_period_fractions", fixing_period_fractions.len()),
        ] {
            if len != n {
                return Err(CashFlowError::length_mismatch(what, n, len));
            }
        }
        let fixings = (0..n)
            .map(|i| {
                IborFixing::new(
                    index.clone(),
                    fixing_dates[i],
                    fixing_period_start_dates[i],
                    fixing_period_end_dates[i],
                    fixing_period_fractions[i],
                )
            })
            .collect::<CashFlowResult<Vec<_>>>()?;
        CouponIborAverage::from_fixings(characters, fixings, weights)
    }

    fn from_fixings(
        characters: GenericCouponCharacters,
        fixings: Vec<IborFixing>,
        weights: Vec<f64>,
    ) -> CashFlowResult<CouponIborAverage> {
        let first = fixings.first().ok_or(CashFlowError::missing_field("fixing_dates"))?;
        characters.check_currency(first.index().currency())?;
        Ok(CouponIborAverage {
            characters,
            fixings,
            weights,
        })
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn fixings(&self) -> &[IborFixing] {
        &self.fixings
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn with_notional(&self, notional: f64) -> CouponIborAverage {
        CouponIborAverage {
            characters: self.characters.with_notional(notional),
            ..self.clone()
        }
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowResult<PaymentDerivative> {
        weighted_derivative(&self.characters, &self.fixings, &self.weights, valuation_date, fixings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CouponIborInterpolated
// ─────────────────────────────────────────────────────────────────────────────

/// Stub coupon fixed on two indices of different tenors. The weights
/// interpolate linearly, in days, the accrual end date between the two
/// index end dates.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponIborInterpolated {
    characters: GenericCouponCharacters,
    fixing1: IborFixing,
    fixing2: IborFixing,
    weight1: f64,
    weight2: f64,
}

impl CouponIborInterpolated {
    pub fn new(
        characters: GenericCouponCharacters,
        index1: Arc<dyn InterestRateIndex>,
        index2: Arc<dyn InterestRateIndex>,
        fixing_date: NaiveDate,
    ) -> CashFlowResult<CouponIborInterpolated> {
        characters.check_currency(index1.currency())?;
        characters.check_currency(index2.currency())?;
        let fixing1 = IborFixing::from_fixing_date(index1, fixing_date)?;
        let fixing2 = IborFixing::from_fixing_date(index2, fixing_date)?;
        let end1 = fixing1.fixing_period_end_date();
        let end2 = fixing2.fixing_period_end_date();
        let weight1 = if end1 == end2 {
            1.0
        } else {
            (end2 - characters.accrual_end_date()).num_days() as f64 / (end2 - end1).num_days() as f64
        };
        Ok(CouponIborInterpolated {
            characters,
            fixing1,
            fixing2,
            weight1,
            weight2: 1.0 - weight1,
        })
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn fixing_date(&self) -> NaiveDate {
        self.fixing1.fixing_date()
    }

    pub fn fixing1(&self) -> &IborFixing {
        &self.fixing1
    }

    pub fn fixing2(&self) -> &IborFixing {
        &self.fixing2
    }

    pub fn weights(&self) -> (f64, f64) {
        (self.weight1, self.weight2)
    }

    pub fn with_notional(&self, notional: f64) -> CouponIborInterpolated {
        CouponIborInterpolated {
            characters: self.characters.with_notional(notional),
            ..self.clone()
        }
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowResult<PaymentDerivative> {
        weighted_derivative(
            &self.characters,
            &[self.fixing1.clone(), self.fixing2.clone()],
            &[self.weight1, self.weight2],
            valuation_date,
            fixings,
        )
    }
}
