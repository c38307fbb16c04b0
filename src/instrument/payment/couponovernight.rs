use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::instrument::cashflowerror::{CashFlowError, CashFlowResult};
use crate::instrument::derivative::paymentderivative::{CouponOvernightDerivative, PaymentDerivative};
use crate::instrument::payment::couponcharacters::GenericCouponCharacters;
use crate::instrument::payment::couponfixed::fixed_derivative;
use crate::instrument::payment::fixingresolution::resolve_fixing_prefix;
use crate::interestrate::compounding::Compounding;
use crate::interestrate::index::fixingseries::FixingStore;
use crate::interestrate::index::interestrateindex::InterestRateIndex;
use crate::time::timecalculator::time_between;

/// How the daily fixings of an overnight coupon combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum OvernightAccrualMethod {
    /// Simple interest on the compounded index: `∏(1 + rᵢ·δᵢ) − 1`.
    Compounded,
    /// Exponential daily compounding (CDI style): `∏(1 + rᵢ)^δᵢ − 1`.
    DailyCompounded,
    /// `Σ rᵢ·δᵢ`.
    ArithmeticAverage,
}

impl OvernightAccrualMethod {
    /// 已知 fixing 的累積：複利類回傳成長因子，算術平均回傳 `Σ rᵢ·δᵢ`。
    fn accumulate(&self, rates: &[f64], fractions: &[f64]) -> f64 {
        let pairs = rates.iter().zip(fractions.iter());
        match self {
            OvernightAccrualMethod::Compounded => pairs
                .map(|(r, delta)| Compounding::Simple.future_value(*r, *delta))
                .product(),
            OvernightAccrualMethod::DailyCompounded => pairs
                .map(|(r, delta)| Compounding::Annual.future_value(*r, *delta))
                .product(),
            OvernightAccrualMethod::ArithmeticAverage => pairs.map(|(r, delta)| r * delta).sum(),
        }
    }

    /// Simple rate over `accrual_fraction` reproducing the accumulated value.
    fn equivalent_rate(&self, accumulated: f64, accrual_fraction: f64) -> f64 {
        match self {
            OvernightAccrualMethod::Compounded | OvernightAccrualMethod::DailyCompounded => {
                (accumulated - 1.0) / accrual_fraction
            }
            OvernightAccrualMethod::ArithmeticAverage => accumulated / accrual_fraction,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OvernightFixings
// ─────────────────────────────────────────────────────────────────────────────

/// Daily sub-periods of an overnight coupon, stepped one business day of the
/// **index** calendar at a time.
///
/// `fixing_period_dates` has one more entry than `fixing_dates` and
/// `fixing_period_fractions`. With a rate cut-off `k >= 2` the last `k - 1`
/// fixing dates repeat fixing date `n - k`.
#[derive(Debug, Clone)]
pub struct OvernightFixings {
    index: Arc<dyn InterestRateIndex>,
    fixing_period_dates: Vec<NaiveDate>,
    fixing_dates: Vec<NaiveDate>,
    fixing_period_fractions: Vec<f64>,
    rate_cutoff: Option<usize>,
}

impl OvernightFixings {
    pub fn new(
        index: Arc<dyn InterestRateIndex>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        rate_cutoff: Option<usize>,
    ) -> CashFlowResult<OvernightFixings> {
        if start_date >= end_date {
            return Err(CashFlowError::AccrualStartNotBeforeEnd {
                start: start_date,
                end: end_date,
            });
        }
        let calendar = index.calendar();
        let mut fixing_period_dates = vec![start_date];
        let mut d = start_date;
        while d < end_date {
            d = calendar.next_business_day(d).min(end_date);
            fixing_period_dates.push(d);
        }
        let n = fixing_period_dates.len() - 1;

        let fixing_period_fractions = fixing_period_dates
            .windows(2)
            .map(|w| index.day_counter().year_fraction(w[0], w[1]))
            .collect::<Result<Vec<f64>, _>>()?;
        let mut fixing_dates: Vec<NaiveDate> = fixing_period_dates[..n]
            .iter()
            .map(|d| {
                // 起點落在 index 假日時，沿用前一個營業日的 fixing。
                let d = if calendar.is_business_day(*d) { *d } else { calendar.previous_business_day(*d) };
                index.fixing_date_from_start(d)
            })
            .collect();

        if let Some(k) = rate_cutoff {
            if k < 1 || k >= n {
                return Err(CashFlowError::InvalidRateCutoff { cutoff: k, periods: n });
            }
            let frozen = fixing_dates[n - k];
            for fixing_date in fixing_dates[n - k + 1..].iter_mut() {
                *fixing_date = frozen;
            }
        }

        Ok(OvernightFixings {
            index,
            fixing_period_dates,
            fixing_dates,
            fixing_period_fractions,
            rate_cutoff,
        })
    }

    pub fn index(&self) -> &Arc<dyn InterestRateIndex> {
        &self.index
    }

    pub fn fixing_period_dates(&self) -> &[NaiveDate] {
        &self.fixing_period_dates
    }

    pub fn fixing_dates(&self) -> &[NaiveDate] {
        &self.fixing_dates
    }

    pub fn fixing_period_fractions(&self) -> &[f64] {
        &self.fixing_period_fractions
    }

    pub fn rate_cutoff(&self) -> Option<usize> {
        self.rate_cutoff
    }

    pub fn len(&self) -> usize {
        self.fixing_dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixing_dates.is_empty()
    }

    fn to_derivative(
        &self,
        characters: &GenericCouponCharacters,
        method: OvernightAccrualMethod,
        spread: f64,
        valuation_date: NaiveDate,
        store: Option<&FixingStore>,
    ) -> CashFlowResult<PaymentDerivative> {
        let payment_time = characters.payment_time(valuation_date)?;
        let known = resolve_fixing_prefix(self.index.as_ref(), &self.fixing_dates, valuation_date, store)?;
        let k = known.len();
        let accumulated = method.accumulate(&known, &self.fixing_period_fractions[..k]);

        if k == self.len() {
            let rate = method.equivalent_rate(accumulated, characters.accrual_fraction()) + spread;
            return fixed_derivative(characters, valuation_date, rate);
        }

        let accrued = match method {
            OvernightAccrualMethod::ArithmeticAverage => accumulated,
            _ => characters.notional() * accumulated,
        };
        let fixing_period_times = self.fixing_period_dates[k..]
            .iter()
            .map(|d| time_between(valuation_date, *d))
            .collect();
        Ok(PaymentDerivative::CouponOvernight(CouponOvernightDerivative::new(
            characters.currency().clone(),
            payment_time,
            characters.accrual_fraction(),
            characters.notional(),
            self.index.name(),
            method,
            fixing_period_times,
            self.fixing_period_fractions[k..].to_vec(),
            accrued,
            spread,
        )))
    }
}

impl PartialEq for OvernightFixings {
    fn eq(&self, other: &Self) -> bool {
        self.index.name() == other.index.name()
            && self.fixing_period_dates == other.fixing_period_dates
            && self.fixing_dates == other.fixing_dates
            && self.fixing_period_fractions == other.fixing_period_fractions
            && self.rate_cutoff == other.rate_cutoff
    }
}

fn check_overnight_currency(characters: &GenericCouponCharacters, fixings: &OvernightFixings) -> CashFlowResult<()> {
    characters.check_currency(fixings.index().currency())
}

// ─────────────────────────────────────────────────────────────────────────────
// Coupons
// ─────────────────────────────────────────────────────────────────────────────

/// Overnight compounded coupon with an additive spread.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponOvernightCompounded {
    characters: GenericCouponCharacters,
    fixings: OvernightFixings,
    spread: f64,
    spread_amount: f64,
}

impl CouponOvernightCompounded {
    pub fn new(characters: GenericCouponCharacters, fixings: OvernightFixings, spread: f64) -> CashFlowResult<Self> {
        check_overnight_currency(&characters, &fixings)?;
        let spread_amount = spread * characters.notional() * characters.accrual_fraction();
        Ok(Self {
            characters,
            fixings,
            spread,
            spread_amount,
        })
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn fixings(&self) -> &OvernightFixings {
        &self.fixings
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn spread_amount(&self) -> f64 {
        self.spread_amount
    }

    pub fn with_notional(&self, notional: f64) -> Self {
        let characters = self.characters.with_notional(notional);
        Self {
            spread_amount: self.spread * notional * characters.accrual_fraction(),
            characters,
            fixings: self.fixings.clone(),
            spread: self.spread,
        }
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowResult<PaymentDerivative> {
        self.fixings.to_derivative(
            &self.characters,
            OvernightAccrualMethod::Compounded,
            self.spread,
            valuation_date,
            fixings,
        )
    }
}

/// Overnight coupon compounded exponentially each day, without spread.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponOvernightDailyCompounded {
    characters: GenericCouponCharacters,
    fixings: OvernightFixings,
}

impl CouponOvernightDailyCompounded {
    pub fn new(characters: GenericCouponCharacters, fixings: OvernightFixings) -> CashFlowResult<Self> {
        check_overnight_currency(&characters, &fixings)?;
        Ok(Self { characters, fixings })
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn fixings(&self) -> &OvernightFixings {
        &self.fixings
    }

    pub fn with_notional(&self, notional: f64) -> Self {
        Self {
            characters: self.characters.with_notional(notional),
            fixings: self.fixings.clone(),
        }
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowResult<PaymentDerivative> {
        self.fixings.to_derivative(
            &self.characters,
            OvernightAccrualMethod::DailyCompounded,
            0.0,
            valuation_date,
            fixings,
        )
    }
}

/// Arithmetic average of overnight fixings plus spread.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponOvernightArithmeticAverage {
    characters: GenericCouponCharacters,
    fixings: OvernightFixings,
    spread: f64,
    spread_amount: f64,
}

impl CouponOvernightArithmeticAverage {
    pub fn new(characters: GenericCouponCharacters, fixings: OvernightFixings, spread: f64) -> CashFlowResult<Self> {
        check_overnight_currency(&characters, &fixings)?;
        let spread_amount = spread * characters.notional() * characters.accrual_fraction();
        Ok(Self {
            characters,
            fixings,
            spread,
            spread_amount,
        })
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn fixings(&self) -> &OvernightFixings {
        &self.fixings
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn spread_amount(&self) -> f64 {
        self.spread_amount
    }

    pub fn with_notional(&self, notional: f64) -> Self {
        let characters = self.characters.with_notional(notional);
        Self {
            spread_amount: self.spread * notional * characters.accrual_fraction(),
            characters,
            fixings: self.fixings.clone(),
            spread: self.spread,
        }
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowResult<PaymentDerivative> {
        self.fixings.to_derivative(
            &self.characters,
            OvernightAccrualMethod::ArithmeticAverage,
            self.spread,
            valuation_date,
            fixings,
        )
    }
}
