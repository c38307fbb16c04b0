//! Valuation-relative payments: dates become times in years from the
//! valuation date, and resolved fixings become fixed amounts.

use crate::instrument::payment::couponovernight::OvernightAccrualMethod;
use crate::market::currency::Currency;

// ─────────────────────────────────────────────────────────────────────────────
// Fixed
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentFixedDerivative {
    currency: Currency,
    payment_time: f64,
    amount: f64,
}

impl PaymentFixedDerivative {
    pub fn new(currency: Currency, payment_time: f64, amount: f64) -> Self {
        Self {
            currency,
            payment_time,
            amount,
        }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CouponFixedDerivative {
    currency: Currency,
    payment_time: f64,
    payment_year_fraction: f64,
    notional: f64,
    rate: f64,
}

impl CouponFixedDerivative {
    pub fn new(currency: Currency, payment_time: f64, payment_year_fraction: f64, notional: f64, rate: f64) -> Self {
        Self {
            currency,
            payment_time,
            payment_year_fraction,
            notional,
            rate,
        }
    }

    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn amount(&self) -> f64 {
        self.notional * self.rate * self.payment_year_fraction
    }
}

/// Fixed rate compounded over sub-periods: `N·(∏(1 + r·δᵢ) − 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponFixedCompoundingDerivative {
    currency: Currency,
    payment_time: f64,
    notional: f64,
    rate: f64,
    sub_period_fractions: Vec<f64>,
}

impl CouponFixedCompoundingDerivative {
    pub fn new(currency: Currency, payment_time: f64, notional: f64, rate: f64, sub_period_fractions: Vec<f64>) -> Self {
        Self {
            currency,
            payment_time,
            notional,
            rate,
            sub_period_fractions,
        }
    }

    pub fn sub_period_fractions(&self) -> &[f64] {
        &self.sub_period_fractions
    }

    pub fn amount(&self) -> f64 {
        let factor: f64 = self
            .sub_period_fractions
            .iter()
            .map(|delta| 1.0 + self.rate * delta)
            .product();
        self.notional * (factor - 1.0)
    }
}

/// `N·((1 + r)^δ − 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponFixedAccruedCompoundingDerivative {
    currency: Currency,
    payment_time: f64,
    payment_year_fraction: f64,
    notional: f64,
    rate: f64,
}

impl CouponFixedAccruedCompoundingDerivative {
    pub fn new(currency: Currency, payment_time: f64, payment_year_fraction: f64, notional: f64, rate: f64) -> Self {
        Self {
            currency,
            payment_time,
            payment_year_fraction,
            notional,
            rate,
        }
    }

    pub fn amount(&self) -> f64 {
        self.notional * ((1.0 + self.rate).powf(self.payment_year_fraction) - 1.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ibor
// ─────────────────────────────────────────────────────────────────────────────

/// One unresolved Ibor fixing, in times from the valuation date.
#[derive(Debug, Clone, PartialEq)]
pub struct IborFixingDerivative {
    index_name: String,
    fixing_time: f64,
    fixing_period_start_time: f64,
    fixing_period_end_time: f64,
    fixing_accrual_fraction: f64,
}

impl IborFixingDerivative {
    pub fn new(
        index_name: impl Into<String>,
        fixing_time: f64,
        fixing_period_start_time: f64,
        fixing_period_end_time: f64,
        fixing_accrual_fraction: f64,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            fixing_time,
            fixing_period_start_time,
            fixing_period_end_time,
            fixing_accrual_fraction,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn fixing_time(&self) -> f64 {
        self.fixing_time
    }

    pub fn fixing_period_start_time(&self) -> f64 {
        self.fixing_period_start_time
    }

    pub fn fixing_period_end_time(&self) -> f64 {
        self.fixing_period_end_time
    }

    pub fn fixing_accrual_fraction(&self) -> f64 {
        self.fixing_accrual_fraction
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CouponIborDerivative {
    currency: Currency,
    payment_time: f64,
    payment_year_fraction: f64,
    notional: f64,
    fixing: IborFixingDerivative,
    spread: f64,
}

impl CouponIborDerivative {
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_year_fraction: f64,
        notional: f64,
        fixing: IborFixingDerivative,
        spread: f64,
    ) -> Self {
        Self {
            currency,
            payment_time,
            payment_year_fraction,
            notional,
            fixing,
            spread,
        }
    }

    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    pub fn fixing(&self) -> &IborFixingDerivative {
        &self.fixing
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn spread_amount(&self) -> f64 {
        self.spread * self.notional * self.payment_year_fraction
    }
}

/// Weighted Ibor fixings (averages and interpolated stubs). `accrued_rate`
/// is the weighted sum of the fixings already known.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponIborAverageDerivative {
    currency: Currency,
    payment_time: f64,
    payment_year_fraction: f64,
    notional: f64,
    fixings: Vec<IborFixingDerivative>,
    weights: Vec<f64>,
    accrued_rate: f64,
}

impl CouponIborAverageDerivative {
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_year_fraction: f64,
        notional: f64,
        fixings: Vec<IborFixingDerivative>,
        weights: Vec<f64>,
        accrued_rate: f64,
    ) -> Self {
        Self {
            currency,
            payment_time,
            payment_year_fraction,
            notional,
            fixings,
            weights,
            accrued_rate,
        }
    }

    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    pub fn fixings(&self) -> &[IborFixingDerivative] {
        &self.fixings
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn accrued_rate(&self) -> f64 {
        self.accrued_rate
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Overnight
// ─────────────────────────────────────────────────────────────────────────────

/// The unresolved tail of an overnight coupon.
///
/// `accrued` depends on the method:
/// - `Compounded` / `DailyCompounded`：已知 fixing 複利後的 notional（無已知 fixing 時為 notional）
/// - `ArithmeticAverage`：已知 fixing 的 `Σ rᵢ·δᵢ`
#[derive(Debug, Clone, PartialEq)]
pub struct CouponOvernightDerivative {
    currency: Currency,
    payment_time: f64,
    payment_year_fraction: f64,
    notional: f64,
    index_name: String,
    method: OvernightAccrualMethod,
    fixing_period_times: Vec<f64>,
    fixing_period_fractions: Vec<f64>,
    accrued: f64,
    spread: f64,
}

impl CouponOvernightDerivative {
    pub fn new(
        currency: Currency,
        payment_time: f64,
        payment_year_fraction: f64,
        notional: f64,
        index_name: impl Into<String>,
        method: OvernightAccrualMethod,
        fixing_period_times: Vec<f64>,
        fixing_period_fractions: Vec<f64>,
        accrued: f64,
        spread: f64,
    ) -> Self {
        Self {
            currency,
            payment_time,
            payment_year_fraction,
            notional,
            index_name: index_name.into(),
            method,
            fixing_period_times,
            fixing_period_fractions,
            accrued,
            spread,
        }
    }

    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn method(&self) -> OvernightAccrualMethod {
        self.method
    }

    /// Sub-period boundaries of the tail, one more than the fractions.
    pub fn fixing_period_times(&self) -> &[f64] {
        &self.fixing_period_times
    }

    pub fn fixing_period_fractions(&self) -> &[f64] {
        &self.fixing_period_fractions
    }

    pub fn accrued(&self) -> f64 {
        self.accrued
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Amount already earned by the known fixings, excluding the spread.
    pub fn accrued_amount(&self) -> f64 {
        match self.method {
            OvernightAccrualMethod::ArithmeticAverage => self.notional * self.accrued,
            OvernightAccrualMethod::Compounded | OvernightAccrualMethod::DailyCompounded => {
                self.accrued - self.notional
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PaymentDerivative
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentDerivative {
    Fixed(PaymentFixedDerivative),
    CouponFixed(CouponFixedDerivative),
    CouponFixedCompounding(CouponFixedCompoundingDerivative),
    CouponFixedAccruedCompounding(CouponFixedAccruedCompoundingDerivative),
    CouponIbor(CouponIborDerivative),
    CouponIborAverage(CouponIborAverageDerivative),
    CouponOvernight(CouponOvernightDerivative),
}

impl PaymentDerivative {
    pub fn currency(&self) -> &Currency {
        match self {
            PaymentDerivative::Fixed(p) => &p.currency,
            PaymentDerivative::CouponFixed(p) => &p.currency,
            PaymentDerivative::CouponFixedCompounding(p) => &p.currency,
            PaymentDerivative::CouponFixedAccruedCompounding(p) => &p.currency,
            PaymentDerivative::CouponIbor(p) => &p.currency,
            PaymentDerivative::CouponIborAverage(p) => &p.currency,
            PaymentDerivative::CouponOvernight(p) => &p.currency,
        }
    }

    pub fn payment_time(&self) -> f64 {
        match self {
            PaymentDerivative::Fixed(p) => p.payment_time,
            PaymentDerivative::CouponFixed(p) => p.payment_time,
            PaymentDerivative::CouponFixedCompounding(p) => p.payment_time,
            PaymentDerivative::CouponFixedAccruedCompounding(p) => p.payment_time,
            PaymentDerivative::CouponIbor(p) => p.payment_time,
            PaymentDerivative::CouponIborAverage(p) => p.payment_time,
            PaymentDerivative::CouponOvernight(p) => p.payment_time,
        }
    }

    /// Known amount of a payment with no open fixing; `None` for floating ones.
    pub fn fixed_amount(&self) -> Option<f64> {
        match self {
            PaymentDerivative::Fixed(p) => Some(p.amount()),
            PaymentDerivative::CouponFixed(p) => Some(p.amount()),
            PaymentDerivative::CouponFixedCompounding(p) => Some(p.amount()),
            PaymentDerivative::CouponFixedAccruedCompounding(p) => Some(p.amount()),
            PaymentDerivative::CouponIbor(_)
            | PaymentDerivative::CouponIborAverage(_)
            | PaymentDerivative::CouponOvernight(_) => None,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed_amount().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn usd() -> Currency {
        Currency::new("USD", 2)
    }

    #[test]
    fn test_fixed_amounts() {
        let coupon = CouponFixedDerivative::new(usd(), 0.5, 0.5, -1e6, 0.02);
        assert_relative_eq!(coupon.amount(), -10_000.0);
        let compounding = CouponFixedCompoundingDerivative::new(usd(), 2.0, 100.0, 0.05, vec![1.0, 1.0]);
        assert_relative_eq!(compounding.amount(), 10.25, epsilon = 1e-12);
        let accrued = CouponFixedAccruedCompoundingDerivative::new(usd(), 2.0, 2.0, 100.0, 0.05);
        assert_relative_eq!(accrued.amount(), 10.25, epsilon = 1e-12);
        assert!(PaymentDerivative::CouponFixed(coupon).is_fixed());
    }

    #[test]
    fn test_overnight_accrued_amount() {
        let average = CouponOvernightDerivative::new(
            usd(), 0.1, 0.01, 1e6, "SOFR", OvernightAccrualMethod::ArithmeticAverage,
            vec![0.0, 0.003], vec![0.003], 0.0002, 0.0,
        );
        assert_relative_eq!(average.accrued_amount(), 200.0, epsilon = 1e-9);
        let compounded = CouponOvernightDerivative::new(
            usd(), 0.1, 0.01, 1e6, "SOFR", OvernightAccrualMethod::Compounded,
            vec![0.0, 0.003], vec![0.003], 1_000_150.0, 0.0,
        );
        assert_relative_eq!(compounded.accrued_amount(), 150.0, epsilon = 1e-9);
        assert!(!PaymentDerivative::CouponOvernight(compounded).is_fixed());
    }
}
