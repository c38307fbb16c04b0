use chrono::NaiveDate;

use crate::instrument::cashflowerror::{CashFlowError, CashFlowResult};
use crate::instrument::derivative::paymentderivative::{
    CouponFixedAccruedCompoundingDerivative, CouponFixedCompoundingDerivative, PaymentDerivative,
};
use crate::instrument::payment::couponcharacters::GenericCouponCharacters;
use crate::interestrate::compounding::Compounding;

// ─────────────────────────────────────────────────────────────────────────────
// CouponFixedCompounding
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed rate compounded over sub-periods (the yearly windows of a zero-coupon
/// leg): amount = `N·(∏(1 + r·δᵢ) − 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponFixedCompounding {
    characters: GenericCouponCharacters,
    rate: f64,
    sub_period_start_dates: Vec<NaiveDate>,
    sub_period_end_dates: Vec<NaiveDate>,
    sub_period_fractions: Vec<f64>,
}

impl CouponFixedCompounding {
    pub fn new(
        characters: GenericCouponCharacters,
        rate: f64,
        sub_period_start_dates: Vec<NaiveDate>,
        sub_period_end_dates: Vec<NaiveDate>,
        sub_period_fractions: Vec<f64>,
    ) -> CashFlowResult<CouponFixedCompounding> {
        let n = sub_period_start_dates.len();
        if n == 0 {
            return Err(CashFlowError::missing_field("sub_period_start_dates"));
        }
        if sub_period_end_dates.len() != n {
            return Err(CashFlowError::length_mismatch("sub_period_end_dates", n, sub_period_end_dates.len()));
        }
        if sub_period_fractions.len() != n {
            return Err(CashFlowError::length_mismatch("sub_period_fractions", n, sub_period_fractions.len()));
        }
        for (start, end) in sub_period_start_dates.iter().zip(sub_period_end_dates.iter()) {
            if start >= end {
                return Err(CashFlowError::AccrualStartNotBeforeEnd { start: *start, end: *end });
            }
        }
        Ok(CouponFixedCompounding {
            characters,
            rate,
            sub_period_start_dates,
            sub_period_end_dates,
            sub_period_fractions,
        })
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn sub_period_start_dates(&self) -> &[NaiveDate] {
        &self.sub_period_start_dates
    }

    pub fn sub_period_end_dates(&self) -> &[NaiveDate] {
        &self.sub_period_end_dates
    }

    pub fn sub_period_fractions(&self) -> &[f64] {
        &self.sub_period_fractions
    }

    pub fn amount(&self) -> f64 {
        let factor: f64 = self
            .sub_period_fractions
            .iter()
            .map(|delta| Compounding::Simple.future_value(self.rate, *delta))
            .product();
        self.characters.notional() * (factor - 1.0)
    }

    pub fn with_notional(&self, notional: f64) -> CouponFixedCompounding {
        CouponFixedCompounding {
            characters: self.characters.with_notional(notional),
            ..self.clone()
        }
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate) -> CashFlowResult<PaymentDerivative> {
        Ok(PaymentDerivative::CouponFixedCompounding(CouponFixedCompoundingDerivative::new(
            self.characters.currency().clone(),
            self.characters.payment_time(valuation_date)?,
            self.characters.notional(),
            self.rate,
            self.sub_period_fractions.clone(),
        )))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CouponFixedAccruedCompounding
// ─────────────────────────────────────────────────────────────────────────────

/// Annually compounded over the whole accrual fraction (Bus/252 style):
/// amount = `N·((1 + r)^δ − 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponFixedAccruedCompounding {
    characters: GenericCouponCharacters,
    rate: f64,
}

impl CouponFixedAccruedCompounding {
    pub fn new(characters: GenericCouponCharacters, rate: f64) -> CouponFixedAccruedCompounding {
        CouponFixedAccruedCompounding { characters, rate }
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn amount(&self) -> f64 {
        let factor = Compounding::Annual.future_value(self.rate, self.characters.accrual_fraction());
        self.characters.notional() * (factor - 1.0)
    }

    pub fn with_notional(&self, notional: f64) -> CouponFixedAccruedCompounding {
        CouponFixedAccruedCompounding::new(self.characters.with_notional(notional), self.rate)
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate) -> CashFlowResult<PaymentDerivative> {
        Ok(PaymentDerivative::CouponFixedAccruedCompounding(
            CouponFixedAccruedCompoundingDerivative::new(
                self.characters.currency().clone(),
                self.characters.payment_time(valuation_date)?,
                self.characters.accrual_fraction(),
                self.characters.notional(),
                self.rate,
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::currency::Currency;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn characters(fraction: f64) -> GenericCouponCharacters {
        GenericCouponCharacters::new(
            Currency::new("BRL", 2),
            ymd(2026, 1, 15),
            ymd(2024, 1, 15),
            ymd(2026, 1, 15),
            fraction,
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn test_compounding_amount() {
        let coupon = CouponFixedCompounding::new(
            characters(2.0),
            0.05,
            vec![ymd(2024, 1, 15), ymd(2025, 1, 15)],
            vec![ymd(2025, 1, 15), ymd(2026, 1, 15)],
            vec![1.0, 1.0],
        )
        .unwrap();
        assert_relative_eq!(coupon.amount(), 10.25, epsilon = 1e-12);
        assert_relative_eq!(coupon.with_notional(-200.0).amount(), -20.5, epsilon = 1e-12);
        let derivative = coupon.to_derivative(ymd(2024, 6, 1)).unwrap();
        assert_relative_eq!(derivative.fixed_amount().unwrap(), 10.25, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_arrays_checked() {
        let err = CouponFixedCompounding::new(
            characters(2.0),
            0.05,
            vec![ymd(2024, 1, 15), ymd(2025, 1, 15)],
            vec![ymd(2025, 1, 15), ymd(2026, 1, 15)],
            vec![1.0],
        )
        .unwrap_err();
        assert_eq!(err, CashFlowError::length_mismatch("sub_period_fractions", 2, 1));
    }

    #[test]
    fn test_accrued_compounding() {
        let coupon = CouponFixedAccruedCompounding::new(characters(2.0), 0.05);
        assert_relative_eq!(coupon.amount(), 10.25, epsilon = 1e-12);
        let half = CouponFixedAccruedCompounding::new(characters(0.5), 0.21);
        assert_relative_eq!(half.amount(), 100.0 * (1.21f64.sqrt() - 1.0), epsilon = 1e-12);
    }
}
