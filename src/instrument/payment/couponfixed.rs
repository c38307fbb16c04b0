use chrono::{Days, NaiveDate};

use crate::instrument::cashflowerror::CashFlowResult;
use crate::instrument::derivative::paymentderivative::{CouponFixedDerivative, PaymentDerivative};
use crate::instrument::payment::couponcharacters::GenericCouponCharacters;
use crate::market::currency::Currency;

#[derive(Debug, Clone, PartialEq)]
pub struct CouponFixed {
    characters: GenericCouponCharacters,
    rate: f64,
}

impl CouponFixed {
    pub fn new(characters: GenericCouponCharacters, rate: f64) -> CouponFixed {
        CouponFixed { characters, rate }
    }

    /// Principal exchange: rate 1, fraction 1 over a one-day window starting
    /// on `date`, so the amount is exactly `notional`.
    pub fn notional_exchange(currency: Currency, date: NaiveDate, notional: f64) -> CashFlowResult<CouponFixed> {
        let characters = GenericCouponCharacters::new(
            currency,
            date,
            date,
            date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX),
            1.0,
            notional,
        )?;
        Ok(CouponFixed::new(characters, 1.0))
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn amount(&self) -> f64 {
        self.characters.notional() * self.rate * self.characters.accrual_fraction()
    }

    pub fn with_notional(&self, notional: f64) -> CouponFixed {
        CouponFixed::new(self.characters.with_notional(notional), self.rate)
    }

    pub fn with_rate(&self, rate: f64) -> CouponFixed {
        CouponFixed::new(self.characters.clone(), rate)
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate) -> CashFlowResult<PaymentDerivative> {
        Ok(PaymentDerivative::CouponFixed(self.derivative_with_rate(valuation_date, self.rate)?))
    }

    pub(crate) fn derivative_with_rate(
        &self,
        valuation_date: NaiveDate,
        rate: f64,
    ) -> CashFlowResult<CouponFixedDerivative> {
        Ok(CouponFixedDerivative::new(
            self.characters.currency().clone(),
            self.characters.payment_time(valuation_date)?,
            self.characters.accrual_fraction(),
            self.characters.notional(),
            rate,
        ))
    }
}

/// Fixed derivative of a coupon whose rate became known at projection.
pub(crate) fn fixed_derivative(
    characters: &GenericCouponCharacters,
    valuation_date: NaiveDate,
    rate: f64,
) -> CashFlowResult<PaymentDerivative> {
    CouponFixed::new(characters.clone(), rate).to_derivative(valuation_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_amount_and_with_notional() {
        let characters = GenericCouponCharacters::new(
            Currency::new("USD", 2),
            ymd(2025, 1, 15),
            ymd(2024, 1, 15),
            ymd(2025, 1, 15),
            1.0,
            -1e6,
        )
        .unwrap();
        let coupon = CouponFixed::new(characters, 0.02);
        assert_relative_eq!(coupon.amount(), -20_000.0);
        assert_relative_eq!(coupon.with_notional(5e5).amount(), 10_000.0);
        assert_eq!(coupon.with_notional(5e5).rate(), 0.02);
    }

    #[test]
    fn test_notional_exchange() {
        let exchange = CouponFixed::notional_exchange(Currency::new("EUR", 2), ymd(2024, 2, 29), 1e6).unwrap();
        assert_eq!(exchange.amount(), 1e6);
        assert_eq!(exchange.characters().accrual_end_date(), ymd(2024, 3, 1));
        assert_eq!(exchange.characters().payment_date(), ymd(2024, 2, 29));
        let derivative = exchange.to_derivative(ymd(2024, 1, 1)).unwrap();
        assert_eq!(derivative.fixed_amount(), Some(1e6));
    }
}
