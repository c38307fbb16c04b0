use chrono::NaiveDate;

use crate::instrument::cashflowerror::{CashFlowError, CashFlowResult};
use crate::market::currency::Currency;
use crate::time::timecalculator::time_between;

/// Time from `valuation_date` to `payment_date`; a payment made before the
/// valuation date has expired.
pub fn payment_time(payment_date: NaiveDate, valuation_date: NaiveDate) -> CashFlowResult<f64> {
    if payment_date < valuation_date {
        return Err(CashFlowError::PaymentExpired {
            payment_date,
            valuation_date,
        });
    }
    Ok(time_between(valuation_date, payment_date))
}

/// 所有 coupon 共用的欄位。notional 帶正負號：負為支付，正為收取。
#[derive(Debug, Clone, PartialEq)]
pub struct GenericCouponCharacters {
    currency: Currency,
    payment_date: NaiveDate,
    accrual_start_date: NaiveDate,
    accrual_end_date: NaiveDate,
    accrual_fraction: f64,
    notional: f64,
}

impl GenericCouponCharacters {
    pub fn new(
        currency: Currency,
        payment_date: NaiveDate,
        accrual_start_date: NaiveDate,
        accrual_end_date: NaiveDate,
        accrual_fraction: f64,
        notional: f64,
    ) -> CashFlowResult<GenericCouponCharacters> {
        if accrual_start_date >= accrual_end_date {
            return Err(CashFlowError::AccrualStartNotBeforeEnd {
                start: accrual_start_date,
                end: accrual_end_date,
            });
        }
        Ok(GenericCouponCharacters {
            currency,
            payment_date,
            accrual_start_date,
            accrual_end_date,
            accrual_fraction,
            notional,
        })
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    pub fn accrual_start_date(&self) -> NaiveDate {
        self.accrual_start_date
    }

    pub fn accrual_end_date(&self) -> NaiveDate {
        self.accrual_end_date
    }

    pub fn accrual_fraction(&self) -> f64 {
        self.accrual_fraction
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    pub fn with_notional(&self, notional: f64) -> GenericCouponCharacters {
        GenericCouponCharacters {
            notional,
            ..self.clone()
        }
    }

    pub fn payment_time(&self, valuation_date: NaiveDate) -> CashFlowResult<f64> {
        payment_time(self.payment_date, valuation_date)
    }

    /// Fails unless `other` is the same currency as the coupon.
    pub fn check_currency(&self, other: &Currency) -> CashFlowResult<()> {
        if &self.currency != other {
            return Err(CashFlowError::CurrencyMismatch {
                expected: self.currency.code().to_owned(),
                found: other.code().to_owned(),
            });
        }
        Ok(())
    }
}
