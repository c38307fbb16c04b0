use chrono::NaiveDate;

use crate::instrument::cashflowerror::CashFlowResult;
use crate::instrument::derivative::paymentderivative::{PaymentDerivative, PaymentFixedDerivative};
use crate::instrument::payment::couponcharacters::payment_time;
use crate::market::currency::Currency;

/// A known amount paid on one date, with no accrual.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentFixed {
    currency: Currency,
    payment_date: NaiveDate,
    amount: f64,
}

impl PaymentFixed {
    pub fn new(currency: Currency, payment_date: NaiveDate, amount: f64) -> PaymentFixed {
        PaymentFixed {
            currency,
            payment_date,
            amount,
        }
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The amount plays the role of the notional.
    pub fn with_notional(&self, amount: f64) -> PaymentFixed {
        PaymentFixed {
            amount,
            ..self.clone()
        }
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate) -> CashFlowResult<PaymentDerivative> {
        Ok(PaymentDerivative::Fixed(PaymentFixedDerivative::new(
            self.currency.clone(),
            payment_time(self.payment_date, valuation_date)?,
            self.amount,
        )))
    }
}
