use chrono::NaiveDate;

use crate::instrument::cashflowerror::CashFlowResult;
use crate::instrument::derivative::paymentderivative::PaymentDerivative;
use crate::instrument::payment::couponcharacters::GenericCouponCharacters;
use crate::instrument::payment::couponfixed::CouponFixed;
use crate::instrument::payment::couponfixedcompounding::{CouponFixedAccruedCompounding, CouponFixedCompounding};
use crate::instrument::payment::couponibor::{CouponIbor, CouponIborSpread};
use crate::instrument::payment::couponiboraverage::{CouponIborAverage, CouponIborInterpolated};
use crate::instrument::payment::couponovernight::{
    CouponOvernightArithmeticAverage, CouponOvernightCompounded, CouponOvernightDailyCompounded,
};
use crate::instrument::payment::paymentfixed::PaymentFixed;
use crate::interestrate::index::fixingseries::FixingStore;
use crate::market::currency::Currency;

/// Every payment a leg can hold. Pricing code matches on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentDefinition {
    Fixed(PaymentFixed),
    CouponFixed(CouponFixed),
    CouponFixedCompounding(CouponFixedCompounding),
    CouponFixedAccruedCompounding(CouponFixedAccruedCompounding),
    CouponIbor(CouponIbor),
    CouponIborSpread(CouponIborSpread),
    CouponIborAverage(CouponIborAverage),
    CouponIborInterpolated(CouponIborInterpolated),
    CouponOvernightCompounded(CouponOvernightCompounded),
    CouponOvernightDailyCompounded(CouponOvernightDailyCompounded),
    CouponOvernightArithmeticAverage(CouponOvernightArithmeticAverage),
}

enum SharedFields<'a> {
    Payment(&'a PaymentFixed),
    Coupon(&'a GenericCouponCharacters),
}

impl PaymentDefinition {
    fn shared(&self) -> SharedFields<'_> {
        let characters = match self {
            PaymentDefinition::Fixed(p) => return SharedFields::Payment(p),
            PaymentDefinition::CouponFixed(c) => c.characters(),
            PaymentDefinition::CouponFixedCompounding(c) => c.characters(),
            PaymentDefinition::CouponFixedAccruedCompounding(c) => c.characters(),
            PaymentDefinition::CouponIbor(c) => c.characters(),
            PaymentDefinition::CouponIborSpread(c) => c.characters(),
            PaymentDefinition::CouponIborAverage(c) => c.characters(),
            PaymentDefinition::CouponIborInterpolated(c) => c.characters(),
            PaymentDefinition::CouponOvernightCompounded(c) => c.characters(),
            PaymentDefinition::CouponOvernightDailyCompounded(c) => c.characters(),
            PaymentDefinition::CouponOvernightArithmeticAverage(c) => c.characters(),
        };
        SharedFields::Coupon(characters)
    }

    /// Shared coupon fields; `None` for a bare payment.
    pub fn characters(&self) -> Option<&GenericCouponCharacters> {
        match self.shared() {
            SharedFields::Payment(_) => None,
            SharedFields::Coupon(characters) => Some(characters),
        }
    }

    pub fn currency(&self) -> &Currency {
        match self.shared() {
            SharedFields::Payment(p) => p.currency(),
            SharedFields::Coupon(characters) => characters.currency(),
        }
    }

    pub fn payment_date(&self) -> NaiveDate {
        match self.shared() {
            SharedFields::Payment(p) => p.payment_date(),
            SharedFields::Coupon(characters) => characters.payment_date(),
        }
    }

    /// Signed notional of a coupon, or the amount of a bare payment.
    pub fn reference_amount(&self) -> f64 {
        match self.shared() {
            SharedFields::Payment(p) => p.amount(),
            SharedFields::Coupon(characters) => characters.notional(),
        }
    }

    pub fn is_floating(&self) -> bool {
        !matches!(
            self,
            PaymentDefinition::Fixed(_)
                | PaymentDefinition::CouponFixed(_)
                | PaymentDefinition::CouponFixedCompounding(_)
                | PaymentDefinition::CouponFixedAccruedCompounding(_)
        )
    }

    pub fn with_notional(&self, notional: f64) -> PaymentDefinition {
        match self {
            PaymentDefinition::Fixed(p) => PaymentDefinition::Fixed(p.with_notional(notional)),
            PaymentDefinition::CouponFixed(c) => PaymentDefinition::CouponFixed(c.with_notional(notional)),
            PaymentDefinition::CouponFixedCompounding(c) => {
                PaymentDefinition::CouponFixedCompounding(c.with_notional(notional))
            }
            PaymentDefinition::CouponFixedAccruedCompounding(c) => {
                PaymentDefinition::CouponFixedAccruedCompounding(c.with_notional(notional))
            }
            PaymentDefinition::CouponIbor(c) => PaymentDefinition::CouponIbor(c.with_notional(notional)),
            PaymentDefinition::CouponIborSpread(c) => PaymentDefinition::CouponIborSpread(c.with_notional(notional)),
            PaymentDefinition::CouponIborAverage(c) => PaymentDefinition::CouponIborAverage(c.with_notional(notional)),
            PaymentDefinition::CouponIborInterpolated(c) => {
                PaymentDefinition::CouponIborInterpolated(c.with_notional(notional))
            }
            PaymentDefinition::CouponOvernightCompounded(c) => {
                PaymentDefinition::CouponOvernightCompounded(c.with_notional(notional))
            }
            PaymentDefinition::CouponOvernightDailyCompounded(c) => {
                PaymentDefinition::CouponOvernightDailyCompounded(c.with_notional(notional))
            }
            PaymentDefinition::CouponOvernightArithmeticAverage(c) => {
                PaymentDefinition::CouponOvernightArithmeticAverage(c.with_notional(notional))
            }
        }
    }

    /// Projects the payment to `valuation_date`, resolving fixings from
    /// `fixings`. Without fixings a past-due fixing is an error.
    pub fn to_derivative(&self, valuation_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowResult<PaymentDerivative> {
        match self {
            PaymentDefinition::Fixed(p) => p.to_derivative(valuation_date),
            PaymentDefinition::CouponFixed(c) => c.to_derivative(valuation_date),
            PaymentDefinition::CouponFixedCompounding(c) => c.to_derivative(valuation_date),
            PaymentDefinition::CouponFixedAccruedCompounding(c) => c.to_derivative(valuation_date),
            PaymentDefinition::CouponIbor(c) => c.to_derivative(valuation_date, fixings),
            PaymentDefinition::CouponIborSpread(c) => c.to_derivative(valuation_date, fixings),
            PaymentDefinition::CouponIborAverage(c) => c.to_derivative(valuation_date, fixings),
            PaymentDefinition::CouponIborInterpolated(c) => c.to_derivative(valuation_date, fixings),
            PaymentDefinition::CouponOvernightCompounded(c) => c.to_derivative(valuation_date, fixings),
            PaymentDefinition::CouponOvernightDailyCompounded(c) => c.to_derivative(valuation_date, fixings),
            PaymentDefinition::CouponOvernightArithmeticAverage(c) => c.to_derivative(valuation_date, fixings),
        }
    }
}

impl From<PaymentFixed> for PaymentDefinition {
    fn from(payment: PaymentFixed) -> Self {
        PaymentDefinition::Fixed(payment)
    }
}

impl From<CouponFixed> for PaymentDefinition {
    fn from(coupon: CouponFixed) -> Self {
        PaymentDefinition::CouponFixed(coupon)
    }
}

impl From<CouponFixedCompounding> for PaymentDefinition {
    fn from(coupon: CouponFixedCompounding) -> Self {
        PaymentDefinition::CouponFixedCompounding(coupon)
    }
}

impl From<CouponFixedAccruedCompounding> for PaymentDefinition {
    fn from(coupon: CouponFixedAccruedCompounding) -> Self {
        PaymentDefinition::CouponFixedAccruedCompounding(coupon)
    }
}

impl From<CouponIbor> for PaymentDefinition {
    fn from(coupon: CouponIbor) -> Self {
        PaymentDefinition::CouponIbor(coupon)
    }
}

impl From<CouponIborSpread> for PaymentDefinition {
    fn from(coupon: CouponIborSpread) -> Self {
        PaymentDefinition::CouponIborSpread(coupon)
    }
}

impl From<CouponIborAverage> for PaymentDefinition {
    fn from(coupon: CouponIborAverage) -> Self {
        PaymentDefinition::CouponIborAverage(coupon)
    }
}

impl From<CouponIborInterpolated> for PaymentDefinition {
    fn from(coupon: CouponIborInterpolated) -> Self {
        PaymentDefinition::CouponIborInterpolated(coupon)
    }
}

impl From<CouponOvernightCompounded> for PaymentDefinition {
    fn from(coupon: CouponOvernightCompounded) -> Self {
        PaymentDefinition::CouponOvernightCompounded(coupon)
    }
}

impl From<CouponOvernightDailyCompounded> for PaymentDefinition {
    fn from(coupon: CouponOvernightDailyCompounded) -> Self {
        PaymentDefinition::CouponOvernightDailyCompounded(coupon)
    }
}

impl From<CouponOvernightArithmeticAverage> for PaymentDefinition {
    fn from(coupon: CouponOvernightArithmeticAverage) -> Self {
        PaymentDefinition::CouponOvernightArithmeticAverage(coupon)
    }
}
