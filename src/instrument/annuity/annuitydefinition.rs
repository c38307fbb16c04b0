use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::instrument::annuity::annuityderivative::AnnuityDerivative;
use crate::instrument::cashflowerror::{CashFlowError, CashFlowResult};
use crate::instrument::payment::paymentdefinition::PaymentDefinition;
use crate::interestrate::index::fixingseries::FixingStore;
use crate::market::currency::Currency;
use crate::time::calendar::holidaycalendar::HolidayCalendar;

/// 單一幣別、依序排列且非空的 payment 序列。建立後不可變，trim 回傳新的 annuity。
#[derive(Clone)]
pub struct AnnuityDefinition {
    payments: Vec<PaymentDefinition>,
    calendar: Option<Arc<dyn HolidayCalendar>>,
}

impl AnnuityDefinition {
    pub fn new(
        payments: Vec<PaymentDefinition>,
        calendar: Option<Arc<dyn HolidayCalendar>>,
    ) -> CashFlowResult<AnnuityDefinition> {
        let first = payments.first().ok_or(CashFlowError::EmptyPayments)?;
        let currency = first.currency();
        if let Some(other) = payments.iter().map(PaymentDefinition::currency).find(|c| *c != currency) {
            return Err(CashFlowError::CurrencyMismatch {
                expected: currency.code().to_owned(),
                found: other.code().to_owned(),
            });
        }
        Ok(AnnuityDefinition { payments, calendar })
    }

    pub fn payments(&self) -> &[PaymentDefinition] {
        &self.payments
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn currency(&self) -> &Currency {
        self.payments[0].currency()
    }

    /// Calendar the leg was built with, if any.
    pub fn calendar(&self) -> Option<&Arc<dyn HolidayCalendar>> {
        self.calendar.as_ref()
    }

    /// Sign of the first payment's reference amount.
    ///
    /// Unreliable for legs that start with a notional exchange or mix signs;
    /// read the signed notional of each payment instead.
    #[deprecated(note = "read the signed notional of each payment")]
    pub fn is_payer(&self) -> bool {
        let first_negative = self.payments[0].reference_amount() < 0.0;
        if self.payments.iter().any(|p| (p.reference_amount() < 0.0) != first_negative) {
            warn!("annuity in {} mixes paid and received payments; is_payer follows the first one", self.currency());
        }
        first_negative
    }

    fn filtered(&self, date: NaiveDate, keep: impl Fn(&PaymentDefinition) -> bool) -> CashFlowResult<AnnuityDefinition> {
        let payments: Vec<PaymentDefinition> = self.payments.iter().filter(|p| keep(p)).cloned().collect();
        if payments.is_empty() {
            return Err(CashFlowError::EmptyAnnuity { date });
        }
        Ok(AnnuityDefinition {
            payments,
            calendar: self.calendar.clone(),
        })
    }

    /// Payments paid strictly after `date`.
    pub fn trim_before(&self, date: NaiveDate) -> CashFlowResult<AnnuityDefinition> {
        self.filtered(date, |p| p.payment_date() > date)
    }

    /// Payments paid on or before `date`.
    pub fn trim_after(&self, date: NaiveDate) -> CashFlowResult<AnnuityDefinition> {
        self.filtered(date, |p| p.payment_date() <= date)
    }

    /// Projects every payment not yet paid at `valuation_date`.
    pub fn to_derivative(
        &self,
        valuation_date: NaiveDate,
        fixings: Option<&FixingStore>,
    ) -> CashFlowResult<AnnuityDerivative> {
        let payments = self
            .payments
            .iter()
            .filter(|p| valuation_date <= p.payment_date())
            .map(|p| p.to_derivative(valuation_date, fixings))
            .collect::<CashFlowResult<Vec<_>>>()?;
        debug!(
            "projected {} of {} payments to {}",
            payments.len(),
            self.payments.len(),
            valuation_date
        );
        Ok(AnnuityDerivative::new(payments))
    }
}

impl fmt::Debug for AnnuityDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnuityDefinition")
            .field("payments", &self.payments)
            .field("has_calendar", &self.calendar.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::payment::couponcharacters::GenericCouponCharacters;
    use crate::instrument::payment::couponfixed::CouponFixed;
    use crate::instrument::payment::paymentfixed::PaymentFixed;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn coupon(end: NaiveDate, notional: f64) -> PaymentDefinition {
        let start = end - chrono::Days::new(90);
        let characters =
            GenericCouponCharacters::new(Currency::new("USD", 2), end, start, end, 0.25, notional).unwrap();
        CouponFixed::new(characters, 0.03).into()
    }

    fn annuity() -> AnnuityDefinition {
        AnnuityDefinition::new(
            vec![
                coupon(ymd(2024, 4, 15), -100.0),
                coupon(ymd(2024, 7, 15), -100.0),
                coupon(ymd(2024, 10, 15), -100.0),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_construction_checks() {
        assert_eq!(AnnuityDefinition::new(vec![], None).unwrap_err(), CashFlowError::EmptyPayments);
        let mixed = vec![
            coupon(ymd(2024, 4, 15), 1.0),
            PaymentFixed::new(Currency::new("EUR", 2), ymd(2024, 5, 1), 1.0).into(),
        ];
        assert_eq!(
            AnnuityDefinition::new(mixed, None).unwrap_err(),
            CashFlowError::CurrencyMismatch {
                expected: "USD".to_owned(),
                found: "EUR".to_owned()
            }
        );
    }

    #[test]
    fn test_trim() {
        let leg = annuity();
        assert_eq!(leg.trim_before(ymd(2024, 7, 15)).unwrap().len(), 1);
        assert_eq!(leg.trim_before(ymd(2024, 7, 14)).unwrap().len(), 2);
        assert_eq!(
            leg.trim_before(ymd(2024, 10, 15)).unwrap_err(),
            CashFlowError::EmptyAnnuity { date: ymd(2024, 10, 15) }
        );
        assert_eq!(leg.trim_after(ymd(2024, 7, 15)).unwrap().len(), 2);
        assert!(leg.trim_after(ymd(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_projection_window() {
        let leg = annuity();
        assert_eq!(leg.to_derivative(ymd(2024, 1, 1), None).unwrap().len(), 3);
        // paid on the valuation date still counts
        assert_eq!(leg.to_derivative(ymd(2024, 7, 15), None).unwrap().len(), 2);
        assert!(leg.to_derivative(ymd(2024, 10, 16), None).unwrap().is_empty());
    }

    #[test]
    #[allow(deprecated)]
    fn test_is_payer_reads_first_payment() {
        assert!(annuity().is_payer());
        let mixed = AnnuityDefinition::new(
            vec![coupon(ymd(2024, 4, 15), 100.0), coupon(ymd(2024, 7, 15), -100.0)],
            None,
        )
        .unwrap();
        assert!(!mixed.is_payer());
    }
}
