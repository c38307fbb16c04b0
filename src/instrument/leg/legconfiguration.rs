use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::instrument::cashflowerror::{CashFlowError, CashFlowResult};
use crate::instrument::leg::couponstub::CouponStub;
use crate::instrument::notionalprovider::NotionalSchedule;
use crate::instrument::payment::couponovernight::OvernightAccrualMethod;
use crate::interestrate::index::interestrateindex::InterestRateIndex;
use crate::market::currency::Currency;
use crate::time::businessdayadjuster::BusinessDayAdjuster;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::calendar::simplecalendar::SimpleCalendar;
use crate::time::daycounter::daycounter::DayCounter;
use crate::time::period::Period;
use crate::time::rolldateadjuster::RollDateAdjuster;
use crate::time::schedule::relativedategenerator::RelativeDateAlignment;
use crate::time::schedule::schedule::AdjustedDateParameters;
use crate::time::schedule::stubadjuster::StubConvention;

/// Zero-coupon fixed legs: straight compounding over annual sub-periods, or
/// `(1 + r)^δ` over the whole period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CompoundingMethod {
    Straight,
    Accrued,
}

// ─────────────────────────────────────────────────────────────────────────────
// LegConfiguration
// ─────────────────────────────────────────────────────────────────────────────

/// Economics of one leg, filled through setters and consumed by the
/// `build_*_annuity` functions.
///
/// Required: payer, day counter, currency, notional, start and end dates and
/// the accrual frequency (`Period::zero()` for a single coupon). Everything
/// else has a default.
#[derive(Clone)]
pub struct LegConfiguration {
    payer: Option<bool>,
    day_counter: Option<DayCounter>,
    currency: Option<Currency>,
    notional: Option<NotionalSchedule>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    accrual_frequency: Option<Period>,
    start_stub: Option<CouponStub>,
    end_stub: Option<CouponStub>,
    roll_date_adjuster: Option<Arc<dyn RollDateAdjuster>>,
    initial_exchange: bool,
    final_exchange: bool,
    accrual_parameters: Option<AdjustedDateParameters>,
    start_parameters: Option<AdjustedDateParameters>,
    end_parameters: Option<AdjustedDateParameters>,
    payment_parameters: Option<AdjustedDateParameters>,
    payment_relative_to: RelativeDateAlignment,
    payment_lag: i32,
    compounding_method: Option<CompoundingMethod>,
    fixed_rate: Option<f64>,

    // ── floating ──
    index: Option<Arc<dyn InterestRateIndex>>,
    reset_relative_to: RelativeDateAlignment,
    spread: f64,
    overnight_method: OvernightAccrualMethod,
    rate_cutoff: Option<usize>,
}

impl LegConfiguration {
    pub fn new() -> LegConfiguration {
        LegConfiguration {
            payer: None,
            day_counter: None,
            currency: None,
            notional: None,
            start_date: None,
            end_date: None,
            accrual_frequency: None,
            start_stub: None,
            end_stub: None,
            roll_date_adjuster: None,
            initial_exchange: false,
            final_exchange: false,
            accrual_parameters: None,
            start_parameters: None,
            end_parameters: None,
            payment_parameters: None,
            payment_relative_to: RelativeDateAlignment::EndDate,
            payment_lag: 0,
            compounding_method: None,
            fixed_rate: None,
            index: None,
            reset_relative_to: RelativeDateAlignment::StartDate,
            spread: 0.0,
            overnight_method: OvernightAccrualMethod::Compounded,
            rate_cutoff: None,
        }
    }

    // ── required ──────────────────────────────────────────────────────────

    pub fn set_payer(&mut self, payer: bool) -> &mut Self {
        self.payer = Some(payer);
        self
    }

    pub fn set_day_counter(&mut self, day_counter: DayCounter) -> &mut Self {
        self.day_counter = Some(day_counter);
        self
    }

    pub fn set_currency(&mut self, currency: Currency) -> &mut Self {
        self.currency = Some(currency);
        self
    }

    pub fn set_notional(&mut self, notional: NotionalSchedule) -> &mut Self {
        self.notional = Some(notional);
        self
    }

    pub fn set_start_date(&mut self, start_date: NaiveDate) -> &mut Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn set_end_date(&mut self, end_date: NaiveDate) -> &mut Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn set_accrual_frequency(&mut self, frequency: Period) -> &mut Self {
        self.accrual_frequency = Some(frequency);
        self
    }

    // ── stubs ─────────────────────────────────────────────────────────────

    /// Sets the start stub. A start stub other than `None`/`Both` clears the
    /// end stub; end-side stub types are rejected.
    pub fn set_start_stub(&mut self, stub: CouponStub) -> CashFlowResult<&mut Self> {
        if stub.stub_type().is_end_stub() {
            return Err(CashFlowError::invalid_stub(format!(
                "{:?} cannot describe the start of a leg",
                stub.stub_type()
            )));
        }
        if stub.is_exclusive() {
            self.end_stub = None;
        }
        self.start_stub = Some(stub);
        Ok(self)
    }

    /// Mirror of [`set_start_stub`](LegConfiguration::set_start_stub).
    pub fn set_end_stub(&mut self, stub: CouponStub) -> CashFlowResult<&mut Self> {
        if stub.stub_type().is_start_stub() {
            return Err(CashFlowError::invalid_stub(format!(
                "{:?} cannot describe the end of a leg",
                stub.stub_type()
            )));
        }
        if stub.is_exclusive() {
            self.start_stub = None;
        }
        self.end_stub = Some(stub);
        Ok(self)
    }

    // ── optional ──────────────────────────────────────────────────────────

    pub fn set_roll_date_adjuster(&mut self, roll_date_adjuster: Arc<dyn RollDateAdjuster>) -> &mut Self {
        self.roll_date_adjuster = Some(roll_date_adjuster);
        self
    }

    pub fn set_exchange_notional(&mut self, initial: bool, final_: bool) -> &mut Self {
        self.initial_exchange = initial;
        self.final_exchange = final_;
        self
    }

    pub fn set_accrual_parameters(&mut self, parameters: AdjustedDateParameters) -> &mut Self {
        self.accrual_parameters = Some(parameters);
        self
    }

    pub fn set_start_parameters(&mut self, parameters: AdjustedDateParameters) -> &mut Self {
        self.start_parameters = Some(parameters);
        self
    }

    pub fn set_end_parameters(&mut self, parameters: AdjustedDateParameters) -> &mut Self {
        self.end_parameters = Some(parameters);
        self
    }

    pub fn set_payment_parameters(&mut self, parameters: AdjustedDateParameters) -> &mut Self {
        self.payment_parameters = Some(parameters);
        self
    }

    pub fn set_payment_relative_to(&mut self, alignment: RelativeDateAlignment) -> &mut Self {
        self.payment_relative_to = alignment;
        self
    }

    /// Business days between the reference date and the payment date.
    pub fn set_payment_lag(&mut self, lag: i32) -> &mut Self {
        self.payment_lag = lag;
        self
    }

    pub fn set_compounding_method(&mut self, method: CompoundingMethod) -> &mut Self {
        self.compounding_method = Some(method);
        self
    }

    pub fn set_fixed_rate(&mut self, rate: f64) -> &mut Self {
        self.fixed_rate = Some(rate);
        self
    }

    pub fn set_index(&mut self, index: Arc<dyn InterestRateIndex>) -> &mut Self {
        self.index = Some(index);
        self
    }

    /// `EndDate` fixes in arrears.
    pub fn set_reset_relative_to(&mut self, alignment: RelativeDateAlignment) -> &mut Self {
        self.reset_relative_to = alignment;
        self
    }

    pub fn set_spread(&mut self, spread: f64) -> &mut Self {
        self.spread = spread;
        self
    }

    pub fn set_overnight_method(&mut self, method: OvernightAccrualMethod) -> &mut Self {
        self.overnight_method = method;
        self
    }

    pub fn set_rate_cutoff(&mut self, cutoff: usize) -> &mut Self {
        self.rate_cutoff = Some(cutoff);
        self
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn payer(&self) -> CashFlowResult<bool> {
        self.payer.ok_or(CashFlowError::missing_field("payer"))
    }

    /// −1 for a payer leg, +1 for a receiver leg.
    pub fn sign(&self) -> CashFlowResult<f64> {
        Ok(if self.payer()? { -1.0 } else { 1.0 })
    }

    pub fn day_counter(&self) -> CashFlowResult<&DayCounter> {
        self.day_counter.as_ref().ok_or(CashFlowError::missing_field("day_counter"))
    }

    pub fn currency(&self) -> CashFlowResult<&Currency> {
        self.currency.as_ref().ok_or(CashFlowError::missing_field("currency"))
    }

    pub fn notional(&self) -> CashFlowResult<&NotionalSchedule> {
        self.notional.as_ref().ok_or(CashFlowError::missing_field("notional"))
    }

    pub fn start_date(&self) -> CashFlowResult<NaiveDate> {
        self.start_date.ok_or(CashFlowError::missing_field("start_date"))
    }

    pub fn end_date(&self) -> CashFlowResult<NaiveDate> {
        self.end_date.ok_or(CashFlowError::missing_field("end_date"))
    }

    pub fn accrual_frequency(&self) -> CashFlowResult<Period> {
        self.accrual_frequency.ok_or(CashFlowError::missing_field("accrual_frequency"))
    }

    /// Accrual calendar and adjuster; unadjusted on a weekends-only calendar
    /// when not set.
    pub fn accrual_parameters(&self) -> AdjustedDateParameters {
        match &self.accrual_parameters {
            Some(parameters) => parameters.clone(),
            None => AdjustedDateParameters::new(
                Arc::new(SimpleCalendar::weekends_only()),
                BusinessDayAdjuster::unadjusted(),
            ),
        }
    }

    /// Calendar the leg is built on, when one was configured.
    pub fn calendar(&self) -> Option<Arc<dyn HolidayCalendar>> {
        self.accrual_parameters.as_ref().map(|p| p.calendar().clone())
    }

    pub fn start_parameters(&self) -> Option<&AdjustedDateParameters> {
        self.start_parameters.as_ref()
    }

    pub fn end_parameters(&self) -> Option<&AdjustedDateParameters> {
        self.end_parameters.as_ref()
    }

    /// Payment dates fall back to the accrual calendar and adjuster.
    pub fn payment_parameters(&self) -> AdjustedDateParameters {
        match &self.payment_parameters {
            Some(parameters) => parameters.clone(),
            None => self.accrual_parameters(),
        }
    }

    pub fn start_stub(&self) -> Option<&CouponStub> {
        self.start_stub.as_ref()
    }

    pub fn end_stub(&self) -> Option<&CouponStub> {
        self.end_stub.as_ref()
    }

    pub fn roll_date_adjuster(&self) -> Option<&Arc<dyn RollDateAdjuster>> {
        self.roll_date_adjuster.as_ref()
    }

    pub fn initial_exchange(&self) -> bool {
        self.initial_exchange
    }

    pub fn final_exchange(&self) -> bool {
        self.final_exchange
    }

    pub fn payment_relative_to(&self) -> RelativeDateAlignment {
        self.payment_relative_to
    }

    pub fn payment_lag(&self) -> i32 {
        self.payment_lag
    }

    pub fn compounding_method(&self) -> Option<CompoundingMethod> {
        self.compounding_method
    }

    pub fn fixed_rate(&self) -> CashFlowResult<f64> {
        self.fixed_rate.ok_or(CashFlowError::missing_field("fixed_rate"))
    }

    pub fn index(&self) -> CashFlowResult<&Arc<dyn InterestRateIndex>> {
        self.index.as_ref().ok_or(CashFlowError::missing_field("index"))
    }

    pub fn reset_relative_to(&self) -> RelativeDateAlignment {
        self.reset_relative_to
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn overnight_method(&self) -> OvernightAccrualMethod {
        self.overnight_method
    }

    pub fn rate_cutoff(&self) -> Option<usize> {
        self.rate_cutoff
    }

    /// Schedule stub convention implied by the stub descriptors. A leg
    /// without any descriptor gets a short start stub.
    pub fn stub_convention(&self) -> CashFlowResult<StubConvention> {
        let start = self.start_stub.as_ref().map(CouponStub::stub_type);
        let end = self.end_stub.as_ref().map(CouponStub::stub_type);
        match (start, end) {
            (Some(StubConvention::Both), _) | (_, Some(StubConvention::Both)) => {
                let start_date = self.start_stub.as_ref().and_then(CouponStub::effective_date);
                let end_date = self.end_stub.as_ref().and_then(CouponStub::effective_date);
                if start != Some(StubConvention::Both) || end != Some(StubConvention::Both) {
                    return Err(CashFlowError::invalid_stub("Both needs a Both stub at each end"));
                }
                if start_date.is_none() || end_date.is_none() {
                    return Err(CashFlowError::invalid_stub("Both needs an effective date at each end"));
                }
                Ok(StubConvention::Both)
            }
            (Some(convention), _) if convention.is_start_stub() => Ok(convention),
            (_, Some(convention)) if convention.is_end_stub() => Ok(convention),
            (Some(StubConvention::None), _) | (_, Some(StubConvention::None)) => Ok(StubConvention::None),
            _ => Ok(StubConvention::ShortStart),
        }
    }
}

impl Default for LegConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LegConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegConfiguration")
            .field("payer", &self.payer)
            .field("currency", &self.currency)
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("accrual_frequency", &self.accrual_frequency)
            .field("start_stub", &self.start_stub)
            .field("end_stub", &self.end_stub)
            .field("roll_date_adjuster", &self.roll_date_adjuster.as_ref().map(|r| r.name()))
            .field("index", &self.index.as_ref().map(|i| i.name().to_owned()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_required_field() {
        let mut config = LegConfiguration::new();
        config.set_payer(true);
        assert!(config.sign().unwrap() < 0.0);
        assert_eq!(config.currency().unwrap_err(), CashFlowError::MissingField { field: "currency" });
        assert_eq!(config.fixed_rate().unwrap_err(), CashFlowError::MissingField { field: "fixed_rate" });
    }

    #[test]
    fn test_stub_mutual_exclusion() {
        let mut config = LegConfiguration::new();
        config.set_end_stub(CouponStub::new(StubConvention::ShortEnd)).unwrap();
        config.set_start_stub(CouponStub::new(StubConvention::LongStart)).unwrap();
        assert!(config.end_stub().is_none());
        assert_eq!(config.stub_convention().unwrap(), StubConvention::LongStart);

        config.set_end_stub(CouponStub::new(StubConvention::LongEnd)).unwrap();
        assert!(config.start_stub().is_none());
        assert_eq!(config.stub_convention().unwrap(), StubConvention::LongEnd);

        assert!(config.set_start_stub(CouponStub::new(StubConvention::ShortEnd)).is_err());
    }

    #[test]
    fn test_both_needs_dates_at_each_end() {
        let mut config = LegConfiguration::new();
        config
            .set_start_stub(CouponStub::new(StubConvention::Both).with_effective_date(ymd(2024, 3, 15)))
            .unwrap();
        assert!(matches!(
            config.stub_convention(),
            Err(CashFlowError::InvalidStubCombination { .. })
        ));
        config.set_end_stub(CouponStub::new(StubConvention::Both)).unwrap();
        assert!(config.stub_convention().is_err());
        config
            .set_end_stub(CouponStub::new(StubConvention::Both).with_effective_date(ymd(2025, 3, 15)))
            .unwrap();
        assert_eq!(config.stub_convention().unwrap(), StubConvention::Both);
    }

    #[test]
    fn test_default_stub_is_short_start() {
        assert_eq!(LegConfiguration::new().stub_convention().unwrap(), StubConvention::ShortStart);
    }
}
