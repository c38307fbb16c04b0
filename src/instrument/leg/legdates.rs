use chrono::NaiveDate;
use log::debug;

use crate::instrument::annuity::annuitydefinition::AnnuityDefinition;
use crate::instrument::cashflowerror::CashFlowResult;
use crate::instrument::leg::legconfiguration::LegConfiguration;
use crate::instrument::notionalprovider::NotionalSchedule;
use crate::instrument::payment::couponcharacters::GenericCouponCharacters;
use crate::instrument::payment::couponfixed::CouponFixed;
use crate::instrument::payment::paymentdefinition::PaymentDefinition;
use crate::time::daycounter::accrualfraction::AccrualFractionResolver;
use crate::time::period::Period;
use crate::time::schedule::calculationperiodgenerator::CalculationPeriodGenerator;
use crate::time::schedule::relativedategenerator::RelativeDateGenerator;
use crate::time::schedule::schedule::{Schedule, ScheduleGenerator};
use crate::time::schedule::scheduleerror::ScheduleError;
use crate::time::schedule::scheduleperiod::{AccrualPeriod, CalculationPeriod};
use crate::time::schedule::stubadjuster::StubConvention;

/// Per-period dates, fractions and (unsigned) notionals of a leg, plus the
/// notional exchanges requested by the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LegDates {
    frequency: Period,
    periods: Vec<AccrualPeriod>,
    first_is_stub: bool,
    last_is_stub: bool,
    notionals: Vec<f64>,
    initial_exchange: Option<(NaiveDate, f64)>,
    final_exchange: Option<(NaiveDate, f64)>,
}

/// Schedule of a periodic leg; explicit stub dates come from the stub
/// descriptors.
fn generate_schedule(config: &LegConfiguration, frequency: Period) -> CashFlowResult<Schedule> {
    let start = config.start_date()?;
    let end = config.end_date()?;
    let convention = config.stub_convention()?;
    let accrual = config.accrual_parameters();
    let generator = ScheduleGenerator::new(
        CalculationPeriodGenerator::new(
            frequency,
            convention,
            accrual.adjuster().eom(),
            config.roll_date_adjuster().cloned(),
        ),
        accrual,
    )
    .with_start_parameters(config.start_parameters().cloned())
    .with_end_parameters(config.end_parameters().cloned());

    let first_regular_start = config.start_stub().and_then(|s| s.effective_date());
    let last_regular_end = config.end_stub().and_then(|s| s.effective_date());
    let schedule = match (convention, first_regular_start, last_regular_end) {
        (StubConvention::Both, Some(first), Some(last)) => generator.generate_with_stub_dates(start, first, last, end)?,
        (c, Some(first), _) if c.is_start_stub() => generator.generate_with_first_regular_start(start, first, end)?,
        (c, _, Some(last)) if c.is_end_stub() => generator.generate_with_last_regular_end(start, last, end)?,
        _ => generator.generate(start, end)?,
    };
    Ok(schedule)
}

impl LegDates {
    pub fn from_configuration(config: &LegConfiguration) -> CashFlowResult<LegDates> {
        let frequency = config.accrual_frequency()?;
        let day_counter = config.day_counter()?.clone();

        let (periods, first_is_stub, last_is_stub, resolver) = if frequency.is_zero() {
            // 零息：整段一期
            let start = config.start_date()?;
            let end = config.end_date()?;
            let accrual = config.accrual_parameters();
            let adjusted_start = config.start_parameters().unwrap_or(&accrual).adjust(start);
            let adjusted_end = config.end_parameters().unwrap_or(&accrual).adjust(end);
            if adjusted_start >= adjusted_end {
                return Err(ScheduleError::invalid_range(adjusted_start, adjusted_end).into());
            }
            (
                vec![CalculationPeriod::regular(adjusted_start, adjusted_end)],
                false,
                false,
                AccrualFractionResolver::regular(day_counter, None),
            )
        } else {
            let schedule = generate_schedule(config, frequency)?;
            let convention = schedule.stub_convention();
            // stub 標記只看 unadjusted periods
            let unadjusted = schedule.unadjusted_periods();
            let first_is_stub = unadjusted.first().is_some_and(CalculationPeriod::is_stub);
            let last_is_stub = unadjusted.last().is_some_and(CalculationPeriod::is_stub);
            let start_stub = if first_is_stub && (convention.is_start_stub() || convention == StubConvention::Both) {
                convention
            } else {
                StubConvention::None
            };
            let end_stub = if last_is_stub && (convention.is_end_stub() || convention == StubConvention::Both) {
                convention
            } else {
                StubConvention::None
            };
            (
                schedule.adjusted_periods().to_vec(),
                first_is_stub,
                last_is_stub,
                AccrualFractionResolver::new(day_counter, Some(frequency), start_stub, end_stub),
            )
        };

        let n = periods.len();
        let payment = config.payment_parameters();
        let payment_dates = RelativeDateGenerator::new(
            config.payment_relative_to(),
            *payment.adjuster(),
            config.payment_lag(),
        )
        .generate(&periods, payment.calendar());

        let periods = periods
            .iter()
            .zip(payment_dates)
            .enumerate()
            .map(|(i, (p, payment_date))| -> CashFlowResult<AccrualPeriod> {
                let fraction = resolver.fraction(p.start_date(), p.end_date(), i == 0, i + 1 == n)?;
                Ok(AccrualPeriod::new(p.start_date(), p.end_date(), payment_date, fraction))
            })
            .collect::<CashFlowResult<Vec<AccrualPeriod>>>()?;

        let mut dates = LegDates {
            frequency,
            periods,
            first_is_stub,
            last_is_stub,
            notionals: Vec::new(),
            initial_exchange: None,
            final_exchange: None,
        };
        dates.resolve_notionals(config.notional()?, config.initial_exchange(), config.final_exchange())?;
        debug!(
            "leg dates: {} periods from {:?} to {:?}, frequency {}",
            dates.len(),
            dates.start_date(),
            dates.end_date(),
            frequency
        );
        Ok(dates)
    }

    /// Notional per coupon and per exchange. A date-less variable schedule is
    /// bound to `[start if initial] + accrual starts + [end if final]` and
    /// read by position; a dated one is read by date.
    fn resolve_notionals(&mut self, notional: &NotionalSchedule, initial: bool, final_: bool) -> CashFlowResult<()> {
        let starts = self.accrual_start_dates();
        let (Some(start), Some(end)) = (self.start_date(), self.end_date()) else {
            return Ok(());
        };
        let mut exchange_dates = Vec::with_capacity(starts.len() + 2);
        if initial {
            exchange_dates.push(start);
        }
        exchange_dates.extend(starts.iter().copied());
        if final_ {
            exchange_dates.push(end);
        }

        let positional = !notional.is_materialized();
        let notional = notional.materialize(&exchange_dates)?;
        let offset = usize::from(initial);
        self.notionals = starts
            .iter()
            .enumerate()
            .map(|(i, d)| if positional { notional.amount_at(offset + i) } else { Ok(notional.amount(*d)) })
            .collect::<CashFlowResult<Vec<f64>>>()?;
        if initial {
            let amount = if positional { notional.amount_at(0)? } else { notional.amount(start) };
            self.initial_exchange = Some((start, amount));
        }
        if final_ {
            let amount = if positional {
                notional.amount_at(exchange_dates.len() - 1)?
            } else {
                notional.amount(end)
            };
            self.final_exchange = Some((end, amount));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn frequency(&self) -> Period {
        self.frequency
    }

    pub fn periods(&self) -> &[AccrualPeriod] {
        &self.periods
    }

    pub fn accrual_start_dates(&self) -> Vec<NaiveDate> {
        self.periods.iter().map(AccrualPeriod::start_date).collect()
    }

    pub fn accrual_end_dates(&self) -> Vec<NaiveDate> {
        self.periods.iter().map(AccrualPeriod::end_date).collect()
    }

    pub fn payment_dates(&self) -> Vec<NaiveDate> {
        self.periods.iter().map(AccrualPeriod::payment_date).collect()
    }

    pub fn accrual_fractions(&self) -> Vec<f64> {
        self.periods.iter().map(AccrualPeriod::accrual_fraction).collect()
    }

    pub fn notionals(&self) -> &[f64] {
        &self.notionals
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.periods.first().map(AccrualPeriod::start_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.periods.last().map(AccrualPeriod::end_date)
    }

    /// Whether the unadjusted first period is a stub.
    pub fn is_first_stub(&self) -> bool {
        self.first_is_stub
    }

    pub fn is_last_stub(&self) -> bool {
        self.last_is_stub
    }

    /// Shared record of coupon `i`, notional signed by `sign`.
    pub fn characters(&self, config: &LegConfiguration, i: usize, sign: f64) -> CashFlowResult<GenericCouponCharacters> {
        let period = &self.periods[i];
        GenericCouponCharacters::new(
            config.currency()?.clone(),
            period.payment_date(),
            period.start_date(),
            period.end_date(),
            period.accrual_fraction(),
            sign * self.notionals[i],
        )
    }

    /// Wraps the coupons into an annuity, the initial exchange first with the
    /// opposite sign and the final exchange last with the leg sign.
    pub fn assemble(
        &self,
        config: &LegConfiguration,
        coupons: Vec<PaymentDefinition>,
        sign: f64,
    ) -> CashFlowResult<AnnuityDefinition> {
        let currency = config.currency()?;
        let mut payments = Vec::with_capacity(coupons.len() + 2);
        if let Some((date, notional)) = self.initial_exchange {
            payments.push(CouponFixed::notional_exchange(currency.clone(), date, -sign * notional)?.into());
        }
        payments.extend(coupons);
        if let Some((date, notional)) = self.final_exchange {
            payments.push(CouponFixed::notional_exchange(currency.clone(), date, sign * notional)?.into());
        }
        AnnuityDefinition::new(payments, config.calendar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::cashflowerror::CashFlowError;
    use crate::market::currency::Currency;
    use crate::time::daycounter::standarddaycounters::actual_360;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(notional: NotionalSchedule) -> LegConfiguration {
        let mut config = LegConfiguration::new();
        config
            .set_payer(false)
            .set_currency(Currency::new("USD", 2))
            .set_day_counter(actual_360())
            .set_notional(notional)
            .set_start_date(ymd(2024, 1, 15))
            .set_end_date(ymd(2025, 1, 15))
            .set_accrual_frequency(Period::months(6));
        config
    }

    #[test]
    fn test_periodic_dates() {
        let dates = LegDates::from_configuration(&config(NotionalSchedule::constant(1e6))).unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates.accrual_start_dates(), vec![ymd(2024, 1, 15), ymd(2024, 7, 15)]);
        assert_eq!(dates.payment_dates(), vec![ymd(2024, 7, 15), ymd(2025, 1, 15)]);
        assert_relative_eq!(dates.accrual_fractions()[0], 182.0 / 360.0);
        assert_eq!(dates.notionals(), &[1e6, 1e6]);
        assert!(!dates.is_first_stub());
    }

    #[test]
    fn test_zero_frequency_is_one_period() {
        let mut config = config(NotionalSchedule::constant(1e6));
        config.set_accrual_frequency(Period::zero());
        let dates = LegDates::from_configuration(&config).unwrap();
        assert_eq!(dates.len(), 1);
        assert_relative_eq!(dates.accrual_fractions()[0], 366.0 / 360.0);
    }

    #[test]
    fn test_positional_notionals_with_exchange() {
        let mut config = config(NotionalSchedule::amounts(vec![100.0, 100.0, 80.0, 80.0]).unwrap());
        config.set_exchange_notional(true, true);
        let dates = LegDates::from_configuration(&config).unwrap();
        assert_eq!(dates.notionals(), &[100.0, 80.0]);
        assert_eq!(dates.initial_exchange, Some((ymd(2024, 1, 15), 100.0)));
        assert_eq!(dates.final_exchange, Some((ymd(2025, 1, 15), 80.0)));
    }

    #[test]
    fn test_dated_notionals() {
        let notional = NotionalSchedule::variable(vec![ymd(2024, 1, 15), ymd(2024, 7, 1)], vec![100.0, 50.0]).unwrap();
        let dates = LegDates::from_configuration(&config(notional)).unwrap();
        assert_eq!(dates.notionals(), &[100.0, 50.0]);
    }

    #[test]
    fn test_notional_count_mismatch() {
        let mut config = config(NotionalSchedule::amounts(vec![100.0, 80.0]).unwrap());
        config.set_exchange_notional(true, false);
        assert_eq!(
            LegDates::from_configuration(&config).unwrap_err(),
            CashFlowError::NotionalDateCountMismatch { dates: 3, notionals: 2 }
        );
    }
}
