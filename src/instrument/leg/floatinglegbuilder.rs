use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::instrument::annuity::annuitydefinition::AnnuityDefinition;
use crate::instrument::cashflowerror::CashFlowResult;
use crate::instrument::leg::couponstub::CouponStub;
use crate::instrument::leg::legconfiguration::LegConfiguration;
use crate::instrument::leg::legdates::LegDates;
use crate::instrument::payment::couponibor::{CouponIbor, CouponIborSpread};
use crate::instrument::payment::couponiboraverage::CouponIborInterpolated;
use crate::instrument::payment::couponovernight::{
    CouponOvernightArithmeticAverage, CouponOvernightCompounded, CouponOvernightDailyCompounded,
    OvernightAccrualMethod, OvernightFixings,
};
use crate::instrument::payment::paymentdefinition::PaymentDefinition;
use crate::interestrate::index::interestrateindex::InterestRateIndex;
use crate::time::schedule::relativedategenerator::RelativeDateAlignment;
use crate::time::schedule::scheduleperiod::AccrualPeriod;

/// Stub descriptor that governs period `i`, if that period is a stub.
fn stub_for_period<'a>(config: &'a LegConfiguration, dates: &LegDates, i: usize) -> Option<&'a CouponStub> {
    if i == 0 && dates.is_first_stub() {
        config.start_stub()
    } else if i + 1 == dates.len() && dates.is_last_stub() {
        config.end_stub()
    } else {
        None
    }
}

fn reset_date(index: &dyn InterestRateIndex, period: &AccrualPeriod, reset: RelativeDateAlignment) -> NaiveDate {
    let reference = match reset {
        RelativeDateAlignment::StartDate => period.start_date(),
        RelativeDateAlignment::EndDate => period.end_date(),
    };
    index.fixing_date_from_start(reference)
}

fn ibor_coupon(config: &LegConfiguration, dates: &LegDates, i: usize, sign: f64) -> CashFlowResult<PaymentDefinition> {
    let characters = dates.characters(config, i, sign)?;
    let period = &dates.periods()[i];
    let stub = stub_for_period(config, dates, i);

    if let Some((index1, index2)) = stub.and_then(|s| s.index1().zip(s.index2())) {
        if config.spread() != 0.0 {
            warn!(
                "interpolated stub {} to {} carries no spread; {} is dropped for it",
                period.start_date(),
                period.end_date(),
                config.spread()
            );
        }
        let fixing_date = reset_date(index1.as_ref(), period, config.reset_relative_to());
        return Ok(CouponIborInterpolated::new(characters, index1.clone(), index2.clone(), fixing_date)?.into());
    }

    let index: Arc<dyn InterestRateIndex> = match stub.and_then(CouponStub::index1) {
        Some(stub_index) => stub_index.clone(),
        None => config.index()?.clone(),
    };
    let fixing_date = reset_date(index.as_ref(), period, config.reset_relative_to());
    if config.spread() == 0.0 {
        Ok(CouponIbor::from_fixing_date(characters, index, fixing_date)?.into())
    } else {
        Ok(CouponIborSpread::from_fixing_date(characters, index, fixing_date, config.spread())?.into())
    }
}

/// Builds an Ibor leg. Fixings are set off the accrual start, or the accrual
/// end when the reset is in arrears; stub periods may fix on their own index
/// or interpolate between two.
pub fn build_ibor_annuity(config: &LegConfiguration) -> CashFlowResult<AnnuityDefinition> {
    let index_name = config.index()?.name().to_owned();
    let sign = config.sign()?;
    let dates = LegDates::from_configuration(config)?;
    let coupons = (0..dates.len())
        .map(|i| ibor_coupon(config, &dates, i, sign))
        .collect::<CashFlowResult<Vec<PaymentDefinition>>>()?;
    debug!("built Ibor leg on {}: {} coupons", index_name, coupons.len());
    dates.assemble(config, coupons, sign)
}

fn overnight_coupon(
    config: &LegConfiguration,
    dates: &LegDates,
    i: usize,
    sign: f64,
) -> CashFlowResult<PaymentDefinition> {
    let characters = dates.characters(config, i, sign)?;
    let period = &dates.periods()[i];
    let fixings = OvernightFixings::new(
        config.index()?.clone(),
        period.start_date(),
        period.end_date(),
        config.rate_cutoff(),
    )?;
    let coupon = match config.overnight_method() {
        OvernightAccrualMethod::Compounded => {
            CouponOvernightCompounded::new(characters, fixings, config.spread())?.into()
        }
        OvernightAccrualMethod::DailyCompounded => {
            if config.spread() != 0.0 {
                warn!("daily compounded overnight coupons carry no spread; {} is dropped", config.spread());
            }
            CouponOvernightDailyCompounded::new(characters, fixings)?.into()
        }
        OvernightAccrualMethod::ArithmeticAverage => {
            CouponOvernightArithmeticAverage::new(characters, fixings, config.spread())?.into()
        }
    };
    Ok(coupon)
}

/// Builds an overnight leg; every coupon steps the index calendar one
/// business day at a time over its accrual period.
pub fn build_overnight_annuity(config: &LegConfiguration) -> CashFlowResult<AnnuityDefinition> {
    let index_name = config.index()?.name().to_owned();
    let sign = config.sign()?;
    let dates = LegDates::from_configuration(config)?;
    let coupons = (0..dates.len())
        .map(|i| overnight_coupon(config, &dates, i, sign))
        .collect::<CashFlowResult<Vec<PaymentDefinition>>>()?;
    debug!(
        "built overnight leg on {} ({:?}): {} coupons",
        index_name,
        config.overnight_method(),
        coupons.len()
    );
    dates.assemble(config, coupons, sign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::cashflowerror::CashFlowError;
    use crate::instrument::notionalprovider::NotionalSchedule;
    use crate::interestrate::index::overnightrateindex::OvernightRateIndex;
    use crate::interestrate::index::termrateindex::TermRateIndex;
    use crate::market::currency::Currency;
    use crate::time::businessdayadjuster::{BusinessDayAdjuster, BusinessDayConvention};
    use crate::time::calendar::holidaycalendar::HolidayCalendar;
    use crate::time::calendar::simplecalendar::SimpleCalendar;
    use crate::time::daycounter::standarddaycounters::actual_360;
    use crate::time::period::Period;
    use crate::time::schedule::schedule::AdjustedDateParameters;
    use crate::time::schedule::stubadjuster::StubConvention;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> Arc<dyn HolidayCalendar> {
        Arc::new(SimpleCalendar::weekends_only())
    }

    fn euribor(tenor: Period) -> Arc<dyn InterestRateIndex> {
        Arc::new(TermRateIndex::new(
            format!("EURIBOR{tenor}"),
            Currency::new("EUR", 2),
            2,
            BusinessDayAdjuster::new(BusinessDayConvention::ModifiedFollowing, true),
            tenor,
            calendar(),
            actual_360(),
        ))
    }

    fn ibor_config(start: NaiveDate) -> LegConfiguration {
        let mut config = LegConfiguration::new();
        config
            .set_payer(false)
            .set_currency(Currency::new("EUR", 2))
            .set_day_counter(actual_360())
            .set_notional(NotionalSchedule::constant(1e6))
            .set_start_date(start)
            .set_end_date(ymd(2025, 1, 15))
            .set_accrual_frequency(Period::months(6))
            .set_accrual_parameters(AdjustedDateParameters::new(
                calendar(),
                BusinessDayAdjuster::new(BusinessDayConvention::ModifiedFollowing, false),
            ))
            .set_index(euribor(Period::months(6)));
        config
    }

    fn fixing_of(payment: &PaymentDefinition) -> (String, NaiveDate) {
        match payment {
            PaymentDefinition::CouponIbor(c) => (c.fixing().index().name().to_owned(), c.fixing().fixing_date()),
            PaymentDefinition::CouponIborSpread(c) => (c.fixing().index().name().to_owned(), c.fixing().fixing_date()),
            other => panic!("unexpected payment {other:?}"),
        }
    }

    #[test]
    fn test_fixing_dates_in_advance_and_in_arrears() {
        let mut config = ibor_config(ymd(2024, 1, 15));
        let leg = build_ibor_annuity(&config).unwrap();
        assert_eq!(leg.len(), 2);
        assert_eq!(fixing_of(&leg.payments()[0]).1, ymd(2024, 1, 11));
        assert_eq!(fixing_of(&leg.payments()[1]).1, ymd(2024, 7, 11));

        config.set_reset_relative_to(RelativeDateAlignment::EndDate).set_spread(0.001);
        let leg = build_ibor_annuity(&config).unwrap();
        assert!(matches!(leg.payments()[0], PaymentDefinition::CouponIborSpread(_)));
        assert_eq!(fixing_of(&leg.payments()[0]).1, ymd(2024, 7, 11));
    }

    #[test]
    fn test_stub_index_override() {
        let mut config = ibor_config(ymd(2024, 2, 1));
        config
            .set_start_stub(CouponStub::new(StubConvention::ShortStart).with_index(euribor(Period::months(3))))
            .unwrap();
        let leg = build_ibor_annuity(&config).unwrap();
        assert_eq!(fixing_of(&leg.payments()[0]), ("EURIBOR3M".to_owned(), ymd(2024, 1, 30)));
        assert_eq!(fixing_of(&leg.payments()[1]).0, "EURIBOR6M");
    }

    #[test]
    fn test_interpolated_stub() {
        let mut config = ibor_config(ymd(2024, 2, 1));
        config
            .set_start_stub(
                CouponStub::new(StubConvention::ShortStart)
                    .with_interpolated_indices(euribor(Period::months(3)), euribor(Period::months(6))),
            )
            .unwrap();
        let leg = build_ibor_annuity(&config).unwrap();
        match &leg.payments()[0] {
            PaymentDefinition::CouponIborInterpolated(c) => {
                let (w1, w2) = c.weights();
                assert!(w1 > 0.0 && w2 > 0.0);
                assert!((w1 + w2 - 1.0).abs() < 1e-12);
            }
            other => panic!("unexpected payment {other:?}"),
        }
        assert!(matches!(leg.payments()[1], PaymentDefinition::CouponIbor(_)));
    }

    #[test]
    fn test_currency_must_match_index() {
        let mut config = ibor_config(ymd(2024, 1, 15));
        config.set_currency(Currency::new("USD", 2));
        assert!(matches!(
            build_ibor_annuity(&config),
            Err(CashFlowError::CurrencyMismatch { .. })
        ));
    }

    fn overnight_config(method: OvernightAccrualMethod) -> LegConfiguration {
        let sofr: Arc<dyn InterestRateIndex> = Arc::new(OvernightRateIndex::new(
            "SOFR",
            Currency::new("USD", 2),
            1,
            calendar(),
            actual_360(),
        ));
        let mut config = LegConfiguration::new();
        config
            .set_payer(true)
            .set_currency(Currency::new("USD", 2))
            .set_day_counter(actual_360())
            .set_notional(NotionalSchedule::constant(1e6))
            .set_start_date(ymd(2024, 3, 1))
            .set_end_date(ymd(2024, 5, 1))
            .set_accrual_frequency(Period::months(1))
            .set_index(sofr)
            .set_overnight_method(method)
            .set_rate_cutoff(2);
        config
    }

    #[test]
    fn test_overnight_leg() {
        let leg = build_overnight_annuity(&overnight_config(OvernightAccrualMethod::ArithmeticAverage)).unwrap();
        assert_eq!(leg.len(), 2);
        match &leg.payments()[0] {
            PaymentDefinition::CouponOvernightArithmeticAverage(c) => {
                let fixing_dates = c.fixings().fixing_dates();
                let n = fixing_dates.len();
                // March 2024 has 21 weekdays
                assert_eq!(n, 21);
                assert_eq!(fixing_dates[n - 1], fixing_dates[n - 2]);
                assert!(c.characters().notional() < 0.0);
            }
            other => panic!("unexpected payment {other:?}"),
        }
        let leg = build_overnight_annuity(&overnight_config(OvernightAccrualMethod::DailyCompounded)).unwrap();
        assert!(matches!(leg.payments()[1], PaymentDefinition::CouponOvernightDailyCompounded(_)));
    }
}
