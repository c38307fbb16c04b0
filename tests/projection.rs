use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use chrono::NaiveDate;

use compfin_cashflow::instrument::annuity::annuitydefinition::AnnuityDefinition;
use compfin_cashflow::instrument::cashflowerror::CashFlowError;
use compfin_cashflow::instrument::derivative::paymentderivative::PaymentDerivative;
use compfin_cashflow::instrument::leg::floatinglegbuilder::{build_ibor_annuity, build_overnight_annuity};
use compfin_cashflow::instrument::leg::legconfiguration::LegConfiguration;
use compfin_cashflow::instrument::notionalprovider::NotionalSchedule;
use compfin_cashflow::instrument::payment::couponovernight::OvernightAccrualMethod;
use compfin_cashflow::interestrate::index::fixingseries::{DateFixingSeries, FixingStore};
use compfin_cashflow::interestrate::index::interestrateindex::InterestRateIndex;
use compfin_cashflow::interestrate::index::overnightrateindex::OvernightRateIndex;
use compfin_cashflow::interestrate::index::termrateindex::TermRateIndex;
use compfin_cashflow::market::currency::Currency;
use compfin_cashflow::time::businessdayadjuster::{BusinessDayAdjuster, BusinessDayConvention};
use compfin_cashflow::time::calendar::holidaycalendar::HolidayCalendar;
use compfin_cashflow::time::calendar::simplecalendar::SimpleCalendar;
use compfin_cashflow::time::daycounter::standarddaycounters::actual_360;
use compfin_cashflow::time::period::Period;
use compfin_cashflow::time::schedule::schedule::AdjustedDateParameters;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn calendar() -> Arc<dyn HolidayCalendar> {
    Arc::new(SimpleCalendar::weekends_only())
}

fn euribor6m() -> Arc<dyn InterestRateIndex> {
    Arc::new(TermRateIndex::new(
        "EURIBOR6M",
        Currency::new("EUR", 2),
        2,
        BusinessDayAdjuster::new(BusinessDayConvention::ModifiedFollowing, false),
        Period::months(6),
        calendar(),
        actual_360(),
    ))
}

fn ibor_leg() -> AnnuityDefinition {
    let mut config = LegConfiguration::new();
    config
        .set_payer(false)
        .set_currency(Currency::new("EUR", 2))
        .set_day_counter(actual_360())
        .set_notional(NotionalSchedule::constant(1e6))
        .set_start_date(ymd(2024, 1, 15))
        .set_end_date(ymd(2025, 1, 15))
        .set_accrual_frequency(Period::months(6))
        .set_accrual_parameters(AdjustedDateParameters::new(
            calendar(),
            BusinessDayAdjuster::new(BusinessDayConvention::ModifiedFollowing, false),
        ))
        .set_index(euribor6m());
    build_ibor_annuity(&config).unwrap()
}

fn euribor_fixings() -> FixingStore {
    FixingStore::new().with_series(
        "EURIBOR6M",
        Arc::new(DateFixingSeries::new().with_fixing(ymd(2024, 1, 11), 0.039)),
    )
}

#[test]
fn projection_before_start_keeps_every_payment_floating() {
    let leg = ibor_leg();
    let derivative = leg.to_derivative(ymd(2023, 12, 1), None).unwrap();
    assert_eq!(derivative.len(), leg.len());
    assert!(derivative.payments().iter().all(|p| !p.is_fixed()));
    let times = derivative.payment_times();
    assert!(times[0] > 0.0 && times[0] < times[1]);
}

#[test]
fn projection_after_end_is_empty() {
    let leg = ibor_leg();
    let derivative = leg.to_derivative(ymd(2025, 2, 3), None).unwrap();
    assert!(derivative.is_empty());
}

#[test]
fn past_fixing_is_resolved_from_the_store() {
    let leg = ibor_leg();
    let derivative = leg.to_derivative(ymd(2024, 3, 1), Some(&euribor_fixings())).unwrap();
    assert_eq!(derivative.len(), 2);
    assert_relative_eq!(derivative.payments()[0].fixed_amount().unwrap(), 1e6 * 0.039 * 182.0 / 360.0);
    assert!(!derivative.payments()[1].is_fixed());
}

#[test]
fn past_fixing_without_store_is_an_error() {
    let leg = ibor_leg();
    assert!(matches!(
        leg.to_derivative(ymd(2024, 3, 1), None),
        Err(CashFlowError::FixingSeriesMissing { .. })
    ));
}

#[test]
fn trimmed_leg_projects_the_remaining_payments() {
    let leg = ibor_leg().trim_before(ymd(2024, 7, 15)).unwrap();
    assert_eq!(leg.len(), 1);
    let derivative = leg.to_derivative(ymd(2024, 3, 1), None).unwrap();
    assert_eq!(derivative.len(), 1);
    assert!(matches!(
        ibor_leg().trim_before(ymd(2025, 1, 15)),
        Err(CashFlowError::EmptyAnnuity { .. })
    ));
}

#[test]
fn concurrent_projection_matches_sequential() {
    let leg = Arc::new(ibor_leg());
    let store = Arc::new(euribor_fixings());
    let expected = leg.to_derivative(ymd(2024, 3, 1), Some(&store)).unwrap();
    thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let leg = Arc::clone(&leg);
                let store = Arc::clone(&store);
                s.spawn(move || leg.to_derivative(ymd(2024, 3, 1), Some(&store)).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn overnight_coupon_accrues_known_fixings() {
    let sofr: Arc<dyn InterestRateIndex> = Arc::new(OvernightRateIndex::new(
        "SOFR",
        Currency::new("USD", 2),
        1,
        calendar(),
        actual_360(),
    ));
    let mut config = LegConfiguration::new();
    config
        .set_payer(false)
        .set_currency(Currency::new("USD", 2))
        .set_day_counter(actual_360())
        .set_notional(NotionalSchedule::constant(1e6))
        .set_start_date(ymd(2024, 3, 1))
        .set_end_date(ymd(2024, 4, 1))
        .set_accrual_frequency(Period::months(1))
        .set_index(sofr)
        .set_overnight_method(OvernightAccrualMethod::Compounded);
    let leg = build_overnight_annuity(&config).unwrap();
    assert_eq!(leg.len(), 1);

    let mut series = DateFixingSeries::new();
    for d in [ymd(2024, 3, 1), ymd(2024, 3, 4), ymd(2024, 3, 5), ymd(2024, 3, 6), ymd(2024, 3, 7), ymd(2024, 3, 8)] {
        series.insert(d, 0.05);
    }
    let store = FixingStore::new().with_series("SOFR", Arc::new(series));
    let derivative = leg.to_derivative(ymd(2024, 3, 11), Some(&store)).unwrap();
    match &derivative.payments()[0] {
        PaymentDerivative::CouponOvernight(c) => {
            let growth = (1.0 + 0.05 * 3.0 / 360.0) * (1.0_f64 + 0.05 / 360.0).powi(4) * (1.0 + 0.05 * 3.0 / 360.0);
            assert_relative_eq!(c.accrued(), 1e6 * growth, epsilon = 1e-6);
            assert_eq!(c.fixing_period_fractions().len(), 15);
            assert_eq!(c.fixing_period_times().len(), 16);
        }
        other => panic!("unexpected derivative {other:?}"),
    }
}
