//! Standard legs from a start date and a tenor.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::instrument::annuity::annuitydefinition::AnnuityDefinition;
use crate::instrument::cashflowerror::CashFlowResult;
use crate::instrument::leg::fixedlegbuilder::build_fixed_annuity;
use crate::instrument::leg::floatinglegbuilder::build_ibor_annuity;
use crate::instrument::leg::legconfiguration::LegConfiguration;
use crate::instrument::leg::legconvention::LegConvention;
use crate::instrument::notionalprovider::NotionalSchedule;
use crate::interestrate::index::interestrateindex::InterestRateIndex;
use crate::time::period::Period;
use crate::time::schedule::schedule::AdjustedDateParameters;

/// Fixed leg on `convention` from `start_date` to `start_date + tenor`.
pub fn fixed_annuity_from_tenor(
    convention: &LegConvention,
    start_date: NaiveDate,
    tenor: Period,
    notional: f64,
    fixed_rate: f64,
    payer: bool,
) -> CashFlowResult<AnnuityDefinition> {
    let mut config =
        convention.configuration(start_date, start_date + tenor, NotionalSchedule::constant(notional), payer)?;
    config.set_fixed_rate(fixed_rate);
    build_fixed_annuity(&config)
}

/// Ibor leg paying every index tenor, on the index calendar, adjuster and
/// day counter.
pub fn ibor_annuity_from_tenor(
    index: &Arc<dyn InterestRateIndex>,
    start_date: NaiveDate,
    tenor: Period,
    notional: f64,
    spread: f64,
    payer: bool,
) -> CashFlowResult<AnnuityDefinition> {
    let mut config = LegConfiguration::new();
    config
        .set_payer(payer)
        .set_currency(index.currency().clone())
        .set_day_counter(index.day_counter().clone())
        .set_notional(NotionalSchedule::constant(notional))
        .set_start_date(start_date)
        .set_end_date(start_date + tenor)
        .set_accrual_frequency(*index.tenor())
        .set_accrual_parameters(AdjustedDateParameters::new(index.calendar().clone(), *index.adjuster()))
        .set_index(index.clone())
        .set_spread(spread);
    build_ibor_annuity(&config)
}
