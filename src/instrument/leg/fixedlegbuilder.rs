use log::debug;

use crate::instrument::annuity::annuitydefinition::AnnuityDefinition;
use crate::instrument::cashflowerror::CashFlowResult;
use crate::instrument::leg::legconfiguration::{CompoundingMethod, LegConfiguration};
use crate::instrument::leg::legdates::LegDates;
use crate::instrument::payment::couponcharacters::GenericCouponCharacters;
use crate::instrument::payment::couponfixed::CouponFixed;
use crate::instrument::payment::couponfixedcompounding::{CouponFixedAccruedCompounding, CouponFixedCompounding};
use crate::instrument::payment::paymentdefinition::PaymentDefinition;
use crate::time::daycounter::accrualfraction::AccrualFractionResolver;
use crate::time::period::Period;
use crate::time::schedule::calculationperiodgenerator::CalculationPeriodGenerator;
use crate::time::schedule::schedule::ScheduleGenerator;
use crate::time::schedule::stubadjuster::StubConvention;

const SUB_PERIOD: Period = Period::years(1);

/// Zero-coupon fixed coupon compounded straight over annual sub-periods from
/// the accrual start; the last sub-period may be short.
fn straight_compounding_coupon(
    config: &LegConfiguration,
    characters: GenericCouponCharacters,
    rate: f64,
) -> CashFlowResult<PaymentDefinition> {
    let generator = ScheduleGenerator::new(
        CalculationPeriodGenerator::new(SUB_PERIOD, StubConvention::ShortEnd, false, None),
        config.accrual_parameters(),
    );
    let schedule = generator.generate(characters.accrual_start_date(), characters.accrual_end_date())?;
    let last_is_stub = schedule.unadjusted_periods().last().is_some_and(|p| p.is_stub());
    let resolver = AccrualFractionResolver::new(
        config.day_counter()?.clone(),
        Some(SUB_PERIOD),
        StubConvention::None,
        if last_is_stub { StubConvention::ShortEnd } else { StubConvention::None },
    );
    let starts = schedule.adjusted_start_dates();
    let ends = schedule.adjusted_end_dates();
    let n = starts.len();
    let fractions = starts
        .iter()
        .zip(ends.iter())
        .enumerate()
        .map(|(i, (s, e))| resolver.fraction(*s, *e, i == 0, i + 1 == n))
        .collect::<Result<Vec<f64>, _>>()?;
    Ok(CouponFixedCompounding::new(characters, rate, starts, ends, fractions)?.into())
}

/// Builds a fixed leg: one [`CouponFixed`] per accrual period, or a single
/// (optionally compounding) coupon when the frequency is zero, plus the
/// requested notional exchanges.
pub fn build_fixed_annuity(config: &LegConfiguration) -> CashFlowResult<AnnuityDefinition> {
    let rate = config.fixed_rate()?;
    let sign = config.sign()?;
    let dates = LegDates::from_configuration(config)?;

    let coupons = if dates.frequency().is_zero() {
        let characters = dates.characters(config, 0, sign)?;
        let coupon = match config.compounding_method() {
            None => CouponFixed::new(characters, rate).into(),
            Some(CompoundingMethod::Straight) => straight_compounding_coupon(config, characters, rate)?,
            Some(CompoundingMethod::Accrued) => CouponFixedAccruedCompounding::new(characters, rate).into(),
        };
        vec![coupon]
    } else {
        (0..dates.len())
            .map(|i| -> CashFlowResult<PaymentDefinition> { Ok(CouponFixed::new(dates.characters(config, i, sign)?, rate).into()) })
            .collect::<CashFlowResult<Vec<PaymentDefinition>>>()?
    };

    debug!(
        "built fixed leg: {} coupons at {} ({})",
        coupons.len(),
        rate,
        config.currency()?
    );
    dates.assemble(config, coupons, sign)
}
