use std::sync::Arc;

use chrono::NaiveDate;

use crate::instrument::cashflowerror::{CashFlowError, CashFlowResult};
use crate::instrument::derivative::paymentderivative::{CouponIborDerivative, IborFixingDerivative, PaymentDerivative};
use crate::instrument::payment::couponcharacters::GenericCouponCharacters;
use crate::instrument::payment::couponfixed::fixed_derivative;
use crate::instrument::payment::fixingresolution::resolve_fixing;
use crate::interestrate::index::fixingseries::FixingStore;
use crate::interestrate::index::interestrateindex::InterestRateIndex;
use crate::time::timecalculator::time_between;

// ─────────────────────────────────────────────────────────────────────────────
// IborFixing
// ─────────────────────────────────────────────────────────────────────────────

/// One fixing of a term index together with the period it covers.
#[derive(Debug, Clone)]
pub struct IborFixing {
    index: Arc<dyn InterestRateIndex>,
    fixing_date: NaiveDate,
    fixing_period_start_date: NaiveDate,
    fixing_period_end_date: NaiveDate,
    fixing_period_fraction: f64,
}

impl IborFixing {
    pub fn new(
        index: Arc<dyn InterestRateIndex>,
        fixing_date: NaiveDate,
        fixing_period_start_date: NaiveDate,
        fixing_period_end_date: NaiveDate,
        fixing_period_fraction: f64,
    ) -> CashFlowResult<IborFixing> {
        if fixing_period_end_date < fixing_period_start_date {
            return Err(CashFlowError::FixingPeriodEndBeforeStart {
                start: fixing_period_start_date,
                end: fixing_period_end_date,
            });
        }
        Ok(IborFixing {
            index,
            fixing_date,
            fixing_period_start_date,
            fixing_period_end_date,
            fixing_period_fraction,
        })
    }

    /// 由 index 的 spot lag、tenor、adjuster 與 calendar 推出 fixing period，
    /// fraction 用 index 的 day counter。
    pub fn from_fixing_date(index: Arc<dyn InterestRateIndex>, fixing_date: NaiveDate) -> CashFlowResult<IborFixing> {
        let start = index.start_date(fixing_date);
        let end = index.end_date_from_start(start);
        let fraction = index.day_counter().year_fraction(start, end)?;
        IborFixing::new(index, fixing_date, start, end, fraction)
    }

    pub fn index(&self) -> &Arc<dyn InterestRateIndex> {
        &self.index
    }

    pub fn fixing_date(&self) -> NaiveDate {
        self.fixing_date
    }

    pub fn fixing_period_start_date(&self) -> NaiveDate {
        self.fixing_period_start_date
    }

    pub fn fixing_period_end_date(&self) -> NaiveDate {
        self.fixing_period_end_date
    }

    pub fn fixing_period_fraction(&self) -> f64 {
        self.fixing_period_fraction
    }

    pub fn resolve(&self, valuation_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowResult<Option<f64>> {
        resolve_fixing(self.index.as_ref(), self.fixing_date, valuation_date, fixings)
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate) -> IborFixingDerivative {
        IborFixingDerivative::new(
            self.index.name(),
            time_between(valuation_date, self.fixing_date),
            time_between(valuation_date, self.fixing_period_start_date),
            time_between(valuation_date, self.fixing_period_end_date),
            self.fixing_period_fraction,
        )
    }
}

impl PartialEq for IborFixing {
    fn eq(&self, other: &Self) -> bool {
        self.index.name() == other.index.name()
            && self.fixing_date == other.fixing_date
            && self.fixing_period_start_date == other.fixing_period_start_date
            && self.fixing_period_end_date == other.fixing_period_end_date
            && self.fixing_period_fraction == other.fixing_period_fraction
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CouponIbor / CouponIborSpread
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CouponIbor {
    characters: GenericCouponCharacters,
    fixing: IborFixing,
}

impl CouponIbor {
    pub fn new(characters: GenericCouponCharacters, fixing: IborFixing) -> CashFlowResult<CouponIbor> {
        characters.check_currency(fixing.index().currency())?;
        Ok(CouponIbor { characters, fixing })
    }

    pub fn from_fixing_date(
        characters: GenericCouponCharacters,
        index: Arc<dyn InterestRateIndex>,
        fixing_date: NaiveDate,
    ) -> CashFlowResult<CouponIbor> {
        CouponIbor::new(characters, IborFixing::from_fixing_date(index, fixing_date)?)
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn fixing(&self) -> &IborFixing {
        &self.fixing
    }

    pub fn with_notional(&self, notional: f64) -> CouponIbor {
        CouponIbor {
            characters: self.characters.with_notional(notional),
            fixing: self.fixing.clone(),
        }
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowResult<PaymentDerivative> {
        ibor_derivative(&self.characters, &self.fixing, 0.0, valuation_date, fixings)
    }
}

/// Ibor plus a fixed spread; `spread_amount = spread·notional·δ` is kept
/// next to the floating part.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponIborSpread {
    characters: GenericCouponCharacters,
    fixing: IborFixing,
    spread: f64,
    spread_amount: f64,
}

impl CouponIborSpread {
    pub fn new(characters: GenericCouponCharacters, fixing: IborFixing, spread: f64) -> CashFlowResult<CouponIborSpread> {
        characters.check_currency(fixing.index().currency())?;
        let spread_amount = spread * characters.notional() * characters.accrual_fraction();
        Ok(CouponIborSpread {
            characters,
            fixing,
            spread,
            spread_amount,
        })
    }

    pub fn from_fixing_date(
        characters: GenericCouponCharacters,
        index: Arc<dyn InterestRateIndex>,
        fixing_date: NaiveDate,
        spread: f64,
    ) -> CashFlowResult<CouponIborSpread> {
        CouponIborSpread::new(characters, IborFixing::from_fixing_date(index, fixing_date)?, spread)
    }

    pub fn characters(&self) -> &GenericCouponCharacters {
        &self.characters
    }

    pub fn fixing(&self) -> &IborFixing {
        &self.fixing
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn spread_amount(&self) -> f64 {
        self.spread_amount
    }

    pub fn with_notional(&self, notional: f64) -> CouponIborSpread {
        let characters = self.characters.with_notional(notional);
        CouponIborSpread {
            spread_amount: self.spread * notional * characters.accrual_fraction(),
            characters,
            fixing: self.fixing.clone(),
            spread: self.spread,
        }
    }

    pub fn to_derivative(&self, valuation_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowResult<PaymentDerivative> {
        ibor_derivative(&self.characters, &self.fixing, self.spread, valuation_date, fixings)
    }
}

fn ibor_derivative(
    characters: &GenericCouponCharacters,
    fixing: &IborFixing,
    spread: f64,
    valuation_date: NaiveDate,
    fixings: Option<&FixingStore>,
) -> CashFlowResult<PaymentDerivative> {
    let payment_time = characters.payment_time(valuation_date)?;
    match fixing.resolve(valuation_date, fixings)? {
        Some(rate) => fixed_derivative(characters, valuation_date, rate + spread),
        None => Ok(PaymentDerivative::CouponIbor(CouponIborDerivative::new(
            characters.currency().clone(),
            payment_time,
            characters.accrual_fraction(),
            characters.notional(),
            fixing.to_derivative(valuation_date),
            spread,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interestrate::index::fixingseries::DateFixingSeries;
    use crate::interestrate::index::termrateindex::TermRateIndex;
    use crate::market::currency::Currency;
    use crate::time::businessdayadjuster::{BusinessDayAdjuster, BusinessDayConvention};
    use crate::time::calendar::simplecalendar::SimpleCalendar;
    use crate::time::daycounter::standarddaycounters::actual_360;
    use crate::time::period::Period;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn euribor_3m() -> Arc<dyn InterestRateIndex> {
        Arc::new(TermRateIndex::new(
            "EURIBOR3M",
            Currency::new("EUR", 2),
            2,
            BusinessDayAdjuster::new(BusinessDayConvention::ModifiedFollowing, true),
            Period::months(3),
            Arc::new(SimpleCalendar::weekends_only()),
            actual_360(),
        ))
    }

    fn characters(currency: &str) -> GenericCouponCharacters {
        GenericCouponCharacters::new(
            Currency::new(currency, 2),
            ymd(2024, 6, 18),
            ymd(2024, 3, 18),
            ymd(2024, 6, 18),
            92.0 / 360.0,
            1e6,
        )
        .unwrap()
    }

    #[test]
    fn test_fixing_period_is_derived() {
        let coupon = CouponIbor::from_fixing_date(characters("EUR"), euribor_3m(), ymd(2024, 3, 14)).unwrap();
        assert_eq!(coupon.fixing().fixing_period_start_date(), ymd(2024, 3, 18));
        assert_eq!(coupon.fixing().fixing_period_end_date(), ymd(2024, 6, 18));
        assert_relative_eq!(coupon.fixing().fixing_period_fraction(), 92.0 / 360.0);
    }

    #[test]
    fn test_currency_and_period_checks() {
        assert!(matches!(
            CouponIbor::from_fixing_date(characters("USD"), euribor_3m(), ymd(2024, 3, 14)),
            Err(CashFlowError::CurrencyMismatch { .. })
        ));
        assert_eq!(
            IborFixing::new(euribor_3m(), ymd(2024, 3, 14), ymd(2024, 3, 18), ymd(2024, 3, 15), 0.0).unwrap_err(),
            CashFlowError::FixingPeriodEndBeforeStart {
                start: ymd(2024, 3, 18),
                end: ymd(2024, 3, 15)
            }
        );
    }

    #[test]
    fn test_projection() {
        let coupon =
            CouponIborSpread::from_fixing_date(characters("EUR"), euribor_3m(), ymd(2024, 3, 14), 0.001).unwrap();
        assert_relative_eq!(coupon.spread_amount(), 0.001 * 1e6 * 92.0 / 360.0);

        let floating = coupon.to_derivative(ymd(2024, 3, 1), None).unwrap();
        match floating {
            PaymentDerivative::CouponIbor(ibor) => {
                assert_eq!(ibor.fixing().index_name(), "EURIBOR3M");
                assert!(ibor.fixing().fixing_time() > 0.0);
                assert_relative_eq!(ibor.spread_amount(), coupon.spread_amount());
            }
            other => panic!("unexpected {other:?}"),
        }

        let store = FixingStore::new().with_series(
            "EURIBOR3M",
            Arc::new(DateFixingSeries::new().with_fixing(ymd(2024, 3, 14), 0.039)),
        );
        let fixed = coupon.to_derivative(ymd(2024, 3, 14), Some(&store)).unwrap();
        assert_relative_eq!(fixed.fixed_amount().unwrap(), 1e6 * 0.04 * 92.0 / 360.0, epsilon = 1e-9);
        // fixing expected later today
        assert!(!coupon.to_derivative(ymd(2024, 3, 14), None).unwrap().is_fixed());
        assert!(matches!(
            coupon.to_derivative(ymd(2024, 3, 15), None),
            Err(CashFlowError::FixingSeriesMissing { .. })
        ));
    }
}
