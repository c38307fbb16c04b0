//! Market-standard day counters assembled from numerators and dominators.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::daycounter::constdaycounterdominator::{ConstDayCounterDominator, ConstDayCounterDominatorGenerator};
use crate::time::daycounter::daycounter::{DayCounter, DayCounterGenerator};
use crate::time::daycounter::icmaactualdaycountdominator::{IcmaActualDayCounterDominator, IcmaDayCounterDominatorGenerator};
use crate::time::daycounter::isdaactualdaycounterdominator::IsdaActualDayCounterDominator;
use crate::time::daycounter::numerator::actualnumerator::{ActualNumerator, ActualNumeratorGenerator};
use crate::time::daycounter::numerator::businessdaynumerator::BusinessDayNumerator;
use crate::time::daycounter::numerator::noleapnumerator::NoLeapNumerator;
use crate::time::daycounter::numerator::onenumerator::OneNumerator;
use crate::time::daycounter::numerator::thirtynumerator::{ThirtyNumerator, ThirtyNumeratorGenerator};

fn actual_over(dominator: f64, name: &str) -> DayCounter {
    DayCounter::new(
        false,
        true,
        Arc::new(ActualNumerator),
        Arc::new(ConstDayCounterDominator::new(dominator)),
    )
    .with_name(name)
}

pub fn actual_360() -> DayCounter {
    actual_over(360.0, "ACT/360")
}

pub fn actual_365_fixed() -> DayCounter {
    actual_over(365.0, "ACT/365F")
}

pub fn actual_365_no_leap() -> DayCounter {
    DayCounter::new(
        false,
        true,
        Arc::new(NoLeapNumerator),
        Arc::new(ConstDayCounterDominator::new(365.0)),
    )
    .with_name("NL/365")
}

pub fn actual_actual_isda() -> DayCounter {
    DayCounter::new(false, true, Arc::new(ActualNumerator), Arc::new(IsdaActualDayCounterDominator))
        .with_name("ACT/ACT ISDA")
}

pub fn actual_actual_icma() -> DayCounter {
    DayCounter::new(false, true, Arc::new(ActualNumerator), Arc::new(IcmaActualDayCounterDominator))
        .with_name("ACT/ACT ICMA")
}

pub fn one_one() -> DayCounter {
    DayCounter::new(false, true, Arc::new(OneNumerator), Arc::new(ConstDayCounterDominator::new(1.0)))
        .with_name("1/1")
}

fn thirty_over_360(numerator: ThirtyNumerator, name: &str) -> DayCounter {
    DayCounter::new(false, true, Arc::new(numerator), Arc::new(ConstDayCounterDominator::new(360.0))).with_name(name)
}

/// 30/360 Bond Basis.
pub fn thirty_360() -> DayCounter {
    thirty_over_360(ThirtyNumeratorGenerator::bond_basis().numerator(None), "30/360")
}

/// 30E/360.
pub fn thirty_e_360() -> DayCounter {
    thirty_over_360(ThirtyNumeratorGenerator::eurobond_basis().numerator(None), "30E/360")
}

/// 30E/360 ISDA, bound to the leg termination date.
pub fn thirty_e_360_isda(termination_date: NaiveDate) -> DayCounter {
    thirty_over_360(
        ThirtyNumeratorGenerator::eurobond_isda().numerator(Some(termination_date)),
        "30E/360 ISDA",
    )
}

pub fn business_252(calendar: Arc<dyn HolidayCalendar>) -> DayCounter {
    DayCounter::new(
        false,
        true,
        Arc::new(BusinessDayNumerator::new(calendar)),
        Arc::new(ConstDayCounterDominator::new(252.0)),
    )
    .with_name("BUS/252")
}

/// Generator form of ACT/ACT ICMA, for configuration defaults.
pub fn actual_actual_icma_generator() -> DayCounterGenerator {
    DayCounterGenerator::new(
        "ACT/ACT ICMA",
        Arc::new(ActualNumeratorGenerator),
        Arc::new(IcmaDayCounterDominatorGenerator),
        false,
        true,
    )
}

/// Generator form of ACT/360.
pub fn actual_360_generator() -> DayCounterGenerator {
    DayCounterGenerator::new(
        "ACT/360",
        Arc::new(ActualNumeratorGenerator),
        Arc::new(ConstDayCounterDominatorGenerator::new(360.0)),
        false,
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::calendar::simplecalendar::SimpleCalendar;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_standard_fractions() {
        let (d1, d2) = (ymd(2024, 1, 31), ymd(2024, 7, 31));
        assert_relative_eq!(actual_360().year_fraction(d1, d2).unwrap(), 182.0 / 360.0);
        assert_relative_eq!(actual_365_fixed().year_fraction(d1, d2).unwrap(), 182.0 / 365.0);
        assert_relative_eq!(actual_actual_isda().year_fraction(d1, d2).unwrap(), 182.0 / 366.0);
        assert_relative_eq!(thirty_360().year_fraction(d1, d2).unwrap(), 0.5);
        assert_relative_eq!(thirty_e_360().year_fraction(d1, d2).unwrap(), 0.5);
        assert_relative_eq!(one_one().year_fraction(d1, d2).unwrap(), 1.0);
        assert_relative_eq!(actual_365_no_leap().year_fraction(d1, d2).unwrap(), 181.0 / 365.0);
    }

    #[test]
    fn test_generators_and_names() {
        let dc = actual_360_generator().generate(None).unwrap();
        assert_eq!(dc.name(), "ACT/360");
        assert!(actual_actual_icma_generator().generate(None).unwrap().requires_reference());
        assert!(actual_actual_icma().year_fraction(ymd(2024, 1, 1), ymd(2024, 7, 1)).is_err());
        let bus = business_252(Arc::new(SimpleCalendar::weekends_only()));
        assert_relative_eq!(bus.year_fraction(ymd(2024, 3, 4), ymd(2024, 3, 11)).unwrap(), 5.0 / 252.0);
        assert_eq!(thirty_e_360_isda(ymd(2025, 2, 28)).name(), "30E/360 ISDA");
    }
}
