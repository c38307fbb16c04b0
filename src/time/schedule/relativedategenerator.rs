use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::time::businessdayadjuster::BusinessDayAdjuster;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::schedule::scheduleperiod::CalculationPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RelativeDateAlignment {
    StartDate,
    EndDate,
}

/// Derives one date per period (payment date, fixing date) from the period's
/// start or end date: shifted `days` business days when `days != 0`, otherwise
/// adjusted by `adjuster`.
#[derive(Debug, Clone, Deserialize)]
pub struct RelativeDateGenerator {
    alignment: RelativeDateAlignment,
    adjuster: BusinessDayAdjuster,
    days: i32,
}

impl RelativeDateGenerator {
    pub fn new(alignment: RelativeDateAlignment, adjuster: BusinessDayAdjuster, days: i32) -> Self {
        RelativeDateGenerator {
            alignment,
            adjuster,
            days,
        }
    }

    /// Payment on the accrual end date, adjusted.
    pub fn in_arrears(adjuster: BusinessDayAdjuster) -> Self {
        RelativeDateGenerator::new(RelativeDateAlignment::EndDate, adjuster, 0)
    }

    pub fn alignment(&self) -> RelativeDateAlignment {
        self.alignment
    }

    pub fn adjuster(&self) -> &BusinessDayAdjuster {
        &self.adjuster
    }

    pub fn days(&self) -> i32 {
        self.days
    }

    pub fn generate_one(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        calendar: &Arc<dyn HolidayCalendar>,
    ) -> NaiveDate {
        let base = match self.alignment {
            RelativeDateAlignment::StartDate => start_date,
            RelativeDateAlignment::EndDate => end_date,
        };
        if self.days != 0 {
            calendar.shift_n_business_day(base, self.days)
        } else {
            self.adjuster.adjust(base, calendar)
        }
    }

    pub fn generate(
        &self,
        calculation_periods: &[CalculationPeriod],
        calendar: &Arc<dyn HolidayCalendar>,
    ) -> Vec<NaiveDate> {
        calculation_periods
            .iter()
            .map(|p| self.generate_one(p.start_date(), p.end_date(), calendar))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::businessdayadjuster::BusinessDayConvention;
    use crate::time::calendar::simplecalendar::SimpleCalendar;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_shift_and_adjust() {
        let calendar: Arc<dyn HolidayCalendar> = Arc::new(SimpleCalendar::weekends_only());
        let adjuster = BusinessDayAdjuster::new(BusinessDayConvention::ModifiedFollowing, false);
        let periods = [
            CalculationPeriod::regular(ymd(2024, 3, 15), ymd(2024, 6, 15)),
            CalculationPeriod::regular(ymd(2024, 6, 15), ymd(2024, 9, 15)),
        ];

        let payment = RelativeDateGenerator::in_arrears(adjuster);
        assert_eq!(payment.generate(&periods, &calendar), vec![ymd(2024, 6, 17), ymd(2024, 9, 16)]);

        let fixing = RelativeDateGenerator::new(RelativeDateAlignment::StartDate, adjuster, -2);
        assert_eq!(fixing.generate(&periods, &calendar), vec![ymd(2024, 3, 13), ymd(2024, 6, 13)]);
    }

    #[test]
    fn test_deserialize() {
        let generator: RelativeDateGenerator = serde_json::from_str(
            r#"{"alignment": "EndDate", "adjuster": {"convention": "Following"}, "days": 2}"#,
        )
        .unwrap();
        assert_eq!(generator.days(), 2);
        assert_eq!(generator.alignment(), RelativeDateAlignment::EndDate);
    }
}
