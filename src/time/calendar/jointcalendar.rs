use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::time::calendar::holidaycalendar::HolidayCalendar;

/// Combines two calendars.
///
/// A union calendar treats a date as a holiday if either calendar does
/// (typical for cross-currency payment dates); an intersection only if both do.
pub struct JointCalendar {
    c1: Arc<dyn HolidayCalendar>,
    c2: Arc<dyn HolidayCalendar>,
    logical_operator: fn(bool, bool) -> bool,
}

impl JointCalendar {
    pub fn union(c1: Arc<dyn HolidayCalendar>, c2: Arc<dyn HolidayCalendar>) -> JointCalendar {
        JointCalendar {
            c1,
            c2,
            logical_operator: |b1, b2| b1 || b2,
        }
    }

    pub fn intersection(
        c1: Arc<dyn HolidayCalendar>,
        c2: Arc<dyn HolidayCalendar>,
    ) -> JointCalendar {
        JointCalendar {
            c1,
            c2,
            logical_operator: |b1, b2| b1 && b2,
        }
    }

    pub fn is_union(&self) -> bool {
        (self.logical_operator)(true, false)
    }

    pub fn c1(&self) -> &Arc<dyn HolidayCalendar> {
        &self.c1
    }

    pub fn c2(&self) -> &Arc<dyn HolidayCalendar> {
        &self.c2
    }
}

impl HolidayCalendar for JointCalendar {
    #[inline]
    fn is_holiday(&self, d: NaiveDate) -> bool {
        (self.logical_operator)(self.c1.is_holiday(d), self.c2.is_holiday(d))
    }

    fn get_holiday_set(&self, year: i32) -> HashSet<NaiveDate> {
        let s1 = self.c1.get_holiday_set(year);
        let s2 = self.c2.get_holiday_set(year);

        if self.is_union() {
            s1.union(&s2).copied().collect()
        } else {
            s1.intersection(&s2).copied().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::calendar::simplecalendar::SimpleCalendar;

    #[test]
    fn test_union_and_intersection() {
        let d1 = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 8, 26).unwrap();
        let us: Arc<dyn HolidayCalendar> = Arc::new(SimpleCalendar::weekends_with_holidays(vec![d1]));
        let uk: Arc<dyn HolidayCalendar> = Arc::new(SimpleCalendar::weekends_with_holidays(vec![d2]));

        let union = JointCalendar::union(us.clone(), uk.clone());
        assert!(union.is_union());
        assert!(union.is_holiday(d1));
        assert!(union.is_holiday(d2));

        let intersection = JointCalendar::intersection(us, uk);
        assert!(!intersection.is_holiday(d1));
        assert!(intersection.get_holiday_set(2024).len() == 104);
    }
}
