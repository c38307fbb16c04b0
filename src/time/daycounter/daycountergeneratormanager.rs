use std::sync::Arc;

use serde::Deserialize;

use crate::manager::manager::{FrozenManager, IManager, ManagerBuilder};
use crate::manager::managererror::{parse_json_value, ManagerResult};
use crate::manager::namedobject::NamedJsonObject;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::daycounter::constdaycounterdominator::ConstDayCounterDominatorGenerator;
use crate::time::daycounter::daycounter::{
    DayCounterDominatorGenerator, DayCounterGenerator, DayCounterNumeratorGenerator,
};
use crate::time::daycounter::icmaactualdaycountdominator::IcmaDayCounterDominatorGenerator;
use crate::time::daycounter::isdaactualdaycounterdominator::IsdaActualDayCounterDominatorGenerator;
use crate::time::daycounter::numerator::actualnumerator::ActualNumeratorGenerator;
use crate::time::daycounter::numerator::businessdaynumerator::BusinessDayNumeratorGenerator;
use crate::time::daycounter::numerator::noleapnumerator::NoLeapNumeratorGenerator;
use crate::time::daycounter::numerator::onenumerator::OneNumeratorGenerator;
use crate::time::daycounter::numerator::thirtynumerator::ThirtyNumeratorGenerator;

#[derive(Deserialize)]
enum DayCounterNumeratorType {
    Actual,
    NoLeap,
    One,
    Thirty,
    Business,
}

#[derive(Deserialize)]
struct DayCounterNumeratorTypedObject {
    numerator_type: DayCounterNumeratorType,
}

#[derive(Deserialize)]
struct BusinessNumeratorJsonProp {
    calendar: String,
}

#[derive(Deserialize)]
enum DayCounterDominatorType {
    Const,
    IcmaActual,
    IsdaActual,
}

#[derive(Deserialize)]
struct DayCounterDominatorTypedObject {
    dominator_type: DayCounterDominatorType,
}

fn default_include_d2() -> bool {
    true
}

#[derive(Deserialize)]
struct DayCounterGeneratorJsonProp {
    numerator: serde_json::Value,
    dominator: serde_json::Value,
    #[serde(default)]
    include_d1: bool,
    #[serde(default = "default_include_d2")]
    include_d2: bool,
}

fn numerator_generator_from_json(
    json_value: serde_json::Value,
    calendars: &FrozenManager<dyn HolidayCalendar>,
) -> ManagerResult<Arc<dyn DayCounterNumeratorGenerator>> {
    let typed_obj: DayCounterNumeratorTypedObject = parse_json_value(json_value.clone())?;
    let generator: Arc<dyn DayCounterNumeratorGenerator> = match typed_obj.numerator_type {
        DayCounterNumeratorType::Actual => Arc::new(ActualNumeratorGenerator),
        DayCounterNumeratorType::NoLeap => Arc::new(NoLeapNumeratorGenerator),
        DayCounterNumeratorType::One => Arc::new(OneNumeratorGenerator),
        DayCounterNumeratorType::Thirty => {
            let thirty: ThirtyNumeratorGenerator = parse_json_value(json_value)?;
            Arc::new(thirty)
        }
        DayCounterNumeratorType::Business => {
            let prop: BusinessNumeratorJsonProp = parse_json_value(json_value)?;
            Arc::new(BusinessDayNumeratorGenerator::new(calendars.get(&prop.calendar)?))
        }
    };
    Ok(generator)
}

fn dominator_generator_from_json(json_value: serde_json::Value) -> ManagerResult<Arc<dyn DayCounterDominatorGenerator>> {
    let typed_obj: DayCounterDominatorTypedObject = parse_json_value(json_value.clone())?;
    let generator: Arc<dyn DayCounterDominatorGenerator> = match typed_obj.dominator_type {
        DayCounterDominatorType::Const => {
            let constant: ConstDayCounterDominatorGenerator = parse_json_value(json_value)?;
            Arc::new(constant)
        }
        DayCounterDominatorType::IcmaActual => Arc::new(IcmaDayCounterDominatorGenerator),
        DayCounterDominatorType::IsdaActual => Arc::new(IsdaActualDayCounterDominatorGenerator),
    };
    Ok(generator)
}

/// Loads named [`DayCounterGenerator`]s; Business numerators look their
/// calendar up in the already-loaded calendars.
pub struct DayCounterGeneratorLoader;

impl IManager<DayCounterGenerator, FrozenManager<dyn HolidayCalendar>> for DayCounterGeneratorLoader {
    fn insert_obj_from_json(
        &self,
        builder: &mut ManagerBuilder<DayCounterGenerator>,
        json_value: serde_json::Value,
        calendars: &FrozenManager<dyn HolidayCalendar>,
    ) -> ManagerResult<()> {
        let named_obj: NamedJsonObject = parse_json_value(json_value.clone())?;
        let prop: DayCounterGeneratorJsonProp = parse_json_value(json_value)?;
        let generator = DayCounterGenerator::new(
            named_obj.name(),
            numerator_generator_from_json(prop.numerator, calendars)?,
            dominator_generator_from_json(prop.dominator)?,
            prop.include_d1,
            prop.include_d2,
        );
        builder.insert(named_obj.name().to_owned(), Arc::new(generator));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::calendar::simplecalendar::SimpleCalendar;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendars() -> FrozenManager<dyn HolidayCalendar> {
        let mut builder: ManagerBuilder<dyn HolidayCalendar> = ManagerBuilder::new();
        builder.insert("BRL".to_owned(), Arc::new(SimpleCalendar::weekends_only()));
        builder.build()
    }

    #[test]
    fn test_load_day_counters() {
        let json_vec = vec![
            json!({"name": "ACT/360", "numerator": {"numerator_type": "Actual"}, "dominator": {"dominator_type": "Const", "dominator_value": 360.0}}),
            json!({"name": "30E/360", "numerator": {
                "numerator_type": "Thirty",
                "start_date_condition": "GreaterThanThirty",
                "start_date_adjustment": "ToThirty",
                "additional_start_date_condition": "Always",
                "end_date_condition": "GreaterThanThirty",
                "end_date_adjustment": "ToThirty"
            }, "dominator": {"dominator_type": "Const", "dominator_value": 360.0}}),
            json!({"name": "BUS/252", "numerator": {"numerator_type": "Business", "calendar": "BRL"}, "dominator": {"dominator_type": "Const", "dominator_value": 252.0}}),
            json!({"name": "ACT/ACT ICMA", "numerator": {"numerator_type": "Actual"}, "dominator": {"dominator_type": "IcmaActual"}}),
        ];
        let manager = DayCounterGeneratorLoader.from_json_vec(&json_vec, &calendars()).unwrap();
        let act_360 = manager.get("ACT/360").unwrap().generate(None).unwrap();
        assert_relative_eq!(act_360.year_fraction(ymd(2024, 1, 1), ymd(2024, 4, 1)).unwrap(), 91.0 / 360.0);
        let thirty = manager.get("30E/360").unwrap().generate(None).unwrap();
        assert_relative_eq!(thirty.year_fraction(ymd(2024, 1, 31), ymd(2024, 4, 30)).unwrap(), 0.25);
        let bus = manager.get("BUS/252").unwrap().generate(None).unwrap();
        assert_relative_eq!(bus.year_fraction(ymd(2024, 3, 4), ymd(2024, 3, 8)).unwrap(), 4.0 / 252.0);
        assert!(manager.get("ACT/ACT ICMA").unwrap().generate(None).unwrap().requires_reference());
    }

    #[test]
    fn test_unknown_business_calendar() {
        let json_vec = vec![
            json!({"name": "BUS/252", "numerator": {"numerator_type": "Business", "calendar": "XXX"}, "dominator": {"dominator_type": "Const", "dominator_value": 252.0}}),
        ];
        assert!(DayCounterGeneratorLoader.from_json_vec(&json_vec, &calendars()).is_err());
    }
}
