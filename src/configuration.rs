use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::instrument::leg::legconvention::{LegConvention, LegConventionLoader};
use crate::interestrate::index::interestrateindex::InterestRateIndex;
use crate::interestrate::index::interestrateindexmanager::InterestRateIndexLoader;
use crate::manager::manager::{FrozenManager, IManager};
use crate::manager::managererror::ManagerResult;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::calendar::holidaycalendarmanager::HolidayCalendarLoader;
use crate::time::daycounter::daycounter::DayCounterGenerator;
use crate::time::daycounter::daycountergeneratormanager::DayCounterGeneratorLoader;

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    holiday_calendar: Vec<serde_json::Value>,
    #[serde(default)]
    day_counter: Vec<serde_json::Value>,
    #[serde(default)]
    interest_rate_index: Vec<serde_json::Value>,
    #[serde(default)]
    leg_convention: Vec<serde_json::Value>,
}

/// 所有具名物件的唯讀集合。
///
/// 載入順序固定為 calendar → day counter → index → leg convention，後者以
/// 名稱參照前者已載入的物件。
pub struct Configuration {
    holiday_calendars: FrozenManager<dyn HolidayCalendar>,
    day_counters: FrozenManager<DayCounterGenerator>,
    interest_rate_indices: FrozenManager<dyn InterestRateIndex>,
    leg_conventions: FrozenManager<LegConvention>,
}

impl Configuration {
    pub fn holiday_calendars(&self) -> &FrozenManager<dyn HolidayCalendar> {
        &self.holiday_calendars
    }

    pub fn day_counters(&self) -> &FrozenManager<DayCounterGenerator> {
        &self.day_counters
    }

    pub fn interest_rate_indices(&self) -> &FrozenManager<dyn InterestRateIndex> {
        &self.interest_rate_indices
    }

    pub fn leg_conventions(&self) -> &FrozenManager<LegConvention> {
        &self.leg_conventions
    }

    pub fn from_json_str(json: &str) -> ManagerResult<Configuration> {
        let json_prop: ConfigurationJsonProp = serde_json::from_str(json)?;
        Configuration::from_json_prop(json_prop)
    }

    pub fn from_reader<R: Read>(reader: R) -> ManagerResult<Configuration> {
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        Configuration::from_json_prop(json_prop)
    }

    pub fn from_file<P: AsRef<Path>>(file_path: P) -> ManagerResult<Configuration> {
        let file = File::open(file_path)?;
        Configuration::from_reader(BufReader::new(file))
    }

    fn from_json_prop(json_prop: ConfigurationJsonProp) -> ManagerResult<Configuration> {
        let holiday_calendars = HolidayCalendarLoader.from_json_vec(&json_prop.holiday_calendar, &())?;
        let day_counters = DayCounterGeneratorLoader.from_json_vec(&json_prop.day_counter, &holiday_calendars)?;
        let interest_rate_indices =
            InterestRateIndexLoader.from_json_vec(&json_prop.interest_rate_index, &(&holiday_calendars, &day_counters))?;
        let leg_conventions = LegConventionLoader.from_json_vec(
            &json_prop.leg_convention,
            &(&holiday_calendars, &day_counters, &interest_rate_indices),
        )?;
        info!(
            "configuration loaded: {} calendars, {} day counters, {} indices, {} leg conventions",
            holiday_calendars.len(),
            day_counters.len(),
            interest_rate_indices.len(),
            leg_conventions.len()
        );
        Ok(Configuration {
            holiday_calendars,
            day_counters,
            interest_rate_indices,
            leg_conventions,
        })
    }
}
