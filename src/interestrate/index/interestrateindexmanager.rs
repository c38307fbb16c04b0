use std::sync::Arc;

use serde::Deserialize;

use crate::interestrate::index::interestrateindex::{InterestRateIndex, InterestRateIndexType};
use crate::interestrate::index::overnightrateindex::OvernightRateIndex;
use crate::interestrate::index::termrateindex::TermRateIndex;
use crate::manager::manager::{FrozenManager, IManager, ManagerBuilder};
use crate::manager::managererror::{parse_json_value, parse_tenor, ManagerResult};
use crate::manager::namedobject::NamedJsonObject;
use crate::market::currency::Currency;
use crate::time::businessdayadjuster::BusinessDayAdjuster;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::daycounter::daycounter::DayCounterGenerator;

pub type Supports<'a> = (
    &'a FrozenManager<dyn HolidayCalendar>,
    &'a FrozenManager<DayCounterGenerator>,
);

// ─────────────────────────────────────────────────────────────────────────────
// JSON props
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TermRateIndexJsonProp {
    currency: Currency,
    start_lag: u32,
    adjuster: BusinessDayAdjuster,
    tenor: String,
    calendar: String,
    day_counter: String,
}

fn default_publication_lag() -> u32 {
    1
}

#[derive(Deserialize)]
struct OvernightRateIndexJsonProp {
    currency: Currency,
    #[serde(default = "default_publication_lag")]
    publication_lag: u32,
    calendar: String,
    day_counter: String,
}

#[derive(Deserialize)]
struct InterestRateIndexJsonProp {
    index_type: InterestRateIndexType,
    props: serde_json::Value,
}

// ─────────────────────────────────────────────────────────────────────────────
// 工廠函式
// ─────────────────────────────────────────────────────────────────────────────

fn build_term_rate_index(
    name: &str,
    json_value: serde_json::Value,
    supports: &Supports,
) -> ManagerResult<Arc<dyn InterestRateIndex>> {
    let p: TermRateIndexJsonProp = parse_json_value(json_value)?;
    let tenor = parse_tenor(&p.tenor)?;
    let calendar = supports.0.get(&p.calendar)?;
    let day_counter = supports.1.get(&p.day_counter)?.generate(None)?;
    Ok(Arc::new(TermRateIndex::new(
        name,
        p.currency,
        p.start_lag,
        p.adjuster,
        tenor,
        calendar,
        day_counter,
    )))
}

fn build_overnight_rate_index(
    name: &str,
    json_value: serde_json::Value,
    supports: &Supports,
) -> ManagerResult<Arc<dyn InterestRateIndex>> {
    let p: OvernightRateIndexJsonProp = parse_json_value(json_value)?;
    let calendar = supports.0.get(&p.calendar)?;
    let day_counter = supports.1.get(&p.day_counter)?.generate(None)?;
    Ok(Arc::new(OvernightRateIndex::new(
        name,
        p.currency,
        p.publication_lag,
        calendar,
        day_counter,
    )))
}

// ─────────────────────────────────────────────────────────────────────────────
// InterestRateIndexLoader
// ─────────────────────────────────────────────────────────────────────────────

/// 讀取 `{"name", "index_type", "props"}` 形式的 index 定義。
pub struct InterestRateIndexLoader;

impl<'a> IManager<dyn InterestRateIndex, Supports<'a>> for InterestRateIndexLoader {
    fn insert_obj_from_json(
        &self,
        builder: &mut ManagerBuilder<dyn InterestRateIndex>,
        json_value: serde_json::Value,
        supports: &Supports<'a>,
    ) -> ManagerResult<()> {
        let named: NamedJsonObject = parse_json_value(json_value.clone())?;
        let wrapper: InterestRateIndexJsonProp = parse_json_value(json_value)?;
        let index = match wrapper.index_type {
            InterestRateIndexType::TermRate => build_term_rate_index(named.name(), wrapper.props, supports)?,
            InterestRateIndexType::OvernightRate => {
                build_overnight_rate_index(named.name(), wrapper.props, supports)?
            }
        };
        builder.insert(named.name().to_owned(), index);
        Ok(())
    }
}
