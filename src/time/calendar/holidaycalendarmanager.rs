use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use serde::Deserialize;

use crate::manager::manager::{IManager, ManagerBuilder};
use crate::manager::managererror::{parse_json_value, ManagerResult};
use crate::manager::namedobject::NamedJsonObject;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::calendar::jointcalendar::JointCalendar;
use crate::time::calendar::simplecalendar::SimpleCalendar;

#[derive(Deserialize)]
enum CalendarType {
    SimpleCalendar,
    JointCalendar,
}

#[derive(Deserialize)]
struct CalendarTypedObject {
    calendar_type: CalendarType,
}

fn default_weekends() -> HashSet<Weekday> {
    HashSet::from([Weekday::Sat, Weekday::Sun])
}

#[derive(Deserialize)]
struct SimpleCalendarJsonProp {
    #[serde(default = "default_weekends")]
    weekends: HashSet<Weekday>,
    #[serde(default)]
    additional_holidays: Vec<NaiveDate>,
    #[serde(default)]
    additional_business_days: Vec<NaiveDate>,
}

#[derive(Deserialize)]
enum MethodOfJoint {
    Intersection,
    Union,
}

#[derive(Deserialize)]
struct JointCalendarJsonProp {
    c1: String,
    c2: String,
    method_of_joint: MethodOfJoint,
}

// ─────────────────────────────────────────────────────────────────────────────
// HolidayCalendarLoader
// ─────────────────────────────────────────────────────────────────────────────

/// 假日曆的載入器。
///
/// `JointCalendar` 需要兩個已載入的子 calendar，而 JSON 陣列中的順序不一定在
/// 子 calendar 之後，所以 `insert_obj_from_json_vec` 以 retry loop 處理：
/// 每輪把失敗的 index 留到下一輪重試，直到全部成功或某輪沒有任何進展為止。
pub struct HolidayCalendarLoader;

impl IManager<dyn HolidayCalendar, ()> for HolidayCalendarLoader {
    fn insert_obj_from_json(
        &self,
        builder: &mut ManagerBuilder<dyn HolidayCalendar>,
        json_value: serde_json::Value,
        _supports: &(),
    ) -> ManagerResult<()> {
        let named_obj: NamedJsonObject = parse_json_value(json_value.clone())?;
        let typed_obj: CalendarTypedObject = parse_json_value(json_value.clone())?;

        let calendar: Arc<dyn HolidayCalendar> = match typed_obj.calendar_type {
            CalendarType::SimpleCalendar => {
                let prop: SimpleCalendarJsonProp = parse_json_value(json_value)?;
                Arc::new(SimpleCalendar::new(
                    prop.weekends,
                    prop.additional_holidays,
                    prop.additional_business_days,
                ))
            }
            CalendarType::JointCalendar => {
                let prop: JointCalendarJsonProp = parse_json_value(json_value)?;
                // 子 calendar 尚未載入時 builder.get() 回傳 Err，由 retry loop 重試
                let c1 = builder.get(&prop.c1)?;
                let c2 = builder.get(&prop.c2)?;
                match prop.method_of_joint {
                    MethodOfJoint::Intersection => Arc::new(JointCalendar::intersection(c1, c2)),
                    MethodOfJoint::Union => Arc::new(JointCalendar::union(c1, c2)),
                }
            }
        };
        builder.insert(named_obj.name().to_owned(), calendar);
        Ok(())
    }

    fn insert_obj_from_json_vec(
        &self,
        builder: &mut ManagerBuilder<dyn HolidayCalendar>,
        json_vec: &[serde_json::Value],
        supports: &(),
    ) -> ManagerResult<()> {
        let mut remain_indices: Vec<usize> = (0..json_vec.len()).collect();
        loop {
            let mut new_remain_indices: Vec<usize> = Vec::new();
            let mut last_result: ManagerResult<()> = Ok(());

            for &index in remain_indices.iter() {
                let result = self.insert_obj_from_json(builder, json_vec[index].clone(), supports);
                if result.is_err() {
                    new_remain_indices.push(index);
                    last_result = result;
                }
            }

            if new_remain_indices.is_empty() || remain_indices == new_remain_indices {
                return last_result;
            }
            remain_indices = new_remain_indices;
        }
    }
}
