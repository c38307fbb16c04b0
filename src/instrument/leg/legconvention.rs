use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::instrument::cashflowerror::CashFlowResult;
use crate::instrument::leg::couponstub::CouponStub;
use crate::instrument::leg::legconfiguration::{CompoundingMethod, LegConfiguration};
use crate::instrument::notionalprovider::NotionalSchedule;
use crate::instrument::payment::couponovernight::OvernightAccrualMethod;
use crate::interestrate::index::interestrateindex::InterestRateIndex;
use crate::manager::manager::{FrozenManager, IManager, ManagerBuilder};
use crate::manager::managererror::{parse_json_value, parse_tenor, ManagerError, ManagerResult};
use crate::manager::namedobject::NamedJsonObject;
use crate::market::currency::Currency;
use crate::time::businessdayadjuster::BusinessDayAdjuster;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::daycounter::daycounter::DayCounterGenerator;
use crate::time::period::Period;
use crate::time::rolldateadjuster::{RollDateAdjuster, RollDateAdjusterType};
use crate::time::schedule::relativedategenerator::RelativeDateAlignment;
use crate::time::schedule::schedule::AdjustedDateParameters;
use crate::time::schedule::stubadjuster::StubConvention;

pub type Supports<'a> = (
    &'a FrozenManager<dyn HolidayCalendar>,
    &'a FrozenManager<DayCounterGenerator>,
    &'a FrozenManager<dyn InterestRateIndex>,
);

// ─────────────────────────────────────────────────────────────────────────────
// LegConvention
// ─────────────────────────────────────────────────────────────────────────────

/// Market conventions of a leg type, everything but the trade economics.
#[derive(Clone)]
pub struct LegConvention {
    name: String,
    currency: Currency,
    frequency: Period,
    day_counter: Arc<DayCounterGenerator>,
    accrual_parameters: AdjustedDateParameters,
    payment_parameters: Option<AdjustedDateParameters>,
    payment_relative_to: RelativeDateAlignment,
    payment_lag: i32,
    stub_convention: StubConvention,
    roll_date_adjuster: Option<Arc<dyn RollDateAdjuster>>,
    compounding_method: Option<CompoundingMethod>,
    index: Option<Arc<dyn InterestRateIndex>>,
    reset_relative_to: RelativeDateAlignment,
    overnight_method: OvernightAccrualMethod,
    rate_cutoff: Option<usize>,
}

impl LegConvention {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn frequency(&self) -> Period {
        self.frequency
    }

    pub fn index(&self) -> Option<&Arc<dyn InterestRateIndex>> {
        self.index.as_ref()
    }

    pub fn stub_convention(&self) -> StubConvention {
        self.stub_convention
    }

    /// Leg configuration for a trade from `start_date` to `end_date`. The day
    /// counter is generated with `end_date` as termination date.
    pub fn configuration(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        notional: NotionalSchedule,
        payer: bool,
    ) -> CashFlowResult<LegConfiguration> {
        let mut config = LegConfiguration::new();
        config
            .set_payer(payer)
            .set_currency(self.currency.clone())
            .set_day_counter(self.day_counter.generate(Some(end_date))?)
            .set_notional(notional)
            .set_start_date(start_date)
            .set_end_date(end_date)
            .set_accrual_frequency(self.frequency)
            .set_accrual_parameters(self.accrual_parameters.clone())
            .set_payment_relative_to(self.payment_relative_to)
            .set_payment_lag(self.payment_lag)
            .set_reset_relative_to(self.reset_relative_to)
            .set_overnight_method(self.overnight_method);
        if self.stub_convention.is_end_stub() {
            config.set_end_stub(CouponStub::new(self.stub_convention))?;
        } else {
            config.set_start_stub(CouponStub::new(self.stub_convention))?;
        }
        if let Some(parameters) = &self.payment_parameters {
            config.set_payment_parameters(parameters.clone());
        }
        if let Some(roll) = &self.roll_date_adjuster {
            config.set_roll_date_adjuster(roll.clone());
        }
        if let Some(method) = self.compounding_method {
            config.set_compounding_method(method);
        }
        if let Some(index) = &self.index {
            config.set_index(index.clone());
        }
        if let Some(cutoff) = self.rate_cutoff {
            config.set_rate_cutoff(cutoff);
        }
        Ok(config)
    }
}

impl fmt::Debug for LegConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegConvention")
            .field("name", &self.name)
            .field("currency", &self.currency)
            .field("frequency", &self.frequency)
            .field("day_counter", &self.day_counter.name())
            .field("stub_convention", &self.stub_convention)
            .field("index", &self.index.as_ref().map(|i| i.name().to_owned()))
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON
// ─────────────────────────────────────────────────────────────────────────────

fn default_relative_to_end() -> RelativeDateAlignment {
    RelativeDateAlignment::EndDate
}

fn default_relative_to_start() -> RelativeDateAlignment {
    RelativeDateAlignment::StartDate
}

fn default_stub_convention() -> StubConvention {
    StubConvention::ShortStart
}

fn default_overnight_method() -> OvernightAccrualMethod {
    OvernightAccrualMethod::Compounded
}

#[derive(Deserialize)]
struct LegConventionJsonProp {
    currency: Currency,
    frequency: String,
    day_counter: String,
    calendar: String,
    adjuster: BusinessDayAdjuster,
    #[serde(default)]
    payment_calendar: Option<String>,
    #[serde(default)]
    payment_adjuster: Option<BusinessDayAdjuster>,
    #[serde(default = "default_relative_to_end")]
    payment_relative_to: RelativeDateAlignment,
    #[serde(default)]
    payment_lag: i32,
    #[serde(default = "default_stub_convention")]
    stub_convention: StubConvention,
    #[serde(default)]
    roll_date_adjuster: Option<RollDateAdjusterType>,
    #[serde(default)]
    compounding_method: Option<CompoundingMethod>,
    #[serde(default)]
    index: Option<String>,
    #[serde(default = "default_relative_to_start")]
    reset_relative_to: RelativeDateAlignment,
    #[serde(default = "default_overnight_method")]
    overnight_method: OvernightAccrualMethod,
    #[serde(default)]
    rate_cutoff: Option<usize>,
}

/// 讀取 leg convention；calendar、day counter 與 index 以名稱參照已載入的物件。
pub struct LegConventionLoader;

impl<'a> IManager<LegConvention, Supports<'a>> for LegConventionLoader {
    fn insert_obj_from_json(
        &self,
        builder: &mut ManagerBuilder<LegConvention>,
        json_value: serde_json::Value,
        supports: &Supports<'a>,
    ) -> ManagerResult<()> {
        let (calendars, day_counters, indices) = *supports;
        let named_obj: NamedJsonObject = parse_json_value(json_value.clone())?;
        let p: LegConventionJsonProp = parse_json_value(json_value)?;
        let name = named_obj.name();
        if p.stub_convention == StubConvention::Both {
            return Err(ManagerError::invalid(name, "Both stubs need trade-specific dates"));
        }

        let calendar = calendars.get(&p.calendar)?;
        let payment_parameters = match (p.payment_calendar, p.payment_adjuster) {
            (None, None) => None,
            (payment_calendar, payment_adjuster) => {
                let payment_calendar = match payment_calendar {
                    Some(c) => calendars.get(&c)?,
                    None => calendar.clone(),
                };
                Some(AdjustedDateParameters::new(payment_calendar, payment_adjuster.unwrap_or(p.adjuster)))
            }
        };
        let index = match p.index {
            Some(index_name) => Some(indices.get(&index_name)?),
            None => None,
        };
        if let Some(index) = &index {
            if index.currency() != &p.currency {
                return Err(ManagerError::invalid(
                    name,
                    format!("index {} is not in {}", index.name(), p.currency),
                ));
            }
        }

        let convention = LegConvention {
            name: name.to_owned(),
            currency: p.currency,
            frequency: parse_tenor(&p.frequency)?,
            day_counter: day_counters.get(&p.day_counter)?,
            accrual_parameters: AdjustedDateParameters::new(calendar, p.adjuster),
            payment_parameters,
            payment_relative_to: p.payment_relative_to,
            payment_lag: p.payment_lag,
            stub_convention: p.stub_convention,
            roll_date_adjuster: p.roll_date_adjuster.map(|r| r.build()),
            compounding_method: p.compounding_method,
            index,
            reset_relative_to: p.reset_relative_to,
            overnight_method: p.overnight_method,
            rate_cutoff: p.rate_cutoff,
        };
        builder.insert(name.to_owned(), Arc::new(convention));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interestrate::index::overnightrateindex::OvernightRateIndex;
    use crate::time::calendar::simplecalendar::SimpleCalendar;
    use crate::time::daycounter::standarddaycounters::{actual_360, actual_360_generator};
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        calendars: FrozenManager<dyn HolidayCalendar>,
        day_counters: FrozenManager<DayCounterGenerator>,
        indices: FrozenManager<dyn InterestRateIndex>,
    }

    fn fixture() -> Fixture {
        let calendar: Arc<dyn HolidayCalendar> = Arc::new(SimpleCalendar::weekends_only());
        let mut calendars: ManagerBuilder<dyn HolidayCalendar> = ManagerBuilder::new();
        calendars.insert("NY".to_owned(), calendar.clone());
        let mut day_counters: ManagerBuilder<DayCounterGenerator> = ManagerBuilder::new();
        day_counters.insert("ACT/360".to_owned(), Arc::new(actual_360_generator()));
        let mut indices: ManagerBuilder<dyn InterestRateIndex> = ManagerBuilder::new();
        indices.insert(
            "SOFR".to_owned(),
            Arc::new(OvernightRateIndex::new("SOFR", Currency::new("USD", 2), 1, calendar, actual_360())),
        );
        Fixture {
            calendars: calendars.build(),
            day_counters: day_counters.build(),
            indices: indices.build(),
        }
    }

    #[test]
    fn test_load_and_configure() {
        let f = fixture();
        let json_vec = vec![json!({
            "name": "USD-SOFR-OIS",
            "currency": {"code": "USD"},
            "frequency": "1Y",
            "day_counter": "ACT/360",
            "calendar": "NY",
            "adjuster": {"convention": "ModifiedFollowing"},
            "payment_lag": 2,
            "index": "SOFR",
            "rate_cutoff": 2
        })];
        let conventions = LegConventionLoader
            .from_json_vec(&json_vec, &(&f.calendars, &f.day_counters, &f.indices))
            .unwrap();
        let convention = conventions.get("USD-SOFR-OIS").unwrap();
        assert_eq!(convention.frequency(), Period::years(1));
        assert_eq!(convention.index().map(|i| i.name()), Some("SOFR"));

        let config = convention
            .configuration(ymd(2024, 3, 20), ymd(2026, 3, 20), NotionalSchedule::constant(1e6), true)
            .unwrap();
        assert_eq!(config.payment_lag(), 2);
        assert_eq!(config.rate_cutoff(), Some(2));
        assert!(config.payer().unwrap());
        assert_eq!(config.stub_convention().unwrap(), StubConvention::ShortStart);
    }

    #[test]
    fn test_index_currency_must_match() {
        let f = fixture();
        let json_vec = vec![json!({
            "name": "EUR-SOFR",
            "currency": {"code": "EUR"},
            "frequency": "1Y",
            "day_counter": "ACT/360",
            "calendar": "NY",
            "adjuster": {"convention": "Following"},
            "index": "SOFR"
        })];
        assert!(matches!(
            LegConventionLoader.from_json_vec(&json_vec, &(&f.calendars, &f.day_counters, &f.indices)),
            Err(ManagerError::InvalidObject { .. })
        ));
    }
}
