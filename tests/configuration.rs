use approx::assert_relative_eq;
use chrono::NaiveDate;

use compfin_cashflow::configuration::Configuration;
use compfin_cashflow::instrument::leg::annuityfactory::{fixed_annuity_from_tenor, ibor_annuity_from_tenor};
use compfin_cashflow::instrument::payment::paymentdefinition::PaymentDefinition;
use compfin_cashflow::manager::managererror::ManagerError;
use compfin_cashflow::time::period::Period;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const CONFIGURATION: &str = r#"{
    "holiday_calendar": [
        {"name": "TARGET", "calendar_type": "SimpleCalendar", "additional_holidays": ["2024-12-25", "2024-12-26"]}
    ],
    "day_counter": [
        {"name": "ACT/360", "numerator": {"numerator_type": "Actual"}, "dominator": {"dominator_type": "Const", "dominator_value": 360.0}},
        {"name": "30E/360", "numerator": {
            "numerator_type": "Thirty",
            "start_date_condition": "GreaterThanThirty",
            "start_date_adjustment": "ToThirty",
            "additional_start_date_condition": "Always",
            "end_date_condition": "GreaterThanThirty",
            "end_date_adjustment": "ToThirty"
        }, "dominator": {"dominator_type": "Const", "dominator_value": 360.0}}
    ],
    "interest_rate_index": [
        {"name": "EURIBOR6M", "index_type": "TermRate", "props": {
            "currency": {"code": "EUR"},
            "start_lag": 2,
            "adjuster": {"convention": "ModifiedFollowing"},
            "tenor": "6M",
            "calendar": "TARGET",
            "day_counter": "ACT/360"
        }}
    ],
    "leg_convention": [
        {
            "name": "EUR-FIXED-1Y",
            "currency": {"code": "EUR"},
            "frequency": "1Y",
            "day_counter": "30E/360",
            "calendar": "TARGET",
            "adjuster": {"convention": "ModifiedFollowing"}
        }
    ]
}"#;

#[test]
fn load_configuration_and_build_standard_legs() {
    let configuration = Configuration::from_json_str(CONFIGURATION).unwrap();
    assert_eq!(configuration.holiday_calendars().len(), 1);
    assert_eq!(configuration.day_counters().len(), 2);

    let convention = configuration.leg_conventions().get("EUR-FIXED-1Y").unwrap();
    let fixed = fixed_annuity_from_tenor(&convention, ymd(2024, 4, 15), Period::years(4), 1e7, 0.025, true).unwrap();
    assert_eq!(fixed.len(), 4);
    for payment in fixed.payments() {
        match payment {
            PaymentDefinition::CouponFixed(c) => {
                assert_relative_eq!(c.characters().accrual_fraction(), 1.0);
                assert_relative_eq!(c.amount(), -250_000.0);
            }
            other => panic!("unexpected payment {other:?}"),
        }
    }

    let euribor = configuration.interest_rate_indices().get("EURIBOR6M").unwrap();
    let floating = ibor_annuity_from_tenor(&euribor, ymd(2024, 6, 26), Period::years(1), 1e7, 0.0, false).unwrap();
    assert_eq!(floating.len(), 2);
    // 2024-12-26 is a TARGET holiday
    assert_eq!(floating.payments()[0].payment_date(), ymd(2024, 12, 27));
    assert!(floating.payments().iter().all(PaymentDefinition::is_floating));
}

#[test]
fn unknown_reference_is_reported() {
    let broken = CONFIGURATION.replace(r#""day_counter": "30E/360""#, r#""day_counter": "30/365""#);
    assert!(matches!(
        Configuration::from_json_str(&broken),
        Err(ManagerError::NameNotFoundError(name)) if name == "30/365"
    ));
}
