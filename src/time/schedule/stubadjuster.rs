use serde::Deserialize;

use super::generationdirection::GenerationDirection;
use super::scheduleperiod::CalculationPeriod;

// ─────────────────────────────────────────────────────────────────────────────
// StubConvention
// ─────────────────────────────────────────────────────────────────────────────

/// Where the irregular period of a schedule goes and whether it stays
/// separate (short) or is merged into its neighbour (long).
///
/// `None` steps back from the end date like `ShortStart`, but rejects a
/// schedule in which no full period fits.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Deserialize)]
pub enum StubConvention {
    None,
    ShortStart,
    LongStart,
    ShortEnd,
    LongEnd,
    Both,
}

impl StubConvention {
    /// Start-stub conventions anchor on the end date and step backwards.
    pub fn direction(&self) -> GenerationDirection {
        match self {
            StubConvention::ShortEnd | StubConvention::LongEnd => GenerationDirection::Forward,
            _ => GenerationDirection::Backward,
        }
    }

    pub fn is_start_stub(&self) -> bool {
        matches!(self, StubConvention::ShortStart | StubConvention::LongStart)
    }

    pub fn is_end_stub(&self) -> bool {
        matches!(self, StubConvention::ShortEnd | StubConvention::LongEnd)
    }

    pub fn is_long(&self) -> bool {
        matches!(self, StubConvention::LongStart | StubConvention::LongEnd)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// stub adjuster 函式
// ─────────────────────────────────────────────────────────────────────────────
//
// retain：stub 保持獨立（short stub），不做任何處理
// combine：stub 與相鄰的 regular period 合併成一個 long stub，
//          regular 日期保留相鄰 period 的自然區間

fn retain(_forward: bool, calculation_periods: Vec<CalculationPeriod>) -> Vec<CalculationPeriod> {
    calculation_periods
}

/// 合併最後兩個 period。
fn combine_last(mut calculation_periods: Vec<CalculationPeriod>) -> Vec<CalculationPeriod> {
    let n = calculation_periods.len();
    if n < 2 || !calculation_periods[n - 1].is_stub() {
        return calculation_periods;
    }
    let stub = calculation_periods.remove(n - 1);
    let penult = calculation_periods.remove(n - 2);
    calculation_periods.push(CalculationPeriod::stub(
        penult.start_date(),
        stub.end_date(),
        penult.regular_start_date(),
        penult.regular_end_date(),
    ));
    calculation_periods
}

/// 合併最前兩個 period。
fn combine_first(mut calculation_periods: Vec<CalculationPeriod>) -> Vec<CalculationPeriod> {
    if calculation_periods.len() < 2 || !calculation_periods[0].is_stub() {
        return calculation_periods;
    }
    let stub = calculation_periods.remove(0);
    let second = calculation_periods.remove(0);
    calculation_periods.insert(
        0,
        CalculationPeriod::stub(
            stub.start_date(),
            second.end_date(),
            second.regular_start_date(),
            second.regular_end_date(),
        ),
    );
    calculation_periods
}

fn combine(forward: bool, calculation_periods: Vec<CalculationPeriod>) -> Vec<CalculationPeriod> {
    if forward {
        combine_last(calculation_periods)
    } else {
        combine_first(calculation_periods)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StubAdjuster
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub struct StubAdjuster {
    convention: StubConvention,
    forward: bool,
    adjust_impl: fn(bool, Vec<CalculationPeriod>) -> Vec<CalculationPeriod>,
}

impl StubAdjuster {
    pub fn new(convention: StubConvention) -> StubAdjuster {
        let adjust_impl = if convention.is_long() { combine } else { retain };
        StubAdjuster {
            convention,
            forward: convention.direction() == GenerationDirection::Forward,
            adjust_impl,
        }
    }

    pub fn convention(&self) -> StubConvention {
        self.convention
    }

    pub fn forward(&self) -> bool {
        self.forward
    }

    pub fn adjust(&self, calculation_periods: Vec<CalculationPeriod>) -> Vec<CalculationPeriod> {
        (self.adjust_impl)(self.forward, calculation_periods)
    }
}
