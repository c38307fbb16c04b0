use chrono::NaiveDate;

use crate::instrument::cashflowerror::{CashFlowError, CashFlowResult};
use crate::interestrate::index::fixingseries::FixingStore;
use crate::interestrate::index::interestrateindex::InterestRateIndex;

/// Where a fixing stands relative to the valuation date, judged on its
/// publication date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixingState {
    /// 公布日在 valuation date 之後：仍為浮動。
    Unresolved,
    /// 公布日即 valuation date：有值就固定，沒有就仍為浮動。
    OnDate,
    /// 公布日已過：一定要有值。
    PastDue,
}

impl FixingState {
    pub fn of(publication_date: NaiveDate, valuation_date: NaiveDate) -> FixingState {
        if publication_date > valuation_date {
            FixingState::Unresolved
        } else if publication_date == valuation_date {
            FixingState::OnDate
        } else {
            FixingState::PastDue
        }
    }
}

fn missing_past_due(index_name: &str, fixing_date: NaiveDate, fixings: Option<&FixingStore>) -> CashFlowError {
    let series = match fixings.and_then(|store| store.get(index_name)) {
        Some(series) => series,
        None => {
            return CashFlowError::FixingSeriesMissing {
                index: index_name.to_owned(),
                fixing_date,
            }
        }
    };
    match series.latest_date() {
        Some(latest) if latest >= fixing_date => CashFlowError::FixingDataGap {
            index: index_name.to_owned(),
            fixing_date,
            latest,
        },
        latest => CashFlowError::FixingNotPublished {
            index: index_name.to_owned(),
            fixing_date,
            latest,
        },
    }
}

/// Runs one fixing through the state machine: `Some(rate)` once the fixing
/// is known, `None` while it is still floating.
pub fn resolve_fixing(
    index: &dyn InterestRateIndex,
    fixing_date: NaiveDate,
    valuation_date: NaiveDate,
    fixings: Option<&FixingStore>,
) -> CashFlowResult<Option<f64>> {
    let state = FixingState::of(index.publication_date(fixing_date), valuation_date);
    if state == FixingState::Unresolved {
        return Ok(None);
    }
    let value = fixings
        .and_then(|store| store.get(index.name()))
        .and_then(|series| series.value(fixing_date));
    match (state, value) {
        (_, Some(rate)) => Ok(Some(rate)),
        (FixingState::PastDue, None) => Err(missing_past_due(index.name(), fixing_date, fixings)),
        _ => Ok(None),
    }
}

/// 依序解析 `fixing_dates`，回傳已知的前綴；遇到第一個仍浮動的 fixing 即停止。
pub fn resolve_fixing_prefix(
    index: &dyn InterestRateIndex,
    fixing_dates: &[NaiveDate],
    valuation_date: NaiveDate,
    fixings: Option<&FixingStore>,
) -> CashFlowResult<Vec<f64>> {
    let mut known = Vec::with_capacity(fixing_dates.len());
    for fixing_date in fixing_dates {
        match resolve_fixing(index, *fixing_date, valuation_date, fixings)? {
            Some(rate) => known.push(rate),
            None => break,
        }
    }
    Ok(known)
}
