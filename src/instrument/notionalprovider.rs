use chrono::NaiveDate;

use crate::instrument::cashflowerror::{CashFlowError, CashFlowResult};

/// Notional of a leg as a function of date.
///
/// A variable schedule may be given as notionals only; its dates are filled
/// in once, when the leg is built, from the leg's own dates.
#[derive(Debug, Clone, PartialEq)]
pub enum NotionalSchedule {
    Constant(f64),
    Variable {
        dates: Vec<NaiveDate>,
        notionals: Vec<f64>,
    },
}

impl NotionalSchedule {
    pub fn constant(notional: f64) -> NotionalSchedule {
        NotionalSchedule::Constant(notional)
    }

    /// Date-stepped notional; `dates` must be sorted.
    pub fn variable(dates: Vec<NaiveDate>, notionals: Vec<f64>) -> CashFlowResult<NotionalSchedule> {
        if dates.len() != notionals.len() {
            return Err(CashFlowError::NotionalDateCountMismatch {
                dates: dates.len(),
                notionals: notionals.len(),
            });
        }
        if notionals.is_empty() {
            return Err(CashFlowError::missing_field("notionals"));
        }
        Ok(NotionalSchedule::Variable { dates, notionals })
    }

    /// Notionals whose dates are taken from the leg at build time.
    pub fn amounts(notionals: Vec<f64>) -> CashFlowResult<NotionalSchedule> {
        if notionals.is_empty() {
            return Err(CashFlowError::missing_field("notionals"));
        }
        Ok(NotionalSchedule::Variable {
            dates: Vec::new(),
            notionals,
        })
    }

    pub fn is_materialized(&self) -> bool {
        match self {
            NotionalSchedule::Constant(_) => true,
            NotionalSchedule::Variable { dates, .. } => !dates.is_empty(),
        }
    }

    /// Binds `dates` to a date-less variable schedule. Constant and already
    /// dated schedules come back unchanged.
    pub fn materialize(&self, dates: &[NaiveDate]) -> CashFlowResult<NotionalSchedule> {
        match self {
            NotionalSchedule::Variable { dates: own, notionals } if own.is_empty() => {
                NotionalSchedule::variable(dates.to_vec(), notionals.clone())
            }
            _ => Ok(self.clone()),
        }
    }

    /// 常數直接回傳；否則取最後一個 `<= date` 的 notional，早於第一個日期時取第一個。
    pub fn amount(&self, date: NaiveDate) -> f64 {
        match self {
            NotionalSchedule::Constant(notional) => *notional,
            NotionalSchedule::Variable { dates, notionals } => {
                if dates.is_empty() {
                    return notionals[0];
                }
                let count = dates.partition_point(|d| *d <= date);
                notionals[count.saturating_sub(1)]
            }
        }
    }

    /// Notional of the `i`-th dated entry, for legs that resolve by position.
    pub fn amount_at(&self, i: usize) -> CashFlowResult<f64> {
        match self {
            NotionalSchedule::Constant(notional) => Ok(*notional),
            NotionalSchedule::Variable { notionals, .. } => notionals
                .get(i)
                .copied()
                .ok_or(CashFlowError::NotionalIndexOutOfRange {
                    index: i,
                    notionals: notionals.len(),
                }),
        }
    }
}
