//! Historical fixings, looked up by the projection of floating coupons.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

/// Published fixings of one index.
///
/// `latest_date` is what separates "not yet published" from a gap in the data
/// when a past-due fixing is missing.
pub trait FixingTimeSeries: Send + Sync {
    fn value(&self, date: NaiveDate) -> Option<f64>;

    fn latest_date(&self) -> Option<NaiveDate>;
}

/// Date-keyed fixing series, ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DateFixingSeries {
    fixings: BTreeMap<NaiveDate, f64>,
}

impl DateFixingSeries {
    pub fn new() -> DateFixingSeries {
        DateFixingSeries::default()
    }

    pub fn insert(&mut self, date: NaiveDate, value: f64) -> Option<f64> {
        self.fixings.insert(date, value)
    }

    pub fn with_fixing(mut self, date: NaiveDate, value: f64) -> DateFixingSeries {
        self.fixings.insert(date, value);
        self
    }

    pub fn len(&self) -> usize {
        self.fixings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixings.is_empty()
    }

    /// Fixings on `[from, to]`, in date order.
    pub fn range(&self, from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.fixings.range(from..=to).map(|(d, v)| (*d, *v))
    }
}

impl FromIterator<(NaiveDate, f64)> for DateFixingSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        DateFixingSeries {
            fixings: iter.into_iter().collect(),
        }
    }
}

impl FixingTimeSeries for DateFixingSeries {
    fn value(&self, date: NaiveDate) -> Option<f64> {
        self.fixings.get(&date).copied()
    }

    fn latest_date(&self) -> Option<NaiveDate> {
        self.fixings.keys().next_back().copied()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FixingStore
// ─────────────────────────────────────────────────────────────────────────────

/// Fixing series keyed by index name.
#[derive(Clone, Default)]
pub struct FixingStore {
    series: HashMap<String, Arc<dyn FixingTimeSeries>>,
}

impl FixingStore {
    pub fn new() -> FixingStore {
        FixingStore::default()
    }

    pub fn insert(&mut self, index_name: impl Into<String>, series: Arc<dyn FixingTimeSeries>) {
        self.series.insert(index_name.into(), series);
    }

    pub fn with_series(mut self, index_name: impl Into<String>, series: Arc<dyn FixingTimeSeries>) -> FixingStore {
        self.insert(index_name, series);
        self
    }

    pub fn get(&self, index_name: &str) -> Option<&Arc<dyn FixingTimeSeries>> {
        self.series.get(index_name)
    }

    pub fn contains(&self, index_name: &str) -> bool {
        self.series.contains_key(index_name)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl fmt::Debug for FixingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.series.keys().collect();
        names.sort();
        f.debug_struct("FixingStore").field("indices", &names).finish()
    }
}
