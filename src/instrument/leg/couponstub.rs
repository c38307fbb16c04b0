use std::sync::Arc;

use chrono::NaiveDate;

use crate::interestrate::index::interestrateindex::InterestRateIndex;
use crate::time::schedule::stubadjuster::StubConvention;

/// Stub descriptor for one end of a leg.
///
/// `effective_date` is the first regular start date of a start stub or the
/// last regular end date of an end stub. Floating legs may fix the stub on a
/// different index, or interpolate between two.
#[derive(Debug, Clone)]
pub struct CouponStub {
    stub_type: StubConvention,
    effective_date: Option<NaiveDate>,
    index1: Option<Arc<dyn InterestRateIndex>>,
    index2: Option<Arc<dyn InterestRateIndex>>,
}

impl CouponStub {
    pub fn new(stub_type: StubConvention) -> CouponStub {
        CouponStub {
            stub_type,
            effective_date: None,
            index1: None,
            index2: None,
        }
    }

    pub fn with_effective_date(mut self, effective_date: NaiveDate) -> CouponStub {
        self.effective_date = Some(effective_date);
        self
    }

    /// Stub fixed on `index` instead of the leg index.
    pub fn with_index(mut self, index: Arc<dyn InterestRateIndex>) -> CouponStub {
        self.index1 = Some(index);
        self.index2 = None;
        self
    }

    /// Stub rate interpolated between `index1` and `index2`.
    pub fn with_interpolated_indices(
        mut self,
        index1: Arc<dyn InterestRateIndex>,
        index2: Arc<dyn InterestRateIndex>,
    ) -> CouponStub {
        self.index1 = Some(index1);
        self.index2 = Some(index2);
        self
    }

    pub fn stub_type(&self) -> StubConvention {
        self.stub_type
    }

    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.effective_date
    }

    pub fn index1(&self) -> Option<&Arc<dyn InterestRateIndex>> {
        self.index1.as_ref()
    }

    pub fn index2(&self) -> Option<&Arc<dyn InterestRateIndex>> {
        self.index2.as_ref()
    }

    pub fn is_interpolated(&self) -> bool {
        self.index1.is_some() && self.index2.is_some()
    }

    /// `None` and `Both` leave the other end free; any other stub type
    /// excludes a stub at the opposite end.
    pub fn is_exclusive(&self) -> bool {
        !matches!(self.stub_type, StubConvention::None | StubConvention::Both)
    }
}
