use chrono::NaiveDate;

// ─────────────────────────────────────────────────────────────────────────────
// CalculationPeriod
// ─────────────────────────────────────────────────────────────────────────────

/// 一個 calculation period，攜帶實際區間與對應的 regular 區間。
///
/// | 欄位                 | regular period | stub period                     |
/// |----------------------|----------------|---------------------------------|
/// | `start_date`         | 實際起始日     | 實際起始日                      |
/// | `end_date`           | 實際結束日     | 實際結束日                      |
/// | `regular_start_date` | 同 start       | 自然 frequency 下的起始日       |
/// | `regular_end_date`   | 同 end         | 自然 frequency 下的結束日       |
///
/// Adjusted schedules keep the regular dates unadjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
    regular_start_date: NaiveDate,
    regular_end_date: NaiveDate,
}

impl CalculationPeriod {
    pub fn regular(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            regular_start_date: start_date,
            regular_end_date: end_date,
        }
    }

    pub fn stub(
        start_date: NaiveDate,
        end_date: NaiveDate,
        regular_start_date: NaiveDate,
        regular_end_date: NaiveDate,
    ) -> Self {
        Self {
            start_date,
            end_date,
            regular_start_date,
            regular_end_date,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn regular_start_date(&self) -> NaiveDate {
        self.regular_start_date
    }

    pub fn regular_end_date(&self) -> NaiveDate {
        self.regular_end_date
    }

    pub fn is_stub(&self) -> bool {
        self.start_date != self.regular_start_date || self.end_date != self.regular_end_date
    }

    /// Same regular dates, new actual boundaries.
    pub fn with_dates(&self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            regular_start_date: self.regular_start_date,
            regular_end_date: self.regular_end_date,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AccrualPeriod
// ─────────────────────────────────────────────────────────────────────────────

/// One resolved coupon period of a leg: adjusted accrual boundaries, payment
/// date and day-count fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
    payment_date: NaiveDate,
    accrual_fraction: f64,
}

impl AccrualPeriod {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        payment_date: NaiveDate,
        accrual_fraction: f64,
    ) -> AccrualPeriod {
        AccrualPeriod {
            start_date,
            end_date,
            payment_date,
            accrual_fraction,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    pub fn accrual_fraction(&self) -> f64 {
        self.accrual_fraction
    }
}
