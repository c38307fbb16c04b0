use serde::Deserialize;

/// 利率的複利方式；`future_value` 與 `implied_rate` 互為反函數。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Compounding {
    Simple,
    Continuous,
    Annual,
    Semiannual,
    Quarterly,
    Monthly,
    Daily,
}

impl Compounding {
    fn frequency(&self) -> f64 {
        match self {
            Compounding::Annual => 1.0,
            Compounding::Semiannual => 2.0,
            Compounding::Quarterly => 4.0,
            Compounding::Monthly => 12.0,
            Compounding::Daily => 365.0,
            Compounding::Simple | Compounding::Continuous => 0.0,
        }
    }

    /// Growth factor of one unit invested at `rate` for `tau` years.
    pub fn future_value(&self, rate: f64, tau: f64) -> f64 {
        match self {
            Compounding::Simple => 1.0 + rate * tau,
            Compounding::Continuous => (rate * tau).exp(),
            _ => {
                let freq = self.frequency();
                (1.0 + rate / freq).powf(tau * freq)
            }
        }
    }

    pub fn implied_rate(&self, future_value: f64, tau: f64) -> f64 {
        match self {
            Compounding::Simple => (future_value - 1.0) / tau,
            Compounding::Continuous => future_value.ln() / tau,
            _ => {
                let freq = self.frequency();
                (future_value.powf(1.0 / (tau * freq)) - 1.0) * freq
            }
        }
    }
}
