use crate::instrument::derivative::paymentderivative::PaymentDerivative;
use crate::market::currency::Currency;

/// Unexpired payments of a leg seen from one valuation date. May be empty
/// once every payment has been made.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnuityDerivative {
    payments: Vec<PaymentDerivative>,
}

impl AnnuityDerivative {
    pub fn new(payments: Vec<PaymentDerivative>) -> AnnuityDerivative {
        AnnuityDerivative { payments }
    }

    pub fn payments(&self) -> &[PaymentDerivative] {
        &self.payments
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    pub fn currency(&self) -> Option<&Currency> {
        self.payments.first().map(PaymentDerivative::currency)
    }

    pub fn payment_times(&self) -> Vec<f64> {
        self.payments.iter().map(PaymentDerivative::payment_time).collect()
    }

    /// Sum of the amounts already known; floating payments are skipped.
    pub fn fixed_amount_total(&self) -> f64 {
        self.payments.iter().filter_map(PaymentDerivative::fixed_amount).sum()
    }
}
