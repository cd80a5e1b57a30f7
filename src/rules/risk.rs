use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::RiskTier;
use crate::storage::HistoryStore;

/// Tiers an amount against the baseline amount distribution.
///
/// Quantiles are recomputed from the full baseline on every call. That is a
/// full sort per classification, tolerable only because the baseline never
/// grows during a run; a growing baseline would need an online estimator
/// instead.
#[derive(Clone)]
pub struct RiskClassifier {
    history: Arc<HistoryStore>
}

impl RiskClassifier {
    pub fn new(history: Arc<HistoryStore>) -> Self {
        Self { history }
    }

    /// `LOW` below Q1, `MED` from Q1 through Q3 inclusive, `HIGH` above Q3.
    /// An empty baseline gives no distribution to tier against, so every
    /// amount lands on `MED`.
    pub fn classify(&self, amount: Decimal) -> RiskTier {
        if self.history.is_empty() {
            return RiskTier::Med;
        }

        let mut amounts: Vec<Decimal> = self.history.amounts().collect();
        amounts.sort_unstable();

        let q1 = quantile(&amounts, dec!(0.25));
        let q3 = quantile(&amounts, dec!(0.75));

        if amount < q1 {
            RiskTier::Low
        } else if amount <= q3 {
            RiskTier::Med
        } else {
            RiskTier::High
        }
    }
}

/// Linear-interpolation quantile over a sorted, non-empty slice.
///
/// The interpolation position `(n - 1) * q` is exact in decimal arithmetic
/// for quartile fractions, so no float round-trip is involved.
fn quantile(sorted: &[Decimal], q: Decimal) -> Decimal {
    let position = Decimal::from(sorted.len() - 1) * q;
    let fraction = position - position.floor();
    let lower = position.floor().to_usize().unwrap_or(0);
    let upper = (lower + 1).min(sorted.len() - 1);

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
