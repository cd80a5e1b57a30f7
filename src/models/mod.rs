mod decision;
mod errors;
mod record;
#[cfg(test)]
mod tests;
mod transaction;

use serde::{Deserialize, Serialize};

pub use decision::Decision;
pub use errors::EngineError;
pub use record::{HistoricalRecord, LogRecord};
pub use transaction::Transaction;

/// Risk tier assigned to a transaction amount relative to the baseline
/// amount distribution.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Med,
    High
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Approve,
    Deny
}

/// The single reason attached to every decision. Exactly one applies,
/// picked by rule precedence in the engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    PreviousChargeback,
    HighValueRapidTx,
    DailyLimitExceeded,
    LooksOk
}
