use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::transaction::{lenient_bool, numeric_or_zero};
use crate::models::{Reason, Recommendation, RiskTier, Transaction};
use crate::types::{DeviceId, MerchantId, TransactionId, UserId};

/// One row of the baseline corpus.
///
/// Unlike a submitted [`Transaction`], the date is parsed at load time:
/// every windowed and same-day computation reads it, and a row whose date
/// does not parse is dropped during load rather than poisoning queries.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalRecord {
    pub transaction_id: TransactionId,
    pub merchant_id: MerchantId,
    pub user_id: UserId,
    pub card_number: String,
    pub transaction_date: NaiveDateTime,
    pub transaction_amount: Decimal,
    #[serde(default, deserialize_with = "numeric_or_zero")]
    pub device_id: DeviceId,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_cbk: bool
}

/// One row of the full log: the submitted transaction plus everything the
/// engine derived while deciding it. Field order is the materialized CSV
/// column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub transaction_id: TransactionId,
    pub merchant_id: MerchantId,
    pub user_id: UserId,
    pub card_number: String,
    pub transaction_date: String,
    pub transaction_amount: Decimal,
    pub device_id: DeviceId,
    pub has_cbk: bool,
    pub transaction_class: RiskTier,
    pub rapid_user: bool,
    pub rapid_device: bool,
    pub recommendation: Recommendation,
    pub reason: Reason
}

impl LogRecord {
    pub fn new(
        transaction: &Transaction,
        transaction_class: RiskTier,
        rapid_user: bool,
        rapid_device: bool,
        recommendation: Recommendation,
        reason: Reason
    ) -> Self {
        Self {
            transaction_id: transaction.transaction_id,
            merchant_id: transaction.merchant_id,
            user_id: transaction.user_id,
            card_number: transaction.card_number.clone(),
            transaction_date: transaction.transaction_date.clone(),
            transaction_amount: transaction.transaction_amount,
            device_id: transaction.device_id,
            has_cbk: transaction.has_cbk,
            transaction_class,
            rapid_user,
            rapid_device,
            recommendation,
            reason
        }
    }

    pub fn is_denied(&self) -> bool {
        self.recommendation == Recommendation::Deny
    }
}
