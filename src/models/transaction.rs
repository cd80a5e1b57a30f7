use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::types::{DeviceId, MerchantId, TransactionId, UserId};

/// A single submitted transaction, as received from a caller or read from a
/// submissions CSV file.
///
/// `transaction_date` stays a raw string here: the engine validates it at
/// submission time so a malformed date surfaces as a client error rather
/// than a row that silently never deserialized. `device_id` defaults to 0
/// when absent and `has_cbk` defaults to false — submitted transactions
/// carry no chargeback flag of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub merchant_id: MerchantId,
    pub user_id: UserId,
    pub card_number: String,
    pub transaction_date: String,
    pub transaction_amount: Decimal,
    #[serde(default, deserialize_with = "numeric_or_zero")]
    pub device_id: DeviceId,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_cbk: bool
}

/// Accepts the boolean spellings that show up in historical CSV exports:
/// `true`/`TRUE`/`True`, the same for false, `1`/`0`, and an empty cell
/// (treated as false).
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;

    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" => Ok(false),
        "true" | "1" => Ok(true),
        other => Err(de::Error::custom(format!("Invalid boolean cell: {other:?}")))
    }
}

/// An empty cell means "unknown device" and maps to the 0 sentinel, which
/// the rules treat as an ordinary device key.
pub(crate) fn numeric_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    let value = value.trim();

    if value.is_empty() {
        return Ok(0);
    }

    value.parse().map_err(|error| {
        de::Error::custom(format!("Invalid numeric cell {value:?}: {error}"))
    })
}
