use super::{Decision, HistoricalRecord, LogRecord, Reason, Recommendation, RiskTier, Transaction};

use anyhow::Result;
use rust_decimal_macros::dec;

fn read_one<T: serde::de::DeserializeOwned>(csv_text: &str) -> Result<T> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let record = reader
        .deserialize()
        .next()
        .ok_or_else(|| anyhow::anyhow!("CSV contained no data rows"))??;

    Ok(record)
}

fn write_one<T: serde::Serialize>(record: &T) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(record)?;

    Ok(String::from_utf8(writer.into_inner()?)?)
}

#[test]
fn test_submission_row_defaults_optional_fields() -> Result<()> {
    let csv_text = "transaction_id,merchant_id,user_id,card_number,transaction_date,transaction_amount,device_id\n\
                    2342357,29744,97051,434505******9116,2019-12-01T23:16:32.812632,374.56,\n";

    let transaction: Transaction = read_one(csv_text)?;

    assert_eq!(transaction.transaction_id, 2342357);
    assert_eq!(transaction.transaction_amount, dec!(374.56));
    assert_eq!(transaction.device_id, 0);
    assert!(!transaction.has_cbk);

    Ok(())
}

#[test]
fn test_historical_row_parses_timestamps_with_and_without_fractions() -> Result<()> {
    let with_fraction = "transaction_id,merchant_id,user_id,card_number,transaction_date,transaction_amount,device_id,has_cbk\n\
                         1,10,100,4111********1111,2019-12-01T23:16:32.812632,100.00,7001,TRUE\n";
    let without_fraction = "transaction_id,merchant_id,user_id,card_number,transaction_date,transaction_amount,device_id,has_cbk\n\
                            2,10,100,4111********1111,2024-03-01T09:00:00,50.00,7001,false\n";

    let first: HistoricalRecord = read_one(with_fraction)?;
    let second: HistoricalRecord = read_one(without_fraction)?;

    assert!(first.has_cbk);
    assert_eq!(second.transaction_date, "2024-03-01T09:00:00".parse()?);

    Ok(())
}

#[test]
fn test_decision_serializes_with_wire_spellings() -> Result<()> {
    let denied = Decision {
        transaction_id: 42,
        recommendation: Recommendation::Deny,
        reason: Reason::HighValueRapidTx
    };
    let approved = Decision {
        transaction_id: 43,
        recommendation: Recommendation::Approve,
        reason: Reason::LooksOk
    };

    assert_eq!(
        write_one(&denied)?,
        "transaction_id,recommendation,reason\n42,deny,high_value_rapid_tx\n"
    );
    assert_eq!(
        write_one(&approved)?,
        "transaction_id,recommendation,reason\n43,approve,looks_ok\n"
    );

    Ok(())
}

#[test]
fn test_log_record_columns_match_the_materialized_layout() -> Result<()> {
    let record = LogRecord {
        transaction_id: 1,
        merchant_id: 10,
        user_id: 100,
        card_number: "4111********1111".to_string(),
        transaction_date: "2024-03-01T09:00:00".to_string(),
        transaction_amount: dec!(25.00),
        device_id: 7001,
        has_cbk: false,
        transaction_class: RiskTier::High,
        rapid_user: true,
        rapid_device: false,
        recommendation: Recommendation::Deny,
        reason: Reason::HighValueRapidTx
    };

    let csv_text = write_one(&record)?;
    let mut lines = csv_text.lines();

    assert_eq!(
        lines.next(),
        Some(
            "transaction_id,merchant_id,user_id,card_number,transaction_date,transaction_amount,\
             device_id,has_cbk,transaction_class,rapid_user,rapid_device,recommendation,reason"
        )
    );
    assert_eq!(
        lines.next(),
        Some("1,10,100,4111********1111,2024-03-01T09:00:00,25.00,7001,false,HIGH,true,false,deny,high_value_rapid_tx")
    );

    Ok(())
}

#[test]
fn test_invalid_boolean_cell_is_a_row_error() {
    let csv_text = "transaction_id,merchant_id,user_id,card_number,transaction_date,transaction_amount,device_id,has_cbk\n\
                    1,10,100,4111********1111,2024-03-01T09:00:00,50.00,7001,maybe\n";

    let result: Result<HistoricalRecord> = read_one(csv_text);

    assert!(result.is_err());
}
