use std::env;
use std::fs::{create_dir_all, File};
use std::io::{self, Write};
use std::path::Path;

use chrono::{NaiveDate, TimeDelta};
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::RngExt;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

const PROBABILITY_CHARGEBACK: f64 = 0.015;
const PROBABILITY_BURST: f64 = 0.2;
const PROBABILITY_INVALID: f64 = 0.01;

struct GeneratorConfig {
    num_records: usize,
    num_users: usize,
    output_path: String,
}

impl GeneratorConfig {
    fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let num_records = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10_000);
        let num_users = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(500);

        Self {
            num_records,
            num_users,
            output_path: "samples/generated_history.csv".to_string(),
        }
    }
}

fn main() -> io::Result<()> {
    let config = GeneratorConfig::from_args();

    println!(
        "Generating {} historical transactions for {} users in {}...",
        config.num_records, config.num_users, config.output_path
    );

    if let Some(parent) = Path::new(&config.output_path).parent() {
        create_dir_all(parent)?;
    }

    let file = File::create(&config.output_path)?;
    let mut writer = io::BufWriter::new(file);

    writeln!(
        writer,
        "transaction_id,merchant_id,user_id,card_number,transaction_date,transaction_amount,device_id,has_cbk"
    )?;

    let mut rng = rand::rng();
    let base_day = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid base date");
    let mut last_offset_seconds: i64 = 0;

    for tx_id in 1..=config.num_records as u64 {
        if rng.random_bool(PROBABILITY_INVALID) {
            generate_invalid_record(&mut writer, &mut rng, tx_id)?;
            continue;
        }

        let user_id = rng.random_range(1..=config.num_users as u64);
        // A device is usually tied to its user, sometimes shared, sometimes
        // the unknown-device 0 cell.
        let device_id = match rng.random_range(0..10) {
            0 => 0,
            1 => rng.random_range(7000..7100),
            _ => 7000 + user_id,
        };

        // Bursts keep some records within the rapid window of each other.
        let offset_seconds = if rng.random_bool(PROBABILITY_BURST) {
            last_offset_seconds + rng.random_range(10..240)
        } else {
            rng.random_range(0..60 * 60 * 24 * 30)
        };
        last_offset_seconds = offset_seconds;

        let date = base_day + TimeDelta::seconds(offset_seconds);
        let amount = generate_random_amount(&mut rng);
        let has_cbk = rng.random_bool(PROBABILITY_CHARGEBACK);

        writeln!(
            writer,
            "{},{},{},4{:03}********{:04},{},{},{},{}",
            tx_id,
            rng.random_range(5000..5100),
            user_id,
            user_id % 1000,
            user_id % 10000,
            date.format("%Y-%m-%dT%H:%M:%S"),
            amount,
            device_id,
            has_cbk
        )?;
    }

    println!("Generation complete.");

    Ok(())
}

fn generate_random_amount<R: Rng>(rng: &mut R) -> Decimal {
    // Mostly small tickets with a heavy-ish tail, so the quartiles spread.
    let amount_val = if rng.random_bool(0.1) {
        rng.random_range(500.0..4000.0)
    } else {
        rng.random_range(1.0..250.0)
    };

    Decimal::from_f64(amount_val).unwrap_or(Decimal::ZERO).round_dp(2)
}

fn generate_invalid_record<W: Write, R: Rng>(writer: &mut W, rng: &mut R, tx_id: u64) -> io::Result<()> {
    let invalid_rows = [
        format!("{tx_id},5000,bad_user,4111********1111,2024-03-01T09:00:00,10.00,7001,false"),
        format!("{tx_id},5000,1,4111********1111,03/01/2024 09:00,10.00,7001,false"),
        format!("{tx_id},5000,1,4111********1111,2024-03-01T09:00:00,not-an-amount,7001,false"),
        format!("{tx_id},5000,1,4111********1111,2024-03-01T09:00:00,10.00,7001,maybe"),
        format!("{tx_id},5000,1,4111********1111,2024-03-01T09:00:00,10.00"),
    ];

    let row = invalid_rows.choose(rng).expect("non-empty row set");
    writeln!(writer, "{row}")
}
