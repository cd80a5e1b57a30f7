use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use tracing::{error, warn};

use crate::models::{EngineError, HistoricalRecord};
use crate::types::{DeviceId, UserId};

/// The baseline transaction corpus every rule queries.
///
/// Loaded once at startup and never mutated afterwards, so it is shared
/// across concurrent submissions behind an `Arc` with no locking. Records
/// keep their load order; the per-user and per-device indices point back
/// into that single sequence.
pub struct HistoryStore {
    records: Vec<HistoricalRecord>,
    users: HashMap<UserId, Vec<usize>>,
    devices: HashMap<DeviceId, Vec<usize>>
}

impl HistoryStore {
    /// Loads the corpus from a CSV source.
    ///
    /// A missing or unreadable source degrades to an empty store — every
    /// query then behaves as "no history". Rows that fail to deserialize
    /// (bad date, bad amount) are skipped and logged, never fatal.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(error) => {
                warn!("{} | {error}", EngineError::data_unavailable(path));
                return Self::from_records(Vec::new());
            }
        };

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut records = Vec::new();

        for result in reader.deserialize::<HistoricalRecord>() {
            match result {
                Ok(record) => records.push(record),
                Err(error) => {
                    error!("Historical CSV deserialization error: {error}");
                }
            }
        }

        Self::from_records(records)
    }

    pub fn from_records(records: Vec<HistoricalRecord>) -> Self {
        let mut users: HashMap<UserId, Vec<usize>> = HashMap::new();
        let mut devices: HashMap<DeviceId, Vec<usize>> = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            users.entry(record.user_id).or_default().push(index);
            devices.entry(record.device_id).or_default().push(index);
        }

        Self { records, users, devices }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records for one user, in load order.
    pub fn by_user(&self, user_id: UserId) -> impl Iterator<Item = &HistoricalRecord> {
        self.users
            .get(&user_id)
            .into_iter()
            .flatten()
            .map(|&index| &self.records[index])
    }

    /// All records for one device, in load order. Device 0 (the "unknown
    /// device" cell) is an ordinary key here.
    pub fn by_device(&self, device_id: DeviceId) -> impl Iterator<Item = &HistoricalRecord> {
        self.devices
            .get(&device_id)
            .into_iter()
            .flatten()
            .map(|&index| &self.records[index])
    }

    /// The full amount distribution, in load order.
    pub fn amounts(&self) -> impl Iterator<Item = Decimal> {
        self.records.iter().map(|record| record.transaction_amount)
    }
}
