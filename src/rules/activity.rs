use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};

use crate::storage::HistoryStore;
use crate::types::{DeviceId, UserId};

/// Detects rapid repeated activity: any historical record for the same user
/// or device within a fixed window of the submission timestamp.
///
/// The window is symmetric — a baseline record time-stamped after the
/// submission counts the same as one before it. A record exactly at the
/// window edge counts as rapid.
#[derive(Clone)]
pub struct ActivityWindow {
    history: Arc<HistoryStore>,
    window: TimeDelta
}

impl ActivityWindow {
    pub const DEFAULT_WINDOW_MINUTES: i64 = 5;

    pub fn new(history: Arc<HistoryStore>, window_minutes: i64) -> Self {
        Self {
            history,
            window: TimeDelta::minutes(window_minutes)
        }
    }

    pub fn is_rapid(&self, user_id: UserId, device_id: DeviceId, at: NaiveDateTime) -> (bool, bool) {
        let rapid_user = self
            .history
            .by_user(user_id)
            .any(|record| (at - record.transaction_date).abs() <= self.window);

        let rapid_device = self
            .history
            .by_device(device_id)
            .any(|record| (at - record.transaction_date).abs() <= self.window);

        (rapid_user, rapid_device)
    }
}
