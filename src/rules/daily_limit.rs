use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::storage::HistoryStore;
use crate::types::UserId;

/// Aggregates a user's same-calendar-day spend against a cap.
///
/// The day boundary is the date component, not a rolling 24-hour window,
/// and the cap is exclusive on the high side: a total exactly equal to the
/// cap is still allowed.
#[derive(Clone)]
pub struct DailyLimit {
    history: Arc<HistoryStore>,
    cap: Decimal
}

impl DailyLimit {
    pub const DEFAULT_CAP: Decimal = dec!(3000.0);

    pub fn new(history: Arc<HistoryStore>, cap: Decimal) -> Self {
        Self { history, cap }
    }

    /// True iff the user's historical spend on `at`'s calendar date plus
    /// the incoming `amount` strictly exceeds the cap. With no baseline at
    /// all there is nothing to aggregate against and the limit never trips.
    pub fn exceeds(&self, user_id: UserId, at: NaiveDateTime, amount: Decimal) -> bool {
        if self.history.is_empty() {
            return false;
        }

        let day = at.date();

        let spent: Decimal = self
            .history
            .by_user(user_id)
            .filter(|record| record.transaction_date.date() == day)
            .map(|record| record.transaction_amount)
            .sum();

        spent + amount > self.cap
    }
}
