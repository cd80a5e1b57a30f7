use std::sync::Arc;

use crate::storage::HistoryStore;
use crate::types::UserId;

/// Flags users with any disputed-and-reversed transaction in the baseline.
#[derive(Clone)]
pub struct ChargebackCheck {
    history: Arc<HistoryStore>
}

impl ChargebackCheck {
    pub fn new(history: Arc<HistoryStore>) -> Self {
        Self { history }
    }

    pub fn has_chargeback(&self, user_id: UserId) -> bool {
        self.history.by_user(user_id).any(|record| record.has_cbk)
    }
}
