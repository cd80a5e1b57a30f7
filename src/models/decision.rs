use serde::{Deserialize, Serialize};

use crate::models::{Reason, Recommendation};
use crate::types::TransactionId;

/// The approve/deny outcome returned to the caller for one submission.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub transaction_id: TransactionId,
    pub recommendation: Recommendation,
    pub reason: Reason
}

impl Decision {
    pub fn is_denied(&self) -> bool {
        self.recommendation == Recommendation::Deny
    }
}
