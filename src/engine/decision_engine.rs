use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, error};

use crate::models::{Decision, EngineError, LogRecord, Reason, Recommendation, RiskTier, Transaction};
use crate::rules::{ActivityWindow, ChargebackCheck, DailyLimit, RiskClassifier};
use crate::sink::LogSink;
use crate::storage::HistoryStore;

/// Orchestrates the antifraud rules over the shared baseline and records
/// every decision through the log sink.
///
/// The engine itself performs no I/O beyond the sink handoff; `submit` is
/// synchronous and safe to call from concurrent tasks, because the baseline
/// is immutable and the sink serializes its own appends.
#[derive(Clone)]
pub struct DecisionEngine {
    history: Arc<HistoryStore>,
    sink: Arc<LogSink>,
    classifier: RiskClassifier,
    activity: ActivityWindow,
    daily_limit: DailyLimit,
    chargebacks: ChargebackCheck,
    backpressure: usize
}

impl DecisionEngine {
    /// Creates an engine with the default rule parameters.
    pub fn new(history: Arc<HistoryStore>, sink: Arc<LogSink>) -> Self {
        Self {
            classifier: RiskClassifier::new(history.clone()),
            activity: ActivityWindow::new(history.clone(), ActivityWindow::DEFAULT_WINDOW_MINUTES),
            daily_limit: DailyLimit::new(history.clone(), DailyLimit::DEFAULT_CAP),
            chargebacks: ChargebackCheck::new(history.clone()),
            history,
            sink,
            backpressure: 256
        }
    }

    pub fn with_daily_limit(mut self, cap: Decimal) -> Self {
        self.daily_limit = DailyLimit::new(self.history.clone(), cap);
        self
    }

    pub fn with_rapid_window(mut self, window_minutes: i64) -> Self {
        self.activity = ActivityWindow::new(self.history.clone(), window_minutes);
        self
    }

    /// The shared, read-only baseline handle.
    pub fn snapshot(&self) -> Arc<HistoryStore> {
        self.history.clone()
    }

    /// Scores one submitted transaction.
    ///
    /// The timestamp is validated before any rule runs; a malformed date is
    /// a client error and mutates nothing. Rules apply in fixed precedence,
    /// first match wins: chargeback history, then high-value rapid
    /// activity, then the daily limit. The log record is handed to the sink
    /// before the decision is returned.
    pub fn submit(&self, transaction: &Transaction) -> Result<Decision, EngineError> {
        let at: NaiveDateTime = transaction
            .transaction_date
            .parse()
            .map_err(|_| EngineError::invalid_timestamp(&transaction.transaction_date))?;

        let transaction_class = self.classifier.classify(transaction.transaction_amount);
        let (rapid_user, rapid_device) =
            self.activity.is_rapid(transaction.user_id, transaction.device_id, at);

        let (recommendation, reason) = if self.chargebacks.has_chargeback(transaction.user_id) {
            (Recommendation::Deny, Reason::PreviousChargeback)
        } else if transaction_class == RiskTier::High && (rapid_user || rapid_device) {
            (Recommendation::Deny, Reason::HighValueRapidTx)
        } else if self.daily_limit.exceeds(transaction.user_id, at, transaction.transaction_amount) {
            (Recommendation::Deny, Reason::DailyLimitExceeded)
        } else {
            (Recommendation::Approve, Reason::LooksOk)
        };

        self.sink.append(LogRecord::new(
            transaction,
            transaction_class,
            rapid_user,
            rapid_device,
            recommendation,
            reason
        ));

        debug!(
            "Transaction [{}] for user [{}]: {recommendation:?} ({reason:?})",
            transaction.transaction_id, transaction.user_id
        );

        Ok(Decision {
            transaction_id: transaction.transaction_id,
            recommendation,
            reason
        })
    }

    /// Replays a submissions CSV file through the engine, one transaction
    /// at a time, and returns the decisions in input order.
    ///
    /// Rows that fail to deserialize and submissions rejected before
    /// evaluation (bad timestamp) are logged and skipped; the replay keeps
    /// going.
    pub async fn run(&self, path: &str) -> anyhow::Result<Vec<Decision>> {
        let (sender, receiver) = mpsc::channel::<Transaction>(self.backpressure);
        let csv_handle = Self::spawn_csv_reader(path.to_string(), sender);
        let decisions = self.process_submissions(receiver).await;

        if let Err(error) = csv_handle.await {
            error!("CSV ingestion failed: {error}");
        }

        Ok(decisions)
    }

    fn spawn_csv_reader(path: String, sender: mpsc::Sender<Transaction>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(error) => {
                    error!("Error opening CSV at path: {path} | {error}");
                    return;
                }
            };

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            for result in reader.deserialize::<Transaction>() {
                match result {
                    Ok(transaction) => {
                        if sender.blocking_send(transaction).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        error!("CSV deserialization error: {error}");
                    }
                }
            }
        })
    }

    async fn process_submissions(&self, mut receiver: mpsc::Receiver<Transaction>) -> Vec<Decision> {
        let mut decisions = Vec::new();

        while let Some(transaction) = receiver.recv().await {
            match self.submit(&transaction) {
                Ok(decision) => decisions.push(decision),
                Err(error) => {
                    error!(
                        "Transaction [{}] rejected before evaluation: {error}",
                        transaction.transaction_id
                    );
                }
            }
        }

        decisions
    }
}
