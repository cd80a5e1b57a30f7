use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::models::{EngineError, LogRecord};

/// Sole owner of the decision logs: the full log (every decision) and the
/// denied log (the deny-only subsequence). Both are strictly
/// insertion-ordered and append-only.
///
/// One mutex guards both sequences, so concurrent submissions can never
/// leave a denied-log entry without its full-log counterpart. Nothing
/// awaits while the lock is held.
pub struct LogSink {
    full_path: PathBuf,
    denied_path: PathBuf,
    state: Mutex<SinkState>
}

#[derive(Default)]
struct SinkState {
    full: Vec<LogRecord>,
    denied: Vec<LogRecord>,
    // How many records of each sequence have already reached the file.
    full_flushed: usize,
    denied_flushed: usize
}

impl LogSink {
    pub fn new(full_path: impl Into<PathBuf>, denied_path: impl Into<PathBuf>) -> Self {
        Self {
            full_path: full_path.into(),
            denied_path: denied_path.into(),
            state: Mutex::new(SinkState::default())
        }
    }

    /// Appends one decided transaction. Denied records additionally land in
    /// the denied log under the same lock acquisition.
    pub fn append(&self, record: LogRecord) {
        let mut state = self.lock();

        if record.is_denied() {
            state.denied.push(record.clone());
        }

        state.full.push(record);
    }

    /// Materializes the not-yet-persisted suffix of both logs to their CSV
    /// destinations.
    ///
    /// Each suffix is serialized to an in-memory buffer first and landed
    /// with a single write, so a reader of the file never observes half a
    /// row. The watermark only advances after a successful write: on
    /// failure the in-memory records are all still pending and a later
    /// flush retries them.
    pub fn flush(&self) -> Result<(), EngineError> {
        let mut state = self.lock();

        let written = Self::append_to(&self.full_path, &state.full, state.full_flushed)?;
        state.full_flushed = state.full.len();

        let denied_written = Self::append_to(&self.denied_path, &state.denied, state.denied_flushed)?;
        state.denied_flushed = state.denied.len();

        debug!("Flushed {written} full-log and {denied_written} denied-log records");

        Ok(())
    }

    /// Snapshot of the full log, in append order.
    pub fn full_records(&self) -> Vec<LogRecord> {
        self.lock().full.clone()
    }

    /// Snapshot of the denied log, in append order.
    pub fn denied_records(&self) -> Vec<LogRecord> {
        self.lock().denied.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SinkState> {
        // A panicked appender cannot leave the sequences torn (push is the
        // last statement under the lock), so a poisoned lock is recoverable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append_to(path: &Path, records: &[LogRecord], flushed: usize) -> Result<usize, EngineError> {
        let pending = &records[flushed..];

        if pending.is_empty() {
            return Ok(0);
        }

        // The header travels with the first write of the run; later flushes
        // append rows only.
        let mut buffer = csv::WriterBuilder::new()
            .has_headers(flushed == 0)
            .from_writer(Vec::new());

        for record in pending {
            buffer.serialize(record).map_err(EngineError::write_failure)?;
        }

        let bytes = buffer.into_inner().map_err(EngineError::write_failure)?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(flushed == 0)
            .append(flushed > 0)
            .open(path)
            .map_err(EngineError::write_failure)?;

        file.write_all(&bytes).map_err(EngineError::write_failure)?;
        file.flush().map_err(EngineError::write_failure)?;

        Ok(pending.len())
    }
}
