mod engine;
mod models;
mod rules;
mod sink;
mod storage;
mod types;

use std::io::{stderr, stdout, BufWriter};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::engine::DecisionEngine;
use crate::models::Decision;
use crate::sink::LogSink;
use crate::storage::HistoryStore;

const FULL_LOG_PATH: &str = "logs.csv";
const DENIED_LOG_PATH: &str = "denied_logs.csv";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: antifraud-engine [history].csv [submissions].csv [log_level:optional] > [decisions].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let history_path = &args[1];
    let submissions_path = &args[2];
    let log_level = args.get(3)
        .map(|s| parse_log_level(s)).unwrap_or_else(|| LevelFilter::ERROR);

    setup_logging(log_level);

    let history = Arc::new(HistoryStore::load(history_path));
    info!("Loaded {} historical transactions from {history_path}", history.len());

    let sink = Arc::new(LogSink::new(FULL_LOG_PATH, DENIED_LOG_PATH));
    let engine = DecisionEngine::new(history, sink.clone());

    let timer = Instant::now();
    let decisions = engine.run(submissions_path).await?;
    let duration = timer.elapsed();

    info!("Scored {} transactions in: {duration:?}", decisions.len());

    // The decisions are already safe in memory; a failed flush is surfaced
    // but does not invalidate them.
    if let Err(error) = sink.flush() {
        warn!("{error}");
    }

    write_decisions_to_stdout(&decisions)?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the decision CSV, so all logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_decisions_to_stdout(decisions: &[Decision]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(stdout().lock()));

    for decision in decisions {
        writer.serialize(decision)?;
    }

    writer.flush()?;

    Ok(())
}
