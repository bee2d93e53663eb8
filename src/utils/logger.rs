use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use thiserror::Error;

const SUPPRESS_THRESHOLD: u32 = 10;

// serenity's gateway chatter, emitted at info level on every heartbeat
static NOISY_PATTERNS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["do_heartbeat", "recv_event", "recv;", "heartbeat ack"]));

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to set logger: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

#[derive(Debug)]
struct LoggerState {
    file: Option<File>,
    last_message: Option<String>,
    repeat_count: u32,
}

/// Console + file logger that folds runs of identical lines into a summary.
pub struct BotLogger {
    level: LevelFilter,
    state: Mutex<LoggerState>,
}

impl BotLogger {
    pub fn new(log_file: Option<&str>, level: LevelFilter) -> Result<BotLogger, std::io::Error> {
        let file = match log_file {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };

        Ok(BotLogger {
            level,
            state: Mutex::new(LoggerState {
                file,
                last_message: None,
                repeat_count: 0,
            }),
        })
    }

    pub fn init(log_file: Option<&str>, level: LevelFilter) -> Result<(), LoggerError> {
        let logger = BotLogger::new(log_file, level)?;
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
        Ok(())
    }

    fn write_line(state: &mut LoggerState, line: &str) {
        println!("{}", line);
        if let Some(file) = state.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", line) {
                eprintln!("Failed to write log entry: {}", e);
            }
        }
    }

    fn flush_repeats(state: &mut LoggerState) {
        if state.repeat_count > 0 {
            let summary = format!(
                "{} (previous message repeated {} times)",
                timestamp(),
                state.repeat_count
            );
            Self::write_line(state, &summary);
            state.repeat_count = 0;
        }
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl Log for BotLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        if NOISY_PATTERNS
            .iter()
            .any(|pattern| message.contains(pattern))
        {
            return;
        }

        let Ok(mut state) = self.state.lock() else {
            return;
        };

        if state.last_message.as_deref() == Some(message.as_str()) {
            state.repeat_count = state.repeat_count.saturating_add(1);
            if state.repeat_count >= SUPPRESS_THRESHOLD {
                Self::flush_repeats(&mut state);
            }
            return;
        }

        Self::flush_repeats(&mut state);
        let line = format!("{} {}", timestamp(), message);
        Self::write_line(&mut state, &line);
        state.last_message = Some(message);
    }

    fn flush(&self) {
        if let Ok(mut state) = self.state.lock() {
            Self::flush_repeats(&mut state);
            if let Some(file) = state.file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_logger_creation_without_file() {
        assert!(BotLogger::new(None, LevelFilter::Info).is_ok());
    }

    #[test]
    fn test_logger_respects_level() {
        let logger = BotLogger::new(None, LevelFilter::Warn).unwrap();
        let info = Metadata::builder().level(Level::Info).build();
        let error = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&info));
        assert!(logger.enabled(&error));
    }

    #[test]
    fn test_logger_folds_duplicates() {
        let logger = BotLogger::new(None, LevelFilter::Info).unwrap();
        for _ in 0..6 {
            logger.log(
                &Record::builder()
                    .level(Level::Info)
                    .target("glazeglop")
                    .args(format_args!("kick failed for bob"))
                    .build(),
            );
        }

        let state = logger.state.lock().unwrap();
        assert_eq!(
            state.last_message.as_deref(),
            Some("[INFO] glazeglop: kick failed for bob")
        );
        assert_eq!(state.repeat_count, 5);
    }

    #[test]
    fn test_logger_drops_gateway_noise() {
        let logger = BotLogger::new(None, LevelFilter::Trace).unwrap();
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("serenity")
                .args(format_args!("do_heartbeat; shard 0"))
                .build(),
        );
        assert!(logger.state.lock().unwrap().last_message.is_none());
    }
}
