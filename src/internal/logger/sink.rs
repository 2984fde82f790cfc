use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::severity::Severity;

/// Configuration key holding the minimum severity that reaches the output.
pub const STDERR_THRESHOLD_KEY: &str = "stderrthreshold";

/// How a terminal emission ends the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Crash-style termination, with a stack dump when one is available.
    Fatal,
    /// Plain exit after the diagnostic is written.
    Exit,
}

impl Termination {
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Fatal => 255,
            Termination::Exit => 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),
    #[error("invalid value {value:?} for configuration key {key}")]
    InvalidValue { key: String, value: String },
    #[error("failed to apply configuration: {0}")]
    Reload(String),
    #[error("sink state poisoned")]
    Poisoned,
}

/// Line-oriented, severity-aware log sink wrapped by [`Logger`](super::Logger).
pub trait Sink: Send + Sync {
    /// Write one line tagged with `severity`.
    fn emit(&self, severity: Severity, line: &str);

    /// Stage a configuration change. Nothing takes effect until
    /// [`reparse_config`](Sink::reparse_config).
    fn set_config(&self, key: &str, value: &str) -> Result<(), SinkError>;

    /// Commit staged configuration changes.
    fn reparse_config(&self) -> Result<(), SinkError>;

    fn flush(&self);

    /// End the process. Called after the final line has been flushed.
    fn terminate(&self, termination: Termination) -> ! {
        std::process::exit(termination.exit_code())
    }
}

/// A line captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub severity: Severity,
    pub line: String,
}

/// Panic payload raised by [`MemorySink::terminate`] in place of exiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminated(pub Termination);

#[derive(Default)]
struct MemoryState {
    records: Vec<Record>,
    pending: HashMap<String, String>,
    committed: HashMap<String, String>,
}

/// In-memory sink for tests and embedding.
///
/// Terminal emissions unwind with a [`Terminated`] payload instead of
/// exiting, so fatal paths can be observed with `catch_unwind`.
#[derive(Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
    reject_config: Arc<AtomicBool>,
    reject_reparse: Arc<AtomicBool>,
    config_writes: Arc<AtomicUsize>,
    reparses: Arc<AtomicUsize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set_config` fail.
    pub fn reject_config_writes(&self, reject: bool) {
        self.reject_config.store(reject, Ordering::SeqCst);
    }

    /// Make every subsequent `reparse_config` fail, leaving staged values
    /// uncommitted.
    pub fn reject_reparse(&self, reject: bool) {
        self.reject_reparse.store(reject, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<Record> {
        self.lock().map(|s| s.records.clone()).unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.line).collect()
    }

    /// Committed value of a configuration key.
    pub fn config_value(&self, key: &str) -> Option<String> {
        self.lock().ok().and_then(|s| s.committed.get(key).cloned())
    }

    pub fn config_writes(&self) -> usize {
        self.config_writes.load(Ordering::SeqCst)
    }

    pub fn reparses(&self) -> usize {
        self.reparses.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        if let Ok(mut state) = self.lock() {
            state.records.clear();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, SinkError> {
        self.state.lock().map_err(|_| SinkError::Poisoned)
    }
}

impl Sink for MemorySink {
    fn emit(&self, severity: Severity, line: &str) {
        if let Ok(mut state) = self.lock() {
            state.records.push(Record {
                severity,
                line: line.to_string(),
            });
        }
    }

    fn set_config(&self, key: &str, value: &str) -> Result<(), SinkError> {
        self.config_writes.fetch_add(1, Ordering::SeqCst);
        if self.reject_config.load(Ordering::SeqCst) {
            return Err(SinkError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        if key != STDERR_THRESHOLD_KEY {
            return Err(SinkError::UnknownKey(key.to_string()));
        }
        value
            .parse::<Severity>()
            .map_err(|_| SinkError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            })?;
        self.lock()?
            .pending
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn reparse_config(&self) -> Result<(), SinkError> {
        self.reparses.fetch_add(1, Ordering::SeqCst);
        if self.reject_reparse.load(Ordering::SeqCst) {
            return Err(SinkError::Reload("reparse rejected".to_string()));
        }
        let mut state = self.lock()?;
        let pending: Vec<(String, String)> = state.pending.drain().collect();
        state.committed.extend(pending);
        Ok(())
    }

    fn flush(&self) {}

    fn terminate(&self, termination: Termination) -> ! {
        std::panic::panic_any(Terminated(termination))
    }
}
