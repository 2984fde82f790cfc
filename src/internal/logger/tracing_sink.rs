use std::backtrace::{Backtrace, BacktraceStatus};
use std::io::{self, Write};
use std::sync::Mutex;

use tracing_subscriber::{reload, EnvFilter, Registry};

use super::logger::SharedWriter;
use super::severity::Severity;
use super::sink::{Sink, SinkError, Termination, STDERR_THRESHOLD_KEY};

/// Target attached to every event emitted through the facade.
pub const TARGET: &str = "sevlog";

/// Sink that forwards lines to the active `tracing` dispatcher.
///
/// The threshold filter sits behind a reload layer, so a committed
/// `stderrthreshold` change applies to the running subscriber.
///
/// A `Fatal` termination dumps a backtrace as its own event when
/// `RUST_BACKTRACE` enables capture.
pub struct TracingSink {
    filter: reload::Handle<EnvFilter, Registry>,
    pending: Mutex<Option<Severity>>,
    file: Option<SharedWriter<std::fs::File>>,
    from_env: bool,
}

impl TracingSink {
    pub fn new(
        filter: reload::Handle<EnvFilter, Registry>,
        file: Option<SharedWriter<std::fs::File>>,
    ) -> Self {
        Self {
            filter,
            pending: Mutex::new(None),
            file,
            from_env: false,
        }
    }

    /// Mark the initial filter as taken from `RUST_LOG`.
    pub fn with_env_filter(mut self, from_env: bool) -> Self {
        self.from_env = from_env;
        self
    }

    /// Whether the active filter came from `RUST_LOG` rather than the
    /// configured threshold.
    pub fn uses_env_filter(&self) -> bool {
        self.from_env
    }
}

impl Sink for TracingSink {
    fn emit(&self, severity: Severity, line: &str) {
        // The formatter terminates every event with its own newline.
        let message = line.strip_suffix('\n').unwrap_or(line);
        match severity {
            Severity::Info => {
                tracing::info!(target: TARGET, severity = %severity, "{}", message)
            }
            Severity::Warning => {
                tracing::warn!(target: TARGET, severity = %severity, "{}", message)
            }
            Severity::Error | Severity::Fatal => {
                tracing::error!(target: TARGET, severity = %severity, "{}", message)
            }
        }
    }

    fn set_config(&self, key: &str, value: &str) -> Result<(), SinkError> {
        if key != STDERR_THRESHOLD_KEY {
            return Err(SinkError::UnknownKey(key.to_string()));
        }
        let severity = value
            .parse::<Severity>()
            .map_err(|_| SinkError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            })?;
        *self.pending.lock().map_err(|_| SinkError::Poisoned)? = Some(severity);
        Ok(())
    }

    fn reparse_config(&self) -> Result<(), SinkError> {
        let pending = self
            .pending
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .take();
        if let Some(severity) = pending {
            self.filter
                .reload(EnvFilter::new(severity.filter_directive()))
                .map_err(|e| SinkError::Reload(e.to_string()))?;
        }
        Ok(())
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Some(file) = &self.file {
            let _ = file.clone().flush();
        }
    }

    fn terminate(&self, termination: Termination) -> ! {
        if termination == Termination::Fatal {
            let backtrace = Backtrace::capture();
            if backtrace.status() == BacktraceStatus::Captured {
                tracing::error!(target: TARGET, severity = %Severity::Fatal, "{}", backtrace);
                self.flush();
            }
        }
        std::process::exit(termination.exit_code())
    }
}
