use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use super::render;
use super::severity::Severity;
use super::sink::{Sink, Termination, STDERR_THRESHOLD_KEY};

struct Shared {
    sink: Arc<dyn Sink>,
    threshold: AtomicU8,
}

/// Severity-gated front end over a [`Sink`].
///
/// Cloning is cheap and every clone shares the same sink and threshold, so
/// a threshold change is visible process-wide to whoever holds a handle.
///
/// Every emission comes in three shapes:
///
/// * plain (`info`): values concatenated with no separator;
/// * formatted (`infof`): a `format_args!` template;
/// * line (`infoln`): values separated by spaces, always newline-terminated.
///
/// The `fatal*` and `exit*` families never return. They emit regardless of
/// the threshold, flush the sink and hand control to
/// [`Sink::terminate`].
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.severity())
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self::with_threshold(sink, Severity::default())
    }

    /// Build a logger whose threshold starts at `threshold`. The sink's
    /// configuration is left untouched.
    pub fn with_threshold(sink: Arc<dyn Sink>, threshold: Severity) -> Self {
        Self {
            shared: Arc::new(Shared {
                sink,
                threshold: AtomicU8::new(threshold.as_u8()),
            }),
        }
    }

    /// Current minimum severity that reaches the sink.
    pub fn severity(&self) -> Severity {
        Severity::from_u8(self.shared.threshold.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.severity()
    }

    /// Set the minimum severity that reaches the sink.
    ///
    /// The value is written to the sink under `stderrthreshold` and then
    /// committed with a reparse. Failures are reported as warnings; the
    /// threshold only moves when both the write and the reparse succeed.
    pub fn set_severity(&self, severity: Severity) {
        let sink = &self.shared.sink;
        let written = sink.set_config(STDERR_THRESHOLD_KEY, &severity.as_u8().to_string());
        let reparsed = sink.reparse_config();
        if written.is_ok() && reparsed.is_ok() {
            self.shared
                .threshold
                .store(severity.as_u8(), Ordering::Release);
        }
        self.warning_if(written);
        self.warning_if(reparsed);
    }

    pub fn flush(&self) {
        self.shared.sink.flush();
    }

    fn emit(&self, severity: Severity, line: String) {
        if self.enabled(severity) {
            self.shared.sink.emit(severity, &line);
        }
    }

    fn terminate(&self, termination: Termination, line: String) -> ! {
        self.shared.sink.emit(Severity::Fatal, &line);
        self.shared.sink.flush();
        self.shared.sink.terminate(termination)
    }

    pub fn log(&self, severity: Severity, values: &[&dyn fmt::Display]) {
        self.emit(severity, render::plain(values));
    }

    pub fn logf(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.emit(severity, args.to_string());
    }

    pub fn logln(&self, severity: Severity, values: &[&dyn fmt::Display]) {
        self.emit(severity, render::line(values));
    }

    pub fn info(&self, values: &[&dyn fmt::Display]) {
        self.log(Severity::Info, values);
    }

    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.logf(Severity::Info, args);
    }

    pub fn infoln(&self, values: &[&dyn fmt::Display]) {
        self.logln(Severity::Info, values);
    }

    pub fn warning(&self, values: &[&dyn fmt::Display]) {
        self.log(Severity::Warning, values);
    }

    pub fn warningf(&self, args: fmt::Arguments<'_>) {
        self.logf(Severity::Warning, args);
    }

    pub fn warningln(&self, values: &[&dyn fmt::Display]) {
        self.logln(Severity::Warning, values);
    }

    pub fn error(&self, values: &[&dyn fmt::Display]) {
        self.log(Severity::Error, values);
    }

    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.logf(Severity::Error, args);
    }

    pub fn errorln(&self, values: &[&dyn fmt::Display]) {
        self.logln(Severity::Error, values);
    }

    pub fn fatal(&self, values: &[&dyn fmt::Display]) -> ! {
        self.terminate(Termination::Fatal, render::plain(values))
    }

    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.terminate(Termination::Fatal, args.to_string())
    }

    pub fn fatalln(&self, values: &[&dyn fmt::Display]) -> ! {
        self.terminate(Termination::Fatal, render::line(values))
    }

    pub fn exit(&self, values: &[&dyn fmt::Display]) -> ! {
        self.terminate(Termination::Exit, render::plain(values))
    }

    pub fn exitf(&self, args: fmt::Arguments<'_>) -> ! {
        self.terminate(Termination::Exit, args.to_string())
    }

    pub fn exitln(&self, values: &[&dyn fmt::Display]) -> ! {
        self.terminate(Termination::Exit, render::line(values))
    }

    /// Log the error at Info when `result` is `Err`.
    pub fn info_if<T, E: fmt::Display>(&self, result: Result<T, E>) -> Option<T> {
        result.map_err(|e| self.infoln(&[&e])).ok()
    }

    /// Log the error at Warning when `result` is `Err`.
    pub fn warning_if<T, E: fmt::Display>(&self, result: Result<T, E>) -> Option<T> {
        result.map_err(|e| self.warningln(&[&e])).ok()
    }

    /// Log the error at Error when `result` is `Err`.
    pub fn error_if<T, E: fmt::Display>(&self, result: Result<T, E>) -> Option<T> {
        result.map_err(|e| self.errorln(&[&e])).ok()
    }

    /// Unwrap `result`, or log the error and terminate as [`Logger::fatalln`].
    pub fn fatal_if<T, E: fmt::Display>(&self, result: Result<T, E>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => self.fatalln(&[&e]),
        }
    }

    /// Unwrap `result`, or log the error and terminate as [`Logger::exitln`].
    pub fn exit_if<T, E: fmt::Display>(&self, result: Result<T, E>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => self.exitln(&[&e]),
        }
    }
}
