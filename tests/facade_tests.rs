use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use sevlog::internal::logger::{MemorySink, Terminated, STDERR_THRESHOLD_KEY};
use sevlog::{Logger, Severity, Termination};

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        (Logger::new(Arc::new(sink.clone())), sink)
    }

    /// Run `f`, expecting it to terminate; returns how it terminated.
    fn terminated(f: impl FnOnce()) -> Termination {
        let payload = catch_unwind(AssertUnwindSafe(f)).expect_err("expected termination");
        payload
            .downcast_ref::<Terminated>()
            .map(|t| t.0)
            .expect("payload should be Terminated")
    }

    #[derive(Debug)]
    struct DiskFull;

    impl fmt::Display for DiskFull {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("disk full")
        }
    }

    // ==================== emission shapes ====================

    #[test]
    fn test_macros_render_each_shape() {
        let (log, sink) = setup();
        let n = 3;

        sevlog::log_info!(log, "retry", n, "x");
        sevlog::log_infof!(log, "retry {} of {}", n, 5);
        sevlog::log_infoln!(log, "retry", n);
        sevlog::log_warningln!(log);

        assert_eq!(sink.lines(), vec!["retry3x", "retry 3 of 5", "retry 3\n", "\n"]);
    }

    #[test]
    fn test_line_shape_does_not_double_newline() {
        let (log, sink) = setup();
        sevlog::log_errorln!(log, "already terminated\n");
        assert_eq!(sink.lines(), vec!["already terminated\n"]);
    }

    // ==================== threshold ====================

    #[test]
    fn test_default_threshold_is_info() {
        let (log, sink) = setup();
        assert_eq!(log.severity(), Severity::Info);
        sevlog::log_info!(log, "visible");
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_error_threshold_suppresses_info_and_warning() {
        let (log, sink) = setup();
        log.set_severity(Severity::Error);
        sink.clear();

        sevlog::log_info!(log, "info");
        sevlog::log_warning!(log, "warning");
        sevlog::log_error!(log, "error");
        let how = terminated(|| sevlog::log_fatal!(log, "fatal"));

        assert_eq!(how, Termination::Fatal);
        let severities: Vec<Severity> = sink.records().iter().map(|r| r.severity).collect();
        assert_eq!(severities, vec![Severity::Error, Severity::Fatal]);
        assert!(sink.lines()[1].starts_with("fatal"));
    }

    #[test]
    fn test_threshold_is_written_to_sink_config() {
        let (log, sink) = setup();
        log.set_severity(Severity::Warning);

        assert_eq!(sink.config_value(STDERR_THRESHOLD_KEY).as_deref(), Some("1"));
        assert_eq!(sink.config_writes(), 1);
        assert_eq!(sink.reparses(), 1);
    }

    #[test]
    fn test_set_severity_is_idempotent() {
        let (log, sink) = setup();
        log.set_severity(Severity::Error);
        log.set_severity(Severity::Error);

        assert_eq!(log.severity(), Severity::Error);
        assert_eq!(sink.config_value(STDERR_THRESHOLD_KEY).as_deref(), Some("2"));
        assert_eq!(sink.config_writes(), 2);
        assert_eq!(sink.reparses(), 2);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_rejected_config_write_warns_and_keeps_threshold() {
        let (log, sink) = setup();
        sink.reject_config_writes(true);

        log.set_severity(Severity::Fatal);

        assert_eq!(log.severity(), Severity::Info);
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Warning);
        assert!(records[0].line.contains(STDERR_THRESHOLD_KEY));
        // reparse still runs
        assert_eq!(sink.reparses(), 1);
    }

    #[test]
    fn test_concurrent_threshold_updates_are_never_torn() {
        let (log, _sink) = setup();
        let writers: Vec<_> = [Severity::Warning, Severity::Fatal]
            .into_iter()
            .map(|severity| {
                let log = log.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        log.set_severity(severity);
                    }
                })
            })
            .collect();

        for _ in 0..1000 {
            let seen = log.severity();
            assert!(matches!(
                seen,
                Severity::Info | Severity::Warning | Severity::Fatal
            ));
        }
        for writer in writers {
            writer.join().unwrap();
        }
        assert!(matches!(log.severity(), Severity::Warning | Severity::Fatal));
    }

    // ==================== *_if ====================

    #[test]
    fn test_if_family_is_silent_on_ok() {
        let (log, sink) = setup();
        let ok: Result<u32, DiskFull> = Ok(7);

        assert_eq!(log.info_if(ok), Some(7));
        assert_eq!(log.warning_if(Ok::<_, DiskFull>(())), Some(()));
        assert_eq!(log.error_if(Ok::<_, DiskFull>("v")), Some("v"));
        assert_eq!(log.fatal_if(Ok::<_, DiskFull>(1)), 1);
        assert_eq!(log.exit_if(Ok::<_, DiskFull>(2)), 2);

        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_if_family_emits_one_line_on_err() {
        let (log, sink) = setup();

        assert_eq!(log.info_if(Err::<(), _>(DiskFull)), None);
        assert_eq!(log.warning_if(Err::<(), _>(DiskFull)), None);
        assert_eq!(log.error_if(Err::<(), _>(DiskFull)), None);

        let records = sink.records();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records.iter().map(|r| r.severity).collect::<Vec<_>>(),
            vec![Severity::Info, Severity::Warning, Severity::Error]
        );
        assert!(records.iter().all(|r| r.line == "disk full\n"));
    }

    #[test]
    fn test_fatal_if_and_exit_if_terminate_on_err() {
        let (log, sink) = setup();

        let how = terminated(|| {
            log.fatal_if(Err::<(), _>(DiskFull));
        });
        assert_eq!(how, Termination::Fatal);

        let how = terminated(|| {
            log.exit_if(Err::<(), _>(DiskFull));
        });
        assert_eq!(how, Termination::Exit);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.starts_with("disk full")));
    }

    #[test]
    fn test_if_family_respects_threshold() {
        let (log, sink) = setup();
        log.set_severity(Severity::Error);
        log.warning_if(Err::<(), _>(DiskFull));
        assert!(sink.lines().is_empty());
    }
}
