//! Assertion helpers. A failed check logs a fatal diagnostic and terminates
//! the process through [`Logger::fatalf`]; none of them return on failure.

use std::fmt;

use super::facade::Logger;
use super::render;

impl Logger {
    /// Terminate with `Check Failed: <extra>` unless `cond` holds.
    pub fn check(&self, cond: bool, extra: &[&dyn fmt::Display]) {
        if !cond {
            self.fatalf(format_args!("Check Failed: {}", render::extra(extra)));
        }
    }

    pub fn check_eq<A, B>(&self, a: A, b: B, extra: &[&dyn fmt::Display])
    where
        A: PartialEq<B> + fmt::Debug,
        B: fmt::Debug,
    {
        if a != b {
            self.check_operator_failed(&DebugOperand(&a), "==", &DebugOperand(&b), extra);
        }
    }

    pub fn check_ne<A, B>(&self, a: A, b: B, extra: &[&dyn fmt::Display])
    where
        A: PartialEq<B> + fmt::Debug,
        B: fmt::Debug,
    {
        if a == b {
            self.check_operator_failed(&DebugOperand(&a), "!=", &DebugOperand(&b), extra);
        }
    }

    pub fn check_lt(&self, a: impl Into<f64>, b: impl Into<f64>, extra: &[&dyn fmt::Display]) {
        let (a, b) = (a.into(), b.into());
        if !(a < b) {
            self.check_operator_failed(&a, "<", &b, extra);
        }
    }

    pub fn check_gt(&self, a: impl Into<f64>, b: impl Into<f64>, extra: &[&dyn fmt::Display]) {
        let (a, b) = (a.into(), b.into());
        if !(a > b) {
            self.check_operator_failed(&a, ">", &b, extra);
        }
    }

    pub fn check_le(&self, a: impl Into<f64>, b: impl Into<f64>, extra: &[&dyn fmt::Display]) {
        let (a, b) = (a.into(), b.into());
        if !(a <= b) {
            self.check_operator_failed(&a, "<=", &b, extra);
        }
    }

    pub fn check_ge(&self, a: impl Into<f64>, b: impl Into<f64>, extra: &[&dyn fmt::Display]) {
        let (a, b) = (a.into(), b.into());
        if !(a >= b) {
            self.check_operator_failed(&a, ">=", &b, extra);
        }
    }

    /// Terminate unless `|a - b| <= threshold`. The tolerance is absolute.
    pub fn check_near(
        &self,
        a: impl Into<f64>,
        b: impl Into<f64>,
        threshold: impl Into<f64>,
        extra: &[&dyn fmt::Display],
    ) {
        let (a, b, threshold) = (a.into(), b.into(), threshold.into());
        let diff = (a - b).abs();
        // Written so that a NaN difference fails.
        if !(diff <= threshold) {
            self.fatalf(format_args!(
                "Check Failed:\nthe difference between {} and {}, {}, exceeds the threshold {}\n{}\n",
                a,
                b,
                diff,
                threshold,
                render::extra(extra)
            ));
        }
    }

    fn check_operator_failed(
        &self,
        a: &dyn fmt::Display,
        operator: &str,
        b: &dyn fmt::Display,
        extra: &[&dyn fmt::Display],
    ) -> ! {
        self.fatalf(format_args!(
            "Check Failed: expected \n{} {} {}\n{}\n",
            a,
            operator,
            b,
            render::extra(extra)
        ))
    }
}

/// Shows an operand of an equality check through its `Debug` impl.
struct DebugOperand<'a, T>(&'a T);

impl<T: fmt::Debug> fmt::Display for DebugOperand<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;

    use super::*;
    use crate::internal::logger::sink::{MemorySink, Terminated, Termination};

    fn failure_line(f: impl FnOnce(&Logger)) -> Option<String> {
        let sink = MemorySink::new();
        let log = Logger::new(Arc::new(sink.clone()));
        match catch_unwind(AssertUnwindSafe(|| f(&log))) {
            Ok(()) => {
                assert!(sink.lines().is_empty());
                None
            }
            Err(payload) => {
                assert_eq!(
                    payload.downcast_ref::<Terminated>(),
                    Some(&Terminated(Termination::Fatal))
                );
                let lines = sink.lines();
                assert_eq!(lines.len(), 1);
                Some(lines[0].clone())
            }
        }
    }

    #[test]
    fn test_check_pass_and_fail() {
        assert_eq!(failure_line(|log| log.check(true, &[&"x"])), None);

        let line = failure_line(|log| log.check(false, &[&"x", &"y"])).unwrap();
        assert!(line.starts_with("Check Failed: x y"));
    }

    #[test]
    fn test_check_eq_uses_debug() {
        assert_eq!(failure_line(|log| log.check_eq(5, 5, &[])), None);
        assert_eq!(failure_line(|log| log.check_eq("a", "a".to_string(), &[])), None);

        let line = failure_line(|log| log.check_eq("a", "b", &[&"ctx"])).unwrap();
        assert!(line.contains("\"a\" == \"b\"\nctx\n"));
    }

    #[test]
    fn test_nan_fails_ordering() {
        let line = failure_line(|log| log.check_le(f64::NAN, 1.0, &[])).unwrap();
        assert!(line.contains("NaN <= 1"));
        assert!(failure_line(|log| log.check_near(f64::NAN, 1.0, 10.0, &[])).is_some());
    }
}
