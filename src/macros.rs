// Variadic front ends for the Logger methods. Every macro takes the logger
// as its first argument.

#[doc(hidden)]
#[macro_export]
macro_rules! __sevlog_values {
    ($($value:expr),* $(,)?) => {
        &[$(&$value as &dyn ::core::fmt::Display),*]
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.info($crate::__sevlog_values!($($value),*))
    };
}

#[macro_export]
macro_rules! log_infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_infoln {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.infoln($crate::__sevlog_values!($($value),*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.warning($crate::__sevlog_values!($($value),*))
    };
}

#[macro_export]
macro_rules! log_warningf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warningf(::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warningln {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.warningln($crate::__sevlog_values!($($value),*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.error($crate::__sevlog_values!($($value),*))
    };
}

#[macro_export]
macro_rules! log_errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_errorln {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.errorln($crate::__sevlog_values!($($value),*))
    };
}

#[macro_export]
macro_rules! log_fatal {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.fatal($crate::__sevlog_values!($($value),*))
    };
}

#[macro_export]
macro_rules! log_fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_fatalln {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.fatalln($crate::__sevlog_values!($($value),*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.exit($crate::__sevlog_values!($($value),*))
    };
}

#[macro_export]
macro_rules! log_exitf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.exitf(::core::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_exitln {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $logger.exitln($crate::__sevlog_values!($($value),*))
    };
}

/// `check!(logger, cond, extra...)`
#[macro_export]
macro_rules! check {
    ($logger:expr, $cond:expr $(, $extra:expr)* $(,)?) => {
        $logger.check($cond, $crate::__sevlog_values!($($extra),*))
    };
}

/// `check_eq!(logger, a, b, extra...)`
#[macro_export]
macro_rules! check_eq {
    ($logger:expr, $a:expr, $b:expr $(, $extra:expr)* $(,)?) => {
        $logger.check_eq($a, $b, $crate::__sevlog_values!($($extra),*))
    };
}

#[macro_export]
macro_rules! check_ne {
    ($logger:expr, $a:expr, $b:expr $(, $extra:expr)* $(,)?) => {
        $logger.check_ne($a, $b, $crate::__sevlog_values!($($extra),*))
    };
}

#[macro_export]
macro_rules! check_lt {
    ($logger:expr, $a:expr, $b:expr $(, $extra:expr)* $(,)?) => {
        $logger.check_lt($a, $b, $crate::__sevlog_values!($($extra),*))
    };
}

#[macro_export]
macro_rules! check_gt {
    ($logger:expr, $a:expr, $b:expr $(, $extra:expr)* $(,)?) => {
        $logger.check_gt($a, $b, $crate::__sevlog_values!($($extra),*))
    };
}

#[macro_export]
macro_rules! check_le {
    ($logger:expr, $a:expr, $b:expr $(, $extra:expr)* $(,)?) => {
        $logger.check_le($a, $b, $crate::__sevlog_values!($($extra),*))
    };
}

#[macro_export]
macro_rules! check_ge {
    ($logger:expr, $a:expr, $b:expr $(, $extra:expr)* $(,)?) => {
        $logger.check_ge($a, $b, $crate::__sevlog_values!($($extra),*))
    };
}

/// `check_near!(logger, a, b, threshold, extra...)`
#[macro_export]
macro_rules! check_near {
    ($logger:expr, $a:expr, $b:expr, $threshold:expr $(, $extra:expr)* $(,)?) => {
        $logger.check_near($a, $b, $threshold, $crate::__sevlog_values!($($extra),*))
    };
}
