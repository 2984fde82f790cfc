// src/internal/logger/mod.rs

mod check;
pub mod facade;
pub mod logger;
pub mod render;
pub mod severity;
pub mod sink;
pub mod tracing_sink;

pub use facade::Logger;
pub use logger::{build_subscriber, init_logger, SharedWriter};
pub use severity::{ParseSeverityError, Severity};
pub use sink::{
    MemorySink, Record, Sink, SinkError, Terminated, Termination, STDERR_THRESHOLD_KEY,
};
pub use tracing_sink::TracingSink;

// The log_* and check* macros are exported at the crate root via #[macro_export].
