pub mod cli;
pub mod internal;
mod macros;

// Re-export commonly used types
pub use internal::config::LoggingConfig;
pub use internal::logger::{
    init_logger, Logger, MemorySink, Severity, Sink, SinkError, Termination, TracingSink,
};
