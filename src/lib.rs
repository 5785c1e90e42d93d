//! # stdlogr
//!
//! Structured, leveled logging on top of a plain line-oriented backend.
//!
//! ## Features
//!
//! - **Value loggers**: `v`, `with_name` and `with_values` derive new loggers
//!   without touching the original
//! - **Deterministic lines**: key/value pairs are sorted by key before rendering
//! - **Global verbosity**: one process-wide threshold gates info output
//! - **Call-site attribution**: sinks receive the frame distance to the real
//!   caller, so `file:line` annotations point at application code
//!
//! ```
//! use std::sync::Arc;
//! use stdlogr::{info, kv, Logger, MemorySink};
//!
//! let sink = Arc::new(MemorySink::new());
//! let log = Logger::new(sink.clone());
//!
//! info!(log.with_values(&kv!["b", 1, "a", 2]), "test");
//! assert_eq!(sink.contents(), "[verbosity=0] [a=2] [b=1] test\n");
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        set_verbosity, DefaultFormatter, Entry, FieldValue, Formatter, FormatterConfig, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, Result, Sink, TimestampFormat,
    };
    pub use crate::sinks::{LocationStyle, MemorySink, WriterSink};
    pub use crate::{error, info, kv};
}

pub use crate::core::{
    set_verbosity, DefaultFormatter, Entry, FieldValue, Formatter, FormatterConfig, Frame,
    FrameSource, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, Sink, StackSnapshot,
    TimestampFormat, VerbosityGate, ADAPTER_OFFSET,
};
pub use sinks::{default_sink, LocationStyle, MemorySink, Record, WriterSink};
