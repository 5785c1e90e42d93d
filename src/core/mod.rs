//! Core logger types and traits

pub mod caller;
pub mod entry;
pub mod error;
pub mod field_value;
pub mod formatter;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod timestamp;
pub mod verbosity;

pub use caller::{frames_to_caller, Frame, FrameSource, StackSnapshot};
pub use entry::Entry;
pub use error::{LoggerError, Result};
pub use field_value::FieldValue;
pub use formatter::{DefaultFormatter, Formatter, FormatterConfig};
pub use logger::{Logger, LoggerBuilder, ADAPTER_OFFSET};
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use timestamp::TimestampFormat;
pub use verbosity::{set_verbosity, VerbosityGate};
