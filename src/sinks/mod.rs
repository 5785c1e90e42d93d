//! Sink implementations

pub mod memory;
pub mod writer;

pub use memory::{MemorySink, Record};
pub use writer::{LocationStyle, WriterSink};

use crate::core::{Sink, TimestampFormat};
use std::sync::{Arc, OnceLock};

static DEFAULT_SINK: OnceLock<Arc<dyn Sink>> = OnceLock::new();

/// Process-wide fallback for loggers built without a sink: standard error
/// with a local date/time header.
pub fn default_sink() -> &'static Arc<dyn Sink> {
    DEFAULT_SINK.get_or_init(|| {
        let sink: Arc<dyn Sink> =
            Arc::new(WriterSink::stderr().with_timestamp_format(TimestampFormat::Standard));
        sink
    })
}
