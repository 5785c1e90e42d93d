//! Main logger implementation
//!
//! A [`Logger`] is a value. `v`, `with_name`, `with_values` and
//! `with_call_depth` return new loggers and leave the receiver untouched; the
//! sink, formatter and metrics are shared along the chain while the name and
//! accumulated key/values are copied, so sibling branches never see each
//! other's additions.

use super::{
    caller::{frames_to_caller, FALLBACK_DEPTH},
    entry::Entry,
    error::Result,
    field_value::FieldValue,
    formatter::{DefaultFormatter, Formatter, FormatterConfig},
    metrics::LoggerMetrics,
    sink::Sink,
    verbosity,
};
use crate::sinks::default_sink;
use std::fmt;
use std::sync::Arc;

/// Frames the logger itself adds between the application and the sink:
/// the public `info`/`error` call and `output`.
pub const ADAPTER_OFFSET: usize = 2;

/// Separator placed between name segments.
pub const NAME_SEPARATOR: char = '/';

#[derive(Clone)]
pub struct Logger {
    sink: Option<Arc<dyn Sink>>,
    formatter: Arc<dyn Formatter>,
    metrics: Arc<LoggerMetrics>,
    /// Extra frames between the application and this logger, e.g. a shim
    /// to another logging API. Negative values count as zero.
    depth_offset: isize,
    verbosity: usize,
    prefix: String,
    values: Vec<FieldValue>,
}

impl Logger {
    /// Logger writing to `sink` through the default formatter.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use stdlogr::{info, Logger, MemorySink};
    ///
    /// let sink = Arc::new(MemorySink::new());
    /// let log = Logger::new(sink.clone());
    /// info!(log.with_name("server"), "listening", "port", 8080);
    ///
    /// assert_eq!(sink.contents(), "[name=server] [verbosity=0] [port=8080] listening\n");
    /// ```
    #[must_use]
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self::builder().sink(sink).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Logger operating at verbosity `level`. Info lines are written only
    /// while the global threshold is at least `level`.
    #[must_use]
    pub fn v(&self, level: usize) -> Self {
        let mut new = self.clone();
        new.verbosity = level;
        new
    }

    /// Logger with `name` appended to the name, `/`-separated.
    ///
    /// Callers should not pass `/` inside `name`; it is not escaped.
    #[must_use]
    pub fn with_name(&self, name: &str) -> Self {
        let mut new = self.clone();
        if !new.prefix.is_empty() {
            new.prefix.push(NAME_SEPARATOR);
        }
        new.prefix.push_str(name);
        new
    }

    /// Logger that adds `kv` to every line, after the values it already has.
    #[must_use]
    pub fn with_values(&self, kv: &[FieldValue]) -> Self {
        let mut new = self.clone();
        new.values.extend_from_slice(kv);
        new
    }

    /// Logger that attributes lines `depth` frames further up, for helpers
    /// that log on behalf of their caller.
    #[must_use]
    pub fn with_call_depth(&self, depth: usize) -> Self {
        let mut new = self.clone();
        new.depth_offset = new.depth_offset.saturating_add_unsigned(depth);
        new
    }

    /// Whether info lines from this logger pass the global threshold.
    #[inline]
    pub fn enabled(&self) -> bool {
        verbosity::enabled(self.verbosity)
    }

    /// Write an informational line, unless the verbosity threshold filters it.
    ///
    /// Nothing is formatted when the line is filtered.
    #[inline(never)]
    pub fn info(&self, msg: &str, kv: &[FieldValue]) {
        if !self.enabled() {
            self.metrics.record_suppressed();
            return;
        }
        let line = self.render(None, msg, kv);
        let frames = if self.sink().wants_call_depth() {
            frames_to_caller()
        } else {
            FALLBACK_DEPTH
        };
        self.output(frames, &line);
    }

    /// Write an error line. Errors are never filtered by verbosity.
    #[inline(never)]
    pub fn error(&self, err: &(dyn std::error::Error + '_), msg: &str, kv: &[FieldValue]) {
        let line = self.render(Some(err.to_string()), msg, kv);
        let frames = if self.sink().wants_call_depth() {
            frames_to_caller()
        } else {
            FALLBACK_DEPTH
        };
        self.output(frames, &line);
    }

    /// Flush the sink. Unlike writes, flush failures are reported.
    pub fn flush(&self) -> Result<()> {
        self.sink().flush()
    }

    pub fn name(&self) -> &str {
        &self.prefix
    }

    pub fn verbosity(&self) -> usize {
        self.verbosity
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn depth_offset(&self) -> isize {
        self.depth_offset
    }

    pub fn formatter(&self) -> &Arc<dyn Formatter> {
        &self.formatter
    }

    /// Counters shared by this logger and every logger derived from the
    /// same root.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    fn sink(&self) -> &dyn Sink {
        match self.sink {
            Some(ref sink) => sink.as_ref(),
            None => default_sink().as_ref(),
        }
    }

    fn render(&self, error: Option<String>, msg: &str, kv: &[FieldValue]) -> String {
        let mut fields = Vec::with_capacity(self.values.len() + kv.len());
        fields.extend_from_slice(&self.values);
        fields.extend_from_slice(kv);

        self.formatter.format(&Entry {
            error,
            name: self.prefix.clone(),
            verbosity: self.verbosity,
            message: msg.to_string(),
            fields,
        })
    }

    /// Hand a line to the sink. Write failures are counted, never returned.
    #[inline(never)]
    fn output(&self, frames: usize, line: &str) {
        let depth = frames + self.depth_offset.max(0) as usize + ADAPTER_OFFSET;

        match self.sink().output(depth, line) {
            Ok(()) => {
                self.metrics.record_logged();
            }
            Err(e) => {
                let dropped = self.metrics.record_dropped();
                // Alert on first drop and periodically thereafter
                if dropped == 0 || (dropped + 1) % 1000 == 0 {
                    eprintln!(
                        "[LOGGER WARNING] Sink '{}' failed, {} lines dropped: {}",
                        self.sink().name(),
                        dropped + 1,
                        e
                    );
                }
            }
        }
    }
}

impl Default for Logger {
    /// Logger writing to the process-wide default sink.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sink", &self.sink.as_ref().map(|s| s.name().to_string()))
            .field("depth_offset", &self.depth_offset)
            .field("verbosity", &self.verbosity)
            .field("name", &self.prefix)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a root [`Logger`]
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use stdlogr::{FormatterConfig, Logger, MemorySink};
///
/// let logger = Logger::builder()
///     .sink(Arc::new(MemorySink::new()))
///     .formatter_config(FormatterConfig::new().with_hide_keys(true))
///     .depth_offset(1)
///     .build();
/// assert_eq!(logger.depth_offset(), 1);
/// ```
pub struct LoggerBuilder {
    sink: Option<Arc<dyn Sink>>,
    formatter: Option<Arc<dyn Formatter>>,
    metrics: Option<Arc<LoggerMetrics>>,
    depth_offset: isize,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            sink: None,
            formatter: None,
            metrics: None,
            depth_offset: 0,
        }
    }

    /// Backend receiving formatted lines. Without one, the logger writes to
    /// [`default_sink`].
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Use a [`DefaultFormatter`] with the given options.
    #[must_use = "builder methods return a new value"]
    pub fn formatter_config(mut self, config: FormatterConfig) -> Self {
        self.formatter = Some(config.into_formatter());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn depth_offset(mut self, offset: isize) -> Self {
        self.depth_offset = offset;
        self
    }

    /// Share counters with other loggers.
    #[must_use = "builder methods return a new value"]
    pub fn metrics(mut self, metrics: Arc<LoggerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            sink: self.sink,
            formatter: self
                .formatter
                .unwrap_or_else(|| Arc::new(DefaultFormatter::default())),
            metrics: self.metrics.unwrap_or_default(),
            depth_offset: self.depth_offset,
            verbosity: 0,
            prefix: String::new(),
            values: Vec::new(),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use crate::kv;
    use crate::sinks::MemorySink;
    use parking_lot::{Mutex, MutexGuard};

    // The threshold is process-global; tests touching it take turns.
    static THRESHOLD_LOCK: Mutex<()> = parking_lot::const_mutex(());

    struct Threshold {
        previous: usize,
        _guard: MutexGuard<'static, ()>,
    }

    fn threshold(v: usize) -> Threshold {
        let guard = THRESHOLD_LOCK.lock();
        Threshold {
            previous: verbosity::set_verbosity(v),
            _guard: guard,
        }
    }

    impl Drop for Threshold {
        fn drop(&mut self) {
            verbosity::set_verbosity(self.previous);
        }
    }

    fn capture() -> (Arc<MemorySink>, Logger) {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::new(sink.clone());
        (sink, logger)
    }

    #[test]
    fn test_info() {
        let _t = threshold(0);
        let (sink, logger) = capture();
        logger.info("test", &[]);
        assert_eq!(sink.contents(), "[verbosity=0] test\n");
    }

    #[test]
    fn test_error() {
        let _t = threshold(0);
        let (sink, logger) = capture();
        logger.error(&std::io::Error::other("test"), "test", &[]);
        assert_eq!(sink.contents(), "[Error=test] [verbosity=0] test\n");
    }

    #[test]
    fn test_name_append() {
        let _t = threshold(0);
        let (sink, logger) = capture();
        logger.with_name("a").with_name("b").info("test", &[]);
        assert_eq!(sink.contents(), "[name=a/b] [verbosity=0] test\n");
    }

    #[test]
    fn test_info_kv() {
        let _t = threshold(0);
        let (sink, logger) = capture();
        logger.info("test", &kv!["k", "v"]);
        assert_eq!(sink.contents(), "[verbosity=0] [k=v] test\n");
    }

    #[test]
    fn test_with_values_sorted_after_call_values() {
        let _t = threshold(0);
        let (sink, logger) = capture();
        logger.with_values(&kv!["b", 1]).info("test", &kv!["a", 2]);
        assert_eq!(sink.contents(), "[verbosity=0] [a=2] [b=1] test\n");
    }

    #[test]
    fn test_verbosity_gate() {
        let t = threshold(0);
        let (sink, logger) = capture();
        logger.v(1).info("hidden", &[]);
        assert!(sink.is_empty());
        assert_eq!(logger.metrics().suppressed_count(), 1);
        drop(t);

        let _t = threshold(1);
        logger.v(1).info("shown", &[]);
        assert_eq!(sink.contents(), "[verbosity=1] shown\n");
    }

    #[test]
    fn test_error_ignores_verbosity() {
        let _t = threshold(0);
        let (sink, logger) = capture();
        logger.v(5).error(&std::io::Error::other("e"), "still written", &[]);
        assert_eq!(sink.contents(), "[Error=e] [verbosity=5] still written\n");
    }

    #[test]
    fn test_derivation_leaves_parent_untouched() {
        let (_, root) = capture();
        let parent = root.with_name("p").with_values(&kv!["x", 1]);
        let left = parent.with_values(&kv!["l", 1]).with_name("left");
        let right = parent.with_values(&kv!["r", 2]).v(3);

        assert_eq!(parent.name(), "p");
        assert_eq!(parent.values(), kv!["x", 1].as_slice());
        assert_eq!(left.values(), kv!["x", 1, "l", 1].as_slice());
        assert_eq!(right.values(), kv!["x", 1, "r", 2].as_slice());
        assert_eq!(left.name(), "p/left");
        assert_eq!(right.verbosity(), 3);
        assert_eq!(left.verbosity(), 0);
    }

    #[test]
    fn test_v_is_not_cumulative() {
        let (_, logger) = capture();
        assert_eq!(logger.v(2).v(1).verbosity(), 1);
    }

    #[test]
    fn test_call_depth() {
        let _t = threshold(0);
        let (sink, logger) = capture();

        logger.info("direct", &[]);
        logger.with_call_depth(2).info("shim", &[]);

        let depths: Vec<usize> = sink.records().iter().map(|r| r.call_depth).collect();
        assert_eq!(depths, vec![1 + ADAPTER_OFFSET, 3 + ADAPTER_OFFSET]);
    }

    #[test]
    fn test_negative_depth_offset_is_clamped() {
        let _t = threshold(0);
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::builder().sink(sink.clone()).depth_offset(-10).build();
        logger.info("x", &[]);
        assert_eq!(sink.records()[0].call_depth, 1 + ADAPTER_OFFSET);
    }

    struct FailingSink;

    impl Sink for FailingSink {
        fn output(&self, _call_depth: usize, _line: &str) -> Result<()> {
            Err(LoggerError::writer("simulated failure"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_sink_failure_is_swallowed() {
        let _t = threshold(0);
        let logger = Logger::new(Arc::new(FailingSink));
        for _ in 0..3 {
            logger.info("lost", &[]);
        }
        logger.error(&std::io::Error::other("e"), "lost too", &[]);
        assert_eq!(logger.metrics().dropped_count(), 4);
        assert_eq!(logger.metrics().total_logged(), 0);
    }

    #[test]
    fn test_metrics_shared_along_chain() {
        let _t = threshold(0);
        let (_, root) = capture();
        root.with_name("a").info("one", &[]);
        root.with_values(&kv!["k", 1]).info("two", &[]);
        assert_eq!(root.metrics().total_logged(), 2);
    }
}
