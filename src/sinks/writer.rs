//! Line sink over any `io::Write`

use crate::core::{
    caller::{FrameSource, StackSnapshot},
    LoggerError, Result, Sink, TimestampFormat,
};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// How a source location is rendered in the line header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationStyle {
    /// `main.rs:42`
    Short,
    /// `/home/dev/app/src/main.rs:42`
    Long,
}

/// Written when the requested frame cannot be resolved.
const UNKNOWN_LOCATION: &str = "???:0";

/// Writes each line to `W`, optionally preceded by a header of
/// `<prefix><timestamp> <file:line>: `.
///
/// Writes are serialized, so one sink can back any number of loggers.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
    name: String,
    prefix: String,
    timestamp_format: Option<TimestampFormat>,
    location: Option<LocationStyle>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self::named(writer, "writer")
    }

    fn named(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            name: name.into(),
            prefix: String::new(),
            timestamp_format: None,
            location: None,
        }
    }

    /// Text written at the very start of every line
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Header timestamp; leave the formatter's timestamp unset when using this
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    /// Annotate lines with the file and line they were logged from
    #[must_use]
    pub fn with_location(mut self, style: LocationStyle) -> Self {
        self.location = Some(style);
        self
    }

    /// Run `f` against the underlying writer, holding the write lock.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        let mut writer = self.writer.lock();
        f(&mut writer)
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::named(io::stderr(), "stderr")
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::named(io::stdout(), "stdout")
    }
}

impl WriterSink<BufWriter<File>> {
    /// Append to the file at `path`, creating it if needed.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}' for append", path.display()),
                    e,
                )
            })?;
        Ok(Self::named(BufWriter::new(file), "file"))
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    #[inline(never)]
    fn output(&self, call_depth: usize, line: &str) -> Result<()> {
        // Captured here so frame 0 is this function and `call_depth` counts from its caller
        let snapshot = if self.location.is_some() {
            StackSnapshot::capture()
        } else {
            StackSnapshot::default()
        };

        let mut buf = String::with_capacity(self.prefix.len() + line.len() + 48);
        buf.push_str(&self.prefix);

        if let Some(ref ts) = self.timestamp_format {
            buf.push_str(&ts.format_now());
            buf.push(' ');
        }

        if let Some(style) = self.location {
            let location = snapshot
                .frame(call_depth)
                .and_then(|frame| frame.location(style == LocationStyle::Long));
            buf.push_str(location.as_deref().unwrap_or(UNKNOWN_LOCATION));
            buf.push_str(": ");
        }

        buf.push_str(line);
        if !line.ends_with('\n') {
            buf.push('\n');
        }

        self.writer
            .lock()
            .write_all(buf.as_bytes())
            .map_err(|e| LoggerError::io_operation("writing log line", self.name.clone(), e))
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn wants_call_depth(&self) -> bool {
        self.location.is_some()
    }
}

impl<W: Write + Send> Drop for WriterSink<W> {
    fn drop(&mut self) {
        // Ensure all buffered data reaches the writer
        let _ = self.writer.get_mut().flush();
    }
}
