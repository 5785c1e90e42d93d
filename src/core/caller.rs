//! Call-site discovery
//!
//! Sinks attribute lines to a source location by walking `call_depth` frames
//! up from their own caller. Wrapper layers between the application and the
//! logger add frames the application never wrote, so before emitting the
//! logger measures how far away the real call site is.
//!
//! Frame indices follow one convention throughout: index 0 is the function
//! that captured the [`StackSnapshot`], 1 its caller, and so on.

use std::backtrace::Backtrace;
use std::fmt;
use std::path::Path;

/// Frames examined before giving up. Index 1 is the immediate caller.
pub const MAX_CALLER_SEARCH: usize = 3;

/// Depth used when no real frame can be found.
pub const FALLBACK_DEPTH: usize = 1;

/// File name reported for compiler-generated frames.
pub const AUTOGENERATED_FILE: &str = "<autogenerated>";

/// Symbol fragments of compiler-generated trampolines.
const SHIM_MARKERS: &[&str] = &["{{vtable.shim}}", "{{reify.shim}}", "core::ops::function::"];

/// Symbol of the capturing function; everything up to it is capture machinery.
const CAPTURE_SYMBOL: &str = "StackSnapshot::capture";

/// One resolved stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub symbol: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            file: None,
            line: None,
        }
    }

    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Whether the frame was generated by the compiler rather than written
    /// by anyone.
    pub fn is_synthetic(&self) -> bool {
        self.file.as_deref() == Some(AUTOGENERATED_FILE)
            || SHIM_MARKERS.iter().any(|m| self.symbol.contains(m))
    }

    /// `file:line`, with the file reduced to its final component when
    /// `full_path` is false. `None` when the frame has no location.
    pub fn location(&self, full_path: bool) -> Option<String> {
        let file = self.file.as_deref()?;
        let file = if full_path {
            file
        } else {
            Path::new(file)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(file)
        };
        Some(format!("{}:{}", file, self.line.unwrap_or(0)))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location(true) {
            Some(loc) => write!(f, "{} ({})", self.symbol, loc),
            None => write!(f, "{}", self.symbol),
        }
    }
}

/// Anything that can answer "which frame is `skip` levels up".
pub trait FrameSource {
    fn frame(&self, skip: usize) -> Option<Frame>;
}

/// The call stack at the moment of capture
#[derive(Debug, Clone, Default)]
pub struct StackSnapshot {
    frames: Vec<Frame>,
}

impl StackSnapshot {
    /// Capture the current stack. Frame 0 is the function calling `capture`.
    ///
    /// Builds without symbols yield an empty snapshot, in which every lookup
    /// misses.
    #[inline(never)]
    pub fn capture() -> Self {
        let rendered = Backtrace::force_capture().to_string();
        let frames = parse_backtrace(&rendered);

        match frames.iter().position(|f| f.symbol.contains(CAPTURE_SYMBOL)) {
            Some(idx) => Self {
                frames: frames.into_iter().skip(idx + 1).collect(),
            },
            None => Self::default(),
        }
    }

    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for StackSnapshot {
    fn frame(&self, skip: usize) -> Option<Frame> {
        self.frames.get(skip).cloned()
    }
}

/// Parse the textual form of a [`Backtrace`].
///
/// Each symbol line starts a frame (inlined calls are printed as their own
/// unnumbered symbol lines); an `at file:line:col` line attaches a location
/// to the frame before it.
fn parse_backtrace(rendered: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();

    for raw in rendered.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(loc) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let (file, line_no) = split_location(loc);
                frame.file = Some(file.to_string());
                frame.line = line_no;
            }
            continue;
        }

        let symbol = match line.split_once(": ") {
            Some((idx, rest)) if idx.chars().all(|c| c.is_ascii_digit()) => rest,
            _ => line,
        };
        frames.push(Frame::new(symbol));
    }

    frames
}

/// Split `file:line:col` into the file and the line number.
fn split_location(loc: &str) -> (&str, Option<u32>) {
    let mut parts = loc.rsplitn(3, ':');
    let col = parts.next();
    let line = parts.next();
    match (parts.next(), line, col) {
        (Some(file), Some(line), Some(_)) => (file, line.parse().ok()),
        _ => (loc, None),
    }
}

/// How many frames separate the caller of the function that captured
/// `source` from the first frame that is not compiler-generated.
///
/// Returns [`FALLBACK_DEPTH`] when no real frame turns up within
/// [`MAX_CALLER_SEARCH`] frames.
pub fn frames_to_caller_in(source: &dyn FrameSource) -> usize {
    for i in 1..MAX_CALLER_SEARCH {
        // +1 for the frame that captured the stack
        if let Some(frame) = source.frame(i + 1) {
            if !frame.is_synthetic() {
                return i;
            }
        }
    }
    FALLBACK_DEPTH
}

/// Distance from the calling function to its nearest real caller.
#[inline(never)]
pub fn frames_to_caller() -> usize {
    frames_to_caller_in(&StackSnapshot::capture())
}
