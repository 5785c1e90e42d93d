//! Sink trait for line output destinations

use super::error::Result;

/// A line-oriented backend.
///
/// `output` receives a fully formatted line (newline included) and the
/// number of frames between the sink's caller and the application call site.
/// A sink that annotates lines with a source location walks that many frames
/// up from its own caller; others may ignore it. Sinks are shared by every
/// logger derived from the same root and must handle concurrent calls.
pub trait Sink: Send + Sync {
    fn output(&self, call_depth: usize, line: &str) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;

    /// Whether `output` looks at `call_depth`. When false the logger skips
    /// call-site discovery and passes an unresolved depth.
    fn wants_call_depth(&self) -> bool {
        true
    }
}
