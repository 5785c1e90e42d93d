//! Logging macros for key/value lists.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use stdlogr::{error, info, kv, Logger, MemorySink};
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = Logger::new(sink.clone()).with_values(&kv!["service", "api"]);
//!
//! info!(logger, "request served", "status", 200, "path", "/health");
//!
//! let err = std::io::Error::other("connection reset");
//! error!(logger, err, "request failed", "attempt", 3);
//!
//! assert_eq!(sink.len(), 2);
//! ```

/// Build an alternating key/value list.
///
/// Every item goes through `FieldValue::from`, so keys and values may be any
/// convertible type; keys that are not strings are reported by the formatter.
///
/// ```
/// use stdlogr::{kv, FieldValue};
///
/// let list = kv!["user", "alice", "id", 7];
/// assert_eq!(list[3], FieldValue::Int(7));
/// assert!(kv![].is_empty());
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        ::std::vec::Vec::<$crate::FieldValue>::new()
    };
    ($($item:expr),+ $(,)?) => {
        ::std::vec![$($crate::FieldValue::from($item)),+]
    };
}

/// Log an informational message with optional key/value pairs.
///
/// ```
/// # use std::sync::Arc;
/// # use stdlogr::{Logger, MemorySink};
/// # let logger = Logger::new(Arc::new(MemorySink::new()));
/// use stdlogr::info;
/// info!(logger, "cache warmed");
/// info!(logger, "cache warmed", "entries", 1024);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $msg:expr) => {
        $logger.info($msg, &$crate::kv![])
    };
    ($logger:expr, $msg:expr, $($kv:expr),+ $(,)?) => {
        $logger.info($msg, &$crate::kv![$($kv),+])
    };
}

/// Log an error with a message and optional key/value pairs.
///
/// ```
/// # use std::sync::Arc;
/// # use stdlogr::{Logger, MemorySink};
/// # let logger = Logger::new(Arc::new(MemorySink::new()));
/// use stdlogr::error;
/// let err = std::io::Error::other("timeout");
/// error!(logger, err, "upstream unavailable", "host", "db-1");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $err:expr, $msg:expr) => {
        $logger.error(&$err, $msg, &$crate::kv![])
    };
    ($logger:expr, $err:expr, $msg:expr, $($kv:expr),+ $(,)?) => {
        $logger.error(&$err, $msg, &$crate::kv![$($kv),+])
    };
}
