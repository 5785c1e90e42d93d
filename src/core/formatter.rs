//! Rendering of entries into single text lines
//!
//! [`DefaultFormatter`] produces
//!
//! ```text
//! [<timestamp> ][Error=<err>] [name=<name>] [verbosity=<n>] [<key>=<value>]... <message>\n
//! ```
//!
//! where the timestamp, error, name and field components appear only when
//! configured or populated. Fields are sorted by key so output does not depend
//! on the order the caller supplied them in.

use super::entry::Entry;
use super::error::Result;
use super::field_value::FieldValue;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::Arc;

/// Renders an [`Entry`] into one line of text, newline included.
///
/// Implementations are shared between threads and must not keep mutable
/// state of their own. Closures of the right shape are formatters too:
///
/// ```
/// use stdlogr::{Entry, Formatter};
///
/// let terse = |e: &Entry| format!("{}\n", e.message);
/// assert_eq!(terse.format(&Entry::new("hi")), "hi\n");
/// ```
pub trait Formatter: Send + Sync {
    fn format(&self, entry: &Entry) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&Entry) -> String + Send + Sync,
{
    fn format(&self, entry: &Entry) -> String {
        self(entry)
    }
}

/// Options recognized by [`DefaultFormatter`]
///
/// # Examples
///
/// ```
/// use stdlogr::{FormatterConfig, TimestampFormat};
///
/// let config = FormatterConfig::new()
///     .with_timestamp_format(TimestampFormat::Rfc3339)
///     .with_hide_keys(true);
///
/// let parsed = FormatterConfig::from_json(r#"{"hide_keys": true, "force_quote": true}"#).unwrap();
/// assert!(parsed.force_quote);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Timestamp rendered at the start of the line; `None` omits it
    pub timestamp_format: Option<TimestampFormat>,
    /// Render `[value]` instead of `[key=value]`
    pub hide_keys: bool,
    /// Render textual values, the error and the message as escaped,
    /// double-quoted strings
    pub force_quote: bool,
}

impl FormatterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    /// Set a custom strftime timestamp
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = Some(TimestampFormat::Custom(format_str.to_string()));
        self
    }

    #[must_use]
    pub fn with_hide_keys(mut self, hide: bool) -> Self {
        self.hide_keys = hide;
        self
    }

    #[must_use]
    pub fn with_force_quote(mut self, quote: bool) -> Self {
        self.force_quote = quote;
        self
    }

    /// Parse a configuration from JSON; absent options keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every option can actually be rendered
    pub fn validate(&self) -> Result<()> {
        match self.timestamp_format {
            Some(ref format) => format.validate(),
            None => Ok(()),
        }
    }

    /// Wrap this config in a formatter ready to hand to a logger
    #[must_use]
    pub fn into_formatter(self) -> Arc<dyn Formatter> {
        Arc::new(DefaultFormatter::new(self))
    }
}

static MISSING_VALUE: FieldValue = FieldValue::Null;

/// The stock line formatter
#[derive(Debug, Clone, Default)]
pub struct DefaultFormatter {
    config: FormatterConfig,
}

impl DefaultFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    // Writes into a String cannot fail, so `write!` results are ignored below.
    fn write_text(&self, out: &mut String, text: &str) {
        if self.config.force_quote {
            let _ = write!(out, "{:?}", text);
        } else {
            out.push_str(text);
        }
    }

    fn write_value(&self, out: &mut String, value: &FieldValue) {
        if self.config.force_quote && value.is_textual() {
            let _ = write!(out, "{:?}", value.to_string());
        } else {
            let _ = write!(out, "{}", value);
        }
    }

    /// Sorted `[key=value]` items. A key that is not a string replaces the
    /// whole field list with a placeholder.
    fn write_fields(&self, out: &mut String, fields: &[FieldValue]) {
        let mut pairs: Vec<(&str, &FieldValue)> = Vec::with_capacity(fields.len().div_ceil(2));

        for chunk in fields.chunks(2) {
            let Some(key) = chunk[0].as_key() else {
                let bad = &chunk[0];
                let _ = write!(
                    out,
                    "**key is not a string: {}(type={})**",
                    bad,
                    bad.type_name()
                );
                return;
            };
            pairs.push((key, chunk.get(1).unwrap_or(&MISSING_VALUE)));
        }

        // Stable: repeated keys keep the order they were supplied in
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push('[');
            if !self.config.hide_keys {
                out.push_str(key);
                out.push('=');
            }
            self.write_value(out, value);
            out.push(']');
        }
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, entry: &Entry) -> String {
        let mut out = String::with_capacity(32 + entry.message.len() + entry.fields.len() * 16);

        if let Some(ref ts) = self.config.timestamp_format {
            out.push_str(&ts.format_now());
            out.push(' ');
        }
        if let Some(ref err) = entry.error {
            out.push_str("[Error=");
            self.write_text(&mut out, err);
            out.push_str("] ");
        }
        if !entry.name.is_empty() {
            let _ = write!(out, "[name={}] ", entry.name);
        }
        let _ = write!(out, "[verbosity={}]", entry.verbosity);

        if !entry.fields.is_empty() {
            out.push(' ');
            self.write_fields(&mut out, &entry.fields);
        }

        out.push(' ');
        self.write_text(&mut out, &entry.message);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv;

    fn render(entry: &Entry) -> String {
        DefaultFormatter::default().format(entry)
    }

    #[test]
    fn test_bare_entry() {
        assert_eq!(render(&Entry::new("test")), "[verbosity=0] test\n");
        assert_eq!(
            render(&Entry::new("quiet").with_verbosity(4)),
            "[verbosity=4] quiet\n"
        );
    }

    #[test]
    fn test_error_and_name_prefix() {
        let entry = Entry::new("failed")
            .with_error("boom")
            .with_name("db/pool")
            .with_verbosity(1);
        assert_eq!(
            render(&entry),
            "[Error=boom] [name=db/pool] [verbosity=1] failed\n"
        );
    }

    #[test]
    fn test_fields_are_sorted_by_key() {
        let entry = Entry::new("m").with_fields(kv!["b", 1, "a", 2]);
        assert_eq!(render(&entry), "[verbosity=0] [a=2] [b=1] m\n");
    }

    #[test]
    fn test_duplicate_keys_both_render() {
        let entry = Entry::new("m").with_fields(kv!["k", "first", "a", 0, "k", "second"]);
        assert_eq!(
            render(&entry),
            "[verbosity=0] [a=0] [k=first] [k=second] m\n"
        );
    }

    #[test]
    fn test_odd_length_list_renders_null() {
        let entry = Entry::new("m").with_fields(kv!["orphan"]);
        assert_eq!(render(&entry), "[verbosity=0] [orphan=null] m\n");
    }

    #[test]
    fn test_hide_keys() {
        let formatter = DefaultFormatter::new(FormatterConfig::new().with_hide_keys(true));
        let entry = Entry::new("m").with_fields(kv!["user", "alice", "attempt", 3]);
        assert_eq!(formatter.format(&entry), "[verbosity=0] [3] [alice] m\n");
    }

    #[test]
    fn test_malformed_key_replaces_all_fields() {
        let entry = Entry::new("m").with_fields(kv!["z", 1, 42, "v", "a", 2]);
        assert_eq!(
            render(&entry),
            "[verbosity=0] **key is not a string: 42(type=i64)** m\n"
        );

        let entry = Entry::new("m").with_fields(kv!["z", 1, 42, "v"]);
        assert_eq!(
            render(&entry),
            "[verbosity=0] **key is not a string: 42(type=i64)** m\n"
        );

        let entry = Entry::new("m").with_fields(kv![true, "v"]);
        assert_eq!(
            render(&entry),
            "[verbosity=0] **key is not a string: true(type=bool)** m\n"
        );
    }

    #[test]
    fn test_force_quote_keeps_single_line() {
        let formatter = DefaultFormatter::new(FormatterConfig::new().with_force_quote(true));
        let entry = Entry::new("line one\nline two").with_fields(kv!["text", "a\nb", "n", 5]);
        let line = formatter.format(&entry);

        assert_eq!(
            line,
            "[verbosity=0] [n=5] [text=\"a\\nb\"] \"line one\\nline two\"\n"
        );
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_timestamp_prefix() {
        let formatter =
            DefaultFormatter::new(FormatterConfig::new().with_custom_timestamp("%Y"));
        let line = formatter.format(&Entry::new("m"));
        let (year, rest) = line.split_once(' ').unwrap();
        assert_eq!(year.len(), 4);
        assert!(year.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(rest, "[verbosity=0] m\n");
    }

    #[test]
    fn test_config_from_json() {
        let config = FormatterConfig::from_json(
            r#"{"timestamp_format": "Rfc3339", "hide_keys": true}"#,
        )
        .unwrap();
        assert_eq!(config.timestamp_format, Some(TimestampFormat::Rfc3339));
        assert!(config.hide_keys);
        assert!(!config.force_quote);

        assert!(FormatterConfig::from_json("{\"hide_keys\": 3}").is_err());
    }

    #[test]
    fn test_config_rejects_bad_timestamp_pattern() {
        let err = FormatterConfig::from_json(r#"{"timestamp_format": {"Custom": "%Y %Q"}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::core::error::LoggerError::InvalidConfiguration { .. }
        ));

        assert!(FormatterConfig::new().with_custom_timestamp("%").validate().is_err());
        assert!(FormatterConfig::new().with_custom_timestamp("%H:%M").validate().is_ok());
    }

    #[test]
    fn test_closure_formatter() {
        let formatter: Arc<dyn Formatter> = Arc::new(|e: &Entry| format!("<{}>\n", e.message));
        assert_eq!(formatter.format(&Entry::new("x")), "<x>\n");
    }
}
