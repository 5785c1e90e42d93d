//! Log entry structure
//!
//! An [`Entry`] is everything a [`Formatter`](super::formatter::Formatter)
//! needs to render one line. It is built fresh for every emitted call.

use super::field_value::FieldValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    /// Error passed to `Logger::error`, already rendered.
    pub error: Option<String>,
    /// Slash-joined name segments added by `Logger::with_name`.
    pub name: String,
    /// How little the entry matters; zero matters most.
    pub verbosity: usize,
    /// Constant description of what happened. Never a format string.
    pub message: String,
    /// Alternating keys and values.
    pub fields: Vec<FieldValue>,
}

impl Entry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_verbosity(mut self, verbosity: usize) -> Self {
        self.verbosity = verbosity;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldValue>) -> Self {
        self.fields = fields;
        self
    }
}
