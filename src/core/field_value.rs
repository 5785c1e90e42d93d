//! Values carried in key/value lists
//!
//! Key/value lists alternate keys and values in a flat sequence. Keys are
//! expected to be [`FieldValue::Str`]; anything else is reported in-band by
//! the formatter instead of failing the log call.

use std::fmt;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Rendered error message
    Error(String),
    /// Any other displayable value, with the name of its Rust type
    Opaque {
        type_name: &'static str,
        repr: String,
    },
    Null,
}

impl FieldValue {
    /// Capture an error's display message.
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        FieldValue::Error(err.to_string())
    }

    /// Capture any displayable value together with its type name.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        FieldValue::Opaque {
            type_name: std::any::type_name::<T>(),
            repr: value.to_string(),
        }
    }

    /// Key text if this value can act as a key.
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the runtime type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Int(_) => "i64",
            FieldValue::Uint(_) => "u64",
            FieldValue::Float(_) => "f64",
            FieldValue::Bool(_) => "bool",
            FieldValue::Error(_) => "error",
            FieldValue::Opaque { type_name, .. } => type_name,
            FieldValue::Null => "null",
        }
    }

    /// Whether the value is textual and therefore subject to quoting.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldValue::Str(_) | FieldValue::Error(_) | FieldValue::Opaque { .. }
        )
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Error(e) => write!(f, "{}", e),
            FieldValue::Opaque { repr, .. } => write!(f, "{}", repr),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Str(s.clone())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<char> for FieldValue {
    fn from(c: char) -> Self {
        FieldValue::Str(c.to_string())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(i: $t) -> Self {
                FieldValue::Int(i as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(u: $t) -> Self {
                FieldValue::Uint(u as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}
