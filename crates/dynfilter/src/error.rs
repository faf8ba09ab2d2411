//! Error types for dynfilter operations.

use thiserror::Error;

/// The error type for dynfilter operations.
#[derive(Debug, Error)]
pub enum Error {
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A filter root was something other than a JSON object.
    #[error("Filter must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type name of the rejected value.
        found: &'static str,
    },

    /// A nested part of the filter has the wrong shape.
    #[error("Malformed filter at '{path}': {reason}")]
    MalformedFilter {
        /// Dotted location of the offending value, e.g. `author._and[1]`.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The filter nests deeper than the resolver allows.
    #[error("Filter nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),

    /// A `$NOW(...)` adjustment did not match the adjustment grammar.
    #[error("Invalid date adjustment: {0}")]
    InvalidAdjustment(String),

    /// Applying an adjustment overflowed the representable date range.
    #[error("Date adjustment out of range: {0}")]
    DateOutOfRange(String),
}

impl Error {
    /// Prefix the location of a [`Error::MalformedFilter`] with a parent segment.
    ///
    /// Other variants are returned untouched. Array indices (`[1]`) attach
    /// without a separating dot.
    #[must_use]
    pub fn within(self, segment: &str) -> Self {
        match self {
            Error::MalformedFilter { path, reason } => {
                let path = if path.is_empty() {
                    segment.to_string()
                } else if path.starts_with('[') {
                    format!("{segment}{path}")
                } else {
                    format!("{segment}.{path}")
                };
                Error::MalformedFilter { path, reason }
            }
            other => other,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedFilter {
            path: String::new(),
            reason: reason.into(),
        }
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A specialized Result type for dynfilter operations.
pub type Result<T> = std::result::Result<T, Error>;
