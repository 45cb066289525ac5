use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for health-risk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kind, one per failure class of the service.
///
/// Every kind maps to a fixed HTTP status code. `Startup` errors never reach a
/// client because the process refuses to start, but the mapping is kept total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed request, rejected before the model is consulted
    Validation,
    /// The model could not produce a usable prediction
    Inference,
    /// Configuration or model artifact could not be loaded
    Startup,
}

impl ErrorKind {
    /// HTTP status code for this kind
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 422,
            ErrorKind::Inference => 500,
            ErrorKind::Startup => 503,
        }
    }
}

/// A single offending request field.
///
/// Serializes as `{"loc": [...], "msg": "...", "type": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Location of the value, e.g. `["body", "PM25"]`
    pub loc: Vec<String>,
    /// Human readable message
    pub msg: String,
    /// Machine readable error type
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    fn at_field(field: &str, msg: &str, kind: &str) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Required field is absent
    pub fn missing(field: &str) -> Self {
        Self::at_field(field, "Field required", "missing")
    }

    /// String value that does not parse as a number
    pub fn unparsable_number(field: &str) -> Self {
        Self::at_field(
            field,
            "Input should be a valid number, unable to parse string as a number",
            "float_parsing",
        )
    }

    /// Value of a JSON type that can never be a number (null, array, object)
    pub fn not_a_number(field: &str) -> Self {
        Self::at_field(field, "Input should be a valid number", "float_type")
    }

    /// Problem with the request body as a whole
    pub fn body(msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: vec!["body".to_string()],
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc.join("."), self.msg)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Create a validation error from the offending fields
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Error::Validation(errors)
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Error::Inference(msg.into())
    }

    /// Create a startup error
    pub fn startup(msg: impl Into<String>) -> Self {
        Error::Startup(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Error::Serialization(msg.into())
    }

    /// The kind this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Inference(_) => ErrorKind::Inference,
            Error::Startup(_)
            | Error::Config(_)
            | Error::Serialization(_)
            | Error::Io(_) => ErrorKind::Startup,
        }
    }

    /// Offending fields of a validation error, empty for every other kind
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Error context trait for adding context to errors
pub trait WithErrorContext {
    fn with_context(self, context: impl Into<String>) -> Self;
}

impl<T> WithErrorContext for Result<T> {
    fn with_context(self, context: impl Into<String>) -> Self {
        self.map_err(|e| {
            let context_str = context.into();
            match e {
                Error::Inference(msg) => Error::Inference(format!("{}: {}", context_str, msg)),
                Error::Startup(msg) => Error::Startup(format!("{}: {}", context_str, msg)),
                Error::Config(msg) => Error::Config(format!("{}: {}", context_str, msg)),
                Error::Serialization(msg) => Error::Serialization(format!("{}: {}", context_str, msg)),
                Error::Io(err) => Error::Startup(format!("{}: {}", context_str, err)),
                // field locations already identify the problem
                Error::Validation(errors) => Error::Validation(errors),
            }
        })
    }
}

/// Main error type for the health-risk service
#[derive(Error, Debug)]
pub enum Error {
    /// Request fields missing or not numeric
    #[error("Validation error: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Model inference failed; the message is returned verbatim to the client
    #[error("{0}")]
    Inference(String),

    /// Model artifact could not be loaded or is inconsistent
    #[error("Startup error: {0}")]
    Startup(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
