// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for bagstream.
//!
//! Every failure aborts the decode call in progress. The variants separate
//! where a failure came from:
//! - the byte source ran dry ([`BagError::UnexpectedEof`], [`BagError::Io`])
//! - the bytes are well delimited but invalid ([`BagError::InvalidFormat`],
//!   [`BagError::MissingField`], [`BagError::InvalidField`])
//! - the bytes are legitimate but use something not implemented
//!   ([`BagError::Unsupported`])
//! - the message consumer misbehaved ([`BagError::ContractViolation`],
//!   [`BagError::Handler`])

use std::io;

use thiserror::Error;

/// Errors that can occur while decoding a bag stream.
#[derive(Debug, Clone, Error)]
pub enum BagError {
    /// The source ended in the middle of a structure
    #[error(
        "Unexpected end of bag stream{} while reading {context}",
        at_byte(.position)
    )]
    UnexpectedEof {
        /// What was being read
        context: String,
        /// Bytes consumed from the source before the failure, if known
        position: Option<u64>,
    },

    /// Structurally delimited but semantically invalid data
    #[error("Invalid bag format in {context}: {message}")]
    InvalidFormat {
        /// What was being decoded
        context: String,
        /// Error message
        message: String,
    },

    /// A required header field is absent
    #[error("Required field '{field}' missing from {record} record")]
    MissingField {
        /// Field name
        field: String,
        /// Record kind the field belongs to
        record: String,
    },

    /// A header field has the wrong size for its fixed-width interpretation
    #[error("Invalid value for field '{field}': expected {expected}, got {actual}")]
    InvalidField {
        /// Field name
        field: String,
        /// Expected shape of the value
        expected: String,
        /// Actual shape of the value
        actual: String,
    },

    /// Well-formed input that uses a capability this decoder lacks
    #[error("Unsupported feature: '{feature}'")]
    Unsupported {
        /// What is not supported
        feature: String,
    },

    /// The message consumer asked for more bytes than the message holds
    #[error("Contract violation in {operation}: requested {requested} bytes, but only {remaining} remain in the message")]
    ContractViolation {
        /// Read operation that was attempted
        operation: String,
        /// Requested bytes
        requested: u64,
        /// Bytes left in the message budget
        remaining: u64,
    },

    /// Non-EOF failure of the underlying byte source
    #[error("I/O error: {message}")]
    Io {
        /// Error message
        message: String,
    },

    /// Failure raised by the external message consumer
    #[error("Message handler failed: {message}")]
    Handler {
        /// Error message
        message: String,
    },
}

impl BagError {
    /// Create an unexpected-termination error.
    pub fn unexpected_eof(context: impl Into<String>, position: u64) -> Self {
        BagError::UnexpectedEof {
            context: context.into(),
            position: Some(position),
        }
    }

    /// Create a format violation error.
    pub fn format(context: impl Into<String>, message: impl Into<String>) -> Self {
        BagError::InvalidFormat {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a missing required field error.
    pub fn missing_field(field: impl Into<String>, record: impl Into<String>) -> Self {
        BagError::MissingField {
            field: field.into(),
            record: record.into(),
        }
    }

    /// Create an invalid field value error.
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        BagError::InvalidField {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        BagError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Create a contract violation error.
    pub fn contract_violation(operation: impl Into<String>, requested: u64, remaining: u64) -> Self {
        BagError::ContractViolation {
            operation: operation.into(),
            requested,
            remaining,
        }
    }

    /// Create a handler error, for use by message consumers.
    pub fn handler(message: impl Into<String>) -> Self {
        BagError::Handler {
            message: message.into(),
        }
    }

    /// Attach a position to an I/O error raised by the byte source.
    ///
    /// EOF becomes [`BagError::UnexpectedEof`], anything else [`BagError::Io`].
    pub fn from_io(err: io::Error, context: impl Into<String>, position: u64) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            BagError::unexpected_eof(context, position)
        } else {
            BagError::Io {
                message: format!("{}: {err}", context.into()),
            }
        }
    }

    /// True for unexpected termination of the source.
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, BagError::UnexpectedEof { .. })
    }

    /// True for format violations.
    pub fn is_format_violation(&self) -> bool {
        matches!(self, BagError::InvalidFormat { .. })
    }

    /// True for consumer over-reads.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, BagError::ContractViolation { .. })
    }

    /// True for unsupported features.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, BagError::Unsupported { .. })
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            BagError::UnexpectedEof { context, position } => {
                let mut fields = vec![("context", context.clone())];
                if let Some(position) = position {
                    fields.push(("position", position.to_string()));
                }
                fields
            }
            BagError::InvalidFormat { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            BagError::MissingField { field, record } => {
                vec![("field", field.clone()), ("record", record.clone())]
            }
            BagError::InvalidField {
                field,
                expected,
                actual,
            } => vec![
                ("field", field.clone()),
                ("expected", expected.clone()),
                ("actual", actual.clone()),
            ],
            BagError::Unsupported { feature } => vec![("feature", feature.clone())],
            BagError::ContractViolation {
                operation,
                requested,
                remaining,
            } => vec![
                ("operation", operation.clone()),
                ("requested", requested.to_string()),
                ("remaining", remaining.to_string()),
            ],
            BagError::Io { message } | BagError::Handler { message } => {
                vec![("message", message.clone())]
            }
        }
    }
}

/// Conversion for `?` on errors raised outside a [`ByteCursor`](crate::io::ByteCursor).
///
/// The stream position is unknown here, so an EOF carries none.
impl From<io::Error> for BagError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            BagError::UnexpectedEof {
                context: "byte source".to_string(),
                position: None,
            }
        } else {
            BagError::Io {
                message: format!("byte source: {err}"),
            }
        }
    }
}

fn at_byte(position: &Option<u64>) -> String {
    match position {
        Some(position) => format!(" at byte {position}"),
        None => String::new(),
    }
}

/// Result type for bagstream operations.
pub type Result<T> = std::result::Result<T, BagError>;
