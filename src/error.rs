//! Error types for scte224
//!
//! This module defines all error types used throughout the library.
//! Conversion between schema revisions never fails; every variant here
//! originates from reading, writing, or loading a document.

use std::fmt;
use thiserror::Error;

use crate::duration::DurationError;

/// Result type alias using the scte224 Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scte224 operations
#[derive(Error, Debug)]
pub enum Error {
    /// Document structure error with location context
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The root element is not the one the caller asked for
    #[error("unexpected root element {found}, expected {expected}")]
    UnexpectedRoot {
        /// Qualified name that was expected
        expected: String,
        /// Qualified name that was found
        found: String,
    },

    /// Value error (invalid attribute or text value)
    #[error("value error: {0}")]
    Value(String),

    /// Duration literal rejected under the strict duration policy
    #[error("duration error: {0}")]
    Duration(#[from] DurationError),

    /// Encoding error (model to XML serialization)
    #[error("encoding error: {0}")]
    Encode(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Requested version pair or document kind has no conversion
    #[error("unsupported conversion: {0}")]
    UnsupportedConversion(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON export error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        Error::Parse(
            ParseError::new(err.to_string()).with_location(format!("{}:{}", pos.row, pos.col)),
        )
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Encode(err.to_string())
    }
}

/// Document parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the document (row:column)
    pub location: Option<String>,
    /// Element path or snippet that caused the error
    pub source: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            source: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        if let Some(ref src) = self.source {
            write!(f, "\n\nSource:\n{}", src)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Invalid attribute value")
            .with_location("3:14")
            .with_source("MediaPoint/@order");

        let msg = format!("{}", err);
        assert!(msg.contains("Invalid attribute value"));
        assert!(msg.contains("Location: 3:14"));
        assert!(msg.contains("Source:"));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ParseError::new("test").into();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_roxmltree_error_carries_position() {
        let xml_err = roxmltree::Document::parse("<Media>").unwrap_err();
        let err: Error = xml_err.into();
        match err {
            Error::Parse(parse) => assert!(parse.location.is_some()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_root_display() {
        let err = Error::UnexpectedRoot {
            expected: "{http://www.scte.org/schemas/224}Media".to_string(),
            found: "{http://www.scte.org/schemas/224}Policy".to_string(),
        };
        assert!(err.to_string().contains("expected {http://www.scte.org/schemas/224}Media"));
    }
}
