//! Error types for MPD parsing operations

use std::fmt;

use thiserror::Error;

use crate::common::iso8601::ScalarError;

/// Chain of element names from the document root to the element being decoded.
///
/// Repeated siblings carry their zero-based position among same-named
/// siblings, so a path renders like `MPD/Period[1]/AdaptationSet[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPath(Vec<String>);

impl ElementPath {
    pub(crate) fn push(&mut self, segment: String) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// Number of elements on the path.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// The individual path segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<document>");
        }
        f.write_str(&self.0.join("/"))
    }
}

/// An attribute on a specific element, used to localize scalar failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLocation {
    pub path: ElementPath,
    pub attribute: String,
}

impl fmt::Display for AttributeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.attribute)
    }
}

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedDocument,
    MalformedDuration,
    MalformedTimestamp,
    MalformedValue,
    Io,
    Serialization,
}

/// Errors that can occur while reading or writing an MPD
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input is not well-formed XML, is truncated, or has no `MPD` root
    #[error("Malformed document at {path} (byte {position}): {reason}")]
    MalformedDocument {
        path: ElementPath,
        position: u64,
        reason: String,
    },

    /// A duration or date-time attribute does not match its grammar
    #[error("Invalid value for {location}: {source}")]
    Scalar {
        location: AttributeLocation,
        #[source]
        source: ScalarError,
    },

    /// A numeric, boolean or enumerated attribute could not be parsed
    #[error("Invalid value {value:?} for {location}: expected {expected}")]
    MalformedValue {
        location: AttributeLocation,
        value: String,
        expected: &'static str,
    },

    /// The underlying reader failed
    #[error("Failed to read MPD input: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the model back to XML failed
    #[error("MPD serialization failed: {0}")]
    SerializationFailed(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::MalformedDocument { .. } => ErrorKind::MalformedDocument,
            ParseError::Scalar { source, .. } => match source {
                ScalarError::MalformedDuration { .. } => ErrorKind::MalformedDuration,
                ScalarError::MalformedTimestamp { .. } => ErrorKind::MalformedTimestamp,
            },
            ParseError::MalformedValue { .. } => ErrorKind::MalformedValue,
            ParseError::Io(_) => ErrorKind::Io,
            ParseError::SerializationFailed(_) => ErrorKind::Serialization,
        }
    }

    /// The attribute the error refers to, when it concerns a single attribute.
    pub fn location(&self) -> Option<&AttributeLocation> {
        match self {
            ParseError::Scalar { location, .. } | ParseError::MalformedValue { location, .. } => {
                Some(location)
            }
            _ => None,
        }
    }
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_path_display() {
        let mut path = ElementPath::default();
        assert_eq!(path.to_string(), "<document>");

        path.push("MPD".to_string());
        path.push("Period[2]".to_string());
        assert_eq!(path.to_string(), "MPD/Period[2]");
        assert_eq!(path.depth(), 2);

        path.pop();
        assert_eq!(path.segments(), ["MPD".to_string()]);
    }

    #[test]
    fn test_scalar_error_kind() {
        let err = ParseError::Scalar {
            location: AttributeLocation {
                path: ElementPath(vec!["MPD".to_string()]),
                attribute: "minBufferTime".to_string(),
            },
            source: ScalarError::MalformedDuration {
                input: "1.5".to_string(),
                reason: "missing 'P' designator",
            },
        };

        assert_eq!(err.kind(), ErrorKind::MalformedDuration);
        assert_eq!(err.location().unwrap().to_string(), "MPD@minBufferTime");
        assert!(err.to_string().contains("MPD@minBufferTime"));
    }
}
