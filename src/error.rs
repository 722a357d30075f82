//! Error types for snapshot assembly and its collaborators

use std::fmt;
use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// The row stream an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Term,
    Section,
    Instructor,
    Schedule,
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Term => "term",
            Self::Section => "section",
            Self::Instructor => "instructor",
            Self::Schedule => "schedule",
        };
        f.write_str(name)
    }
}

/// Catalog error types
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A row stream could not be read
    #[error("failed to query {kind} rows: {message}")]
    Query { kind: RowKind, message: String },

    /// A row was read but its columns could not be decoded
    #[error("failed to decode {kind} row: {message}")]
    Decode { kind: RowKind, message: String },

    /// A child row references a course key that was never built
    #[error("{kind} references nonexistent course code {key:?}")]
    DanglingCourse { kind: RowKind, key: String },

    /// Could not reach the relational store
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Create a query error for the given stream
    pub fn query<E: fmt::Display>(kind: RowKind, err: E) -> Self {
        Self::Query {
            kind,
            message: err.to_string(),
        }
    }

    /// Create a decode error for the given stream
    pub fn decode<E: fmt::Display>(kind: RowKind, err: E) -> Self {
        Self::Decode {
            kind,
            message: err.to_string(),
        }
    }

    /// Create a referential-integrity error naming the missing course key
    pub fn dangling_course(kind: RowKind, key: impl Into<String>) -> Self {
        Self::DanglingCourse {
            kind,
            key: key.into(),
        }
    }

    /// Create a connection error
    pub fn connection<E: fmt::Display>(msg: E) -> Self {
        Self::Connection(msg.to_string())
    }

    /// Create a configuration error
    pub fn configuration<E: fmt::Display>(msg: E) -> Self {
        Self::Configuration(msg.to_string())
    }

    /// Check if this error means the source data broke referential integrity
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::DanglingCourse { .. })
    }

    /// The stream this error came from, if it came from one
    pub fn row_kind(&self) -> Option<RowKind> {
        match self {
            Self::Query { kind, .. } | Self::Decode { kind, .. } | Self::DanglingCourse { kind, .. } => {
                Some(*kind)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangling_course_message_names_key() {
        let err = CatalogError::dangling_course(RowKind::Instructor, "CS 999 X-01");
        assert_eq!(
            err.to_string(),
            r#"instructor references nonexistent course code "CS 999 X-01""#
        );
        assert!(err.is_integrity_violation());
        assert_eq!(err.row_kind(), Some(RowKind::Instructor));
    }

    #[test]
    fn test_query_and_decode_errors_carry_stream() {
        let err = CatalogError::query(RowKind::Schedule, "connection reset");
        assert_eq!(
            err.to_string(),
            "failed to query schedule rows: connection reset"
        );
        assert!(!err.is_integrity_violation());

        let err = CatalogError::decode(RowKind::Section, "column 3 is not an integer");
        assert_eq!(err.row_kind(), Some(RowKind::Section));
        assert!(err.to_string().starts_with("failed to decode section row"));
    }

    #[test]
    fn test_configuration_error_has_no_stream() {
        let err = CatalogError::configuration("missing database url");
        assert_eq!(err.row_kind(), None);
        assert_eq!(err.to_string(), "Configuration error: missing database url");
    }
}
