//! Error types for playdex.

use std::fmt;

use thiserror::Error;

/// Result type alias using playdex's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Stage of a store round trip in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// Sending the statement and fetching rows.
    Execute,
    /// Mapping fetched rows into entity records.
    Decode,
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execute => write!(f, "execute"),
            Self::Decode => write!(f, "decode"),
        }
    }
}

/// Core error type for playdex operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store failure tagged with the phase it happened in
    #[error("Query {phase} failed for {entity}: {source}")]
    Query {
        phase: QueryPhase,
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A single requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Search operation failed
    #[error("Search error: {0}")]
    Search(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Wrap a store error with the phase and entity it belongs to.
    pub fn query(phase: QueryPhase, entity: &'static str, source: sqlx::Error) -> Self {
        Error::Query {
            phase,
            entity,
            source,
        }
    }

    /// Whether this error was raised by request validation, before any query ran.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }

    /// Whether this error signals a missing single entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("game slug 'wizard-school'".to_string());
        assert_eq!(err.to_string(), "Not found: game slug 'wizard-school'");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("page must be at least 1".to_string());
        assert_eq!(err.to_string(), "Invalid input: page must be at least 1");
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_display_query_includes_phase() {
        let err = Error::query(QueryPhase::Execute, "game", sqlx::Error::RowNotFound);
        let msg = err.to_string();
        assert!(msg.starts_with("Query execute failed for game"));
    }

    #[test]
    fn test_query_error_exposes_source() {
        use std::error::Error as _;
        let err = Error::query(QueryPhase::Decode, "tag", sqlx::Error::RowNotFound);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_query_phase_display() {
        assert_eq!(QueryPhase::Execute.to_string(), "execute");
        assert_eq!(QueryPhase::Decode.to_string(), "decode");
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: Error = sqlx::Error::PoolTimedOut.into();
        match err {
            Error::Database(_) => {}
            _ => panic!("Expected Database error"),
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().contains("Serialization error:"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
