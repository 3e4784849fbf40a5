//! Error types for metric-center operations

use metric_center_backends::BackendError;
use std::io;

/// Result type for metric-center operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading points or searching for the center
///
/// Every variant is fatal for the current run: nothing is retried and no
/// partial answer is reported.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Wrong invocation
    #[error("usage error: {0}")]
    Usage(String),

    /// The point source could not be opened or read
    #[error("cannot read {path}: {source}")]
    SourceUnreadable {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The point source is not a list of coordinate pairs
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    /// Fewer than two points
    #[error("need at least 2 points, found {count}")]
    InsufficientPoints { count: usize },

    /// Unit or lane count is unusable
    #[error("invalid execution configuration: {0}")]
    Configuration(String),

    /// Every unit result was still unset after the launch
    #[error("no execution unit produced a candidate")]
    NoCandidate,

    /// A candidate refers to a point the set does not have
    #[error("point index {index} out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    /// The execution backend failed
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// JSON rendering of the report failed
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Process exit code for this error: 2 for usage errors, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Why a point source failed to parse
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedInput {
    /// A token is not a floating-point literal
    #[error("line {line}: token {ordinal} `{token}` is not a number")]
    InvalidToken { token: String, line: usize, ordinal: usize },

    /// A token parses but is infinite or NaN
    #[error("line {line}: token {ordinal} `{token}` is not a finite number")]
    NonFinite { token: String, line: usize, ordinal: usize },

    /// A line is not valid UTF-8
    #[error("line {line}: not valid UTF-8 text")]
    InvalidEncoding { line: usize },

    /// A point handed over directly has an infinite or NaN coordinate
    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },

    /// The coordinates do not pair up
    #[error("odd number of coordinates ({count}), the last point has no y")]
    OddTokenCount { count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_separate_usage_errors() {
        assert_eq!(Error::Usage("missing file".into()).exit_code(), 2);
        assert_eq!(Error::InsufficientPoints { count: 1 }.exit_code(), 1);
        assert_eq!(Error::NoCandidate.exit_code(), 1);
    }

    #[test]
    fn malformed_input_messages_locate_the_token() {
        let err: Error = MalformedInput::InvalidToken {
            token: "abc".into(),
            line: 3,
            ordinal: 5,
        }
        .into();
        assert_eq!(err.to_string(), "malformed input: line 3: token 5 `abc` is not a number");

        let err: Error = MalformedInput::OddTokenCount { count: 3 }.into();
        assert_eq!(
            err.to_string(),
            "malformed input: odd number of coordinates (3), the last point has no y"
        );
    }

    #[test]
    fn backend_errors_convert() {
        let err: Error = BackendError::InvalidBufferHandle(4).into();
        assert!(matches!(err, Error::Backend(BackendError::InvalidBufferHandle(4))));
    }
}
