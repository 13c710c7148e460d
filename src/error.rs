use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// Why a letter could not be constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LetterError {
    #[error("{field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("age cannot be less than 0, got {0}")]
    NegativeAge(f64),
    #[error("age must be a finite number no larger than {max}, got {value}")]
    AgeOutOfRange { value: f64, max: u32 },
    #[error("goodness must be between 0 and 3 inclusive, got {0}")]
    GoodnessOutOfRange(i64),
    #[error("stamp choice must be between 1 and 4 inclusive, got {0}")]
    StampOutOfRange(i64),
    #[error("{0:?} does not appear to be a valid email address")]
    InvalidContactEmail(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterErrorKind {
    /// The value had the wrong kind, or was absent.
    Type,
    /// The value had the right kind but was outside its domain.
    Value,
}

impl LetterError {
    pub fn kind(&self) -> LetterErrorKind {
        match self {
            Self::InvalidType { .. } | Self::MissingField { .. } => LetterErrorKind::Type,
            Self::NegativeAge(_)
            | Self::AgeOutOfRange { .. }
            | Self::GoodnessOutOfRange(_)
            | Self::StampOutOfRange(_)
            | Self::InvalidContactEmail(_) => LetterErrorKind::Value,
        }
    }
}

/// Why a letter could not be delivered, or its reply not received.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to build the http client")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed")]
    Request {
        endpoint: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read the response body from {endpoint}")]
    Body {
        endpoint: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with {status}")]
    Status { endpoint: Url, status: StatusCode },
}
