use std::fmt;

use audit_core::{AnalysisOutcome, PageRecord, RequestFailure, RequestId};
use thiserror::Error;

/// Completion of a request submitted to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    IngestCompleted {
        request: RequestId,
        result: Result<Vec<PageRecord>, ServiceError>,
    },
    AnalysisCompleted {
        request: RequestId,
        result: Result<AnalysisOutcome, ServiceError>,
    },
}

impl EngineEvent {
    pub fn request(&self) -> RequestId {
        match self {
            EngineEvent::IngestCompleted { request, .. }
            | EngineEvent::AnalysisCompleted { request, .. } => *request,
        }
    }
}

/// A call to the analysis service that did not yield a decoded response.
///
/// `message` is what the workflow shows: the service's own `detail` text when
/// it sent one, otherwise a transport-level description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for RequestFailure {
    fn from(err: ServiceError) -> Self {
        RequestFailure::new(err.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// The response body did not match the endpoint's envelope.
    Decode,
    /// The request body could not be built.
    Encode,
    Io,
    /// The engine could not run the request at all.
    Unavailable,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Encode => write!(f, "unencodable request"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Unavailable => write!(f, "engine unavailable"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
