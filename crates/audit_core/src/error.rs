use thiserror::Error;

/// Input rejected locally; no request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("no pages loaded")]
    NoPages,
    #[error("pair {} needs both an original and a translation URL", .index + 1)]
    IncompletePair { index: usize },
    #[error("page {index} is out of range ({len} pages loaded)")]
    PageOutOfRange { index: usize, len: usize },
}

/// A request to the analysis service did not produce a usable response.
///
/// `message` is the text reported by the transport or the service. It may be
/// empty, in which case the workflow shows its own fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestFailure {
    pub message: String,
}

impl RequestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message_or(&self, fallback: &str) -> String {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            fallback.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl From<ShapeError> for RequestFailure {
    fn from(err: ShapeError) -> Self {
        Self::new(err.to_string())
    }
}

/// A service response that decoded but breaks a result invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("clustered page {url} is not listed in any cluster")]
    UnlistedPage { url: String },
    #[error("url {url} is listed in both cluster {first} and cluster {second}")]
    DuplicateMembership {
        url: String,
        first: String,
        second: String,
    },
    #[error("clustered page {url} claims cluster {declared} but is listed in cluster {listed}")]
    MembershipMismatch {
        url: String,
        declared: String,
        listed: String,
    },
    #[error("cluster {cluster} lists {url}, which is not a clustered page")]
    UnknownMember { cluster: String, url: String },
    #[error("keywords reference unknown cluster {cluster}")]
    UnknownKeywordCluster { cluster: String },
    #[error("expected {expected} results, received {actual}")]
    Misaligned { expected: usize, actual: usize },
    #[error("unexpected {received} response for the {workflow} workflow")]
    WrongOutcome { workflow: String, received: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,
}
