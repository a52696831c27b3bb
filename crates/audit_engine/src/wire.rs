//! Response envelopes of the analysis service.

use audit_core::{AiReadinessResult, LinkSuggestion, LocalizationResult, PageRecord};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::{FailureKind, ServiceError};

#[derive(Debug, Deserialize)]
pub(crate) struct PagesEnvelope {
    pub pages: Vec<PageRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinksEnvelope {
    pub suggested_links: Vec<LinkSuggestion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalizationEnvelope {
    pub flagged_pairs: Vec<LocalizationResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReadinessEnvelope {
    pub ai_readiness: Vec<AiReadinessResult>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(body).map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))
}

/// The `detail` of an error body. String details are returned verbatim,
/// structured ones as compact JSON.
pub(crate) fn error_detail(body: &[u8]) -> Option<String> {
    let ErrorBody { detail } = serde_json::from_slice(body).ok()?;
    match detail {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
