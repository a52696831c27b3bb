use std::path::PathBuf;

use crate::{CsvArtifact, LinkRequestParams, LocalizationRequest, PageRecord, RequestId};

/// Side effects requested by `update`; executed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Upload {
        request: RequestId,
        path: PathBuf,
    },
    FetchPages {
        request: RequestId,
        urls: Vec<String>,
    },
    Cluster {
        request: RequestId,
        pages: Vec<PageRecord>,
    },
    SuggestLinks {
        request: RequestId,
        pages: Vec<PageRecord>,
        params: LinkRequestParams,
    },
    CheckLocalization {
        request: RequestId,
        payload: LocalizationRequest,
    },
    ScoreReadiness {
        request: RequestId,
        pages: Vec<PageRecord>,
    },
    DeliverArtifact(CsvArtifact),
}

impl Effect {
    /// The request this effect issues, if it is a service call.
    pub fn request(&self) -> Option<RequestId> {
        match self {
            Effect::Upload { request, .. }
            | Effect::FetchPages { request, .. }
            | Effect::Cluster { request, .. }
            | Effect::SuggestLinks { request, .. }
            | Effect::CheckLocalization { request, .. }
            | Effect::ScoreReadiness { request, .. } => Some(*request),
            Effect::DeliverArtifact(_) => None,
        }
    }
}
