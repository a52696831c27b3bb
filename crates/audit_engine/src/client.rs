use std::path::Path;
use std::time::Duration;

use audit_core::{
    AiReadinessResult, ClusterResult, LinkRequestParams, LinkSuggestion, LocalizationRequest,
    LocalizationResult, PageRecord,
};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use url::Url;

use crate::wire::{
    decode, error_detail, LinksEnvelope, LocalizationEnvelope, PagesEnvelope, ReadinessEnvelope,
};
use crate::{FailureKind, ServiceError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Analysis calls run model inference server-side and can take minutes.
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
            max_response_bytes: 32 * 1024 * 1024,
        }
    }
}

/// The remote analysis service, one method per endpoint.
#[async_trait::async_trait]
pub trait AuditService: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<Vec<PageRecord>, ServiceError>;

    async fn fetch_pages(&self, urls: &[String]) -> Result<Vec<PageRecord>, ServiceError>;

    async fn cluster(&self, pages: &[PageRecord]) -> Result<ClusterResult, ServiceError>;

    async fn suggest_links(
        &self,
        pages: &[PageRecord],
        params: LinkRequestParams,
    ) -> Result<Vec<LinkSuggestion>, ServiceError>;

    async fn check_localization(
        &self,
        request: &LocalizationRequest,
    ) -> Result<Vec<LocalizationResult>, ServiceError>;

    async fn score_readiness(
        &self,
        pages: &[PageRecord],
    ) -> Result<Vec<AiReadinessResult>, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAuditClient {
    client: reqwest::Client,
    base_url: Url,
    max_response_bytes: u64,
}

impl ReqwestAuditClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(&settings.base_url).map_err(|err| {
            ServiceError::new(
                FailureKind::InvalidUrl,
                format!("{}: {err}", settings.base_url),
            )
        })?;
        // Endpoints are joined as relative paths, which needs a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            max_response_bytes: settings.max_response_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn post_json(&self, url: Url, body: Vec<u8>) -> Result<Vec<u8>, ServiceError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_body(response).await
    }

    /// Reads the whole body, capped at `max_response_bytes`. Non-success
    /// statuses become errors carrying the body's `detail` when present.
    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ServiceError> {
        let status = response.status();
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_response_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_response_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }

        if !status.is_success() {
            let message = error_detail(&bytes).unwrap_or_else(|| {
                format!("Request failed with status code {}", status.as_u16())
            });
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }
        Ok(bytes)
    }

    fn too_large(&self, actual: Option<u64>) -> ServiceError {
        ServiceError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_response_bytes,
                actual,
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl AuditService for ReqwestAuditClient {
    async fn upload(&self, path: &Path) -> Result<Vec<PageRecord>, ServiceError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ServiceError::new(FailureKind::Io, format!("{}: {err}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(upload_mime(path))
            .map_err(map_reqwest_error)?;

        let response = self
            .client
            .post(self.endpoint("upload/")?)
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = self.read_body(response).await?;
        decode::<PagesEnvelope>(&body).map(|envelope| envelope.pages)
    }

    async fn fetch_pages(&self, urls: &[String]) -> Result<Vec<PageRecord>, ServiceError> {
        let body = self
            .post_json(self.endpoint("fetch-pages/")?, encode(urls)?)
            .await?;
        decode::<PagesEnvelope>(&body).map(|envelope| envelope.pages)
    }

    async fn cluster(&self, pages: &[PageRecord]) -> Result<ClusterResult, ServiceError> {
        let body = self
            .post_json(self.endpoint("cluster/")?, encode(pages)?)
            .await?;
        decode(&body)
    }

    async fn suggest_links(
        &self,
        pages: &[PageRecord],
        params: LinkRequestParams,
    ) -> Result<Vec<LinkSuggestion>, ServiceError> {
        let mut url = self.endpoint("internal-links/")?;
        url.query_pairs_mut()
            .append_pair("max_links_per_page", &params.max_links_per_page.to_string())
            .append_pair(
                "same_language_only",
                if params.same_language_only { "true" } else { "false" },
            );
        let body = self.post_json(url, encode(pages)?).await?;
        decode::<LinksEnvelope>(&body).map(|envelope| envelope.suggested_links)
    }

    async fn check_localization(
        &self,
        request: &LocalizationRequest,
    ) -> Result<Vec<LocalizationResult>, ServiceError> {
        let body = self
            .post_json(self.endpoint("localization-check/")?, encode(request)?)
            .await?;
        decode::<LocalizationEnvelope>(&body).map(|envelope| envelope.flagged_pairs)
    }

    async fn score_readiness(
        &self,
        pages: &[PageRecord],
    ) -> Result<Vec<AiReadinessResult>, ServiceError> {
        let body = self
            .post_json(self.endpoint("ai-readiness/")?, encode(pages)?)
            .await?;
        decode::<ReadinessEnvelope>(&body).map(|envelope| envelope.ai_readiness)
    }
}

fn encode<T: Serialize + ?Sized>(body: &T) -> Result<Vec<u8>, ServiceError> {
    serde_json::to_vec(body).map_err(|err| ServiceError::new(FailureKind::Encode, err.to_string()))
}

/// MIME type of an upload, from the file extension.
pub(crate) fn upload_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("xml") => "application/xml",
        Some("html" | "htm") => "text/html",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_mime_follows_extension() {
        assert_eq!(upload_mime(Path::new("sitemap.XML")), "application/xml");
        assert_eq!(upload_mime(Path::new("page.htm")), "text/html");
        assert_eq!(upload_mime(Path::new("urls.csv")), "text/csv");
        assert_eq!(upload_mime(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = ReqwestAuditClient::new(ClientSettings {
            base_url: "http://audit.internal/api".into(),
            ..ClientSettings::default()
        })
        .expect("client");
        assert_eq!(
            client.endpoint("cluster/").expect("joins").as_str(),
            "http://audit.internal/api/cluster/"
        );
    }

    #[test]
    fn unparsable_base_url_is_rejected() {
        let err = ReqwestAuditClient::new(ClientSettings {
            base_url: "not a url".into(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
