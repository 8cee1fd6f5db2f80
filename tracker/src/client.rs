use crate::errors::{Result, TrackerError};
use crate::types::{CreatedResource, ImportScan, ListResponse, ResourceKind};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:9090/api/v2";
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

// Lookup term for the availability probe. Matching nothing is fine.
const PROBE_TERM: &str = "check";
const IMPORT_SCAN_PATH: &str = "import-scan/";

/// The calls this tool makes against the tracking service.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Lightweight read-only request, bounded by [`PROBE_TIMEOUT`].
    async fn probe(&self) -> Result<()>;

    async fn list(&self, kind: ResourceKind, filter: &[(&str, String)]) -> Result<ListResponse>;

    async fn create(
        &self,
        kind: ResourceKind,
        payload: &serde_json::Value,
    ) -> Result<CreatedResource>;

    async fn import_scan(&self, scan: ImportScan) -> Result<()>;
}

/// [`TrackerApi`] over the service's REST API.
#[derive(Clone)]
pub struct HttpTracker {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpTracker {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        // Joining relative paths onto ".../api/v2" would drop "v2" without the slash.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| TrackerError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(HttpTracker {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| TrackerError::InvalidUrl(format!("{path}: {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
    }
}

#[async_trait]
impl TrackerApi for HttpTracker {
    async fn probe(&self) -> Result<()> {
        let url = self.endpoint(ResourceKind::Product.collection())?;
        let response = self
            .request(Method::GET, url)
            .query(&[("name", PROBE_TERM)])
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::ServiceUnavailable(format!(
                "probe returned status {status}"
            )));
        }
        Ok(())
    }

    async fn list(&self, kind: ResourceKind, filter: &[(&str, String)]) -> Result<ListResponse> {
        let url = self.endpoint(kind.collection())?;
        tracing::debug!(%kind, ?filter, "Looking up resources");
        let response = self.request(Method::GET, url).query(filter).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::LookupFailed { kind, status, body });
        }

        parse_json(response, kind).await
    }

    async fn create(
        &self,
        kind: ResourceKind,
        payload: &serde_json::Value,
    ) -> Result<CreatedResource> {
        let url = self.endpoint(kind.collection())?;
        let response = self.request(Method::POST, url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::CreationFailed { kind, status, body });
        }

        parse_json(response, kind).await
    }

    async fn import_scan(&self, scan: ImportScan) -> Result<()> {
        let url = self.endpoint(IMPORT_SCAN_PATH)?;

        let mut form = Form::new()
            .text("scan_type", scan.scan_type)
            .text("engagement", scan.engagement_id.to_string());
        if let Some(product_id) = scan.product_id {
            form = form.text("product", product_id.to_string());
        }
        form = form.part("file", Part::bytes(scan.content).file_name(scan.file_name));

        let response = self.request(Method::POST, url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::UploadRejected { status, body });
        }
        Ok(())
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response, kind: ResourceKind) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| TrackerError::MalformedResponse(format!("{kind} response: {e}")))
}
