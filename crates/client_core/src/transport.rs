//! reqwest-backed implementation of [`RfpApi`].

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::RfpId,
    error::extract_error_message,
    protocol::{
        HealthResponse, NoteRequest, Opportunity, ProgressState, RefreshResponse, SaveRequest,
        SavedDetail, SavedItem, SeedResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::{
    config::{normalize_api_base, ClientSettings},
    error::{ClientError, Result},
    DocumentUpload, Page, RfpApi,
};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Debug, Clone)]
pub struct HttpRfpClient {
    http: Client,
    api_base: Url,
}

impl HttpRfpClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|err| ClientError::InvalidConfig(format!("http client: {err}")))?;
        Self::with_client(http, &settings.api_base)
    }

    pub fn with_client(http: Client, api_base: &str) -> Result<Self> {
        let normalized = normalize_api_base(api_base)?;
        let api_base = Url::parse(&normalized)
            .map_err(|err| ClientError::InvalidConfig(format!("api base: {err}")))?;
        Ok(Self { http, api_base })
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_str().trim_end_matches('/')
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig("api base cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        decode_json(ensure_success(response).await?).await
    }
}

/// Turns a non-2xx response into [`ClientError::Status`] with the most
/// readable message the body offers.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().clone();
    let body = response.bytes().await.unwrap_or_default();
    let message = extract_error_message(&body).unwrap_or_else(|| {
        format!(
            "request failed with status {}",
            status.canonical_reason().map_or_else(
                || status.as_u16().to_string(),
                |reason| format!("{} {reason}", status.as_u16())
            )
        )
    });
    debug!(%url, %status, "request failed: {message}");
    Err(ClientError::status(status, message))
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn total_count(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(TOTAL_COUNT_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[async_trait]
impl RfpApi for HttpRfpClient {
    async fn list_rfps(&self, limit: u32, offset: u64) -> Result<Page<Opportunity>> {
        let url = self.endpoint(&["rfps"])?;
        debug!(%url, limit, offset, "GET");
        let response = self
            .http
            .get(url)
            .query(&[("limit", u64::from(limit)), ("offset", offset)])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let header_total = total_count(&response);
        let items: Vec<Opportunity> = decode_json(response).await?;
        let total_count = header_total.unwrap_or(offset + items.len() as u64);
        Ok(Page { items, total_count })
    }

    async fn trigger_refresh(&self) -> Result<RefreshResponse> {
        let url = self.endpoint(&["refresh"])?;
        debug!(%url, "POST");
        let response = self.http.post(url).send().await?;
        decode_json(ensure_success(response).await?).await
    }

    async fn progress(&self) -> Result<ProgressState> {
        self.get_json(&["progress"]).await
    }

    async fn list_saved(&self) -> Result<Vec<SavedItem>> {
        self.get_json(&["saved"]).await
    }

    async fn saved_detail(&self, rfp_id: RfpId) -> Result<SavedDetail> {
        self.get_json(&["saved", &rfp_id.to_string()]).await
    }

    async fn save_rfp(&self, rfp_id: RfpId) -> Result<()> {
        let url = self.endpoint(&["rfps", &rfp_id.to_string(), "save"])?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(&SaveRequest {
                generate_summary: true,
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn remove_saved(&self, rfp_id: RfpId) -> Result<()> {
        let url = self.endpoint(&["saved", &rfp_id.to_string()])?;
        debug!(%url, "DELETE");
        let response = self.http.delete(url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn upload_document(
        &self,
        rfp_id: RfpId,
        upload: DocumentUpload,
    ) -> Result<SavedDetail> {
        let url = self.endpoint(&["saved", &rfp_id.to_string(), "upload"])?;
        debug!(%url, filename = %upload.filename, size = upload.bytes.len(), "POST multipart");
        let mime = upload
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(&mime)
            .map_err(|err| ClientError::Validation(format!("invalid mime type '{mime}': {err}")))?;
        let response = self
            .http
            .post(url)
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        decode_json(ensure_success(response).await?).await
    }

    async fn add_note(&self, rfp_id: RfpId, note: &str) -> Result<SavedDetail> {
        let url = self.endpoint(&["saved", &rfp_id.to_string(), "notes"])?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(&NoteRequest {
                note: note.to_string(),
            })
            .send()
            .await?;
        decode_json(ensure_success(response).await?).await
    }

    async fn download_document(&self, rfp_id: RfpId, name: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(&["saved", &rfp_id.to_string(), "documents", name])?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn health(&self) -> Result<String> {
        let body: HealthResponse = self.get_json(&["health"]).await?;
        Ok(body.status)
    }

    async fn seed_demo_data(&self) -> Result<String> {
        let url = self.endpoint(&["debug", "seed"])?;
        debug!(%url, "POST");
        let response = self.http.post(url).send().await?;
        let body: SeedResponse = decode_json(ensure_success(response).await?).await?;
        Ok(body.message)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
