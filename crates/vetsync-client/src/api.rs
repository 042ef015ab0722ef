//! Snapshot fetcher and notification endpoints over the REST API.
//!
//! One authoritative fetch per call, no internal retry; callers own the
//! retry/backoff policy. Body parsing is public so tests can exercise it
//! without network access.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use vetsync_core::config::ClientConfig;
use vetsync_core::models::{ContentKind, LiveRecord, RecordId};
use vetsync_core::util::compact_text;

use crate::error::{ClientError, ClientResult};

/// Client for the clinic backend's REST API.
#[derive(Debug, Clone)]
pub struct ContentApi {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl ContentApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            base_url: config.api_base_url.clone(),
            auth_token: None,
            client,
        })
    }

    /// Attach a bearer token to every request.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Fetch the full authoritative list for a content type.
    pub async fn fetch_snapshot<R>(&self) -> ClientResult<Vec<R>>
    where
        R: LiveRecord + DeserializeOwned,
    {
        let body = self.get(R::KIND.path()).await?;
        parse_records(R::KIND, &body)
    }

    /// Unread-notification count for the authenticated user.
    pub async fn unread_count(&self) -> ClientResult<u64> {
        let body = self.get("notifications/unread-count").await?;
        parse_unread_count(&body)
    }

    /// Mark one notification read.
    pub async fn mark_read(&self, id: RecordId) -> ClientResult<()> {
        self.post(&format!("notifications/{id}/read")).await?;
        Ok(())
    }

    /// Mark every notification read.
    pub async fn mark_all_read(&self) -> ClientResult<()> {
        self.post("notifications/mark-all-read").await?;
        Ok(())
    }

    async fn get(&self, path: &str) -> ClientResult<String> {
        let request = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json");
        self.send(request).await
    }

    async fn post(&self, path: &str) -> ClientResult<String> {
        let request = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json");
        self.send(request).await
    }

    async fn send(&self, mut request: reqwest::RequestBuilder) -> ClientResult<String> {
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(parse_api_error(status, &body)));
        }
        Ok(response.text().await?)
    }
}

/// Parse a snapshot body into records.
///
/// The backend answers either with a bare array or with the list wrapped
/// under the collection key (`{"tips": [...]}`) or `"data"`.
pub fn parse_records<R: DeserializeOwned>(kind: ContentKind, payload: &str) -> ClientResult<Vec<R>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|error| ClientError::InvalidPayload(format!("snapshot is not JSON: {error}")))?;

    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map
            .remove(kind.collection_key())
            .or_else(|| map.remove("data"))
            .ok_or_else(|| {
                ClientError::InvalidPayload(format!(
                    "snapshot object has neither '{}' nor 'data'",
                    kind.collection_key()
                ))
            })?,
        other => {
            return Err(ClientError::InvalidPayload(format!(
                "snapshot is neither array nor object: {other}"
            )))
        }
    };

    serde_json::from_value(list)
        .map_err(|error| ClientError::InvalidPayload(format!("snapshot record: {error}")))
}

#[derive(Debug, Deserialize)]
struct UnreadCountBody {
    count: Option<u64>,
    #[serde(rename = "unreadCount")]
    unread_count: Option<u64>,
}

/// Parse the unread-count body, accepting both field spellings.
pub fn parse_unread_count(payload: &str) -> ClientResult<u64> {
    let body: UnreadCountBody = serde_json::from_str(payload)
        .map_err(|error| ClientError::InvalidPayload(format!("unread count: {error}")))?;
    body.count.or(body.unread_count).ok_or_else(|| {
        ClientError::InvalidPayload("response did not include count/unreadCount".to_string())
    })
}

/// Fold a non-success response into a readable message.
fn parse_api_error(status: StatusCode, body: &str) -> String {
    #[derive(Debug, Deserialize)]
    struct ApiErrorBody {
        error: Option<String>,
        message: Option<String>,
    }

    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}
