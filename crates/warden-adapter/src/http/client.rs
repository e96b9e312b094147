/*
[INPUT]:  HTTP configuration (base URL, timeouts) and typed request bodies
[OUTPUT]: Typed GET/POST/PUT/DELETE round trips against the remote host
[POS]:    HTTP layer - core transport client shared by facade and proxies
[UPDATE]: When adding transport verbs or changing the error mapping
*/

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::error::{Result, WardenError};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Transport client for the remote container host.
///
/// Holds no per-call state; clone it or share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct WardenClient {
    http_client: Client,
    base_url: Url,
}

impl WardenClient {
    /// Create a new client with default configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), base_url)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Base URL every endpoint is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let builder = self.request(Method::GET, endpoint)?;
        self.send_json(builder).await
    }

    /// GET and discard the body
    pub async fn get_empty(&self, endpoint: &str) -> Result<()> {
        let builder = self.request(Method::GET, endpoint)?;
        self.send(builder).await.map(|_| ())
    }

    /// GET the raw body bytes
    pub async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>> {
        let builder = self.request(Method::GET, endpoint)?;
        let response = self.send(builder).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, endpoint)?.json(body);
        self.send_json(builder).await
    }

    /// POST a JSON body and discard the response
    pub async fn post_empty<B>(&self, endpoint: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, endpoint)?.json(body);
        self.send(builder).await.map(|_| ())
    }

    /// PUT a JSON body and discard the response
    pub async fn put_empty<B>(&self, endpoint: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, endpoint)?.json(body);
        self.send(builder).await.map(|_| ())
    }

    /// PUT raw bytes (used for file streaming)
    pub async fn put_bytes(&self, endpoint: &str, bytes: Vec<u8>) -> Result<()> {
        let builder = self
            .request(Method::PUT, endpoint)?
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes);
        self.send(builder).await.map(|_| ())
    }

    /// DELETE and discard the body
    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, endpoint)?;
        self.send(builder).await.map(|_| ())
    }

    /// Build full URL for an endpoint relative to the base URL
    pub(crate) fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    /// Build a WebSocket URL for an endpoint (http -> ws, https -> wss)
    pub(crate) fn websocket_url(&self, endpoint: &str) -> Result<Url> {
        let mut url = self.url(endpoint)?;
        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| WardenError::Config(format!("cannot derive websocket URL from {url}")))?;
        Ok(url)
    }

    fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let body = response.text().await?;
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.http_client.execute(request).await?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "remote host responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(WardenError::remote_error(status, remote_message(status, &body)))
    }
}

/// Percent-encode a value so it can be used as a single path segment.
///
/// `.` and `..` survive encoding as dot segments and would be resolved away
/// by URL joining, so they are rejected along with the empty string.
pub(crate) fn path_segment(value: &str) -> Result<String> {
    if matches!(value, "" | "." | "..") {
        return Err(WardenError::Config(format!(
            "{value:?} cannot be used as a path segment"
        )));
    }
    Ok(url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20"))
}

fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(WardenError::Config(format!(
            "base URL {base_url} cannot carry paths"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    Ok(url)
}

fn remote_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let field = ["message", "error", "Message", "Error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()));
        if let Some(message) = field {
            return message.to_string();
        }
    }
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}
