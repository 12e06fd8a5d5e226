use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::core::types::AdminToken;
use crate::provider::error::DispatchError;

pub const DEFAULT_TOKEN_HEADER: &str = "token";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// What came back from the resource server, before any interpretation.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// True for `application/json` and `+json` structured suffixes,
    /// ignoring media type parameters.
    pub fn is_json(&self) -> bool {
        let essence = match &self.content_type {
            Some(ct) => ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase(),
            None => return false,
        };
        essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
    }
}

/// One authenticated JSON POST. Implementations must be safe to share
/// across tasks; the dispatcher holds exactly one.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &Url,
        credential: &AdminToken,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, DispatchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn post_json(
        &self,
        url: &Url,
        credential: &AdminToken,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, DispatchError> {
        (**self).post_json(url, credential, body).await
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token_header: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Upper bound on a response body that will be buffered.
    pub max_body_bytes: usize,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.request_timeout.is_zero() {
            return Err(DispatchError::Config("request timeout must be positive".into()));
        }
        if self.connect_timeout.is_zero() {
            return Err(DispatchError::Config("connect timeout must be positive".into()));
        }
        if self.max_body_bytes == 0 {
            return Err(DispatchError::Config("response body limit must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Long-lived HTTPS client. Certificates are always verified and plain
/// `http://` URLs are refused.
#[derive(Debug, Clone)]
pub struct HttpsTransport {
    client: reqwest::Client,
    token_header: reqwest::header::HeaderName,
    max_body_bytes: usize,
}

impl HttpsTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, DispatchError> {
        config.validate()?;
        let token_header = reqwest::header::HeaderName::from_bytes(config.token_header.as_bytes())
            .map_err(|e| DispatchError::Config(format!("bad credential header name: {}", e)))?;

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .https_only(true)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            token_header,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

/// Only a 200 JSON answer is ever inspected, so every other body is left
/// unread. A body above `max_body` is a protocol failure.
async fn read_response(mut response: reqwest::Response, max_body: usize) -> Result<TransportResponse, DispatchError> {
    let mut reply = TransportResponse {
        status: response.status().as_u16(),
        content_type: response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        body: Vec::new(),
    };
    if reply.status != 200 || !reply.is_json() {
        return Ok(reply);
    }

    let too_large = || DispatchError::Protocol(format!("response body exceeds {} bytes", max_body));
    if response.content_length().map_or(false, |len| len > max_body as u64) {
        return Err(too_large());
    }
    while let Some(chunk) = response.chunk().await? {
        if reply.body.len() + chunk.len() > max_body {
            return Err(too_large());
        }
        reply.body.extend_from_slice(&chunk);
    }
    Ok(reply)
}

#[async_trait]
impl Transport for HttpsTransport {
    async fn post_json(
        &self,
        url: &Url,
        credential: &AdminToken,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, DispatchError> {
        let response = self
            .client
            .post(url.clone())
            .header(self.token_header.clone(), credential.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        read_response(response, self.max_body_bytes).await
    }
}
