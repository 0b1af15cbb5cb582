//! reqwest-backed [`HotelApi`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{self, *};
use crate::config::ApiConfig;
use crate::error::ClientError;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the Restavo backend.
///
/// Keeps a cookie store so the session cookie set by `/api/login` rides along
/// on every later request. Use [`HttpApi::builder`] for construction.
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn builder(base_url: impl Into<String>) -> HttpApiBuilder {
        HttpApiBuilder::new(base_url)
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        Self::builder(config.base_url.clone())
            .connect_timeout(config.connect_timeout())
            .request_timeout(config.request_timeout())
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `req` and decode a 2xx JSON body as `T`.
    ///
    /// Non-2xx replies become [`ClientError::Rejected`] with the body's
    /// `message` field, or the status reason when the body has none.
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, url: &str) -> Result<T, ClientError> {
        let resp = self.dispatch(req, url).await?;
        let bytes = resp.bytes().await.map_err(|e| ClientError::Decode {
            url: url.to_string(),
            detail: e.to_string(),
        })?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            detail: e.to_string(),
        })
    }

    async fn dispatch(&self, req: RequestBuilder, url: &str) -> Result<Response, ClientError> {
        let (resp, request_id) = self.transmit(req, url).await?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let bytes = resp.bytes().await.unwrap_or_default();
        Err(rejection(status, &bytes, url, &request_id))
    }

    /// Send `req` with a fresh request id. Only connection-level failures are
    /// errors here; the status is left to the caller.
    async fn transmit(&self, req: RequestBuilder, url: &str) -> Result<(Response, String), ClientError> {
        let request_id = Uuid::new_v4().to_string();
        debug!(%url, %request_id, "sending request");

        let resp = req
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|e| {
                warn!(%url, %request_id, error = %e, "request failed");
                ClientError::Transport {
                    url: url.to_string(),
                    detail: e.to_string(),
                }
            })?;
        Ok((resp, request_id))
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let url = self.url(path);
        (self.client.request(method, &url), url)
    }
}

/// Build the error for a non-2xx reply from its body's `message`, falling back
/// to the status reason.
fn rejection(status: StatusCode, body: &[u8], url: &str, request_id: &str) -> ClientError {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request rejected").to_string());
    debug!(%url, %request_id, status = status.as_u16(), %message, "request rejected");
    ClientError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl HotelApi for HttpApi {
    async fn status(&self) -> Result<StatusResponse, ClientError> {
        let (req, url) = self.request(Method::GET, api::STATUS);
        self.send(req, &url).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        let (req, url) = self.request(Method::POST, api::LOGIN);
        self.send(req.json(credentials), &url).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<MessageResponse, ClientError> {
        let (req, url) = self.request(Method::POST, api::REGISTER);
        self.send(req.json(credentials), &url).await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let (req, url) = self.request(Method::POST, api::LOGOUT);
        self.dispatch(req, &url).await.map(|_| ())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<MessageResponse, ClientError> {
        let (req, url) = self.request(Method::POST, api::PROFILE_UPDATE);
        self.send(req.json(update), &url).await
    }

    async fn search(&self, city: &str) -> Result<Vec<Hotel>, ClientError> {
        let (req, url) = self.request(Method::GET, api::SEARCH);
        self.send(req.query(&[("city", city)]), &url).await
    }

    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingCreated, ClientError> {
        let (req, url) = self.request(Method::POST, api::BOOKING);
        self.send(req.json(request), &url).await
    }

    async fn bookings(&self) -> Result<Vec<Booking>, ClientError> {
        let (req, url) = self.request(Method::GET, api::BOOKINGS);
        self.send(req, &url).await
    }

    async fn delete_booking(&self, id: i64) -> Result<MessageResponse, ClientError> {
        let path = format!("{}/{}", api::BOOKING, id);
        let (req, url) = self.request(Method::DELETE, &path);
        self.send(req, &url).await
    }

    async fn favorites(&self) -> Result<Vec<Favorite>, ClientError> {
        let (req, url) = self.request(Method::GET, api::FAVORITES);
        self.send(req, &url).await
    }

    async fn toggle_favorite(&self, toggle: &FavoriteToggle) -> Result<ToggleResponse, ClientError> {
        let (req, url) = self.request(Method::POST, api::FAVORITES_TOGGLE);
        self.send(req.json(toggle), &url).await
    }

    async fn chat(&self, prompt: &str) -> Result<ChatResponse, ClientError> {
        let (req, url) = self.request(Method::POST, api::CHAT);
        let body = ChatRequest { prompt: prompt.to_string() };

        // The assistant answers failures with a `response` text as well, which
        // belongs in the conversation rather than in an error.
        let (resp, request_id) = self.transmit(req.json(&body), &url).await?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| ClientError::Decode {
            url: url.clone(),
            detail: e.to_string(),
        })?;
        match serde_json::from_slice::<ChatResponse>(&bytes) {
            Ok(reply) => {
                if !status.is_success() {
                    debug!(%url, %request_id, status = status.as_u16(), "assistant replied with an error");
                }
                Ok(reply)
            }
            Err(_) if !status.is_success() => Err(rejection(status, &bytes, &url, &request_id)),
            Err(e) => Err(ClientError::Decode {
                url,
                detail: e.to_string(),
            }),
        }
    }

    async fn analyze(&self, booking_id: i64) -> Result<Analysis, ClientError> {
        let (req, url) = self.request(Method::POST, api::ANALYZE);
        self.send(req.json(&AnalyzeRequest { booking_id }), &url).await
    }
}

/// Builder for [`HttpApi`].
///
/// # Example
/// ```rust,ignore
/// let api = HttpApi::builder("http://127.0.0.1:5000")
///     .request_timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct HttpApiBuilder {
    base_url: String,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl HttpApiBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = ApiConfig::default();
        Self {
            base_url: base_url.into(),
            connect_timeout: defaults.connect_timeout(),
            request_timeout: defaults.request_timeout(),
        }
    }

    /// Override the TCP connect timeout (default 3 s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the per-request timeout (default 15 s).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// # Errors
    /// [`ClientError::Config`] when the base URL is empty or the TLS backend
    /// cannot be initialised.
    pub fn build(self) -> Result<HttpApi, ClientError> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("base URL is required".into()));
        }

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(HttpApi { base_url, client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_trims_trailing_slash() {
        let api = HttpApi::builder("http://localhost:5000/").build().unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.url(api::STATUS), "http://localhost:5000/api/status");
    }

    #[test]
    fn builder_rejects_empty_url() {
        let result = HttpApi::builder("  ").build();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn from_config_uses_base_url() {
        let cfg = ApiConfig {
            base_url: "http://10.0.0.2:8080".to_string(),
            ..ApiConfig::default()
        };
        let api = HttpApi::from_config(&cfg).unwrap();
        assert_eq!(api.base_url(), "http://10.0.0.2:8080");
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on test machines; the connect fails fast.
        let api = HttpApi::builder("http://127.0.0.1:9")
            .connect_timeout(Duration::from_millis(500))
            .request_timeout(Duration::from_secs(1))
            .build()
            .unwrap();
        let err = api.status().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }), "got {err:?}");
        assert_eq!(err.server_message(), "Connection error");
    }
}
