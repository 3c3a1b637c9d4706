use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

use super::error::ApiError;
use super::http::{send_with_retry, MAX_RETRIES};

/// Default Miro REST API root
pub const DEFAULT_API_URL: &str = "https://api.miro.com/v2/";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`MiroClient`]
#[derive(Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: String,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn build_user_agent() -> String {
    format!("miro-mcp/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP client for the Miro REST API.
///
/// Built once at startup and shared by every tool, so all calls reuse the
/// same connection pool.
pub struct MiroClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl MiroClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&config.api_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(build_user_agent())
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            token: config.token,
        })
    }

    /// Build an endpoint URL from path segments. Segments are percent-encoded,
    /// so board ids such as `uXjVOfjkmAk=` are safe to pass verbatim.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidInput(format!("API URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// POST creates resources, so it is never replayed by the transport.
    fn retries_for(method: &Method) -> usize {
        if *method == Method::POST {
            0
        } else {
            MAX_RETRIES
        }
    }

    async fn execute<T>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&T>,
    ) -> Result<reqwest::Response, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let request_id = Uuid::new_v4().to_string();
        debug!("=== Miro Request ===");
        debug!("{} {} (request id {})", method, url, request_id);

        let response = send_with_retry(url.as_str(), Self::retries_for(&method), || {
            let request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(&self.token)
                .header("Accept", "application/json")
                .header("x-request-id", &request_id);
            match body {
                Some(body) => request.json(body),
                None => request,
            }
        })
        .await?;

        let status = response.status();
        debug!("=== Miro Response ===");
        debug!("Status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let err = ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            };
            match err.user_hint() {
                Some(hint) => error!("❌ {}\n   {}", err, hint),
                None => error!("Miro request failed: {}", err),
            }
            return Err(err);
        }

        Ok(response)
    }

    async fn decode<R: DeserializeOwned>(
        url: &Url,
        response: reqwest::Response,
    ) -> Result<R, ApiError> {
        let text = response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub(super) async fn get_json<R: DeserializeOwned>(&self, url: Url) -> Result<R, ApiError> {
        let response = self.execute::<()>(Method::GET, &url, None).await?;
        Self::decode(&url, response).await
    }

    pub(super) async fn send_json<T, R>(
        &self,
        method: Method,
        url: Url,
        body: &T,
    ) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.execute(method, &url, Some(body)).await?;
        Self::decode(&url, response).await
    }

    pub(super) async fn delete(&self, url: Url) -> Result<(), ApiError> {
        self.execute::<()>(Method::DELETE, &url, None).await?;
        Ok(())
    }

    /// Multipart upload. The form is consumed, so there is a single attempt.
    pub(super) async fn send_multipart<R: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<R, ApiError> {
        debug!("POST {} (multipart)", url);
        let response = self
            .http
            .post(url.clone())
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Miro upload failed with status {}: {}", status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        Self::decode(&url, response).await
    }

    /// Download raw bytes from an absolute URL, such as an image resource.
    ///
    /// The bearer token is only sent to the API host; signed storage URLs
    /// Miro redirects to reject extra credentials. Returns the body and the
    /// reported content type.
    pub async fn fetch_bytes(&self, url: &str) -> Result<(Vec<u8>, Option<String>), ApiError> {
        let url = Url::parse(url)?;
        let authorized = url.host_str() == self.base_url.host_str();
        debug!("GET {} (download, authorized: {})", url, authorized);

        let response = send_with_retry(url.as_str(), MAX_RETRIES, || {
            let request = self.http.get(url.clone());
            if authorized {
                request.bearer_auth(&self.token)
            } else {
                request
            }
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok((bytes.to_vec(), content_type))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for MiroClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiroClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}
