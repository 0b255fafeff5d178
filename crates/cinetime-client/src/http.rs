use crate::error::ApiError;
use cinetime_config::ApiConfig;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Standard `{ message, data }` response wrapper used by the backend
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_data(self, what: &'static str) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::MissingData(what))
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Thin wrapper around `reqwest::Client` that owns the base URL and the bearer
/// token and normalizes failures into [`ApiError`].
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cinetime/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace (or clear) the bearer token attached to every request
    pub fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    fn current_token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.url(path))
            .header("Accept", "application/json");
        if let Some(token) = self.current_token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).query(query);
        self.send_json("GET", path, builder).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(Method::POST, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send_json("POST", path, builder).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path).json(body);
        self.send_json("PUT", path, builder).await
    }

    pub async fn delete_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(Method::DELETE, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send_json("DELETE", path, builder).await
    }

    /// Fetch a binary body (the report endpoint)
    pub async fn get_bytes(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, ApiError> {
        debug!(operation = "http_request", method = "GET", path, "Downloading binary response");
        let response = self.request(Method::GET, path).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &body);
            warn!(operation = "http_request", method = "GET", path, status = status.as_u16(), error = %err, "Request failed");
            return Err(err);
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(&self, method: &str, path: &str, builder: RequestBuilder) -> Result<T, ApiError> {
        debug!(operation = "http_request", method, path, "Sending request");

        let response = builder.send().await.map_err(|e| {
            warn!(operation = "http_request", method, path, error = %e, "Transport failure");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_status(status, &body);
            warn!(operation = "http_request", method, path, status = status.as_u16(), error = %err, "Request failed");
            return Err(err);
        }

        debug!(operation = "http_response", method, path, status = status.as_u16(), bytes = body.len(), "Response received");
        parse_body(&body)
    }
}

/// Empty bodies decode as JSON `null` so unit-like responses still succeed
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:5000/api/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/media/trending"), "http://localhost:5000/api/v1/media/trending");
        assert_eq!(client.url("ai/chat"), "http://localhost:5000/api/v1/ai/chat");
    }

    #[test]
    fn test_token_roundtrip() {
        let client = ApiClient::new("http://localhost", Duration::from_secs(5)).unwrap();
        assert!(!client.has_token());
        client.set_token(Some("abc".to_string()));
        assert!(client.has_token());
        client.set_token(None);
        assert!(!client.has_token());
    }

    #[test]
    fn test_envelope_parsing() {
        let env: Envelope<Vec<u32>> = parse_body(r#"{"message":"ok","data":[1,2]}"#).unwrap();
        assert_eq!(env.message.as_deref(), Some("ok"));
        assert_eq!(env.into_data("numbers").unwrap(), vec![1, 2]);

        let env: Envelope<Vec<u32>> = parse_body("").unwrap_or(Envelope { message: None, data: None });
        assert!(env.into_data("numbers").is_err());
    }
}
