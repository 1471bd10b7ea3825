use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use serde_json::Value;

use crate::config::{Auth, Config};
use crate::error::{classify_status, BitbucketError, Result};

/// HTTP client wrapper for the Bitbucket Cloud REST API 2.0.
#[derive(Debug, Clone)]
pub struct BitbucketClient {
    http: reqwest::Client,
    base_api: String,
}

impl BitbucketClient {
    /// Create a new client from configuration. The authorization header is
    /// fixed here; per-call credentials do not exist.
    pub fn new(config: &Config) -> Result<Self> {
        let auth_value = match &config.auth {
            Auth::Bearer(token) => format!("Bearer {token}"),
            Auth::Basic {
                username,
                app_password,
            } => {
                use base64::Engine;
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{app_password}"));
                format!("Basic {encoded}")
            }
        };

        let mut headers = HeaderMap::new();
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|_| BitbucketError::InvalidParams("credentials contain invalid header characters".to_string()))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_api: config.base_url.clone(),
        })
    }

    /// Build the full API URL for a given path (which may carry a query string).
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_api, path)
    }

    /// Send a GET request and return the parsed JSON response.
    pub async fn get(&self, path: &str) -> Result<Value> {
        tracing::debug!(path, "GET");
        let resp = self.http.get(self.url(path)).send().await?;
        self.handle_response(resp).await
    }

    /// Send a GET request and return the raw text response (diffs, logs,
    /// file contents).
    pub async fn get_raw(&self, path: &str) -> Result<String> {
        tracing::debug!(path, "GET (raw)");
        let resp = self
            .http
            .get(self.url(path))
            .header(ACCEPT, "text/plain")
            .send()
            .await?;
        let resp = self.check_status(resp).await?;
        Ok(resp.text().await?)
    }

    /// Send a POST request with a JSON body and return the parsed response.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        tracing::debug!(path, "POST");
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        self.handle_response(resp).await
    }

    /// Send a POST request that returns no meaningful body (e.g. stop pipeline).
    pub async fn post_no_content(&self, path: &str, body: &Value) -> Result<()> {
        tracing::debug!(path, "POST (no content)");
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        self.check_status(resp).await?;
        Ok(())
    }

    /// Send a PUT request with a JSON body and return the parsed response.
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        tracing::debug!(path, "PUT");
        let resp = self.http.put(self.url(path)).json(body).send().await?;
        self.handle_response(resp).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!(path, "DELETE");
        let resp = self.http.delete(self.url(path)).send().await?;
        self.check_status(resp).await?;
        Ok(())
    }

    /// Classify a non-2xx status, or pass the response through.
    async fn check_status(&self, resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(%status, "request failed");
        Err(classify_status(status, retry_after.as_deref(), &body))
    }

    /// Handle a JSON response: check status, deserialize. An empty 2xx body
    /// (some create/approve endpoints return 204) maps to JSON null.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value> {
        let resp = self.check_status(resp).await?;
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str(&body) {
            Ok(val) => Ok(val),
            Err(_) => Ok(Value::String(body)),
        }
    }
}
