// svckit/src/backend/http.rs
//
// reqwest-backed transport for the content REST API

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiRequest, Method, Transport};
use crate::config::BackendConfig;
use crate::errors::ContentError;

pub struct HttpTransport {
    client: reqwest::Client,
    api_root: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ContentError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_root: config.api_root(),
            timeout: config.request_timeout(),
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.api_root.clone()
        } else {
            format!("{}/{}", self.api_root, path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ContentError> {
        let url = self.url(&request.path);
        debug!("{} {}", request.method.as_str(), url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!("{} {} timed out after {:?}", request.method.as_str(), url, self.timeout);
                ContentError::Timeout(self.timeout)
            } else {
                ContentError::Network(format!("{}: {}", url, e))
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(ContentError::from)?;

        if !status.is_success() {
            warn!("{} {} answered HTTP {}", request.method.as_str(), url, status);
            return Err(ContentError::Backend {
                status: status.as_u16(),
                message: backend_message(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Pulls `error.message` out of the backend's error envelope, falling back to
/// the raw body.
fn backend_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let transport = HttpTransport::new(&BackendConfig::default()).unwrap();
        assert_eq!(transport.url("clubs"), "http://localhost:1337/api/clubs");
        assert_eq!(transport.url(""), "http://localhost:1337/api");
    }

    #[test]
    fn test_backend_message_extraction() {
        let body = r#"{"data":null,"error":{"status":400,"name":"ValidationError","message":"nom must be defined"}}"#;
        assert_eq!(backend_message(body), "nom must be defined");
        assert_eq!(backend_message("Bad Gateway"), "Bad Gateway");
    }
}
