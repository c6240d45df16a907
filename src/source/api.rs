// src/source/api.rs — Orders/products REST endpoint

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::{expect_array, RecordSource};
use crate::infra::config::ApiConfig;
use crate::infra::errors::RecError;

/// One GET endpoint returning a JSON array. Sends the bearer token when one
/// is configured. No retries: any failure ends the run.
pub struct ApiSource {
    url: Url,
    token: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl ApiSource {
    pub fn new(api: &ApiConfig, path: &str) -> Result<Self, RecError> {
        // Endpoint paths are resolved under the base path, so a base of
        // http://host/shop keeps its /shop prefix.
        let base_str = format!("{}/", api.base_url.trim_end_matches('/'));
        let base = Url::parse(&base_str)
            .map_err(|e| RecError::Config(format!("invalid api.base_url '{}': {}", api.base_url, e)))?;
        let url = base
            .join(path.trim_start_matches('/'))
            .map_err(|e| RecError::Config(format!("invalid API path '{}': {}", path, e)))?;
        Ok(Self::with_url(url, api.token(), api.timeout()))
    }

    pub fn with_url(url: Url, token: Option<String>, timeout: Duration) -> Self {
        Self {
            url,
            token,
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RecordSource for ApiSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Vec<Value>, RecError> {
        let mut request = self.client.get(self.url.clone()).timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| RecError::Network {
            url: self.describe(),
            message: if e.is_timeout() {
                format!("timed out after {}s", self.timeout.as_secs())
            } else {
                e.to_string()
            },
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %self.url, "Upstream rejected request");
            return Err(RecError::HttpStatus {
                url: self.describe(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| RecError::Network {
            url: self.describe(),
            message: e.to_string(),
        })?;
        let value: Value = serde_json::from_str(&body).map_err(|e| RecError::ResponseFormat {
            source_name: self.describe(),
            message: format!("not valid JSON ({}): {}", e, crate::util::truncate_str(body.trim(), 300)),
        })?;
        expect_array(value, &self.describe())
    }
}
