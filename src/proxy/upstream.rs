/// HTTP client for forwarding requests to the upstream API.
/// One attempt per request: no retry layer.
use std::time::Duration;

use crate::config::Config;
use crate::errors::AppError;

pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .pool_max_idle_per_host(32)
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self { client })
    }

    pub async fn forward(
        &self,
        method: reqwest::Method,
        url: url::Url,
        headers: reqwest::header::HeaderMap,
        body: Option<bytes::Bytes>,
    ) -> Result<reqwest::Response, AppError> {
        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        request.send().await.map_err(|e| {
            tracing::warn!("Upstream request failed: {}", e);
            AppError::Upstream(e.to_string())
        })
    }
}
