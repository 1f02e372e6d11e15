use serde::Deserialize;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.x.ai";
pub const IMAGE_GENERATION_PATH: &str = "/v1/images/generations";

/// Parameters the upstream image generation endpoint accepts.
/// `quality`, `size` and `style` are rejected upstream, so they are dropped.
pub const SUPPORTED_IMAGE_PARAMS: [&str; 4] = ["model", "prompt", "n", "response_format"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Scheme + host every `/v1/*` request is forwarded to.
    pub upstream_url: String,
    pub image_generation_path: String,
    /// Ordered allow-list applied to image generation bodies.
    pub image_params: Vec<String>,
    /// Upper bound on buffered inbound bodies.
    pub max_body_bytes: usize,
    /// Total per-request timeout for the upstream client.
    pub upstream_timeout_secs: u64,
    /// Add `Access-Control-Allow-Origin: *` to generic passthrough responses.
    /// Off by default: only the image generation path has always carried it.
    pub passthrough_cors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8787,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            image_generation_path: IMAGE_GENERATION_PATH.to_string(),
            image_params: SUPPORTED_IMAGE_PARAMS.iter().map(|s| s.to_string()).collect(),
            max_body_bytes: 25 * 1024 * 1024,
            upstream_timeout_secs: 60,
            passthrough_cors: false,
        }
    }
}

impl Config {
    /// Same configuration, forwarding to a different upstream.
    pub fn with_upstream(mut self, upstream_url: impl Into<String>) -> Self {
        self.upstream_url = upstream_url.into();
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let parsed = url::Url::parse(&self.upstream_url)
            .map_err(|e| anyhow::anyhow!("invalid upstream url {:?}: {}", self.upstream_url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            anyhow::bail!(
                "upstream url must be an absolute http(s) url, got {:?}",
                self.upstream_url
            );
        }
        if !self.image_generation_path.starts_with("/v1/") {
            anyhow::bail!(
                "image generation path must live under /v1/, got {:?}",
                self.image_generation_path
            );
        }
        Ok(())
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    from_lookup(|name| std::env::var(name).ok())
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
    let defaults = Config::default();

    let cfg = Config {
        port: lookup("XAI_PROXY_PORT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.port),
        upstream_url: lookup("XAI_PROXY_UPSTREAM_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.upstream_url),
        image_generation_path: defaults.image_generation_path,
        image_params: lookup("XAI_PROXY_IMAGE_PARAMS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|params| !params.is_empty())
            .unwrap_or(defaults.image_params),
        max_body_bytes: lookup("XAI_PROXY_MAX_BODY_BYTES")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.max_body_bytes),
        upstream_timeout_secs: lookup("XAI_PROXY_UPSTREAM_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.upstream_timeout_secs),
        passthrough_cors: lookup("XAI_PROXY_PASSTHROUGH_CORS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(defaults.passthrough_cors),
    };

    cfg.validate()?;
    Ok(cfg)
}
