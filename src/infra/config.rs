// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub recommend: RecommendConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Upstream REST API holding orders and products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// May carry a path prefix (http://host/shop); endpoint paths go under it.
    pub base_url: String,
    pub orders_path: String,
    pub products_path: String,
    pub timeout_seconds: u64,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            orders_path: "/api/orders/admin/all-orders".into(),
            products_path: "/api/products".into(),
            timeout_seconds: 10,
            token_env: "SHOPREC_API_TOKEN".into(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Bearer token from the configured environment variable, if set and non-empty.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Peers consulted by user-based filtering.
    pub similar_users: usize,
    pub collaborative_limit: usize,
    /// Neighbours taken per purchased product in content-based filtering.
    pub content_per_item: usize,
    pub content_limit: usize,
    /// Cap on the merged hybrid list.
    pub max_results: usize,
    /// Size of the most-purchased fallback list.
    pub fallback_size: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            similar_users: 3,
            collaborative_limit: 10,
            content_per_item: 10,
            content_limit: 10,
            max_results: 10,
            fallback_size: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Ollama,
    OpenAI,
    Hashing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key_env: String,
    /// Vector width of the built-in hashing embedder.
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Ollama,
            model: "all-minilm".into(),
            base_url: None,
            api_key_env: "OPENAI_API_KEY".into(),
            dimensions: 512,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        match paths::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
