// src/engine/embedder.rs — Text → dense vector backends

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::tfidf::tokenize;
use crate::infra::config::{EmbeddingConfig, EmbeddingProvider};
use crate::infra::errors::RecError;

/// Turns texts into fixed-length vectors, one per input, in input order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    fn id(&self) -> &str;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RecError>;
}

/// Build the embedder named in config.
pub fn from_config(config: &EmbeddingConfig, timeout: Duration) -> Result<Box<dyn Embedder>, RecError> {
    match config.provider {
        EmbeddingProvider::Hashing => Ok(Box::new(HashingEmbedder::new(config.dimensions))),
        EmbeddingProvider::Ollama => Ok(Box::new(OllamaEmbedder::new(
            config.base_url.clone(),
            config.model.clone(),
            timeout,
        ))),
        EmbeddingProvider::OpenAI => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                RecError::Config(format!(
                    "embedding provider 'openai' needs {} to be set",
                    config.api_key_env
                ))
            })?;
            Ok(Box::new(OpenAIEmbedder::new(
                config.base_url.clone(),
                config.model.clone(),
                api_key,
                timeout,
            )))
        }
    }
}

/// Lexical fallback: hashes word counts into fixed buckets (FNV-1a) and
/// L2-normalizes. Needs no model and never fails.
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn bucket(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut counts: HashMap<String, f32> = HashMap::new();
        for tok in tokenize(text) {
            *counts.entry(tok).or_default() += 1.0;
        }

        let mut v = vec![0.0f32; self.dimensions];
        for (term, count) in &counts {
            v[Self::bucket(term, self.dimensions)] += count;
        }

        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for x in v.iter_mut() {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(512)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn id(&self) -> &str {
        "hashing"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RecError> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }
}

fn parse_vector(value: &serde_json::Value) -> Vec<f32> {
    value
        .as_array()
        .map(|a| a.iter().map(|v| v.as_f64().unwrap_or(0.0) as f32).collect())
        .unwrap_or_default()
}

/// Local Ollama server (`/api/embed`).
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl OllamaEmbedder {
    pub fn new(base_url: Option<String>, model: String, timeout: Duration) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| "http://localhost:11434".into()),
            model,
            client: reqwest::Client::new(),
            timeout,
        }
    }

    fn error(message: impl Into<String>) -> RecError {
        RecError::Embedding {
            provider: "ollama".into(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn id(&self) -> &str {
        "ollama"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RecError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });
        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url.trim_end_matches('/')))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::error(format!("Cannot reach Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::error(format!("HTTP {}: {}", status, error_body)));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Self::error(format!("Invalid Ollama response: {}", e)))?;

        let embeddings: Vec<Vec<f32>> = resp["embeddings"]
            .as_array()
            .map(|a| a.iter().map(parse_vector).collect())
            .unwrap_or_default();
        if embeddings.len() != texts.len() {
            return Err(Self::error(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }
}

/// OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAIEmbedder {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl OpenAIEmbedder {
    pub fn new(base_url: Option<String>, model: String, api_key: String, timeout: Duration) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".into()),
            model,
            api_key,
            client: reqwest::Client::new(),
            timeout,
        }
    }

    fn error(message: impl Into<String>) -> RecError {
        RecError::Embedding {
            provider: "openai".into(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    fn id(&self) -> &str {
        "openai"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RecError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error(format!("HTTP {}", response.status())));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Self::error(format!("Failed to parse embedding response: {}", e)))?;

        // Results carry an index; order by it rather than trusting array order
        let mut rows: Vec<(u64, Vec<f32>)> = resp["data"]
            .as_array()
            .map(|a| {
                a.iter()
                    .enumerate()
                    .map(|(i, d)| {
                        let index = d["index"].as_u64().unwrap_or(i as u64);
                        (index, parse_vector(&d["embedding"]))
                    })
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|(i, _)| *i);

        if rows.len() != texts.len() {
            return Err(Self::error(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                rows.len()
            )));
        }
        Ok(rows.into_iter().map(|(_, v)| v).collect())
    }
}
