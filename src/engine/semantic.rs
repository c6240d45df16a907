// src/engine/semantic.rs — Query×product ranking over dense embeddings

use super::embedder::{Embedder, HashingEmbedder};
use super::ranker::rank_by_score;
use super::similarity::cosine_similarity;
use super::types::Product;
use crate::infra::errors::RecError;

/// Rank every product by cosine similarity between its text and the query.
/// Nothing is dropped: the result is a permutation of the input ids.
pub async fn rank_products(
    query: &str,
    products: &[Product],
    embedder: &dyn Embedder,
) -> Result<Vec<(String, f64)>, RecError> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let mut texts = Vec::with_capacity(products.len() + 1);
    texts.push(query.to_string());
    texts.extend(products.iter().map(Product::text));

    let vectors = embedder.embed(&texts).await?;
    if vectors.len() != texts.len() {
        return Err(RecError::Embedding {
            provider: embedder.id().to_string(),
            message: format!("expected {} vectors, got {}", texts.len(), vectors.len()),
        });
    }

    let (query_vec, product_vecs) = vectors.split_at(1);
    let scored = products
        .iter()
        .zip(product_vecs)
        .map(|(p, v)| (p.id.clone(), f64::from(cosine_similarity(&query_vec[0], v))));
    Ok(rank_by_score(scored))
}

/// Rank with `embedder`, falling back to lexical hashing when it fails.
pub async fn search(
    query: &str,
    products: &[Product],
    embedder: &dyn Embedder,
    fallback_dimensions: usize,
) -> Vec<String> {
    let ranked = match rank_products(query, products, embedder).await {
        Ok(ranked) => ranked,
        Err(e) => {
            tracing::warn!(
                provider = embedder.id(),
                "Semantic ranking failed, using lexical fallback: {}",
                e
            );
            let fallback = HashingEmbedder::new(fallback_dimensions);
            rank_products(query, products, &fallback)
                .await
                .unwrap_or_else(|_| products.iter().map(|p| (p.id.clone(), 0.0)).collect())
        }
    };
    ranked.into_iter().map(|(id, _)| id).collect()
}

/// Price bounds spelled out in a free-text query ("under $50", "over 20").
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

const MAX_PHRASES: &[&[&str]] = &[&["under"], &["below"], &["less", "than"], &["up", "to"]];
const MIN_PHRASES: &[&[&str]] = &[&["above"], &["over"], &["more", "than"], &["greater", "than"]];

impl PriceFilter {
    pub fn from_query(query: &str) -> Self {
        let words: Vec<String> = query
            .split_whitespace()
            .flat_map(split_attached_amount)
            .map(|w| w.to_lowercase())
            .collect();
        Self {
            min: find_bound(&words, MIN_PHRASES),
            max: find_bound(&words, MAX_PHRASES),
        }
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Products without a price never pass an active filter.
    pub fn accepts(&self, product: &Product) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(price) = product.price else {
            return false;
        };
        self.min.map_or(true, |m| price >= m) && self.max.map_or(true, |m| price <= m)
    }
}

fn find_bound(words: &[String], phrases: &[&[&str]]) -> Option<f64> {
    for start in 0..words.len() {
        for phrase in phrases {
            let end = start + phrase.len();
            if end >= words.len() {
                continue;
            }
            if words[start..end].iter().zip(phrase.iter()).all(|(w, p)| w == p) {
                if let Some(amount) = parse_amount(&words[end]) {
                    return Some(amount);
                }
            }
        }
    }
    None
}

/// "under$50" and "over20" read as two words.
fn split_attached_amount(word: &str) -> Vec<&str> {
    match word.find(|c: char| c == '$' || c.is_ascii_digit()) {
        Some(at) if at > 0 && word[..at].chars().all(char::is_alphabetic) => {
            vec![&word[..at], &word[at..]]
        }
        _ => vec![word],
    }
}

fn parse_amount(word: &str) -> Option<f64> {
    let digits: String = word.chars().filter(|c| *c != ',').collect();
    let trimmed = digits
        .trim_start_matches('$')
        .trim_end_matches(|c: char| !c.is_ascii_digit());
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}
