// src/cli/search.rs — Semantic product search

use crate::engine::embedder::Embedder;
use crate::engine::semantic::{self, PriceFilter};
use crate::engine::types::{parse_products, Product};
use crate::infra::config::EmbeddingConfig;
use crate::infra::errors::RecError;
use crate::source::Sources;

/// Every product id, best match first. With `price_filter`, products
/// outside bounds named in the query are dropped.
pub async fn run_search(
    query: &[String],
    price_filter: bool,
    sources: &Sources,
    embedder: &dyn Embedder,
    config: &EmbeddingConfig,
) -> Result<Vec<String>, RecError> {
    let query = query.join(" ");
    let query = super::required(Some(query), "Missing search query")?;

    let mut products = parse_products(&sources.fetch_products().await?);
    if price_filter {
        products = apply_price_filter(products, &query);
    }

    Ok(semantic::search(&query, &products, embedder, config.dimensions).await)
}

fn apply_price_filter(products: Vec<Product>, query: &str) -> Vec<Product> {
    let filter = PriceFilter::from_query(query);
    if !filter.is_active() {
        return products;
    }
    tracing::info!(min = ?filter.min, max = ?filter.max, "Applying price filter");
    products.into_iter().filter(|p| filter.accepts(p)).collect()
}
