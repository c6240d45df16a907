// src/cli/similar.rs — Products similar to one product

use crate::engine::content::ContentIndex;
use crate::engine::types::parse_products;
use crate::infra::errors::RecError;
use crate::source::Sources;

pub async fn run_similar(
    product: Option<String>,
    top_n: usize,
    sources: &Sources,
) -> Result<Vec<String>, RecError> {
    let reference = super::required(product, "Missing product ID or name")?;

    let index = ContentIndex::build(parse_products(&sources.fetch_products().await?));
    let Some(found) = index.resolve(&reference) else {
        tracing::info!(product = %reference, "Unknown product");
        return Ok(Vec::new());
    };

    Ok(index
        .similar_to(&found.id, top_n)
        .into_iter()
        .map(|(id, _)| id.to_string())
        .collect())
}
