// src/cli/frequent.rs — Frequently bought together

use crate::engine::frequent::frequently_bought_together;
use crate::engine::interactions::extract_baskets;
use crate::infra::errors::RecError;
use crate::source::Sources;

pub async fn run_frequent(
    product_id: Option<String>,
    limit: usize,
    sources: &Sources,
) -> Result<Vec<String>, RecError> {
    let product_id = super::required(product_id, "Missing product ID")?;
    let baskets = extract_baskets(&sources.fetch_orders().await?);
    Ok(frequently_bought_together(&baskets, &product_id, limit))
}
