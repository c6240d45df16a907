// src/cli/recommend.rs — Hybrid recommendations for one user

use crate::engine::collaborative::recommend_for_user;
use crate::engine::content::ContentIndex;
use crate::engine::interactions::{extract_interactions, popularity, purchase_history};
use crate::engine::ranker::{merge_unique, with_popularity_fallback};
use crate::engine::types::{parse_products, Interaction};
use crate::infra::config::RecommendConfig;
use crate::infra::errors::RecError;
use crate::source::Sources;

pub async fn run_recommend(
    user_id: Option<String>,
    sources: &Sources,
    config: &RecommendConfig,
) -> Result<Vec<String>, RecError> {
    let user_id = super::required(user_id, "Missing user ID")?;

    let orders = sources.fetch_orders().await?;
    let interactions = extract_interactions(&orders);
    if interactions.is_empty() {
        tracing::info!("No user-product interactions found");
        return Ok(Vec::new());
    }

    let products = parse_products(&sources.fetch_products().await?);
    let index = ContentIndex::build(products);
    Ok(hybrid_recommendations(&interactions, &index, &user_id, config))
}

/// Collaborative results first, then content-based ones, capped; the most
/// purchased products when both are empty.
pub fn hybrid_recommendations(
    interactions: &[Interaction],
    index: &ContentIndex,
    user_id: &str,
    config: &RecommendConfig,
) -> Vec<String> {
    let collaborative = recommend_for_user(
        interactions,
        user_id,
        config.similar_users,
        config.collaborative_limit,
    );

    let history = purchase_history(interactions, user_id);
    let content = index.recommend_for_history(&history, config.content_per_item, config.content_limit);

    tracing::debug!(
        user_id,
        purchases = history.len(),
        collaborative = collaborative.len(),
        content = content.len(),
        "Candidate lists ready"
    );

    let merged = merge_unique(&[&collaborative, &content], config.max_results);
    let result = with_popularity_fallback(merged, &popularity(interactions), config.fallback_size);
    // The fallback list is short, but honour the cap regardless
    result.into_iter().take(config.max_results).collect()
}
