// src/cli/collaborative.rs — User-based recommendations only

use crate::engine::collaborative::UserBasedModel;
use crate::engine::interactions::extract_interactions;
use crate::infra::config::RecommendConfig;
use crate::infra::errors::RecError;
use crate::source::Sources;

/// Without a user id, recommends for the first user in the matrix.
pub async fn run_collaborative(
    user_id: Option<String>,
    top_n: usize,
    sources: &Sources,
    config: &RecommendConfig,
) -> Result<Vec<String>, RecError> {
    let orders = sources.fetch_orders().await?;
    if orders.is_empty() {
        tracing::warn!("No orders returned");
        return Ok(Vec::new());
    }

    let interactions = extract_interactions(&orders);
    let model = match UserBasedModel::fit(&interactions) {
        Ok(model) => model,
        Err(reason) => {
            tracing::warn!(%reason, "Not enough data for collaborative filtering");
            return Ok(Vec::new());
        }
    };

    let target = match user_id.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        Some(u) => u,
        None => match model.matrix().users().next() {
            Some(first) => {
                tracing::info!(user_id = first, "No user given; using first user");
                first.to_string()
            }
            None => return Ok(Vec::new()),
        },
    };

    Ok(model.recommend(&target, config.similar_users, top_n))
}
