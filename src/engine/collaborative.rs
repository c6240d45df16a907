// src/engine/collaborative.rs — User-based collaborative filtering

use std::collections::BTreeSet;

use super::interactions::{count_first_seen, InsufficientData, InteractionMatrix};
use super::similarity::SimilarityMatrix;
use super::types::Interaction;

/// Users, their purchase counts, and how alike they are.
pub struct UserBasedModel<'a> {
    interactions: &'a [Interaction],
    matrix: InteractionMatrix,
    similarity: SimilarityMatrix,
}

impl<'a> UserBasedModel<'a> {
    pub fn fit(interactions: &'a [Interaction]) -> Result<Self, InsufficientData> {
        let matrix = InteractionMatrix::build(interactions)?;
        let similarity = SimilarityMatrix::users(&matrix);
        tracing::debug!(
            users = matrix.user_count(),
            products = matrix.products().len(),
            "User similarity computed"
        );
        Ok(Self {
            interactions,
            matrix,
            similarity,
        })
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// The `k` most similar other users. The target is never among them.
    pub fn similar_users(&self, user_id: &str, k: usize) -> Vec<(&str, f64)> {
        self.similarity.top_similar(user_id, k)
    }

    /// Products bought by the `k` nearest peers that the target has not
    /// bought, most frequently bought first, at most `top_n`.
    pub fn recommend(&self, user_id: &str, k: usize, top_n: usize) -> Vec<String> {
        if !self.matrix.contains_user(user_id) {
            tracing::debug!(user_id, "User has no purchases; no collaborative signal");
            return Vec::new();
        }

        let peers: BTreeSet<&str> = self
            .similar_users(user_id, k)
            .into_iter()
            .map(|(u, _)| u)
            .collect();
        if peers.is_empty() {
            return Vec::new();
        }
        let already_bought = self.matrix.purchased_by(user_id);

        count_first_seen(
            self.interactions
                .iter()
                .filter(|i| peers.contains(i.user_id.as_str()))
                .filter(|i| !already_bought.contains(&i.product_id))
                .map(|i| &i.product_id),
        )
        .into_iter()
        .take(top_n)
        .map(|(pid, _)| pid)
        .collect()
    }
}

/// One-shot user-based recommendations; empty when data is insufficient.
pub fn recommend_for_user(
    interactions: &[Interaction],
    user_id: &str,
    k: usize,
    top_n: usize,
) -> Vec<String> {
    match UserBasedModel::fit(interactions) {
        Ok(model) => model.recommend(user_id, k, top_n),
        Err(reason) => {
            tracing::info!(%reason, "Skipping collaborative filtering");
            Vec::new()
        }
    }
}
