// src/engine/similarity.rs — Cosine similarity and the labelled similarity table

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::interactions::InteractionMatrix;

/// Compute cosine similarity between two dense vectors.
///
/// Mismatched lengths, empty inputs and zero vectors yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    finite_or_zero(dot / (norm_a * norm_b))
}

/// Cosine similarity between two sparse vectors keyed by column.
pub fn sparse_cosine<K: Ord>(a: &BTreeMap<K, f64>, b: &BTreeMap<K, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(k, x)| large.get(k).map(|y| x * y))
        .sum();
    let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.values().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let sim = dot / (norm_a * norm_b);
    if sim.is_finite() {
        sim.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() {
        x.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Order scores descending with every non-finite value after every finite one.
pub fn score_order(a: f64, b: f64) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Square, symmetric, labelled table of pairwise cosine similarities.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    labels: Vec<String>,
    index: BTreeMap<String, usize>,
    values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Pairwise cosine over labelled sparse vectors. Only the upper triangle
    /// is computed; the lower one is mirrored.
    pub fn from_sparse_rows<K: Ord>(rows: Vec<(String, BTreeMap<K, f64>)>) -> Self {
        let n = rows.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                let sim = if i == j {
                    if rows[i].1.values().any(|v| *v != 0.0) {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    sparse_cosine(&rows[i].1, &rows[j].1)
                };
                values[i][j] = sim;
                values[j][i] = sim;
            }
        }

        let labels: Vec<String> = rows.into_iter().map(|(label, _)| label).collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self {
            labels,
            index,
            values,
        }
    }

    /// User×user similarity over purchase-count rows.
    pub fn users(matrix: &InteractionMatrix) -> Self {
        let rows = matrix
            .users()
            .map(|u| {
                let row: BTreeMap<&str, f64> = matrix
                    .row(u)
                    .map(|r| r.iter().map(|(p, c)| (p.as_str(), f64::from(*c))).collect())
                    .unwrap_or_default();
                (u.to_string(), row)
            })
            .collect();
        Self::from_sparse_rows(rows)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = *self.index.get(a)?;
        let j = *self.index.get(b)?;
        Some(self.values[i][j])
    }

    /// Every other label ranked by similarity to `reference`, most similar
    /// first. The reference itself is never part of the result.
    pub fn ranked_neighbours(&self, reference: &str) -> Vec<(&str, f64)> {
        let Some(&i) = self.index.get(reference) else {
            return Vec::new();
        };
        let mut out: Vec<(&str, f64)> = self
            .labels
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(j, label)| (label.as_str(), self.values[i][j]))
            .collect();
        out.sort_by(|a, b| score_order(a.1, b.1));
        out
    }

    /// Top `k` neighbours with strictly positive similarity.
    pub fn top_similar(&self, reference: &str, k: usize) -> Vec<(&str, f64)> {
        self.ranked_neighbours(reference)
            .into_iter()
            .filter(|(_, sim)| sim.is_finite() && *sim > 0.0)
            .take(k)
            .collect()
    }
}
