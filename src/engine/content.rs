// src/engine/content.rs — Content-based filtering over TF-IDF product vectors

use std::collections::{BTreeSet, HashMap};

use super::ranker::rank_by_score;
use super::similarity::SimilarityMatrix;
use super::tfidf::TfidfVectorizer;
use super::types::Product;

/// Item×item similarity over the product catalogue.
pub struct ContentIndex {
    products: Vec<Product>,
    similarity: SimilarityMatrix,
}

impl ContentIndex {
    /// Vectorize every product's text and compute pairwise cosine. Duplicate
    /// ids keep their first occurrence.
    pub fn build(products: Vec<Product>) -> Self {
        let mut seen = BTreeSet::new();
        let products: Vec<Product> = products
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();

        let texts: Vec<String> = products.iter().map(Product::text).collect();
        let (vectorizer, vectors) = TfidfVectorizer::fit_transform(&texts);
        tracing::debug!(
            products = products.len(),
            vocabulary = vectorizer.vocabulary_len(),
            "Content index built"
        );

        let rows = products
            .iter()
            .map(|p| p.id.clone())
            .zip(vectors)
            .collect();
        Self {
            products,
            similarity: SimilarityMatrix::from_sparse_rows(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Resolve a product reference given either as an id or an exact name.
    pub fn resolve(&self, reference: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.id == reference)
            .or_else(|| self.products.iter().find(|p| p.name == reference))
    }

    /// Other products most similar to `product_id`, best first. Products
    /// sharing no terms with it are left out.
    pub fn similar_to(&self, product_id: &str, top_n: usize) -> Vec<(&str, f64)> {
        self.similarity.top_similar(product_id, top_n)
    }

    /// Accumulate similarity over everything the user bought: each purchase
    /// contributes its `per_item` nearest unpurchased neighbours, and scores
    /// for the same candidate add up.
    pub fn recommend_for_history(
        &self,
        purchased: &BTreeSet<String>,
        per_item: usize,
        limit: usize,
    ) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        let mut scores: HashMap<String, f64> = HashMap::new();

        for pid in purchased {
            let neighbours = self
                .similarity
                .ranked_neighbours(pid)
                .into_iter()
                .filter(|(other, sim)| !purchased.contains(*other) && sim.is_finite() && *sim > 0.0)
                .take(per_item);
            for (other, sim) in neighbours {
                match scores.get_mut(other) {
                    Some(total) => *total += sim,
                    None => {
                        order.push(other.to_string());
                        scores.insert(other.to_string(), sim);
                    }
                }
            }
        }

        let scored = order.into_iter().map(|pid| {
            let score = scores[&pid];
            (pid, score)
        });
        rank_by_score(scored)
            .into_iter()
            .take(limit)
            .map(|(pid, _)| pid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn product(id: &str, name: &str, brand: &str, category: &str) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            description: None,
            price: None,
        }
    }

    fn catalogue() -> Vec<Product> {
        vec![
            product("w1", "Apple Watch Series 9", "Apple", "Wearables"),
            product("w2", "Galaxy Watch 6", "Samsung", "Wearables"),
            product("p1", "iPhone 15", "Apple", "Phones"),
            product("p2", "Galaxy S24", "Samsung", "Phones"),
            product("k1", "Banana Slicer", "Kitchy", "Kitchen"),
        ]
    }

    #[test]
    fn test_similar_to_excludes_reference() {
        let index = ContentIndex::build(catalogue());
        let out: Vec<&str> = index.similar_to("w1", 10).into_iter().map(|(id, _)| id).collect();
        assert!(!out.contains(&"w1"));
        assert_eq!(out.first(), Some(&"w2"));
        assert!(!out.contains(&"k1"));
    }

    #[test]
    fn test_resolve_by_id_or_name() {
        let index = ContentIndex::build(catalogue());
        assert_eq!(index.resolve("p2").map(|p| p.id.as_str()), Some("p2"));
        assert_eq!(index.resolve("Banana Slicer").map(|p| p.id.as_str()), Some("k1"));
        assert!(index.resolve("Nope").is_none());
    }

    #[test]
    fn test_history_accumulates_scores() {
        let index = ContentIndex::build(catalogue());
        let bought: BTreeSet<String> = ["w1".to_string(), "p2".to_string()].into();
        let out = index.recommend_for_history(&bought, 10, 10);
        // w2 is close to both purchases (watch, samsung, wearables)
        assert_eq!(out.first().map(String::as_str), Some("w2"));
        assert!(!out.contains(&"w1".to_string()));
        assert!(!out.contains(&"p2".to_string()));
        assert!(!out.contains(&"k1".to_string()));
    }

    #[test]
    fn test_empty_history_is_empty() {
        let index = ContentIndex::build(catalogue());
        assert!(index.recommend_for_history(&BTreeSet::new(), 10, 10).is_empty());
    }

    #[test]
    fn test_unknown_purchases_are_ignored() {
        let index = ContentIndex::build(catalogue());
        let bought: BTreeSet<String> = ["deleted-product".to_string()].into();
        assert!(index.recommend_for_history(&bought, 10, 10).is_empty());
    }

    #[test]
    fn test_duplicate_ids_collapse() {
        let mut items = catalogue();
        items.push(product("w1", "Shadow copy", "X", "Y"));
        let index = ContentIndex::build(items);
        assert_eq!(index.len(), 5);
    }
}
