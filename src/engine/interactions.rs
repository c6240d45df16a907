// src/engine/interactions.rs — Orders → baskets → user×product count matrix

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::Value;
use thiserror::Error;

use super::types::{Basket, BasketItem, IdRef, Interaction};

/// Why a matrix could not be built. Never fatal: callers degrade to an
/// empty list or the popularity fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsufficientData {
    #[error("no user-product interactions")]
    NoRecords,
    #[error("need at least 2 users, found {0}")]
    TooFewUsers(usize),
    #[error("need at least 2 products, found {0}")]
    TooFewProducts(usize),
}

/// Normalize raw orders into baskets. Malformed orders and line items are
/// skipped.
pub fn extract_baskets(orders: &[Value]) -> Vec<Basket> {
    let mut baskets = Vec::new();
    let mut skipped_items = 0usize;

    for order in orders {
        let Some(order) = order.as_object() else {
            continue;
        };
        let Some(user_id) = order
            .get("userId")
            .and_then(IdRef::from_value)
            .map(IdRef::resolve)
        else {
            continue;
        };

        let lines = order
            .get("products")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            match basket_item(line) {
                Some(item) => items.push(item),
                None => skipped_items += 1,
            }
        }
        baskets.push(Basket { user_id, items });
    }

    if skipped_items > 0 {
        tracing::debug!(skipped_items, "Skipped line items without a product id");
    }
    baskets
}

fn basket_item(line: &Value) -> Option<BasketItem> {
    let line = line.as_object()?;
    let product_id = ["productId", "_id", "name"]
        .iter()
        .filter_map(|key| line.get(*key))
        .find(|v| !v.is_null())
        .and_then(IdRef::from_value)?
        .resolve();
    let quantity = line
        .get("quantity")
        .and_then(Value::as_f64)
        .filter(|q| q.is_finite() && *q >= 1.0)
        .map(|q| q as u32)
        .unwrap_or(1);
    Some(BasketItem {
        product_id,
        quantity,
    })
}

/// Flatten baskets into one interaction per line item.
pub fn interactions_from_baskets(baskets: &[Basket]) -> Vec<Interaction> {
    baskets
        .iter()
        .flat_map(|b| {
            b.items
                .iter()
                .map(move |i| Interaction::new(b.user_id.clone(), i.product_id.clone()))
        })
        .collect()
}

pub fn extract_interactions(orders: &[Value]) -> Vec<Interaction> {
    interactions_from_baskets(&extract_baskets(orders))
}

/// Everything `user_id` has bought.
pub fn purchase_history(interactions: &[Interaction], user_id: &str) -> BTreeSet<String> {
    interactions
        .iter()
        .filter(|i| i.user_id == user_id)
        .map(|i| i.product_id.clone())
        .collect()
}

/// Count occurrences, ordered by count descending. Equal counts keep the
/// order in which the keys were first seen.
pub fn count_first_seen<I, S>(keys: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for key in keys {
        let key = key.as_ref();
        match index.get(key) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(key.to_string(), counts.len());
                counts.push((key.to_string(), 1));
            }
        }
    }
    // sort_by is stable, so first-seen order survives among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Products ranked by raw purchase count across all records.
pub fn popularity(interactions: &[Interaction]) -> Vec<(String, usize)> {
    count_first_seen(interactions.iter().map(|i| &i.product_id))
}

/// Sparse user×product purchase-count table.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    rows: BTreeMap<String, BTreeMap<String, u32>>,
    products: Vec<String>,
}

impl InteractionMatrix {
    /// Pivot interactions into counts. Requires at least 2 distinct users
    /// and 2 distinct products.
    pub fn build(interactions: &[Interaction]) -> Result<Self, InsufficientData> {
        if interactions.is_empty() {
            return Err(InsufficientData::NoRecords);
        }

        let mut rows: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();
        let mut products = BTreeSet::new();
        for i in interactions {
            *rows
                .entry(i.user_id.clone())
                .or_default()
                .entry(i.product_id.clone())
                .or_insert(0) += 1;
            products.insert(i.product_id.clone());
        }

        if rows.len() < 2 {
            return Err(InsufficientData::TooFewUsers(rows.len()));
        }
        if products.len() < 2 {
            return Err(InsufficientData::TooFewProducts(products.len()));
        }

        Ok(Self {
            rows,
            products: products.into_iter().collect(),
        })
    }

    /// Row labels, sorted.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Column labels, sorted.
    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn user_count(&self) -> usize {
        self.rows.len()
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.rows.contains_key(user_id)
    }

    pub fn count(&self, user_id: &str, product_id: &str) -> u32 {
        self.rows
            .get(user_id)
            .and_then(|r| r.get(product_id))
            .copied()
            .unwrap_or(0)
    }

    /// Non-zero cells of a user's row.
    pub fn row(&self, user_id: &str) -> Option<&BTreeMap<String, u32>> {
        self.rows.get(user_id)
    }

    pub fn purchased_by(&self, user_id: &str) -> BTreeSet<String> {
        self.row(user_id)
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn scenario_orders() -> Vec<Value> {
        vec![
            json!({"userId": "u1", "products": [{"productId": "p1"}]}),
            json!({"userId": "u2", "products": [{"productId": "p1"}, {"productId": "p2"}]}),
            json!({"userId": "u3", "products": [{"productId": "p2"}]}),
        ]
    }

    #[test]
    fn test_extract_plain_ids() {
        let recs = extract_interactions(&scenario_orders());
        assert_eq!(
            recs,
            vec![
                Interaction::new("u1", "p1"),
                Interaction::new("u2", "p1"),
                Interaction::new("u2", "p2"),
                Interaction::new("u3", "p2"),
            ]
        );
    }

    #[test]
    fn test_extract_embedded_and_fallback_keys() {
        let orders = vec![json!({
            "userId": {"_id": "u9", "email": "x@y.z"},
            "products": [
                {"productId": {"_id": "p7", "name": "Phone"}},
                {"_id": "line-2"},
                {"name": "Loose Item"},
                {"productId": null, "_id": "line-4"},
                {"price": 3},
                "garbage",
            ]
        })];
        let ids: Vec<String> = extract_interactions(&orders)
            .into_iter()
            .map(|i| i.product_id)
            .collect();
        assert_eq!(ids, vec!["p7", "line-2", "Loose Item", "line-4"]);
    }

    #[test]
    fn test_extract_skips_malformed_orders() {
        let orders = vec![
            json!("not an order"),
            json!({"products": [{"productId": "p1"}]}),
            json!({"userId": null, "products": [{"productId": "p1"}]}),
            json!({"userId": "u1", "products": "nope"}),
            json!({"userId": "u2"}),
        ];
        let baskets = extract_baskets(&orders);
        assert_eq!(baskets.len(), 2);
        assert!(baskets.iter().all(|b| b.items.is_empty()));
        assert!(extract_interactions(&orders).is_empty());
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let orders = vec![json!({"userId": "u1", "products": [
            {"productId": "p1", "quantity": 3},
            {"productId": "p2"},
            {"productId": "p3", "quantity": 0},
        ]})];
        let quantities: Vec<u32> = extract_baskets(&orders)[0]
            .items
            .iter()
            .map(|i| i.quantity)
            .collect();
        assert_eq!(quantities, vec![3, 1, 1]);
    }

    #[test]
    fn test_matrix_counts_multiplicity() {
        let recs = vec![
            Interaction::new("u1", "p1"),
            Interaction::new("u1", "p1"),
            Interaction::new("u2", "p2"),
        ];
        let m = InteractionMatrix::build(&recs).unwrap();
        assert_eq!(m.count("u1", "p1"), 2);
        assert_eq!(m.count("u1", "p2"), 0);
        assert_eq!(m.count("nobody", "p1"), 0);
        assert_eq!(m.row("u1").map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_matrix_labels_unique() {
        let m = InteractionMatrix::build(&extract_interactions(&scenario_orders())).unwrap();
        let users: Vec<&str> = m.users().collect();
        assert_eq!(users, vec!["u1", "u2", "u3"]);
        assert_eq!(m.products(), &["p1".to_string(), "p2".to_string()]);
        let unique: BTreeSet<&str> = users.iter().copied().collect();
        assert_eq!(unique.len(), users.len());
    }

    #[test]
    fn test_matrix_insufficient_data() {
        assert_eq!(
            InteractionMatrix::build(&[]).unwrap_err(),
            InsufficientData::NoRecords
        );
        let one_user = vec![Interaction::new("u1", "p1"), Interaction::new("u1", "p2")];
        assert_eq!(
            InteractionMatrix::build(&one_user).unwrap_err(),
            InsufficientData::TooFewUsers(1)
        );
        let one_product = vec![Interaction::new("u1", "p1"), Interaction::new("u2", "p1")];
        assert_eq!(
            InteractionMatrix::build(&one_product).unwrap_err(),
            InsufficientData::TooFewProducts(1)
        );
    }

    #[test]
    fn test_popularity_ties_first_seen() {
        let recs = vec![
            Interaction::new("u1", "b"),
            Interaction::new("u1", "a"),
            Interaction::new("u2", "c"),
            Interaction::new("u2", "a"),
            Interaction::new("u3", "c"),
        ];
        assert_eq!(
            popularity(&recs),
            vec![("a".to_string(), 2), ("c".to_string(), 2), ("b".to_string(), 1)]
        );
    }

    #[test]
    fn test_purchase_history() {
        let recs = extract_interactions(&scenario_orders());
        let h = purchase_history(&recs, "u2");
        assert_eq!(h.into_iter().collect::<Vec<_>>(), vec!["p1", "p2"]);
        assert!(purchase_history(&recs, "ghost").is_empty());
    }
}
