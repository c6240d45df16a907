// src/engine/frequent.rs — Frequently bought together

use std::collections::HashMap;

use super::interactions::count_first_seen;
use super::types::Basket;

/// Products that appear in the same orders as `product_id`, most
/// co-purchased first. With no co-purchases at all, falls back to the
/// best sellers by quantity, still excluding `product_id`.
pub fn frequently_bought_together(baskets: &[Basket], product_id: &str, limit: usize) -> Vec<String> {
    let co_purchased = count_first_seen(
        baskets
            .iter()
            .filter(|b| b.contains(product_id))
            .flat_map(|b| b.items.iter())
            .filter(|i| i.product_id != product_id)
            .map(|i| &i.product_id),
    );

    if !co_purchased.is_empty() {
        return co_purchased
            .into_iter()
            .take(limit)
            .map(|(pid, _)| pid)
            .collect();
    }

    tracing::info!(product_id, "No co-purchases; falling back to best sellers");
    best_sellers(baskets, Some(product_id), limit)
}

/// Products ranked by total quantity sold. Equal totals keep first-seen order.
pub fn best_sellers(baskets: &[Basket], exclude: Option<&str>, limit: usize) -> Vec<String> {
    let mut totals: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for item in baskets.iter().flat_map(|b| b.items.iter()) {
        if Some(item.product_id.as_str()) == exclude {
            continue;
        }
        let quantity = u64::from(item.quantity);
        match index.get(item.product_id.as_str()) {
            Some(&pos) => totals[pos].1 += quantity,
            None => {
                index.insert(&item.product_id, totals.len());
                totals.push((item.product_id.clone(), quantity));
            }
        }
    }
    // stable: equal totals stay in first-seen order
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.into_iter().take(limit).map(|(pid, _)| pid).collect()
}
