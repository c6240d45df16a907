// tests/recommend_test.rs — Integration test: hybrid recommendation pipeline

use std::collections::HashSet;

use serde_json::{json, Value};
use shoprec::cli::collaborative::run_collaborative;
use shoprec::cli::frequent::run_frequent;
use shoprec::cli::recommend::run_recommend;
use shoprec::cli::similar::run_similar;
use shoprec::infra::config::RecommendConfig;
use shoprec::infra::errors::RecError;
use shoprec::source::{Sources, StaticSource};

fn sources(orders: Vec<Value>, products: Vec<Value>) -> Sources {
    Sources::new(
        Box::new(StaticSource::new(orders)),
        Box::new(StaticSource::new(products)),
    )
}

fn scenario_orders() -> Vec<Value> {
    vec![
        json!({"userId": "u1", "products": [{"productId": "p1"}]}),
        json!({"userId": "u2", "products": [{"productId": "p1"}, {"productId": "p2"}]}),
        json!({"userId": "u3", "products": [{"productId": "p2"}]}),
    ]
}

fn catalogue() -> Vec<Value> {
    vec![
        json!({"_id": "p1", "name": "Trail Running Shoes", "brand": "Stride", "category": "Footwear"}),
        json!({"_id": "p2", "name": "Yoga Mat", "brand": "Zen", "category": "Fitness"}),
        json!({"_id": "p3", "name": "Road Running Shoes", "brand": "Stride", "category": "Footwear"}),
        json!({"_id": "p4", "name": "Espresso Machine", "brand": "Brewer", "category": "Kitchen"}),
    ]
}

#[tokio::test]
async fn test_scenario_surfaces_p2_for_u1() {
    let s = sources(scenario_orders(), catalogue());
    let out = run_recommend(Some("u1".into()), &s, &RecommendConfig::default())
        .await
        .unwrap();
    assert!(out.contains(&"p2".to_string()), "got {out:?}");
    assert!(!out.contains(&"p1".to_string()));
}

#[tokio::test]
async fn test_hybrid_list_unique_and_capped() {
    let mut orders = scenario_orders();
    orders.push(json!({"userId": {"_id": "u4"}, "products": [
        {"productId": {"_id": "p1"}}, {"productId": "p3"}, {"productId": "p4"}
    ]}));
    let s = sources(orders, catalogue());
    let config = RecommendConfig::default();
    let out = run_recommend(Some("u1".into()), &s, &config).await.unwrap();
    let unique: HashSet<&String> = out.iter().collect();
    assert_eq!(unique.len(), out.len());
    assert!(out.len() <= config.max_results);
    assert!(!out.contains(&"p1".to_string()));
    // u4 shares p1 with u1 and bought the other running shoe
    assert!(out.contains(&"p3".to_string()));
}

#[tokio::test]
async fn test_user_without_history_gets_best_sellers() {
    let s = sources(scenario_orders(), catalogue());
    let out = run_recommend(Some("stranger".into()), &s, &RecommendConfig::default())
        .await
        .unwrap();
    assert_eq!(out, vec!["p1".to_string(), "p2".to_string()]);
}

#[tokio::test]
async fn test_no_orders_is_empty_not_error() {
    let s = sources(vec![], catalogue());
    let out = run_recommend(Some("u1".into()), &s, &RecommendConfig::default())
        .await
        .unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_missing_user_is_usage_error() {
    let s = sources(scenario_orders(), catalogue());
    let err = run_recommend(None, &s, &RecommendConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RecError::Usage(ref m) if m == "Missing user ID"));
}

#[tokio::test]
async fn test_collaborative_defaults_to_first_user() {
    let s = sources(scenario_orders(), vec![]);
    let out = run_collaborative(None, 5, &s, &RecommendConfig::default())
        .await
        .unwrap();
    assert_eq!(out, vec!["p2".to_string()]);
}

#[tokio::test]
async fn test_collaborative_single_user_is_empty() {
    let orders = vec![json!({"userId": "solo", "products": [{"productId": "a"}, {"productId": "b"}]})];
    let s = sources(orders, vec![]);
    let out = run_collaborative(Some("solo".into()), 5, &s, &RecommendConfig::default())
        .await
        .unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_similar_by_name() {
    let s = sources(vec![], catalogue());
    let out = run_similar(Some("Trail Running Shoes".into()), 5, &s)
        .await
        .unwrap();
    assert_eq!(out.first().map(String::as_str), Some("p3"));
    assert!(!out.contains(&"p1".to_string()));
}

#[tokio::test]
async fn test_frequent_bought_together() {
    let orders = vec![
        json!({"userId": "u1", "products": [{"productId": "p1", "quantity": 1}, {"productId": "p2", "quantity": 1}]}),
        json!({"userId": "u2", "products": [{"productId": "p1", "quantity": 1}, {"productId": "p2", "quantity": 1}, {"productId": "p3", "quantity": 1}]}),
    ];
    let s = sources(orders, vec![]);
    let out = run_frequent(Some("p1".into()), 5, &s).await.unwrap();
    assert_eq!(out, vec!["p2".to_string(), "p3".to_string()]);
}
