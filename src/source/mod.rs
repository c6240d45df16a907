// src/source/mod.rs — Where orders and products come from

pub mod api;
pub mod file;

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::infra::config::ApiConfig;
use crate::infra::errors::RecError;

pub use api::ApiSource;
pub use file::FileSource;

/// Fetch one collection of JSON records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<Value>, RecError>;
}

/// Records already in memory.
pub struct StaticSource {
    records: Vec<Value>,
}

impl StaticSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }

    async fn fetch(&self) -> Result<Vec<Value>, RecError> {
        Ok(self.records.clone())
    }
}

/// The two collections a run can need.
pub struct Sources {
    pub orders: Box<dyn RecordSource>,
    pub products: Box<dyn RecordSource>,
}

impl Sources {
    pub fn new(orders: Box<dyn RecordSource>, products: Box<dyn RecordSource>) -> Self {
        Self { orders, products }
    }

    /// API endpoints from config, each replaced by a local snapshot file when given.
    pub fn from_config(
        api: &ApiConfig,
        orders_file: Option<PathBuf>,
        products_file: Option<PathBuf>,
    ) -> Result<Self, RecError> {
        let orders: Box<dyn RecordSource> = match orders_file {
            Some(path) => Box::new(FileSource::new(path)),
            None => Box::new(ApiSource::new(api, &api.orders_path)?),
        };
        let products: Box<dyn RecordSource> = match products_file {
            Some(path) => Box::new(FileSource::new(path)),
            None => Box::new(ApiSource::new(api, &api.products_path)?),
        };
        Ok(Self::new(orders, products))
    }

    pub async fn fetch_orders(&self) -> Result<Vec<Value>, RecError> {
        fetch_logged(self.orders.as_ref(), "orders").await
    }

    pub async fn fetch_products(&self) -> Result<Vec<Value>, RecError> {
        fetch_logged(self.products.as_ref(), "products").await
    }
}

async fn fetch_logged(source: &dyn RecordSource, what: &str) -> Result<Vec<Value>, RecError> {
    let records = source.fetch().await?;
    tracing::info!(count = records.len(), from = %source.describe(), "Fetched {}", what);
    Ok(records)
}

/// Accept only a top-level JSON array.
pub(crate) fn expect_array(value: Value, source_name: &str) -> Result<Vec<Value>, RecError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(RecError::ResponseFormat {
            source_name: source_name.to_string(),
            message: format!("expected a JSON array, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
