// src/source/file.rs — Local JSON snapshot

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use super::{expect_array, RecordSource};
use crate::infra::errors::RecError;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<Value>, RecError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| RecError::ResponseFormat {
                source_name: self.describe(),
                message: format!("not valid JSON: {}", e),
            })?;
        expect_array(value, &self.describe())
    }
}
