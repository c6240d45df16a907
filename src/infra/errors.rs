// src/infra/errors.rs — Error types for shoprec

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecError {
    // Upstream errors (fatal for the invocation)
    #[error("Could not reach {url}: {message}")]
    Network { url: String, message: String },

    #[error("{url} answered HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unexpected response from {source_name}: {message}")]
    ResponseFormat {
        source_name: String,
        message: String,
    },

    // User errors
    #[error("{0}")]
    Usage(String),

    // Embedding backend (recoverable in search)
    #[error("Embedding provider '{provider}' failed: {message}")]
    Embedding { provider: String, message: String },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RecError {
    /// Errors raised while talking to the orders/products API.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RecError::Network { .. } | RecError::HttpStatus { .. } | RecError::ResponseFormat { .. }
        )
    }
}
