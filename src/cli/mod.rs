// src/cli/mod.rs — CLI definition (clap derive)

pub mod collaborative;
pub mod frequent;
pub mod recommend;
pub mod search;
pub mod similar;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::infra::errors::RecError;

#[derive(Parser)]
#[command(
    name = "shoprec",
    about = "Product recommendations from order history",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Override the API base URL (e.g. http://localhost:5000)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Read orders from a local JSON file instead of the API
    #[arg(long, global = true)]
    pub orders_file: Option<String>,

    /// Read products from a local JSON file instead of the API
    #[arg(long, global = true)]
    pub products_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

// Positional arguments are optional at the clap level so a missing one is
// reported as a JSON usage error with exit code 1.
#[derive(Subcommand)]
pub enum Commands {
    /// Hybrid recommendations: similar users first, then similar products
    Recommend {
        /// Target user id
        user_id: Option<String>,
    },
    /// User-based recommendations only
    Collaborative {
        /// Target user id (defaults to the first known user)
        user_id: Option<String>,
        /// Number of products to return
        #[arg(short = 'n', long, default_value = "5")]
        top_n: usize,
    },
    /// Products similar to a given product (id or exact name)
    Similar {
        product: Option<String>,
        #[arg(short = 'n', long, default_value = "5")]
        top_n: usize,
    },
    /// Rank every product against a free-text query
    Search {
        /// Query words
        query: Vec<String>,
        /// Drop products outside price bounds found in the query ("under $50")
        #[arg(long)]
        price_filter: bool,
    },
    /// Products frequently bought together with a given product
    Frequent {
        product_id: Option<String>,
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
}

/// Unwrap a required positional argument or fail with a usage error.
pub fn required(arg: Option<String>, message: &str) -> Result<String, RecError> {
    arg.map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| RecError::Usage(message.to_string()))
}

/// Turn a clap failure into a usage error. `None` for help and version
/// requests, which clap prints and exits on by itself.
pub fn usage_error(err: &clap::Error) -> Option<RecError> {
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return None;
    }
    let rendered = err.to_string();
    let message = rendered
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("invalid arguments");
    Some(RecError::Usage(
        message.trim_start_matches("error:").trim().to_string(),
    ))
}
