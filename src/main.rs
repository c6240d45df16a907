// src/main.rs — shoprec entry point

use clap::Parser;
use std::path::PathBuf;

use shoprec::cli::{self as commands, Cli, Commands};
use shoprec::engine::embedder;
use shoprec::infra::config::Config;
use shoprec::infra::errors::RecError;
use shoprec::infra::logger;
use shoprec::source::Sources;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging (respects RUST_LOG); logs go to stderr
    logger::init_logging("warn");

    match run().await {
        Ok(ids) => match serde_json::to_string(&ids) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(&format!("Could not encode result: {e}")),
        },
        Err(e) => {
            if let Some(rec) = e.downcast_ref::<RecError>() {
                if rec.is_upstream() {
                    tracing::warn!("Upstream API failure: {}", rec);
                }
            }
            fail(&format!("{e:#}"))
        }
    }
}

/// Print the error payload on stdout and exit non-zero.
fn fail(message: &str) -> ! {
    tracing::debug!("Exiting with error: {}", message);
    println!("{}", serde_json::json!({ "error": message }));
    std::process::exit(1);
}

async fn run() -> anyhow::Result<Vec<String>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match commands::usage_error(&e) {
            Some(usage) => return Err(usage.into()),
            None => e.exit(),
        },
    };

    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let sources = Sources::from_config(
        &config.api,
        cli.orders_file.map(PathBuf::from),
        cli.products_file.map(PathBuf::from),
    )?;

    let ids = match cli.command {
        Commands::Recommend { user_id } => {
            shoprec::cli::recommend::run_recommend(user_id, &sources, &config.recommend).await?
        }
        Commands::Collaborative { user_id, top_n } => {
            shoprec::cli::collaborative::run_collaborative(
                user_id,
                top_n,
                &sources,
                &config.recommend,
            )
            .await?
        }
        Commands::Similar { product, top_n } => {
            shoprec::cli::similar::run_similar(product, top_n, &sources).await?
        }
        Commands::Search {
            query,
            price_filter,
        } => {
            let embedder = embedder::from_config(&config.embedding, config.api.timeout())?;
            shoprec::cli::search::run_search(
                &query,
                price_filter,
                &sources,
                embedder.as_ref(),
                &config.embedding,
            )
            .await?
        }
        Commands::Frequent { product_id, limit } => {
            shoprec::cli::frequent::run_frequent(product_id, limit, &sources).await?
        }
    };

    Ok(ids)
}
