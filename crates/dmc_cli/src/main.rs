use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dmc_core::{NewsStorage, Result};
use dmc_inference::Roster;
use dmc_scrapers::ScraperManager;
use dmc_web::AppState;
use tracing::info;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_value = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    'd' => total_seconds += num * 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_value = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number counts as seconds
        if !current_number.is_empty() {
            match current_number.parse::<u64>() {
                Ok(num) => {
                    total_seconds += num;
                    has_value = true;
                }
                Err(_) => return Err("Invalid number in duration".to_string()),
            }
        }

        if !has_value {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage backend: memory (default) or sqlite
    #[arg(long, default_value = "memory")]
    storage: String,
    /// Backend-specific location, e.g. the SQLite database path
    #[arg(long)]
    backend_url: Option<String>,
    /// LLM API key; falls back to OPENAI_API_KEY. Without one, the
    /// heuristic summarizer and matcher are used.
    #[arg(long)]
    api_key: Option<String>,
    /// Chat model name used for summaries and extraction
    #[arg(long)]
    model: Option<String>,
    /// Path to a politicians roster JSON file
    #[arg(long)]
    roster: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the REST API server
    Serve {
        #[arg(long, default_value = "0.0.0.0:5000")]
        bind: String,
    },
    /// Refresh all categories, once or on an interval (e.g. 1h, 30m, 1h15m)
    Refresh {
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Fetch a single category
    Fetch {
        #[arg(default_value = "politics")]
        category: String,
    },
    /// List configured scrapers and RSS feeds
    Sources,
}

async fn check_storage(storage: &Arc<dyn NewsStorage>, storage_type: &str) -> Result<()> {
    let categories = storage.get_categories().await?;
    if categories.is_empty() {
        return Err(dmc_core::Error::Storage(
            "Storage returned no categories".to_string(),
        ));
    }
    info!("🏦 Storage backend initialized successfully (using {})", storage_type);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let storage = dmc_storage::create_storage(&cli.storage, cli.backend_url.as_deref()).await?;
    check_storage(&storage, &cli.storage).await?;

    let mut inference_config = dmc_inference::Config::from_env();
    if cli.api_key.is_some() {
        inference_config.api_key = cli.api_key.clone();
    }
    inference_config.model_name = cli.model.clone();
    let inference = dmc_inference::create_model(&inference_config)?;
    info!("🧠 Inference model initialized successfully (using {})", inference.name());

    let roster = Arc::new(Roster::load(cli.roster.as_deref()));
    info!("🏛️ Roster loaded with {} politicians", roster.entries().len());

    let manager = Arc::new(ScraperManager::new(
        storage.clone(),
        inference.clone(),
        roster,
    ));
    let scraper_names: Vec<&str> = manager.scraper_metadata().iter().map(|m| m.name).collect();
    info!("🦗 Scrapers initialized successfully: {}", scraper_names.join(", "));

    match cli.command {
        Commands::Serve { bind } => {
            let app = dmc_web::create_app(AppState {
                storage,
                manager,
            })
            .await;
            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!("🌐 Listening on http://{}", bind);
            axum::serve(listener, app).await?;
        }
        Commands::Refresh { interval } => {
            if let Some(interval) = interval {
                info!("Running in periodic mode with {}s interval", interval.0.as_secs());
                loop {
                    info!("Starting refresh cycle");
                    let summary = manager.refresh_all().await;
                    info!(
                        "✨ Cycle done: {} topics, {} articles",
                        summary.topics, summary.articles
                    );
                    info!("Waiting {}s before next refresh", interval.0.as_secs());
                    tokio::time::sleep(interval.0).await;
                }
            } else {
                let summary = manager.refresh_all().await;
                println!(
                    "Refreshed {} topics across {} articles",
                    summary.topics, summary.articles
                );
            }
        }
        Commands::Fetch { category } => {
            let summary = manager.refresh_category(&category).await?;
            println!(
                "{}: {} topics, {} articles",
                category, summary.topics, summary.articles
            );
        }
        Commands::Sources => {
            println!("Scrapers:");
            for meta in manager.scraper_metadata() {
                println!("  {} {} ({})", meta.emoji, meta.name, meta.region.name);
            }
            println!("RSS feeds:");
            for feed in manager.rss().feeds() {
                println!("  {} - {}", feed.source_name, feed.url);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration_parsing() {
        assert_eq!(
            "1h".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(3600)
        );
        assert_eq!(
            "1h15m30s".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(4530)
        );
        assert_eq!(
            "90".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(90)
        );
        assert!("".parse::<HumanDuration>().is_err());
        assert!("1x".parse::<HumanDuration>().is_err());
    }
}
