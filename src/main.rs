use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

mod apis;
mod collector;
mod config;
mod constants;
mod error;
mod logging;
mod merger;
mod table;
mod types;

use crate::apis::reddit::{RedditClient, RedditCredentials};
use crate::collector::Collector;
use crate::config::Config;
use crate::merger::{MergeSummary, Merger};
use crate::types::{CategorySources, ForumApi};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "health_scraper")]
#[command(about = "Health community discussion post collector")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the post collection process
    Collector {
        /// Specific categories to collect (comma-separated). Available: fitness,
        /// weight_loss, diabetes, diet, sleep, substance, mental_physical
        #[arg(long)]
        categories: Option<String>,
    },
    /// Merge the per-category files into one dataset
    Merger,
    /// Run both collector and merger sequentially
    Run {
        /// Specific categories to collect (comma-separated)
        #[arg(long)]
        categories: Option<String>,
    },
}

fn select_categories(filter: Option<String>) -> Vec<CategorySources> {
    let all = constants::default_category_sources();
    let Some(list) = filter else {
        return all;
    };

    let mut selected = Vec::new();
    for name in list.split(',').map(str::trim) {
        match all.iter().find(|c| c.category == name) {
            Some(category) => selected.push(category.clone()),
            None => {
                warn!("Unknown category specified");
                println!(
                    "⚠️  Unknown category: {} (available: {})",
                    name,
                    constants::supported_categories().join(", ")
                );
            }
        }
    }
    selected
}

async fn run_collector(
    categories: &[CategorySources],
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = RedditCredentials::from_env()?;
    let timeout = Duration::from_secs(config.collector.timeout_seconds);
    let client: Arc<dyn ForumApi> = Arc::new(RedditClient::connect(credentials, timeout).await?);
    let collector = Collector::new(client, config);

    for category in categories {
        let span = tracing::info_span!("Collecting category", category = %category.category);
        let _enter = span.enter();

        match collector.collect_category(category).await {
            Ok(report) => {
                info!("Collection finished");
                println!("\n📊 Collection Results for {}:", report.category);
                println!("   Sources queried: {}", report.outcomes.len());
                println!("   Posts fetched: {}", report.total_fetched());
                println!("   Posts kept: {}", report.total_kept());
                println!("   Unique posts: {}", report.unique_posts);
                match &report.output_file {
                    Some(file) => println!("   Output file: {file}"),
                    None => println!("   Output file: none (no posts collected)"),
                }

                let failures = report.failures();
                if !failures.is_empty() {
                    warn!("{} sources failed during collection", failures.len());
                    println!("\n⚠️  Sources that failed:");
                    for (source, failure) in &failures {
                        println!("   - r/{source}: {failure}");
                    }
                }
            }
            Err(e) => {
                error!("Collection failed: {}", e);
                println!("❌ Collection failed for {}: {}", category.category, e);
            }
        }
        println!("Finished {}\n{}", category.category, "-".repeat(30));
    }
    Ok(())
}

fn run_merger(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let merger = Merger::new(config);
    match merger.run()? {
        Some(summary) => {
            print_merge_summary(&summary);
            println!("\n✅ Data merging completed successfully!");
            Ok(())
        }
        None => {
            error!("No category files found to merge");
            println!("❌ Error: No data files found to merge");
            std::process::exit(1);
        }
    }
}

fn print_merge_summary(summary: &MergeSummary) {
    println!("\n{}", "=".repeat(50));
    println!("✅ Merged dataset saved: {}", summary.output_file);
    println!("{}", "=".repeat(50));
    println!("Total records: {}", summary.total_rows);

    println!("\nCategory Distribution:");
    println!("{}", "-".repeat(50));
    for (category, count) in &summary.category_counts {
        let pct = merger::percentage(*count, summary.total_rows);
        println!("{category:20}: {count:6} ({pct:5.2}%)");
    }
    println!("{}", "-".repeat(50));

    if let Some(stats) = &summary.text_stats {
        println!("\nText Statistics:");
        println!("  Average text length: {:.0} characters", stats.mean);
        println!("  Median text length: {:.0} characters", stats.median);
    }

    println!("\nColumns in merged dataset: {:?}", summary.columns);
    println!("Missing values per column:");
    for (column, count) in &summary.missing_counts {
        println!("  {column}: {count}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Collector { categories } => {
            println!("🔄 Running collector pipeline...");
            let categories = select_categories(categories);
            run_collector(&categories, &config).await?;
        }
        Commands::Merger => {
            println!("🔨 Running merger pipeline...");
            run_merger(&config)?;
        }
        Commands::Run { categories } => {
            println!("🚀 Running full pipeline (collector + merger)...");
            let categories = select_categories(categories);

            println!("\n📥 Step 1: Running collector...");
            run_collector(&categories, &config).await?;

            println!("\n🔨 Step 2: Running merger...");
            run_merger(&config)?;
        }
    }
    Ok(())
}
