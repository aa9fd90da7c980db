use crate::config::Config;
use crate::error::{Result, ScraperError};
use crate::types::{CategorySources, ForumApi, Post};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Result of querying a single source: the counts it contributed, or the
/// failure cause.
#[derive(Debug)]
pub enum SourceOutcome {
    Collected {
        source: String,
        fetched: usize,
        kept: usize,
    },
    Failed {
        source: String,
        error: ScraperError,
    },
}

/// Result of a complete category collection run
#[derive(Debug)]
pub struct CategoryReport {
    pub category: String,
    pub outcomes: Vec<SourceOutcome>,
    pub unique_posts: usize,
    pub output_file: Option<String>,
}

impl CategoryReport {
    pub fn total_fetched(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                SourceOutcome::Collected { fetched, .. } => *fetched,
                SourceOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn total_kept(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                SourceOutcome::Collected { kept, .. } => *kept,
                SourceOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> Vec<(&str, &ScraperError)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                SourceOutcome::Failed { source, error } => Some((source.as_str(), error)),
                SourceOutcome::Collected { .. } => None,
            })
            .collect()
    }
}

/// Collection pipeline: fetches posts per source, filters and deduplicates
/// them per category, and persists one CSV file per category.
pub struct Collector {
    client: Arc<dyn ForumApi>,
    limit_per_source: usize,
    min_body_length: usize,
    delay: Duration,
    raw_dir: PathBuf,
}

impl Collector {
    pub fn new(client: Arc<dyn ForumApi>, config: &Config) -> Self {
        Self {
            client,
            limit_per_source: config.collector.limit_per_source,
            min_body_length: config.collector.min_body_length,
            delay: Duration::from_millis(config.collector.delay_ms),
            raw_dir: PathBuf::from(&config.data.raw_dir),
        }
    }

    /// Collect, filter and persist all posts for a single category.
    ///
    /// Sources run strictly in list order; a failed source is recorded and
    /// skipped without aborting the category.
    #[instrument(skip(self, category), fields(category = %category.category))]
    pub async fn collect_category(&self, category: &CategorySources) -> Result<CategoryReport> {
        info!(
            "Starting collection for {} via {}",
            category.category,
            self.client.client_name()
        );
        let mut outcomes = Vec::new();
        let mut posts: Vec<Post> = Vec::new();

        for source in &category.sources {
            let source = normalize_source_name(source);
            println!("📡 Scraping r/{source}...");

            match self.client.fetch_recent(&source, self.limit_per_source).await {
                Ok(fetched) => {
                    let total = fetched.len();
                    let kept: Vec<Post> = fetched
                        .into_iter()
                        .filter(|post| self.qualifies(post))
                        .map(|mut post| {
                            post.category = category.category.clone();
                            post
                        })
                        .collect();

                    info!("Fetched {} posts from r/{} ({} kept)", total, source, kept.len());
                    println!(
                        "   ✅ Kept {} of {} posts from r/{}",
                        kept.len(),
                        total,
                        source
                    );
                    outcomes.push(SourceOutcome::Collected {
                        source,
                        fetched: total,
                        kept: kept.len(),
                    });
                    posts.extend(kept);
                }
                Err(e) => {
                    error!("Failed to fetch r/{}: {}", source, e);
                    println!("   ⚠️  Error scraping r/{source}: {e}");
                    outcomes.push(SourceOutcome::Failed { source, error: e });
                }
            }

            tokio::time::sleep(self.delay).await;
        }

        let unique = dedup_posts(posts);
        debug!("{} unique posts after deduplication", unique.len());
        if let Some(newest) = unique.iter().filter_map(Post::created_at).max() {
            debug!("Newest collected post dates to {}", newest);
        }

        let output_file = if unique.is_empty() {
            warn!("No posts collected for {}; no file written", category.category);
            None
        } else {
            let path = self.persist_category(&category.category, &unique)?;
            info!("Saved {} unique posts to {}", unique.len(), path);
            println!("💾 Saved {} unique posts to {}", unique.len(), path);
            Some(path)
        };

        Ok(CategoryReport {
            category: category.category.clone(),
            outcomes,
            unique_posts: unique.len(),
            output_file,
        })
    }

    fn qualifies(&self, post: &Post) -> bool {
        !post.text.is_empty() && post.text.chars().count() > self.min_body_length
    }

    /// Write a category file, overwriting any previous run's output
    fn persist_category(&self, category: &str, posts: &[Post]) -> Result<String> {
        fs::create_dir_all(&self.raw_dir)?;

        let filepath = self.raw_dir.join(format!("{category}.csv"));
        let mut writer = csv::Writer::from_path(&filepath)?;
        for post in posts {
            writer.serialize(post)?;
        }
        writer.flush()?;

        Ok(filepath.to_string_lossy().to_string())
    }
}

/// Strip a leading `r/` prefix and lowercase, so configured source names can
/// be written either way
pub fn normalize_source_name(raw: &str) -> String {
    raw.trim().trim_start_matches("r/").to_lowercase()
}

/// Drop duplicate post ids, keeping the first occurrence
fn dedup_posts(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .filter(|post| seen.insert(post.id.clone()))
        .collect()
}
