//! Category name constants and source mappings, kept in one place to
//! ensure consistency across the codebase.

use crate::types::CategorySources;
use once_cell::sync::Lazy;

// Category names used for collection and the raw file names
pub const FITNESS_CATEGORY: &str = "fitness";
pub const WEIGHT_LOSS_CATEGORY: &str = "weight_loss";
pub const DIABETES_CATEGORY: &str = "diabetes";
pub const DIET_CATEGORY: &str = "diet";
pub const SLEEP_CATEGORY: &str = "sleep";
pub const SUBSTANCE_CATEGORY: &str = "substance";
pub const MENTAL_PHYSICAL_CATEGORY: &str = "mental_physical";

// Default output locations, relative to the working directory
pub const RAW_DATA_DIR: &str = "data/raw";
pub const PROCESSED_DATA_DIR: &str = "data/processed";
pub const MERGED_FILENAME: &str = "merged_health_data.csv";

/// Fixed category file to merged label enumeration, in merge order.
/// Some labels differ from the collection names: the merged dataset uses
/// the analysis-facing names.
pub const MERGE_FILE_CATEGORIES: [(&str, &str); 7] = [
    ("diabetes.csv", "diabetes"),
    ("diet.csv", "diet"),
    ("fitness.csv", "fitness"),
    ("mental_physical.csv", "mental_health"),
    ("sleep.csv", "sleep"),
    ("substance.csv", "substance_use"),
    ("weight_loss.csv", "weight_management"),
];

/// Default category to subreddit mapping, in collection order.
static DEFAULT_CATEGORY_SOURCES: Lazy<Vec<CategorySources>> = Lazy::new(|| {
    let entry = |category: &str, sources: &[&str]| CategorySources {
        category: category.to_string(),
        sources: sources.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        entry(FITNESS_CATEGORY, &["fitness", "bodyweightfitness", "running"]),
        entry(WEIGHT_LOSS_CATEGORY, &["loseit", "1200isplenty", "intermittentfasting"]),
        entry(DIABETES_CATEGORY, &["diabetes", "diabetes_t2", "diabetes_t1"]),
        entry(DIET_CATEGORY, &["keto", "nutrition", "EatCheapAndHealthy"]),
        entry(SLEEP_CATEGORY, &["sleep", "insomnia", "sleepapnea"]),
        entry(SUBSTANCE_CATEGORY, &["stopdrinking", "leaves", "stopsmoking"]),
        entry(MENTAL_PHYSICAL_CATEGORY, &["HealthAnxiety", "chronicpain", "migraine"]),
    ]
});

/// The default collection plan, cloned so callers can filter or extend it
pub fn default_category_sources() -> Vec<CategorySources> {
    DEFAULT_CATEGORY_SOURCES.clone()
}

/// Get all supported category names
pub fn supported_categories() -> Vec<&'static str> {
    vec![
        FITNESS_CATEGORY,
        WEIGHT_LOSS_CATEGORY,
        DIABETES_CATEGORY,
        DIET_CATEGORY,
        SLEEP_CATEGORY,
        SUBSTANCE_CATEGORY,
        MENTAL_PHYSICAL_CATEGORY,
    ]
}
