use crate::config::Config;
use crate::constants::{MERGED_FILENAME, MERGE_FILE_CATEGORIES};
use crate::error::Result;
use crate::table::Table;
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Aggregate text-length statistics over the merged table
#[derive(Debug, Clone)]
pub struct TextStats {
    pub mean: f64,
    pub median: f64,
}

/// Result of a complete merger run
#[derive(Debug)]
pub struct MergeSummary {
    pub total_rows: usize,
    /// Per-category row counts in enumeration order; absent files count zero
    pub category_counts: Vec<(String, usize)>,
    pub columns: Vec<String>,
    pub missing_counts: Vec<(String, usize)>,
    pub text_stats: Option<TextStats>,
    pub output_file: String,
}

/// Consolidation pipeline: concatenates the per-category files found on disk
/// into one merged dataset and derives its summary statistics.
pub struct Merger {
    raw_dir: PathBuf,
    processed_dir: PathBuf,
}

impl Merger {
    pub fn new(config: &Config) -> Self {
        Self {
            raw_dir: PathBuf::from(&config.data.raw_dir),
            processed_dir: PathBuf::from(&config.data.processed_dir),
        }
    }

    /// Merge every known category file that exists. Returns `Ok(None)` when
    /// no file was found at all; a missing individual file only contributes
    /// zero rows. Unreadable file content propagates and aborts the run.
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<Option<MergeSummary>> {
        let mut merged = Table::new();
        let mut category_counts = Vec::new();
        let mut files_found = 0usize;

        for (filename, category) in MERGE_FILE_CATEGORIES {
            let filepath = self.raw_dir.join(filename);

            if filepath.exists() {
                let mut table = Table::read_csv(&filepath)?;
                table.set_constant_column("health_category", category);
                table.set_constant_column("source_file", filename);

                info!("Loaded {}: {} records", filename, table.len());
                println!("✓ Loaded {}: {} records", filename, table.len());
                category_counts.push((category.to_string(), table.len()));
                files_found += 1;
                merged.append(table);
            } else {
                warn!("File not found: {}", filename);
                println!("✗ File not found: {filename}");
                category_counts.push((category.to_string(), 0));
            }
        }

        if files_found == 0 {
            return Ok(None);
        }

        // Derive text_length before writing so the persisted schema matches
        // the documented output columns
        let text_stats = if merged.has_column("title") && merged.has_column("text") {
            let lengths: Vec<usize> = merged
                .column("text")
                .unwrap_or_default()
                .iter()
                .map(|body| body.chars().count())
                .collect();

            let values: Vec<f64> = lengths.iter().map(|n| *n as f64).collect();
            let stats = TextStats {
                mean: mean(&values),
                median: median(values),
            };
            merged.add_column(
                "text_length",
                lengths.iter().map(|n| n.to_string()).collect(),
            );
            Some(stats)
        } else {
            None
        };

        fs::create_dir_all(&self.processed_dir)?;
        let output_path = self.processed_dir.join(MERGED_FILENAME);
        merged.write_csv(&output_path)?;
        info!("Merged dataset saved to {}", output_path.display());

        Ok(Some(MergeSummary {
            total_rows: merged.len(),
            category_counts,
            columns: merged.columns().to_vec(),
            missing_counts: merged.missing_counts(),
            text_stats,
            output_file: output_path.to_string_lossy().to_string(),
        }))
    }
}

/// Percentage of `count` within `total`, rounded to two decimal places
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 100.0 / total as f64 * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
