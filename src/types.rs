use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single collected discussion post, in the column order of the
/// persisted category files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub text: String,
    pub created_utc: f64,
    pub score: i64,
    pub num_comments: u64,
    pub subreddit: String,
    /// Stamped by the collector once the owning category is known
    #[serde(default)]
    pub category: String,
}

impl Post {
    /// Creation time as a UTC timestamp; the wire format carries fractional
    /// epoch seconds
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_utc as i64, 0)
    }
}

/// One category and the forum sources that feed it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySources {
    pub category: String,
    pub sources: Vec<String>,
}

/// Core trait that all forum API clients must implement
#[async_trait::async_trait]
pub trait ForumApi: Send + Sync {
    /// Unique identifier for this client implementation
    fn client_name(&self) -> &'static str;

    /// Fetch up to `limit` of the most recent posts from a single source
    async fn fetch_recent(&self, source: &str, limit: usize) -> Result<Vec<Post>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_at_converts_epoch_seconds() {
        let post = Post {
            id: "x".to_string(),
            title: String::new(),
            text: String::new(),
            created_utc: 1716917999.5,
            score: 0,
            num_comments: 0,
            subreddit: String::new(),
            category: String::new(),
        };

        let created = post.created_at().unwrap();
        assert_eq!(created.to_rfc3339(), "2024-05-28T17:39:59+00:00");
    }
}
