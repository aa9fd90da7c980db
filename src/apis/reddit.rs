use crate::error::{Result, ScraperError};
use crate::types::{ForumApi, Post};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const OAUTH_BASE_URL: &str = "https://oauth.reddit.com";
/// Listing endpoints return at most 100 posts per request
const PAGE_SIZE: usize = 100;

/// Credentials for a Reddit "script" application
#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

impl RedditCredentials {
    /// Read credentials from the `REDDIT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: std::env::var("REDDIT_CLIENT_ID")?,
            client_secret: std::env::var("REDDIT_CLIENT_SECRET")?,
            username: std::env::var("REDDIT_USERNAME")?,
            password: std::env::var("REDDIT_PASSWORD")?,
            user_agent: std::env::var("REDDIT_USER_AGENT")?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: Value,
}

/// Reddit API client authenticated with the OAuth2 password grant
pub struct RedditClient {
    client: reqwest::Client,
    token: String,
}

impl RedditClient {
    /// Authenticate and return a ready client. The bearer token is requested
    /// once; a collection run fits inside its lifetime.
    pub async fn connect(credentials: RedditCredentials, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(credentials.user_agent.clone())
            .timeout(timeout)
            .build()?;

        let params = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = client
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScraperError::Api {
                message: format!(
                    "token request rejected with status {}",
                    response.status()
                ),
            });
        }

        let token: TokenResponse = response.json().await?;
        info!("Authenticated with Reddit as u/{}", credentials.username);

        Ok(Self {
            client,
            token: token.access_token,
        })
    }
}

#[async_trait::async_trait]
impl ForumApi for RedditClient {
    fn client_name(&self) -> &'static str {
        "reddit"
    }

    #[instrument(skip(self))]
    async fn fetch_recent(&self, source: &str, limit: usize) -> Result<Vec<Post>> {
        let url = format!("{OAUTH_BASE_URL}/r/{source}/new");
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        while posts.len() < limit {
            let page_size = PAGE_SIZE.min(limit - posts.len());
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[
                    ("limit", page_size.to_string()),
                    ("raw_json", "1".to_string()),
                ]);
            if let Some(cursor) = &after {
                request = request.query(&[("after", cursor.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(ScraperError::Api {
                    message: format!(
                        "r/{} listing request failed with status {}",
                        source,
                        response.status()
                    ),
                });
            }

            let listing: Listing = response.json().await?;
            if listing.data.children.is_empty() {
                break;
            }
            debug!(
                "Fetched a page of {} posts from r/{}",
                listing.data.children.len(),
                source
            );

            for child in &listing.data.children {
                posts.push(parse_submission(&child.data, source)?);
            }

            match listing.data.after {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        info!("Fetched {} posts from r/{}", posts.len(), source);
        Ok(posts)
    }
}

/// Convert one listing entry into a `Post`. An absent body becomes the empty
/// string so the collector's length filter drops it downstream.
fn parse_submission(data: &Value, fallback_source: &str) -> Result<Post> {
    let id = data["id"]
        .as_str()
        .ok_or_else(|| ScraperError::MissingField("id not found".into()))?;
    let title = data["title"]
        .as_str()
        .ok_or_else(|| ScraperError::MissingField("title not found".into()))?;

    Ok(Post {
        id: id.to_string(),
        title: title.to_string(),
        text: data["selftext"].as_str().unwrap_or_default().to_string(),
        created_utc: data["created_utc"].as_f64().unwrap_or(0.0),
        score: data["score"].as_i64().unwrap_or(0),
        num_comments: data["num_comments"].as_u64().unwrap_or(0),
        subreddit: data["subreddit"].as_str().unwrap_or(fallback_source).to_string(),
        category: String::new(),
    })
}
