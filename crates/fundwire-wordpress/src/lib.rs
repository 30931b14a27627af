//! Fundwire WordPress Connector
//!
//! Read-only client for WordPress multisite installations via the REST API.
//! Fetches posts per vertical (sub-site), flattens them into simple records,
//! and strips HTML so article bodies can be fed straight into the extraction
//! pipeline.
//!
//! Multisite layouts:
//!
//! - sub-domains: `https://{subdomain}.{base_domain}`
//! - sub-directories: `https://{base_domain}/{subdomain}`
//!
//! # Examples
//!
//! ```no_run
//! use fundwire_wordpress::{PostQuery, WordPressConnector};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = WordPressConnector::new("example.com");
//! let page = connector.posts("tech", &PostQuery::default()).await?;
//! println!("{} posts across {} pages", page.total_posts, page.total_pages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod html;
mod post;

use post::RawPost;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub use html::plain_text;
pub use post::{Category, Post};

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// WordPress caps `per_page` at 100.
const MAX_PER_PAGE: u32 = 100;

/// Errors from the WordPress REST API.
#[derive(Error, Debug)]
pub enum WordPressError {
    /// Connection-level failure (DNS, refused, timeout, TLS)
    #[error("connection error: {0}")]
    Communication(String),

    /// The API answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Http {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The body could not be decoded as the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Filters for a posts request.
#[derive(Debug, Clone)]
pub struct PostQuery {
    /// Posts per page, capped at 100 by WordPress
    pub per_page: u32,
    /// 1-based page number
    pub page: u32,
    /// Full-text search term
    pub search: Option<String>,
    /// Category ids to filter by
    pub categories: Vec<i64>,
    /// Only posts published after this ISO 8601 date
    pub after: Option<String>,
    /// Only posts published before this ISO 8601 date
    pub before: Option<String>,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            per_page: 20,
            page: 1,
            search: None,
            categories: Vec::new(),
            after: None,
            before: None,
        }
    }
}

/// One page of flattened posts plus pagination totals.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    /// Flattened posts
    pub posts: Vec<Post>,
    /// Total pages available, from `X-WP-TotalPages`
    pub total_pages: u32,
    /// Total posts available, from `X-WP-Total`
    pub total_posts: u64,
    /// Page this response covers
    pub current_page: u32,
}

/// Result of probing a sub-site's REST API root.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionCheck {
    /// Whether the API answered 200
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Probed URL
    pub url: String,
    /// Status code, when a response arrived at all
    pub status: Option<u16>,
}

/// Client for a WordPress multisite installation.
pub struct WordPressConnector {
    base_domain: String,
    use_subdirectory: bool,
    auth: Option<(String, String)>,
    client: reqwest::Client,
}

impl WordPressConnector {
    /// Create a connector for sub-domain multisite (`tech.example.com`).
    pub fn new(base_domain: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            base_domain: base_domain.into().trim_end_matches('/').to_string(),
            use_subdirectory: false,
            auth: None,
            client,
        }
    }

    /// Switch to sub-directory multisite (`example.com/tech`).
    pub fn with_subdirectories(mut self, use_subdirectory: bool) -> Self {
        self.use_subdirectory = use_subdirectory;
        self
    }

    /// Attach basic-auth credentials (a WordPress Application Password),
    /// needed for non-public posts.
    pub fn with_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((user.into(), password.into()));
        self
    }

    /// Base URL of one sub-site.
    fn site_url(&self, subdomain: &str) -> String {
        if self.use_subdirectory {
            format!("https://{}/{}", self.base_domain, subdomain)
        } else {
            format!("https://{}.{}", subdomain, self.base_domain)
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);
        if let Some((user, password)) = &self.auth {
            request = request.basic_auth(user, Some(password));
        }
        request
    }

    /// Fetch one page of posts from a sub-site.
    pub async fn posts(
        &self,
        subdomain: &str,
        query: &PostQuery,
    ) -> Result<PostPage, WordPressError> {
        let url = format!("{}/wp-json/wp/v2/posts", self.site_url(subdomain));
        let params = query_params(query);

        debug!(%url, page = query.page, "fetching WordPress posts");

        let response = self
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WordPressError::Communication(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WordPressError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let total_pages = header_number(&response, "X-WP-TotalPages").unwrap_or(1);
        let total_posts = header_number(&response, "X-WP-Total").unwrap_or(0);

        let raw: Vec<RawPost> = response
            .json()
            .await
            .map_err(|e| WordPressError::InvalidResponse(e.to_string()))?;

        Ok(PostPage {
            posts: raw.into_iter().map(Post::from).collect(),
            total_pages: total_pages as u32,
            total_posts,
            current_page: query.page,
        })
    }

    /// Fetch a single post by id.
    pub async fn post_by_id(&self, subdomain: &str, post_id: i64) -> Result<Post, WordPressError> {
        let url = format!("{}/wp-json/wp/v2/posts/{}", self.site_url(subdomain), post_id);

        let response = self
            .get(&url)
            .query(&[("_embed", "true")])
            .send()
            .await
            .map_err(|e| WordPressError::Communication(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WordPressError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let raw: RawPost = response
            .json()
            .await
            .map_err(|e| WordPressError::InvalidResponse(e.to_string()))?;

        Ok(Post::from(raw))
    }

    /// List the categories available on a sub-site.
    pub async fn categories(&self, subdomain: &str) -> Result<Vec<Category>, WordPressError> {
        let url = format!("{}/wp-json/wp/v2/categories", self.site_url(subdomain));

        let response = self
            .get(&url)
            .query(&[("per_page", "100")])
            .send()
            .await
            .map_err(|e| WordPressError::Communication(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WordPressError::Http {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json()
            .await
            .map_err(|e| WordPressError::InvalidResponse(e.to_string()))
    }

    /// Probe a sub-site's REST API root and report what happened.
    ///
    /// Never returns an error: failure modes become messages so an
    /// interactive caller can show them directly.
    pub async fn check_connection(&self, subdomain: &str) -> ConnectionCheck {
        let site_url = self.site_url(subdomain);
        let url = format!("{}/wp-json/wp/v2", site_url);

        let result = self
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => ConnectionCheck {
                success: true,
                message: "connection succeeded".to_string(),
                url,
                status: Some(response.status().as_u16()),
            },
            Ok(response) => ConnectionCheck {
                success: false,
                message: format!("HTTP error {}", response.status().as_u16()),
                url,
                status: Some(response.status().as_u16()),
            },
            Err(e) if e.is_timeout() => ConnectionCheck {
                success: false,
                message: format!("timed out connecting to {}", site_url),
                url,
                status: None,
            },
            Err(e) if e.is_connect() => ConnectionCheck {
                success: false,
                message: format!(
                    "could not connect to {}; check that the domain exists",
                    site_url
                ),
                url,
                status: None,
            },
            Err(e) => ConnectionCheck {
                success: false,
                message: format!("error: {}", e),
                url,
                status: None,
            },
        }
    }
}

/// Build the query string for a posts request.
fn query_params(query: &PostQuery) -> Vec<(String, String)> {
    let mut params = vec![
        (
            "per_page".to_string(),
            query.per_page.min(MAX_PER_PAGE).to_string(),
        ),
        ("page".to_string(), query.page.to_string()),
        // Embed author, featured media and terms in one round trip
        ("_embed".to_string(), "true".to_string()),
    ];

    if let Some(search) = &query.search {
        params.push(("search".to_string(), search.clone()));
    }
    if !query.categories.is_empty() {
        let joined = query
            .categories
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        params.push(("categories".to_string(), joined));
    }
    if let Some(after) = &query.after {
        params.push(("after".to_string(), after.clone()));
    }
    if let Some(before) = &query.before {
        params.push(("before".to_string(), before.clone()));
    }

    params
}

fn header_number(response: &reqwest::Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
