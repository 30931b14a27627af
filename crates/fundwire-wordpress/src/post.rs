//! WordPress post flattening
//!
//! The REST API returns nested `rendered` wrappers and an `_embedded` blob
//! for author, featured media, and taxonomy terms. Posts are flattened into
//! a simple record before display or extraction.

use serde::{Deserialize, Serialize};

/// Raw post as returned by `/wp-json/wp/v2/posts?_embed=true`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPost {
    pub id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<Rendered>,
    #[serde(default)]
    pub content: Option<Rendered>,
    #[serde(default)]
    pub excerpt: Option<Rendered>,
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<Embedded>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Embedded {
    #[serde(default)]
    pub author: Vec<EmbeddedAuthor>,
    #[serde(default, rename = "wp:featuredmedia")]
    pub featured_media: Vec<EmbeddedMedia>,
    #[serde(default, rename = "wp:term")]
    pub terms: Vec<Vec<EmbeddedTerm>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddedAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddedMedia {
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddedTerm {
    pub name: String,
}

/// A flattened WordPress post.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post id on its site
    pub id: i64,
    /// Rendered title
    pub title: String,
    /// Rendered HTML body
    pub content: String,
    /// Rendered HTML excerpt
    pub excerpt: String,
    /// Publication date (ISO 8601, as sent by WordPress)
    pub date: Option<String>,
    /// Last-modified date
    pub modified: Option<String>,
    /// Canonical URL
    pub link: Option<String>,
    /// Author display name
    pub author: String,
    /// Category names from the first taxonomy group
    pub categories: Vec<String>,
    /// Featured image URL, when one is attached
    pub featured_image: Option<String>,
    /// Publication status
    pub status: String,
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        let embedded = raw.embedded.unwrap_or_default();

        let author = embedded
            .author
            .first()
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let featured_image = embedded
            .featured_media
            .first()
            .and_then(|m| m.source_url.clone());

        let categories = embedded
            .terms
            .first()
            .map(|group| group.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default();

        Self {
            id: raw.id,
            title: raw
                .title
                .map(|t| t.rendered)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            content: raw.content.map(|c| c.rendered).unwrap_or_default(),
            excerpt: raw.excerpt.map(|e| e.rendered).unwrap_or_default(),
            date: raw.date,
            modified: raw.modified,
            link: raw.link,
            author,
            categories,
            featured_image,
            status: raw.status.unwrap_or_else(|| "publish".to_string()),
        }
    }
}

/// A taxonomy category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Category id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Number of posts in the category
    #[serde(default)]
    pub count: u64,
}
