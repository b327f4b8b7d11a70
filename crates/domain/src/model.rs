//! Domain models and value objects

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A blog post as published by the CMS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// CMS-assigned post ID
    pub id: String,
    /// URL-safe identifier, unique per blog
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// HTML body (empty for related-post projections)
    #[serde(default)]
    pub content: String,
    /// Cover image URL
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Post {
    /// Timestamp shown to readers: publish time, falling back to creation
    pub fn display_date(&self) -> OffsetDateTime {
        self.published_at.unwrap_or(self.created_at)
    }

    /// Last modification: update time, falling back to creation
    pub fn last_modified(&self) -> OffsetDateTime {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Check whether the post carries a tag with the given name
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// A reader comment attached to a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Page size for listing queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
    /// No upper bound
    #[default]
    All,
    Count(u32),
}

impl Limit {
    /// Value used in CMS query strings
    pub fn as_query_value(&self) -> String {
        match self {
            Limit::All => "all".to_string(),
            Limit::Count(n) => n.to_string(),
        }
    }
}

/// Set of tag names to filter the listing by.
///
/// Order of first appearance is kept for display; duplicates and blank
/// entries are dropped. An empty filter matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagFilter {
    names: Vec<String>,
}

impl TagFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !out.iter().any(|n| n == name) {
                out.push(name.to_string());
            }
        }
        Self { names: out }
    }

    /// Parse a comma-separated query value (e.g. `rust,web`)
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// A post matches when any of its tags is in the filter
    pub fn matches(&self, post: &Post) -> bool {
        self.is_empty() || post.tags.iter().any(|t| self.contains(&t.name))
    }

    /// Filter with `name` added if absent, removed if present
    pub fn toggled(&self, name: &str) -> Self {
        if self.contains(name) {
            Self {
                names: self.names.iter().filter(|n| *n != name).cloned().collect(),
            }
        } else {
            let mut names = self.names.clone();
            names.push(name.to_string());
            Self { names }
        }
    }

    /// Comma-joined form, as used in `?tags=`
    pub fn to_query_value(&self) -> String {
        self.names.join(",")
    }

    /// Order-independent form used for cache keys
    pub fn canonical(&self) -> String {
        let mut sorted = self.names.clone();
        sorted.sort();
        sorted.join(",")
    }
}

/// Parameters for the post listing query
#[derive(Debug, Clone, Default)]
pub struct PostsQuery {
    pub limit: Limit,
    pub page: Option<u32>,
    pub tags: TagFilter,
}

/// Parameters for the related posts query
#[derive(Debug, Clone)]
pub struct RelatedPostsQuery {
    pub slug: String,
    pub limit: u32,
}

/// Parameters for the comments query
#[derive(Debug, Clone)]
pub struct CommentsQuery {
    pub slug: String,
    pub page: Option<u32>,
    pub limit: Limit,
}

/// How often crawlers should expect a sitemap URL to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

/// A single `<url>` record of the sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}
