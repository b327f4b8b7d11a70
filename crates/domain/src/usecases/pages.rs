//! Page building use case - turns fetched content into page views
//!
//! A page view is plain data; markup is produced by a [`PageTemplate`]
//! adapter.
//!
//! [`PageTemplate`]: crate::ports::PageTemplate

use crate::model::{Comment, Post, Tag, TagFilter};
use crate::policy::reading_time_minutes;
use crate::ports::CmsClient;
use crate::usecases::fetch::ContentFetcher;

/// Path of the blog index
pub const BLOG_PATH: &str = "/blog";

/// A renderable route of the blog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/blog`, optionally `?tags=a,b`
    BlogIndex { filter: TagFilter },
    /// `/blog/{slug}`
    Post { slug: String },
}

impl Route {
    /// Parse a path with an optional query string.
    ///
    /// Returns `None` for paths outside the blog.
    pub fn parse(path_and_query: &str) -> Option<Self> {
        let (path, query) = match path_and_query.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path_and_query, None),
        };
        let path = path.trim_end_matches('/');

        if path == BLOG_PATH {
            let filter = query
                .and_then(|q| {
                    q.split('&')
                        .filter_map(|pair| pair.split_once('='))
                        .find(|(k, _)| decode_component(k) == "tags")
                        .map(|(_, v)| TagFilter::parse(&decode_component(v)))
                })
                .unwrap_or_default();
            return Some(Route::BlogIndex { filter });
        }

        let slug = path.strip_prefix(BLOG_PATH)?.strip_prefix('/')?;
        if slug.is_empty() || slug.contains('/') {
            return None;
        }
        Some(Route::Post {
            slug: decode_component(slug),
        })
    }

    /// Canonical key identifying the rendered output of this route
    pub fn cache_key(&self) -> String {
        match self {
            Route::BlogIndex { filter } if filter.is_empty() => BLOG_PATH.to_string(),
            Route::BlogIndex { filter } => format!("{}?tags={}", BLOG_PATH, filter.canonical()),
            Route::Post { slug } => post_path(slug),
        }
    }
}

/// Form-style percent decoding (`+` is a space), as browsers send queries.
/// Invalid UTF-8 leaves the input untouched.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Path of a post's detail page
pub fn post_path(slug: &str) -> String {
    format!("{}/{}", BLOG_PATH, urlencoding::encode(slug))
}

/// Link to the blog index showing the given filter. Each tag name is
/// percent-encoded; the separating commas are not.
pub fn filter_path(filter: &TagFilter) -> String {
    if filter.is_empty() {
        return BLOG_PATH.to_string();
    }
    let tags: Vec<_> = filter
        .names()
        .iter()
        .map(|name| urlencoding::encode(name))
        .collect();
    format!("{}?tags={}", BLOG_PATH, tags.join(","))
}

/// A tag button in the list view's filter bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChip {
    pub tag: Tag,
    pub selected: bool,
    /// Link that toggles this tag in the current filter
    pub href: String,
}

/// What the list view shows in place of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Populated,
    /// The blog has no posts at all
    Empty,
    /// Posts exist but none match the filter
    NoMatches,
}

#[derive(Debug, Clone)]
pub struct ListPage {
    pub posts: Vec<Post>,
    pub chips: Vec<TagChip>,
    pub filter: TagFilter,
}

impl ListPage {
    pub fn state(&self) -> ListState {
        if !self.posts.is_empty() {
            ListState::Populated
        } else if self.filter.is_empty() {
            ListState::Empty
        } else {
            ListState::NoMatches
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailPage {
    pub post: Post,
    pub reading_time_minutes: u32,
    /// Shown only when non-empty
    pub related: Vec<Post>,
    pub comments: Vec<Comment>,
    pub comments_enabled: bool,
}

/// A built page, ready for a template
#[derive(Debug, Clone)]
pub enum Page {
    List(ListPage),
    Detail(DetailPage),
    NotFound { slug: String },
}

impl Page {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Page::NotFound { .. })
    }
}

/// Configuration for the page builder
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Maximum related posts on a detail page
    pub related_posts_limit: u32,
    /// Whether detail pages fetch and show comments
    pub comments_enabled: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            related_posts_limit: 3,
            comments_enabled: true,
        }
    }
}

/// Builds page views from CMS content
pub struct PageBuilder<C: CmsClient + ?Sized> {
    fetcher: ContentFetcher<C>,
    config: PageConfig,
}

impl<C: CmsClient + ?Sized> PageBuilder<C> {
    pub fn new(fetcher: ContentFetcher<C>, config: PageConfig) -> Self {
        Self { fetcher, config }
    }

    pub async fn build(&self, route: &Route) -> Page {
        match route {
            Route::BlogIndex { filter } => Page::List(self.build_list(filter).await),
            Route::Post { slug } => self.build_detail(slug).await,
        }
    }

    /// Posts and tags are fetched concurrently; each degrades on its own
    pub async fn build_list(&self, filter: &TagFilter) -> ListPage {
        let (posts, tags) = tokio::join!(
            self.fetcher.fetch_posts(filter),
            self.fetcher.fetch_tags()
        );

        let chips = tags
            .into_iter()
            .map(|tag| {
                let selected = filter.contains(&tag.name);
                let href = filter_path(&filter.toggled(&tag.name));
                TagChip {
                    tag,
                    selected,
                    href,
                }
            })
            .collect();

        tracing::debug!(
            filter = %filter.to_query_value(),
            posts = posts.len(),
            "Built list page"
        );

        ListPage {
            posts,
            chips,
            filter: filter.clone(),
        }
    }

    /// Post, related posts and comments are fetched concurrently. A missing
    /// post yields `Page::NotFound` regardless of the other two.
    pub async fn build_detail(&self, slug: &str) -> Page {
        let comments = async {
            if self.config.comments_enabled {
                self.fetcher.fetch_comments(slug).await
            } else {
                Vec::new()
            }
        };

        let (post, related, comments) = tokio::join!(
            self.fetcher.fetch_post(slug),
            self.fetcher
                .fetch_related_posts(slug, self.config.related_posts_limit),
            comments
        );

        let Some(post) = post else {
            tracing::info!(slug = %slug, "Rendering not-found page");
            return Page::NotFound {
                slug: slug.to_string(),
            };
        };

        Page::Detail(DetailPage {
            reading_time_minutes: reading_time_minutes(&post.content),
            post,
            related,
            comments,
            comments_enabled: self.config.comments_enabled,
        })
    }
}
