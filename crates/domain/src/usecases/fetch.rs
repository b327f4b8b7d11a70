//! Content fetch use case - shields rendering from CMS failures
//!
//! Every `try_*` method returns the raw `Result` from the CMS port. The
//! public `fetch_*` methods collapse failures into a fallback (empty list or
//! `None`) so callers always get something renderable.

use std::sync::Arc;

use crate::model::{
    Comment, CommentsQuery, Limit, Post, PostsQuery, RelatedPostsQuery, Tag, TagFilter,
};
use crate::ports::{CmsClient, CmsError};

/// Content fetcher over a CMS client
pub struct ContentFetcher<C: CmsClient + ?Sized> {
    cms: Arc<C>,
}

impl<C: CmsClient + ?Sized> Clone for ContentFetcher<C> {
    fn clone(&self) -> Self {
        Self {
            cms: Arc::clone(&self.cms),
        }
    }
}

impl<C: CmsClient + ?Sized> ContentFetcher<C> {
    pub fn new(cms: Arc<C>) -> Self {
        Self { cms }
    }

    /// Fetch a post by slug; `None` covers both not-found and failure
    pub async fn fetch_post(&self, slug: &str) -> Option<Post> {
        match self.try_fetch_post(slug).await {
            Ok(Some(post)) => Some(post),
            Ok(None) => {
                tracing::debug!(slug = %slug, "Post not found");
                None
            }
            Err(e) => {
                tracing::error!(slug = %slug, error = %e, "Failed to fetch post");
                None
            }
        }
    }

    /// Fetch all posts matching the filter, in CMS order
    pub async fn fetch_posts(&self, filter: &TagFilter) -> Vec<Post> {
        or_empty(self.try_fetch_posts(filter).await, "posts")
    }

    /// Fetch every post, unfiltered
    pub async fn fetch_all_posts(&self) -> Vec<Post> {
        self.fetch_posts(&TagFilter::default()).await
    }

    /// Fetch all tags
    pub async fn fetch_tags(&self) -> Vec<Tag> {
        or_empty(self.try_fetch_tags().await, "tags")
    }

    /// Fetch up to `limit` posts related to `slug`
    pub async fn fetch_related_posts(&self, slug: &str, limit: u32) -> Vec<Post> {
        or_empty(self.try_fetch_related_posts(slug, limit).await, "related posts")
    }

    /// Fetch all comments on a post
    pub async fn fetch_comments(&self, slug: &str) -> Vec<Comment> {
        or_empty(self.try_fetch_comments(slug).await, "comments")
    }

    pub async fn try_fetch_post(&self, slug: &str) -> Result<Option<Post>, CmsError> {
        self.cms.get_post(slug).await
    }

    /// The tag predicate is applied locally as well, so the result is the
    /// matching subset even if the CMS ignores the filter.
    pub async fn try_fetch_posts(&self, filter: &TagFilter) -> Result<Vec<Post>, CmsError> {
        let query = PostsQuery {
            limit: Limit::All,
            page: None,
            tags: filter.clone(),
        };
        let mut posts = self.cms.get_posts(&query).await?;
        posts.retain(|p| filter.matches(p));
        Ok(posts)
    }

    pub async fn try_fetch_tags(&self) -> Result<Vec<Tag>, CmsError> {
        self.cms.get_tags(1, Limit::All).await
    }

    pub async fn try_fetch_related_posts(
        &self,
        slug: &str,
        limit: u32,
    ) -> Result<Vec<Post>, CmsError> {
        let query = RelatedPostsQuery {
            slug: slug.to_string(),
            limit,
        };
        let mut posts = self.cms.get_related_posts(&query).await?;
        posts.truncate(limit as usize);
        Ok(posts)
    }

    pub async fn try_fetch_comments(&self, slug: &str) -> Result<Vec<Comment>, CmsError> {
        let query = CommentsQuery {
            slug: slug.to_string(),
            page: None,
            limit: Limit::All,
        };
        self.cms.get_comments(&query).await
    }
}

fn or_empty<T>(result: Result<Vec<T>, CmsError>, what: &'static str) -> Vec<T> {
    match result {
        Ok(items) => {
            tracing::debug!(count = items.len(), "Fetched {}", what);
            items
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch {}, using empty fallback", what);
            Vec::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::macros::datetime;

    pub(crate) fn post(slug: &str, tags: &[&str]) -> Post {
        Post {
            id: format!("id-{slug}"),
            slug: slug.to_string(),
            title: format!("Title {slug}"),
            description: Some(format!("About {slug}")),
            content: "<p>Some words here</p>".to_string(),
            image: None,
            created_at: datetime!(2024-01-01 0:00 UTC),
            published_at: None,
            updated_at: None,
            author: None,
            tags: tags
                .iter()
                .map(|n| Tag {
                    id: format!("tag-{n}"),
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    /// Fake CMS: serves fixed content, optionally failing chosen operations
    #[derive(Default)]
    pub(crate) struct FakeCms {
        pub posts: Vec<Post>,
        pub tags: Vec<Tag>,
        pub comments: Vec<Comment>,
        pub fail_post: bool,
        pub fail_posts: bool,
        pub fail_tags: bool,
        pub fail_related: bool,
        pub fail_comments: bool,
        pub post_calls: AtomicUsize,
        pub last_posts_query: Mutex<Option<PostsQuery>>,
    }

    fn unavailable() -> CmsError {
        CmsError::Network("connection refused".to_string())
    }

    #[async_trait]
    impl CmsClient for FakeCms {
        async fn get_post(&self, slug: &str) -> Result<Option<Post>, CmsError> {
            self.post_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_post {
                return Err(unavailable());
            }
            Ok(self.posts.iter().find(|p| p.slug == slug).cloned())
        }

        async fn get_posts(&self, query: &PostsQuery) -> Result<Vec<Post>, CmsError> {
            *self.last_posts_query.lock().unwrap() = Some(query.clone());
            if self.fail_posts {
                return Err(unavailable());
            }
            // Ignores the tag filter on purpose
            Ok(self.posts.clone())
        }

        async fn get_tags(&self, _page: u32, _limit: Limit) -> Result<Vec<Tag>, CmsError> {
            if self.fail_tags {
                return Err(unavailable());
            }
            Ok(self.tags.clone())
        }

        async fn get_related_posts(
            &self,
            query: &RelatedPostsQuery,
        ) -> Result<Vec<Post>, CmsError> {
            if self.fail_related {
                return Err(unavailable());
            }
            Ok(self
                .posts
                .iter()
                .filter(|p| p.slug != query.slug)
                .cloned()
                .collect())
        }

        async fn get_comments(&self, query: &CommentsQuery) -> Result<Vec<Comment>, CmsError> {
            if self.fail_comments {
                return Err(unavailable());
            }
            Ok(self
                .comments
                .iter()
                .filter(|_| self.posts.iter().any(|p| p.slug == query.slug))
                .cloned()
                .collect())
        }
    }

    fn fetcher(cms: FakeCms) -> ContentFetcher<FakeCms> {
        ContentFetcher::new(Arc::new(cms))
    }

    #[tokio::test]
    async fn test_fetch_post_found() {
        let f = fetcher(FakeCms {
            posts: vec![post("hello", &[])],
            ..Default::default()
        });
        assert_eq!(f.fetch_post("hello").await.unwrap().slug, "hello");
    }

    #[tokio::test]
    async fn test_fetch_post_unknown_slug_is_none() {
        let f = fetcher(FakeCms {
            posts: vec![post("hello", &[])],
            ..Default::default()
        });
        assert!(f.fetch_post("missing").await.is_none());
        assert!(matches!(f.try_fetch_post("missing").await, Ok(None)));
    }

    #[tokio::test]
    async fn test_fetch_post_failure_is_none() {
        let f = fetcher(FakeCms {
            posts: vec![post("hello", &[])],
            fail_post: true,
            ..Default::default()
        });
        assert!(f.fetch_post("hello").await.is_none());
        assert!(f.try_fetch_post("hello").await.is_err());
    }

    #[tokio::test]
    async fn test_failures_collapse_to_empty_lists() {
        let f = fetcher(FakeCms {
            posts: vec![post("a", &["rust"])],
            tags: vec![Tag {
                id: "1".to_string(),
                name: "rust".to_string(),
            }],
            fail_posts: true,
            fail_tags: true,
            fail_related: true,
            fail_comments: true,
            ..Default::default()
        });

        assert!(f.fetch_posts(&TagFilter::default()).await.is_empty());
        assert!(f.fetch_tags().await.is_empty());
        assert!(f.fetch_related_posts("a", 3).await.is_empty());
        assert!(f.fetch_comments("a").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_posts_applies_filter_locally() {
        let f = fetcher(FakeCms {
            posts: vec![
                post("a", &["rust"]),
                post("b", &["go"]),
                post("c", &["rust", "web"]),
                post("d", &[]),
            ],
            ..Default::default()
        });

        let slugs: Vec<_> = f
            .fetch_posts(&TagFilter::parse("rust,web"))
            .await
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["a", "c"]);

        let all = f.fetch_posts(&TagFilter::default()).await;
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_posts_preserves_cms_order() {
        let f = fetcher(FakeCms {
            posts: vec![post("z", &[]), post("a", &[]), post("m", &[])],
            ..Default::default()
        });
        let slugs: Vec<_> = f
            .fetch_all_posts()
            .await
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["z", "a", "m"]);
    }

    #[tokio::test]
    async fn test_fetch_posts_sends_unbounded_query_with_filter() {
        let cms = Arc::new(FakeCms::default());
        let f = ContentFetcher::new(Arc::clone(&cms));
        f.fetch_posts(&TagFilter::parse("rust")).await;

        let query = cms.last_posts_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.limit, Limit::All);
        assert_eq!(query.tags, TagFilter::parse("rust"));
    }

    #[tokio::test]
    async fn test_related_posts_are_bounded() {
        let f = fetcher(FakeCms {
            posts: (0..6).map(|i| post(&format!("p{i}"), &[])).collect(),
            ..Default::default()
        });
        assert_eq!(f.fetch_related_posts("p0", 3).await.len(), 3);
    }
}
