//! Stub CMS for testing and offline mode

use async_trait::async_trait;
use folio_domain::{
    Author, CmsClient, CmsError, Comment, CommentsQuery, Limit, Post, PostsQuery,
    RelatedPostsQuery, Tag,
};
use time::macros::datetime;

/// CMS operations a stub can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubOperation {
    GetPost,
    GetPosts,
    GetTags,
    GetRelatedPosts,
    GetComments,
}

/// Stub CMS serving in-memory content
#[derive(Debug, Clone, Default)]
pub struct StubCms {
    posts: Vec<Post>,
    tags: Vec<Tag>,
    comments: Vec<(String, Comment)>,
    failing: Vec<StubOperation>,
}

impl StubCms {
    /// A CMS with no content
    pub fn empty() -> Self {
        Self::default()
    }

    /// A CMS serving the given posts; tags are collected from them
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let mut tags: Vec<Tag> = Vec::new();
        for tag in posts.iter().flat_map(|p| p.tags.iter()) {
            if !tags.iter().any(|t| t.id == tag.id) {
                tags.push(tag.clone());
            }
        }
        Self {
            posts,
            tags,
            ..Default::default()
        }
    }

    /// A small blog with three posts, used by `cms.provider = "stub"`
    pub fn sample() -> Self {
        let rust = tag("t-rust", "rust");
        let web = tag("t-web", "web");
        let life = tag("t-life", "life");

        let posts = vec![
            Post {
                id: "p3".to_string(),
                slug: "async-rust-in-practice".to_string(),
                title: "Async Rust in Practice".to_string(),
                description: Some("Notes from shipping a tokio service".to_string()),
                content: "<p>Futures are lazy. Nothing happens until they are polled.</p>"
                    .to_string(),
                image: Some("https://images.example.com/async.png".to_string()),
                created_at: datetime!(2024-05-02 9:00 UTC),
                published_at: Some(datetime!(2024-05-03 9:00 UTC)),
                updated_at: Some(datetime!(2024-05-10 18:30 UTC)),
                author: Some(Author {
                    name: Some("Sample Author".to_string()),
                    image: None,
                }),
                tags: vec![rust.clone(), web.clone()],
            },
            Post {
                id: "p2".to_string(),
                slug: "static-sites-that-stay-fresh".to_string(),
                title: "Static Sites That Stay Fresh".to_string(),
                description: Some("Time-based regeneration explained".to_string()),
                content: "<p>Render once, serve many times, rebuild every hour.</p>".to_string(),
                image: None,
                created_at: datetime!(2024-03-14 12:00 UTC),
                published_at: Some(datetime!(2024-03-14 12:00 UTC)),
                updated_at: None,
                author: None,
                tags: vec![web],
            },
            Post {
                id: "p1".to_string(),
                slug: "hello-world".to_string(),
                title: "Hello World".to_string(),
                description: None,
                content: "<p>First post.</p>".to_string(),
                image: None,
                created_at: datetime!(2024-01-01 8:00 UTC),
                published_at: None,
                updated_at: None,
                author: None,
                tags: vec![life],
            },
        ];

        let mut stub = Self::with_posts(posts);
        stub.comments.push((
            "hello-world".to_string(),
            Comment {
                id: "c1".to_string(),
                author: "First Reader".to_string(),
                content: "Welcome to the internet!".to_string(),
                url: None,
                created_at: datetime!(2024-01-02 10:00 UTC),
                parent_id: None,
            },
        ));
        stub
    }

    /// Add a comment on the post with the given slug
    pub fn with_comment(mut self, slug: &str, comment: Comment) -> Self {
        self.comments.push((slug.to_string(), comment));
        self
    }

    /// Make an operation fail with a network error
    pub fn failing_on(mut self, operation: StubOperation) -> Self {
        self.failing.push(operation);
        self
    }

    fn check(&self, operation: StubOperation) -> Result<(), CmsError> {
        if self.failing.contains(&operation) {
            return Err(CmsError::Network(format!("stub failure: {:?}", operation)));
        }
        Ok(())
    }
}

fn tag(id: &str, name: &str) -> Tag {
    Tag {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn take<T>(items: Vec<T>, limit: Limit) -> Vec<T> {
    match limit {
        Limit::All => items,
        Limit::Count(n) => items.into_iter().take(n as usize).collect(),
    }
}

#[async_trait]
impl CmsClient for StubCms {
    async fn get_post(&self, slug: &str) -> Result<Option<Post>, CmsError> {
        self.check(StubOperation::GetPost)?;
        Ok(self.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn get_posts(&self, query: &PostsQuery) -> Result<Vec<Post>, CmsError> {
        self.check(StubOperation::GetPosts)?;
        let matching = self
            .posts
            .iter()
            .filter(|p| query.tags.matches(p))
            .cloned()
            .collect();
        Ok(take(matching, query.limit))
    }

    async fn get_tags(&self, _page: u32, limit: Limit) -> Result<Vec<Tag>, CmsError> {
        self.check(StubOperation::GetTags)?;
        Ok(take(self.tags.clone(), limit))
    }

    async fn get_related_posts(&self, query: &RelatedPostsQuery) -> Result<Vec<Post>, CmsError> {
        self.check(StubOperation::GetRelatedPosts)?;
        let Some(source) = self.posts.iter().find(|p| p.slug == query.slug) else {
            return Ok(vec![]);
        };

        // Posts sharing at least one tag with the source
        let related = self
            .posts
            .iter()
            .filter(|p| p.slug != source.slug)
            .filter(|p| p.tags.iter().any(|t| source.has_tag(&t.name)))
            .cloned()
            .collect();
        Ok(take(related, Limit::Count(query.limit)))
    }

    async fn get_comments(&self, query: &CommentsQuery) -> Result<Vec<Comment>, CmsError> {
        self.check(StubOperation::GetComments)?;
        let comments = self
            .comments
            .iter()
            .filter(|(slug, _)| *slug == query.slug)
            .map(|(_, c)| c.clone())
            .collect();
        Ok(take(comments, query.limit))
    }
}
