//! Wisp CMS adapter for reading posts, tags and comments

use async_trait::async_trait;
use folio_domain::{
    CmsClient, CmsError, Comment, CommentsQuery, Limit, Post, PostsQuery, RelatedPostsQuery, Tag,
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Public Wisp API host
pub const DEFAULT_BASE_URL: &str = "https://www.wisp.blog";

/// Wisp API client bound to one blog
pub struct WispClient {
    client: Client,
    base_url: Url,
    blog_id: String,
}

impl WispClient {
    pub fn new(blog_id: &str) -> Result<Self, CmsError> {
        Self::with_base_url(DEFAULT_BASE_URL, blog_id, Duration::from_secs(30))
    }

    pub fn with_base_url(
        base_url: &str,
        blog_id: &str,
        timeout: Duration,
    ) -> Result<Self, CmsError> {
        if blog_id.trim().is_empty() {
            return Err(CmsError::Config("blog id is empty".to_string()));
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| CmsError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(CmsError::Config(format!(
                "Base URL cannot hold a path: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CmsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            blog_id: blog_id.trim().to_string(),
        })
    }

    pub fn blog_id(&self) -> &str {
        &self.blog_id
    }

    /// `{base}/api/v1/{blog_id}/{segments...}`, each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, CmsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CmsError::Config("Base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(["api", "v1", self.blog_id.as_str()])
            .extend(segments);
        Ok(url)
    }

    async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Response, CmsError> {
        let url = self.url(segments)?;
        tracing::debug!(url = %url, "Wisp request");

        self.client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| CmsError::Network(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CmsError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CmsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CmsError::Decode(e.to_string()))
    }
}

#[derive(Deserialize)]
struct PostEnvelope {
    post: Option<Post>,
}

#[derive(Deserialize)]
struct PostsEnvelope {
    posts: Vec<Post>,
}

#[derive(Deserialize)]
struct TagsEnvelope {
    tags: Vec<Tag>,
}

#[derive(Deserialize)]
struct CommentsEnvelope {
    comments: Vec<Comment>,
}

#[async_trait]
impl CmsClient for WispClient {
    async fn get_post(&self, slug: &str) -> Result<Option<Post>, CmsError> {
        let response = self.get(&["posts", slug], &[]).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let envelope: PostEnvelope = Self::decode(response).await?;
        Ok(envelope.post)
    }

    async fn get_posts(&self, query: &PostsQuery) -> Result<Vec<Post>, CmsError> {
        let mut params = vec![("limit", query.limit.as_query_value())];
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        for tag in query.tags.names() {
            params.push(("tags", tag.clone()));
        }

        let response = self.get(&["posts"], &params).await?;
        let envelope: PostsEnvelope = Self::decode(response).await?;

        tracing::debug!(count = envelope.posts.len(), "Fetched posts from Wisp");
        Ok(envelope.posts)
    }

    async fn get_tags(&self, page: u32, limit: Limit) -> Result<Vec<Tag>, CmsError> {
        let params = [
            ("page", page.to_string()),
            ("limit", limit.as_query_value()),
        ];

        let response = self.get(&["tags"], &params).await?;
        let envelope: TagsEnvelope = Self::decode(response).await?;
        Ok(envelope.tags)
    }

    async fn get_related_posts(&self, query: &RelatedPostsQuery) -> Result<Vec<Post>, CmsError> {
        let params = [("limit", query.limit.to_string())];

        let response = self
            .get(&["posts", query.slug.as_str(), "related"], &params)
            .await?;
        let envelope: PostsEnvelope = Self::decode(response).await?;
        Ok(envelope.posts)
    }

    async fn get_comments(&self, query: &CommentsQuery) -> Result<Vec<Comment>, CmsError> {
        let mut params = vec![
            ("slug", query.slug.clone()),
            ("limit", query.limit.as_query_value()),
        ];
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }

        let response = self.get(&["comments"], &params).await?;
        let envelope: CommentsEnvelope = Self::decode(response).await?;
        Ok(envelope.comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::TagFilter;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn post_json(slug: &str) -> serde_json::Value {
        serde_json::json!({
            "id": format!("id-{}", slug),
            "slug": slug,
            "title": format!("Post {}", slug),
            "description": "A post",
            "content": "<p>Hello there</p>",
            "image": null,
            "createdAt": "2024-01-15T12:00:00Z",
            "publishedAt": "2024-01-16T12:00:00Z",
            "updatedAt": null,
            "author": { "name": "Ada", "image": null },
            "tags": [{ "id": "t1", "name": "rust" }]
        })
    }

    fn client(server: &MockServer) -> WispClient {
        WispClient::with_base_url(&server.uri(), "blog123", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_empty_blog_id_is_rejected() {
        assert!(matches!(
            WispClient::with_base_url(DEFAULT_BASE_URL, "  ", Duration::from_secs(5)),
            Err(CmsError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_get_post_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/posts/hello"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "post": post_json("hello") })),
            )
            .mount(&server)
            .await;

        let post = client(&server).get_post("hello").await.unwrap().unwrap();
        assert_eq!(post.slug, "hello");
        assert_eq!(post.tags[0].name, "rust");
        assert_eq!(post.author.unwrap().name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_get_post_null_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/posts/missing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "post": null })))
            .mount(&server)
            .await;

        assert!(client(&server).get_post("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_post_404_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/posts/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(client(&server).get_post("gone").await.unwrap().is_none());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            WispClient::with_base_url("not a url", "blog123", Duration::from_secs(5)),
            Err(CmsError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_slug_is_sent_as_one_escaped_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/posts/secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "post": post_json("secret") })),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        assert!(client.get_post("secret?x=1").await.unwrap().is_none());
        assert!(client.get_post("secret#top").await.unwrap().is_none());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.path(), "/api/v1/blog123/posts/secret%3Fx=1");
        assert_eq!(requests[0].url.query(), None);
        assert_eq!(requests[1].url.path(), "/api/v1/blog123/posts/secret%23top");
    }

    #[tokio::test]
    async fn test_related_slug_is_escaped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/posts/a%2Fb/related"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "posts": [post_json("other")]
            })))
            .mount(&server)
            .await;

        let query = RelatedPostsQuery {
            slug: "a/b".to_string(),
            limit: 3,
        };
        let posts = client(&server).get_related_posts(&query).await.unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[tokio::test]
    async fn test_get_posts_sends_limit_and_tags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/posts"))
            .and(query_param("limit", "all"))
            .and(query_param("tags", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "posts": [post_json("a"), post_json("b")],
                "pagination": { "page": 1, "limit": "all", "totalPages": 1, "totalPosts": 2 }
            })))
            .mount(&server)
            .await;

        let query = PostsQuery {
            limit: Limit::All,
            page: None,
            tags: TagFilter::parse("rust"),
        };
        let posts = client(&server).get_posts(&query).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].slug, "b");
    }

    #[tokio::test]
    async fn test_get_posts_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/posts"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let result = client(&server).get_posts(&PostsQuery::default()).await;
        assert!(matches!(result, Err(CmsError::Api { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_get_posts_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client(&server).get_posts(&PostsQuery::default()).await;
        assert!(matches!(result, Err(CmsError::Decode(_))));
    }

    #[tokio::test]
    async fn test_get_tags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/tags"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tags": [{ "id": "t1", "name": "rust" }, { "id": "t2", "name": "web" }]
            })))
            .mount(&server)
            .await;

        let tags = client(&server).get_tags(1, Limit::All).await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].name, "web");
    }

    #[tokio::test]
    async fn test_get_related_posts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/posts/hello/related"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "posts": [post_json("other")]
            })))
            .mount(&server)
            .await;

        let query = RelatedPostsQuery {
            slug: "hello".to_string(),
            limit: 3,
        };
        let posts = client(&server).get_related_posts(&query).await.unwrap();
        assert_eq!(posts[0].slug, "other");
    }

    #[tokio::test]
    async fn test_get_comments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/blog123/comments"))
            .and(query_param("slug", "hello"))
            .and(query_param("limit", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "comments": [{
                    "id": "c1",
                    "author": "Grace",
                    "content": "Nice post",
                    "url": null,
                    "createdAt": "2024-01-17T09:30:00Z",
                    "parentId": null
                }],
                "pagination": { "page": 1, "limit": "all" }
            })))
            .mount(&server)
            .await;

        let query = CommentsQuery {
            slug: "hello".to_string(),
            page: None,
            limit: Limit::All,
        };
        let comments = client(&server).get_comments(&query).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, "Grace");
    }

    #[tokio::test]
    async fn test_network_error() {
        let client =
            WispClient::with_base_url("http://127.0.0.1:1", "blog123", Duration::from_secs(2))
                .unwrap();
        let result = client.get_tags(1, Limit::All).await;
        assert!(matches!(result, Err(CmsError::Network(_))));
    }
}
