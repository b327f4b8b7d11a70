//! Askama templates for blog pages and the sitemap

use askama::Template;
use folio_domain::policy::reading_time_label;
use folio_domain::usecases::pages::{filter_path, post_path};
use folio_domain::usecases::{DetailPage, ListPage, ListState, Page};
use folio_domain::{Comment, PageTemplate, Post, SitemapEntry, TagFilter, TemplateError};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Renders pages with the bundled Askama templates
#[derive(Debug, Clone)]
pub struct AskamaPages {
    site_title: String,
}

impl AskamaPages {
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
        }
    }
}

impl Default for AskamaPages {
    fn default() -> Self {
        Self::new("Blog")
    }
}

struct TagLink<'a> {
    name: &'a str,
    href: String,
    selected: bool,
}

struct PostCard<'a> {
    title: &'a str,
    href: String,
    description: Option<&'a str>,
    image: Option<&'a str>,
    date: String,
    tags: Vec<TagLink<'a>>,
}

impl<'a> PostCard<'a> {
    fn new(post: &'a Post) -> Self {
        Self {
            title: &post.title,
            href: post_path(&post.slug),
            description: post.description.as_deref(),
            image: post.image.as_deref(),
            date: format_date(post.display_date()),
            tags: post
                .tags
                .iter()
                .map(|t| TagLink {
                    name: &t.name,
                    href: filter_path(&TagFilter::new([t.name.as_str()])),
                    selected: false,
                })
                .collect(),
        }
    }
}

struct CommentView<'a> {
    author: &'a str,
    url: Option<&'a str>,
    content: &'a str,
    date: String,
    is_reply: bool,
}

impl<'a> CommentView<'a> {
    fn new(comment: &'a Comment) -> Self {
        Self {
            author: &comment.author,
            url: comment.url.as_deref(),
            content: &comment.content,
            date: format_date(comment.created_at),
            is_reply: comment.parent_id.is_some(),
        }
    }
}

#[derive(Template)]
#[template(path = "blog_list.html")]
struct ListTemplate<'a> {
    site_title: &'a str,
    title: String,
    chips: Vec<TagLink<'a>>,
    selected: String,
    cards: Vec<PostCard<'a>>,
    empty_heading: &'static str,
    empty_message: &'static str,
}

#[derive(Template)]
#[template(path = "blog_post.html")]
struct DetailTemplate<'a> {
    site_title: &'a str,
    title: &'a str,
    description: Option<&'a str>,
    image: Option<&'a str>,
    author_name: &'a str,
    author_image: Option<&'a str>,
    date: String,
    reading_time: String,
    tags: Vec<TagLink<'a>>,
    content: &'a str,
    related: Vec<PostCard<'a>>,
    comments_enabled: bool,
    comments: Vec<CommentView<'a>>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate<'a> {
    site_title: &'a str,
    title: &'static str,
    slug: &'a str,
}

struct SitemapUrl<'a> {
    loc: &'a str,
    lastmod: String,
    changefreq: &'static str,
    priority: String,
}

#[derive(Template)]
#[template(path = "sitemap.xml")]
struct SitemapTemplate<'a> {
    urls: Vec<SitemapUrl<'a>>,
}

impl AskamaPages {
    fn render_list(&self, page: &ListPage) -> askama::Result<String> {
        let (empty_heading, empty_message) = match page.state() {
            ListState::NoMatches => (
                "No posts found",
                "Try adjusting your filters to find more posts.",
            ),
            _ => ("No posts yet", "Check back soon for new content."),
        };

        ListTemplate {
            site_title: &self.site_title,
            title: "Blog".to_string(),
            chips: page
                .chips
                .iter()
                .map(|c| TagLink {
                    name: &c.tag.name,
                    href: c.href.clone(),
                    selected: c.selected,
                })
                .collect(),
            selected: page.filter.names().join(", "),
            cards: page.posts.iter().map(PostCard::new).collect(),
            empty_heading,
            empty_message,
        }
        .render()
    }

    fn render_detail(&self, page: &DetailPage) -> askama::Result<String> {
        let post = &page.post;
        let author = post.author.as_ref();

        DetailTemplate {
            site_title: &self.site_title,
            title: &post.title,
            description: post.description.as_deref(),
            image: post.image.as_deref(),
            author_name: author
                .and_then(|a| a.name.as_deref())
                .unwrap_or("Anonymous"),
            author_image: author.and_then(|a| a.image.as_deref()),
            date: format_date(post.display_date()),
            reading_time: reading_time_label(page.reading_time_minutes),
            tags: PostCard::new(post).tags,
            content: &post.content,
            related: page.related.iter().map(PostCard::new).collect(),
            comments_enabled: page.comments_enabled,
            comments: page.comments.iter().map(CommentView::new).collect(),
        }
        .render()
    }
}

impl PageTemplate for AskamaPages {
    fn render_page(&self, page: &Page) -> Result<String, TemplateError> {
        let rendered = match page {
            Page::List(list) => self.render_list(list),
            Page::Detail(detail) => self.render_detail(detail),
            Page::NotFound { slug } => NotFoundTemplate {
                site_title: &self.site_title,
                title: "Post Not Found",
                slug,
            }
            .render(),
        };
        rendered.map_err(|e| TemplateError::Render(e.to_string()))
    }

    fn render_sitemap(&self, entries: &[SitemapEntry]) -> Result<String, TemplateError> {
        SitemapTemplate {
            urls: entries
                .iter()
                .map(|e| SitemapUrl {
                    loc: &e.url,
                    lastmod: e
                        .last_modified
                        .format(&Rfc3339)
                        .unwrap_or_else(|_| e.last_modified.date().to_string()),
                    changefreq: e.change_frequency.as_str(),
                    priority: format!("{:.1}", e.priority),
                })
                .collect(),
        }
        .render()
        .map_err(|e| TemplateError::Render(e.to_string()))
    }
}

/// Long US-style date, e.g. "March 14, 2024"
fn format_date(at: OffsetDateTime) -> String {
    let format = format_description!("[month repr:long] [day padding:none], [year]");
    at.format(&format).unwrap_or_else(|_| at.date().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::usecases::TagChip;
    use folio_domain::{ChangeFrequency, Tag};
    use time::macros::datetime;

    fn post(slug: &str, title: &str) -> Post {
        Post {
            id: format!("id-{slug}"),
            slug: slug.to_string(),
            title: title.to_string(),
            description: Some("A <short> description".to_string()),
            content: "<p>Body <em>text</em></p>".to_string(),
            image: None,
            created_at: datetime!(2024-03-14 12:00 UTC),
            published_at: None,
            updated_at: None,
            author: None,
            tags: vec![Tag {
                id: "t1".to_string(),
                name: "rust".to_string(),
            }],
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(datetime!(2024-03-04 12:00 UTC)), "March 4, 2024");
    }

    #[test]
    fn test_list_page_renders_cards_and_escapes() {
        let page = Page::List(ListPage {
            posts: vec![post("hello", "Hello & Welcome")],
            chips: vec![TagChip {
                tag: Tag {
                    id: "t1".to_string(),
                    name: "rust".to_string(),
                },
                selected: true,
                href: "/blog".to_string(),
            }],
            filter: TagFilter::parse("rust"),
        });

        let html = AskamaPages::new("My Blog").render_page(&page).unwrap();
        assert!(html.contains("Hello &amp; Welcome"));
        assert!(html.contains("href=\"/blog/hello\""));
        assert!(html.contains("A &lt;short&gt; description"));
        assert!(html.contains("Showing posts tagged with"));
        assert!(html.contains("March 14, 2024"));
        assert!(!html.contains("No posts"));
    }

    #[test]
    fn test_empty_states_differ() {
        let templates = AskamaPages::default();
        let empty = templates
            .render_page(&Page::List(ListPage {
                posts: vec![],
                chips: vec![],
                filter: TagFilter::default(),
            }))
            .unwrap();
        assert!(empty.contains("No posts yet"));

        let no_matches = templates
            .render_page(&Page::List(ListPage {
                posts: vec![],
                chips: vec![],
                filter: TagFilter::parse("go"),
            }))
            .unwrap();
        assert!(no_matches.contains("No posts found"));
    }

    #[test]
    fn test_detail_page_renders_content_unescaped() {
        let page = Page::Detail(DetailPage {
            post: post("hello", "Hello"),
            reading_time_minutes: 1,
            related: vec![],
            comments: vec![],
            comments_enabled: false,
        });

        let html = AskamaPages::default().render_page(&page).unwrap();
        assert!(html.contains("<p>Body <em>text</em></p>"));
        assert!(html.contains("1 min read"));
        assert!(html.contains("Anonymous"));
        assert!(!html.contains("Related Posts"));
        assert!(!html.contains("Comments"));
    }

    #[test]
    fn test_detail_page_related_block_when_present() {
        let page = Page::Detail(DetailPage {
            post: post("hello", "Hello"),
            reading_time_minutes: 0,
            related: vec![post("other", "Other Post")],
            comments: vec![Comment {
                id: "c1".to_string(),
                author: "Grace".to_string(),
                content: "<script>alert(1)</script>".to_string(),
                url: None,
                created_at: datetime!(2024-03-15 9:00 UTC),
                parent_id: None,
            }],
            comments_enabled: true,
        });

        let html = AskamaPages::default().render_page(&page).unwrap();
        assert!(html.contains("Related Posts"));
        assert!(html.contains("href=\"/blog/other\""));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt; 1 min read"));
    }

    #[test]
    fn test_not_found_page() {
        let html = AskamaPages::default()
            .render_page(&Page::NotFound {
                slug: "missing".to_string(),
            })
            .unwrap();
        assert!(html.contains("Post Not Found"));
        assert!(html.contains("Browse all posts"));
    }

    #[test]
    fn test_sitemap_xml() {
        let entries = vec![SitemapEntry {
            url: "https://example.com/blog?a=1&b=2".to_string(),
            last_modified: datetime!(2024-06-01 8:00 UTC),
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.8,
        }];

        let xml = AskamaPages::default().render_sitemap(&entries).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://example.com/blog?a=1&amp;b=2</loc>"));
        assert!(xml.contains("<lastmod>2024-06-01T08:00:00Z</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
    }
}
