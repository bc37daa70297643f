//! News/blog content loader: fetches a JSON document of posts and falls back
//! to an embedded post when the source is unreachable, plus the lightweight
//! markdown-to-markup conversion used to render a post body.

use std::time::Duration;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{IntakeError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostImage {
    pub url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub credit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostSource {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub source: String,
}

/// One blog post. The fetched document is an array of these; the first
/// element is the latest post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsPost {
    pub id: String,
    pub date: String,
    pub title: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub images: Vec<PostImage>,
    #[serde(default)]
    pub sources: Vec<PostSource>,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetch-with-fallback loader for the news document.
pub struct NewsLoader {
    client: Client,
    url: String,
}

impl NewsLoader {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| IntakeError::Config(err.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Latest post: the first element of the fetched document, or the
    /// embedded fallback when the fetch fails in any way.
    pub fn latest(&self) -> NewsPost {
        match self.fetch() {
            Ok(mut posts) if !posts.is_empty() => posts.remove(0),
            Ok(_) => {
                warn!("news source returned an empty document, using embedded post");
                embedded_post()
            }
            Err(err) => {
                warn!(%err, "news fetch failed, using embedded post");
                embedded_post()
            }
        }
    }

    fn fetch(&self) -> Result<Vec<NewsPost>> {
        // Cache-bypass parameter, same trick the static host needs.
        let response = self
            .client
            .get(&self.url)
            .query(&[("t", Utc::now().timestamp_millis().to_string())])
            .send()
            .map_err(|err| IntakeError::Config(err.to_string()))?;
        if !response.status().is_success() {
            return Err(IntakeError::Config(format!(
                "news source returned HTTP {}",
                response.status()
            )));
        }
        response
            .json::<Vec<NewsPost>>()
            .map_err(|err| IntakeError::Config(err.to_string()))
    }
}

static BOLD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Converts a post body's lightweight markdown into HTML fragments:
/// `##`/`###` paragraphs become headings, `**bold**` and `[text](url)`
/// inline markup is rewritten, and remaining paragraphs are wrapped in `<p>`.
pub fn render_markup(content: &str) -> String {
    content
        .split("\n\n")
        .map(|paragraph| {
            let trimmed = paragraph.trim();
            if let Some(heading) = trimmed.strip_prefix("###") {
                format!("<h3>{}</h3>", heading.trim())
            } else if let Some(heading) = trimmed.strip_prefix("##") {
                format!("<h3>{}</h3>", heading.trim())
            } else if !trimmed.is_empty() {
                let with_bold = BOLD_PATTERN.replace_all(paragraph, "<strong>$1</strong>");
                let with_links = LINK_PATTERN.replace_all(&with_bold, r#"<a href="$2">$1</a>"#);
                format!("<p>{}</p>", with_links)
            } else {
                String::new()
            }
        })
        .collect()
}

/// Fallback post shipped with the binary so the news surface never renders
/// empty.
pub fn embedded_post() -> NewsPost {
    NewsPost {
        id: "embedded".into(),
        date: Utc::now().format("%B %-d, %Y").to_string(),
        title: "Canadian Immigration Weekly Update".into(),
        author: "The Advisory Team".into(),
        content: "Welcome to this week's Canadian immigration update, covering the \
developments most likely to affect your application.\n\n\
### Express Entry\n\n\
Immigration, Refugees and Citizenship Canada continues to run regular Express Entry \
draws, with recent rounds favouring candidates with French language proficiency and \
healthcare experience. Comprehensive Ranking System cut-offs have held steady.\n\n\
### Provincial Nominee Programs\n\n\
Several provinces refreshed their nomination streams this week, including expanded \
technology pathways and reduced score requirements for healthcare professionals. \
Provincial programs remain a strong route for candidates outside the federal draws.\n\n\
### What This Means for You\n\n\
Whether you are a skilled professional, a recent graduate, or an investor, there are \
multiple pathways available. A personalised assessment is the fastest way to find the \
one that fits your circumstances.".into(),
        images: vec![PostImage {
            url: "https://images.unsplash.com/photo-1503614472-8c93d56e92ce?w=1200&q=80".into(),
            caption: "Canadian Rockies".into(),
            credit: "Unsplash".into(),
        }],
        sources: vec![PostSource {
            title: "Express Entry Rounds of Invitations".into(),
            url: "https://www.canada.ca/en/immigration-refugees-citizenship/services/immigrate-canada/express-entry/rounds-invitations.html".into(),
            source: "IRCC".into(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_convert_to_h3() {
        assert_eq!(render_markup("### Express Entry"), "<h3>Express Entry</h3>");
        assert_eq!(render_markup("## Provincial News"), "<h3>Provincial News</h3>");
    }

    #[test]
    fn paragraphs_wrap_with_inline_markup() {
        let markup = render_markup("Draws favour **French speakers** this month.");
        assert_eq!(
            markup,
            "<p>Draws favour <strong>French speakers</strong> this month.</p>"
        );

        let markup = render_markup("See [the draw results](https://example.com/draws) for details.");
        assert_eq!(
            markup,
            r#"<p>See <a href="https://example.com/draws">the draw results</a> for details.</p>"#
        );
    }

    #[test]
    fn blank_paragraphs_are_dropped() {
        let markup = render_markup("First.\n\n\n\nSecond.");
        assert_eq!(markup, "<p>First.</p><p>Second.</p>");
    }

    #[test]
    fn mixed_document_renders_in_order() {
        let markup = render_markup("Intro paragraph.\n\n### Heading\n\nBody text.");
        assert_eq!(
            markup,
            "<p>Intro paragraph.</p><h3>Heading</h3><p>Body text.</p>"
        );
    }

    #[test]
    fn unreachable_source_falls_back_to_embedded_post() {
        let loader = NewsLoader::new("http://127.0.0.1:9/blog_posts.json").unwrap();
        let post = loader.latest();
        assert_eq!(post.id, "embedded");
        assert!(!post.content.is_empty());
        assert!(render_markup(&post.content).contains("<h3>Express Entry</h3>"));
    }

    #[test]
    fn posts_parse_from_wire_shape() {
        let raw = r####"[{
            "id": "2025-w23",
            "date": "June 2, 2025",
            "title": "Weekly Update",
            "author": "The Advisory Team",
            "content": "### Heading\n\nBody.",
            "images": [{"url": "https://example.com/a.jpg", "caption": "A", "credit": "B"}],
            "sources": [{"title": "IRCC", "url": "https://example.com", "source": "IRCC"}]
        }]"####;
        let posts: Vec<NewsPost> = serde_json::from_str(raw).unwrap();
        assert_eq!(posts[0].title, "Weekly Update");
        assert_eq!(posts[0].images.len(), 1);
    }

    #[test]
    fn optional_collections_default_to_empty() {
        let raw = r#"[{
            "id": "2025-w23",
            "date": "June 2, 2025",
            "title": "Weekly Update",
            "author": "The Advisory Team",
            "content": "Body."
        }]"#;
        let posts: Vec<NewsPost> = serde_json::from_str(raw).unwrap();
        assert!(posts[0].images.is_empty());
        assert!(posts[0].sources.is_empty());
    }
}
