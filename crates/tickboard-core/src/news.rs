//! Headline scraping.
//!
//! [`HeadlineSource`] is deliberately infallible: the news strip is the
//! least important dashboard section, so any scrape failure degrades to an
//! empty list with a warning rather than an error the caller must handle.
//! Extraction is a small tag scanner over the fetched markup; the target
//! element and class token are configuration, since the upstream page
//! changes its obfuscated class names from time to time.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::warn;

use crate::http_client::{HttpClient, HttpRequest};
use crate::NewsItem;

/// Which markup element carries a headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineSelector {
    pub element: String,
    pub class_name: String,
}

impl Default for HeadlineSelector {
    fn default() -> Self {
        Self {
            element: String::from("h3"),
            class_name: String::from("Mb(5px)"),
        }
    }
}

/// Scraper target configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    pub source_url: String,
    pub selector: HeadlineSelector,
    pub timeout_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            source_url: String::from("https://finance.yahoo.com/markets"),
            selector: HeadlineSelector::default(),
            timeout_ms: crate::http_client::DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Headline feed contract the dashboard depends on.
pub trait HeadlineSource: Send + Sync {
    /// Up to `limit` headlines in page order. Empty on any failure.
    fn top_headlines<'a>(
        &'a self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Vec<NewsItem>> + Send + 'a>>;
}

/// Production scraper over the configured markets page.
#[derive(Clone)]
pub struct NewsScraper {
    http: Arc<dyn HttpClient>,
    config: ScraperConfig,
}

impl NewsScraper {
    pub fn new(http: Arc<dyn HttpClient>, config: ScraperConfig) -> Self {
        Self { http, config }
    }

    async fn scrape(&self, limit: usize) -> Vec<NewsItem> {
        let request = HttpRequest::get(self.config.source_url.clone())
            .with_header("accept", "text/html")
            .with_timeout_ms(self.config.timeout_ms);

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("headline scrape failed: {e}");
                return Vec::new();
            }
        };

        if !response.is_success() {
            warn!(
                "headline scrape failed: {} returned status {}",
                self.config.source_url, response.status
            );
            return Vec::new();
        }

        let origin = page_origin(&self.config.source_url);
        let items = extract_headlines(&response.body, &self.config.selector, &origin, limit);
        if items.is_empty() {
            warn!(
                "headline scrape matched no <{} class~={}> elements",
                self.config.selector.element, self.config.selector.class_name
            );
        }
        items
    }
}

impl HeadlineSource for NewsScraper {
    fn top_headlines<'a>(
        &'a self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Vec<NewsItem>> + Send + 'a>> {
        Box::pin(async move { self.scrape(limit).await })
    }
}

/// Scheme-plus-host prefix used to absolutize relative links.
fn page_origin(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return String::new();
    };
    let host_start = scheme_end + 3;
    match url[host_start..].find('/') {
        Some(path_start) => url[..host_start + path_start].to_owned(),
        None => url.to_owned(),
    }
}

/// Scan the markup for matching elements and pull title text plus the first
/// contained link. Headlines with no link are kept with an empty link.
fn extract_headlines(
    html: &str,
    selector: &HeadlineSelector,
    origin: &str,
    limit: usize,
) -> Vec<NewsItem> {
    let open_prefix = format!("<{}", selector.element);
    let close_tag = format!("</{}>", selector.element);

    let mut items = Vec::new();
    let mut cursor = 0;

    while items.len() < limit {
        let Some(found) = html[cursor..].find(&open_prefix) else {
            break;
        };
        let tag_start = cursor + found;
        let Some(tag_close) = html[tag_start..].find('>') else {
            break;
        };
        let inner_start = tag_start + tag_close + 1;

        let open_tag = &html[tag_start..inner_start];
        cursor = inner_start;

        if !class_matches(open_tag, &selector.class_name) {
            continue;
        }

        let Some(inner_len) = html[inner_start..].find(&close_tag) else {
            break;
        };
        let inner = &html[inner_start..inner_start + inner_len];
        cursor = inner_start + inner_len + close_tag.len();

        let title = strip_tags(inner);
        if title.is_empty() {
            continue;
        }

        let link = first_href(inner)
            .map(|href| absolutize(href, origin))
            .unwrap_or_default();

        items.push(NewsItem { title, link });
    }

    items
}

/// Whole-token match against the tag's class attribute.
fn class_matches(open_tag: &str, class_name: &str) -> bool {
    let Some(value) = attribute_value(open_tag, "class") else {
        return false;
    };
    value.split_whitespace().any(|token| token == class_name)
}

fn first_href(inner: &str) -> Option<&str> {
    let anchor_start = inner.find("<a")?;
    let anchor_end = anchor_start + inner[anchor_start..].find('>')?;
    attribute_value(&inner[anchor_start..=anchor_end], "href")
}

/// Pull a quoted attribute value out of one raw tag.
fn attribute_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

fn absolutize(href: &str, origin: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_owned()
    } else if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        href.to_owned()
    }
}

/// Drop markup tags and collapse whitespace, leaving plain headline text.
fn strip_tags(inner: &str) -> String {
    let mut text = String::with_capacity(inner.len());
    let mut in_tag = false;

    for ch in inner.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
