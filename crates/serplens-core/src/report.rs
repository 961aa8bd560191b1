//! Single-page SEO report

use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};
use serde::Serialize;

use crate::keywords::{DEFAULT_TOP_N, KeywordFrequency, extract_keywords};

/// Value reported for a missing or empty title / meta description.
pub const NOT_FOUND: &str = "Not Found";

/// Elements whose text never counts as visible page text.
const HIDDEN_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("invalid title selector"));
static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[name][content]").expect("invalid meta selector"));

/// On-page signals for one fetched URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub url: String,
    pub http_status: u16,
    pub title: String,
    pub meta_description: String,
    pub word_count: usize,
    pub top_keywords: KeywordFrequency,
}

impl PageReport {
    /// Build a report from an already parsed document.
    pub fn from_document(url: &str, document: &Html, http_status: u16) -> Self {
        let text = visible_text(document);

        Self {
            url: url.to_string(),
            http_status,
            title: extract_title(document),
            meta_description: extract_meta_description(document),
            word_count: text.split_whitespace().count(),
            top_keywords: extract_keywords(&text, DEFAULT_TOP_N),
        }
    }

    /// Parse `html` and build its report.
    pub fn from_html(url: &str, html: &str, http_status: u16) -> Self {
        let document = Html::parse_document(html);
        Self::from_document(url, &document, http_status)
    }
}

fn or_not_found(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Text of the first `<title>`, trimmed.
pub fn extract_title(document: &Html) -> String {
    or_not_found(
        document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|title| title.text().collect::<String>().trim().to_string()),
    )
}

/// `content` of the first `<meta name="description">`, trimmed.
pub fn extract_meta_description(document: &Html) -> String {
    or_not_found(
        document
            .select(&META_SELECTOR)
            .find(|meta| {
                meta.value()
                    .attr("name")
                    .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
            })
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| content.trim().to_string()),
    )
}

/// All text nodes outside script-like elements, each trimmed, joined by single spaces.
pub fn visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}
