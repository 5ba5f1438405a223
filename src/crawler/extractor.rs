//! HTML content extraction
//!
//! Turns a page's HTML into a [`PageRecord`]: a title plus the visible body
//! text with scripts, styles, navigation landmarks, and known boilerplate
//! phrases removed.

use crate::crawler::record::PageRecord;
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;

/// Content used when nothing survives cleaning
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "No content could be extracted";

/// Elements whose subtrees never contribute text
const REMOVED_SELECTORS: &[&str] = &[
    "script",
    "style",
    "nav",
    r#"header[role="banner"]"#,
    r#"footer[role="contentinfo"]"#,
    r#"[role="navigation"]"#,
    r#"[role="banner"]"#,
    r#"[role="contentinfo"]"#,
    ".skip-link",
    ".skip-to-content",
    "#skip-link",
    "#skip-to-content",
];

/// Navigation and legal boilerplate removed by literal substring match
const BOILERPLATE_PHRASES: &[&str] = &[
    "Skip to main content",
    "Skip to content",
    "Jump to navigation",
    "Contribute my reading data to research",
    "Help Improve arXiv",
    "arXiv is working with academic researchers",
    "By clicking 'I agree' below, you consent",
    "Reading data will never be shared publicly",
    "We gratefully acknowledge support from",
    "the Simons Foundation, member institutions , and all contributors. Donate",
    "cs.HC Help | open search GO open navigation menu",
    "Login Help Pages About",
    "Advanced Search All fields",
    "open search GO open navigation menu quick links",
    "I Agree Opt Out Close",
    "Status Login Help",
    "Title Author Abstract Comments Journal reference",
    "ACM classification MSC classification Report number",
    "arXiv identifier DOI ORCID arXiv author ID Help pages Full text Search",
];

/// Extracts page records from HTML
///
/// Selectors are compiled once; build one extractor per crawl and reuse it.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    removed: Vec<Selector>,
    title: Option<Selector>,
    heading: Option<Selector>,
    body: Option<Selector>,
    phrases: Vec<String>,
}

impl ContentExtractor {
    /// Creates an extractor that strips the built-in boilerplate plus `extra_phrases`
    pub fn new(extra_phrases: &[String]) -> Self {
        let removed = REMOVED_SELECTORS
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .collect();

        let phrases = BOILERPLATE_PHRASES
            .iter()
            .map(|p| p.to_string())
            .chain(extra_phrases.iter().cloned())
            .collect();

        Self {
            removed,
            title: Selector::parse("title").ok(),
            heading: Selector::parse("h1").ok(),
            body: Selector::parse("body").ok(),
            phrases,
        }
    }

    /// Builds the record for a page
    ///
    /// # Title Resolution
    ///
    /// 1. Text of the first `<title>` element, if the document has one
    /// 2. Otherwise text of the first `<h1>`
    /// 3. Otherwise the empty string
    ///
    /// # Body Resolution
    ///
    /// Text nodes under `<body>` (or the whole document when there is no
    /// body), skipping removed subtrees, trimmed and joined with single
    /// spaces. Boilerplate phrases are then replaced and whitespace runs
    /// collapsed. Empty results become [`EMPTY_CONTENT_PLACEHOLDER`].
    ///
    /// # Example
    ///
    /// ```
    /// use sitescrape::crawler::ContentExtractor;
    ///
    /// let html = r#"<html><head><title>Hi</title></head>
    ///     <body><nav>Menu</nav><p>Hello   world</p></body></html>"#;
    /// let record = ContentExtractor::default().extract(html, "https://a.test/");
    /// assert_eq!(record.title(), "Hi");
    /// assert_eq!(record.content(), "Hello world");
    /// ```
    pub fn extract(&self, html: &str, url: &str) -> PageRecord {
        let document = Html::parse_document(html);

        let title = self.extract_title(&document);
        let text = self.visible_text(&document);
        let content = self.clean(&text);

        if content.is_empty() {
            tracing::debug!("No content extracted from {}", url);
            return PageRecord::new(url, title, EMPTY_CONTENT_PLACEHOLDER);
        }

        PageRecord::new(url, title, content)
    }

    fn extract_title(&self, document: &Html) -> String {
        first_match(document, &self.title)
            .or_else(|| first_match(document, &self.heading))
            .map(|e| e.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    fn visible_text(&self, document: &Html) -> String {
        let excluded = self.excluded_nodes(document);
        let root = first_match(document, &self.body).unwrap_or_else(|| document.root_element());

        let mut pieces = Vec::new();
        self.collect_text(*root, &excluded, &mut pieces);
        pieces.join(" ")
    }

    fn excluded_nodes(&self, document: &Html) -> HashSet<NodeId> {
        self.removed
            .iter()
            .flat_map(|selector| document.select(selector))
            .map(|element| element.id())
            .collect()
    }

    fn collect_text(
        &self,
        node: NodeRef<'_, Node>,
        excluded: &HashSet<NodeId>,
        pieces: &mut Vec<String>,
    ) {
        for child in node.children() {
            if excluded.contains(&child.id()) {
                continue;
            }

            match child.value() {
                Node::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        pieces.push(trimmed.to_string());
                    }
                }
                // Parsed with scripting on, so the contents are one raw markup string
                Node::Element(element) if element.name() == "noscript" => {
                    let markup: String = child
                        .children()
                        .filter_map(|c| c.value().as_text())
                        .map(|t| &**t)
                        .collect();
                    self.collect_fragment_text(&markup, pieces);
                }
                Node::Element(_) => self.collect_text(child, excluded, pieces),
                _ => {}
            }
        }
    }

    fn collect_fragment_text(&self, markup: &str, pieces: &mut Vec<String>) {
        let fragment = Html::parse_fragment(markup);
        let excluded = self.excluded_nodes(&fragment);
        self.collect_text(*fragment.root_element(), &excluded, pieces);
    }

    fn clean(&self, text: &str) -> String {
        let mut content = text.to_string();
        for phrase in &self.phrases {
            if content.contains(phrase.as_str()) {
                content = content.replace(phrase.as_str(), " ");
            }
        }
        content.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(&[])
    }
}

/// Extracts a record using only the built-in boilerplate list
pub fn extract_content(html: &str, url: &str) -> PageRecord {
    ContentExtractor::default().extract(html, url)
}

fn first_match<'a>(document: &'a Html, selector: &Option<Selector>) -> Option<ElementRef<'a>> {
    selector.as_ref().and_then(|s| document.select(s).next())
}
