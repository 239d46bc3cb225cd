//! Pagination walker: interprets one fetched results document
//!
//! A [`ResultsPage`] wraps a parsed search-results document and exposes
//! the page bookkeeping the crawl loop relies on: the page's own idea of
//! its position, the total page count, the agreed "next page" target,
//! and the result items in document order.

use crate::item::Item;
use crate::{Result, WallgrabError};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

fn page_count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/ (\d+)").expect("valid page-count pattern"))
}

/// One fetched, parsed search-results document.
pub struct ResultsPage {
    document: Html,
}

impl ResultsPage {
    /// Parses raw markup into a results page. Parsing itself never
    /// fails; missing structural markers surface when queried.
    pub fn parse(body: &str) -> Self {
        Self {
            document: Html::parse_document(body),
        }
    }

    /// The page number the document reports for itself, from the
    /// pagination widget's current-page marker.
    ///
    /// This value is authoritative for crawl loop control, even when it
    /// disagrees with the page number that was requested.
    pub fn current_page(&self) -> Result<u32> {
        let marker = self
            .select_all("li.current")
            .into_iter()
            .next()
            .ok_or_else(|| {
                WallgrabError::Parse("document has no current-page marker".to_string())
            })?;
        marker.trim().parse().map_err(|_| {
            WallgrabError::Parse(format!("unparsable current-page marker: {marker:?}"))
        })
    }

    /// The total number of result pages, from the listing header's
    /// `... / <N>` summary.
    ///
    /// A document without exactly one such header is a single-page
    /// result set (total 1). A header that is present but does not
    /// match the expected pattern is a parse error, since continuing
    /// would risk silent mis-pagination.
    pub fn total_pages(&self) -> Result<u32> {
        let headers = self.select_all("header.thumb-listing-page-header");
        if headers.len() != 1 {
            return Ok(1);
        }
        let text = &headers[0];

        let total = page_count_pattern()
            .captures_iter(text)
            .last()
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| {
                WallgrabError::Parse(format!("no page count in listing header: {text:?}"))
            })?;
        total.as_str().parse().map_err(|_| {
            WallgrabError::Parse(format!("unparsable page count in listing header: {text:?}"))
        })
    }

    /// The URL of the next result page.
    ///
    /// Fails with [`WallgrabError::NoMorePages`] when the document has
    /// no "next" link (the expected terminal condition), and with
    /// [`WallgrabError::InconsistentPageLinks`] when several "next"
    /// links disagree on their target, since silently picking one would
    /// risk skipping or repeating results.
    pub fn next_page_url(&self) -> Result<String> {
        let selector = parse_selector(r#"a[rel="next"]"#)?;
        let targets: Vec<&str> = self
            .document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .collect();

        let first = *targets.first().ok_or(WallgrabError::NoMorePages)?;
        if targets.iter().any(|&href| href != first) {
            return Err(WallgrabError::InconsistentPageLinks);
        }
        Ok(first.to_string())
    }

    /// The page number of the next result page, parsed from the agreed
    /// next-page URL's `page` query parameter.
    pub fn next_page_number(&self) -> Result<u32> {
        let next_url = self.next_page_url()?;
        page_query_param(&next_url).ok_or_else(|| {
            WallgrabError::Parse(format!("next-page link has no page number: {next_url}"))
        })
    }

    /// The result items on this page, in document order.
    pub fn items(&self) -> Vec<Item> {
        let listing = match parse_selector("section.thumb-listing-page > ul > li") {
            Ok(selector) => selector,
            Err(_) => return Vec::new(),
        };
        let figure = match parse_selector("figure[data-wallpaper-id]") {
            Ok(selector) => selector,
            Err(_) => return Vec::new(),
        };

        self.document
            .select(&listing)
            .filter_map(|entry| {
                entry
                    .select(&figure)
                    .next()
                    .and_then(|f| f.value().attr("data-wallpaper-id"))
            })
            .map(Item::new)
            .collect()
    }

    /// Whether the document was served to a logged-in session: the NSFW
    /// search control is rendered and no register button is offered.
    pub fn is_authenticated(&self) -> bool {
        !self.select_all("input#search-nsfw").is_empty()
            && self.select_all("a.button.register").is_empty()
    }

    /// Text content of all elements matching `selector`.
    fn select_all(&self, selector: &str) -> Vec<String> {
        match parse_selector(selector) {
            Ok(selector) => self
                .document
                .select(&selector)
                .map(|element| element.text().collect::<String>())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| WallgrabError::Parse(e.to_string()))
}

/// Reads the `page` query parameter out of an absolute or relative URL.
fn page_query_param(url: &str) -> Option<u32> {
    let query = url.split_once('?')?.1;
    let query = query.split_once('#').map_or(query, |(q, _)| q);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
