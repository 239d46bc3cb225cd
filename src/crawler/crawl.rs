//! Crawl session: the paginated crawl state machine
//!
//! A [`CrawlSession`] flattens every result page matching a filter into
//! one lazy, finite item stream. Pages are fetched strictly on demand
//! and strictly in sequence; the caller drives progress by asking for
//! the next item.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::walker::ResultsPage;
use crate::filter::SearchFilter;
use crate::item::Item;
use crate::Result;
use std::collections::VecDeque;

/// Position of a crawl within its result pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// No page fetched yet.
    NotStarted,
    /// The most recently fetched page, as the document reported it.
    OnPage { current: u32, total: u32 },
    /// Terminal: the final page's items have been yielded and no
    /// further fetch will occur.
    Exhausted,
}

/// Lazy iterator over every item matching a filter, across all pages.
///
/// Loop control trusts the fetched document's own page bookkeeping: the
/// parsed current page number is authoritative even when it disagrees
/// with the page number that was requested, and the next fetch asks for
/// parsed-current plus one. The filter's `page` field is advanced in
/// lock-step purely for query-string correctness.
pub struct CrawlSession {
    filter: SearchFilter,
    fetcher: PageFetcher,
    state: CrawlState,
    pending: VecDeque<Item>,
}

impl CrawlSession {
    /// Creates a session that will begin at the filter's configured
    /// page (page 1 unless the caller chose a later starting point).
    pub fn new(filter: SearchFilter, fetcher: PageFetcher) -> Self {
        Self {
            filter,
            fetcher,
            state: CrawlState::NotStarted,
            pending: VecDeque::new(),
        }
    }

    /// Yields the next item, fetching the next page when the current
    /// one is drained. Returns `Ok(None)` once the crawl is exhausted;
    /// after that no further fetches occur.
    pub async fn next_item(&mut self) -> Result<Option<Item>> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Ok(Some(item));
            }

            match self.state {
                CrawlState::Exhausted => return Ok(None),
                CrawlState::NotStarted => {
                    let start = self.filter.page();
                    self.load_page(start).await?;
                }
                CrawlState::OnPage { current, total } => {
                    if current >= total {
                        self.state = CrawlState::Exhausted;
                        return Ok(None);
                    }
                    self.load_page(current + 1).await?;
                }
            }
        }
    }

    /// Collects items into a vector, stopping early at `limit` if one
    /// is given.
    pub async fn collect_items(&mut self, limit: Option<usize>) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await? {
            items.push(item);
            if limit.is_some_and(|limit| items.len() >= limit) {
                break;
            }
        }
        Ok(items)
    }

    /// The session's current position.
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// The filter driving this crawl.
    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    /// Fetches and interprets one page, queuing its items.
    async fn load_page(&mut self, requested: u32) -> Result<()> {
        self.filter.set_page(requested)?;
        let body = self.fetcher.fetch_page(&self.filter).await?;

        let page = ResultsPage::parse(&body);
        let current = page.current_page()?;
        let total = page.total_pages()?;
        if current != requested {
            // The site's numbering can skip; the document's own page
            // number wins from here on.
            tracing::warn!(
                "Requested page {requested} but document reports page {current}"
            );
            self.filter.set_page(current)?;
        }
        if current > total {
            // A crawl can start past the final page; such a document's
            // items are never yielded.
            tracing::info!("Page {current} is beyond the final page {total}; crawl ends");
            self.state = CrawlState::Exhausted;
            return Ok(());
        }
        tracing::info!("Yielding items from page {current}/{total}");

        self.pending.extend(page.items());
        self.state = CrawlState::OnPage { current, total };
        Ok(())
    }
}
