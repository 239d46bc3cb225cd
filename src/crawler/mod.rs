//! Crawler module: fetching, pagination walking, and crawl orchestration
//!
//! This module contains the crawl pipeline:
//! - [`PageFetcher`] issues one GET per filter+page through the session
//! - [`ResultsPage`] interprets a fetched document's pagination state
//! - [`CrawlSession`] drives page transitions into one lazy item stream

mod crawl;
mod fetcher;
mod walker;

pub use crawl::{CrawlSession, CrawlState};
pub use fetcher::PageFetcher;
pub use walker::ResultsPage;

use crate::config::Config;
use crate::filter::SearchFilter;
use crate::session::{Credentials, FileSessionStore, SessionCache};
use crate::Result;

/// Builds a ready-to-run crawl session from a filter and configuration.
///
/// Credentials are attached to the session only when the filter's
/// resolved purity requires them; an anonymous crawl never logs in.
pub fn build_crawl(
    filter: SearchFilter,
    config: &Config,
    credentials: Option<Credentials>,
) -> Result<CrawlSession> {
    let credentials = if filter.credentials_required() {
        credentials
    } else {
        None
    };

    let store = FileSessionStore::new(&config.session.file_path);
    let session = SessionCache::new(
        &config.site.base_url,
        &config.user_agent.full_value(),
        credentials,
        Box::new(store),
    )?;
    let fetcher = PageFetcher::new(session, &config.site.base_url);
    Ok(CrawlSession::new(filter, fetcher))
}
