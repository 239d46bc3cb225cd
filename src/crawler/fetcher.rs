//! Page fetcher: one HTTP GET per filter+page
//!
//! Builds the search URL from the filter's canonical query parameters
//! and issues the request through the session cache, which normalizes
//! headers and triggers authentication lazily when the cache holds
//! credentials.

use crate::filter::SearchFilter;
use crate::session::SessionCache;
use crate::Result;

/// Fetches search-result pages for a filter through an authenticated
/// session.
pub struct PageFetcher {
    session: SessionCache,
    base_url: String,
}

impl PageFetcher {
    pub fn new(session: SessionCache, base_url: impl Into<String>) -> Self {
        Self {
            session,
            base_url: base_url.into(),
        }
    }

    /// Fetches the results page the filter currently points at and
    /// returns the raw document body.
    ///
    /// Non-2xx responses fail with an HTTP status error; network
    /// failures surface as transport errors. No retries here.
    pub async fn fetch_page(&mut self, filter: &SearchFilter) -> Result<String> {
        let url = filter.search_url(&self.base_url)?;
        tracing::debug!("Fetching {url}");
        let response = self.session.get(url.as_str()).await?;
        Ok(response.text().await?)
    }

    /// The session cache backing this fetcher.
    pub fn session_mut(&mut self) -> &mut SessionCache {
        &mut self.session
    }
}
