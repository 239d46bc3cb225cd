//! Search filter: validated criteria and their query-string encoding
//!
//! A [`SearchFilter`] holds the search criteria for one crawl. Every
//! enumerable field is validated against the site's fixed allow-list at
//! the point of assignment, never at fetch time. Category and purity
//! flags follow a derived-default rule that distinguishes "nothing
//! chosen" from "everything chosen":
//!
//! - if no category flag is explicitly set, all three resolve to true;
//! - if no purity flag is set, only `sfw` resolves to true.

mod options;
mod query;

pub use options::{
    dimensions_token, parse_dimensions, ResolutionMode, SortKey, SortOrder, TimeRange, RATIOS,
    RESOLUTIONS,
};

use crate::{Result, WallgrabError};

/// Validated search criteria for one crawl.
///
/// Construct with [`SearchFilter::new`] or parse an existing search URL
/// with [`SearchFilter::from_reference`]. The `page` field is advanced
/// by the crawl session once per page transition; callers set it only to
/// choose the starting page.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    // Stored flags: false means "not chosen", not "excluded". The
    // resolved values come from the accessor methods below.
    general: bool,
    anime: bool,
    people: bool,
    sfw: bool,
    sketchy: bool,
    nsfw: bool,

    resolutions: Vec<(u32, u32)>,
    resolution_mode: ResolutionMode,
    ratios: Vec<(u32, u32)>,
    sorting: SortKey,
    order: SortOrder,
    top_range: TimeRange,
    query: String,
    page: u32,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            general: false,
            anime: false,
            people: false,
            sfw: false,
            sketchy: false,
            nsfw: false,
            resolutions: Vec::new(),
            resolution_mode: ResolutionMode::AtLeast,
            ratios: Vec::new(),
            sorting: SortKey::Toplist,
            order: SortOrder::Descending,
            top_range: TimeRange::OneMonth,
            query: String::new(),
            page: 1,
        }
    }
}

impl SearchFilter {
    /// Creates a filter with nothing chosen: all categories resolve
    /// true, purity resolves to safe-only, toplist of the last month.
    pub fn new() -> Self {
        Self::default()
    }

    fn any_category_set(&self) -> bool {
        self.general || self.anime || self.people
    }

    fn any_purity_set(&self) -> bool {
        self.sfw || self.sketchy || self.nsfw
    }

    /// Resolved "general" category flag (true when nothing is chosen).
    pub fn general(&self) -> bool {
        if self.any_category_set() {
            self.general
        } else {
            true
        }
    }

    /// Resolved "anime" category flag (true when nothing is chosen).
    pub fn anime(&self) -> bool {
        if self.any_category_set() {
            self.anime
        } else {
            true
        }
    }

    /// Resolved "people" category flag (true when nothing is chosen).
    pub fn people(&self) -> bool {
        if self.any_category_set() {
            self.people
        } else {
            true
        }
    }

    /// Resolved "safe" purity flag (true when nothing is chosen).
    pub fn sfw(&self) -> bool {
        if self.any_purity_set() {
            self.sfw
        } else {
            true
        }
    }

    /// Resolved "sketchy" purity flag (false when nothing is chosen).
    pub fn sketchy(&self) -> bool {
        self.sketchy
    }

    /// Resolved "explicit" purity flag (false when nothing is chosen).
    pub fn nsfw(&self) -> bool {
        self.nsfw
    }

    pub fn set_general(&mut self, value: bool) {
        self.general = value;
    }

    pub fn set_anime(&mut self, value: bool) {
        self.anime = value;
    }

    pub fn set_people(&mut self, value: bool) {
        self.people = value;
    }

    pub fn set_sfw(&mut self, value: bool) {
        self.sfw = value;
    }

    pub fn set_sketchy(&mut self, value: bool) {
        self.sketchy = value;
    }

    pub fn set_nsfw(&mut self, value: bool) {
        self.nsfw = value;
    }

    /// The resolved category triple encoded as the site expects it,
    /// e.g. `111` or `101`.
    pub fn categories(&self) -> String {
        flags_to_string([self.general(), self.anime(), self.people()])
    }

    /// The resolved purity triple encoded as the site expects it.
    pub fn purity(&self) -> String {
        flags_to_string([self.sfw(), self.sketchy(), self.nsfw()])
    }

    /// Adds a resolution to the list, keeping it deduplicated and
    /// sorted ascending so that at-least mode deterministically picks
    /// the smallest entry.
    pub fn add_resolution(&mut self, resolution: (u32, u32)) -> Result<()> {
        if !RESOLUTIONS.contains(&resolution) {
            return Err(invalid_pair("resolutions", resolution, &RESOLUTIONS));
        }
        if !self.resolutions.contains(&resolution) {
            self.resolutions.push(resolution);
            self.resolutions.sort_unstable();
        }
        Ok(())
    }

    /// Adds an aspect ratio to the list, deduplicated and sorted.
    pub fn add_ratio(&mut self, ratio: (u32, u32)) -> Result<()> {
        if !RATIOS.contains(&ratio) {
            return Err(invalid_pair("ratios", ratio, &RATIOS));
        }
        if !self.ratios.contains(&ratio) {
            self.ratios.push(ratio);
            self.ratios.sort_unstable();
        }
        Ok(())
    }

    pub fn resolutions(&self) -> &[(u32, u32)] {
        &self.resolutions
    }

    pub fn ratios(&self) -> &[(u32, u32)] {
        &self.ratios
    }

    pub fn resolution_mode(&self) -> ResolutionMode {
        self.resolution_mode
    }

    pub fn set_resolution_mode(&mut self, mode: ResolutionMode) {
        self.resolution_mode = mode;
    }

    pub fn sorting(&self) -> SortKey {
        self.sorting
    }

    pub fn set_sorting(&mut self, sorting: SortKey) {
        self.sorting = sorting;
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    pub fn top_range(&self) -> TimeRange {
        self.top_range
    }

    pub fn set_top_range(&mut self, range: TimeRange) {
        self.top_range = range;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Sets the page number for the next fetch. Must be at least 1.
    pub fn set_page(&mut self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(WallgrabError::InvalidFilterValue {
                field: "page",
                value: "0".to_string(),
                allowed: "integers >= 1".to_string(),
            });
        }
        self.page = page;
        Ok(())
    }

    /// True iff the resolved explicit purity flag is set. Explicit
    /// results are only served to a logged-in session.
    pub fn credentials_required(&self) -> bool {
        self.nsfw()
    }
}

/// Encodes a flag triple as the site's 3-character binary string.
pub(crate) fn flags_to_string(flags: [bool; 3]) -> String {
    flags.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

fn invalid_pair(
    field: &'static str,
    value: (u32, u32),
    allowed: &[(u32, u32)],
) -> WallgrabError {
    WallgrabError::InvalidFilterValue {
        field,
        value: dimensions_token(value),
        allowed: allowed
            .iter()
            .map(|&p| dimensions_token(p))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
