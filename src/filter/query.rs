//! Query-string encoding and decoding for search filters
//!
//! The produced parameter names match the destination site exactly:
//! `q, categories, purity, topRange, sorting, order, page, ratios`, plus
//! either `atleast` or `resolutions` depending on the resolution mode.

use crate::filter::options::{dimensions_token, parse_dimensions, ResolutionMode};
use crate::filter::SearchFilter;
use crate::{Result, WallgrabError};
use url::Url;

impl SearchFilter {
    /// Produces the canonical query parameters for this filter.
    ///
    /// Parameters whose value would be empty (`q` with no search text,
    /// empty `ratios`/`resolutions` lists) are omitted entirely, never
    /// emitted as empty strings. When the resolution mode is at-least
    /// and at least one resolution is configured, a single `atleast`
    /// parameter carries the smallest configured resolution; otherwise
    /// the full list is emitted as `resolutions`.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(9);

        if !self.query().is_empty() {
            params.push(("q", self.query().to_string()));
        }
        params.push(("categories", self.categories()));
        params.push(("purity", self.purity()));
        params.push(("topRange", self.top_range().as_param().to_string()));
        params.push(("sorting", self.sorting().as_param().to_string()));
        params.push(("order", self.order().as_param().to_string()));
        params.push(("page", self.page().to_string()));

        if !self.ratios().is_empty() {
            params.push(("ratios", join_dimensions(self.ratios())));
        }

        match self.resolution_mode() {
            ResolutionMode::AtLeast if !self.resolutions().is_empty() => {
                // The list is kept sorted ascending, so the head is the
                // smallest configured resolution.
                params.push(("atleast", dimensions_token(self.resolutions()[0])));
            }
            _ => {
                if !self.resolutions().is_empty() {
                    params.push(("resolutions", join_dimensions(self.resolutions())));
                }
            }
        }

        params
    }

    /// Builds the full search URL for this filter against a site base
    /// URL, e.g. `https://alpha.wallhaven.cc`.
    pub fn search_url(&self, base_url: &str) -> Result<Url> {
        let mut url = Url::parse(base_url)?.join("/search")?;
        url.query_pairs_mut()
            .extend_pairs(self.to_query_params())
            .finish();
        Ok(url)
    }

    /// Parses an existing search URL into a new filter.
    ///
    /// Fields absent from the query string revert to the derived-default
    /// rule (nothing chosen), not to an arbitrary fixed value.
    /// Unrecognized parameters are ignored; recognized parameters with
    /// values outside their allow-list fail with `InvalidFilterValue`.
    pub fn from_reference(reference: &str) -> Result<Self> {
        let url = Url::parse(reference)?;
        let mut filter = SearchFilter::new();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "q" => filter.set_query(value.to_string()),
                "categories" => {
                    let [general, anime, people] = parse_flag_triple("categories", &value)?;
                    filter.set_general(general);
                    filter.set_anime(anime);
                    filter.set_people(people);
                }
                "purity" => {
                    let [sfw, sketchy, nsfw] = parse_flag_triple("purity", &value)?;
                    filter.set_sfw(sfw);
                    filter.set_sketchy(sketchy);
                    filter.set_nsfw(nsfw);
                }
                "resolutions" => {
                    for token in value.split(',').filter(|t| !t.is_empty()) {
                        filter.add_resolution(parse_dimensions("resolutions", token)?)?;
                    }
                    filter.set_resolution_mode(ResolutionMode::Exactly);
                }
                "atleast" => {
                    filter.add_resolution(parse_dimensions("atleast", &value)?)?;
                    filter.set_resolution_mode(ResolutionMode::AtLeast);
                }
                "ratios" => {
                    for token in value.split(',').filter(|t| !t.is_empty()) {
                        filter.add_ratio(parse_dimensions("ratios", token)?)?;
                    }
                }
                "sorting" => filter.set_sorting(value.parse()?),
                "order" => filter.set_order(value.parse()?),
                "topRange" => filter.set_top_range(value.parse()?),
                "page" => {
                    let page: u32 =
                        value.parse().map_err(|_| WallgrabError::InvalidFilterValue {
                            field: "page",
                            value: value.to_string(),
                            allowed: "integers >= 1".to_string(),
                        })?;
                    filter.set_page(page)?;
                }
                // Unknown parameters are not an error.
                _ => {}
            }
        }

        Ok(filter)
    }
}

fn join_dimensions(pairs: &[(u32, u32)]) -> String {
    pairs
        .iter()
        .map(|&p| dimensions_token(p))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a 3-character binary flag string like `101`.
fn parse_flag_triple(field: &'static str, value: &str) -> Result<[bool; 3]> {
    let invalid = || WallgrabError::InvalidFilterValue {
        field,
        value: value.to_string(),
        allowed: "3-character strings of 0 and 1".to_string(),
    };

    let chars: Vec<char> = value.chars().collect();
    if chars.len() != 3 {
        return Err(invalid());
    }

    let mut flags = [false; 3];
    for (i, c) in chars.iter().enumerate() {
        flags[i] = match c {
            '1' => true,
            '0' => false,
            _ => return Err(invalid()),
        };
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::options::{SortKey, SortOrder, TimeRange};

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_default_filter_params() {
        let filter = SearchFilter::new();
        let params = filter.to_query_params();

        assert_eq!(param(&params, "q"), None);
        assert_eq!(param(&params, "categories"), Some("111"));
        assert_eq!(param(&params, "purity"), Some("100"));
        assert_eq!(param(&params, "topRange"), Some("1M"));
        assert_eq!(param(&params, "sorting"), Some("toplist"));
        assert_eq!(param(&params, "order"), Some("desc"));
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "ratios"), None);
        assert_eq!(param(&params, "resolutions"), None);
        assert_eq!(param(&params, "atleast"), None);
    }

    #[test]
    fn test_at_least_mode_uses_smallest_resolution() {
        let mut filter = SearchFilter::new();
        filter.add_resolution((1920, 1080)).unwrap();
        filter.add_resolution((1280, 720)).unwrap();

        let params = filter.to_query_params();
        assert_eq!(param(&params, "atleast"), Some("1280x720"));
        assert_eq!(param(&params, "resolutions"), None);
    }

    #[test]
    fn test_exact_mode_emits_full_resolution_list() {
        let mut filter = SearchFilter::new();
        filter.set_resolution_mode(ResolutionMode::Exactly);
        filter.add_resolution((1920, 1080)).unwrap();
        filter.add_resolution((1280, 720)).unwrap();

        let params = filter.to_query_params();
        assert_eq!(param(&params, "resolutions"), Some("1280x720,1920x1080"));
        assert_eq!(param(&params, "atleast"), None);
    }

    #[test]
    fn test_ratios_comma_joined() {
        let mut filter = SearchFilter::new();
        filter.add_ratio((16, 9)).unwrap();
        filter.add_ratio((4, 3)).unwrap();

        let params = filter.to_query_params();
        assert_eq!(param(&params, "ratios"), Some("4x3,16x9"));
    }

    #[test]
    fn test_query_text_emitted_when_present() {
        let mut filter = SearchFilter::new();
        filter.set_query("mountains");
        let params = filter.to_query_params();
        assert_eq!(param(&params, "q"), Some("mountains"));
    }

    #[test]
    fn test_search_url_contains_query_string() {
        let mut filter = SearchFilter::new();
        filter.set_query("forest");
        let url = filter.search_url("https://alpha.wallhaven.cc").unwrap();
        assert_eq!(url.path(), "/search");
        assert!(url.query().unwrap().contains("q=forest"));
        assert!(url.query().unwrap().contains("categories=111"));
    }

    #[test]
    fn test_from_reference_reads_all_fields() {
        let filter = SearchFilter::from_reference(
            "https://alpha.wallhaven.cc/search?q=space&categories=110&purity=011\
             &topRange=1y&sorting=views&order=asc&page=4&ratios=16x9",
        )
        .unwrap();

        assert_eq!(filter.query(), "space");
        assert_eq!(filter.categories(), "110");
        assert_eq!(filter.purity(), "011");
        assert_eq!(filter.top_range(), TimeRange::OneYear);
        assert_eq!(filter.sorting(), SortKey::Views);
        assert_eq!(filter.order(), SortOrder::Ascending);
        assert_eq!(filter.page(), 4);
        assert_eq!(filter.ratios(), &[(16, 9)]);
        assert!(filter.credentials_required());
    }

    #[test]
    fn test_from_reference_absent_fields_use_derived_defaults() {
        let filter =
            SearchFilter::from_reference("https://alpha.wallhaven.cc/search?q=abc").unwrap();
        assert_eq!(filter.categories(), "111");
        assert_eq!(filter.purity(), "100");
        assert_eq!(filter.page(), 1);
    }

    #[test]
    fn test_from_reference_ignores_unknown_parameters() {
        let filter = SearchFilter::from_reference(
            "https://alpha.wallhaven.cc/search?q=abc&seed=xyz123&color=660000",
        )
        .unwrap();
        assert_eq!(filter.query(), "abc");
    }

    #[test]
    fn test_from_reference_rejects_malformed_triple() {
        let err =
            SearchFilter::from_reference("https://alpha.wallhaven.cc/search?categories=11")
                .unwrap_err();
        assert!(matches!(
            err,
            WallgrabError::InvalidFilterValue { field: "categories", .. }
        ));

        assert!(SearchFilter::from_reference(
            "https://alpha.wallhaven.cc/search?purity=1x1"
        )
        .is_err());
    }

    #[test]
    fn test_from_reference_rejects_unknown_sorting() {
        assert!(SearchFilter::from_reference(
            "https://alpha.wallhaven.cc/search?sorting=hotness"
        )
        .is_err());
    }

    #[test]
    fn test_from_reference_rejects_page_zero() {
        assert!(
            SearchFilter::from_reference("https://alpha.wallhaven.cc/search?page=0").is_err()
        );
    }

    #[test]
    fn test_round_trip_preserves_resolved_fields() {
        let mut original = SearchFilter::new();
        original.set_query("nebula");
        original.set_general(true);
        original.set_people(true);
        original.set_sketchy(true);
        original.set_sorting(SortKey::Favorites);
        original.set_order(SortOrder::Ascending);
        original.set_top_range(TimeRange::ThreeMonths);
        original.set_page(7).unwrap();
        original.add_ratio((16, 10)).unwrap();
        original.set_resolution_mode(ResolutionMode::Exactly);
        original.add_resolution((2560, 1440)).unwrap();
        original.add_resolution((1920, 1080)).unwrap();

        let url = original.search_url("https://alpha.wallhaven.cc").unwrap();
        let parsed = SearchFilter::from_reference(url.as_str()).unwrap();

        assert_eq!(parsed.query(), original.query());
        assert_eq!(parsed.categories(), original.categories());
        assert_eq!(parsed.purity(), original.purity());
        assert_eq!(parsed.resolutions(), original.resolutions());
        assert_eq!(parsed.resolution_mode(), original.resolution_mode());
        assert_eq!(parsed.ratios(), original.ratios());
        assert_eq!(parsed.sorting(), original.sorting());
        assert_eq!(parsed.order(), original.order());
        assert_eq!(parsed.top_range(), original.top_range());
        assert_eq!(parsed.page(), original.page());
    }

    #[test]
    fn test_round_trip_at_least_mode() {
        let mut original = SearchFilter::new();
        original.add_resolution((1280, 720)).unwrap();

        let url = original.search_url("https://alpha.wallhaven.cc").unwrap();
        let parsed = SearchFilter::from_reference(url.as_str()).unwrap();

        assert_eq!(parsed.resolution_mode(), ResolutionMode::AtLeast);
        assert_eq!(parsed.resolutions(), &[(1280, 720)]);
    }
}
