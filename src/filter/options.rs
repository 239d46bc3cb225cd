//! Enumerated filter fields and their fixed allow-lists
//!
//! Every enumerable search field is a closed set defined by the
//! destination site. Parsing from the site's query-string tokens fails
//! with `InvalidFilterValue` for anything outside the set; the typed
//! variants make an already-constructed filter valid by construction.

use crate::WallgrabError;
use std::fmt;
use std::str::FromStr;

/// Resolutions the site's search form accepts, ascending.
pub const RESOLUTIONS: [(u32, u32); 20] = [
    (1280, 720),
    (1280, 800),
    (1280, 960),
    (1280, 1024),
    (1600, 900),
    (1600, 1000),
    (1600, 1200),
    (1600, 1280),
    (1920, 1080),
    (1920, 1200),
    (1920, 1440),
    (1920, 1536),
    (2560, 1440),
    (2560, 1600),
    (2560, 1920),
    (2560, 2048),
    (3840, 2160),
    (3840, 2400),
    (3840, 2880),
    (3840, 3072),
];

/// Aspect ratios the site's search form accepts.
pub const RATIOS: [(u32, u32); 9] = [
    (4, 3),
    (5, 4),
    (9, 16),
    (10, 16),
    (16, 9),
    (16, 10),
    (21, 9),
    (32, 9),
    (48, 9),
];

/// Formats a `(width, height)` pair the way the site's query string
/// expects it, e.g. `1920x1080`.
pub fn dimensions_token(pair: (u32, u32)) -> String {
    format!("{}x{}", pair.0, pair.1)
}

/// Parses a `WxH` token into a `(width, height)` pair.
///
/// Membership in an allow-list is checked by the caller; this only
/// rejects tokens that are not two positive integers.
pub fn parse_dimensions(field: &'static str, token: &str) -> crate::Result<(u32, u32)> {
    let invalid = || WallgrabError::InvalidFilterValue {
        field,
        value: token.to_string(),
        allowed: "WxH pairs of positive integers".to_string(),
    };

    let (w, h) = token.split_once('x').ok_or_else(invalid)?;
    let w: u32 = w.parse().map_err(|_| invalid())?;
    let h: u32 = h.parse().map_err(|_| invalid())?;
    if w == 0 || h == 0 {
        return Err(invalid());
    }
    Ok((w, h))
}

/// Sort key for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Relevance,
    Random,
    DateAdded,
    Views,
    Favorites,
    Toplist,
}

impl SortKey {
    /// The token the site's `sorting` query parameter uses.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Random => "random",
            Self::DateAdded => "date_added",
            Self::Views => "views",
            Self::Favorites => "favorites",
            Self::Toplist => "toplist",
        }
    }
}

impl FromStr for SortKey {
    type Err = WallgrabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(Self::Relevance),
            "random" => Ok(Self::Random),
            "date_added" => Ok(Self::DateAdded),
            "views" => Ok(Self::Views),
            "favorites" => Ok(Self::Favorites),
            "toplist" => Ok(Self::Toplist),
            other => Err(WallgrabError::InvalidFilterValue {
                field: "sorting",
                value: other.to_string(),
                allowed: "relevance, random, date_added, views, favorites, toplist".to_string(),
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Sort direction for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Descending,
    Ascending,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Descending => "desc",
            Self::Ascending => "asc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = WallgrabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desc" => Ok(Self::Descending),
            "asc" => Ok(Self::Ascending),
            other => Err(WallgrabError::InvalidFilterValue {
                field: "order",
                value: other.to_string(),
                allowed: "desc, asc".to_string(),
            }),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Time window for toplist sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    OneDay,
    ThreeDays,
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl TimeRange {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::ThreeDays => "3d",
            Self::OneWeek => "1w",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1y",
        }
    }
}

impl FromStr for TimeRange {
    type Err = WallgrabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Self::OneDay),
            "3d" => Ok(Self::ThreeDays),
            "1w" => Ok(Self::OneWeek),
            "1M" => Ok(Self::OneMonth),
            "3M" => Ok(Self::ThreeMonths),
            "6M" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            other => Err(WallgrabError::InvalidFilterValue {
                field: "topRange",
                value: other.to_string(),
                allowed: "1d, 3d, 1w, 1M, 3M, 6M, 1y".to_string(),
            }),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// How the configured resolution list constrains results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Results must be at least as large as the smallest configured
    /// resolution (`atleast` query parameter).
    AtLeast,
    /// Results must match one of the configured resolutions exactly
    /// (`resolutions` query parameter).
    Exactly,
}
