//! Result items
//!
//! An [`Item`] is one discovered wallpaper: a stable string identifier,
//! the base locator of its full-size payload, and a file extension that
//! stays unknown until a successful byte-content probe.

mod download;

pub use download::{download_item, download_item_from, probe_extension};

use std::hash::{Hash, Hasher};

/// Base URL of full-size payloads; the extension is appended after a
/// successful probe.
const FULL_URL_PREFIX: &str = "https://wallpapers.wallhaven.cc/wallpapers/full/wallhaven-";

/// Extensions probed for an item's payload, in fixed priority order.
/// The first extension that answers 2xx wins.
pub const EXTENSION_PRIORITY: [&str; 4] = [".jpg", ".png", ".bmp", ".gif"];

/// One discovered result entry. Value object; identity is the
/// identifier.
#[derive(Debug, Clone)]
pub struct Item {
    id: String,
    extension: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extension: None,
        }
    }

    /// The stable identifier the site assigns this wallpaper.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The payload locator without an extension.
    pub fn base_locator(&self) -> String {
        format!("{FULL_URL_PREFIX}{}", self.id)
    }

    /// The probed file extension, if a probe has succeeded.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub(crate) fn set_extension(&mut self, extension: impl Into<String>) {
        self.extension = Some(extension.into());
    }

    /// The destination file name, once the extension is known.
    pub fn file_name(&self) -> Option<String> {
        self.extension
            .as_deref()
            .map(|ext| format!("wallhaven-{}{ext}", self.id))
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
