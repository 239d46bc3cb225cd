//! Payload download: extension probe + byte transfer
//!
//! An item's file extension is unknown until one of the candidate
//! payload URLs answers successfully. Probing is sequential in the
//! fixed priority order of [`EXTENSION_PRIORITY`]; the first match
//! wins.

use crate::item::{Item, EXTENSION_PRIORITY};
use crate::{Result, WallgrabError};
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Probes `{locator}{ext}` for each candidate extension in priority
/// order and returns the winning extension with its body bytes.
///
/// Fails with [`WallgrabError::MissingPayload`] when no candidate
/// answers 2xx. Probe rejections are expected, not errors; only
/// transport failures propagate.
pub async fn probe_extension(
    client: &Client,
    locator: &str,
    id: &str,
) -> Result<(String, Vec<u8>)> {
    for ext in EXTENSION_PRIORITY {
        let url = format!("{locator}{ext}");
        tracing::debug!("Probing {url}");
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            continue;
        }
        let bytes = response.bytes().await?;
        return Ok((ext.to_string(), bytes.to_vec()));
    }
    Err(WallgrabError::MissingPayload { id: id.to_string() })
}

/// Downloads an item's payload into `dest_dir`, recording the probed
/// extension on the item. Returns the written file path.
pub async fn download_item(client: &Client, item: &mut Item, dest_dir: &Path) -> Result<PathBuf> {
    let locator = item.base_locator();
    download_item_from(client, item, &locator, dest_dir).await
}

/// Like [`download_item`] with an explicit payload locator, for mirrors
/// or testing.
pub async fn download_item_from(
    client: &Client,
    item: &mut Item,
    locator: &str,
    dest_dir: &Path,
) -> Result<PathBuf> {
    let (ext, bytes) = probe_extension(client, locator, item.id()).await?;
    item.set_extension(&ext);

    tokio::fs::create_dir_all(dest_dir).await?;
    let name = format!("wallhaven-{}{ext}", item.id());
    let path = dest_dir.join(name);
    tokio::fs::write(&path, &bytes).await?;
    tracing::info!("Downloaded {} to {}", item.id(), path.display());
    Ok(path)
}
