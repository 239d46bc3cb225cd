//! Per-install service token
//!
//! The vault stores credentials under a locally generated random token
//! rather than a fixed service name, so an application that has
//! harvested an entire OS credential store cannot correlate the entries
//! back to this tool. The token is created once, persisted to a
//! read-only file, and read back thereafter.

use crate::VaultError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::Path;

const TOKEN_LENGTH: usize = 32;

/// Reads the service token, generating and persisting it on first use.
pub fn service_token(path: &Path) -> Result<String, VaultError> {
    if !path.is_file() {
        write_token_file(path)?;
    }
    Ok(std::fs::read_to_string(path)?.trim().to_string())
}

fn write_token_file(path: &Path) -> Result<(), VaultError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    std::fs::write(path, &token)?;

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_readonly(true);
    std::fs::set_permissions(path, permissions)?;
    Ok(())
}
