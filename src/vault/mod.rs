//! Credential vault
//!
//! Stores the site login behind the OS credential store, keyed by a
//! per-install random service token file. The core crawl
//! consumes credentials through [`crate::session::Credentials`]; this
//! module only retrieves and stores them.

mod token;

pub use token::service_token;

use crate::session::Credentials;
use crate::{VaultError, VaultResult};
use keyring::Entry;
use std::path::Path;

const USERNAME_FIELD: &str = "username";
const PASSWORD_FIELD: &str = "password";

/// OS-credential-store-backed vault for the site login.
pub struct CredentialVault {
    service: String,
}

impl CredentialVault {
    /// Opens the vault, creating the per-install service token file on
    /// first use.
    pub fn open(token_path: &Path) -> VaultResult<Self> {
        let service = service_token(token_path)?;
        Ok(Self { service })
    }

    /// Builds a vault over an explicit service name. Used by tests and
    /// by callers that manage the token themselves.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, field: &str) -> VaultResult<Entry> {
        Ok(Entry::new(&self.service, field)?)
    }

    fn read_field(&self, field: &str) -> VaultResult<Option<String>> {
        match self.entry(field)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether both username and password are stored.
    pub fn has_credentials(&self) -> VaultResult<bool> {
        Ok(self.read_field(USERNAME_FIELD)?.is_some()
            && self.read_field(PASSWORD_FIELD)?.is_some())
    }

    /// Retrieves the stored credentials, or `None` unless both fields
    /// are present.
    pub fn get(&self) -> VaultResult<Option<Credentials>> {
        let username = self.read_field(USERNAME_FIELD)?;
        let password = self.read_field(PASSWORD_FIELD)?;
        match (username, password) {
            (Some(username), Some(password)) => Ok(Some(Credentials { username, password })),
            _ => Ok(None),
        }
    }

    /// Stores both credential fields.
    pub fn set(&self, username: &str, password: &str) -> VaultResult<()> {
        self.entry(USERNAME_FIELD)?.set_password(username)?;
        self.entry(PASSWORD_FIELD)?.set_password(password)?;
        Ok(())
    }

    /// Deletes both credential fields.
    ///
    /// Fails with [`VaultError::Delete`] naming the fields that could
    /// not be removed when deletion is partial.
    pub fn delete(&self) -> VaultResult<()> {
        let mut failed = Vec::new();

        for field in [PASSWORD_FIELD, USERNAME_FIELD] {
            match self.entry(field).and_then(|entry| {
                entry.delete_credential().map_err(VaultError::from)
            }) {
                Ok(()) | Err(VaultError::Keyring(keyring::Error::NoEntry)) => {}
                Err(_) => failed.push(match field {
                    PASSWORD_FIELD => "password",
                    _ => "username",
                }),
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(VaultError::Delete { fields: failed })
        }
    }
}
