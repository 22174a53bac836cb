//
//  gerrit-client
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Secret Storage
//!
//! The `gerrit` command-line front end keeps HTTP passwords and session
//! cookies in the system's native keyring rather than in the TOML
//! configuration file:
//!
//! - **macOS**: Keychain Services
//! - **Linux**: Secret Service API (GNOME Keyring, KWallet)
//! - **Windows**: Windows Credential Manager
//!
//! Secrets are stored under the service name `gerrit-cli`, keyed by the
//! normalized Gerrit host.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gerrit_client::auth::KeyringStore;
//!
//! fn manage_secrets() -> anyhow::Result<()> {
//!     let store = KeyringStore::new();
//!     store.store("review.example.com", "http-password")?;
//!
//!     if let Some(secret) = store.get("review.example.com")? {
//!         println!("Found stored secret ({} chars)", secret.len());
//!     }
//!
//!     store.delete("review.example.com")?;
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use keyring::Entry;

const SERVICE_NAME: &str = "gerrit-cli";

/// Secret storage backed by the platform keyring.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Stores `secret` for `host`, replacing any previous value.
    pub fn store(&self, host: &str, secret: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        entry.set_password(secret)?;
        Ok(())
    }

    /// Returns the secret stored for `host`, or `None` if there is none.
    pub fn get(&self, host: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, host)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the secret stored for `host`. Missing entries are not an error.
    pub fn delete(&self, host: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
