//
//  gerrit-client
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Configuration Module
//!
//! Host entries describe how to reach and authenticate against one Gerrit
//! server. They are keyed by [`normalize_host`] output, so
//! `https://Review.Example.com/` and `review.example.com` name the same entry.
//!
//! ## Usage
//!
//! ```rust
//! use gerrit_client::config::{normalize_host, AuthScheme, HostConfig};
//!
//! assert_eq!(normalize_host("https://Review.Example.com/"), "review.example.com");
//!
//! let host = HostConfig {
//!     username: Some("jdoe".to_string()),
//!     auth: AuthScheme::Digest,
//!     ..HostConfig::new("https://review.example.com/")
//! };
//! let client = host.to_client(Some("http-password"), None).unwrap();
//! assert!(client.authentication().has_auth());
//! ```

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::api::GerritClient;
use crate::auth::{AuthCredential, KeyringStore};

/// Environment variable that overrides the stored secret.
pub const PASSWORD_ENV: &str = "GERRIT_PASSWORD";

/// Cookie name used when a host entry does not set one.
pub const DEFAULT_COOKIE_NAME: &str = "GerritAccount";

/// Authentication scheme of a host entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    None,
    #[default]
    Basic,
    Digest,
    Cookie,
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Digest => "digest",
            Self::Cookie => "cookie",
        })
    }
}

/// Settings for one Gerrit server.
///
/// # Fields
///
/// * `url` - Base URL of the server, including any path prefix
/// * `username` - Account username, required for Basic and Digest
/// * `auth` - Scheme used with the stored secret
/// * `cookie_name` - Cookie name for the Cookie scheme
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostConfig {
    pub url: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub auth: AuthScheme,

    #[serde(default)]
    pub cookie_name: Option<String>,
}

impl HostConfig {
    /// An entry for `url` with Basic auth and no username.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Builds a client for this host.
    ///
    /// `secret` is the HTTP password (Basic, Digest) or the cookie value
    /// (Cookie). Without a secret the client is anonymous.
    ///
    /// # Errors
    ///
    /// Fails if the URL is invalid, or if Basic or Digest is configured with
    /// a secret but no username.
    pub fn to_client(&self, secret: Option<&str>, timeout: Option<Duration>) -> Result<GerritClient> {
        let mut builder = GerritClient::builder().base_url(&self.url);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(credential) = self.credential(secret)? {
            builder = builder.credential(credential);
        }
        builder
            .build()
            .with_context(|| format!("Invalid Gerrit URL '{}'", self.url))
    }

    fn credential(&self, secret: Option<&str>) -> Result<Option<AuthCredential>> {
        let Some(secret) = secret else {
            if self.auth != AuthScheme::None {
                tracing::debug!(url = %self.url, "no secret available, using anonymous access");
            }
            return Ok(None);
        };

        let username = || {
            self.username
                .clone()
                .with_context(|| format!("{} authentication requires a username", self.auth))
        };

        Ok(match self.auth {
            AuthScheme::None => None,
            AuthScheme::Basic => Some(AuthCredential::Basic {
                username: username()?,
                password: secret.to_string(),
            }),
            AuthScheme::Digest => Some(AuthCredential::Digest {
                username: username()?,
                password: secret.to_string(),
            }),
            AuthScheme::Cookie => Some(AuthCredential::Cookie {
                name: self
                    .cookie_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
                value: secret.to_string(),
            }),
        })
    }
}

/// Looks up the secret for `host`: `GERRIT_PASSWORD` first, then the keyring.
pub fn resolve_secret(host: &str) -> Result<Option<String>> {
    if let Ok(secret) = std::env::var(PASSWORD_ENV) {
        if !secret.is_empty() {
            return Ok(Some(secret));
        }
    }
    KeyringStore::new().get(&normalize_host(host))
}

/// Normalizes a host or URL into a config key.
///
/// Strips the scheme and trailing slashes and lowercases the rest. A path
/// prefix is kept, so two servers on one hostname stay distinct.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    let host = host.trim_end_matches('/');
    host.to_lowercase()
}
