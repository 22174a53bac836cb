//
//  gerrit-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gerrit Client Library
//!
//! A typed client for the Gerrit Code Review REST API, plus the `gerrit`
//! command-line tool built on top of it.
//!
//! ## Overview
//!
//! [`GerritClient`] turns resource paths into absolute URLs, authenticates
//! requests, strips Gerrit's `)]}'` anti-XSSI prefix and classifies failures
//! into [`ApiError`]. Resource modules (changes, projects, accounts, groups,
//! plugins, access, config, events) sit on top as thin typed wrappers.
//!
//! ## Features
//!
//! - **Authentication**: HTTP Basic, HTTP Digest (with challenge caching) and cookies
//! - **Path handling**: the `a/` prefix for authenticated calls, escaped path segments
//! - **Query options**: typed option structs flattened into query strings, with
//!   literal `+` and `:` in search queries
//! - **Raw bodies**: patches and other non-JSON payloads as bytes or streamed to a writer
//!
//! ## Module Structure
//!
//! - [`api`]: The client, request/response core and resource modules
//! - [`auth`]: Credentials, Digest signing and keychain storage
//! - [`config`]: Configuration file management
//! - [`output`]: Output formatting (Table, JSON)
//! - [`cli`]: Command-line interface definitions using clap
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gerrit_client::api::changes::QueryChangeOptions;
//! use gerrit_client::auth::AuthCredential;
//! use gerrit_client::GerritClient;
//!
//! # async fn run() -> Result<(), gerrit_client::ApiError> {
//! let client = GerritClient::builder()
//!     .base_url("https://review.example.com/")
//!     .credential(AuthCredential::Digest {
//!         username: "jdoe".into(),
//!         password: "http-password".into(),
//!     })
//!     .build()?;
//!
//! let options = QueryChangeOptions::query("status:open+owner:self").limit(10);
//! for change in client.changes().query(&options).await? {
//!     println!("{} {}", change.number, change.subject);
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// The Gerrit REST client.
///
/// URL building, request construction, response decoding, error
/// classification and the typed resource modules.
pub mod api;

/// Authentication and credential management.
///
/// Handles the supported authentication methods:
/// - HTTP Basic
/// - HTTP Digest (RFC 2617, MD5 and SHA-256)
/// - Session cookies
/// - Secure credential storage via system keychain
pub mod auth;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/gerrit/config.toml`
/// - macOS: `~/Library/Application Support/gerrit/config.toml`
/// - Windows: `%APPDATA%\gerrit\config\config.toml`
pub mod config;

/// Output formatting for different modes.
///
/// Provides formatters for:
/// - Table format: Human-readable tables for interactive use
/// - JSON format: Structured output for scripting and automation
pub mod output;

pub use api::{ApiError, ApiResponse, ClientBuilder, GerritClient};
pub use cli::Cli;
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "gerrit";

/// Application version constant.
///
/// Automatically populated from `Cargo.toml` at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process exit codes.
///
/// | Code | Meaning |
/// |------|---------|
/// | 0 | Success |
/// | 1 | General error |
/// | 2 | Usage error |
/// | 4 | Authentication error |
/// | 8 | Resource not found |
/// | 16 | Conflict |
pub mod exit_codes {
    use crate::api::ApiError;

    pub const SUCCESS: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH_ERROR: i32 = 4;
    pub const NOT_FOUND: i32 = 8;
    pub const CONFLICT: i32 = 16;

    /// Picks the exit code for a failed command.
    ///
    /// The first [`ApiError`] in the error chain decides; anything else is
    /// [`ERROR`].
    pub fn for_error(err: &anyhow::Error) -> i32 {
        let Some(api) = err.chain().find_map(|e| e.downcast_ref::<ApiError>()) else {
            return ERROR;
        };
        if api.is_auth_error() {
            AUTH_ERROR
        } else if api.is_not_found() {
            NOT_FOUND
        } else if api.is_conflict() {
            CONFLICT
        } else {
            ERROR
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use anyhow::Context;

        #[test]
        fn test_plain_error_is_general() {
            assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
        }

        #[test]
        fn test_api_error_behind_context() {
            let err: anyhow::Result<()> = Err(ApiError::Authentication {
                message: "rejected".to_string(),
                response: None,
            })
            .context("Could not log in");
            assert_eq!(for_error(&err.unwrap_err()), AUTH_ERROR);

            let config = anyhow::Error::new(ApiError::Config("empty".to_string()));
            assert_eq!(for_error(&config), ERROR);
        }
    }
}
