//
//  gerrit-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for Gerrit's REST API and typed
//! wrappers for its resource collections.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`client`]: Core HTTP client with authentication and request handling
//! - [`url`]: Base URL normalization, path escaping and query encoding
//! - [`response`]: `)]}'` prefix stripping and response decoding
//! - [`common`]: Shared types (errors, option structs, timestamps)
//! - Resource modules: [`projects`], [`changes`], [`accounts`], [`groups`],
//!   [`plugins`], [`access`], [`config`], [`events`]
//!
//! ## Usage
//!
//! ### Creating a Client
//!
//! ```rust,no_run
//! use gerrit_client::api::GerritClient;
//! use gerrit_client::api::changes::QueryChangeOptions;
//!
//! # async fn example() -> gerrit_client::api::common::Result<()> {
//! let client = GerritClient::new("https://review.example.com/")?;
//! client.authentication().set_basic_auth("jdoe", "http-password");
//!
//! let open = client
//!     .changes()
//!     .query(&QueryChangeOptions::query("status:open+project:gerrit"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`ApiError`] on failure:
//!
//! - `Config`: the endpoint or builder input was invalid
//! - `Transport`: no response was received
//! - `Authentication`: Digest preflight failed or the server answered 401
//! - `Status`: any other non-2xx response, with the server's message as detail
//! - `Decode`: a 2xx response whose body was not the expected JSON

/// Core HTTP client for the Gerrit REST API.
///
/// Provides the [`GerritClient`] struct which handles:
/// - URL resolution with the authenticated `a/` prefix
/// - Authentication header injection
/// - Request/response serialization
/// - Error classification by status code
pub mod client;

/// URL building and query-string encoding.
pub mod url;

/// Response body handling.
pub mod response;

/// Types shared across resource modules.
///
/// Includes:
/// - [`ApiError`]: Standardized error type
/// - Option structs for list and query endpoints
/// - [`common::Timestamp`]: Gerrit's timestamp format
pub mod common;

pub mod access;
pub mod accounts;
pub mod changes;
pub mod config;
pub mod events;
pub mod groups;
pub mod plugins;
pub mod projects;

/// Re-export of the main Gerrit API client.
pub use client::{ClientBuilder, GerritClient};

/// Re-export of the error type and response wrapper.
pub use common::ApiError;
pub use response::ApiResponse;
