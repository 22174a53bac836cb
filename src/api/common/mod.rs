//
//  gerrit-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Gerrit REST API
//!
//! This module provides the types shared by every resource module: the
//! unified [`ApiError`], the crate-wide [`Result`] alias, and the option and
//! value types that appear across resources.
//!
//! # Overview
//!
//! - [`ApiError`] - Classified failure for every API operation
//! - [`ResponseMeta`] - Status, headers and URL of a response, kept on errors
//! - Option types ([`ListOptions`], [`QueryOptions`], [`ChangeOptions`])
//! - Value types ([`Timestamp`], [`Number`])
//!
//! # Example
//!
//! ```rust
//! use gerrit_client::api::common::ApiError;
//!
//! fn handle<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(e) if e.is_not_found() => println!("No such resource"),
//!         Err(e) if e.is_auth_error() => println!("Please authenticate first"),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

mod options;
mod types;

pub use options::*;
pub use types::*;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Metadata of a received HTTP response.
///
/// Errors that happen after a response arrived carry this so callers can
/// still inspect the status, headers and URL of the failed call.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// HTTP status code of the response.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// The URL of the request that produced this response.
    pub url: Url,
}

impl ResponseMeta {
    /// Captures the metadata of a `reqwest` response before its body is consumed.
    pub fn from_response(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
        }
    }

    /// Returns the status line, e.g. `400 Bad Request`.
    pub fn status_line(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {}", self.status.as_u16(), reason),
            None => self.status.as_u16().to_string(),
        }
    }
}

/// Unified error type for all Gerrit API operations.
///
/// The variants separate the failure classes a caller typically needs to
/// tell apart: "the client was misconfigured", "the server was unreachable",
/// "the server rejected the request" and "the server answered but the body was
/// unusable".
///
/// | Variant | Description |
/// |---------|-------------|
/// | `Config` | Invalid or empty endpoint, bad builder input |
/// | `InvalidUrl` | A URL could not be parsed |
/// | `InvalidQuery` | An options value could not be flattened into a query |
/// | `Serialize` | The request body could not be encoded as JSON |
/// | `Transport` | Connection failure, timeout, redirect loop, cancellation |
/// | `Authentication` | Digest preflight failed or the server answered 401 |
/// | `Status` | Any other non-2xx response |
/// | `Decode` | 2xx response whose body could not be decoded |
/// | `Io` | Writing a raw body to a sink failed |
#[derive(Error, Debug)]
pub enum ApiError {
    /// The client configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A query options value could not be converted to query parameters.
    #[error("Invalid query options: {0}")]
    InvalidQuery(String),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The request could not be sent or no response was received.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Authentication failed.
    ///
    /// Raised when a Digest preflight could not obtain a usable challenge, or
    /// when the server rejected the supplied credentials with 401.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// What went wrong.
        message: String,
        /// The response that triggered the failure, if one was received.
        response: Option<ResponseMeta>,
    },

    /// The server answered with a non-success status.
    #[error("API call to {} failed: {}{}", .response.url, .response.status_line(), .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status {
        /// Metadata of the failed response.
        response: ResponseMeta,
        /// The response body, when the server sent one.
        detail: Option<String>,
    },

    /// The server answered with success but the body was not usable.
    #[error("Failed to decode response from {}: {source}", .response.url)]
    Decode {
        /// Metadata of the response whose body failed to decode.
        response: ResponseMeta,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing a response body to a caller-supplied sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Returns the response metadata, if a response was received.
    pub fn response(&self) -> Option<&ResponseMeta> {
        match self {
            Self::Status { response, .. } | Self::Decode { response, .. } => Some(response),
            Self::Authentication { response, .. } => response.as_ref(),
            _ => None,
        }
    }

    /// Returns the HTTP status code, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|r| r.status)
    }

    /// Returns the server-provided error detail of a `Status` error.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Check if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the response body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
