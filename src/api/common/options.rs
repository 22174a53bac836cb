//
//  gerrit-client
//  api/common/options.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Query Option Types Shared by Gerrit Endpoints
//!
//! Gerrit list and query endpoints share a small vocabulary of query
//! parameters. These structs name them once; resource-specific option
//! structs embed them with `#[serde(flatten)]`.
//!
//! | Type | Parameters | Used by |
//! |------|------------|---------|
//! | [`ListOptions`] | `n`, `S` | projects, groups, plugins, branches, tags |
//! | [`QueryOptions`] | `q`, `n`, `start` | changes, accounts |
//! | [`ChangeOptions`] | `o` | change and account detail endpoints |
//!
//! Fields left as `None` or empty are dropped by
//! [`append_query`](crate::api::url::append_query), so a `Default` value
//! produces no query string at all.
//!
//! # Example
//!
//! ```rust
//! use gerrit_client::api::common::{ListOptions, QueryOptions};
//!
//! let page = ListOptions { limit: Some(25), skip: Some(50) };
//! let search = QueryOptions {
//!     query: vec!["status:open+project:gerrit".to_string()],
//!     limit: Some(10),
//!     start: None,
//! };
//! ```

use serde::Serialize;

/// Offset pagination used by most list endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListOptions {
    /// Maximum number of results to return.
    #[serde(rename = "n")]
    pub limit: Option<u32>,

    /// Number of results to skip.
    #[serde(rename = "S")]
    pub skip: Option<u32>,
}

/// Search-query options used by the change and account query endpoints.
///
/// Every entry of `query` is sent as its own `q` parameter, in order. The
/// `+` and `:` operators in each entry are kept literal on the wire.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryOptions {
    /// One or more search queries.
    #[serde(rename = "q")]
    pub query: Vec<String>,

    /// Maximum number of results to return.
    #[serde(rename = "n")]
    pub limit: Option<u32>,

    /// Number of results to skip.
    pub start: Option<u32>,
}

/// Additional fields requested from change and account endpoints.
///
/// Each value (e.g. `LABELS`, `CURRENT_REVISION`, `DETAILED_ACCOUNTS`) is
/// sent as its own `o` parameter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeOptions {
    #[serde(rename = "o")]
    pub additional_fields: Vec<String>,
}

impl ChangeOptions {
    /// Builds options from a list of additional field names.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            additional_fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}
