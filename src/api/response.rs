//
//  gerrit-client
//  api/response.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Response Handling
//!
//! Gerrit prefixes every JSON response body with the line `)]}'` to defeat
//! cross-site script inclusion. The body must be stripped of that line before
//! it is handed to a JSON parser:
//!
//! ```text
//! )]}'
//! {"id":"arch","name":"arch"}
//! ```
//!
//! This module provides the prefix stripping, JSON decoding into caller types,
//! and [`ApiResponse`], the wrapper that keeps response metadata next to the
//! decoded value.

use serde::de::DeserializeOwned;

use super::common::{ApiError, ResponseMeta, Result};

/// The anti-XSSI line Gerrit puts in front of JSON bodies.
pub const MAGIC_PREFIX: &[u8] = b")]}'";

/// Removes the `)]}'` line from the start of a response body.
///
/// The prefix is only removed when it forms the entire first line. Its line
/// ending (`\n` or `\r\n`) is removed with it. Bodies without the prefix are
/// returned unchanged, so the function is idempotent.
///
/// # Example
///
/// ```rust
/// use gerrit_client::api::response::strip_magic_prefix;
///
/// assert_eq!(strip_magic_prefix(b")]}'\n{\"A\":\"a\"}"), b"{\"A\":\"a\"}");
/// assert_eq!(strip_magic_prefix(b"{\"A\":\"a\"}"), b"{\"A\":\"a\"}");
/// ```
pub fn strip_magic_prefix(body: &[u8]) -> &[u8] {
    let Some(rest) = body.strip_prefix(MAGIC_PREFIX) else {
        return body;
    };

    if let Some(rest) = rest.strip_prefix(b"\r\n") {
        rest
    } else if let Some(rest) = rest.strip_prefix(b"\n") {
        rest
    } else if rest.is_empty() {
        rest
    } else {
        body
    }
}

/// Decodes a (possibly prefixed) JSON body into `T`.
///
/// An empty body decodes as JSON `null`, so `()`, `Option<T>` and
/// `serde_json::Value` destinations accept `204 No Content` responses.
pub(crate) fn decode_json<T: DeserializeOwned>(meta: &ResponseMeta, body: &[u8]) -> Result<T> {
    let body = strip_magic_prefix(body);
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|source| ApiError::Decode {
        response: meta.clone(),
        source,
    })
}

/// A successful response together with its decoded body.
///
/// `T` is the decoded JSON type for [`execute`](super::GerritClient::execute),
/// [`bytes::Bytes`] for [`execute_raw`](super::GerritClient::execute_raw) and
/// `()` for [`execute_empty`](super::GerritClient::execute_empty).
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Status, headers and URL of the response.
    pub meta: ResponseMeta,
    /// The decoded body.
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn status(&self) -> reqwest::StatusCode {
        self.meta.status
    }

    pub fn headers(&self) -> &reqwest::header::HeaderMap {
        &self.meta.headers
    }

    pub fn url(&self) -> &url::Url {
        &self.meta.url
    }

    /// Discards the metadata and returns the decoded body.
    pub fn into_data(self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use std::collections::HashMap;

    fn meta() -> ResponseMeta {
        ResponseMeta {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            url: url::Url::parse("https://h/projects/").unwrap(),
        }
    }

    #[test]
    fn test_strip_magic_prefix() {
        let body = b")]}'\n{\"A\":\"a\"}";
        let stripped = strip_magic_prefix(body);
        assert_eq!(stripped, b"{\"A\":\"a\"}");
        assert_eq!(strip_magic_prefix(stripped), stripped);
    }

    #[test]
    fn test_strip_magic_prefix_crlf() {
        assert_eq!(strip_magic_prefix(b")]}'\r\n[]"), b"[]");
    }

    #[test]
    fn test_strip_requires_whole_first_line() {
        let body = b")]}'garbage\n{}";
        assert_eq!(strip_magic_prefix(body), body);
    }

    #[test]
    fn test_decode_json_with_prefix() {
        let map: HashMap<String, String> =
            decode_json(&meta(), b")]}'\n{\"A\":\"a\"}").unwrap();
        assert_eq!(map.get("A").map(String::as_str), Some("a"));
    }

    #[test]
    fn test_decode_empty_body() {
        let value: Option<String> = decode_json(&meta(), b"").unwrap();
        assert!(value.is_none());
        decode_json::<()>(&meta(), b")]}'\n").unwrap();
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_json::<HashMap<String, String>>(&meta(), b")]}'\n{not json")
            .unwrap_err();
        assert!(err.is_decode());
        assert_eq!(err.status(), Some(StatusCode::OK));
    }
}
