//
//  gerrit-client
//  auth/digest.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Digest Authentication
//!
//! Gerrit installations that authenticate REST calls with the HTTP password
//! may require Digest rather than Basic authentication. Digest is a
//! challenge-response scheme:
//!
//! 1. The client sends a request without credentials.
//! 2. The server answers `401` with a `WWW-Authenticate: Digest ...` challenge
//!    carrying a realm, a nonce and the hash algorithm.
//! 3. The client answers the challenge by hashing its credentials together
//!    with the nonce, the method and the request URI, and sends the result in
//!    an `Authorization: Digest ...` header.
//!
//! This module parses challenges and computes responses as described in
//! RFC 7616 (which supersedes RFC 2617). It supports `MD5`, `MD5-sess`,
//! `SHA-256` and `SHA-256-sess`, with `qop=auth` or without `qop`.
//!
//! ## Example
//!
//! ```rust
//! use gerrit_client::auth::DigestChallenge;
//!
//! let challenge = DigestChallenge::parse(
//!     r#"Digest realm="testrealm@host.com", qop="auth", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093""#,
//! ).unwrap();
//!
//! let header = challenge.authorization(
//!     "Mufasa", "Circle Of Life", "GET", "/dir/index.html", 1, "0a4f113b",
//! );
//! assert!(header.contains(r#"response="6629fae49393a05397450978507c4ef1""#));
//! ```

use std::collections::HashMap;
use std::fmt;

use md5::Md5;
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Matches `key=value` and `key="quoted value"` pairs of a challenge.
static PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z0-9_-]+)\s*=\s*(?:"((?:[^"\\]|\\.)*)"|([^,\s]*))"#)
        .unwrap()
});

/// Hash algorithm requested by a Digest challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    Md5Sess,
    Sha256,
    Sha256Sess,
}

impl DigestAlgorithm {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "MD5" => Some(Self::Md5),
            "MD5-SESS" => Some(Self::Md5Sess),
            "SHA-256" => Some(Self::Sha256),
            "SHA-256-SESS" => Some(Self::Sha256Sess),
            _ => None,
        }
    }

    fn is_session(self) -> bool {
        matches!(self, Self::Md5Sess | Self::Sha256Sess)
    }

    fn hash(self, data: &str) -> String {
        match self {
            Self::Md5 | Self::Md5Sess => hex::encode(Md5::digest(data.as_bytes())),
            Self::Sha256 | Self::Sha256Sess => hex::encode(Sha256::digest(data.as_bytes())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Md5 => "MD5",
            Self::Md5Sess => "MD5-sess",
            Self::Sha256 => "SHA-256",
            Self::Sha256Sess => "SHA-256-sess",
        })
    }
}

/// A parsed `WWW-Authenticate: Digest` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub opaque: Option<String>,
    pub algorithm: DigestAlgorithm,
    /// `true` when the server offered `qop=auth`; `false` for legacy
    /// RFC 2069 challenges without `qop`.
    pub qop_auth: bool,
    /// Set by the server when the previous nonce expired but the
    /// credentials were otherwise correct.
    pub stale: bool,
}

impl DigestChallenge {
    /// Parses the value of a `WWW-Authenticate` header.
    ///
    /// Returns `None` if the header is not a Digest challenge, lacks a realm
    /// or nonce, names an unknown algorithm, or only offers `qop=auth-int`.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, params) = header.split_once(char::is_whitespace)?;
        if !scheme.eq_ignore_ascii_case("digest") {
            return None;
        }

        let params: HashMap<String, String> = PARAM_RE
            .captures_iter(params)
            .map(|caps| {
                let key = caps[1].to_ascii_lowercase();
                let value = match caps.get(2) {
                    Some(quoted) => quoted.as_str().replace("\\\"", "\"").replace("\\\\", "\\"),
                    None => caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
                };
                (key, value)
            })
            .collect();

        let realm = params.get("realm")?.clone();
        let nonce = params.get("nonce")?.clone();
        let algorithm = match params.get("algorithm") {
            Some(value) => DigestAlgorithm::parse(value)?,
            None => DigestAlgorithm::Md5,
        };

        let qop_auth = match params.get("qop") {
            Some(qop) => {
                if !qop.split(',').map(str::trim).any(|q| q.eq_ignore_ascii_case("auth")) {
                    return None;
                }
                true
            }
            None => false,
        };

        Some(Self {
            realm,
            nonce,
            opaque: params.get("opaque").cloned(),
            algorithm,
            qop_auth,
            stale: params
                .get("stale")
                .is_some_and(|s| s.eq_ignore_ascii_case("true")),
        })
    }

    /// Finds and parses the first Digest challenge among `WWW-Authenticate` headers.
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Option<Self> {
        headers
            .get_all(reqwest::header::WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(Self::parse)
    }

    /// Computes the `Authorization` header value answering this challenge.
    ///
    /// `uri` is the request target (path and query), `nonce_count` the number
    /// of requests already signed with this nonce including this one, and
    /// `cnonce` the client nonce.
    pub fn authorization(
        &self,
        username: &str,
        password: &str,
        method: &str,
        uri: &str,
        nonce_count: u32,
        cnonce: &str,
    ) -> String {
        let algorithm = self.algorithm;
        let nc = format!("{nonce_count:08x}");

        let mut ha1 = algorithm.hash(&format!("{username}:{}:{password}", self.realm));
        if algorithm.is_session() {
            ha1 = algorithm.hash(&format!("{ha1}:{}:{cnonce}", self.nonce));
        }
        let ha2 = algorithm.hash(&format!("{method}:{uri}"));

        let response = if self.qop_auth {
            algorithm.hash(&format!("{ha1}:{}:{nc}:{cnonce}:auth:{ha2}", self.nonce))
        } else {
            algorithm.hash(&format!("{ha1}:{}:{ha2}", self.nonce))
        };

        let mut header = format!(
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}", algorithm={}, response="{}""#,
            quote(username),
            quote(&self.realm),
            quote(&self.nonce),
            quote(uri),
            algorithm,
            response
        );
        if self.qop_auth {
            header.push_str(&format!(r#", qop=auth, nc={nc}, cnonce="{}""#, quote(cnonce)));
        }
        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(r#", opaque="{}""#, quote(opaque)));
        }
        header
    }
}

fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Generates a random client nonce.
pub(crate) fn new_cnonce() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC2617: &str = r#"Digest realm="testrealm@host.com", qop="auth,auth-int", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;

    #[test]
    fn test_parse_challenge() {
        let c = DigestChallenge::parse(RFC2617).unwrap();
        assert_eq!(c.realm, "testrealm@host.com");
        assert_eq!(c.nonce, "dcd98b7102dd2f0e8b11d0f600bfb0c093");
        assert_eq!(c.opaque.as_deref(), Some("5ccc069c403ebaf9f0171e9517f40e41"));
        assert_eq!(c.algorithm, DigestAlgorithm::Md5);
        assert!(c.qop_auth);
        assert!(!c.stale);
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(DigestChallenge::parse(r#"Basic realm="Gerrit Code Review""#).is_none());
        assert!(DigestChallenge::parse(r#"Digest nonce="abc""#).is_none());
        assert!(DigestChallenge::parse(r#"Digest realm="r", nonce="n", algorithm=SHA-512-256"#).is_none());
        assert!(DigestChallenge::parse(r#"Digest realm="r", nonce="n", qop="auth-int""#).is_none());
    }

    #[test]
    fn test_parse_unquoted_and_stale() {
        let c = DigestChallenge::parse(r#"digest realm="r", nonce="n", algorithm=SHA-256, stale=TRUE"#)
            .unwrap();
        assert_eq!(c.algorithm, DigestAlgorithm::Sha256);
        assert!(c.stale);
        assert!(!c.qop_auth);
    }

    #[test]
    fn test_rfc2617_md5_response() {
        let c = DigestChallenge::parse(RFC2617).unwrap();
        let header = c.authorization("Mufasa", "Circle Of Life", "GET", "/dir/index.html", 1, "0a4f113b");
        assert!(header.starts_with(r#"Digest username="Mufasa", realm="testrealm@host.com""#));
        assert!(header.contains(r#"response="6629fae49393a05397450978507c4ef1""#));
        assert!(header.contains("qop=auth, nc=00000001, cnonce=\"0a4f113b\""));
        assert!(header.contains(r#"opaque="5ccc069c403ebaf9f0171e9517f40e41""#));
    }

    #[test]
    fn test_rfc7616_sha256_response() {
        let c = DigestChallenge::parse(
            r#"Digest realm="http-auth@example.org", qop="auth, auth-int", algorithm=SHA-256, nonce="7ypf/xlj9XXwfDPEoM4URrv/xwf94BcCAzFZH4GiTo0v""#,
        )
        .unwrap();
        let header = c.authorization(
            "Mufasa",
            "Circle of Life",
            "GET",
            "/dir/index.html",
            1,
            "f2/wE4q74E6zIJEtWaHKaf5wv/H5QzzpXusqGemxURZJ",
        );
        assert!(header.contains(
            r#"response="753927fa0e85d155564e2e272a28d1802ca10daf4496794697cf8db5856cb6c1""#
        ));
        assert!(header.contains("algorithm=SHA-256"));
    }

    #[test]
    fn test_response_without_qop() {
        let c = DigestChallenge::parse(
            r#"Digest realm="testrealm@host.com", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093""#,
        )
        .unwrap();
        let header = c.authorization("Mufasa", "Circle Of Life", "GET", "/dir/index.html", 1, "x");
        assert!(header.contains(r#"response="670fd8c2df070c60b045671b8b24ff02""#));
        assert!(!header.contains("qop="));
    }

    #[test]
    fn test_cnonce_is_random_hex() {
        let a = new_cnonce();
        let b = new_cnonce();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
