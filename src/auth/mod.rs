//
//  gerrit-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module decides how each outgoing request proves the caller's
//! identity to Gerrit. A client holds at most one credential scheme at a time:
//!
//! - **Basic**: `Authorization: Basic base64(username:password)` using the
//!   account's HTTP password.
//! - **Cookie**: a session cookie (usually `GerritAccount`) copied from a
//!   logged-in browser session.
//! - **Digest**: HTTP Digest challenge-response, for servers configured with
//!   `auth.gitBasicAuthPolicy` variants that reject Basic.
//!
//! Whenever a scheme is active the URL builder prefixes request paths with
//! `a/`, which tells Gerrit to authenticate the request instead of serving it
//! anonymously.
//!
//! ## Module Structure
//!
//! - [`digest`]: Digest challenge parsing and response computation
//! - [`keyring`]: Secure secret storage used by the command-line front end
//!
//! ## Example
//!
//! ```rust,no_run
//! use gerrit_client::api::GerritClient;
//!
//! # async fn example() -> gerrit_client::api::common::Result<()> {
//! let client = GerritClient::new("https://review.example.com/")?;
//! client.authentication().set_digest_auth("jdoe", "http-password");
//!
//! let me = client.accounts().get("self").await?;
//! # Ok(())
//! # }
//! ```

mod digest;
mod keyring;

pub use digest::*;
pub use keyring::*;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use parking_lot::{Mutex, RwLock};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, COOKIE};
use reqwest::{Client, Request, StatusCode};

use crate::api::common::{ApiError, ResponseMeta, Result};

/// The credential scheme a client authenticates with.
///
/// Exactly one variant is active at a time. Setting a new scheme replaces the
/// previous one entirely.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthCredential {
    /// Anonymous access.
    #[default]
    None,

    /// HTTP Basic authentication with the account's HTTP password.
    Basic {
        username: String,
        password: String,
    },

    /// A session cookie sent with every request.
    Cookie {
        /// Cookie name, e.g. `GerritAccount`.
        name: String,
        value: String,
    },

    /// HTTP Digest authentication.
    Digest {
        username: String,
        password: String,
    },
}

impl AuthCredential {
    /// Returns a short, secret-free name of the scheme for logs and output.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic { .. } => "basic",
            Self::Cookie { .. } => "cookie",
            Self::Digest { .. } => "digest",
        }
    }
}

impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Cookie { name, .. } => f
                .debug_struct("Cookie")
                .field("name", name)
                .finish_non_exhaustive(),
            Self::Digest { username, .. } => f
                .debug_struct("Digest")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// A cached Digest challenge and the number of requests signed with it.
#[derive(Debug, Clone)]
struct DigestState {
    challenge: DigestChallenge,
    nonce_count: u32,
    cnonce: String,
}

/// Authentication state shared by all clones of a client.
///
/// The credential and the Digest challenge cache each sit behind their own
/// lock. A challenge is always replaced as a whole, so a concurrent reader
/// sees either the old or the new challenge.
#[derive(Debug, Default)]
pub struct Authentication {
    credential: RwLock<AuthCredential>,
    digest: Mutex<Option<DigestState>>,
}

impl Authentication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate with HTTP Basic credentials.
    pub fn set_basic_auth(&self, username: impl Into<String>, password: impl Into<String>) {
        self.set(AuthCredential::Basic {
            username: username.into(),
            password: password.into(),
        });
    }

    /// Authenticate with a session cookie.
    pub fn set_cookie_auth(&self, name: impl Into<String>, value: impl Into<String>) {
        self.set(AuthCredential::Cookie {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Authenticate with HTTP Digest credentials.
    ///
    /// No challenge is cached yet; the next request performs a preflight.
    pub fn set_digest_auth(&self, username: impl Into<String>, password: impl Into<String>) {
        self.set(AuthCredential::Digest {
            username: username.into(),
            password: password.into(),
        });
    }

    /// Replace the active scheme.
    pub fn set(&self, credential: AuthCredential) {
        tracing::debug!(scheme = credential.scheme(), "authentication scheme set");
        *self.credential.write() = credential;
        *self.digest.lock() = None;
    }

    /// Drop any credentials and go back to anonymous access.
    pub fn reset_auth(&self) {
        self.set(AuthCredential::None);
    }

    /// Returns `true` if any scheme other than [`AuthCredential::None`] is set.
    pub fn has_auth(&self) -> bool {
        !matches!(*self.credential.read(), AuthCredential::None)
    }

    /// Returns a snapshot of the active credential.
    pub fn credential(&self) -> AuthCredential {
        self.credential.read().clone()
    }

    pub(crate) fn is_digest(&self) -> bool {
        matches!(*self.credential.read(), AuthCredential::Digest { .. })
    }

    /// Adds the active credential to `request`.
    ///
    /// Basic and Cookie only set a header. Digest performs a preflight request
    /// with the same method and URL when no challenge is cached yet; if that
    /// preflight does not produce a usable challenge, an
    /// [`ApiError::Authentication`] is returned and `request` is left
    /// unauthenticated so it is never sent.
    pub async fn apply_to(&self, http: &Client, request: &mut Request) -> Result<()> {
        match self.credential() {
            AuthCredential::None => Ok(()),
            AuthCredential::Basic { username, password } => {
                let token = STANDARD.encode(format!("{username}:{password}"));
                let value = sensitive_header(&format!("Basic {token}"))?;
                request.headers_mut().insert(AUTHORIZATION, value);
                Ok(())
            }
            AuthCredential::Cookie { name, value } => {
                let value = sensitive_header(&format!("{name}={value}"))?;
                request.headers_mut().insert(COOKIE, value);
                Ok(())
            }
            AuthCredential::Digest { username, password } => {
                let needs_challenge = self.digest.lock().is_none();
                if needs_challenge {
                    let challenge = self.preflight(http, request).await?;
                    self.store_challenge(challenge);
                }
                self.sign_digest(&username, &password, request)
            }
        }
    }

    /// Re-signs `request` after the server sent a fresh Digest challenge.
    ///
    /// Returns `Ok(true)` if `headers` (from a 401 response) carry a challenge
    /// with a new nonce or `stale=true`, in which case the cache is replaced
    /// and `request` carries a new `Authorization` header. Returns `Ok(false)`
    /// when there is nothing new to answer, i.e. the credentials themselves
    /// were rejected.
    pub(crate) fn rechallenge(
        &self,
        headers: &reqwest::header::HeaderMap,
        request: &mut Request,
    ) -> Result<bool> {
        let AuthCredential::Digest { username, password } = self.credential() else {
            return Ok(false);
        };
        let Some(challenge) = DigestChallenge::from_headers(headers) else {
            return Ok(false);
        };

        let is_fresh = {
            let cached = self.digest.lock();
            match cached.as_ref() {
                Some(state) => challenge.stale || state.challenge.nonce != challenge.nonce,
                None => true,
            }
        };
        if !is_fresh {
            return Ok(false);
        }

        tracing::warn!(realm = %challenge.realm, "digest nonce rejected, answering new challenge");
        self.store_challenge(challenge);
        self.sign_digest(&username, &password, request)?;
        Ok(true)
    }

    fn store_challenge(&self, challenge: DigestChallenge) {
        tracing::debug!(
            realm = %challenge.realm,
            algorithm = %challenge.algorithm,
            "cached digest challenge"
        );
        *self.digest.lock() = Some(DigestState {
            challenge,
            nonce_count: 0,
            cnonce: new_cnonce(),
        });
    }

    fn sign_digest(&self, username: &str, password: &str, request: &mut Request) -> Result<()> {
        let url = request.url();
        let uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let header = {
            let mut cached = self.digest.lock();
            let state = cached.as_mut().ok_or_else(|| ApiError::Authentication {
                message: "no digest challenge available".to_string(),
                response: None,
            })?;
            state.nonce_count = state.nonce_count.wrapping_add(1);
            state.challenge.authorization(
                username,
                password,
                request.method().as_str(),
                &uri,
                state.nonce_count,
                &state.cnonce,
            )
        };

        request
            .headers_mut()
            .insert(AUTHORIZATION, sensitive_header(&header)?);
        Ok(())
    }

    /// Sends the request without credentials or body to elicit a challenge.
    async fn preflight(&self, http: &Client, request: &Request) -> Result<DigestChallenge> {
        tracing::debug!(method = %request.method(), url = %request.url(), "digest preflight");

        let mut probe = Request::new(request.method().clone(), request.url().clone());
        if let Some(accept) = request.headers().get(ACCEPT) {
            probe.headers_mut().insert(ACCEPT, accept.clone());
        }
        *probe.timeout_mut() = request.timeout().copied();

        let response = http
            .execute(probe)
            .await
            .map_err(|e| ApiError::Authentication {
                message: format!("digest preflight to {} failed: {e}", request.url()),
                response: None,
            })?;
        let meta = ResponseMeta::from_response(&response);
        // Drain so the connection can be reused; the body carries nothing we need.
        let _ = response.bytes().await;

        if meta.status != StatusCode::UNAUTHORIZED {
            return Err(ApiError::Authentication {
                message: format!(
                    "digest preflight expected 401 Unauthorized, got {}",
                    meta.status_line()
                ),
                response: Some(meta),
            });
        }

        DigestChallenge::from_headers(&meta.headers).ok_or_else(|| ApiError::Authentication {
            message: "server did not send a usable Digest challenge".to_string(),
            response: Some(meta),
        })
    }
}

fn sensitive_header(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value).map_err(|_| {
        ApiError::Config("credentials contain characters not allowed in HTTP headers".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    fn request(url: &str) -> Request {
        Request::new(Method::GET, url::Url::parse(url).unwrap())
    }

    #[test]
    fn test_setting_a_scheme_replaces_previous() {
        let auth = Authentication::new();
        assert!(!auth.has_auth());

        auth.set_basic_auth("jdoe", "secret");
        assert!(auth.has_auth());
        assert_eq!(auth.credential().scheme(), "basic");

        auth.set_cookie_auth("GerritAccount", "abc");
        assert_eq!(
            auth.credential(),
            AuthCredential::Cookie {
                name: "GerritAccount".to_string(),
                value: "abc".to_string()
            }
        );

        auth.reset_auth();
        assert!(!auth.has_auth());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let cred = AuthCredential::Basic {
            username: "jdoe".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{cred:?}");
        assert!(debug.contains("jdoe"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_basic_header() {
        let auth = Authentication::new();
        auth.set_basic_auth("Aladdin", "open sesame");
        let mut req = request("https://h/a/accounts/self");
        auth.apply_to(&Client::new(), &mut req).await.unwrap();
        assert_eq!(
            req.headers()[AUTHORIZATION],
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[tokio::test]
    async fn test_cookie_header() {
        let auth = Authentication::new();
        auth.set_cookie_auth("GerritAccount", "aSceprtBc");
        let mut req = request("https://h/a/accounts/self");
        auth.apply_to(&Client::new(), &mut req).await.unwrap();
        assert_eq!(req.headers()[COOKIE], "GerritAccount=aSceprtBc");
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_none_is_noop() {
        let auth = Authentication::new();
        let mut req = request("https://h/accounts/self");
        auth.apply_to(&Client::new(), &mut req).await.unwrap();
        assert!(req.headers().is_empty());
    }

    #[test]
    fn test_rechallenge_only_for_new_nonce() {
        let auth = Authentication::new();
        auth.set_digest_auth("jdoe", "secret");
        auth.store_challenge(DigestChallenge::parse(r#"Digest realm="r", nonce="n1", qop="auth""#).unwrap());

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::WWW_AUTHENTICATE,
            HeaderValue::from_static(r#"Digest realm="r", nonce="n1", qop="auth""#),
        );
        let mut req = request("https://h/a/changes/");
        assert!(!auth.rechallenge(&headers, &mut req).unwrap());

        headers.insert(
            reqwest::header::WWW_AUTHENTICATE,
            HeaderValue::from_static(r#"Digest realm="r", nonce="n2", qop="auth""#),
        );
        assert!(auth.rechallenge(&headers, &mut req).unwrap());
        let header = req.headers()[AUTHORIZATION].to_str().unwrap();
        assert!(header.contains(r#"nonce="n2""#));
        assert!(header.contains("nc=00000001"));
        assert!(header.contains(r#"uri="/a/changes/""#));
    }

    #[test]
    fn test_nonce_count_increments() {
        let auth = Authentication::new();
        auth.set_digest_auth("jdoe", "secret");
        auth.store_challenge(DigestChallenge::parse(r#"Digest realm="r", nonce="n", qop="auth""#).unwrap());

        let mut first = request("https://h/a/changes/?q=is:open");
        auth.sign_digest("jdoe", "secret", &mut first).unwrap();
        let mut second = request("https://h/a/changes/");
        auth.sign_digest("jdoe", "secret", &mut second).unwrap();

        let first = first.headers()[AUTHORIZATION].to_str().unwrap().to_string();
        assert!(first.contains("nc=00000001"));
        assert!(first.contains(r#"uri="/a/changes/?q=is:open""#));
        assert!(second.headers()[AUTHORIZATION].to_str().unwrap().contains("nc=00000002"));
    }
}
