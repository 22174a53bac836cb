//
//  gerrit-client
//  api/events.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Events-Log Plugin API
//!
//! The `events-log` plugin stores stream events and serves them over REST.
//! The response is newline-delimited JSON, one event per line, rather than a
//! single JSON document:
//!
//! ```text
//! {"type":"patchset-created","eventCreatedOn":1400000000,...}
//! {"type":"comment-added","eventCreatedOn":1400000060,...}
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use gerrit_client::api::GerritClient;
//! use gerrit_client::api::events::EventsLogOptions;
//!
//! # async fn example() -> gerrit_client::api::common::Result<()> {
//! let client = GerritClient::new("https://review.example.com/")?;
//! let options = EventsLogOptions {
//!     from: Some(Utc::now() - Duration::hours(1)),
//!     ignore_decode_errors: true,
//!     ..Default::default()
//! };
//! let (events, skipped) = client.events_log().get_events(&options).await?;
//! println!("{} events, {} unreadable lines", events.len(), skipped.len());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{ApiError, ResponseMeta, Result};
use super::response::strip_magic_prefix;
use super::GerritClient;

/// Time format of the `t1` and `t2` parameters.
const EVENTS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A stream event.
///
/// Only the fields common to every event type are typed; the rest of the
/// event (change, patch set, author, ...) is kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInfo {
    /// Event type, e.g. `patchset-created` or `ref-updated`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Seconds since the Unix epoch.
    #[serde(rename = "eventCreatedOn", default)]
    pub created_on: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Options of [`EventsLogApi::get_events`].
#[derive(Debug, Clone, Default)]
pub struct EventsLogOptions {
    /// Only events created at or after this time.
    pub from: Option<DateTime<Utc>>,
    /// Only events created before this time.
    pub to: Option<DateTime<Utc>>,
    /// Collect undecodable lines instead of failing on the first one.
    pub ignore_decode_errors: bool,
}

#[derive(Serialize)]
struct EventsQuery {
    t1: Option<String>,
    t2: Option<String>,
}

impl From<&EventsLogOptions> for EventsQuery {
    fn from(options: &EventsLogOptions) -> Self {
        let format = |t: &DateTime<Utc>| t.format(EVENTS_TIME_FORMAT).to_string();
        Self {
            t1: options.from.as_ref().map(format),
            t2: options.to.as_ref().map(format),
        }
    }
}

/// Events-log API client.
pub struct EventsLogApi {
    client: GerritClient,
}

impl EventsLogApi {
    pub(crate) fn new(client: GerritClient) -> Self {
        Self { client }
    }

    /// Fetch logged events.
    ///
    /// Returns the decoded events and, when `ignore_decode_errors` is set,
    /// the lines that could not be decoded.
    ///
    /// # Errors
    ///
    /// Besides the usual request errors, returns [`ApiError::Decode`] for the
    /// first undecodable line unless `ignore_decode_errors` is set.
    pub async fn get_events(&self, options: &EventsLogOptions) -> Result<(Vec<EventInfo>, Vec<String>)> {
        let query = EventsQuery::from(options);
        let request = self
            .client
            .new_request_with_query::<_, ()>(
                Method::GET,
                "plugins/events-log/events/",
                Some(&query),
                None,
            )
            .await?;
        let response = self.client.execute_raw(request).await?;
        parse_events(&response.meta, &response.data, options.ignore_decode_errors)
    }
}

fn parse_events(
    meta: &ResponseMeta,
    body: &[u8],
    ignore_decode_errors: bool,
) -> Result<(Vec<EventInfo>, Vec<String>)> {
    let body = String::from_utf8_lossy(strip_magic_prefix(body));
    let mut events = Vec::new();
    let mut failures = Vec::new();

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<EventInfo>(line) {
            Ok(event) => events.push(event),
            Err(_) if ignore_decode_errors => failures.push(line.to_string()),
            Err(source) => {
                return Err(ApiError::Decode {
                    response: meta.clone(),
                    source,
                })
            }
        }
    }

    if !failures.is_empty() {
        tracing::warn!(count = failures.len(), "skipped undecodable event lines");
    }
    Ok((events, failures))
}
