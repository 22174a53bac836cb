//
//  gerrit-client
//  api/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gerrit Server Config API
//!
//! Server version and capabilities, caches, background tasks and defaults.
//! Everything below `config/server/` except the version and server info
//! requires administrator rights.
//!
//! ## API Endpoints
//!
//! ```text
//! GET     /config/server/version
//! GET     /config/server/info
//! GET     /config/server/caches/
//! GET     /config/server/caches/{name}
//! POST    /config/server/caches/{name}/flush
//! GET     /config/server/tasks/
//! GET/DEL /config/server/tasks/{id}
//! GET     /config/server/preferences
//! GET     /config/server/summary
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Number, Result, Timestamp};
use super::url::escape_segment;
use super::GerritClient;

/// Server configuration relevant to clients.
///
/// The sections are large and version dependent; they are kept as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub auth: Value,
    #[serde(default)]
    pub change: Value,
    #[serde(default)]
    pub download: Value,
    #[serde(default)]
    pub gerrit: Value,
    #[serde(default)]
    pub suggest: Value,
    #[serde(default)]
    pub user: Value,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Statistics of a server cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheInfo {
    #[serde(default)]
    pub name: Option<String>,
    /// `MEM` or `DISK`.
    #[serde(rename = "type", default)]
    pub cache_type: Option<String>,
    #[serde(default)]
    pub entries: CacheEntriesInfo,
    #[serde(default)]
    pub average_get: Option<String>,
    #[serde(default)]
    pub hit_ratio: Value,
}

/// Entry counts of a cache; older servers send the counts as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheEntriesInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<Number>,
    /// Disk space used, e.g. `4.52m`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
}

/// A background task in the server's work queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: String,
    pub state: String,
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    #[serde(default)]
    pub delay: i64,
    pub command: String,
    #[serde(default)]
    pub remote_name: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
}

/// Config API client.
pub struct ConfigApi {
    client: GerritClient,
}

impl ConfigApi {
    pub(crate) fn new(client: GerritClient) -> Self {
        Self { client }
    }

    /// The Gerrit version string, e.g. `3.9.1`.
    pub async fn get_version(&self) -> Result<String> {
        self.client.get("config/server/version").await
    }

    pub async fn get_server_info(&self) -> Result<ServerInfo> {
        self.client.get("config/server/info").await
    }

    /// All caches keyed by name.
    pub async fn list_caches(&self) -> Result<BTreeMap<String, CacheInfo>> {
        self.client.get("config/server/caches/").await
    }

    pub async fn get_cache(&self, name: &str) -> Result<CacheInfo> {
        self.client
            .get(&format!("config/server/caches/{}", escape_segment(name)))
            .await
    }

    pub async fn flush_cache(&self, name: &str) -> Result<()> {
        let path = format!("config/server/caches/{}/flush", escape_segment(name));
        let _: Value = self.client.post_empty(&path).await?;
        Ok(())
    }

    pub async fn list_tasks(&self) -> Result<Vec<TaskInfo>> {
        self.client.get("config/server/tasks/").await
    }

    pub async fn get_task(&self, id: &str) -> Result<TaskInfo> {
        self.client
            .get(&format!("config/server/tasks/{}", escape_segment(id)))
            .await
    }

    /// Kill a task.
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.client
            .delete(&format!("config/server/tasks/{}", escape_segment(id)))
            .await
    }

    pub async fn get_default_user_preferences(&self) -> Result<BTreeMap<String, Value>> {
        self.client.get("config/server/preferences").await
    }

    /// Task, memory and thread summary of the server.
    pub async fn get_summary(&self) -> Result<Value> {
        self.client.get("config/server/summary").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_version() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/config/server/version")
            .with_status(200)
            .with_body(")]}'\n\"3.9.1\"")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        assert_eq!(client.config().get_version().await.unwrap(), "3.9.1");
    }

    #[tokio::test]
    async fn test_flush_cache_accepts_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/config/server/caches/projects/flush")
            .with_status(200)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        client.config().flush_cache("projects").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_tasks() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/config/server/tasks/")
            .with_status(200)
            .with_body(
                ")]}'\n[{\"id\":\"1e688bea\",\"state\":\"SLEEPING\",\"start_time\":\"2014-06-11 12:58:51.991000000\",\"delay\":3453,\"command\":\"Reload Submit Queue\"}]",
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let tasks = client.config().list_tasks().await.unwrap();
        assert_eq!(tasks[0].state, "SLEEPING");
        assert_eq!(tasks[0].delay, 3453);
    }

    #[test]
    fn test_server_info_keeps_unknown_sections() {
        let info: ServerInfo =
            serde_json::from_str(r#"{"auth":{"auth_type":"LDAP"},"plugin":{"js_resource_paths":[]}}"#)
                .unwrap();
        assert_eq!(info.auth["auth_type"], "LDAP");
        assert!(info.extra.contains_key("plugin"));
    }

    #[test]
    fn test_cache_entries_accept_numbers_and_strings() {
        let cache: CacheInfo = serde_json::from_str(
            r#"{"name":"projects","entries":{"mem":35,"disk":"12","space":"4.52m"},"average_get":"2.5ms"}"#,
        )
        .unwrap();
        assert_eq!(cache.entries.mem.and_then(|n| n.as_i64()), Some(35));
        assert_eq!(cache.entries.disk.as_ref().map(Number::as_str), Some("12"));
        assert_eq!(cache.entries.space.as_deref(), Some("4.52m"));
    }
}
