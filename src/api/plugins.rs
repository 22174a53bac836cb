//
//  gerrit-client
//  api/plugins.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gerrit Plugin API
//!
//! Listing, installing and toggling server plugins. All operations except
//! listing require the `Administrate Server` capability.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{ListOptions, Result};
use super::url::escape_segment;
use super::GerritClient;

/// An installed plugin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginInfo {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub index_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Query parameters of the plugin list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PluginOptions {
    #[serde(flatten)]
    pub list: ListOptions,
    /// Include disabled plugins.
    pub all: bool,
    #[serde(rename = "p")]
    pub prefix: Option<String>,
    #[serde(rename = "m")]
    pub substring: Option<String>,
    #[serde(rename = "r")]
    pub regex: Option<String>,
}

/// Body of a plugin installation request.
#[derive(Debug, Clone, Serialize)]
pub struct PluginInput {
    /// URL the server downloads the plugin jar from.
    pub url: String,
}

/// Plugins API client.
pub struct PluginsApi {
    client: GerritClient,
}

impl PluginsApi {
    pub(crate) fn new(client: GerritClient) -> Self {
        Self { client }
    }

    fn path(id: &str, rest: &str) -> String {
        format!("plugins/{}{rest}", escape_segment(id))
    }

    pub async fn list(&self, options: &PluginOptions) -> Result<BTreeMap<String, PluginInfo>> {
        self.client.get_with_query("plugins/", options).await
    }

    pub async fn get_status(&self, id: &str) -> Result<PluginInfo> {
        self.client.get(&Self::path(id, "/gerrit~status")).await
    }

    /// Install or replace a plugin from a URL.
    pub async fn install(&self, id: &str, input: &PluginInput) -> Result<PluginInfo> {
        self.client.put(&Self::path(id, ".jar"), input).await
    }

    pub async fn enable(&self, id: &str) -> Result<PluginInfo> {
        self.client.post_empty(&Self::path(id, "/gerrit~enable")).await
    }

    pub async fn disable(&self, id: &str) -> Result<PluginInfo> {
        self.client.post_empty(&Self::path(id, "/gerrit~disable")).await
    }

    pub async fn reload(&self, id: &str) -> Result<PluginInfo> {
        self.client.post_empty(&Self::path(id, "/gerrit~reload")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_list_all_plugins() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/plugins/")
            .match_query(Matcher::Exact("all=true".into()))
            .with_status(200)
            .with_body(
                ")]}'\n{\"delete-project\":{\"id\":\"delete-project\",\"version\":\"2.9\",\"index_url\":\"plugins/delete-project/\",\"filename\":\"delete-project.jar\"},\"reviewnotes\":{\"id\":\"reviewnotes\",\"disabled\":true}}",
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let options = PluginOptions {
            all: true,
            ..Default::default()
        };
        let plugins = client.plugins().list(&options).await.unwrap();
        assert_eq!(plugins["delete-project"].version.as_deref(), Some("2.9"));
        assert!(plugins["reviewnotes"].disabled);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_install_from_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/plugins/delete-project.jar")
            .match_body(Matcher::Json(serde_json::json!({
                "url": "https://example.com/delete-project-2.8.jar"
            })))
            .with_status(201)
            .with_body(")]}'\n{\"id\":\"delete-project\",\"version\":\"2.8\"}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let input = PluginInput {
            url: "https://example.com/delete-project-2.8.jar".to_string(),
        };
        let plugin = client
            .plugins()
            .install("delete-project", &input)
            .await
            .unwrap();
        assert_eq!(plugin.id, "delete-project");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_enable_uses_view_suffix() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/plugins/reviewnotes/gerrit~enable")
            .with_status(200)
            .with_body(")]}'\n{\"id\":\"reviewnotes\"}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let plugin = client.plugins().enable("reviewnotes").await.unwrap();
        assert!(!plugin.disabled);
        mock.assert_async().await;
    }
}
