//
//  gerrit-client
//  api/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gerrit Project API
//!
//! Projects are Git repositories hosted by Gerrit. Every project except
//! `All-Projects` inherits access rights from a parent project.
//!
//! ## API Endpoints
//!
//! ```text
//! GET                 /projects/
//! GET/PUT             /projects/{name}
//! GET/PUT/DELETE      /projects/{name}/description
//! GET/PUT             /projects/{name}/parent
//! GET/PUT             /projects/{name}/HEAD
//! GET                 /projects/{name}/branches/
//! GET/PUT/DELETE      /projects/{name}/branches/{branch}
//! GET                 /projects/{name}/tags/
//! GET                 /projects/{name}/tags/{tag}
//! GET                 /projects/{name}/config
//! POST                /projects/{name}/gc
//! ```
//!
//! Project names may contain `/` (e.g. `plugins/replication`); they are
//! escaped to `%2F` as a single path segment.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gerrit_client::api::GerritClient;
//! use gerrit_client::api::projects::ProjectOptions;
//!
//! # async fn example() -> gerrit_client::api::common::Result<()> {
//! let client = GerritClient::new("https://review.example.com/")?;
//! let options = ProjectOptions {
//!     regex: Some("(arch|benchmarks)".to_string()),
//!     ..Default::default()
//! };
//! for (name, project) in client.projects().list(&options).await? {
//!     println!("{name}: {}", project.description.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{GitPersonInfo, ListOptions, Result, WebLinkInfo};
use super::url::escape_segment;
use super::GerritClient;

/// A Gerrit project.
///
/// # Fields
///
/// * `id` - URL-encoded project name
/// * `name` - Project name; omitted when it is the key of a map
/// * `parent` - Name of the parent project
/// * `state` - `ACTIVE`, `READ_ONLY` or `HIDDEN`
/// * `branches` - Branch name to revision, when requested with `b`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub branches: BTreeMap<String, String>,
    /// Label definitions; the shape varies between Gerrit versions.
    #[serde(default)]
    pub labels: Option<Value>,
    #[serde(default)]
    pub web_links: Vec<WebLinkInfo>,
}

/// Query parameters of the project list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectOptions {
    #[serde(flatten)]
    pub list: ListOptions,

    /// Include the revisions of these branches.
    #[serde(rename = "b")]
    pub branches: Vec<String>,

    /// Include project descriptions.
    #[serde(rename = "d")]
    pub description: bool,

    /// Only projects whose name starts with this prefix.
    #[serde(rename = "p")]
    pub prefix: Option<String>,

    /// Only projects whose name matches this regular expression.
    #[serde(rename = "r")]
    pub regex: Option<String>,

    /// Only projects whose name contains this substring.
    #[serde(rename = "m")]
    pub substring: Option<String>,

    /// Include parent/child relationships.
    pub tree: bool,

    /// `ALL`, `CODE` or `PERMISSIONS`.
    #[serde(rename = "type")]
    pub project_type: Option<String>,

    /// `ACTIVE`, `READ_ONLY` or `HIDDEN`.
    #[serde(rename = "s")]
    pub state: Option<String>,
}

/// Body of a project creation request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub permissions_only: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub create_empty_commit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
}

/// Body of a description update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DescriptionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

/// Body of a parent update.
#[derive(Debug, Clone, Serialize)]
pub struct ParentInput {
    pub parent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

/// Body of a HEAD update.
#[derive(Debug, Clone, Serialize)]
pub struct HeadInput {
    #[serde(rename = "ref")]
    pub reference: String,
}

/// A branch of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchInfo {
    #[serde(rename = "ref")]
    pub reference: String,
    pub revision: String,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub web_links: Vec<WebLinkInfo>,
}

/// Query parameters of the branch and tag list endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BranchOptions {
    #[serde(flatten)]
    pub list: ListOptions,

    /// Only refs containing this substring.
    #[serde(rename = "m")]
    pub substring: Option<String>,

    /// Only refs matching this regular expression.
    #[serde(rename = "r")]
    pub regex: Option<String>,
}

/// Body of a branch creation request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BranchInput {
    /// Commit, branch or tag the new branch points at. Defaults to `HEAD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

/// A tag of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    #[serde(rename = "ref")]
    pub reference: String,
    pub revision: String,
    /// The tagged object, for annotated tags.
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tagger: Option<GitPersonInfo>,
}

/// Project configuration as returned by `GET /projects/{name}/config`.
///
/// Only the commonly used keys are typed; everything else is kept in
/// `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub submit_type: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Body of a garbage collection request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GcInput {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show_progress: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub aggressive: bool,
}

/// Projects API client.
pub struct ProjectsApi {
    client: GerritClient,
}

impl ProjectsApi {
    pub(crate) fn new(client: GerritClient) -> Self {
        Self { client }
    }

    fn path(name: &str, rest: &str) -> String {
        format!("projects/{}{rest}", escape_segment(name))
    }

    /// List projects visible to the caller, keyed by name.
    pub async fn list(&self, options: &ProjectOptions) -> Result<BTreeMap<String, ProjectInfo>> {
        self.client.get_with_query("projects/", options).await
    }

    /// Get a single project.
    pub async fn get(&self, name: &str) -> Result<ProjectInfo> {
        self.client.get(&Self::path(name, "")).await
    }

    /// Create a project.
    pub async fn create(&self, name: &str, input: &ProjectInput) -> Result<ProjectInfo> {
        self.client.put(&Self::path(name, ""), input).await
    }

    pub async fn get_description(&self, name: &str) -> Result<String> {
        let description: Option<String> = self.client.get(&Self::path(name, "/description")).await?;
        Ok(description.unwrap_or_default())
    }

    /// Set the description. Returns the new description.
    pub async fn set_description(&self, name: &str, input: &DescriptionInput) -> Result<String> {
        let description: Option<String> = self
            .client
            .put(&Self::path(name, "/description"), input)
            .await?;
        Ok(description.unwrap_or_default())
    }

    pub async fn delete_description(&self, name: &str) -> Result<()> {
        self.client.delete(&Self::path(name, "/description")).await
    }

    pub async fn get_parent(&self, name: &str) -> Result<String> {
        self.client.get(&Self::path(name, "/parent")).await
    }

    /// Reparent a project. Returns the new parent name.
    pub async fn set_parent(&self, name: &str, input: &ParentInput) -> Result<String> {
        self.client.put(&Self::path(name, "/parent"), input).await
    }

    /// The ref `HEAD` points at, e.g. `refs/heads/master`.
    pub async fn get_head(&self, name: &str) -> Result<String> {
        self.client.get(&Self::path(name, "/HEAD")).await
    }

    pub async fn set_head(&self, name: &str, input: &HeadInput) -> Result<String> {
        self.client.put(&Self::path(name, "/HEAD"), input).await
    }

    pub async fn list_branches(&self, name: &str, options: &BranchOptions) -> Result<Vec<BranchInfo>> {
        self.client
            .get_with_query(&Self::path(name, "/branches/"), options)
            .await
    }

    pub async fn get_branch(&self, name: &str, branch: &str) -> Result<BranchInfo> {
        let rest = format!("/branches/{}", escape_segment(branch));
        self.client.get(&Self::path(name, &rest)).await
    }

    pub async fn create_branch(&self, name: &str, branch: &str, input: &BranchInput) -> Result<BranchInfo> {
        let rest = format!("/branches/{}", escape_segment(branch));
        self.client.put(&Self::path(name, &rest), input).await
    }

    pub async fn delete_branch(&self, name: &str, branch: &str) -> Result<()> {
        let rest = format!("/branches/{}", escape_segment(branch));
        self.client.delete(&Self::path(name, &rest)).await
    }

    pub async fn list_tags(&self, name: &str, options: &BranchOptions) -> Result<Vec<TagInfo>> {
        self.client
            .get_with_query(&Self::path(name, "/tags/"), options)
            .await
    }

    pub async fn get_tag(&self, name: &str, tag: &str) -> Result<TagInfo> {
        let rest = format!("/tags/{}", escape_segment(tag));
        self.client.get(&Self::path(name, &rest)).await
    }

    pub async fn get_config(&self, name: &str) -> Result<ConfigInfo> {
        self.client.get(&Self::path(name, "/config")).await
    }

    /// Run Git garbage collection. Returns the plain-text progress output.
    pub async fn run_gc(&self, name: &str, input: &GcInput) -> Result<String> {
        let request = self
            .client
            .new_request(Method::POST, &Self::path(name, "/gc"), Some(input))
            .await?;
        let body: Bytes = self.client.execute_raw(request).await?.data;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_list_with_description() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/projects/")
            .match_query(Matcher::Exact("d=true&n=2".into()))
            .with_status(200)
            .with_body(
                ")]}'\n{\"external/bison\":{\"id\":\"external%2Fbison\",\"description\":\"GNU parser generator\"},\"gerrit\":{\"id\":\"gerrit\",\"state\":\"ACTIVE\"}}",
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let options = ProjectOptions {
            list: ListOptions {
                limit: Some(2),
                skip: None,
            },
            description: true,
            ..Default::default()
        };
        let projects = client.projects().list(&options).await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(
            projects["external/bison"].description.as_deref(),
            Some("GNU parser generator")
        );
        assert_eq!(projects["gerrit"].state.as_deref(), Some("ACTIVE"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_branch_name_is_escaped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/projects/plugins%2Freplication/branches/refs%2Fheads%2Fstable-3.9")
            .with_status(200)
            .with_body(")]}'\n{\"ref\":\"refs/heads/stable-3.9\",\"revision\":\"67ebf73496383c6777035e374d2d664009e2aa5c\"}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let branch = client
            .projects()
            .get_branch("plugins/replication", "refs/heads/stable-3.9")
            .await
            .unwrap();
        assert_eq!(branch.reference, "refs/heads/stable-3.9");
        assert!(!branch.can_delete);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_description_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/projects/gerrit/description")
            .match_body(Matcher::Json(serde_json::json!({"description": "Code review"})))
            .with_status(200)
            .with_body(")]}'\n\"Code review\"")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let input = DescriptionInput {
            description: Some("Code review".to_string()),
            commit_message: None,
        };
        let description = client
            .projects()
            .set_description("gerrit", &input)
            .await
            .unwrap();
        assert_eq!(description, "Code review");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_deleted_description_reads_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/projects/gerrit/description")
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        assert_eq!(client.projects().get_description("gerrit").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_run_gc_returns_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/projects/gerrit/gc")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("collecting garbage for \"gerrit\":\ndone.\n")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let output = client
            .projects()
            .run_gc("gerrit", &GcInput::default())
            .await
            .unwrap();
        assert!(output.ends_with("done.\n"));
    }

    #[test]
    fn test_config_keeps_unknown_keys() {
        let config: ConfigInfo = serde_json::from_str(
            r#"{"description":"demo","use_contributor_agreements":{"value":true}}"#,
        )
        .unwrap();
        assert_eq!(config.description.as_deref(), Some("demo"));
        assert!(config.extra.contains_key("use_contributor_agreements"));
    }
}
