//
//  gerrit-client
//  api/changes.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gerrit Change API
//!
//! A change is a single commit under review, together with its patch sets
//! (revisions), reviewers, votes and comments.
//!
//! ## Change Identifiers
//!
//! Every `id` argument accepts any identifier Gerrit understands:
//!
//! - the numeric change number (`4247`)
//! - the triplet `project~branch~Change-Id`
//! - the Change-Id alone, if it is unique
//!
//! The identifier is escaped as one path segment, so project names containing
//! `/` are safe inside triplets.
//!
//! ## Revision Identifiers
//!
//! `revision` arguments accept `current`, a patch set number, or a commit SHA.
//!
//! ## Change Workflow
//!
//! ```text
//! NEW ──(submit)──> MERGED
//!  │
//!  └──(abandon)──> ABANDONED ──(restore)──> NEW
//! ```
//!
//! Actions not allowed in the current state (abandoning a merged change,
//! submitting without the required votes) fail with `409 Conflict`; the
//! server's explanation is available through
//! [`ApiError::detail`](super::ApiError::detail).

use std::collections::BTreeMap;

use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::AsyncWrite;

use super::common::{AccountInfo, ChangeOptions, GitPersonInfo, QueryOptions, Result, Timestamp};
use super::url::escape_segment;
use super::GerritClient;

/// A change as returned by the query and get endpoints.
///
/// Optional sections (`labels`, `revisions`, `messages`) are only present
/// when requested through [`ChangeOptions`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeInfo {
    /// The `project~branch~Change-Id` triplet.
    pub id: String,
    pub project: String,
    pub branch: String,
    #[serde(default)]
    pub topic: Option<String>,
    pub change_id: String,
    pub subject: String,
    /// `NEW`, `MERGED` or `ABANDONED`.
    pub status: String,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub updated: Option<Timestamp>,
    #[serde(default)]
    pub submitted: Option<Timestamp>,
    #[serde(default)]
    pub mergeable: Option<bool>,
    #[serde(default)]
    pub insertions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub unresolved_comment_count: Option<u32>,
    #[serde(rename = "_number")]
    pub number: u64,
    pub owner: AccountInfo,
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Label name to label details; the shape depends on `LABELS` and
    /// `DETAILED_LABELS`.
    #[serde(default)]
    pub labels: BTreeMap<String, Value>,
    #[serde(default)]
    pub current_revision: Option<String>,
    #[serde(default)]
    pub revisions: BTreeMap<String, RevisionInfo>,
    #[serde(default)]
    pub messages: Vec<ChangeMessageInfo>,
    /// Set on the last entry of a query result when more results exist.
    #[serde(rename = "_more_changes", default)]
    pub more_changes: bool,
}

/// A patch set of a change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionInfo {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(rename = "_number")]
    pub number: u32,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub uploader: Option<AccountInfo>,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub commit: Option<CommitInfo>,
}

/// A Git commit.
///
/// Parent commits only carry `commit` and `subject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub parents: Vec<CommitInfo>,
    #[serde(default)]
    pub author: Option<GitPersonInfo>,
    #[serde(default)]
    pub committer: Option<GitPersonInfo>,
    pub subject: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// A message posted on a change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeMessageInfo {
    pub id: String,
    #[serde(default)]
    pub author: Option<AccountInfo>,
    pub date: Timestamp,
    pub message: String,
    #[serde(rename = "_revision_number", default)]
    pub revision_number: Option<u32>,
}

/// A reviewer of a change and the votes they cast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerInfo {
    #[serde(flatten)]
    pub account: AccountInfo,
    #[serde(default)]
    pub approvals: BTreeMap<String, String>,
}

/// Body of an add-reviewer request.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewerInput {
    /// Account or group identifier.
    pub reviewer: String,
    /// `REVIEWER` (default) or `CC`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Confirms adding a large group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
}

/// Outcome of an add-reviewer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddReviewerResult {
    pub input: String,
    #[serde(default)]
    pub reviewers: Vec<ReviewerInfo>,
    #[serde(default)]
    pub ccs: Vec<ReviewerInfo>,
    #[serde(default)]
    pub error: Option<String>,
    /// Set when adding a group needs confirmation.
    #[serde(default)]
    pub confirm: Option<bool>,
}

/// A new inline comment in a review.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<bool>,
}

/// Body of a set-review request: a message, votes and inline comments.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Label name to vote, e.g. `Code-Review: 2`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, i32>,
    /// File path to comments on that file.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub comments: BTreeMap<String, Vec<CommentInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// `NONE`, `OWNER`, `OWNER_REVIEWERS` or `ALL`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ready: bool,
}

/// Outcome of a set-review request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(default)]
    pub labels: BTreeMap<String, i32>,
    #[serde(default)]
    pub reviewers: BTreeMap<String, Value>,
    #[serde(default)]
    pub ready: bool,
}

/// A published inline comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentInfo {
    pub id: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub patch_set: Option<u32>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub in_reply_to: Option<String>,
    #[serde(default)]
    pub updated: Option<Timestamp>,
    #[serde(default)]
    pub author: Option<AccountInfo>,
    #[serde(default)]
    pub unresolved: Option<bool>,
}

/// Body of a change creation request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeInput {
    pub project: String,
    pub branch: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// `NEW` (default) or `DRAFT` on old servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_change: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub work_in_progress: bool,
}

/// Body of abandon, restore and revert requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
}

/// Body of a rebase request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RebaseInput {
    /// New parent; the tip of the target branch when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

/// Body of a submit request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmitInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct TopicInput<'a> {
    topic: &'a str,
}

/// Body of a commit message update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommitMessageInput {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
}

/// Branches and tags a merged change is included in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludedInInfo {
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub external: BTreeMap<String, Vec<String>>,
}

/// Query parameters of the change query endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryChangeOptions {
    #[serde(flatten)]
    pub query: QueryOptions,
    #[serde(flatten)]
    pub fields: ChangeOptions,
}

impl QueryChangeOptions {
    /// Options for a single search query, e.g. `status:open+owner:self`.
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: QueryOptions {
                query: vec![query.into()],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Limit the number of results.
    pub fn limit(mut self, limit: u32) -> Self {
        self.query.limit = Some(limit);
        self
    }
}

/// Changes API client.
pub struct ChangesApi {
    client: GerritClient,
}

impl ChangesApi {
    pub(crate) fn new(client: GerritClient) -> Self {
        Self { client }
    }

    fn path(id: &str, rest: &str) -> String {
        format!("changes/{}{rest}", escape_segment(id))
    }

    fn revision_path(id: &str, revision: &str, rest: &str) -> String {
        Self::path(id, &format!("/revisions/{}{rest}", escape_segment(revision)))
    }

    /// Search changes with one query.
    ///
    /// Use [`query_many`](Self::query_many) when `options` holds more than
    /// one `q` entry; Gerrit then answers with one list per query.
    pub async fn query(&self, options: &QueryChangeOptions) -> Result<Vec<ChangeInfo>> {
        self.client.get_with_query("changes/", options).await
    }

    /// Search changes with several queries at once.
    pub async fn query_many(&self, options: &QueryChangeOptions) -> Result<Vec<Vec<ChangeInfo>>> {
        self.client.get_with_query("changes/", options).await
    }

    pub async fn get(&self, id: &str, options: &ChangeOptions) -> Result<ChangeInfo> {
        self.client.get_with_query(&Self::path(id, ""), options).await
    }

    /// Get a change with labels, detailed accounts and messages.
    pub async fn get_detail(&self, id: &str, options: &ChangeOptions) -> Result<ChangeInfo> {
        self.client
            .get_with_query(&Self::path(id, "/detail"), options)
            .await
    }

    pub async fn create(&self, input: &ChangeInput) -> Result<ChangeInfo> {
        self.client.post("changes/", input).await
    }

    /// The topic of a change; empty if none is set.
    pub async fn get_topic(&self, id: &str) -> Result<String> {
        let topic: Option<String> = self.client.get(&Self::path(id, "/topic")).await?;
        Ok(topic.unwrap_or_default())
    }

    pub async fn set_topic(&self, id: &str, topic: &str) -> Result<String> {
        let topic: Option<String> = self
            .client
            .put(&Self::path(id, "/topic"), &TopicInput { topic })
            .await?;
        Ok(topic.unwrap_or_default())
    }

    pub async fn delete_topic(&self, id: &str) -> Result<()> {
        self.client.delete(&Self::path(id, "/topic")).await
    }

    pub async fn abandon(&self, id: &str, input: &ActionInput) -> Result<ChangeInfo> {
        self.client.post(&Self::path(id, "/abandon"), input).await
    }

    pub async fn restore(&self, id: &str, input: &ActionInput) -> Result<ChangeInfo> {
        self.client.post(&Self::path(id, "/restore"), input).await
    }

    pub async fn rebase(&self, id: &str, input: &RebaseInput) -> Result<ChangeInfo> {
        self.client.post(&Self::path(id, "/rebase"), input).await
    }

    /// Create a change reverting `id`. Returns the new change.
    pub async fn revert(&self, id: &str, input: &ActionInput) -> Result<ChangeInfo> {
        self.client.post(&Self::path(id, "/revert"), input).await
    }

    pub async fn submit(&self, id: &str, input: &SubmitInput) -> Result<ChangeInfo> {
        self.client.post(&Self::path(id, "/submit"), input).await
    }

    pub async fn list_reviewers(&self, id: &str) -> Result<Vec<ReviewerInfo>> {
        self.client.get(&Self::path(id, "/reviewers/")).await
    }

    pub async fn add_reviewer(&self, id: &str, input: &ReviewerInput) -> Result<AddReviewerResult> {
        self.client.post(&Self::path(id, "/reviewers"), input).await
    }

    pub async fn delete_reviewer(&self, id: &str, account: &str) -> Result<()> {
        let rest = format!("/reviewers/{}", escape_segment(account));
        self.client.delete(&Self::path(id, &rest)).await
    }

    /// Post a review (message, votes, inline comments) on a revision.
    pub async fn set_review(&self, id: &str, revision: &str, input: &ReviewInput) -> Result<ReviewResult> {
        self.client
            .post(&Self::revision_path(id, revision, "/review"), input)
            .await
    }

    pub async fn get_commit(&self, id: &str, revision: &str) -> Result<CommitInfo> {
        self.client
            .get(&Self::revision_path(id, revision, "/commit"))
            .await
    }

    /// Published comments of all revisions, keyed by file path.
    pub async fn list_comments(&self, id: &str) -> Result<BTreeMap<String, Vec<CommentInfo>>> {
        self.client.get(&Self::path(id, "/comments")).await
    }

    /// The revision as a base64-encoded patch, exactly as the server sent it.
    pub async fn get_revision_patch(&self, id: &str, revision: &str) -> Result<Bytes> {
        self.client
            .get_raw(&Self::revision_path(id, revision, "/patch"))
            .await
    }

    /// Streams the base64-encoded patch into `sink`. Returns the bytes written.
    pub async fn download_revision_patch<W>(&self, id: &str, revision: &str, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let request = self
            .client
            .new_request::<()>(Method::GET, &Self::revision_path(id, revision, "/patch"), None)
            .await?;
        Ok(self.client.execute_into(request, sink).await?.data)
    }

    /// Replace the commit message, creating a new patch set.
    pub async fn set_commit_message(&self, id: &str, input: &CommitMessageInput) -> Result<()> {
        let request = self
            .client
            .new_request(Method::PUT, &Self::path(id, "/message"), Some(input))
            .await?;
        self.client.execute_empty(request).await?;
        Ok(())
    }

    /// Write `content` to `path` in the change edit.
    pub async fn put_edit_file(&self, id: &str, path: &str, content: impl Into<Bytes>) -> Result<()> {
        let rest = format!("/edit/{}", escape_segment(path));
        self.client.put_raw(&Self::path(id, &rest), content).await
    }

    pub async fn delete_change(&self, id: &str) -> Result<()> {
        self.client.delete(&Self::path(id, "")).await
    }

    pub async fn get_included_in(&self, id: &str) -> Result<IncludedInInfo> {
        self.client.get(&Self::path(id, "/in")).await
    }
}
