//
//  gerrit-client
//  api/groups.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gerrit Group API
//!
//! Groups collect accounts (and other groups) for access control. A group id
//! is its UUID, its legacy numeric id, or its name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{AccountInfo, ChangeOptions, ListOptions, Result, Timestamp};
use super::url::escape_segment;
use super::GerritClient;

/// A group.
///
/// `members` and `includes` are only filled when requested with the `MEMBERS`
/// and `INCLUDES` options, or by [`GroupsApi::get_detail`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupInfo {
    /// The group UUID, URL-encoded.
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group_id: Option<u64>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub created_on: Option<Timestamp>,
    #[serde(default)]
    pub options: GroupOptionsInfo,
    #[serde(default)]
    pub members: Vec<AccountInfo>,
    #[serde(default)]
    pub includes: Vec<GroupInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupOptionsInfo {
    #[serde(default)]
    pub visible_to_all: bool,
}

/// Query parameters of the group list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListGroupsOptions {
    #[serde(flatten)]
    pub list: ListOptions,
    #[serde(flatten)]
    pub fields: ChangeOptions,
    /// Only groups the caller owns.
    pub owned: bool,
    /// Only groups this account is a member of.
    pub user: Option<String>,
    #[serde(rename = "m")]
    pub substring: Option<String>,
    #[serde(rename = "r")]
    pub regex: Option<String>,
}

/// Query parameters of the member list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListGroupMembersOptions {
    /// Resolve included groups into their members.
    pub recursive: bool,
}

/// Body of a group creation request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to_all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

/// Groups API client.
pub struct GroupsApi {
    client: GerritClient,
}

impl GroupsApi {
    pub(crate) fn new(client: GerritClient) -> Self {
        Self { client }
    }

    fn path(id: &str, rest: &str) -> String {
        format!("groups/{}{rest}", escape_segment(id))
    }

    /// List visible groups, keyed by name.
    pub async fn list(&self, options: &ListGroupsOptions) -> Result<BTreeMap<String, GroupInfo>> {
        self.client.get_with_query("groups/", options).await
    }

    pub async fn get(&self, id: &str) -> Result<GroupInfo> {
        self.client.get(&Self::path(id, "")).await
    }

    /// Get a group with its direct members and included groups.
    pub async fn get_detail(&self, id: &str) -> Result<GroupInfo> {
        self.client.get(&Self::path(id, "/detail")).await
    }

    pub async fn create(&self, name: &str, input: &GroupInput) -> Result<GroupInfo> {
        self.client.put(&Self::path(name, ""), input).await
    }

    pub async fn list_members(&self, id: &str, options: &ListGroupMembersOptions) -> Result<Vec<AccountInfo>> {
        self.client
            .get_with_query(&Self::path(id, "/members/"), options)
            .await
    }

    /// Add an account to the group. Returns the added account.
    pub async fn add_member(&self, id: &str, account: &str) -> Result<AccountInfo> {
        let rest = format!("/members/{}", escape_segment(account));
        self.client.put_empty(&Self::path(id, &rest)).await
    }

    pub async fn remove_member(&self, id: &str, account: &str) -> Result<()> {
        let rest = format!("/members/{}", escape_segment(account));
        self.client.delete(&Self::path(id, &rest)).await
    }

    /// The group that owns this group.
    pub async fn get_owner(&self, id: &str) -> Result<GroupInfo> {
        self.client.get(&Self::path(id, "/owner")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_list_groups_keyed_by_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/groups/")
            .match_query(Matcher::Exact("o=MEMBERS&owned=true".into()))
            .with_status(200)
            .with_body(
                ")]}'\n{\"Administrators\":{\"id\":\"6a1e70e1a88782771a91808c8af9bbb7a9871389\",\"group_id\":1,\"options\":{},\"members\":[{\"_account_id\":1000096}]}}",
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let options = ListGroupsOptions {
            fields: ChangeOptions::with_fields(["MEMBERS"]),
            owned: true,
            ..Default::default()
        };
        let groups = client.groups().list(&options).await.unwrap();
        let admins = &groups["Administrators"];
        assert_eq!(admins.group_id, Some(1));
        assert!(!admins.options.visible_to_all);
        assert_eq!(admins.members.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_member_without_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/groups/MyProject-Committers/members/jdoe")
            .with_status(201)
            .with_body(")]}'\n{\"_account_id\":1000097,\"username\":\"jdoe\"}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let account = client
            .groups()
            .add_member("MyProject-Committers", "jdoe")
            .await
            .unwrap();
        assert_eq!(account.username.as_deref(), Some("jdoe"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_recursive_members() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/groups/Admins/members/")
            .match_query(Matcher::UrlEncoded("recursive".into(), "true".into()))
            .with_status(200)
            .with_body(")]}'\n[]")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let members = client
            .groups()
            .list_members("Admins", &ListGroupMembersOptions { recursive: true })
            .await
            .unwrap();
        assert!(members.is_empty());
        mock.assert_async().await;
    }
}
