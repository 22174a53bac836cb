//
//  gerrit-client
//  api/accounts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gerrit Account API
//!
//! Account identifiers accept the numeric account id, the username, an email
//! address, or `self` for the calling user. `self` requires authentication.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::changes::ChangeInfo;
use super::common::{AccountInfo, ChangeOptions, QueryOptions, Result, Timestamp};
use super::groups::GroupInfo;
use super::url::escape_segment;
use super::GerritClient;

/// An account with its registration details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDetailInfo {
    #[serde(flatten)]
    pub account: AccountInfo,
    #[serde(default)]
    pub registered_on: Option<Timestamp>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub inactive: bool,
}

/// An email address of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailInfo {
    pub email: String,
    #[serde(default)]
    pub preferred: bool,
    #[serde(default)]
    pub pending_confirmation: bool,
}

/// An SSH public key registered for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshKeyInfo {
    pub seq: u32,
    pub ssh_public_key: String,
    pub encoded_key: String,
    pub algorithm: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub valid: bool,
}

/// Query parameters of the account query endpoint.
///
/// `fields` takes `DETAILS` and `ALL_EMAILS`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryAccountOptions {
    #[serde(flatten)]
    pub query: QueryOptions,
    #[serde(flatten)]
    pub fields: ChangeOptions,
}

#[derive(Serialize)]
struct NameInput<'a> {
    name: &'a str,
}

/// Accounts API client.
pub struct AccountsApi {
    client: GerritClient,
}

impl AccountsApi {
    pub(crate) fn new(client: GerritClient) -> Self {
        Self { client }
    }

    fn path(id: &str, rest: &str) -> String {
        format!("accounts/{}{rest}", escape_segment(id))
    }

    pub async fn query(&self, options: &QueryAccountOptions) -> Result<Vec<AccountInfo>> {
        self.client.get_with_query("accounts/", options).await
    }

    pub async fn get(&self, id: &str) -> Result<AccountInfo> {
        self.client.get(&Self::path(id, "")).await
    }

    pub async fn get_detail(&self, id: &str) -> Result<AccountDetailInfo> {
        self.client.get(&Self::path(id, "/detail")).await
    }

    /// The full name; empty if none is set.
    pub async fn get_name(&self, id: &str) -> Result<String> {
        let name: Option<String> = self.client.get(&Self::path(id, "/name")).await?;
        Ok(name.unwrap_or_default())
    }

    pub async fn set_name(&self, id: &str, name: &str) -> Result<String> {
        let name: Option<String> = self
            .client
            .put(&Self::path(id, "/name"), &NameInput { name })
            .await?;
        Ok(name.unwrap_or_default())
    }

    pub async fn get_username(&self, id: &str) -> Result<String> {
        self.client.get(&Self::path(id, "/username")).await
    }

    pub async fn list_emails(&self, id: &str) -> Result<Vec<EmailInfo>> {
        self.client.get(&Self::path(id, "/emails")).await
    }

    pub async fn list_ssh_keys(&self, id: &str) -> Result<Vec<SshKeyInfo>> {
        self.client.get(&Self::path(id, "/sshkeys")).await
    }

    /// Groups the account is a direct member of.
    pub async fn list_groups(&self, id: &str) -> Result<Vec<GroupInfo>> {
        self.client.get(&Self::path(id, "/groups")).await
    }

    /// Global capabilities, keyed by capability name. Values are `true` or a
    /// range object such as `{"min": 0, "max": 500}`.
    pub async fn get_capabilities(&self, id: &str) -> Result<BTreeMap<String, Value>> {
        self.client.get(&Self::path(id, "/capabilities")).await
    }

    pub async fn get_starred_changes(&self, id: &str) -> Result<Vec<ChangeInfo>> {
        self.client.get(&Self::path(id, "/starred.changes")).await
    }
}
