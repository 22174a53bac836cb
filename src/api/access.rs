//
//  gerrit-client
//  api/access.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gerrit Access Rights API
//!
//! Reads the access sections of one or more projects in a single call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::Result;
use super::projects::ProjectInfo;
use super::GerritClient;

/// Access rights of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectAccessInfo {
    /// Revision of `refs/meta/config` the rights were read from.
    pub revision: String,
    #[serde(default)]
    pub inherits_from: Option<ProjectInfo>,
    /// Ref pattern to access section; the permission layout is kept as JSON.
    #[serde(default)]
    pub local: BTreeMap<String, Value>,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub owner_of: Vec<String>,
    #[serde(default)]
    pub can_upload: bool,
    #[serde(default)]
    pub can_add: bool,
    #[serde(default)]
    pub config_visible: bool,
}

/// Query parameters of the access list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccessOptions {
    /// Projects to read; sent as repeated `p` parameters.
    pub p: Vec<String>,
}

/// Access API client.
pub struct AccessApi {
    client: GerritClient,
}

impl AccessApi {
    pub(crate) fn new(client: GerritClient) -> Self {
        Self { client }
    }

    /// Access rights of the projects in `options`, keyed by project name.
    pub async fn list(&self, options: &AccessOptions) -> Result<BTreeMap<String, ProjectAccessInfo>> {
        self.client.get_with_query("access/", options).await
    }
}
