//
//  gerrit-client
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Low-level configuration file I/O.
//!
//! These helpers know nothing about the TOML schema; [`super::Config`]
//! handles parsing and serialization.

use std::path::Path;

use anyhow::{Context, Result};

/// Reads a configuration file into a string.
pub fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// The file is replaced completely.
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote config file");
    Ok(())
}

pub fn config_exists(path: &Path) -> bool {
    path.exists()
}
