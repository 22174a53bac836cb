//
//  gerrit-client
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Configuration commands

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, CONFIG_KEYS};
use crate::output::write_json;

use super::{output_writer, GlobalOptions};

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    /// Get a configuration value
    fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        check_key(&args.key)?;
        let config = Config::load()?;
        let value = config.get(&args.key);

        if global.json {
            write_json(&serde_json::json!({ "key": args.key, "value": value }))?;
        } else {
            println!("{}", value.as_deref().unwrap_or(""));
        }
        Ok(())
    }

    /// Set a configuration value
    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        check_key(&args.key)?;
        let mut config = Config::load()?;
        config.set(&args.key, &args.value)?;
        config.save()?;

        let writer = output_writer(global, &config);
        writer.write_success(&format!(
            "Set {} to {}",
            style(&args.key).cyan(),
            args.value
        ));
        Ok(())
    }

    /// Show configuration file path
    fn path(&self, global: &GlobalOptions) -> Result<()> {
        let config_path = Config::config_path()?;

        if global.json {
            write_json(&serde_json::json!({
                "path": config_path.display().to_string(),
                "exists": config_path.exists(),
            }))?;
        } else {
            println!("{}", config_path.display());
        }
        Ok(())
    }
}

fn check_key(key: &str) -> Result<()> {
    if !CONFIG_KEYS.contains(&key) {
        bail!(
            "Unknown configuration key '{}'. Valid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        );
    }
    Ok(())
}
