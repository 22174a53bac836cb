//
//  gerrit-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod auth;
mod change;
mod completion;
mod config;
mod project;

pub use api::ApiCommand;
pub use auth::AuthCommand;
pub use change::ChangeCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use project::ProjectCommand;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::GerritClient;
use crate::config::{resolve_secret, AuthScheme, Config, HostConfig};
use crate::output::{OutputFormat, OutputWriter};

/// Gerrit CLI - Work with Gerrit Code Review from the command line
#[derive(Parser, Debug)]
#[command(
    name = "gerrit",
    version,
    about = "Work with Gerrit Code Review from the command line",
    long_about = "gerrit is a CLI for the Gerrit Code Review REST API.\n\n\
                  It brings changes, projects and raw API calls to your terminal.",
    propagate_version = true,
    after_help = "Use 'gerrit <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Configured Gerrit host to talk to
    #[arg(long, global = true, env = "GERRIT_HOST")]
    pub host: Option<String>,

    /// Gerrit base URL, overriding the configured host URL
    #[arg(long, global = true, env = "GERRIT_URL")]
    pub url: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with a Gerrit server
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// Make API requests
    Api(ApiCommand),

    /// Search and view changes
    #[command(visible_alias = "c")]
    Change(ChangeCommand),

    /// List and view projects
    #[command(visible_alias = "proj")]
    Project(ProjectCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}

/// Picks the host entry for a command.
///
/// `--url` wins, then `--host`, then `core.default_host`. A `--url` without a
/// matching entry gives an anonymous entry for that URL.
pub fn resolve_host(global: &GlobalOptions, config: &Config) -> Result<HostConfig> {
    if let Some(url) = &global.url {
        let mut host = config
            .host_config(url)
            .cloned()
            .unwrap_or_else(|| HostConfig {
                auth: AuthScheme::None,
                ..HostConfig::new(url.clone())
            });
        host.url = url.clone();
        return Ok(host);
    }

    let host = global
        .host
        .clone()
        .or_else(|| config.core.default_host.clone())
        .context("No Gerrit host given. Use --host or --url, or run 'gerrit auth login <url>'")?;

    config.host_config(&host).cloned().with_context(|| {
        format!("No configuration for host '{host}'. Run 'gerrit auth login https://{host}/'")
    })
}

/// Builds a client for the selected host with its stored secret.
pub fn connect(global: &GlobalOptions, config: &Config) -> Result<GerritClient> {
    let host = resolve_host(global, config)?;
    let secret = match host.auth {
        AuthScheme::None => None,
        _ => resolve_secret(&host.url)?,
    };
    tracing::debug!(url = %host.url, auth = %host.auth, "connecting");
    host.to_client(secret.as_deref(), config.core.timeout())
}

/// Output writer honoring `--json` and `core.output`.
pub fn output_writer(global: &GlobalOptions, config: &Config) -> OutputWriter {
    OutputWriter::new(OutputFormat::resolve(global.json, &config.core.output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_host() -> Config {
        let mut config = Config::default();
        config.set_host(
            "review.example.com",
            HostConfig {
                username: Some("jdoe".to_string()),
                auth: AuthScheme::Digest,
                ..HostConfig::new("https://review.example.com/")
            },
        );
        config
    }

    #[test]
    fn test_resolve_host_uses_default_host() {
        let mut config = config_with_host();
        config.set("default_host", "review.example.com").unwrap();
        let host = resolve_host(&GlobalOptions::default(), &config).unwrap();
        assert_eq!(host.auth, AuthScheme::Digest);
    }

    #[test]
    fn test_resolve_host_flag_is_normalized() {
        let global = GlobalOptions {
            host: Some("https://Review.Example.com/".to_string()),
            ..Default::default()
        };
        let host = resolve_host(&global, &config_with_host()).unwrap();
        assert_eq!(host.username.as_deref(), Some("jdoe"));
    }

    #[test]
    fn test_resolve_host_url_overrides_entry_url() {
        let global = GlobalOptions {
            url: Some("http://review.example.com/".to_string()),
            host: Some("other.example.com".to_string()),
            ..Default::default()
        };
        let host = resolve_host(&global, &config_with_host()).unwrap();
        assert_eq!(host.url, "http://review.example.com/");
        assert_eq!(host.auth, AuthScheme::Digest);
    }

    #[test]
    fn test_resolve_host_unknown_url_is_anonymous_entry() {
        let global = GlobalOptions {
            url: Some("https://gerrit.other.org/r/".to_string()),
            ..Default::default()
        };
        let host = resolve_host(&global, &Config::default()).unwrap();
        assert_eq!(host.auth, AuthScheme::None);
        assert!(host.username.is_none());
    }

    #[test]
    fn test_resolve_host_without_any_host_fails() {
        assert!(resolve_host(&GlobalOptions::default(), &Config::default()).is_err());
        let global = GlobalOptions {
            host: Some("missing.example.com".to_string()),
            ..Default::default()
        };
        assert!(resolve_host(&global, &Config::default()).is_err());
    }

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gerrit", "change", "list", "--json", "--host", "h"]).unwrap();
        assert!(cli.global.json);
        assert_eq!(cli.global.host.as_deref(), Some("h"));
    }
}
