//
//  gerrit-client
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands for the Gerrit CLI.
//!
//! `login` records a host entry in the config file and the secret (HTTP
//! password or cookie value) in the system keyring. `status` checks the
//! stored credentials against `accounts/self`.

use std::io::{self, BufRead, IsTerminal};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use dialoguer::{Input, Password};
use serde::Serialize;

use crate::api::common::AccountInfo;
use crate::auth::KeyringStore;
use crate::config::{normalize_host, resolve_secret, AuthScheme, Config, HostConfig};
use crate::output::{print_field, TableOutput};

use super::{connect, output_writer, resolve_host, GlobalOptions};

/// Authenticate with a Gerrit server.
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in to a Gerrit server
    Login(LoginArgs),

    /// Log out of a Gerrit server
    Logout(LogoutArgs),

    /// View authentication status
    Status,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Base URL of the server, e.g. https://review.example.com/
    pub url: String,

    /// Account username (Basic and Digest)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Authentication scheme
    #[arg(long, value_enum, default_value_t = AuthScheme::Basic)]
    pub auth: AuthScheme,

    /// Cookie name for the cookie scheme
    #[arg(long)]
    pub cookie_name: Option<String>,

    /// Read the secret from standard input
    #[arg(long)]
    pub with_secret: bool,

    /// Make this host the default
    #[arg(long)]
    pub default: bool,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// The host to log out from; the selected host when omitted
    pub host: Option<String>,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout(args) => logout(args, global),
            AuthSubcommand::Status => status(global).await,
        }
    }
}

/// Performs the login flow.
async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let writer = output_writer(global, &config);
    let key = normalize_host(&args.url);

    let username = match (args.auth, &args.username) {
        (AuthScheme::Basic | AuthScheme::Digest, None) if !args.with_secret => Some(
            Input::<String>::new()
                .with_prompt("Username")
                .interact_text()?,
        ),
        (AuthScheme::Basic | AuthScheme::Digest, None) => {
            bail!("--username is required for {} authentication", args.auth)
        }
        (_, username) => username.clone(),
    };

    let host = HostConfig {
        url: args.url.clone(),
        username,
        auth: args.auth,
        cookie_name: args.cookie_name.clone(),
    };

    let secret = match args.auth {
        AuthScheme::None => None,
        _ if args.with_secret => Some(read_secret_from_stdin()?),
        AuthScheme::Cookie => Some(Password::new().with_prompt("Cookie value").interact()?),
        _ => Some(Password::new().with_prompt("HTTP password").interact()?),
    };

    // Verify before persisting anything.
    let client = host.to_client(secret.as_deref(), config.core.timeout())?;
    if host.auth != AuthScheme::None {
        let account = client
            .accounts()
            .get("self")
            .await
            .with_context(|| format!("Could not log in to {}", args.url))?;
        writer.write_success(&format!("Logged in to {key} as {}", account.display_name()));
    } else {
        client
            .config()
            .get_version()
            .await
            .with_context(|| format!("Could not reach {}", args.url))?;
        writer.write_success(&format!("Added {key} without credentials"));
    }

    let keyring = KeyringStore::new();
    match &secret {
        Some(secret) => keyring.store(&key, secret)?,
        None => keyring.delete(&key)?,
    }

    config.set_host(&key, host);
    if args.default || config.core.default_host.is_none() {
        config.core.default_host = Some(key);
    }
    config.save()?;
    Ok(())
}

fn logout(args: &LogoutArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let writer = output_writer(global, &config);

    let key = match &args.host {
        Some(host) => normalize_host(host),
        None => normalize_host(&resolve_host(global, &config)?.url),
    };

    KeyringStore::new().delete(&key)?;
    if config.remove_host(&key).is_none() {
        writer.write_warning(&format!("No configuration for {key}"));
    }
    config.save()?;
    writer.write_success(&format!("Logged out of {key}"));
    Ok(())
}

#[derive(Debug, Serialize)]
struct AuthStatus {
    host: String,
    url: String,
    auth: AuthScheme,
    has_secret: bool,
    account: Option<AccountInfo>,
    error: Option<String>,
}

impl TableOutput for AuthStatus {
    fn print_table(&self, color: bool) {
        println!("{}", self.host);
        print_field("URL", &self.url, color);
        print_field("Auth", &self.auth.to_string(), color);
        print_field("Secret", if self.has_secret { "stored" } else { "none" }, color);
        match (&self.account, &self.error) {
            (Some(account), _) => print_field("Account", &account.display_name(), color),
            (None, Some(error)) => print_field("Error", error, color),
            (None, None) => print_field("Account", "anonymous", color),
        }
    }
}

async fn status(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let writer = output_writer(global, &config);
    let host = resolve_host(global, &config)?;
    let has_secret = resolve_secret(&host.url)?.is_some();

    let mut status = AuthStatus {
        host: normalize_host(&host.url),
        url: host.url.clone(),
        auth: host.auth,
        has_secret,
        account: None,
        error: None,
    };

    let mut failure = None;
    if has_secret && host.auth != AuthScheme::None {
        let client = connect(global, &config)?;
        match client.accounts().get("self").await {
            Ok(account) => status.account = Some(account),
            Err(e) => {
                tracing::debug!(error = %e, "credential check failed");
                status.error = Some(e.to_string());
                failure = Some(e);
            }
        }
    }

    writer.write(&status)?;
    match failure {
        Some(e) => Err(anyhow::Error::new(e).context(format!("Credential check for {} failed", status.host))),
        None => Ok(()),
    }
}

fn read_secret_from_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Paste the secret and press Enter:");
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let secret = line.trim().to_string();
    if secret.is_empty() {
        bail!("No secret given on standard input");
    }
    Ok(secret)
}
