//
//  gerrit-client
//  cli/change.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Change commands

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::api::changes::{ChangeInfo, QueryChangeOptions};
use crate::api::common::ChangeOptions;
use crate::config::Config;
use crate::output::{format_status, print_field, print_header, truncate, TableOutput, TableRow};

use super::{connect, output_writer, GlobalOptions};

/// Search and view changes
#[derive(Args, Debug)]
pub struct ChangeCommand {
    #[command(subcommand)]
    pub command: ChangeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ChangeSubcommand {
    /// List changes matching a search query
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View a change
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Search query, e.g. `status:open+owner:self`
    #[arg(long, short = 'q', default_value = "status:open")]
    pub query: String,

    /// Maximum number of changes to list
    #[arg(long, short = 'n', default_value = "25")]
    pub limit: u32,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Change number or change ID
    pub id: String,
}

#[derive(Debug, Serialize)]
struct ChangeListItem {
    number: u64,
    subject: String,
    status: String,
    owner: String,
    project: String,
    branch: String,
    updated: Option<String>,
}

impl From<&ChangeInfo> for ChangeListItem {
    fn from(change: &ChangeInfo) -> Self {
        Self {
            number: change.number,
            subject: change.subject.clone(),
            status: change.status.clone(),
            owner: change.owner.display_name(),
            project: change.project.clone(),
            branch: change.branch.clone(),
            updated: change.updated.as_ref().map(ToString::to_string),
        }
    }
}

impl TableRow for ChangeListItem {
    fn headers() -> &'static [&'static str] {
        &["Number", "Subject", "Status", "Owner", "Project", "Branch"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.number.to_string(),
            truncate(&self.subject, 60),
            format_status(&self.status, color),
            self.owner.clone(),
            self.project.clone(),
            self.branch.clone(),
        ]
    }
}

/// The detail view wraps the full change record.
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ChangeDetail(ChangeInfo);

impl TableOutput for ChangeDetail {
    fn print_table(&self, color: bool) {
        let change = &self.0;
        print_header(&format!("{}: {}", change.number, change.subject));
        print_field("Change-Id", &change.change_id, color);
        print_field("Status", &format_status(&change.status, color), color);
        print_field("Owner", &change.owner.display_name(), color);
        print_field("Project", &change.project, color);
        print_field("Branch", &change.branch, color);
        if let Some(topic) = &change.topic {
            print_field("Topic", topic, color);
        }
        if let Some(updated) = &change.updated {
            print_field("Updated", &updated.to_string(), color);
        }
        print_field(
            "Size",
            &format!("+{} -{}", change.insertions, change.deletions),
            color,
        );
        if !change.labels.is_empty() {
            let labels: Vec<&str> = change.labels.keys().map(String::as_str).collect();
            print_field("Labels", &labels.join(", "), color);
        }
        if let Some(message) = change
            .current_revision
            .as_ref()
            .and_then(|rev| change.revisions.get(rev))
            .and_then(|rev| rev.commit.as_ref())
            .and_then(|commit| commit.message.as_deref())
        {
            println!();
            for line in message.lines() {
                println!("    {line}");
            }
        }
    }
}

impl ChangeCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ChangeSubcommand::List(args) => self.list(args, global).await,
            ChangeSubcommand::View(args) => self.view(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let client = connect(global, &config)?;

        let options = QueryChangeOptions::query(&args.query).limit(args.limit);
        let changes = client.changes().query(&options).await?;
        let items: Vec<ChangeListItem> = changes.iter().map(ChangeListItem::from).collect();

        let writer = output_writer(global, &config);
        writer.write_list(&items)?;
        if changes.last().is_some_and(|c| c.more_changes) {
            writer.write_warning(&format!("More changes match; raise --limit above {}", args.limit));
        }
        Ok(())
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let client = connect(global, &config)?;

        let options = ChangeOptions::with_fields([
            "CURRENT_REVISION",
            "CURRENT_COMMIT",
            "LABELS",
            "DETAILED_ACCOUNTS",
        ]);
        let change = client.changes().get(&args.id, &options).await?;

        output_writer(global, &config).write(&ChangeDetail(change))
    }
}
