//
//  gerrit-client
//  cli/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project management commands

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::api::common::ListOptions;
use crate::api::projects::{ProjectInfo, ProjectOptions};
use crate::config::Config;
use crate::output::{format_status, print_field, print_header, truncate, TableOutput, TableRow};

use super::{connect, output_writer, GlobalOptions};

/// List and view projects
#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectSubcommand {
    /// List projects
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View project details
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only projects whose name starts with this prefix
    #[arg(long, conflicts_with = "regex")]
    pub prefix: Option<String>,

    /// Only projects whose name matches this regular expression
    #[arg(long)]
    pub regex: Option<String>,

    /// Maximum number of projects to list
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: u32,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Project name, e.g. `plugins/replication`
    pub name: String,
}

#[derive(Debug, Serialize)]
struct ProjectListItem {
    name: String,
    state: String,
    description: Option<String>,
}

impl ProjectListItem {
    fn new(name: &str, info: &ProjectInfo) -> Self {
        Self {
            name: info.name.clone().unwrap_or_else(|| name.to_string()),
            state: info.state.clone().unwrap_or_else(|| "ACTIVE".to_string()),
            description: info.description.clone(),
        }
    }
}

impl TableRow for ProjectListItem {
    fn headers() -> &'static [&'static str] {
        &["Name", "State", "Description"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.name.clone(),
            format_status(&self.state, color),
            truncate(self.description.as_deref().unwrap_or("-"), 50),
        ]
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ProjectDetail(ProjectInfo);

impl TableOutput for ProjectDetail {
    fn print_table(&self, color: bool) {
        let project = &self.0;
        print_header(project.name.as_deref().unwrap_or(&project.id));
        print_field("ID", &project.id, color);
        print_field("Parent", project.parent.as_deref().unwrap_or("-"), color);
        print_field(
            "State",
            &format_status(project.state.as_deref().unwrap_or("ACTIVE"), color),
            color,
        );
        if let Some(description) = &project.description {
            print_field("Description", description, color);
        }
        for link in &project.web_links {
            print_field(&link.name, &link.url, color);
        }
    }
}

impl ProjectCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ProjectSubcommand::List(args) => self.list(args, global).await,
            ProjectSubcommand::View(args) => self.view(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let client = connect(global, &config)?;

        let options = ProjectOptions {
            list: ListOptions {
                limit: Some(args.limit),
                ..Default::default()
            },
            description: true,
            prefix: args.prefix.clone(),
            regex: args.regex.clone(),
            ..Default::default()
        };
        let projects = client.projects().list(&options).await?;
        let items: Vec<ProjectListItem> = projects
            .iter()
            .map(|(name, info)| ProjectListItem::new(name, info))
            .collect();

        output_writer(global, &config).write_list(&items)
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let client = connect(global, &config)?;
        let project = client.projects().get(&args.name).await?;

        output_writer(global, &config).write(&ProjectDetail(project))
    }
}
