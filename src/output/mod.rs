//
//  gerrit-client
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Formatting
//!
//! Commands render results either as human-readable tables or as pretty
//! JSON for scripting. The `--json` flag forces JSON; otherwise the
//! `core.output` config key decides.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gerrit_client::output::{OutputFormat, OutputWriter, TableOutput};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Row { name: String }
//!
//! impl TableOutput for Row {
//!     fn print_table(&self, _color: bool) {
//!         println!("{}", self.name);
//!     }
//! }
//!
//! let writer = OutputWriter::new(OutputFormat::Json);
//! writer.write(&Row { name: "gerrit".into() })?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod json;
mod table;

pub use json::*;
pub use table::*;

use console::style;
use serde::Serialize;

/// How command results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    /// Picks the format from the `--json` flag and the `core.output` setting.
    pub fn resolve(json_flag: bool, configured: &str) -> Self {
        if json_flag || configured.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// Writes command results and status messages in the chosen format.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Write a single value.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value),
            OutputFormat::Table => {
                value.print_table(self.color);
                Ok(())
            }
        }
    }

    /// Write a list as one table, or as a JSON array.
    pub fn write_list<T: Serialize + TableRow>(&self, values: &[T]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&values),
            OutputFormat::Table => {
                TableBuilder::new()
                    .color(self.color)
                    .headers(T::headers().iter().copied())
                    .rows(values.iter().map(|v| v.row(self.color)))
                    .print();
                Ok(())
            }
        }
    }

    pub fn write_warning(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    pub fn write_success(&self, msg: &str) {
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// A value with a free-form terminal rendering, used for detail views.
pub trait TableOutput {
    fn print_table(&self, color: bool);
}

/// A value rendered as one row of a list table.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn row(&self, color: bool) -> Vec<String>;
}

/// Prints a bold title with an underline.
pub fn print_header(text: &str) {
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints a `key: value` line, dimming the key when colors are on.
pub fn print_field(key: &str, value: &str, color: bool) {
    if color {
        println!("  {:<12} {}", style(format!("{key}:")).dim(), value);
    } else {
        println!("  {:<12} {}", format!("{key}:"), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format() {
        assert_eq!(OutputFormat::resolve(true, "table"), OutputFormat::Json);
        assert_eq!(OutputFormat::resolve(false, "JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::resolve(false, "table"), OutputFormat::Table);
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
