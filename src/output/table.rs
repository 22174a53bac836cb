//
//  gerrit-client
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output
//!
//! Table rendering on top of `comfy-table`, plus small helpers for coloring
//! change states and shortening long text.
//!
//! ```rust
//! use gerrit_client::output::TableBuilder;
//!
//! let table = TableBuilder::new()
//!     .color(false)
//!     .headers(["Number", "Subject"])
//!     .row(["3965", "Fix the frobnicator"])
//!     .build();
//! assert!(table.to_string().contains("Fix the frobnicator"));
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use console::style;

/// Creates an empty table with the standard preset.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Fluent builder for list tables.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the header row; cyan when colors are enabled.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            self.table
                .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
        } else {
            self.table.set_header(headers);
        }
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    pub fn rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row in rows {
            let row: Vec<String> = row.into_iter().map(Into::into).collect();
            self.table.add_row(row);
        }
        self
    }

    pub fn print(self) {
        println!("{}", self.table);
    }

    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors a change or project state.
///
/// | State | Color |
/// |-------|-------|
/// | `NEW`, `ACTIVE` | green |
/// | `MERGED` | blue |
/// | `ABANDONED`, `HIDDEN` | red |
/// | `READ_ONLY`, work in progress | yellow |
pub fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match status.to_ascii_uppercase().as_str() {
        "NEW" | "ACTIVE" => style(status).green().to_string(),
        "MERGED" => style(status).blue().to_string(),
        "ABANDONED" | "HIDDEN" => style(status).red().to_string(),
        "READ_ONLY" | "WIP" => style(status).yellow().to_string(),
        _ => status.to_string(),
    }
}

pub fn format_bool(value: bool, color: bool) -> String {
    match (value, color) {
        (true, true) => style("Yes").green().to_string(),
        (false, true) => style("No").dim().to_string(),
        (true, false) => "Yes".to_string(),
        (false, false) => "No".to_string(),
    }
}

/// Shortens `s` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("short", 3), "sho");
        assert_eq!(truncate("ünïcödé text", 6), "ünï...");
    }

    #[test]
    fn test_format_status_without_color() {
        assert_eq!(format_status("MERGED", false), "MERGED");
        assert_eq!(format_bool(true, false), "Yes");
    }

    #[test]
    fn test_table_has_headers_and_rows() {
        let rendered = TableBuilder::new()
            .color(false)
            .headers(["Name", "State"])
            .rows(vec![vec!["gerrit", "ACTIVE"], vec!["plugins/replication", "READ_ONLY"]])
            .build()
            .to_string();
        assert!(rendered.contains("Name"));
        assert!(rendered.contains("plugins/replication"));
    }
}
