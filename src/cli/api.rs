//
//  gerrit-client
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Raw REST calls against the configured Gerrit server.
//!
//! The path is relative to the base URL and goes through the same request
//! pipeline as the typed API, so authentication, the `a/` prefix and the
//! `)]}'` prefix are handled for you:
//!
//! ```text
//! gerrit api 'changes/?q=status:open+owner:self&n=5'
//! gerrit api -X PUT projects/MyProject/description -F description="New text"
//! ```

use std::fs;
use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::output::write_json;

use super::{connect, GlobalOptions};

/// Make an authenticated API request
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// Endpoint path relative to the server root, e.g. `changes/?q=is:open`
    pub endpoint: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Extra request header in `Name: Value` form
    #[arg(long, short = 'H', action = clap::ArgAction::Append)]
    pub header: Vec<String>,

    /// Typed body field in `key=value` form; dotted keys nest
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// String body field in `key=value` form
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,

    /// Read the JSON body from a file (`-` for stdin)
    #[arg(long, short = 'f', conflicts_with_all = ["field", "raw_field"])]
    pub input: Option<String>,

    /// Print the response status line
    #[arg(long, short = 'i')]
    pub include: bool,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let client = connect(global, &config)?;

        let method = parse_method(&self.method)?;
        let body = self.build_body()?;

        let mut request = client
            .new_request(method, &self.endpoint, body.as_ref())
            .await?;
        for header in &self.header {
            let (name, value) = parse_header(header)?;
            request.headers_mut().insert(name, value);
        }

        let response = client.execute::<Value>(request).await?;

        if self.include {
            eprintln!("{} {}", style("HTTP").dim(), response.meta.status_line());
        }
        if !response.data.is_null() {
            write_json(&response.data)?;
        }
        Ok(())
    }

    fn build_body(&self) -> Result<Option<Value>> {
        if let Some(input) = &self.input {
            let content = if input == "-" {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?
            };
            let value = serde_json::from_str(&content)
                .with_context(|| format!("{input} does not contain valid JSON"))?;
            return Ok(Some(value));
        }

        if self.field.is_empty() && self.raw_field.is_empty() {
            return Ok(None);
        }

        let mut body = Map::new();
        for field in &self.field {
            let (key, value) = split_field(field)?;
            set_nested_value(&mut body, key, parse_field_value(value));
        }
        for field in &self.raw_field {
            let (key, value) = split_field(field)?;
            set_nested_value(&mut body, key, Value::String(value.to_string()));
        }
        Ok(Some(Value::Object(body)))
    }
}

fn parse_method(method: &str) -> Result<Method> {
    let upper = method.to_ascii_uppercase();
    match upper.as_str() {
        "GET" | "POST" | "PUT" | "DELETE" | "HEAD" | "OPTIONS" | "PATCH" => {
            Method::from_bytes(upper.as_bytes()).with_context(|| format!("Invalid HTTP method: {method}"))
        }
        _ => bail!("Unsupported HTTP method: {method}"),
    }
}

fn split_field(field: &str) -> Result<(&str, &str)> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid field format: {field}. Expected key=value"),
    }
}

/// Interprets a `-F` value: booleans, null, numbers and JSON literals are
/// typed, everything else is a string.
fn parse_field_value(value: &str) -> Value {
    match value {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    if let Ok(n) = value.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Some(n) = value.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
        return Value::Number(n);
    }
    if value.starts_with('[') || value.starts_with('{') {
        if let Ok(parsed) = serde_json::from_str(value) {
            return parsed;
        }
    }
    Value::String(value.to_string())
}

fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let entry = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(nested) = entry {
                set_nested_value(nested, rest, value);
            }
        }
    }
}

fn parse_header(header: &str) -> Result<(HeaderName, HeaderValue)> {
    let (name, value) = header
        .split_once(':')
        .with_context(|| format!("Invalid header format: {header}. Expected 'Name: Value'"))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())?;
    let value = HeaderValue::from_str(value.trim())?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(fields: &[&str], raw: &[&str]) -> ApiCommand {
        ApiCommand {
            endpoint: "changes/".to_string(),
            method: "POST".to_string(),
            header: Vec::new(),
            field: fields.iter().map(|s| s.to_string()).collect(),
            raw_field: raw.iter().map(|s| s.to_string()).collect(),
            input: None,
            include: false,
        }
    }

    #[test]
    fn test_fields_build_typed_nested_body() {
        let cmd = command(
            &["labels.Code-Review=2", "ready=true", "reviewers=[\"jdoe\"]", "message=LGTM"],
            &["tag=007"],
        );
        assert_eq!(
            cmd.build_body().unwrap(),
            Some(json!({
                "labels": {"Code-Review": 2},
                "ready": true,
                "reviewers": ["jdoe"],
                "message": "LGTM",
                "tag": "007"
            }))
        );
    }

    #[test]
    fn test_no_fields_means_no_body() {
        assert_eq!(command(&[], &[]).build_body().unwrap(), None);
    }

    #[test]
    fn test_invalid_field_is_rejected() {
        assert!(command(&["novalue"], &[]).build_body().is_err());
        assert!(command(&["=x"], &[]).build_body().is_err());
    }

    #[test]
    fn test_input_file_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.json");
        std::fs::write(&path, r#"{"description": "New"}"#).unwrap();

        let mut cmd = command(&[], &[]);
        cmd.input = Some(path.display().to_string());
        assert_eq!(cmd.build_body().unwrap(), Some(json!({"description": "New"})));
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("put").unwrap(), Method::PUT);
        assert!(parse_method("FETCH").is_err());
    }

    #[test]
    fn test_parse_header() {
        let (name, value) = parse_header("X-Gerrit-Trace: abc").unwrap();
        assert_eq!(name.as_str(), "x-gerrit-trace");
        assert_eq!(value, "abc");
        assert!(parse_header("nocolon").is_err());
    }

    #[test]
    fn test_parse_field_value_falls_back_to_string() {
        assert_eq!(parse_field_value("1.5"), json!(1.5));
        assert_eq!(parse_field_value("{broken"), json!("{broken"));
        assert_eq!(parse_field_value("status:open"), json!("status:open"));
    }
}
