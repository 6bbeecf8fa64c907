//! Stdout rendering for the one-shot subcommands

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::{builder::Builder, settings::Style};

use kubeinspect_core::Report;
use kubeinspect_types::{LogLevel, LogLine, NamespaceInfo};

/// Output format for subcommands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a report as a table, or as a JSON array of header-keyed objects
pub fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", report.title.bold());
            if report.is_empty() {
                print_warning("No workloads found");
                return Ok(());
            }
            println!("{}", report_table(report));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report_json(report))
                .context("Failed to serialize report")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn report_table(report: &Report) -> String {
    let mut builder = Builder::default();
    builder.push_record(report.headers.iter().map(String::as_str));
    for row in &report.rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Rows as objects keyed by header; the row number column is dropped
fn report_json(report: &Report) -> Value {
    let rows = report
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = report
                .headers
                .iter()
                .zip(row)
                .skip(1)
                .map(|(header, cell)| (header.clone(), Value::String(cell.clone())))
                .collect();
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}

pub fn print_namespaces(namespaces: &[NamespaceInfo], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Namespace", "Status"]);
            for ns in namespaces {
                builder.push_record([ns.name.as_str(), ns.status.as_str()]);
            }
            println!("{}", builder.build().with(Style::rounded()));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(namespaces)
                .context("Failed to serialize namespaces")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Print log lines, one per row, prefixed by timestamp and source
pub fn print_logs(lines: &[LogLine], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if lines.is_empty() {
                print_warning("No log lines returned");
            }
            for line in lines {
                let ts = line
                    .timestamp
                    .map(|t| t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
                    .unwrap_or_default();
                println!(
                    "{} {} {} {}",
                    ts.dimmed(),
                    format!("{}/{}", line.pod, line.container).cyan(),
                    color_level(line.level),
                    line.message
                );
            }
        }
        OutputFormat::Json => {
            let values: Vec<Value> = lines
                .iter()
                .map(|l| {
                    serde_json::json!({
                        "timestamp": l.timestamp,
                        "pod": l.pod,
                        "container": l.container,
                        "level": l.level.as_str(),
                        "message": l.message,
                    })
                })
                .collect();
            let json =
                serde_json::to_string_pretty(&values).context("Failed to serialize log lines")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn color_level(level: LogLevel) -> String {
    let text = level.as_str();
    match level {
        LogLevel::Error | LogLevel::Fatal => text.red().bold().to_string(),
        LogLevel::Warn => text.yellow().bold().to_string(),
        LogLevel::Info => text.green().to_string(),
        LogLevel::Debug | LogLevel::Trace => text.cyan().to_string(),
        LogLevel::Unknown => text.dimmed().to_string(),
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
