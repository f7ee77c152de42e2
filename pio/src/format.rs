//! Output formatting utilities for the CLI
//!
//! Every function here is a pure transformation of already fetched data, so
//! the same input always renders to the same text.

use anyhow::Result;
use colored::*;
use pio_core::{
    format_ratio, human_bytes, human_speed, AccountInfo, Document, Event, Transfer, TreeLine,
};
use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Pretty-printed raw response, used by `--format json`
pub fn format_document(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Format a recursive listing, one tab of indentation per nesting level
pub fn format_tree(lines: &[TreeLine]) -> String {
    lines
        .iter()
        .map(|line| {
            format!(
                "{}{}: [{}] {}",
                "\t".repeat(line.depth),
                line.id,
                line.content_type,
                line.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the account summary block
pub fn format_account(info: &AccountInfo) -> String {
    let disk = info.disk.in_gigabytes();

    let mut output = String::new();
    output.push_str(&"Account information:".bold().to_string());
    output.push_str("\n\n");
    output.push_str(&format!("  Username: {}\n", info.username));
    output.push_str(&format!("  Mail: {}\n", info.mail));
    output.push_str(&format!(
        "  Disk: {:02}/{:02}GB ({:02}GB free)\n",
        disk.used, disk.size, disk.avail
    ));
    output.push_str(&format!("  Expiration: {}", info.plan_expiration_date));
    output
}

fn colored_status(status: &str) -> String {
    match status {
        "COMPLETED" | "SEEDING" => status.green().to_string(),
        "DOWNLOADING" | "IN_QUEUE" | "WAITING" | "COMPLETING" => status.cyan().to_string(),
        "ERROR" => status.red().to_string(),
        _ => status.to_string(),
    }
}

/// Format the transfer list
pub fn format_transfers(transfers: &[Transfer]) -> String {
    #[derive(Tabled)]
    struct TransferRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "File ID")]
        file_id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Status")]
        status: String,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Down")]
        down: String,
        #[tabled(rename = "Up")]
        up: String,
        #[tabled(rename = "Ratio")]
        ratio: String,
    }

    let rows = transfers.iter().map(|t| TransferRow {
        id: t.id,
        file_id: t.file_id,
        name: t.name.clone(),
        status: colored_status(&t.status),
        size: human_bytes(t.size),
        down: human_speed(t.down_speed),
        up: human_speed(t.up_speed),
        ratio: format_ratio(t.current_ratio),
    });

    Table::new(rows).with(Style::blank()).to_string()
}

/// Format the event feed
///
/// Events of an unknown type still get a row, and a diagnostic block listing
/// their fields is appended after the table.
pub fn format_events(events: &[Event]) -> String {
    #[derive(Tabled)]
    struct EventRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Event")]
        kind: String,
        #[tabled(rename = "Details")]
        details: String,
    }

    let mut rows = Vec::with_capacity(events.len());
    let mut diagnostics = Vec::new();

    for event in events {
        let (kind, details) = match event {
            Event::TransferCompleted { transfer_name, .. } => {
                ("COMPLETED".green().to_string(), transfer_name.clone())
            }
            Event::ZipCreated {
                zip_id, zip_size, ..
            } => (
                "ZIPPED".cyan().to_string(),
                format!("ID: {} ({})", zip_id, human_bytes(*zip_size)),
            ),
            Event::Unsupported {
                event_type, fields, ..
            } => {
                diagnostics.push(format_unsupported_event(event_type, fields));
                ("UNSUPPORTED".yellow().to_string(), event_type.clone())
            }
        };

        rows.push(EventRow {
            date: event.created_at().to_string(),
            kind,
            details,
        });
    }

    let mut output = Table::new(rows).with(Style::blank()).to_string();
    for diagnostic in diagnostics {
        output.push_str("\n\n");
        output.push_str(&diagnostic);
    }
    output
}

fn format_unsupported_event(event_type: &str, fields: &[String]) -> String {
    let mut block = format!(
        "{} unsupported event type '{}'.\nPlease report it along with the following fields:",
        "Warning:".yellow().bold(),
        event_type
    );
    for field in fields {
        block.push_str(&format!("\n  Key: {}", field));
    }
    block
}
