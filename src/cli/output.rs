//! Output formatting helpers for CLI commands

use crate::api::types::{ModelInfo, ServiceState, StatusReport};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

const DIGEST_WIDTH: usize = 12;

/// Human-readable byte count (binary units).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn short_digest(digest: &str) -> &str {
    match digest.char_indices().nth(DIGEST_WIDTH) {
        Some((idx, _)) => &digest[..idx],
        None => digest,
    }
}

/// Format installed models as a table
pub fn format_models_table(models: &[ModelInfo]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Model", "Size", "Modified", "Digest"]);

    for m in models {
        table.add_row(vec![
            Cell::new(&m.name),
            Cell::new(format_size(m.size_bytes)),
            Cell::new(m.last_modified.format("%Y-%m-%d %H:%M")),
            Cell::new(short_digest(&m.content_digest)),
        ]);
    }

    table.to_string()
}

/// Format a status report for the terminal
pub fn format_status(report: &StatusReport) -> String {
    let state = match report.state {
        ServiceState::Online => "● online".green().bold().to_string(),
        ServiceState::Offline => "● offline".red().bold().to_string(),
    };

    let message = if report.has_default_model || !report.is_online() {
        report.message.normal().to_string()
    } else {
        report.message.yellow().to_string()
    };

    let mut out = format!("Ollama: {}\n{}\n", state, message);

    if let Some(ref error) = report.error {
        out.push_str(&format!("{} {}\n", "error:".dimmed(), error.dimmed()));
    }

    if report.is_online() {
        if report.available_models.is_empty() {
            out.push_str("No models installed.\n");
        } else {
            out.push_str(&format_models_table(&report.available_models));
            out.push('\n');
        }
    }

    out
}

/// Format a status report as JSON
pub fn format_status_json(report: &StatusReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
