//! Output formatting helpers for CLI commands

use crate::engine::{EndpointProbeResult, ProxyMeasurement, SelectionAction, SelectionVerdict};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::fmt::Write;

/// Keep letters, digits, and a small safe punctuation set; drop everything
/// else (control characters, emoji, bidi marks) so node names are safe to
/// print on a terminal line.
pub fn sanitize_name(name: &str) -> String {
    const SAFE_PUNCT: &str = " .-_()/[]:";
    name.chars()
        .filter(|c| c.is_alphanumeric() || SAFE_PUNCT.contains(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Serialize to single-line JSON with every non-ASCII character escaped as
/// `\uXXXX` (surrogate pairs for astral code points), so records survive
/// ASCII-only log pipelines.
pub fn to_ascii_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(raw) => escape_non_ascii(&raw),
        Err(_) => "{}".to_string(),
    }
}

fn escape_non_ascii(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 16);
    let mut units = [0u16; 2];
    for c in raw.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{unit:04x}");
            }
        }
    }
    out
}

/// Render one decision cycle for the terminal; `None` means the cycle had no
/// delay data to decide on.
pub fn render_cycle(verdict: Option<&SelectionVerdict>, json: bool) -> String {
    match verdict {
        Some(v) if json => to_ascii_json(v),
        Some(v) => format_verdict_text(v),
        None if json => r#"{"error":"no delay data"}"#.to_string(),
        None => "No delay data returned".to_string(),
    }
}

/// Tab-separated verdict line for humans and grep.
pub fn format_verdict_text(verdict: &SelectionVerdict) -> String {
    let from = verdict
        .from
        .as_deref()
        .map(sanitize_name)
        .unwrap_or_else(|| "unknown".to_string());
    let from_delay = match verdict.from_delay_ms {
        Some(delay) => format!("{delay}ms"),
        None => "nil".to_string(),
    };

    match verdict.action {
        SelectionAction::Kept => {
            format!("{}\t{}\t{}\t({})", "kept", from_delay, from, verdict.reason)
        }
        SelectionAction::Switched => format!(
            "{}\t{}\t{} -> {}ms\t{}\t({})",
            "switched".green(),
            from,
            from_delay,
            verdict.to_delay_ms,
            sanitize_name(&verdict.to),
            verdict.reason
        ),
        SelectionAction::WouldSwitch => format!(
            "{}\t{}\t{} -> {}ms\t{}\t({})",
            "would_switch(dry-run)".yellow(),
            from,
            from_delay,
            verdict.to_delay_ms,
            sanitize_name(&verdict.to),
            verdict.reason
        ),
        SelectionAction::SwitchFailed => format!(
            "{}\t{}\t{} -> {}ms\t{}\t({}) err={}",
            "switch_failed".red(),
            from,
            from_delay,
            verdict.to_delay_ms,
            sanitize_name(&verdict.to),
            verdict.reason,
            verdict.error.as_deref().unwrap_or("unknown")
        ),
    }
}

/// Format the fastest nodes as a table
pub fn format_delays_table(entries: &[ProxyMeasurement]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Node", "Delay"]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(sanitize_name(&entry.name)),
            Cell::new(format!("{}ms", entry.delay_ms)),
        ]);
    }

    table.to_string()
}

/// Format the fastest nodes as JSON
pub fn format_delays_json(entries: &[ProxyMeasurement]) -> String {
    to_ascii_json(&entries)
}

/// Format endpoint probe results as a table
pub fn format_endpoints_table(results: &[EndpointProbeResult]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Status", "Latency", "URL"]);

    for result in results {
        let status = if result.reachable {
            "reachable".green().to_string()
        } else {
            "unreachable".red().to_string()
        };
        let latency = if result.latency_ms < 0 {
            "-".to_string()
        } else {
            format!("{}ms", result.latency_ms)
        };
        table.add_row(vec![
            Cell::new(status),
            Cell::new(latency),
            Cell::new(&result.url),
        ]);
    }

    table.to_string()
}
