//! # Report
//!
//! Fixed-width text rendering of history sections. Widths count Unicode
//! scalar values.

use std::io::{self, Write};

use crate::parsers::browser::HistoryRecord;

pub const URL_WIDTH: usize = 80;
pub const TITLE_WIDTH: usize = 50;
pub const VISITS_WIDTH: usize = 10;
pub const LAST_VISITED_WIDTH: usize = 25;
pub const NO_TITLE: &str = "No Title";

const SEPARATOR_WIDTH: usize = 165;

pub fn write_banner(out: &mut impl Write) -> io::Result<()> {
    let title = format!("historyview v{}", env!("CARGO_PKG_VERSION"));
    let subtitle = "Local Chrome & Firefox history viewer";
    let inner = 52;
    writeln!(out)?;
    writeln!(out, "    ╔{}╗", "═".repeat(inner))?;
    writeln!(out, "    ║{}║", " ".repeat(inner))?;
    writeln!(out, "    ║      {:<w$}║", title, w = inner - 6)?;
    writeln!(out, "    ║      {:<w$}║", subtitle, w = inner - 6)?;
    writeln!(out, "    ║{}║", " ".repeat(inner))?;
    writeln!(out, "    ╚{}╝", "═".repeat(inner))?;
    writeln!(out)?;
    writeln!(out, "[*] Fetching browser history...")?;
    writeln!(out)
}

/// Writes one browser section. Never fails on record content.
pub fn write_section(
    out: &mut impl Write,
    browser_name: &str,
    records: &[HistoryRecord],
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== {browser_name} History ===")?;
    if records.is_empty() {
        return writeln!(out, "No history found for {browser_name}.");
    }

    writeln!(
        out,
        "{:<URL_WIDTH$} {:<TITLE_WIDTH$} {:<VISITS_WIDTH$} {:<LAST_VISITED_WIDTH$}",
        "URL", "Title", "Visits", "Last Visited"
    )?;
    writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
    for record in records {
        writeln!(out, "{}", format_row(record))?;
    }
    Ok(())
}

pub fn format_row(record: &HistoryRecord) -> String {
    let title = record
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_TITLE);
    format!(
        "{:<URL_WIDTH$} {:<TITLE_WIDTH$} {:<VISITS_WIDTH$} {:<LAST_VISITED_WIDTH$}",
        truncate(&record.url, URL_WIDTH - 1),
        truncate(title, TITLE_WIDTH - 1),
        record.visit_count,
        truncate(&record.last_visit.to_string(), LAST_VISITED_WIDTH - 1),
    )
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
