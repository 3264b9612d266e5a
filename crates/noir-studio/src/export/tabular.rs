//! Tabular exports: the glossary as CSV and the prompt matrix as a
//! Markdown table.
//!
//! Cells never span lines: runs of line breaks collapse to a single space.

use csv::{QuoteStyle, WriterBuilder};

use crate::matrix::MatrixEntry;
use crate::schema::{Glossary, GlossaryEntry, ResultType};

/// Collapse every run of line breaks (and the whitespace around it) to a
/// single space.
pub fn collapse_newlines(text: &str) -> String {
    if !text.contains(['\n', '\r']) {
        return text.to_string();
    }
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `theme` first, then the declared entry fields.
fn entry_header() -> Vec<&'static str> {
    let entry_fields = Glossary::DESCRIPTOR
        .field("entries")
        .and_then(|f| f.kind.nested_fields())
        .unwrap_or_default();
    std::iter::once("theme")
        .chain(entry_fields.iter().map(|f| f.name))
        .collect()
}

fn entry_row(theme: &str, entry: &GlossaryEntry) -> [String; 6] {
    [
        theme,
        entry.term.as_str(),
        entry.category.as_str(),
        entry.definition.as_str(),
        entry.example_usage.as_str(),
        entry.art_prompt.as_deref().unwrap_or_default(),
    ]
    .map(collapse_newlines)
}

/// One header row plus one row per entry. The theme leads every row so a
/// single row still says which glossary it came from. Every cell is quoted
/// and embedded quotes are doubled.
pub fn glossary_csv(glossary: &Glossary) -> String {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    let written = writer.write_record(entry_header()).and_then(|()| {
        glossary
            .entries
            .iter()
            .try_for_each(|entry| writer.write_record(entry_row(&glossary.theme, entry)))
    });
    // Writes to a Vec cannot fail.
    if let Err(e) = written {
        tracing::warn!("glossary CSV write failed: {e}");
    }
    writer
        .into_inner()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn table_cell(text: &str) -> String {
    collapse_newlines(text).replace('|', "\\|")
}

/// The prompt matrix as a Markdown table.
pub fn matrix_table(entries: &[MatrixEntry]) -> String {
    let mut out = String::from("# Prompt Matrix\n\n| Character | Location | Prompt |\n|---|---|---|\n");
    for e in entries {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            table_cell(&e.character),
            table_cell(&e.location),
            table_cell(&e.prompt)
        ));
    }
    out
}
