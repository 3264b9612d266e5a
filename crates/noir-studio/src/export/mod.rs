//! File exports.
//!
//! Each export is a pure function from a result (or a sequence of results)
//! to an [`ExportFile`]: name, MIME type, and text content. Writing the file
//! somewhere is the caller's business.
//!
//! Filenames and MIME types are chosen by feature id. Every prose type
//! exports as `neo-tokyo-<feature-id>.md` (`text/markdown`); the glossary is
//! the one tabular export, `neo-tokyo-glossary.csv` (`text/csv`). Sequence
//! exports are always Markdown, so their extension follows that.

pub mod markdown;
pub mod tabular;

use serde::Serialize;

use crate::matrix::MatrixEntry;
use crate::schema::{Feature, GeneratedResult};

pub use markdown::ToMarkdown;
pub use tabular::{collapse_newlines, glossary_csv, matrix_table};

pub const MARKDOWN_MIME: &str = "text/markdown";
pub const CSV_MIME: &str = "text/csv";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

pub fn mime_for(feature: Feature) -> &'static str {
    match feature {
        Feature::Glossary => CSV_MIME,
        _ => MARKDOWN_MIME,
    }
}

pub fn filename_for(feature: Feature) -> String {
    filename_with(feature, mime_for(feature))
}

fn filename_with(feature: Feature, mime: &str) -> String {
    let ext = if mime == CSV_MIME { "csv" } else { "md" };
    format!("neo-tokyo-{}.{ext}", feature.id())
}

/// Export a single result.
pub fn export(result: &GeneratedResult) -> ExportFile {
    let feature = result.feature();
    let content = match result {
        GeneratedResult::Glossary(glossary) => glossary_csv(glossary),
        other => other.to_markdown(),
    };
    ExportFile {
        filename: filename_for(feature),
        mime: mime_for(feature),
        content,
    }
}

/// Export a batch feature's results as one Markdown document, in list order.
pub fn export_batch(feature: Feature, results: &[GeneratedResult]) -> ExportFile {
    let sections: Vec<String> = results.iter().map(ToMarkdown::to_markdown).collect();
    ExportFile {
        filename: filename_with(feature, MARKDOWN_MIME),
        mime: MARKDOWN_MIME,
        content: format!("# {}\n\n{}", feature.title(), sections.join("\n---\n\n")),
    }
}

/// Export the prompt matrix as a Markdown table.
pub fn export_matrix(entries: &[MatrixEntry]) -> ExportFile {
    ExportFile {
        filename: filename_with(Feature::PromptMatrix, MARKDOWN_MIME),
        mime: MARKDOWN_MIME,
        content: matrix_table(entries),
    }
}
