//! Word document decoding (.docx, Google Docs exports, legacy .doc).

use anyhow::{anyhow, Result};
use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use tracing::debug;

use crate::ingest::sections::section_for_heading;

/// Paragraph styles treated as section headings.
const HEADING_STYLES: [&str; 4] = ["Title", "Heading1", "Heading2", "Heading3"];

/// Minimum run length kept when salvaging text from a binary .doc stream.
const MIN_RUN_CHARS: usize = 4;

/// Decodes a .docx package into plain text, one paragraph per line.
///
/// Heading paragraphs that name a known section become the canonical
/// `"<Label>:"` line, list paragraphs become `•` bullets and tables are
/// flattened one cell per line.
pub fn extract_docx(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| anyhow!("DOCX decode failed: {e:?}"))?;

    let mut lines: Vec<String> = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => lines.push(paragraph_line(paragraph)),
            DocumentChild::Table(table) => flatten_table(table, &mut lines),
            _ => {}
        }
    }

    debug!("DOCX decoded into {} lines", lines.len());
    Ok(lines.join("\n"))
}

fn paragraph_line(paragraph: &Paragraph) -> String {
    let text = paragraph_text(paragraph);
    let text = text.trim();

    let is_heading = paragraph
        .property
        .style
        .as_ref()
        .is_some_and(|style| HEADING_STYLES.contains(&style.val.as_str()));

    if is_heading {
        if let Some(section) = section_for_heading(text) {
            return section.header_line();
        }
    }

    if paragraph.has_numbering && !text.is_empty() {
        format!("• {text}")
    } else {
        text.to_string()
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    collect_children(&paragraph.children, &mut text);
    text
}

fn collect_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push(' '),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_children(&link.children, text),
            _ => {}
        }
    }
}

#[allow(irrefutable_let_patterns)]
fn flatten_table(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            for content in &cell.children {
                if let TableCellContent::Paragraph(paragraph) = content {
                    let line = paragraph_line(paragraph);
                    if !line.is_empty() {
                        lines.push(line);
                    }
                }
            }
        }
    }
}

/// Salvages readable text from a legacy binary .doc stream.
///
/// Word 97-2003 stores body text as UTF-16LE or 8-bit runs inside an OLE
/// container; whichever encoding recovers more text wins.
pub fn salvage_doc_text(bytes: &[u8]) -> String {
    let utf16 = utf16_runs(bytes).join("\n");
    let ascii = byte_runs(bytes).join("\n");
    if utf16.len() >= ascii.len() {
        utf16
    } else {
        ascii
    }
}

fn utf16_runs(bytes: &[u8]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();

    for pair in bytes.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        match char::from_u32(u32::from(unit)) {
            // Latin text only; 8-bit pairs otherwise decode as CJK noise
            Some(c) if u32::from(c) < 0x0250 && is_document_char(c) => current.push(c),
            _ => flush_run(&mut current, &mut runs),
        }
    }
    flush_run(&mut current, &mut runs);
    runs
}

fn byte_runs(bytes: &[u8]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();

    for &b in bytes {
        let c = char::from(b);
        if b.is_ascii() && is_document_char(c) {
            current.push(c);
        } else {
            flush_run(&mut current, &mut runs);
        }
    }
    flush_run(&mut current, &mut runs);
    runs
}

fn is_document_char(c: char) -> bool {
    c == '\t' || c == ' ' || c.is_ascii_graphic() || (c.is_alphabetic() && !c.is_control())
}

fn flush_run(current: &mut String, runs: &mut Vec<String>) {
    let trimmed = current.trim();
    if trimmed.chars().count() >= MIN_RUN_CHARS && trimmed.chars().any(char::is_alphabetic) {
        runs.push(trimmed.to_string());
    }
    current.clear();
}
