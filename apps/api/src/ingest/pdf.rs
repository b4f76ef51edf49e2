//! PDF text recovery: `pdf-extract` first, raw string-token scan second.

use tracing::{debug, warn};

/// Minimum amount of text (non-whitespace chars) for a decode to count as usable.
pub const MIN_TEXT_CHARS: usize = 100;

pub const PLACEHOLDER_TEXT: &str = "Text extraction from this PDF was limited. \
    The document may be scanned or image-based. \
    Upload a text-based PDF or a DOCX file for best results.";

pub enum PdfText {
    /// Text layer decoded normally.
    Structured(String),
    /// Recovered by scanning raw `( ... )` string tokens.
    TokenScan(String),
    /// Nothing usable; the caller substitutes `PLACEHOLDER_TEXT`.
    Unreadable,
}

pub fn extract_pdf(bytes: &[u8]) -> PdfText {
    // pdf-extract panics on some malformed inputs
    let decoded = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match decoded {
        Ok(Ok(text)) if meaningful_len(&text) >= MIN_TEXT_CHARS => {
            return PdfText::Structured(text);
        }
        Ok(Ok(text)) => debug!(
            "pdf-extract yielded only {} characters, scanning raw tokens",
            meaningful_len(&text)
        ),
        Ok(Err(e)) => warn!("pdf-extract failed: {e}, scanning raw tokens"),
        Err(_) => warn!("pdf-extract panicked, scanning raw tokens"),
    }

    let scanned = scan_string_tokens(bytes);
    if meaningful_len(&scanned) >= MIN_TEXT_CHARS {
        PdfText::TokenScan(scanned)
    } else {
        warn!(
            "Raw token scan recovered {} characters, giving up",
            meaningful_len(&scanned)
        );
        PdfText::Unreadable
    }
}

fn meaningful_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Collects the literal strings `( ... )` of uncompressed content streams.
///
/// Separators are inferred from the operators between two tokens: text
/// positioning (`Td`, `TD`, `T*`, `ET`) starts a new line, pure kerning
/// numbers inside a `TJ` array join without a space, anything else gets a space.
pub fn scan_string_tokens(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut between: Vec<u8> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'(' {
            between.push(bytes[i]);
            i += 1;
            continue;
        }

        let (token, next) = read_literal(bytes, i + 1);
        i = next;

        if !is_texty(&token) {
            between.clear();
            continue;
        }
        if !out.is_empty() {
            out.push_str(separator(&between));
        }
        out.push_str(&token);
        between.clear();
    }

    out
}

/// Reads a literal string starting just after its opening paren.
/// Returns the decoded text and the index after the closing paren.
fn read_literal(bytes: &[u8], start: usize) -> (String, usize) {
    let mut text = String::new();
    let mut depth = 1;
    let mut i = start;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\\' if i + 1 < bytes.len() => {
                let esc = bytes[i + 1];
                i += 2;
                match esc {
                    b'n' => text.push('\n'),
                    b'r' => text.push('\n'),
                    b't' => text.push('\t'),
                    b'b' | b'f' => {}
                    b'0'..=b'7' => {
                        let mut value = u32::from(esc - b'0');
                        let mut digits = 1;
                        while digits < 3 && i < bytes.len() && (b'0'..=b'7').contains(&bytes[i]) {
                            value = value * 8 + u32::from(bytes[i] - b'0');
                            i += 1;
                            digits += 1;
                        }
                        if let Some(c) = char::from_u32(value) {
                            text.push(c);
                        }
                    }
                    // Line continuation
                    b'\n' | b'\r' => {}
                    other => text.push(char::from(other)),
                }
                continue;
            }
            b'(' => {
                depth += 1;
                text.push('(');
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return (text, i + 1);
                }
                text.push(')');
            }
            other => text.push(char::from(other)),
        }
        i += 1;
    }

    (text, i)
}

/// Rejects binary noise: mostly-printable tokens with at least one letter.
fn is_texty(token: &str) -> bool {
    if token.trim().is_empty() {
        return false;
    }
    let total = token.chars().count();
    let printable = token
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ' || c.is_alphabetic())
        .count();
    token.chars().any(char::is_alphanumeric) && printable * 10 >= total * 9
}

fn separator(between: &[u8]) -> &'static str {
    let ops = String::from_utf8_lossy(between);
    if ["Td", "TD", "T*", "ET", "'"].iter().any(|op| ops.contains(op)) {
        "\n"
    } else if ops
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '-' || c == '.')
    {
        ""
    } else {
        " "
    }
}

/// Builds a single-page, uncompressed PDF with one Helvetica text line per entry.
#[cfg(test)]
pub(crate) fn sample_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 11 Tf\n72 720 Td\n");
    for line in lines {
        let escaped = line
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        content.push_str(&format!("({escaped}) Tj\n0 -14 Td\n"));
    }
    content.push_str("ET");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}

#[cfg(test)]
pub(crate) const SAMPLE_PDF_LINES: [&str; 7] = [
    "Jane Doe",
    "jane@example.com",
    "Work Experience:",
    "Frontend Dev, Acme Inc (2020 - Present)",
    "- Built UI with React and TypeScript",
    "Education:",
    "BSc in Computer Science, State University (2018)",
];
