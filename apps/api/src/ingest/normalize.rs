//! Text normalization (stage 2).
//!
//! `normalize` is deterministic and idempotent. `enhance` only ever inserts
//! section header lines; it never drops or rewrites original content.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::ingest::extractors::ENTRY_HEADER;
use crate::ingest::sections::{classify_header, has_header, Section, HEADER_WITH_COLON};

static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static EXTRA_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static BULLET_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([•\-])[ ]*([^\s\-•])").unwrap());

static DEGREE_INDICATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(bachelor'?s?|master of|masters? degree|associate'?s?\s+(degree|of|in)|b\.?sc|m\.?sc|b\.?eng|m\.?eng|ph\.?d|mba|diploma|degree in)\b|\b[bm]\.\s?[as]\.|^(bs|ba|ms|ma)\b",
    )
    .unwrap()
});
static EMPLOYER_INDICATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(inc|llc|ltd|corp|gmbh)\b\.?").unwrap());
static SKILLS_INDICATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(technologies|tech stack|technical proficiencies|tools|proficient in|expertise in)\b")
        .unwrap()
});

/// Cleans whitespace and punctuation so the section parser sees a stable layout.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter_map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => Some('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => Some('"'),
            '\u{00A0}' => Some(' '),
            '\n' | '\t' => Some(c),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    let joined = cleaned
        .lines()
        .map(normalize_line)
        .collect::<Vec<_>>()
        .join("\n");

    EXTRA_NEWLINES
        .replace_all(joined.trim(), "\n\n")
        .into_owned()
}

fn normalize_line(line: &str) -> String {
    let collapsed = INLINE_WHITESPACE.replace_all(line.trim(), " ");
    let bulleted = BULLET_SPACING.replace(&collapsed, "$1 $2");
    HEADER_WITH_COLON
        .replace(&bulleted, "$1: $2")
        .trim()
        .to_string()
}

/// Inserts missing Work Experience / Education / Skills headers ahead of the
/// first line that looks like it belongs to that section.
///
/// Only lines above the first explicit header are candidates; anything below
/// one is already covered by the section the author wrote.
pub fn enhance(text: &str) -> String {
    let mut covered = false;
    let mut lines: Vec<(String, bool)> = text
        .lines()
        .map(|line| {
            covered |= classify_header(line).is_some();
            (line.to_string(), !covered)
        })
        .collect();

    let detectors: [(Section, fn(&str) -> bool); 3] = [
        (Section::Education, looks_like_education),
        (Section::WorkExperience, looks_like_employment),
        (Section::Skills, looks_like_skills),
    ];

    for (section, detector) in detectors {
        if has_header(text, section) {
            continue;
        }
        if let Some(index) = lines
            .iter()
            .position(|(line, candidate)| *candidate && detector(line))
        {
            debug!("Inserting missing {:?} header at line {index}", section);
            lines.insert(index, (section.header_line(), false));
        }
    }

    lines
        .into_iter()
        .map(|(line, _)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn looks_like_education(line: &str) -> bool {
    DEGREE_INDICATOR.is_match(line)
}

fn looks_like_employment(line: &str) -> bool {
    if looks_like_education(line) {
        return false;
    }
    ENTRY_HEADER.is_match(line) || EMPLOYER_INDICATOR.is_match(line)
}

fn looks_like_skills(line: &str) -> bool {
    SKILLS_INDICATOR.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_blank_lines() {
        let input = "Jane   Doe \t\n\n\n\n  Summary:Frontend\tdev.  \n";
        assert_eq!(normalize(input), "Jane Doe\n\nSummary: Frontend dev.");
    }

    #[test]
    fn test_normalize_strips_control_characters() {
        let input = "Jane\u{0000} Doe\u{0007}\r\nEmail:\u{000B} jane@example.com";
        let out = normalize(input);
        assert!(!out.contains('\0'));
        assert!(!out.contains('\r'));
        assert!(out
            .chars()
            .all(|c| !c.is_control() || c == '\n' || c == '\t'));
        assert_eq!(out, "Jane Doe\nEmail: jane@example.com");
    }

    #[test]
    fn test_normalize_quotes_and_bullets() {
        let input = "\u{201C}Lead\u{201D} dev\u{2019}s role\n•Built UI\n-Shipped   app\n--- \n- ";
        let out = normalize(input);
        assert_eq!(out, "\"Lead\" dev's role\n• Built UI\n- Shipped app\n---\n-");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "  \n\n\n ",
            "Jane Doe\r\n\r\n\r\n\r\nSkills:React,  TypeScript\n•  Built\u{00A0}things",
            "- \n-\n•\n--x\n-x -y",
            "Work Experience:Dev, Acme (2020 - Present)\n\t\t- Led   team of 5\n\n\n\nEducation:",
            "\u{2018}quoted\u{2019}\u{0001}\u{001F}\n\u{201C}double\u{201D}",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_normalize_never_leaves_two_blank_lines() {
        let out = normalize("a\n\n \n\t\n\nb\n\n\n\nc");
        assert!(!out.contains("\n\n\n"));
        assert_eq!(out, "a\n\nb\n\nc");
    }

    #[test]
    fn test_enhance_inserts_missing_headers() {
        let text = "Jane Doe\nSenior Dev, Acme Inc (2019 - Present)\n- Built things\nBSc in Computer Science, MIT (2015)\nTechnologies: React, Rust";
        let out = enhance(text);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Jane Doe",
                "Work Experience:",
                "Senior Dev, Acme Inc (2019 - Present)",
                "- Built things",
                "Education:",
                "BSc in Computer Science, MIT (2015)",
                "Skills:",
                "Technologies: React, Rust",
            ]
        );
    }

    #[test]
    fn test_enhance_keeps_existing_headers_and_content() {
        let text = "Jane Doe\nEducation:\nBSc, MIT (2015)\nWork Experience:\nDev, Acme (2020 - 2021)";
        let out = enhance(text);
        assert_eq!(out, text);
        // Second pass is a no-op
        assert_eq!(enhance(&out), out);
    }

    #[test]
    fn test_enhance_never_removes_lines() {
        let text = "Someone\nMaster of Science, Stanford (2012)\nstray line";
        let out = enhance(text);
        for line in text.lines() {
            assert!(out.lines().any(|l| l == line));
        }
    }

    #[test]
    fn test_enhance_leaves_explicit_sections_alone() {
        let text = "Jane Doe\njane@example.com\nEducation:\nB.S. Computer Science, MIT (2015)\nSkills: Rust";
        assert_eq!(enhance(text), text);
    }

    #[test]
    fn test_enhance_only_considers_lines_above_first_header() {
        let text = "Jane Doe\nDev, Acme Inc (2020 - Present)\nEducation:\nBS Physics, Yale (2012)\nLead, Beta LLC (2010 - 2012)";
        let lines: Vec<String> = enhance(text).lines().map(str::to_string).collect();
        assert_eq!(lines[1], "Work Experience:");
        assert_eq!(lines[2], "Dev, Acme Inc (2020 - Present)");
        assert_eq!(lines.iter().filter(|l| l.as_str() == "Work Experience:").count(), 1);
    }

    #[test]
    fn test_degree_abbreviations_are_education() {
        for line in [
            "B.S. Computer Science, MIT (2015)",
            "B.A. History, Yale (2010)",
            "M.S. Statistics, Stanford (2018)",
            "M.A. Economics, LSE (2016)",
            "BS Computer Science, MIT (2015)",
            "BA English, Oxford (2009)",
            "MS Data Science, NYU (2020)",
            "Associate of Arts, Valley College (2008)",
            "Associate Degree in Nursing, City College (2011)",
        ] {
            assert!(looks_like_education(line), "{line}");
            assert!(!looks_like_employment(line), "{line}");
        }
        assert!(!looks_like_education("Associate Engineer, Acme Inc (2019 - 2021)"));
        assert!(!looks_like_education("Senior Dev, Acme Inc (2019 - Present)"));
    }

    #[test]
    fn test_enhance_inserts_education_for_abbreviated_degree() {
        let out = enhance("Jane Doe\nB.S. Computer Science, MIT (2015)");
        assert_eq!(out, "Jane Doe\nEducation:\nB.S. Computer Science, MIT (2015)");
    }
}
