//! Resume section labels and header recognition shared by the normalizer,
//! the document extractors and the section parser.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    WorkExperience,
    Education,
    Skills,
    Certifications,
    Projects,
    Languages,
    Interests,
    References,
}

pub const ALL_SECTIONS: [Section; 9] = [
    Section::Summary,
    Section::WorkExperience,
    Section::Education,
    Section::Skills,
    Section::Certifications,
    Section::Projects,
    Section::Languages,
    Section::Interests,
    Section::References,
];

impl Section {
    /// Canonical label, written as `"<label>:"` when a header is inserted.
    pub fn label(self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::WorkExperience => "Work Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Certifications => "Certifications",
            Section::Projects => "Projects",
            Section::Languages => "Languages",
            Section::Interests => "Interests",
            Section::References => "References",
        }
    }

    pub fn header_line(self) -> String {
        format!("{}:", self.label())
    }

    /// Lowercase header spellings recognised for this section.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Section::Summary => &[
                "summary",
                "professional summary",
                "career summary",
                "profile",
                "professional profile",
                "objective",
                "career objective",
                "about me",
            ],
            Section::WorkExperience => &[
                "work experience",
                "experience",
                "professional experience",
                "employment history",
                "employment",
                "work history",
                "career history",
            ],
            Section::Education => &[
                "education",
                "academic background",
                "education and training",
                "qualifications",
            ],
            Section::Skills => &[
                "skills",
                "technical skills",
                "key skills",
                "core competencies",
                "competencies",
            ],
            Section::Certifications => &[
                "certifications",
                "certification",
                "certificates",
                "licenses and certifications",
            ],
            Section::Projects => &["projects", "personal projects", "key projects"],
            Section::Languages => &["languages", "language skills"],
            Section::Interests => &["interests", "hobbies", "hobbies and interests"],
            Section::References => &["references", "referees"],
        }
    }
}

/// `<known header>:<text>` at the start of a line. Longest aliases first.
pub static HEADER_WITH_COLON: Lazy<Regex> = Lazy::new(|| {
    let mut aliases: Vec<&str> = ALL_SECTIONS
        .iter()
        .flat_map(|s| s.aliases().iter().copied())
        .collect();
    aliases.sort_by_key(|a| std::cmp::Reverse(a.len()));
    let alternation = aliases
        .iter()
        .map(|a| regex::escape(a))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)^({alternation}):[ ]*(\S)")).expect("header regex is valid")
});

/// If `line` is a section header, returns the section and any inline content
/// following the colon (`"Skills: Rust, Go"` → `(Skills, "Rust, Go")`).
pub fn classify_header(line: &str) -> Option<(Section, &str)> {
    let trimmed = line.trim();
    let lower = trimmed.to_lowercase();

    let bare = lower.strip_suffix(':').unwrap_or(&lower).trim_end();

    for section in ALL_SECTIONS {
        for alias in section.aliases() {
            if bare == *alias {
                return Some((section, ""));
            }
            if lower.starts_with(alias) && lower[alias.len()..].starts_with(':') {
                let rest = trimmed.get(alias.len() + 1..).unwrap_or("");
                return Some((section, rest.trim()));
            }
        }
    }
    None
}

pub fn is_header(line: &str) -> bool {
    classify_header(line).is_some()
}

pub fn has_header(text: &str, section: Section) -> bool {
    text.lines()
        .any(|line| matches!(classify_header(line), Some((s, _)) if s == section))
}

/// Lines belonging to the first occurrence of `section`, up to the next known
/// header. Inline header content is returned as the first line.
pub fn section_lines(text: &str, section: Section) -> Vec<&str> {
    let mut lines = text.lines();
    let mut body = Vec::new();

    for line in lines.by_ref() {
        if let Some((found, rest)) = classify_header(line) {
            if found == section {
                if !rest.is_empty() {
                    body.push(rest);
                }
                break;
            }
        }
    }

    // If the header was never found the iterator is exhausted and body stays empty
    for line in lines {
        if is_header(line) {
            break;
        }
        body.push(line.trim());
    }
    body
}

/// Maps a free-form heading (e.g. a Word `Heading1` paragraph) to its section.
pub fn section_for_heading(heading: &str) -> Option<Section> {
    classify_header(heading).map(|(section, _)| section)
}
