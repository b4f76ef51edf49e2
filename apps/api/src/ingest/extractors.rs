//! Heuristic field extractors (stage 3).
//!
//! Every extractor is an independent strategy over the normalized text and writes
//! only its own fields. None of them fail: no match leaves the field empty and
//! `builder::finalize` applies defaults afterwards.

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ingest::sections::{is_header, section_lines, Section};
use crate::models::resume::{
    Certification, Education, Language, Project, Skill, StructuredResume, WorkExperience,
};
use crate::vocabulary::Vocabulary;

/// `Position, Company (Period)`.
pub static ENTRY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^,(]+?),\s*([^(]+?)\s*\(([^)]+)\)\s*$").unwrap());
/// `Position | Company | Period`.
static PIPE_ENTRY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^|]+?)\s*\|\s*([^|]+?)\s*\|\s*([^|]+?)$").unwrap());
/// `Degree, Institution (YYYY)`; the parenthesised part may be a range.
static EDUCATION_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^,(]+?),\s*([^(]+?)\s*\(([^)]*\d{4}[^)]*)\)\s*$").unwrap());

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[ .\-]?)?(?:\(\d{2,4}\)|\d{2,4})[ .\-]?\d{3,4}[ .\-]?\d{3,4}").unwrap()
});
static LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/[A-Za-z0-9_\-%]+/?").unwrap()
});
static WEBSITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s,;)]+").unwrap());
static LOCATION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^(?:location|address|based in):\s*(.+)$").unwrap());

static RESUME_OF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:resume of|cv of|curriculum vitae of)\s+([A-Z][A-Za-z'.\-]*(?: [A-Z][A-Za-z'.\-]*){0,3})")
        .unwrap()
});
static NAME_BOILERPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(resume|cv|curriculum vitae)\b").unwrap());

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());
static PRESENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(present|current|now|today)\b").unwrap());
static LEVELED_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s*(?:\(|-|:|–)\s*(beginner|intermediate|advanced|expert)\)?$").unwrap()
});
static PROFICIENCY_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*(?:\((.+)\)|[-:–]\s*(.+))$").unwrap());

/// Longer first lines are prose, not a name.
const MAX_NAME_CHARS: usize = 80;

/// Input shared by all extractors.
pub struct ParseInput<'a> {
    pub text: &'a str,
    pub vocabulary: &'a Vocabulary,
}

/// A single named parsing strategy.
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume);
}

pub struct NameExtractor;
pub struct ContactExtractor;
pub struct SummaryExtractor;
pub struct WorkExperienceExtractor;
pub struct EducationExtractor;
pub struct SkillsExtractor;
pub struct CertificationsExtractor;
pub struct ProjectsExtractor;
pub struct LanguagesExtractor;
pub struct InterestsExtractor;
pub struct ReferencesExtractor;

impl Extractor for NameExtractor {
    fn name(&self) -> &'static str {
        "name"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        if let Some(caps) = RESUME_OF.captures(input.text) {
            resume.name = caps[1].trim().to_string();
            return;
        }

        let mut candidates = input
            .text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !is_header(line));

        let candidate = match candidates.next() {
            Some(line) if NAME_BOILERPLATE.is_match(line) => candidates.next(),
            other => other,
        };

        if let Some(line) =
            candidate.filter(|line| !line.contains('@') && line.chars().count() <= MAX_NAME_CHARS)
        {
            resume.name = line.to_string();
        }
    }
}

impl Extractor for ContactExtractor {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        let text = input.text;
        let contact = &mut resume.contact_info;

        if let Some(m) = EMAIL.find(text) {
            contact.email = m.as_str().to_string();
        }
        contact.phone = PHONE.find(text).map(|m| m.as_str().trim().to_string());
        contact.linkedin = LINKEDIN.find(text).map(|m| m.as_str().to_string());
        contact.website = WEBSITE
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|url| !url.to_lowercase().contains("linkedin.com"))
            .map(|url| url.trim_end_matches('.').to_string());
        contact.location = LOCATION_LABEL
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|loc| !loc.is_empty());
    }
}

impl Extractor for SummaryExtractor {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        let summary = section_lines(input.text, Section::Summary)
            .into_iter()
            .take_while(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        resume.summary = summary.trim().to_string();
    }
}

impl Extractor for WorkExperienceExtractor {
    fn name(&self) -> &'static str {
        "work_experience"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        let mut entries: Vec<WorkExperience> = Vec::new();

        for line in section_lines(input.text, Section::WorkExperience) {
            if let Some(bullet) = strip_bullet(line) {
                if let Some(current) = entries.last_mut() {
                    if !bullet.is_empty() {
                        current.responsibilities.push(bullet.to_string());
                    }
                }
                continue;
            }
            // First pattern that matches wins
            let header = ENTRY_HEADER
                .captures(line)
                .or_else(|| PIPE_ENTRY_HEADER.captures(line));
            if let Some(caps) = header {
                entries.push(WorkExperience {
                    position: caps[1].trim().to_string(),
                    company: caps[2].trim().to_string(),
                    period: caps[3].trim().to_string(),
                    responsibilities: Vec::new(),
                    location: None,
                });
            }
        }

        order_by_recency(&mut entries, |entry: &WorkExperience| {
            recency_key(&entry.period)
        });
        resume.work_experience = entries;
    }
}

impl Extractor for EducationExtractor {
    fn name(&self) -> &'static str {
        "education"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        let mut entries: Vec<Education> = Vec::new();

        for line in section_lines(input.text, Section::Education) {
            if let Some(bullet) = strip_bullet(line) {
                if let Some(current) = entries.last_mut() {
                    if !bullet.is_empty() {
                        current.achievements.push(bullet.to_string());
                    }
                }
                continue;
            }
            if let Some(caps) = EDUCATION_ENTRY.captures(line) {
                let degree = caps[1].trim().to_string();
                let year = YEAR
                    .find_iter(&caps[3])
                    .last()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                entries.push(Education {
                    field_of_study: field_of_study(&degree),
                    degree,
                    institution: caps[2].trim().to_string(),
                    year,
                    achievements: Vec::new(),
                });
            }
        }

        order_by_recency(&mut entries, |entry: &Education| {
            entry.year.parse::<i32>().ok().map(|y| (y, y))
        });
        resume.education = entries;
    }
}

impl Extractor for SkillsExtractor {
    fn name(&self) -> &'static str {
        "skills"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        let lower = input.text.to_lowercase();
        let mut skills: Vec<Skill> = Vec::new();

        for term in input.vocabulary.skills() {
            let already = skills.iter().any(|s| s.name.eq_ignore_ascii_case(term));
            if !already && contains_whole_word(&lower, &term.to_lowercase()) {
                skills.push(Skill::named(term));
            }
        }

        // Explicit levels, e.g. "Rust (Expert)", only inside the Skills section
        for item in split_items(&section_lines(input.text, Section::Skills)) {
            if let Some(caps) = LEVELED_ITEM.captures(&item) {
                let name = caps[1].trim();
                if let Some(skill) = skills
                    .iter_mut()
                    .find(|s| s.name.eq_ignore_ascii_case(name))
                {
                    skill.level = Some(capitalize(&caps[2]));
                }
            }
        }

        resume.skills = skills;
    }
}

impl Extractor for CertificationsExtractor {
    fn name(&self) -> &'static str {
        "certifications"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        resume.certifications = section_lines(input.text, Section::Certifications)
            .into_iter()
            .map(|line| strip_bullet(line).unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(parse_certification)
            .collect();
    }
}

impl Extractor for ProjectsExtractor {
    fn name(&self) -> &'static str {
        "projects"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        let mut projects: Vec<Project> = Vec::new();

        for line in section_lines(input.text, Section::Projects) {
            if line.is_empty() {
                continue;
            }
            match (strip_bullet(line), projects.last_mut()) {
                (Some(detail), Some(current)) => {
                    if !current.description.is_empty() {
                        current.description.push(' ');
                    }
                    current.description.push_str(detail);
                }
                (Some(detail), None) => projects.push(project_from_line(detail)),
                (None, _) => projects.push(project_from_line(line)),
            }
        }

        for project in &mut projects {
            let haystack = format!("{} {}", project.name, project.description).to_lowercase();
            project.technologies = input
                .vocabulary
                .skills()
                .filter(|term| contains_whole_word(&haystack, &term.to_lowercase()))
                .map(str::to_string)
                .collect();
        }

        resume.projects = projects;
    }
}

impl Extractor for LanguagesExtractor {
    fn name(&self) -> &'static str {
        "languages"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        resume.languages = split_items(&section_lines(input.text, Section::Languages))
            .into_iter()
            .map(|item| match PROFICIENCY_ITEM.captures(&item) {
                Some(caps) => Language {
                    name: caps[1].trim().to_string(),
                    proficiency: caps
                        .get(2)
                        .or_else(|| caps.get(3))
                        .map(|m| m.as_str().trim().to_string()),
                },
                None => Language {
                    name: item,
                    proficiency: None,
                },
            })
            .collect();
    }
}

impl Extractor for InterestsExtractor {
    fn name(&self) -> &'static str {
        "interests"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        resume.interests = split_items(&section_lines(input.text, Section::Interests));
    }
}

impl Extractor for ReferencesExtractor {
    fn name(&self) -> &'static str {
        "references"
    }

    fn extract(&self, input: &ParseInput<'_>, resume: &mut StructuredResume) {
        resume.references = section_lines(input.text, Section::References)
            .into_iter()
            .map(|line| strip_bullet(line).unwrap_or(line).to_string())
            .filter(|line| !line.is_empty())
            .collect();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Returns the bullet text without its `-` / `•` marker, or `None` for non-bullets.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let line = line.trim_start();
    line.strip_prefix('-')
        .or_else(|| line.strip_prefix('•'))
        .map(str::trim)
}

/// Case-sensitive whole-word containment; callers lowercase both sides.
/// Word characters are alphanumerics and `_`, so terms like `c++` or `node.js` work.
pub fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits list-style section lines into items on commas, semicolons, pipes and bullets.
fn split_items(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| line.split([',', ';', '|', '•']))
        .map(|item| strip_bullet(item).unwrap_or(item).trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn field_of_study(degree: &str) -> Option<String> {
    let lower = degree.to_lowercase();
    lower
        .find(" in ")
        .and_then(|idx| degree.get(idx + 4..))
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
}

fn parse_certification(line: &str) -> Certification {
    let (rest, date) = match (line.rfind('('), line.ends_with(')')) {
        (Some(open), true) => (
            line[..open].trim(),
            Some(line[open + 1..line.len() - 1].trim().to_string()),
        ),
        _ => (line, None),
    };

    let split = [" - ", " – ", " | ", ", "]
        .iter()
        .find_map(|sep| rest.split_once(sep));

    match split {
        Some((name, issuer)) => Certification {
            name: name.trim().to_string(),
            issuer: Some(issuer.trim().to_string()).filter(|i| !i.is_empty()),
            date,
        },
        None => Certification {
            name: rest.to_string(),
            issuer: None,
            date,
        },
    }
}

fn project_from_line(line: &str) -> Project {
    let split = [": ", " - ", " – "]
        .iter()
        .find_map(|sep| line.split_once(sep));
    match split {
        Some((name, description)) => Project {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            technologies: Vec::new(),
        },
        None => Project {
            name: line.trim().to_string(),
            description: String::new(),
            technologies: Vec::new(),
        },
    }
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `(end_year, start_year)` for a period string; "Present" ends in the current year.
fn recency_key(period: &str) -> Option<(i32, i32)> {
    let years: Vec<i32> = YEAR
        .find_iter(period)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    let start = *years.first()?;
    let end = if PRESENT.is_match(period) {
        chrono::Utc::now().year().max(start)
    } else {
        *years.last()?
    };
    Some((end, start))
}

/// Sorts most recent first when every entry has a known date; otherwise keeps source order.
fn order_by_recency<T>(entries: &mut [T], key: impl Fn(&T) -> Option<(i32, i32)>) {
    if entries.iter().all(|entry| key(entry).is_some()) {
        entries.sort_by(|a, b| key(b).cmp(&key(a)));
    }
}
