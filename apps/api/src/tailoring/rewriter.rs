//! Deterministic heuristic rewrite. Always available; the LLM branch falls back to it.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::ingest::builder::{finalize, join_with_and};
use crate::models::resume::StructuredResume;
use crate::tailoring::keywords::{extract_keywords, match_resume, missing_keywords, KeywordSet, MatchResult};
use crate::vocabulary::Vocabulary;

pub const KEY_SKILL_MARKER: &str = "(key skill for this role)";
pub const DEFAULT_SKILL_LEVEL: &str = "Advanced";
const SUMMARY_MIN_WORDS: usize = 10;
const TOP_KEYWORDS: usize = 3;

static QUANTIFIED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+(\.\d+)?\s*%|\b(increased|reduced|improved|decreased|grew|saved|boosted|cut|doubled|tripled)\b")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteStrategy {
    Llm,
    Heuristic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
    pub original_cv: StructuredResume,
    pub rewritten_cv: StructuredResume,
    pub job_description: String,
    pub matches: MatchResult,
    pub improvements: Vec<String>,
    /// Which branch produced `rewritten_cv`.
    pub strategy: RewriteStrategy,
    /// Free-text rewrite when the model answered in prose instead of JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewritten_text: Option<String>,
}

/// Tailors `resume` to `job_text`. The input is never modified.
pub fn rewrite(resume: &StructuredResume, job_text: &str, vocabulary: &Vocabulary) -> RewriteResult {
    let keywords = extract_keywords(job_text, vocabulary);
    // Matches reflect the resume as the user wrote it
    let matches = match_resume(resume, &keywords);

    let mut cv = resume.clone();
    cv.summary = enhance_summary(&cv.summary, &keywords, job_text, vocabulary);
    annotate_responsibilities(&mut cv, &keywords);
    for skill in &mut cv.skills {
        if skill.level.is_none() && matches.skills.contains(&skill.name) {
            skill.level = Some(DEFAULT_SKILL_LEVEL.to_string());
        }
    }

    RewriteResult {
        original_cv: resume.clone(),
        rewritten_cv: finalize(cv),
        job_description: job_text.to_string(),
        improvements: suggest_improvements(resume, &keywords),
        matches,
        strategy: RewriteStrategy::Heuristic,
        rewritten_text: None,
    }
}

fn enhance_summary(
    summary: &str,
    keywords: &KeywordSet,
    job_text: &str,
    vocabulary: &Vocabulary,
) -> String {
    let top = keywords.top(TOP_KEYWORDS);
    let summary = summary.trim();

    if summary.is_empty() {
        return if top.is_empty() {
            "Results-driven professional ready to contribute to the team.".to_string()
        } else {
            format!("Results-driven professional with expertise in {}.", join_with_and(&top))
        };
    }

    let job_lower = job_text.to_lowercase();
    let summary_lower = summary.to_lowercase();
    let title = vocabulary
        .job_titles()
        .find(|title| job_lower.contains(title.as_str()));

    match title {
        Some(title) if !summary_lower.contains(&title) => {
            let role = title_case(&title);
            if top.is_empty() {
                format!("{summary} Seeking to bring this experience to a {role} role.")
            } else {
                format!(
                    "{summary} Seeking to leverage expertise in {} as a {role}.",
                    top.join(", ")
                )
            }
        }
        _ if !top.is_empty() => format!("{summary} Proficient in {}.", top.join(", ")),
        _ => summary.to_string(),
    }
}

/// Appends the key-skill marker after the first job keyword found in each bullet.
fn annotate_responsibilities(cv: &mut StructuredResume, keywords: &KeywordSet) {
    let patterns: Vec<Regex> = keywords
        .iter()
        .filter_map(|k| {
            RegexBuilder::new(&regex::escape(k))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect();

    for entry in &mut cv.work_experience {
        for bullet in &mut entry.responsibilities {
            if bullet.contains(KEY_SKILL_MARKER) {
                continue;
            }
            let end = patterns
                .iter()
                .find_map(|p| p.find(bullet.as_str()))
                .map(|m| m.end());
            if let Some(end) = end {
                bullet.insert_str(end, &format!(" {KEY_SKILL_MARKER}"));
            }
        }
    }
}

/// Ordered suggestions, computed from the resume as submitted.
pub fn suggest_improvements(resume: &StructuredResume, keywords: &KeywordSet) -> Vec<String> {
    let mut improvements = Vec::new();

    let missing = missing_keywords(resume, keywords);
    if !missing.is_empty() {
        improvements.push(format!(
            "Consider adding these skills that match the job description: {}.",
            missing.join(", ")
        ));
    }

    if resume.summary.split_whitespace().count() < SUMMARY_MIN_WORDS {
        improvements.push(format!(
            "Expand your professional summary to at least {SUMMARY_MIN_WORDS} words and tie it to this role."
        ));
    }

    if !resume.responsibilities().any(|b| QUANTIFIED.is_match(b)) {
        improvements.push(
            "Add quantifiable achievements to your experience, such as percentages or results \
             (\"increased conversion by 15%\", \"reduced build time by half\")."
                .to_string(),
        );
    }

    let top = keywords.top(TOP_KEYWORDS);
    improvements.push(if top.is_empty() {
        "Add project examples that demonstrate the core requirements of this role.".to_string()
    } else {
        format!("Add project examples demonstrating {}.", join_with_and(&top))
    });

    improvements
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Skill, WorkExperience};

    const JOB: &str =
        "We need a React and TypeScript frontend developer with 3+ years experience building UI.";

    fn jane() -> StructuredResume {
        StructuredResume {
            name: "Jane Doe".into(),
            summary: "Frontend dev.".into(),
            skills: vec![Skill::named("React")],
            work_experience: vec![WorkExperience {
                company: "Acme".into(),
                position: "Dev".into(),
                period: "2020-Present".into(),
                responsibilities: vec!["Built UI with React".into()],
                location: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let result = rewrite(&jane(), JOB, &Vocabulary::default());

        assert_eq!(result.matches.skills, vec!["React"]);
        let bullet = &result.rewritten_cv.work_experience[0].responsibilities[0];
        assert_eq!(bullet, "Built UI with React (key skill for this role)");
        assert!(bullet.find("React").unwrap() < bullet.find(KEY_SKILL_MARKER).unwrap());
        assert!(result
            .improvements
            .iter()
            .any(|i| i.to_lowercase().contains("typescript")));
        assert_eq!(result.strategy, RewriteStrategy::Heuristic);
        assert_eq!(result.job_description, JOB);
    }

    #[test]
    fn test_rewrite_never_mutates_input() {
        let original = jane();
        let snapshot = original.clone();
        let mut result = rewrite(&original, JOB, &Vocabulary::default());
        assert_eq!(original, snapshot);
        assert_eq!(result.original_cv, snapshot);

        result.rewritten_cv.name = "Changed".into();
        result.rewritten_cv.skills.clear();
        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_missing_summary_uses_top_keywords() {
        let resume = StructuredResume {
            summary: String::new(),
            ..jane()
        };
        let job = "Looking for an engineer skilled in TypeScript, React, Node.js, testing and clean code.";
        let result = rewrite(&resume, job, &Vocabulary::default());
        let summary = result.rewritten_cv.summary.to_lowercase();
        assert!(summary.starts_with("results-driven professional"));
        assert!(["typescript", "react", "node.js"]
            .iter()
            .any(|k| summary.contains(k)));
    }

    #[test]
    fn test_summary_targets_detected_job_title() {
        let result = rewrite(&jane(), JOB, &Vocabulary::default());
        assert_eq!(
            result.rewritten_cv.summary,
            "Frontend dev. Seeking to leverage expertise in typescript, react, frontend as a Frontend Developer."
        );
    }

    #[test]
    fn test_summary_already_naming_title_gets_proficiency_sentence() {
        let resume = StructuredResume {
            summary: "Experienced frontend developer.".into(),
            ..jane()
        };
        let result = rewrite(&resume, JOB, &Vocabulary::default());
        assert_eq!(
            result.rewritten_cv.summary,
            "Experienced frontend developer. Proficient in typescript, react, frontend."
        );
    }

    #[test]
    fn test_annotation_once_per_bullet_and_idempotent() {
        let resume = StructuredResume {
            work_experience: vec![WorkExperience {
                responsibilities: vec![
                    "Migrated react app to typescript".into(),
                    "Wrote docs".into(),
                ],
                ..Default::default()
            }],
            ..jane()
        };
        let first = rewrite(&resume, JOB, &Vocabulary::default());
        let bullets = &first.rewritten_cv.work_experience[0].responsibilities;
        // "typescript" comes first in keyword order
        assert_eq!(
            bullets[0],
            "Migrated react app to typescript (key skill for this role)"
        );
        assert_eq!(bullets[1], "Wrote docs");

        let second = rewrite(&first.rewritten_cv, JOB, &Vocabulary::default());
        assert_eq!(
            second.rewritten_cv.work_experience[0].responsibilities[0]
                .matches(KEY_SKILL_MARKER)
                .count(),
            1
        );
    }

    #[test]
    fn test_matched_skills_get_default_level_without_override() {
        let resume = StructuredResume {
            skills: vec![
                Skill::named("React"),
                Skill {
                    name: "TypeScript".into(),
                    level: Some("Intermediate".into()),
                },
                Skill::named("Cooking"),
            ],
            ..jane()
        };
        let result = rewrite(&resume, JOB, &Vocabulary::default());
        let levels: Vec<Option<&str>> = result
            .rewritten_cv
            .skills
            .iter()
            .map(|s| s.level.as_deref())
            .collect();
        assert_eq!(levels, vec![Some("Advanced"), Some("Intermediate"), None]);
    }

    #[test]
    fn test_improvements_order_and_closing_suggestion() {
        let result = rewrite(&jane(), JOB, &Vocabulary::default());
        let improvements = &result.improvements;
        assert_eq!(improvements.len(), 4);
        assert!(improvements[0].starts_with("Consider adding these skills"));
        assert!(improvements[1].contains("summary"));
        assert!(improvements[2].contains("quantifiable"));
        assert_eq!(
            improvements[3],
            "Add project examples demonstrating typescript, react and frontend."
        );
    }

    #[test]
    fn test_quantified_bullets_suppress_suggestion() {
        let resume = StructuredResume {
            summary: "Frontend developer with eight years of experience shipping accessible web apps.".into(),
            work_experience: vec![WorkExperience {
                responsibilities: vec!["Reduced page load by 40%".into()],
                ..Default::default()
            }],
            ..jane()
        };
        let improvements = suggest_improvements(
            &resume,
            &extract_keywords(JOB, &Vocabulary::default()),
        );
        assert!(!improvements.iter().any(|i| i.contains("quantifiable")));
        assert!(!improvements.iter().any(|i| i.contains("summary")));
        assert!(improvements.iter().all(|i| !i.is_empty()));
    }

    #[test]
    fn test_no_keywords_still_produces_suggestions() {
        let job = "We are hiring a friendly person to join our growing team soon.";
        let result = rewrite(&jane(), job, &Vocabulary::default());
        assert!(result.matches.skills.is_empty());
        assert_eq!(
            result.improvements.last().map(String::as_str),
            Some("Add project examples that demonstrate the core requirements of this role.")
        );
        assert_eq!(result.rewritten_cv.summary, "Frontend dev.");
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = rewrite(&jane(), JOB, &Vocabulary::default());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("originalCv").is_some());
        assert!(json.get("rewrittenCv").is_some());
        assert_eq!(json["strategy"], "heuristic");
        assert!(json.get("rewrittenText").is_none());
    }
}
