//! Keyword/match engine: job text → vocabulary keywords → resume matches.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::resume::StructuredResume;
use crate::vocabulary::Vocabulary;

/// Terms shorter than this only match by equality ("r" must not match "react").
const MIN_SUBSTRING_MATCH_LEN: usize = 3;

/// Ordered, deduplicated lowercase keywords in vocabulary order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first `n` keywords.
    pub fn top(&self, n: usize) -> Vec<&str> {
        self.iter().take(n).collect()
    }
}

impl FromIterator<String> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        KeywordSet(
            iter.into_iter()
                .filter(|k| seen.insert(k.clone()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Resume skill names (resume casing) that match a job keyword.
    pub skills: Vec<String>,
    /// Job keywords found in any responsibility bullet, once each.
    pub experience: Vec<String>,
}

/// A vocabulary keyword is present when it is one of the job text's words OR a
/// substring of the lowercased text. The substring half is deliberately
/// permissive ("java" matches "javascript").
pub fn extract_keywords(job_text: &str, vocabulary: &Vocabulary) -> KeywordSet {
    let lower = job_text.to_lowercase();
    let words: HashSet<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();

    vocabulary
        .keywords()
        .filter(|keyword| words.contains(keyword.as_str()) || lower.contains(keyword.as_str()))
        .collect()
}

/// Bidirectional containment between a lowercase skill name and a keyword.
pub fn skill_matches_keyword(skill: &str, keyword: &str) -> bool {
    if skill.is_empty() || keyword.is_empty() {
        return false;
    }
    if skill.chars().count() < MIN_SUBSTRING_MATCH_LEN
        || keyword.chars().count() < MIN_SUBSTRING_MATCH_LEN
    {
        return skill == keyword;
    }
    skill.contains(keyword) || keyword.contains(skill)
}

pub fn match_resume(resume: &StructuredResume, keywords: &KeywordSet) -> MatchResult {
    let mut skills: Vec<String> = Vec::new();
    for skill in &resume.skills {
        let lower = skill.name.trim().to_lowercase();
        let matched = keywords.iter().any(|k| skill_matches_keyword(&lower, k));
        if matched && !skills.contains(&skill.name) {
            skills.push(skill.name.clone());
        }
    }

    let bullets: Vec<String> = resume.responsibilities().map(str::to_lowercase).collect();
    let experience = keywords
        .iter()
        .filter(|k| bullets.iter().any(|b| b.contains(k)))
        .map(str::to_string)
        .collect();

    MatchResult { skills, experience }
}

/// Keywords that no resume skill covers, in keyword order.
pub fn missing_keywords<'a>(resume: &StructuredResume, keywords: &'a KeywordSet) -> Vec<&'a str> {
    let skills: Vec<String> = resume
        .skills
        .iter()
        .map(|s| s.name.trim().to_lowercase())
        .collect();
    keywords
        .iter()
        .filter(|k| !skills.iter().any(|s| skill_matches_keyword(s, k)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Skill, WorkExperience};

    const JOB: &str =
        "We need a React and TypeScript frontend developer with 3+ years experience building UI.";

    #[test]
    fn test_extract_keywords_in_vocabulary_order() {
        let keywords = extract_keywords(JOB, &Vocabulary::default());
        assert_eq!(keywords.top(10), vec!["typescript", "react", "frontend"]);
    }

    #[test]
    fn test_extract_keywords_substring_semantics() {
        let keywords = extract_keywords("Strong JavaScript and Node.js skills", &Vocabulary::default());
        let all: Vec<&str> = keywords.iter().collect();
        assert!(all.contains(&"javascript"));
        assert!(all.contains(&"node.js"));
        // Substring containment keeps "java" inside "javascript"
        assert!(all.contains(&"java"));
    }

    #[test]
    fn test_extract_keywords_empty_text() {
        assert!(extract_keywords("", &Vocabulary::default()).is_empty());
    }

    #[test]
    fn test_keyword_set_deduplicates() {
        let set: KeywordSet = ["a", "b", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.top(5), vec!["a", "b"]);
    }

    #[test]
    fn test_match_preserves_resume_casing() {
        let resume = StructuredResume {
            skills: vec![Skill::named("React"), Skill::named("Cooking")],
            ..Default::default()
        };
        let keywords = extract_keywords(JOB, &Vocabulary::default());
        let result = match_resume(&resume, &keywords);
        assert_eq!(result.skills, vec!["React"]);
    }

    #[test]
    fn test_match_is_bidirectional() {
        let keywords: KeywordSet = ["react", "node.js"].iter().map(|s| s.to_string()).collect();
        let resume = StructuredResume {
            skills: vec![Skill::named("React Native"), Skill::named("Node")],
            ..Default::default()
        };
        let result = match_resume(&resume, &keywords);
        assert_eq!(result.skills, vec!["React Native", "Node"]);
    }

    #[test]
    fn test_short_terms_match_only_exactly() {
        assert!(!skill_matches_keyword("r", "react"));
        assert!(!skill_matches_keyword("go", "golang"));
        assert!(skill_matches_keyword("go", "go"));
        assert!(skill_matches_keyword("typescript", "typescript"));
        assert!(!skill_matches_keyword("", "react"));
    }

    #[test]
    fn test_experience_matches_once_per_keyword() {
        let keywords: KeywordSet = ["react", "aws"].iter().map(|s| s.to_string()).collect();
        let resume = StructuredResume {
            work_experience: vec![
                WorkExperience {
                    responsibilities: vec!["Built UI with React".into(), "More React work".into()],
                    ..Default::default()
                },
                WorkExperience {
                    responsibilities: vec!["React again".into()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let result = match_resume(&resume, &keywords);
        assert_eq!(result.experience, vec!["react"]);
    }

    #[test]
    fn test_missing_keywords() {
        let keywords = extract_keywords(JOB, &Vocabulary::default());
        let resume = StructuredResume {
            skills: vec![Skill::named("React")],
            ..Default::default()
        };
        assert_eq!(missing_keywords(&resume, &keywords), vec!["typescript", "frontend"]);
    }
}
