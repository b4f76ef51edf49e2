//! Term vocabulary driving skill detection, job keyword extraction and job-title
//! detection. Loaded as data so it can be extended without touching the matchers.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Vocabulary shipped with the binary.
const DEFAULT_VOCABULARY: &str = include_str!("../data/vocabulary.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCategory {
    Language,
    Framework,
    Cloud,
    Database,
    Tool,
    Methodology,
    /// Role descriptors ("frontend", "leadership"): job keywords, never resume skills.
    Role,
    JobTitle,
}

impl TermCategory {
    pub fn is_skill(self) -> bool {
        !matches!(self, TermCategory::Role | TermCategory::JobTitle)
    }

    pub fn is_keyword(self) -> bool {
        !matches!(self, TermCategory::JobTitle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyTerm {
    /// Display casing, e.g. "Node.js".
    pub term: String,
    pub category: TermCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    pub terms: Vec<VocabularyTerm>,
}

impl Vocabulary {
    /// Loads the vocabulary from `path`, or the embedded default when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let vocabulary = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read vocabulary file {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("Invalid vocabulary file {}", path.display()))?
            }
            None => Self::default(),
        };

        info!(
            "Vocabulary loaded: {} skills, {} keywords, {} job titles",
            vocabulary.skills().count(),
            vocabulary.keywords().count(),
            vocabulary.job_titles().count()
        );
        Ok(vocabulary)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let vocabulary: Vocabulary = serde_json::from_str(raw)?;
        if vocabulary.terms.iter().any(|t| t.term.trim().is_empty()) {
            anyhow::bail!("vocabulary contains an empty term");
        }
        Ok(vocabulary)
    }

    /// Terms detected as resume skills, display casing.
    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.terms
            .iter()
            .filter(|t| t.category.is_skill())
            .map(|t| t.term.as_str())
    }

    /// Job-description keywords, lowercase, vocabulary order.
    pub fn keywords(&self) -> impl Iterator<Item = String> + '_ {
        self.terms
            .iter()
            .filter(|t| t.category.is_keyword())
            .map(|t| t.term.to_lowercase())
    }

    /// Job titles, lowercase, vocabulary order.
    pub fn job_titles(&self) -> impl Iterator<Item = String> + '_ {
        self.terms
            .iter()
            .filter(|t| t.category == TermCategory::JobTitle)
            .map(|t| t.term.to_lowercase())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        serde_json::from_str(DEFAULT_VOCABULARY).expect("embedded vocabulary.json is valid")
    }
}
