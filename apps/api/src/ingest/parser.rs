//! Section parser (stage 3): runs every extractor over the normalized text.

use tracing::debug;

use crate::ingest::builder::finalize;
use crate::ingest::extractors::{
    CertificationsExtractor, ContactExtractor, EducationExtractor, Extractor,
    InterestsExtractor, LanguagesExtractor, NameExtractor, ParseInput, ProjectsExtractor,
    ReferencesExtractor, SkillsExtractor, SummaryExtractor, WorkExperienceExtractor,
};
use crate::models::resume::StructuredResume;
use crate::vocabulary::Vocabulary;

/// Fixed extractor order. Each strategy writes disjoint fields, so order only
/// matters for log readability.
pub fn pipeline() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(NameExtractor),
        Box::new(ContactExtractor),
        Box::new(SummaryExtractor),
        Box::new(WorkExperienceExtractor),
        Box::new(EducationExtractor),
        Box::new(SkillsExtractor),
        Box::new(CertificationsExtractor),
        Box::new(ProjectsExtractor),
        Box::new(LanguagesExtractor),
        Box::new(InterestsExtractor),
        Box::new(ReferencesExtractor),
    ]
}

/// Parses normalized text into a resume without applying defaults.
pub fn parse(text: &str, vocabulary: &Vocabulary) -> StructuredResume {
    let input = ParseInput { text, vocabulary };
    let mut resume = StructuredResume::default();
    for extractor in pipeline() {
        extractor.extract(&input, &mut resume);
        debug!("Extractor '{}' done", extractor.name());
    }
    resume
}

/// `parse` followed by `finalize`.
pub fn parse_resume(text: &str, vocabulary: &Vocabulary) -> StructuredResume {
    finalize(parse(text, vocabulary))
}
