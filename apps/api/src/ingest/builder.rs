//! Model builder (stage 4): the one place the "never empty" invariants on
//! `name`, `contactInfo.email` and `summary` are enforced.

use crate::models::resume::StructuredResume;

pub const UNKNOWN_NAME: &str = "Unknown Name";
pub const PLACEHOLDER_EMAIL: &str = "no-email@example.com";

/// Applies defaults to a parsed (or client/LLM supplied) resume.
pub fn finalize(mut resume: StructuredResume) -> StructuredResume {
    if resume.name.trim().is_empty() {
        resume.name = UNKNOWN_NAME.to_string();
    }
    if resume.contact_info.email.trim().is_empty() {
        resume.contact_info.email = PLACEHOLDER_EMAIL.to_string();
    }
    if resume.summary.trim().is_empty() {
        resume.summary = synthesize_summary(&resume);
    }
    resume
}

fn synthesize_summary(resume: &StructuredResume) -> String {
    let skills: Vec<&str> = resume
        .skills
        .iter()
        .take(3)
        .map(|s| s.name.as_str())
        .collect();

    let mut summary = if skills.is_empty() {
        "Professional with a diverse background.".to_string()
    } else {
        format!("Professional with expertise in {}.", join_with_and(&skills))
    };

    if let Some(latest) = resume.work_experience.first() {
        let position = latest.position.trim();
        let company = latest.company.trim();
        match (position.is_empty(), company.is_empty()) {
            (false, false) => {
                summary.push_str(&format!(" Most recently worked as {position} at {company}."))
            }
            (false, true) => summary.push_str(&format!(" Most recently worked as {position}.")),
            (true, false) => summary.push_str(&format!(" Most recently worked at {company}.")),
            (true, true) => {}
        }
    }

    summary
}

/// `["a"]` → `a`, `["a", "b"]` → `a and b`, `["a", "b", "c"]` → `a, b and c`.
pub fn join_with_and<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => format!(
            "{} and {}",
            init.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", "),
            last.as_ref()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Skill, WorkExperience};

    #[test]
    fn test_finalize_fills_sentinels() {
        let resume = finalize(StructuredResume::default());
        assert_eq!(resume.name, UNKNOWN_NAME);
        assert_eq!(resume.contact_info.email, PLACEHOLDER_EMAIL);
        assert!(!resume.summary.is_empty());
        assert!(resume.work_experience.is_empty());
        assert!(resume.skills.is_empty());
    }

    #[test]
    fn test_finalize_synthesizes_summary_from_skills_and_latest_role() {
        let resume = StructuredResume {
            skills: vec![
                Skill::named("Rust"),
                Skill::named("Go"),
                Skill::named("SQL"),
                Skill::named("Docker"),
            ],
            work_experience: vec![WorkExperience {
                company: "Acme".into(),
                position: "Staff Engineer".into(),
                period: "2021 - Present".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let resume = finalize(resume);
        assert_eq!(
            resume.summary,
            "Professional with expertise in Rust, Go and SQL. Most recently worked as Staff Engineer at Acme."
        );
    }

    #[test]
    fn test_finalize_keeps_existing_values() {
        let mut resume = StructuredResume {
            name: "Jane Doe".into(),
            summary: "Frontend dev.".into(),
            ..Default::default()
        };
        resume.contact_info.email = "jane@example.com".into();
        let finalized = finalize(resume.clone());
        assert_eq!(finalized, resume);
    }

    #[test]
    fn test_blank_values_are_treated_as_empty() {
        let resume = finalize(StructuredResume {
            name: "   ".into(),
            ..Default::default()
        });
        assert_eq!(resume.name, UNKNOWN_NAME);
    }

    #[test]
    fn test_join_with_and() {
        assert_eq!(join_with_and::<&str>(&[]), "");
        assert_eq!(join_with_and(&["a"]), "a");
        assert_eq!(join_with_and(&["a", "b"]), "a and b");
        assert_eq!(join_with_and(&["a", "b", "c"]), "a, b and c");
    }
}
