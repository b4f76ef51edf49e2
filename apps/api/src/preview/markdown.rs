use std::fmt::Write;

use crate::models::resume::StructuredResume;

/// Renders a resume as a Markdown document. Empty sections are skipped.
pub fn render_markdown(resume: &StructuredResume) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {}", resume.name.trim());

    let contact = &resume.contact_info;
    let contact_line: Vec<&str> = [
        Some(contact.email.as_str()),
        contact.phone.as_deref(),
        contact.linkedin.as_deref(),
        contact.website.as_deref(),
        contact.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect();
    if !contact_line.is_empty() {
        let _ = writeln!(md, "\n{}", contact_line.join(" | "));
    }

    if !resume.summary.trim().is_empty() {
        section(&mut md, "Summary");
        let _ = writeln!(md, "{}", resume.summary.trim());
    }

    if !resume.work_experience.is_empty() {
        section(&mut md, "Work Experience");
        for (i, job) in resume.work_experience.iter().enumerate() {
            entry_gap(&mut md, i);
            let _ = writeln!(md, "### {} — {}", job.position.trim(), job.company.trim());
            let meta: Vec<&str> = [Some(job.period.as_str()), job.location.as_deref()]
                .into_iter()
                .flatten()
                .filter(|m| !m.trim().is_empty())
                .collect();
            if !meta.is_empty() {
                let _ = writeln!(md, "*{}*", meta.join(" · "));
            }
            bullets(&mut md, &job.responsibilities);
        }
    }

    if !resume.education.is_empty() {
        section(&mut md, "Education");
        for (i, edu) in resume.education.iter().enumerate() {
            entry_gap(&mut md, i);
            let _ = writeln!(md, "### {} — {}", edu.degree.trim(), edu.institution.trim());
            if !edu.year.trim().is_empty() {
                let _ = writeln!(md, "*{}*", edu.year.trim());
            }
            bullets(&mut md, &edu.achievements);
        }
    }

    if !resume.skills.is_empty() {
        section(&mut md, "Skills");
        for skill in &resume.skills {
            match &skill.level {
                Some(level) => {
                    let _ = writeln!(md, "- {} ({})", skill.name, level);
                }
                None => {
                    let _ = writeln!(md, "- {}", skill.name);
                }
            }
        }
    }

    if !resume.certifications.is_empty() {
        section(&mut md, "Certifications");
        for cert in &resume.certifications {
            let mut line = cert.name.clone();
            if let Some(issuer) = &cert.issuer {
                let _ = write!(line, ", {issuer}");
            }
            if let Some(date) = &cert.date {
                let _ = write!(line, " ({date})");
            }
            let _ = writeln!(md, "- {line}");
        }
    }

    if !resume.projects.is_empty() {
        section(&mut md, "Projects");
        for (i, project) in resume.projects.iter().enumerate() {
            entry_gap(&mut md, i);
            let _ = writeln!(md, "### {}", project.name);
            if !project.description.is_empty() {
                let _ = writeln!(md, "{}", project.description);
            }
            if !project.technologies.is_empty() {
                let _ = writeln!(md, "*Technologies: {}*", project.technologies.join(", "));
            }
        }
    }

    if !resume.languages.is_empty() {
        section(&mut md, "Languages");
        for language in &resume.languages {
            match &language.proficiency {
                Some(p) => {
                    let _ = writeln!(md, "- {} ({})", language.name, p);
                }
                None => {
                    let _ = writeln!(md, "- {}", language.name);
                }
            }
        }
    }

    if !resume.interests.is_empty() {
        section(&mut md, "Interests");
        let _ = writeln!(md, "{}", resume.interests.join(", "));
    }

    if !resume.references.is_empty() {
        section(&mut md, "References");
        for reference in &resume.references {
            let _ = writeln!(md, "- {reference}");
        }
    }

    md
}

fn section(md: &mut String, title: &str) {
    let _ = writeln!(md, "\n## {title}\n");
}

fn entry_gap(md: &mut String, index: usize) {
    if index > 0 {
        md.push('\n');
    }
}

fn bullets(md: &mut String, items: &[String]) {
    if items.is_empty() {
        return;
    }
    md.push('\n');
    for item in items {
        let _ = writeln!(md, "- {item}");
    }
}

/// File name for the Markdown download, derived from the candidate name.
pub fn markdown_file_name(resume: &StructuredResume) -> String {
    let slug = resume
        .name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "resume.md".to_string()
    } else {
        format!("{slug}-resume.md")
    }
}
