//! Typed per-field edits for a `StructuredResume`.
//!
//! Each variant names exactly one field; list items are addressed by index.

use serde::Deserialize;
use thiserror::Error;

use crate::models::resume::{Education, StructuredResume, WorkExperience};

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("{section} has no item at index {index}")]
    IndexOutOfRange { section: &'static str, index: usize },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum ResumeEdit {
    Name { value: String },
    Email { value: String },
    Phone { value: Option<String> },
    Linkedin { value: Option<String> },
    Website { value: Option<String> },
    Location { value: Option<String> },
    Summary { value: String },
    Position { index: usize, value: String },
    Company { index: usize, value: String },
    Period { index: usize, value: String },
    #[serde(rename_all = "camelCase")]
    Responsibility {
        experience_index: usize,
        index: usize,
        value: String,
    },
    Institution { index: usize, value: String },
    Degree { index: usize, value: String },
    Year { index: usize, value: String },
    SkillLevel { index: usize, value: Option<String> },
}

impl StructuredResume {
    pub fn apply_edit(&mut self, edit: ResumeEdit) -> Result<(), EditError> {
        match edit {
            ResumeEdit::Name { value } => self.name = value,
            ResumeEdit::Email { value } => self.contact_info.email = value,
            ResumeEdit::Phone { value } => self.contact_info.phone = non_blank(value),
            ResumeEdit::Linkedin { value } => self.contact_info.linkedin = non_blank(value),
            ResumeEdit::Website { value } => self.contact_info.website = non_blank(value),
            ResumeEdit::Location { value } => self.contact_info.location = non_blank(value),
            ResumeEdit::Summary { value } => self.summary = value,
            ResumeEdit::Position { index, value } => {
                self.work_entry(index)?.position = value;
            }
            ResumeEdit::Company { index, value } => {
                self.work_entry(index)?.company = value;
            }
            ResumeEdit::Period { index, value } => {
                self.work_entry(index)?.period = value;
            }
            ResumeEdit::Responsibility {
                experience_index,
                index,
                value,
            } => {
                let bullet = self
                    .work_entry(experience_index)?
                    .responsibilities
                    .get_mut(index)
                    .ok_or(EditError::IndexOutOfRange {
                        section: "responsibilities",
                        index,
                    })?;
                *bullet = value;
            }
            ResumeEdit::Institution { index, value } => {
                self.education_entry(index)?.institution = value;
            }
            ResumeEdit::Degree { index, value } => {
                self.education_entry(index)?.degree = value;
            }
            ResumeEdit::Year { index, value } => {
                self.education_entry(index)?.year = value;
            }
            ResumeEdit::SkillLevel { index, value } => {
                let skill = self.skills.get_mut(index).ok_or(EditError::IndexOutOfRange {
                    section: "skills",
                    index,
                })?;
                skill.level = non_blank(value);
            }
        }
        Ok(())
    }

    fn work_entry(
        &mut self,
        index: usize,
    ) -> Result<&mut WorkExperience, EditError> {
        self.work_experience
            .get_mut(index)
            .ok_or(EditError::IndexOutOfRange {
                section: "workExperience",
                index,
            })
    }

    fn education_entry(
        &mut self,
        index: usize,
    ) -> Result<&mut Education, EditError> {
        self.education.get_mut(index).ok_or(EditError::IndexOutOfRange {
            section: "education",
            index,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
