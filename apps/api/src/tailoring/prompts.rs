// LLM prompt constants for resume tailoring.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for the rewrite call.
pub const REWRITE_SYSTEM: &str = "You are an expert resume writer and applicant tracking \
    system (ATS) specialist. You tailor resumes to a specific job description while \
    keeping every fact true to the candidate's original resume.";

/// Rewrite prompt template. Replace `{resume_json}`, `{job_description}`,
/// `{grounding}` and `{json_only}` before sending.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Tailor the following resume to the job description.

RESUME (JSON):
{resume_json}

JOB DESCRIPTION:
{job_description}

Return the tailored resume using the SAME JSON schema as the input:
{
  "name": "...",
  "contactInfo": {"email": "...", "phone": "...", "linkedin": "..."},
  "summary": "...",
  "workExperience": [
    {"company": "...", "position": "...", "period": "...", "responsibilities": ["..."]}
  ],
  "education": [
    {"institution": "...", "degree": "...", "year": "..."}
  ],
  "skills": [{"name": "...", "level": "..."}]
}

Rules:
- Rewrite the summary so it speaks directly to this role.
- Lead responsibility bullets with strong verbs and surface the job's key technologies where the candidate actually used them.
- Order skills by relevance to the job.
- Keep any certifications, projects and languages from the input.

{grounding}

{json_only}"#;

pub fn build_rewrite_prompt(resume_json: &str, job_description: &str) -> String {
    fill_template(
        REWRITE_PROMPT_TEMPLATE,
        &[
            ("{resume_json}", resume_json),
            ("{job_description}", job_description.trim()),
            ("{grounding}", crate::llm_client::prompts::GROUNDING_INSTRUCTION),
            ("{json_only}", crate::llm_client::prompts::JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Single pass over `template`: inserted values are never scanned for placeholders.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = values
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
            .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, key, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
