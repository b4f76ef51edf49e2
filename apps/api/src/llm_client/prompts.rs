// Shared prompt fragments. Each feature that calls the LLM keeps its own
// prompts.rs alongside it and composes these where needed.

/// Output contract for structured answers.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Keeps rewrites truthful to the candidate's history.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only rephrase, reorder and emphasise what the candidate already wrote. \
    Do NOT invent employers, dates, degrees, certifications, metrics or skills. \
    If the job asks for something the resume does not show, leave it out.";
