use crate::errors::AppError;

/// Rejects job descriptions too short to tailor against.
/// Runs before any pipeline work.
pub fn validate_job_description(text: &str, min_words: usize) -> Result<(), AppError> {
    let words = text.split_whitespace().count();
    if words < min_words {
        return Err(AppError::Validation(format!(
            "Job description must contain at least {min_words} words (got {words})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_description() {
        let err = validate_job_description("React developer wanted", 10).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_blank_description() {
        assert!(validate_job_description("   \n\t ", 10).is_err());
    }

    #[test]
    fn test_accepts_exactly_min_words() {
        let text = "one two three four five six seven eight nine ten";
        assert!(validate_job_description(text, 10).is_ok());
    }

    #[test]
    fn test_threshold_is_configurable() {
        assert!(validate_job_description("Rust engineer", 2).is_ok());
        assert!(validate_job_description("Rust", 2).is_err());
    }
}
