use std::sync::LazyLock;
use regex::Regex;
use crate::errors::RepurposeError;

pub const MIN_QUERY_CHARS: usize = 3;
pub const MAX_QUERY_CHARS: usize = 500;

static JOB_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?[A-Z0-9]{6,10}$").expect("static pattern")
});

/// Trim and bounds-check a research query.
pub fn validate_query(query: &str) -> Result<String, RepurposeError> {
    let trimmed = query.trim();
    let len = trimmed.chars().count();

    if len == 0 {
        return Err(RepurposeError::InvalidQuery("Query cannot be empty".into()));
    }
    if len < MIN_QUERY_CHARS {
        return Err(RepurposeError::InvalidQuery(format!(
            "Query must be at least {} characters long",
            MIN_QUERY_CHARS
        )));
    }
    if len > MAX_QUERY_CHARS {
        return Err(RepurposeError::InvalidQuery(format!(
            "Query must be at most {} characters long",
            MAX_QUERY_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

/// Demo ids (`#K3Z9Q0WB`), short backend ids, or UUIDs.
pub fn is_valid_job_id(job_id: &str) -> bool {
    JOB_ID_PATTERN.is_match(job_id) || uuid::Uuid::parse_str(job_id).is_ok()
}

pub fn validate_job_id(job_id: &str) -> Result<&str, RepurposeError> {
    if is_valid_job_id(job_id) {
        Ok(job_id)
    } else {
        Err(RepurposeError::InvalidQuery(format!("Invalid job id: {}", job_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(validate_query("  kinase inhibitors  ").unwrap(), "kinase inhibitors");
    }

    #[test]
    fn test_query_bounds() {
        assert!(validate_query("   ").is_err());
        assert!(validate_query("ab").is_err());
        assert!(validate_query("abc").is_ok());
        assert!(validate_query(&"a".repeat(500)).is_ok());
        assert!(validate_query(&"a".repeat(501)).is_err());
    }

    #[test]
    fn test_job_id_patterns() {
        assert!(is_valid_job_id("#AB12CD34"));
        assert!(is_valid_job_id("ab12cd"));
        assert!(is_valid_job_id("3f2b8c1e-9d4a-4c67-8a1b-2e5f6d7c8b9a"));
        assert!(!is_valid_job_id("#AB1"));
        assert!(!is_valid_job_id("../../etc"));
        assert!(!is_valid_job_id(""));
    }
}
