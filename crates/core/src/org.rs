//! Organization and production line validation.

/// Line status names accepted on create.
pub const VALID_LINE_STATUSES: &[&str] = &["running", "idle", "maintenance"];

/// Status assigned to a new line when none is given.
pub const DEFAULT_LINE_STATUS: &str = "idle";

/// Maximum length of organization and line names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Validate an organization or line name.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name is required".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate a production line status.
pub fn validate_line_status(status: &str) -> Result<(), String> {
    if VALID_LINE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid line status '{status}'. Must be one of: {}",
            VALID_LINE_STATUSES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_statuses_accepted() {
        for s in VALID_LINE_STATUSES {
            assert!(validate_line_status(s).is_ok());
        }
        assert!(validate_line_status(DEFAULT_LINE_STATUS).is_ok());
    }

    #[test]
    fn unknown_status_rejected() {
        assert!(validate_line_status("Running").is_err());
        assert!(validate_line_status("broken")
            .unwrap_err()
            .contains("Invalid line status"));
    }

    #[test]
    fn blank_name_rejected() {
        assert_eq!(validate_name("  ").unwrap_err(), "name is required");
        assert!(validate_name("Line 1 - Press").is_ok());
    }
}
