//! Input checks shared by every service.

use validator::{Validate, ValidationErrors};

use notehub_core::error::AppError;
use notehub_core::result::AppResult;

/// Run the derived `validator` rules of a request.
pub fn check<T: Validate>(request: &T) -> AppResult<()> {
    request.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    AppError::invalid_argument(format!("Validation failed: {errors}"))
}

/// Reject blank names and names longer than `max_len` characters.
///
/// `what` names the field in the error message, e.g. `"Folder name"`.
pub fn require_name(what: &str, name: &str, max_len: usize) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_argument(format!("{what} cannot be empty")));
    }
    if name.chars().count() > max_len {
        return Err(AppError::invalid_argument(format!(
            "{what} cannot exceed {max_len} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_core::error::ErrorKind;

    #[test]
    fn test_blank_names_rejected() {
        for name in ["", "   ", "\t\n"] {
            let err = require_name("Folder name", name, 255).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidArgument);
        }
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(require_name("Tag name", "ééé", 3).is_ok());
        let err = require_name("Tag name", "éééé", 3).unwrap_err();
        assert!(err.message.contains("3 characters"));
    }

    #[test]
    fn test_names_are_not_trimmed() {
        assert!(require_name("Folder name", " Work ", 255).is_ok());
    }
}
