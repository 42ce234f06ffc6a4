use crate::domain::error::DomainError;

/// Longest accepted name, in characters.
pub const MAX_NAME_LENGTH: usize = 30;

/// Validation of answers collected by the generators.
///
/// Every check returns the message shown to the user next to the prompt.
pub struct AnswerValidator;

impl AnswerValidator {
    pub fn required(field: &str, value: &str) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(invalid(field, "Field required".into()));
        }
        Ok(())
    }

    pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
        if value.chars().count() > max {
            return Err(invalid(
                field,
                format!("Field length must not be greater than {max} characters"),
            ));
        }
        Ok(())
    }

    pub fn project_name(value: &str) -> Result<(), DomainError> {
        Self::name("projectName", value)
    }

    pub fn author_name(value: &str) -> Result<(), DomainError> {
        Self::name("authorName", value)
    }

    /// `exists` reports whether a folder with this name is already present.
    pub fn folder_name(value: &str, exists: bool) -> Result<(), DomainError> {
        Self::name("folderName", value)?;
        if exists {
            return Err(invalid("folderName", "Folder already exists".into()));
        }
        Ok(())
    }

    fn name(field: &str, value: &str) -> Result<(), DomainError> {
        Self::required(field, value)?;
        Self::max_length(field, value, MAX_NAME_LENGTH)
    }
}

fn invalid(field: &str, reason: String) -> DomainError {
    DomainError::InvalidInput {
        field: field.to_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(result: Result<(), DomainError>) -> String {
        match result {
            Err(DomainError::InvalidInput { reason, .. }) => reason,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn empty_values_are_required() {
        assert_eq!(reason(AnswerValidator::project_name("")), "Field required");
        assert_eq!(reason(AnswerValidator::author_name("   ")), "Field required");
    }

    #[test]
    fn names_are_limited_to_thirty_characters() {
        let ok = "a".repeat(30);
        let long = "a".repeat(31);
        assert!(AnswerValidator::project_name(&ok).is_ok());
        assert_eq!(
            reason(AnswerValidator::project_name(&long)),
            "Field length must not be greater than 30 characters"
        );
    }

    #[test]
    fn existing_folder_is_rejected() {
        assert_eq!(
            reason(AnswerValidator::folder_name("demo", true)),
            "Folder already exists"
        );
        assert!(AnswerValidator::folder_name("demo", false).is_ok());
    }
}
