//! Field-level validation results.
//!
//! Actions declare their rules with `validator`; the resulting
//! [`ValidationErrors`] are flattened here into one failure per field, keyed
//! by the wire (camelCase) field name.

use poem_openapi::Object;
use validator::ValidationErrors;

/// A single `field: message` failure.
#[derive(Debug, Clone, PartialEq, Eq, Object)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

/// Outcome of validating an action. Empty means ok.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    failures: Vec<FieldFailure>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn add_field_failure(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.failures.push(FieldFailure {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// Message recorded for `field`, if it failed.
    pub fn failure_for(&self, field: &str) -> Option<&str> {
        self.failures
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message.as_str())
    }
}

impl From<ValidationErrors> for ValidationResult {
    fn from(errors: ValidationErrors) -> Self {
        let mut result = ValidationResult::success();
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, errs) in fields {
            // First rule that failed wins; one failure per field.
            let Some(err) = errs.first() else { continue };
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            result.add_field_failure(camel_case(&field), message);
        }
        result
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("post_id"), "postId");
        assert_eq!(camel_case("is_visible_to_public"), "isVisibleToPublic");
        assert_eq!(camel_case("name"), "name");
    }

    #[test]
    fn test_one_failure_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("post_id", ValidationError::new("range").with_message("first".into()));
        errors.add("post_id", ValidationError::new("other").with_message("second".into()));
        errors.add("column_id", ValidationError::new("range"));

        let result = ValidationResult::from(errors);
        assert!(!result.is_ok());
        assert_eq!(result.failures().len(), 2);
        assert_eq!(result.failure_for("postId"), Some("first"));
        assert_eq!(result.failure_for("columnId"), Some("range"));
    }

    #[test]
    fn test_success_is_ok() {
        assert!(ValidationResult::success().is_ok());
    }
}
