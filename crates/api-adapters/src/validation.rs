//! # Request Validation Gate
//!
//! Runs a bound request model's declared rules once, before the handler's
//! business logic. Any failure short-circuits the request with a
//! [`AppError::Validation`] holding every failing field and all its messages.

use domains::{AppError, FieldErrors};
use tracing::debug;
use validator::{Validate, ValidationErrors};

/// Field name under which body-binding failures are reported.
pub const BODY_FIELD: &str = "body";

/// Field name under which path-id binding failures are reported.
pub const ID_FIELD: &str = "id";

/// Runs `model`'s rules. `Ok(())` lets the request proceed.
pub fn check<T: Validate>(model: &T) -> Result<(), AppError> {
    model.validate().map_err(|errors| {
        let errors = collect_field_errors(&errors);
        debug!(fields = errors.len(), "request model failed validation");
        AppError::validation(errors)
    })
}

/// Flattens `validator`'s report into field → messages. A rule without a
/// custom message contributes its code (e.g. `"email"`).
pub fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut collected = FieldErrors::new();
    for (field, failures) in errors.field_errors() {
        let messages = collected.entry(field.to_string()).or_default();
        for failure in failures {
            let message = match &failure.message {
                Some(message) => message.to_string(),
                None => failure.code.to_string(),
            };
            messages.push(message);
        }
    }
    collected
}

/// A validation error for a single field whose value could not be bound.
pub fn binding_error(field: &str, reason: impl Into<String>) -> AppError {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_owned(), vec![reason.into()]);
    AppError::validation(errors)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use services::dto::{CreatePostRequest, RegisterUserRequest};

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(
            length(min = 8, message = "too short"),
            email(message = "not an address")
        )]
        backup_email: String,
    }

    #[test]
    fn valid_model_passes() {
        let model = CreatePostRequest {
            title: "Hello there".into(),
            body: "Some text".into(),
        };
        assert!(check(&model).is_ok());
    }

    #[test]
    fn every_failing_field_is_reported() {
        let model = RegisterUserRequest {
            username: "ab".into(),
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let err = check(&model).unwrap_err();
        let errors = err.validation_errors().unwrap();

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors["email"],
            vec!["Email must be a valid email address".to_string()]
        );
        assert!(errors["username"][0].contains("between 3 and 32"));
        assert!(errors["password"][0].contains("between 8 and 128"));
    }

    #[test]
    fn all_messages_for_a_field_are_kept_in_rule_order() {
        let model = Signup {
            email: "a@b.co".into(),
            backup_email: "abc".into(),
        };
        let errors = check(&model).unwrap_err();
        let backup = &errors.validation_errors().unwrap()["backup_email"];
        assert_eq!(
            backup,
            &vec!["too short".to_string(), "not an address".to_string()]
        );
    }

    #[test]
    fn rule_without_message_falls_back_to_its_code() {
        let model = Signup {
            email: "nope".into(),
            backup_email: "backup@example.com".into(),
        };
        let errors = check(&model).unwrap_err();
        assert_eq!(
            errors.validation_errors().unwrap()["email"],
            vec!["email".to_string()]
        );
    }

    #[test]
    fn binding_error_reports_one_field() {
        let err = binding_error(ID_FIELD, "Cannot parse `abc` to a `i64`");
        assert_eq!(err.status_code(), 422);
        assert_eq!(
            err.validation_errors().unwrap()[ID_FIELD],
            vec!["Cannot parse `abc` to a `i64`".to_string()]
        );
    }
}
