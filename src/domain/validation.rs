//! Business-rule validation.
//!
//! A [`ModelValidator`] inspects a candidate model and reports every rule it
//! breaks. A [`ValidatorHub`] runs an ordered chain of them and aggregates
//! the failures, so callers see the complete error set in one response.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// A single broken rule, keyed by the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationError {
    #[schema(example = "email")]
    pub field: String,
    #[schema(example = "Email 'alfreds@demo.com' is already registered.")]
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ordered collection of validation failures. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![ValidationError::new(field, message)])
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Errors reported against one field
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.0.iter().filter(move |e| e.field == field)
    }

    /// `Ok(())` when empty, otherwise [`AppError::Invalid`] carrying every failure.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Invalid(self))
        }
    }
}

impl Extend<ValidationError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

/// Converts `validator` derive output into field-keyed errors.
///
/// Fields are sorted so the order is stable across runs.
impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, Vec<validator::ValidationError>)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| (field.to_string(), errs.clone()))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut result = ValidationErrors::new();
        for (field, errs) in fields {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                result.push(field.clone(), message);
            }
        }
        result
    }
}

/// When a validator in a chain is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationConstraint {
    AlwaysValidate,
    /// Skipped once an earlier validator has reported failures.
    ValidateIfThereAreNoPreviousErrors,
}

/// A set of business rules evaluated against a model.
///
/// Implementations evaluate every rule and return all failures; they never
/// stop at the first one.
#[async_trait]
pub trait ModelValidator<T: Sync>: Send + Sync {
    fn constraint(&self) -> ValidationConstraint {
        ValidationConstraint::AlwaysValidate
    }

    async fn validate(&self, model: &T) -> AppResult<ValidationErrors>;
}

/// Field-level rules declared with `#[derive(Validate)]`.
pub struct FieldRules;

#[async_trait]
impl<T> ModelValidator<T> for FieldRules
where
    T: validator::Validate + Sync,
{
    async fn validate(&self, model: &T) -> AppResult<ValidationErrors> {
        Ok(match model.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors.into(),
        })
    }
}

/// Runs validators in registration order and aggregates their failures.
pub struct ValidatorHub<T> {
    validators: Vec<Arc<dyn ModelValidator<T>>>,
}

impl<T: Sync> ValidatorHub<T> {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    pub fn with(mut self, validator: impl ModelValidator<T> + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub async fn validate(&self, model: &T) -> AppResult<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for validator in &self.validators {
            if validator.constraint() == ValidationConstraint::ValidateIfThereAreNoPreviousErrors
                && !errors.is_empty()
            {
                continue;
            }
            errors.extend(validator.validate(model).await?);
        }

        Ok(errors)
    }

    /// Validate and turn any failure into [`AppError::Invalid`].
    pub async fn guard(&self, model: &T) -> AppResult<()> {
        self.validate(model).await?.into_result()
    }
}

impl<T: Sync> Default for ValidatorHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Rule {
        constraint: ValidationConstraint,
        errors: Vec<(&'static str, &'static str)>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ModelValidator<String> for Rule {
        fn constraint(&self) -> ValidationConstraint {
            self.constraint
        }

        async fn validate(&self, _model: &String) -> AppResult<ValidationErrors> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut errors = ValidationErrors::new();
            for (field, message) in &self.errors {
                errors.push(*field, *message);
            }
            Ok(errors)
        }
    }

    fn rule(
        constraint: ValidationConstraint,
        errors: Vec<(&'static str, &'static str)>,
    ) -> (Rule, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let rule = Rule {
            constraint,
            errors,
            calls: calls.clone(),
        };
        (rule, calls)
    }

    #[tokio::test]
    async fn test_collects_every_failure() {
        let (first, _) = rule(
            ValidationConstraint::AlwaysValidate,
            vec![("name", "taken"), ("email", "taken")],
        );
        let (second, _) = rule(ValidationConstraint::AlwaysValidate, vec![("cedula", "taken")]);
        let hub = ValidatorHub::new().with(first).with(second);

        let errors = hub.validate(&"x".to_string()).await.unwrap();

        assert_eq!(errors.len(), 3);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "cedula"]);
    }

    #[tokio::test]
    async fn test_skips_dependent_validator_after_failure() {
        let (first, _) = rule(ValidationConstraint::AlwaysValidate, vec![("email", "bad format")]);
        let (second, second_calls) = rule(
            ValidationConstraint::ValidateIfThereAreNoPreviousErrors,
            vec![("email", "taken")],
        );
        let hub = ValidatorHub::new().with(first).with(second);

        let errors = hub.validate(&"x".to_string()).await.unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_runs_dependent_validator_when_clean() {
        let (first, _) = rule(ValidationConstraint::AlwaysValidate, vec![]);
        let (second, second_calls) = rule(
            ValidationConstraint::ValidateIfThereAreNoPreviousErrors,
            vec![("name", "taken")],
        );
        let hub = ValidatorHub::new().with(first).with(second);

        let result = hub.guard(&"x".to_string()).await;

        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        match result {
            Err(AppError::Invalid(errors)) => assert_eq!(errors.for_field("name").count(), 1),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.push("name", "required");
        errors.push("email", "taken");

        assert_eq!(errors.to_string(), "name: required; email: taken");
    }
}
