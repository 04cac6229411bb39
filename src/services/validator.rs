//! Registration validator.
//!
//! Rules per field, evaluated in order, stopping at the first failure of
//! each field:
//!
//! | Field    | Rules                      |
//! |----------|----------------------------|
//! | name     | required                   |
//! | email    | required, email, unique    |
//! | password | required, min:6, same      |
//!
//! Every failing field is reported, so a caller can show all problems at once.

use std::sync::Arc;

use ::validator::ValidateEmail;

use crate::config::MIN_PASSWORD_LENGTH;
use crate::domain::{Field, RegistrationInput, Rule, ValidationErrorSet};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Checks registration input against the field rules.
///
/// Stateless apart from the repository used for the uniqueness lookup;
/// nothing from a previous call influences the next one.
#[derive(Clone)]
pub struct RegistrationValidator {
    users: Arc<dyn UserRepository>,
}

impl RegistrationValidator {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Evaluate every rule that does not need storage.
    pub fn check_format(input: &RegistrationInput) -> ValidationErrorSet {
        Self::collect(input, false)
    }

    /// Evaluate every rule, including the uniqueness lookup.
    ///
    /// # Errors
    /// Only storage failures; rule violations are returned in the set.
    pub async fn errors(&self, input: &RegistrationInput) -> AppResult<ValidationErrorSet> {
        let email_taken = self.email_taken(input).await?;
        Ok(Self::collect(input, email_taken))
    }

    /// Evaluate every rule and fail with [`AppError::Validation`] on any violation.
    pub async fn validate(&self, input: &RegistrationInput) -> AppResult<()> {
        let errors = self.errors(input).await?;
        if errors.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            fields = ?errors.fields().map(|f| f.as_str()).collect::<Vec<_>>(),
            "Registration input rejected"
        );
        Err(AppError::Validation(errors))
    }

    /// Evaluate the rules of a single field, as done while the user types.
    pub async fn validate_only(
        &self,
        input: &RegistrationInput,
        field: Field,
    ) -> AppResult<ValidationErrorSet> {
        let email_taken = match field {
            Field::Email => self.email_taken(input).await?,
            _ => false,
        };
        Ok(Self::collect(input, email_taken).only(field))
    }

    async fn email_taken(&self, input: &RegistrationInput) -> AppResult<bool> {
        // Only look up addresses that could be stored
        if email_rule(input).is_some() {
            return Ok(false);
        }
        self.users.exists_by_email(&input.normalized_email()).await
    }

    fn collect(input: &RegistrationInput, email_taken: bool) -> ValidationErrorSet {
        let mut errors = ValidationErrorSet::new();

        if let Some(rule) = name_rule(input) {
            errors.add(Field::Name, rule);
        }
        if let Some(rule) = email_rule(input).or(email_taken.then_some(Rule::Unique)) {
            errors.add(Field::Email, rule);
        }
        if let Some(rule) = password_rule(input) {
            errors.add(Field::Password, rule);
        }

        errors
    }
}

fn name_rule(input: &RegistrationInput) -> Option<Rule> {
    input.trimmed_name().is_empty().then_some(Rule::Required)
}

fn email_rule(input: &RegistrationInput) -> Option<Rule> {
    let email = input.normalized_email();
    if email.is_empty() {
        Some(Rule::Required)
    } else if !email.validate_email() {
        Some(Rule::Email)
    } else {
        None
    }
}

fn password_rule(input: &RegistrationInput) -> Option<Rule> {
    if input.password.trim().is_empty() {
        Some(Rule::Required)
    } else if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(Rule::Min)
    } else if input.password != input.password_confirmation {
        Some(Rule::Same)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use mockall::predicate::eq;

    fn valid_input() -> RegistrationInput {
        RegistrationInput::new("Tall Stack", "tallstack@example.com", "secret", "secret")
    }

    fn validator_with(repo: MockUserRepository) -> RegistrationValidator {
        RegistrationValidator::new(Arc::new(repo))
    }

    fn no_accounts() -> RegistrationValidator {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(false));
        validator_with(repo)
    }

    #[tokio::test]
    async fn test_valid_input_passes() {
        assert!(no_accounts().validate(&valid_input()).await.is_ok());
    }

    #[test]
    fn test_name_is_required() {
        let input = RegistrationInput {
            name: "   ".to_string(),
            ..valid_input()
        };
        let errors = RegistrationValidator::check_format(&input);

        assert_eq!(errors.get(Field::Name), Some(&[Rule::Required][..]));
        assert!(errors.get(Field::Email).is_none());
    }

    #[test]
    fn test_email_is_required() {
        let input = RegistrationInput {
            email: String::new(),
            ..valid_input()
        };
        let errors = RegistrationValidator::check_format(&input);
        assert_eq!(errors.get(Field::Email), Some(&[Rule::Required][..]));
    }

    #[test]
    fn test_email_is_valid_email() {
        let input = RegistrationInput {
            email: "calebporzio".to_string(),
            ..valid_input()
        };
        let errors = RegistrationValidator::check_format(&input);
        assert_eq!(errors.get(Field::Email), Some(&[Rule::Email][..]));
    }

    #[tokio::test]
    async fn test_email_hasnt_been_taken_already() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email()
            .with(eq("tallstack@example.com"))
            .returning(|_| Ok(true));

        let errors = validator_with(repo).errors(&valid_input()).await.unwrap();
        assert_eq!(errors.get(Field::Email), Some(&[Rule::Unique][..]));
    }

    #[tokio::test]
    async fn test_uniqueness_uses_normalized_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email()
            .with(eq("tallstack@example.com"))
            .times(1)
            .returning(|_| Ok(true));

        let input = RegistrationInput {
            email: "  TallStack@Example.com ".to_string(),
            ..valid_input()
        };
        let errors = validator_with(repo).errors(&input).await.unwrap();
        assert!(errors.has(Field::Email, Rule::Unique));
    }

    #[tokio::test]
    async fn test_malformed_email_skips_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().never();

        let input = RegistrationInput {
            email: "calebporzio".to_string(),
            ..valid_input()
        };
        let errors = validator_with(repo).errors(&input).await.unwrap();
        assert!(errors.has(Field::Email, Rule::Email));
    }

    #[test]
    fn test_password_is_required() {
        let input = RegistrationInput {
            password: String::new(),
            ..valid_input()
        };
        let errors = RegistrationValidator::check_format(&input);
        assert_eq!(errors.get(Field::Password), Some(&[Rule::Required][..]));
    }

    #[test]
    fn test_password_is_minimum_of_six_characters() {
        let input = RegistrationInput {
            password: "secre".to_string(),
            ..valid_input()
        };
        let errors = RegistrationValidator::check_format(&input);
        assert_eq!(errors.get(Field::Password), Some(&[Rule::Min][..]));
    }

    #[test]
    fn test_password_matches_password_confirmation() {
        let input = RegistrationInput {
            password_confirmation: "not-secret".to_string(),
            ..valid_input()
        };
        let errors = RegistrationValidator::check_format(&input);
        assert_eq!(errors.get(Field::Password), Some(&[Rule::Same][..]));
    }

    #[test]
    fn test_missing_confirmation_is_a_mismatch() {
        let input = RegistrationInput {
            password_confirmation: String::new(),
            ..valid_input()
        };
        let errors = RegistrationValidator::check_format(&input);
        assert!(errors.has(Field::Password, Rule::Same));
    }

    #[tokio::test]
    async fn test_errors_accumulate_across_fields_in_order() {
        let errors = no_accounts()
            .errors(&RegistrationInput::default())
            .await
            .unwrap();

        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec![Field::Name, Field::Email, Field::Password]);
        assert!(errors.iter().all(|(_, rules)| rules == [Rule::Required]));
    }

    #[tokio::test]
    async fn test_unique_keeps_field_order() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(true));

        let input = RegistrationInput {
            name: String::new(),
            password: "secre".to_string(),
            ..valid_input()
        };
        let errors = validator_with(repo).errors(&input).await.unwrap();

        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec![Field::Name, Field::Email, Field::Password]);
    }

    #[tokio::test]
    async fn test_validate_is_idempotent() {
        let validator = no_accounts();
        let input = RegistrationInput {
            email: "calebporzio".to_string(),
            password: "secre".to_string(),
            ..valid_input()
        };

        let first = validator.errors(&input).await.unwrap();
        let second = validator.errors(&input).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_validate_only_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().returning(|_| Ok(true));

        let input = RegistrationInput {
            name: String::new(),
            ..valid_input()
        };
        let errors = validator_with(repo)
            .validate_only(&input, Field::Email)
            .await
            .unwrap();

        assert_eq!(errors.len(), 1);
        assert!(errors.has(Field::Email, Rule::Unique));
    }

    #[tokio::test]
    async fn test_validate_only_name_skips_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email().never();

        let errors = validator_with(repo)
            .validate_only(&valid_input(), Field::Name)
            .await
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists_by_email()
            .returning(|_| Err(AppError::internal("storage offline")));

        let result = validator_with(repo).validate(&valid_input()).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
