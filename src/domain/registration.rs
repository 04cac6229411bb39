//! Registration input and the field-keyed validation error set.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

/// Registration form field that can carry validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Password,
}

impl Field {
    /// All fields, in evaluation order.
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Password];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
        }
    }

    /// Rules checked for this field, in order.
    pub fn rules(&self) -> &'static [Rule] {
        match self {
            Field::Name => &[Rule::Required],
            Field::Email => &[Rule::Required, Rule::Email, Rule::Unique],
            Field::Password => &[Rule::Required, Rule::Min, Rule::Same],
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "password" | "passwordConfirmation" => Ok(Field::Password),
            other => Err(format!("unknown field: {}", other)),
        }
    }
}

/// Identifier of a violated validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    /// Field must not be blank
    Required,
    /// Field must be a well-formed email address
    Email,
    /// No other account may use the value
    Unique,
    /// Field is shorter than the minimum length
    Min,
    /// Field must equal its confirmation
    Same,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::Unique => "unique",
            Rule::Min => "min",
            Rule::Same => "same",
        }
    }

    /// Human readable message for a violation of this rule on `field`.
    pub fn message(&self, field: Field) -> String {
        match self {
            Rule::Required => format!("The {} field is required.", field),
            Rule::Email => format!("The {} must be a valid email address.", field),
            Rule::Unique => format!("The {} has already been taken.", field),
            Rule::Min => format!(
                "The {} must be at least {} characters.",
                field,
                crate::config::MIN_PASSWORD_LENGTH
            ),
            Rule::Same => format!("The {} and {} confirmation must match.", field, field),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration form as submitted by the caller.
///
/// Missing fields deserialize as empty strings so a partially filled form
/// can be validated.
#[derive(Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationInput {
    /// Display name
    #[schema(example = "Tall Stack")]
    pub name: String,
    /// Email address
    #[schema(example = "tallstack@example.com")]
    pub email: String,
    /// Password (minimum 6 characters)
    #[schema(example = "secret", min_length = 6)]
    pub password: String,
    /// Must repeat `password`
    #[schema(example = "secret")]
    pub password_confirmation: String,
}

// Keep passwords out of logs
impl std::fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirmation", &"[REDACTED]")
            .finish()
    }
}

impl RegistrationInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            password_confirmation: password_confirmation.into(),
        }
    }

    /// Name with surrounding whitespace removed.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// Email in the form it is stored and compared in.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Field-keyed collection of violated rules.
///
/// Fields keep the order in which they were first reported, and each
/// field's rules keep the order in which they were evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrorSet {
    entries: Vec<(Field, Vec<Rule>)>,
}

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding a single violation.
    pub fn single(field: Field, rule: Rule) -> Self {
        let mut set = Self::new();
        set.add(field, rule);
        set
    }

    /// Record a violation of `rule` on `field`.
    pub fn add(&mut self, field: Field, rule: Rule) {
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, rules)) => {
                if !rules.contains(&rule) {
                    rules.push(rule);
                }
            }
            None => self.entries.push((field, vec![rule])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with at least one violation
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Rules violated by `field`, if any.
    pub fn get(&self, field: Field) -> Option<&[Rule]> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, rules)| rules.as_slice())
    }

    /// Whether `field` violated `rule`.
    pub fn has(&self, field: Field, rule: Rule) -> bool {
        self.get(field).is_some_and(|rules| rules.contains(&rule))
    }

    /// Fields with violations, in report order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.iter().map(|(field, _)| *field)
    }

    /// Iterate over `(field, rules)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &[Rule])> + '_ {
        self.entries
            .iter()
            .map(|(field, rules)| (*field, rules.as_slice()))
    }

    /// Keep only the violations of `field`.
    pub fn only(mut self, field: Field) -> Self {
        self.entries.retain(|(f, _)| *f == field);
        self
    }

    /// Human readable messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(field, rules)| rules.iter().map(move |rule| rule.message(field)))
            .collect()
    }
}

impl std::fmt::Display for ValidationErrorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.messages().join(" "))
    }
}

impl Serialize for ValidationErrorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, rules) in &self.entries {
            map.serialize_entry(field.as_str(), rules)?;
        }
        map.end()
    }
}
