//! Structural checks on a submitted suggestion.
//!
//! Every rule is evaluated, failures are collected in a fixed order (project
//! name, description, link, email) and the input is either accepted whole or
//! rejected whole. Nothing here has side effects.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::SuggestionInput;

/// Minimum project name length, in characters, after trimming.
pub const MIN_PROJECT_NAME_CHARS: usize = 2;
/// Minimum description length, in characters, after trimming.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

// local@domain.tld with no whitespace and a single '@' per segment.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// One violated rule. The `Display` text is what the visitor sees.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Le nom du projet doit contenir au moins 2 caractères")]
    ProjectNameTooShort,
    #[error("La description doit contenir au moins 10 caractères")]
    DescriptionTooShort,
    #[error("Le lien officiel doit être une URL valide")]
    InvalidOfficialLink,
    #[error("L'email n'est pas valide")]
    InvalidEmail,
}

/// Result of [`validate`]: the ordered list of violated rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Human-readable messages, one per violated rule, in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Checks every field rule of `input` and reports all violations at once.
pub fn validate(input: &SuggestionInput) -> ValidationReport {
    let mut errors = Vec::new();

    if input.project_name.trim().chars().count() < MIN_PROJECT_NAME_CHARS {
        errors.push(ValidationError::ProjectNameTooShort);
    }

    if input.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        errors.push(ValidationError::DescriptionTooShort);
    }

    if !is_valid_url(&input.official_link) {
        errors.push(ValidationError::InvalidOfficialLink);
    }

    // Only a present, non-empty address is checked.
    if let Some(email) = input.email.as_deref().filter(|e| !e.is_empty()) {
        if !is_valid_email(email) {
            errors.push(ValidationError::InvalidEmail);
        }
    }

    ValidationReport { errors }
}

/// True when `candidate` parses as an absolute URL. Any scheme is accepted.
pub fn is_valid_url(candidate: &str) -> bool {
    !candidate.is_empty() && Url::parse(candidate).is_ok()
}

/// Loose `local@domain.tld` check; not RFC 5322.
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate)
}
