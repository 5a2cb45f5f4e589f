//! Password strength rules

use serde::{Deserialize, Serialize};
use crate::PASSWORD_MIN_LENGTH;

/// A single password requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PasswordRule {
    /// At least `PASSWORD_MIN_LENGTH` characters
    MinLength,
    /// At least one upper-case letter
    Uppercase,
    /// At least one lower-case letter
    Lowercase,
    /// At least one digit
    Digit,
}

impl PasswordRule {
    /// Localization key describing the rule
    pub fn message_key(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "password_rule_min_length",
            PasswordRule::Uppercase => "password_rule_uppercase",
            PasswordRule::Lowercase => "password_rule_lowercase",
            PasswordRule::Digit => "password_rule_digit",
        }
    }
}

/// Outcome of validating a password
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PasswordValidation {
    /// Rules the password failed, in check order
    pub errors: Vec<PasswordRule>,
}

impl PasswordValidation {
    /// True when no rule failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates passwords against the password rules
pub struct PasswordValidator;

impl PasswordValidator {
    /// Check every rule and report all failures
    pub fn validate(password: &str) -> PasswordValidation {
        let mut errors = Vec::new();

        if password.chars().count() < PASSWORD_MIN_LENGTH {
            errors.push(PasswordRule::MinLength);
        }
        if !password.chars().any(char::is_uppercase) {
            errors.push(PasswordRule::Uppercase);
        }
        if !password.chars().any(char::is_lowercase) {
            errors.push(PasswordRule::Lowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push(PasswordRule::Digit);
        }

        PasswordValidation { errors }
    }
}
