//! Login and registration form validation
//!
//! Field-level checks that run as the user types and again on submit.
//! Uniqueness of the username/email is the server's call; everything
//! here is shape-only.

use regex::Regex;
use std::sync::OnceLock;

use super::password::{confirm_state, policy_violations, MatchState};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 25;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"))
}

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as rendered on the form
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn check_username(username: &str, errors: &mut Vec<FieldError>) {
    let len = username.chars().count();
    if len == 0 {
        errors.push(FieldError::new("username", "Username is required"));
    } else if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        errors.push(FieldError::new(
            "username",
            format!("Username must be {USERNAME_MIN}-{USERNAME_MAX} characters"),
        ));
    }
}

/// Login form state
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// All field errors, empty when the form may be submitted.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_username(&self.username, &mut errors);
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Registration form state
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// All field errors, empty when the form may be submitted.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        check_username(&self.username, &mut errors);

        if self.email.is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !email_pattern().is_match(&self.email) {
            errors.push(FieldError::new("email", "Enter a valid email address"));
        }

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else {
            for rule in policy_violations(&self.password) {
                errors.push(FieldError::new("password", rule.to_string()));
            }
        }

        match confirm_state(&self.password, &self.confirm_password) {
            MatchState::Empty => errors.push(FieldError::new(
                "confirm_password",
                "Confirm your password",
            )),
            MatchState::Mismatch => errors.push(FieldError::new(
                "confirm_password",
                "Passwords do not match",
            )),
            MatchState::Match => {}
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        let form = LoginForm::default();
        let errors = form.validate();
        assert_eq!(errors.len(), 2);

        let form = LoginForm {
            username: "ada".to_string(),
            password: "secret".to_string(),
        };
        assert!(form.is_valid());
    }

    #[test]
    fn test_username_length_bounds() {
        let form = LoginForm {
            username: "ab".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(form.validate()[0].field, "username");

        let form = LoginForm {
            username: "a".repeat(26),
            password: "x".to_string(),
        };
        assert_eq!(form.validate()[0].field, "username");
    }

    #[test]
    fn test_register_happy_path() {
        let form = RegisterForm {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "Sup3r-secret".to_string(),
            confirm_password: "Sup3r-secret".to_string(),
        };
        assert!(form.is_valid());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let form = RegisterForm {
            username: "ada".to_string(),
            email: "not-an-email".to_string(),
            password: "Sup3r-secret".to_string(),
            confirm_password: "Sup3r-secret".to_string(),
        };
        assert!(form.validate().iter().any(|e| e.field == "email"));

        let form = RegisterForm {
            email: "a b@example.com".to_string(),
            ..form
        };
        assert!(form.validate().iter().any(|e| e.field == "email"));
    }

    #[test]
    fn test_register_surfaces_policy_rules() {
        let form = RegisterForm {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "weakpass".to_string(),
            confirm_password: "weakpass".to_string(),
        };
        let errors = form.validate();
        // Missing uppercase, digit, special.
        assert_eq!(errors.iter().filter(|e| e.field == "password").count(), 3);
    }

    #[test]
    fn test_register_confirm_mismatch() {
        let form = RegisterForm {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "Sup3r-secret".to_string(),
            confirm_password: "Sup3r-secre".to_string(),
        };
        assert!(form
            .validate()
            .iter()
            .any(|e| e.field == "confirm_password"));
    }
}
