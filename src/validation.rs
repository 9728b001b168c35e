use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::dto::CredentialsRequest;

pub const PASSWORD_MAX_CHARS: usize = 50;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub field: String,
    pub message: String,
}

impl Issue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Email and password that passed boundary validation. Email is normalized.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub(crate) fn check_email(raw: &str, issues: &mut Vec<Issue>) -> String {
    let email = normalize_email(raw);
    if email.is_empty() {
        issues.push(Issue::new("email", "Email is required."));
    } else if !is_valid_email(&email) {
        issues.push(Issue::new("email", "Invalid email address."));
    }
    email
}

/// Strength rules for new passwords: at most 50 characters, one ASCII uppercase
/// letter, one character outside `[A-Za-z0-9]`, and no whitespace.
pub(crate) fn check_password_policy(password: &str, issues: &mut Vec<Issue>) {
    if password.is_empty() {
        issues.push(Issue::new("password", "Password is required."));
        return;
    }
    if password.chars().count() > PASSWORD_MAX_CHARS {
        issues.push(Issue::new(
            "password",
            "Password must be less than 50 characters.",
        ));
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());
    let has_space = password.chars().any(char::is_whitespace);
    if !has_upper || !has_special || has_space {
        issues.push(Issue::new(
            "password",
            "Password must contain at least one uppercase letter, one special character, and no spaces.",
        ));
    }
}

/// Boundary shape check for register and login: a well-formed email and a
/// non-empty password. Password strength is a client-side form rule.
pub fn validate_credentials(req: CredentialsRequest) -> Result<Credentials, Vec<Issue>> {
    let mut issues = Vec::new();
    let email = check_email(req.email.as_deref().unwrap_or_default(), &mut issues);
    let password = req.password.unwrap_or_default();
    if password.is_empty() {
        issues.push(Issue::new("password", "Password is required."));
    }
    if issues.is_empty() {
        Ok(Credentials { email, password })
    } else {
        Err(issues)
    }
}
