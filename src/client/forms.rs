use serde::{Deserialize, Serialize};

use crate::validation::{check_email, check_password_policy, Issue};

/// Login form state as collected from the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form state. `name` and `confirm_password` stay client-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Fields that passed local validation and are ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Submission, Vec<Issue>> {
        let mut issues = Vec::new();
        let email = check_email(&self.email, &mut issues);
        check_password_policy(&self.password, &mut issues);
        finish(issues, email, &self.password)
    }
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Submission, Vec<Issue>> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(Issue::new("name", "Name is required."));
        }
        let email = check_email(&self.email, &mut issues);
        check_password_policy(&self.password, &mut issues);
        if self.confirm_password.is_empty() {
            issues.push(Issue::new("confirmPassword", "Confirm password is required."));
        } else if self.confirm_password != self.password {
            issues.push(Issue::new("confirmPassword", "Passwords do not match"));
        }
        finish(issues, email, &self.password)
    }
}

fn finish(issues: Vec<Issue>, email: String, password: &str) -> Result<Submission, Vec<Issue>> {
    if issues.is_empty() {
        Ok(Submission {
            email,
            password: password.to_string(),
        })
    } else {
        Err(issues)
    }
}

/// The message a form shows for a failed validation: the first issue.
pub fn first_message(issues: &[Issue]) -> &str {
    issues
        .first()
        .map(|i| i.message.as_str())
        .unwrap_or("Invalid fields")
}
