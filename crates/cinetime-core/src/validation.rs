//! Form checks run before any request is sent. Each check returns every
//! problem it found as a human-readable message.

use thiserror::Error;

pub const MIN_REGISTRATION_PASSWORD: usize = 6;
pub const MIN_STRONG_PASSWORD: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    fn check(errors: Vec<String>) -> Result<(), ValidationErrors> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    fn single(message: &str) -> Result<(), ValidationErrors> {
        Err(ValidationErrors(vec![message.to_string()]))
    }
}

/// Raw registration form, including the confirmation field
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub fn login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    if email.trim().is_empty() || password.is_empty() {
        return ValidationErrors::single("Please fill all fields");
    }
    Ok(())
}

pub fn registration(form: &RegistrationForm) -> Result<(), ValidationErrors> {
    let fields = [&form.firstname, &form.lastname, &form.email, &form.password, &form.confirm_password];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return ValidationErrors::single("All fields are required.");
    }
    if form.password != form.confirm_password {
        return ValidationErrors::single("Passwords do not match.");
    }
    if form.password.chars().count() < MIN_REGISTRATION_PASSWORD {
        return ValidationErrors::single("Password must be at least 6 characters.");
    }
    Ok(())
}

pub fn otp(code: &str) -> Result<(), ValidationErrors> {
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return ValidationErrors::single("OTP must be 6 digits");
    }
    Ok(())
}

/// `local@domain.tld` with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((name, tld)) => !name.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn email(email: &str) -> Result<(), ValidationErrors> {
    let email = email.trim();
    if email.is_empty() {
        return ValidationErrors::single("Email is required");
    }
    if !is_valid_email(email) {
        return ValidationErrors::single("Please enter a valid email address");
    }
    Ok(())
}

/// First unmet strength rule, if any
pub fn password_strength(password: &str) -> Option<&'static str> {
    if password.chars().count() < MIN_STRONG_PASSWORD {
        Some("Password must be at least 8 characters long")
    } else if !password.chars().any(|c| c.is_uppercase()) {
        Some("Password must contain at least one uppercase letter")
    } else if !password.chars().any(|c| c.is_lowercase()) {
        Some("Password must contain at least one lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one number")
    } else {
        None
    }
}

pub fn password_change(current: &str, new: &str, confirm: &str) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if current.is_empty() {
        errors.push("Current password is required".to_string());
    }
    if new.is_empty() {
        errors.push("New password is required".to_string());
    } else if let Some(problem) = password_strength(new) {
        errors.push(problem.to_string());
    }
    if confirm.is_empty() {
        errors.push("Please confirm your new password".to_string());
    } else if new != confirm {
        errors.push("Passwords do not match".to_string());
    }
    ValidationErrors::check(errors)
}

pub fn password_reset(password: &str, confirm: &str) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if password.is_empty() {
        errors.push("Password is required".to_string());
    } else if let Some(problem) = password_strength(password) {
        errors.push(problem.to_string());
    }
    if confirm.is_empty() {
        errors.push("Please confirm your password".to_string());
    } else if password != confirm {
        errors.push("Passwords do not match".to_string());
    }
    ValidationErrors::check(errors)
}

pub fn profile(firstname: &str, lastname: &str) -> Result<(), ValidationErrors> {
    if firstname.trim().is_empty() || lastname.trim().is_empty() {
        return ValidationErrors::single("First name and last name are required");
    }
    Ok(())
}

pub fn account_deletion(password: &str) -> Result<(), ValidationErrors> {
    if password.is_empty() {
        return ValidationErrors::single("Please enter your password to confirm");
    }
    Ok(())
}
