//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Shortest plaintext password accepted, in characters
pub const MIN_PASSWORD_CHARS: usize = 4;

/// Column width of the text fields in the `users` table
pub const MAX_FIELD_CHARS: usize = 255;

/// Validate a required text column such as a post title
pub fn validate_text_field(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }

    if value.chars().count() > MAX_FIELD_CHARS {
        return Err(format!(
            "{} must be at most {} characters long",
            label, MAX_FIELD_CHARS
        ));
    }

    Ok(())
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    validate_text_field("Username", username)
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.chars().count() > MAX_FIELD_CHARS {
        return Err(format!(
            "Email must be at most {} characters long",
            MAX_FIELD_CHARS
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate plaintext password, before it is hashed
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_CHARS
        ));
    }

    Ok(())
}
