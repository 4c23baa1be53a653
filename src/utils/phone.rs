use crate::error::{AppError, AppResult};
use regex::Regex;

/// Validate a phone number in international-ish format: an optional leading
/// `+` followed by 10-15 digits. Spaces, dashes and parentheses are ignored.
pub fn validate_phone(phone: &str) -> AppResult<()> {
    let normalized = normalize_phone(phone);
    let phone_regex = Regex::new(r"^\+?\d{10,15}$").unwrap();

    if !phone_regex.is_match(&normalized) {
        return Err(AppError::ValidationError(
            "phonenumber must be a valid phone number".to_string(),
        ));
    }

    Ok(())
}

/// Strip formatting characters commonly typed into phone fields.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}
