use crate::{auth::tokens::VERIFY_CODE_LEN, error::AppError};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 100;

/// Shape check only; deliverability is the mailer's problem.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::bad_request("email: required"));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::bad_request("email: must be a valid email address"));
    }
    Ok(())
}

pub fn validate_password(field: &str, password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "{field}: must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(format!("{field}: required")));
    }
    Ok(())
}

pub fn validate_name(field: &str, value: &str) -> Result<(), AppError> {
    require(field, value)?;
    if value.chars().count() > MAX_NAME_LEN {
        return Err(AppError::bad_request(format!(
            "{field}: must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// E.164: `+`, then up to 15 digits with no leading zero.
pub fn validate_phone_number(phone: &str) -> Result<(), AppError> {
    let digits = phone.strip_prefix('+').unwrap_or_default();
    let valid = (2..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0');
    if !valid {
        return Err(AppError::bad_request(
            "phone_number: must be in E.164 format, e.g. +12125551234",
        ));
    }
    Ok(())
}

pub fn validate_verify_code(code: &str) -> Result<(), AppError> {
    if code.len() != VERIFY_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(format!(
            "code: must be {VERIFY_CODE_LEN} letters or digits"
        )));
    }
    Ok(())
}
