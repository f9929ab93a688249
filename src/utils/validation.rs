use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

use crate::error::{Error, Result};

fn error_with(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::from(message));
    err
}

/// Wraps a single field failure so it renders like derive-generated errors.
pub fn field_error(field: &'static str, code: &'static str, message: &'static str) -> Error {
    let mut errs = ValidationErrors::new();
    errs.add(field, error_with(code, message));
    Error::Validation(errs)
}

pub fn validate_phone(phone: &str) -> std::result::Result<(), ValidationError> {
    if phone.len() == 11 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(error_with("phone", "Phone number must be 11 digits"))
    }
}

pub fn validate_password_strength(password: &str) -> std::result::Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(error_with(
            "password_too_short",
            "Password must be at least 8 characters",
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(error_with(
            "password_numeric",
            "Password cannot be entirely numeric",
        ));
    }
    Ok(())
}

pub fn validate_gpa(gpa: &Decimal) -> std::result::Result<(), ValidationError> {
    if *gpa < Decimal::ZERO || *gpa > Decimal::from(4) {
        return Err(error_with("gpa_range", "GPA must be between 0 and 4"));
    }
    Ok(())
}

pub fn validate_skill_list(skills: &[String]) -> std::result::Result<(), ValidationError> {
    if skills.iter().any(|s| s.trim().is_empty()) {
        return Err(error_with("skills", "Skills cannot contain empty entries"));
    }
    Ok(())
}

pub fn ensure_passwords_match(password: &str, confirm: &str) -> Result<()> {
    if password != confirm {
        return Err(field_error(
            "password_confirm",
            "password_mismatch",
            "Passwords do not match",
        ));
    }
    Ok(())
}

pub fn ensure_salary_range(min: Option<Decimal>, max: Option<Decimal>) -> Result<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(field_error(
                "salary_min",
                "salary_range",
                "Minimum salary cannot be greater than maximum salary",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_must_be_eleven_digits() {
        assert!(validate_phone("13800138000").is_ok());
        assert!(validate_phone("1380013800").is_err());
        assert!(validate_phone("1380013800a").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password_strength("short1").is_err());
        assert!(validate_password_strength("12345678").is_err());
        assert!(validate_password_strength("abc12345").is_ok());
        assert!(ensure_passwords_match("abc12345", "abc12346").is_err());
    }

    #[test]
    fn gpa_bounds_are_inclusive() {
        assert!(validate_gpa(&Decimal::ZERO).is_ok());
        assert!(validate_gpa(&Decimal::from(4)).is_ok());
        assert!(validate_gpa(&Decimal::new(41, 1)).is_err());
    }

    #[test]
    fn salary_min_above_max_is_a_field_error() {
        let err = ensure_salary_range(Some(Decimal::from(25000)), Some(Decimal::from(15000)))
            .unwrap_err();
        match err {
            Error::Validation(errs) => assert!(errs.field_errors().contains_key("salary_min")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(ensure_salary_range(Some(Decimal::from(1)), None).is_ok());
    }
}
