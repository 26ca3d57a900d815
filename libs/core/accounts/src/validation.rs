use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());

/// Mobile phone: 10-15 digits with an optional leading `+`.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

/// Rejects strings that are empty once trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_local_and_international() {
        assert!(validate_phone("0100000000").is_ok());
        assert!(validate_phone("+201001234567").is_ok());
        assert!(validate_phone("123456789012345").is_ok());
    }

    #[test]
    fn test_phone_rejects_bad_input() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("01000abc00").is_err());
        assert!(validate_phone("++201001234567").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank(" x ").is_ok());
    }
}
