//! Phone number normalization for the checkout flow.
//!
//! Customers type numbers in whatever shape they like; everything is reduced
//! to the canonical `+7XXXXXXXXXX` before it is stored on the user and the
//! order.

use regex::Regex;
use std::sync::LazyLock;

static CANONICAL_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+7\d{10}$").unwrap());

/// Normalize a user-supplied phone number to `+7XXXXXXXXXX`.
///
/// Accepted inputs (spaces, dashes and parentheses are ignored):
/// `8XXXXXXXXXX`, `7XXXXXXXXXX`, `+7XXXXXXXXXX` and the bare ten-digit
/// subscriber number. Anything else is rejected.
pub fn normalize_phone(input: &str) -> Result<String, PhoneError> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    let normalized = match digits.len() {
        11 if digits.starts_with('8') || digits.starts_with('7') => {
            format!("+7{}", &digits[1..])
        }
        10 => format!("+7{digits}"),
        _ => return Err(PhoneError::Invalid),
    };

    if CANONICAL_PHONE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(PhoneError::Invalid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneError {
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plus_seven() {
        assert_eq!(normalize_phone("+79991234567").unwrap(), "+79991234567");
    }

    #[test]
    fn test_normalize_eight_prefix() {
        assert_eq!(normalize_phone("89991234567").unwrap(), "+79991234567");
    }

    #[test]
    fn test_normalize_seven_prefix() {
        assert_eq!(normalize_phone("79991234567").unwrap(), "+79991234567");
    }

    #[test]
    fn test_normalize_bare_ten_digits() {
        assert_eq!(normalize_phone("9991234567").unwrap(), "+79991234567");
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(
            normalize_phone("8 (999) 123-45-67").unwrap(),
            "+79991234567"
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(normalize_phone("").is_err());
        assert!(normalize_phone("hello").is_err());
        assert!(normalize_phone("12345").is_err());
        assert!(normalize_phone("+1234567890123").is_err());
    }
}
