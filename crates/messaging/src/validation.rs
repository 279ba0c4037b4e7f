//! Field-level validation helpers.

use serde::Serialize;
use std::collections::BTreeMap;

/// Validation messages keyed by field name, returned to form callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// Normalize a phone number to E.164.
///
/// Spaces, dashes, dots and parentheses are ignored. Ten-digit numbers are
/// treated as US numbers; anything else must carry a `+` country code.
pub fn normalize_phone_number(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Please enter a phone number".to_string());
    }

    let has_plus = trimmed.starts_with('+');
    let body = if has_plus { &trimmed[1..] } else { trimmed };

    let mut digits = String::with_capacity(body.len());
    for c in body.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err("Please enter a valid phone number".to_string()),
        }
    }

    match (has_plus, digits.len()) {
        (false, 10) => Ok(format!("+1{digits}")),
        (false, 11) if digits.starts_with('1') => Ok(format!("+{digits}")),
        (true, 8..=15) => Ok(format!("+{digits}")),
        _ => Err("Please enter a valid phone number".to_string()),
    }
}

/// Whether `to` is already a bare E.164 number.
pub fn is_e164(to: &str) -> bool {
    to.strip_prefix('+')
        .map(|digits| (8..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_us_numbers() {
        assert_eq!(normalize_phone_number("(202) 555-0100").unwrap(), "+12025550100");
        assert_eq!(normalize_phone_number("1 202 555 0100").unwrap(), "+12025550100");
        assert_eq!(normalize_phone_number("+44 20 7946 0958").unwrap(), "+442079460958");
    }

    #[test]
    fn test_reject_bad_numbers() {
        assert!(normalize_phone_number("").is_err());
        assert!(normalize_phone_number("555-0100").is_err());
        assert!(normalize_phone_number("202-555-010x").is_err());
    }

    #[test]
    fn test_is_e164() {
        assert!(is_e164("+12025550100"));
        assert!(!is_e164("12025550100"));
        assert!(!is_e164("+1202555010a"));
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("phoneNumber", "Please enter a valid phone number");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["phoneNumber"][0], "Please enter a valid phone number");
    }
}
