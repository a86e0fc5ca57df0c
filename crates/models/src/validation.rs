//! Field validators shared by the entity modules.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::FieldErrors;

pub const REQUIRED: &str = "This field is required.";

pub const LICENSE_LENGTH: &str = "License number should consist of 8 characters";
pub const LICENSE_PREFIX: &str = "First 3 characters should be uppercase letters";
pub const LICENSE_SUFFIX: &str = "Last 5 characters should be digits";

static LICENSE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}").expect("static regex"));
static LICENSE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{5}$").expect("static regex"));

/// Record a `field` error when `value` is blank or longer than `max_len` characters.
pub fn required(errors: &mut FieldErrors, field: &str, value: &str, max_len: usize) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
    } else if trimmed.chars().count() > max_len {
        errors.add(field, format!("Ensure this value has at most {max_len} characters."));
    }
}

/// Check a license number against `^[A-Z]{3}[0-9]{5}$`, reporting the first rule it breaks.
pub fn license_number(value: &str) -> Result<(), &'static str> {
    if value.chars().count() != 8 {
        return Err(LICENSE_LENGTH);
    }
    if !LICENSE_PREFIX_RE.is_match(value) {
        return Err(LICENSE_PREFIX);
    }
    if !LICENSE_SUFFIX_RE.is_match(value) {
        return Err(LICENSE_SUFFIX);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_license_numbers_pass() {
        for ok in ["ABC12345", "QWE54321", "ZZZ00000"] {
            assert_eq!(license_number(ok), Ok(()), "{ok}");
        }
    }

    #[test]
    fn invalid_license_numbers_report_the_broken_rule() {
        let cases = [
            ("A*D12345", LICENSE_PREFIX),
            ("abc12345", LICENSE_PREFIX),
            ("ASD123*5", LICENSE_SUFFIX),
            ("ASDF2345", LICENSE_SUFFIX),
            ("ASD1234", LICENSE_LENGTH),
            ("ASD123456", LICENSE_LENGTH),
            ("", LICENSE_LENGTH),
        ];
        for (input, expected) in cases {
            assert_eq!(license_number(input), Err(expected), "{input}");
        }
    }

    #[test]
    fn non_ascii_letters_are_rejected() {
        assert_eq!(license_number("ÄBC12345"), Err(LICENSE_PREFIX));
    }

    #[test]
    fn required_flags_blank_and_overlong() {
        let mut errors = FieldErrors::new();
        required(&mut errors, "name", "   ", 10);
        required(&mut errors, "country", "abcdefghijk", 10);
        required(&mut errors, "model", "ok", 10);
        assert_eq!(errors.get("name"), Some(&[REQUIRED.to_string()][..]));
        assert!(errors.contains("country"));
        assert!(!errors.contains("model"));
    }
}
