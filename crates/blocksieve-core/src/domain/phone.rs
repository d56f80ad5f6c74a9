use crate::error::CoreError;
use serde::Serialize;

pub const DEFAULT_COUNTRY_CODE: &str = "40";
pub const DEFAULT_NATIONAL_NUMBER_LEN: usize = 9;
pub const MIN_DIGITS: usize = 8;
pub const MAX_DIGITS: usize = 15;

/// A phone cell after normalization. `canonical` is the E.164 form, or `None`
/// when the raw value could not be coerced into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneValue {
    pub raw: String,
    pub canonical: Option<String>,
}

impl PhoneValue {
    pub fn is_valid(&self) -> bool {
        self.canonical.is_some()
    }

    /// Value written to output: the canonical form (optionally without `+`),
    /// or the raw value untouched for invalid numbers.
    pub fn output_value(&self, strip_plus: bool) -> &str {
        match self.canonical.as_deref() {
            Some(canonical) if strip_plus => canonical.trim_start_matches('+'),
            Some(canonical) => canonical,
            None => &self.raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNormalizer {
    country_code: String,
    national_number_len: usize,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            national_number_len: DEFAULT_NATIONAL_NUMBER_LEN,
        }
    }
}

impl PhoneNormalizer {
    pub fn new(country_code: &str, national_number_len: usize) -> Result<Self, CoreError> {
        let code = country_code.trim().trim_start_matches('+');
        if code.is_empty()
            || code.len() > 3
            || code.starts_with('0')
            || !code.chars().all(|ch| ch.is_ascii_digit())
        {
            return Err(CoreError::InvalidCountryCode(country_code.to_string()));
        }
        if national_number_len < 4 || code.len() + national_number_len > MAX_DIGITS {
            return Err(CoreError::InvalidNationalNumberLength(national_number_len));
        }
        Ok(Self {
            country_code: code.to_string(),
            national_number_len,
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn normalize(&self, raw: &str) -> PhoneValue {
        PhoneValue {
            raw: raw.to_string(),
            canonical: self.canonicalize(raw),
        }
    }

    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('*') {
            return None;
        }
        let trimmed = strip_float_suffix(trimmed);
        if trimmed.chars().any(char::is_alphabetic) {
            return None;
        }

        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        if digits.len() < MIN_DIGITS {
            return None;
        }

        if trimmed.starts_with('+') {
            return international(&digits);
        }
        if let Some(rest) = digits.strip_prefix("00") {
            return international(rest);
        }
        if let Some(rest) = digits.strip_prefix('0') {
            return international(&format!("{}{}", self.country_code, rest));
        }

        let full_len = self.country_code.len() + self.national_number_len;
        if digits.starts_with(&self.country_code) && digits.len() == full_len {
            return international(&digits);
        }
        if digits.len() <= self.national_number_len {
            return international(&format!("{}{}", self.country_code, digits));
        }
        if digits.len() >= full_len {
            return international(&digits);
        }
        None
    }
}

/// Normalizes with the default country code.
pub fn normalize_phone(raw: &str) -> PhoneValue {
    PhoneNormalizer::default().normalize(raw)
}

fn international(digits: &str) -> Option<String> {
    if digits.starts_with('0') || !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
        return None;
    }
    Some(format!("+{digits}"))
}

// Spreadsheet exports often carry phone numbers as floats.
fn strip_float_suffix(value: &str) -> &str {
    match value.strip_suffix(".0") {
        Some(head) if head.chars().all(|ch| ch.is_ascii_digit() || ch == '+') => head,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_phone, PhoneNormalizer};

    fn canonical(raw: &str) -> Option<String> {
        normalize_phone(raw).canonical
    }

    #[test]
    fn equivalent_notations_share_a_canonical_form() {
        let expected = Some("+40723456789".to_string());
        assert_eq!(canonical("+40723456789"), expected);
        assert_eq!(canonical("0723456789"), expected);
        assert_eq!(canonical("723456789"), expected);
        assert_eq!(canonical("40723456789"), expected);
        assert_eq!(canonical("0040723456789"), expected);
        assert_eq!(canonical("+40 (723) 456-789"), expected);
        assert_eq!(canonical("0723.456.789"), expected);
    }

    #[test]
    fn canonical_input_is_unchanged() {
        for value in ["+40723456789", "+447911123456", "+12025550143"] {
            assert_eq!(canonical(value).as_deref(), Some(value));
        }
    }

    #[test]
    fn float_suffix_is_dropped() {
        assert_eq!(canonical("723456789.0").as_deref(), Some("+40723456789"));
    }

    #[test]
    fn international_digits_without_plus_are_accepted() {
        assert_eq!(canonical("447911123456").as_deref(), Some("+447911123456"));
    }

    #[test]
    fn rejects_letters_masks_and_blank_values() {
        assert!(canonical("abc").is_none());
        assert!(canonical("0723 456 789 ext 5").is_none());
        assert!(canonical("*****6789").is_none());
        assert!(canonical("   ").is_none());
        assert!(canonical("").is_none());
    }

    #[test]
    fn rejects_implausible_lengths() {
        assert!(canonical("1234567").is_none());
        assert!(canonical("7234567890").is_none());
        assert!(canonical("+1234567890123456").is_none());
        assert!(canonical("+0723456789").is_none());
    }

    #[test]
    fn invalid_values_keep_raw_text_for_output() {
        let value = normalize_phone(" n/a ");
        assert!(!value.is_valid());
        assert_eq!(value.output_value(true), " n/a ");
    }

    #[test]
    fn strip_plus_only_affects_output() {
        let value = normalize_phone("0723456789");
        assert_eq!(value.canonical.as_deref(), Some("+40723456789"));
        assert_eq!(value.output_value(true), "40723456789");
        assert_eq!(value.output_value(false), "+40723456789");
    }

    #[test]
    fn custom_country_code_applies_to_trunk_numbers() {
        let normalizer = PhoneNormalizer::new("+33", 9).expect("normalizer");
        assert_eq!(
            normalizer.canonicalize("06 12 34 56 78").as_deref(),
            Some("+33612345678")
        );
    }

    #[test]
    fn rejects_bad_country_codes() {
        assert!(PhoneNormalizer::new("", 9).is_err());
        assert!(PhoneNormalizer::new("4a", 9).is_err());
        assert!(PhoneNormalizer::new("0040", 9).is_err());
        assert!(PhoneNormalizer::new("40", 20).is_err());
    }
}
