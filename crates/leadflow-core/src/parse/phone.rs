//! Phone number normalization to E.164.

/// Normalize a raw phone string to E.164 (`+` followed by 8..=15 digits,
/// first digit non-zero).
///
/// Accepts common formatting noise (spaces, dashes, dots, parentheses),
/// folds a leading `00` into `+`, and prepends `+` to bare digit strings.
/// Returns `None` when the cleaned number cannot form a valid E.164 string.
pub fn normalize_phone_number(raw: &str) -> Option<String> {
    let mut cleaned = String::with_capacity(raw.len());
    for (i, ch) in raw.trim().chars().enumerate() {
        match ch {
            '+' if i == 0 => cleaned.push('+'),
            '0'..='9' => cleaned.push(ch),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return None,
        }
    }

    let digits = if let Some(rest) = cleaned.strip_prefix('+') {
        rest.to_string()
    } else if let Some(rest) = cleaned.strip_prefix("00") {
        rest.to_string()
    } else {
        cleaned
    };

    let normalized = format!("+{digits}");
    if is_valid_phone_number(&normalized) {
        Some(normalized)
    } else {
        None
    }
}

/// True when `s` matches `^\+[1-9]\d{7,14}$`.
pub fn is_valid_phone_number(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('+') else {
        return false;
    };
    if !(8..=15).contains(&digits.len()) {
        return false;
    }
    let mut chars = digits.chars();
    match chars.next() {
        Some('1'..='9') => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_e164_is_identity() {
        assert_eq!(
            normalize_phone_number("+79161234567").as_deref(),
            Some("+79161234567")
        );
    }

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(
            normalize_phone_number("+7 (916) 123-45-67").as_deref(),
            Some("+79161234567")
        );
        assert_eq!(
            normalize_phone_number("  +1 555.123.4567 ").as_deref(),
            Some("+15551234567")
        );
    }

    #[test]
    fn test_normalize_folds_double_zero_prefix() {
        assert_eq!(
            normalize_phone_number("00972501234567").as_deref(),
            Some("+972501234567")
        );
    }

    #[test]
    fn test_normalize_prepends_plus_to_bare_digits() {
        assert_eq!(
            normalize_phone_number("79161234567").as_deref(),
            Some("+79161234567")
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_phone_number("not a phone"), None);
        assert_eq!(normalize_phone_number(""), None);
        assert_eq!(normalize_phone_number("+"), None);
        assert_eq!(normalize_phone_number("++79161234567"), None);
    }

    #[test]
    fn test_normalize_rejects_bad_lengths() {
        // 7 digits: too short
        assert_eq!(normalize_phone_number("+1234567"), None);
        // 16 digits: too long
        assert_eq!(normalize_phone_number("+1234567890123456"), None);
    }

    #[test]
    fn test_normalize_rejects_leading_zero_country_code() {
        assert_eq!(normalize_phone_number("+012345678"), None);
    }

    #[test]
    fn test_normalized_output_always_revalidates() {
        // Property from the contract: every accepted input produces a string
        // that is itself valid.
        for raw in [
            "+79161234567",
            "7 916 123 45 67",
            "0015551234567",
            "(972) 50-123-4567",
            "+12345678",
            "+123456789012345",
        ] {
            if let Some(normalized) = normalize_phone_number(raw) {
                assert!(
                    is_valid_phone_number(&normalized),
                    "normalized '{raw}' -> '{normalized}' failed revalidation"
                );
                assert!(normalized.starts_with('+'));
            }
        }
    }

    #[test]
    fn test_is_valid_phone_number_boundaries() {
        assert!(is_valid_phone_number("+12345678")); // 8 digits
        assert!(is_valid_phone_number("+123456789012345")); // 15 digits
        assert!(!is_valid_phone_number("+1234567")); // 7 digits
        assert!(!is_valid_phone_number("+1234567890123456")); // 16 digits
        assert!(!is_valid_phone_number("12345678")); // no plus
        assert!(!is_valid_phone_number("+0234567890")); // leading zero
        assert!(!is_valid_phone_number("+1234567a"));
    }
}
