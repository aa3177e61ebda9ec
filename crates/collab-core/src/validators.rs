/// Strip everything but ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize a Russian phone number to `+7XXXXXXXXXX`.
///
/// Accepts 10 local digits, or 11 digits with a leading `7` or `8`.
/// Any punctuation is ignored. Returns `None` for anything else.
pub fn normalize_phone_ru(raw: &str) -> Option<String> {
    let digits = digits_only(raw.trim());
    match digits.len() {
        10 => Some(format!("+7{digits}")),
        11 if digits.starts_with('7') || digits.starts_with('8') => {
            Some(format!("+7{}", &digits[1..]))
        }
        _ => None,
    }
}

/// INN is valid when it has 10 (company) or 12 (individual) digits.
/// The checksum is not verified.
pub fn is_valid_inn(raw: &str) -> bool {
    let len = digits_only(raw).len();
    len == 10 || len == 12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_local_ten_digits() {
        assert_eq!(normalize_phone_ru("9991234567").as_deref(), Some("+79991234567"));
    }

    #[test]
    fn test_phone_eleven_digits_with_trunk_prefix() {
        assert_eq!(normalize_phone_ru("8 (999) 123-45-67").as_deref(), Some("+79991234567"));
        assert_eq!(normalize_phone_ru("+7 999 123 45 67").as_deref(), Some("+79991234567"));
    }

    #[test]
    fn test_phone_rejects_other_shapes() {
        assert_eq!(normalize_phone_ru(""), None);
        assert_eq!(normalize_phone_ru("12345"), None);
        assert_eq!(normalize_phone_ru("19991234567"), None);
        assert_eq!(normalize_phone_ru("+7 999 123 45 67 8"), None);
    }

    #[test]
    fn test_inn_lengths() {
        assert!(is_valid_inn("7812001002"));
        assert!(is_valid_inn("770111222333"));
        assert!(is_valid_inn("7812-001-002"));
        assert!(!is_valid_inn("12345678901"));
        assert!(!is_valid_inn(""));
    }
}
