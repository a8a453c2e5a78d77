use std::sync::LazyLock;

use regex::Regex;

static SERIAL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9]{5,15}\b").unwrap());

const MIN_SERIAL_LEN: usize = 5;

/// First word-bounded alphanumeric token (5 to 15 characters) that looks like a
/// serial: mixes letters and digits, or is at least five characters long.
///
/// Case is preserved. No checksum or manufacturer format is applied.
pub fn extract_serial(raw_text: &str) -> Option<String> {
    SERIAL_TOKEN
        .find_iter(raw_text)
        .map(|m| m.as_str())
        .find(|token| is_serial_like(token))
        .map(str::to_string)
}

fn is_serial_like(token: &str) -> bool {
    let has_letter = token.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    (has_letter && has_digit) || token.len() >= MIN_SERIAL_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_token_extracted_case_preserved() {
        assert_eq!(extract_serial("SN AB12345x"), Some("AB12345x".into()));
    }

    #[test]
    fn first_qualifying_token_wins() {
        // "Reading" is a five-plus character token and precedes the serial.
        assert_eq!(
            extract_serial("Reading: 123.45 gal, serial AB12345"),
            Some("Reading".into())
        );
    }

    #[test]
    fn short_tokens_skipped() {
        assert_eq!(extract_serial("SN 12 AB 3C4 X9Y8Z7"), Some("X9Y8Z7".into()));
    }

    #[test]
    fn long_tokens_skipped() {
        assert_eq!(extract_serial("A1234567890123456 ok"), None);
    }

    #[test]
    fn decimal_parts_are_separate_tokens() {
        assert_eq!(extract_serial("00123.45678"), Some("00123".into()));
    }

    #[test]
    fn nothing_in_empty_text() {
        assert_eq!(extract_serial(""), None);
        assert_eq!(extract_serial("a b c #1"), None);
    }
}
