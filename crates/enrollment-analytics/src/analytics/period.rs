//! Helpers for the `YYYYP` period codes used as grouping keys everywhere.

/// Formats `"20261"` as `"2026.1"`. Codes shorter than five characters are
/// returned unchanged.
pub fn format_period(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() < 5 {
        return code.to_string();
    }
    let year: String = chars[..4].iter().collect();
    let parity = chars[chars.len() - 1];
    format!("{year}.{parity}")
}

/// Parity digit of a raw period code (its last character).
pub fn parity(code: &str) -> Option<char> {
    code.chars().last()
}

/// Period one calendar year back in the same half-year slot:
/// `"20261"` -> `"20251"`. `None` when the year prefix is not numeric, which
/// callers treat as "no previous period on record".
pub fn previous_year_same_parity(code: &str) -> Option<String> {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() < 5 {
        return None;
    }
    let year: i32 = chars[..4].iter().collect::<String>().parse().ok()?;
    let parity = chars[chars.len() - 1];
    Some(format!("{}{}", year - 1, parity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_canonical_codes() {
        assert_eq!(format_period("20261"), "2026.1");
        assert_eq!(format_period("20252"), "2025.2");
    }

    #[test]
    fn short_codes_pass_through() {
        assert_eq!(format_period(""), "");
        assert_eq!(format_period("2026"), "2026");
    }

    #[test]
    fn parity_is_the_last_digit() {
        assert_eq!(parity("20261"), Some('1'));
        assert_eq!(parity("20252"), Some('2'));
        assert_eq!(parity(""), None);
    }

    #[test]
    fn previous_period_steps_one_year_back() {
        assert_eq!(previous_year_same_parity("20261").as_deref(), Some("20251"));
        assert_eq!(previous_year_same_parity("20252").as_deref(), Some("20242"));
    }

    #[test]
    fn previous_period_rejects_malformed_codes() {
        assert_eq!(previous_year_same_parity(""), None);
        assert_eq!(previous_year_same_parity("2026"), None);
        assert_eq!(previous_year_same_parity("ABCD1"), None);
    }
}
