//! Page number extraction from free-form location strings

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PAGE_PATTERN: Regex = Regex::new(r"(?i)Page\s+(\d+)").unwrap();
}

/// Parse the first "Page N" token in `location` into a 1-indexed page number.
///
/// Bounds are not checked here; "Page 0" parses to `Some(0)`.
pub fn parse_location(location: &str) -> Option<usize> {
    PAGE_PATTERN
        .captures(location)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simple_page() {
        assert_eq!(parse_location("Page 2"), Some(2));
    }

    #[test]
    fn test_page_of_total() {
        assert_eq!(parse_location("Page 7 of 10"), Some(7));
    }

    #[test]
    fn test_case_insensitive_and_embedded() {
        assert_eq!(parse_location("Section 3, PAGE   14, paragraph 2"), Some(14));
        assert_eq!(parse_location("see page\t5"), Some(5));
    }

    #[test]
    fn test_first_token_wins() {
        assert_eq!(parse_location("Page 3 - Page 4"), Some(3));
    }

    #[test]
    fn test_no_page_token() {
        assert_eq!(parse_location("Appendix"), None);
        assert_eq!(parse_location("unknown"), None);
        assert_eq!(parse_location(""), None);
        assert_eq!(parse_location("Page"), None);
        assert_eq!(parse_location("Page12"), None);
    }

    #[test]
    fn test_zero_is_not_rejected_here() {
        assert_eq!(parse_location("Page 0"), Some(0));
    }

    #[test]
    fn test_overflowing_number_is_none() {
        assert_eq!(parse_location("Page 99999999999999999999999999"), None);
    }

    proptest! {
        #[test]
        fn page_number_round_trips(n in 0usize..100_000, prefix in "[a-z ,]{0,20}", suffix in "[a-z ,]{0,20}") {
            let location = format!("{}Page {}{}", prefix, n, suffix);
            prop_assert_eq!(parse_location(&location), Some(n));
        }
    }
}
