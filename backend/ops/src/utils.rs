use std::{str::FromStr, sync::LazyLock};

use catalog::Category;
use regex::Regex;

static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());
static UNPRINTABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[[\p{Cc}\p{Cf}]&&\S]").unwrap());
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Underscores become spaces, control characters go, whitespace collapses.
/// Case is kept.
pub fn clean_name(input: &str) -> String {
    let s = UNDERSCORES.replace_all(input, " ");
    let s = UNPRINTABLE.replace_all(&s, "");

    SPACES.replace_all(s.trim(), " ").into_owned()
}

pub fn parse_category(input: &str) -> Option<Category> {
    let cleaned = clean_name(input).to_lowercase();

    Category::from_str(&cleaned).ok()
}

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(clean_name("hello_world"), "hello world");
        assert_eq!(clean_name("Heavy-Duty Gloves"), "Heavy-Duty Gloves");
        assert_eq!(clean_name("Mop & Bucket (XL)"), "Mop & Bucket (XL)");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(clean_name("   hello   "), "hello");
        assert_eq!(clean_name("  multiple   spaces  "), "multiple spaces");
        assert_eq!(clean_name("tab\tand\nnewline"), "tab and newline");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(clean_name("zero\u{200B}width"), "zerowidth");
        assert_eq!(clean_name("bell\u{7}"), "bell");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(clean_name(""), "");
        assert_eq!(clean_name("  __  "), "");
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("Electronics"), Some(Category::Electronics));
        assert_eq!(parse_category("  SPORTS "), Some(Category::Sports));
        assert_eq!(parse_category("garden"), None);
    }

    #[test]
    fn test_money() {
        assert_eq!(money(3.5), "$3.50");
        assert_eq!(money(0.1 + 0.2), "$0.30");
    }
}
