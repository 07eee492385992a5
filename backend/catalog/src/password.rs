//! # Password Policy
//!
//! One policy for every flow that sets a password: registration, admin
//! creation, reset and profile change.
//!
//! Each rule is checked independently so the caller gets the full list of
//! problems at once, in a stable order.
use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Serialize, Serializer};

pub const MIN_LENGTH: usize = 8;

pub const WEAK_PATTERNS: [&str; 10] = [
    "password",
    "123456",
    "qwerty",
    "abc123",
    "password123",
    "admin",
    "user",
    "test",
    "guest",
    "welcome",
];

static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").unwrap());
static SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"#).unwrap());
static SEQUENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)abc|bcd|cde|def|efg|fgh|ghi|hij|ijk|jkl|klm|lmn|mno|nop|opq|pqr|qrs|rst|stu|tuv|uvw|vwx|wxy|xyz",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSpecial,
    CommonPattern,
    RepeatedCharacters,
    SequentialCharacters,
}

impl Violation {
    pub fn message(&self) -> &'static str {
        match self {
            Violation::TooShort => "At least 8 characters",
            Violation::MissingUppercase => "One uppercase letter",
            Violation::MissingLowercase => "One lowercase letter",
            Violation::MissingDigit => "One number",
            Violation::MissingSpecial => "One special character",
            Violation::CommonPattern => "No common patterns",
            Violation::RepeatedCharacters => "No repeated characters",
            Violation::SequentialCharacters => "No sequential characters",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

pub fn validate_password(password: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_LENGTH {
        violations.push(Violation::TooShort);
    }
    if !UPPERCASE.is_match(password) {
        violations.push(Violation::MissingUppercase);
    }
    if !LOWERCASE.is_match(password) {
        violations.push(Violation::MissingLowercase);
    }
    if !DIGIT.is_match(password) {
        violations.push(Violation::MissingDigit);
    }
    if !SPECIAL.is_match(password) {
        violations.push(Violation::MissingSpecial);
    }

    let lower = password.to_lowercase();
    if WEAK_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        violations.push(Violation::CommonPattern);
    }

    if has_repeated_run(password) {
        violations.push(Violation::RepeatedCharacters);
    }
    if SEQUENTIAL.is_match(password) {
        violations.push(Violation::SequentialCharacters);
    }

    violations
}

pub fn is_acceptable(password: &str) -> bool {
    validate_password(password).is_empty()
}

/// Same character three or more times in a row.
fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();

    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_passwords() {
        for password in ["Tr0ub4dor&3", "Zq9!mWp2#Lx", "N0rth-W1nd?", "Kp7$vQ2@"] {
            assert_eq!(validate_password(password), vec![], "{password}");
            assert!(is_acceptable(password));
        }
    }

    #[test]
    fn test_empty_fails_every_class() {
        assert_eq!(
            validate_password(""),
            vec![
                Violation::TooShort,
                Violation::MissingUppercase,
                Violation::MissingLowercase,
                Violation::MissingDigit,
                Violation::MissingSpecial,
            ]
        );
    }

    #[test]
    fn test_rules_are_not_short_circuited() {
        assert_eq!(
            validate_password("aaa"),
            vec![
                Violation::TooShort,
                Violation::MissingUppercase,
                Violation::MissingDigit,
                Violation::MissingSpecial,
                Violation::RepeatedCharacters,
            ]
        );
    }

    #[test]
    fn test_weak_patterns_any_case() {
        assert_eq!(validate_password("My-PassWord9"), vec![Violation::CommonPattern]);
        assert_eq!(validate_password("Qwerty#77x"), vec![Violation::CommonPattern]);
        assert_eq!(validate_password("xGuEsT!9z"), vec![Violation::CommonPattern]);
    }

    #[test]
    fn test_repeated_characters() {
        assert_eq!(validate_password("Zq9!!!mWp"), vec![Violation::RepeatedCharacters]);
        // two in a row is fine
        assert_eq!(validate_password("Zq9!!mWp"), vec![]);
    }

    #[test]
    fn test_sequential_characters() {
        assert_eq!(validate_password("Zq9!mNOp"), vec![Violation::SequentialCharacters]);
        assert_eq!(validate_password("Xyz#8Kqw"), vec![Violation::SequentialCharacters]);
        // descending runs and digit runs are not checked
        assert_eq!(validate_password("Zq9!cbaW"), vec![]);
    }

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(validate_password("Zq9!éW"), vec![Violation::TooShort]);
        assert_eq!(validate_password("Zq9!éWkp"), vec![]);
    }

    #[test]
    fn test_deterministic() {
        let first = validate_password("hello");
        for _ in 0..10 {
            assert_eq!(validate_password("hello"), first);
        }
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&validate_password("Zq9!!!mWp")).unwrap();
        assert_eq!(json, r#"["No repeated characters"]"#);
    }
}
