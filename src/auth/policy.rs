//! Password strength policy evaluation

use crate::config::AppConfig;
use serde::Serialize;

/// Outcome of the five independent strength checks
///
/// Every flag is always evaluated so the caller can render full feedback;
/// `valid` is the conjunction of the five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrengthReport {
    pub min_length: bool,
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_digit: bool,
    pub has_special: bool,
    pub valid: bool,
}

impl PasswordStrengthReport {
    /// Names of the checks that failed, for validation messages
    pub fn failed_checks(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.min_length {
            failed.push("min_length");
        }
        if !self.has_uppercase {
            failed.push("uppercase");
        }
        if !self.has_lowercase {
            failed.push("lowercase");
        }
        if !self.has_digit {
            failed.push("digit");
        }
        if !self.has_special {
            failed.push("special");
        }
        failed
    }
}

/// Structural password policy
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.security.password_min_length)
    }

    /// Evaluate a candidate password; pure, no I/O
    pub fn evaluate(&self, password: &str) -> PasswordStrengthReport {
        let min_length = password.chars().count() >= self.min_length;
        let has_uppercase = password.chars().any(|c| c.is_uppercase());
        let has_lowercase = password.chars().any(|c| c.is_lowercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(|c| !c.is_alphanumeric());

        PasswordStrengthReport {
            min_length,
            has_uppercase,
            has_lowercase,
            has_digit,
            has_special,
            valid: min_length && has_uppercase && has_lowercase && has_digit && has_special,
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_password_all_flags_false() {
        let report = PasswordPolicy::default().evaluate("");

        assert!(!report.min_length);
        assert!(!report.has_uppercase);
        assert!(!report.has_lowercase);
        assert!(!report.has_digit);
        assert!(!report.has_special);
        assert!(!report.valid);
        assert_eq!(report.failed_checks().len(), 5);
    }

    #[test]
    fn test_strong_password_all_flags_true() {
        let report = PasswordPolicy::default().evaluate("Ab1!abcd");

        assert!(report.min_length);
        assert!(report.has_uppercase);
        assert!(report.has_lowercase);
        assert!(report.has_digit);
        assert!(report.has_special);
        assert!(report.valid);
        assert!(report.failed_checks().is_empty());
    }

    #[test]
    fn test_all_lowercase_reports_each_missing_class() {
        let report = PasswordPolicy::default().evaluate("alllowercase");

        assert!(report.min_length);
        assert!(report.has_lowercase);
        assert!(!report.has_uppercase);
        assert!(!report.has_digit);
        assert!(!report.has_special);
        assert!(!report.valid);
    }

    #[test]
    fn test_min_length_counts_characters() {
        let policy = PasswordPolicy::new(8);

        assert!(!policy.evaluate("Ab1!abc").min_length);
        assert!(policy.evaluate("Ab1!abcd").min_length);
        // 多字节字符按字符数而不是字节数计
        assert!(policy.evaluate("Ab1!密码密码").min_length);
    }

    #[test]
    fn test_configured_min_length() {
        let policy = PasswordPolicy::new(12);
        let report = policy.evaluate("Ab1!abcd");

        assert!(!report.min_length);
        assert!(!report.valid);
    }
}
