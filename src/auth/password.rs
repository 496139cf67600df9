//! Password strength scoring and policy pre-checks
//!
//! The strength meter is a heuristic for the register screen; the policy
//! rules mirror what the server enforces at registration so violations
//! surface before a round-trip.

/// Strength meter label, derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    pub fn text(&self) -> &'static str {
        match self {
            StrengthLabel::VeryWeak => "Very weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::VeryStrong => "Very strong",
        }
    }
}

impl std::fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Score and label for one candidate password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthReport {
    /// 0..=100, drives the meter width
    pub score: u8,
    pub label: StrengthLabel,
}

/// Score a candidate password.
///
/// Additive: length >= 8 earns 20, length >= 12 another 10, and each
/// present character class (lower, upper, digit, other) 20 more, capped
/// at 100.
pub fn password_strength(password: &str) -> StrengthReport {
    let mut score: u32 = 0;

    if password.chars().count() >= 8 {
        score += 20;
    }
    if password.chars().count() >= 12 {
        score += 10;
    }
    if password.chars().any(|c| c.is_lowercase()) {
        score += 20;
    }
    if password.chars().any(|c| c.is_uppercase()) {
        score += 20;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 20;
    }
    if password
        .chars()
        .any(|c| !c.is_alphanumeric())
    {
        score += 20;
    }

    let label = match score {
        90.. => StrengthLabel::VeryStrong,
        70..=89 => StrengthLabel::Strong,
        50..=69 => StrengthLabel::Medium,
        30..=49 => StrengthLabel::Weak,
        _ => StrengthLabel::VeryWeak,
    };

    StrengthReport {
        score: score.min(100) as u8,
        label,
    }
}

/// Confirm-field state, drives its border styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Nothing typed yet; neutral styling
    Empty,
    Match,
    Mismatch,
}

/// Compare the password and its confirmation.
pub fn confirm_state(password: &str, confirm: &str) -> MatchState {
    if confirm.is_empty() {
        MatchState::Empty
    } else if password == confirm {
        MatchState::Match
    } else {
        MatchState::Mismatch
    }
}

/// A registration password rule the server will enforce
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyRule {
    #[error("Password must be at least 8 characters")]
    TooShort,
    #[error("Password must contain an uppercase letter")]
    NoUppercase,
    #[error("Password must contain a lowercase letter")]
    NoLowercase,
    #[error("Password must contain a digit")]
    NoDigit,
    #[error("Password must contain a special character")]
    NoSpecial,
}

/// Check a password against the registration policy.
///
/// Empty when the password would pass the server's rules.
pub fn policy_violations(password: &str) -> Vec<PolicyRule> {
    let mut violations = Vec::new();

    if password.chars().count() < 8 {
        violations.push(PolicyRule::TooShort);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        violations.push(PolicyRule::NoUppercase);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        violations.push(PolicyRule::NoLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PolicyRule::NoDigit);
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        violations.push(PolicyRule::NoSpecial);
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_password_scores_zero() {
        let report = password_strength("");
        assert_eq!(report.score, 0);
        assert_eq!(report.label, StrengthLabel::VeryWeak);
    }

    #[test]
    fn test_lowercase_only_is_weak() {
        // length >= 8 (20) + lowercase (20) = 40
        let report = password_strength("password");
        assert_eq!(report.score, 40);
        assert_eq!(report.label, StrengthLabel::Weak);
    }

    #[test]
    fn test_mixed_case_digits_is_strong() {
        // 20 + 20 + 20 + 20 = 80
        let report = password_strength("Passw0rd");
        assert_eq!(report.score, 80);
        assert_eq!(report.label, StrengthLabel::Strong);
    }

    #[test]
    fn test_all_classes_long_is_very_strong() {
        // 20 + 10 + 20 + 20 + 20 + 20 = 110, capped at 100
        let report = password_strength("Sup3r-secret!pw");
        assert_eq!(report.score, 100);
        assert_eq!(report.label, StrengthLabel::VeryStrong);
    }

    #[test]
    fn test_medium_band() {
        // short, two classes: 20 + 20 + 20 = 60
        let report = password_strength("abcd1234");
        assert_eq!(report.score, 60);
        assert_eq!(report.label, StrengthLabel::Medium);
    }

    #[test]
    fn test_confirm_states() {
        assert_eq!(confirm_state("secret", ""), MatchState::Empty);
        assert_eq!(confirm_state("secret", "secret"), MatchState::Match);
        assert_eq!(confirm_state("secret", "secre"), MatchState::Mismatch);
    }

    #[test]
    fn test_policy_catches_each_rule() {
        assert!(policy_violations("Aa1!aaaa").is_empty());
        assert!(policy_violations("Aa1!").contains(&PolicyRule::TooShort));
        assert!(policy_violations("aa1!aaaa").contains(&PolicyRule::NoUppercase));
        assert!(policy_violations("AA1!AAAA").contains(&PolicyRule::NoLowercase));
        assert!(policy_violations("Aaa!aaaa").contains(&PolicyRule::NoDigit));
        assert!(policy_violations("Aa1aaaaa").contains(&PolicyRule::NoSpecial));
    }
}
