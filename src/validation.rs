//! Form input validation.
//!
//! Rules mirror what the admin forms enforce before anything is sent to the
//! API: field presence and length, email and Malaysian phone formats,
//! username charset and password strength.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+?6?01)[0-46-9]-*[0-9]{7,8}$").expect("valid phone regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid username regex"));

/// Characters that count as "special" for password strength.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Malaysian mobile number, whitespace ignored (e.g. `+6012-3456789`).
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.is_match(&compact)
}

/// Overall password strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        })
    }
}

/// Result of [`password_strength`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReport {
    pub strength: PasswordStrength,
    pub issues: Vec<&'static str>,
}

impl PasswordReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check a password against the length and character-class requirements.
///
/// Strong with no issues, medium with at most two, weak otherwise.
pub fn password_strength(password: &str) -> PasswordReport {
    let mut issues = Vec::new();

    if password.chars().count() < 8 {
        issues.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        issues.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        issues.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push("Password must contain at least one number");
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        issues.push("Password must contain at least one special character (!@#$%^&*)");
    }

    let strength = match issues.len() {
        0 => PasswordStrength::Strong,
        1..=2 => PasswordStrength::Medium,
        _ => PasswordStrength::Weak,
    };

    PasswordReport { strength, issues }
}

/// Constraints on one form field.
///
/// Checks run in order: required, minimum length, maximum length, pattern,
/// custom predicate. The first failure wins. When `message` is set it
/// replaces every default message.
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub custom: Option<fn(&str) -> bool>,
    pub message: Option<String>,
}

impl FieldRule {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn custom(mut self, check: fn(&str) -> bool) -> Self {
        self.custom = Some(check);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn fail(&self, default: impl FnOnce() -> String) -> Option<String> {
        Some(self.message.clone().unwrap_or_else(default))
    }
}

/// Preset rules used by the admin forms.
pub mod rules {
    use super::{FieldRule, EMAIL_RE, PHONE_RE, USERNAME_RE};

    pub fn email() -> FieldRule {
        FieldRule::required()
            .pattern(EMAIL_RE.clone())
            .message("Please enter a valid email address")
    }

    pub fn phone() -> FieldRule {
        FieldRule::required()
            .pattern(PHONE_RE.clone())
            .message("Please enter a valid Malaysian phone number")
    }

    pub fn password() -> FieldRule {
        FieldRule::required()
            .min_length(8)
            .message("Password must be at least 8 characters long")
    }

    pub fn username() -> FieldRule {
        FieldRule::required()
            .min_length(3)
            .max_length(20)
            .pattern(USERNAME_RE.clone())
            .message(
                "Username must be 3-20 characters and contain only letters, numbers, and underscores",
            )
    }

    pub fn required() -> FieldRule {
        FieldRule::required().message("This field is required")
    }
}

/// Check one value. Returns the error message, or `None` when valid.
///
/// An absent or empty value only fails when the rule is `required`.
pub fn validate_field(value: Option<&str>, rule: &FieldRule) -> Option<String> {
    let value = value.unwrap_or("");

    if rule.required && value.trim().is_empty() {
        return rule.fail(|| "This field is required".to_string());
    }
    if value.is_empty() {
        return None;
    }

    let len = value.chars().count();
    if let Some(min) = rule.min_length {
        if len < min {
            return rule.fail(|| format!("Minimum length is {min} characters"));
        }
    }
    if let Some(max) = rule.max_length {
        if len > max {
            return rule.fail(|| format!("Maximum length is {max} characters"));
        }
    }
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(value) {
            return rule.fail(|| "Invalid format".to_string());
        }
    }
    if let Some(check) = rule.custom {
        if !check(value) {
            return rule.fail(|| "Invalid value".to_string());
        }
    }

    None
}

/// Per-field error messages of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Validate every field that has a rule. Fields without a rule are ignored.
pub fn validate_form<'a>(
    data: impl Fn(&str) -> Option<&'a str>,
    rules: &[(&str, FieldRule)],
) -> FormErrors {
    let mut errors = BTreeMap::new();
    for (field, rule) in rules {
        if let Some(message) = validate_field(data(field), rule) {
            errors.insert(field.to_string(), message);
        }
    }
    FormErrors(errors)
}

/// HTML-escape characters that could break out of markup.
pub fn sanitize_input(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// Flatten text for one terminal row: control characters, line breaks
/// included, become spaces.
pub fn single_line(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("a.b@c.co"));
        assert!(!is_valid_email("admin@example"));
        assert!(!is_valid_email("admin example@x.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("0123456789"));
        assert!(is_valid_phone("012-3456789"));
        assert!(is_valid_phone("+60123456789"));
        assert!(is_valid_phone("011 2345 6789"));
        assert!(!is_valid_phone("0153456789"));
        assert!(!is_valid_phone("12345"));
    }

    #[test]
    fn test_password_strength() {
        let strong = password_strength("S3cret!pass");
        assert_eq!(strong.strength, PasswordStrength::Strong);
        assert!(strong.is_valid());

        let medium = password_strength("Secretpass");
        assert_eq!(medium.strength, PasswordStrength::Medium);
        assert_eq!(medium.issues.len(), 2);

        let weak = password_strength("abc");
        assert_eq!(weak.strength, PasswordStrength::Weak);
        assert!(!weak.is_valid());
    }

    #[test]
    fn test_validate_field_order_and_defaults() {
        let rule = FieldRule::required().min_length(3).max_length(5);

        assert_eq!(
            validate_field(None, &rule).as_deref(),
            Some("This field is required")
        );
        assert_eq!(
            validate_field(Some("   "), &rule).as_deref(),
            Some("This field is required")
        );
        assert_eq!(
            validate_field(Some("ab"), &rule).as_deref(),
            Some("Minimum length is 3 characters")
        );
        assert_eq!(
            validate_field(Some("abcdef"), &rule).as_deref(),
            Some("Maximum length is 5 characters")
        );
        assert_eq!(validate_field(Some("abcd"), &rule), None);
    }

    #[test]
    fn test_optional_empty_value_skips_checks() {
        let rule = FieldRule::default().min_length(3);
        assert_eq!(validate_field(Some(""), &rule), None);
        assert_eq!(validate_field(None, &rule), None);
    }

    #[test]
    fn test_custom_rule() {
        let rule = FieldRule::default().custom(|v| v.starts_with("LN-"));
        assert_eq!(validate_field(Some("LN-1"), &rule), None);
        assert_eq!(
            validate_field(Some("X-1"), &rule).as_deref(),
            Some("Invalid value")
        );
    }

    #[test]
    fn test_preset_message_overrides() {
        assert_eq!(
            validate_field(Some("a!"), &rules::username()).as_deref(),
            Some("Username must be 3-20 characters and contain only letters, numbers, and underscores")
        );
        assert_eq!(validate_field(Some("ops_admin"), &rules::username()), None);
        assert_eq!(
            validate_field(Some("nope"), &rules::email()).as_deref(),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_validate_form() {
        let form_rules = [
            ("username", rules::username()),
            ("password", rules::password()),
            ("email", rules::email()),
        ];
        let data = |field: &str| match field {
            "username" => Some("ops_admin"),
            "password" => Some("short"),
            _ => None,
        };

        let errors = validate_form(data, &form_rules);
        assert!(!errors.is_valid());
        assert_eq!(errors.len(), 2);
        assert!(errors.get("username").is_none());
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters long")
        );
        assert!(errors.to_string().contains("email: "));
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(
            sanitize_input(r#"<a href="/x">it's</a>"#),
            "&lt;a href=&quot;&#x2F;x&quot;&gt;it&#x27;s&lt;&#x2F;a&gt;"
        );
        assert_eq!(sanitize_input("plain"), "plain");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("it's <great> & fast"), "it's <great> & fast");
        assert_eq!(single_line("line one\nline two\ttab"), "line one line two tab");
        assert_eq!(single_line("bell\u{7}\u{1b}[31m"), "bell  [31m");
    }
}
