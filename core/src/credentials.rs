//! Shape checks for the remaining account fields.
//!
//! Same contract as the password engine: empty input has no issues, and all
//! issues of a field are reported together.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::validation::text_length;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 50;
pub const EMAIL_MAX_LENGTH: usize = 100;
pub const NAME_MAX_LENGTH: usize = 50;
pub const BIO_MAX_LENGTH: usize = 500;
pub const PROFILE_PICTURE_URL_MAX_LENGTH: usize = 255;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("username pattern"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialIssue {
    UsernameSize,
    UsernamePattern,
    EmailInvalid,
    EmailSize,
    FirstNameSize,
    LastNameSize,
    BioSize,
    ProfilePictureSize,
}

impl CredentialIssue {
    pub fn message(self) -> &'static str {
        match self {
            CredentialIssue::UsernameSize => "Username must be between 3 and 50 characters",
            CredentialIssue::UsernamePattern => {
                "Username can only contain letters, numbers, underscores, and hyphens"
            }
            CredentialIssue::EmailInvalid => "Email must be valid",
            CredentialIssue::EmailSize => "Email must not exceed 100 characters",
            CredentialIssue::FirstNameSize => "First name must not exceed 50 characters",
            CredentialIssue::LastNameSize => "Last name must not exceed 50 characters",
            CredentialIssue::BioSize => "Bio must not exceed 500 characters",
            CredentialIssue::ProfilePictureSize => {
                "Profile picture URL must not exceed 255 characters"
            }
        }
    }
}

impl std::fmt::Display for CredentialIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

pub fn check_username(value: &str) -> Vec<CredentialIssue> {
    let mut issues = Vec::new();
    if value.is_empty() {
        return issues;
    }
    let len = text_length(value);
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
        issues.push(CredentialIssue::UsernameSize);
    }
    if !USERNAME_PATTERN.is_match(value) {
        issues.push(CredentialIssue::UsernamePattern);
    }
    issues
}

pub fn check_email(value: &str) -> Vec<CredentialIssue> {
    let mut issues = Vec::new();
    if value.is_empty() {
        return issues;
    }
    if !EMAIL_PATTERN.is_match(value) {
        issues.push(CredentialIssue::EmailInvalid);
    }
    if text_length(value) > EMAIL_MAX_LENGTH {
        issues.push(CredentialIssue::EmailSize);
    }
    issues
}

pub fn check_first_name(value: &str) -> Vec<CredentialIssue> {
    check_max_length(value, NAME_MAX_LENGTH, CredentialIssue::FirstNameSize)
}

pub fn check_last_name(value: &str) -> Vec<CredentialIssue> {
    check_max_length(value, NAME_MAX_LENGTH, CredentialIssue::LastNameSize)
}

pub fn check_bio(value: &str) -> Vec<CredentialIssue> {
    check_max_length(value, BIO_MAX_LENGTH, CredentialIssue::BioSize)
}

pub fn check_profile_picture_url(value: &str) -> Vec<CredentialIssue> {
    check_max_length(
        value,
        PROFILE_PICTURE_URL_MAX_LENGTH,
        CredentialIssue::ProfilePictureSize,
    )
}

fn check_max_length(value: &str, max: usize, issue: CredentialIssue) -> Vec<CredentialIssue> {
    if text_length(value) > max {
        vec![issue]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_have_no_issues() {
        assert!(check_username("").is_empty());
        assert!(check_email("").is_empty());
        assert!(check_first_name("").is_empty());
        assert!(check_last_name("").is_empty());
        assert!(check_bio("").is_empty());
        assert!(check_profile_picture_url("").is_empty());
    }

    #[test]
    fn username_rules() {
        assert!(check_username("jane_doe-42").is_empty());
        assert_eq!(check_username("jd"), vec![CredentialIssue::UsernameSize]);
        assert_eq!(check_username("jane doe"), vec![CredentialIssue::UsernamePattern]);
        assert_eq!(
            check_username("j!"),
            vec![CredentialIssue::UsernameSize, CredentialIssue::UsernamePattern]
        );
        assert_eq!(check_username(&"a".repeat(51)), vec![CredentialIssue::UsernameSize]);
    }

    #[test]
    fn email_rules() {
        assert!(check_email("jane@example.com").is_empty());
        assert_eq!(check_email("jane@"), vec![CredentialIssue::EmailInvalid]);
        assert_eq!(check_email("jane example@x.io"), vec![CredentialIssue::EmailInvalid]);
        let long = format!("{}@example.com", "a".repeat(95));
        assert_eq!(check_email(&long), vec![CredentialIssue::EmailSize]);
    }

    #[test]
    fn name_rules() {
        assert!(check_first_name("Jane").is_empty());
        assert_eq!(check_last_name(&"x".repeat(51)), vec![CredentialIssue::LastNameSize]);
    }

    #[test]
    fn profile_field_limits() {
        assert!(check_bio(&"b".repeat(500)).is_empty());
        assert_eq!(check_bio(&"b".repeat(501)), vec![CredentialIssue::BioSize]);

        let url = format!("https://cdn.example.com/{}", "p".repeat(231));
        assert_eq!(url.len(), 255);
        assert!(check_profile_picture_url(&url).is_empty());
        assert_eq!(
            check_profile_picture_url(&format!("{url}p")),
            vec![CredentialIssue::ProfilePictureSize]
        );
        assert_eq!(
            CredentialIssue::BioSize.to_string(),
            "Bio must not exceed 500 characters"
        );
    }

    #[test]
    fn limits_count_utf16_units() {
        // 25 astral characters are 50 units, one more tips it over
        assert!(check_first_name(&"😀".repeat(25)).is_empty());
        assert_eq!(
            check_first_name(&format!("{}x", "😀".repeat(25))),
            vec![CredentialIssue::FirstNameSize]
        );
    }

    #[test]
    fn messages() {
        assert_eq!(CredentialIssue::EmailInvalid.to_string(), "Email must be valid");
        assert_eq!(
            serde_json::to_value(CredentialIssue::UsernamePattern).unwrap(),
            "usernamePattern"
        );
    }
}
