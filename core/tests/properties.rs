//! Property tests for URL joining and password validation.

use proptest::prelude::*;
use social_core::{validate_password, ApiClient, FailureDetail, QueryParams, RuleKey, ValidationOutcome};

fn base_url() -> impl Strategy<Value = String> {
    ("(http|https)", "[a-z]{1,10}(\\.[a-z]{2,5}){1,2}", "(/[a-z0-9]{1,8}){0,2}")
        .prop_map(|(scheme, host, prefix)| format!("{scheme}://{host}{prefix}"))
}

fn relative_path() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,4}"
}

fn reported(candidate: &str) -> Vec<RuleKey> {
    validate_password(candidate).failures().map(|(k, _)| k).collect()
}

/// Has every character class and at least 8 units.
fn strong_password() -> impl Strategy<Value = String> {
    ("[A-Z]", "[a-z]", "[0-9]", "[@$!%*?&#]", "[a-zA-Z0-9@$!%*?&#]{4,12}")
        .prop_map(|(u, l, d, s, rest)| format!("{rest}{u}{l}{d}{s}"))
}

proptest! {
    #[test]
    fn leading_slash_does_not_change_the_url(base in base_url(), path in relative_path()) {
        let client = ApiClient::new(&base).unwrap();
        let relative = client.build_url(&path);
        let absolute = client.build_url(&format!("/{path}"));
        prop_assert_eq!(&relative, &absolute);
        prop_assert_eq!(relative, format!("{base}/{path}"));
    }

    #[test]
    fn join_has_exactly_one_separator(
        base in base_url(),
        trailing in 0usize..3,
        path in relative_path(),
        leading in any::<bool>(),
    ) {
        let client = ApiClient::new(&format!("{base}{}", "/".repeat(trailing))).unwrap();
        let path = if leading { format!("/{path}") } else { path };
        let url = client.build_url(&path);
        let rest = url.strip_prefix(&base).unwrap();
        prop_assert!(rest.starts_with('/'));
        prop_assert!(!rest.starts_with("//"));
    }

    #[test]
    fn query_values_survive_encoding(q in "[a-zA-Z0-9 &=?]{0,20}", page in 0u32..1000, flag in any::<bool>()) {
        let params = QueryParams::new().with("q", q.clone()).with("page", page).with("flag", flag);
        let encoded = params.encode();
        let decoded: Vec<(String, String)> = url::form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect();
        prop_assert_eq!(
            decoded,
            vec![
                ("q".to_string(), q),
                ("page".to_string(), page.to_string()),
                ("flag".to_string(), flag.to_string()),
            ]
        );
    }

    #[test]
    fn short_candidates_report_their_length(candidate in "[a-zA-Z0-9@#]{1,7}") {
        let outcome = validate_password(&candidate);
        prop_assert_eq!(
            outcome.failed(RuleKey::MinLength),
            Some(&FailureDetail::Length { required_length: 8, actual_length: candidate.len() })
        );
    }

    #[test]
    fn astral_characters_count_as_two_units(emoji in 0usize..6) {
        let candidate = format!("{}Aa1!", "\u{1F600}".repeat(emoji));
        let actual_length = 2 * emoji + 4;
        let outcome = validate_password(&candidate);
        if actual_length < 8 {
            prop_assert_eq!(
                outcome.failed(RuleKey::MinLength),
                Some(&FailureDetail::Length { required_length: 8, actual_length })
            );
        } else {
            prop_assert!(outcome.is_valid());
        }
    }

    #[test]
    fn long_enough_candidates_pass_length(candidate in "[a-z0-9]{8,24}") {
        prop_assert!(!reported(&candidate).contains(&RuleKey::MinLength));
    }

    #[test]
    fn missing_uppercase_is_reported(candidate in "[a-z0-9@$!%*?&# ]{1,16}") {
        prop_assert!(reported(&candidate).contains(&RuleKey::Uppercase));
    }

    #[test]
    fn missing_lowercase_is_reported(candidate in "[A-Z0-9@$!%*?&# ]{1,16}") {
        prop_assert!(reported(&candidate).contains(&RuleKey::Lowercase));
    }

    #[test]
    fn missing_digit_is_reported(candidate in "[a-zA-Z@$!%*?&# ]{1,16}") {
        prop_assert!(reported(&candidate).contains(&RuleKey::Number));
    }

    #[test]
    fn missing_special_is_reported(candidate in "[a-zA-Z0-9 ^~]{1,16}") {
        prop_assert!(reported(&candidate).contains(&RuleKey::Special));
    }

    #[test]
    fn strong_passwords_are_valid(candidate in strong_password()) {
        prop_assert_eq!(validate_password(&candidate), ValidationOutcome::Valid);
    }

    #[test]
    fn one_missing_class_is_the_only_failure(
        candidate in strong_password(),
        missing in 0usize..4,
    ) {
        let key = [RuleKey::Uppercase, RuleKey::Lowercase, RuleKey::Number, RuleKey::Special][missing];
        let in_class = |c: char| match key {
            RuleKey::Uppercase => c.is_ascii_uppercase(),
            RuleKey::Lowercase => c.is_ascii_lowercase(),
            RuleKey::Number => c.is_ascii_digit(),
            _ => "@$!%*?&#".contains(c),
        };
        // pad with spaces so length never becomes a second failure
        let stripped: String = candidate.chars().filter(|&c| !in_class(c)).collect();
        let padded = format!("{stripped}        ");
        prop_assert_eq!(reported(&padded), vec![key]);
    }

    #[test]
    fn validation_is_idempotent(candidate in "[a-zA-Z0-9@$!%*?&# ]{0,12}") {
        prop_assert_eq!(validate_password(&candidate), validate_password(&candidate));
    }
}
