//! Password shape validation.
//!
//! # Design
//! Five independent rules are evaluated against the whole candidate and every
//! failure is reported at once, so a form can render a complete checklist in
//! one pass. An empty candidate is `Valid`: this engine checks shape, and the
//! "required" concern belongs to a separate presence check.
//!
//! The rule catalog (`rules`) is exposed separately from `validate` so that
//! guidance can be rendered before anything is typed. Both are derived from
//! the same `PasswordPolicy`, which keeps them on the same rule set.

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

pub const DEFAULT_MIN_LENGTH: usize = 8;
pub const DEFAULT_SPECIAL_CHARS: &str = "@$!%*?&#";

/// One password rule. Declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKey {
    MinLength,
    Uppercase,
    Lowercase,
    Number,
    Special,
}

impl RuleKey {
    pub const ALL: [RuleKey; 5] = [
        RuleKey::MinLength,
        RuleKey::Uppercase,
        RuleKey::Lowercase,
        RuleKey::Number,
        RuleKey::Special,
    ];

    /// Wire name of the rule, as used in failure mappings.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKey::MinLength => "minLength",
            RuleKey::Uppercase => "uppercase",
            RuleKey::Lowercase => "lowercase",
            RuleKey::Number => "number",
            RuleKey::Special => "special",
        }
    }
}

/// Catalog entry used to render guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDescriptor {
    pub key: RuleKey,
    pub label: String,
}

/// Why a rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDetail {
    /// `minLength` failed.
    Length {
        required_length: usize,
        actual_length: usize,
    },
    /// Any other rule failed; presence is the whole signal.
    Unmet,
}

impl Serialize for FailureDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FailureDetail::Length {
                required_length,
                actual_length,
            } => {
                let mut s = serializer.serialize_struct("FailureDetail", 2)?;
                s.serialize_field("requiredLength", required_length)?;
                s.serialize_field("actualLength", actual_length)?;
                s.end()
            }
            FailureDetail::Unmet => serializer.serialize_bool(true),
        }
    }
}

/// Result of validating one candidate.
///
/// A rule appears in the `Invalid` mapping iff it failed; the mapping is
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(BTreeMap<RuleKey, FailureDetail>),
}

impl ValidationOutcome {
    fn from_failures(failures: BTreeMap<RuleKey, FailureDetail>) -> Self {
        if failures.is_empty() {
            ValidationOutcome::Valid
        } else {
            ValidationOutcome::Invalid(failures)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Failed rules in rule order; empty when valid.
    pub fn failures(&self) -> impl Iterator<Item = (RuleKey, &FailureDetail)> {
        let map = match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(map) => Some(map),
        };
        map.into_iter().flatten().map(|(k, v)| (*k, v))
    }

    pub fn failed(&self, key: RuleKey) -> Option<&FailureDetail> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(map) => map.get(&key),
        }
    }
}

/// `null` when valid, otherwise the rule-to-failure mapping.
impl Serialize for ValidationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ValidationOutcome::Valid => serializer.serialize_none(),
            ValidationOutcome::Invalid(map) => map.serialize(serializer),
        }
    }
}

/// Configurable thresholds for the password rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordPolicy {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_special_chars")]
    pub special_chars: String,
}

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

fn default_special_chars() -> String {
    DEFAULT_SPECIAL_CHARS.to_string()
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            special_chars: default_special_chars(),
        }
    }
}

impl PasswordPolicy {
    pub fn new(min_length: usize, special_chars: impl Into<String>) -> Self {
        Self {
            min_length,
            special_chars: special_chars.into(),
        }
    }

    /// Rule catalog for this policy, in rule order.
    pub fn rules(&self) -> Vec<RuleDescriptor> {
        RuleKey::ALL
            .iter()
            .map(|&key| RuleDescriptor {
                key,
                label: self.label(key),
            })
            .collect()
    }

    fn label(&self, key: RuleKey) -> String {
        match key {
            RuleKey::MinLength => format!("At least {} characters", self.min_length),
            RuleKey::Uppercase => "One uppercase letter".to_string(),
            RuleKey::Lowercase => "One lowercase letter".to_string(),
            RuleKey::Number => "One number".to_string(),
            RuleKey::Special => format!("One special character ({})", self.special_chars),
        }
    }

    /// Evaluate every rule against `candidate` and collect all failures.
    pub fn validate(&self, candidate: &str) -> ValidationOutcome {
        if candidate.is_empty() {
            return ValidationOutcome::Valid;
        }

        let failures = RuleKey::ALL
            .iter()
            .filter_map(|&key| self.check(key, candidate).map(|detail| (key, detail)))
            .collect();
        ValidationOutcome::from_failures(failures)
    }

    fn check(&self, key: RuleKey, candidate: &str) -> Option<FailureDetail> {
        let passed = match key {
            RuleKey::MinLength => {
                let actual_length = text_length(candidate);
                if actual_length < self.min_length {
                    return Some(FailureDetail::Length {
                        required_length: self.min_length,
                        actual_length,
                    });
                }
                true
            }
            RuleKey::Uppercase => candidate.chars().any(|c| c.is_ascii_uppercase()),
            RuleKey::Lowercase => candidate.chars().any(|c| c.is_ascii_lowercase()),
            RuleKey::Number => candidate.chars().any(|c| c.is_ascii_digit()),
            RuleKey::Special => candidate.chars().any(|c| self.special_chars.contains(c)),
        };
        (!passed).then_some(FailureDetail::Unmet)
    }
}

/// Length as the form layer and the server measure it: UTF-16 code units.
pub fn text_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Rule catalog for the default policy.
pub fn password_rules() -> Vec<RuleDescriptor> {
    PasswordPolicy::default().rules()
}

/// Validate against the default policy.
pub fn validate_password(candidate: &str) -> ValidationOutcome {
    PasswordPolicy::default().validate(candidate)
}
