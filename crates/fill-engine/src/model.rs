use std::collections::HashMap;

use formpilot_core_types::{DynamicRule, FieldKey, FillId, Mapping, Prefs, Profile};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Execution context for one fill invocation.
#[derive(Clone, Debug)]
pub struct ExecCtx {
    pub fill_id: FillId,
    pub cancel: CancellationToken,
}

impl ExecCtx {
    pub fn new() -> Self {
        Self {
            fill_id: FillId::new(),
            cancel: CancellationToken::new(),
        }
    }
}

impl Default for ExecCtx {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one fill pass consumes. Mappings and rules are the stored
/// entries for the current hostname; the engine never writes them back.
#[derive(Clone, Debug, Default)]
pub struct FillParams {
    pub profile: Profile,
    pub prefs: Prefs,
    pub mappings: HashMap<FieldKey, Mapping>,
    pub rules: Vec<DynamicRule>,
}

/// What a field outcome is about: a canonical key or a dynamic rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Key { key: FieldKey },
    Rule {
        #[serde(rename = "ruleId")]
        rule_id: String,
    },
}

/// Reporting category of the attempted target.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLabel {
    Text,
    Select,
    Radio,
    Editable,
    Other,
}

/// Why a field did or did not change. "Not an error" outcomes — the field
/// is simply left alone and the operator can read the reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    Filled,
    Selected,
    Clicked,
    EmptyValue,
    NoValue,
    NoAnswer,
    NoMatch,
    NotFound,
    NotVisible,
    NotTextLike,
    AlreadyHasValue,
    AlreadySelected,
    Skipped,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Filled => "filled",
            Reason::Selected => "selected",
            Reason::Clicked => "clicked",
            Reason::EmptyValue => "empty-value",
            Reason::NoValue => "no-value",
            Reason::NoAnswer => "no-answer",
            Reason::NoMatch => "no-match",
            Reason::NotFound => "not-found",
            Reason::NotVisible => "not-visible",
            Reason::NotTextLike => "not-textlike",
            Reason::AlreadyHasValue => "already-has-value",
            Reason::AlreadySelected => "already-selected",
            Reason::Skipped => "skipped",
        }
    }
}

/// One attempted field. Exactly one record per attempt; no field is
/// double-reported within a tier.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    #[serde(flatten)]
    pub subject: Subject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub kind: TargetLabel,
    pub changed: bool,
    pub why: Reason,
    /// First 120 characters of the element's hint string, for diagnosis.
    #[serde(default)]
    pub hints: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub inputs: usize,
    pub textareas: usize,
    pub selects: usize,
    pub radio_groups: usize,
}

/// Aggregate report for one fill invocation. Not persisted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillReport {
    pub mapped: Vec<Outcome>,
    pub rules: Vec<Outcome>,
    pub heuristic_text: Vec<Outcome>,
    pub heuristic_select: Vec<Outcome>,
    pub totals: Totals,
}

impl FillReport {
    pub fn changed_count(&self) -> usize {
        self.all_outcomes().filter(|o| o.changed).count()
    }

    pub fn all_outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.mapped
            .iter()
            .chain(self.rules.iter())
            .chain(self.heuristic_text.iter())
            .chain(self.heuristic_select.iter())
    }
}

/// Return value of a fill invocation.
#[derive(Clone, Debug)]
pub struct FillSummary {
    pub highlight_count: usize,
    pub report: FillReport,
}

pub(crate) const HINT_EXCERPT_LEN: usize = 120;

pub(crate) fn hint_excerpt(hints: &str) -> String {
    hints.chars().take(HINT_EXCERPT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_wire_shape() {
        let outcome = Outcome {
            subject: Subject::Key {
                key: FieldKey::Email,
            },
            selector: Some("#email".into()),
            kind: TargetLabel::Text,
            changed: true,
            why: Reason::Filled,
            hints: "email".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["key"], "email");
        assert_eq!(json["why"], "filled");
        assert_eq!(json["selector"], "#email");

        let rule_outcome = Outcome {
            subject: Subject::Rule {
                rule_id: "r1".into(),
            },
            selector: None,
            kind: TargetLabel::Radio,
            changed: false,
            why: Reason::NoAnswer,
            hints: String::new(),
        };
        let json = serde_json::to_value(&rule_outcome).unwrap();
        assert_eq!(json["ruleId"], "r1");
        assert_eq!(json["why"], "no-answer");
        assert!(json.get("selector").is_none());
    }

    #[test]
    fn hint_excerpt_caps_length() {
        let long = "x".repeat(500);
        assert_eq!(hint_excerpt(&long).len(), HINT_EXCERPT_LEN);
        assert_eq!(hint_excerpt("short"), "short");
    }
}
