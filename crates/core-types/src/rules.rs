//! Persisted shapes: operator-captured mappings and dynamic rules.
//!
//! Both are created and mutated only through explicit operator actions in
//! the external store; the fill pass consumes them read-only.

use crate::keys::FieldKey;

/// Element capability a mapping was captured against.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MappingKind {
    Input,
    Textarea,
    Select,
    Editable,
}

/// Capture-time attributes kept alongside the selector for diagnostics.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(default, rename_all = "camelCase"))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MappingMeta {
    pub label: String,
    pub name: String,
    pub id: String,
    pub input_type: String,
}

/// Operator-captured association between a field key and a page selector,
/// scoped to the hostname it was captured on.
///
/// The selector is advisory: uniqueness is only verified at capture time for
/// the name/aria-label forms, so replay after a page restructure may resolve
/// to a different element.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    pub selector: String,
    pub kind: MappingKind,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub meta: MappingMeta,
}

/// Where a dynamic rule's answer comes from.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde-full",
    serde(tag = "source", rename_all = "lowercase")
)]
#[derive(Clone, Debug, PartialEq)]
pub enum RuleSource {
    Pref {
        #[cfg_attr(feature = "serde-full", serde(rename = "prefKey"))]
        pref_key: FieldKey,
    },
    Literal {
        value: String,
    },
}

/// Operator-defined substring rule, ordered per hostname; the first rule
/// whose match text occurs in a field's hints wins.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicRule {
    pub id: String,
    pub match_text: String,
    #[cfg_attr(feature = "serde-full", serde(flatten))]
    pub source: RuleSource,
}

impl DynamicRule {
    pub fn pref(match_text: impl Into<String>, pref_key: FieldKey) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            match_text: match_text.into(),
            source: RuleSource::Pref { pref_key },
        }
    }

    pub fn literal(match_text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            match_text: match_text.into(),
            source: RuleSource::Literal {
                value: value.into(),
            },
        }
    }
}
