//! Shared primitives for the formpilot autofill engine crates.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

pub mod keys;
pub mod norm;
pub mod profile;
pub mod rules;

pub use keys::FieldKey;
pub use profile::{Prefs, Profile, ValueMap};
pub use rules::{DynamicRule, Mapping, MappingKind, MappingMeta, RuleSource};

/// Shared error type the per-crate errors convert into.
#[derive(Debug, Error, Clone)]
pub enum EngineError {
    #[error("{message}")]
    Message { message: String },
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Identifier for one fill invocation.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FillId(pub String);

impl FillId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for FillId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hostname a mapping table or rule list is scoped to.
///
/// Mappings captured on one host must never replay on another, so everything
/// that crosses the store or the transport carries this key.
pub fn hostname_of(raw_url: &str) -> String {
    match url::Url::parse(raw_url) {
        Ok(parsed) => parsed.host_str().unwrap_or("").to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_extracted_from_url() {
        assert_eq!(hostname_of("https://jobs.example.com/apply?id=1"), "jobs.example.com");
        assert_eq!(hostname_of("not a url"), "");
    }

    #[test]
    fn fill_ids_are_unique() {
        assert_ne!(FillId::new(), FillId::new());
    }
}
