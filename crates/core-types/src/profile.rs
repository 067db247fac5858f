//! Profile, preferences, and the per-fill resolved value map.

use std::collections::HashMap;

use crate::keys::FieldKey;

/// Identity, address, and link fields extracted from a resume or edited by
/// the operator.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(default, rename_all = "camelCase"))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub linkedin: String,
    pub website: String,
    pub github: String,
}

/// Operator-chosen answers for work authorization and EEO style questions.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(default, rename_all = "camelCase"))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Prefs {
    pub work_auth: String,
    pub need_sponsorship: String,
    pub gender: String,
    pub sex: String,
    pub sexual_orientation: String,
    pub marital_status: String,
    pub hispanic_latino: String,
    pub race_ethnicity: String,
    pub veteran: String,
    pub disability: String,
    pub h1b: String,
}

/// Canonical resolved values for every field key, rebuilt on each fill
/// invocation. Read-only during the fill pass.
#[derive(Clone, Debug, Default)]
pub struct ValueMap {
    values: HashMap<FieldKey, String>,
}

impl ValueMap {
    /// Build the map from a profile and a preferences record.
    ///
    /// Missing name parts are derived: first name falls back to the first
    /// whitespace token of the full name, last name to the remainder, and
    /// the full name to `"first last"`.
    pub fn build(profile: &Profile, prefs: &Prefs) -> Self {
        let full_name = profile.full_name.trim().to_string();
        let mut first_name = profile.first_name.trim().to_string();
        if first_name.is_empty() {
            first_name = full_name
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_string();
        }
        let mut last_name = profile.last_name.trim().to_string();
        if last_name.is_empty() {
            last_name = full_name
                .split_whitespace()
                .skip(1)
                .collect::<Vec<_>>()
                .join(" ");
        }
        let full_name = if full_name.is_empty() {
            format!("{} {}", first_name, last_name).trim().to_string()
        } else {
            full_name
        };

        let mut values = HashMap::new();
        let mut put = |key: FieldKey, value: &str| {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                values.insert(key, trimmed.to_string());
            }
        };

        put(FieldKey::FirstName, &first_name);
        put(FieldKey::LastName, &last_name);
        put(FieldKey::FullName, &full_name);
        put(FieldKey::Email, &profile.email);
        put(FieldKey::Phone, &profile.phone);
        put(FieldKey::Address1, &profile.address1);
        put(FieldKey::Address2, &profile.address2);
        put(FieldKey::City, &profile.city);
        put(FieldKey::State, &profile.state);
        put(FieldKey::Zip, &profile.zip);
        put(FieldKey::Country, &profile.country);
        put(FieldKey::Linkedin, &profile.linkedin);
        put(FieldKey::Website, &profile.website);
        put(FieldKey::Github, &profile.github);

        put(FieldKey::WorkAuth, &prefs.work_auth);
        put(FieldKey::NeedSponsorship, &prefs.need_sponsorship);
        put(FieldKey::Gender, &prefs.gender);
        put(FieldKey::Sex, &prefs.sex);
        put(FieldKey::SexualOrientation, &prefs.sexual_orientation);
        put(FieldKey::MaritalStatus, &prefs.marital_status);
        put(FieldKey::HispanicLatino, &prefs.hispanic_latino);
        put(FieldKey::RaceEthnicity, &prefs.race_ethnicity);
        put(FieldKey::Veteran, &prefs.veteran);
        put(FieldKey::Disability, &prefs.disability);
        put(FieldKey::H1b, &prefs.h1b);

        Self { values }
    }

    /// Resolved value for a key; empty string when there is no answer.
    pub fn get(&self, key: FieldKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_name_parts_from_full_name() {
        let profile = Profile {
            full_name: "Ada Mary Lovelace".into(),
            ..Profile::default()
        };
        let map = ValueMap::build(&profile, &Prefs::default());
        assert_eq!(map.get(FieldKey::FirstName), "Ada");
        assert_eq!(map.get(FieldKey::LastName), "Mary Lovelace");
        assert_eq!(map.get(FieldKey::FullName), "Ada Mary Lovelace");
    }

    #[test]
    fn derives_full_name_from_parts() {
        let profile = Profile {
            first_name: " Grace ".into(),
            last_name: "Hopper".into(),
            ..Profile::default()
        };
        let map = ValueMap::build(&profile, &Prefs::default());
        assert_eq!(map.get(FieldKey::FullName), "Grace Hopper");
    }

    #[test]
    fn explicit_parts_win_over_derivation() {
        let profile = Profile {
            full_name: "A B".into(),
            first_name: "Carol".into(),
            last_name: "Shaw".into(),
            ..Profile::default()
        };
        let map = ValueMap::build(&profile, &Prefs::default());
        assert_eq!(map.get(FieldKey::FirstName), "Carol");
        assert_eq!(map.get(FieldKey::LastName), "Shaw");
        assert_eq!(map.get(FieldKey::FullName), "A B");
    }

    #[test]
    fn missing_values_read_as_empty() {
        let map = ValueMap::build(&Profile::default(), &Prefs::default());
        assert_eq!(map.get(FieldKey::Email), "");
        assert_eq!(map.get(FieldKey::Veteran), "");
    }

    #[test]
    fn prefs_flow_through() {
        let prefs = Prefs {
            sexual_orientation: "Prefer not to say".into(),
            h1b: "No".into(),
            ..Prefs::default()
        };
        let map = ValueMap::build(&Profile::default(), &prefs);
        assert_eq!(map.get(FieldKey::SexualOrientation), "Prefer not to say");
        assert_eq!(map.get(FieldKey::H1b), "No");
    }
}
