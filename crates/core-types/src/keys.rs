//! Canonical field keys.
//!
//! The fixed vocabulary of semantic profile attributes the engine can resolve
//! a page field to. Serialized as camelCase strings, matching the persisted
//! store and the transport payloads.

use std::fmt;
use std::str::FromStr;

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FieldKey {
    FullName,
    FirstName,
    LastName,
    Email,
    Phone,
    Address1,
    Address2,
    City,
    State,
    Zip,
    Country,
    Linkedin,
    Website,
    Github,
    WorkAuth,
    NeedSponsorship,
    Gender,
    Sex,
    SexualOrientation,
    MaritalStatus,
    HispanicLatino,
    RaceEthnicity,
    Veteran,
    Disability,
    H1b,
}

impl FieldKey {
    pub const ALL: [FieldKey; 25] = [
        FieldKey::FullName,
        FieldKey::FirstName,
        FieldKey::LastName,
        FieldKey::Email,
        FieldKey::Phone,
        FieldKey::Address1,
        FieldKey::Address2,
        FieldKey::City,
        FieldKey::State,
        FieldKey::Zip,
        FieldKey::Country,
        FieldKey::Linkedin,
        FieldKey::Website,
        FieldKey::Github,
        FieldKey::WorkAuth,
        FieldKey::NeedSponsorship,
        FieldKey::Gender,
        FieldKey::Sex,
        FieldKey::SexualOrientation,
        FieldKey::MaritalStatus,
        FieldKey::HispanicLatino,
        FieldKey::RaceEthnicity,
        FieldKey::Veteran,
        FieldKey::Disability,
        FieldKey::H1b,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::FullName => "fullName",
            FieldKey::FirstName => "firstName",
            FieldKey::LastName => "lastName",
            FieldKey::Email => "email",
            FieldKey::Phone => "phone",
            FieldKey::Address1 => "address1",
            FieldKey::Address2 => "address2",
            FieldKey::City => "city",
            FieldKey::State => "state",
            FieldKey::Zip => "zip",
            FieldKey::Country => "country",
            FieldKey::Linkedin => "linkedin",
            FieldKey::Website => "website",
            FieldKey::Github => "github",
            FieldKey::WorkAuth => "workAuth",
            FieldKey::NeedSponsorship => "needSponsorship",
            FieldKey::Gender => "gender",
            FieldKey::Sex => "sex",
            FieldKey::SexualOrientation => "sexualOrientation",
            FieldKey::MaritalStatus => "maritalStatus",
            FieldKey::HispanicLatino => "hispanicLatino",
            FieldKey::RaceEthnicity => "raceEthnicity",
            FieldKey::Veteran => "veteran",
            FieldKey::Disability => "disability",
            FieldKey::H1b => "h1b",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = UnknownFieldKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownFieldKey(s.to_string()))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown field key: {0}")]
pub struct UnknownFieldKey(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_key() {
        for key in FieldKey::ALL {
            assert_eq!(key.as_str().parse::<FieldKey>().unwrap(), key);
        }
    }

    #[test]
    fn rejects_unknown_key() {
        assert!("companyName".parse::<FieldKey>().is_err());
    }

    #[cfg(feature = "serde-full")]
    #[test]
    fn serializes_as_camel_case() {
        let json = serde_json::to_string(&FieldKey::SexualOrientation).unwrap();
        assert_eq!(json, "\"sexualOrientation\"");
        let back: FieldKey = serde_json::from_str("\"needSponsorship\"").unwrap();
        assert_eq!(back, FieldKey::NeedSponsorship);
    }
}
