//! Heuristic field classification.
//!
//! Maps an element's hint string and `autocomplete` attribute to one
//! canonical [`FieldKey`], or no opinion. Fixed-priority, first-match-wins:
//! the literal order of the checks below is the contract. Overlapping
//! keywords ("sex" vs "sexual orientation", generic "name" vs "first name")
//! are disambiguated purely by this order — do not reorder.

use formpilot_core_types::norm::normalize_key;
use formpilot_core_types::FieldKey;
use tracing::trace;

/// Exact `autocomplete` token table, checked before any keyword heuristics.
/// Tokens are compared whole, so `given-name` never collides with the bare
/// `name` entry.
const AUTOCOMPLETE_TOKENS: [(&str, FieldKey); 12] = [
    ("given-name", FieldKey::FirstName),
    ("family-name", FieldKey::LastName),
    ("email", FieldKey::Email),
    ("tel", FieldKey::Phone),
    ("street-address", FieldKey::Address1),
    ("address-line1", FieldKey::Address1),
    ("address-line2", FieldKey::Address2),
    ("address-level2", FieldKey::City),
    ("address-level1", FieldKey::State),
    ("postal-code", FieldKey::Zip),
    ("country", FieldKey::Country),
    ("name", FieldKey::FullName),
];

/// Classify a field from its normalized hint string and raw `autocomplete`
/// attribute. `None` is the normal "no opinion" outcome, not an error.
pub fn classify(hints: &str, autocomplete: &str) -> Option<FieldKey> {
    if let Some(key) = classify_autocomplete(autocomplete) {
        trace!(%key, "classified by autocomplete token");
        return Some(key);
    }

    let h = normalize_key(hints);
    let has = |needle: &str| h.contains(needle);

    // Identity.
    if has("first name") || has("given name") {
        return Some(FieldKey::FirstName);
    }
    if has("last name") || has("family name") || has("surname") {
        return Some(FieldKey::LastName);
    }
    if has("full name") || (has("name") && !has("company") && !has("school")) {
        return Some(FieldKey::FullName);
    }
    if has("email") {
        return Some(FieldKey::Email);
    }
    if has("phone") || has("mobile") || has("cell") || has("telephone") {
        return Some(FieldKey::Phone);
    }

    // Address.
    if has("address line 1") || has("street address") || has("street") {
        return Some(FieldKey::Address1);
    }
    if has("address line 2") || has("apt") || has("suite") || has("unit") {
        return Some(FieldKey::Address2);
    }
    if has("city") || has("town") {
        return Some(FieldKey::City);
    }
    if has("state") || has("province") || has("region") {
        return Some(FieldKey::State);
    }
    if has("zip") || has("postal") {
        return Some(FieldKey::Zip);
    }
    if has("country") {
        return Some(FieldKey::Country);
    }

    // Links.
    if has("linkedin") {
        return Some(FieldKey::Linkedin);
    }
    if has("portfolio") || (has("website") && !has("school")) {
        return Some(FieldKey::Website);
    }
    if has("github") {
        return Some(FieldKey::Github);
    }

    // Work authorization / visa / sponsorship.
    if has("authorized") && (has("work") || has("employment")) {
        return Some(FieldKey::WorkAuth);
    }
    if has("sponsor") || has("sponsorship") || has("visa") {
        return Some(FieldKey::NeedSponsorship);
    }
    // "h-1b" and "h 1b" normalize to the same key form.
    if has("h1b") || has("h 1b") {
        return Some(FieldKey::H1b);
    }

    // EEO. Sexual orientation must be tested before bare "sex".
    if has("gender") {
        return Some(FieldKey::Gender);
    }
    if has("sexual orientation") || (has("orientation") && has("sexual")) {
        return Some(FieldKey::SexualOrientation);
    }
    if has("sex") && !has("sexual orientation") {
        return Some(FieldKey::Sex);
    }
    if has("marital") || has("married") {
        return Some(FieldKey::MaritalStatus);
    }
    // Hispanic/Latino is usually its own yes/no question; the interrogative
    // phrasing keeps it out of the broader race/ethnicity bucket.
    if (has("hispanic") || has("latino") || has("latina") || has("latinx"))
        && (has("are you") || has("do you") || has("identify"))
    {
        return Some(FieldKey::HispanicLatino);
    }
    if has("veteran") {
        return Some(FieldKey::Veteran);
    }
    if has("disability") {
        return Some(FieldKey::Disability);
    }
    if has("race") || has("ethnicity") || has("hispanic") || has("latino") {
        return Some(FieldKey::RaceEthnicity);
    }

    None
}

fn classify_autocomplete(autocomplete: &str) -> Option<FieldKey> {
    let lowered = autocomplete.to_ascii_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }
    AUTOCOMPLETE_TOKENS
        .iter()
        .find(|(token, _)| tokens.contains(token))
        .map(|&(_, key)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autocomplete_tokens_map_exactly() {
        assert_eq!(classify("", "given-name"), Some(FieldKey::FirstName));
        assert_eq!(classify("", "family-name"), Some(FieldKey::LastName));
        assert_eq!(classify("", "email"), Some(FieldKey::Email));
        assert_eq!(classify("", "tel"), Some(FieldKey::Phone));
        assert_eq!(classify("", "address-line2"), Some(FieldKey::Address2));
        assert_eq!(classify("", "address-level1"), Some(FieldKey::State));
        assert_eq!(classify("", "address-level2"), Some(FieldKey::City));
        assert_eq!(classify("", "postal-code"), Some(FieldKey::Zip));
        assert_eq!(classify("", "name"), Some(FieldKey::FullName));
    }

    #[test]
    fn autocomplete_section_prefixes_are_ignored() {
        assert_eq!(
            classify("", "section-shipping given-name"),
            Some(FieldKey::FirstName)
        );
    }

    #[test]
    fn given_name_token_never_reads_as_bare_name() {
        // Whole-token comparison: "given-name" must not fall through to the
        // generic "name" entry.
        assert_ne!(classify("", "given-name"), Some(FieldKey::FullName));
    }

    #[test]
    fn autocomplete_wins_over_hints() {
        assert_eq!(classify("company name", "email"), Some(FieldKey::Email));
    }

    #[test]
    fn sexual_orientation_beats_sex() {
        let hints = "please select your sexual orientation sex";
        assert_eq!(classify(hints, ""), Some(FieldKey::SexualOrientation));
        assert_eq!(classify("sex at birth", ""), Some(FieldKey::Sex));
    }

    #[test]
    fn company_and_school_names_are_not_full_name() {
        assert_eq!(classify("company name", ""), None);
        assert_eq!(classify("school name", ""), None);
        assert_eq!(classify("your name", ""), Some(FieldKey::FullName));
    }

    #[test]
    fn specific_name_checks_precede_generic_name() {
        assert_eq!(classify("first name", ""), Some(FieldKey::FirstName));
        assert_eq!(classify("surname", ""), Some(FieldKey::LastName));
        assert_eq!(classify("full name", ""), Some(FieldKey::FullName));
    }

    #[test]
    fn classification_is_case_and_punctuation_insensitive() {
        assert_eq!(
            classify("Sexual-Orientation!", ""),
            classify("sexual orientation", "")
        );
        assert_eq!(classify("  LinkedIn   URL ", ""), Some(FieldKey::Linkedin));
    }

    #[test]
    fn work_authorization_family() {
        assert_eq!(
            classify("are you authorized to work in the us", ""),
            Some(FieldKey::WorkAuth)
        );
        assert_eq!(
            classify("will you require visa sponsorship", ""),
            Some(FieldKey::NeedSponsorship)
        );
        assert_eq!(classify("h-1b status", ""), Some(FieldKey::H1b));
        assert_eq!(classify("h1b transfer", ""), Some(FieldKey::H1b));
    }

    #[test]
    fn hispanic_latino_requires_interrogative_phrasing() {
        assert_eq!(
            classify("are you hispanic or latino", ""),
            Some(FieldKey::HispanicLatino)
        );
        assert_eq!(
            classify("do you identify as latinx", ""),
            Some(FieldKey::HispanicLatino)
        );
        // Without the phrasing it falls through to the race bucket.
        assert_eq!(
            classify("hispanic or latino", ""),
            Some(FieldKey::RaceEthnicity)
        );
    }

    #[test]
    fn race_ethnicity_is_the_residual_bucket() {
        assert_eq!(classify("race", ""), Some(FieldKey::RaceEthnicity));
        assert_eq!(
            classify("race or ethnic background", ""),
            Some(FieldKey::RaceEthnicity)
        );
        // The address ladder runs first, and "ethnicity" contains "city".
        assert_eq!(classify("ethnicity", ""), Some(FieldKey::City));
    }

    #[test]
    fn address_checks_in_order() {
        assert_eq!(classify("address line 1", ""), Some(FieldKey::Address1));
        assert_eq!(classify("street address", ""), Some(FieldKey::Address1));
        assert_eq!(classify("apt or suite", ""), Some(FieldKey::Address2));
        assert_eq!(classify("city town", ""), Some(FieldKey::City));
        assert_eq!(classify("province", ""), Some(FieldKey::State));
        assert_eq!(classify("postal code", ""), Some(FieldKey::Zip));
        assert_eq!(classify("country of residence", ""), Some(FieldKey::Country));
    }

    #[test]
    fn website_excludes_school_sites() {
        assert_eq!(classify("portfolio website", ""), Some(FieldKey::Website));
        assert_eq!(classify("school website", ""), None);
    }

    #[test]
    fn no_opinion_for_unknown_fields() {
        assert_eq!(classify("favorite color", ""), None);
        assert_eq!(classify("", ""), None);
    }
}
