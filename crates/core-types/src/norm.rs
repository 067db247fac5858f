//! Text normalization for hint matching.
//!
//! Every matching surface in the engine (classification, rule matching,
//! option scoring, placeholder detection) runs on [`normalize_key`] output,
//! which makes matching insensitive to case, punctuation, and whitespace
//! variance across sites.

/// Lowercase, collapse whitespace runs to a single space, trim.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`normalize`], then every run of non-alphanumeric characters becomes a
/// single space. ASCII-alphanumeric only, so `"H-1B!"` and `"h 1b"` compare
/// equal.
pub fn normalize_key(text: &str) -> String {
    normalize(text)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  First \t Name\n"), "first name");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_key_strips_punctuation() {
        assert_eq!(normalize_key("Sexual-Orientation!"), "sexual orientation");
        assert_eq!(normalize_key("sexual orientation"), "sexual orientation");
        assert_eq!(normalize_key("E-mail (work)"), "e mail work");
    }

    #[test]
    fn normalize_key_keeps_digits() {
        assert_eq!(normalize_key("Address Line 1"), "address line 1");
        assert_eq!(normalize_key("H-1B"), "h 1b");
    }

    #[test]
    fn empty_and_symbol_only_input_yields_empty() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key("!!! --- ???"), "");
    }
}
