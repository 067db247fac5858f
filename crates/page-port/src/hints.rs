//! Hint extraction: the matching surface for classification and rules.

use formpilot_core_types::norm::normalize_key;

use crate::errors::DomError;
use crate::model::NodeId;
use crate::ports::DomPort;

const HINT_ATTRS: [&str; 7] = [
    "name",
    "id",
    "placeholder",
    "autocomplete",
    "aria-label",
    "data-qa",
    "data-testid",
];

/// Build the normalized hint string for an element: associated label text
/// first, then the identifying attributes, each normalized and joined.
pub async fn field_hints(dom: &dyn DomPort, node: NodeId) -> Result<String, DomError> {
    let mut pieces = Vec::new();
    let label = dom.label_text(node).await?;
    if !label.is_empty() {
        pieces.push(normalize_key(&label));
    }
    for attr in HINT_ATTRS {
        if let Some(value) = dom.attr(node, attr).await? {
            if !value.is_empty() {
                pieces.push(normalize_key(&value));
            }
        }
    }
    Ok(normalize_key(&pieces.join(" ")))
}

/// Transient snapshot of one element, derived at scan time and never
/// persisted.
#[derive(Clone, Debug, Default)]
pub struct FieldDescriptor {
    pub tag: String,
    pub input_type: String,
    pub name: String,
    pub id: String,
    pub label: String,
    pub hints: String,
    pub value: String,
    pub visible: bool,
}

impl FieldDescriptor {
    pub async fn scan(dom: &dyn DomPort, node: NodeId) -> Result<Self, DomError> {
        Ok(Self {
            tag: dom.tag_name(node).await?.to_ascii_lowercase(),
            input_type: dom
                .attr(node, "type")
                .await?
                .unwrap_or_default()
                .to_ascii_lowercase(),
            name: dom.attr(node, "name").await?.unwrap_or_default(),
            id: dom.attr(node, "id").await?.unwrap_or_default(),
            label: dom.label_text(node).await?,
            hints: field_hints(dom, node).await?,
            value: dom.value(node).await.unwrap_or_default(),
            visible: dom.is_visible(node).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{ElementSpec, FakePage};

    #[tokio::test]
    async fn hints_combine_label_and_attributes() {
        let page = FakePage::new("https://jobs.example.com/apply");
        let node = page.add(
            ElementSpec::input("text")
                .label("First Name")
                .name("applicant[first_name]")
                .attr("data-testid", "first-name-input"),
        );
        let hints = field_hints(&page, node).await.unwrap();
        assert_eq!(
            hints,
            "first name applicant first name first name input"
        );
    }

    #[tokio::test]
    async fn hints_are_punctuation_insensitive() {
        let page = FakePage::new("https://jobs.example.com/apply");
        let a = page.add(ElementSpec::input("text").label("E-Mail Address!"));
        let b = page.add(ElementSpec::input("text").label("e  mail   address"));
        assert_eq!(
            field_hints(&page, a).await.unwrap(),
            field_hints(&page, b).await.unwrap()
        );
    }

    #[tokio::test]
    async fn descriptor_captures_current_state() {
        let page = FakePage::new("https://jobs.example.com/apply");
        let node = page.add(
            ElementSpec::input("email")
                .id("email")
                .label("Email")
                .with_value("me@example.com"),
        );
        let desc = FieldDescriptor::scan(&page, node).await.unwrap();
        assert_eq!(desc.tag, "input");
        assert_eq!(desc.input_type, "email");
        assert_eq!(desc.value, "me@example.com");
        assert!(desc.visible);
        assert!(desc.hints.contains("email"));
    }
}
