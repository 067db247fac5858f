#[derive(Clone, Debug, PartialEq)]
pub struct MapperPolicyView {
    /// Outline color for the picked field.
    pub highlight_color: String,
    pub banner_text: String,
}

impl Default for MapperPolicyView {
    fn default() -> Self {
        Self {
            highlight_color: "#60a5fa".to_string(),
            banner_text: "Click the field to capture. Press Esc to cancel.".to_string(),
        }
    }
}
