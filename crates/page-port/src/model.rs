use std::fmt;

use crate::errors::DomError;
use crate::ports::DomPort;

/// Opaque handle to an element on the current page. Valid only for the
/// lifetime of the page; never persisted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Synthetic notifications dispatched so reactive page code observes fills.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DomEvent {
    Input,
    Change,
    MouseOver,
    MouseDown,
    MouseUp,
    Click,
    Focus,
}

/// One `<option>` of a select control.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionItem {
    pub value: String,
    pub text: String,
}

/// Capability of a fillable target, decided by tag and attributes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TargetKind {
    Input { input_type: String },
    Textarea,
    Select,
    Editable,
}

impl TargetKind {
    pub fn tag(&self) -> &'static str {
        match self {
            TargetKind::Input { .. } => "input",
            TargetKind::Textarea => "textarea",
            TargetKind::Select => "select",
            TargetKind::Editable => "div",
        }
    }
}

/// Decide whether an element is a fillable target, and of which kind.
///
/// Hidden and file inputs are never fillable; disabled elements and
/// read-only text controls are excluded. `Ok(None)` is the normal answer
/// for everything else on the page.
pub async fn classify_target(
    dom: &dyn DomPort,
    node: NodeId,
) -> Result<Option<TargetKind>, DomError> {
    let tag = dom.tag_name(node).await?.to_ascii_lowercase();
    match tag.as_str() {
        "input" => {
            let input_type = dom
                .attr(node, "type")
                .await?
                .unwrap_or_default()
                .to_ascii_lowercase();
            if input_type == "hidden" || input_type == "file" {
                return Ok(None);
            }
            if dom.is_disabled(node).await? || dom.is_readonly(node).await? {
                return Ok(None);
            }
            Ok(Some(TargetKind::Input { input_type }))
        }
        "textarea" => {
            if dom.is_disabled(node).await? || dom.is_readonly(node).await? {
                return Ok(None);
            }
            Ok(Some(TargetKind::Textarea))
        }
        "select" => {
            if dom.is_disabled(node).await? {
                return Ok(None);
            }
            Ok(Some(TargetKind::Select))
        }
        _ => {
            let editable = dom
                .attr(node, "contenteditable")
                .await?
                .map(|v| v == "true")
                .unwrap_or(false);
            Ok(if editable {
                Some(TargetKind::Editable)
            } else {
                None
            })
        }
    }
}
