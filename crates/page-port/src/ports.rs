use async_trait::async_trait;

use crate::errors::DomError;
use crate::model::{DomEvent, NodeId, OptionItem};

/// Read/write access to the current page's DOM.
///
/// Enumeration methods pre-filter the way the engine's scan pass expects:
/// hidden inputs, disabled controls, and read-only text controls are already
/// excluded. Visibility is *not* pre-filtered; the fill rules check it per
/// element so skips can be reported.
#[async_trait]
pub trait DomPort: Send + Sync {
    /// URL of the hosting document; used to derive the hostname scope.
    async fn document_url(&self) -> String;

    /// Resolve a selector to matching elements in document order.
    /// Syntactically invalid selectors are an `Err`, not an empty match.
    async fn query(&self, selector: &str) -> Result<Vec<NodeId>, DomError>;

    async fn tag_name(&self, node: NodeId) -> Result<String, DomError>;
    async fn attr(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError>;

    /// True when the element's box is larger than 2x2 px and it is not
    /// `display:none`/`visibility:hidden`.
    async fn is_visible(&self, node: NodeId) -> Result<bool, DomError>;
    async fn is_disabled(&self, node: NodeId) -> Result<bool, DomError>;
    async fn is_readonly(&self, node: NodeId) -> Result<bool, DomError>;

    async fn value(&self, node: NodeId) -> Result<String, DomError>;
    /// Checked state of a radio or checkbox input.
    async fn is_checked(&self, node: NodeId) -> Result<bool, DomError>;
    async fn set_value(&self, node: NodeId, value: &str) -> Result<(), DomError>;
    async fn text_content(&self, node: NodeId) -> Result<String, DomError>;
    async fn set_text_content(&self, node: NodeId, text: &str) -> Result<(), DomError>;

    /// Associated label text, resolved in order: `label[for=id]`, enclosing
    /// `<label>`, `aria-label`, `aria-labelledby`, `placeholder`, else empty.
    async fn label_text(&self, node: NodeId) -> Result<String, DomError>;

    async fn options(&self, node: NodeId) -> Result<Vec<OptionItem>, DomError>;
    async fn selected_index(&self, node: NodeId) -> Result<Option<usize>, DomError>;
    async fn set_selected_index(&self, node: NodeId, index: usize) -> Result<(), DomError>;

    async fn dispatch(&self, node: NodeId, event: DomEvent) -> Result<(), DomError>;
    async fn click(&self, node: NodeId) -> Result<(), DomError>;
    async fn focus(&self, node: NodeId) -> Result<(), DomError>;

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError>;
    async fn children(&self, node: NodeId) -> Result<Vec<NodeId>, DomError>;

    /// All `<input>` elements except hidden/disabled/readonly ones.
    async fn fillable_inputs(&self) -> Result<Vec<NodeId>, DomError>;
    /// All enabled, non-readonly `<textarea>` elements.
    async fn textareas(&self) -> Result<Vec<NodeId>, DomError>;
    /// All enabled `<select>` elements.
    async fn selects(&self) -> Result<Vec<NodeId>, DomError>;
    /// All enabled radio inputs; grouping by `name` is the caller's job.
    async fn radios(&self) -> Result<Vec<NodeId>, DomError>;
}

/// Transient page decoration. Best-effort side effects; failures are
/// swallowed by the host adapter.
#[async_trait]
pub trait OverlayPort: Send + Sync {
    /// Draw a 2px outline on each node, remembering prior styles.
    async fn highlight(&self, nodes: &[NodeId], color: &str);
    /// Restore the prior styles of previously highlighted nodes.
    async fn clear_highlight(&self, nodes: &[NodeId]);
    async fn show_banner(&self, text: &str);
    async fn remove_banner(&self);
}
