//! In-memory page implementing both ports for tests.
//!
//! The selector engine covers exactly the grammar the engine emits and
//! replays: `#id`, `tag`, `tag[attr="value"]`, `tag:nth-of-type(n)`, and
//! child-combinator chains of those.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::DomError;
use crate::model::{DomEvent, NodeId, OptionItem};
use crate::ports::{DomPort, OverlayPort};

#[derive(Clone, Debug, Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    value: String,
    text: String,
    options: Vec<OptionItem>,
    selected: Option<usize>,
    checked: bool,
    visible: bool,
    label: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
    events: Vec<DomEvent>,
}

#[derive(Debug, Default)]
struct Inner {
    url: String,
    nodes: Vec<Node>,
    banner: Option<String>,
    highlights: BTreeMap<u64, String>,
}

/// Builder for one fake element.
#[derive(Clone, Debug)]
pub struct ElementSpec {
    node: Node,
}

impl ElementSpec {
    pub fn element(tag: &str) -> Self {
        Self {
            node: Node {
                tag: tag.to_string(),
                visible: true,
                ..Node::default()
            },
        }
    }

    pub fn input(input_type: &str) -> Self {
        Self::element("input").attr("type", input_type)
    }

    pub fn textarea() -> Self {
        Self::element("textarea")
    }

    /// A select whose option values equal their texts; the first option is
    /// selected, as a browser would.
    pub fn select(options: &[&str]) -> Self {
        let pairs: Vec<(&str, &str)> = options.iter().map(|&o| (o, o)).collect();
        Self::select_with_values(&pairs)
    }

    pub fn select_with_values(options: &[(&str, &str)]) -> Self {
        let mut spec = Self::element("select");
        spec.node.options = options
            .iter()
            .map(|(value, text)| OptionItem {
                value: value.to_string(),
                text: text.to_string(),
            })
            .collect();
        spec.node.selected = if spec.node.options.is_empty() {
            None
        } else {
            Some(0)
        };
        spec
    }

    pub fn radio(name: &str) -> Self {
        Self::input("radio").name(name)
    }

    pub fn editable() -> Self {
        Self::element("div").attr("contenteditable", "true")
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.node.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn name(self, name: &str) -> Self {
        self.attr("name", name)
    }

    pub fn placeholder(self, text: &str) -> Self {
        self.attr("placeholder", text)
    }

    pub fn autocomplete(self, token: &str) -> Self {
        self.attr("autocomplete", token)
    }

    pub fn aria_label(self, text: &str) -> Self {
        self.attr("aria-label", text)
    }

    /// Text of the associated `<label>` (either `label[for]` or enclosing).
    pub fn label(mut self, text: &str) -> Self {
        self.node.label = Some(text.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.node.value = value.to_string();
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.node.text = text.to_string();
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.node.selected = Some(index);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.node.visible = false;
        self
    }

    pub fn disabled(self) -> Self {
        self.attr("disabled", "")
    }

    pub fn readonly(self) -> Self {
        self.attr("readonly", "")
    }

    pub fn checked(mut self) -> Self {
        self.node.checked = true;
        self
    }

    pub fn child_of(mut self, parent: NodeId) -> Self {
        self.node.parent = Some(parent.0 as usize);
        self
    }
}

/// In-memory DOM double. Document order is insertion order.
#[derive(Debug, Default)]
pub struct FakePage {
    inner: Mutex<Inner>,
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        Self {
            inner: Mutex::new(Inner {
                url: url.to_string(),
                ..Inner::default()
            }),
        }
    }

    pub fn add(&self, spec: ElementSpec) -> NodeId {
        let mut inner = self.inner.lock();
        let idx = inner.nodes.len();
        let parent = spec.node.parent;
        inner.nodes.push(spec.node);
        if let Some(p) = parent {
            inner.nodes[p].children.push(idx);
        }
        NodeId(idx as u64)
    }

    fn with_node<T>(&self, node: NodeId, f: impl FnOnce(&Node) -> T) -> Result<T, DomError> {
        let inner = self.inner.lock();
        inner
            .nodes
            .get(node.0 as usize)
            .map(f)
            .ok_or(DomError::NodeGone(node))
    }

    fn with_node_mut<T>(
        &self,
        node: NodeId,
        f: impl FnOnce(&mut Node) -> T,
    ) -> Result<T, DomError> {
        let mut inner = self.inner.lock();
        inner
            .nodes
            .get_mut(node.0 as usize)
            .map(f)
            .ok_or(DomError::NodeGone(node))
    }

    fn collect_tagged(&self, f: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        let inner = self.inner.lock();
        inner
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| f(n))
            .map(|(i, _)| NodeId(i as u64))
            .collect()
    }

    // Test-side accessors.

    pub fn events(&self, node: NodeId) -> Vec<DomEvent> {
        self.with_node(node, |n| n.events.clone()).unwrap_or_default()
    }

    pub fn value_of(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.value.clone()).unwrap_or_default()
    }

    pub fn text_of(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.text.clone()).unwrap_or_default()
    }

    pub fn selected_of(&self, node: NodeId) -> Option<usize> {
        self.with_node(node, |n| n.selected).unwrap_or(None)
    }

    pub fn highlighted(&self) -> Vec<NodeId> {
        self.inner
            .lock()
            .highlights
            .keys()
            .map(|&i| NodeId(i))
            .collect()
    }

    pub fn highlight_color(&self, node: NodeId) -> Option<String> {
        self.inner.lock().highlights.get(&node.0).cloned()
    }

    pub fn banner(&self) -> Option<String> {
        self.inner.lock().banner.clone()
    }
}

#[async_trait]
impl DomPort for FakePage {
    async fn document_url(&self) -> String {
        self.inner.lock().url.clone()
    }

    async fn query(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let parts = parse_selector(selector)?;
        let inner = self.inner.lock();
        let mut matches = Vec::new();
        for idx in 0..inner.nodes.len() {
            if chain_matches(&inner, idx, &parts) {
                matches.push(NodeId(idx as u64));
            }
        }
        Ok(matches)
    }

    async fn tag_name(&self, node: NodeId) -> Result<String, DomError> {
        self.with_node(node, |n| n.tag.clone())
    }

    async fn attr(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        self.with_node(node, |n| n.attrs.get(name).cloned())
    }

    async fn is_visible(&self, node: NodeId) -> Result<bool, DomError> {
        self.with_node(node, |n| n.visible)
    }

    async fn is_disabled(&self, node: NodeId) -> Result<bool, DomError> {
        self.with_node(node, |n| n.attrs.contains_key("disabled"))
    }

    async fn is_readonly(&self, node: NodeId) -> Result<bool, DomError> {
        self.with_node(node, |n| n.attrs.contains_key("readonly"))
    }

    async fn value(&self, node: NodeId) -> Result<String, DomError> {
        self.with_node(node, |n| {
            if n.tag == "select" {
                n.selected
                    .and_then(|i| n.options.get(i))
                    .map(|o| o.value.clone())
                    .unwrap_or_default()
            } else {
                n.value.clone()
            }
        })
    }

    async fn is_checked(&self, node: NodeId) -> Result<bool, DomError> {
        self.with_node(node, |n| n.checked)
    }

    async fn set_value(&self, node: NodeId, value: &str) -> Result<(), DomError> {
        self.with_node_mut(node, |n| n.value = value.to_string())
    }

    async fn text_content(&self, node: NodeId) -> Result<String, DomError> {
        self.with_node(node, |n| n.text.clone())
    }

    async fn set_text_content(&self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.with_node_mut(node, |n| n.text = text.to_string())
    }

    async fn label_text(&self, node: NodeId) -> Result<String, DomError> {
        let inner = self.inner.lock();
        let n = inner
            .nodes
            .get(node.0 as usize)
            .ok_or(DomError::NodeGone(node))?;
        if let Some(label) = &n.label {
            return Ok(label.clone());
        }
        if let Some(aria) = n.attrs.get("aria-label") {
            return Ok(aria.clone());
        }
        if let Some(ids) = n.attrs.get("aria-labelledby") {
            let parts: Vec<String> = ids
                .split_whitespace()
                .filter_map(|id| {
                    inner
                        .nodes
                        .iter()
                        .find(|c| c.attrs.get("id").map(String::as_str) == Some(id))
                        .map(|c| c.text.clone())
                })
                .filter(|t| !t.is_empty())
                .collect();
            if !parts.is_empty() {
                return Ok(parts.join(" "));
            }
        }
        Ok(n.attrs.get("placeholder").cloned().unwrap_or_default())
    }

    async fn options(&self, node: NodeId) -> Result<Vec<OptionItem>, DomError> {
        self.with_node(node, |n| n.options.clone())
    }

    async fn selected_index(&self, node: NodeId) -> Result<Option<usize>, DomError> {
        self.with_node(node, |n| n.selected)
    }

    async fn set_selected_index(&self, node: NodeId, index: usize) -> Result<(), DomError> {
        self.with_node_mut(node, |n| n.selected = Some(index))
    }

    async fn dispatch(&self, node: NodeId, event: DomEvent) -> Result<(), DomError> {
        self.with_node_mut(node, |n| n.events.push(event))
    }

    async fn click(&self, node: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        let idx = node.0 as usize;
        let (tag, input_type, name) = {
            let n = inner.nodes.get(idx).ok_or(DomError::NodeGone(node))?;
            (
                n.tag.clone(),
                n.attrs.get("type").cloned().unwrap_or_default(),
                n.attrs.get("name").cloned(),
            )
        };
        if tag == "input" && input_type == "radio" {
            if let Some(name) = name {
                for other in inner.nodes.iter_mut() {
                    if other.tag == "input"
                        && other.attrs.get("type").map(String::as_str) == Some("radio")
                        && other.attrs.get("name") == Some(&name)
                    {
                        other.checked = false;
                    }
                }
            }
            inner.nodes[idx].checked = true;
        }
        inner.nodes[idx].events.push(DomEvent::Click);
        Ok(())
    }

    async fn focus(&self, node: NodeId) -> Result<(), DomError> {
        self.with_node_mut(node, |n| n.events.push(DomEvent::Focus))
    }

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError> {
        self.with_node(node, |n| n.parent.map(|p| NodeId(p as u64)))
    }

    async fn children(&self, node: NodeId) -> Result<Vec<NodeId>, DomError> {
        self.with_node(node, |n| {
            n.children.iter().map(|&c| NodeId(c as u64)).collect()
        })
    }

    async fn fillable_inputs(&self) -> Result<Vec<NodeId>, DomError> {
        Ok(self.collect_tagged(|n| {
            n.tag == "input"
                && n.attrs.get("type").map(String::as_str) != Some("hidden")
                && !n.attrs.contains_key("disabled")
                && !n.attrs.contains_key("readonly")
        }))
    }

    async fn textareas(&self) -> Result<Vec<NodeId>, DomError> {
        Ok(self.collect_tagged(|n| {
            n.tag == "textarea"
                && !n.attrs.contains_key("disabled")
                && !n.attrs.contains_key("readonly")
        }))
    }

    async fn selects(&self) -> Result<Vec<NodeId>, DomError> {
        Ok(self.collect_tagged(|n| n.tag == "select" && !n.attrs.contains_key("disabled")))
    }

    async fn radios(&self) -> Result<Vec<NodeId>, DomError> {
        Ok(self.collect_tagged(|n| {
            n.tag == "input"
                && n.attrs.get("type").map(String::as_str) == Some("radio")
                && !n.attrs.contains_key("disabled")
        }))
    }
}

#[async_trait]
impl OverlayPort for FakePage {
    async fn highlight(&self, nodes: &[NodeId], color: &str) {
        let mut inner = self.inner.lock();
        for node in nodes {
            inner.highlights.insert(node.0, color.to_string());
        }
    }

    async fn clear_highlight(&self, nodes: &[NodeId]) {
        let mut inner = self.inner.lock();
        for node in nodes {
            inner.highlights.remove(&node.0);
        }
    }

    async fn show_banner(&self, text: &str) {
        self.inner.lock().banner = Some(text.to_string());
    }

    async fn remove_banner(&self) {
        self.inner.lock().banner = None;
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Part {
    Id(String),
    Simple {
        tag: String,
        attr: Option<(String, String)>,
        nth_of_type: Option<usize>,
    },
}

fn parse_selector(selector: &str) -> Result<Vec<Part>, DomError> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err(DomError::InvalidSelector(selector.to_string()));
    }
    trimmed
        .split(" > ")
        .map(|part| parse_part(part.trim(), selector))
        .collect()
}

fn parse_part(part: &str, whole: &str) -> Result<Part, DomError> {
    let invalid = || DomError::InvalidSelector(whole.to_string());
    if let Some(raw) = part.strip_prefix('#') {
        let id = unescape(raw);
        if id.is_empty() {
            return Err(invalid());
        }
        return Ok(Part::Id(id));
    }

    let mut rest = part;
    let tag_end = rest
        .find(|c| c == '[' || c == ':')
        .unwrap_or(rest.len());
    let tag = rest[..tag_end].to_string();
    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    rest = &rest[tag_end..];

    let mut attr = None;
    if let Some(open) = rest.strip_prefix('[') {
        let close = open.rfind(']').ok_or_else(invalid)?;
        let body = &open[..close];
        let eq = body.find("=\"").ok_or_else(invalid)?;
        if !body.ends_with('"') {
            return Err(invalid());
        }
        let name = body[..eq].to_string();
        let value = unescape(&body[eq + 2..body.len() - 1]);
        attr = Some((name, value));
        rest = &open[close + 1..];
    }

    let mut nth_of_type = None;
    if let Some(open) = rest.strip_prefix(":nth-of-type(") {
        let close = open.find(')').ok_or_else(invalid)?;
        nth_of_type = Some(open[..close].parse::<usize>().map_err(|_| invalid())?);
        rest = &open[close + 1..];
    }

    if !rest.is_empty() {
        return Err(invalid());
    }
    Ok(Part::Simple {
        tag,
        attr,
        nth_of_type,
    })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn part_matches(inner: &Inner, idx: usize, part: &Part) -> bool {
    let node = &inner.nodes[idx];
    match part {
        Part::Id(id) => node.attrs.get("id") == Some(id),
        Part::Simple {
            tag,
            attr,
            nth_of_type,
        } => {
            if &node.tag != tag {
                return false;
            }
            if let Some((name, value)) = attr {
                if node.attrs.get(name) != Some(value) {
                    return false;
                }
            }
            if let Some(nth) = nth_of_type {
                let position = match node.parent {
                    Some(parent) => inner.nodes[parent]
                        .children
                        .iter()
                        .filter(|&&c| inner.nodes[c].tag == node.tag)
                        .position(|&c| c == idx),
                    // Root-level nodes count as their own sibling group.
                    None => inner
                        .nodes
                        .iter()
                        .enumerate()
                        .filter(|(_, n)| n.parent.is_none() && n.tag == node.tag)
                        .position(|(i, _)| i == idx),
                };
                if position.map(|p| p + 1) != Some(*nth) {
                    return false;
                }
            }
            true
        }
    }
}

fn chain_matches(inner: &Inner, idx: usize, parts: &[Part]) -> bool {
    let (last, ancestors) = match parts.split_last() {
        Some(split) => split,
        None => return false,
    };
    if !part_matches(inner, idx, last) {
        return false;
    }
    let mut current = inner.nodes[idx].parent;
    for part in ancestors.iter().rev() {
        match current {
            Some(parent_idx) if part_matches(inner, parent_idx, part) => {
                current = inner.nodes[parent_idx].parent;
            }
            _ => return false,
        }
    }
    true
}
