//! Selector synthesis.
//!
//! Derives a selector string that should re-identify the same semantic
//! field when a mapping is replayed later on the same hostname. Strategy
//! order: element id, unique `tag[name]`, unique `tag[aria-label]`, then a
//! structural ancestor path of at most six levels. The structural path is
//! advisory — it is not re-verified for uniqueness at capture time, so a
//! page restructure between capture and replay can shift what it resolves
//! to.

use page_port::{DomError, DomPort, NodeId};
use tracing::debug;

const MAX_PATH_DEPTH: usize = 6;

/// Synthesize a replay selector for `node`.
pub async fn synthesize(dom: &dyn DomPort, node: NodeId) -> Result<String, DomError> {
    if let Some(id) = non_empty_attr(dom, node, "id").await? {
        return Ok(format!("#{}", escape_ident(&id)));
    }

    let tag = dom.tag_name(node).await?.to_ascii_lowercase();

    if let Some(name) = non_empty_attr(dom, node, "name").await? {
        let selector = format!("{}[name=\"{}\"]", tag, escape_attr_value(&name));
        if resolves_uniquely(dom, &selector, node).await {
            return Ok(selector);
        }
    }

    if let Some(aria) = non_empty_attr(dom, node, "aria-label").await? {
        let selector = format!("{}[aria-label=\"{}\"]", tag, escape_attr_value(&aria));
        if resolves_uniquely(dom, &selector, node).await {
            return Ok(selector);
        }
    }

    structural_path(dom, node).await
}

/// Walk the ancestor chain, anchoring at the first id found and
/// disambiguating same-tag siblings with `:nth-of-type`.
async fn structural_path(dom: &dyn DomPort, node: NodeId) -> Result<String, DomError> {
    let mut parts: Vec<String> = Vec::new();
    let mut current = node;

    while parts.len() < MAX_PATH_DEPTH {
        let tag = dom.tag_name(current).await?.to_ascii_lowercase();

        if let Some(id) = non_empty_attr(dom, current, "id").await? {
            parts.push(format!("#{}", escape_ident(&id)));
            break;
        }

        let parent = match dom.parent(current).await? {
            Some(parent) => parent,
            None => {
                parts.push(tag);
                break;
            }
        };

        let mut same_tag = Vec::new();
        for sibling in dom.children(parent).await? {
            if dom.tag_name(sibling).await?.to_ascii_lowercase() == tag {
                same_tag.push(sibling);
            }
        }
        if same_tag.len() == 1 {
            parts.push(tag);
        } else {
            let position = same_tag
                .iter()
                .position(|&s| s == current)
                .map(|p| p + 1)
                .unwrap_or(1);
            parts.push(format!("{}:nth-of-type({})", tag, position));
        }

        current = parent;
    }

    parts.reverse();
    let selector = parts.join(" > ");
    debug!(%selector, "synthesized structural path");
    Ok(selector)
}

async fn non_empty_attr(
    dom: &dyn DomPort,
    node: NodeId,
    name: &str,
) -> Result<Option<String>, DomError> {
    Ok(dom.attr(node, name).await?.filter(|v| !v.is_empty()))
}

async fn resolves_uniquely(dom: &dyn DomPort, selector: &str, node: NodeId) -> bool {
    match dom.query(selector).await {
        Ok(matches) => matches == [node],
        Err(_) => false,
    }
}

/// Escape an identifier for use after `#`. Alphanumerics, `-` and `_` pass
/// through; everything else gets a backslash.
fn escape_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for c in ident.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

/// Escape a string for interpolation inside a double-quoted attribute
/// selector: backslashes first, then quotes.
fn escape_attr_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
