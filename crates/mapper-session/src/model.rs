use page_port::NodeId;
use serde::{Deserialize, Serialize};

/// Everything a session tracks: whether it is listening, and which node
/// currently carries the capture highlight. At most one node is
/// highlighted at a time; each capture clears the previous one.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MapperState {
    pub active: bool,
    pub highlighted: Option<NodeId>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StartOutcome {
    Started,
    AlreadyActive,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopOutcome {
    Stopped,
    AlreadyInactive,
}

/// What the host should do with the intercepted click.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClickDisposition {
    pub consume_default: bool,
}

impl ClickDisposition {
    pub(crate) const fn consume() -> Self {
        Self {
            consume_default: true,
        }
    }

    pub(crate) const fn pass() -> Self {
        Self {
            consume_default: false,
        }
    }
}

/// Snapshot of the picked field, handed to the host so the operator can
/// choose which key to bind it to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub hostname: String,
    pub selector: String,
    pub tag: String,
    pub input_type: String,
    pub name: String,
    pub id: String,
    pub label: String,
    pub hints: String,
}
