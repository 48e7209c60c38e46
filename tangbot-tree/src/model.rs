use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Closed set of behavior tree node kinds. The serialized names are the
/// ones stored in tree documents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "SelectNode")]
    Select,
    #[serde(rename = "SequenceNode")]
    Sequence,
    #[serde(rename = "ParallelNode")]
    Parallel,
    #[serde(rename = "RandomSelector")]
    RandomSelector,
    #[serde(rename = "InvertNode")]
    Invert,
    #[serde(rename = "RepeatNode")]
    Repeat,
    #[serde(rename = "RetryNode")]
    Retry,
    #[serde(rename = "LoopNode")]
    Loop,
    #[serde(rename = "ActionNode")]
    Action,
    #[serde(rename = "WaitNode")]
    Wait,
    #[serde(rename = "FailerNode")]
    Failer,
    #[serde(rename = "SucceederNode")]
    Succeeder,
}

impl NodeKind {
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Select,
        NodeKind::Sequence,
        NodeKind::Parallel,
        NodeKind::RandomSelector,
        NodeKind::Invert,
        NodeKind::Repeat,
        NodeKind::Retry,
        NodeKind::Loop,
        NodeKind::Action,
        NodeKind::Wait,
        NodeKind::Failer,
        NodeKind::Succeeder,
    ];

    /// Name used for this kind in serialized documents and user messages.
    pub fn wire_name(self) -> &'static str {
        match self {
            NodeKind::Select => "SelectNode",
            NodeKind::Sequence => "SequenceNode",
            NodeKind::Parallel => "ParallelNode",
            NodeKind::RandomSelector => "RandomSelector",
            NodeKind::Invert => "InvertNode",
            NodeKind::Repeat => "RepeatNode",
            NodeKind::Retry => "RetryNode",
            NodeKind::Loop => "LoopNode",
            NodeKind::Action => "ActionNode",
            NodeKind::Wait => "WaitNode",
            NodeKind::Failer => "FailerNode",
            NodeKind::Succeeder => "SucceederNode",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children_ids: Vec<NodeId>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            x: 0.0,
            y: 0.0,
            parent_id: None,
            children_ids: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

// Documents written by older editors store `"childrenIds": null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<NodeId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<NodeId>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The forest: every node record keyed by its id.
pub type NodeMap = BTreeMap<NodeId, Node>;
