use crate::model::NodeId;
use thiserror::Error;

/// Structural problems found while validating a loaded document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("map key does not match node id")]
    KeyMismatch,

    #[error("parent refers to unknown node")]
    UnknownParent,

    #[error("child refers to unknown node")]
    UnknownChild,

    #[error("parent and child links disagree")]
    AsymmetricLink,

    #[error("child listed more than once")]
    DuplicateChild,

    #[error("node is its own ancestor")]
    Cycle,

    #[error("decorator has more than one child")]
    DecoratorArity,

    #[error("node type can't have children")]
    LeafWithChildren,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("load rejected: {kind} (node={node:?})")]
pub struct LoadError {
    pub kind: ValidationError,
    pub node: Option<NodeId>,
}

impl LoadError {
    pub fn new(kind: ValidationError) -> Self {
        Self { kind, node: None }
    }

    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("unknown node id '{0}'")]
    InvalidReference(NodeId),

    #[error("{0}")]
    StructuralRejection(String),

    #[error(transparent)]
    LoadRejected(#[from] LoadError),

    #[error("malformed tree document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("node id '{0}' already exists")]
    DuplicateId(NodeId),
}
