//! Base node trait and input schema types.

use crate::model::NodeKind;

use super::NodeCategory;

/// Declared input of a node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDef {
    /// Input key (e.g. "name", "repeatCount").
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

impl InputDef {
    pub fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            required: true,
            description,
        }
    }

    pub fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            required: false,
            description,
        }
    }

    /// The `name` input every node kind carries.
    pub fn node_name() -> Self {
        Self::required("name", "The name of the node")
    }
}

/// Capabilities of a single node kind.
///
/// The tree store only ever asks two structural questions of a kind:
/// whether it may have children at all, and whether it is limited to a
/// single child. Everything else is descriptive metadata for catalog listings.
pub trait NodeDefinition: Send + Sync {
    /// The kind this definition describes.
    fn kind(&self) -> NodeKind;

    /// Human-readable name.
    fn display_name(&self) -> &'static str;

    /// Category used to group kinds.
    fn category(&self) -> NodeCategory;

    /// One-line summary of what the kind does.
    fn description(&self) -> &'static str {
        ""
    }

    /// Declared inputs in display order.
    fn inputs(&self) -> Vec<InputDef> {
        vec![InputDef::node_name()]
    }

    /// Whether nodes of this kind may have any children.
    fn can_have_children(&self) -> bool {
        !matches!(self.category(), NodeCategory::Leaf)
    }

    /// Whether nodes of this kind wrap exactly one child.
    fn is_decorator(&self) -> bool {
        matches!(self.category(), NodeCategory::Decorator)
    }

    /// Wire name of the kind, used as the registry key.
    fn kind_name(&self) -> &'static str {
        self.kind().wire_name()
    }
}
