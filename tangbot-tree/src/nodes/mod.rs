//! Node catalog for behavior trees.
//!
//! This module contains the node definition trait and all built-in node kinds.
//! To add a new node kind:
//! 1. Add a variant to [`NodeKind`](crate::model::NodeKind)
//! 2. Implement `NodeDefinition` for it in the file matching its category
//! 3. List it in `all_node_definitions`

mod base;

mod composite;
mod decorator;
mod leaf;

pub use base::*;

pub use composite::*;
pub use decorator::*;
pub use leaf::*;

use crate::model::NodeKind;
use std::{collections::BTreeMap, fmt};

const TRACING_TARGET: &str = "tangbot_tree::nodes";

/// Registry of all built-in node definitions.
/// Backs [`NodeCatalog::builtin`] and the `tangbot catalog` listing.
pub fn all_node_definitions() -> Vec<&'static dyn NodeDefinition> {
    vec![
        // Composites
        &SelectNode,
        &SequenceNode,
        &ParallelNode,
        &RandomSelectorNode,
        // Decorators
        &InvertNode,
        &RepeatNode,
        &RetryNode,
        &LoopNode,
        // Leaves
        &ActionNode,
        &WaitNode,
        &FailerNode,
        &SucceederNode,
    ]
}

/// Get a built-in node definition by its wire name.
pub fn get_node_definition(kind: &str) -> Option<&'static dyn NodeDefinition> {
    all_node_definitions()
        .into_iter()
        .find(|def| def.kind_name() == kind)
}

/// Node category, used to group kinds in catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Composite,
    Decorator,
    Leaf,
}

impl NodeCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeCategory::Composite => "Composites",
            NodeCategory::Decorator => "Decorators",
            NodeCategory::Leaf => "Leaves",
        }
    }
}

/// The two structural facts the tree store needs about a kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub can_have_children: bool,
    pub is_decorator: bool,
}

impl Capabilities {
    pub fn of(definition: &dyn NodeDefinition) -> Self {
        Self {
            can_have_children: definition.can_have_children(),
            is_decorator: definition.is_decorator(),
        }
    }

    /// Maximum number of children, `None` meaning unbounded.
    pub fn max_children(&self) -> Option<usize> {
        match (self.can_have_children, self.is_decorator) {
            (false, _) => Some(0),
            (true, true) => Some(1),
            (true, false) => None,
        }
    }
}

/// Read-only lookup table from node kind to its definition.
///
/// The tree store receives a catalog at construction and never mutates it.
/// Kinds the catalog does not know are treated as leaves.
#[derive(Clone)]
pub struct NodeCatalog {
    definitions: BTreeMap<NodeKind, &'static dyn NodeDefinition>,
}

impl NodeCatalog {
    /// A catalog with no definitions at all.
    pub fn empty() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    /// A catalog holding every built-in definition.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for definition in all_node_definitions() {
            catalog.register(definition);
        }
        catalog
    }

    /// Adds or replaces the definition for `definition.kind()`.
    pub fn register(&mut self, definition: &'static dyn NodeDefinition) -> &mut Self {
        self.definitions.insert(definition.kind(), definition);
        self
    }

    pub fn get(&self, kind: NodeKind) -> Option<&'static dyn NodeDefinition> {
        self.definitions.get(&kind).copied()
    }

    pub fn capabilities(&self, kind: NodeKind) -> Capabilities {
        match self.get(kind) {
            Some(definition) => Capabilities::of(definition),
            None => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    kind = %kind,
                    "node kind missing from catalog, treating it as a leaf"
                );
                Capabilities::default()
            }
        }
    }

    /// Definitions in kind order.
    pub fn iter(&self) -> impl Iterator<Item = &'static dyn NodeDefinition> + '_ {
        self.definitions.values().copied()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for NodeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.definitions.keys())
            .finish()
    }
}
