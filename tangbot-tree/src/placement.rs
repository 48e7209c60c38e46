//! Structural legality of attaching one node under another.

use crate::{
    error::TreeError,
    model::{Node, NodeId, NodeMap},
    nodes::NodeCatalog,
};

/// Outcome of [`can_place`]. Rejections are ordinary values, not errors:
/// they describe a user mistake the front end has to explain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub can_place: bool,
    /// Set when placing will displace the current child of a decorator.
    pub should_confirm: bool,
    pub message: String,
    /// The child that would be replaced, if any.
    pub displaced: Option<NodeId>,
}

impl Placement {
    fn accepted() -> Self {
        Self {
            can_place: true,
            should_confirm: false,
            message: String::new(),
            displaced: None,
        }
    }

    fn rejected(message: String) -> Self {
        Self {
            can_place: false,
            should_confirm: false,
            message,
            displaced: None,
        }
    }

    fn replacing(current: &Node) -> Self {
        Self {
            can_place: true,
            should_confirm: true,
            message: format!(
                "Placing this node will replace the current node '{}'",
                current.name
            ),
            displaced: Some(current.id.clone()),
        }
    }
}

pub(crate) fn resolve<'a>(nodes: &'a NodeMap, id: &NodeId) -> Result<&'a Node, TreeError> {
    nodes
        .get(id)
        .ok_or_else(|| TreeError::InvalidReference(id.clone()))
}

/// Decides whether `child` may be attached under `parent`.
///
/// Checks run in order and the first failure wins: loop formation, then
/// whether the parent kind takes children at all, then decorator
/// replacement. Unknown ids are [`TreeError::InvalidReference`].
pub fn can_place(
    nodes: &NodeMap,
    catalog: &NodeCatalog,
    parent: &NodeId,
    child: &NodeId,
) -> Result<Placement, TreeError> {
    let parent_node = resolve(nodes, parent)?;
    resolve(nodes, child)?;

    if would_form_loop(nodes, parent_node, child) {
        return Ok(Placement::rejected(
            "Unable to place node, a loop would be formed".to_string(),
        ));
    }

    let caps = catalog.capabilities(parent_node.kind);
    if !caps.can_have_children {
        return Ok(Placement::rejected(format!(
            "Unable to place node. '{}' can't have children",
            parent_node.kind
        )));
    }

    if caps.is_decorator {
        let current = parent_node
            .children_ids
            .iter()
            .find(|id| *id != child)
            .and_then(|id| nodes.get(id));
        if let Some(current) = current {
            return Ok(Placement::replacing(current));
        }
    }

    Ok(Placement::accepted())
}

/// True when `child` is `parent` itself or one of its ancestors.
///
/// The walk is bounded by the number of nodes so a corrupted parent chain
/// cannot loop forever; exhausting the bound counts as a loop.
pub fn would_form_loop(nodes: &NodeMap, parent: &Node, child: &NodeId) -> bool {
    if parent.id == *child {
        return true;
    }

    let mut current = parent;
    for _ in 0..nodes.len() {
        let Some(next) = current.parent_id.as_ref() else {
            return false;
        };
        if next == child {
            return true;
        }
        match nodes.get(next) {
            Some(node) => current = node,
            None => return false,
        }
    }
    true
}
