use crate::{
    error::{LoadError, ValidationError},
    model::{NodeId, NodeMap},
    nodes::NodeCatalog,
};
use std::collections::BTreeSet;

/// Checks that a parsed document is a well-formed forest.
///
/// Enforces: keys match record ids, every link resolves, parent and child
/// links agree, no child is listed twice, no node is its own ancestor,
/// decorators have at most one child and leaf kinds have none.
pub fn validate(nodes: &NodeMap, catalog: &NodeCatalog) -> Result<(), LoadError> {
    for (key, node) in nodes.iter() {
        if *key != node.id {
            return Err(LoadError::new(ValidationError::KeyMismatch).with_node(key.clone()));
        }

        if let Some(parent_id) = node.parent_id.as_ref() {
            let parent = nodes.get(parent_id).ok_or_else(|| {
                LoadError::new(ValidationError::UnknownParent).with_node(key.clone())
            })?;
            if !parent.children_ids.contains(key) {
                return Err(LoadError::new(ValidationError::AsymmetricLink).with_node(key.clone()));
            }
        }

        let mut seen = BTreeSet::new();
        for child_id in node.children_ids.iter() {
            if !seen.insert(child_id) {
                return Err(LoadError::new(ValidationError::DuplicateChild).with_node(key.clone()));
            }
            let child = nodes.get(child_id).ok_or_else(|| {
                LoadError::new(ValidationError::UnknownChild).with_node(key.clone())
            })?;
            if child.parent_id.as_ref() != Some(key) {
                return Err(
                    LoadError::new(ValidationError::AsymmetricLink).with_node(child_id.clone())
                );
            }
        }

        let caps = catalog.capabilities(node.kind);
        match caps.max_children() {
            Some(max) if node.children_ids.len() > max => {
                let kind = if caps.can_have_children {
                    ValidationError::DecoratorArity
                } else {
                    ValidationError::LeafWithChildren
                };
                return Err(LoadError::new(kind).with_node(key.clone()));
            }
            _ => {}
        }
    }

    detect_cycles(nodes)
}

fn detect_cycles(nodes: &NodeMap) -> Result<(), LoadError> {
    // Nodes already known to reach a root.
    let mut grounded: BTreeSet<&NodeId> = BTreeSet::new();

    for (id, node) in nodes.iter() {
        if grounded.contains(id) {
            continue;
        }

        let mut path: BTreeSet<&NodeId> = BTreeSet::from([id]);
        let mut current = node;
        while let Some(parent_id) = current.parent_id.as_ref() {
            if grounded.contains(parent_id) {
                break;
            }
            if !path.insert(parent_id) {
                return Err(LoadError::new(ValidationError::Cycle).with_node(id.clone()));
            }
            match nodes.get(parent_id) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        grounded.extend(path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeKind};

    fn parse(json: &str) -> NodeMap {
        serde_json::from_str(json).unwrap()
    }

    fn check(json: &str) -> Result<(), LoadError> {
        validate(&parse(json), &NodeCatalog::builtin())
    }

    #[test]
    fn well_formed_forest_passes() {
        let result = check(
            r#"{
                "r": {"id":"r","type":"SelectNode","name":"Root","x":0,"y":0,"childrenIds":["d","a"]},
                "d": {"id":"d","type":"InvertNode","name":"Not","x":0,"y":0,"parentId":"r","childrenIds":["w"]},
                "w": {"id":"w","type":"WaitNode","name":"Wait","x":0,"y":0,"parentId":"d"},
                "a": {"id":"a","type":"ActionNode","name":"Act","x":0,"y":0,"parentId":"r"},
                "loose": {"id":"loose","type":"FailerNode","name":"Fail","x":0,"y":0}
            }"#,
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn dangling_parent_is_rejected() {
        let err = check(r#"{"a": {"id":"a","type":"ActionNode","name":"A","x":0,"y":0,"parentId":"gone"}}"#)
            .unwrap_err();
        assert_eq!(err.kind, ValidationError::UnknownParent);
        assert_eq!(err.node, Some(NodeId::from("a")));
    }

    #[test]
    fn dangling_child_is_rejected() {
        let err = check(r#"{"s": {"id":"s","type":"SequenceNode","name":"S","x":0,"y":0,"childrenIds":["gone"]}}"#)
            .unwrap_err();
        assert_eq!(err.kind, ValidationError::UnknownChild);
    }

    #[test]
    fn one_sided_links_are_rejected() {
        let err = check(
            r#"{
                "s": {"id":"s","type":"SequenceNode","name":"S","x":0,"y":0},
                "a": {"id":"a","type":"ActionNode","name":"A","x":0,"y":0,"parentId":"s"}
            }"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ValidationError::AsymmetricLink);

        let err = check(
            r#"{
                "s": {"id":"s","type":"SequenceNode","name":"S","x":0,"y":0,"childrenIds":["a"]},
                "a": {"id":"a","type":"ActionNode","name":"A","x":0,"y":0}
            }"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ValidationError::AsymmetricLink);
        assert_eq!(err.node, Some(NodeId::from("a")));
    }

    #[test]
    fn mismatched_key_is_rejected() {
        let err = check(r#"{"k": {"id":"a","type":"ActionNode","name":"A","x":0,"y":0}}"#)
            .unwrap_err();
        assert_eq!(err.kind, ValidationError::KeyMismatch);
    }

    #[test]
    fn arity_limits_are_enforced() {
        let err = check(
            r#"{
                "d": {"id":"d","type":"RepeatNode","name":"D","x":0,"y":0,"childrenIds":["a","b"]},
                "a": {"id":"a","type":"ActionNode","name":"A","x":0,"y":0,"parentId":"d"},
                "b": {"id":"b","type":"ActionNode","name":"B","x":0,"y":0,"parentId":"d"}
            }"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ValidationError::DecoratorArity);

        let err = check(
            r#"{
                "w": {"id":"w","type":"WaitNode","name":"W","x":0,"y":0,"childrenIds":["a"]},
                "a": {"id":"a","type":"ActionNode","name":"A","x":0,"y":0,"parentId":"w"}
            }"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ValidationError::LeafWithChildren);
    }

    #[test]
    fn duplicate_child_entry_is_rejected() {
        let err = check(
            r#"{
                "s": {"id":"s","type":"SequenceNode","name":"S","x":0,"y":0,"childrenIds":["a","a"]},
                "a": {"id":"a","type":"ActionNode","name":"A","x":0,"y":0,"parentId":"s"}
            }"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ValidationError::DuplicateChild);
    }

    #[test]
    fn parent_cycle_is_rejected() {
        let mut nodes = NodeMap::new();
        for (id, parent) in [("a", "c"), ("b", "a"), ("c", "b")] {
            let mut node = Node::new(id, NodeKind::Sequence, id);
            node.parent_id = Some(parent.into());
            nodes.insert(id.into(), node);
        }
        for (parent, child) in [("a", "b"), ("b", "c"), ("c", "a")] {
            nodes
                .get_mut(&NodeId::from(parent))
                .unwrap()
                .children_ids
                .push(child.into());
        }

        let err = validate(&nodes, &NodeCatalog::builtin()).unwrap_err();
        assert_eq!(err.kind, ValidationError::Cycle);
    }

    /// A chain whose deepest node sorts first, so the first walk covers
    /// the whole chain and every later node stops at its parent.
    fn deepest_first_chain(len: usize) -> NodeMap {
        let key = |i: usize| NodeId(format!("n{i:05}"));
        let mut nodes = NodeMap::new();
        for i in 0..len {
            let mut node = Node::new(key(i), NodeKind::Sequence, "step");
            if i + 1 < len {
                node.parent_id = Some(key(i + 1));
            }
            if i > 0 {
                node.children_ids.push(key(i - 1));
            }
            nodes.insert(key(i), node);
        }
        nodes
    }

    #[test]
    fn long_chain_is_accepted() {
        let nodes = deepest_first_chain(40_000);
        assert_eq!(validate(&nodes, &NodeCatalog::builtin()), Ok(()));
    }

    #[test]
    fn long_ring_is_a_cycle() {
        let mut nodes = deepest_first_chain(20_000);
        let top = NodeId::from("n19999");
        let bottom = NodeId::from("n00000");
        nodes.get_mut(&top).unwrap().parent_id = Some(bottom.clone());
        nodes.get_mut(&bottom).unwrap().children_ids.push(top);

        let err = validate(&nodes, &NodeCatalog::builtin()).unwrap_err();
        assert_eq!(err.kind, ValidationError::Cycle);
        assert_eq!(err.node, Some(bottom));
    }
}
