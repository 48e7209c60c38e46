#![forbid(unsafe_code)]

pub mod command;
pub mod error;
pub mod layout;
pub mod model;
pub mod nodes;
pub mod placement;
pub mod store;
pub mod validate;

pub use crate::{
    command::{Command, CommandOutcome, LayoutRequest},
    error::{LoadError, TreeError, ValidationError},
    layout::{compute_layout, LayoutParam, LayoutParams, Positioned},
    model::{Node, NodeId, NodeKind, NodeMap},
    nodes::{Capabilities, NodeCatalog, NodeCategory, NodeDefinition},
    placement::Placement,
    store::TreeStore,
    validate::validate,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(entries: &[(&str, NodeKind, &str)]) -> TreeStore {
        let mut store = TreeStore::new();
        for (id, kind, name) in entries {
            store.insert_node(Node::new(*id, *kind, *name)).unwrap();
        }
        store
    }

    #[test]
    fn sequence_under_selector() {
        let mut store = seeded(&[
            ("R", NodeKind::Select, "Root"),
            ("S", NodeKind::Sequence, "Steps"),
        ]);
        let r = NodeId::from("R");
        let s = NodeId::from("S");

        let check = store.can_place(&r, &s).unwrap();
        assert!(check.can_place);
        assert!(!check.should_confirm);

        store.place_node(&r, &s).unwrap();
        assert_eq!(store.node(&r).unwrap().children_ids, [s.clone()]);
        assert_eq!(store.node(&s).unwrap().parent_id, Some(r));
    }

    #[test]
    fn root_under_descendant_is_rejected() {
        let mut store = seeded(&[
            ("R", NodeKind::Select, "Root"),
            ("S", NodeKind::Sequence, "Steps"),
        ]);
        let r = NodeId::from("R");
        let s = NodeId::from("S");
        store.place_node(&r, &s).unwrap();
        let before = store.nodes().clone();

        let check = store.can_place(&s, &r).unwrap();
        assert!(!check.can_place);
        assert_eq!(check.message, "Unable to place node, a loop would be formed");

        assert!(matches!(
            store.place_node(&s, &r),
            Err(TreeError::StructuralRejection(_))
        ));
        assert_eq!(store.nodes(), &before);
    }

    #[test]
    fn decorator_replacement_clears_old_child() {
        let mut store = seeded(&[
            ("D", NodeKind::Invert, "Not"),
            ("C1", NodeKind::Action, "Attack"),
            ("C2", NodeKind::Action, "Flee"),
        ]);
        let d = NodeId::from("D");
        let c1 = NodeId::from("C1");
        let c2 = NodeId::from("C2");
        store.place_node(&d, &c1).unwrap();

        let check = store.can_place(&d, &c2).unwrap();
        assert!(check.can_place && check.should_confirm);
        assert_eq!(
            check.message,
            "Placing this node will replace the current node 'Attack'"
        );

        store.place_node(&d, &c2).unwrap();
        assert_eq!(store.node(&d).unwrap().children_ids, [c2]);
        assert_eq!(store.node(&c1).unwrap().parent_id, None);
    }

    #[test]
    fn dangling_parent_document_keeps_previous_tree() {
        let mut store = TreeStore::new();
        store
            .load_tree(
                r#"{
                    "r": {"id":"r","type":"SelectNode","name":"Root","x":0,"y":0,"childrenIds":["a"]},
                    "a": {"id":"a","type":"ActionNode","name":"Act","x":0,"y":0,"parentId":"r"}
                }"#,
            )
            .unwrap();
        let before = store.nodes().clone();

        let err = store
            .load_tree(r#"{"b": {"id":"b","type":"WaitNode","name":"Wait","x":1,"y":2,"parentId":"missing"}}"#)
            .unwrap_err();
        match err {
            TreeError::LoadRejected(err) => {
                assert_eq!(err.kind, ValidationError::UnknownParent);
                assert_eq!(err.node, Some(NodeId::from("b")));
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(store.nodes(), &before);
    }

    #[test]
    fn loaded_document_ignores_unknown_fields_and_requires_geometry() {
        let mut store = TreeStore::new();
        store
            .load_tree(r#"{"a": {"id":"a","type":"SucceederNode","name":"Ok","x":0,"y":0,"color":"red"}}"#)
            .unwrap();
        assert_eq!(store.len(), 1);

        let err = store
            .load_tree(r#"{"a": {"id":"a","type":"SucceederNode","name":"Ok","y":0}}"#)
            .unwrap_err();
        assert!(matches!(err, TreeError::Parse(_)));
    }

    #[test]
    fn independent_trees_all_start_at_origin() {
        let mut store = TreeStore::new();
        store
            .load_tree(
                r#"{
                    "r1": {"id":"r1","type":"SequenceNode","name":"One","x":0,"y":0,"childrenIds":["a"]},
                    "a":  {"id":"a","type":"ActionNode","name":"A","x":0,"y":0,"parentId":"r1"},
                    "r2": {"id":"r2","type":"RepeatNode","name":"Two","x":40,"y":40,"childrenIds":["w"]},
                    "w":  {"id":"w","type":"WaitNode","name":"W","x":0,"y":0,"parentId":"r2"}
                }"#,
            )
            .unwrap();

        for root in ["r1", "r2"] {
            assert_eq!(store.node(&root.into()).unwrap().position(), (0.0, 0.0));
        }
        assert_eq!(store.node(&"a".into()).unwrap().position(), (250.0, 0.0));
        assert_eq!(store.node(&"w".into()).unwrap().position(), (250.0, 0.0));
    }
}
