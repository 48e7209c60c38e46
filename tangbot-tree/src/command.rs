//! Explicit editing commands.
//!
//! Front ends describe what the user did as a [`Command`] and hand it to
//! [`TreeStore::execute`]. Layout follow-ups that a command implies, such
//! as a full relayout after a parameter change, are run before `execute`
//! returns.

use crate::{
    error::TreeError,
    layout::{LayoutParam, LayoutParams},
    model::{Node, NodeId, NodeKind},
    placement::Placement,
    store::TreeStore,
};

const TRACING_TARGET: &str = "tangbot_tree::command";

/// Layout work a store change asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutRequest {
    /// Lay out every forest root from the origin.
    AllRoots,
    /// Lay out one subtree, keeping its root where it is.
    Subtree(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create { kind: NodeKind, name: String },
    Place { parent: NodeId, child: NodeId },
    Detach(NodeId),
    Remove(NodeId),
    Rename { id: NodeId, name: String },
    Select(NodeId),
    Load(String),
    SetLayoutParams(LayoutParams),
    SetLayoutParam(LayoutParam, f64),
    Relayout(LayoutRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Created(NodeId),
    Placed(Placement),
    Removed(Node),
    Selected(Option<NodeId>),
    /// Whether a relayout actually ran.
    LayoutChanged(bool),
    Done,
}

impl TreeStore {
    /// Runs one command against the store.
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome, TreeError> {
        tracing::trace!(target: TRACING_TARGET, ?command, "executing command");

        let outcome = match command {
            Command::Create { kind, name } => CommandOutcome::Created(self.create_node(kind, name)),
            Command::Place { parent, child } => {
                CommandOutcome::Placed(self.place_node(&parent, &child)?)
            }
            Command::Detach(id) => {
                self.detach_node(&id)?;
                CommandOutcome::Done
            }
            Command::Remove(id) => CommandOutcome::Removed(self.remove_node(&id)?),
            Command::Rename { id, name } => {
                self.rename_node(&id, name)?;
                CommandOutcome::Done
            }
            Command::Select(id) => CommandOutcome::Selected(self.select_node(&id)?.cloned()),
            Command::Load(document) => {
                self.load_tree(&document)?;
                CommandOutcome::Done
            }
            Command::SetLayoutParams(params) => {
                let request = self.set_layout_params(params);
                self.honor(request)?
            }
            Command::SetLayoutParam(param, value) => {
                let request = self.set_layout_param(param, value);
                self.honor(request)?
            }
            Command::Relayout(request) => self.honor(Some(request))?,
        };

        Ok(outcome)
    }

    fn honor(&mut self, request: Option<LayoutRequest>) -> Result<CommandOutcome, TreeError> {
        match request {
            Some(request) => {
                self.process(request)?;
                Ok(CommandOutcome::LayoutChanged(true))
            }
            None => Ok(CommandOutcome::LayoutChanged(false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> (TreeStore, NodeId, NodeId, NodeId) {
        let mut store = TreeStore::new();
        let root = match store
            .execute(Command::Create { kind: NodeKind::Select, name: "Root".into() })
            .unwrap()
        {
            CommandOutcome::Created(id) => id,
            other => panic!("unexpected outcome {other:?}"),
        };
        let a = store.create_node(NodeKind::Action, "A");
        let b = store.create_node(NodeKind::Action, "B");
        store
            .execute(Command::Place { parent: root.clone(), child: a.clone() })
            .unwrap();
        store
            .execute(Command::Place { parent: root.clone(), child: b.clone() })
            .unwrap();
        (store, root, a, b)
    }

    #[test]
    fn parameter_change_relays_every_root() {
        let (mut store, _root, a, b) = build();
        let other = store.create_node(NodeKind::Sequence, "Other");
        let leaf = store.create_node(NodeKind::Wait, "Wait");
        store.place_node(&other, &leaf).unwrap();
        store.apply_layout(None).unwrap();
        assert_eq!(store.node(&a).unwrap().position(), (250.0, -55.0));

        let outcome = store
            .execute(Command::SetLayoutParam(LayoutParam::HorizontalSpacing, 50.0))
            .unwrap();
        assert_eq!(outcome, CommandOutcome::LayoutChanged(true));
        assert_eq!(store.node(&a).unwrap().position(), (150.0, -55.0));
        assert_eq!(store.node(&b).unwrap().position(), (150.0, 55.0));
        assert_eq!(store.node(&leaf).unwrap().position(), (150.0, 0.0));
    }

    #[test]
    fn unchanged_parameters_skip_layout() {
        let (mut store, _root, a, _b) = build();
        let before = store.node(&a).unwrap().position();

        let outcome = store
            .execute(Command::SetLayoutParams(LayoutParams::default()))
            .unwrap();
        assert_eq!(outcome, CommandOutcome::LayoutChanged(false));
        assert_eq!(store.node(&a).unwrap().position(), before);
    }

    #[test]
    fn rejected_command_reports_error() {
        let (mut store, root, a, _b) = build();
        let err = store
            .execute(Command::Place { parent: a, child: root })
            .unwrap_err();
        assert!(matches!(err, TreeError::StructuralRejection(msg) if msg.contains("loop")));
    }

    #[test]
    fn select_and_remove_through_commands() {
        let (mut store, root, a, _b) = build();
        assert_eq!(
            store.execute(Command::Select(a.clone())).unwrap(),
            CommandOutcome::Selected(Some(a.clone()))
        );
        match store.execute(Command::Remove(a.clone())).unwrap() {
            CommandOutcome::Removed(node) => assert_eq!(node.id, a),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.node(&root).unwrap().children_ids.len(), 1);
    }

    #[test]
    fn explicit_subtree_relayout_keeps_anchor() {
        let (mut store, root, a, _b) = build();
        store.execute(Command::Relayout(LayoutRequest::AllRoots)).unwrap();
        assert_eq!(store.node(&root).unwrap().position(), (0.0, 0.0));

        store
            .execute(Command::Relayout(LayoutRequest::Subtree(root.clone())))
            .unwrap();
        assert_eq!(store.node(&a).unwrap().position(), (250.0, -55.0));
    }
}
