//! Leaf nodes (Action, Wait, Failer, Succeeder). None of them take children.

use super::{InputDef, NodeCategory, NodeDefinition};
use crate::model::NodeKind;

/// Action node - performs a named action with blackboard parameters.
pub struct ActionNode;

impl NodeDefinition for ActionNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Action
    }

    fn display_name(&self) -> &'static str {
        "Action"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Leaf
    }

    fn description(&self) -> &'static str {
        "Performs an action and reports whether it succeeded."
    }

    fn inputs(&self) -> Vec<InputDef> {
        vec![
            InputDef::required("name", "Name of the Action node"),
            InputDef::required("actionName", "Name of the action to perform"),
            InputDef::optional(
                "paramKeys",
                "Keys used to extract the parameters from the blackboard",
            ),
        ]
    }
}

/// Wait node - waits for a duration or until a condition holds.
pub struct WaitNode;

impl NodeDefinition for WaitNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Wait
    }

    fn display_name(&self) -> &'static str {
        "Wait"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Leaf
    }

    fn description(&self) -> &'static str {
        "Waits for a specified amount of time or until a condition is met."
    }

    fn inputs(&self) -> Vec<InputDef> {
        vec![
            InputDef::required("name", "Name of the Wait node"),
            InputDef::required("time", "Time to wait in seconds"),
            InputDef::optional(
                "condition",
                "Returns a boolean; when true the node succeeds before the time has elapsed",
            ),
        ]
    }
}

pub struct FailerNode;

impl NodeDefinition for FailerNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Failer
    }

    fn display_name(&self) -> &'static str {
        "Failer"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Leaf
    }

    fn description(&self) -> &'static str {
        "Always fails."
    }
}

pub struct SucceederNode;

impl NodeDefinition for SucceederNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Succeeder
    }

    fn display_name(&self) -> &'static str {
        "Succeeder"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Leaf
    }

    fn description(&self) -> &'static str {
        "Always succeeds."
    }
}
