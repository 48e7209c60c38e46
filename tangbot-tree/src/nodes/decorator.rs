//! Decorator nodes (Invert, Repeat, Retry, Loop). Each wraps a single child.

use super::{InputDef, NodeCategory, NodeDefinition};
use crate::model::NodeKind;

pub struct InvertNode;

impl NodeDefinition for InvertNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Invert
    }

    fn display_name(&self) -> &'static str {
        "Invert"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Decorator
    }

    fn description(&self) -> &'static str {
        "Inverts the result of its child."
    }
}

pub struct RepeatNode;

impl NodeDefinition for RepeatNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Repeat
    }

    fn display_name(&self) -> &'static str {
        "Repeat"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Decorator
    }

    fn description(&self) -> &'static str {
        "Repeats its child the given number of times or until it fails."
    }

    fn inputs(&self) -> Vec<InputDef> {
        vec![
            InputDef::node_name(),
            InputDef::required("repeatCount", "Number of times to repeat the child"),
        ]
    }
}

pub struct RetryNode;

impl NodeDefinition for RetryNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Retry
    }

    fn display_name(&self) -> &'static str {
        "Retry"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Decorator
    }

    fn description(&self) -> &'static str {
        "Retries its child the given number of times or until it succeeds."
    }

    fn inputs(&self) -> Vec<InputDef> {
        vec![
            InputDef::node_name(),
            InputDef::required("repeatCount", "Number of times to retry the child"),
        ]
    }
}

pub struct LoopNode;

impl NodeDefinition for LoopNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Loop
    }

    fn display_name(&self) -> &'static str {
        "Loop"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Decorator
    }

    fn description(&self) -> &'static str {
        "Executes its child a fixed number of times."
    }

    fn inputs(&self) -> Vec<InputDef> {
        vec![
            InputDef::node_name(),
            InputDef::required("loopCount", "Number of times to execute the child"),
        ]
    }
}
