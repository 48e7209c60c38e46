//! Composite nodes (Select, Sequence, Parallel, RandomSelector).

use super::{InputDef, NodeCategory, NodeDefinition};
use crate::model::NodeKind;

/// Select node - first child to succeed wins.
pub struct SelectNode;

impl NodeDefinition for SelectNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Select
    }

    fn display_name(&self) -> &'static str {
        "Selector"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Composite
    }

    fn description(&self) -> &'static str {
        "Returns the first successful child or failure if all children fail."
    }
}

/// Sequence node - all children must succeed, in order.
pub struct SequenceNode;

impl NodeDefinition for SequenceNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn display_name(&self) -> &'static str {
        "Sequence"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Composite
    }

    fn description(&self) -> &'static str {
        "Returns success only if all children succeed in order."
    }
}

/// Parallel node - runs every child at once.
pub struct ParallelNode;

impl NodeDefinition for ParallelNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Parallel
    }

    fn display_name(&self) -> &'static str {
        "Parallel"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Composite
    }

    fn description(&self) -> &'static str {
        "Runs all children simultaneously, succeeding once enough of them succeed."
    }

    fn inputs(&self) -> Vec<InputDef> {
        vec![
            InputDef::node_name(),
            InputDef::required(
                "percentage",
                "Percentage of children that must succeed for this node to succeed",
            ),
        ]
    }
}

/// Random selector - a selector over a shuffled child order.
pub struct RandomSelectorNode;

impl NodeDefinition for RandomSelectorNode {
    fn kind(&self) -> NodeKind {
        NodeKind::RandomSelector
    }

    fn display_name(&self) -> &'static str {
        "Random Selector"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Composite
    }

    fn description(&self) -> &'static str {
        "Shuffles its children, then picks the first one that succeeds."
    }
}
