//! Tidy tree layout for behavior tree forests.
//!
//! Positions are computed with the Buchheim-Junger-Leipert refinement of
//! Walker's algorithm, which runs in linear time:
//!
//! 1. **First walk (post-order):** assign each node a preliminary breadth
//!    position, pushing sibling subtrees apart along their contours and
//!    centering parents over their children.
//! 2. **Second walk (pre-order):** accumulate modifiers into final breadth
//!    positions, with the subtree root at breadth zero.
//! 3. **Scaling:** breadth is scaled by node width plus vertical spacing,
//!    depth by node height plus horizontal spacing. Depth grows along `x`
//!    and breadth along `y`, so trees flow left to right.
//!
//! Siblings sharing a parent are kept one unit apart; nodes with different
//! parents that meet on a contour are kept two units apart, which groups
//! sibling clusters visually.

use crate::model::{NodeId, NodeMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const SIBLING_SEPARATION: f64 = 1.0;
const COUSIN_SEPARATION: f64 = 2.0;

/// Engine-global layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutParams {
    pub node_width: f64,
    pub node_height: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            node_height: 100.0,
            horizontal_spacing: 150.0,
            vertical_spacing: -40.0,
        }
    }
}

/// Names one of the four [`LayoutParams`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutParam {
    NodeWidth,
    NodeHeight,
    HorizontalSpacing,
    VerticalSpacing,
}

impl LayoutParams {
    /// Sets one field, returning whether its value changed.
    pub fn set(&mut self, param: LayoutParam, value: f64) -> bool {
        let slot = match param {
            LayoutParam::NodeWidth => &mut self.node_width,
            LayoutParam::NodeHeight => &mut self.node_height,
            LayoutParam::HorizontalSpacing => &mut self.horizontal_spacing,
            LayoutParam::VerticalSpacing => &mut self.vertical_spacing,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }

    /// Distance between adjacent breadth units (along `y`).
    pub fn breadth_step(&self) -> f64 {
        self.node_width + self.vertical_spacing
    }

    /// Distance between adjacent depths (along `x`).
    pub fn depth_step(&self) -> f64 {
        self.node_height + self.horizontal_spacing
    }
}

/// Final coordinates for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Positioned {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// Lays out the subtree rooted at `root`, placing the root at `anchor`.
///
/// This is a pure function of the subtree structure and `params`. Child ids
/// that do not resolve are skipped, as are nodes reached a second time, so
/// an inconsistent map cannot make the walk diverge. An unknown root yields
/// an empty result.
pub fn compute_layout(
    nodes: &NodeMap,
    root: &NodeId,
    params: &LayoutParams,
    anchor: (f64, f64),
) -> Vec<Positioned> {
    let mut tree = TidyTree::build(nodes, root);
    if tree.nodes.is_empty() {
        return Vec::new();
    }

    tree.first_walk();
    let breadth = tree.second_walk();

    tree.nodes
        .into_iter()
        .zip(breadth)
        .map(|(node, breadth)| Positioned {
            id: node.id,
            x: node.depth as f64 * params.depth_step() + anchor.0,
            y: breadth * params.breadth_step() + anchor.1,
        })
        .collect()
}

#[derive(Debug)]
struct LayoutNode {
    id: NodeId,
    depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Position among siblings.
    number: usize,
    prelim: f64,
    modifier: f64,
    shift: f64,
    change: f64,
    /// Contour thread for leaves.
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor while apportioning this node's children.
    default_ancestor: Option<usize>,
}

/// Arena of layout nodes in pre-order; index 0 is the root.
#[derive(Debug)]
struct TidyTree {
    nodes: Vec<LayoutNode>,
}

impl TidyTree {
    fn build(map: &NodeMap, root: &NodeId) -> Self {
        let mut nodes: Vec<LayoutNode> = Vec::new();
        let mut visited = BTreeSet::new();
        let mut stack: Vec<(&NodeId, Option<usize>, usize)> = vec![(root, None, 0)];

        while let Some((id, parent, depth)) = stack.pop() {
            let Some(record) = map.get(id) else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }

            let index = nodes.len();
            let number = match parent {
                Some(parent) => {
                    let siblings = &mut nodes[parent].children;
                    siblings.push(index);
                    siblings.len() - 1
                }
                None => 0,
            };

            nodes.push(LayoutNode {
                id: record.id.clone(),
                depth,
                parent,
                children: Vec::new(),
                number,
                prelim: 0.0,
                modifier: 0.0,
                shift: 0.0,
                change: 0.0,
                thread: None,
                ancestor: index,
                default_ancestor: None,
            });

            // Reversed so the first child is popped (and numbered) first.
            for child in record.children_ids.iter().rev() {
                stack.push((child, Some(index), depth + 1));
            }
        }

        Self { nodes }
    }

    /// Children before parents, siblings left to right.
    ///
    /// Built without recursion: the reverse of a pre-order that visits
    /// children right to left.
    fn post_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(self.nodes[v].children.iter().copied());
        }
        order.reverse();
        order
    }

    fn first_walk(&mut self) {
        for v in self.post_order() {
            self.place_preliminary(v);
        }
    }

    fn place_preliminary(&mut self, v: usize) {
        let children = self.nodes[v].children.clone();
        let left_sibling = self.left_sibling(v);
        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            match left_sibling {
                Some(w) => {
                    self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
                    self.nodes[v].modifier = self.nodes[v].prelim - midpoint;
                }
                None => self.nodes[v].prelim = midpoint,
            }
        } else if let Some(w) = left_sibling {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
        }

        if let Some(parent) = self.nodes[v].parent {
            let default_ancestor = self.nodes[parent]
                .default_ancestor
                .unwrap_or(self.nodes[parent].children[0]);
            let default_ancestor = self.apportion(v, left_sibling, default_ancestor);
            self.nodes[parent].default_ancestor = Some(default_ancestor);
        }
    }

    /// Returns final breadth positions indexed like `self.nodes`.
    fn second_walk(&mut self) -> Vec<f64> {
        let mut breadth = vec![0.0; self.nodes.len()];
        let root_shift = -self.nodes[0].prelim;

        // Pre-order: every parent's modifier is final before its children.
        for v in 0..self.nodes.len() {
            let inherited = match self.nodes[v].parent {
                Some(parent) => self.nodes[parent].modifier,
                None => root_shift,
            };
            breadth[v] = self.nodes[v].prelim + inherited;
            self.nodes[v].modifier += inherited;
        }

        breadth
    }

    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut ancestor: usize) -> usize {
        let (Some(w), Some(parent)) = (left_sibling, self.nodes[v].parent) else {
            return ancestor;
        };

        // i = inside, o = outside; p = right subtree (v), m = left subtrees.
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.nodes[parent].children[0];
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            let (Some(om), Some(op)) = (self.next_left(vom), self.next_right(vop)) else {
                break;
            };
            vim = im;
            vip = ip;
            vom = om;
            vop = op;
            self.nodes[vop].ancestor = v;

            let shift = self.nodes[vim].prelim + sim - self.nodes[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let from = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(from, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if let Some(im) = next_im {
            if self.next_right(vop).is_none() {
                self.nodes[vop].thread = Some(im);
                self.nodes[vop].modifier += sim - sop;
            }
        }

        if let Some(ip) = next_ip {
            if self.next_left(vom).is_none() {
                self.nodes[vom].thread = Some(ip);
                self.nodes[vom].modifier += sip - som;
                ancestor = v;
            }
        }

        ancestor
    }

    fn move_subtree(&mut self, from: usize, to: usize, shift: f64) {
        let subtrees = self.nodes[to]
            .number
            .saturating_sub(self.nodes[from].number)
            .max(1);
        let change = shift / subtrees as f64;

        self.nodes[to].change -= change;
        self.nodes[to].shift += shift;
        self.nodes[from].change += change;
        self.nodes[to].prelim += shift;
        self.nodes[to].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[i];
            let node = &mut self.nodes[w];
            node.prelim += shift;
            node.modifier += shift;
            change += node.change;
            shift += node.shift + change;
        }
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.nodes[vim].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.nodes[a].parent == self.nodes[b].parent {
            SIBLING_SEPARATION
        } else {
            COUSIN_SEPARATION
        }
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let parent = self.nodes[v].parent?;
        let number = self.nodes[v].number;
        (number > 0).then(|| self.nodes[parent].children[number - 1])
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v]
            .children
            .first()
            .copied()
            .or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v]
            .children
            .last()
            .copied()
            .or(self.nodes[v].thread)
    }
}
