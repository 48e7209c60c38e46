use crate::{
    command::LayoutRequest,
    error::TreeError,
    layout::{compute_layout, LayoutParam, LayoutParams, Positioned},
    model::{Node, NodeId, NodeKind, NodeMap},
    nodes::NodeCatalog,
    placement::{self, Placement},
    validate::validate,
};

const TRACING_TARGET: &str = "tangbot_tree::store";

/// Owner of every node record in a behavior tree document.
///
/// All structural changes go through [`TreeStore::place_node`],
/// [`TreeStore::detach_node`] and [`TreeStore::remove_node`], which keep
/// the forest acyclic, parent and child links symmetric, and decorator and
/// leaf arity within the limits the catalog declares. Coordinates are only
/// ever written by the layout pass.
#[derive(Debug, Clone)]
pub struct TreeStore {
    nodes: NodeMap,
    catalog: NodeCatalog,
    params: LayoutParams,
    selected: Option<NodeId>,
    next_node_id: u64,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeStore {
    /// An empty store using the built-in node catalog.
    pub fn new() -> Self {
        Self::with_catalog(NodeCatalog::builtin())
    }

    pub fn with_catalog(catalog: NodeCatalog) -> Self {
        Self {
            nodes: NodeMap::new(),
            catalog,
            params: LayoutParams::default(),
            selected: None,
            next_node_id: 0,
        }
    }

    pub fn with_layout_params(mut self, params: LayoutParams) -> Self {
        self.params = params;
        self
    }

    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    pub fn node(&self, id: &NodeId) -> Result<&Node, TreeError> {
        placement::resolve(&self.nodes, id)
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node, TreeError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::InvalidReference(id.clone()))
    }

    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    pub fn layout_params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node without a parent, in id order.
    pub fn roots(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes
            .values()
            .filter(|node| node.is_root())
            .map(|node| &node.id)
    }

    pub fn is_root(&self, id: &NodeId) -> Result<bool, TreeError> {
        Ok(self.node(id)?.is_root())
    }

    /// Adds a detached node. Links on the record are dropped; structure is
    /// only ever changed through placement.
    pub fn insert_node(&mut self, mut node: Node) -> Result<(), TreeError> {
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateId(node.id));
        }
        node.parent_id = None;
        node.children_ids.clear();

        tracing::debug!(target: TRACING_TARGET, node = %node.id, kind = %node.kind, "node inserted");
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Creates a detached node with a fresh id at the origin.
    pub fn create_node(&mut self, kind: NodeKind, name: impl Into<String>) -> NodeId {
        let id = loop {
            self.next_node_id += 1;
            let candidate = NodeId(format!("node-{}", self.next_node_id));
            if !self.nodes.contains_key(&candidate) {
                break candidate;
            }
        };

        tracing::debug!(target: TRACING_TARGET, node = %id, kind = %kind, "node created");
        self.nodes.insert(id.clone(), Node::new(id.clone(), kind, name));
        id
    }

    pub fn rename_node(&mut self, id: &NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        self.node_mut(id)?.name = name.into();
        Ok(())
    }

    /// Whether `child` may be attached under `parent`. See [`placement::can_place`].
    pub fn can_place(&self, parent: &NodeId, child: &NodeId) -> Result<Placement, TreeError> {
        placement::can_place(&self.nodes, &self.catalog, parent, child)
    }

    /// Moves `child` under `parent` and lays out the parent's subtree.
    ///
    /// The child is detached from its current parent first, keeping the
    /// order of the remaining siblings. A decorator parent ends up with the
    /// child as its only child, and whatever it held before becomes a root.
    /// Any other parent appends the child after its existing children.
    ///
    /// Attachments that would form a loop or give children to a leaf kind
    /// fail with [`TreeError::StructuralRejection`] before anything changes.
    /// The returned placement reports the displaced node, if any.
    pub fn place_node(&mut self, parent: &NodeId, child: &NodeId) -> Result<Placement, TreeError> {
        let placement = self.can_place(parent, child)?;
        if !placement.can_place {
            tracing::debug!(
                target: TRACING_TARGET,
                parent = %parent,
                child = %child,
                reason = %placement.message,
                "placement rejected"
            );
            return Err(TreeError::StructuralRejection(placement.message));
        }

        let parent_kind = self.node(parent)?.kind;
        let caps = self.catalog.capabilities(parent_kind);

        if let Some(old_parent) = self.node_mut(child)?.parent_id.take() {
            if let Some(old_parent) = self.nodes.get_mut(&old_parent) {
                old_parent.children_ids.retain(|id| id != child);
            }
        }

        let parent_node = self.node_mut(parent)?;
        if caps.is_decorator {
            let previous = std::mem::replace(&mut parent_node.children_ids, vec![child.clone()]);
            for displaced in previous.iter().filter(|id| *id != child) {
                if let Some(node) = self.nodes.get_mut(displaced) {
                    if node.parent_id.as_ref() == Some(parent) {
                        node.parent_id = None;
                    }
                }
            }
        } else {
            parent_node.children_ids.push(child.clone());
        }
        self.node_mut(child)?.parent_id = Some(parent.clone());

        tracing::debug!(
            target: TRACING_TARGET,
            parent = %parent,
            child = %child,
            displaced = ?placement.displaced,
            "node placed"
        );

        self.apply_layout(Some(parent))?;
        Ok(placement)
    }

    /// Unlinks a node from its parent, turning it into a root. The old
    /// parent's subtree is laid out again.
    pub fn detach_node(&mut self, id: &NodeId) -> Result<(), TreeError> {
        let Some(old_parent) = self.node_mut(id)?.parent_id.take() else {
            return Ok(());
        };
        if let Some(parent) = self.nodes.get_mut(&old_parent) {
            parent.children_ids.retain(|child| child != id);
        }

        tracing::debug!(target: TRACING_TARGET, node = %id, parent = %old_parent, "node detached");

        if self.nodes.contains_key(&old_parent) {
            self.apply_layout(Some(&old_parent))?;
        }
        Ok(())
    }

    /// Deletes a node. Its children become roots; it is removed from its
    /// parent's children and from the selection.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, TreeError> {
        self.node(id)?;
        let old_parent = self.node_mut(id)?.parent_id.take();
        if let Some(parent) = old_parent.as_ref().and_then(|p| self.nodes.get_mut(p)) {
            parent.children_ids.retain(|child| child != id);
        }

        let mut removed = self
            .nodes
            .remove(id)
            .ok_or_else(|| TreeError::InvalidReference(id.clone()))?;
        for child in removed.children_ids.drain(..) {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.parent_id = None;
            }
        }

        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }

        tracing::debug!(target: TRACING_TARGET, node = %id, "node removed");

        if let Some(parent) = old_parent.filter(|p| self.nodes.contains_key(p)) {
            self.apply_layout(Some(&parent))?;
        }
        Ok(removed)
    }

    /// Recomputes coordinates.
    ///
    /// With a root, only that node's subtree moves and the root keeps its
    /// current position. Without one, every forest root is laid out from
    /// the origin.
    pub fn apply_layout(&mut self, root: Option<&NodeId>) -> Result<&NodeMap, TreeError> {
        match root {
            Some(root) => {
                let anchor = self.node(root)?.position();
                let positions = compute_layout(&self.nodes, root, &self.params, anchor);
                tracing::debug!(
                    target: TRACING_TARGET,
                    root = %root,
                    nodes = positions.len(),
                    "subtree layout applied"
                );
                self.write_positions(positions);
            }
            None => {
                let roots: Vec<NodeId> = self.roots().cloned().collect();
                for root in roots.iter() {
                    let positions = compute_layout(&self.nodes, root, &self.params, (0.0, 0.0));
                    self.write_positions(positions);
                }
                tracing::debug!(
                    target: TRACING_TARGET,
                    roots = roots.len(),
                    nodes = self.nodes.len(),
                    "full layout applied"
                );
            }
        }
        Ok(&self.nodes)
    }

    fn write_positions(&mut self, positions: Vec<Positioned>) {
        for Positioned { id, x, y } in positions {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.x = x;
                node.y = y;
            }
        }
    }

    /// Replaces all layout parameters. A change asks for a full relayout;
    /// the caller decides when to run it.
    pub fn set_layout_params(&mut self, params: LayoutParams) -> Option<LayoutRequest> {
        if self.params == params {
            return None;
        }
        self.params = params;
        Some(LayoutRequest::AllRoots)
    }

    pub fn set_layout_param(&mut self, param: LayoutParam, value: f64) -> Option<LayoutRequest> {
        self.params
            .set(param, value)
            .then_some(LayoutRequest::AllRoots)
    }

    /// Runs a pending layout request.
    pub fn process(&mut self, request: LayoutRequest) -> Result<(), TreeError> {
        match request {
            LayoutRequest::AllRoots => {
                self.apply_layout(None)?;
            }
            LayoutRequest::Subtree(root) => {
                self.apply_layout(Some(&root))?;
            }
        }
        Ok(())
    }

    /// Replaces the whole document with a serialized one.
    ///
    /// The document is parsed and validated before anything is written; on
    /// failure the current tree stays untouched. On success every root is
    /// laid out again.
    pub fn load_tree(&mut self, serialized: &str) -> Result<(), TreeError> {
        let nodes: NodeMap = serde_json::from_str(serialized)?;
        if let Err(err) = validate(&nodes, &self.catalog) {
            tracing::warn!(target: TRACING_TARGET, error = %err, "tree document rejected");
            return Err(err.into());
        }

        self.nodes = nodes;
        if self
            .selected
            .as_ref()
            .is_some_and(|id| !self.nodes.contains_key(id))
        {
            self.selected = None;
        }

        tracing::info!(target: TRACING_TARGET, nodes = self.nodes.len(), "tree document loaded");
        self.apply_layout(None)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(&self.nodes)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(&self.nodes)?)
    }

    /// Toggles the selection: selecting the selected node clears it.
    pub fn select_node(&mut self, id: &NodeId) -> Result<Option<&NodeId>, TreeError> {
        self.node(id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.clone());
        }
        Ok(self.selected.as_ref())
    }

    pub fn selected_id(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_ref().and_then(|id| self.nodes.get(id))
    }
}
