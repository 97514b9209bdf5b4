//! Arena-backed scene tree
//!
//! Nodes are stored in a slot map and linked by [`NodeId`]. Parent links are
//! only ever read (to fetch the parent's world matrix); ownership is the arena's.
//!
//! Traversals are iterative pre-order walks with an explicit stack, so a
//! parent is always visited before its children and deep trees cannot
//! overflow the call stack.

use std::collections::HashMap;

use crate::foundation::collections::{NodeId, SlotMap};
use crate::foundation::math::Mat4;
use crate::render::{RenderBackend, RenderError, ShaderPayload};
use crate::scene::culling::Frustum;
use crate::scene::node::SceneNode;
use crate::scene::resources::SceneResources;
use crate::scene::SceneError;

/// Counters from one render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Nodes walked
    pub nodes_visited: usize,
    /// Models whose draw completed
    pub models_drawn: usize,
    /// Indexed draws issued
    pub draw_calls: usize,
    /// Models skipped by the frustum test
    pub culled: usize,
}

/// Tree of [`SceneNode`]s with unique names
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    names: HashMap<String, NodeId>,
}

impl SceneGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes, attached or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Add a detached node.
    ///
    /// Its world matrix is computed from its own transform so it is valid even
    /// before the node is attached anywhere.
    pub fn insert(&mut self, mut node: SceneNode) -> Result<NodeId, SceneError> {
        if self.names.contains_key(node.name()) {
            return Err(SceneError::DuplicateName(node.name().to_owned()));
        }
        node.parent = None;
        node.children.clear();
        node.transform.update_global_matrix(&Mat4::identity());

        let name = node.name().to_owned();
        let id = self.nodes.insert(node);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Attach a detached `child` as the last child of `parent`.
    ///
    /// The child's subtree is brought up to date with the parent's current
    /// world matrix before returning. Children that already have a parent and
    /// attachments that would close a loop are rejected.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let child_node = self.nodes.get(child).ok_or(SceneError::NodeNotFound(child))?;
        let parent_node = self.nodes.get(parent).ok_or(SceneError::NodeNotFound(parent))?;

        if child_node.parent.is_some() {
            return Err(SceneError::AlreadyAttached(child_node.name().to_owned()));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCreateCycle {
                parent: parent_node.name().to_owned(),
                child: child_node.name().to_owned(),
            });
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        self.update_transform(child)
    }

    /// Whether `ancestor` lies on the parent chain of `id`
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.nodes.get(id).and_then(|node| node.parent);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(node_id).and_then(|node| node.parent);
        }
        false
    }

    /// Topmost ancestor of `id` (itself when detached)
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let node = self.nodes.get(current)?;
            match node.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// Recompute world matrices for `id` and everything below it, parents first.
    ///
    /// `id`'s parent matrix is taken as-is, so it must already be current.
    pub fn update_transform(&mut self, id: NodeId) -> Result<(), SceneError> {
        let start = self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))?;
        let parent_global = start
            .parent
            .and_then(|parent| self.nodes.get(parent))
            .map_or_else(Mat4::identity, |parent| *parent.transform.global_matrix());

        let mut stack = vec![(id, parent_global)];
        while let Some((current, parent_global)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current) else {
                continue;
            };
            node.transform.update_global_matrix(&parent_global);
            let global = *node.transform.global_matrix();
            stack.extend(node.children.iter().rev().map(|&child| (child, global)));
        }
        Ok(())
    }

    /// Draw every model in the tree under `root`, pre-order.
    ///
    /// With a frustum, each model's bounding sphere is tested against it and
    /// the node's culled flag is written; a culled node's children are still
    /// visited. Without one, everything is drawn. The first failed draw aborts
    /// the pass and is returned.
    pub fn render(
        &mut self,
        root: NodeId,
        resources: &SceneResources,
        backend: &mut dyn RenderBackend,
        payload: &mut ShaderPayload,
        frustum: Option<&Frustum>,
    ) -> Result<RenderStats, RenderError> {
        if !self.nodes.contains_key(root) {
            return Err(RenderError::MissingResource(format!("Render root {root:?} does not exist")));
        }

        let mut stats = RenderStats::default();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            stats.nodes_visited += 1;

            if let Some(model_id) = node.model {
                let model = resources.model(model_id).ok_or_else(|| {
                    RenderError::MissingResource(format!("Node '{}' references a missing model", node.name()))
                })?;
                let world = *node.transform.global_matrix();
                let visible = frustum.map_or(true, |frustum| model.bounding_sphere().is_on_frustum(frustum, &world));
                node.culled = !visible;

                if visible {
                    let material = resources.material(model.material()).ok_or_else(|| {
                        RenderError::MissingResource(format!("Model '{}' references a missing material", model.name()))
                    })?;
                    if let Err(err) = model.draw(backend, material, payload, &world) {
                        log::debug!("Render pass aborted at node '{}': {}", node.name(), err);
                        return Err(err);
                    }
                    stats.models_drawn += 1;
                    stats.draw_calls += model.meshes().len();
                    log::trace!("Drew '{}' at node '{}'", model.name(), node.name());
                } else {
                    stats.culled += 1;
                    log::trace!("Culled node '{}'", node.name());
                }
            }

            stack.extend(node.children.iter().rev().copied());
        }
        Ok(stats)
    }

    /// Node by key
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Mutable node by key
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Node key by unique name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Parent of `id`
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(SceneNode::parent)
    }

    /// Children of `id`; empty for missing nodes
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[] as &[NodeId], SceneNode::children)
    }

    /// Pre-order walk of the subtree at `root`
    #[must_use]
    pub fn depth_first(&self, root: NodeId) -> DepthFirst<'_> {
        let stack = if self.nodes.contains_key(root) { vec![root] } else { Vec::new() };
        DepthFirst { graph: self, stack }
    }

    /// Detach `id` from its parent and delete it with all its descendants.
    ///
    /// Returns the removed nodes in pre-order.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<Vec<SceneNode>, SceneError> {
        let parent = self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))?.parent;
        if let Some(parent_node) = parent.and_then(|parent| self.nodes.get_mut(parent)) {
            parent_node.children.retain(|&child| child != id);
        }

        let doomed: Vec<NodeId> = self.depth_first(id).collect();
        let mut removed = Vec::with_capacity(doomed.len());
        for node_id in doomed {
            if let Some(node) = self.nodes.remove(node_id) {
                self.names.remove(node.name());
                removed.push(node);
            }
        }
        log::debug!("Removed {} nodes", removed.len());
        Ok(removed)
    }
}

/// Iterator returned by [`SceneGraph::depth_first`]
#[derive(Debug)]
pub struct DepthFirst<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(node) = self.graph.nodes.get(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}
