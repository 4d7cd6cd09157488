//! Scene collaborator: nodes, change notifications and lookup by ID.
//!
//! The legend engine never owns the scene. It reads it through the
//! [`SceneGraph`] trait and reacts to [`SceneEvent`]s delivered by the host.
//! [`Scene`] is the in-memory implementation used by hosts without their own
//! scene graph (and by the tests).

mod color;
mod display;
mod logic;
mod node;
mod view;

pub use color::{ColorNode, LookupTable};
pub use display::{
    DisplayKind, DisplayNode, DisplayableNode, ScalarRangeMode,
    ViewVisibility, WindowLevel,
};
pub use logic::{ApplicationLogic, SliceLogics};
pub use node::{Node, NodeId, NodeKind};
use rustc_hash::FxHashMap;
pub use view::{SliceCompositeNode, ViewKind, ViewNode};

use crate::error::LegendError;
use crate::legend::LegendDescriptor;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Notification emitted by the scene, delivered in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// A node was added.
    NodeAdded {
        /// Added node.
        id: NodeId,
        /// Its type tag.
        kind: NodeKind,
    },
    /// A node was removed. The node no longer resolves.
    NodeRemoved {
        /// Removed node.
        id: NodeId,
        /// Its type tag.
        kind: NodeKind,
    },
    /// A node's properties changed.
    NodeModified {
        /// Modified node.
        id: NodeId,
        /// Its type tag.
        kind: NodeKind,
    },
    /// A batch of scene operations started.
    StartBatchProcess,
    /// A batch of scene operations finished.
    EndBatchProcess,
    /// The scene is about to be cleared.
    StartClose,
    /// The scene was cleared.
    EndClose,
}

// ---------------------------------------------------------------------------
// SceneGraph
// ---------------------------------------------------------------------------

/// Read access to a scene by node ID.
pub trait SceneGraph {
    /// Look up any node.
    fn node(&self, id: &NodeId) -> Option<&Node>;

    /// Look up a color legend descriptor.
    fn legend(&self, id: &NodeId) -> Option<&LegendDescriptor> {
        self.node(id).and_then(Node::as_legend)
    }

    /// Look up a displayable node.
    fn displayable(&self, id: &NodeId) -> Option<&DisplayableNode> {
        self.node(id).and_then(Node::as_displayable)
    }

    /// Look up a display node.
    fn display(&self, id: &NodeId) -> Option<&DisplayNode> {
        self.node(id).and_then(Node::as_display)
    }

    /// Look up a color node.
    fn color(&self, id: &NodeId) -> Option<&ColorNode> {
        self.node(id).and_then(Node::as_color)
    }

    /// Look up a slice composite node.
    fn slice_composite(&self, id: &NodeId) -> Option<&SliceCompositeNode> {
        self.node(id).and_then(Node::as_slice_composite)
    }

    /// Look up a view node.
    fn view(&self, id: &NodeId) -> Option<&ViewNode> {
        self.node(id).and_then(Node::as_view)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// In-memory scene. Mutations queue [`SceneEvent`]s that the host drains
/// with [`Scene::drain_events`] and forwards to the legend engine.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: FxHashMap<NodeId, Node>,
    /// Node IDs in insertion order.
    order: Vec<NodeId>,
    events: Vec<SceneEvent>,
    batch_depth: u32,
    /// Monotonically increasing generation; bumped on any mutation.
    generation: u64,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Mutation counter.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -- Node management --

    /// Add a node and queue [`SceneEvent::NodeAdded`].
    ///
    /// # Errors
    ///
    /// [`LegendError::InvalidNode`] when the ID is empty or already taken.
    pub fn add_node(
        &mut self,
        node: impl Into<Node>,
    ) -> Result<NodeId, LegendError> {
        let node = node.into();
        let id = node.id().clone();
        if id.is_empty() || self.nodes.contains_key(&id) {
            return Err(LegendError::InvalidNode(id.to_string()));
        }
        let kind = node.kind();
        let _ = self.nodes.insert(id.clone(), node);
        self.order.push(id.clone());
        self.events.push(SceneEvent::NodeAdded {
            id: id.clone(),
            kind,
        });
        self.invalidate();
        Ok(id)
    }

    /// Remove a node and queue [`SceneEvent::NodeRemoved`].
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.detach_node(id)?;
        self.events.push(SceneEvent::NodeRemoved {
            id: id.clone(),
            kind: node.kind(),
        });
        Some(node)
    }

    /// Remove a node without notifying anyone. Models teardown paths whose
    /// notifications arrive late or never; observers must tolerate the
    /// resulting dangling references.
    pub fn detach_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        self.order.retain(|o| o != id);
        self.invalidate();
        Some(node)
    }

    /// Mutate a node in place and queue [`SceneEvent::NodeModified`].
    /// The closure must not change the node identifier. Returns `false`
    /// when the node does not exist.
    pub fn modify_node(
        &mut self,
        id: &NodeId,
        f: impl FnOnce(&mut Node),
    ) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        f(node);
        let kind = node.kind();
        self.events.push(SceneEvent::NodeModified {
            id: id.clone(),
            kind,
        });
        self.invalidate();
        true
    }

    /// Mutate a color legend descriptor. See [`Scene::modify_node`].
    pub fn modify_legend(
        &mut self,
        id: &NodeId,
        f: impl FnOnce(&mut LegendDescriptor),
    ) -> bool {
        self.legend(id).is_some()
            && self.modify_node(id, |node| {
                if let Node::ColorLegend(d) = node {
                    f(d);
                }
            })
    }

    /// Mutate a display node. See [`Scene::modify_node`].
    pub fn modify_display(
        &mut self,
        id: &NodeId,
        f: impl FnOnce(&mut DisplayNode),
    ) -> bool {
        self.display(id).is_some()
            && self.modify_node(id, |node| {
                if let Node::Display(d) = node {
                    f(d);
                }
            })
    }

    /// Mutate a slice composite node. See [`Scene::modify_node`].
    pub fn modify_slice_composite(
        &mut self,
        id: &NodeId,
        f: impl FnOnce(&mut SliceCompositeNode),
    ) -> bool {
        self.slice_composite(id).is_some()
            && self.modify_node(id, |node| {
                if let Node::SliceComposite(c) = node {
                    f(c);
                }
            })
    }

    // -- Batches --

    /// Begin a batch of operations. Nested batches are counted; only the
    /// outermost pair emits events.
    pub fn start_batch(&mut self) {
        if self.batch_depth == 0 {
            self.events.push(SceneEvent::StartBatchProcess);
        }
        self.batch_depth += 1;
    }

    /// End a batch of operations.
    pub fn end_batch(&mut self) {
        match self.batch_depth {
            0 => log::warn!("end_batch called without a matching start_batch"),
            1 => {
                self.batch_depth = 0;
                self.events.push(SceneEvent::EndBatchProcess);
            }
            _ => self.batch_depth -= 1,
        }
    }

    /// Whether a batch is in progress.
    #[must_use]
    pub fn is_batch_processing(&self) -> bool {
        self.batch_depth > 0
    }

    /// Remove every node, queueing `NodeRemoved` for each between
    /// `StartClose` and `EndClose`.
    pub fn close(&mut self) {
        self.events.push(SceneEvent::StartClose);
        for id in std::mem::take(&mut self.order) {
            if let Some(node) = self.nodes.remove(&id) {
                self.events.push(SceneEvent::NodeRemoved {
                    kind: node.kind(),
                    id,
                });
            }
        }
        self.nodes.clear();
        self.events.push(SceneEvent::EndClose);
        self.invalidate();
    }

    // -- Queries --

    /// Take all queued notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether notifications are waiting to be drained.
    #[must_use]
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Node IDs in insertion order.
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a node exists.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }
}

impl SceneGraph for Scene {
    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_modify_remove_emit_events_in_order() {
        let mut scene = Scene::new();
        let id = scene.add_node(DisplayableNode::new("model")).unwrap();
        assert!(scene.modify_node(&id, |_| {}));
        assert!(scene.remove_node(&id).is_some());
        let events = scene.drain_events();
        assert_eq!(
            events,
            vec![
                SceneEvent::NodeAdded {
                    id: id.clone(),
                    kind: NodeKind::Displayable
                },
                SceneEvent::NodeModified {
                    id: id.clone(),
                    kind: NodeKind::Displayable
                },
                SceneEvent::NodeRemoved {
                    id,
                    kind: NodeKind::Displayable
                },
            ]
        );
        assert!(!scene.has_pending_events());
    }

    #[test]
    fn rejects_duplicate_and_empty_ids() {
        let mut scene = Scene::new();
        let _ = scene.add_node(DisplayableNode::new("a")).unwrap();
        assert!(scene.add_node(DisplayableNode::new("a")).is_err());
        assert!(scene.add_node(DisplayableNode::new("")).is_err());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn detach_is_silent() {
        let mut scene = Scene::new();
        let id = scene.add_node(DisplayableNode::new("a")).unwrap();
        let _ = scene.drain_events();
        assert!(scene.detach_node(&id).is_some());
        assert!(scene.drain_events().is_empty());
        assert!(!scene.contains(&id));
    }

    #[test]
    fn nested_batches_emit_one_pair() {
        let mut scene = Scene::new();
        scene.start_batch();
        scene.start_batch();
        scene.end_batch();
        assert!(scene.is_batch_processing());
        scene.end_batch();
        assert_eq!(
            scene.drain_events(),
            vec![SceneEvent::StartBatchProcess, SceneEvent::EndBatchProcess]
        );
    }

    #[test]
    fn close_removes_everything() {
        let mut scene = Scene::new();
        let _ = scene.add_node(DisplayableNode::new("a")).unwrap();
        let _ = scene.add_node(ViewNode::slice("red")).unwrap();
        let _ = scene.drain_events();
        scene.close();
        let events = scene.drain_events();
        assert_eq!(events.first(), Some(&SceneEvent::StartClose));
        assert_eq!(events.last(), Some(&SceneEvent::EndClose));
        assert_eq!(events.len(), 4);
        assert!(scene.is_empty());
    }

    #[test]
    fn typed_modify_rejects_wrong_kind() {
        let mut scene = Scene::new();
        let id = scene.add_node(DisplayableNode::new("a")).unwrap();
        let _ = scene.drain_events();
        assert!(!scene.modify_display(&id, |_| {}));
        assert!(scene.drain_events().is_empty());
    }
}
