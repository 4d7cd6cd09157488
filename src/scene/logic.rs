use rustc_hash::FxHashMap;

use super::NodeId;

/// Application-logic collaborator that knows which slice composite node
/// drives each slice view.
pub trait ApplicationLogic {
    /// Slice composite node backing `view_id`, if the view has slice logic.
    fn slice_composite_for_view(&self, view_id: &NodeId) -> Option<NodeId>;
}

/// Table-backed [`ApplicationLogic`]: one slice logic entry per slice view.
#[derive(Debug, Clone, Default)]
pub struct SliceLogics {
    composites: FxHashMap<NodeId, NodeId>,
}

impl SliceLogics {
    /// No slice logics registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the composite node driving `view_id`.
    pub fn bind(
        &mut self,
        view_id: impl Into<NodeId>,
        composite: impl Into<NodeId>,
    ) {
        let _ = self.composites.insert(view_id.into(), composite.into());
    }

    /// Drop the slice logic of `view_id`.
    pub fn unbind(&mut self, view_id: &NodeId) {
        let _ = self.composites.remove(view_id);
    }
}

impl ApplicationLogic for SliceLogics {
    fn slice_composite_for_view(&self, view_id: &NodeId) -> Option<NodeId> {
        self.composites.get(view_id).cloned()
    }
}

/// Logic with no slice views at all (e.g. a 3D-only layout).
impl ApplicationLogic for () {
    fn slice_composite_for_view(&self, _view_id: &NodeId) -> Option<NodeId> {
        None
    }
}
