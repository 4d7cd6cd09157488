//! Subscription bookkeeping for node modification notifications.

use rustc_hash::FxHashSet;

use crate::scene::NodeId;

/// Set of nodes whose `NodeModified` notifications are acted on.
///
/// Notifications for nodes outside the set are dropped by the controller,
/// so observing is explicit and paired with an unobserve on teardown.
#[derive(Debug, Clone, Default)]
pub struct ObserverSet {
    observed: FxHashSet<NodeId>,
}

impl ObserverSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `id`. Returns `false` if it was already observed.
    pub fn observe(&mut self, id: NodeId) -> bool {
        self.observed.insert(id)
    }

    /// Stop observing `id`. Returns `false` if it was not observed.
    pub fn unobserve(&mut self, id: &NodeId) -> bool {
        self.observed.remove(id)
    }

    /// Whether `id` is observed.
    #[must_use]
    pub fn is_observing(&self, id: &NodeId) -> bool {
        self.observed.contains(id)
    }

    /// Number of observed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// Whether nothing is observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Drop every subscription.
    pub fn clear(&mut self) {
        self.observed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_is_idempotent() {
        let mut set = ObserverSet::new();
        assert!(set.observe("a".into()));
        assert!(!set.observe("a".into()));
        assert_eq!(set.len(), 1);
        assert!(set.unobserve(&"a".into()));
        assert!(!set.unobserve(&"a".into()));
        assert!(set.is_empty());
    }
}
