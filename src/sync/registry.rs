//! Actor registry: one overlay actor per live legend descriptor.

use rustc_hash::FxHashMap;

use super::observer::ObserverSet;
use super::renderer::LegendRenderer;
use crate::legend::OverlayActor;
use crate::options::ActorOptions;
use crate::scene::{NodeId, SceneGraph};

/// Owns the overlay actors, keyed by descriptor ID, and the descriptor
/// subscriptions that go with them. Entries are created and destroyed only
/// by descriptor add/remove notifications.
#[derive(Debug, Clone)]
pub struct ActorRegistry {
    actors: FxHashMap<NodeId, OverlayActor>,
    observers: ObserverSet,
    style: ActorOptions,
}

impl ActorRegistry {
    /// Empty registry. New actors get `style`.
    #[must_use]
    pub fn new(style: ActorOptions) -> Self {
        Self {
            actors: FxHashMap::default(),
            observers: ObserverSet::new(),
            style,
        }
    }

    /// Register a descriptor: subscribe to it and create its actor.
    /// Returns `false` (and changes nothing) if it is already registered.
    pub fn on_descriptor_added(&mut self, id: &NodeId) -> bool {
        if self.actors.contains_key(id) {
            return false;
        }
        let _ = self.observers.observe(id.clone());
        let _ = self
            .actors
            .insert(id.clone(), OverlayActor::new(&self.style));
        log::debug!("created legend actor for {id}");
        true
    }

    /// Unregister a descriptor: unsubscribe, detach its actor from
    /// `renderer` and destroy it. No-op for unknown IDs.
    pub fn on_descriptor_removed(
        &mut self,
        id: &NodeId,
        renderer: &mut LegendRenderer,
    ) -> Option<OverlayActor> {
        let _ = self.observers.unobserve(id);
        let actor = self.actors.remove(id)?;
        let _ = renderer.detach(id);
        log::debug!("destroyed legend actor for {id}");
        Some(actor)
    }

    /// Actor of a descriptor. Never creates one.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&OverlayActor> {
        self.actors.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &NodeId) -> Option<&mut OverlayActor> {
        self.actors.get_mut(id)
    }

    /// Whether a descriptor is registered.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.actors.contains_key(id)
    }

    /// Whether modifications of `id` are acted on.
    #[must_use]
    pub fn is_observing(&self, id: &NodeId) -> bool {
        self.observers.is_observing(id)
    }

    /// Registered descriptor IDs, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.actors.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Registered IDs that still resolve to a descriptor in `scene`.
    ///
    /// A dangling entry (descriptor gone without a remove notification, as
    /// happens during bulk teardown) is logged and skipped but kept; only a
    /// remove notification deletes it.
    #[must_use]
    pub fn reconcile(&self, scene: &dyn SceneGraph) -> Vec<NodeId> {
        self.ids()
            .into_iter()
            .filter(|id| {
                let live = scene.legend(id).is_some();
                if !live {
                    log::warn!(
                        "color legend {id} is registered but no longer in the \
                         scene; skipping"
                    );
                }
                live
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::LegendDescriptor;
    use crate::options::RendererOptions;
    use crate::scene::Scene;

    fn registry() -> ActorRegistry {
        ActorRegistry::new(ActorOptions::default())
    }

    #[test]
    fn add_is_idempotent_and_subscribes() {
        let mut reg = registry();
        let id = NodeId::from("legend");
        assert!(reg.on_descriptor_added(&id));
        assert!(!reg.on_descriptor_added(&id));
        assert_eq!(reg.len(), 1);
        assert!(reg.is_observing(&id));
        assert_eq!(reg.get(&id).map(|a| a.bar_ratio), Some(0.2));
    }

    #[test]
    fn remove_detaches_and_unsubscribes() {
        let mut reg = registry();
        let mut renderer = LegendRenderer::new(&RendererOptions::default());
        let id = NodeId::from("legend");
        let _ = reg.on_descriptor_added(&id);
        let _ = renderer.attach(id.clone());
        assert!(reg.on_descriptor_removed(&id, &mut renderer).is_some());
        assert!(!renderer.has_actor(&id));
        assert!(!reg.is_observing(&id));
        assert!(reg.get(&id).is_none());
        assert!(reg.on_descriptor_removed(&id, &mut renderer).is_none());
    }

    #[test]
    fn lookup_never_creates() {
        let reg = registry();
        assert!(reg.get(&"missing".into()).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn reconcile_skips_but_keeps_dangling_entries() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut scene = Scene::new();
        let kept = scene
            .add_node(LegendDescriptor::new("kept", "model"))
            .unwrap();
        let gone = scene
            .add_node(LegendDescriptor::new("gone", "model"))
            .unwrap();
        let mut reg = registry();
        let _ = reg.on_descriptor_added(&kept);
        let _ = reg.on_descriptor_added(&gone);
        let _ = scene.detach_node(&gone);
        assert_eq!(reg.reconcile(&scene), vec![kept]);
        assert!(reg.contains(&gone));
    }
}
