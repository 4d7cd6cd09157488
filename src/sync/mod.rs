//! Event synchronization controller.
//!
//! [`LegendSync`] keeps the overlay actors of one view consistent with the
//! scene. Descriptor and dependency modifications are handled synchronously
//! for the affected legends only; bulk scene operations (batch end, close,
//! view or slice composite changes) only mark a deferred full resync that
//! the next [`LegendSync::render`] pass performs once.
//!
//! Errors never escape an event handler: they are logged and the affected
//! overlay is hidden (or, for an unknown orientation, keeps its previous
//! layout).

mod observer;
mod registry;
mod renderer;

pub use observer::ObserverSet;
pub use registry::ActorRegistry;
pub use renderer::{
    HeadlessWindow, LegendRenderer, RenderScheduler, RenderSignal,
    RenderWindow,
};

use crate::error::LegendError;
use crate::legend::{
    build_legend_table, compute_layout, evaluate, resolve_primary_display,
    LegendDescriptor, OverlayActor, Visibility, VisibilityInput,
};
use crate::options::LegendOptions;
use crate::scene::{
    ApplicationLogic, NodeId, NodeKind, Scene, SceneEvent, SceneGraph,
    SliceLogics,
};

/// Outcome of one [`LegendSync::render`] pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// Whether the deferred full resync ran in this pass.
    pub resynced: bool,
    /// Whether a render request was pending.
    pub render_requested: bool,
    /// Actors attached to the legend layer after the pass, sorted.
    pub attached: Vec<NodeId>,
}

/// Color legend controller for one view.
#[derive(Debug)]
pub struct LegendSync<L: ApplicationLogic = SliceLogics> {
    options: LegendOptions,
    logic: L,
    view_id: Option<NodeId>,
    registry: ActorRegistry,
    renderer: LegendRenderer,
    /// Resolved slice composite of the view (slice views only).
    slice_composite: Option<NodeId>,
    composite_observer: ObserverSet,
    resync_pending: bool,
    resync_count: u64,
    render: RenderSignal,
    scene_attached: bool,
}

impl<L: ApplicationLogic> LegendSync<L> {
    /// Controller with no view and no scene.
    #[must_use]
    pub fn new(options: LegendOptions, logic: L) -> Self {
        Self {
            registry: ActorRegistry::new(options.actor.clone()),
            renderer: LegendRenderer::new(&options.renderer),
            options,
            logic,
            view_id: None,
            slice_composite: None,
            composite_observer: ObserverSet::new(),
            resync_pending: false,
            resync_count: 0,
            render: RenderSignal::default(),
            scene_attached: false,
        }
    }

    /// Builder form of [`LegendSync::set_view`] for a controller that is not
    /// yet attached to a scene.
    #[must_use]
    pub fn with_view(mut self, view_id: impl Into<NodeId>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }

    /// Route render requests to `scheduler`.
    pub fn set_render_scheduler(
        &mut self,
        scheduler: impl RenderScheduler + 'static,
    ) {
        self.render.set_scheduler(Box::new(scheduler));
    }

    /// Install the legend layer in `window`.
    ///
    /// # Errors
    ///
    /// [`LegendError::MissingRenderer`] when `window` is `None`.
    pub fn create(
        &mut self,
        window: Option<&mut dyn RenderWindow>,
    ) -> Result<(), LegendError> {
        self.renderer.install(window).inspect_err(|e| {
            log::error!("failed to create color legend layer: {e}");
        })
    }

    // -- Accessors --

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &LegendOptions {
        &self.options
    }

    /// Application logic used to resolve slice composites.
    #[must_use]
    pub fn logic(&self) -> &L {
        &self.logic
    }

    /// Mutable access to the application logic. Call
    /// [`LegendSync::update_from_scene`] afterwards so a changed binding is
    /// picked up.
    pub fn logic_mut(&mut self) -> &mut L {
        &mut self.logic
    }

    /// Managed view.
    #[must_use]
    pub fn view_id(&self) -> Option<&NodeId> {
        self.view_id.as_ref()
    }

    /// Resolved slice composite of the managed view.
    #[must_use]
    pub fn slice_composite(&self) -> Option<&NodeId> {
        self.slice_composite.as_ref()
    }

    /// Whether notifications of the slice composite `id` are acted on.
    #[must_use]
    pub fn is_observing_composite(&self, id: &NodeId) -> bool {
        self.composite_observer.is_observing(id)
    }

    /// The actor registry.
    #[must_use]
    pub fn registry(&self) -> &ActorRegistry {
        &self.registry
    }

    /// The legend layer.
    #[must_use]
    pub fn renderer(&self) -> &LegendRenderer {
        &self.renderer
    }

    /// Whether a full resync waits for the next render pass.
    #[must_use]
    pub fn is_resync_pending(&self) -> bool {
        self.resync_pending
    }

    /// Number of full resyncs performed.
    #[must_use]
    pub fn resync_count(&self) -> u64 {
        self.resync_count
    }

    /// Whether a render request waits to be consumed.
    #[must_use]
    pub fn is_render_requested(&self) -> bool {
        self.render.is_pending()
    }

    /// Number of render requests emitted (coalesced requests count once).
    #[must_use]
    pub fn render_requests(&self) -> u64 {
        self.render.emitted()
    }

    /// Whether a scene is attached.
    #[must_use]
    pub fn is_scene_attached(&self) -> bool {
        self.scene_attached
    }

    /// Actor of a descriptor; never creates one.
    #[must_use]
    pub fn actor(&self, descriptor_id: &NodeId) -> Option<&OverlayActor> {
        if descriptor_id.is_empty() {
            log::error!(
                "actor lookup failed: {}",
                LegendError::InvalidNode(String::new())
            );
            return None;
        }
        self.registry.get(descriptor_id)
    }

    /// Whether a descriptor's overlay is currently shown.
    #[must_use]
    pub fn is_shown(&self, descriptor_id: &NodeId) -> bool {
        self.renderer.has_actor(descriptor_id)
            && self.registry.get(descriptor_id).is_some_and(|a| a.visible)
    }

    // -- Scene lifecycle --

    /// Start observing `scene`: register the descriptors it already holds
    /// and resolve the view's slice composite.
    pub fn attach_scene(
        &mut self,
        scene: &dyn SceneGraph,
        legends: &[NodeId],
    ) {
        self.scene_attached = true;
        self.update_from_scene(scene);
        for id in legends {
            self.on_legend_added(scene, id);
        }
    }

    /// Convenience form of [`LegendSync::attach_scene`] for the in-memory
    /// [`Scene`].
    pub fn observe_scene(&mut self, scene: &Scene) {
        let legends: Vec<NodeId> = scene
            .nodes()
            .filter(|node| node.kind() == NodeKind::ColorLegend)
            .map(|node| node.id().clone())
            .collect();
        self.attach_scene(scene, &legends);
    }

    /// Stop observing the scene: destroy every actor and drop the slice
    /// composite reference.
    pub fn detach_scene(&mut self) {
        let mut destroyed = false;
        for id in self.registry.ids() {
            destroyed |= self
                .registry
                .on_descriptor_removed(&id, &mut self.renderer)
                .is_some();
        }
        if destroyed {
            self.render.request();
        }
        self.unobserve_scene();
        self.scene_attached = false;
    }

    /// Drop the slice composite reference and its subscription.
    pub fn unobserve_scene(&mut self) {
        let _ = self.set_slice_composite(None);
    }

    /// Change the managed view and re-resolve its slice composite.
    pub fn set_view(
        &mut self,
        scene: &dyn SceneGraph,
        view_id: Option<NodeId>,
    ) {
        if self.view_id == view_id {
            return;
        }
        self.view_id = view_id;
        self.mark_resync();
        self.update_from_scene(scene);
    }

    /// Re-resolve the slice composite of the managed view. A changed
    /// reference marks a full resync and requests a render.
    pub fn update_from_scene(&mut self, scene: &dyn SceneGraph) {
        let resolved = self.find_slice_composite(scene);
        if self.set_slice_composite(resolved) {
            log::debug!(
                "slice composite of view {:?} is now {:?}",
                self.view_id.as_ref().map(NodeId::as_str),
                self.slice_composite.as_ref().map(NodeId::as_str)
            );
        }
    }

    fn find_slice_composite(&self, scene: &dyn SceneGraph) -> Option<NodeId> {
        let view_id = self.view_id.as_ref()?;
        if !scene.view(view_id).is_some_and(|v| v.is_slice_view()) {
            return None;
        }
        self.logic
            .slice_composite_for_view(view_id)
            .filter(|id| scene.slice_composite(id).is_some())
    }

    /// Replace the slice composite reference, tearing down the old
    /// subscription first. Returns whether the identity changed.
    fn set_slice_composite(&mut self, composite: Option<NodeId>) -> bool {
        if self.slice_composite == composite {
            return false;
        }
        self.composite_observer.clear();
        if let Some(id) = &composite {
            let _ = self.composite_observer.observe(id.clone());
        }
        self.slice_composite = composite;
        self.mark_resync();
        self.render.request();
        true
    }

    fn mark_resync(&mut self) {
        self.resync_pending = true;
    }

    // -- Events --

    /// Drain and handle every queued notification of `scene`.
    pub fn process_events(&mut self, scene: &mut Scene) -> usize {
        let events = scene.drain_events();
        for event in &events {
            self.handle_event(&*scene, event);
        }
        events.len()
    }

    /// Handle one scene notification.
    pub fn handle_event(
        &mut self,
        scene: &dyn SceneGraph,
        event: &SceneEvent,
    ) {
        if !self.scene_attached {
            log::error!("dropping {event:?}: {}", LegendError::NoScene);
            return;
        }
        match event {
            SceneEvent::NodeAdded { id, kind } => {
                self.on_node_added(scene, id, *kind);
            }
            SceneEvent::NodeRemoved { id, kind } => {
                self.on_node_removed(scene, id, *kind);
            }
            SceneEvent::NodeModified { id, kind } => {
                self.on_node_modified(scene, id, *kind);
            }
            SceneEvent::EndBatchProcess | SceneEvent::EndClose => {
                self.update_from_scene(scene);
                self.mark_resync();
                self.render.request();
            }
            SceneEvent::StartBatchProcess | SceneEvent::StartClose => {}
        }
    }

    fn on_node_added(
        &mut self,
        scene: &dyn SceneGraph,
        id: &NodeId,
        kind: NodeKind,
    ) {
        match kind {
            NodeKind::ColorLegend => self.on_legend_added(scene, id),
            NodeKind::View | NodeKind::SliceComposite => {
                self.update_from_scene(scene);
            }
            _ => {}
        }
    }

    fn on_legend_added(&mut self, scene: &dyn SceneGraph, id: &NodeId) {
        if id.is_empty() || scene.legend(id).is_none() {
            log::error!(
                "cannot add color legend: {}",
                LegendError::InvalidNode(id.to_string())
            );
            return;
        }
        let _ = self.registry.on_descriptor_added(id);
        if self.update_legend(scene, id) {
            self.render.request();
        }
    }

    fn on_node_removed(
        &mut self,
        scene: &dyn SceneGraph,
        id: &NodeId,
        kind: NodeKind,
    ) {
        match kind {
            NodeKind::ColorLegend => {
                if id.is_empty() {
                    log::error!(
                        "cannot remove color legend: {}",
                        LegendError::InvalidNode(String::new())
                    );
                    return;
                }
                if self
                    .registry
                    .on_descriptor_removed(id, &mut self.renderer)
                    .is_some()
                {
                    self.render.request();
                }
            }
            NodeKind::View | NodeKind::SliceComposite => {
                self.update_from_scene(scene);
            }
            _ => {}
        }
    }

    fn on_node_modified(
        &mut self,
        scene: &dyn SceneGraph,
        id: &NodeId,
        kind: NodeKind,
    ) {
        match kind {
            NodeKind::ColorLegend if self.registry.is_observing(id) => {
                if self.update_legend(scene, id) {
                    self.render.request();
                }
            }
            NodeKind::SliceComposite
                if self.composite_observer.is_observing(id) =>
            {
                self.mark_resync();
                self.render.request();
            }
            NodeKind::Displayable | NodeKind::Display | NodeKind::Color => {
                log::debug!("{} node {id} modified", kind.label());
                self.on_dependency_modified(scene, id);
            }
            _ => {}
        }
    }

    /// Recompute the legends that draw from `id` (their displayable node,
    /// primary display node or its color node).
    fn on_dependency_modified(
        &mut self,
        scene: &dyn SceneGraph,
        id: &NodeId,
    ) {
        let mut changed = false;
        for legend_id in self.registry.ids() {
            let Some(descriptor) = scene.legend(&legend_id) else {
                continue;
            };
            if depends_on(scene, descriptor, id) {
                changed |= self.update_legend(scene, &legend_id);
            }
        }
        if changed {
            self.render.request();
        }
    }

    // -- Recompute --

    /// Recompute one legend. Returns whether its shown state or, while
    /// shown, its appearance changed.
    pub fn update_legend(
        &mut self,
        scene: &dyn SceneGraph,
        id: &NodeId,
    ) -> bool {
        let Some(descriptor) = scene.legend(id) else {
            log::warn!("color legend {id} no longer resolves; skipping update");
            return false;
        };
        let Some(previous) = self.registry.get(id) else {
            log::error!("no legend actor registered for {id}");
            return false;
        };
        let previous = previous.clone();
        let mut next = previous.clone();

        let show = match self.recompute(scene, descriptor, &mut next) {
            Ok(show) => show,
            Err(e) => {
                log::error!("color legend {id} hidden: {e}");
                false
            }
        };
        let was_shown = self.renderer.has_actor(id) && previous.visible;
        let shown = self.show_actor(id, &mut next, show);

        let changed = was_shown != shown || (shown && next != previous);
        if let Some(slot) = self.registry.get_mut(id) {
            *slot = next;
        }
        changed
    }

    /// Full resync: recompute every registered legend that still resolves.
    pub fn full_resync(&mut self, scene: &dyn SceneGraph) -> bool {
        let mut changed = false;
        for id in self.registry.reconcile(scene) {
            changed |= self.update_legend(scene, &id);
        }
        self.resync_pending = false;
        self.resync_count += 1;
        log::debug!(
            "color legend resync #{} over {} legends",
            self.resync_count,
            self.registry.len()
        );
        changed
    }

    /// Render pass: run the deferred resync if one is pending and consume
    /// the render request.
    pub fn render(&mut self, scene: &dyn SceneGraph) -> FrameReport {
        let resynced = self.resync_pending;
        if resynced {
            let _ = self.full_resync(scene);
        }
        FrameReport {
            resynced,
            render_requested: self.render.take(),
            attached: self.renderer.attached_ids(),
        }
    }

    /// Visibility policy plus appearance. `Ok(true)` means the actor should
    /// be shown.
    fn recompute(
        &self,
        scene: &dyn SceneGraph,
        descriptor: &LegendDescriptor,
        actor: &mut OverlayActor,
    ) -> Result<bool, LegendError> {
        let displayable = descriptor
            .displayable
            .as_ref()
            .and_then(|id| scene.displayable(id));
        let input = VisibilityInput {
            descriptor,
            displayable,
            primary: resolve_primary_display(scene, descriptor, displayable),
            slice_composite: self
                .slice_composite
                .as_ref()
                .and_then(|id| scene.slice_composite(id)),
            view_id: self.view_id.as_ref(),
        };
        let primary = match evaluate(&input) {
            Visibility::Shown { primary } => primary,
            Visibility::Hidden(reason) => {
                if let Some(err) = reason.as_error() {
                    return Err(err);
                }
                log::debug!("color legend {} hidden: {reason:?}", descriptor.id);
                return Ok(false);
            }
        };

        actor.title.clone_from(&descriptor.title);
        let justification = actor.title_text.justification;
        actor.title_text.clone_from(&descriptor.title_text);
        actor.title_text.justification = justification;
        actor.label_text.clone_from(&descriptor.label_text);
        actor.label_format.clone_from(&descriptor.label_format);

        match compute_layout(
            descriptor.orientation,
            descriptor.position,
            descriptor.size,
            self.options.actor.text_pad,
        ) {
            Ok(layout) => actor.apply_layout(&layout),
            Err(e) => log::error!(
                "color legend {}: {e}; keeping previous layout",
                descriptor.id
            ),
        }

        let color = primary.color_node.as_ref().and_then(|id| scene.color(id));
        let Some(table) = build_legend_table(
            primary,
            color,
            descriptor,
            &self.options.annotation,
        )?
        else {
            log::debug!(
                "color legend {} hidden: direct color mapping",
                descriptor.id
            );
            return Ok(false);
        };
        actor.apply_table(table);
        Ok(true)
    }

    /// Attach or detach an actor. Returns the resulting effective
    /// visibility.
    fn show_actor(
        &mut self,
        id: &NodeId,
        actor: &mut OverlayActor,
        show: bool,
    ) -> bool {
        let show = show && {
            let installed = self.renderer.is_installed();
            if !installed {
                log::error!(
                    "cannot show color legend {id}: {}",
                    LegendError::MissingRenderer
                );
            }
            installed
        };
        if show {
            let _ = self.renderer.attach(id.clone());
        } else {
            let _ = self.renderer.detach(id);
        }
        actor.visible = show;
        show
    }
}

/// Whether `descriptor` draws from node `id`.
fn depends_on(
    scene: &dyn SceneGraph,
    descriptor: &LegendDescriptor,
    id: &NodeId,
) -> bool {
    if descriptor.displayable.as_ref() == Some(id) {
        return true;
    }
    let displayable = descriptor
        .displayable
        .as_ref()
        .and_then(|d| scene.displayable(d));
    if displayable.is_some_and(|d| d.display_node_ids.contains(id)) {
        return true;
    }
    resolve_primary_display(scene, descriptor, displayable).is_some_and(
        |primary| primary.id == *id || primary.color_node.as_ref() == Some(id),
    )
}
