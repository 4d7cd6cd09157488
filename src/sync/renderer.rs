//! Overlay layer holding the attached legend actors, and the coalesced
//! render-request signal.

use rustc_hash::FxHashSet;

use crate::error::LegendError;
use crate::options::RendererOptions;
use crate::scene::NodeId;

// ---------------------------------------------------------------------------
// Render window seam
// ---------------------------------------------------------------------------

/// The host's render window, as far as the legend layer is concerned.
pub trait RenderWindow {
    /// Number of layers the window composites.
    fn number_of_layers(&self) -> u32;

    /// Grow (or shrink) the number of composited layers.
    fn set_number_of_layers(&mut self, layers: u32);

    /// Register an overlay renderer drawn on `layer`.
    fn add_overlay_renderer(&mut self, layer: u32, interactive: bool);
}

/// Window that only records what was asked of it. Useful for hosts that
/// composite overlays themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    /// Composited layer count.
    pub layers: u32,
    /// `(layer, interactive)` of every registered overlay renderer.
    pub overlays: Vec<(u32, bool)>,
}

impl HeadlessWindow {
    /// Window with only the base content layer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: 1,
            overlays: Vec::new(),
        }
    }
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderWindow for HeadlessWindow {
    fn number_of_layers(&self) -> u32 {
        self.layers
    }

    fn set_number_of_layers(&mut self, layers: u32) {
        self.layers = layers;
    }

    fn add_overlay_renderer(&mut self, layer: u32, interactive: bool) {
        self.overlays.push((layer, interactive));
    }
}

// ---------------------------------------------------------------------------
// LegendRenderer
// ---------------------------------------------------------------------------

/// Legend layer of one view. Tracks which actors are attached; an actor is
/// attached exactly while its last computed visibility is true.
#[derive(Debug, Clone)]
pub struct LegendRenderer {
    layer: u32,
    interactive: bool,
    attached: FxHashSet<NodeId>,
    installed: bool,
}

impl LegendRenderer {
    /// Layer described by `options`, not yet installed in a window.
    #[must_use]
    pub fn new(options: &RendererOptions) -> Self {
        Self {
            layer: options.layer,
            interactive: options.interactive,
            attached: FxHashSet::default(),
            installed: false,
        }
    }

    /// Install the layer in `window`, growing its layer count so the legend
    /// layer exists. Installing an already installed layer does nothing.
    ///
    /// # Errors
    ///
    /// [`LegendError::MissingRenderer`] when there is no window.
    pub fn install(
        &mut self,
        window: Option<&mut dyn RenderWindow>,
    ) -> Result<(), LegendError> {
        if self.installed {
            return Ok(());
        }
        let window = window.ok_or(LegendError::MissingRenderer)?;
        if window.number_of_layers() < self.layer + 1 {
            window.set_number_of_layers(self.layer + 1);
        }
        window.add_overlay_renderer(self.layer, self.interactive);
        self.installed = true;
        log::debug!("legend layer installed on layer {}", self.layer);
        Ok(())
    }

    /// Whether [`LegendRenderer::install`] succeeded.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Layer index.
    #[must_use]
    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Attach an actor. Returns `false` if it was already attached.
    pub fn attach(&mut self, id: NodeId) -> bool {
        self.attached.insert(id)
    }

    /// Detach an actor. Returns `false` if it was not attached.
    pub fn detach(&mut self, id: &NodeId) -> bool {
        self.attached.remove(id)
    }

    /// Whether an actor is attached.
    #[must_use]
    pub fn has_actor(&self, id: &NodeId) -> bool {
        self.attached.contains(id)
    }

    /// Attached actor IDs, sorted.
    #[must_use]
    pub fn attached_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.attached.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of attached actors.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }
}

// ---------------------------------------------------------------------------
// Render requests
// ---------------------------------------------------------------------------

/// Consumer of render requests, usually the view's redraw scheduler.
pub trait RenderScheduler {
    /// A redraw is wanted.
    fn schedule(&mut self);
}

impl<F: FnMut()> RenderScheduler for F {
    fn schedule(&mut self) {
        self();
    }
}

/// Coalesced "render requested" signal. The scheduler is called once per
/// pending period no matter how many requests arrive before the host takes
/// the request.
#[derive(Default)]
pub struct RenderSignal {
    pending: bool,
    emitted: u64,
    scheduler: Option<Box<dyn RenderScheduler>>,
}

impl std::fmt::Debug for RenderSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSignal")
            .field("pending", &self.pending)
            .field("emitted", &self.emitted)
            .field("scheduler", &self.scheduler.is_some())
            .finish()
    }
}

impl RenderSignal {
    /// Replace the scheduler.
    pub fn set_scheduler(&mut self, scheduler: Box<dyn RenderScheduler>) {
        self.scheduler = Some(scheduler);
    }

    /// Request a render. No-op while a request is already pending.
    pub fn request(&mut self) {
        if self.pending {
            return;
        }
        self.pending = true;
        self.emitted += 1;
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.schedule();
        }
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Whether a request is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of signals emitted so far (coalesced requests count once).
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn install_grows_layer_count() {
        let mut window = HeadlessWindow::new();
        let mut renderer = LegendRenderer::new(&RendererOptions::default());
        renderer.install(Some(&mut window)).unwrap();
        assert_eq!(window.layers, 2);
        assert_eq!(window.overlays, vec![(1, false)]);
        assert!(renderer.is_installed());
    }

    #[test]
    fn second_install_registers_nothing() {
        let mut window = HeadlessWindow::new();
        let mut renderer = LegendRenderer::new(&RendererOptions::default());
        renderer.install(Some(&mut window)).unwrap();
        renderer.install(Some(&mut window)).unwrap();
        assert_eq!(window.overlays, vec![(1, false)]);
    }

    #[test]
    fn install_keeps_larger_layer_count() {
        let mut window = HeadlessWindow {
            layers: 4,
            overlays: Vec::new(),
        };
        let mut renderer = LegendRenderer::new(&RendererOptions::default());
        renderer.install(Some(&mut window)).unwrap();
        assert_eq!(window.layers, 4);
    }

    #[test]
    fn install_without_window_fails() {
        let mut renderer = LegendRenderer::new(&RendererOptions::default());
        assert!(matches!(
            renderer.install(None),
            Err(LegendError::MissingRenderer)
        ));
        assert!(!renderer.is_installed());
    }

    #[test]
    fn attached_ids_are_sorted() {
        let mut renderer = LegendRenderer::new(&RendererOptions::default());
        assert!(renderer.attach("b".into()));
        assert!(renderer.attach("a".into()));
        assert!(!renderer.attach("a".into()));
        assert_eq!(
            renderer.attached_ids(),
            vec![NodeId::from("a"), NodeId::from("b")]
        );
        assert!(renderer.detach(&"a".into()));
        assert_eq!(renderer.attached_count(), 1);
    }

    #[test]
    fn requests_coalesce_until_taken() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut signal = RenderSignal::default();
        signal.set_scheduler(Box::new(move || counter.set(counter.get() + 1)));
        signal.request();
        signal.request();
        assert_eq!(calls.get(), 1);
        assert!(signal.take());
        assert!(!signal.take());
        signal.request();
        assert_eq!(calls.get(), 2);
        assert_eq!(signal.emitted(), 2);
    }
}
