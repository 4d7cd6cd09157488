// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Color legend overlays kept in sync with a medical-imaging scene graph.
//!
//! Every color legend descriptor in the scene gets one overlay actor per
//! view. The engine listens to scene notifications, decides whether each
//! legend is visible in its view, lays it out and prepares a private,
//! ranged copy of the color table it shows.
//!
//! # Key entry points
//!
//! - [`sync::LegendSync`] - the per-view controller fed with scene events
//! - [`scene::Scene`] - in-memory scene graph emitting [`scene::SceneEvent`]s
//! - [`legend::LegendDescriptor`] - declared legend appearance
//! - [`options::LegendOptions`] - layer placement and actor styling, with
//!   TOML presets
//!
//! # Architecture
//!
//! Notifications flow one way: scene events reach the controller, which
//! creates and destroys actors through the [`sync::ActorRegistry`] and runs
//! the pure [`legend`] steps (visibility, layout, lookup table) to
//! recompute them. Bulk operations only mark a deferred resync that the
//! next [`sync::LegendSync::render`] pass performs once; render requests
//! are coalesced into a single signal for the host's redraw scheduler.

pub mod error;
pub mod legend;
pub mod options;
pub mod scene;
pub mod sync;

pub use error::LegendError;
pub use legend::{LegendDescriptor, OverlayActor};
pub use options::LegendOptions;
pub use scene::{Scene, SceneEvent, SceneGraph};
pub use sync::{FrameReport, LegendSync};
