//! Legend descriptors and the pure steps that turn one into an overlay:
//! visibility policy, layout and lookup-table preparation.

pub mod actor;
pub mod descriptor;
pub mod layout;
pub mod lookup_table;
pub mod visibility;

pub use actor::{BarOrientation, OverlayActor, TextPosition};
pub use descriptor::{
    Justification, LegendDescriptor, Orientation, TextProperties,
};
pub use layout::{compute_layout, LegendLayout};
pub use lookup_table::{
    build_legend_table, display_range, LabelMode, LegendTable,
};
pub use visibility::{
    evaluate, is_legend_visible, resolve_primary_display, HideReason,
    Visibility, VisibilityInput,
};
