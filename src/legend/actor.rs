//! Renderable overlay owned by the legend engine, one per descriptor.

use glam::DVec2;

use super::descriptor::TextProperties;
use super::layout::LegendLayout;
use super::lookup_table::{LabelMode, LegendTable};
use crate::options::ActorOptions;
use crate::scene::LookupTable;

/// Resolved bar orientation of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarOrientation {
    /// Bar runs left to right.
    Horizontal,
    /// Bar runs bottom to top.
    #[default]
    Vertical,
}

/// Which side of the bar the labels are drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextPosition {
    /// Labels after the bar (right of a vertical bar, above a horizontal
    /// one).
    #[default]
    SucceedBar,
    /// Labels before the bar.
    PrecedeBar,
}

/// Scalar bar overlay. Attached to the legend layer only while its last
/// computed visibility is true.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct OverlayActor {
    /// Title text.
    pub title: String,
    /// Title style. Justification is owned by the layout.
    pub title_text: TextProperties,
    /// Label style.
    pub label_text: TextProperties,
    /// printf-style numeric label format.
    pub label_format: String,
    /// Bar orientation.
    pub orientation: BarOrientation,
    /// Normalized lower-left anchor.
    pub position: DVec2,
    /// Normalized width.
    pub width: f64,
    /// Normalized height.
    pub height: f64,
    /// Label side.
    pub text_position: TextPosition,
    /// Gap between bar and labels; negative when labels precede the bar.
    pub text_pad: f64,
    /// Private copy of the color table, ranged for this legend.
    pub lookup_table: Option<LookupTable>,
    /// Number of labels drawn.
    pub number_of_labels: u32,
    /// Maximum number of swatches drawn.
    pub max_colors: u32,
    /// Draw table annotations instead of numbers.
    pub use_annotation_as_label: bool,
    /// Center labels on their swatch.
    pub center_label: bool,
    /// Bar thickness relative to the legend extent.
    pub bar_ratio: f64,
    /// Let font size follow the text properties instead of the bar size.
    pub unconstrained_font_size: bool,
    /// Visibility flag. Effective visibility also requires attachment.
    pub visible: bool,
}

impl OverlayActor {
    /// Fresh, hidden actor with the fixed default styling.
    #[must_use]
    pub fn new(style: &ActorOptions) -> Self {
        Self {
            title: String::new(),
            title_text: TextProperties::title(),
            label_text: TextProperties::default(),
            label_format: String::new(),
            orientation: BarOrientation::Vertical,
            position: DVec2::ZERO,
            width: 0.0,
            height: 0.0,
            text_position: TextPosition::SucceedBar,
            text_pad: 0.0,
            lookup_table: None,
            number_of_labels: 0,
            max_colors: 0,
            use_annotation_as_label: false,
            center_label: false,
            bar_ratio: style.bar_ratio,
            unconstrained_font_size: style.unconstrained_font_size,
            visible: false,
        }
    }

    /// Apply computed geometry and text placement.
    pub fn apply_layout(&mut self, layout: &LegendLayout) {
        self.orientation = layout.orientation;
        self.position = layout.position;
        self.width = layout.width;
        self.height = layout.height;
        self.text_position = layout.text_position;
        self.text_pad = layout.text_pad;
        self.title_text.justification = layout.title_justification;
    }

    /// Install a prepared color table and its label policy.
    pub fn apply_table(&mut self, table: LegendTable) {
        match table.labels {
            LabelMode::ColorNames {
                number_of_labels,
                max_colors,
            } => {
                self.number_of_labels = number_of_labels;
                self.max_colors = max_colors;
                self.use_annotation_as_label = true;
                self.center_label = true;
            }
            LabelMode::Numeric {
                number_of_labels,
                max_colors,
            } => {
                self.number_of_labels = number_of_labels;
                self.max_colors = max_colors;
                self.use_annotation_as_label = false;
                self.center_label = false;
            }
        }
        self.lookup_table = Some(table.table);
    }
}
