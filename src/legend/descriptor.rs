//! Color legend descriptor: the scene node that asks for a legend and
//! how it should look.

use serde::{Deserialize, Serialize};

use crate::scene::{NodeId, ViewVisibility};

/// Requested bar orientation.
///
/// Descriptors coming from external scenes may carry orientation codes this
/// engine does not know; those are kept as [`Orientation::Other`] so the
/// layout step can report them instead of silently picking a default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Bar runs left to right.
    Horizontal,
    /// Bar runs bottom to top.
    #[default]
    Vertical,
    /// Unrecognized orientation code.
    Other(i32),
}

impl Orientation {
    /// Decode a numeric orientation code (0 = horizontal, 1 = vertical).
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Horizontal,
            1 => Self::Vertical,
            other => Self::Other(other),
        }
    }

    /// Numeric orientation code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
            Self::Other(code) => code,
        }
    }
}

/// Horizontal text justification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Justification {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Centered,
    /// Flush right.
    Right,
}

/// Font and color of a legend text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProperties {
    /// Font family name.
    pub font_family: String,
    /// Font size in points.
    pub font_size: u32,
    /// RGB text color.
    pub color: [f32; 3],
    /// Text opacity in [0, 1].
    pub opacity: f32,
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
    /// Drop shadow behind the glyphs.
    pub shadow: bool,
    /// Horizontal justification.
    pub justification: Justification,
}

impl Default for TextProperties {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_owned(),
            font_size: 12,
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            bold: false,
            italic: false,
            shadow: true,
            justification: Justification::Left,
        }
    }
}

impl TextProperties {
    /// Default title style (bold).
    #[must_use]
    pub fn title() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }
}

/// Scene entity declaring how a color legend should look and which
/// displayable node it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendDescriptor {
    /// Node identifier.
    pub id: NodeId,
    /// Displayable node the legend describes.
    #[serde(default)]
    pub displayable: Option<NodeId>,
    /// Explicit primary display node. When absent the first non-legend
    /// display node of the displayable node is used.
    #[serde(default)]
    pub primary_display: Option<NodeId>,
    /// Per-view visibility of the legend itself.
    #[serde(default)]
    pub visibility: ViewVisibility,
    /// Title shown above (or beside) the bar.
    #[serde(default)]
    pub title: String,
    /// Title text style.
    #[serde(default = "TextProperties::title")]
    pub title_text: TextProperties,
    /// Label text style.
    #[serde(default)]
    pub label_text: TextProperties,
    /// printf-style format for numeric labels.
    #[serde(default = "LegendDescriptor::default_label_format")]
    pub label_format: String,
    /// Bar orientation.
    #[serde(default)]
    pub orientation: Orientation,
    /// Normalized position of the legend in the view, `[x, y]` in [0, 1].
    #[serde(default = "LegendDescriptor::default_position")]
    pub position: [f64; 2],
    /// Normalized size of the legend, `[width, height]` in [0, 1].
    #[serde(default = "LegendDescriptor::default_size")]
    pub size: [f64; 2],
    /// Number of numeric labels.
    #[serde(default = "LegendDescriptor::default_number_of_labels")]
    pub number_of_labels: u32,
    /// Maximum number of color swatches.
    #[serde(default = "LegendDescriptor::default_max_colors")]
    pub max_colors: u32,
    /// Label the bar with color names instead of numbers.
    #[serde(default)]
    pub use_color_names_for_labels: bool,
}

impl LegendDescriptor {
    fn default_label_format() -> String {
        "%.1f".to_owned()
    }

    const fn default_position() -> [f64; 2] {
        [0.95, 0.5]
    }

    const fn default_size() -> [f64; 2] {
        [0.15, 0.5]
    }

    const fn default_number_of_labels() -> u32 {
        5
    }

    const fn default_max_colors() -> u32 {
        256
    }

    /// Legend for `displayable` with default appearance.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, displayable: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            displayable: Some(displayable.into()),
            primary_display: None,
            visibility: ViewVisibility::default(),
            title: String::new(),
            title_text: TextProperties::title(),
            label_text: TextProperties::default(),
            label_format: Self::default_label_format(),
            orientation: Orientation::default(),
            position: Self::default_position(),
            size: Self::default_size(),
            number_of_labels: Self::default_number_of_labels(),
            max_colors: Self::default_max_colors(),
            use_color_names_for_labels: false,
        }
    }

    /// Set the explicit primary display node.
    #[must_use]
    pub fn with_primary_display(mut self, id: impl Into<NodeId>) -> Self {
        self.primary_display = Some(id.into());
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set orientation, position and size in one go.
    #[must_use]
    pub fn with_placement(
        mut self,
        orientation: Orientation,
        position: [f64; 2],
        size: [f64; 2],
    ) -> Self {
        self.orientation = orientation;
        self.position = position;
        self.size = size;
        self
    }

    /// Label with color names.
    #[must_use]
    pub fn with_color_names(mut self) -> Self {
        self.use_color_names_for_labels = true;
        self
    }

    /// Set the per-view visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: ViewVisibility) -> Self {
        self.visibility = visibility;
        self
    }
}
