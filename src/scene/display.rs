use serde::{Deserialize, Serialize};

use super::NodeId;

// ---------------------------------------------------------------------------
// Per-view visibility
// ---------------------------------------------------------------------------

/// Global visibility plus an optional restriction to a set of views.
///
/// An empty `view_ids` list means "all views".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewVisibility {
    /// Global on/off switch.
    pub visible: bool,
    /// Views the node is restricted to. Empty = every view.
    pub view_ids: Vec<NodeId>,
}

impl Default for ViewVisibility {
    fn default() -> Self {
        Self {
            visible: true,
            view_ids: Vec::new(),
        }
    }
}

impl ViewVisibility {
    /// Visible everywhere.
    #[must_use]
    pub fn shown() -> Self {
        Self::default()
    }

    /// Hidden everywhere.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            view_ids: Vec::new(),
        }
    }

    /// Visible only in the listed views.
    #[must_use]
    pub fn only_in(views: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            visible: true,
            view_ids: views.into_iter().collect(),
        }
    }

    /// Whether the node is visible in `view_id`.
    #[must_use]
    pub fn is_visible_in(&self, view_id: &NodeId) -> bool {
        self.visible
            && (self.view_ids.is_empty() || self.view_ids.contains(view_id))
    }
}

// ---------------------------------------------------------------------------
// Display node
// ---------------------------------------------------------------------------

/// How a display node maps its scalars to colors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScalarRangeMode {
    /// Range set explicitly on the display node.
    #[default]
    Manual,
    /// Range taken from the data.
    Data,
    /// Range taken from the color table.
    ColorTable,
    /// Range of the scalar data type.
    DataType,
    /// Scalars are RGB colors; no lookup table is involved.
    DirectMapping,
}

/// Window/level pair of a scalar volume display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowLevel {
    /// Width of the displayed intensity window.
    pub window: f64,
    /// Center of the displayed intensity window.
    pub level: f64,
}

impl WindowLevel {
    /// Displayed scalar range: `[level - window/2, level + window/2]`.
    #[must_use]
    pub fn range(&self) -> [f64; 2] {
        let half = self.window / 2.0;
        [self.level - half, self.level + half]
    }
}

/// Kind-specific part of a display node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
    /// Voxel data. Scalar volumes carry a window/level; label maps do not.
    Volumetric {
        /// Window/level of a scalar volume display, if any.
        window_level: Option<WindowLevel>,
    },
    /// Models, markups and everything else.
    #[default]
    Generic,
}

/// Appearance of a displayable node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayNode {
    /// Node identifier.
    pub id: NodeId,
    /// Owning displayable node (the volume for volumetric displays).
    #[serde(default)]
    pub displayable: Option<NodeId>,
    /// Per-view visibility.
    #[serde(default)]
    pub visibility: ViewVisibility,
    /// Color table used to render the scalars.
    #[serde(default)]
    pub color_node: Option<NodeId>,
    /// Scalar range reported by the node.
    #[serde(default)]
    pub scalar_range: [f64; 2],
    /// How the scalar range is determined.
    #[serde(default)]
    pub scalar_range_mode: ScalarRangeMode,
    /// Volumetric or generic.
    #[serde(default)]
    pub kind: DisplayKind,
}

impl DisplayNode {
    /// Generic (model/markups) display node, visible everywhere.
    #[must_use]
    pub fn generic(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            displayable: None,
            visibility: ViewVisibility::default(),
            color_node: None,
            scalar_range: [0.0, 100.0],
            scalar_range_mode: ScalarRangeMode::default(),
            kind: DisplayKind::Generic,
        }
    }

    /// Scalar volume display node using window/level.
    #[must_use]
    pub fn scalar_volume(
        id: impl Into<NodeId>,
        volume: impl Into<NodeId>,
        window_level: WindowLevel,
    ) -> Self {
        Self {
            displayable: Some(volume.into()),
            kind: DisplayKind::Volumetric {
                window_level: Some(window_level),
            },
            ..Self::generic(id)
        }
    }

    /// Label map volume display node (no window/level).
    #[must_use]
    pub fn label_map(id: impl Into<NodeId>, volume: impl Into<NodeId>) -> Self {
        Self {
            displayable: Some(volume.into()),
            kind: DisplayKind::Volumetric { window_level: None },
            ..Self::generic(id)
        }
    }

    /// Set the color table.
    #[must_use]
    pub fn with_color_node(mut self, color: impl Into<NodeId>) -> Self {
        self.color_node = Some(color.into());
        self
    }

    /// Set the owning displayable node.
    #[must_use]
    pub fn with_displayable(mut self, displayable: impl Into<NodeId>) -> Self {
        self.displayable = Some(displayable.into());
        self
    }

    /// Set the reported scalar range.
    #[must_use]
    pub fn with_scalar_range(mut self, range: [f64; 2]) -> Self {
        self.scalar_range = range;
        self
    }

    /// Set the scalar range mode.
    #[must_use]
    pub fn with_scalar_range_mode(mut self, mode: ScalarRangeMode) -> Self {
        self.scalar_range_mode = mode;
        self
    }

    /// Set the per-view visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: ViewVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Whether this display renders voxel data.
    #[must_use]
    pub fn is_volumetric(&self) -> bool {
        matches!(self.kind, DisplayKind::Volumetric { .. })
    }

    /// Whether scalars are used directly as RGB colors.
    #[must_use]
    pub fn uses_direct_mapping(&self) -> bool {
        self.scalar_range_mode == ScalarRangeMode::DirectMapping
    }
}

// ---------------------------------------------------------------------------
// Displayable node
// ---------------------------------------------------------------------------

/// An entity that can be shown in a view; references its display nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayableNode {
    /// Node identifier.
    pub id: NodeId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Display nodes in the order they were attached. May include color
    /// legend descriptors.
    #[serde(default)]
    pub display_node_ids: Vec<NodeId>,
}

impl DisplayableNode {
    /// Displayable node with no display nodes.
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            display_node_ids: Vec::new(),
        }
    }

    /// Append a display node reference.
    #[must_use]
    pub fn with_display_node(mut self, id: impl Into<NodeId>) -> Self {
        self.display_node_ids.push(id.into());
        self
    }
}
