use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    ColorNode, DisplayNode, DisplayableNode, SliceCompositeNode, ViewNode,
};
use crate::legend::LegendDescriptor;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Opaque string identifier of a scene node.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a string identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (never a valid scene node).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Type tag delivered with scene notifications, used for type filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Data that can be shown in a view (volume, model, markups).
    Displayable,
    /// Appearance of a displayable node.
    Display,
    /// Color legend descriptor.
    ColorLegend,
    /// Color table.
    Color,
    /// Per-slice-view record of the shown volumes.
    SliceComposite,
    /// A 2D slice view or a 3D view.
    View,
}

impl NodeKind {
    /// Short tag used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Displayable => "displayable",
            Self::Display => "display",
            Self::ColorLegend => "color legend",
            Self::Color => "color",
            Self::SliceComposite => "slice composite",
            Self::View => "view",
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A scene node, closed over the kinds the legend engine understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// See [`DisplayableNode`].
    Displayable(DisplayableNode),
    /// See [`DisplayNode`].
    Display(DisplayNode),
    /// See [`LegendDescriptor`].
    ColorLegend(LegendDescriptor),
    /// See [`ColorNode`].
    Color(ColorNode),
    /// See [`SliceCompositeNode`].
    SliceComposite(SliceCompositeNode),
    /// See [`ViewNode`].
    View(ViewNode),
}

impl Node {
    /// Identifier of the wrapped node.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Displayable(n) => &n.id,
            Self::Display(n) => &n.id,
            Self::ColorLegend(n) => &n.id,
            Self::Color(n) => &n.id,
            Self::SliceComposite(n) => &n.id,
            Self::View(n) => &n.id,
        }
    }

    /// Type tag of the wrapped node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Displayable(_) => NodeKind::Displayable,
            Self::Display(_) => NodeKind::Display,
            Self::ColorLegend(_) => NodeKind::ColorLegend,
            Self::Color(_) => NodeKind::Color,
            Self::SliceComposite(_) => NodeKind::SliceComposite,
            Self::View(_) => NodeKind::View,
        }
    }

    /// The node as a displayable node, if it is one.
    #[must_use]
    pub fn as_displayable(&self) -> Option<&DisplayableNode> {
        match self {
            Self::Displayable(n) => Some(n),
            _ => None,
        }
    }

    /// The node as a display node, if it is one.
    #[must_use]
    pub fn as_display(&self) -> Option<&DisplayNode> {
        match self {
            Self::Display(n) => Some(n),
            _ => None,
        }
    }

    /// The node as a color legend descriptor, if it is one.
    #[must_use]
    pub fn as_legend(&self) -> Option<&LegendDescriptor> {
        match self {
            Self::ColorLegend(n) => Some(n),
            _ => None,
        }
    }

    /// The node as a color node, if it is one.
    #[must_use]
    pub fn as_color(&self) -> Option<&ColorNode> {
        match self {
            Self::Color(n) => Some(n),
            _ => None,
        }
    }

    /// The node as a slice composite node, if it is one.
    #[must_use]
    pub fn as_slice_composite(&self) -> Option<&SliceCompositeNode> {
        match self {
            Self::SliceComposite(n) => Some(n),
            _ => None,
        }
    }

    /// The node as a view node, if it is one.
    #[must_use]
    pub fn as_view(&self) -> Option<&ViewNode> {
        match self {
            Self::View(n) => Some(n),
            _ => None,
        }
    }
}

impl From<DisplayableNode> for Node {
    fn from(n: DisplayableNode) -> Self {
        Self::Displayable(n)
    }
}

impl From<DisplayNode> for Node {
    fn from(n: DisplayNode) -> Self {
        Self::Display(n)
    }
}

impl From<LegendDescriptor> for Node {
    fn from(n: LegendDescriptor) -> Self {
        Self::ColorLegend(n)
    }
}

impl From<ColorNode> for Node {
    fn from(n: ColorNode) -> Self {
        Self::Color(n)
    }
}

impl From<SliceCompositeNode> for Node {
    fn from(n: SliceCompositeNode) -> Self {
        Self::SliceComposite(n)
    }
}

impl From<ViewNode> for Node {
    fn from(n: ViewNode) -> Self {
        Self::View(n)
    }
}
