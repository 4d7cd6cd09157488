use serde::{Deserialize, Serialize};

use super::NodeId;

/// Which volumes a slice view currently shows in its three layers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceCompositeNode {
    /// Node identifier.
    pub id: NodeId,
    /// Background layer volume.
    pub background_volume_id: Option<NodeId>,
    /// Foreground layer volume.
    pub foreground_volume_id: Option<NodeId>,
    /// Label layer volume.
    pub label_volume_id: Option<NodeId>,
}

impl SliceCompositeNode {
    /// Composite with all three layers empty.
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Whether `volume_id` is shown in any of the three layers.
    #[must_use]
    pub fn shows_volume(&self, volume_id: &NodeId) -> bool {
        [
            &self.background_volume_id,
            &self.foreground_volume_id,
            &self.label_volume_id,
        ]
        .into_iter()
        .flatten()
        .any(|id| id == volume_id)
    }
}

/// Kind of view a legend engine can be attached to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// 2D slice view, backed by a slice composite node.
    #[default]
    Slice,
    /// 3D view.
    ThreeD,
}

/// A view in the layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewNode {
    /// Node identifier.
    pub id: NodeId,
    /// Slice or 3D.
    #[serde(default)]
    pub kind: ViewKind,
    /// Layout name ("Red", "1", ...).
    #[serde(default)]
    pub name: String,
}

impl ViewNode {
    /// A 2D slice view.
    #[must_use]
    pub fn slice(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            kind: ViewKind::Slice,
            name: String::new(),
        }
    }

    /// A 3D view.
    #[must_use]
    pub fn three_d(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            kind: ViewKind::ThreeD,
            name: String::new(),
        }
    }

    /// Whether this is a 2D slice view.
    #[must_use]
    pub fn is_slice_view(&self) -> bool {
        self.kind == ViewKind::Slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_volume_in_any_layer() {
        let mut c = SliceCompositeNode::new("comp");
        let vol = NodeId::from("vol");
        assert!(!c.shows_volume(&vol));
        c.label_volume_id = Some(vol.clone());
        assert!(c.shows_volume(&vol));
        c.label_volume_id = None;
        c.foreground_volume_id = Some(vol.clone());
        assert!(c.shows_volume(&vol));
        assert!(!c.shows_volume(&NodeId::from("other")));
    }
}
