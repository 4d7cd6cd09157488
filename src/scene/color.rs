//! Color tables as consumed by the legend engine.
//!
//! The scene owns [`ColorNode`]s; a legend never renders from the shared
//! [`LookupTable`] directly but from a copy with its own range (see
//! [`crate::legend::lookup_table`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Indexed RGBA lookup table with a scalar range and optional per-index
/// annotations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LookupTable {
    colors: Vec<[f32; 4]>,
    range: [f64; 2],
    #[serde(default)]
    annotations: BTreeMap<usize, String>,
}

impl LookupTable {
    /// Table over `[0, 255]` with the given entries.
    #[must_use]
    pub fn new(colors: Vec<[f32; 4]>) -> Self {
        Self {
            colors,
            range: [0.0, 255.0],
            annotations: BTreeMap::new(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// RGBA entries.
    #[must_use]
    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    /// Scalar range mapped onto the table.
    #[must_use]
    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Set the scalar range mapped onto the table.
    pub fn set_range(&mut self, range: [f64; 2]) {
        self.range = range;
    }

    /// Map a scalar to a color. Values outside the range clamp to the
    /// first/last entry; an empty table maps everything to transparent
    /// black.
    #[must_use]
    pub fn map_scalar(&self, value: f64) -> [f32; 4] {
        let Some(last) = self.colors.len().checked_sub(1) else {
            return [0.0; 4];
        };
        let [lo, hi] = self.range;
        let span = hi - lo;
        let t = if span.abs() < f64::EPSILON {
            0.0
        } else {
            ((value - lo) / span).clamp(0.0, 1.0)
        };
        let idx = ((t * self.colors.len() as f64) as usize).min(last);
        self.colors[idx]
    }

    /// Attach a text annotation to an index.
    pub fn set_annotation(&mut self, index: usize, text: impl Into<String>) {
        let _ = self.annotations.insert(index, text.into());
    }

    /// Annotation at `index`, if any.
    #[must_use]
    pub fn annotation(&self, index: usize) -> Option<&str> {
        self.annotations.get(&index).map(String::as_str)
    }

    /// Number of annotated indices.
    #[must_use]
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Drop every annotation.
    pub fn reset_annotations(&mut self) {
        self.annotations.clear();
    }
}

/// A named color table in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorNode {
    /// Node identifier.
    pub id: NodeId,
    /// Per-entry color names.
    #[serde(default)]
    pub names: Vec<String>,
    /// Lookup table, absent for color nodes that cannot provide one.
    #[serde(default)]
    pub lookup_table: Option<LookupTable>,
}

impl ColorNode {
    /// Color node built from `(name, rgba)` entries.
    #[must_use]
    pub fn from_entries<'a>(
        id: impl Into<NodeId>,
        entries: impl IntoIterator<Item = (&'a str, [f32; 4])>,
    ) -> Self {
        let (names, colors): (Vec<String>, Vec<[f32; 4]>) = entries
            .into_iter()
            .map(|(name, rgba)| (name.to_owned(), rgba))
            .unzip();
        Self {
            id: id.into(),
            names,
            lookup_table: Some(LookupTable::new(colors)),
        }
    }

    /// Color node without a lookup table.
    #[must_use]
    pub fn without_table(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            names: Vec::new(),
            lookup_table: None,
        }
    }

    /// Number of colors (table entries, or names when there is no table).
    #[must_use]
    pub fn number_of_colors(&self) -> usize {
        self.lookup_table
            .as_ref()
            .map_or(self.names.len(), LookupTable::len)
    }

    /// Name of the color at `index`; empty when out of range.
    #[must_use]
    pub fn color_name(&self, index: usize) -> &str {
        self.names.get(index).map_or("", String::as_str)
    }

    /// Independent copy of the lookup table.
    #[must_use]
    pub fn lookup_table_copy(&self) -> Option<LookupTable> {
        self.lookup_table.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey_ramp(n: usize) -> LookupTable {
        LookupTable::new(
            (0..n)
                .map(|i| {
                    let v = i as f32 / (n - 1) as f32;
                    [v, v, v, 1.0]
                })
                .collect(),
        )
    }

    #[test]
    fn map_scalar_clamps_to_range() {
        let mut lut = grey_ramp(4);
        lut.set_range([0.0, 100.0]);
        assert_eq!(lut.map_scalar(-10.0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(lut.map_scalar(500.0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(lut.map_scalar(30.0)[0], 1.0 / 3.0);
    }

    #[test]
    fn empty_table_maps_to_transparent() {
        assert_eq!(LookupTable::default().map_scalar(1.0), [0.0; 4]);
    }

    #[test]
    fn copy_is_independent() {
        let node = ColorNode::from_entries(
            "c",
            [("air", [0.0, 0.0, 0.0, 1.0]), ("bone", [1.0, 1.0, 1.0, 1.0])],
        );
        let mut copy = node.lookup_table_copy().unwrap();
        copy.set_range([-5.0, 5.0]);
        copy.set_annotation(0, "air");
        let original = node.lookup_table.as_ref().unwrap();
        assert_eq!(original.range(), [0.0, 255.0]);
        assert_eq!(original.annotation_count(), 0);
    }

    #[test]
    fn color_names() {
        let node = ColorNode::from_entries("c", [("a", [0.0; 4])]);
        assert_eq!(node.number_of_colors(), 1);
        assert_eq!(node.color_name(0), "a");
        assert_eq!(node.color_name(9), "");
        assert_eq!(ColorNode::without_table("x").number_of_colors(), 0);
    }
}
