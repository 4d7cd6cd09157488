//! Lookup-table adapter: ranged, optionally annotated copies of a shared
//! color table.
//!
//! Several consumers may map the same color node with different ranges at
//! the same time, so the shared table is never touched; every legend gets
//! its own copy.

use super::descriptor::LegendDescriptor;
use crate::error::LegendError;
use crate::options::AnnotationOptions;
use crate::scene::{ColorNode, DisplayKind, DisplayNode, LookupTable};

/// How the bar is labeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMode {
    /// Numeric labels, counts straight from the descriptor.
    Numeric {
        /// Number of labels.
        number_of_labels: u32,
        /// Maximum number of swatches.
        max_colors: u32,
    },
    /// Centered color-name labels on an oversampled table.
    ColorNames {
        /// One label per original color.
        number_of_labels: u32,
        /// Oversampled swatch count.
        max_colors: u32,
    },
}

/// Table and label policy ready to install on an actor.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendTable {
    /// Private, ranged (and possibly annotated) table copy.
    pub table: LookupTable,
    /// Label policy.
    pub labels: LabelMode,
}

/// Scalar range the display node actually shows.
///
/// Window/level displays show `[level - window/2, level + window/2]`; every
/// other display reports its range directly.
#[must_use]
pub fn display_range(display: &DisplayNode) -> [f64; 2] {
    match display.kind {
        DisplayKind::Volumetric {
            window_level: Some(wl),
        } => wl.range(),
        DisplayKind::Volumetric { window_level: None }
        | DisplayKind::Generic => display.scalar_range,
    }
}

/// Oversampling of an `n`-color table towards `target` indices:
/// `(factor, new_count)` with `new_count = trunc(n * factor)`.
#[must_use]
pub fn oversampling(color_count: usize, target: usize) -> (f64, usize) {
    let factor = target as f64 / color_count as f64;
    (factor, (color_count as f64 * factor) as usize)
}

/// Build the legend table for `display` drawn with `color`.
///
/// Returns `Ok(None)` when the display maps scalars directly to RGB: such a
/// legend would be meaningless and is hidden without an error.
///
/// # Errors
///
/// [`LegendError::MissingColorNode`] when `color` is `None`,
/// [`LegendError::MissingLookupTable`] when it has no lookup table.
pub fn build_legend_table(
    display: &DisplayNode,
    color: Option<&ColorNode>,
    descriptor: &LegendDescriptor,
    options: &AnnotationOptions,
) -> Result<Option<LegendTable>, LegendError> {
    let color = color.ok_or(LegendError::MissingColorNode)?;
    let range = display_range(display);

    if display.uses_direct_mapping() {
        return Ok(None);
    }

    let mut table = color
        .lookup_table_copy()
        .ok_or(LegendError::MissingLookupTable)?;
    table.set_range(range);

    let color_count = color.number_of_colors();
    let labels = if descriptor.use_color_names_for_labels && color_count > 0 {
        let (factor, new_count) =
            oversampling(color_count, options.target_colors as usize);
        table.reset_annotations();
        for index in 0..new_count {
            let source = (index as f64 / factor) as usize;
            table.set_annotation(index, color.color_name(source));
        }
        LabelMode::ColorNames {
            number_of_labels: color_count as u32,
            max_colors: new_count as u32,
        }
    } else {
        LabelMode::Numeric {
            number_of_labels: descriptor.number_of_labels,
            max_colors: descriptor.max_colors,
        }
    };

    Ok(Some(LegendTable { table, labels }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ScalarRangeMode, WindowLevel};

    fn four_colors() -> ColorNode {
        ColorNode::from_entries(
            "labels",
            [
                ("background", [0.0, 0.0, 0.0, 0.0]),
                ("liver", [0.8, 0.4, 0.3, 1.0]),
                ("spleen", [0.6, 0.2, 0.6, 1.0]),
                ("kidney", [0.9, 0.7, 0.2, 1.0]),
            ],
        )
    }

    fn model_display() -> DisplayNode {
        DisplayNode::generic("disp")
            .with_color_node("labels")
            .with_scalar_range([-3.0, 7.0])
    }

    #[test]
    fn window_level_range() {
        let d = DisplayNode::scalar_volume(
            "d",
            "vol",
            WindowLevel {
                window: 100.0,
                level: 50.0,
            },
        );
        assert_eq!(display_range(&d), [0.0, 100.0]);
    }

    #[test]
    fn label_map_uses_reported_range() {
        let d = DisplayNode::label_map("d", "vol").with_scalar_range([0.0, 4.0]);
        assert_eq!(display_range(&d), [0.0, 4.0]);
    }

    #[test]
    fn numeric_mode_copies_descriptor_counts() {
        let color = four_colors();
        let mut desc = LegendDescriptor::new("l", "m");
        desc.number_of_labels = 7;
        desc.max_colors = 64;
        let t = build_legend_table(
            &model_display(),
            Some(&color),
            &desc,
            &AnnotationOptions::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            t.labels,
            LabelMode::Numeric {
                number_of_labels: 7,
                max_colors: 64
            }
        );
        assert_eq!(t.table.range(), [-3.0, 7.0]);
        assert_eq!(t.table.annotation_count(), 0);
        // Shared table untouched.
        assert_eq!(
            color.lookup_table.as_ref().unwrap().range(),
            [0.0, 255.0]
        );
    }

    #[test]
    fn color_names_oversample_to_256() {
        let color = four_colors();
        let desc = LegendDescriptor::new("l", "m").with_color_names();
        let t = build_legend_table(
            &model_display(),
            Some(&color),
            &desc,
            &AnnotationOptions::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(oversampling(4, 256), (64.0, 256));
        assert_eq!(
            t.labels,
            LabelMode::ColorNames {
                number_of_labels: 4,
                max_colors: 256
            }
        );
        assert_eq!(t.table.annotation_count(), 256);
        assert_eq!(t.table.annotation(0), Some("background"));
        assert_eq!(t.table.annotation(64), Some("liver"));
        assert_eq!(t.table.annotation(128), Some("spleen"));
        assert_eq!(t.table.annotation(192), Some("kidney"));
        assert_eq!(t.table.annotation(63), Some("background"));
        assert_eq!(t.table.annotation(255), Some("kidney"));
    }

    #[test]
    fn color_names_ignored_for_empty_table() {
        let color = ColorNode::from_entries("empty", []);
        let desc = LegendDescriptor::new("l", "m").with_color_names();
        let t = build_legend_table(
            &model_display(),
            Some(&color),
            &desc,
            &AnnotationOptions::default(),
        )
        .unwrap()
        .unwrap();
        assert!(matches!(t.labels, LabelMode::Numeric { .. }));
    }

    #[test]
    fn direct_mapping_yields_no_table() {
        let d = model_display()
            .with_scalar_range_mode(ScalarRangeMode::DirectMapping);
        let out = build_legend_table(
            &d,
            Some(&four_colors()),
            &LegendDescriptor::new("l", "m"),
            &AnnotationOptions::default(),
        )
        .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn missing_color_node_and_table_are_errors() {
        let desc = LegendDescriptor::new("l", "m");
        let opts = AnnotationOptions::default();
        assert!(matches!(
            build_legend_table(&model_display(), None, &desc, &opts),
            Err(LegendError::MissingColorNode)
        ));
        let no_table = ColorNode::without_table("c");
        assert!(matches!(
            build_legend_table(&model_display(), Some(&no_table), &desc, &opts),
            Err(LegendError::MissingLookupTable)
        ));
    }
}
