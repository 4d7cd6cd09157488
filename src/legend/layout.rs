//! Overlay layout: geometry and text placement from descriptor fields.
//!
//! Labels go on the side of the bar facing away from the image so they
//! cover as little of it as possible.

use glam::DVec2;

use super::actor::{BarOrientation, TextPosition};
use super::descriptor::{Justification, Orientation};
use crate::error::LegendError;

/// Concrete geometry and text placement of one legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendLayout {
    /// Resolved orientation.
    pub orientation: BarOrientation,
    /// Normalized lower-left anchor.
    pub position: DVec2,
    /// Normalized width.
    pub width: f64,
    /// Normalized height.
    pub height: f64,
    /// Label side.
    pub text_position: TextPosition,
    /// Gap between bar and labels.
    pub text_pad: f64,
    /// Title justification.
    pub title_justification: Justification,
}

/// Compute the layout for a normalized `position` and `size`.
///
/// Vertical bars keep `size = [w, h]`; horizontal bars swap the axes so the
/// same descriptor size describes a bar lying on its side. `text_pad` is
/// the bar-to-label gap used by vertical bars.
///
/// # Errors
///
/// [`LegendError::UnknownOrientation`] for [`Orientation::Other`]; the
/// caller keeps the previous geometry.
pub fn compute_layout(
    orientation: Orientation,
    position: [f64; 2],
    size: [f64; 2],
    text_pad: f64,
) -> Result<LegendLayout, LegendError> {
    let [x, y] = position;
    let [w, h] = size;
    match orientation {
        Orientation::Vertical => {
            let (text_position, text_pad, title_justification) = if x < 0.5 {
                (TextPosition::SucceedBar, text_pad, Justification::Left)
            } else {
                (TextPosition::PrecedeBar, -text_pad, Justification::Right)
            };
            Ok(LegendLayout {
                orientation: BarOrientation::Vertical,
                position: DVec2::new(x * (1.0 - w), y * (1.0 - h)),
                width: w,
                height: h,
                text_position,
                text_pad,
                title_justification,
            })
        }
        Orientation::Horizontal => Ok(LegendLayout {
            orientation: BarOrientation::Horizontal,
            position: DVec2::new(x * (1.0 - h), y * (1.0 - w)),
            width: h,
            height: w,
            text_position: if y < 0.5 {
                TextPosition::SucceedBar
            } else {
                TextPosition::PrecedeBar
            },
            text_pad: 0.0,
            title_justification: Justification::Centered,
        }),
        Orientation::Other(code) => Err(LegendError::UnknownOrientation(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAD: f64 = 2.0;

    fn assert_close(a: DVec2, b: DVec2) {
        assert!(a.abs_diff_eq(b, 1e-12), "{a} != {b}");
    }

    #[test]
    fn vertical_left_half_text_follows_bar() {
        let l =
            compute_layout(Orientation::Vertical, [0.3, 0.5], [0.2, 0.4], PAD)
                .unwrap();
        assert_close(l.position, DVec2::new(0.24, 0.30));
        assert_eq!((l.width, l.height), (0.2, 0.4));
        assert_eq!(l.text_position, TextPosition::SucceedBar);
        assert_eq!(l.text_pad, 2.0);
        assert_eq!(l.title_justification, Justification::Left);
    }

    #[test]
    fn vertical_right_half_text_precedes_bar() {
        let l =
            compute_layout(Orientation::Vertical, [0.95, 0.5], [0.15, 0.5], PAD)
                .unwrap();
        assert_eq!(l.text_position, TextPosition::PrecedeBar);
        assert_eq!(l.text_pad, -2.0);
        assert_eq!(l.title_justification, Justification::Right);
    }

    #[test]
    fn horizontal_swaps_axes() {
        let l = compute_layout(
            Orientation::Horizontal,
            [0.7, 0.2],
            [0.1, 0.3],
            PAD,
        )
        .unwrap();
        assert_close(l.position, DVec2::new(0.49, 0.18));
        assert_eq!((l.width, l.height), (0.3, 0.1));
        // y < 0.5: labels follow the bar.
        assert_eq!(l.text_position, TextPosition::SucceedBar);
        assert_eq!(l.text_pad, 0.0);
        assert_eq!(l.title_justification, Justification::Centered);
    }

    #[test]
    fn horizontal_top_half_text_precedes_bar() {
        let l = compute_layout(
            Orientation::Horizontal,
            [0.5, 0.9],
            [0.1, 0.3],
            PAD,
        )
        .unwrap();
        assert_eq!(l.text_position, TextPosition::PrecedeBar);
    }

    #[test]
    fn unknown_orientation_is_an_error() {
        let err =
            compute_layout(Orientation::Other(9), [0.5, 0.5], [0.1, 0.1], PAD)
                .unwrap_err();
        assert!(matches!(err, LegendError::UnknownOrientation(9)));
    }
}
