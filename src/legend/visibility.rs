//! Visibility policy for a legend overlay.
//!
//! Rules are evaluated top to bottom and the first failing rule hides the
//! legend:
//! 1. the descriptor is visible (globally, then in this view),
//! 2. its displayable node and a primary display node resolve,
//! 3. volumetric data is shown only when a slice composite shows the volume
//!    (3D views never show volume legends),
//! 4. anything else follows its primary display node's visibility.

use super::descriptor::LegendDescriptor;
use crate::error::LegendError;
use crate::scene::{
    DisplayNode, DisplayableNode, NodeId, SceneGraph, SliceCompositeNode,
};

/// Why a legend is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
    /// The descriptor is switched off (globally or for this view).
    DescriptorHidden,
    /// The descriptor references no resolvable displayable node.
    NoDisplayable,
    /// No primary display node could be found.
    NoPrimaryDisplay,
    /// The engine is not attached to a view.
    NoView,
    /// The volume is not in any layer of the slice view.
    VolumeNotInSliceView,
    /// Volume legends are not shown without a slice composite (3D view).
    VolumeWithoutSliceView,
    /// The primary display node is hidden in this view.
    PrimaryHidden,
}

impl HideReason {
    /// Whether the reason points at a broken scene rather than a user
    /// choice.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::NoDisplayable | Self::NoPrimaryDisplay)
    }

    /// Error reported for the broken-scene reasons.
    #[must_use]
    pub fn as_error(self) -> Option<LegendError> {
        match self {
            Self::NoDisplayable => Some(LegendError::MissingDisplayableNode),
            Self::NoPrimaryDisplay => {
                Some(LegendError::MissingPrimaryDisplayNode)
            }
            _ => None,
        }
    }
}

/// Outcome of the visibility policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility<'s> {
    /// Show the legend; it represents `primary`.
    Shown {
        /// Resolved primary display node.
        primary: &'s DisplayNode,
    },
    /// Hide the legend.
    Hidden(HideReason),
}

impl Visibility<'_> {
    /// Whether the legend is shown.
    #[must_use]
    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown { .. })
    }
}

/// Everything the policy looks at.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityInput<'s> {
    /// Legend being evaluated.
    pub descriptor: &'s LegendDescriptor,
    /// Its displayable node, if it resolves.
    pub displayable: Option<&'s DisplayableNode>,
    /// Its primary display node, if one was found.
    pub primary: Option<&'s DisplayNode>,
    /// Slice composite of the managed view; `None` in 3D views.
    pub slice_composite: Option<&'s SliceCompositeNode>,
    /// Managed view.
    pub view_id: Option<&'s NodeId>,
}

/// Primary display node of a legend.
///
/// Uses the descriptor's explicit reference when it resolves; otherwise the
/// first display node of `displayable` that resolves and is not itself a
/// legend. The fallback follows the displayable node's display-node order.
#[must_use]
pub fn resolve_primary_display<'s>(
    scene: &'s dyn SceneGraph,
    descriptor: &LegendDescriptor,
    displayable: Option<&DisplayableNode>,
) -> Option<&'s DisplayNode> {
    if let Some(primary) =
        descriptor.primary_display.as_ref().and_then(|id| scene.display(id))
    {
        return Some(primary);
    }
    displayable?
        .display_node_ids
        .iter()
        .find_map(|id| scene.display(id))
}

/// Evaluate the policy. Pure: the caller applies the result.
#[must_use]
pub fn evaluate<'s>(input: &VisibilityInput<'s>) -> Visibility<'s> {
    let descriptor = input.descriptor;
    if !descriptor.visibility.visible {
        return Visibility::Hidden(HideReason::DescriptorHidden);
    }
    let Some(displayable) = input.displayable else {
        return Visibility::Hidden(HideReason::NoDisplayable);
    };
    let Some(primary) = input.primary else {
        return Visibility::Hidden(HideReason::NoPrimaryDisplay);
    };
    let Some(view_id) = input.view_id else {
        return Visibility::Hidden(HideReason::NoView);
    };
    if !descriptor.visibility.is_visible_in(view_id) {
        return Visibility::Hidden(HideReason::DescriptorHidden);
    }

    if primary.is_volumetric() {
        let Some(composite) = input.slice_composite else {
            return Visibility::Hidden(HideReason::VolumeWithoutSliceView);
        };
        let volume_id = primary.displayable.as_ref().unwrap_or(&displayable.id);
        if !composite.shows_volume(volume_id) {
            return Visibility::Hidden(HideReason::VolumeNotInSliceView);
        }
    } else if !primary.visibility.is_visible_in(view_id) {
        return Visibility::Hidden(HideReason::PrimaryHidden);
    }

    Visibility::Shown { primary }
}

/// Boolean form of [`evaluate`].
#[must_use]
pub fn is_legend_visible(input: &VisibilityInput<'_>) -> bool {
    evaluate(input).is_shown()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, ViewVisibility, WindowLevel};

    const VIEW: &str = "vtkMRMLSliceNodeRed";

    fn volume_display() -> DisplayNode {
        DisplayNode::scalar_volume(
            "vol_disp",
            "vol",
            WindowLevel {
                window: 100.0,
                level: 50.0,
            },
        )
    }

    fn input<'s>(
        descriptor: &'s LegendDescriptor,
        displayable: &'s DisplayableNode,
        primary: &'s DisplayNode,
        composite: Option<&'s SliceCompositeNode>,
        view: &'s NodeId,
    ) -> VisibilityInput<'s> {
        VisibilityInput {
            descriptor,
            displayable: Some(displayable),
            primary: Some(primary),
            slice_composite: composite,
            view_id: Some(view),
        }
    }

    #[test]
    fn volume_without_slice_composite_is_hidden() {
        let view = NodeId::from(VIEW);
        let desc = LegendDescriptor::new("legend", "vol");
        let vol = DisplayableNode::new("vol");
        let disp = volume_display();
        let v = evaluate(&input(&desc, &vol, &disp, None, &view));
        assert_eq!(v, Visibility::Hidden(HideReason::VolumeWithoutSliceView));
    }

    #[test]
    fn volume_shown_only_when_in_a_layer() {
        let view = NodeId::from(VIEW);
        let desc = LegendDescriptor::new("legend", "vol");
        let vol = DisplayableNode::new("vol");
        let disp = volume_display();
        let mut comp = SliceCompositeNode::new("comp");
        assert!(!is_legend_visible(&input(
            &desc,
            &vol,
            &disp,
            Some(&comp),
            &view
        )));
        comp.background_volume_id = Some("vol".into());
        assert!(is_legend_visible(&input(
            &desc,
            &vol,
            &disp,
            Some(&comp),
            &view
        )));
    }

    #[test]
    fn generic_follows_primary_view_visibility() {
        let view = NodeId::from("vtkMRMLViewNode1");
        let desc = LegendDescriptor::new("legend", "model");
        let model = DisplayableNode::new("model");
        let mut disp = DisplayNode::generic("model_disp");
        assert!(is_legend_visible(&input(&desc, &model, &disp, None, &view)));
        disp.visibility = ViewVisibility::only_in(["other".into()]);
        assert_eq!(
            evaluate(&input(&desc, &model, &disp, None, &view)),
            Visibility::Hidden(HideReason::PrimaryHidden)
        );
    }

    #[test]
    fn descriptor_flags_checked_first() {
        let view = NodeId::from(VIEW);
        let desc = LegendDescriptor::new("legend", "vol")
            .with_visibility(ViewVisibility::hidden());
        let vol = DisplayableNode::new("vol");
        let disp = volume_display();
        let mut comp = SliceCompositeNode::new("comp");
        comp.background_volume_id = Some("vol".into());
        assert_eq!(
            evaluate(&input(&desc, &vol, &disp, Some(&comp), &view)),
            Visibility::Hidden(HideReason::DescriptorHidden)
        );
        let restricted = LegendDescriptor::new("legend", "vol")
            .with_visibility(ViewVisibility::only_in(["green".into()]));
        assert_eq!(
            evaluate(&input(&restricted, &vol, &disp, Some(&comp), &view)),
            Visibility::Hidden(HideReason::DescriptorHidden)
        );
    }

    #[test]
    fn missing_pieces_hide() {
        let view = NodeId::from(VIEW);
        let desc = LegendDescriptor::new("legend", "vol");
        let vol = DisplayableNode::new("vol");
        let base = VisibilityInput {
            descriptor: &desc,
            displayable: Some(&vol),
            primary: None,
            slice_composite: None,
            view_id: Some(&view),
        };
        let v = evaluate(&base);
        assert_eq!(v, Visibility::Hidden(HideReason::NoPrimaryDisplay));
        assert!(HideReason::NoPrimaryDisplay.is_error());
        assert!(HideReason::PrimaryHidden.as_error().is_none());
        let no_displayable = VisibilityInput {
            displayable: None,
            ..base
        };
        assert_eq!(
            evaluate(&no_displayable),
            Visibility::Hidden(HideReason::NoDisplayable)
        );
    }

    #[test]
    fn fallback_skips_legend_display_nodes() {
        let mut scene = Scene::new();
        let model = DisplayableNode::new("model")
            .with_display_node("legend")
            .with_display_node("model_disp");
        let desc = LegendDescriptor::new("legend", "model");
        let _ = scene.add_node(desc.clone()).unwrap();
        let _ = scene.add_node(DisplayNode::generic("model_disp")).unwrap();
        let primary = resolve_primary_display(&scene, &desc, Some(&model));
        assert_eq!(primary.map(|p| p.id.as_str()), Some("model_disp"));
    }

    #[test]
    fn explicit_primary_wins() {
        let mut scene = Scene::new();
        let model = DisplayableNode::new("model").with_display_node("a");
        let _ = scene.add_node(DisplayNode::generic("a")).unwrap();
        let _ = scene.add_node(DisplayNode::generic("b")).unwrap();
        let desc =
            LegendDescriptor::new("legend", "model").with_primary_display("b");
        let primary = resolve_primary_display(&scene, &desc, Some(&model));
        assert_eq!(primary.map(|p| p.id.as_str()), Some("b"));
        let dangling =
            LegendDescriptor::new("legend", "model").with_primary_display("x");
        let fallback = resolve_primary_display(&scene, &dangling, Some(&model));
        assert_eq!(fallback.map(|p| p.id.as_str()), Some("a"));
        assert!(resolve_primary_display(&scene, &dangling, None).is_none());
    }
}
