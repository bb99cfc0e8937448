//! Absolutely-positioned child placement
//!
//! Out-of-flow positioned children are collected during their containing
//! block's normal flow (with the static position they would have had) and
//! placed here after the container's height is final. The containing block's
//! padding box is the coordinate frame: inset offsets resolve against it and
//! the static position was recorded relative to it.

use crate::layout::constraints::LayoutConstraints;
use crate::layout::{intrinsic_widths, layout_box, LayoutContext, Placement};
use crate::tree::{BoxId, BoxTree};
use log::trace;

/// A positioned child awaiting placement, with its recorded static position
/// (relative to the containing block's padding box).
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeferredPositioned {
  pub child: BoxId,
  pub static_x: f32,
  pub static_y: f32,
}

/// Lays out every deferred positioned child of `container`.
pub(crate) fn layout_deferred(
  tree: &mut BoxTree,
  container: BoxId,
  deferred: &[DeferredPositioned],
  ctx: &mut LayoutContext<'_>,
) {
  if deferred.is_empty() {
    return;
  }

  let geo = tree.get(container).geometry.clone();
  let cb_width = (geo.width - geo.border.horizontal()).max(0.0);
  let cb_height = (geo.height - geo.border.vertical()).max(0.0);

  for d in deferred {
    let style = tree.get(d.child).style.clone();

    let left = style.left.as_ref().map(|l| l.resolve_against(cb_width));
    let right = style.right.as_ref().map(|l| l.resolve_against(cb_width));
    let top = style.top.as_ref().map(|l| l.resolve_against(cb_height));
    let bottom = style.bottom.as_ref().map(|l| l.resolve_against(cb_height));

    // Width basis: a specified width resolves in the child's own pass;
    // two opposing insets stretch; otherwise shrink-to-fit.
    let containing_width = if style.width.is_some() {
      cb_width
    } else if let (Some(l), Some(r)) = (left, right) {
      (cb_width - l - r).max(0.0)
    } else {
      let (min_w, max_w) = intrinsic_widths(tree, d.child);
      min_w.max(cb_width.min(max_w))
    };

    let constraints = LayoutConstraints {
      containing_width,
      containing_height: Some(cb_height),
    };
    // Positioned boxes establish their own formatting context; the
    // placement origin only seeds pagination.
    layout_box(
      tree,
      d.child,
      constraints,
      ctx,
      Placement {
        bfc_origin: crate::geometry::Point::ZERO,
        abs_y: 0.0,
      },
    );

    let child_geo = tree.get(d.child).geometry.clone();
    let x = match (left, right) {
      (Some(l), _) => l + child_geo.margin.left,
      (None, Some(r)) => cb_width - r - child_geo.width - child_geo.margin.right,
      (None, None) => d.static_x,
    };
    let y = match (top, bottom) {
      (Some(t), _) => t + child_geo.margin.top,
      (None, Some(b)) => cb_height - b - child_geo.height - child_geo.margin.bottom,
      (None, None) => d.static_y,
    };

    trace!(
      "positioned child {:?} at ({}, {}) in padding box {}x{}",
      d.child,
      x,
      y,
      cb_width,
      cb_height
    );

    // Padding-box coords to parent-relative border-box coords.
    let node = tree.get_mut(d.child);
    node.geometry.x = geo.border.left + x;
    node.geometry.y = geo.border.top + y;
  }
}
