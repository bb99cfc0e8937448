//! Block layout
//!
//! Lays out a block container with a known containing width: resolves its
//! own horizontal dimensions, positions every child, and determines the
//! content height. Specials are dispatched first - out-of-flow positioned
//! children are deferred with their static position recorded, floats go to
//! the float tracker, run-in and compact children try to tuck into the
//! following block - and the remaining normal-flow children are positioned
//! through an explicit two-phase estimate/commit protocol:
//!
//! 1. *estimate*: tentative y from the cursor, the pending collapsible
//!    margin, and any required float clearance; the child is laid out there
//! 2. *commit*: the true y from the margin state machine (now using the
//!    child's folded collapsed margins) plus re-checked clearance; when the
//!    two differ the child is laid out once more at the committed position
//!
//! The single retry is part of the contract: the second pass uses the known
//! final position, so it cannot be wrong again.
//!
//! Malformed inputs degrade to defaults and never abort the pass. A cyclic
//! containing-block chain is a caller contract violation.

pub mod margin_collapse;
pub mod width;

use crate::geometry::{Point, Rect, Size};
use crate::layout::constraints::LayoutConstraints;
use crate::layout::contexts::positioned::{self, DeferredPositioned};
use crate::layout::float_context::{FloatContext, FloatSide};
use crate::layout::{intrinsic_widths, layout_box, LayoutContext, Placement};
use crate::style::{Clear, ComputedStyle, Direction, Display, Float, Position};
use crate::tree::box_tree::CollapsedMargins;
use crate::tree::{BoxId, BoxTree};
use log::{debug, trace};
use margin_collapse::{
  is_self_collapsing, ChildMargins, CollapseEligibility, CollapsibleMargin, MarginCollapseContext,
};
use width::compute_block_width;

/// How a child participates in its parent's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildClass {
  /// Absolutely positioned: deferred, static position recorded
  OutOfFlow,
  /// Floated: handed to the float tracker
  Floating,
  /// Tries to merge with the following block's first line
  RunIn,
  /// Tries to tuck into the following block's top margin
  Compact,
  /// Ordinary in-flow block-level child
  Normal,
}

fn classify(style: &ComputedStyle) -> ChildClass {
  if style.is_out_of_flow_positioned() {
    ChildClass::OutOfFlow
  } else if style.is_floating() {
    ChildClass::Floating
  } else {
    match style.display {
      Display::RunIn => ChildClass::RunIn,
      Display::Compact => ChildClass::Compact,
      _ => ChildClass::Normal,
    }
  }
}

/// Lays out a block container (or a table cell interior) at `placement`.
pub(crate) fn layout_block(
  tree: &mut BoxTree,
  id: BoxId,
  constraints: LayoutConstraints,
  ctx: &mut LayoutContext<'_>,
  placement: Placement,
) {
  let style = tree.get(id).style.clone();

  // Horizontal resolution first; vertical flows from the children. A cell's
  // width is dictated by the table's column model - the containing width IS
  // its border-box width - so its own width style is not consulted again.
  let cw = if tree.get(id).kind.is_table_cell() {
    cell_fill_width(&style, constraints.containing_width)
  } else {
    compute_block_width(&style, constraints.containing_width)
  };
  let border = style.border_widths();
  let padding = style.padding_sizes(constraints.containing_width);
  let (margin_top, margin_bottom) = style.vertical_margins(constraints.containing_width);

  {
    let geo = &mut tree.get_mut(id).geometry;
    geo.width = cw.border_box_width();
    geo.margin.left = cw.margin_left;
    geo.margin.right = cw.margin_right;
    geo.margin.top = margin_top;
    geo.margin.bottom = margin_bottom;
    geo.border = border;
    geo.padding = padding;
  }

  let content_width = cw.content_width;
  let is_root = tree.root() == id;
  let establishes_bfc = is_root || style.establishes_bfc() || tree.get(id).kind.is_table_cell();

  // A BFC root gets a fresh tracker whose space is its own content box;
  // everyone else keeps sharing the ancestor's (overhanging floats).
  let saved_floats = if establishes_bfc {
    Some(std::mem::replace(
      &mut ctx.floats,
      FloatContext::new(content_width),
    ))
  } else {
    None
  };
  let content_origin_bfc = if establishes_bfc {
    Point::ZERO
  } else {
    Point::new(
      placement.bfc_origin.x + border.left + padding.left,
      placement.bfc_origin.y + border.top + padding.top,
    )
  };
  let abs_content_y = placement.abs_y + border.top + padding.top;

  // Percentage heights of children need a definite base.
  let own_height_base = style
    .height
    .as_ref()
    .and_then(|h| h.maybe_resolve(constraints.containing_height));

  let children_inline = tree
    .get(id)
    .as_block()
    .map(|b| b.children_inline)
    .unwrap_or(false);

  let flow = FlowState {
    content_width,
    content_origin_bfc,
    abs_content_y,
    child_height_base: own_height_base,
    direction: style.direction,
  };

  let outcome = if children_inline {
    layout_inline_content(tree, id, &style, &flow, ctx)
  } else {
    layout_block_children(tree, id, &style, &flow, ctx, establishes_bfc)
  };

  // Height: content height from flow, overridden by a specified height,
  // clamped by min/max, expanded past floats for BFC roots.
  let mut content_height = outcome.content_height;
  if let Some(h) = style.height.as_ref() {
    if let Some(resolved) = h.maybe_resolve(constraints.containing_height) {
      content_height = match style.box_sizing {
        crate::style::BoxSizing::ContentBox => resolved.max(0.0),
        crate::style::BoxSizing::BorderBox => {
          (resolved - border.vertical() - padding.vertical()).max(0.0)
        }
      };
    }
  }
  content_height = style.clamp_height(content_height, constraints.containing_height);

  if establishes_bfc {
    content_height = content_height.max(ctx.floats.float_bottom());
  }

  let border_box_height = content_height + border.vertical() + padding.vertical();
  {
    let geo = &mut tree.get_mut(id).geometry;
    geo.height = border_box_height;
  }

  // Deferred positioned children: this box is their containing block, its
  // padding box the coordinate frame.
  positioned::layout_deferred(tree, id, &outcome.deferred, ctx);

  // Overflow: own border box plus everything children stick out.
  let mut overflow = Rect::from_xywh(0.0, 0.0, cw.border_box_width(), border_box_height);
  let children = tree.get(id).children.clone();
  for child in children {
    let child_node = tree.get(child);
    let child_overflow = child_node
      .geometry
      .overflow
      .translated(child_node.geometry.x, child_node.geometry.y);
    overflow = overflow.union(&child_overflow);
  }
  tree.get_mut(id).geometry.overflow = overflow;

  // Collapsed margins the parent will read.
  let self_collapsing = !establishes_bfc
    && style.is_in_flow()
    && is_self_collapsing(
      content_height,
      style
        .height
        .as_ref()
        .map(|h| h.value == 0.0)
        .unwrap_or(true),
      border.vertical() + padding.vertical(),
      style
        .min_height
        .as_ref()
        .and_then(|l| l.maybe_resolve(None))
        .unwrap_or(0.0),
      outcome.has_line_content,
    );
  tree.get_mut(id).collapsed_margins = CollapsedMargins {
    top_pos: outcome.top.positive,
    top_neg: outcome.top.negative,
    bottom_pos: outcome.bottom.positive,
    bottom_neg: outcome.bottom.negative,
    self_collapsing,
    top_quirk: outcome.top_quirk,
    bottom_quirk: outcome.bottom_quirk,
  };

  if let Some(saved) = saved_floats {
    ctx.floats = saved;
  }
  tree.get_mut(id).needs_layout = false;
}

/// Geometry facts shared by the child-positioning helpers.
struct FlowState {
  content_width: f32,
  content_origin_bfc: Point,
  abs_content_y: f32,
  child_height_base: Option<f32>,
  direction: Direction,
}

/// What a children pass reports back.
struct FlowOutcome {
  content_height: f32,
  deferred: Vec<DeferredPositioned>,
  top: CollapsibleMargin,
  bottom: CollapsibleMargin,
  top_quirk: bool,
  bottom_quirk: bool,
  has_line_content: bool,
}

/// Lays out a container whose children are inline-level.
///
/// The line boxes themselves are pre-computed by the external inline
/// collaborator; this pass stacks their heights, routes floated children
/// through the tracker, and defers positioned children.
fn layout_inline_content(
  tree: &mut BoxTree,
  id: BoxId,
  style: &ComputedStyle,
  flow: &FlowState,
  ctx: &mut LayoutContext<'_>,
) -> FlowOutcome {
  let inline = tree.get(id).as_block().and_then(|b| b.inline_content.clone());
  let line_height: f32 = inline.as_ref().map(|c| c.height()).unwrap_or(0.0);
  let has_lines = inline.as_ref().map(|c| !c.lines.is_empty()).unwrap_or(false);

  let mut deferred = Vec::new();
  let children = tree.get(id).children.clone();
  for child in children {
    let child_style = tree.get(child).style.clone();
    match classify(&child_style) {
      ChildClass::OutOfFlow => {
        deferred.push(DeferredPositioned {
          child,
          static_x: 0.0,
          static_y: 0.0,
        });
      }
      ChildClass::Floating => {
        place_float_child(tree, child, &child_style, flow, ctx, 0.0);
      }
      _ => {
        // Inline-level boxes are measured inside the line boxes; nothing to
        // do for them here.
        tree.get_mut(child).needs_layout = false;
      }
    }
  }

  let (mt, mb) = (
    CollapsibleMargin::from_margin(tree.get(id).geometry.margin.top),
    CollapsibleMargin::from_margin(tree.get(id).geometry.margin.bottom),
  );

  FlowOutcome {
    content_height: line_height,
    deferred,
    top: mt,
    bottom: mb,
    top_quirk: style.margin_top_is_quirk,
    bottom_quirk: style.margin_bottom_is_quirk,
    has_line_content: has_lines,
  }
}

/// Lays out a container whose children are block-level.
fn layout_block_children(
  tree: &mut BoxTree,
  id: BoxId,
  style: &ComputedStyle,
  flow: &FlowState,
  ctx: &mut LayoutContext<'_>,
  establishes_bfc: bool,
) -> FlowOutcome {
  let geo_snapshot = tree.get(id).geometry.clone();
  let height_is_auto = style.height.is_none();

  let eligibility = CollapseEligibility {
    with_top: !establishes_bfc
      && style.is_in_flow()
      && geo_snapshot.border.top == 0.0
      && geo_snapshot.padding.top == 0.0,
    with_bottom: !establishes_bfc
      && style.is_in_flow()
      && geo_snapshot.border.bottom == 0.0
      && geo_snapshot.padding.bottom == 0.0
      && height_is_auto,
    quirk_container: ctx.config.quirks_mode,
  };
  let mut margins = MarginCollapseContext::new(
    eligibility,
    CollapsibleMargin::from_margin(geo_snapshot.margin.top),
    style.margin_top_is_quirk,
    CollapsibleMargin::from_margin(geo_snapshot.margin.bottom),
    style.margin_bottom_is_quirk,
  );

  let mut cursor = 0.0_f32;
  let mut deferred: Vec<DeferredPositioned> = Vec::new();
  let mut pending_tuck: Option<BoxId> = None;

  let children = tree.get(id).children.clone();
  for child in children {
    let child_style = tree.get(child).style.clone();
    match classify(&child_style) {
      ChildClass::OutOfFlow => {
        // Static position: where the child would have landed in flow,
        // relative to the container's padding box.
        let static_y =
          geo_snapshot.padding.top + cursor + margins.estimate_offset(CollapsibleMargin::ZERO);
        deferred.push(DeferredPositioned {
          child,
          static_x: geo_snapshot.padding.left,
          static_y,
        });
      }
      ChildClass::Floating => {
        let float_y = cursor + margins.estimate_offset(CollapsibleMargin::ZERO);
        place_float_child(tree, child, &child_style, flow, ctx, float_y);
      }
      ChildClass::RunIn | ChildClass::Compact => {
        // Tuck candidates bind to the next normal sibling; lay them out
        // shrink-to-fit now and position them when that sibling lands.
        layout_tuck_candidate(tree, child, flow, ctx, cursor);
        pending_tuck = Some(child);
      }
      ChildClass::Normal => {
        cursor = layout_normal_child(
          tree,
          child,
          &child_style,
          flow,
          ctx,
          &mut margins,
          cursor,
          pending_tuck.take(),
        );
      }
    }
  }

  // A trailing tuck candidate has no sibling to merge with; it flows.
  if let Some(leftover) = pending_tuck {
    let leftover_style = tree.get(leftover).style.clone();
    cursor = layout_normal_child(
      tree,
      leftover,
      &leftover_style,
      flow,
      ctx,
      &mut margins,
      cursor,
      None,
    );
  }

  let outcome = margins.finish();
  let content_height = (cursor + outcome.trailing_height).max(0.0);

  FlowOutcome {
    content_height,
    deferred,
    top: outcome.top,
    bottom: outcome.bottom,
    top_quirk: outcome.top_quirk,
    bottom_quirk: outcome.bottom_quirk,
    has_line_content: false,
  }
}

/// Sizes a float child shrink-to-fit, registers it with the tracker, and
/// writes its placed geometry.
fn place_float_child(
  tree: &mut BoxTree,
  child: BoxId,
  child_style: &ComputedStyle,
  flow: &FlowState,
  ctx: &mut LayoutContext<'_>,
  flow_y: f32,
) {
  let (min_w, max_w) = intrinsic_widths(tree, child);
  let (mt, mb) = child_style.vertical_margins(flow.content_width);
  let margin_left = child_style
    .margin_left
    .as_ref()
    .map(|l| l.resolve_against(flow.content_width))
    .unwrap_or(0.0);
  let margin_right = child_style
    .margin_right
    .as_ref()
    .map(|l| l.resolve_against(flow.content_width))
    .unwrap_or(0.0);

  // Shrink-to-fit: min(max(preferred minimum, available), preferred).
  let available = (flow.content_width - margin_left - margin_right).max(0.0);
  let border_box_width = if child_style.width.is_some() {
    // Specified widths resolve in the child's own pass; feed it the
    // containing width and read the result afterwards.
    None
  } else {
    Some(min_w.max(available.min(max_w)))
  };

  // Lay the float out at a provisional spot; floats establish their own
  // BFC, so nothing inside depends on the final position.
  let provisional = Placement {
    bfc_origin: Point::new(flow.content_origin_bfc.x, flow.content_origin_bfc.y + flow_y),
    abs_y: flow.abs_content_y + flow_y,
  };
  let child_constraints = match border_box_width {
    Some(w) => LayoutConstraints {
      containing_width: w + margin_left + margin_right,
      containing_height: flow.child_height_base,
    },
    None => LayoutConstraints {
      containing_width: flow.content_width,
      containing_height: flow.child_height_base,
    },
  };
  layout_box(tree, child, child_constraints, ctx, provisional);

  let geo = tree.get(child).geometry.clone();
  let margin_size = Size::new(
    geo.width + margin_left + margin_right,
    geo.height + mt + mb,
  );
  let side = match child_style.float {
    Float::Right => FloatSide::Right,
    _ => FloatSide::Left,
  };
  ctx.floats.insert(
    child,
    side,
    margin_size,
    flow.content_origin_bfc.y + flow_y,
    child_style.clear != Clear::None,
  );
  let parent_left = parent_content_left(tree, child);
  let parent_top = parent_content_top(tree, child);
  for (placed_id, origin) in ctx.floats.place_pending() {
    let node = tree.get_mut(placed_id);
    // Placement is the margin-box origin in BFC space; store the border box
    // relative to the parent.
    node.geometry.x = parent_left + origin.x + margin_left - flow.content_origin_bfc.x;
    node.geometry.y = parent_top + origin.y + mt - flow.content_origin_bfc.y;
  }
}

/// Lays out a run-in/compact child shrink-to-fit at the cursor; the final
/// position comes when the following block commits.
fn layout_tuck_candidate(
  tree: &mut BoxTree,
  child: BoxId,
  flow: &FlowState,
  ctx: &mut LayoutContext<'_>,
  cursor: f32,
) {
  let (min_w, max_w) = intrinsic_widths(tree, child);
  let width = min_w.max(flow.content_width.min(max_w));
  let placement = Placement {
    bfc_origin: Point::new(flow.content_origin_bfc.x, flow.content_origin_bfc.y + cursor),
    abs_y: flow.abs_content_y + cursor,
  };
  let constraints = LayoutConstraints {
    containing_width: width,
    containing_height: flow.child_height_base,
  };
  layout_box(tree, child, constraints, ctx, placement);
}

/// The estimate/commit protocol for one normal-flow child.
///
/// Returns the new cursor. `tuck` is a preceding run-in/compact box that
/// anchors to this child's final position.
#[allow(clippy::too_many_arguments)]
fn layout_normal_child(
  tree: &mut BoxTree,
  child: BoxId,
  child_style: &ComputedStyle,
  flow: &FlowState,
  ctx: &mut LayoutContext<'_>,
  margins: &mut MarginCollapseContext,
  cursor: f32,
  tuck: Option<BoxId>,
) -> f32 {
  let (style_mt, _) = child_style.vertical_margins(flow.content_width);
  let clear = child_style.clear;

  // --- estimate ---------------------------------------------------------
  let est_offset = margins.estimate_offset(CollapsibleMargin::from_margin(style_mt));
  let mut est_y = cursor + est_offset;
  est_y = est_y.max(
    ctx
      .floats
      .clearance_position(clear, flow.content_origin_bfc.y + est_y)
      - flow.content_origin_bfc.y,
  );

  let floats_before = ctx.floats.placed_count();
  let (x_base, child_constraints) = horizontal_band(child_style, flow, ctx, est_y);
  layout_box(
    tree,
    child,
    child_constraints,
    ctx,
    Placement {
      bfc_origin: Point::new(
        flow.content_origin_bfc.x + x_base,
        flow.content_origin_bfc.y + est_y,
      ),
      abs_y: flow.abs_content_y + est_y,
    },
  );

  // --- commit -----------------------------------------------------------
  let cm = tree.get(child).collapsed_margins;
  let natural_y = cursor + margins.estimate_offset(cm.top());
  let cleared_y = ctx
    .floats
    .clearance_position(clear, flow.content_origin_bfc.y + natural_y)
    - flow.content_origin_bfc.y;

  let mut final_y = if cleared_y > natural_y {
    // Clearance breaks the margin chain; the child sits below the floats.
    let stacked = cursor + margins.commit_child_with_clearance(&cm);
    stacked.max(cleared_y)
  } else {
    cursor + margins.commit_child(&cm)
  };

  // Pagination can push the committed position further down. The push is
  // added space: it moves this child and, through the cursor, every
  // following sibling.
  if let Some(page) = &ctx.page {
    let pushed = page.adjusted_position(
      flow.abs_content_y + final_y,
      tree.get(child).geometry.height,
      child_style.break_before,
      child_style.break_inside,
    );
    let delta = pushed - (flow.abs_content_y + final_y);
    if delta > 0.0 {
      debug!(
        "pagination pushed child {:?} down by {}px",
        child, delta
      );
      final_y += delta;
    }
  }

  if (final_y - est_y).abs() > 0.01 {
    // The estimate was wrong (margins folded through the child, clearance,
    // or a page push). One relayout at the now-known position; the second
    // pass cannot be wrong because nothing about the position is estimated
    // anymore.
    trace!(
      "relayout child {:?}: estimated {} committed {}",
      child,
      est_y,
      final_y
    );
    ctx.floats.truncate_placed(floats_before);
    let (x_base, child_constraints) =
      horizontal_band(child_style, flow, ctx, final_y);
    layout_box(
      tree,
      child,
      child_constraints,
      ctx,
      Placement {
        bfc_origin: Point::new(
          flow.content_origin_bfc.x + x_base,
          flow.content_origin_bfc.y + final_y,
        ),
        abs_y: flow.abs_content_y + final_y,
      },
    );
  }

  // Horizontal position from the resolved margins, direction-aware.
  let (x_base, _) = horizontal_band(child_style, flow, ctx, final_y);
  let child_geo = tree.get(child).geometry.clone();
  let content_left = parent_content_left(tree, child);
  let content_top = parent_content_top(tree, child);
  let x = match flow.direction {
    Direction::Ltr => content_left + x_base + child_geo.margin.left,
    Direction::Rtl => {
      content_left + flow.content_width - x_base - child_geo.width - child_geo.margin.right
    }
  };

  let mut child_x = x;
  let mut child_y = content_top + final_y;

  // Relative positioning shifts the box after normal-flow placement.
  if child_style.position == Position::Relative {
    let (dx, dy) = relative_offset(child_style, flow.content_width, flow.child_height_base);
    child_x += dx;
    child_y += dy;
  }

  {
    let geo = &mut tree.get_mut(child).geometry;
    geo.x = child_x;
    geo.y = child_y;
  }

  // Anchor a pending run-in/compact to this child's final top.
  if let Some(tuck_id) = tuck {
    let tuck_geo = tree.get(tuck_id).geometry.clone();
    let tuck_x = match flow.direction {
      Direction::Ltr => content_left,
      Direction::Rtl => content_left + flow.content_width - tuck_geo.width,
    };
    let geo = &mut tree.get_mut(tuck_id).geometry;
    geo.x = tuck_x;
    geo.y = content_top + final_y;
  }

  if cm.self_collapsing {
    // Self-collapsing children leave the cursor alone; their margins stay
    // in the chain.
    cursor
  } else {
    final_y + tree.get(child).geometry.height
  }
}

/// Containing width and x-offset for a child, narrowed past floats when the
/// child is the kind that flows around them (a BFC-establishing box).
fn horizontal_band(
  child_style: &ComputedStyle,
  flow: &FlowState,
  ctx: &LayoutContext<'_>,
  y: f32,
) -> (f32, LayoutConstraints) {
  let full = LayoutConstraints {
    containing_width: flow.content_width,
    containing_height: flow.child_height_base,
  };
  if !child_style.establishes_bfc() || ctx.floats.is_empty() {
    return (0.0, full);
  }
  let band_y = flow.content_origin_bfc.y + y;
  let left = ctx.floats.left_offset_at(band_y).offset;
  let right = ctx.floats.right_offset_at(band_y).offset;
  let band_left = (left - flow.content_origin_bfc.x).max(0.0);
  let band_right = (right - flow.content_origin_bfc.x).min(flow.content_width);
  let band_width = (band_right - band_left).max(0.0);
  if band_width >= flow.content_width {
    (0.0, full)
  } else {
    (band_left, full.with_width(band_width))
  }
}

/// Horizontal dimensions for a table cell: the border box fills the width
/// assigned by the column model, margins do not apply.
fn cell_fill_width(style: &ComputedStyle, border_box_width: f32) -> width::ComputedBlockWidth {
  let border = style.border_widths();
  let padding = style.padding_sizes(border_box_width);
  width::ComputedBlockWidth {
    margin_left: 0.0,
    border_left: border.left,
    padding_left: padding.left,
    content_width: (border_box_width
      - border.horizontal()
      - padding.horizontal())
    .max(0.0),
    padding_right: padding.right,
    border_right: border.right,
    margin_right: 0.0,
  }
}

fn relative_offset(
  style: &ComputedStyle,
  containing_width: f32,
  containing_height: Option<f32>,
) -> (f32, f32) {
  let dx = if let Some(left) = style.left.as_ref() {
    left.resolve_against(containing_width)
  } else if let Some(right) = style.right.as_ref() {
    -right.resolve_against(containing_width)
  } else {
    0.0
  };
  let dy = if let Some(top) = style.top.as_ref() {
    top.maybe_resolve(containing_height).unwrap_or(0.0)
  } else if let Some(bottom) = style.bottom.as_ref() {
    -bottom.maybe_resolve(containing_height).unwrap_or(0.0)
  } else {
    0.0
  };
  (dx, dy)
}

fn parent_content_left(tree: &BoxTree, child: BoxId) -> f32 {
  let parent = tree.get(child).parent.expect("flow child has a parent");
  let geo = &tree.get(parent).geometry;
  geo.border.left + geo.padding.left
}

fn parent_content_top(tree: &BoxTree, child: BoxId) -> f32 {
  let parent = tree.get(child).parent.expect("flow child has a parent");
  let geo = &tree.get(parent).geometry;
  geo.border.top + geo.padding.top
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::Length;
  use std::sync::Arc;

  #[test]
  fn test_classify() {
    let float = ComputedStyle {
      float: Float::Left,
      ..Default::default()
    };
    let abs = ComputedStyle {
      position: Position::Absolute,
      ..Default::default()
    };
    let run_in = ComputedStyle {
      display: Display::RunIn,
      ..Default::default()
    };
    let compact = ComputedStyle {
      display: Display::Compact,
      ..Default::default()
    };
    assert_eq!(classify(&float), ChildClass::Floating);
    assert_eq!(classify(&abs), ChildClass::OutOfFlow);
    assert_eq!(classify(&run_in), ChildClass::RunIn);
    assert_eq!(classify(&compact), ChildClass::Compact);
    assert_eq!(classify(&ComputedStyle::default()), ChildClass::Normal);
  }

  #[test]
  fn test_positioned_float_classifies_as_out_of_flow() {
    // position: absolute wins over float.
    let both = ComputedStyle {
      float: Float::Left,
      position: Position::Absolute,
      ..Default::default()
    };
    assert_eq!(classify(&both), ChildClass::OutOfFlow);
  }

  #[test]
  fn test_cell_fill_width_ignores_style_width() {
    let style = ComputedStyle {
      display: Display::TableCell,
      width: Some(Length::px(999.0)),
      padding_left: Length::px(4.0),
      padding_right: Length::px(4.0),
      ..Default::default()
    };
    let cw = cell_fill_width(&style, 120.0);
    assert_eq!(cw.border_box_width(), 120.0);
    assert_eq!(cw.content_width, 112.0);
    assert_eq!(cw.margin_left, 0.0);
    assert_eq!(cw.margin_right, 0.0);
  }

  #[test]
  fn test_relative_offset_prefers_left_and_top() {
    let style = ComputedStyle {
      left: Some(Length::px(10.0)),
      right: Some(Length::px(99.0)),
      top: Some(Length::px(5.0)),
      ..Default::default()
    };
    assert_eq!(relative_offset(&style, 100.0, None), (10.0, 5.0));
  }

  #[test]
  fn test_relative_offset_falls_back_to_right_and_bottom() {
    let style = ComputedStyle {
      right: Some(Length::px(10.0)),
      bottom: Some(Length::px(5.0)),
      ..Default::default()
    };
    assert_eq!(relative_offset(&style, 100.0, Some(50.0)), (-10.0, -5.0));
  }

  #[test]
  fn test_relative_percent_top_without_base_is_zero() {
    let style = ComputedStyle {
      top: Some(Length::percent(10.0)),
      ..Default::default()
    };
    assert_eq!(relative_offset(&style, 100.0, None), (0.0, 0.0));
  }

  #[test]
  fn test_arc_style_snapshot_is_cheap() {
    // Styles are shared; cloning must not deep-copy.
    let style = Arc::new(ComputedStyle::default());
    let clone = style.clone();
    assert!(Arc::ptr_eq(&style, &clone));
  }
}
