//! Layout algorithms
//!
//! This module turns a styled box tree into final geometry. Layout is a
//! single-threaded recursive descent: a container finishes the layout of all
//! its children before returning, and a second pass over an unchanged tree
//! reproduces identical geometry.
//!
//! # Module organization
//!
//! - `constraints` - containing-block bases passed down the recursion
//! - `float_context` - per-BFC float tracker
//! - `contexts/block` - block layout (margin collapsing, width resolution)
//! - `contexts/positioned` - deferred absolutely-positioned placement
//! - `contexts/table` - table structure and the two column strategies
//! - `fragmentation` - page-break handling
//! - `engine` - the public entry points

pub mod constraints;
pub mod contexts;
pub mod engine;
pub mod float_context;
pub mod fragmentation;

pub use constraints::LayoutConstraints;
pub use engine::{LayoutConfig, LayoutEngine, PageOptions};
pub use float_context::{EdgeQuery, FloatContext, FloatEntry, FloatSide};

use crate::geometry::Point;
use crate::style::Display;
use crate::tree::{BoxId, BoxKind, BoxTree};
use fragmentation::PageState;

/// Per-pass shared state threaded through the recursion.
///
/// The float tracker belongs to the nearest ancestor establishing a block
/// formatting context; containers that do not establish one share it (which
/// is how ancestor floats overhang into them). `swap`-style save/restore at
/// BFC roots keeps the scoping explicit without module-level state.
pub(crate) struct LayoutContext<'a> {
  pub config: &'a engine::LayoutConfig,
  pub floats: FloatContext,
  pub page: Option<PageState>,
}

/// Where a box is being laid out, from its parent's point of view.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
  /// Border-box origin in the current BFC's coordinate space
  pub bfc_origin: Point,
  /// Absolute document y of the border-box top (pagination input)
  pub abs_y: f32,
}

impl Placement {
  pub fn root() -> Self {
    Self {
      bfc_origin: Point::ZERO,
      abs_y: 0.0,
    }
  }
}

/// Lays out one box of any kind at the given placement.
pub(crate) fn layout_box(
  tree: &mut BoxTree,
  id: BoxId,
  constraints: LayoutConstraints,
  ctx: &mut LayoutContext<'_>,
  placement: Placement,
) {
  match &tree.get(id).kind {
    BoxKind::Block(_) | BoxKind::TableCell(_) => {
      contexts::block::layout_block(tree, id, constraints, ctx, placement);
    }
    BoxKind::Table(_) => {
      contexts::table::layout_table(tree, id, constraints, ctx, placement);
    }
    BoxKind::Inline => {
      // Inline interiors belong to the external inline-layout collaborator;
      // structurally present, geometrically inert here.
      let node = tree.get_mut(id);
      node.geometry.width = 0.0;
      node.geometry.height = 0.0;
      node.needs_layout = false;
    }
    BoxKind::TableSection(_) | BoxKind::TableRow | BoxKind::TableColumn(_) => {
      // Table internals are laid out by their owning table. Reaching one
      // directly means the tree above it was not repaired; container
      // operations prevent this.
      debug_assert!(false, "table-internal box laid out outside a table");
      tree.get_mut(id).needs_layout = false;
    }
  }
}

/// Content-based minimum and maximum widths of a box (border-box values).
///
/// The minimum is the narrowest width at which the box can be laid out
/// without overflow; the maximum is its single-line width. Every box kind
/// can answer, so the block engine can shrink-to-fit floats and the table
/// strategies can size columns.
pub(crate) fn intrinsic_widths(tree: &BoxTree, id: BoxId) -> (f32, f32) {
  let node = tree.get(id);
  let style = node.style.clone();

  // Percentages cannot contribute to intrinsic widths; they resolve against
  // a base this query exists to compute.
  let border = style.border_widths();
  let padding = style.padding_sizes(0.0);
  let edges = border.horizontal() + padding.horizontal();

  if let Some(width) = style.width.as_ref().filter(|w| !w.is_percent()) {
    let w = match style.box_sizing {
      crate::style::BoxSizing::ContentBox => width.value.max(0.0) + edges,
      crate::style::BoxSizing::BorderBox => width.value.max(0.0),
    };
    let w = clamp_intrinsic(&style, w, edges);
    return (w, w);
  }

  let (content_min, content_max) = match &node.kind {
    BoxKind::Block(block) => {
      if block.children_inline {
        block
          .inline_content
          .as_ref()
          .map(|c| (c.min_width, c.max_width))
          .unwrap_or((0.0, 0.0))
      } else {
        block_children_intrinsic(tree, id)
      }
    }
    BoxKind::TableCell(cell) => {
      if cell.block.children_inline {
        cell
          .block
          .inline_content
          .as_ref()
          .map(|c| (c.min_width, c.max_width))
          .unwrap_or((0.0, 0.0))
      } else {
        block_children_intrinsic(tree, id)
      }
    }
    BoxKind::Table(_) => contexts::table::intrinsic_table_widths(tree, id),
    BoxKind::Inline | BoxKind::TableSection(_) | BoxKind::TableRow | BoxKind::TableColumn(_) => {
      (0.0, 0.0)
    }
  };

  let min = clamp_intrinsic(&style, content_min + edges, edges);
  let max = clamp_intrinsic(&style, content_max + edges, edges).max(min);
  (min, max)
}

fn clamp_intrinsic(style: &crate::style::ComputedStyle, width: f32, edges: f32) -> f32 {
  let mut clamped = width;
  if let Some(max) = style.max_width.as_ref().filter(|w| !w.is_percent()) {
    clamped = clamped.min(max.value.max(0.0) + edges);
  }
  if let Some(min) = style.min_width.as_ref().filter(|w| !w.is_percent()) {
    clamped = clamped.max(min.value.max(0.0) + edges);
  }
  clamped.max(0.0)
}

fn block_children_intrinsic(tree: &BoxTree, id: BoxId) -> (f32, f32) {
  let mut min: f32 = 0.0;
  let mut max: f32 = 0.0;
  for &child in &tree.get(id).children {
    let child_node = tree.get(child);
    if child_node.style.is_out_of_flow_positioned() {
      continue;
    }
    if matches!(child_node.style.display, Display::None) {
      continue;
    }
    let (child_min, child_max) = intrinsic_widths(tree, child);
    let margins = horizontal_margins_px(&child_node.style);
    min = min.max(child_min + margins);
    max = max.max(child_max + margins);
  }
  (min, max)
}

/// Pixel horizontal margins; auto and percentage contribute nothing to
/// intrinsic sizing.
fn horizontal_margins_px(style: &crate::style::ComputedStyle) -> f32 {
  let px = |m: &Option<crate::style::Length>| {
    m.as_ref()
      .filter(|l| !l.is_percent())
      .map(|l| l.value)
      .unwrap_or(0.0)
  };
  px(&style.margin_left) + px(&style.margin_right)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::{ComputedStyle, Length};
  use crate::tree::{BoxTree, InlineContent, LineBox};
  use std::sync::Arc;

  fn block_style() -> Arc<ComputedStyle> {
    Arc::new(ComputedStyle::default())
  }

  #[test]
  fn test_intrinsic_widths_fixed_width() {
    let mut tree = BoxTree::new(block_style());
    let b = tree.create_box(Arc::new(ComputedStyle {
      width: Some(Length::px(120.0)),
      ..Default::default()
    }));
    assert_eq!(intrinsic_widths(&tree, b), (120.0, 120.0));
  }

  #[test]
  fn test_intrinsic_widths_from_inline_content() {
    let mut tree = BoxTree::new(block_style());
    let b = tree.create_box(block_style());
    tree.set_inline_content(
      b,
      InlineContent {
        lines: vec![LineBox {
          width: 80.0,
          height: 16.0,
          baseline: 12.0,
        }],
        min_width: 50.0,
        max_width: 80.0,
      },
    );
    assert_eq!(intrinsic_widths(&tree, b), (50.0, 80.0));
  }

  #[test]
  fn test_intrinsic_widths_take_max_over_children() {
    let mut tree = BoxTree::new(block_style());
    let root = tree.root();
    let a = tree.create_box(Arc::new(ComputedStyle {
      width: Some(Length::px(60.0)),
      ..Default::default()
    }));
    let b = tree.create_box(Arc::new(ComputedStyle {
      width: Some(Length::px(90.0)),
      ..Default::default()
    }));
    tree.add_child(root, a, None).unwrap();
    tree.add_child(root, b, None).unwrap();
    assert_eq!(intrinsic_widths(&tree, root), (90.0, 90.0));
  }

  #[test]
  fn test_intrinsic_widths_include_edges() {
    let mut tree = BoxTree::new(block_style());
    let b = tree.create_box(Arc::new(ComputedStyle {
      width: Some(Length::px(100.0)),
      padding_left: Length::px(10.0),
      padding_right: Length::px(10.0),
      ..Default::default()
    }));
    assert_eq!(intrinsic_widths(&tree, b), (120.0, 120.0));
  }

  #[test]
  fn test_intrinsic_widths_respect_min_width() {
    let mut tree = BoxTree::new(block_style());
    let b = tree.create_box(Arc::new(ComputedStyle {
      min_width: Some(Length::px(70.0)),
      ..Default::default()
    }));
    let (min, max) = intrinsic_widths(&tree, b);
    assert_eq!(min, 70.0);
    assert_eq!(max, 70.0);
  }
}
