//! Geometry snapshots
//!
//! Serializes the post-layout tree to a JSON-friendly structure for
//! golden-file comparisons and bug reports. The snapshot carries only what
//! layout produced - no styles, no content.

use crate::geometry::Rect;
use crate::tree::{BoxId, BoxKind, BoxTree};
use serde::Serialize;

/// One box's geometry in a snapshot tree.
#[derive(Debug, Clone, Serialize)]
pub struct GeometrySnapshot {
  /// Box kind tag ("block", "table", ...)
  pub kind: &'static str,
  /// Arena slot, stable across identical passes
  pub id: usize,
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
  pub overflow: Rect,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<GeometrySnapshot>,
}

fn kind_tag(kind: &BoxKind) -> &'static str {
  match kind {
    BoxKind::Block(_) => "block",
    BoxKind::Inline => "inline",
    BoxKind::Table(_) => "table",
    BoxKind::TableSection(_) => "section",
    BoxKind::TableRow => "row",
    BoxKind::TableCell(_) => "cell",
    BoxKind::TableColumn(_) => "column",
  }
}

/// Captures the geometry of a subtree.
pub fn geometry_snapshot(tree: &BoxTree, root: BoxId) -> GeometrySnapshot {
  let node = tree.get(root);
  GeometrySnapshot {
    kind: kind_tag(&node.kind),
    id: root.index(),
    x: node.geometry.x,
    y: node.geometry.y,
    width: node.geometry.width,
    height: node.geometry.height,
    overflow: node.geometry.overflow,
    children: node
      .children
      .iter()
      .map(|&c| geometry_snapshot(tree, c))
      .collect(),
  }
}
