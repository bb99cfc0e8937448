//! Float tracking per block formatting context
//!
//! One [`FloatContext`] exists per block formatting context and records every
//! floated box placed inside it, in BFC coordinates (relative to the content
//! box of the BFC root). Block containers that do not establish their own
//! context share the ancestor's tracker through a coordinate translation, so
//! ancestor floats "overhang" into them.
//!
//! Placement runs in two steps mirroring the engine's flow: floats are
//! inserted as *pending* while the current child is positioned, then
//! [`FloatContext::place_pending`] walks the pending list in insertion order
//! and finds, for each float, the lowest vertical offset at which its margin
//! box fits between the dynamic left/right edges. Ties are broken by
//! insertion order, and a float is never placed above the top of the float
//! placed before it.

use crate::geometry::{Point, Rect, Size};
use crate::style::Clear;
use crate::tree::BoxId;
use log::trace;

/// Side a box floats to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatSide {
  Left,
  Right,
}

/// A placed float: the box reference plus the margin-box rectangle it
/// occupies. The entry never owns the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatEntry {
  pub box_id: BoxId,
  pub side: FloatSide,
  /// Margin box in BFC coordinates; occupies `[rect.y(), rect.max_y())`
  pub rect: Rect,
  /// The float itself carried a clear property when it was placed
  pub has_clear: bool,
}

/// A float inserted but not yet positioned.
#[derive(Debug, Clone, Copy)]
struct PendingFloat {
  box_id: BoxId,
  side: FloatSide,
  size: Size,
  /// Lowest acceptable top edge (the flow position where the float occurred)
  natural_y: f32,
  has_clear: bool,
}

/// Result of an edge query at a vertical offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeQuery {
  /// Usable inner edge at the queried offset
  pub offset: f32,
  /// Vertical room below the queried offset before any float edge can
  /// change the answer; `f32::INFINITY` when no edge lies below
  pub room: f32,
  /// The governing float was itself pushed down by a clear boundary, so
  /// content cannot narrow into the band above it
  pub blocked_by_clear: bool,
}

/// Float tracker for one block formatting context.
#[derive(Debug, Clone, Default)]
pub struct FloatContext {
  width: f32,
  floats: Vec<FloatEntry>,
  pending: Vec<PendingFloat>,
}

impl FloatContext {
  /// Creates a tracker for a BFC with the given content width.
  pub fn new(width: f32) -> Self {
    Self {
      width: width.max(0.0),
      floats: Vec::new(),
      pending: Vec::new(),
    }
  }

  /// Content width of the BFC root.
  pub fn containing_width(&self) -> f32 {
    self.width
  }

  /// Returns true when no float has been placed or queued.
  pub fn is_empty(&self) -> bool {
    self.floats.is_empty() && self.pending.is_empty()
  }

  /// Number of placed floats.
  pub fn placed_count(&self) -> usize {
    self.floats.len()
  }

  /// Placed floats, in placement order.
  pub fn entries(&self) -> &[FloatEntry] {
    &self.floats
  }

  /// Forgets floats placed after the first `len`, for the bounded re-layout
  /// of a child whose estimated position was wrong.
  pub fn truncate_placed(&mut self, len: usize) {
    self.floats.truncate(len);
  }

  /// Records a float pending placement.
  pub fn insert(
    &mut self,
    box_id: BoxId,
    side: FloatSide,
    size: Size,
    natural_y: f32,
    has_clear: bool,
  ) {
    self.pending.push(PendingFloat {
      box_id,
      side,
      size: Size::new(size.width.max(0.0), size.height.max(0.0)),
      natural_y,
      has_clear,
    });
  }

  /// Positions every pending float, in insertion order.
  ///
  /// Returns the margin-box origin chosen for each float so the engine can
  /// write geometry. A float's top is never above the top of the float
  /// placed before it.
  pub fn place_pending(&mut self) -> Vec<(BoxId, Point)> {
    let pending = std::mem::take(&mut self.pending);
    let mut placements = Vec::with_capacity(pending.len());
    for float in pending {
      let mut start_y = float.natural_y;
      if let Some(last) = self.floats.last() {
        start_y = start_y.max(last.rect.y());
      }
      if float.has_clear {
        // A float with clear starts below the floats it must clear.
        start_y = start_y.max(self.float_bottom());
      }
      let origin = self.find_position(float.side, float.size, start_y);
      trace!(
        "float {:?} placed at ({}, {}) [{}x{}]",
        float.box_id,
        origin.x,
        origin.y,
        float.size.width,
        float.size.height
      );
      self.floats.push(FloatEntry {
        box_id: float.box_id,
        side: float.side,
        rect: Rect::new(origin, float.size),
        has_clear: float.has_clear,
      });
      placements.push((float.box_id, origin));
    }
    placements
  }

  /// Lowest position at which the margin box fits between the edges.
  fn find_position(&self, side: FloatSide, size: Size, start_y: f32) -> Point {
    let mut y = start_y;
    loop {
      let (left, right, room) = self.band_at(y, size.height);
      let fits = right - left >= size.width;
      // A float wider than the whole context still has to land somewhere;
      // it goes where no other float constrains it.
      let unconstrained = left <= 0.0 && right >= self.width;
      if fits || (unconstrained && room == f32::INFINITY) || room == f32::INFINITY {
        // Either it fits, or no edge below can widen the band any further.
        let x = match side {
          FloatSide::Left => left,
          FloatSide::Right => right - size.width,
        };
        return Point::new(x, y);
      }
      y += room;
    }
  }

  /// Most constrained band over `[y, y + height)` plus the distance to the
  /// next edge below `y`.
  fn band_at(&self, y: f32, height: f32) -> (f32, f32, f32) {
    let y_end = if height > 0.0 { y + height } else { y };
    let mut left = 0.0_f32;
    let mut right = self.width;
    let mut room = f32::INFINITY;
    for entry in &self.floats {
      let covers = entry.rect.y() < y_end + f32::EPSILON && entry.rect.max_y() > y;
      if covers {
        match entry.side {
          FloatSide::Left => left = left.max(entry.rect.max_x()),
          FloatSide::Right => right = right.min(entry.rect.x()),
        }
      }
      for edge in [entry.rect.y(), entry.rect.max_y()] {
        if edge > y {
          room = room.min(edge - y);
        }
      }
    }
    (left, right, room)
  }

  /// Usable left inner edge at a vertical offset.
  pub fn left_offset_at(&self, y: f32) -> EdgeQuery {
    let mut offset = 0.0_f32;
    let mut room = f32::INFINITY;
    let mut blocked_by_clear = false;
    for entry in &self.floats {
      let covers = entry.rect.y() <= y && entry.rect.max_y() > y;
      if covers && entry.side == FloatSide::Left && entry.rect.max_x() > offset {
        offset = entry.rect.max_x();
        blocked_by_clear = entry.has_clear;
      }
      for edge in [entry.rect.y(), entry.rect.max_y()] {
        if edge > y {
          room = room.min(edge - y);
        }
      }
    }
    EdgeQuery {
      offset,
      room,
      blocked_by_clear,
    }
  }

  /// Usable right inner edge at a vertical offset.
  pub fn right_offset_at(&self, y: f32) -> EdgeQuery {
    let mut offset = self.width;
    let mut room = f32::INFINITY;
    let mut blocked_by_clear = false;
    for entry in &self.floats {
      let covers = entry.rect.y() <= y && entry.rect.max_y() > y;
      if covers && entry.side == FloatSide::Right && entry.rect.x() < offset {
        offset = entry.rect.x();
        blocked_by_clear = entry.has_clear;
      }
      for edge in [entry.rect.y(), entry.rect.max_y()] {
        if edge > y {
          room = room.min(edge - y);
        }
      }
    }
    EdgeQuery {
      offset,
      room,
      blocked_by_clear,
    }
  }

  /// Available width between both inner edges at a vertical offset.
  pub fn available_width_at(&self, y: f32) -> (f32, f32) {
    let left = self.left_offset_at(y).offset;
    let right = self.right_offset_at(y).offset;
    (left, (right - left).max(0.0))
  }

  /// Lowest bottom edge over all floats.
  pub fn float_bottom(&self) -> f32 {
    self
      .floats
      .iter()
      .map(|f| f.rect.max_y())
      .fold(0.0, f32::max)
  }

  /// Lowest bottom edge over left floats.
  pub fn left_bottom(&self) -> f32 {
    self
      .floats
      .iter()
      .filter(|f| f.side == FloatSide::Left)
      .map(|f| f.rect.max_y())
      .fold(0.0, f32::max)
  }

  /// Lowest bottom edge over right floats.
  pub fn right_bottom(&self) -> f32 {
    self
      .floats
      .iter()
      .filter(|f| f.side == FloatSide::Right)
      .map(|f| f.rect.max_y())
      .fold(0.0, f32::max)
  }

  /// Position after honoring a clear property at `y`.
  pub fn clearance_position(&self, clear: Clear, y: f32) -> f32 {
    let bottom = match clear {
      Clear::None => return y,
      Clear::Left => self.left_bottom(),
      Clear::Right => self.right_bottom(),
      Clear::Both => self.float_bottom(),
    };
    y.max(bottom)
  }

  /// How far `y` must move down to honor a clear property.
  pub fn clearance_amount(&self, clear: Clear, y: f32) -> f32 {
    self.clearance_position(clear, y) - y
  }

  /// Lowest float bottom that overhangs below `y` (used to expand BFC-root
  /// heights past their floats).
  pub fn bottom_overhang(&self, y: f32) -> f32 {
    (self.float_bottom() - y).max(0.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::ComputedStyle;
  use crate::tree::BoxTree;
  use std::sync::Arc;

  fn ids(n: usize) -> Vec<BoxId> {
    // Fabricate distinct handles through a scratch tree.
    let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
    (0..n)
      .map(|_| tree.create_box(Arc::new(ComputedStyle::default())))
      .collect()
  }

  fn place(ctx: &mut FloatContext, id: BoxId, side: FloatSide, w: f32, h: f32, y: f32) -> Point {
    ctx.insert(id, side, Size::new(w, h), y, false);
    ctx.place_pending()[0].1
  }

  #[test]
  fn test_first_left_float_at_origin() {
    let mut ctx = FloatContext::new(800.0);
    let id = ids(1)[0];
    let origin = place(&mut ctx, id, FloatSide::Left, 200.0, 100.0, 0.0);
    assert_eq!(origin, Point::new(0.0, 0.0));
  }

  #[test]
  fn test_left_floats_stack_horizontally() {
    let mut ctx = FloatContext::new(800.0);
    let handles = ids(2);
    place(&mut ctx, handles[0], FloatSide::Left, 200.0, 100.0, 0.0);
    let second = place(&mut ctx, handles[1], FloatSide::Left, 200.0, 100.0, 0.0);
    assert_eq!(second, Point::new(200.0, 0.0));
  }

  #[test]
  fn test_right_float_against_right_edge() {
    let mut ctx = FloatContext::new(800.0);
    let id = ids(1)[0];
    let origin = place(&mut ctx, id, FloatSide::Right, 200.0, 100.0, 0.0);
    assert_eq!(origin, Point::new(600.0, 0.0));
  }

  #[test]
  fn test_second_float_drops_below_when_it_cannot_fit() {
    // Widths 100 then 150 in a 200-wide context: the second drops below.
    let mut ctx = FloatContext::new(200.0);
    let handles = ids(2);
    let first = place(&mut ctx, handles[0], FloatSide::Left, 100.0, 40.0, 0.0);
    let second = place(&mut ctx, handles[1], FloatSide::Left, 150.0, 60.0, 0.0);
    assert_eq!(first, Point::new(0.0, 0.0));
    assert_eq!(second, Point::new(0.0, 40.0));
    assert_eq!(ctx.float_bottom(), 100.0);
  }

  #[test]
  fn test_insertion_order_breaks_ties() {
    let mut ctx = FloatContext::new(300.0);
    let handles = ids(2);
    ctx.insert(handles[0], FloatSide::Left, Size::new(100.0, 50.0), 0.0, false);
    ctx.insert(handles[1], FloatSide::Left, Size::new(100.0, 50.0), 0.0, false);
    let placements = ctx.place_pending();
    assert_eq!(placements[0].1, Point::new(0.0, 0.0));
    assert_eq!(placements[1].1, Point::new(100.0, 0.0));
  }

  #[test]
  fn test_offsets_and_room() {
    let mut ctx = FloatContext::new(800.0);
    let handles = ids(2);
    place(&mut ctx, handles[0], FloatSide::Left, 200.0, 100.0, 0.0);
    place(&mut ctx, handles[1], FloatSide::Right, 100.0, 50.0, 0.0);

    let left = ctx.left_offset_at(25.0);
    assert_eq!(left.offset, 200.0);
    assert_eq!(left.room, 25.0); // right float's bottom at 50 comes first

    let right = ctx.right_offset_at(25.0);
    assert_eq!(right.offset, 700.0);

    // Below both floats everything is open again.
    assert_eq!(ctx.left_offset_at(150.0).offset, 0.0);
    assert_eq!(ctx.right_offset_at(150.0).offset, 800.0);
    assert_eq!(ctx.left_offset_at(150.0).room, f32::INFINITY);
  }

  #[test]
  fn test_available_width_between_floats() {
    let mut ctx = FloatContext::new(800.0);
    let handles = ids(2);
    place(&mut ctx, handles[0], FloatSide::Left, 300.0, 100.0, 0.0);
    place(&mut ctx, handles[1], FloatSide::Right, 300.0, 100.0, 0.0);
    let (left, width) = ctx.available_width_at(50.0);
    assert_eq!(left, 300.0);
    assert_eq!(width, 200.0);
  }

  #[test]
  fn test_per_side_bottoms() {
    let mut ctx = FloatContext::new(800.0);
    let handles = ids(2);
    place(&mut ctx, handles[0], FloatSide::Left, 100.0, 80.0, 0.0);
    place(&mut ctx, handles[1], FloatSide::Right, 100.0, 120.0, 0.0);
    assert_eq!(ctx.left_bottom(), 80.0);
    assert_eq!(ctx.right_bottom(), 120.0);
    assert_eq!(ctx.float_bottom(), 120.0);
  }

  #[test]
  fn test_clearance() {
    let mut ctx = FloatContext::new(800.0);
    let handles = ids(2);
    place(&mut ctx, handles[0], FloatSide::Left, 100.0, 80.0, 0.0);
    place(&mut ctx, handles[1], FloatSide::Right, 100.0, 120.0, 0.0);

    assert_eq!(ctx.clearance_position(Clear::Left, 30.0), 80.0);
    assert_eq!(ctx.clearance_position(Clear::Right, 30.0), 120.0);
    assert_eq!(ctx.clearance_position(Clear::Both, 30.0), 120.0);
    assert_eq!(ctx.clearance_position(Clear::None, 30.0), 30.0);
    assert_eq!(ctx.clearance_amount(Clear::Left, 30.0), 50.0);
    // Clearance never lifts content upward.
    assert_eq!(ctx.clearance_position(Clear::Left, 200.0), 200.0);
  }

  #[test]
  fn test_float_never_above_previously_placed_float() {
    let mut ctx = FloatContext::new(800.0);
    let handles = ids(2);
    place(&mut ctx, handles[0], FloatSide::Left, 100.0, 50.0, 60.0);
    // Requested higher than the previous float's top; clamped to 60.
    let second = place(&mut ctx, handles[1], FloatSide::Left, 100.0, 50.0, 10.0);
    assert_eq!(second.y, 60.0);
  }

  #[test]
  fn test_oversized_float_placed_where_unconstrained() {
    let mut ctx = FloatContext::new(200.0);
    let handles = ids(2);
    place(&mut ctx, handles[0], FloatSide::Left, 150.0, 40.0, 0.0);
    // Wider than the context: drops below the existing float.
    let big = place(&mut ctx, handles[1], FloatSide::Left, 400.0, 40.0, 0.0);
    assert_eq!(big, Point::new(0.0, 40.0));
  }

  #[test]
  fn test_float_with_clear_starts_below_existing_floats() {
    let mut ctx = FloatContext::new(800.0);
    let handles = ids(2);
    place(&mut ctx, handles[0], FloatSide::Left, 100.0, 90.0, 0.0);
    ctx.insert(handles[1], FloatSide::Left, Size::new(100.0, 10.0), 0.0, true);
    let origin = ctx.place_pending()[0].1;
    assert_eq!(origin.y, 90.0);
    assert!(ctx.left_offset_at(95.0).blocked_by_clear);
  }

  #[test]
  fn test_bottom_overhang() {
    let mut ctx = FloatContext::new(800.0);
    let id = ids(1)[0];
    place(&mut ctx, id, FloatSide::Left, 100.0, 120.0, 0.0);
    assert_eq!(ctx.bottom_overhang(80.0), 40.0);
    assert_eq!(ctx.bottom_overhang(200.0), 0.0);
  }
}
