//! Page-break fragmentation
//!
//! When paginated output is requested the block and table engines consult a
//! [`PageState`] while positioning children. The state maintains a running
//! page-bottom threshold (multiples of a fixed page height from a top
//! offset); a child whose vertical interval crosses the threshold is moved
//! down to the next page boundary, and the added space propagates to the
//! container and following siblings through the normal cursor flow - or,
//! for post-hoc adjustments, through [`add_space_at`].

use crate::style::{BreakBetween, BreakInside};
use crate::tree::{BoxId, BoxTree};
use log::debug;

/// Pagination parameters for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageState {
  /// Block size of one page; must be positive for pagination to engage
  pub page_height: f32,
  /// Document y where the first page starts
  pub top_offset: f32,
}

impl PageState {
  pub fn new(page_height: f32, top_offset: f32) -> Self {
    Self {
      page_height,
      top_offset,
    }
  }

  /// The page boundary at or after `y` (absolute document coordinates).
  pub fn next_boundary(&self, y: f32) -> f32 {
    if self.page_height <= 0.0 {
      return y;
    }
    let rel = (y - self.top_offset).max(0.0);
    let page = (rel / self.page_height).ceil();
    self.top_offset + page * self.page_height
  }

  /// The bottom of the page containing `y`.
  pub fn page_bottom(&self, y: f32) -> f32 {
    if self.page_height <= 0.0 {
      return f32::INFINITY;
    }
    let rel = (y - self.top_offset).max(0.0);
    let page = (rel / self.page_height).floor();
    self.top_offset + (page + 1.0) * self.page_height
  }

  /// True if the interval `[y, y + height)` crosses its page's bottom.
  pub fn crosses_boundary(&self, y: f32, height: f32) -> bool {
    if self.page_height <= 0.0 || height <= 0.0 {
      return false;
    }
    y + height > self.page_bottom(y) + 0.01
  }

  /// Where a child at `y` with the given height and break properties should
  /// actually be placed.
  ///
  /// A forced break-before always starts a new page. A child that crosses
  /// the boundary moves to the next page when it could fit on one page and
  /// either asks to avoid inside breaks or is shorter than the remaining
  /// room policy allows. Children taller than a page stay put - the break
  /// defers to an ancestor that can absorb it.
  pub fn adjusted_position(
    &self,
    y: f32,
    height: f32,
    break_before: BreakBetween,
    break_inside: BreakInside,
  ) -> f32 {
    if self.page_height <= 0.0 {
      return y;
    }
    if break_before == BreakBetween::Page {
      let boundary = self.next_boundary(y);
      // Already flush on a boundary counts as satisfied.
      if boundary - y > 0.01 {
        return boundary;
      }
    }
    if !self.crosses_boundary(y, height) {
      return y;
    }
    if height > self.page_height {
      // Cannot fit on any page; breaking inside is unavoidable.
      return y;
    }
    if break_inside == BreakInside::Avoid || height <= self.page_height {
      return self.page_bottom(y);
    }
    y
  }
}

/// Shifts every box in `container`'s subtree whose top sits at or below
/// `position` (in the container's content space) down by `delta`, growing
/// the container. The explicit form of "add space at position" used when a
/// break is discovered after following siblings were already placed.
pub fn add_space_at(tree: &mut BoxTree, container: BoxId, position: f32, delta: f32) {
  if delta <= 0.0 {
    return;
  }
  debug!(
    "adding {}px of space at {} inside {:?}",
    delta, position, container
  );
  let content_top = {
    let geo = &tree.get(container).geometry;
    geo.border.top + geo.padding.top
  };
  let children = tree.get(container).children.clone();
  for child in children {
    let child_top = tree.get(child).geometry.y - content_top;
    if child_top >= position - 0.01 {
      tree.get_mut(child).geometry.y += delta;
    }
  }
  let geo = &mut tree.get_mut(container).geometry;
  geo.height += delta;
  geo.overflow = geo
    .overflow
    .union(&crate::geometry::Rect::from_xywh(0.0, 0.0, geo.width, geo.height));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_next_boundary() {
    let page = PageState::new(100.0, 0.0);
    assert_eq!(page.next_boundary(0.0), 0.0);
    assert_eq!(page.next_boundary(1.0), 100.0);
    assert_eq!(page.next_boundary(100.0), 100.0);
    assert_eq!(page.next_boundary(150.0), 200.0);
  }

  #[test]
  fn test_page_bottom_with_offset() {
    let page = PageState::new(100.0, 20.0);
    assert_eq!(page.page_bottom(20.0), 120.0);
    assert_eq!(page.page_bottom(119.0), 120.0);
    assert_eq!(page.page_bottom(120.0), 220.0);
  }

  #[test]
  fn test_crosses_boundary() {
    let page = PageState::new(100.0, 0.0);
    assert!(!page.crosses_boundary(0.0, 100.0));
    assert!(page.crosses_boundary(50.0, 60.0));
    assert!(!page.crosses_boundary(50.0, 50.0));
  }

  #[test]
  fn test_adjusted_position_pushes_crossing_child() {
    let page = PageState::new(100.0, 0.0);
    let pos = page.adjusted_position(80.0, 40.0, BreakBetween::Auto, BreakInside::Auto);
    assert_eq!(pos, 100.0);
  }

  #[test]
  fn test_adjusted_position_leaves_fitting_child() {
    let page = PageState::new(100.0, 0.0);
    let pos = page.adjusted_position(40.0, 40.0, BreakBetween::Auto, BreakInside::Auto);
    assert_eq!(pos, 40.0);
  }

  #[test]
  fn test_oversized_child_defers_to_ancestor() {
    let page = PageState::new(100.0, 0.0);
    // Taller than a page: pushing cannot help, stays for the ancestor.
    let pos = page.adjusted_position(80.0, 250.0, BreakBetween::Auto, BreakInside::Avoid);
    assert_eq!(pos, 80.0);
  }

  #[test]
  fn test_forced_break_before() {
    let page = PageState::new(100.0, 0.0);
    let pos = page.adjusted_position(30.0, 10.0, BreakBetween::Page, BreakInside::Auto);
    assert_eq!(pos, 100.0);
    // Flush on a boundary already satisfies the forced break.
    let pos = page.adjusted_position(100.0, 10.0, BreakBetween::Page, BreakInside::Auto);
    assert_eq!(pos, 100.0);
  }
}
