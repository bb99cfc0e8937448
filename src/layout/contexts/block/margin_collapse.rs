//! Margin collapsing
//!
//! Vertical margins between block boxes combine ("collapse") into a single
//! margin rather than accumulating:
//!
//! - all positive: maximum of the margins
//! - all negative: most negative of the margins
//! - mixed: largest positive plus most negative
//!
//! Tracking the positive and negative maxima separately makes the collapsed
//! value computable for any chain of margins. One [`MarginCollapseContext`]
//! lives per block-layout pass; it decides, child by child, whether a margin
//! becomes vertical offset, folds into the container's own top margin (while
//! still "at the top" of the block), or folds into the container's bottom
//! margin at the end.
//!
//! Quirks-mode documents mark default margins as quirky; those margins fold
//! normally but do not add trailing height to a quirk container on their
//! own. The flag travels through as a side channel.

use crate::tree::box_tree::CollapsedMargins;

/// A collapsible margin tracked as separate positive/negative maxima.
///
/// The negative component is stored as an absolute value so both components
/// combine with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollapsibleMargin {
  /// Largest positive margin (0 if none)
  pub positive: f32,
  /// Most negative margin, as absolute value (0 if none)
  pub negative: f32,
}

impl CollapsibleMargin {
  /// No margin contribution.
  pub const ZERO: Self = Self {
    positive: 0.0,
    negative: 0.0,
  };

  /// Creates from explicit positive/negative components.
  pub fn new(positive: f32, negative: f32) -> Self {
    debug_assert!(positive >= 0.0 && negative >= 0.0);
    Self { positive, negative }
  }

  /// Creates from a single margin value.
  pub fn from_margin(value: f32) -> Self {
    if value >= 0.0 {
      Self {
        positive: value,
        negative: 0.0,
      }
    } else {
      Self {
        positive: 0.0,
        negative: -value,
      }
    }
  }

  /// Collapses with another margin: component-wise maxima.
  pub fn collapse_with(self, other: Self) -> Self {
    Self {
      positive: self.positive.max(other.positive),
      negative: self.negative.max(other.negative),
    }
  }

  /// The collapsed pixel value.
  pub fn resolve(self) -> f32 {
    self.positive - self.negative
  }

  /// True if no margin has been folded in.
  pub fn is_zero(self) -> bool {
    self.positive == 0.0 && self.negative == 0.0
  }
}

/// Views into the two collapsed halves a finished box exposes to its parent.
pub trait ChildMargins {
  fn top(&self) -> CollapsibleMargin;
  fn bottom(&self) -> CollapsibleMargin;
}

impl ChildMargins for CollapsedMargins {
  fn top(&self) -> CollapsibleMargin {
    CollapsibleMargin::new(self.top_pos, self.top_neg)
  }

  fn bottom(&self) -> CollapsibleMargin {
    CollapsibleMargin::new(self.bottom_pos, self.bottom_neg)
  }
}

/// Whether the container may fold child margins into its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseEligibility {
  /// No top border/padding, normal flow, no new BFC: the first child's top
  /// margin folds into the container's
  pub with_top: bool,
  /// No bottom border/padding and auto height: the last margin folds into
  /// the container's bottom margin instead of its height
  pub with_bottom: bool,
  /// The document is in quirks mode
  pub quirk_container: bool,
}

/// Result of finishing a block's margin pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollapseOutcome {
  /// Height to add below the last child for an unfolded trailing margin
  pub trailing_height: f32,
  /// The container's collapsed top margin (own margin plus folded children)
  pub top: CollapsibleMargin,
  /// The container's collapsed bottom margin
  pub bottom: CollapsibleMargin,
  /// Quirk flags for the two halves
  pub top_quirk: bool,
  pub bottom_quirk: bool,
}

/// State machine for one block container's child-positioning pass.
#[derive(Debug, Clone)]
pub struct MarginCollapseContext {
  eligibility: CollapseEligibility,
  /// Margin accumulated but not yet turned into offset
  pending: CollapsibleMargin,
  pending_quirk: bool,
  /// No non-self-collapsing child placed yet
  at_top: bool,
  /// Container's own top margin, grown by folded children
  top: CollapsibleMargin,
  top_quirk: bool,
  /// Container's own bottom margin, grown at finish
  bottom: CollapsibleMargin,
  bottom_quirk: bool,
}

impl MarginCollapseContext {
  /// Seeds the pass from the container's own margins and eligibility.
  pub fn new(
    eligibility: CollapseEligibility,
    own_top: CollapsibleMargin,
    own_top_quirk: bool,
    own_bottom: CollapsibleMargin,
    own_bottom_quirk: bool,
  ) -> Self {
    Self {
      eligibility,
      pending: CollapsibleMargin::ZERO,
      pending_quirk: true,
      at_top: true,
      top: own_top,
      top_quirk: own_top_quirk,
      bottom: own_bottom,
      bottom_quirk: own_bottom_quirk,
    }
  }

  /// True until the first real (non-self-collapsing) child lands.
  pub fn at_top(&self) -> bool {
    self.at_top
  }

  /// Margin currently awaiting resolution.
  pub fn pending(&self) -> CollapsibleMargin {
    self.pending
  }

  /// Offset the next child would get, for position estimation.
  ///
  /// Matches what [`Self::commit_child`] will return for a non-clearance,
  /// non-self-collapsing child with these top margins.
  pub fn estimate_offset(&self, child_top: CollapsibleMargin) -> f32 {
    let combined = self.pending.collapse_with(child_top);
    if self.at_top && self.eligibility.with_top {
      0.0
    } else {
      combined.resolve()
    }
  }

  /// Resolves the margin before a child and updates the state.
  ///
  /// Returns the vertical offset to place the child's border-box top at,
  /// measured from the current layout cursor. A self-collapsing child only
  /// extends the pending chain: its offset is where the chain currently
  /// resolves, and the cursor must not advance past it.
  pub fn commit_child(&mut self, child: &CollapsedMargins) -> f32 {
    if child.self_collapsing {
      // The child's two halves collapse together and join the chain.
      let folded = child.top().collapse_with(child.bottom());
      let offset = self.estimate_offset(CollapsibleMargin::ZERO);
      self.pending = self.pending.collapse_with(folded);
      self.pending_quirk = self.pending_quirk && child.top_quirk && child.bottom_quirk;
      return offset;
    }

    let combined = self.pending.collapse_with(child.top());
    let combined_quirk = self.pending_quirk && child.top_quirk;
    let offset = if self.at_top && self.eligibility.with_top {
      self.top = self.top.collapse_with(combined);
      self.top_quirk = self.top_quirk && combined_quirk;
      0.0
    } else {
      combined.resolve()
    };

    self.at_top = false;
    self.pending = child.bottom();
    self.pending_quirk = child.bottom_quirk;
    offset
  }

  /// Resolves the margin before a child that has clearance.
  ///
  /// Clearance breaks the collapse chain: the pending margin becomes real
  /// space, the child's own top margin stacks on top of it (no collapsing),
  /// and folding into the container's top margin is no longer possible.
  pub fn commit_child_with_clearance(&mut self, child: &CollapsedMargins) -> f32 {
    let before = self.pending.resolve();
    self.pending = CollapsibleMargin::ZERO;
    self.pending_quirk = false;
    self.at_top = false;

    if child.self_collapsing {
      let folded = child.top().collapse_with(child.bottom());
      self.pending = folded;
      self.pending_quirk = child.top_quirk && child.bottom_quirk;
      before
    } else {
      let offset = before + child.top().resolve();
      self.pending = child.bottom();
      self.pending_quirk = child.bottom_quirk;
      offset
    }
  }

  /// Ends the pass after the last child.
  ///
  /// Folds the trailing margin into the container's bottom margin when
  /// permitted; otherwise reports it as height to add below the last child.
  /// In a quirk container an all-quirk trailing margin adds no height.
  pub fn finish(mut self) -> CollapseOutcome {
    let mut trailing_height = 0.0;
    if self.eligibility.with_bottom {
      if self.at_top && self.eligibility.with_top {
        // Nothing separated top from bottom: the whole chain folds through.
        self.top = self.top.collapse_with(self.pending);
        self.top_quirk = self.top_quirk && self.pending_quirk;
      } else {
        self.bottom = self.bottom.collapse_with(self.pending);
        self.bottom_quirk = self.bottom_quirk && self.pending_quirk;
      }
    } else if !(self.eligibility.quirk_container && self.pending_quirk) {
      trailing_height = self.pending.resolve().max(0.0);
    }

    CollapseOutcome {
      trailing_height,
      top: self.top,
      bottom: self.bottom,
      top_quirk: self.top_quirk,
      bottom_quirk: self.bottom_quirk,
    }
  }
}

/// Decides whether a finished box is self-collapsing: zero computed height,
/// auto or zero specified height, and nothing (border, padding, min-height,
/// line content) holding its edges apart.
pub fn is_self_collapsing(
  content_height: f32,
  specified_height_is_auto_or_zero: bool,
  border_padding_vertical: f32,
  min_height: f32,
  has_line_content: bool,
) -> bool {
  content_height == 0.0
    && specified_height_is_auto_or_zero
    && border_padding_vertical == 0.0
    && min_height == 0.0
    && !has_line_content
}
