//! The resolved style bundle attached to every box
//!
//! `ComputedStyle` is the inbound interface of the engine: an external style
//! resolver populates one per box before layout runs. Fields use
//! `Option<Length>` where the property has an `auto` (or `none`) value that
//! layout must resolve, and plain `Length` where a concrete value always
//! exists.

use crate::geometry::EdgeSizes;
use crate::style::types::{
  BorderCollapse, BorderStyle, BoxSizing, BreakBetween, BreakInside, CaptionSide, Clear, Direction,
  Display, Float, Overflow, Position, Rgba, TableLayout, VerticalAlign,
};
use crate::style::values::Length;
use serde::Serialize;

/// Resolved style values for one box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
  pub display: Display,
  pub position: Position,
  pub float: Float,
  pub clear: Clear,
  pub direction: Direction,
  pub box_sizing: BoxSizing,
  pub overflow: Overflow,

  /// `None` means `auto`
  pub width: Option<Length>,
  /// `None` means `auto`
  pub height: Option<Length>,
  pub min_width: Option<Length>,
  pub max_width: Option<Length>,
  pub min_height: Option<Length>,
  pub max_height: Option<Length>,

  /// `None` means `auto`
  pub margin_top: Option<Length>,
  pub margin_right: Option<Length>,
  pub margin_bottom: Option<Length>,
  pub margin_left: Option<Length>,

  /// Quirks-mode documents mark default margins so chained collapsing can
  /// discount them; set by the style resolver, read only by the margin
  /// state machine.
  pub margin_top_is_quirk: bool,
  pub margin_bottom_is_quirk: bool,

  pub padding_top: Length,
  pub padding_right: Length,
  pub padding_bottom: Length,
  pub padding_left: Length,

  pub border_top_width: Length,
  pub border_right_width: Length,
  pub border_bottom_width: Length,
  pub border_left_width: Length,
  pub border_top_style: BorderStyle,
  pub border_right_style: BorderStyle,
  pub border_bottom_style: BorderStyle,
  pub border_left_style: BorderStyle,
  pub border_top_color: Rgba,
  pub border_right_color: Rgba,
  pub border_bottom_color: Rgba,
  pub border_left_color: Rgba,

  /// Positioned box offsets; `None` means `auto`
  pub top: Option<Length>,
  pub right: Option<Length>,
  pub bottom: Option<Length>,
  pub left: Option<Length>,

  pub table_layout: TableLayout,
  pub border_collapse: BorderCollapse,
  pub border_spacing_h: Length,
  pub border_spacing_v: Length,
  pub caption_side: CaptionSide,
  pub vertical_align: VerticalAlign,

  pub break_before: BreakBetween,
  pub break_after: BreakBetween,
  pub break_inside: BreakInside,
}

impl Default for ComputedStyle {
  fn default() -> Self {
    Self {
      display: Display::Block,
      position: Position::Static,
      float: Float::None,
      clear: Clear::None,
      direction: Direction::Ltr,
      box_sizing: BoxSizing::ContentBox,
      overflow: Overflow::Visible,
      width: None,
      height: None,
      min_width: None,
      max_width: None,
      min_height: None,
      max_height: None,
      margin_top: Some(Length::ZERO),
      margin_right: Some(Length::ZERO),
      margin_bottom: Some(Length::ZERO),
      margin_left: Some(Length::ZERO),
      margin_top_is_quirk: false,
      margin_bottom_is_quirk: false,
      padding_top: Length::ZERO,
      padding_right: Length::ZERO,
      padding_bottom: Length::ZERO,
      padding_left: Length::ZERO,
      border_top_width: Length::ZERO,
      border_right_width: Length::ZERO,
      border_bottom_width: Length::ZERO,
      border_left_width: Length::ZERO,
      border_top_style: BorderStyle::None,
      border_right_style: BorderStyle::None,
      border_bottom_style: BorderStyle::None,
      border_left_style: BorderStyle::None,
      border_top_color: Rgba::BLACK,
      border_right_color: Rgba::BLACK,
      border_bottom_color: Rgba::BLACK,
      border_left_color: Rgba::BLACK,
      top: None,
      right: None,
      bottom: None,
      left: None,
      table_layout: TableLayout::Auto,
      border_collapse: BorderCollapse::Separate,
      border_spacing_h: Length::ZERO,
      border_spacing_v: Length::ZERO,
      caption_side: CaptionSide::Top,
      vertical_align: VerticalAlign::Baseline,
      break_before: BreakBetween::Auto,
      break_after: BreakBetween::Auto,
      break_inside: BreakInside::Auto,
    }
  }
}

impl ComputedStyle {
  /// Returns true if the box is floated.
  pub fn is_floating(&self) -> bool {
    self.float != Float::None
  }

  /// Returns true if the box is absolutely positioned (out of flow).
  pub fn is_out_of_flow_positioned(&self) -> bool {
    self.position.is_out_of_flow()
  }

  /// Returns true if the box takes part in normal flow.
  pub fn is_in_flow(&self) -> bool {
    !self.is_floating() && !self.is_out_of_flow_positioned()
  }

  /// Returns true when the box establishes a new block formatting context.
  ///
  /// Floats, out-of-flow boxes, non-visible overflow, inline-blocks, table
  /// cells and captions all establish one; their internal floats and margins
  /// do not interact with the outside.
  pub fn establishes_bfc(&self) -> bool {
    self.is_floating()
      || self.is_out_of_flow_positioned()
      || self.overflow != Overflow::Visible
      || matches!(
        self.display,
        Display::InlineBlock | Display::TableCell | Display::TableCaption | Display::InlineTable
      )
  }

  /// Border widths as pixel edge sizes.
  ///
  /// A border with style `none`/`hidden` has used width zero.
  pub fn border_widths(&self) -> EdgeSizes {
    let used = |style: BorderStyle, width: &Length| -> f32 {
      if style.is_invisible() {
        0.0
      } else {
        width.to_px().max(0.0)
      }
    };
    EdgeSizes::new(
      used(self.border_top_style, &self.border_top_width),
      used(self.border_right_style, &self.border_right_width),
      used(self.border_bottom_style, &self.border_bottom_width),
      used(self.border_left_style, &self.border_left_width),
    )
  }

  /// Padding resolved against the containing block width.
  ///
  /// Vertical padding percentages also resolve against the *width* per the
  /// box model.
  pub fn padding_sizes(&self, containing_width: f32) -> EdgeSizes {
    EdgeSizes::new(
      self.padding_top.resolve_against(containing_width).max(0.0),
      self
        .padding_right
        .resolve_against(containing_width)
        .max(0.0),
      self
        .padding_bottom
        .resolve_against(containing_width)
        .max(0.0),
      self.padding_left.resolve_against(containing_width).max(0.0),
    )
  }

  /// Vertical margins resolved against the containing block width
  /// (auto resolves to zero in the vertical axis).
  pub fn vertical_margins(&self, containing_width: f32) -> (f32, f32) {
    let resolve = |m: &Option<Length>| {
      m.as_ref()
        .map(|len| len.resolve_against(containing_width))
        .unwrap_or(0.0)
    };
    (resolve(&self.margin_top), resolve(&self.margin_bottom))
  }

  /// Clamps a content height by min/max-height.
  pub fn clamp_height(&self, height: f32, percent_base: Option<f32>) -> f32 {
    let mut clamped = height;
    if let Some(max) = self.max_height.as_ref().and_then(|l| l.maybe_resolve(percent_base)) {
      clamped = clamped.min(max);
    }
    if let Some(min) = self.min_height.as_ref().and_then(|l| l.maybe_resolve(percent_base)) {
      clamped = clamped.max(min);
    }
    clamped.max(0.0)
  }

  /// Clamps a content width by min/max-width.
  pub fn clamp_width(&self, width: f32, percent_base: f32) -> f32 {
    let mut clamped = width;
    if let Some(max) = self.max_width.as_ref() {
      clamped = clamped.min(max.resolve_against(percent_base));
    }
    if let Some(min) = self.min_width.as_ref() {
      clamped = clamped.max(min.resolve_against(percent_base));
    }
    clamped.max(0.0)
  }
}
