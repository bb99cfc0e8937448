//! Block width computation
//!
//! Resolves the horizontal constraint equation for block-level boxes in
//! normal flow:
//!
//! ```text
//! margin-left + border-left + padding-left + width +
//! padding-right + border-right + margin-right = containing block width
//! ```
//!
//! Under-specification resolves in the box's favor (auto width fills, auto
//! margins absorb or center); over-specification drops the end-side margin —
//! `margin-right` in left-to-right containers, `margin-left` in
//! right-to-left ones.

use crate::geometry::EdgeSizes;
use crate::style::{BoxSizing, ComputedStyle, Direction};

/// All resolved horizontal dimensions of a block box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedBlockWidth {
  /// Can be negative after over-constraint resolution
  pub margin_left: f32,
  pub border_left: f32,
  pub padding_left: f32,
  /// Content width
  pub content_width: f32,
  pub padding_right: f32,
  pub border_right: f32,
  /// Can be negative after over-constraint resolution
  pub margin_right: f32,
}

impl ComputedBlockWidth {
  /// Full width including margins.
  pub fn total_width(&self) -> f32 {
    self.margin_left
      + self.border_left
      + self.padding_left
      + self.content_width
      + self.padding_right
      + self.border_right
      + self.margin_right
  }

  /// Border box width (no margins).
  pub fn border_box_width(&self) -> f32 {
    self.border_left + self.padding_left + self.content_width + self.padding_right + self.border_right
  }

  /// Content box x-offset from the margin edge.
  pub fn content_offset_x(&self) -> f32 {
    self.margin_left + self.border_left + self.padding_left
  }
}

/// Margin value that may still be `auto`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
  Length(f32),
  Auto,
}

impl MarginValue {
  pub fn unwrap_or_zero(self) -> f32 {
    match self {
      Self::Length(v) => v,
      Self::Auto => 0.0,
    }
  }

  pub fn is_auto(self) -> bool {
    matches!(self, Self::Auto)
  }
}

/// Computes the horizontal dimensions of a block-level box in normal flow.
///
/// `containing_width` is the content width of the containing block; with
/// floats narrowing the line, callers pass the narrowed width so that
/// auto-margin centering reacts to it.
pub fn compute_block_width(style: &ComputedStyle, containing_width: f32) -> ComputedBlockWidth {
  let padding = style.padding_sizes(containing_width);
  let border = style.border_widths();

  let margin_left = match &style.margin_left {
    Some(len) => MarginValue::Length(len.resolve_against(containing_width)),
    None => MarginValue::Auto,
  };
  let margin_right = match &style.margin_right {
    Some(len) => MarginValue::Length(len.resolve_against(containing_width)),
    None => MarginValue::Auto,
  };

  let width_value = style
    .width
    .as_ref()
    .map(|len| content_width_from_specified(style, len.resolve_against(containing_width), &border, &padding))
    .map(|w| style.clamp_width(w, containing_width));

  let (margin_left, content_width, margin_right) = resolve_constraint(
    containing_width,
    border.left,
    padding.left,
    width_value,
    padding.right,
    border.right,
    margin_left,
    margin_right,
    style.direction,
  );

  // An auto width is still subject to min/max clamping.
  let content_width = if style.width.is_none() {
    style.clamp_width(content_width, containing_width)
  } else {
    content_width
  };

  ComputedBlockWidth {
    margin_left,
    border_left: border.left,
    padding_left: padding.left,
    content_width,
    padding_right: padding.right,
    border_right: border.right,
    margin_right,
  }
}

/// Maps a specified width to a content width per box-sizing.
fn content_width_from_specified(
  style: &ComputedStyle,
  specified: f32,
  border: &EdgeSizes,
  padding: &EdgeSizes,
) -> f32 {
  match style.box_sizing {
    BoxSizing::ContentBox => specified.max(0.0),
    BoxSizing::BorderBox => (specified - border.horizontal() - padding.horizontal()).max(0.0),
  }
}

/// The constraint equation itself.
#[allow(clippy::too_many_arguments)]
fn resolve_constraint(
  containing_width: f32,
  border_left: f32,
  padding_left: f32,
  width: Option<f32>,
  padding_right: f32,
  border_right: f32,
  margin_left: MarginValue,
  margin_right: MarginValue,
  direction: Direction,
) -> (f32, f32, f32) {
  let borders_and_padding = border_left + padding_left + padding_right + border_right;

  match width {
    Some(w) => {
      let width = w.max(0.0);
      match (margin_left, margin_right) {
        (MarginValue::Auto, MarginValue::Auto) => {
          // Both margins auto: center the box.
          let available = containing_width - borders_and_padding - width;
          let margin = (available / 2.0).max(0.0);
          (margin, width, margin)
        }
        (MarginValue::Auto, MarginValue::Length(mr)) => {
          let ml = containing_width - borders_and_padding - width - mr;
          (ml, width, mr)
        }
        (MarginValue::Length(ml), MarginValue::Auto) => {
          let mr = containing_width - borders_and_padding - width - ml;
          (ml, width, mr)
        }
        (MarginValue::Length(ml), MarginValue::Length(mr)) => {
          // Over-constrained: the end-side margin gives way.
          match direction {
            Direction::Ltr => {
              let mr = containing_width - borders_and_padding - width - ml;
              (ml, width, mr)
            }
            Direction::Rtl => {
              let ml = containing_width - borders_and_padding - width - mr;
              (ml, width, mr)
            }
          }
        }
      }
    }
    None => {
      // Auto width: auto margins become zero, width fills what remains.
      let ml = margin_left.unwrap_or_zero();
      let mr = margin_right.unwrap_or_zero();
      let width = (containing_width - borders_and_padding - ml - mr).max(0.0);
      (ml, width, mr)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::values::Length;

  fn default_style() -> ComputedStyle {
    ComputedStyle::default()
  }

  #[test]
  fn test_auto_width_fills_container() {
    let style = default_style();
    let result = compute_block_width(&style, 800.0);
    assert_eq!(result.content_width, 800.0);
  }

  #[test]
  fn test_specified_width_with_auto_margins_centers() {
    let style = ComputedStyle {
      width: Some(Length::px(400.0)),
      margin_left: None,
      margin_right: None,
      ..default_style()
    };
    let result = compute_block_width(&style, 800.0);
    assert_eq!(result.content_width, 400.0);
    assert_eq!(result.margin_left, 200.0);
    assert_eq!(result.margin_right, 200.0);
  }

  #[test]
  fn test_single_auto_margin_takes_remainder() {
    let style = ComputedStyle {
      width: Some(Length::px(400.0)),
      margin_left: None,
      margin_right: Some(Length::px(100.0)),
      ..default_style()
    };
    let result = compute_block_width(&style, 800.0);
    assert_eq!(result.margin_left, 300.0);
    assert_eq!(result.margin_right, 100.0);
  }

  #[test]
  fn test_over_constrained_ltr_drops_right_margin() {
    let style = ComputedStyle {
      width: Some(Length::px(400.0)),
      margin_left: Some(Length::px(100.0)),
      margin_right: Some(Length::px(100.0)),
      ..default_style()
    };
    let result = compute_block_width(&style, 800.0);
    assert_eq!(result.margin_left, 100.0);
    assert_eq!(result.margin_right, 300.0);
  }

  #[test]
  fn test_over_constrained_rtl_drops_left_margin() {
    let style = ComputedStyle {
      width: Some(Length::px(400.0)),
      margin_left: Some(Length::px(100.0)),
      margin_right: Some(Length::px(100.0)),
      direction: Direction::Rtl,
      ..default_style()
    };
    let result = compute_block_width(&style, 800.0);
    assert_eq!(result.margin_left, 300.0);
    assert_eq!(result.margin_right, 100.0);
  }

  #[test]
  fn test_auto_width_with_margins() {
    let style = ComputedStyle {
      margin_left: Some(Length::px(50.0)),
      margin_right: Some(Length::px(50.0)),
      ..default_style()
    };
    let result = compute_block_width(&style, 800.0);
    assert_eq!(result.content_width, 700.0);
  }

  #[test]
  fn test_percentage_width() {
    let style = ComputedStyle {
      width: Some(Length::percent(50.0)),
      ..default_style()
    };
    let result = compute_block_width(&style, 800.0);
    assert_eq!(result.content_width, 400.0);
  }

  #[test]
  fn test_border_box_sizing_subtracts_edges() {
    let style = ComputedStyle {
      width: Some(Length::px(400.0)),
      box_sizing: BoxSizing::BorderBox,
      padding_left: Length::px(20.0),
      padding_right: Length::px(20.0),
      border_left_width: Length::px(5.0),
      border_right_width: Length::px(5.0),
      border_left_style: crate::style::BorderStyle::Solid,
      border_right_style: crate::style::BorderStyle::Solid,
      ..default_style()
    };
    let result = compute_block_width(&style, 800.0);
    assert_eq!(result.content_width, 350.0);
    assert_eq!(result.border_box_width(), 400.0);
  }

  #[test]
  fn test_min_width_clamps_auto_width() {
    let style = ComputedStyle {
      min_width: Some(Length::px(900.0)),
      ..default_style()
    };
    let result = compute_block_width(&style, 800.0);
    assert_eq!(result.content_width, 900.0);
  }

  #[test]
  fn test_negative_available_width_clamps_to_zero() {
    let style = ComputedStyle {
      padding_left: Length::px(500.0),
      padding_right: Length::px(500.0),
      ..default_style()
    };
    let result = compute_block_width(&style, 300.0);
    assert_eq!(result.content_width, 0.0);
  }
}
