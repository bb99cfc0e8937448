//! Resolved style value primitives
//!
//! The engine consumes styles after cascade and unit resolution: every length
//! arrives either as absolute CSS pixels or as a percentage of a
//! containing-block base that only layout can supply. `auto` is represented
//! as `None` on the `Option<Length>` style fields.

use serde::Serialize;

/// Unit of a resolved length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LengthUnit {
  /// Absolute CSS pixels
  Px,
  /// Percentage of a containing-block base
  Percent,
}

/// A resolved length value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Length {
  pub value: f32,
  pub unit: LengthUnit,
}

impl Length {
  /// Creates an absolute pixel length.
  pub const fn px(value: f32) -> Self {
    Self {
      value,
      unit: LengthUnit::Px,
    }
  }

  /// Creates a percentage length.
  pub const fn percent(value: f32) -> Self {
    Self {
      value,
      unit: LengthUnit::Percent,
    }
  }

  /// The zero pixel length.
  pub const ZERO: Self = Self::px(0.0);

  pub fn is_percent(&self) -> bool {
    self.unit == LengthUnit::Percent
  }

  /// Resolves against a containing-block base.
  ///
  /// Percentages scale the base; pixel values pass through.
  pub fn resolve_against(&self, base: f32) -> f32 {
    match self.unit {
      LengthUnit::Px => self.value,
      LengthUnit::Percent => base * self.value / 100.0,
    }
  }

  /// Resolves against an optional base.
  ///
  /// A percentage with no base cannot resolve and returns `None`; pixel
  /// values always resolve.
  pub fn maybe_resolve(&self, base: Option<f32>) -> Option<f32> {
    match self.unit {
      LengthUnit::Px => Some(self.value),
      LengthUnit::Percent => base.map(|b| b * self.value / 100.0),
    }
  }

  /// Pixel value, treating percentages as zero.
  ///
  /// Used for properties whose percentages are invalid (border widths).
  pub fn to_px(&self) -> f32 {
    match self.unit {
      LengthUnit::Px => self.value,
      LengthUnit::Percent => 0.0,
    }
  }
}

/// Width class of a table column or cell width.
///
/// The four classes drive the automatic table algorithm's distribution and
/// reduction passes in priority order: percent, fixed, relative, auto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SpecifiedWidth {
  /// Content-based width
  Auto,
  /// Fixed pixel width
  Fixed(f32),
  /// Percentage of the table width
  Percent(f32),
  /// Proportional share (HTML `n*` columns)
  Relative(f32),
}

impl SpecifiedWidth {
  /// Classifies a style width value into a width class.
  pub fn from_style(width: Option<Length>) -> Self {
    match width {
      None => SpecifiedWidth::Auto,
      Some(len) if len.is_percent() => SpecifiedWidth::Percent(len.value),
      Some(len) => SpecifiedWidth::Fixed(len.value.max(0.0)),
    }
  }

  pub fn is_auto(&self) -> bool {
    matches!(self, SpecifiedWidth::Auto)
  }

  pub fn is_fixed(&self) -> bool {
    matches!(self, SpecifiedWidth::Fixed(_))
  }

  pub fn is_percent(&self) -> bool {
    matches!(self, SpecifiedWidth::Percent(_))
  }

  pub fn is_relative(&self) -> bool {
    matches!(self, SpecifiedWidth::Relative(_))
  }
}

/// Height class of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SpecifiedHeight {
  /// Content-based height
  Auto,
  /// Fixed pixel height
  Fixed(f32),
  /// Percentage of the table height
  Percent(f32),
}

impl SpecifiedHeight {
  /// Classifies a style height value into a height class.
  pub fn from_style(height: Option<Length>) -> Self {
    match height {
      None => SpecifiedHeight::Auto,
      Some(len) if len.is_percent() => SpecifiedHeight::Percent(len.value),
      Some(len) => SpecifiedHeight::Fixed(len.value.max(0.0)),
    }
  }

  pub fn is_auto(&self) -> bool {
    matches!(self, SpecifiedHeight::Auto)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_px_resolves_to_itself() {
    assert_eq!(Length::px(42.0).resolve_against(100.0), 42.0);
  }

  #[test]
  fn test_percent_resolves_against_base() {
    assert_eq!(Length::percent(50.0).resolve_against(200.0), 100.0);
  }

  #[test]
  fn test_percent_without_base_does_not_resolve() {
    assert_eq!(Length::percent(50.0).maybe_resolve(None), None);
    assert_eq!(Length::px(10.0).maybe_resolve(None), Some(10.0));
  }

  #[test]
  fn test_to_px_ignores_percent() {
    assert_eq!(Length::percent(50.0).to_px(), 0.0);
    assert_eq!(Length::px(3.0).to_px(), 3.0);
  }

  #[test]
  fn test_specified_width_classification() {
    assert_eq!(SpecifiedWidth::from_style(None), SpecifiedWidth::Auto);
    assert_eq!(
      SpecifiedWidth::from_style(Some(Length::px(100.0))),
      SpecifiedWidth::Fixed(100.0)
    );
    assert_eq!(
      SpecifiedWidth::from_style(Some(Length::percent(25.0))),
      SpecifiedWidth::Percent(25.0)
    );
  }

  #[test]
  fn test_specified_width_negative_fixed_clamps() {
    assert_eq!(
      SpecifiedWidth::from_style(Some(Length::px(-10.0))),
      SpecifiedWidth::Fixed(0.0)
    );
  }
}
