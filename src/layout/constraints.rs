//! Layout constraints
//!
//! The containing-block bases passed down the layout recursion. A box
//! resolves percentage widths against `containing_width` and percentage
//! heights against `containing_height` when that base is definite; an
//! indefinite height base makes percentage heights behave as auto.

/// Containing-block bases for one layout invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraints {
  /// Content width of the containing block (always definite during layout)
  pub containing_width: f32,
  /// Definite content height of the containing block, if any
  pub containing_height: Option<f32>,
}

impl LayoutConstraints {
  /// Constraints with both bases definite.
  pub fn definite(width: f32, height: f32) -> Self {
    Self {
      containing_width: width,
      containing_height: Some(height),
    }
  }

  /// Constraints with a definite width and indefinite height.
  pub fn width_only(width: f32) -> Self {
    Self {
      containing_width: width,
      containing_height: None,
    }
  }

  /// Same bases with a different containing width.
  pub fn with_width(self, width: f32) -> Self {
    Self {
      containing_width: width,
      ..self
    }
  }

  /// Same bases with a different (possibly indefinite) height.
  pub fn with_height(self, height: Option<f32>) -> Self {
    Self {
      containing_height: height,
      ..self
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_definite() {
    let c = LayoutConstraints::definite(800.0, 600.0);
    assert_eq!(c.containing_width, 800.0);
    assert_eq!(c.containing_height, Some(600.0));
  }

  #[test]
  fn test_width_only_has_indefinite_height() {
    let c = LayoutConstraints::width_only(500.0);
    assert_eq!(c.containing_height, None);
  }

  #[test]
  fn test_with_width_preserves_height() {
    let c = LayoutConstraints::definite(800.0, 600.0).with_width(300.0);
    assert_eq!(c.containing_width, 300.0);
    assert_eq!(c.containing_height, Some(600.0));
  }
}
