//! Resolved style values consumed by layout
//!
//! The engine does not cascade or parse styles. An external resolver attaches
//! one [`ComputedStyle`] per box; this module defines that inbound bundle and
//! the value/keyword types it is built from.

pub mod computed;
pub mod types;
pub mod values;

pub use computed::ComputedStyle;
pub use types::{
  BorderCollapse, BorderStyle, BoxSizing, BreakBetween, BreakInside, CaptionSide, Clear,
  CollapsedBorder, Direction, Display, Float, Overflow, Position, Rgba, TableLayout, VerticalAlign,
};
pub use values::{Length, LengthUnit, SpecifiedHeight, SpecifiedWidth};
