//! Style keyword types
//!
//! Keyword enums for the resolved style properties the layout engine reads.
//! Values arrive pre-cascaded; the engine never parses CSS text.

use serde::Serialize;

/// The display type of a box.
///
/// Determines box classification (block-level vs inline-level) and the table
/// structure role of table-internal boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Display {
  #[default]
  Block,
  Inline,
  InlineBlock,
  /// Run-in: merges into the following block when possible
  RunIn,
  /// Compact: tucks into the following block's margin when it fits
  Compact,
  Table,
  InlineTable,
  TableRowGroup,
  TableHeaderGroup,
  TableFooterGroup,
  TableRow,
  TableColumnGroup,
  TableColumn,
  TableCell,
  TableCaption,
  None,
}

impl Display {
  /// Inline-level boxes participate in inline runs.
  pub fn is_inline_level(self) -> bool {
    matches!(
      self,
      Display::Inline | Display::InlineBlock | Display::InlineTable
    )
  }

  /// Table-internal boxes require table structure around them.
  pub fn is_table_internal(self) -> bool {
    matches!(
      self,
      Display::TableRowGroup
        | Display::TableHeaderGroup
        | Display::TableFooterGroup
        | Display::TableRow
        | Display::TableColumnGroup
        | Display::TableColumn
        | Display::TableCell
    )
  }
}

/// Positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Position {
  #[default]
  Static,
  Relative,
  Absolute,
  Fixed,
}

impl Position {
  /// Absolutely-positioned boxes are taken out of normal flow.
  pub fn is_out_of_flow(self) -> bool {
    matches!(self, Position::Absolute | Position::Fixed)
  }
}

/// Float property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Float {
  #[default]
  None,
  Left,
  Right,
}

/// Clear property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Clear {
  #[default]
  None,
  Left,
  Right,
  Both,
}

/// Inline base direction of a block container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
  #[default]
  Ltr,
  Rtl,
}

/// Box sizing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BoxSizing {
  #[default]
  ContentBox,
  BorderBox,
}

/// Overflow behavior; anything but `Visible` establishes a new block
/// formatting context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Overflow {
  #[default]
  Visible,
  Hidden,
  Scroll,
  Auto,
}

/// Border line styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BorderStyle {
  #[default]
  None,
  Hidden,
  Dotted,
  Dashed,
  Solid,
  Double,
  Groove,
  Ridge,
  Inset,
  Outset,
}

impl BorderStyle {
  /// Specificity rank used to break collapsed-border width ties.
  ///
  /// double > solid > dashed > dotted > ridge > outset > groove > inset;
  /// `None`/`Hidden` never win on rank.
  pub fn rank(self) -> u8 {
    match self {
      BorderStyle::Double => 8,
      BorderStyle::Solid => 7,
      BorderStyle::Dashed => 6,
      BorderStyle::Dotted => 5,
      BorderStyle::Ridge => 4,
      BorderStyle::Outset => 3,
      BorderStyle::Groove => 2,
      BorderStyle::Inset => 1,
      BorderStyle::None | BorderStyle::Hidden => 0,
    }
  }

  /// A border that paints nothing.
  pub fn is_invisible(self) -> bool {
    matches!(self, BorderStyle::None | BorderStyle::Hidden)
  }
}

/// Table border model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BorderCollapse {
  #[default]
  Separate,
  Collapse,
}

/// Caption placement relative to the table grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CaptionSide {
  #[default]
  Top,
  Bottom,
}

/// Column width resolution algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TableLayout {
  #[default]
  Auto,
  Fixed,
}

/// Vertical alignment of cell content within its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VerticalAlign {
  #[default]
  Baseline,
  Top,
  Middle,
  Bottom,
}

/// Break opportunity control between boxes (paginated output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BreakBetween {
  #[default]
  Auto,
  Avoid,
  Page,
}

/// Break control inside a box (paginated output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BreakInside {
  #[default]
  Auto,
  Avoid,
}

/// One resolved collapsed-border decision for a shared table edge.
///
/// Produced by the table engine under `border-collapse: collapse` and
/// consumed by the painting collaborator, which draws each shared edge once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollapsedBorder {
  /// Used width; zero when the edge is suppressed
  pub width: f32,
  pub style: BorderStyle,
  pub color: Rgba,
}

impl CollapsedBorder {
  /// A suppressed edge (hidden contributor or nothing to draw).
  pub const NONE: Self = Self {
    width: 0.0,
    style: BorderStyle::None,
    color: Rgba::TRANSPARENT,
  };

  pub fn is_visible(&self) -> bool {
    self.width > 0.0 && !self.style.is_invisible()
  }
}

/// A straight-alpha RGBA color carried through to collapsed-border output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Rgba {
  pub const BLACK: Self = Self {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
  };

  pub const TRANSPARENT: Self = Self {
    r: 0,
    g: 0,
    b: 0,
    a: 0,
  };

  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }
}

impl Default for Rgba {
  fn default() -> Self {
    Self::BLACK
  }
}
