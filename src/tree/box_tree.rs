//! The box tree
//!
//! Boxes live in an index-based arena owned by [`BoxTree`] and are addressed
//! through stable [`BoxId`] handles. Each box stores its parent handle and an
//! ordered list of children, so the structure is a strict tree: no cycles, a
//! box never appears under two parents, and the arena slot is recycled only
//! after the box is destroyed.
//!
//! Unlike the immutable box trees of one-shot renderers, this tree is mutated
//! in place: layout writes final geometry into every box on each pass, and
//! structural edits (insertions, removals, anonymous wrapper maintenance) are
//! incremental. Layout is idempotent for an unchanged tree.
//!
//! # Coordinate space
//!
//! `Geometry::x`/`y` position the box's border box relative to the parent's
//! border box. Absolute positions are derived by accumulation
//! ([`BoxTree::absolute_origin`]). Overflow rects are kept in the box's own
//! space (relative to its border-box origin).

use crate::geometry::{EdgeSizes, Point, Rect};
use crate::style::values::SpecifiedWidth;
use crate::style::{ComputedStyle, Display};
use std::sync::Arc;

/// Stable handle to a box in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxId(usize);

impl BoxId {
  /// Raw slot index, for diagnostics.
  pub fn index(self) -> usize {
    self.0
  }
}

/// One pre-computed line of inline content.
///
/// Line boxes come from the external inline-layout collaborator; this engine
/// only stacks them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBox {
  pub width: f32,
  pub height: f32,
  /// Distance from the line's top to its baseline
  pub baseline: f32,
}

/// The opaque inline-content measurement attached to a block container whose
/// children are inline-level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InlineContent {
  pub lines: Vec<LineBox>,
  /// Narrowest width the content can be laid out in without overflow
  pub min_width: f32,
  /// Width of the content laid out on one line
  pub max_width: f32,
}

impl InlineContent {
  /// Total stacked height of the line boxes.
  pub fn height(&self) -> f32 {
    self.lines.iter().map(|l| l.height).sum()
  }

  /// Baseline of the first line, if any.
  pub fn first_baseline(&self) -> Option<f32> {
    self.lines.first().map(|l| l.baseline)
  }
}

/// Block container payload.
#[derive(Debug, Clone)]
pub struct BlockBox {
  /// True while all children are inline-level (or there are none).
  ///
  /// A block container holds either exclusively inline content or
  /// exclusively block-level boxes; container operations enforce this by
  /// anonymous wrapping and keep the flag current.
  pub children_inline: bool,
  /// Line boxes attached by the inline-layout collaborator.
  pub inline_content: Option<InlineContent>,
}

impl Default for BlockBox {
  fn default() -> Self {
    Self {
      // vacuously inline until a block-level child arrives
      children_inline: true,
      inline_content: None,
    }
  }
}

/// A span-compressed column descriptor ("effective column").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveColumn {
  /// How many raw authored columns this descriptor covers
  pub span: usize,
  /// Width declaration governing the column
  pub width: SpecifiedWidth,
}

impl EffectiveColumn {
  pub fn new() -> Self {
    Self {
      span: 1,
      width: SpecifiedWidth::Auto,
    }
  }
}

impl Default for EffectiveColumn {
  fn default() -> Self {
    Self::new()
  }
}

/// Collapsed-border decisions for every shared edge of a table grid.
///
/// `horizontal[r][c]` is the edge above row `r` in column `c`
/// (`rows + 1` by `cols`); `vertical[r][c]` is the edge left of column `c`
/// in row `r` (`rows` by `cols + 1`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollapsedBorderGrid {
  pub horizontal: Vec<Vec<crate::style::types::CollapsedBorder>>,
  pub vertical: Vec<Vec<crate::style::types::CollapsedBorder>>,
}

/// Table payload: the column model plus outbound column geometry.
#[derive(Debug, Clone, Default)]
pub struct TableBox {
  /// Span-compressed column descriptors
  pub columns: Vec<EffectiveColumn>,
  /// Left edge of every column plus the table's right content edge;
  /// always `columns.len() + 1` entries, monotonically non-decreasing
  pub column_positions: Vec<f32>,
  /// Structural change since the last grid rebuild
  pub structure_dirty: bool,
  /// Border decisions under `border-collapse: collapse`, for the painter
  pub collapsed_borders: Option<CollapsedBorderGrid>,
}

/// Role of a row group within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
  Header,
  Body,
  Footer,
}

/// One slot of a section's row-major cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridSlot {
  /// No cell covers this slot
  #[default]
  Empty,
  /// The originating slot of a cell
  Cell(BoxId),
  /// Covered by a cell that originates elsewhere (row or column span)
  Spanned(BoxId),
}

impl GridSlot {
  /// The cell covering this slot, if any.
  pub fn cell(self) -> Option<BoxId> {
    match self {
      GridSlot::Empty => None,
      GridSlot::Cell(id) | GridSlot::Spanned(id) => Some(id),
    }
  }
}

/// One grid row of a section.
#[derive(Debug, Clone)]
pub struct GridRow {
  /// The row box that produced this grid row
  pub row_box: BoxId,
  /// Cell coverage, one slot per effective column
  pub slots: Vec<GridSlot>,
  /// Baseline of the row's baseline-aligned cells (from the row top)
  pub baseline: f32,
  /// Final row height after distribution
  pub height: f32,
  /// Row top relative to the first section row
  pub y: f32,
}

impl GridRow {
  pub fn new(row_box: BoxId) -> Self {
    Self {
      row_box,
      slots: Vec::new(),
      baseline: 0.0,
      height: 0.0,
      y: 0.0,
    }
  }
}

/// Row group payload: the cell grid.
#[derive(Debug, Clone)]
pub struct TableSectionBox {
  pub kind: SectionKind,
  pub grid: Vec<GridRow>,
}

impl TableSectionBox {
  pub fn new(kind: SectionKind) -> Self {
    Self {
      kind,
      grid: Vec::new(),
    }
  }

  /// Cell grid lookup honoring the spanning-sentinel invariant.
  pub fn cell_at(&self, row: usize, col: usize) -> GridSlot {
    self
      .grid
      .get(row)
      .and_then(|r| r.slots.get(col))
      .copied()
      .unwrap_or(GridSlot::Empty)
  }
}

/// Table cell payload.
///
/// A cell is also a block container for its content; the embedded
/// [`BlockBox`] carries the inline/block child invariant and any attached
/// inline content.
#[derive(Debug, Clone)]
pub struct TableCellBox {
  /// Flow-content state of the cell interior
  pub block: BlockBox,
  /// Effective column index of the originating slot
  pub col: usize,
  /// Grid row index of the originating slot
  pub row: usize,
  /// Authored column span; 0 means "to the end of the table"
  pub col_span: usize,
  /// Authored row span; 0 means "to the end of the section"
  pub row_span: usize,
  /// Resolved column span after span-zero resolution
  pub effective_col_span: usize,
  /// Resolved row span after span-zero resolution
  pub effective_row_span: usize,
  /// Extra inset above the content produced by vertical alignment
  pub intrinsic_padding_top: f32,
  /// Extra inset below the content produced by vertical alignment
  pub intrinsic_padding_bottom: f32,
}

impl TableCellBox {
  pub fn new(col_span: usize, row_span: usize) -> Self {
    Self {
      block: BlockBox::default(),
      col: 0,
      row: 0,
      col_span,
      row_span,
      effective_col_span: col_span.max(1),
      effective_row_span: row_span.max(1),
      intrinsic_padding_top: 0.0,
      intrinsic_padding_bottom: 0.0,
    }
  }
}

/// Column or column-group payload.
#[derive(Debug, Clone)]
pub struct TableColumnBox {
  /// Authored span; 0 behaves like span-to-end and is clamped lazily
  pub span: usize,
  /// Width override from markup (`width="2*"` relative widths have no CSS
  /// length form); takes precedence over the style width
  pub width: Option<SpecifiedWidth>,
}

impl TableColumnBox {
  pub fn new(span: usize) -> Self {
    Self { span, width: None }
  }
}

/// Closed set of box variants.
///
/// Dispatch is by pattern match; there is no open-ended `is_foo()` predicate
/// surface to keep in sync.
#[derive(Debug, Clone)]
pub enum BoxKind {
  Block(BlockBox),
  /// Inline-level box; its interior layout is the inline collaborator's
  /// business, it participates here only structurally (inline runs)
  Inline,
  Table(TableBox),
  TableSection(TableSectionBox),
  TableRow,
  TableCell(TableCellBox),
  TableColumn(TableColumnBox),
}

impl BoxKind {
  pub fn is_block(&self) -> bool {
    matches!(self, BoxKind::Block(_))
  }

  pub fn is_table(&self) -> bool {
    matches!(self, BoxKind::Table(_))
  }

  pub fn is_table_cell(&self) -> bool {
    matches!(self, BoxKind::TableCell(_))
  }
}

/// Collapsed-margin maxima computed for a box during its own layout.
///
/// A parent's child-positioning pass reads these instead of the style
/// margins so that margins folded through from grandchildren participate in
/// sibling collapsing. Stored as raw positive/negative maxima (negative as
/// absolute value).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollapsedMargins {
  pub top_pos: f32,
  pub top_neg: f32,
  pub bottom_pos: f32,
  pub bottom_neg: f32,
  /// The box's own top and bottom margins collapse into one (zero-content
  /// block with auto/zero height and no border/padding/min-height)
  pub self_collapsing: bool,
  /// Quirk-mode side channel: the folded top margin came only from quirky
  /// default margins
  pub top_quirk: bool,
  /// Same, for the bottom margin
  pub bottom_quirk: bool,
}

/// Mutable geometry written by layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
  /// Border-box left edge relative to the parent's border box
  pub x: f32,
  /// Border-box top edge relative to the parent's border box
  pub y: f32,
  /// Border-box width
  pub width: f32,
  /// Border-box height
  pub height: f32,
  /// Used margins
  pub margin: EdgeSizes,
  /// Used border widths
  pub border: EdgeSizes,
  /// Used padding
  pub padding: EdgeSizes,
  /// Visual overflow in the box's own space; at least the border box
  pub overflow: Rect,
}

impl Geometry {
  /// Border box in the parent's space.
  pub fn border_box(&self) -> Rect {
    Rect::from_xywh(self.x, self.y, self.width, self.height)
  }

  /// Margin box in the parent's space.
  pub fn margin_box(&self) -> Rect {
    Rect::from_xywh(
      self.x - self.margin.left,
      self.y - self.margin.top,
      self.width + self.margin.horizontal(),
      self.height + self.margin.vertical(),
    )
  }

  /// Content width (border box minus borders and padding).
  pub fn content_width(&self) -> f32 {
    (self.width - self.border.horizontal() - self.padding.horizontal()).max(0.0)
  }

  /// Content height (border box minus borders and padding).
  pub fn content_height(&self) -> f32 {
    (self.height - self.border.vertical() - self.padding.vertical()).max(0.0)
  }

  /// Left edge of the content box in the box's own space.
  pub fn content_left(&self) -> f32 {
    self.border.left + self.padding.left
  }

  /// Top edge of the content box in the box's own space.
  pub fn content_top(&self) -> f32 {
    self.border.top + self.padding.top
  }
}

/// A single box in the tree.
#[derive(Debug, Clone)]
pub struct BoxNode {
  /// Resolved style (shared; the resolver may reuse bundles across boxes)
  pub style: Arc<ComputedStyle>,
  pub kind: BoxKind,
  pub parent: Option<BoxId>,
  /// Children in document order
  pub children: Vec<BoxId>,
  pub geometry: Geometry,
  /// Collapsed-margin maxima from the box's last layout
  pub collapsed_margins: CollapsedMargins,
  /// Synthesized wrapper, invisible to the authored tree
  pub is_anonymous: bool,
  /// Geometry is stale and must be recomputed
  pub needs_layout: bool,
}

impl BoxNode {
  fn new(style: Arc<ComputedStyle>, kind: BoxKind) -> Self {
    Self {
      style,
      kind,
      parent: None,
      children: Vec::new(),
      geometry: Geometry::default(),
      collapsed_margins: CollapsedMargins::default(),
      is_anonymous: false,
      needs_layout: true,
    }
  }

  /// Returns true if this box is block-level in its parent's flow.
  pub fn is_block_level(&self) -> bool {
    !self.style.display.is_inline_level()
  }

  /// Returns true if this box is inline-level.
  pub fn is_inline_level(&self) -> bool {
    self.style.display.is_inline_level()
  }

  /// Block payload accessor; cells expose their interior flow state too.
  pub fn as_block(&self) -> Option<&BlockBox> {
    match &self.kind {
      BoxKind::Block(b) => Some(b),
      BoxKind::TableCell(c) => Some(&c.block),
      _ => None,
    }
  }

  /// Mutable block payload accessor.
  pub fn as_block_mut(&mut self) -> Option<&mut BlockBox> {
    match &mut self.kind {
      BoxKind::Block(b) => Some(b),
      BoxKind::TableCell(c) => Some(&mut c.block),
      _ => None,
    }
  }

  /// Returns true if the box is a block container (holds flow content).
  pub fn is_block_container(&self) -> bool {
    matches!(self.kind, BoxKind::Block(_) | BoxKind::TableCell(_))
  }

  /// Table payload accessor.
  pub fn as_table(&self) -> Option<&TableBox> {
    match &self.kind {
      BoxKind::Table(t) => Some(t),
      _ => None,
    }
  }

  /// Cell payload accessor.
  pub fn as_cell(&self) -> Option<&TableCellBox> {
    match &self.kind {
      BoxKind::TableCell(c) => Some(c),
      _ => None,
    }
  }
}

/// Arena of boxes with stable handles.
#[derive(Debug, Clone)]
pub struct BoxTree {
  nodes: Vec<Option<BoxNode>>,
  free: Vec<usize>,
  root: BoxId,
}

impl BoxTree {
  /// Creates a tree with a root block container using the given style.
  pub fn new(root_style: Arc<ComputedStyle>) -> Self {
    let mut tree = Self {
      nodes: Vec::new(),
      free: Vec::new(),
      root: BoxId(0),
    };
    let root = tree.insert(BoxNode::new(root_style, BoxKind::Block(BlockBox::default())));
    tree.root = root;
    tree
  }

  /// The root box.
  pub fn root(&self) -> BoxId {
    self.root
  }

  fn insert(&mut self, node: BoxNode) -> BoxId {
    if let Some(slot) = self.free.pop() {
      self.nodes[slot] = Some(node);
      BoxId(slot)
    } else {
      self.nodes.push(Some(node));
      BoxId(self.nodes.len() - 1)
    }
  }

  /// Creates a detached box whose kind is derived from the style's display.
  ///
  /// `display: none` boxes should not reach layout; they are treated as
  /// block containers here rather than rejected.
  pub fn create_box(&mut self, style: Arc<ComputedStyle>) -> BoxId {
    let kind = match style.display {
      Display::Inline | Display::InlineBlock => BoxKind::Inline,
      Display::Table | Display::InlineTable => BoxKind::Table(TableBox::default()),
      Display::TableRowGroup => BoxKind::TableSection(TableSectionBox::new(SectionKind::Body)),
      Display::TableHeaderGroup => BoxKind::TableSection(TableSectionBox::new(SectionKind::Header)),
      Display::TableFooterGroup => BoxKind::TableSection(TableSectionBox::new(SectionKind::Footer)),
      Display::TableRow => BoxKind::TableRow,
      Display::TableCell => BoxKind::TableCell(TableCellBox::new(1, 1)),
      Display::TableColumn | Display::TableColumnGroup => {
        BoxKind::TableColumn(TableColumnBox::new(1))
      }
      _ => BoxKind::Block(BlockBox::default()),
    };
    self.insert(BoxNode::new(style, kind))
  }

  /// Creates a detached cell with authored spans (0 = span to end).
  pub fn create_cell(&mut self, style: Arc<ComputedStyle>, col_span: usize, row_span: usize) -> BoxId {
    self.insert(BoxNode::new(
      style,
      BoxKind::TableCell(TableCellBox::new(col_span, row_span)),
    ))
  }

  /// Creates a detached column box with an authored span.
  pub fn create_column(&mut self, style: Arc<ComputedStyle>, span: usize) -> BoxId {
    self.insert(BoxNode::new(
      style,
      BoxKind::TableColumn(TableColumnBox::new(span.max(1))),
    ))
  }

  pub(crate) fn create_anonymous(&mut self, style: Arc<ComputedStyle>, kind: BoxKind) -> BoxId {
    let mut node = BoxNode::new(style, kind);
    node.is_anonymous = true;
    self.insert(node)
  }

  pub(crate) fn destroy(&mut self, id: BoxId) {
    debug_assert!(
      self.nodes[id.0]
        .as_ref()
        .map(|n| n.children.is_empty() && n.parent.is_none())
        .unwrap_or(false),
      "destroy requires a detached, childless box"
    );
    self.nodes[id.0] = None;
    self.free.push(id.0);
  }

  /// Borrows a box. A stale handle is a caller contract violation.
  pub fn get(&self, id: BoxId) -> &BoxNode {
    self.nodes[id.0]
      .as_ref()
      .expect("stale BoxId passed to BoxTree")
  }

  /// Mutably borrows a box.
  pub fn get_mut(&mut self, id: BoxId) -> &mut BoxNode {
    self.nodes[id.0]
      .as_mut()
      .expect("stale BoxId passed to BoxTree")
  }

  /// Returns true if the handle refers to a live box.
  pub fn contains(&self, id: BoxId) -> bool {
    self.nodes.get(id.0).map(|s| s.is_some()).unwrap_or(false)
  }

  /// Number of live boxes.
  pub fn len(&self) -> usize {
    self.nodes.len() - self.free.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Attaches pre-computed inline content to a block container.
  ///
  /// The external inline-layout collaborator calls this after measuring the
  /// container's inline children.
  pub fn set_inline_content(&mut self, block: BoxId, content: InlineContent) {
    if let Some(b) = self.get_mut(block).as_block_mut() {
      b.inline_content = Some(content);
    }
    self.mark_needs_layout(block);
  }

  /// Removes any attached inline content (line-box fragments).
  pub fn clear_inline_content(&mut self, block: BoxId) {
    if let Some(b) = self.get_mut(block).as_block_mut() {
      b.inline_content = None;
    }
  }

  /// Marks a box and its ancestor chain as needing layout.
  ///
  /// Passing a table-internal box also marks the owning table's column/row
  /// model dirty, which triggers a grid rebuild on the next pass.
  pub fn mark_needs_layout(&mut self, id: BoxId) {
    let mut current = Some(id);
    while let Some(cur) = current {
      let node = self.get_mut(cur);
      node.needs_layout = true;
      if let BoxKind::Table(table) = &mut node.kind {
        table.structure_dirty = true;
      }
      current = node.parent;
    }
  }

  /// Absolute position of a box's border-box origin.
  pub fn absolute_origin(&self, id: BoxId) -> Point {
    let mut x = 0.0;
    let mut y = 0.0;
    let mut current = Some(id);
    while let Some(cur) = current {
      let node = self.get(cur);
      x += node.geometry.x;
      y += node.geometry.y;
      current = node.parent;
    }
    Point::new(x, y)
  }

  /// Depth-first pre-order walk of a subtree.
  pub fn descendants(&self, id: BoxId) -> Vec<BoxId> {
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(cur) = stack.pop() {
      out.push(cur);
      let node = self.get(cur);
      for &child in node.children.iter().rev() {
        stack.push(child);
      }
    }
    out
  }

  /// The table box owning a table-internal box, if any.
  pub fn containing_table(&self, id: BoxId) -> Option<BoxId> {
    let mut current = self.get(id).parent;
    while let Some(cur) = current {
      if self.get(cur).kind.is_table() {
        return Some(cur);
      }
      current = self.get(cur).parent;
    }
    None
  }
}
