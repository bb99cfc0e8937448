//! Table layout
//!
//! A table lays out in two phases per pass: **width resolution** (one of the
//! two strategies in [`column_distribution`]) and **row/cell placement**.
//!
//! The structural model is rebuilt from the box tree whenever a mutation
//! marked it dirty: sections contribute a row-major cell grid where a
//! spanning cell owns one originating slot plus sentinel slots for every
//! other position it covers. Cells with a span of zero mean "to the end of
//! the table" (columns) or "to the end of the section" (rows); their final
//! span is fixed lazily - each time a sibling grows the column count, every
//! zero-span cell registered so far is retroactively widened. The result is
//! deliberately path-dependent on insertion order, reproducing the engine
//! family this model comes from.
//!
//! Row placement seeds each row from its explicit height and its tallest
//! cell, aligns baselines, distributes surplus table height (percent rows,
//! then even among non-empty auto rows, then weighted, then an even
//! remainder), and finally resolves vertical alignment into per-cell
//! intrinsic top/bottom insets. Under `border-collapse: collapse` every
//! shared edge is resolved once for the painter.

pub mod column_distribution;

use crate::geometry::{Point, Rect};
use crate::layout::constraints::LayoutConstraints;
use crate::layout::{layout_box, LayoutContext, Placement};
use crate::style::values::{SpecifiedHeight, SpecifiedWidth};
use crate::style::{
  BorderCollapse, BorderStyle, BoxSizing, CaptionSide, CollapsedBorder, ComputedStyle, Display,
  Rgba, VerticalAlign,
};
use crate::tree::box_tree::CollapsedMargins;
use crate::tree::{
  BoxId, BoxKind, BoxTree, CollapsedBorderGrid, EffectiveColumn, GridRow, GridSlot, SectionKind,
};
use column_distribution::{
  auto_layout_min_max, auto_layout_widths, distribute_spanning_cell, fixed_layout_minimum,
  fixed_layout_widths, normalize_percentages, select_strategy, ColumnConstraints, ColumnStrategy,
};
use log::{debug, trace};
use rustc_hash::FxHashMap;

/// Upper bound on authored spans; larger values clamp (input inconsistency,
/// not an error).
const MAX_SPAN: usize = 8190;

/// A cell in the rebuilt structure, with resolved spans.
#[derive(Debug, Clone, Copy)]
struct CellRef {
  id: BoxId,
  section: usize,
  /// Row index within the section
  row: usize,
  col: usize,
  col_span: usize,
  row_span: usize,
  /// Authored column span was zero (keeps widening as columns appear)
  col_span_to_end: bool,
}

/// A section in the rebuilt structure.
#[derive(Debug, Clone)]
struct SectionRef {
  id: BoxId,
  kind: SectionKind,
  rows: Vec<BoxId>,
  /// Occupancy grid, `rows x columns`
  grid: Vec<Vec<GridSlot>>,
}

/// The transient structural model of one table.
#[derive(Debug, Clone, Default)]
struct Structure {
  /// Width declarations from column boxes, one per expanded column
  column_decls: Vec<SpecifiedWidth>,
  /// Column box behind each column, for border collapsing
  column_boxes: Vec<Option<BoxId>>,
  sections: Vec<SectionRef>,
  cells: Vec<CellRef>,
  caption: Option<BoxId>,
  columns: usize,
}

impl Structure {
  fn total_rows(&self) -> usize {
    self.sections.iter().map(|s| s.grid.len()).sum()
  }

  /// Sections in layout order: header, bodies in document order, footer.
  fn layout_order(&self) -> Vec<usize> {
    let mut order = Vec::with_capacity(self.sections.len());
    for (i, s) in self.sections.iter().enumerate() {
      if s.kind == SectionKind::Header {
        order.push(i);
      }
    }
    for (i, s) in self.sections.iter().enumerate() {
      if s.kind == SectionKind::Body {
        order.push(i);
      }
    }
    for (i, s) in self.sections.iter().enumerate() {
      if s.kind == SectionKind::Footer {
        order.push(i);
      }
    }
    order
  }
}

/// Rebuilds the structural model by walking the table subtree in document
/// order. Pure with respect to the tree; the caller writes the durable
/// pieces (grids, column model) back.
fn build_structure(tree: &BoxTree, table: BoxId) -> Structure {
  let mut structure = Structure::default();

  // Column boxes first: spans expand into one declaration per column.
  for &child in &tree.get(table).children {
    let node = tree.get(child);
    match &node.kind {
      BoxKind::TableColumn(col) => {
        // Markup width overrides (the home of relative `n*` widths) beat
        // the style width.
        let decl = col
          .width
          .unwrap_or_else(|| SpecifiedWidth::from_style(node.style.width));
        // A column group's own declaration covers columns its children
        // don't; child columns override.
        if node.style.display == Display::TableColumnGroup && !node.children.is_empty() {
          for &col_child in &node.children {
            let col_child_node = tree.get(col_child);
            if let BoxKind::TableColumn(inner) = &col_child_node.kind {
              let inner_decl = inner
                .width
                .unwrap_or_else(|| SpecifiedWidth::from_style(col_child_node.style.width));
              for _ in 0..inner.span.clamp(1, MAX_SPAN) {
                structure.column_decls.push(inner_decl);
                structure.column_boxes.push(Some(col_child));
              }
            }
          }
        } else {
          for _ in 0..col.span.clamp(1, MAX_SPAN) {
            structure.column_decls.push(decl);
            structure.column_boxes.push(Some(child));
          }
        }
      }
      BoxKind::Block(_) if node.style.display == Display::TableCaption => {
        // At most one caption; later ones are ignored, not an error.
        if structure.caption.is_none() {
          structure.caption = Some(child);
        }
      }
      _ => {}
    }
  }
  structure.columns = structure.column_decls.len();

  // Sections and cells, in document order. Zero-span cells register in
  // `span_to_end` and widen retroactively whenever the column count grows.
  let mut span_to_end: Vec<usize> = Vec::new();

  for &child in &tree.get(table).children {
    let node = tree.get(child);
    let BoxKind::TableSection(section_box) = &node.kind else {
      continue;
    };
    let section_index = structure.sections.len();
    let mut section = SectionRef {
      id: child,
      kind: section_box.kind,
      rows: Vec::new(),
      grid: Vec::new(),
    };

    let mut row_span_to_end: Vec<usize> = Vec::new();
    for &row_box in &node.children {
      if !matches!(tree.get(row_box).kind, BoxKind::TableRow) {
        continue;
      }
      let r = section.rows.len();
      section.rows.push(row_box);
      if section.grid.len() <= r {
        section.grid.resize(r + 1, vec![GridSlot::Empty; structure.columns]);
      }

      let mut c_col = 0usize;
      for &cell_box in &tree.get(row_box).children {
        let cell_node = tree.get(cell_box);
        let Some(cell) = cell_node.as_cell() else {
          continue;
        };

        while c_col < structure.columns && section.grid[r][c_col] != GridSlot::Empty {
          c_col += 1;
        }

        let col_span_to_end = cell.col_span == 0;
        let col_span = if col_span_to_end {
          structure.columns.saturating_sub(c_col).max(1)
        } else {
          cell.col_span.clamp(1, MAX_SPAN)
        };
        let row_span_to_end_flag = cell.row_span == 0;
        let row_span = if row_span_to_end_flag {
          1 // widened when the section's row count is known
        } else {
          cell.row_span.clamp(1, MAX_SPAN)
        };

        let needed = c_col + col_span;
        if needed > structure.columns {
          grow_columns(&mut structure, &mut section, needed, &span_to_end);
        }

        let cell_index = structure.cells.len();
        structure.cells.push(CellRef {
          id: cell_box,
          section: section_index,
          row: r,
          col: c_col,
          col_span,
          row_span,
          col_span_to_end,
        });
        if col_span_to_end {
          span_to_end.push(cell_index);
        }
        if row_span_to_end_flag {
          row_span_to_end.push(cell_index);
        }

        // Claim slots immediately so later rows' cursors skip them: the
        // originating slot plus sentinels, extending the grid downward for
        // row spans (overlong spans are clamped when the section closes).
        let needed_rows = r + row_span;
        if section.grid.len() < needed_rows {
          section
            .grid
            .resize(needed_rows, vec![GridSlot::Empty; structure.columns]);
        }
        for dr in 0..row_span {
          for c in c_col..(c_col + col_span).min(structure.columns) {
            if section.grid[r + dr][c] == GridSlot::Empty {
              section.grid[r + dr][c] = GridSlot::Spanned(cell_box);
            }
          }
        }
        section.grid[r][c_col] = GridSlot::Cell(cell_box);

        c_col += col_span;
      }
    }

    // Row spans resolve against the now-known section extent.
    let section_rows = section.rows.len();
    for cell_index in row_span_to_end {
      let cell = &mut structure.cells[cell_index];
      cell.row_span = section_rows.saturating_sub(cell.row).max(1);
    }
    for cell in structure
      .cells
      .iter_mut()
      .filter(|c| c.section == section_index)
    {
      cell.row_span = cell.row_span.min(section_rows.saturating_sub(cell.row).max(1));
    }
    section.grid.truncate(section_rows);

    // Fill sentinels for spans resolved or widened after their slots were
    // first claimed.
    let cells_here: Vec<CellRef> = structure
      .cells
      .iter()
      .copied()
      .filter(|c| c.section == section_index)
      .collect();
    for cell in cells_here {
      for dr in 0..cell.row_span {
        let r = cell.row + dr;
        if r >= section.grid.len() {
          break;
        }
        for c in cell.col..(cell.col + cell.col_span).min(structure.columns) {
          if section.grid[r][c] == GridSlot::Empty {
            section.grid[r][c] = GridSlot::Spanned(cell.id);
          }
        }
      }
      section.grid[cell.row][cell.col] = GridSlot::Cell(cell.id);
    }

    structure.sections.push(section);
  }

  // Final widening pass: zero-span cells reach the final column count.
  let final_columns = structure.columns;
  let widen: Vec<usize> = span_to_end;
  for cell_index in widen {
    let (section_idx, row, col, id) = {
      let c = &structure.cells[cell_index];
      (c.section, c.row, c.col, c.id)
    };
    let new_span = final_columns.saturating_sub(col).max(1);
    structure.cells[cell_index].col_span = new_span;
    let row_span = structure.cells[cell_index].row_span;
    if let Some(section) = structure.sections.get_mut(section_idx) {
      for dr in 0..row_span {
        let r = row + dr;
        if r >= section.grid.len() {
          break;
        }
        for c in (col + 1)..(col + new_span).min(final_columns) {
          if section.grid[r][c] == GridSlot::Empty {
            section.grid[r][c] = GridSlot::Spanned(id);
          }
        }
      }
    }
  }

  // Declaration arrays follow the final column count.
  structure
    .column_decls
    .resize(structure.columns, SpecifiedWidth::Auto);
  structure.column_boxes.resize(structure.columns, None);

  structure
}

/// Grows the column count and retroactively widens every registered
/// zero-span cell to the new end.
fn grow_columns(
  structure: &mut Structure,
  current_section: &mut SectionRef,
  new_count: usize,
  span_to_end: &[usize],
) {
  let old_count = structure.columns;
  if new_count <= old_count {
    return;
  }
  trace!("table grows from {} to {} columns", old_count, new_count);
  structure.columns = new_count;

  for section in structure.sections.iter_mut() {
    for row in section.grid.iter_mut() {
      row.resize(new_count, GridSlot::Empty);
    }
  }
  for row in current_section.grid.iter_mut() {
    row.resize(new_count, GridSlot::Empty);
  }

  // The retroactive rewrite: previously-registered span-to-end cells widen
  // into the new columns (in registration order, a deliberate path
  // dependence).
  for &cell_index in span_to_end {
    let (section_idx, row, col, row_span, id) = {
      let c = &structure.cells[cell_index];
      (c.section, c.row, c.col, c.row_span, c.id)
    };
    structure.cells[cell_index].col_span = new_count.saturating_sub(col).max(1);
    let grid = if section_idx == structure.sections.len() {
      &mut current_section.grid
    } else {
      &mut structure.sections[section_idx].grid
    };
    for dr in 0..row_span {
      let r = row + dr;
      if r >= grid.len() {
        break;
      }
      for c in (col + 1)..new_count {
        if grid[r][c] == GridSlot::Empty {
          grid[r][c] = GridSlot::Spanned(id);
        }
      }
    }
  }
}

// ---------------------------------------------------------------------------
// Width phase
// ---------------------------------------------------------------------------

/// Builds the column constraint set for the given strategy.
fn build_column_constraints(
  tree: &BoxTree,
  structure: &Structure,
  strategy: ColumnStrategy,
) -> Vec<ColumnConstraints> {
  let mut columns: Vec<ColumnConstraints> = structure
    .column_decls
    .iter()
    .map(|decl| ColumnConstraints {
      width: *decl,
      ..ColumnConstraints::new()
    })
    .collect();
  columns.resize(structure.columns, ColumnConstraints::new());

  match strategy {
    ColumnStrategy::Fixed => {
      // Only the first row's cells contribute, and only their declarations.
      let first_section = structure.layout_order().first().copied();
      for cell in &structure.cells {
        if Some(cell.section) != first_section || cell.row != 0 {
          continue;
        }
        let style = &tree.get(cell.id).style;
        let decl = SpecifiedWidth::from_style(style.width);
        if decl.is_auto() {
          continue;
        }
        // Shared equally across the cell's span; first declaration wins.
        let per_col = match decl {
          SpecifiedWidth::Fixed(w) => SpecifiedWidth::Fixed(w / cell.col_span as f32),
          SpecifiedWidth::Percent(p) => SpecifiedWidth::Percent(p / cell.col_span as f32),
          other => other,
        };
        for col in columns.iter_mut().skip(cell.col).take(cell.col_span) {
          if col.width.is_auto() {
            col.width = per_col;
          }
        }
      }
    }
    ColumnStrategy::Auto => {
      // Non-spanning cells record directly; spanning cells queue and
      // distribute afterwards, narrowest spans first.
      let mut spanning: Vec<&CellRef> = Vec::new();
      for cell in &structure.cells {
        if cell.col_span == 1 {
          let (min, max) = crate::layout::intrinsic_widths(tree, cell.id);
          let style = &tree.get(cell.id).style;
          let decl = SpecifiedWidth::from_style(style.width);
          let has_content = cell_has_content(tree, cell.id);
          if let Some(col) = columns.get_mut(cell.col) {
            col.record_cell(min, max, decl, has_content);
          }
        } else {
          spanning.push(cell);
        }
      }
      spanning.sort_by_key(|c| c.col_span);
      for cell in spanning {
        let (min, max) = crate::layout::intrinsic_widths(tree, cell.id);
        let style = &tree.get(cell.id).style;
        let decl = SpecifiedWidth::from_style(style.width);
        let end = (cell.col + cell.col_span).min(columns.len());
        if cell.col < end {
          if cell_has_content(tree, cell.id) {
            for col in columns[cell.col..end].iter_mut() {
              col.empty_cells_only = false;
            }
          }
          distribute_spanning_cell(&mut columns[cell.col..end], min, max, decl);
        }
      }
      normalize_percentages(&mut columns);
    }
  }

  columns
}

fn cell_has_content(tree: &BoxTree, cell: BoxId) -> bool {
  let node = tree.get(cell);
  if let Some(block) = node.as_block() {
    if block
      .inline_content
      .as_ref()
      .map(|c| !c.lines.is_empty() || c.max_width > 0.0)
      .unwrap_or(false)
    {
      return true;
    }
  }
  !node.children.is_empty()
}

/// Content-level intrinsic widths of a table (no table border/padding).
pub(crate) fn intrinsic_table_widths(tree: &BoxTree, table: BoxId) -> (f32, f32) {
  let style = tree.get(table).style.clone();
  let structure = build_structure(tree, table);
  if structure.columns == 0 {
    return (0.0, 0.0);
  }
  let strategy = select_strategy(style.table_layout, style.width.is_none());
  let columns = build_column_constraints(tree, &structure, strategy);
  let spacing = horizontal_spacing_total(&style, structure.columns);

  match strategy {
    ColumnStrategy::Fixed => {
      let min = fixed_layout_minimum(&columns) + spacing;
      (min, min.max(spacing))
    }
    ColumnStrategy::Auto => {
      let (min, max) = auto_layout_min_max(&columns);
      (min + spacing, max + spacing)
    }
  }
}

fn border_spacing(style: &ComputedStyle) -> (f32, f32) {
  if style.border_collapse == BorderCollapse::Collapse {
    (0.0, 0.0)
  } else {
    (
      style.border_spacing_h.to_px().max(0.0),
      style.border_spacing_v.to_px().max(0.0),
    )
  }
}

fn horizontal_spacing_total(style: &ComputedStyle, columns: usize) -> f32 {
  let (h, _) = border_spacing(style);
  if columns == 0 {
    0.0
  } else {
    h * (columns as f32 + 1.0)
  }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Lays out a table box at `placement`.
pub(crate) fn layout_table(
  tree: &mut BoxTree,
  id: BoxId,
  constraints: LayoutConstraints,
  ctx: &mut LayoutContext<'_>,
  placement: Placement,
) {
  let style = tree.get(id).style.clone();
  let padding = style.padding_sizes(constraints.containing_width);
  let (spacing_h, spacing_v) = border_spacing(&style);

  let structure = build_structure(tree, id);

  // Under the collapsing model the shared-edge decisions are pure style
  // resolution, so they can run before geometry; the table absorbs half of
  // each outer collapsed border into its own extent.
  let collapsed = if style.border_collapse == BorderCollapse::Collapse {
    Some(compute_collapsed_borders(tree, &structure, &style))
  } else {
    None
  };
  let border = match &collapsed {
    Some(grid) => half_outer_borders(grid),
    None => style.border_widths(),
  };
  let strategy = select_strategy(style.table_layout, style.width.is_none());
  let mut columns = build_column_constraints(tree, &structure, strategy);
  let ncols = structure.columns;
  let spacing_total = horizontal_spacing_total(&style, ncols);

  debug!(
    "table {:?}: {} columns, {} rows, strategy {:?}",
    id,
    ncols,
    structure.total_rows(),
    strategy
  );

  // --- phase 1: width resolution --------------------------------------
  let specified_content_width = style.width.as_ref().map(|w| {
    let resolved = w.resolve_against(constraints.containing_width);
    match style.box_sizing {
      BoxSizing::ContentBox => resolved.max(0.0),
      BoxSizing::BorderBox => (resolved - border.horizontal() - padding.horizontal()).max(0.0),
    }
  });

  let content_width = match strategy {
    ColumnStrategy::Fixed => {
      // The larger of the specified width and the strategy's minimum; no
      // dependency on content past the first row.
      let minimum = fixed_layout_minimum(&columns) + spacing_total;
      specified_content_width
        .unwrap_or(constraints.containing_width)
        .max(minimum)
    }
    ColumnStrategy::Auto => {
      let (min_total, max_total) = auto_layout_min_max(&columns);
      let min_w = min_total + spacing_total;
      let max_w = max_total + spacing_total;
      match specified_content_width {
        Some(w) => w.max(min_w),
        None => {
          let available =
            (constraints.containing_width - border.horizontal() - padding.horizontal()).max(0.0);
          available.min(max_w).max(min_w)
        }
      }
    }
  };
  let content_width = style.clamp_width(content_width, constraints.containing_width);

  let grid_width = (content_width - spacing_total).max(0.0);
  match strategy {
    ColumnStrategy::Fixed => fixed_layout_widths(&mut columns, grid_width),
    ColumnStrategy::Auto => auto_layout_widths(&mut columns, grid_width),
  }

  // Column positions: columns.len() + 1 entries, monotonic.
  let mut column_positions = Vec::with_capacity(ncols + 1);
  let mut x = spacing_h;
  for col in &columns {
    column_positions.push(x);
    x += col.computed_width.max(0.0) + spacing_h;
  }
  column_positions.push(x);

  // Horizontal margins: tables size to their columns, so auto margins can
  // genuinely center.
  let border_box_width = content_width + border.horizontal() + padding.horizontal();
  let free = constraints.containing_width - border_box_width;
  let (margin_left, margin_right) = match (&style.margin_left, &style.margin_right) {
    (None, None) => {
      let half = (free / 2.0).max(0.0);
      (half, half)
    }
    (None, Some(r)) => {
      let mr = r.resolve_against(constraints.containing_width);
      ((free - mr).max(0.0), mr)
    }
    (Some(l), None) => {
      let ml = l.resolve_against(constraints.containing_width);
      (ml, (free - ml).max(0.0))
    }
    (Some(l), Some(r)) => (
      l.resolve_against(constraints.containing_width),
      r.resolve_against(constraints.containing_width),
    ),
  };
  let (margin_top, margin_bottom) = style.vertical_margins(constraints.containing_width);

  {
    let geo = &mut tree.get_mut(id).geometry;
    geo.width = border_box_width;
    geo.margin.left = margin_left;
    geo.margin.right = margin_right;
    geo.margin.top = margin_top;
    geo.margin.bottom = margin_bottom;
    geo.border = border;
    geo.padding = padding;
  }

  // --- caption ---------------------------------------------------------
  let mut caption_top_height = 0.0;
  let mut caption_bottom = None;
  if let Some(caption) = structure.caption {
    let caption_constraints = LayoutConstraints {
      containing_width: content_width,
      containing_height: None,
    };
    layout_box(
      tree,
      caption,
      caption_constraints,
      ctx,
      Placement {
        bfc_origin: Point::ZERO,
        abs_y: placement.abs_y + border.top + padding.top,
      },
    );
    let caption_geo = tree.get(caption).geometry.clone();
    let caption_height =
      caption_geo.height + caption_geo.margin.top + caption_geo.margin.bottom;
    if tree.get(caption).style.caption_side == CaptionSide::Bottom {
      caption_bottom = Some(caption_height);
    } else {
      caption_top_height = caption_height;
      let node = tree.get_mut(caption);
      node.geometry.x = border.left + padding.left + caption_geo.margin.left;
      node.geometry.y = border.top + padding.top + caption_geo.margin.top;
    }
  }

  // --- phase 2: row and cell placement ---------------------------------
  let grid_top = border.top + padding.top + caption_top_height;
  let placed = place_rows_and_cells(
    tree,
    &structure,
    &columns,
    &column_positions,
    &style,
    constraints,
    ctx,
    placement,
    grid_top,
    spacing_h,
    spacing_v,
    content_width,
  );
  let grid_height = placed.grid_height;

  // Bottom caption sits below the grid.
  let mut content_height = caption_top_height + grid_height;
  if let (Some(caption), Some(caption_height)) = (structure.caption, caption_bottom) {
    let caption_geo = tree.get(caption).geometry.clone();
    let node = tree.get_mut(caption);
    node.geometry.x = border.left + padding.left + caption_geo.margin.left;
    node.geometry.y = grid_top + grid_height + caption_geo.margin.top;
    content_height += caption_height;
  }

  let content_height = style.clamp_height(content_height, constraints.containing_height);
  {
    let geo = &mut tree.get_mut(id).geometry;
    geo.height = content_height + border.vertical() + padding.vertical();
    geo.overflow = Rect::from_xywh(0.0, 0.0, geo.width, geo.height);
  }

  // --- outbound column model and collapsed borders ---------------------
  let effective_columns: Vec<EffectiveColumn> = columns
    .iter()
    .map(|c| EffectiveColumn {
      span: 1,
      width: c.width,
    })
    .collect();
  if let BoxKind::Table(table_box) = &mut tree.get_mut(id).kind {
    table_box.columns = effective_columns;
    table_box.column_positions = column_positions;
    table_box.collapsed_borders = collapsed;
    table_box.structure_dirty = false;
  }

  // Tables never fold margins with anything.
  tree.get_mut(id).collapsed_margins = CollapsedMargins {
    top_pos: margin_top.max(0.0),
    top_neg: (-margin_top).max(0.0),
    bottom_pos: margin_bottom.max(0.0),
    bottom_neg: (-margin_bottom).max(0.0),
    self_collapsing: false,
    top_quirk: style.margin_top_is_quirk,
    bottom_quirk: style.margin_bottom_is_quirk,
  };
  tree.get_mut(id).needs_layout = false;
}

struct PlacedGrid {
  grid_height: f32,
}

/// Seeds row heights from cells, distributes surplus, writes section/row/
/// cell geometry and vertical-alignment insets.
#[allow(clippy::too_many_arguments)]
fn place_rows_and_cells(
  tree: &mut BoxTree,
  structure: &Structure,
  columns: &[ColumnConstraints],
  column_positions: &[f32],
  style: &ComputedStyle,
  constraints: LayoutConstraints,
  ctx: &mut LayoutContext<'_>,
  placement: Placement,
  grid_top: f32,
  spacing_h: f32,
  spacing_v: f32,
  content_width: f32,
) -> PlacedGrid {
  let order = structure.layout_order();
  let total_rows = structure.total_rows();
  if total_rows == 0 {
    return PlacedGrid {
      grid_height: if structure.sections.is_empty() {
        0.0
      } else {
        spacing_v
      },
    };
  }

  // Global row table: (section index, row-in-section) in layout order.
  let mut global_rows: Vec<(usize, usize)> = Vec::with_capacity(total_rows);
  let mut row_index: FxHashMap<(usize, usize), usize> = FxHashMap::default();
  for &s in &order {
    for r in 0..structure.sections[s].grid.len() {
      row_index.insert((s, r), global_rows.len());
      global_rows.push((s, r));
    }
  }
  let global_index =
    |section: usize, row: usize| -> usize { row_index.get(&(section, row)).copied().unwrap_or(0) };

  // --- first pass: lay out every cell at its column width ---------------
  let cell_border_width = |cell: &CellRef| -> f32 {
    let end = (cell.col + cell.col_span).min(columns.len());
    let widths: f32 = columns[cell.col..end]
      .iter()
      .map(|c| c.computed_width.max(0.0))
      .sum();
    widths + spacing_h * (end.saturating_sub(cell.col + 1)) as f32
  };

  let mut natural_heights: Vec<f32> = vec![0.0; structure.cells.len()];
  let mut baselines: Vec<Option<f32>> = vec![None; structure.cells.len()];
  for (i, cell) in structure.cells.iter().enumerate() {
    let width = cell_border_width(cell);
    let cell_constraints = LayoutConstraints {
      containing_width: width,
      containing_height: None,
    };
    layout_box(
      tree,
      cell.id,
      cell_constraints,
      ctx,
      Placement {
        bfc_origin: Point::ZERO,
        abs_y: placement.abs_y + grid_top,
      },
    );
    natural_heights[i] = tree.get(cell.id).geometry.height;
    baselines[i] = cell_baseline(tree, cell.id);
  }

  // --- row height seeding -----------------------------------------------
  let mut row_specs: Vec<SpecifiedHeight> = Vec::with_capacity(total_rows);
  let mut row_heights: Vec<f32> = vec![0.0; total_rows];
  let mut row_baselines: Vec<f32> = vec![0.0; total_rows];
  let mut row_has_cells: Vec<bool> = vec![false; total_rows];
  for &(s, r) in &global_rows {
    let row_box = structure.sections[s].rows.get(r).copied();
    let spec = row_box
      .map(|rb| SpecifiedHeight::from_style(tree.get(rb).style.height))
      .unwrap_or(SpecifiedHeight::Auto);
    row_specs.push(spec);
  }

  // Baselines first: baseline-aligned cells of a row share one baseline.
  for (i, cell) in structure.cells.iter().enumerate() {
    if tree.get(cell.id).style.vertical_align == VerticalAlign::Baseline {
      if let Some(b) = baselines[i] {
        let g = global_index(cell.section, cell.row);
        row_baselines[g] = row_baselines[g].max(b);
      }
    }
  }

  // Non-spanning cells seed their row; explicit fixed heights floor it.
  for (i, cell) in structure.cells.iter().enumerate() {
    let g = global_index(cell.section, cell.row);
    row_has_cells[g] = true;
    if cell.row_span == 1 {
      let style_cell = tree.get(cell.id).style.clone();
      let needed = if style_cell.vertical_align == VerticalAlign::Baseline {
        match baselines[i] {
          Some(b) => row_baselines[g] + (natural_heights[i] - b),
          None => natural_heights[i],
        }
      } else {
        natural_heights[i]
      };
      row_heights[g] = row_heights[g].max(needed);
    }
  }
  for (g, spec) in row_specs.iter().enumerate() {
    if let SpecifiedHeight::Fixed(h) = spec {
      row_heights[g] = row_heights[g].max(*h);
    }
  }

  // Row-spanning cells: shortfall spreads evenly over the spanned rows.
  for (i, cell) in structure.cells.iter().enumerate() {
    if cell.row_span > 1 {
      let g = global_index(cell.section, cell.row);
      let end = (g + cell.row_span).min(total_rows);
      let covered: f32 = row_heights[g..end].iter().sum::<f32>()
        + spacing_v * (end.saturating_sub(g + 1)) as f32;
      if natural_heights[i] > covered {
        let extra = (natural_heights[i] - covered) / (end - g) as f32;
        for h in row_heights[g..end].iter_mut() {
          *h += extra;
        }
      }
    }
  }

  // --- surplus distribution ---------------------------------------------
  let natural_total: f32 =
    row_heights.iter().sum::<f32>() + spacing_v * (total_rows as f32 + 1.0);
  let target_height = style.height.as_ref().and_then(|h| {
    let resolved = h.maybe_resolve(constraints.containing_height)?;
    let border = style.border_widths();
    let padding = style.padding_sizes(constraints.containing_width);
    Some(match style.box_sizing {
      BoxSizing::ContentBox => resolved,
      BoxSizing::BorderBox => (resolved - border.vertical() - padding.vertical()).max(0.0),
    })
  });
  if let Some(target) = target_height {
    let mut surplus = target - natural_total;
    if surplus > 0.0 {
      distribute_row_surplus(&mut row_heights, &row_specs, &row_has_cells, target, &mut surplus);
    }
  }

  // --- write geometry ----------------------------------------------------
  let border = style.border_widths();
  let padding = style.padding_sizes(constraints.containing_width);
  let content_left = border.left + padding.left;

  let mut y = spacing_v;
  let mut row_positions: Vec<f32> = Vec::with_capacity(total_rows);
  for g in 0..total_rows {
    // Pagination: a row that crosses a page boundary moves down whole.
    if let Some(page) = &ctx.page {
      let abs = placement.abs_y + grid_top + y;
      let row_box = structure.sections[global_rows[g].0]
        .rows
        .get(global_rows[g].1)
        .copied();
      let break_inside = row_box
        .map(|rb| tree.get(rb).style.break_inside)
        .unwrap_or_default();
      let pushed = page.adjusted_position(
        abs,
        row_heights[g],
        crate::style::BreakBetween::Auto,
        break_inside,
      );
      y += pushed - abs;
    }
    row_positions.push(y);
    y += row_heights[g] + spacing_v;
  }
  let grid_height = y;

  // Sections and rows.
  let mut g = 0usize;
  for &s in &order {
    let section = &structure.sections[s];
    let first = g;
    let row_count = section.grid.len();
    for (local, &row_box) in section.rows.iter().enumerate() {
      let gi = first + local;
      let node = tree.get_mut(row_box);
      node.geometry.x = 0.0;
      node.geometry.y = row_positions[gi] - row_positions[first];
      node.geometry.width = content_width;
      node.geometry.height = row_heights[gi];
      node.geometry.overflow = Rect::from_xywh(0.0, 0.0, content_width, row_heights[gi]);
      node.needs_layout = false;
    }
    let section_height = if row_count > 0 {
      let last = first + row_count - 1;
      row_positions[last] + row_heights[last] - row_positions[first]
    } else {
      0.0
    };
    let node = tree.get_mut(section.id);
    node.geometry.x = content_left;
    node.geometry.y = grid_top + row_positions.get(first).copied().unwrap_or(spacing_v);
    node.geometry.width = content_width;
    node.geometry.height = section_height;
    node.geometry.overflow = Rect::from_xywh(0.0, 0.0, content_width, section_height);
    node.needs_layout = false;
    // Durable grid rows per the data model.
    let grid_rows: Vec<GridRow> = section
      .rows
      .iter()
      .enumerate()
      .map(|(local, &rb)| {
        let gi = first + local;
        let mut row = GridRow::new(rb);
        row.slots = section.grid.get(local).cloned().unwrap_or_default();
        row.baseline = row_baselines[gi];
        row.height = row_heights[gi];
        row.y = row_positions[gi] - row_positions[first];
        row
      })
      .collect();
    if let BoxKind::TableSection(sb) = &mut tree.get_mut(section.id).kind {
      sb.grid = grid_rows;
    }
    g += row_count;
  }

  // Cells: final rects, vertical alignment insets, percent-height redo.
  for (i, cell) in structure.cells.iter().enumerate() {
    let gi = global_index(cell.section, cell.row);
    let end = (gi + cell.row_span).min(total_rows);
    let cell_height: f32 = row_heights[gi..end].iter().sum::<f32>()
      + spacing_v * (end.saturating_sub(gi + 1)) as f32;
    let width = cell_border_width(cell);

    let cell_style = tree.get(cell.id).style.clone();
    if cell_style
      .height
      .as_ref()
      .map(|h| h.is_percent())
      .unwrap_or(false)
    {
      // Percent-height cell content resolves against the row's final
      // height, so one more interior pass with a definite base.
      let cell_constraints = LayoutConstraints {
        containing_width: width,
        containing_height: Some(cell_height),
      };
      layout_box(
        tree,
        cell.id,
        cell_constraints,
        ctx,
        Placement {
          bfc_origin: Point::ZERO,
          abs_y: placement.abs_y + grid_top + row_positions[gi],
        },
      );
      natural_heights[i] = tree.get(cell.id).geometry.height;
    }

    let extra = (cell_height - natural_heights[i]).max(0.0);
    let (inset_top, inset_bottom) = match cell_style.vertical_align {
      VerticalAlign::Top => (0.0, extra),
      VerticalAlign::Bottom => (extra, 0.0),
      VerticalAlign::Middle => (extra / 2.0, extra - extra / 2.0),
      VerticalAlign::Baseline => {
        let top = match baselines[i] {
          Some(b) => (row_baselines[gi] - b).max(0.0).min(extra),
          None => 0.0,
        };
        (top, extra - top)
      }
    };

    // Content was positioned against the cell's top edge; the top inset
    // shifts it down within the stretched cell box.
    if inset_top > 0.0 {
      let children = tree.get(cell.id).children.clone();
      for child in children {
        tree.get_mut(child).geometry.y += inset_top;
      }
    }

    let node = tree.get_mut(cell.id);
    if let BoxKind::TableCell(cb) = &mut node.kind {
      cb.col = cell.col;
      cb.row = gi;
      cb.effective_col_span = cell.col_span;
      cb.effective_row_span = cell.row_span;
      cb.intrinsic_padding_top = inset_top;
      cb.intrinsic_padding_bottom = inset_bottom;
    }
    // Cell geometry is row-relative (rows are section-relative).
    node.geometry.x = column_positions
      .get(cell.col)
      .copied()
      .unwrap_or(spacing_h);
    node.geometry.y = 0.0;
    node.geometry.width = width;
    node.geometry.height = cell_height;
    node.geometry.overflow = Rect::from_xywh(0.0, 0.0, width, cell_height);
    node.needs_layout = false;
  }

  PlacedGrid { grid_height }
}

/// Distributes surplus table height over the rows: percent rows up to their
/// share, then evenly among non-empty auto rows, then weighted by current
/// height over all rows, then an even per-row remainder.
fn distribute_row_surplus(
  row_heights: &mut [f32],
  row_specs: &[SpecifiedHeight],
  row_has_cells: &[bool],
  target: f32,
  surplus: &mut f32,
) {
  // Percent rows first.
  for (i, spec) in row_specs.iter().enumerate() {
    if *surplus <= 0.0 {
      break;
    }
    if let SpecifiedHeight::Percent(p) = spec {
      let want = (target * p / 100.0 - row_heights[i]).max(0.0);
      let add = want.min(*surplus);
      row_heights[i] += add;
      *surplus -= add;
    }
  }

  // Then an even split among auto rows that actually hold cells.
  if *surplus > 0.0 {
    let auto_rows: Vec<usize> = row_specs
      .iter()
      .enumerate()
      .filter(|(i, s)| s.is_auto() && row_has_cells[*i])
      .map(|(i, _)| i)
      .collect();
    if !auto_rows.is_empty() {
      let per = *surplus / auto_rows.len() as f32;
      for &i in &auto_rows {
        row_heights[i] += per;
      }
      *surplus = 0.0;
    }
  }

  // Weighted over every row by its current height.
  if *surplus > 0.0 {
    let total: f32 = row_heights.iter().sum();
    if total > 0.0 {
      let factor = *surplus / total;
      for h in row_heights.iter_mut() {
        *h += *h * factor;
      }
      *surplus = 0.0;
    }
  }

  // Nothing has any height: an even remainder.
  if *surplus > 0.0 && !row_heights.is_empty() {
    let per = *surplus / row_heights.len() as f32;
    for h in row_heights.iter_mut() {
      *h += per;
    }
    *surplus = 0.0;
  }
}

/// Half of the widest collapsed border along each outer edge; that half
/// belongs to the table's own extent, the other half to the cells.
fn half_outer_borders(grid: &CollapsedBorderGrid) -> crate::geometry::EdgeSizes {
  let max_of = |edges: &[CollapsedBorder]| -> f32 {
    edges.iter().map(|e| e.width).fold(0.0, f32::max)
  };
  let top = grid.horizontal.first().map(|r| max_of(r)).unwrap_or(0.0);
  let bottom = grid.horizontal.last().map(|r| max_of(r)).unwrap_or(0.0);
  let left = grid
    .vertical
    .iter()
    .filter_map(|r| r.first())
    .map(|e| e.width)
    .fold(0.0, f32::max);
  let right = grid
    .vertical
    .iter()
    .filter_map(|r| r.last())
    .map(|e| e.width)
    .fold(0.0, f32::max);
  crate::geometry::EdgeSizes::new(top / 2.0, right / 2.0, bottom / 2.0, left / 2.0)
}

/// Baseline of a cell: the first line of its inline content, offset by the
/// cell's top border and padding. Cells without lines report none and align
/// by their top edge.
fn cell_baseline(tree: &BoxTree, cell: BoxId) -> Option<f32> {
  let node = tree.get(cell);
  let block = node.as_block()?;
  let content = block.inline_content.as_ref()?;
  let first = content.first_baseline()?;
  Some(node.geometry.border.top + node.geometry.padding.top + first)
}

// ---------------------------------------------------------------------------
// Border collapsing
// ---------------------------------------------------------------------------

/// One edge contributor, in precedence order position.
#[derive(Debug, Clone, Copy)]
struct EdgeContributor {
  style: BorderStyle,
  width: f32,
  color: Rgba,
}

impl EdgeContributor {
  fn from_style(style: &ComputedStyle, side: Side) -> Self {
    let (border_style, width, color) = match side {
      Side::Top => (
        style.border_top_style,
        &style.border_top_width,
        style.border_top_color,
      ),
      Side::Right => (
        style.border_right_style,
        &style.border_right_width,
        style.border_right_color,
      ),
      Side::Bottom => (
        style.border_bottom_style,
        &style.border_bottom_width,
        style.border_bottom_color,
      ),
      Side::Left => (
        style.border_left_style,
        &style.border_left_width,
        style.border_left_color,
      ),
    };
    Self {
      style: border_style,
      width: width.to_px().max(0.0),
      color,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
  Top,
  Right,
  Bottom,
  Left,
}

/// Resolves one shared edge from its contributors, listed in precedence
/// order: cell, row, row group, column, column group, table.
///
/// `hidden` anywhere suppresses the edge. Among the rest the widest wins;
/// width ties break on style rank (double > solid > dashed > dotted > ridge
/// > outset > groove > inset); remaining ties break on precedence order.
fn resolve_edge(contributors: &[EdgeContributor]) -> CollapsedBorder {
  if contributors
    .iter()
    .any(|c| c.style == BorderStyle::Hidden)
  {
    return CollapsedBorder::NONE;
  }

  let mut winner: Option<&EdgeContributor> = None;
  for c in contributors {
    if c.style == BorderStyle::None || c.width <= 0.0 {
      continue;
    }
    match winner {
      None => winner = Some(c),
      Some(current) => {
        if c.width > current.width
          || (c.width == current.width && c.style.rank() > current.style.rank())
        {
          winner = Some(c);
        }
        // Equal width and rank: the earlier (higher-precedence) entry keeps
        // the edge.
      }
    }
  }

  match winner {
    Some(c) => CollapsedBorder {
      width: c.width,
      style: c.style,
      color: c.color,
    },
    None => CollapsedBorder::NONE,
  }
}

/// Computes every shared edge decision for a collapsed-borders table.
fn compute_collapsed_borders(
  tree: &BoxTree,
  structure: &Structure,
  table_style: &ComputedStyle,
) -> CollapsedBorderGrid {
  let order = structure.layout_order();
  let total_rows = structure.total_rows();
  let ncols = structure.columns;
  let mut grid = CollapsedBorderGrid {
    horizontal: vec![vec![CollapsedBorder::NONE; ncols]; total_rows + 1],
    vertical: vec![vec![CollapsedBorder::NONE; ncols + 1]; total_rows],
  };
  if total_rows == 0 || ncols == 0 {
    return grid;
  }

  // Flattened row context: (section id, row box, slots) per global row.
  struct RowCtx {
    section: BoxId,
    row_box: Option<BoxId>,
    slots: Vec<GridSlot>,
  }
  let mut rows: Vec<RowCtx> = Vec::with_capacity(total_rows);
  for &s in &order {
    let section = &structure.sections[s];
    for (r, slots) in section.grid.iter().enumerate() {
      rows.push(RowCtx {
        section: section.id,
        row_box: section.rows.get(r).copied(),
        slots: slots.clone(),
      });
    }
  }

  let column_style = |c: usize| -> Option<&ComputedStyle> {
    structure
      .column_boxes
      .get(c)
      .and_then(|b| b.as_ref())
      .map(|&b| tree.get(b).style.as_ref())
  };

  // Horizontal edges: between row r-1 and row r (r == 0 is the table top,
  // r == total_rows the table bottom).
  for r in 0..=total_rows {
    for c in 0..ncols {
      let mut contributors = Vec::with_capacity(6);
      // Cell below the edge contributes its top border.
      if r < total_rows {
        if let Some(cell) = rows[r].slots.get(c).and_then(|s| s.cell()) {
          contributors.push(EdgeContributor::from_style(&tree.get(cell).style, Side::Top));
        }
      }
      // Cell above contributes its bottom border.
      if r > 0 {
        if let Some(cell) = rows[r - 1].slots.get(c).and_then(|s| s.cell()) {
          contributors.push(EdgeContributor::from_style(
            &tree.get(cell).style,
            Side::Bottom,
          ));
        }
      }
      // Row below (top), row above (bottom).
      if r < total_rows {
        if let Some(rb) = rows[r].row_box {
          contributors.push(EdgeContributor::from_style(&tree.get(rb).style, Side::Top));
        }
      }
      if r > 0 {
        if let Some(rb) = rows[r - 1].row_box {
          contributors.push(EdgeContributor::from_style(
            &tree.get(rb).style,
            Side::Bottom,
          ));
        }
      }
      // Row groups at their boundaries.
      if r < total_rows && (r == 0 || rows[r].section != rows[r - 1].section) {
        contributors.push(EdgeContributor::from_style(
          &tree.get(rows[r].section).style,
          Side::Top,
        ));
      }
      if r > 0 && (r == total_rows || rows[r].section != rows[r - 1].section) {
        contributors.push(EdgeContributor::from_style(
          &tree.get(rows[r - 1].section).style,
          Side::Bottom,
        ));
      }
      // Columns contribute along the table's top and bottom edges.
      if r == 0 || r == total_rows {
        if let Some(col_style) = column_style(c) {
          contributors.push(EdgeContributor::from_style(
            col_style,
            if r == 0 { Side::Top } else { Side::Bottom },
          ));
        }
        contributors.push(EdgeContributor::from_style(
          table_style,
          if r == 0 { Side::Top } else { Side::Bottom },
        ));
      }
      grid.horizontal[r][c] = resolve_edge(&contributors);
    }
  }

  // Vertical edges: between column c-1 and column c.
  for (r, row) in rows.iter().enumerate() {
    for c in 0..=ncols {
      let mut contributors = Vec::with_capacity(6);
      // Cell to the right contributes its left border, unless the same
      // spanning cell covers both sides of the edge.
      let right_cell = if c < ncols { row.slots[c].cell() } else { None };
      let left_cell = if c > 0 { row.slots[c - 1].cell() } else { None };
      if left_cell.is_some() && left_cell == right_cell {
        // Interior of a spanning cell: no edge.
        grid.vertical[r][c] = CollapsedBorder::NONE;
        continue;
      }
      if let Some(cell) = right_cell {
        contributors.push(EdgeContributor::from_style(&tree.get(cell).style, Side::Left));
      }
      if let Some(cell) = left_cell {
        contributors.push(EdgeContributor::from_style(
          &tree.get(cell).style,
          Side::Right,
        ));
      }
      if let Some(rb) = row.row_box {
        contributors.push(EdgeContributor::from_style(
          &tree.get(rb).style,
          if c == 0 { Side::Left } else { Side::Right },
        ));
      }
      if c == 0 || c == ncols {
        contributors.push(EdgeContributor::from_style(
          &tree.get(row.section).style,
          if c == 0 { Side::Left } else { Side::Right },
        ));
        if let Some(col_style) = column_style(if c == 0 { 0 } else { ncols - 1 }) {
          contributors.push(EdgeContributor::from_style(
            col_style,
            if c == 0 { Side::Left } else { Side::Right },
          ));
        }
        contributors.push(EdgeContributor::from_style(
          table_style,
          if c == 0 { Side::Left } else { Side::Right },
        ));
      } else {
        // Interior edges also see the flanking columns.
        if let Some(col_style) = column_style(c - 1) {
          contributors.push(EdgeContributor::from_style(col_style, Side::Right));
        }
        if let Some(col_style) = column_style(c) {
          contributors.push(EdgeContributor::from_style(col_style, Side::Left));
        }
      }
      grid.vertical[r][c] = resolve_edge(&contributors);
    }
  }

  grid
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::style::Length;
  use std::sync::Arc;

  fn style(display: Display) -> Arc<ComputedStyle> {
    Arc::new(ComputedStyle {
      display,
      ..Default::default()
    })
  }

  fn build_table(
    tree: &mut BoxTree,
    rows: &[&[(usize, usize)]], // (col_span, row_span) per cell
  ) -> BoxId {
    let root = tree.root();
    let table = tree.create_box(style(Display::Table));
    tree.add_child(root, table, None).unwrap();
    let section = tree.create_box(style(Display::TableRowGroup));
    tree.add_child(table, section, None).unwrap();
    for row_cells in rows {
      let row = tree.create_box(style(Display::TableRow));
      tree.add_child(section, row, None).unwrap();
      for &(cs, rs) in *row_cells {
        let cell = tree.create_cell(style(Display::TableCell), cs, rs);
        tree.add_child(row, cell, None).unwrap();
      }
    }
    table
  }

  #[test]
  fn test_structure_simple_grid() {
    let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
    let table = build_table(&mut tree, &[&[(1, 1), (1, 1)], &[(1, 1), (1, 1)]]);
    let structure = build_structure(&tree, table);
    assert_eq!(structure.columns, 2);
    assert_eq!(structure.total_rows(), 2);
    assert_eq!(structure.cells.len(), 4);
    let grid = &structure.sections[0].grid;
    assert!(matches!(grid[0][0], GridSlot::Cell(_)));
    assert!(matches!(grid[1][1], GridSlot::Cell(_)));
  }

  #[test]
  fn test_structure_col_span_occupies_sentinels() {
    let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
    let table = build_table(&mut tree, &[&[(2, 1), (1, 1)]]);
    let structure = build_structure(&tree, table);
    assert_eq!(structure.columns, 3);
    let grid = &structure.sections[0].grid;
    let origin = grid[0][0].cell().unwrap();
    assert_eq!(grid[0][1], GridSlot::Spanned(origin));
    assert!(matches!(grid[0][2], GridSlot::Cell(_)));
  }

  #[test]
  fn test_structure_row_span_occupies_second_row() {
    let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
    let table = build_table(&mut tree, &[&[(1, 2), (1, 1)], &[(1, 1)]]);
    let structure = build_structure(&tree, table);
    assert_eq!(structure.columns, 2);
    let grid = &structure.sections[0].grid;
    let origin = grid[0][0].cell().unwrap();
    assert_eq!(grid[1][0], GridSlot::Spanned(origin));
    // The second row's only cell skipped the occupied slot.
    assert!(matches!(grid[1][1], GridSlot::Cell(_)));
  }

  #[test]
  fn test_span_zero_widens_when_columns_grow() {
    // A span-0 cell placed before the column count is
    // final spans every column added afterwards.
    let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
    let table = build_table(&mut tree, &[&[(0, 1)], &[(1, 1), (1, 1), (1, 1)]]);
    let structure = build_structure(&tree, table);
    assert_eq!(structure.columns, 3);
    let zero_cell = structure
      .cells
      .iter()
      .find(|c| c.col_span_to_end)
      .expect("span-zero cell");
    assert_eq!(zero_cell.col_span, 3);
    let grid = &structure.sections[0].grid;
    let origin = grid[0][0].cell().unwrap();
    assert_eq!(grid[0][1], GridSlot::Spanned(origin));
    assert_eq!(grid[0][2], GridSlot::Spanned(origin));
  }

  #[test]
  fn test_row_span_zero_reaches_section_end() {
    let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
    let table = build_table(
      &mut tree,
      &[&[(1, 0), (1, 1)], &[(1, 1)], &[(1, 1)]],
    );
    let structure = build_structure(&tree, table);
    let zero_cell = structure.cells[0];
    assert_eq!(zero_cell.row_span, 3);
    let grid = &structure.sections[0].grid;
    let origin = grid[0][0].cell().unwrap();
    assert_eq!(grid[1][0], GridSlot::Spanned(origin));
    assert_eq!(grid[2][0], GridSlot::Spanned(origin));
  }

  #[test]
  fn test_header_and_footer_order() {
    let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
    let root = tree.root();
    let table = tree.create_box(style(Display::Table));
    tree.add_child(root, table, None).unwrap();
    // Document order: footer, body, header.
    let footer = tree.create_box(style(Display::TableFooterGroup));
    let body = tree.create_box(style(Display::TableRowGroup));
    let header = tree.create_box(style(Display::TableHeaderGroup));
    for section in [footer, body, header] {
      tree.add_child(table, section, None).unwrap();
      let row = tree.create_box(style(Display::TableRow));
      tree.add_child(section, row, None).unwrap();
      let cell = tree.create_cell(style(Display::TableCell), 1, 1);
      tree.add_child(row, cell, None).unwrap();
    }
    let structure = build_structure(&tree, table);
    let order = structure.layout_order();
    assert_eq!(structure.sections[order[0]].kind, SectionKind::Header);
    assert_eq!(structure.sections[order[1]].kind, SectionKind::Body);
    assert_eq!(structure.sections[order[2]].kind, SectionKind::Footer);
  }

  #[test]
  fn test_column_boxes_expand_and_declare_widths() {
    let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
    let root = tree.root();
    let table = tree.create_box(style(Display::Table));
    tree.add_child(root, table, None).unwrap();
    let col = tree.create_column(
      Arc::new(ComputedStyle {
        display: Display::TableColumn,
        width: Some(Length::px(80.0)),
        ..Default::default()
      }),
      2,
    );
    tree.add_child(table, col, None).unwrap();
    let row = tree.create_box(style(Display::TableRow));
    tree.add_child(table, row, None).unwrap();
    for _ in 0..2 {
      let cell = tree.create_cell(style(Display::TableCell), 1, 1);
      tree.add_child(row, cell, None).unwrap();
    }
    let structure = build_structure(&tree, table);
    assert_eq!(structure.columns, 2);
    assert_eq!(structure.column_decls[0], SpecifiedWidth::Fixed(80.0));
    assert_eq!(structure.column_decls[1], SpecifiedWidth::Fixed(80.0));
  }

  #[test]
  fn test_resolve_edge_hidden_suppresses() {
    let hidden = EdgeContributor {
      style: BorderStyle::Hidden,
      width: 5.0,
      color: Rgba::BLACK,
    };
    let solid = EdgeContributor {
      style: BorderStyle::Solid,
      width: 10.0,
      color: Rgba::BLACK,
    };
    let resolved = resolve_edge(&[hidden, solid]);
    assert!(!resolved.is_visible());
  }

  #[test]
  fn test_resolve_edge_widest_wins() {
    let narrow = EdgeContributor {
      style: BorderStyle::Double,
      width: 2.0,
      color: Rgba::BLACK,
    };
    let wide = EdgeContributor {
      style: BorderStyle::Dotted,
      width: 6.0,
      color: Rgba::new(1, 2, 3, 255),
    };
    let resolved = resolve_edge(&[narrow, wide]);
    assert_eq!(resolved.width, 6.0);
    assert_eq!(resolved.style, BorderStyle::Dotted);
  }

  #[test]
  fn test_resolve_edge_style_rank_breaks_width_tie() {
    let solid = EdgeContributor {
      style: BorderStyle::Solid,
      width: 4.0,
      color: Rgba::BLACK,
    };
    let double = EdgeContributor {
      style: BorderStyle::Double,
      width: 4.0,
      color: Rgba::new(9, 9, 9, 255),
    };
    let resolved = resolve_edge(&[solid, double]);
    assert_eq!(resolved.style, BorderStyle::Double);
  }

  #[test]
  fn test_resolve_edge_precedence_breaks_full_tie() {
    let cell = EdgeContributor {
      style: BorderStyle::Solid,
      width: 4.0,
      color: Rgba::new(1, 0, 0, 255),
    };
    let row = EdgeContributor {
      style: BorderStyle::Solid,
      width: 4.0,
      color: Rgba::new(0, 1, 0, 255),
    };
    let resolved = resolve_edge(&[cell, row]);
    assert_eq!(resolved.color, Rgba::new(1, 0, 0, 255));
  }

  #[test]
  fn test_distribute_row_surplus_percent_first() {
    let mut heights = vec![10.0, 10.0];
    let specs = vec![SpecifiedHeight::Percent(50.0), SpecifiedHeight::Auto];
    let has_cells = vec![true, true];
    let mut surplus = 80.0;
    distribute_row_surplus(&mut heights, &specs, &has_cells, 100.0, &mut surplus);
    // Percent row rose to 50, the auto row took the rest.
    assert!((heights[0] - 50.0).abs() < 0.01);
    assert!((heights[1] - 50.0).abs() < 0.01);
    assert_eq!(surplus, 0.0);
  }

  #[test]
  fn test_distribute_row_surplus_weighted_fallback() {
    let mut heights = vec![10.0, 30.0];
    let specs = vec![SpecifiedHeight::Fixed(10.0), SpecifiedHeight::Fixed(30.0)];
    let has_cells = vec![true, true];
    let mut surplus = 40.0;
    distribute_row_surplus(&mut heights, &specs, &has_cells, 80.0, &mut surplus);
    // No percent or auto rows: weighted by current height.
    assert!((heights[0] - 20.0).abs() < 0.01);
    assert!((heights[1] - 60.0).abs() < 0.01);
  }
}
