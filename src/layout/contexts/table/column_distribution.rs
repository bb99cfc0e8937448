//! Column width strategies
//!
//! The two interchangeable width-resolution algorithms of the table engine.
//!
//! **Fixed** resolves from declarations alone: column descriptors first
//! (first match wins across a span), then first-row cell widths for columns
//! still unset, then an equal split of the remaining width. Nothing past the
//! first row is consulted.
//!
//! **Automatic** resolves from content: every column carries a minimum and
//! maximum content width recorded from its non-spanning cells; spanning
//! cells distribute their constraint across the spanned columns only.
//! Growth passes run in priority order - percent, fixed, relative, auto -
//! followed by leftover spreading, and over-constraint reduces in the exact
//! reverse order, each column bounded by its minimum.

use crate::style::values::SpecifiedWidth;
use log::trace;

/// Per-column sizing state consumed by both strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConstraints {
  /// Effective width declaration (column descriptor, else cell-derived)
  pub width: SpecifiedWidth,
  /// Largest minimum content width of the column's cells
  pub min_width: f32,
  /// Largest maximum content width of the column's cells
  pub max_width: f32,
  /// Final width after distribution
  pub computed_width: f32,
  /// No cell with real content originates in this column
  pub empty_cells_only: bool,
}

impl ColumnConstraints {
  pub fn new() -> Self {
    Self {
      width: SpecifiedWidth::Auto,
      min_width: 0.0,
      max_width: 0.0,
      computed_width: 0.0,
      empty_cells_only: true,
    }
  }

  /// Records one non-spanning cell's contribution.
  pub fn record_cell(&mut self, min: f32, max: f32, width: SpecifiedWidth, has_content: bool) {
    self.min_width = self.min_width.max(min);
    self.max_width = self.max_width.max(max).max(self.min_width);
    if has_content {
      self.empty_cells_only = false;
    }
    // A column without its own declaration takes the first declared cell
    // width; percent beats fixed beats auto when cells disagree.
    match (self.width, width) {
      (SpecifiedWidth::Auto, w) => self.width = w,
      (SpecifiedWidth::Fixed(_), SpecifiedWidth::Percent(p)) => {
        self.width = SpecifiedWidth::Percent(p)
      }
      _ => {}
    }
    if let SpecifiedWidth::Fixed(w) = self.width {
      self.max_width = self.max_width.max(w).max(self.min_width);
    }
  }
}

impl Default for ColumnConstraints {
  fn default() -> Self {
    Self::new()
  }
}

/// Which strategy a table uses; re-selected when the governing style
/// properties change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStrategy {
  Fixed,
  Auto,
}

/// Strategy selection: fixed layout only engages with a non-auto table
/// width; otherwise the automatic algorithm runs.
pub fn select_strategy(
  table_layout: crate::style::TableLayout,
  width_is_auto: bool,
) -> ColumnStrategy {
  if table_layout == crate::style::TableLayout::Fixed && !width_is_auto {
    ColumnStrategy::Fixed
  } else {
    ColumnStrategy::Auto
  }
}

// ---------------------------------------------------------------------------
// Fixed strategy
// ---------------------------------------------------------------------------

/// Resolves fixed-layout column widths.
///
/// `content_width` is the table's content width minus border spacing. The
/// columns' `width` declarations must already fold in first-row cell widths
/// (the structure pass does that); any column still auto shares the
/// remaining width equally.
pub fn fixed_layout_widths(columns: &mut [ColumnConstraints], content_width: f32) {
  if columns.is_empty() {
    return;
  }

  let mut assigned = 0.0;
  let mut auto_count = 0usize;
  for col in columns.iter_mut() {
    match col.width {
      SpecifiedWidth::Fixed(w) => {
        col.computed_width = w.max(0.0);
        assigned += col.computed_width;
      }
      SpecifiedWidth::Percent(p) => {
        col.computed_width = (content_width * p / 100.0).max(0.0);
        assigned += col.computed_width;
      }
      SpecifiedWidth::Auto | SpecifiedWidth::Relative(_) => {
        col.computed_width = 0.0;
        auto_count += 1;
      }
    }
  }

  let remaining = (content_width - assigned).max(0.0);
  if auto_count > 0 {
    let per_column = remaining / auto_count as f32;
    for col in columns.iter_mut() {
      if matches!(col.width, SpecifiedWidth::Auto | SpecifiedWidth::Relative(_)) {
        col.computed_width = per_column;
      }
    }
  } else if remaining > 0.0 && !columns.is_empty() {
    // Everything declared but the table is wider: spread evenly.
    let per_column = remaining / columns.len() as f32;
    for col in columns.iter_mut() {
      col.computed_width += per_column;
    }
  }
}

/// Minimum table content width the fixed strategy insists on: declared
/// widths are honored even when the specified table width is smaller.
pub fn fixed_layout_minimum(columns: &[ColumnConstraints]) -> f32 {
  columns
    .iter()
    .map(|col| match col.width {
      SpecifiedWidth::Fixed(w) => w.max(0.0),
      _ => 0.0,
    })
    .sum()
}

// ---------------------------------------------------------------------------
// Automatic strategy
// ---------------------------------------------------------------------------

/// Distributes a spanning cell's min/max constraint over its columns.
///
/// The cell's widths count only against the columns it spans. Columns with
/// their own fixed declarations absorb growth last; a percent declaration on
/// the cell is spread over non-percent columns (scaled down when the
/// column percentages already exceed it); remaining slack goes to auto
/// columns in proportion to their maximum width.
pub fn distribute_spanning_cell(
  columns: &mut [ColumnConstraints],
  cell_min: f32,
  cell_max: f32,
  cell_width: SpecifiedWidth,
) {
  if columns.is_empty() {
    return;
  }

  // A percent declaration on the cell is carried by spanned columns that
  // have no percentage of their own, proportional to their maxima.
  if let SpecifiedWidth::Percent(cell_pct) = cell_width {
    let existing: f32 = columns
      .iter()
      .filter_map(|c| match c.width {
        SpecifiedWidth::Percent(p) => Some(p),
        _ => None,
      })
      .sum();
    let mut remaining_pct = (cell_pct - existing).max(0.0);
    if remaining_pct > 0.0 {
      let candidates: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.width.is_percent())
        .map(|(i, _)| i)
        .collect();
      let total_max: f32 = candidates.iter().map(|&i| columns[i].max_width).sum();
      let count = candidates.len();
      for (idx, &i) in candidates.iter().enumerate() {
        let share = if total_max > 0.0 {
          remaining_pct * columns[i].max_width / total_max
        } else {
          remaining_pct / (count - idx) as f32
        };
        columns[i].width = SpecifiedWidth::Percent(share);
        remaining_pct -= share;
      }
    }
  }

  // Minimum growth: make the spanned minima cover the cell's minimum.
  let current_min: f32 = columns.iter().map(|c| c.min_width).sum();
  if cell_min > current_min {
    let mut extra = cell_min - current_min;

    // Auto and relative columns grow first, fixed columns absorb last.
    let growth_order = [
      |c: &ColumnConstraints| matches!(c.width, SpecifiedWidth::Auto | SpecifiedWidth::Relative(_)),
      |c: &ColumnConstraints| c.width.is_percent(),
      |c: &ColumnConstraints| c.width.is_fixed(),
    ];
    for accepts in growth_order {
      if extra <= 0.0 {
        break;
      }
      let idxs: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| accepts(c))
        .map(|(i, _)| i)
        .collect();
      if idxs.is_empty() {
        continue;
      }
      let weight_total: f32 = idxs.iter().map(|&i| columns[i].max_width.max(0.0)).sum();
      let count = idxs.len();
      let mut given = 0.0;
      for (pos, &i) in idxs.iter().enumerate() {
        let share = if weight_total > 0.0 {
          extra * columns[i].max_width.max(0.0) / weight_total
        } else {
          extra / count as f32
        };
        // Last taker absorbs rounding drift.
        let share = if pos == count - 1 { extra - given } else { share };
        columns[i].min_width += share;
        columns[i].max_width = columns[i].max_width.max(columns[i].min_width);
        given += share;
      }
      extra -= given;
    }
  }

  // Maximum growth mirrors the minimum pass.
  let current_max: f32 = columns.iter().map(|c| c.max_width).sum();
  if cell_max > current_max {
    let extra = cell_max - current_max;
    let auto_idxs: Vec<usize> = columns
      .iter()
      .enumerate()
      .filter(|(_, c)| !c.width.is_fixed())
      .map(|(i, _)| i)
      .collect();
    let targets = if auto_idxs.is_empty() {
      (0..columns.len()).collect::<Vec<_>>()
    } else {
      auto_idxs
    };
    let weight_total: f32 = targets.iter().map(|&i| columns[i].max_width.max(0.0)).sum();
    let count = targets.len();
    for &i in &targets {
      let share = if weight_total > 0.0 {
        extra * columns[i].max_width.max(0.0) / weight_total
      } else {
        extra / count as f32
      };
      columns[i].max_width += share;
    }
  }
}

/// Scales column percentages down proportionally when they sum past 100.
pub fn normalize_percentages(columns: &mut [ColumnConstraints]) {
  let total: f32 = columns
    .iter()
    .filter_map(|c| match c.width {
      SpecifiedWidth::Percent(p) => Some(p),
      _ => None,
    })
    .sum();
  if total <= 100.0 {
    return;
  }
  let scale = 100.0 / total;
  for col in columns.iter_mut() {
    if let SpecifiedWidth::Percent(p) = col.width {
      col.width = SpecifiedWidth::Percent(p * scale);
    }
  }
}

/// Assigns final widths for the automatic strategy.
///
/// Growth passes in priority order: every column starts at its minimum;
/// percent columns rise toward their percentage of the table width, then
/// fixed columns toward their declaration, then relative columns toward
/// their proportional share, then auto columns in proportion to their
/// maxima. Leftover width spreads evenly over all columns except auto
/// columns with no real content. If the requests exceed the available
/// width, reduction applies in reverse priority - auto, relative, fixed,
/// percent - each column bounded below by its minimum.
pub fn auto_layout_widths(columns: &mut [ColumnConstraints], content_width: f32) {
  if columns.is_empty() {
    return;
  }

  let mut available = content_width;
  let mut total_relative = 0.0_f32;
  let mut total_auto_max = 0.0_f32;
  let mut total_fixed_max = 0.0_f32;
  let mut total_percent = 0.0_f32;
  let mut num_auto = 0usize;
  let mut num_auto_empty = 0usize;
  let mut alloc_auto = 0.0_f32;

  for col in columns.iter_mut() {
    col.computed_width = col.min_width;
    available -= col.min_width;
    match col.width {
      SpecifiedWidth::Percent(p) => total_percent += p,
      SpecifiedWidth::Relative(r) => total_relative += r,
      SpecifiedWidth::Fixed(_) => total_fixed_max += col.max_width,
      SpecifiedWidth::Auto => {
        if col.empty_cells_only {
          num_auto_empty += 1;
        } else {
          num_auto += 1;
          total_auto_max += col.max_width;
          alloc_auto += col.min_width;
        }
      }
    }
  }

  trace!(
    "auto widths: content={} after-min available={} percent={} relative={}",
    content_width,
    available,
    total_percent,
    total_relative
  );

  // Percent columns, bounded below by their minima.
  if available > 0.0 && total_percent > 0.0 {
    for col in columns.iter_mut() {
      if let SpecifiedWidth::Percent(p) = col.width {
        let target = (content_width * p / 100.0).max(col.min_width);
        available += col.computed_width - target;
        col.computed_width = target;
      }
    }
  }

  // Fixed columns up to their declaration.
  if available > 0.0 {
    for col in columns.iter_mut() {
      if let SpecifiedWidth::Fixed(w) = col.width {
        if w > col.computed_width {
          available += col.computed_width - w;
          col.computed_width = w;
        }
      }
    }
  }

  // Relative columns share the table width by their factors.
  if available > 0.0 && total_relative > 0.0 {
    for col in columns.iter_mut() {
      if let SpecifiedWidth::Relative(r) = col.width {
        if r > 0.0 {
          let target = (content_width * r / total_relative).max(col.min_width);
          available += col.computed_width - target;
          col.computed_width = target;
        }
      }
    }
  }

  // Auto columns grow toward their maxima, proportional to them.
  if available > 0.0 && num_auto > 0 {
    available += alloc_auto;
    let mut remaining_max = total_auto_max;
    for col in columns.iter_mut() {
      if col.width.is_auto() && !col.empty_cells_only && remaining_max > 0.0 {
        let w = col
          .computed_width
          .max(available * col.max_width / remaining_max);
        available -= w;
        remaining_max -= col.max_width;
        col.computed_width = w;
      }
    }
  }

  // Leftover: spread to fixed columns in proportion to their maxima.
  if available > 0.0 && total_fixed_max > 0.0 {
    let mut remaining_max = total_fixed_max;
    for col in columns.iter_mut() {
      if col.width.is_fixed() && remaining_max > 0.0 {
        let share = available * col.max_width / remaining_max;
        available -= share;
        remaining_max -= col.max_width;
        col.computed_width += share;
      }
    }
  }

  // Then to percent columns, weighted by their percentages.
  if available > 0.0 && total_percent > 0.0 && total_percent < 100.0 {
    let mut remaining_pct = total_percent;
    for col in columns.iter_mut() {
      if let SpecifiedWidth::Percent(p) = col.width {
        if remaining_pct <= 0.0 {
          break;
        }
        let share = available * p / remaining_pct;
        available -= share;
        remaining_pct -= p;
        col.computed_width += share;
      }
    }
  }

  // Final even spread over everything except content-free auto columns.
  let spread_targets = columns.len() - num_auto_empty;
  if available > 0.0 && spread_targets > 0 {
    let mut remaining_targets = spread_targets;
    for col in columns.iter_mut().rev() {
      if col.width.is_auto() && col.empty_cells_only {
        continue;
      }
      let share = available / remaining_targets as f32;
      available -= share;
      remaining_targets -= 1;
      col.computed_width += share;
    }
  }

  // Over-constrained: reduce in reverse priority, bounded by minima.
  if available < 0.0 {
    let reduction_order = [
      |c: &ColumnConstraints| c.width.is_auto(),
      |c: &ColumnConstraints| c.width.is_relative(),
      |c: &ColumnConstraints| c.width.is_fixed(),
      |c: &ColumnConstraints| c.width.is_percent(),
    ];
    for accepts in reduction_order {
      if available >= 0.0 {
        break;
      }
      let mut slack: f32 = columns
        .iter()
        .filter(|c| accepts(c))
        .map(|c| c.computed_width - c.min_width)
        .sum();
      if slack <= 0.0 {
        continue;
      }
      for col in columns.iter_mut().rev() {
        if available >= 0.0 || !accepts(col) {
          continue;
        }
        let col_slack = col.computed_width - col.min_width;
        if col_slack <= 0.0 {
          continue;
        }
        let reduce = (available * col_slack / slack).max(-col_slack);
        col.computed_width += reduce;
        available -= reduce;
        slack -= col_slack;
      }
    }
  }
}

/// Total minimum/maximum content widths for the automatic strategy
/// (column sums; spacing added by the caller).
pub fn auto_layout_min_max(columns: &[ColumnConstraints]) -> (f32, f32) {
  let min = columns.iter().map(|c| c.min_width).sum();
  let max = columns
    .iter()
    .map(|c| match c.width {
      SpecifiedWidth::Fixed(w) => c.max_width.max(w),
      _ => c.max_width,
    })
    .sum::<f32>()
    .max(min);
  (min, max)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn auto_col(min: f32, max: f32) -> ColumnConstraints {
    ColumnConstraints {
      width: SpecifiedWidth::Auto,
      min_width: min,
      max_width: max,
      computed_width: 0.0,
      empty_cells_only: false,
    }
  }

  fn fixed_col(w: f32) -> ColumnConstraints {
    ColumnConstraints {
      width: SpecifiedWidth::Fixed(w),
      min_width: w,
      max_width: w,
      computed_width: 0.0,
      empty_cells_only: false,
    }
  }

  #[test]
  fn test_strategy_selection() {
    use crate::style::TableLayout;
    assert_eq!(select_strategy(TableLayout::Fixed, false), ColumnStrategy::Fixed);
    assert_eq!(select_strategy(TableLayout::Fixed, true), ColumnStrategy::Auto);
    assert_eq!(select_strategy(TableLayout::Auto, false), ColumnStrategy::Auto);
  }

  #[test]
  fn test_fixed_layout_splits_remainder_equally() {
    // Width 300, first column fixed 100, two auto columns.
    let mut columns = vec![
      fixed_col(100.0),
      ColumnConstraints::new(),
      ColumnConstraints::new(),
    ];
    fixed_layout_widths(&mut columns, 300.0);
    assert_eq!(columns[0].computed_width, 100.0);
    assert_eq!(columns[1].computed_width, 100.0);
    assert_eq!(columns[2].computed_width, 100.0);
  }

  #[test]
  fn test_fixed_layout_percent_column() {
    let mut columns = vec![
      ColumnConstraints {
        width: SpecifiedWidth::Percent(50.0),
        ..ColumnConstraints::new()
      },
      ColumnConstraints::new(),
    ];
    fixed_layout_widths(&mut columns, 400.0);
    assert_eq!(columns[0].computed_width, 200.0);
    assert_eq!(columns[1].computed_width, 200.0);
  }

  #[test]
  fn test_fixed_layout_all_declared_spreads_surplus() {
    let mut columns = vec![fixed_col(50.0), fixed_col(50.0)];
    fixed_layout_widths(&mut columns, 300.0);
    assert_eq!(columns[0].computed_width, 150.0);
    assert_eq!(columns[1].computed_width, 150.0);
  }

  #[test]
  fn test_auto_layout_minimum_never_undercut() {
    // The single cell's minimum of 50 survives any width.
    let mut columns = vec![auto_col(50.0, 120.0)];
    auto_layout_widths(&mut columns, 10.0);
    assert!(columns[0].computed_width >= 50.0);
  }

  #[test]
  fn test_auto_layout_grows_toward_max_proportionally() {
    let mut columns = vec![auto_col(10.0, 100.0), auto_col(10.0, 300.0)];
    auto_layout_widths(&mut columns, 400.0);
    let total: f32 = columns.iter().map(|c| c.computed_width).sum();
    assert!((total - 400.0).abs() < 0.1);
    // The wider-max column ends up with the larger share.
    assert!(columns[1].computed_width > columns[0].computed_width);
  }

  #[test]
  fn test_auto_layout_percent_before_auto() {
    let mut columns = vec![
      ColumnConstraints {
        width: SpecifiedWidth::Percent(25.0),
        min_width: 10.0,
        max_width: 40.0,
        computed_width: 0.0,
        empty_cells_only: false,
      },
      auto_col(10.0, 100.0),
    ];
    auto_layout_widths(&mut columns, 400.0);
    assert!((columns[0].computed_width - 100.0).abs() < 0.5);
  }

  #[test]
  fn test_auto_layout_relative_shares() {
    // Supplement scenario: 1* and 2* columns split 300 as 100/200.
    let mut columns = vec![
      ColumnConstraints {
        width: SpecifiedWidth::Relative(1.0),
        ..ColumnConstraints::new()
      },
      ColumnConstraints {
        width: SpecifiedWidth::Relative(2.0),
        ..ColumnConstraints::new()
      },
    ];
    for c in columns.iter_mut() {
      c.empty_cells_only = false;
    }
    auto_layout_widths(&mut columns, 300.0);
    assert!((columns[0].computed_width - 100.0).abs() < 0.5);
    assert!((columns[1].computed_width - 200.0).abs() < 0.5);
  }

  #[test]
  fn test_auto_layout_reduction_hits_auto_before_fixed() {
    let mut columns = vec![
      ColumnConstraints {
        width: SpecifiedWidth::Fixed(100.0),
        min_width: 40.0,
        max_width: 100.0,
        computed_width: 0.0,
        empty_cells_only: false,
      },
      auto_col(40.0, 200.0),
    ];
    // Only 160 available: both reach past their minima, the auto column
    // gives way first.
    auto_layout_widths(&mut columns, 160.0);
    let total: f32 = columns.iter().map(|c| c.computed_width).sum();
    assert!((total - 160.0).abs() < 0.5);
    assert!((columns[0].computed_width - 100.0).abs() < 0.5);
    assert!((columns[1].computed_width - 60.0).abs() < 0.5);
  }

  #[test]
  fn test_empty_auto_columns_excluded_from_final_spread() {
    let mut columns = vec![
      auto_col(50.0, 50.0),
      ColumnConstraints {
        width: SpecifiedWidth::Auto,
        min_width: 0.0,
        max_width: 0.0,
        computed_width: 0.0,
        empty_cells_only: true,
      },
    ];
    auto_layout_widths(&mut columns, 200.0);
    assert_eq!(columns[1].computed_width, 0.0);
    assert!((columns[0].computed_width - 200.0).abs() < 0.5);
  }

  #[test]
  fn test_spanning_cell_distributes_minimum() {
    let mut columns = vec![auto_col(20.0, 40.0), auto_col(30.0, 60.0)];
    distribute_spanning_cell(&mut columns, 100.0, 120.0, SpecifiedWidth::Auto);
    let min_total: f32 = columns.iter().map(|c| c.min_width).sum();
    assert!((min_total - 100.0).abs() < 0.1);
    // Proportional to maxima: the 60-max column took more.
    assert!(columns[1].min_width > columns[0].min_width);
  }

  #[test]
  fn test_spanning_cell_fixed_columns_absorb_last() {
    let mut columns = vec![fixed_col(30.0), auto_col(10.0, 50.0)];
    distribute_spanning_cell(&mut columns, 100.0, 100.0, SpecifiedWidth::Auto);
    // The auto column takes the whole growth; the fixed column is
    // untouched.
    assert_eq!(columns[0].min_width, 30.0);
    assert!((columns[1].min_width - 70.0).abs() < 0.1);
  }

  #[test]
  fn test_spanning_cell_percent_spreads_to_non_percent_columns() {
    let mut columns = vec![
      ColumnConstraints {
        width: SpecifiedWidth::Percent(20.0),
        min_width: 10.0,
        max_width: 20.0,
        computed_width: 0.0,
        empty_cells_only: false,
      },
      auto_col(10.0, 30.0),
    ];
    distribute_spanning_cell(&mut columns, 20.0, 50.0, SpecifiedWidth::Percent(60.0));
    // The auto column received the remaining 40 percent.
    assert!(matches!(columns[1].width, SpecifiedWidth::Percent(p) if (p - 40.0).abs() < 0.1));
  }

  #[test]
  fn test_normalize_percentages() {
    let mut columns = vec![
      ColumnConstraints {
        width: SpecifiedWidth::Percent(80.0),
        ..ColumnConstraints::new()
      },
      ColumnConstraints {
        width: SpecifiedWidth::Percent(120.0),
        ..ColumnConstraints::new()
      },
    ];
    normalize_percentages(&mut columns);
    let total: f32 = columns
      .iter()
      .filter_map(|c| match c.width {
        SpecifiedWidth::Percent(p) => Some(p),
        _ => None,
      })
      .sum();
    assert!((total - 100.0).abs() < 0.01);
  }

  #[test]
  fn test_min_max_totals() {
    let columns = vec![auto_col(10.0, 50.0), fixed_col(30.0)];
    let (min, max) = auto_layout_min_max(&columns);
    assert_eq!(min, 40.0);
    assert_eq!(max, 80.0);
  }
}
