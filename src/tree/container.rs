//! Container operations
//!
//! Child insertion and removal with the structural invariants the layout
//! engines rely on:
//!
//! - a block container holds either exclusively inline-level content or
//!   exclusively block-level boxes; mixed content is partitioned by wrapping
//!   inline runs (maximal contiguous sequences of inline, floating and
//!   positioned siblings) in anonymous block boxes
//! - table structure is complete: cells sit in rows, rows in sections,
//!   sections in tables; a child of the wrong granularity gets a synthetic
//!   anonymous intermediate, and table-internal boxes dropped into a block
//!   container get an anonymous table
//! - removal re-merges anonymous siblings that the removed box had split
//!   apart, absorbs a lone anonymous child back into its parent, and destroys
//!   wrappers whose last structural child went away
//!
//! All of these are expected, non-error outcomes. Errors are reserved for
//! stale handles and insertion references that are not children of the
//! container.

use crate::error::TreeError;
use crate::style::{BorderCollapse, ComputedStyle, Display};
use crate::tree::box_tree::{BlockBox, BoxId, BoxKind, BoxTree, TableBox, TableCellBox, TableSectionBox};
use crate::tree::box_tree::SectionKind;
use std::sync::Arc;

/// What a container expects structurally from a direct child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
  /// Flow content of a block container
  Flow,
  /// Direct table child (caption, column, column group, section)
  TableLevel,
  /// Row inside a section
  Row,
  /// Cell inside a row
  Cell,
}

impl BoxTree {
  /// Inserts `child` immediately before `before` (or at the end).
  ///
  /// The child must be detached. Structural mismatches are resolved by
  /// synthesizing anonymous intermediates, never reported as errors; the
  /// only failures are stale handles and a `before` box that is not a child
  /// of `parent`.
  pub fn add_child(
    &mut self,
    parent: BoxId,
    child: BoxId,
    before: Option<BoxId>,
  ) -> Result<(), TreeError> {
    if !self.contains(parent) {
      return Err(TreeError::InvalidHandle {
        index: parent.index(),
      });
    }
    if !self.contains(child) {
      return Err(TreeError::InvalidHandle {
        index: child.index(),
      });
    }
    debug_assert!(
      self.get(child).parent.is_none(),
      "add_child requires a detached child"
    );
    if let Some(b) = before {
      if !self.get(parent).children.contains(&b) {
        return Err(TreeError::NotAChild { index: b.index() });
      }
    }

    match self.expected_slot(parent) {
      Slot::Flow => self.add_flow_child(parent, child, before),
      Slot::TableLevel => self.add_table_child(parent, child, before),
      Slot::Row => self.add_section_child(parent, child, before),
      Slot::Cell => self.add_row_child(parent, child, before),
    }

    self.mark_needs_layout(parent);
    if let Some(table) = self.owning_table(parent) {
      self.mark_needs_layout(table);
    }
    Ok(())
  }

  /// Detaches `child` from `parent` and returns it to the caller.
  ///
  /// Side effects: the containing block's layout state is dirtied, attached
  /// line-box content on the detached subtree is dropped, anonymous block
  /// siblings split by the removed box are re-merged, a lone remaining
  /// anonymous block child is absorbed into the parent, and anonymous
  /// wrappers left childless are destroyed (cascading upward).
  pub fn remove_child(&mut self, parent: BoxId, child: BoxId) -> Result<BoxId, TreeError> {
    if !self.contains(parent) {
      return Err(TreeError::InvalidHandle {
        index: parent.index(),
      });
    }
    let position = self
      .get(parent)
      .children
      .iter()
      .position(|&c| c == child)
      .ok_or(TreeError::NotAChild {
        index: child.index(),
      })?;

    self.get_mut(parent).children.remove(position);
    self.get_mut(child).parent = None;

    // Line boxes measured for the old position are meaningless now.
    for id in self.descendants(child) {
      self.clear_inline_content(id);
    }

    self.mark_needs_layout(parent);
    if let Some(table) = self.owning_table(parent) {
      self.mark_needs_layout(table);
    }

    self.cleanup_after_removal(parent, position);
    Ok(child)
  }

  /// Destroys a detached subtree, releasing every arena slot it holds.
  pub fn destroy_subtree(&mut self, id: BoxId) {
    debug_assert!(self.get(id).parent.is_none(), "subtree root must be detached");
    let all = self.descendants(id);
    for &b in all.iter().rev() {
      let node = self.get_mut(b);
      node.children.clear();
      node.parent = None;
      self.destroy(b);
    }
  }

  fn expected_slot(&self, parent: BoxId) -> Slot {
    match &self.get(parent).kind {
      BoxKind::Table(_) => Slot::TableLevel,
      BoxKind::TableSection(_) => Slot::Row,
      BoxKind::TableRow => Slot::Cell,
      _ => Slot::Flow,
    }
  }

  fn owning_table(&self, id: BoxId) -> Option<BoxId> {
    if self.get(id).kind.is_table() {
      return Some(id);
    }
    self.containing_table(id)
  }

  fn insert_at(&mut self, parent: BoxId, child: BoxId, before: Option<BoxId>) {
    let position = match before {
      Some(b) => self
        .get(parent)
        .children
        .iter()
        .position(|&c| c == b)
        .unwrap_or(self.get(parent).children.len()),
      None => self.get(parent).children.len(),
    };
    self.get_mut(parent).children.insert(position, child);
    self.get_mut(child).parent = Some(parent);
  }

  // ---------------------------------------------------------------------
  // Block containers
  // ---------------------------------------------------------------------

  fn add_flow_child(&mut self, parent: BoxId, child: BoxId, before: Option<BoxId>) {
    let child_node = self.get(child);

    // Table-internal content inside a block container gets an anonymous
    // table built around it.
    if child_node.style.display.is_table_internal() {
      let table = self.reuse_or_create_anonymous_table(parent, before);
      self.add_table_child(table, child, None);
      return;
    }

    let inline_participant = self.is_inline_run_participant(child);
    let children_inline = self
      .get(parent)
      .as_block()
      .map(|b| b.children_inline)
      .unwrap_or(false);
    let has_children = !self.get(parent).children.is_empty();

    if children_inline || !has_children {
      if !has_children {
        // First child decides the container's mode.
        self.insert_at(parent, child, before);
        if let Some(b) = self.get_mut(parent).as_block_mut() {
          b.children_inline = inline_participant;
        }
        return;
      }
      if inline_participant {
        self.insert_at(parent, child, before);
        return;
      }
      // Block-level child entering an inline-only container: wrap the
      // existing inline children, partitioned at the insertion point. The
      // new child lands between the two wrappers.
      let split = self.wrap_inline_children(parent, before);
      self.get_mut(parent).children.insert(split, child);
      self.get_mut(child).parent = Some(parent);
      if let Some(b) = self.get_mut(parent).as_block_mut() {
        b.children_inline = false;
        b.inline_content = None;
      }
      return;
    }

    // Block-mode container.
    if inline_participant {
      let wrapper = self.reuse_or_create_anonymous_block(parent, before);
      self.insert_at(wrapper, child, None);
      if let Some(b) = self.get_mut(wrapper).as_block_mut() {
        b.children_inline = true;
      }
    } else {
      self.insert_at(parent, child, before);
    }
  }

  /// Inline runs also swallow floats and positioned boxes, which travel with
  /// the inline content they sit between.
  fn is_inline_run_participant(&self, child: BoxId) -> bool {
    let node = self.get(child);
    node.is_inline_level() || node.style.is_floating() || node.style.is_out_of_flow_positioned()
  }

  /// Wraps the container's current (all-inline) children into one or two
  /// anonymous blocks, split at `before`. Returns the child index between
  /// the wrappers, where the block-level newcomer belongs.
  fn wrap_inline_children(&mut self, parent: BoxId, before: Option<BoxId>) -> usize {
    let children = self.get(parent).children.clone();
    if children.is_empty() {
      return 0;
    }
    let split = match before {
      Some(b) => children.iter().position(|&c| c == b).unwrap_or(children.len()),
      None => children.len(),
    };

    let (head, tail) = children.split_at(split);
    let head: Vec<BoxId> = head.to_vec();
    let tail: Vec<BoxId> = tail.to_vec();

    self.get_mut(parent).children.clear();

    let parent_style = self.get(parent).style.clone();
    let mut new_children = Vec::new();
    for run in [head, tail] {
      if run.is_empty() {
        continue;
      }
      let wrapper = self.create_anonymous(
        anonymous_block_style(&parent_style),
        BoxKind::Block(BlockBox {
          children_inline: true,
          inline_content: None,
        }),
      );
      for &c in &run {
        self.get_mut(c).parent = Some(wrapper);
      }
      self.get_mut(wrapper).children = run;
      new_children.push(wrapper);
    }
    for &w in &new_children {
      self.get_mut(w).parent = Some(parent);
    }
    let head_wrappers = if split > 0 { 1 } else { 0 };
    self.get_mut(parent).children = new_children;
    head_wrappers
  }

  /// Finds the anonymous block adjacent to the insertion point, or creates
  /// one there.
  fn reuse_or_create_anonymous_block(&mut self, parent: BoxId, before: Option<BoxId>) -> BoxId {
    let children = &self.get(parent).children;
    let position = match before {
      Some(b) => children.iter().position(|&c| c == b).unwrap_or(children.len()),
      None => children.len(),
    };

    // Prefer the sibling just before the insertion point, then the
    // insertion reference itself.
    if position > 0 {
      let prev = self.get(parent).children[position - 1];
      if self.is_reusable_anonymous_block(prev) {
        return prev;
      }
    }
    if let Some(b) = before {
      if self.is_reusable_anonymous_block(b) {
        return b;
      }
    }

    let parent_style = self.get(parent).style.clone();
    let wrapper = self.create_anonymous(
      anonymous_block_style(&parent_style),
      BoxKind::Block(BlockBox {
        children_inline: true,
        inline_content: None,
      }),
    );
    self.insert_at(parent, wrapper, before);
    wrapper
  }

  fn is_reusable_anonymous_block(&self, id: BoxId) -> bool {
    let node = self.get(id);
    node.is_anonymous
      && matches!(node.kind, BoxKind::Block(_))
      && node.as_block().map(|b| b.children_inline).unwrap_or(false)
  }

  // ---------------------------------------------------------------------
  // Table structure
  // ---------------------------------------------------------------------

  fn add_table_child(&mut self, table: BoxId, child: BoxId, before: Option<BoxId>) {
    let display = self.get(child).style.display;
    match display {
      Display::TableCaption
      | Display::TableColumn
      | Display::TableColumnGroup
      | Display::TableRowGroup
      | Display::TableHeaderGroup
      | Display::TableFooterGroup => {
        self.insert_at(table, child, before);
      }
      Display::TableRow => {
        let section = self.reuse_or_create_anonymous_section(table, before);
        self.insert_at(section, child, None);
      }
      _ => {
        // Cell or arbitrary content: route through section and row.
        let section = self.reuse_or_create_anonymous_section(table, before);
        self.add_section_child(section, child, None);
      }
    }
    if let BoxKind::Table(t) = &mut self.get_mut(table).kind {
      t.structure_dirty = true;
    }
  }

  fn add_section_child(&mut self, section: BoxId, child: BoxId, before: Option<BoxId>) {
    let display = self.get(child).style.display;
    if display == Display::TableRow {
      self.insert_at(section, child, before);
      return;
    }
    let row = self.reuse_or_create_anonymous_row(section, before);
    self.add_row_child(row, child, None);
  }

  fn add_row_child(&mut self, row: BoxId, child: BoxId, before: Option<BoxId>) {
    let display = self.get(child).style.display;
    if display == Display::TableCell {
      self.insert_at(row, child, before);
      return;
    }
    let cell = self.reuse_or_create_anonymous_cell(row, before);
    // The cell interior is ordinary flow content.
    self.add_flow_child(cell, child, None);
  }

  fn reuse_or_create_anonymous_table(&mut self, parent: BoxId, before: Option<BoxId>) -> BoxId {
    let children = &self.get(parent).children;
    let position = match before {
      Some(b) => children.iter().position(|&c| c == b).unwrap_or(children.len()),
      None => children.len(),
    };
    if position > 0 {
      let prev = self.get(parent).children[position - 1];
      let node = self.get(prev);
      if node.is_anonymous && node.kind.is_table() {
        return prev;
      }
    }

    let parent_style = self.get(parent).style.clone();
    let table = self.create_anonymous(
      anonymous_table_style(&parent_style),
      BoxKind::Table(TableBox::default()),
    );
    // The anonymous table is block-level flow content of the parent.
    self.add_flow_child(parent, table, before);
    table
  }

  fn reuse_or_create_anonymous_section(&mut self, table: BoxId, before: Option<BoxId>) -> BoxId {
    let children = &self.get(table).children;
    let position = match before {
      Some(b) => children.iter().position(|&c| c == b).unwrap_or(children.len()),
      None => children.len(),
    };
    if position > 0 {
      let prev = self.get(table).children[position - 1];
      let node = self.get(prev);
      if node.is_anonymous && matches!(node.kind, BoxKind::TableSection(_)) {
        return prev;
      }
    }

    let table_style = self.get(table).style.clone();
    let section = self.create_anonymous(
      anonymous_internal_style(&table_style, Display::TableRowGroup),
      BoxKind::TableSection(TableSectionBox::new(SectionKind::Body)),
    );
    self.insert_at(table, section, before);
    section
  }

  fn reuse_or_create_anonymous_row(&mut self, section: BoxId, before: Option<BoxId>) -> BoxId {
    let children = &self.get(section).children;
    let position = match before {
      Some(b) => children.iter().position(|&c| c == b).unwrap_or(children.len()),
      None => children.len(),
    };
    if position > 0 {
      let prev = self.get(section).children[position - 1];
      let node = self.get(prev);
      if node.is_anonymous && matches!(node.kind, BoxKind::TableRow) {
        return prev;
      }
    }

    let section_style = self.get(section).style.clone();
    let row = self.create_anonymous(
      anonymous_internal_style(&section_style, Display::TableRow),
      BoxKind::TableRow,
    );
    self.insert_at(section, row, before);
    row
  }

  fn reuse_or_create_anonymous_cell(&mut self, row: BoxId, before: Option<BoxId>) -> BoxId {
    let children = &self.get(row).children;
    let position = match before {
      Some(b) => children.iter().position(|&c| c == b).unwrap_or(children.len()),
      None => children.len(),
    };
    if position > 0 {
      let prev = self.get(row).children[position - 1];
      let node = self.get(prev);
      if node.is_anonymous && node.kind.is_table_cell() {
        return prev;
      }
    }

    let row_style = self.get(row).style.clone();
    let cell = self.create_anonymous(
      anonymous_internal_style(&row_style, Display::TableCell),
      BoxKind::TableCell(TableCellBox::new(1, 1)),
    );
    self.insert_at(row, cell, before);
    cell
  }

  // ---------------------------------------------------------------------
  // Removal cleanup
  // ---------------------------------------------------------------------

  fn cleanup_after_removal(&mut self, parent: BoxId, position: usize) {
    // A wrapper whose last structural child disappeared goes away with it.
    let parent_node = self.get(parent);
    if parent_node.is_anonymous && parent_node.children.is_empty() {
      if let Some(grandparent) = parent_node.parent {
        let own_position = self
          .get(grandparent)
          .children
          .iter()
          .position(|&c| c == parent)
          .unwrap_or(0);
        self.get_mut(grandparent).children.retain(|&c| c != parent);
        self.get_mut(parent).parent = None;
        self.destroy(parent);
        self.cleanup_after_removal(grandparent, own_position);
      }
      return;
    }

    if !self.get(parent).is_block_container() {
      return;
    }

    // Merge anonymous blocks the removed box was keeping apart.
    let children = self.get(parent).children.clone();
    if position > 0 && position < children.len() {
      let prev = children[position - 1];
      let next = children[position];
      if self.is_reusable_anonymous_block(prev) && self.is_reusable_anonymous_block(next) {
        let moved = std::mem::take(&mut self.get_mut(next).children);
        for &c in &moved {
          self.get_mut(c).parent = Some(prev);
        }
        self.get_mut(prev).children.extend(moved);
        self.get_mut(parent).children.retain(|&c| c != next);
        self.get_mut(next).parent = None;
        self.destroy(next);
      }
    }

    // A single remaining anonymous block child collapses back into the
    // parent, restoring the pre-wrap shape.
    let children = self.get(parent).children.clone();
    if children.len() == 1 {
      let only = children[0];
      let only_node = self.get(only);
      if only_node.is_anonymous && matches!(only_node.kind, BoxKind::Block(_)) {
        let inner_inline = only_node.as_block().map(|b| b.children_inline).unwrap_or(true);
        let moved = std::mem::take(&mut self.get_mut(only).children);
        for &c in &moved {
          self.get_mut(c).parent = Some(parent);
        }
        self.get_mut(parent).children = moved;
        self.get_mut(only).parent = None;
        self.destroy(only);
        if let Some(b) = self.get_mut(parent).as_block_mut() {
          b.children_inline = inner_inline;
        }
      }
    }

    // An emptied block container is vacuously inline again.
    if self.get(parent).children.is_empty() {
      if let Some(b) = self.get_mut(parent).as_block_mut() {
        b.children_inline = true;
      }
    }
  }
}

/// Style for an anonymous block wrapper: box properties at their defaults,
/// inheritable bits that affect layout carried over from the parent.
fn anonymous_block_style(parent: &Arc<ComputedStyle>) -> Arc<ComputedStyle> {
  Arc::new(ComputedStyle {
    display: Display::Block,
    direction: parent.direction,
    ..Default::default()
  })
}

/// Style for an anonymous table: inherits the bits the table model reads.
fn anonymous_table_style(parent: &Arc<ComputedStyle>) -> Arc<ComputedStyle> {
  Arc::new(ComputedStyle {
    display: Display::Table,
    direction: parent.direction,
    border_collapse: BorderCollapse::Separate,
    ..Default::default()
  })
}

/// Style for anonymous table-internal boxes (section, row, cell).
fn anonymous_internal_style(parent: &Arc<ComputedStyle>, display: Display) -> Arc<ComputedStyle> {
  Arc::new(ComputedStyle {
    display,
    direction: parent.direction,
    ..Default::default()
  })
}
