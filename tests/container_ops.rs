//! Container operation round trips through the public API, including the
//! anonymous-block invariant and relayout after mutations.

use boxflow::debug::geometry_snapshot;
use boxflow::geometry::Size;
use boxflow::layout::{LayoutConfig, LayoutEngine};
use boxflow::style::{ComputedStyle, Display, Length};
use boxflow::tree::BoxTree;
use std::sync::Arc;

fn engine() -> LayoutEngine {
  LayoutEngine::new(LayoutConfig::new(Size::new(800.0, 600.0)))
}

fn inline_style() -> Arc<ComputedStyle> {
  Arc::new(ComputedStyle {
    display: Display::Inline,
    ..Default::default()
  })
}

#[test]
fn anonymous_block_invariant_round_trip() {
  // Inserting a block into an inline-only container wraps the runs; removing
  // it merges them back and restores the inline flag.
  let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
  let root = tree.root();
  let a = tree.create_box(inline_style());
  let b = tree.create_box(inline_style());
  tree.add_child(root, a, None).unwrap();
  tree.add_child(root, b, None).unwrap();
  assert!(tree.get(root).as_block().unwrap().children_inline);

  let block = tree.create_box(Arc::new(ComputedStyle {
    height: Some(Length::px(10.0)),
    ..Default::default()
  }));
  tree.add_child(root, block, Some(b)).unwrap();

  // [anon(a), block, anon(b)] - two wrappers because the insertion split
  // the run in the middle.
  assert!(!tree.get(root).as_block().unwrap().children_inline);
  let children = tree.get(root).children.clone();
  assert_eq!(children.len(), 3);
  assert!(tree.get(children[0]).is_anonymous);
  assert!(tree.get(children[2]).is_anonymous);

  let removed = tree.remove_child(root, block).unwrap();
  tree.destroy_subtree(removed);

  // Wrappers merged and collapsed away.
  assert!(tree.get(root).as_block().unwrap().children_inline);
  assert_eq!(tree.get(root).children, vec![a, b]);
}

#[test]
fn mutation_marks_dirty_and_relayout_converges() {
  let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
  let root = tree.root();
  let a = tree.create_box(Arc::new(ComputedStyle {
    height: Some(Length::px(40.0)),
    ..Default::default()
  }));
  tree.add_child(root, a, None).unwrap();

  let engine = engine();
  engine.layout(&mut tree).unwrap();
  assert_eq!(tree.get(root).geometry.height, 40.0);
  assert!(!tree.get(root).needs_layout);

  let b = tree.create_box(Arc::new(ComputedStyle {
    height: Some(Length::px(25.0)),
    ..Default::default()
  }));
  tree.add_child(root, b, None).unwrap();
  assert!(tree.get(root).needs_layout);

  engine.layout(&mut tree).unwrap();
  assert_eq!(tree.get(root).geometry.height, 65.0);
}

#[test]
fn insert_remove_insert_is_stable() {
  // Geometry after add + remove + add matches a tree built directly.
  let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
  let root = tree.root();
  let keep = tree.create_box(Arc::new(ComputedStyle {
    height: Some(Length::px(30.0)),
    ..Default::default()
  }));
  tree.add_child(root, keep, None).unwrap();
  let churn = tree.create_box(Arc::new(ComputedStyle {
    height: Some(Length::px(99.0)),
    ..Default::default()
  }));
  tree.add_child(root, churn, Some(keep)).unwrap();
  let removed = tree.remove_child(root, churn).unwrap();
  tree.destroy_subtree(removed);

  let engine = engine();
  engine.layout(&mut tree).unwrap();
  let mutated = serde_json::to_string(&geometry_snapshot(&tree, root)).unwrap();

  let mut fresh = BoxTree::new(Arc::new(ComputedStyle::default()));
  let fresh_root = fresh.root();
  let fresh_keep = fresh.create_box(Arc::new(ComputedStyle {
    height: Some(Length::px(30.0)),
    ..Default::default()
  }));
  fresh.add_child(fresh_root, fresh_keep, None).unwrap();
  engine.layout(&mut fresh).unwrap();
  let reference = serde_json::to_string(&geometry_snapshot(&fresh, fresh_root)).unwrap();

  assert_eq!(mutated, reference);
}

#[test]
fn table_mutation_dirties_column_model() {
  let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
  let root = tree.root();
  let table = tree.create_box(Arc::new(ComputedStyle {
    display: Display::Table,
    width: Some(Length::px(200.0)),
    ..Default::default()
  }));
  tree.add_child(root, table, None).unwrap();
  let cell = tree.create_box(Arc::new(ComputedStyle {
    display: Display::TableCell,
    ..Default::default()
  }));
  tree.add_child(table, cell, None).unwrap();

  let engine = engine();
  engine.layout(&mut tree).unwrap();
  assert_eq!(tree.get(table).as_table().unwrap().column_positions.len(), 2);

  // Adding a second cell grows the model to two columns on the next pass.
  let section = tree.get(table).children[0];
  let row = tree.get(section).children[0];
  let second = tree.create_box(Arc::new(ComputedStyle {
    display: Display::TableCell,
    ..Default::default()
  }));
  tree.add_child(row, second, None).unwrap();
  assert!(tree.get(table).as_table().unwrap().structure_dirty);

  engine.layout(&mut tree).unwrap();
  assert_eq!(tree.get(table).as_table().unwrap().column_positions.len(), 3);
}
