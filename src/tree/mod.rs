//! The box tree and its structural operations
//!
//! - `box_tree`: the arena, box variants, and per-box geometry
//! - `container`: child insertion/removal with anonymous-box maintenance

pub mod box_tree;
pub mod container;

pub use box_tree::{
  BlockBox, BoxId, BoxKind, BoxNode, BoxTree, CollapsedBorderGrid, CollapsedMargins,
  EffectiveColumn, Geometry, GridRow, GridSlot, InlineContent, LineBox, SectionKind, TableBox,
  TableCellBox, TableColumnBox, TableSectionBox,
};
