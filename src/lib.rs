//! boxflow - a block and table box-layout engine
//!
//! Given a tree of boxes annotated with resolved style values, this crate
//! computes each box's final size and position: CSS-style box-model
//! arithmetic with margin collapsing, float placement and clearance,
//! anonymous box synthesis, multi-pass table column-width resolution,
//! row-height distribution, and optional page-break fragmentation.
//!
//! Out of scope (external collaborators): style resolution, document-tree
//! construction from markup, inline text shaping (consumed as opaque line
//! boxes), painting, and resource loading.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use boxflow::geometry::Size;
//! use boxflow::layout::{LayoutConfig, LayoutEngine};
//! use boxflow::style::{ComputedStyle, Length};
//! use boxflow::tree::BoxTree;
//!
//! let mut tree = BoxTree::new(Arc::new(ComputedStyle::default()));
//! let child = tree.create_box(Arc::new(ComputedStyle {
//!   height: Some(Length::px(50.0)),
//!   ..Default::default()
//! }));
//! let root = tree.root();
//! tree.add_child(root, child, None).unwrap();
//!
//! let engine = LayoutEngine::new(LayoutConfig::new(Size::new(800.0, 600.0)));
//! engine.layout(&mut tree).unwrap();
//!
//! assert_eq!(tree.get(child).geometry.width, 800.0);
//! assert_eq!(tree.get(child).geometry.height, 50.0);
//! ```

pub mod debug;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod style;
pub mod tree;

pub use error::{Error, Result};
pub use geometry::{EdgeSizes, Point, Rect, Size};
pub use layout::{LayoutConfig, LayoutEngine, PageOptions};
pub use style::{ComputedStyle, Length, LengthUnit};
pub use tree::{BoxId, BoxTree, InlineContent, LineBox};
