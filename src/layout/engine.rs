//! Layout entry points
//!
//! [`LayoutEngine`] drives one full pass over a box tree: the root box is
//! laid out against the viewport, which recursively lays out everything in
//! flow, then floats, then deferred positioned boxes. Passes are idempotent
//! for an unchanged tree; callers rerun from the root after mutating it.

use crate::error::{LayoutError, Result};
use crate::geometry::Size;
use crate::layout::constraints::LayoutConstraints;
use crate::layout::float_context::FloatContext;
use crate::layout::fragmentation::PageState;
use crate::layout::{layout_box, LayoutContext, Placement};
use crate::tree::BoxTree;
use log::debug;

/// Pagination options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageOptions {
  /// Block size of one page
  pub page_height: f32,
  /// Document y where the first page starts
  pub top_offset: f32,
}

impl PageOptions {
  pub fn new(page_height: f32) -> Self {
    Self {
      page_height,
      top_offset: 0.0,
    }
  }
}

/// Configuration for a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
  /// Initial containing block size (the viewport)
  pub viewport: Size,
  /// Quirks-mode document: default margins carry the quirk side channel
  pub quirks_mode: bool,
  /// Paginated output, when requested
  pub pagination: Option<PageOptions>,
}

impl LayoutConfig {
  pub fn new(viewport: Size) -> Self {
    Self {
      viewport,
      quirks_mode: false,
      pagination: None,
    }
  }

  pub fn with_quirks_mode(mut self, quirks: bool) -> Self {
    self.quirks_mode = quirks;
    self
  }

  pub fn paginated(mut self, options: PageOptions) -> Self {
    self.pagination = Some(options);
    self
  }
}

/// Drives layout passes over box trees.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
  config: LayoutConfig,
}

impl LayoutEngine {
  pub fn new(config: LayoutConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &LayoutConfig {
    &self.config
  }

  /// Runs one layout pass from the root.
  ///
  /// # Errors
  ///
  /// Only caller contract violations surface: a non-finite or negative
  /// viewport. Everything recoverable degrades to defaults inside the
  /// algorithms.
  pub fn layout(&self, tree: &mut BoxTree) -> Result<()> {
    let viewport = self.config.viewport;
    if !viewport.width.is_finite() || !viewport.height.is_finite() || viewport.width < 0.0 {
      return Err(
        LayoutError::InvalidConstraints {
          message: format!("viewport {}x{} is unusable", viewport.width, viewport.height),
        }
        .into(),
      );
    }

    debug!(
      "layout pass: viewport {}x{}, quirks={}, paginated={}",
      viewport.width,
      viewport.height,
      self.config.quirks_mode,
      self.config.pagination.is_some()
    );

    let mut ctx = LayoutContext {
      config: &self.config,
      floats: FloatContext::new(viewport.width),
      page: self
        .config
        .pagination
        .map(|p| PageState::new(p.page_height, p.top_offset)),
    };

    let root = tree.root();
    let constraints = LayoutConstraints::definite(viewport.width, viewport.height);
    layout_box(tree, root, constraints, &mut ctx, Placement::root());
    Ok(())
  }
}
