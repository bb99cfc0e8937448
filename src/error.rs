//! Error types for the layout engine
//!
//! Recoverable layout conditions (inconsistent spans, negative available
//! widths, zero divisors) degrade to defaults inside the algorithms and are
//! never surfaced; see the error-handling notes in the module docs of the
//! individual algorithms. The types here cover the public entry points where
//! a caller contract can actually be violated.
//!
//! All errors use the `thiserror` crate for minimal boilerplate and proper
//! error trait implementations.

use thiserror::Error;

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
  /// Layout error
  #[error("Layout error: {0}")]
  Layout(#[from] LayoutError),

  /// Box tree structure error
  #[error("Tree error: {0}")]
  Tree(#[from] TreeError),
}

/// Errors raised by the layout entry points.
///
/// These indicate a violated caller contract, not a recoverable layout
/// condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
  /// The constraints handed to layout are unusable
  #[error("Invalid layout constraints: {message}")]
  InvalidConstraints { message: String },

  /// A percentage had no containing-block base to resolve against
  #[error("Cannot resolve percentage: {property} has no containing block")]
  PercentageResolutionFailed { property: String },

  /// Intrinsic width was requested for a box that cannot provide one
  #[error("Cannot calculate intrinsic size: {reason}")]
  IntrinsicSizeFailed { reason: String },
}

/// Errors raised by box tree mutations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
  /// A stale or foreign handle was passed to a tree operation
  #[error("Invalid box handle {index}")]
  InvalidHandle { index: usize },

  /// The reference child of an insertion is not a child of the container
  #[error("Insertion reference box {index} is not a child of the container")]
  NotAChild { index: usize },
}
