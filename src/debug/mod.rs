//! Debug utilities

pub mod inspect;

pub use inspect::{geometry_snapshot, GeometrySnapshot};
