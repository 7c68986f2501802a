//! Reader for two-level keypoint tables exported by pose-estimation tools.
//!
//! The table layout follows the DeepLabCut convention: an outer header row of
//! keypoint names, an inner header row of coordinate fields, a leading row-label
//! column and an optional trailing split-tag column.

mod common;

pub mod schema;
pub use schema::*;

pub mod table;
pub use table::*;
