//! Turns keypoint tables of ground truth and model predictions into per-frame
//! annotation records for visual comparison of pose-tracking models.

mod common;

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod image;
pub mod keypoint;
pub mod metadata;
pub mod tags;
pub mod utils;
pub mod video;

pub use aggregate::*;
pub use config::Config;
pub use dataset::*;
pub use error::{Error, Result};
pub use image::*;
pub use keypoint::*;
pub use metadata::*;
pub use tags::*;
pub use video::*;
