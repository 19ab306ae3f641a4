//! Needlepoint Engine - geometry and routing core for machine embroidery.
//!
//! This crate converts vector regions (closed fills and open strokes built
//! from cubic bezier superpaths, plus satin columns) into an ordered stream
//! of needle penetration points:
//!
//! - Grating generation: intersecting a region with parallel stitch rows
//! - Section decomposition and serpentine row stitching with stagger
//! - Auto-fill: eulerian routing that covers a region in one continuous path
//! - Satin columns: matched-speed rail walking with pull compensation and
//!   underlay variants
//! - Stroke stitching and the document pipeline that threads regions
//!   together into the final stitch stream
//!
//! Document parsing, style extraction and wire-format encoding live outside
//! the engine; it consumes [`pipeline::Region`] descriptors and produces
//! [`Stitch`] values.

pub mod error;
pub mod geometry;
pub mod params;
pub mod patch;
pub mod path;
pub mod pipeline;
pub mod stitch;
pub mod svg;
pub mod types;

pub use error::Error;
pub use patch::{Patch, patches_to_stitches};
pub use pipeline::{DocumentOptions, Region, stitch_document};
pub use types::{Color, Point, Stitch};

/// Returns the engine version string.
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
