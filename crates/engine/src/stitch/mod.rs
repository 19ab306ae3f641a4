//! Stitch generation engines.
//!
//! Contains manual fill (grating + sections + stagger), auto-fill (eulerian
//! routing of the grating into one continuous path), satin columns (two-rail
//! zig-zag with underlays) and strokes (running stitch or centerline
//! zig-zag).

pub mod auto_fill;
pub mod fill;
pub mod satin;
pub mod stroke;
