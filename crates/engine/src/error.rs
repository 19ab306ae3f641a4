//! Error kinds surfaced by the engine.
//!
//! Every error is fatal to the region that caused it and names that region so
//! callers can point users at the offending object. Routing trouble that
//! still made partial progress is not an error: the engine logs a warning and
//! returns the stitches accumulated so far.

/// Engine-level failure, always tied to one region.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Polygon construction failed, a rail self-intersects, or satin rail
    /// counts do not match.
    #[error("region '{region}': invalid geometry: {reason}")]
    InvalidGeometry { region: String, reason: String },

    /// The auto-fill graph did not come out with even degree everywhere,
    /// which means the grating intersected the region degenerately.
    #[error("region '{region}': auto-fill graph is not eulerian")]
    NonEulerianGraph { region: String },

    /// Routing could not find any loop from any candidate node, even after
    /// repeatedly doubling the search queue cap.
    #[error("region '{region}': stitch routing exhausted its search budget")]
    BfsExhausted { region: String },

    /// Non-positive row spacing, zig-zag spacing or stitch length.
    #[error("region '{region}': degenerate parameters: {reason}")]
    DegenerateParameters { region: String, reason: String },

    /// SVG path data could not be parsed.
    #[error("invalid path data: {0}")]
    InvalidPathData(String),
}
