//! Document pipeline: region descriptors in, stitch stream out.
//!
//! Each region is classified into engine passes (satin column, fill or
//! auto-fill, stroke), stitched into patches, and the patches are assembled
//! into the final stream. The only state threaded between regions is the
//! last stitch of the previous patch, which seeds the next region's starting
//! point so the thread does not wander.

use crate::Error;
use crate::geometry::Shape;
use crate::params::{DEFAULT_PIXELS_PER_MM, RegionOptions};
use crate::patch::{Patch, patches_to_stitches};
use crate::path::CubicSuperpath;
use crate::stitch::auto_fill::auto_fill_region;
use crate::stitch::fill::fill_region;
use crate::stitch::satin::SatinColumn;
use crate::stitch::stroke::stroke_region;
use crate::{Color, Point, Stitch};

/// Document-wide options.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    pub pixels_per_mm: f64,
    /// Jumps shorter than this are demoted to normal stitches.
    pub collapse_length_mm: f64,
    /// Bezier flattening tolerance in pixels.
    pub flatness: f64,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
            collapse_length_mm: 0.0,
            flatness: 0.1,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_stroke_width() -> f64 {
    1.0
}

/// One embroiderable object, in document order.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub name: String,
    /// The region's geometry as a cubic superpath.
    pub path: CubicSuperpath,
    /// Fill color; presence makes the region fillable.
    #[serde(default)]
    pub fill: Option<Color>,
    /// Stroke color; presence makes the region strokeable.
    #[serde(default)]
    pub stroke: Option<Color>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub dashed: bool,
    /// Treat the sub-paths as satin rails instead of fill/stroke geometry.
    #[serde(default)]
    pub satin_column: bool,
    /// Route the fill automatically (default) or section by section.
    #[serde(default = "default_true")]
    pub auto_fill: bool,
    /// Stitch the stroke before the fill.
    #[serde(default)]
    pub stroke_first: bool,
    #[serde(default)]
    pub options: RegionOptions,
}

/// The engine passes a region expands into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnginePass {
    AutoFill,
    Fill,
    Satin,
    Stroke,
}

/// The classification rule: a satin column is only a satin column; otherwise
/// a fill color selects auto-fill (or manual fill when disabled) and a
/// stroke color appends a stroke pass, optionally stitched first.
fn classify(region: &Region) -> Vec<EnginePass> {
    if region.satin_column {
        return vec![EnginePass::Satin];
    }

    let mut passes: Vec<EnginePass> = Vec::new();

    if region.fill.is_some() {
        passes.push(if region.auto_fill {
            EnginePass::AutoFill
        } else {
            EnginePass::Fill
        });
    }

    if region.stroke.is_some() {
        passes.push(EnginePass::Stroke);
    }

    if region.stroke_first {
        passes.reverse();
    }

    passes
}

/// Flatten the region's path into a polygon with holes.
fn build_shape(region: &Region, options: &DocumentOptions) -> Result<Shape, Error> {
    let rings = region.path.flatten(options.flatness);
    Shape::from_rings(&rings).map_err(|reason| Error::InvalidGeometry {
        region: region.name.clone(),
        reason,
    })
}

/// Stitch one region into patches.
///
/// `previous_stitch` is where the needle stopped after the previous region,
/// used to pick this region's starting point.
pub fn region_to_patches(
    region: &Region,
    previous_stitch: Option<Point>,
    options: &DocumentOptions,
) -> Result<Vec<Patch>, Error> {
    let degenerate = |reason: String| Error::DegenerateParameters {
        region: region.name.clone(),
        reason,
    };

    let mut patches: Vec<Patch> = Vec::new();

    for pass in classify(region) {
        let last = patches
            .iter()
            .rev()
            .find_map(Patch::last_stitch)
            .or(previous_stitch);

        match pass {
            EnginePass::AutoFill => {
                let color = region.fill.expect("classified as fill");
                let params = region
                    .options
                    .auto_fill_params(options.pixels_per_mm)
                    .map_err(degenerate)?;
                let shape = build_shape(region, options)?;
                patches.extend(auto_fill_region(&region.name, &shape, color, &params, last)?);
            }
            EnginePass::Fill => {
                let color = region.fill.expect("classified as fill");
                let params = region
                    .options
                    .fill_params(options.pixels_per_mm)
                    .map_err(degenerate)?;
                let shape = build_shape(region, options)?;
                patches.extend(fill_region(&shape, color, &params));
            }
            EnginePass::Satin => {
                // satin columns take their thread from the stroke style
                let color = region
                    .stroke
                    .or(region.fill)
                    .unwrap_or(Color::new(0, 0, 0, 255));
                let params = region
                    .options
                    .satin_params(options.pixels_per_mm)
                    .map_err(degenerate)?;
                let column = SatinColumn::from_superpath(
                    &region.name,
                    &region.path,
                    options.flatness,
                    color,
                    params,
                )?;
                patches.extend(column.to_patches());
            }
            EnginePass::Stroke => {
                let color = region.stroke.expect("classified as stroke");
                let params = region
                    .options
                    .stroke_params(options.pixels_per_mm, region.stroke_width, region.dashed)
                    .map_err(degenerate)?;
                patches.extend(stroke_region(&region.path, options.flatness, color, &params));
            }
        }
    }

    Ok(patches)
}

/// Stitch a whole document.
///
/// Regions are processed in order; each one starts where the previous one
/// stopped. The result is the machine-ready stream with jump markers.
pub fn stitch_document(regions: &[Region], options: &DocumentOptions) -> Result<Vec<Stitch>, Error> {
    let mut patches: Vec<Patch> = Vec::new();

    for region in regions {
        let previous = patches.iter().rev().find_map(Patch::last_stitch);
        patches.extend(region_to_patches(region, previous, options)?);
    }

    Ok(patches_to_stitches(
        &patches,
        options.collapse_length_mm * options.pixels_per_mm,
    ))
}
