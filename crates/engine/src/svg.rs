//! SVG path-data import.
//!
//! Parses an SVG `d` attribute string into a [`CubicSuperpath`]. Lines and
//! quadratics are degree-elevated to cubics so everything downstream deals
//! with a single curve type. Document-level parsing and style extraction are
//! the caller's job; the engine only ever sees path geometry.

use crate::Error;
use crate::Point;
use crate::path::{ControlTriple, CubicSuperpath, SubPath};

/// Parse SVG path data into a cubic superpath.
///
/// Supports all standard SVG path commands; `SimplifyingPathParser` converts
/// them to absolute MoveTo/LineTo/CurveTo/Quadratic/ClosePath, approximating
/// arcs with cubics. `Z` closes the sub-path back to its starting anchor.
pub fn parse_path_data(d: &str) -> Result<CubicSuperpath, Error> {
    let mut subpaths: Vec<SubPath> = Vec::new();
    let mut current: Vec<ControlTriple> = Vec::new();

    let mut flush = |nodes: &mut Vec<ControlTriple>| {
        // a sub-path needs at least one segment to be stitchable
        if nodes.len() >= 2 {
            subpaths.push(SubPath::new(std::mem::take(nodes)));
        } else {
            nodes.clear();
        }
    };

    for segment in svgtypes::SimplifyingPathParser::from(d) {
        let segment = segment.map_err(|e| Error::InvalidPathData(e.to_string()))?;

        match segment {
            svgtypes::SimplePathSegment::MoveTo { x, y } => {
                flush(&mut current);
                current.push(ControlTriple::corner(Point::new(x, y)));
            }
            svgtypes::SimplePathSegment::LineTo { x, y } => {
                current.push(ControlTriple::corner(Point::new(x, y)));
            }
            svgtypes::SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                if let Some(last) = current.last_mut() {
                    last.ctrl_out = Point::new(x1, y1);
                }
                current.push(ControlTriple::new(
                    Point::new(x2, y2),
                    Point::new(x, y),
                    Point::new(x, y),
                ));
            }
            svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                let Some(last) = current.last_mut() else {
                    continue;
                };
                // degree elevation: the cubic handles sit two thirds of the
                // way from each endpoint to the quadratic control point
                let start = last.anchor;
                let ctrl = Point::new(x1, y1);
                let end = Point::new(x, y);

                last.ctrl_out = start + (ctrl - start) * (2.0 / 3.0);
                current.push(ControlTriple::new(
                    end + (ctrl - end) * (2.0 / 3.0),
                    end,
                    end,
                ));
            }
            svgtypes::SimplePathSegment::ClosePath => {
                if let Some(first) = current.first().copied() {
                    let last_anchor = current.last().expect("non-empty").anchor;
                    if last_anchor.distance_to(first.anchor) > f64::EPSILON {
                        current.push(ControlTriple::corner(first.anchor));
                    }
                    flush(&mut current);
                    // drawing may continue from the closed sub-path's start
                    current.push(ControlTriple::corner(first.anchor));
                }
            }
        }
    }

    flush(&mut current);

    Ok(CubicSuperpath::new(subpaths))
}
