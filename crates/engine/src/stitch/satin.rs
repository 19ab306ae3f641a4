//! Satin column stitching.
//!
//! A satin column is a "curvy ladder": two long rails and, optionally,
//! rungs that pair up positions across them. Both rails are walked at
//! matched parametric speed so the zig-zag stays perpendicular to the
//! column centerline even around curves:
//!
//! ```text
//! /|/|/|/|/|/|/|/|
//! ```
//!
//! Pull compensation widens the column symmetrically to counteract the
//! thread narrowing it on fabric; the underlay variants stabilize the
//! column before the satin goes down on top.

use crate::Error;
use crate::geometry::{is_simple_polyline, polyline_length, split_polyline_by_crossings};
use crate::params::SatinParams;
use crate::patch::Patch;
use crate::path::CubicSuperpath;
use crate::{Color, Point};

/// Offset passed to the paired walk to collapse both sides onto the
/// centerline; the contraction cap in [`offset_points`] does the clamping.
const CENTERLINE_OFFSET: f64 = -100_000.0;

/// A satin column with its rails matched up piece by piece.
#[derive(Debug, Clone)]
pub struct SatinColumn {
    color: Color,
    params: SatinParams,
    /// Positionally paired rail pieces. With two plain sub-paths the pieces
    /// are the bezier segments; with rungs they are the spans between rungs.
    pairs: Vec<(Vec<Point>, Vec<Point>)>,
}

impl SatinColumn {
    /// Build a satin column from a superpath.
    ///
    /// Exactly two sub-paths are zipped by bezier partition and must have
    /// the same segment count. With more sub-paths, the two longest become
    /// the rails and the rest are rungs that cut both rails into the same
    /// number of pieces.
    pub fn from_superpath(
        region: &str,
        superpath: &CubicSuperpath,
        flatness: f64,
        color: Color,
        params: SatinParams,
    ) -> Result<Self, Error> {
        let invalid = |reason: String| Error::InvalidGeometry {
            region: region.to_string(),
            reason,
        };

        let pairs = match superpath.subpaths.len() {
            0 | 1 => {
                return Err(invalid("a satin column needs two rails".to_string()));
            }
            2 => {
                let first = &superpath.subpaths[0];
                let second = &superpath.subpaths[1];
                if first.segment_count() != second.segment_count() {
                    return Err(invalid(format!(
                        "rails have an unequal number of segments ({} and {})",
                        first.segment_count(),
                        second.segment_count()
                    )));
                }
                if first.segment_count() == 0 {
                    return Err(invalid("rails are empty".to_string()));
                }

                first
                    .flatten_segments(flatness)
                    .into_iter()
                    .zip(second.flatten_segments(flatness))
                    .collect()
            }
            _ => {
                let mut flattened: Vec<Vec<Point>> = superpath
                    .subpaths
                    .iter()
                    .map(|sub| sub.flatten(flatness))
                    .collect();
                flattened.sort_by(|a, b| {
                    polyline_length(b)
                        .partial_cmp(&polyline_length(a))
                        .unwrap_or(std::cmp::Ordering::Equal)
                });

                let rungs: Vec<Vec<Point>> = flattened.split_off(2);
                let rails = flattened;

                for rail in &rails {
                    if !is_simple_polyline(rail) {
                        return Err(invalid(
                            "a rail crosses itself; split into multiple satin columns"
                                .to_string(),
                        ));
                    }
                }

                let expected = rungs.len() + 1;
                let mut pieces = rails
                    .iter()
                    .map(|rail| split_polyline_by_crossings(rail, &rungs));
                let pieces1 = pieces.next().expect("two rails");
                let pieces2 = pieces.next().expect("two rails");

                if pieces1.len() != expected || pieces2.len() != expected {
                    return Err(invalid(format!(
                        "expected {} rail pieces, got {} and {}",
                        expected,
                        pieces1.len(),
                        pieces2.len()
                    )));
                }

                pieces1.into_iter().zip(pieces2).collect()
            }
        };

        Ok(Self {
            color,
            params,
            pairs,
        })
    }

    /// Stitch the column: underlays first (center-walk, contour, zig-zag),
    /// then the satin zig-zag on top.
    pub fn to_patches(&self) -> Vec<Patch> {
        let mut patches: Vec<Patch> = Vec::new();

        if self.params.center_walk_underlay {
            patches.push(self.do_center_walk());
        }

        if self.params.contour_underlay {
            patches.push(self.do_contour_underlay());
        }

        if self.params.zigzag_underlay {
            // after the contour walk, so the zig-zags sit on it like rail
            // ties on rails
            patches.push(self.do_zigzag_underlay());
        }

        patches.push(self.do_satin());

        patches
    }

    /// Walk both rails at matched parametric speed.
    ///
    /// Each paired piece contributes `floor(max(len1, len2) / spacing)`
    /// point pairs; each rail advances at its own spacing so both arrive at
    /// the piece boundary together. Whatever is left of a piece carries into
    /// the next so no drift accumulates. Points are offset symmetrically
    /// about the pair midpoint by `offset`.
    fn walk_paths(&self, spacing: f64, offset: f64) -> (Vec<Point>, Vec<Point>) {
        let mut side1: Vec<Point> = Vec::new();
        let mut side2: Vec<Point> = Vec::new();

        let mut add_pair = |pos1: Point, pos2: Point| {
            let (pos1, pos2) = offset_points(pos1, pos2, offset);
            side1.push(pos1);
            side2.push(pos2);
        };

        let mut remainder1: Vec<Point> = Vec::new();
        let mut remainder2: Vec<Point> = Vec::new();
        let mut pos1 = self.pairs[0].0[0];
        let mut pos2 = self.pairs[0].1[0];

        for (piece1, piece2) in &self.pairs {
            let subpath1: Vec<Point> = remainder1.iter().chain(piece1).copied().collect();
            let subpath2: Vec<Point> = remainder2.iter().chain(piece2).copied().collect();

            let len1 = polyline_length(&subpath1);
            let len2 = polyline_length(&subpath2);

            // Base the stitch count on the longer side: cramming the full
            // count onto the short side would punch holes in the fabric.
            let num_points = (len1.max(len2) / spacing).floor() as usize;
            if num_points == 0 {
                pos1 = subpath1[0];
                pos2 = subpath2[0];
                remainder1 = subpath1;
                remainder2 = subpath2;
                continue;
            }

            let spacing1 = len1 / num_points as f64;
            let spacing2 = len2 / num_points as f64;

            pos1 = subpath1[0];
            pos2 = subpath2[0];
            let mut index1 = 0;
            let mut index2 = 0;

            for _ in 0..num_points {
                add_pair(pos1, pos2);
                (pos1, index1) = walk(&subpath1, pos1, index1, spacing1);
                (pos2, index2) = walk(&subpath2, pos2, index2, spacing2);
            }

            remainder1 = carry_remainder(&subpath1, pos1, index1);
            remainder2 = carry_remainder(&subpath2, pos2, index2);
        }

        // The loop is off by one pair, and the true rail ends should always
        // be hit; skip the extra pair when the two would stack up.
        let end1 = remainder1.last().copied().unwrap_or(pos1);
        let end2 = remainder2.last().copied().unwrap_or(pos2);

        if (end1 - pos1).length() > 0.3 * spacing {
            add_pair(pos1, pos2);
        }
        add_pair(end1, end2);

        (side1, side2)
    }

    /// Satin: zig-zag between the rails, widened by pull compensation.
    fn do_satin(&self) -> Patch {
        let (side1, side2) =
            self.walk_paths(self.params.zigzag_spacing, self.params.pull_compensation);

        let mut patch = Patch::new(self.color);
        for (p1, p2) in side1.into_iter().zip(side2) {
            patch.add_stitch(p1);
            patch.add_stitch(p2);
        }

        patch
    }

    /// Contour underlay: up one side and down the other, inset from the
    /// column edge.
    fn do_contour_underlay(&self) -> Patch {
        let (forward, back) = self.walk_paths(
            self.params.contour_underlay_stitch_length,
            -self.params.contour_underlay_inset,
        );

        let stitches: Vec<Point> = forward.into_iter().chain(back.into_iter().rev()).collect();
        Patch::with_stitches(self.color, stitches)
    }

    /// Center-walk underlay: a running stitch down the centerline and back.
    fn do_center_walk(&self) -> Patch {
        let (forward, back) = self.walk_paths(
            self.params.center_walk_underlay_stitch_length,
            CENTERLINE_OFFSET,
        );

        let stitches: Vec<Point> = forward.into_iter().chain(back.into_iter().rev()).collect();
        Patch::with_stitches(self.color, stitches)
    }

    /// Zig-zag underlay, at much lower density than the satin itself:
    ///
    /// ```text
    /// \/\/\/\/\/\/\/\/\/\/|
    /// /\/\/\/\/\/\/\/\/\/\|
    /// ```
    ///
    /// Together with the contour walk this forms the classic "German"
    /// underlay.
    fn do_zigzag_underlay(&self) -> Patch {
        let (side1, side2) = self.walk_paths(
            self.params.zigzag_underlay_spacing / 2.0,
            -self.params.zigzag_underlay_inset,
        );

        // each side yields half its points on the way out and the other
        // half on the way back, producing the crossed double pass
        let evens1: Vec<Point> = side1.iter().copied().step_by(2).collect();
        let odds1: Vec<Point> = side1.iter().copied().skip(1).step_by(2).collect();
        let evens2: Vec<Point> = side2.iter().copied().step_by(2).collect();
        let odds2: Vec<Point> = side2.iter().copied().skip(1).step_by(2).collect();

        let first: Vec<Point> = evens1.into_iter().chain(odds1.into_iter().rev()).collect();
        let second: Vec<Point> = odds2.into_iter().chain(evens2.into_iter().rev()).collect();

        let mut patch = Patch::new(self.color);
        for (p1, p2) in first.into_iter().zip(second) {
            patch.add_stitch(p1);
            patch.add_stitch(p2);
        }

        patch
    }
}

/// Move `distance` along the polyline from a position inside segment
/// `index`. Returns the new position and segment index.
fn walk(path: &[Point], start_pos: Point, start_index: usize, distance: f64) -> (Point, usize) {
    let mut pos = start_pos;
    let mut index = start_index;
    let last_index = path.len() - 1;
    let mut remaining = distance;

    loop {
        if index >= last_index {
            return (pos, index);
        }

        let segment_end = path[index + 1];
        let segment = segment_end - pos;
        let segment_length = segment.length();

        if segment_length > remaining {
            return (pos + segment.unit() * remaining, index);
        }

        index += 1;
        remaining -= segment_length;
        pos = segment_end;
    }
}

/// The unwalked suffix of a piece, carried into the next piece.
fn carry_remainder(subpath: &[Point], pos: Point, index: usize) -> Vec<Point> {
    if index < subpath.len() - 1 {
        std::iter::once(pos)
            .chain(subpath[index + 1..].iter().copied())
            .collect()
    } else {
        Vec::new()
    }
}

/// Expand or contract two points about their midpoint.
///
/// Used for pull compensation and for insetting underlay. Contraction stops
/// at the midpoint so the two sides can never cross.
fn offset_points(pos1: Point, pos2: Point, offset_px: f64) -> (Point, Point) {
    let distance = (pos1 - pos2).length();

    if distance < 1e-4 {
        // coincident points give us no direction to offset in
        return (pos1, pos2);
    }

    let offset = offset_px.max(-distance / 2.0);
    let outward = (pos1 - pos2).unit();

    (pos1 + outward * offset, pos2 - outward * offset)
}
