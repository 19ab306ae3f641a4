//! Cubic superpath primitives and bezier flattening.
//!
//! A design path is a "cubic superpath": a collection of sub-paths, each a
//! run of anchor points with incoming and outgoing control handles. Every
//! consecutive pair of anchors bounds one cubic bezier; a straight segment
//! sets both handles equal to their anchors. Flattening approximates each
//! bezier with line segments by recursive midpoint subdivision until the
//! control-point deviation from the chord is within the caller's tolerance.

use crate::Point;

/// One anchor point with its control handles.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlTriple {
    /// Control handle of the bezier arriving at this anchor.
    pub ctrl_in: Point,
    /// The anchor point itself.
    pub anchor: Point,
    /// Control handle of the bezier leaving this anchor.
    pub ctrl_out: Point,
}

impl ControlTriple {
    pub fn new(ctrl_in: Point, anchor: Point, ctrl_out: Point) -> Self {
        Self {
            ctrl_in,
            anchor,
            ctrl_out,
        }
    }

    /// An anchor with coincident handles, i.e. a polyline corner.
    pub fn corner(anchor: Point) -> Self {
        Self {
            ctrl_in: anchor,
            anchor,
            ctrl_out: anchor,
        }
    }
}

/// A run of anchors forming one connected path.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubPath {
    pub nodes: Vec<ControlTriple>,
}

impl SubPath {
    pub fn new(nodes: Vec<ControlTriple>) -> Self {
        Self { nodes }
    }

    /// Build a sub-path from straight line segments.
    pub fn from_polyline(points: &[Point]) -> Self {
        Self {
            nodes: points.iter().map(|&p| ControlTriple::corner(p)).collect(),
        }
    }

    /// Number of bezier segments (anchors minus one).
    pub fn segment_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// True when the last anchor coincides with the first.
    pub fn is_closed(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => first.anchor.distance_to(last.anchor) < f64::EPSILON,
            _ => false,
        }
    }

    /// Flatten the whole sub-path to a single polyline.
    ///
    /// Open paths stay open; the result starts at the first anchor and ends
    /// at the last. Deterministic for a given input and tolerance.
    pub fn flatten(&self, tolerance: f64) -> Vec<Point> {
        let mut points: Vec<Point> = Vec::new();

        let Some(first) = self.nodes.first() else {
            return points;
        };
        points.push(first.anchor);

        for pair in self.nodes.windows(2) {
            flatten_between(&pair[0], &pair[1], tolerance, &mut points);
        }

        points
    }

    /// Flatten each bezier segment separately, preserving the partition.
    ///
    /// The satin engine pairs rails segment-by-segment, so the boundaries
    /// between beziers must survive flattening. Each returned polyline runs
    /// from one anchor to the next.
    pub fn flatten_segments(&self, tolerance: f64) -> Vec<Vec<Point>> {
        self.nodes
            .windows(2)
            .map(|pair| {
                let mut points = vec![pair[0].anchor];
                flatten_between(&pair[0], &pair[1], tolerance, &mut points);
                points
            })
            .collect()
    }
}

/// A collection of sub-paths forming one design object.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CubicSuperpath {
    pub subpaths: Vec<SubPath>,
}

impl CubicSuperpath {
    pub fn new(subpaths: Vec<SubPath>) -> Self {
        Self { subpaths }
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Flatten every sub-path, one polyline each.
    pub fn flatten(&self, tolerance: f64) -> Vec<Vec<Point>> {
        self.subpaths
            .iter()
            .map(|sub| sub.flatten(tolerance))
            .collect()
    }
}

/// Flatten the bezier bounded by two consecutive anchors into `out`.
///
/// The start anchor must already be in `out`. Straight segments (handles
/// coincident with their anchors) emit the end anchor directly, so flattening
/// a polyline returns the polyline unchanged.
fn flatten_between(from: &ControlTriple, to: &ControlTriple, tolerance: f64, out: &mut Vec<Point>) {
    let straight = from.ctrl_out.distance_to(from.anchor) < f64::EPSILON
        && to.ctrl_in.distance_to(to.anchor) < f64::EPSILON;

    if straight {
        out.push(to.anchor);
    } else {
        flatten_cubic(from.anchor, from.ctrl_out, to.ctrl_in, to.anchor, tolerance, out);
    }
}

/// Recursive midpoint subdivision of a cubic bezier.
fn flatten_cubic(p0: Point, c1: Point, c2: Point, p3: Point, tol: f64, out: &mut Vec<Point>) {
    let d1 = point_to_line_distance(c1, p0, p3);
    let d2 = point_to_line_distance(c2, p0, p3);

    if d1 + d2 <= tol {
        out.push(p3);
        return;
    }

    // de Casteljau split at t = 0.5
    let mid01 = midpoint(p0, c1);
    let mid12 = midpoint(c1, c2);
    let mid23 = midpoint(c2, p3);
    let mid012 = midpoint(mid01, mid12);
    let mid123 = midpoint(mid12, mid23);
    let mid0123 = midpoint(mid012, mid123);

    flatten_cubic(p0, mid01, mid012, mid0123, tol, out);
    flatten_cubic(mid0123, mid123, mid23, p3, tol, out);
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Perpendicular distance from a point to the line through two points.
fn point_to_line_distance(p: Point, line_start: Point, line_end: Point) -> f64 {
    let d = line_end - line_start;
    let len_sq = d.dot(d);

    if len_sq < f64::EPSILON {
        return p.distance_to(line_start);
    }

    let cross = (p.x - line_start.x) * d.y - (p.y - line_start.y) * d.x;
    cross.abs() / len_sq.sqrt()
}
