//! Polygon and polyline operations for the stitch engines.
//!
//! This is the only module that touches the external polygon engine (the
//! `geo` crate). All convention mismatches live here: `geo` rotates in
//! degrees (counter-clockwise positive) while the engine thinks in signed
//! radians, and `geo` coordinate types never leak past this boundary.
//!
//! The heavy operations (boolean clipping, polygon intersection areas,
//! rotation, bounding rects) go through `geo`; the short-range helpers the
//! stitch engines call in tight loops (point-to-polyline distance, arc-length
//! projection and interpolation) are plain walks over the polylines.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{
    Area, BooleanOps, BoundingRect, Contains, Coord, Line, LineString, MultiLineString,
    Polygon, Rotate,
};

use crate::Point;

/// Edges shorter than this (px) are dropped during shape construction.
const MIN_EDGE_LENGTH: f64 = 0.01;

fn coord(p: Point) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

fn point(c: Coord<f64>) -> Point {
    Point::new(c.x, c.y)
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    pub fn upper_left(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn diagonal(&self) -> f64 {
        Point::new(self.max_x - self.min_x, self.max_y - self.min_y).length()
    }
}

/// A closed region: one outer boundary plus zero or more holes.
///
/// Construction normalizes the input rings: near-duplicate consecutive points
/// are dropped, degenerate rings are discarded, and the largest ring by area
/// becomes the outer boundary (the rest are holes).
#[derive(Debug, Clone)]
pub struct Shape {
    polygon: Polygon<f64>,
    /// Closed rings (first point repeated at the end), outer boundary first.
    rings: Vec<Vec<Point>>,
    bounds: Bounds,
}

impl Shape {
    /// Build a shape from flattened boundary rings.
    ///
    /// Returns a human-readable reason on failure; callers wrap it into
    /// [`crate::Error::InvalidGeometry`] with the region name attached.
    pub fn from_rings(input: &[Vec<Point>]) -> Result<Shape, String> {
        let mut cleaned: Vec<(Vec<Point>, f64)> = Vec::new();

        for ring in input {
            let mut points: Vec<Point> = Vec::new();
            for &p in ring {
                match points.last() {
                    Some(&last) if p.distance_to(last) <= MIN_EDGE_LENGTH => {}
                    _ => points.push(p),
                }
            }

            // drop an explicit closing point; rings close implicitly below
            if points.len() > 1
                && points[0].distance_to(*points.last().unwrap()) <= MIN_EDGE_LENGTH
            {
                points.pop();
            }

            if points.len() < 3 {
                continue;
            }

            let area = ring_signed_area(&points).abs();
            if area <= f64::EPSILON {
                continue;
            }

            cleaned.push((points, area));
        }

        if cleaned.is_empty() {
            return Err("no usable boundary rings".to_string());
        }

        cleaned.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let rings: Vec<Vec<Point>> = cleaned
            .into_iter()
            .map(|(mut points, _)| {
                let first = points[0];
                points.push(first);
                points
            })
            .collect();

        let mut ring_strings = rings
            .iter()
            .map(|ring| LineString::new(ring.iter().map(|&p| coord(p)).collect()));
        let exterior = ring_strings.next().expect("at least one ring");
        let interiors: Vec<LineString<f64>> = ring_strings.collect();
        let polygon = Polygon::new(exterior, interiors);

        let rect = polygon
            .bounding_rect()
            .ok_or_else(|| "shape has no extent".to_string())?;
        let bounds = Bounds {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        };

        Ok(Shape {
            polygon,
            rings,
            bounds,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Number of boundary rings (outer plus holes).
    pub fn boundary_count(&self) -> usize {
        self.rings.len()
    }

    /// Boundary ring `index`: 0 is the outer boundary, 1+ are holes.
    /// Rings are closed (last point equals the first).
    pub fn boundary(&self, index: usize) -> &[Point] {
        &self.rings[index]
    }

    pub fn area(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.polygon.contains(&geo::Point::from(coord(p)))
    }

    /// Shortest distance from a point to any boundary ring.
    pub fn boundary_distance(&self, p: Point) -> f64 {
        self.rings
            .iter()
            .map(|ring| point_to_polyline_distance(p, ring))
            .fold(f64::INFINITY, f64::min)
    }

    /// The y-extent of the shape after rotating it by `angle` radians
    /// (counter-clockwise) around its bounding-box center.
    ///
    /// This is how the fill engine finds the parametric range of the grating:
    /// the rotated y-coordinate of a point equals its projection onto the
    /// grating normal (up to the constant center offset).
    pub fn rotated_y_bounds(&self, angle: f64) -> (f64, f64) {
        let center = self.center();
        let rotated = self
            .polygon
            .rotate_around_point(angle.to_degrees(), geo::Point::from(coord(center)));

        match rotated.bounding_rect() {
            Some(rect) => (rect.min().y, rect.max().y),
            None => (center.y, center.y),
        }
    }

    /// Intersect the segment `a -> b` with the shape.
    ///
    /// Returns the runs (maximal chords inside the shape), each oriented the
    /// same way as the input segment. Degenerate single-point touches are
    /// dropped.
    pub fn clip_line(&self, a: Point, b: Point) -> Vec<(Point, Point)> {
        let line = MultiLineString::new(vec![LineString::new(vec![coord(a), coord(b)])]);
        let clipped = self.polygon.clip(&line, false);

        let direction = (b - a).unit();
        let mut runs: Vec<(Point, Point)> = Vec::new();

        for ls in &clipped.0 {
            if ls.0.len() < 2 {
                continue;
            }
            let mut beg = point(ls.0[0]);
            let mut end = point(*ls.0.last().unwrap());
            if beg.distance_to(end) <= 1e-6 {
                continue;
            }
            if (end - beg).dot(direction) < 0.0 {
                std::mem::swap(&mut beg, &mut end);
            }
            runs.push((beg, end));
        }

        runs
    }

    /// Fraction of the quadrilateral's area that lies inside the shape.
    pub fn quad_inside_fraction(&self, quad: [Point; 4]) -> f64 {
        let ring: Vec<Coord<f64>> = quad
            .iter()
            .chain(std::iter::once(&quad[0]))
            .map(|&p| coord(p))
            .collect();
        let quad_polygon = Polygon::new(LineString::new(ring), vec![]);

        let quad_area = quad_polygon.unsigned_area();
        if quad_area <= f64::EPSILON {
            return 1.0;
        }

        self.polygon.intersection(&quad_polygon).unsigned_area() / quad_area
    }

    /// Index of the boundary ring the point lies on, within `tolerance`.
    /// The outer boundary is checked first, matching ring order.
    pub fn nearest_boundary(&self, p: Point, tolerance: f64) -> Option<usize> {
        self.rings
            .iter()
            .position(|ring| point_to_polyline_distance(p, ring) <= tolerance)
    }

    /// Arc-length position of the point's closest spot on boundary `index`.
    pub fn project_onto_boundary(&self, index: usize, p: Point) -> f64 {
        project_onto_polyline(&self.rings[index], p)
    }

    /// Point at an arc-length position along boundary `index`, clamped to the
    /// ring's extent.
    pub fn boundary_point_at(&self, index: usize, distance: f64) -> Point {
        polyline_point_at(&self.rings[index], distance)
    }

    pub fn boundary_length(&self, index: usize) -> f64 {
        polyline_length(&self.rings[index])
    }
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance_to(w[1])).sum()
}

/// Shortest distance from a point to a polyline.
pub fn point_to_polyline_distance(p: Point, line: &[Point]) -> f64 {
    if line.is_empty() {
        return f64::INFINITY;
    }
    if line.len() == 1 {
        return p.distance_to(line[0]);
    }

    line.windows(2)
        .map(|w| p.distance_to(nearest_point_on_segment(p, w[0], w[1])))
        .fold(f64::INFINITY, f64::min)
}

/// Shortest distance between two polylines.
pub fn polyline_to_polyline_distance(a: &[Point], b: &[Point]) -> f64 {
    let mut best = f64::INFINITY;
    for p in a {
        best = best.min(point_to_polyline_distance(*p, b));
    }
    for p in b {
        best = best.min(point_to_polyline_distance(*p, a));
    }

    // endpoint checks miss crossing segments; a crossing means distance zero
    if best > 0.0 {
        for sa in a.windows(2) {
            for sb in b.windows(2) {
                let la = Line::new(coord(sa[0]), coord(sa[1]));
                let lb = Line::new(coord(sb[0]), coord(sb[1]));
                if line_intersection(la, lb).is_some() {
                    return 0.0;
                }
            }
        }
    }

    best
}

/// Closest point to `p` on the segment `a -> b`.
pub fn nearest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let d = b - a;
    let len_sq = d.dot(d);
    if len_sq < f64::EPSILON {
        return a;
    }
    let t = ((p - a).dot(d) / len_sq).clamp(0.0, 1.0);
    a + d * t
}

/// Arc-length position along the polyline of the point closest to `p`.
pub fn project_onto_polyline(line: &[Point], p: Point) -> f64 {
    let mut best_dist = f64::INFINITY;
    let mut best_arc = 0.0;
    let mut arc = 0.0;

    for w in line.windows(2) {
        let seg_len = w[0].distance_to(w[1]);
        let nearest = nearest_point_on_segment(p, w[0], w[1]);
        let dist = p.distance_to(nearest);
        if dist < best_dist {
            best_dist = dist;
            best_arc = arc + w[0].distance_to(nearest);
        }
        arc += seg_len;
    }

    best_arc
}

/// Point at arc-length `distance` along the polyline, clamped to its extent.
pub fn polyline_point_at(line: &[Point], distance: f64) -> Point {
    let total = polyline_length(line);
    let mut remaining = distance.clamp(0.0, total);

    for w in line.windows(2) {
        let seg_len = w[0].distance_to(w[1]);
        if seg_len < f64::EPSILON {
            continue;
        }
        if remaining <= seg_len {
            return w[0] + (w[1] - w[0]) * (remaining / seg_len);
        }
        remaining -= seg_len;
    }

    *line.last().expect("polyline has at least one point")
}

/// True when no two non-adjacent segments of the polyline intersect.
pub fn is_simple_polyline(line: &[Point]) -> bool {
    let n = line.len();
    if n < 3 {
        return true;
    }

    let closed = line[0].distance_to(line[n - 1]) < f64::EPSILON;
    let segments = n - 1;

    for i in 0..segments {
        for j in (i + 2)..segments {
            // the first and last segment of a closed ring share an endpoint
            if closed && i == 0 && j == segments - 1 {
                continue;
            }
            let a = Line::new(coord(line[i]), coord(line[i + 1]));
            let b = Line::new(coord(line[j]), coord(line[j + 1]));
            if line_intersection(a, b).is_some() {
                return false;
            }
        }
    }

    true
}

/// Split a polyline wherever the given crossing polylines intersect it.
///
/// The crossing positions are gathered as arc-length parameters, sorted, and
/// the polyline is sliced between them. Used to cut satin rails at their
/// rungs: `rungs.len()` crossings yield `rungs.len() + 1` pieces.
pub fn split_polyline_by_crossings(rail: &[Point], rungs: &[Vec<Point>]) -> Vec<Vec<Point>> {
    let mut cuts: Vec<f64> = Vec::new();
    let mut arc = 0.0;

    for w in rail.windows(2) {
        let seg_len = w[0].distance_to(w[1]);
        let rail_seg = Line::new(coord(w[0]), coord(w[1]));

        for rung in rungs {
            for r in rung.windows(2) {
                let rung_seg = Line::new(coord(r[0]), coord(r[1]));
                match line_intersection(rail_seg, rung_seg) {
                    Some(LineIntersection::SinglePoint { intersection, .. }) => {
                        let hit = point(intersection);
                        cuts.push(arc + w[0].distance_to(hit));
                    }
                    Some(LineIntersection::Collinear { intersection }) => {
                        cuts.push(arc + w[0].distance_to(point(intersection.start)));
                    }
                    None => {}
                }
            }
        }

        arc += seg_len;
    }

    let total = polyline_length(rail);
    cuts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    cuts.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
    cuts.retain(|&c| c > 1e-6 && c < total - 1e-6);

    let mut pieces: Vec<Vec<Point>> = Vec::new();
    let mut start = 0.0;
    for &cut in cuts.iter().chain(std::iter::once(&total)) {
        pieces.push(polyline_slice(rail, start, cut));
        start = cut;
    }

    pieces
}

/// The sub-polyline between two arc-length positions.
fn polyline_slice(line: &[Point], from: f64, to: f64) -> Vec<Point> {
    let mut points = vec![polyline_point_at(line, from)];
    let mut arc = 0.0;

    for w in line.windows(2) {
        let seg_len = w[0].distance_to(w[1]);
        let end_arc = arc + seg_len;
        if end_arc > from + 1e-9 && end_arc < to - 1e-9 {
            points.push(w[1]);
        }
        arc = end_arc;
    }

    points.push(polyline_point_at(line, to));
    points
}

fn ring_signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let p0 = points[i];
        let p1 = points[(i + 1) % n];
        area += p0.x * p1.y - p1.x * p0.y;
    }
    area * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn test_largest_ring_becomes_outer() {
        let small = square(2.0);
        let large = square(20.0);
        let shape = Shape::from_rings(&[small, large]).unwrap();

        assert_eq!(shape.boundary_count(), 2);
        assert!((shape.boundary_length(0) - 80.0).abs() < 1e-9);
        assert!((shape.boundary_length(1) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_edges_dropped() {
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(0.005, 0.0), // within the 0.01 px tolerance
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ];
        let shape = Shape::from_rings(&[ring]).unwrap();
        // closed ring: 4 corners + repeated first point
        assert_eq!(shape.boundary(0).len(), 5);
    }

    #[test]
    fn test_degenerate_input_rejected() {
        assert!(Shape::from_rings(&[]).is_err());
        assert!(Shape::from_rings(&[vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]]).is_err());
    }

    #[test]
    fn test_bounds_and_contains() {
        let shape = Shape::from_rings(&[square(10.0)]).unwrap();
        let bounds = shape.bounds();
        assert_eq!(bounds.center(), Point::new(5.0, 5.0));
        assert!((bounds.diagonal() - 200.0_f64.sqrt()).abs() < 1e-9);

        assert!(shape.contains(Point::new(5.0, 5.0)));
        assert!(!shape.contains(Point::new(15.0, 5.0)));
    }

    #[test]
    fn test_clip_line_through_square() {
        let shape = Shape::from_rings(&[square(10.0)]).unwrap();
        let runs = shape.clip_line(Point::new(-5.0, 5.0), Point::new(15.0, 5.0));

        assert_eq!(runs.len(), 1);
        let (beg, end) = runs[0];
        assert!(beg.distance_to(Point::new(0.0, 5.0)) < 1e-6);
        assert!(end.distance_to(Point::new(10.0, 5.0)) < 1e-6);
    }

    #[test]
    fn test_clip_line_with_hole_splits_runs() {
        let outer = square(10.0);
        let hole = vec![
            Point::new(4.0, 4.0),
            Point::new(6.0, 4.0),
            Point::new(6.0, 6.0),
            Point::new(4.0, 6.0),
        ];
        let shape = Shape::from_rings(&[outer, hole]).unwrap();

        let runs = shape.clip_line(Point::new(-5.0, 5.0), Point::new(15.0, 5.0));
        assert_eq!(runs.len(), 2);

        // both runs oriented along the input direction
        for (beg, end) in runs {
            assert!(end.x > beg.x);
        }
    }

    #[test]
    fn test_clip_line_outside_is_empty() {
        let shape = Shape::from_rings(&[square(10.0)]).unwrap();
        let runs = shape.clip_line(Point::new(-5.0, 20.0), Point::new(15.0, 20.0));
        assert!(runs.is_empty());
    }

    #[test]
    fn test_rotated_y_bounds_identity() {
        let shape = Shape::from_rings(&[square(10.0)]).unwrap();
        let (min_y, max_y) = shape.rotated_y_bounds(0.0);
        assert!((min_y - 0.0).abs() < 1e-9);
        assert!((max_y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_y_bounds_quarter_turn() {
        // 20x10 rectangle rotated a quarter turn spans 20 vertically
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let shape = Shape::from_rings(&[ring]).unwrap();
        let (min_y, max_y) = shape.rotated_y_bounds(std::f64::consts::FRAC_PI_2);
        assert!((max_y - min_y - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_quad_inside_fraction() {
        let shape = Shape::from_rings(&[square(10.0)]).unwrap();

        let inside = [
            Point::new(1.0, 1.0),
            Point::new(9.0, 1.0),
            Point::new(9.0, 2.0),
            Point::new(1.0, 2.0),
        ];
        assert!(shape.quad_inside_fraction(inside) > 0.99);

        let straddling = [
            Point::new(5.0, 1.0),
            Point::new(15.0, 1.0),
            Point::new(15.0, 2.0),
            Point::new(5.0, 2.0),
        ];
        let fraction = shape.quad_inside_fraction(straddling);
        assert!(fraction > 0.45 && fraction < 0.55);
    }

    #[test]
    fn test_projection_and_interpolation() {
        let line = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];

        assert!((project_onto_polyline(&line, Point::new(3.0, 1.0)) - 3.0).abs() < 1e-9);
        assert!((project_onto_polyline(&line, Point::new(11.0, 4.0)) - 14.0).abs() < 1e-9);

        let p = polyline_point_at(&line, 14.0);
        assert!(p.distance_to(Point::new(10.0, 4.0)) < 1e-9);

        // clamped beyond the end
        let q = polyline_point_at(&line, 100.0);
        assert!(q.distance_to(Point::new(10.0, 10.0)) < 1e-9);
    }

    #[test]
    fn test_nearest_boundary() {
        let outer = square(10.0);
        let hole = vec![
            Point::new(4.0, 4.0),
            Point::new(6.0, 4.0),
            Point::new(6.0, 6.0),
            Point::new(4.0, 6.0),
        ];
        let shape = Shape::from_rings(&[outer, hole]).unwrap();

        assert_eq!(shape.nearest_boundary(Point::new(0.0, 5.0), 1e-5), Some(0));
        assert_eq!(shape.nearest_boundary(Point::new(4.0, 5.0), 1e-5), Some(1));
        assert_eq!(shape.nearest_boundary(Point::new(2.0, 5.0), 1e-5), None);
    }

    #[test]
    fn test_is_simple_polyline() {
        let simple = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert!(is_simple_polyline(&simple));

        let bowtie = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        assert!(!is_simple_polyline(&bowtie));
    }

    #[test]
    fn test_split_polyline_by_crossings() {
        let rail = vec![Point::new(0.0, 0.0), Point::new(30.0, 0.0)];
        let rungs = vec![
            vec![Point::new(10.0, -5.0), Point::new(10.0, 5.0)],
            vec![Point::new(20.0, -5.0), Point::new(20.0, 5.0)],
        ];

        let pieces = split_polyline_by_crossings(&rail, &rungs);
        assert_eq!(pieces.len(), 3);
        assert!(pieces[0][0].distance_to(Point::new(0.0, 0.0)) < 1e-9);
        assert!(pieces[0].last().unwrap().distance_to(Point::new(10.0, 0.0)) < 1e-9);
        assert!(pieces[1].last().unwrap().distance_to(Point::new(20.0, 0.0)) < 1e-9);
        assert!(pieces[2].last().unwrap().distance_to(Point::new(30.0, 0.0)) < 1e-9);
    }

    #[test]
    fn test_polyline_to_polyline_distance() {
        let a = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let b = vec![Point::new(0.0, 3.0), Point::new(10.0, 3.0)];
        assert!((polyline_to_polyline_distance(&a, &b) - 3.0).abs() < 1e-9);

        let crossing = vec![Point::new(5.0, -1.0), Point::new(5.0, 1.0)];
        assert_eq!(polyline_to_polyline_distance(&a, &crossing), 0.0);
    }
}
