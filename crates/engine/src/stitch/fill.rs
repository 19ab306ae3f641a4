//! Manually-routed fill: grating generation, section grouping and row
//! stitching with stagger.
//!
//! A filled region is covered by parallel rows of stitches. Successive rows
//! stagger their stitch phase so needle holes never line up:
//!
//! ```text
//! ---*-----------*-----------
//! ------*-----------*--------
//! ---------*-----------*-----
//! ------------*-----------*--
//! ---*-----------*-----------
//! ```
//!
//! The stagger phase is computed from each row's absolute position, not its
//! index, so two abutting regions with the same angle and spacing tile into
//! one seamless fill.

use std::f64::consts::FRAC_PI_2;

use crate::geometry::{Shape, polyline_to_polyline_distance};
use crate::params::FillParams;
use crate::patch::Patch;
use crate::{Color, Point};

/// A maximal chord of one grating row inside the region, oriented.
pub type GratingSegment = (Point, Point);

/// Unit vector pointing "east": to the right along a row at `angle`.
pub(crate) fn east(angle: f64) -> Point {
    Point::new(1.0, 0.0).rotate(-angle)
}

/// Unit vector normal to the rows, pointing from one row to the next.
pub(crate) fn north(angle: f64) -> Point {
    east(angle).rotate(FRAC_PI_2)
}

/// Index of the grating row a point sits on, counted from the global origin.
pub(crate) fn row_num(point: Point, angle: f64, row_spacing: f64) -> i64 {
    (point.dot(north(angle)) / row_spacing).round() as i64
}

/// Snap a stitch backwards along the row so its phase lands on this row's
/// stagger grid.
///
/// The offset depends only on the stitch's absolute position, so abutting
/// regions agree on needle holes.
pub(crate) fn adjust_stagger(stitch: Point, params: &FillParams) -> Point {
    let row = row_num(stitch, params.angle, params.row_spacing);
    let row_stagger = (row as f64).rem_euclid(params.staggers as f64);
    let stagger_offset = row_stagger / params.staggers as f64 * params.max_stitch_length;

    let direction = east(params.angle);
    let offset = (stitch.dot(direction) - stagger_offset).rem_euclid(params.max_stitch_length);

    stitch - direction * offset
}

/// Intersect the region with the family of parallel grating lines.
///
/// Returns one entry per non-empty row, top to bottom, each holding the runs
/// of that row ordered by distance from the bounding box's upper-left corner.
/// Rows are snapped so their positions are an even multiple of `row_spacing`
/// from the global origin.
pub fn intersect_region_with_grating(shape: &Shape, params: &FillParams) -> Vec<Vec<GratingSegment>> {
    let bounds = shape.bounds();
    let upper_left = bounds.upper_left();
    let center = bounds.center();
    // a grating line as long as the diagonal always spans the whole shape
    let half_length = bounds.diagonal() / 2.0;

    let direction = east(params.angle);
    let normal = north(params.angle);

    let (mut start, mut end) = shape.rotated_y_bounds(params.angle);
    start -= center.y;
    end -= center.y;

    // snap so rows land on global multiples of row_spacing
    start -= (start + normal.dot(center)).rem_euclid(params.row_spacing);

    let mut rows: Vec<Vec<GratingSegment>> = Vec::new();

    while start < end {
        let row_center = center + normal * start;
        let p0 = row_center - direction * half_length;
        let p1 = row_center + direction * half_length;

        let mut runs = shape.clip_line(p0, p1);

        if runs.is_empty() {
            // a grazing row intersects at a single point or not at all
            log::debug!("skipping degenerate grating row at offset {start}");
            start += params.row_spacing;
            continue;
        }

        runs.sort_by(|a, b| {
            let da = (a.0 - upper_left).length();
            let db = (b.0 - upper_left).length();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

        if params.flip {
            runs.reverse();
            for run in &mut runs {
                std::mem::swap(&mut run.0, &mut run.1);
            }
        }

        rows.push(runs);
        start += params.row_spacing;
    }

    rows
}

/// Whether two runs of consecutive rows belong to the same section.
///
/// They do when they are close enough (within 1.1 row spacings) and the
/// quadrilateral spanned by their endpoints lies at least 90% inside the
/// region. The area test catches the "H at 45 degrees" case, where the next
/// row jumps to a different limb of the shape.
fn is_same_run(shape: &Shape, prev: GratingSegment, this: GratingSegment, row_spacing: f64) -> bool {
    let prev_line = [prev.0, prev.1];
    let this_line = [this.0, this.1];

    if polyline_to_polyline_distance(&prev_line, &this_line) > row_spacing * 1.1 {
        return false;
    }

    let quad = [prev.0, prev.1, this.1, this.0];
    shape.quad_inside_fraction(quad) >= 0.9
}

/// Break the rows up into sections of contiguous runs.
///
/// Repeatedly pulls the first remaining run off each row, walking top to
/// bottom; a section ends when the next row's first run is not a continuation
/// of the previous one. Emptied rows are dropped between passes.
pub fn pull_runs(
    shape: &Shape,
    rows: &[Vec<GratingSegment>],
    row_spacing: f64,
) -> Vec<Vec<GratingSegment>> {
    let mut rows: Vec<Vec<GratingSegment>> = rows.to_vec();
    let mut sections: Vec<Vec<GratingSegment>> = Vec::new();

    while !rows.is_empty() {
        let mut section: Vec<GratingSegment> = Vec::new();
        let mut prev: Option<GratingSegment> = None;

        for row in rows.iter_mut() {
            let first = row[0];

            if let Some(prev) = prev {
                if !is_same_run(shape, prev, first, row_spacing) {
                    break;
                }
            }

            section.push(first);
            prev = Some(first);
            row.remove(0);
        }

        sections.push(section);
        rows.retain(|row| !row.is_empty());
    }

    sections
}

/// Stitch one grating segment into the patch.
///
/// Emits the segment start (unless the needle is already within half a
/// millimeter of it), then stitches on the row's stagger grid every
/// `max_stitch_length`, then the segment end (unless within a tenth of a
/// millimeter of the last stitch).
pub fn stitch_row(patch: &mut Patch, beg: Point, end: Point, params: &FillParams) {
    let row_direction = (end - beg).unit();
    let segment_length = (end - beg).length();

    let emit_beg = match patch.last_stitch() {
        Some(last) => (beg - last).length() > 0.5 * params.pixels_per_mm,
        None => true,
    };
    if emit_beg {
        patch.add_stitch(beg);
    }

    let mut first_stitch = adjust_stagger(beg, params);

    // the snap may have landed just outside this row, so move back in
    if (first_stitch - beg).dot(row_direction) < 0.0 {
        first_stitch = first_stitch + row_direction * params.max_stitch_length;
    }

    let mut offset = (first_stitch - beg).length();

    while offset < segment_length {
        patch.add_stitch(beg + row_direction * offset);
        offset += params.max_stitch_length;
    }

    if let Some(last) = patch.last_stitch() {
        if (end - last).length() > 0.1 * params.pixels_per_mm {
            patch.add_stitch(end);
        }
    }
}

/// Stitch one section as a serpentine: alternate the direction of every row.
pub fn section_to_patch(section: &[GratingSegment], color: Color, params: &FillParams) -> Patch {
    let mut patch = Patch::new(color);
    let mut swap = false;

    for &(beg, end) in section {
        let (beg, end) = if swap { (end, beg) } else { (beg, end) };
        stitch_row(&mut patch, beg, end, params);
        swap = !swap;
    }

    patch
}

/// Fill the region: one patch per section.
pub fn fill_region(shape: &Shape, color: Color, params: &FillParams) -> Vec<Patch> {
    let rows = intersect_region_with_grating(shape, params);
    let sections = pull_runs(shape, &rows, params.row_spacing);

    sections
        .iter()
        .map(|section| section_to_patch(section, color, params))
        .collect()
}
