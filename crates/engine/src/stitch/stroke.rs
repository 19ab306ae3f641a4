//! Stroked paths: running stitch or centerline zig-zag.
//!
//! Thin or dashed strokes become a running stitch along the path. Wider
//! strokes become a simple zig-zag across the centerline, half the stroke
//! width to each side. An integer repeat count traverses the path several
//! times, alternating direction so the thread always continues from where it
//! stopped.

use crate::params::StrokeParams;
use crate::patch::Patch;
use crate::path::CubicSuperpath;
use crate::{Color, Point};

/// Strokes at or below this width (px) sew as a running stitch.
const RUNNING_STITCH_MAX_WIDTH: f64 = 0.5;

/// Stitch every sub-path of the stroke, one patch each.
pub fn stroke_region(
    superpath: &CubicSuperpath,
    flatness: f64,
    color: Color,
    params: &StrokeParams,
) -> Vec<Patch> {
    let mut patches: Vec<Patch> = Vec::new();

    for polyline in superpath.flatten(flatness) {
        if polyline.len() < 2 {
            continue;
        }

        let patch = if is_running_stitch(params) {
            stroke_points(&polyline, params.running_stitch_length, 0.0, params.repeats, color)
        } else {
            stroke_points(
                &polyline,
                params.zigzag_spacing / 2.0,
                params.stroke_width,
                params.repeats,
                color,
            )
        };

        patches.push(patch);
    }

    patches
}

fn is_running_stitch(params: &StrokeParams) -> bool {
    // sub-half-pixel stroke widths are the legacy way of asking for a
    // running stitch; dashing is the explicit way
    params.dashed || params.stroke_width <= RUNNING_STITCH_MAX_WIDTH
}

/// Walk the polyline, emitting stitches every `spacing`, offset alternately
/// to each side by half the stroke width.
///
/// Even repeats traverse forward, odd repeats traverse in reverse. The phase
/// `rho` carries across segments and repeats so spacing stays even through
/// corners and turnarounds.
fn stroke_points(
    points: &[Point],
    spacing: f64,
    stroke_width: f64,
    repeats: u32,
    color: Color,
) -> Patch {
    let mut patch = Patch::new(color);
    let mut p0 = points[0];
    let mut rho = 0.0;
    let mut side = 1.0;
    let mut last_segment_direction: Option<Point> = None;

    for repeat in 0..repeats {
        let order: Vec<usize> = if repeat % 2 == 0 {
            (1..points.len()).collect()
        } else {
            (0..points.len() - 1).rev().collect()
        };

        for &index in &order {
            let p1 = points[index];

            let seg_len = (p1 - p0).length();
            if seg_len == 0.0 {
                continue;
            }

            let along = (p1 - p0).unit();
            let perp = along.rotate_left() * (stroke_width * 0.5);

            if stroke_width == 0.0 {
                if let Some(last_direction) = last_segment_direction {
                    if (1.0 - along.dot(last_direction)).abs() > 0.5 {
                        // sharper than 45 degrees: stitch the corner itself
                        rho = spacing;
                        patch.add_stitch(p0);
                    }
                }
            }

            while rho <= seg_len {
                patch.add_stitch(p0 + along * rho + perp * side);
                rho += spacing;
                side = -side;
            }

            p0 = p1;
            last_segment_direction = Some(along);
            rho -= seg_len;
        }

        let emit_end = patch
            .last_stitch()
            .is_none_or(|last| (p0 - last).length() > 0.1);
        if emit_end {
            patch.add_stitch(p0);
        }
    }

    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::SubPath;

    fn color() -> Color {
        Color::new(10, 10, 10, 255)
    }

    fn params(stroke_width: f64, dashed: bool, repeats: u32) -> StrokeParams {
        StrokeParams {
            running_stitch_length: 3.0,
            zigzag_spacing: 1.0,
            repeats,
            stroke_width,
            dashed,
        }
    }

    fn line(length: f64) -> CubicSuperpath {
        CubicSuperpath::new(vec![SubPath::from_polyline(&[
            Point::new(0.0, 0.0),
            Point::new(length, 0.0),
        ])])
    }

    #[test]
    fn test_thin_stroke_is_running_stitch() {
        let patches = stroke_region(&line(10.0), 0.1, color(), &params(0.4, false, 1));

        assert_eq!(patches.len(), 1);
        let stitches = &patches[0].stitches;
        // stitches at 0, 3, 6, 9 plus the endpoint
        assert_eq!(stitches.len(), 5);
        for stitch in stitches {
            assert_eq!(stitch.y, 0.0, "running stitch stays on the centerline");
        }
        assert_eq!(*stitches.last().unwrap(), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_dashed_stroke_is_running_stitch() {
        let patches = stroke_region(&line(10.0), 0.1, color(), &params(3.0, true, 1));
        assert!(patches[0].stitches.iter().all(|s| s.y == 0.0));
    }

    #[test]
    fn test_wide_stroke_zigzags() {
        let patches = stroke_region(&line(10.0), 0.1, color(), &params(2.0, false, 1));
        let stitches = &patches[0].stitches;

        // zig-zag at half the spacing, alternating a half-width to each side
        let above = stitches.iter().filter(|s| s.y > 0.5).count();
        let below = stitches.iter().filter(|s| s.y < -0.5).count();
        assert!(above >= 9 && below >= 9);
        assert!((above as i64 - below as i64).abs() <= 1);

        for pair in stitches.windows(2) {
            let dx = pair[1].x - pair[0].x;
            assert!(dx.abs() < 0.5 + 1e-9, "zig-zag advances half a spacing at a time");
        }
    }

    #[test]
    fn test_repeats_alternate_direction() {
        let patches = stroke_region(&line(10.0), 0.1, color(), &params(0.0, false, 2));
        let stitches = &patches[0].stitches;

        // second repeat walks back to the start
        assert_eq!(*stitches.last().unwrap(), Point::new(0.0, 0.0));
        let max_x = stitches.iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max);
        assert!((max_x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_sharp_corner_gets_a_stitch() {
        let sp = CubicSuperpath::new(vec![SubPath::from_polyline(&[
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
        ])]);
        let patches = stroke_region(&sp, 0.1, color(), &params(0.0, false, 1));

        assert!(
            patches[0]
                .stitches
                .iter()
                .any(|s| s.distance_to(Point::new(5.0, 0.0)) < 1e-9),
            "right-angle corner should be stitched"
        );
    }

    #[test]
    fn test_one_patch_per_subpath() {
        let sp = CubicSuperpath::new(vec![
            SubPath::from_polyline(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]),
            SubPath::from_polyline(&[Point::new(0.0, 5.0), Point::new(10.0, 5.0)]),
        ]);
        let patches = stroke_region(&sp, 0.1, color(), &params(0.0, false, 1));
        assert_eq!(patches.len(), 2);
    }
}
