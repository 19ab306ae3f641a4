//! The stitch container produced by each engine pass.
//!
//! A [`Patch`] is an ordered, monochromatic list of needle positions. The
//! engines build patches incrementally; [`patches_to_stitches`] turns the
//! final patch sequence into a machine-ready stream, inserting jump markers
//! between patches and collapsing jumps that are short enough to sew over.

use crate::{Color, Point, Stitch};

/// Maximum distance (px) between two successive stitches that are considered
/// duplicates and filtered from the output stream.
const DUPLICATE_STITCH_TOLERANCE: f64 = 0.1;

/// An ordered sequence of stitch positions sharing one thread color.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Patch {
    pub color: Color,
    pub stitches: Vec<Point>,
}

impl Patch {
    /// Create an empty patch with the given color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            stitches: Vec::new(),
        }
    }

    /// Create a patch from an existing point list.
    pub fn with_stitches(color: Color, stitches: Vec<Point>) -> Self {
        Self { color, stitches }
    }

    /// Append a stitch position.
    pub fn add_stitch(&mut self, stitch: Point) {
        self.stitches.push(stitch);
    }

    /// The most recently added stitch, if any.
    pub fn last_stitch(&self) -> Option<Point> {
        self.stitches.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.stitches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stitches.len()
    }

    /// A copy of this patch with the stitch order reversed.
    pub fn reversed(&self) -> Patch {
        Patch {
            color: self.color,
            stitches: self.stitches.iter().rev().copied().collect(),
        }
    }

    /// Concatenate another patch of the same color onto this one.
    pub fn extend(&mut self, other: &Patch) {
        self.stitches.extend_from_slice(&other.stitches);
    }
}

/// Convert a patch sequence into the final stitch stream.
///
/// The first stitch of each patch is a potential jump. When the previous
/// patch has the same color, a jump shorter than `collapse_len_px` is demoted
/// to a normal stitch, and stitches within 0.1 px of their predecessor are
/// dropped entirely.
pub fn patches_to_stitches(patches: &[Patch], collapse_len_px: f64) -> Vec<Stitch> {
    let mut stitches: Vec<Stitch> = Vec::new();
    let mut last_stitch: Option<Point> = None;
    let mut last_color: Option<Color> = None;

    for patch in patches {
        let mut jump = true;

        for &stitch in &patch.stitches {
            if let Some(last) = last_stitch {
                if last_color == Some(patch.color) {
                    let len = (stitch - last).length();
                    if len <= DUPLICATE_STITCH_TOLERANCE {
                        jump = false;
                        continue;
                    }

                    if jump && len < collapse_len_px {
                        jump = false;
                    }
                }
            }

            stitches.push(Stitch {
                position: stitch,
                color: patch.color,
                jump,
            });

            jump = false;
            last_stitch = Some(stitch);
            last_color = Some(patch.color);
        }
    }

    stitches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::new(255, 0, 0, 255)
    }

    fn blue() -> Color {
        Color::new(0, 0, 255, 255)
    }

    #[test]
    fn test_patch_reversed() {
        let patch = Patch::with_stitches(
            red(),
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)],
        );
        let rev = patch.reversed();
        assert_eq!(rev.stitches[0], Point::new(2.0, 0.0));
        assert_eq!(rev.stitches[2], Point::new(0.0, 0.0));
        assert_eq!(rev.color, red());
    }

    #[test]
    fn test_first_stitch_of_design_is_jump() {
        let patch = Patch::with_stitches(red(), vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        let stitches = patches_to_stitches(&[patch], 0.0);

        assert_eq!(stitches.len(), 2);
        assert!(stitches[0].jump);
        assert!(!stitches[1].jump);
    }

    #[test]
    fn test_jump_between_same_color_patches() {
        let a = Patch::with_stitches(red(), vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        let b = Patch::with_stitches(red(), vec![Point::new(50.0, 0.0), Point::new(55.0, 0.0)]);
        let stitches = patches_to_stitches(&[a, b], 0.0);

        assert_eq!(stitches.len(), 4);
        assert!(stitches[2].jump, "patch boundary should be a jump");
    }

    #[test]
    fn test_short_jump_collapses() {
        let a = Patch::with_stitches(red(), vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        let b = Patch::with_stitches(red(), vec![Point::new(7.0, 0.0), Point::new(12.0, 0.0)]);
        let stitches = patches_to_stitches(&[a, b], 3.0);

        assert_eq!(stitches.len(), 4);
        assert!(!stitches[2].jump, "2px jump under 3px collapse length");
    }

    #[test]
    fn test_duplicate_stitch_dropped() {
        let a = Patch::with_stitches(red(), vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        let b = Patch::with_stitches(
            red(),
            vec![Point::new(5.05, 0.0), Point::new(10.0, 0.0)],
        );
        let stitches = patches_to_stitches(&[a, b], 0.0);

        assert_eq!(stitches.len(), 3, "near-duplicate start should be dropped");
        assert!(!stitches[2].jump);
        assert_eq!(stitches[2].position, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_color_change_never_collapses() {
        let a = Patch::with_stitches(red(), vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        let b = Patch::with_stitches(blue(), vec![Point::new(5.05, 0.0), Point::new(10.0, 0.0)]);
        let stitches = patches_to_stitches(&[a, b], 10.0);

        assert_eq!(stitches.len(), 4);
        assert!(stitches[2].jump, "color change keeps its jump");
        assert_eq!(stitches[2].color, blue());
    }
}
