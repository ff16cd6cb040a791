// geometry.rs - Axis-aligned footprint rectangles and tolerant float comparison
//
// Footprints live in the XZ plane. A `Vec2` here always means (world X, world Z).

use glam::{Vec2, vec2};

// ============================================================================
// Tolerant comparison
// ============================================================================

/// Multiple of machine epsilon used by `nearly_equal`
const EPSILON_SCALE: f32 = 128.0;

/// Absolute floor for comparisons of values close to zero
pub const ABS_EPSILON: f32 = EPSILON_SCALE * f32::EPSILON;

/// Relative tolerance, scaled by the larger operand magnitude
pub const REL_EPSILON: f32 = EPSILON_SCALE * f32::EPSILON;

/// True if `a` and `b` differ by no more than the absolute floor or the
/// relative tolerance, whichever is larger.
pub fn nearly_equal(a: f32, b: f32) -> bool {
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    let magnitude = a.abs().max(b.abs());
    diff <= ABS_EPSILON.max(REL_EPSILON * magnitude)
}

/// `a >= b`, also accepting `a` a hair below `b`
pub fn nearly_ge(a: f32, b: f32) -> bool {
    a >= b || nearly_equal(a, b)
}

/// `a <= b`, also accepting `a` a hair above `b`
pub fn nearly_le(a: f32, b: f32) -> bool {
    nearly_ge(b, a)
}

// ============================================================================
// Rect
// ============================================================================

/// Corner points of a footprint. "Upper" is +Z, "left" is -X.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    pub ul: Vec2,
    pub ur: Vec2,
    pub bl: Vec2,
    pub br: Vec2,
}

/// Axis-aligned rectangle stored as center and full size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn from_bounds(min: Vec2, max: Vec2) -> Self {
        Self {
            center: (min + max) * 0.5,
            size: max - min,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn depth(&self) -> f32 {
        self.size.y
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// Zero or negative extent on either axis
    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    pub fn corners(&self) -> Corners {
        let min = self.min();
        let max = self.max();
        Corners {
            ul: vec2(min.x, max.y),
            ur: max,
            bl: min,
            br: vec2(max.x, min.y),
        }
    }

    /// Overlap test on both axes. Touching edges count as intersecting, and
    /// the comparison tolerates float error so boxes placed edge to edge are
    /// not missed.
    pub fn intersects(&self, other: &Rect) -> bool {
        let (min1, max1) = (self.min(), self.max());
        let (min2, max2) = (other.min(), other.max());
        nearly_ge(max1.x, min2.x)
            && nearly_ge(max1.y, min2.y)
            && nearly_ge(max2.x, min1.x)
            && nearly_ge(max2.y, min1.y)
    }

    /// Area shared by both rectangles (exact, zero when only touching)
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        let extent = (max - min).max(Vec2::ZERO);
        extent.x * extent.y
    }

    /// The four pieces of `self` left around `notch`, in north, east, south,
    /// west order.
    ///
    /// North and south span the full width of `self`; east and west span only
    /// the depth of the overlap. The notch is clamped into `self` first, so no
    /// piece ever extends past `self` or has its center beyond `self`'s center
    /// on the side it was cut from. Pieces may be degenerate; callers discard
    /// those.
    pub fn pieces_around(&self, notch: &Rect) -> [Rect; 4] {
        let (min, max) = (self.min(), self.max());
        let cut_min = notch.min().max(min).min(max);
        let cut_max = notch.max().max(min).min(max);

        // Rebuilding from bounds can round a size up past self's
        let within = |rect: Rect| Rect::new(rect.center, rect.size.min(self.size));
        let full_width = |low: f32, high: f32| {
            Rect::new(
                vec2(self.center.x, (low + high) * 0.5),
                vec2(self.size.x, (high - low).min(self.size.y)),
            )
        };

        let north = full_width(cut_max.y, max.y);
        let east = within(Rect::from_bounds(vec2(cut_max.x, cut_min.y), vec2(max.x, cut_max.y)));
        let south = full_width(min.y, cut_min.y);
        let west = within(Rect::from_bounds(vec2(min.x, cut_min.y), vec2(cut_min.x, cut_max.y)));

        [north, east, south, west]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, z: f32, w: f32, d: f32) -> Rect {
        Rect::new(vec2(x, z), vec2(w, d))
    }

    #[test]
    fn test_nearly_equal_scales_with_magnitude() {
        assert!(nearly_equal(1.0, 1.0 + f32::EPSILON));
        assert!(nearly_equal(1.0e6, 1.0e6 + 1.0));
        assert!(!nearly_equal(1.0, 1.001));
        assert!(nearly_equal(0.0, 1.0e-6));
        assert!(!nearly_equal(0.0, 1.0e-3));
    }

    #[test]
    fn test_nearly_ge() {
        assert!(nearly_ge(2.0, 1.0));
        assert!(nearly_ge(1.0 - f32::EPSILON, 1.0));
        assert!(!nearly_ge(0.9, 1.0));
        assert!(nearly_le(1.0 + f32::EPSILON, 1.0));
    }

    #[test]
    fn test_corners() {
        let corners = rect(1.0, 2.0, 4.0, 2.0).corners();
        assert_eq!(corners.ul, vec2(-1.0, 3.0));
        assert_eq!(corners.ur, vec2(3.0, 3.0));
        assert_eq!(corners.bl, vec2(-1.0, 1.0));
        assert_eq!(corners.br, vec2(3.0, 1.0));
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let rects = [
            rect(0.0, 0.0, 4.0, 4.0),
            rect(3.0, 0.0, 2.0, 2.0),
            rect(4.0, 0.0, 4.0, 4.0),
            rect(0.0, 10.0, 1.0, 1.0),
            rect(0.1, -0.3, 0.5, 7.0),
            rect(-2.5, 2.5, 1.0, 1.0),
        ];
        for a in &rects {
            for b in &rects {
                assert_eq!(a.intersects(b), b.intersects(a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_touching_counts_as_intersecting() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        assert!(a.intersects(&rect(2.0, 0.0, 2.0, 2.0)));
        assert!(a.intersects(&rect(2.0, 2.0, 2.0, 2.0)));
        // Edges a couple of micro-units apart still meet
        let b = rect(0.8 + 2.0e-6, 0.0, 1.0, 1.0);
        assert!(rect(-0.2, 0.0, 1.0, 1.0).intersects(&b));
        assert!(!a.intersects(&rect(2.5, 0.0, 0.9, 2.0)));
    }

    #[test]
    fn test_pieces_cover_original() {
        let original = rect(0.0, 0.0, 4.0, 4.0);
        let notches = [
            rect(0.0, 0.0, 2.0, 2.0),
            rect(2.0, 2.0, 2.0, 2.0),
            rect(-1.5, 0.5, 3.0, 1.0),
            rect(0.0, 0.0, 10.0, 1.0),
            rect(0.0, 0.0, 10.0, 10.0),
        ];
        for notch in &notches {
            let pieces = original.pieces_around(notch);
            let kept: f32 = pieces
                .iter()
                .filter(|p| !p.is_degenerate())
                .map(Rect::area)
                .sum();
            let total = kept + original.overlap_area(notch);
            assert!((total - original.area()).abs() < 1e-4, "{:?}: {}", notch, total);

            for piece in pieces.iter().filter(|p| !p.is_degenerate()) {
                assert!(piece.overlap_area(notch) < 1e-6, "{:?} overlaps {:?}", piece, notch);
                assert!(piece.width() <= original.width());
                assert!(piece.depth() <= original.depth());
            }
        }
    }

    #[test]
    fn test_pieces_never_exceed_original_size() {
        // Off-grid values where recomputing size from bounds rounds up
        let mut worst = 0.0f32;
        for i in 0..40 {
            let original = rect(0.1 + i as f32 * 0.37, -3.3 + i as f32 * 0.11, 0.7 + i as f32 * 0.013, 1.9);
            for j in 0..40 {
                let notch = rect(
                    original.center.x + (j as f32 - 20.0) * 0.031,
                    original.center.y + (j as f32 - 20.0) * 0.047,
                    0.3 + j as f32 * 0.017,
                    0.2 + j as f32 * 0.029,
                );
                for piece in original.pieces_around(&notch).iter().filter(|p| !p.is_degenerate()) {
                    worst = worst
                        .max(piece.width() - original.width())
                        .max(piece.depth() - original.depth());
                }
            }
        }
        assert!(worst <= 0.0, "piece larger than original by {}", worst);
    }

    #[test]
    fn test_north_and_south_span_full_width() {
        let original = rect(0.3, 0.7, 1.3, 2.1);
        let [north, _, south, _] = original.pieces_around(&rect(0.35, 0.65, 0.4, 0.5));
        assert_eq!(north.width(), original.width());
        assert_eq!(south.width(), original.width());
        assert_eq!(north.center.x, original.center.x);
        assert_eq!(south.center.x, original.center.x);
    }

    #[test]
    fn test_pieces_of_centered_notch() {
        let [north, east, south, west] =
            rect(0.0, 0.0, 4.0, 4.0).pieces_around(&rect(0.0, 0.0, 2.0, 2.0));
        assert_eq!(north, rect(0.0, 1.5, 4.0, 1.0));
        assert_eq!(south, rect(0.0, -1.5, 4.0, 1.0));
        assert_eq!(east, rect(1.5, 0.0, 1.0, 2.0));
        assert_eq!(west, rect(-1.5, 0.0, 1.0, 2.0));
    }

    #[test]
    fn test_pieces_of_notch_past_edge_are_clamped() {
        // Notch starts just beyond the east edge: nothing is cut away
        let original = rect(0.0, 0.0, 2.0, 2.0);
        let [north, east, south, west] = original.pieces_around(&rect(1.5 + 1.0e-7, 0.0, 1.0, 2.0));
        assert!(north.is_degenerate());
        assert!(south.is_degenerate());
        assert!(east.is_degenerate());
        assert_eq!(west, original);
    }
}
