//! Screen-space rectangles.
//!
//! Coordinates are in window pixels with the origin at the top-left corner and
//! y growing downward. Gameplay positions are `f32`; draw positions are snapped
//! to whole pixels with round-half-up.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x + self.w <= other.x
            || other.x + other.w <= self.x
            || self.y + self.h <= other.y
            || other.y + other.h <= self.y)
    }

    /// Snap the origin to whole pixels, keeping the given pixel size.
    pub fn snapped(&self, size: (i32, i32)) -> PixelRect {
        PixelRect {
            x: round_half_up(self.x),
            y: round_half_up(self.y),
            w: size.0,
            h: size.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// A `w`x`h` rectangle centered inside a `bounds_w`x`bounds_h` area.
    pub fn centered(w: i32, h: i32, bounds_w: i32, bounds_h: i32) -> Self {
        Self {
            x: (bounds_w - w) / 2,
            y: (bounds_h - h) / 2,
            w,
            h,
        }
    }
}

/// `(v + 0.5)` truncated toward zero.
pub fn round_half_up(v: f32) -> i32 {
    (v + 0.5) as i32
}

/// Scale a size by `factor`, rounding each side half-up.
pub fn scale_size(size: (u32, u32), factor: f32) -> (i32, i32) {
    (
        round_half_up(size.0 as f32 * factor),
        round_half_up(size.1 as f32 * factor),
    )
}

/// Shrink `size` so its width is at most `max_width`, preserving aspect ratio.
/// Sizes already within the limit are returned unchanged.
pub fn fit_to_width(size: (u32, u32), max_width: u32) -> (i32, i32) {
    if size.0 > max_width {
        scale_size(size, max_width as f32 / size.0 as f32)
    } else {
        (size.0 as i32, size.1 as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn overlap_on_one_axis_only_is_not_a_hit() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(5.0, 50.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(50.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn contained_rect_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn round_half_up_matches_truncating_cast() {
        assert_eq!(round_half_up(1.4), 1);
        assert_eq!(round_half_up(1.5), 2);
        assert_eq!(round_half_up(-0.4), 0);
        assert_eq!(round_half_up(-1.7), -1);
    }

    #[test]
    fn snapped_rounds_origin_only() {
        let r = Rect::new(10.6, 3.2, 99.9, 1.0);
        assert_eq!(r.snapped((128, 64)), PixelRect::new(11, 3, 128, 64));
    }

    #[test]
    fn wide_images_fit_to_width_with_aspect() {
        assert_eq!(fit_to_width((800, 200), 400), (400, 100));
        assert_eq!(fit_to_width((1000, 333), 400), (400, 133));
        let (w, h) = fit_to_width((1234, 567), 400);
        assert!(w <= 400);
        let ratio_in = 1234.0 / 567.0;
        let ratio_out = w as f32 / h as f32;
        assert!((ratio_in - ratio_out).abs() < 0.02);
    }

    #[test]
    fn narrow_images_keep_native_size() {
        assert_eq!(fit_to_width((400, 300), 400), (400, 300));
        assert_eq!(fit_to_width((120, 80), 400), (120, 80));
    }

    #[test]
    fn centered_uses_integer_division() {
        assert_eq!(
            PixelRect::centered(401, 101, 800, 600),
            PixelRect::new(199, 249, 401, 101)
        );
    }
}
