use crate::rules::Direction;

/// A tightly packed row-major byte raster with 1 to 4 components per pixel.
///
/// All rasters taking part in one synthesis session carry the same component
/// count. Equality is dimensional plus byte-for-byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub components: usize,
    pub bytes: Vec<u8>,
}

impl Raster {
    /// Zero-filled raster.
    pub fn new(width: usize, height: usize, components: usize) -> Self {
        assert!((1..=4).contains(&components));
        Self {
            width,
            height,
            components,
            bytes: vec![0; width * height * components],
        }
    }

    pub fn from_bytes(width: usize, height: usize, components: usize, bytes: Vec<u8>) -> Self {
        assert!((1..=4).contains(&components));
        assert_eq!(bytes.len(), width * height * components);
        Self {
            width,
            height,
            components,
            bytes,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> &[u8] {
        let i = (y * self.width + x) * self.components;
        &self.bytes[i..i + self.components]
    }

    pub fn set(&mut self, x: usize, y: usize, pixel: &[u8]) {
        debug_assert_eq!(pixel.len(), self.components);
        let i = (y * self.width + x) * self.components;
        self.bytes[i..i + self.components].copy_from_slice(pixel);
    }

    /// Copy of the `width`x`height` window anchored at `(x, y)`.
    pub fn window(&self, x: usize, y: usize, width: usize, height: usize) -> Self {
        assert!(x + width <= self.width && y + height <= self.height);
        let mut out = Self::new(width, height, self.components);
        for dy in 0..height {
            for dx in 0..width {
                out.set(dx, dy, self.get(x + dx, y + dy));
            }
        }
        out
    }

    /// Grow by `(xexp, yexp)` pixels, filling the new area by wrapping the
    /// source like a torus: pixel `(x, y)` of the result is pixel
    /// `(x mod width, y mod height)` of the source.
    pub fn wrap_expand(&self, xexp: usize, yexp: usize) -> Self {
        let mut out = Self::new(self.width + xexp, self.height + yexp, self.components);
        for y in 0..out.height {
            for x in 0..out.width {
                out.set(x, y, self.get(x % self.width, y % self.height));
            }
        }
        out
    }

    /// Mirror along the vertical axis.
    pub fn flip_h(&self) -> Self {
        let mut out = Self::new(self.width, self.height, self.components);
        for y in 0..self.height {
            for x in 0..self.width {
                out.set(self.width - 1 - x, y, self.get(x, y));
            }
        }
        out
    }

    /// Mirror along the horizontal axis.
    pub fn flip_v(&self) -> Self {
        let mut out = Self::new(self.width, self.height, self.components);
        for y in 0..self.height {
            for x in 0..self.width {
                out.set(x, self.height - 1 - y, self.get(x, y));
            }
        }
        out
    }

    /// Clockwise rotation by `turns` quarter turns; odd turns swap the
    /// dimensions.
    pub fn rot90(&self, turns: usize) -> Self {
        let (w, h) = (self.width, self.height);
        let mut out = match turns % 4 {
            0 => return self.clone(),
            1 | 3 => Self::new(h, w, self.components),
            _ => Self::new(w, h, self.components),
        };
        for y in 0..h {
            for x in 0..w {
                let pixel = self.get(x, y);
                match turns % 4 {
                    1 => out.set(h - 1 - y, x, pixel),
                    2 => out.set(w - 1 - x, h - 1 - y, pixel),
                    _ => out.set(y, w - 1 - x, pixel),
                }
            }
        }
        out
    }

    /// Whether shifting `self` by one pixel in `direction` makes it coincide
    /// byte-for-byte with `other` on the overlapping rectangle.
    ///
    /// For `Right` this compares the rightmost `width - 1` columns of `self`
    /// with the leftmost `width - 1` columns of `other`; the remaining three
    /// directions shift symmetrically. Comparison is exact.
    pub fn overlap(&self, other: &Self, direction: Direction) -> bool {
        if self.width != other.width
            || self.height != other.height
            || self.components != other.components
        {
            return false;
        }
        let (w, h) = (self.width, self.height);
        let (ax, ay, bx, by, cw, ch) = match direction {
            Direction::Up => (0, 0, 0, 1, w, h.saturating_sub(1)),
            Direction::Down => (0, 1, 0, 0, w, h.saturating_sub(1)),
            Direction::Left => (0, 0, 1, 0, w.saturating_sub(1), h),
            Direction::Right => (1, 0, 0, 0, w.saturating_sub(1), h),
        };
        for y in 0..ch {
            for x in 0..cw {
                if self.get(ax + x, ay + y) != other.get(bx + x, by + y) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn gradient(width: usize, height: usize, components: usize) -> Raster {
        let mut count = 0u8;
        let bytes = std::iter::repeat_with(|| {
            count = count.wrapping_add(1);
            count
        })
        .take(width * height * components)
        .collect();
        Raster::from_bytes(width, height, components, bytes)
    }

    #[test]
    fn wrap_expand_tiles_the_source() {
        let r = Raster::from_bytes(2, 2, 1, vec![1, 2, 3, 4]);
        let expanded = r.wrap_expand(1, 1);
        assert_eq!(expanded.width, 3);
        assert_eq!(expanded.height, 3);
        assert_eq!(expanded.bytes, vec![1, 2, 1, 3, 4, 3, 1, 2, 1]);
    }

    #[test]
    fn flips_are_involutions() {
        let r = gradient(3, 2, 2);
        assert_eq!(r.flip_h().flip_h(), r);
        assert_eq!(r.flip_v().flip_v(), r);
        assert_ne!(r.flip_h(), r);
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        let r = gradient(3, 2, 1);
        let full = r.rot90(1).rot90(1).rot90(1).rot90(1);
        assert_eq!(full, r);
        assert_eq!(r.rot90(1).width, 2);
        assert_eq!(r.rot90(1).height, 3);
    }

    #[test]
    fn half_turn_is_both_mirrors() {
        let r = gradient(4, 3, 3);
        assert_eq!(r.rot90(2), r.flip_v().flip_h());
    }

    #[test]
    fn single_turn_moves_corners() {
        // [a b]        [c a]
        // [c d]   ->   [d b]
        let r = Raster::from_bytes(2, 2, 1, vec![b'a', b'b', b'c', b'd']);
        assert_eq!(r.rot90(1).bytes, vec![b'c', b'a', b'd', b'b']);
    }

    #[test]
    fn window_copies_the_anchored_rect() {
        let r = gradient(4, 4, 1);
        let w = r.window(1, 2, 2, 2);
        assert_eq!(w.bytes, vec![r.get(1, 2)[0], r.get(2, 2)[0], r.get(1, 3)[0], r.get(2, 3)[0]]);
    }

    #[test]
    fn overlap_compares_the_shifted_columns() {
        // Vertical stripes: every column equals itself shifted down, never
        // shifted sideways.
        let stripes = Raster::from_bytes(2, 2, 1, vec![0, 255, 0, 255]);
        assert!(stripes.overlap(&stripes, Direction::Up));
        assert!(stripes.overlap(&stripes, Direction::Down));
        assert!(!stripes.overlap(&stripes, Direction::Left));
        assert!(!stripes.overlap(&stripes, Direction::Right));
    }

    #[test]
    fn overlap_is_symmetric_under_opposite_direction() {
        let a = gradient(3, 3, 1);
        let shifted = a.window(1, 0, 2, 3).wrap_expand(1, 0);
        for direction in Direction::ALL {
            assert_eq!(
                a.overlap(&shifted, direction),
                shifted.overlap(&a, direction.opposite()),
            );
        }
    }

    #[test]
    fn mismatched_shapes_never_overlap() {
        let a = gradient(2, 2, 1);
        let b = gradient(2, 2, 3);
        assert!(!a.overlap(&b, Direction::Right));
    }
}
