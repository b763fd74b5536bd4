use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
///
/// The empty box has `min > max`; unioning anything into it yields that thing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    #[inline]
    pub fn union_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn union(&mut self, other: Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn extent(self) -> Vec3 {
        self.max - self.min
    }

    /// The eight corner points.
    pub fn corners(self) -> [Vec3; 8] {
        let (mn, mx) = (self.min, self.max);
        [
            Vec3::new(mn.x, mn.y, mn.z),
            Vec3::new(mx.x, mn.y, mn.z),
            Vec3::new(mn.x, mx.y, mn.z),
            Vec3::new(mx.x, mx.y, mn.z),
            Vec3::new(mn.x, mn.y, mx.z),
            Vec3::new(mx.x, mn.y, mx.z),
            Vec3::new(mn.x, mx.y, mx.z),
            Vec3::new(mx.x, mx.y, mx.z),
        ]
    }

    /// Bounds of this box under an affine transform (corner-wise, so the
    /// result stays axis-aligned and conservative under rotation).
    pub fn transformed(self, m: Mat4) -> Aabb {
        let mut out = Aabb::empty();
        for c in self.corners() {
            out.union_point(m.transform_point3(c));
        }
        out
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_is_invalid_until_unioned() {
        let mut b = Aabb::empty();
        assert!(!b.is_valid());
        b.union_point(Vec3::new(1.0, 2.0, 3.0));
        assert!(b.is_valid());
        assert_eq!(b.min, b.max);
    }

    #[test]
    fn union_grows_monotonically() {
        let mut b = Aabb::empty();
        b.union_point(Vec3::ZERO);
        b.union_point(Vec3::new(-1.0, 2.0, 0.5));
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(0.0, 2.0, 0.5));
    }

    #[test]
    fn transformed_by_translation_shifts_bounds() {
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = b.transformed(Mat4::from_translation(Vec3::new(3.0, 0.0, -4.0)));
        assert_eq!(t.min, Vec3::new(2.0, -1.0, -5.0));
        assert_eq!(t.max, Vec3::new(4.0, 1.0, -3.0));
    }

    #[test]
    fn transformed_by_rotation_stays_conservative() {
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let r = b.transformed(Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4));
        // A rotated unit cube's shadow on the axes grows to sqrt(2).
        assert!((r.max.x - 2f32.sqrt()).abs() < 1e-5);
        assert!((r.max.y - 1.0).abs() < 1e-6);
    }
}
