//! Scalar helpers and the [`Vec3`] value type used by road generation and projection.

use rand::Rng;
use std::f64::consts::PI;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Add, Sub};

/// Restricts `v` to `[lo, hi]`.
#[inline]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Linear interpolation from `a` to `b`. `p` is clamped to `[0, 1]`, never extrapolated.
#[inline]
pub fn lerp(p: f64, a: f64, b: f64) -> f64 {
    a + clamp(p, 0.0, 1.0) * (b - a)
}

/// Uniform value in `[min, max)`. Unlike `Rng::random_range` this accepts an empty range and
/// returns `min` for it, so a zero-scale road configuration generates a flat road.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + lerp(rng.random::<f64>(), 0.0, max - min)
}

/// Cosine smoothstep between `a` and `b`: slow at both ends, fastest in the middle.
#[inline]
pub fn ease_in_out(p: f64, a: f64, b: f64) -> f64 {
    lerp((1.0 - (p * PI).cos()) / 2.0, a, b)
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[inline]
pub const fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3 { x, y, z }
}

impl Vec3 {
    pub const ZERO: Vec3 = vec3(0.0, 0.0, 0.0);
}

impl Debug for Vec3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("V3(")?;
        Debug::fmt(&self.x, f)?;
        f.write_str(", ")?;
        Debug::fmt(&self.y, f)?;
        f.write_str(", ")?;
        Debug::fmt(&self.z, f)?;
        f.write_str(")")
    }
}

impl Display for Vec3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        vec3(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        vec3(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
