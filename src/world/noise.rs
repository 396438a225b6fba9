// noise.rs - Hash noise and easing
//
// Scalar twins of the GLSL helpers in the rain shader so the CPU reference
// path evaluates the same field.

use glam::{Vec2, Vec3};

#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
pub fn fract3(v: Vec3) -> Vec3 {
    v - v.floor()
}

#[inline]
pub fn fract2(v: Vec2) -> Vec2 {
    v - v.floor()
}

#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite step. Reversed edges (e0 > e1) fall off instead of rising;
/// coincident edges degrade to a hard step rather than dividing by zero.
#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let span = e1 - e0;
    if span == 0.0 {
        return if x < e0 { 0.0 } else { 1.0 };
    }
    let t = ((x - e0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Rises over [0, b], falls over [b, 1].
#[inline]
pub fn saw(b: f32, t: f32) -> f32 {
    smoothstep(0.0, b, t) * smoothstep(1.0, b, t)
}

/// One float in, three decorrelated floats in [0, 1) out.
pub fn hash13(p: f32) -> Vec3 {
    let mut p3 = fract3(Vec3::splat(p) * Vec3::new(0.1031, 0.11369, 0.13787));
    p3 += p3.dot(Vec3::new(p3.y, p3.z, p3.x) + 19.19);
    fract3(Vec3::new(
        (p3.x + p3.y) * p3.z,
        (p3.x + p3.z) * p3.y,
        (p3.y + p3.z) * p3.x,
    ))
}

/// Sine hash in [0, 1).
#[inline]
pub fn hash11(t: f32) -> f32 {
    fract((t * 12345.564).sin() * 7658.76)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        // reversed
        assert_eq!(smoothstep(0.4, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(0.4, 0.0, 0.4), 0.0);
        // coincident
        assert_eq!(smoothstep(0.0, 0.0, 0.1), 1.0);
        assert_eq!(smoothstep(0.0, 0.0, -0.1), 0.0);
    }

    #[test]
    fn saw_peaks_at_b() {
        assert!((saw(0.85, 0.85) - 1.0).abs() < 1e-6);
        assert_eq!(saw(0.85, 0.0), 0.0);
        assert_eq!(saw(0.85, 1.0), 0.0);
    }

    #[test]
    fn hashes_stay_in_unit_range() {
        for i in 0..500 {
            let p = i as f32 * 37.3 - 4000.0;
            let h = hash13(p);
            assert!(h.min_element() >= 0.0 && h.max_element() < 1.0);
            let s = hash11(p);
            assert!((0.0..=1.0).contains(&s));
        }
    }
}
