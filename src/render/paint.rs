// paint.rs - Immediate-mode fills into a Frame
//
// A tiny subset of a 2D canvas: a pen carrying translate/rotate/scale and a
// global alpha, ellipse and polygon fills with anti-aliased edges, and radial
// gradients evaluated in the pen's local space. Paints are closures from a
// local point to a straight-alpha color.

use glam::{Vec2, Vec4};

use super::frame::Frame;

/// Smallest radius or axis a fill will accept.
pub const MIN_RADIUS: f32 = 0.01;

pub type Stop = (f32, Vec4);

pub const CLEAR: Vec4 = Vec4::ZERO;

/// `rgba(r, g, b, a)` with bytes in 0..255 and alpha in 0..1.
pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Vec4 {
    Vec4::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
}

pub const fn white(a: f32) -> Vec4 {
    rgba(255, 255, 255, a)
}

/// Concentric radial gradient: `t = (|p - center| - r0) / (r1 - r0)`, padded
/// with the end stops outside [0, 1].
#[derive(Clone, Copy)]
pub struct RadialGradient<'a> {
    center: Vec2,
    r0: f32,
    r1: f32,
    stops: &'a [Stop],
}

impl<'a> RadialGradient<'a> {
    pub fn new(center: Vec2, r0: f32, r1: f32, stops: &'a [Stop]) -> Self {
        Self { center, r0, r1, stops }
    }

    pub fn at(&self, p: Vec2) -> Vec4 {
        let Some(&(first_at, first)) = self.stops.first() else {
            return CLEAR;
        };
        let span = (self.r1 - self.r0).max(MIN_RADIUS);
        let t = ((p - self.center).length() - self.r0) / span;
        if t <= first_at {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (a_at, a) = pair[0];
            let (b_at, b) = pair[1];
            if t <= b_at {
                let k = (t - a_at) / (b_at - a_at).max(f32::EPSILON);
                return a.lerp(b, k);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

/// Local-to-device mapping: `device = (origin + R(rotation) * local) * scale`.
#[derive(Clone, Copy, Debug)]
pub struct Pen {
    origin: Vec2,
    rot: Vec2,
    scale: f32,
    pub alpha: f32,
}

impl Pen {
    pub fn new(origin: Vec2, rotation: f32, scale: f32) -> Self {
        let rotation = if rotation.is_finite() { rotation } else { 0.0 };
        Self {
            origin,
            rot: Vec2::from_angle(rotation),
            scale: scale.max(MIN_RADIUS),
            alpha: 1.0,
        }
    }

    /// Device pixels equal local units.
    pub fn identity() -> Self {
        Self::new(Vec2::ZERO, 0.0, 1.0)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    #[inline]
    fn to_device(&self, p: Vec2) -> Vec2 {
        (self.origin + self.rot.rotate(p)) * self.scale
    }

    #[inline]
    fn to_local(&self, d: Vec2) -> Vec2 {
        let p = d / self.scale - self.origin;
        Vec2::new(self.rot.x, -self.rot.y).rotate(p)
    }
}

/// Fill an axis-aligned (in local space) ellipse. `feather` softens the edge
/// by that many local units, which is how the drop shadows get their blur.
pub fn fill_ellipse<F>(frame: &mut Frame, pen: &Pen, center: Vec2, radii: Vec2, feather: f32, paint: F)
where
    F: Fn(Vec2) -> Vec4,
{
    if pen.alpha <= 0.0 || !center.is_finite() {
        return;
    }
    let radii = radii.max(Vec2::splat(MIN_RADIUS));
    let soft = 1.0 + 2.0 * feather.max(0.0) * pen.scale;

    let c = pen.to_device(center);
    let reach = radii.max_element() * pen.scale + soft;
    let Some((x0, y0, x1, y1)) = clip_box(frame, c - reach, c + reach) else {
        return;
    };

    for y in y0..y1 {
        for x in x0..x1 {
            let local = pen.to_local(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            let q = (local - center) / radii;
            let len = q.length();

            let coverage = if len < 1e-4 {
                1.0
            } else {
                // First-order distance to the rim, in device pixels.
                let grad = (q / radii).length() / len;
                let sd = (len - 1.0) / grad.max(1e-6) * pen.scale;
                (0.5 - sd / soft).clamp(0.0, 1.0)
            };
            if coverage <= 0.0 {
                continue;
            }

            let color = paint(local);
            frame.blend(x, y, color.with_w(color.w * coverage * pen.alpha));
        }
    }
}

pub fn fill_circle<F>(frame: &mut Frame, pen: &Pen, center: Vec2, radius: f32, paint: F)
where
    F: Fn(Vec2) -> Vec4,
{
    fill_ellipse(frame, pen, center, Vec2::splat(radius), 0.0, paint);
}

/// Non-zero winding fill of a closed local-space polygon, 2x2 supersampled.
pub fn fill_polygon<F>(frame: &mut Frame, pen: &Pen, points: &[Vec2], paint: F)
where
    F: Fn(Vec2) -> Vec4,
{
    if points.len() < 3 || pen.alpha <= 0.0 {
        return;
    }
    let device: Vec<Vec2> = points.iter().map(|&p| pen.to_device(p)).collect();
    if device.iter().any(|p| !p.is_finite()) {
        return;
    }

    let lo = device.iter().fold(Vec2::splat(f32::MAX), |a, &p| a.min(p));
    let hi = device.iter().fold(Vec2::splat(f32::MIN), |a, &p| a.max(p));
    let Some((x0, y0, x1, y1)) = clip_box(frame, lo, hi) else {
        return;
    };

    const TAPS: [Vec2; 4] = [
        Vec2::new(0.25, 0.25),
        Vec2::new(0.75, 0.25),
        Vec2::new(0.25, 0.75),
        Vec2::new(0.75, 0.75),
    ];

    for y in y0..y1 {
        for x in x0..x1 {
            let base = Vec2::new(x as f32, y as f32);
            let hits = TAPS.iter().filter(|&&t| winding(&device, base + t) != 0).count();
            if hits == 0 {
                continue;
            }
            let coverage = hits as f32 / TAPS.len() as f32;
            let color = paint(pen.to_local(base + 0.5));
            frame.blend(x, y, color.with_w(color.w * coverage * pen.alpha));
        }
    }
}

/// Append a flattened cubic bezier (excluding `p0`) to `out`.
pub fn cubic_to(out: &mut Vec<Vec2>, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, steps: usize) {
    let steps = steps.max(1);
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let u = 1.0 - t;
        out.push(p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t));
    }
}

fn winding(poly: &[Vec2], p: Vec2) -> i32 {
    let mut w = 0;
    for (i, &a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        let side = (b - a).perp_dot(p - a);
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                w += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            w -= 1;
        }
    }
    w
}

/// Device-space box clipped to the frame, as half-open pixel ranges.
fn clip_box(frame: &Frame, lo: Vec2, hi: Vec2) -> Option<(i32, i32, i32, i32)> {
    let x0 = lo.x.floor().max(0.0) as i32;
    let y0 = lo.y.floor().max(0.0) as i32;
    let x1 = (hi.x.ceil() as i64).min(frame.width() as i64) as i32;
    let y1 = (hi.y.ceil() as i64).min(frame.height() as i64) as i32;
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}
