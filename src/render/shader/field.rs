// field.rs - CPU evaluation of the analytic rain field
//
// Mirrors FRAGMENT_GLSL function for function. Nothing here knows about the
// physics engine: drops are a pure function of screen position and time.

use glam::{Vec2, Vec3};

use super::ShaderUniforms;
use crate::world::Backdrop;
use crate::world::noise::{fract, fract2, hash11, hash13, mix, saw, smoothstep as s};

/// Finite-difference step for the surface normal.
const NORMAL_EPS: f32 = 0.001;

const MIN_BLUR: f32 = 2.0;
const THUNDER_TINT: Vec3 = Vec3::new(0.8, 0.9, 1.3);

/// Layer weights derived from the current rain amount.
#[derive(Clone, Copy, Debug)]
pub struct Intensity {
    pub statics: f32,
    pub layer1: f32,
    pub layer2: f32,
}

impl Intensity {
    pub fn at(rain: f32) -> Self {
        Self {
            statics: s(-0.5, 1.0, rain) * 2.0,
            layer1: s(0.25, 0.75, rain),
            layer2: s(0.0, 0.5, rain),
        }
    }
}

/// One sliding layer: x = coverage of heads and beads, y = trail wetness.
pub fn sliding_layer(uv: Vec2, t: f32) -> Vec2 {
    let base = uv;
    let mut uv = uv;

    uv.y += t * 0.75;
    let a = Vec2::new(6.0, 1.0);
    let grid = a * 2.0;
    let id = (uv * grid).floor();

    uv.y += hash11(id.x);

    let id = (uv * grid).floor();
    let n = hash13(id.x * 35.2 + id.y * 2376.1);
    let st = fract2(uv * grid) - Vec2::new(0.5, 0.0);

    let mut x = n.x - 0.5;
    let wy = base.y * 20.0;
    let wiggle = (wy + wy.sin()).sin();
    x += wiggle * (0.5 - x.abs()) * (n.z - 0.5);
    x *= 0.7;
    let ti = fract(t + n.z);
    let y = (saw(0.85, ti) - 0.5) * 0.9 + 0.5;

    let d = ((st - Vec2::new(x, y)) * Vec2::new(a.y, a.x)).length();
    let head = s(0.4, 0.0, d);

    let r = s(1.0, y, st.y).sqrt();
    let cd = (st.x - x).abs();
    let front = s(-0.02, 0.02, st.y - y);
    let trail = s(0.23 * r, 0.15 * r * r, cd) * front * r * r;

    let ty = fract(base.y * 10.0) + (st.y - 0.5);
    let beads = s(0.3, 0.0, (st - Vec2::new(x, ty)).length());

    Vec2::new(head + beads * r * front, trail)
}

/// Tiny drops on a 40x grid that fade in and out independently.
pub fn static_drops(uv: Vec2, t: f32) -> f32 {
    let uv = uv * 40.0;
    let id = uv.floor();
    let cell = fract2(uv) - 0.5;
    let n = hash13(id.x * 107.45 + id.y * 3543.654);
    let p = (Vec2::new(n.x, n.y) - 0.5) * 0.7;
    let d = (cell - p).length();

    let fade = saw(0.025, fract(t + n.z));
    s(0.3, 0.0, d) * fract(n.z * 10.0) * fade
}

/// x = drop coverage, y = trail wetness.
pub fn rain_field(uv: Vec2, t: f32, k: Intensity) -> Vec2 {
    let st = static_drops(uv, t) * k.statics;
    let m1 = sliding_layer(uv, t) * k.layer1;
    let m2 = sliding_layer(uv * 1.85, t) * k.layer2;

    let c = s(0.3, 1.0, st + m1.x + m2.x);
    Vec2::new(c, (m1.y * k.statics).max(m2.y * k.layer1))
}

/// Per-frame constants shared by every pixel.
pub struct FrameParams {
    t: f32,
    max_blur: f32,
    zoom: f32,
    k: Intensity,
    tint: Vec3,
    flash: f32,
    fade: f32,
    center: Vec2,
    reference_height: f32,
}

impl FrameParams {
    pub fn new(u: &ShaderUniforms) -> Self {
        let time = u.time;
        let rain = (time * 0.05).sin() * 0.3 + 0.7;
        let zoom = mix(0.0, -(time * 0.2).cos(), u.enable_zoom);

        let t2 = (time + 3.0) * 0.5;
        let tint_mix = ((t2 * 0.2).sin() * 0.5 + 0.5) * u.enable_thunder;
        let tint = Vec3::ONE.lerp(THUNDER_TINT, tint_mix);

        let fade_seconds = u.fade_seconds.max(0.0);
        let fade = if fade_seconds <= 0.0 { 1.0 } else { s(0.0, fade_seconds, time) };
        let lightning = (t2 * (t2 * 10.0).sin()).sin() * (t2 + t2.sin()).sin().max(0.0).powf(10.0);
        let flash = 1.0 + lightning * fade * u.enable_thunder;

        Self {
            t: time * 0.2,
            max_blur: mix(3.0, 6.0, rain),
            zoom,
            k: Intensity::at(rain),
            tint,
            flash,
            fade,
            center: Vec2::new(u.resolution.x, u.resolution.y) * 0.5,
            reference_height: u.reference_height.max(1.0),
        }
    }

    /// Color of one fragment. `frag` is the GL fragment coordinate (origin
    /// bottom-left), `plane_uv` the plane's UV (v up).
    pub fn shade(&self, backdrop: &Backdrop, frag: Vec2, plane_uv: Vec2) -> Vec3 {
        let uv = (frag - self.center) / self.reference_height * (0.7 + self.zoom * 0.3);
        let tex_uv = (plane_uv - 0.5) * (0.9 + self.zoom * 0.1) + 0.5;

        let c = rain_field(uv, self.t, self.k);
        let cx = rain_field(uv + Vec2::new(NORMAL_EPS, 0.0), self.t, self.k).x;
        let cy = rain_field(uv + Vec2::new(0.0, NORMAL_EPS), self.t, self.k).x;
        let n = Vec2::new(cx - c.x, cy - c.x);

        let focus = mix(self.max_blur - c.y, MIN_BLUR, s(0.1, 0.2, c.x));
        let at = tex_uv + n;
        // Backdrop rows run top-down, GL v runs bottom-up.
        let mut col = backdrop.sample_lod(at.x, 1.0 - at.y, focus);

        col *= self.tint;
        col *= self.flash;
        let off = tex_uv - 0.5;
        col *= 1.0 - off.dot(off);
        col * self.fade
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_finite_and_bounded() {
        let k = Intensity::at(0.7);
        for i in 0..200 {
            let uv = Vec2::new(i as f32 * 0.013 - 1.0, i as f32 * 0.007 - 0.5);
            let c = rain_field(uv, i as f32 * 0.1, k);
            assert!(c.is_finite());
            assert!((0.0..=1.0).contains(&c.x));
        }
    }

    #[test]
    fn static_drops_stay_in_unit_range() {
        for i in 0..400 {
            let uv = Vec2::new((i % 20) as f32 * 0.011, (i / 20) as f32 * 0.017);
            let v = static_drops(uv, i as f32 * 0.05);
            assert!((0.0..=1.0).contains(&v), "{v} at {uv}");
        }
    }

    #[test]
    fn dry_glass_has_no_layers() {
        let k = Intensity::at(0.0);
        assert_eq!(k.layer1, 0.0);
        assert_eq!(k.layer2, 0.0);
        assert!(k.statics > 0.0);
    }
}
